// The avatar animation controller: owns the render loop, the active
// character and the per-frame animation drivers.

pub mod frame;

use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Instant;

use log::{debug, error, info, warn};

use crate::animation::{BlinkController, BlinkJitter, LipSyncAnalyzer, apply_resting_pose};
use crate::audio::{AudioGraph, AudioSource, FrequencyTap};
use crate::avatar::Character;
use crate::error::AvatarError;
use crate::loader::{AssetLoader, LoadCompletion, LoadRequest, Ticket};
use crate::renderer::{Camera, CameraFramer, Frame, NodeKind, RenderSurface, Scene};
use crate::settings::Settings;

pub use frame::{FrameId, FrameScheduler, WindowScheduler};

/// What happened to one finished load.
#[derive(Debug)]
pub enum LoadOutcome {
    Installed { ticket: Ticket, name: String },
    Failed { ticket: Ticket, error: AvatarError },
    /// A newer load was already installed; this one was dropped.
    Superseded { ticket: Ticket },
}

pub struct AvatarController<S: RenderSurface> {
    settings: Settings,
    surface: Option<S>,
    scheduler: Option<Box<dyn FrameScheduler>>,
    armed: Option<FrameId>,
    disposed: bool,

    scene: Scene,
    camera: Camera,
    framer: CameraFramer,

    character: Option<Character>,
    installed_ticket: Option<Ticket>,
    next_ticket: Ticket,
    in_flight: usize,
    loader: Box<dyn AssetLoader>,
    completions_tx: Sender<LoadCompletion>,
    completions_rx: Receiver<LoadCompletion>,

    blink: BlinkController,
    lip_sync: LipSyncAnalyzer,
    last_tick: Option<Instant>,
    draws: u64,
}

impl<S: RenderSurface> AvatarController<S> {
    pub fn new(settings: Settings, loader: Box<dyn AssetLoader>, jitter: Box<dyn BlinkJitter>) -> Self {
        let (completions_tx, completions_rx) = mpsc::channel();
        Self {
            surface: None,
            scheduler: None,
            armed: None,
            disposed: false,
            scene: Scene::new(),
            camera: Camera::new(&settings.camera, 1.0),
            framer: CameraFramer::from_settings(&settings.camera),
            character: None,
            installed_ticket: None,
            next_ticket: 0,
            in_flight: 0,
            loader,
            completions_tx,
            completions_rx,
            blink: BlinkController::new(&settings.blink, jitter),
            lip_sync: LipSyncAnalyzer::new(&settings.lip_sync),
            last_tick: None,
            draws: 0,
            settings,
        }
    }

    /// Build the scene, aim the camera and start the render loop.
    ///
    /// Only the first call takes effect; later calls are logged and dropped
    /// together with the surface they were given.
    pub fn initialize(&mut self, surface: S, mut scheduler: Box<dyn FrameScheduler>) -> bool {
        if self.disposed {
            warn!("Avatar controller disposed, ignoring initialize");
            return false;
        }
        if self.surface.is_some() {
            warn!("Avatar controller already initialized, ignoring");
            return false;
        }

        let (width, height) = surface.size();
        self.camera = Camera::new(&self.settings.camera, Camera::aspect_for(width, height));
        self.scene.add_default_lights();

        self.armed = Some(scheduler.request_frame());
        self.surface = Some(surface);
        self.scheduler = Some(scheduler);
        info!("Avatar controller initialized at {}x{}", width, height);
        true
    }

    /// Start loading a character. The returned ticket identifies the load in
    /// the [`LoadOutcome`] produced once it completes.
    pub fn load_character(&mut self, locator: impl Into<String>) -> Ticket {
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        let locator = locator.into();

        if self.disposed {
            warn!("Controller disposed, not loading {}", locator);
            return ticket;
        }

        info!("Requesting character #{}: {}", ticket, locator);
        self.in_flight += 1;
        self.loader.request(LoadRequest { ticket, locator }, self.completions_tx.clone());
        ticket
    }

    /// Wire an audio source into a fresh analysis graph, replacing any
    /// previous one.
    pub fn setup_lip_sync(&mut self, source: Box<dyn AudioSource>) -> Result<(), AvatarError> {
        let graph = AudioGraph::connect(source, &self.settings.lip_sync)
            .map_err(|e| AvatarError::new("lip-sync-failed").push_avatar(e))?;
        self.setup_lip_sync_tap(Box::new(graph));
        Ok(())
    }

    /// Like [`Self::setup_lip_sync`] for an already assembled analysis graph.
    pub fn setup_lip_sync_tap(&mut self, tap: Box<dyn FrequencyTap>) {
        info!("Lip-sync configured with {} frequency bins", tap.bin_count());
        self.lip_sync.setup(tap);
    }

    /// Stop the render loop and release the audio graph and the active character.
    /// Safe on a controller that was never initialized.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        if let (Some(id), Some(scheduler)) = (self.armed.take(), self.scheduler.as_mut()) {
            scheduler.cancel_frame(id);
        }
        self.lip_sync.teardown();
        if let Some(mut character) = self.character.take() {
            if let Some(root) = character.take_root() {
                self.scene.remove(root);
            }
        }
        info!("Avatar controller disposed");
    }

    /// Run the tick armed for `id`, then re-arm. Returns `false` when `id` is
    /// not the frame currently armed (cancelled, stale or never requested).
    pub fn on_frame(&mut self, id: FrameId) -> bool {
        if self.armed != Some(id) {
            return false;
        }
        self.armed = None;

        let now = Instant::now();
        let delta = self
            .last_tick
            .map(|t| now.duration_since(t).as_secs_f32())
            .unwrap_or(0.0);
        self.last_tick = Some(now);

        self.tick_with_delta(delta);

        if !self.disposed {
            if let Some(scheduler) = self.scheduler.as_mut() {
                self.armed = Some(scheduler.request_frame());
            }
        }
        true
    }

    /// Run whichever frame is currently armed, if any.
    pub fn run_frame(&mut self) -> bool {
        match self.armed {
            Some(id) => self.on_frame(id),
            None => false,
        }
    }

    /// One tick with an explicit delta: finish loads, animate, draw.
    pub fn tick_with_delta(&mut self, delta: f32) {
        self.poll_loads();

        if let Some(character) = self.character.as_mut() {
            character.update(delta);
            apply_resting_pose(character);
            self.blink.step(delta, character.expressions_mut());
            self.lip_sync.step(character.expressions_mut());
        }

        self.draw();
    }

    /// Apply every completed load, oldest first.
    pub fn poll_loads(&mut self) -> Vec<LoadOutcome> {
        let mut outcomes = Vec::new();
        while let Ok(completion) = self.completions_rx.try_recv() {
            outcomes.push(self.complete_load(completion));
        }
        outcomes
    }

    fn complete_load(&mut self, completion: LoadCompletion) -> LoadOutcome {
        let LoadCompletion {
            ticket,
            locator,
            result,
        } = completion;
        self.in_flight = self.in_flight.saturating_sub(1);

        if self.disposed {
            debug!("Dropping load #{} of {} after dispose", ticket, locator);
            return LoadOutcome::Superseded { ticket };
        }

        let character = match result {
            Ok(character) => character,
            Err(error) => {
                error!("Failed to load character #{}: {}", ticket, error);
                return LoadOutcome::Failed { ticket, error };
            }
        };

        if self.installed_ticket.is_some_and(|installed| ticket < installed) {
            warn!(
                "Load #{} of {} finished after a newer character, discarding",
                ticket, locator
            );
            return LoadOutcome::Superseded { ticket };
        }

        let name = character.name.clone();
        self.install(ticket, character);
        LoadOutcome::Installed { ticket, name }
    }

    fn install(&mut self, ticket: Ticket, mut character: Character) {
        if let Some(mut previous) = self.character.take() {
            if let Some(root) = previous.take_root() {
                self.scene.remove(root);
            }
            debug!("Released character {}", previous.name);
        }

        let root = self.scene.add(NodeKind::CharacterRoot {
            name: character.name.clone(),
        });
        character.set_root(root);
        self.blink.reset(character.expressions_mut());

        match self.framer.frame(&mut self.camera, &character) {
            Ok(pose) => debug!(
                "Camera framed on {} at ({:.2}, {:.2}, {:.2})",
                character.name, pose.position.x, pose.position.y, pose.position.z
            ),
            Err(e) => warn!("Camera not reframed: {}", e),
        }

        info!("Character #{} '{}' installed from {}", ticket, character.name, character.locator);
        self.installed_ticket = Some(ticket);
        self.character = Some(character);
    }

    fn draw(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let frame = Frame {
            scene: &self.scene,
            camera: &self.camera,
            character: self.character.as_ref(),
        };
        if let Err(e) = surface.draw(&frame) {
            error!("{}", AvatarError::new("render-failed").push_avatar(e));
        }
        self.draws += 1;
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn active_character(&self) -> Option<&Character> {
        self.character.as_ref()
    }

    pub fn blink(&self) -> &BlinkController {
        &self.blink
    }

    pub fn lip_sync(&self) -> &LipSyncAnalyzer {
        &self.lip_sync
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    /// Loads requested but not yet completed.
    pub fn pending_loads(&self) -> usize {
        self.in_flight
    }

    pub fn armed_frame(&self) -> Option<FrameId> {
        self.armed
    }

    pub fn is_initialized(&self) -> bool {
        self.surface.is_some()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Draw calls issued so far, including failed ones.
    pub fn draw_count(&self) -> u64 {
        self.draws
    }
}

impl<S: RenderSurface> Drop for AvatarController<S> {
    fn drop(&mut self) {
        self.dispose();
    }
}
