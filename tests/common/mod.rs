#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::mpsc::Sender;

use nalgebra_glm as glm;

use vrmvis_rs::animation::FixedJitter;
use vrmvis_rs::audio::FrequencyTap;
use vrmvis_rs::avatar::Character;
use vrmvis_rs::avatar::expression::{BLINK, MOUTH_A};
use vrmvis_rs::controller::{AvatarController, FrameId, FrameScheduler};
use vrmvis_rs::error::AvatarError;
use vrmvis_rs::loader::{AssetLoader, LoadCompletion, LoadRequest, RigBone, RigDescription, Ticket};
use vrmvis_rs::renderer::{Frame, RenderSurface};
use vrmvis_rs::settings::Settings;

/// What one draw call saw.
#[derive(Debug, Clone)]
pub struct DrawRecord {
    pub character: Option<String>,
    pub roots: usize,
    pub lights: usize,
    pub blink: Option<f32>,
    pub mouth: Option<f32>,
    pub camera_position: glm::Vec3,
}

#[derive(Clone, Default)]
pub struct RecordingSurface {
    pub draws: Rc<RefCell<Vec<DrawRecord>>>,
    pub fail: Rc<Cell<bool>>,
}

impl RenderSurface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (800, 600)
    }

    fn draw(&mut self, frame: &Frame<'_>) -> Result<(), AvatarError> {
        self.draws.borrow_mut().push(DrawRecord {
            character: frame.character.map(|c| c.name.clone()),
            roots: frame.scene.character_roots().count(),
            lights: frame.scene.lights().count(),
            blink: frame.character.and_then(|c| c.expressions().value(BLINK)),
            mouth: frame.character.and_then(|c| c.expressions().value(MOUTH_A)),
            camera_position: frame.camera.position,
        });
        if self.fail.get() {
            return Err(AvatarError::new("surface-lost"));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct SchedulerLog {
    pub requested: Vec<FrameId>,
    pub cancelled: Vec<FrameId>,
}

#[derive(Clone, Default)]
pub struct ManualScheduler {
    pub log: Rc<RefCell<SchedulerLog>>,
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameId {
        let mut log = self.log.borrow_mut();
        let id = FrameId(log.requested.len() as u64 + 1);
        log.requested.push(id);
        id
    }

    fn cancel_frame(&mut self, id: FrameId) {
        self.log.borrow_mut().cancelled.push(id);
    }
}

/// Holds requests until the test decides when, and in which order, they finish.
#[derive(Clone, Default)]
pub struct ManualLoader {
    pub pending: Rc<RefCell<Vec<(LoadRequest, Sender<LoadCompletion>)>>>,
}

impl AssetLoader for ManualLoader {
    fn request(&mut self, request: LoadRequest, completions: Sender<LoadCompletion>) {
        self.pending.borrow_mut().push((request, completions));
    }
}

impl ManualLoader {
    pub fn complete(&self, ticket: Ticket, result: Result<Character, AvatarError>) {
        let mut pending = self.pending.borrow_mut();
        let pos = pending
            .iter()
            .position(|(r, _)| r.ticket == ticket)
            .expect("no such pending load");
        let (request, sender) = pending.remove(pos);
        sender
            .send(LoadCompletion {
                ticket,
                locator: request.locator,
                result,
            })
            .unwrap();
    }
}

pub struct FlatTap {
    pub level: u8,
    pub closed: Rc<Cell<bool>>,
}

impl FlatTap {
    pub fn new(level: u8) -> (Box<Self>, Rc<Cell<bool>>) {
        let closed = Rc::new(Cell::new(false));
        (
            Box::new(Self {
                level,
                closed: closed.clone(),
            }),
            closed,
        )
    }
}

impl FrequencyTap for FlatTap {
    fn bin_count(&self) -> usize {
        128
    }

    fn byte_frequency_data(&mut self, out: &mut [u8]) {
        out.fill(self.level);
    }

    fn close(&mut self) {
        self.closed.set(true);
    }
}

fn bone(name: &str, parent: Option<&str>, translation: [f32; 3]) -> RigBone {
    RigBone {
        name: name.to_string(),
        parent: parent.map(str::to_string),
        translation,
        rotation: [0.0; 3],
        humanoid: None,
    }
}

/// Upright humanoid whose head bone sits at (0, `head_y`, 0).
pub fn humanoid(name: &str, head_y: f32) -> Character {
    RigDescription {
        name: name.to_string(),
        bones: vec![
            bone("hips", None, [0.0, 1.0, 0.0]),
            bone("neck", Some("hips"), [0.0, head_y - 1.1, 0.0]),
            bone("head", Some("neck"), [0.0, 0.1, 0.0]),
            bone("leftUpperArm", Some("hips"), [0.2, 0.35, 0.0]),
            bone("rightUpperArm", Some("hips"), [-0.2, 0.35, 0.0]),
        ],
        expressions: vec![BLINK.to_string(), MOUTH_A.to_string()],
    }
    .into_character(&format!("test://{name}"))
    .unwrap()
}

/// A rig with neither head nor neck and no expression channels.
pub fn blob(name: &str) -> Character {
    RigDescription {
        name: name.to_string(),
        bones: vec![bone("root", None, [0.0, 0.5, 0.0])],
        expressions: Vec::new(),
    }
    .into_character(&format!("test://{name}"))
    .unwrap()
}

pub struct Harness {
    pub controller: AvatarController<RecordingSurface>,
    pub surface: RecordingSurface,
    pub scheduler: ManualScheduler,
    pub loader: ManualLoader,
}

impl Harness {
    /// Uninitialized controller; blink interval pinned to `2 + 8 * jitter`.
    pub fn new(jitter: f32) -> Self {
        let loader = ManualLoader::default();
        let controller = AvatarController::new(
            Settings::default(),
            Box::new(loader.clone()),
            Box::new(FixedJitter(jitter)),
        );
        Self {
            controller,
            surface: RecordingSurface::default(),
            scheduler: ManualScheduler::default(),
            loader,
        }
    }

    pub fn initialized(jitter: f32) -> Self {
        let mut h = Self::new(jitter);
        assert!(h
            .controller
            .initialize(h.surface.clone(), Box::new(h.scheduler.clone())));
        h
    }

    pub fn draws(&self) -> Vec<DrawRecord> {
        self.surface.draws.borrow().clone()
    }

    pub fn last_draw(&self) -> DrawRecord {
        self.draws().last().cloned().expect("nothing drawn")
    }
}
