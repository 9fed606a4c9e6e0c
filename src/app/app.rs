use std::sync::Arc;

use log::{error, info};
use winit::window::Window;

use super::{LaunchOptions, LipSyncInput};
use crate::animation::RandomJitter;
use crate::audio::{AudioSource, ClipSource, MicrophoneSource};
use crate::avatar::expression::{BLINK, MOUTH_A};
use crate::controller::{AvatarController, WindowScheduler};
use crate::error::AvatarError;
use crate::loader::RigLoader;
use crate::renderer::{Overlay, Renderer};
use crate::settings::{AssetEntry, Settings};
use crate::ui::{Ui, UiStatus};

pub struct App {
    pub window: Arc<Window>,
    ui: Ui,
    controller: AvatarController<Renderer>,
    assets: Vec<AssetEntry>,
    egui_state: egui_winit::State,
    egui_ctx: egui::Context,
}

pub struct EventResponse {
    pub exit: bool,
}

impl App {
    pub async fn new(
        window: Arc<Window>,
        runtime: tokio::runtime::Handle,
        settings: Settings,
        options: &LaunchOptions,
    ) -> Result<Self, AvatarError> {
        let renderer = Renderer::new(window.clone(), settings.camera.background).await?;
        let egui_ctx = renderer.egui_context();

        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::viewport::ViewportId::ROOT,
            &*window,
            None,
            None,
            None,
        );

        let assets = settings.assets.known.clone();
        let startup = options
            .asset
            .clone()
            .or_else(|| settings.assets.startup_locator().map(str::to_string));

        let mut controller = AvatarController::new(
            settings,
            Box::new(RigLoader::new(runtime)),
            Box::new(RandomJitter::from_entropy()),
        );
        controller.initialize(renderer, Box::new(WindowScheduler::new(window.clone())));

        if let Some(source) = open_audio(&options.lip_sync) {
            if let Err(e) = controller.setup_lip_sync(source) {
                error!("{}", e);
            }
        }

        if let Some(locator) = startup {
            controller.load_character(locator);
        }

        Ok(Self {
            window,
            ui: Ui::new(),
            controller,
            assets,
            egui_state,
            egui_ctx,
        })
    }

    pub fn handle_event(&mut self, event: &winit::event::WindowEvent) -> EventResponse {
        let egui_response = self.egui_state.on_window_event(&self.window, event);

        match event {
            winit::event::WindowEvent::CloseRequested => return EventResponse { exit: true },
            winit::event::WindowEvent::RedrawRequested => self.render(),
            winit::event::WindowEvent::Resized(size) => {
                if let Some(renderer) = self.controller.surface_mut() {
                    renderer.resize(*size);
                }
            }
            winit::event::WindowEvent::KeyboardInput { event, .. } if !egui_response.consumed => {
                if event.logical_key == winit::keyboard::Key::Named(winit::keyboard::NamedKey::Escape) {
                    return EventResponse { exit: true };
                }
            }
            _ => {}
        }

        EventResponse { exit: false }
    }

    /// Build the overlay and run the armed controller tick.
    fn render(&mut self) {
        let raw_input = self.egui_state.take_egui_input(&self.window);

        let character = self.controller.active_character();
        let status = UiStatus {
            active: character.map(|c| c.name.as_str()),
            active_locator: character.map(|c| c.locator.as_str()),
            pending: self.controller.pending_loads(),
            blink: character.and_then(|c| c.expressions().value(BLINK)),
            mouth: character.and_then(|c| c.expressions().value(MOUTH_A)),
            lip_sync: self.controller.lip_sync().is_configured(),
        };

        let mut picked = None;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            picked = self.ui.show(ctx, &self.assets, &status);
        });

        self.egui_state
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let size = self.window.inner_size();
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [size.width, size.height],
            pixels_per_point: self.window.scale_factor() as f32,
        };

        if let Some(renderer) = self.controller.surface_mut() {
            renderer.set_overlay(Overlay {
                paint_jobs,
                textures_delta: full_output.textures_delta,
                screen_descriptor,
            });
        }

        if let Some(locator) = picked {
            self.controller.load_character(locator);
        }

        self.controller.run_frame();
    }

    pub fn dispose(&mut self) {
        self.controller.dispose();
    }
}

fn open_audio(input: &LipSyncInput) -> Option<Box<dyn AudioSource>> {
    let opened: Result<Box<dyn AudioSource>, AvatarError> = match input {
        LipSyncInput::None => return None,
        LipSyncInput::Microphone => {
            MicrophoneSource::open_default().map(|s| Box::new(s) as Box<dyn AudioSource>)
        }
        LipSyncInput::Clip(path) => {
            ClipSource::open(path).map(|s| Box::new(s) as Box<dyn AudioSource>)
        }
    };
    match opened {
        Ok(source) => {
            info!("Lip-sync source: {:?}", input);
            Some(source)
        }
        Err(e) => {
            error!("{}", AvatarError::new("lip-sync-failed").push_avatar(e));
            None
        }
    }
}
