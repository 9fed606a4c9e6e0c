use std::sync::Arc;

use log::error;
use tokio::runtime::Runtime;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

use super::LaunchOptions;
use crate::app::app::App;
use crate::settings::Settings;

pub struct AppHandler {
    pub app: Option<App>,
    pub settings: Settings,
    pub options: LaunchOptions,
    pub runtime: Runtime,
}

impl AppHandler {
    pub fn new(settings: Settings, options: LaunchOptions, runtime: Runtime) -> Self {
        Self {
            app: None,
            settings,
            options,
            runtime,
        }
    }
}

impl ApplicationHandler for AppHandler {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.app.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title("VRMVis-RS - Avatar Viewer")
            .with_inner_size(winit::dpi::LogicalSize::new(960.0, 720.0));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let runtime_handle = self.runtime.handle().clone();
        match self.runtime.block_on(App::new(
            window,
            runtime_handle,
            self.settings.clone(),
            &self.options,
        )) {
            Ok(app) => self.app = Some(app),
            Err(e) => {
                error!("Failed to start viewer: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(app) = &mut self.app {
            let response = app.handle_event(&event);
            if response.exit {
                app.dispose();
                event_loop.exit();
            }
        }
    }
}
