pub mod animation;
pub mod app;
pub mod audio;
pub mod avatar;
pub mod controller;
pub mod error;
pub mod loader;
pub mod renderer;
pub mod settings;
pub mod ui;

/// Name under which confy stores the settings files.
pub const CONFY_APP_NAME: &str = "vrmvis-rs";
