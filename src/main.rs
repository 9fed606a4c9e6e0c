use anyhow::{Context, anyhow};
use winit::event_loop::{ControlFlow, EventLoop};

use vrmvis_rs::app::{AppHandler, LaunchOptions};
use vrmvis_rs::settings::Settings;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let options = LaunchOptions::parse(std::env::args().skip(1))
        .map_err(|e| anyhow!("{e}\nusage: vrmvis-rs [ASSET] [--mic | --clip <wav>]"))?;

    let settings = Settings::load();
    settings.save();

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
    let mut handler = AppHandler::new(settings, options, runtime);

    event_loop.run_app(&mut handler)?;

    Ok(())
}
