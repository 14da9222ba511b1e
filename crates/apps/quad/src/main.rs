use anyhow::{Context as _, anyhow};
use clap::Parser;
use quad::{Args, QuadApp};
use tracing::info;
use tracing_subscriber::EnvFilter;
use winit::event_loop::{ControlFlow, EventLoop};

#[cfg(target_os = "linux")]
use winit::platform::x11::EventLoopBuilderExtX11;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = args.load_config().context("failed to load configuration")?;
    if let Some(ref path) = args.config {
        info!(path = %path.display(), "loaded config file");
    }

    #[cfg(target_os = "linux")]
    let event_loop = {
        let mut builder = EventLoop::builder();
        builder.with_x11();
        builder.build()
    };

    #[cfg(not(target_os = "linux"))]
    let event_loop = EventLoop::new();

    let event_loop = event_loop.map_err(|e| anyhow!("failed to create event loop: {e}"))?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = QuadApp::new(config, args.debug_mode());
    event_loop
        .run_app(&mut app)
        .map_err(|e| anyhow!("event loop failed: {e}"))?;

    match app.take_error() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
