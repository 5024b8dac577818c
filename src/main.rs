use std::process::ExitCode;

use clap::Parser;

use scene_sandbox::args::SandboxArgs;
use scene_sandbox::render::DrawList;
use scene_sandbox::{SandboxApp, SandboxConfig};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = SandboxArgs::parse();
    let mut config = match SandboxConfig::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    args.apply(&mut config);

    log::info!(
        "{} ({}x{}), {} frames at {:.4}s",
        config.window.title,
        config.window.width,
        config.window.height,
        config.headless.frames,
        config.headless.frame_time
    );

    let frames = config.headless.frames;
    let renderer = DrawList::with_frame_time(config.headless.frame_time);
    let mut app = SandboxApp::new(config, renderer);

    if let Some(index) = args.scene {
        if !app.switch_to(index) {
            log::warn!("No scene {}; staying on the first scene", index);
        }
    }

    app.run(frames);
    app.shutdown();
    ExitCode::SUCCESS
}
