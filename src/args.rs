//! Command line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::config::SandboxConfig;

/// Scene sandbox: static models, procedural shapes and rigid bodies.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(
    name = "scene-sandbox",
    about = "Scene-switching 3D sandbox",
    long_about = "Runs the scene sandbox frame loop against the headless draw-list renderer.\n\n\
        EXAMPLES:\n\
          # Run 600 frames with the default config\n\
          scene-sandbox\n\
        \n\
          # Start on the physics scene and cycle scenes every 2 seconds\n\
          scene-sandbox --scene 2 --switch-every 120",
    version
)]
pub struct SandboxArgs {
    /// TOML config file. Missing file means defaults.
    #[arg(long, default_value = "sandbox.toml")]
    pub config: PathBuf,

    /// Exit after N frames (overrides the config).
    #[arg(long)]
    pub frames: Option<u64>,

    /// Simulated seconds per frame (overrides the config).
    #[arg(long)]
    pub frame_time: Option<f32>,

    /// Advance to the next scene every N frames; 0 disables (overrides the config).
    #[arg(long)]
    pub switch_every: Option<u64>,

    /// Scene index to start on.
    #[arg(long)]
    pub scene: Option<usize>,
}

impl SandboxArgs {
    /// Apply command line overrides on top of a loaded config.
    pub fn apply(&self, config: &mut SandboxConfig) {
        if let Some(frames) = self.frames {
            config.headless.frames = frames;
        }
        if let Some(frame_time) = self.frame_time {
            if frame_time > 0.0 {
                config.headless.frame_time = frame_time;
            } else {
                log::warn!("Ignoring non-positive --frame-time {}", frame_time);
            }
        }
        if let Some(switch_every) = self.switch_every {
            config.headless.switch_every = switch_every;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = SandboxArgs::parse_from(["scene-sandbox"]);
        assert_eq!(args.config, PathBuf::from("sandbox.toml"));
        assert!(args.frames.is_none());
        assert!(args.scene.is_none());
    }

    #[test]
    fn test_overrides() {
        let args = SandboxArgs::parse_from([
            "scene-sandbox",
            "--frames",
            "10",
            "--frame-time",
            "0.5",
            "--switch-every",
            "3",
            "--scene",
            "1",
        ]);
        let mut config = SandboxConfig::default();
        args.apply(&mut config);
        assert_eq!(config.headless.frames, 10);
        assert_eq!(config.headless.frame_time, 0.5);
        assert_eq!(config.headless.switch_every, 3);
        assert_eq!(args.scene, Some(1));
    }

    #[test]
    fn test_non_positive_frame_time_is_ignored() {
        let args = SandboxArgs::parse_from(["scene-sandbox", "--frame-time", "0"]);
        let mut config = SandboxConfig::default();
        args.apply(&mut config);
        assert_eq!(config.headless.frame_time, 1.0 / 60.0);
    }
}
