//! Scene Sandbox - a scene-switching 3D sandbox
//!
//! Three scenes share one lifecycle and can be switched at runtime:
//! - **Static model**: a single glTF model at the origin
//! - **Geometric**: spinning cubes animated from a clock
//! - **Physics**: rapier rigid bodies bridged to drawable models through a
//!   Bevy ECS world
//!
//! An egui overlay controls the camera and scene navigation. Drawing goes
//! through the [`render::Renderer`] trait; [`render::DrawList`] is the
//! headless implementation the binary and the tests run against.

pub mod app;
pub mod args;
pub mod camera;
pub mod components;
pub mod config;
pub mod error;
pub mod gui;
pub mod physics;
pub mod render;
pub mod scene;

pub use app::{FrameInput, SandboxApp};
pub use camera::Camera;
pub use config::SandboxConfig;
pub use error::{ConfigError, PhysicsError, SceneError, SceneResult};
pub use scene::{Scene, SceneCommand, SceneManager, SceneStrategy};
