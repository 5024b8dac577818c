//! Scenes and their lifecycle.
//!
//! Every scene implements [`SceneStrategy`]. The three concrete scenes are
//! gathered in the closed [`Scene`] enum, which is what the application's
//! [`SceneManager`] holds.

mod geometric;
mod manager;
mod physics;
mod static_model;

pub use geometric::{GeometricObject, GeometricScene};
pub use manager::{SceneCommand, SceneManager};
pub use physics::{PhysicsLayout, PhysicsScene, SpawnDesc};
pub use static_model::StaticModelScene;

use crate::error::SceneResult;
use crate::render::Renderer;

/// A scene's lifecycle: initialize, per-frame update and draw, cleanup.
///
/// `initialize` and `cleanup` are both idempotent. `cleanup` must be safe
/// after a failed or partial `initialize`, and after no `initialize` at all.
pub trait SceneStrategy {
    /// Display name. Never empty.
    fn name(&self) -> &str;

    fn is_initialized(&self) -> bool;

    /// Establish every resource the scene owns. No-op when already initialized.
    fn initialize(&mut self, renderer: &mut dyn Renderer) -> SceneResult<()>;

    /// Advance the scene by `dt` seconds.
    fn update(&mut self, _dt: f32) {}

    /// Issue draw calls. Never mutates the scene.
    fn draw(&self, renderer: &mut dyn Renderer);

    /// Release what `initialize` established.
    fn cleanup(&mut self, renderer: &mut dyn Renderer) -> SceneResult<()>;
}

/// The scenes the sandbox knows about.
pub enum Scene {
    StaticModel(StaticModelScene),
    Geometric(GeometricScene),
    Physics(PhysicsScene),
}

impl Scene {
    fn inner(&self) -> &dyn SceneStrategy {
        match self {
            Scene::StaticModel(s) => s,
            Scene::Geometric(s) => s,
            Scene::Physics(s) => s,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn SceneStrategy {
        match self {
            Scene::StaticModel(s) => s,
            Scene::Geometric(s) => s,
            Scene::Physics(s) => s,
        }
    }

    pub fn as_physics(&self) -> Option<&PhysicsScene> {
        match self {
            Scene::Physics(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_geometric(&self) -> Option<&GeometricScene> {
        match self {
            Scene::Geometric(s) => Some(s),
            _ => None,
        }
    }
}

impl SceneStrategy for Scene {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn is_initialized(&self) -> bool {
        self.inner().is_initialized()
    }

    fn initialize(&mut self, renderer: &mut dyn Renderer) -> SceneResult<()> {
        self.inner_mut().initialize(renderer)
    }

    fn update(&mut self, dt: f32) {
        self.inner_mut().update(dt);
    }

    fn draw(&self, renderer: &mut dyn Renderer) {
        self.inner().draw(renderer);
    }

    fn cleanup(&mut self, renderer: &mut dyn Renderer) -> SceneResult<()> {
        self.inner_mut().cleanup(renderer)
    }
}

impl From<StaticModelScene> for Scene {
    fn from(scene: StaticModelScene) -> Self {
        Scene::StaticModel(scene)
    }
}

impl From<GeometricScene> for Scene {
    fn from(scene: GeometricScene) -> Self {
        Scene::Geometric(scene)
    }
}

impl From<PhysicsScene> for Scene {
    fn from(scene: PhysicsScene) -> Self {
        Scene::Physics(scene)
    }
}
