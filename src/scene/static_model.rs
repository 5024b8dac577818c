use std::path::{Path, PathBuf};

use glam::Vec3;

use crate::error::{SceneError, SceneResult};
use crate::render::{Color, Model, Renderer};

use super::SceneStrategy;

const DEFAULT_NAME: &str = "Tree Scene";
const DEFAULT_SCALE: f32 = 2.0;

/// A single model file drawn at the origin.
pub struct StaticModelScene {
    name: String,
    path: PathBuf,
    scale: f32,
    position: Vec3,
    model: Option<Model>,
}

impl StaticModelScene {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            path: path.into(),
            scale: DEFAULT_SCALE,
            position: Vec3::ZERO,
            model: None,
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.is_empty() {
            self.name = name;
        }
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }
}

impl SceneStrategy for StaticModelScene {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_initialized(&self) -> bool {
        self.model.is_some()
    }

    fn initialize(&mut self, renderer: &mut dyn Renderer) -> SceneResult<()> {
        if self.model.is_some() {
            return Ok(());
        }
        if !self.path.exists() {
            return Err(SceneError::AssetMissing(self.path.clone()));
        }

        let model = renderer.load_model(&self.path);
        if !model.is_valid() {
            return Err(SceneError::AssetInvalid {
                path: self.path.clone(),
                reason: "renderer could not load the model".to_string(),
            });
        }

        log::info!("Loaded {} for '{}'", self.path.display(), self.name);
        self.position = Vec3::ZERO;
        self.model = Some(model);
        Ok(())
    }

    fn draw(&self, renderer: &mut dyn Renderer) {
        if let Some(model) = &self.model {
            renderer.draw_model_uniform(model.handle(), self.position, self.scale, Color::WHITE);
        }
    }

    fn cleanup(&mut self, renderer: &mut dyn Renderer) -> SceneResult<()> {
        if let Some(model) = self.model.take() {
            renderer.unload_model(model.handle());
            log::debug!("Unloaded '{}'", self.name);
        }
        Ok(())
    }
}
