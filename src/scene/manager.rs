use crate::render::Renderer;

use super::{Scene, SceneStrategy};

/// Navigation request issued by the GUI or by input handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    Next,
    Previous,
    SwitchTo(usize),
}

/// Ordered collection of scenes with at most one active.
///
/// Only the active scene is ever initialized. Switching cleans up the
/// current scene before the new one is initialized.
pub struct SceneManager<S: SceneStrategy = Scene> {
    scenes: Vec<S>,
    current: Option<usize>,
}

impl<S: SceneStrategy> Default for SceneManager<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SceneStrategy> SceneManager<S> {
    pub fn new() -> Self {
        Self {
            scenes: Vec::new(),
            current: None,
        }
    }

    /// Append a scene. The first scene registered becomes active immediately.
    pub fn register(&mut self, scene: impl Into<S>, renderer: &mut dyn Renderer) -> usize {
        let scene = scene.into();
        log::info!("Registered scene '{}'", scene.name());
        self.scenes.push(scene);
        let index = self.scenes.len() - 1;
        if self.current.is_none() {
            self.current = Some(index);
            self.initialize_at(index, renderer);
        }
        index
    }

    /// Make scene `index` active. Returns `false` when `index` is out of range.
    ///
    /// Switching to the scene that is already active does nothing.
    pub fn switch_to(&mut self, index: usize, renderer: &mut dyn Renderer) -> bool {
        if index >= self.scenes.len() {
            log::warn!(
                "Ignoring switch to scene {} ({} registered)",
                index,
                self.scenes.len()
            );
            return false;
        }
        if self.current == Some(index) {
            return true;
        }

        if let Some(previous) = self.current {
            self.cleanup_at(previous, renderer);
        }
        self.current = Some(index);
        self.initialize_at(index, renderer);
        log::info!("Switched to scene '{}'", self.scenes[index].name());
        true
    }

    pub fn next(&mut self, renderer: &mut dyn Renderer) -> bool {
        match self.current {
            Some(current) if !self.scenes.is_empty() => {
                let n = self.scenes.len();
                self.switch_to((current + 1) % n, renderer)
            }
            _ => false,
        }
    }

    pub fn previous(&mut self, renderer: &mut dyn Renderer) -> bool {
        match self.current {
            Some(current) if !self.scenes.is_empty() => {
                let n = self.scenes.len();
                self.switch_to((current + n - 1) % n, renderer)
            }
            _ => false,
        }
    }

    pub fn apply(&mut self, command: SceneCommand, renderer: &mut dyn Renderer) -> bool {
        match command {
            SceneCommand::Next => self.next(renderer),
            SceneCommand::Previous => self.previous(renderer),
            SceneCommand::SwitchTo(index) => self.switch_to(index, renderer),
        }
    }

    pub fn current(&self) -> Option<&S> {
        self.scenes.get(self.current?)
    }

    pub fn current_mut(&mut self) -> Option<&mut S> {
        self.scenes.get_mut(self.current?)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn get(&self, index: usize) -> Option<&S> {
        self.scenes.get(index)
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn scene_names(&self) -> impl Iterator<Item = &str> {
        self.scenes.iter().map(|s| s.name())
    }

    pub fn update_current(&mut self, dt: f32) {
        if let Some(scene) = self.current_mut() {
            scene.update(dt);
        }
    }

    pub fn draw_current(&self, renderer: &mut dyn Renderer) {
        if let Some(scene) = self.current() {
            scene.draw(renderer);
        }
    }

    /// Clean up the active scene. Must run before the renderer goes away.
    pub fn shutdown(&mut self, renderer: &mut dyn Renderer) {
        if let Some(current) = self.current {
            self.cleanup_at(current, renderer);
        }
    }

    fn initialize_at(&mut self, index: usize, renderer: &mut dyn Renderer) {
        let scene = &mut self.scenes[index];
        if let Err(e) = scene.initialize(renderer) {
            log::error!("Failed to initialize scene '{}': {}", scene.name(), e);
        }
    }

    fn cleanup_at(&mut self, index: usize, renderer: &mut dyn Renderer) {
        let scene = &mut self.scenes[index];
        if let Err(e) = scene.cleanup(renderer) {
            log::error!("Failed to clean up scene '{}': {}", scene.name(), e);
        }
    }
}
