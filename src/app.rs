//! Application shell: owns the scenes, camera, renderer and GUI, and runs the
//! frame loop.

use glam::Vec3;

use crate::camera::{Camera, OrbitInput};
use crate::config::SandboxConfig;
use crate::gui::{FrameStats, GuiFrameOutput, GuiInput, GuiLayer, OverlayGui};
use crate::render::{Color, DrawList, FrameSummary, Renderer};
use crate::scene::{
    GeometricScene, PhysicsLayout, PhysicsScene, SceneManager, SceneStrategy, StaticModelScene,
};

const GRID_SLICES: u32 = 10;
const GRID_SPACING: f32 = 1.0;
const AXIS_LENGTH: f32 = 1.0;

/// Orbit rate in radians per second per unit of GUI camera speed.
const ORBIT_RATE: f32 = 0.25;

/// Input gathered for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    /// TAB: advance to the next scene.
    pub switch_scene: bool,
    /// F4: toggle camera tracking.
    pub toggle_camera_tracking: bool,
    /// Click in the 3D view. Re-enables camera tracking when the GUI does
    /// not own the pointer.
    pub click: bool,
    pub orbit: OrbitInput,
    /// Pointer, wheel and keys forwarded to the GUI.
    pub gui: GuiInput,
}

/// The sandbox application.
pub struct SandboxApp {
    config: SandboxConfig,
    renderer: DrawList,
    scenes: SceneManager,
    camera: Camera,
    gui: GuiLayer,
    overlay: OverlayGui,
    stats: FrameStats,
    camera_tracking: bool,
    time: f64,
    frame_count: u64,
    last_gui: GuiFrameOutput,
}

impl SandboxApp {
    /// Register the scenes and set up camera and GUI.
    ///
    /// The tree scene is registered only when its model file exists.
    pub fn new(config: SandboxConfig, mut renderer: DrawList) -> Self {
        let mut scenes = SceneManager::new();

        let tree = &config.assets.tree_model;
        if tree.exists() {
            scenes.register(StaticModelScene::new(tree.clone()), &mut renderer);
        } else {
            log::warn!(
                "Model file not found: {}; Tree Scene will not be available",
                tree.display()
            );
        }
        scenes.register(GeometricScene::new(), &mut renderer);
        scenes.register(
            PhysicsScene::with_layout(PhysicsLayout {
                ground: true,
                falling_boxes: config.physics.falling_boxes,
                character: Some(config.assets.character_model.clone()),
            }),
            &mut renderer,
        );
        log::info!("Total scenes registered: {}", scenes.len());

        let (width, height) = (config.window.width, config.window.height);
        Self {
            camera: config.camera.to_camera(),
            gui: GuiLayer::new(width, height),
            overlay: OverlayGui::new(),
            stats: FrameStats::new(width, height),
            config,
            renderer,
            scenes,
            camera_tracking: true,
            time: 0.0,
            frame_count: 0,
            last_gui: GuiFrameOutput::default(),
        }
    }

    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    pub fn scenes(&self) -> &SceneManager {
        &self.scenes
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn renderer(&self) -> &DrawList {
        &self.renderer
    }

    pub fn overlay(&self) -> &OverlayGui {
        &self.overlay
    }

    pub fn overlay_mut(&mut self) -> &mut OverlayGui {
        &mut self.overlay
    }

    pub fn camera_tracking(&self) -> bool {
        self.camera_tracking
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn last_gui_output(&self) -> GuiFrameOutput {
        self.last_gui
    }

    pub fn switch_to(&mut self, index: usize) -> bool {
        self.scenes.switch_to(index, &mut self.renderer)
    }

    /// Run one frame.
    ///
    /// Order: GUI begin, input, camera, scene update, 3D draw, GUI panels,
    /// GUI end, GUI commands, present.
    pub fn frame(&mut self, input: &FrameInput) -> FrameSummary {
        let dt = self.renderer.frame_time();
        self.stats.record(dt);
        self.time += f64::from(dt);

        let raw_input = self.gui.raw_input(self.time, &input.gui);
        self.gui.begin_frame(raw_input);

        if input.switch_scene && !self.gui.wants_capture_keyboard() {
            self.scenes.next(&mut self.renderer);
        }
        if input.toggle_camera_tracking {
            self.camera_tracking = !self.camera_tracking;
            log::info!(
                "Camera tracking {}",
                if self.camera_tracking { "enabled" } else { "disabled" }
            );
        }
        if input.click && !self.camera_tracking && !self.gui.wants_capture_mouse() {
            self.camera_tracking = true;
        }

        if self.camera_tracking && !self.gui.wants_capture_mouse() {
            self.camera.orbit(
                dt,
                self.overlay.camera_speed * ORBIT_RATE,
                self.overlay.camera_sensitivity,
                &input.orbit,
            );
        }

        self.scenes.update_current(dt);

        self.scenes.draw_current(&mut self.renderer);
        self.draw_reference();

        let command = self
            .overlay
            .show(self.gui.context(), &self.scenes, &mut self.camera, &self.stats);
        self.last_gui = self.gui.end_frame();
        if let Some(command) = command {
            self.scenes.apply(command, &mut self.renderer);
        }

        self.frame_count += 1;
        self.renderer.finish_frame()
    }

    /// Run `frames` frames, advancing the scene every
    /// `config.headless.switch_every` frames when that is non-zero.
    pub fn run(&mut self, frames: u64) -> u64 {
        let switch_every = self.config.headless.switch_every;
        let mut draws = 0;
        for i in 0..frames {
            let input = FrameInput {
                switch_scene: switch_every > 0 && i > 0 && i % switch_every == 0,
                ..FrameInput::default()
            };
            draws += self.frame(&input).total();
        }
        log::info!(
            "Ran {} frames ({} draw calls), ending on '{}'",
            frames,
            draws,
            self.scenes.current().map(|s| s.name()).unwrap_or("no scene")
        );
        frames
    }

    /// Clean up the active scene while the renderer is still alive.
    pub fn shutdown(&mut self) {
        self.scenes.shutdown(&mut self.renderer);
        log::info!(
            "Shut down after {} frames, {} models still loaded",
            self.frame_count,
            self.renderer.loaded_model_count()
        );
    }

    fn draw_reference(&mut self) {
        self.renderer.draw_grid(GRID_SLICES, GRID_SPACING);
        self.renderer
            .draw_line(Vec3::ZERO, Vec3::X * AXIS_LENGTH, Color::RED);
        self.renderer
            .draw_line(Vec3::ZERO, Vec3::Y * AXIS_LENGTH, Color::GREEN);
        self.renderer
            .draw_line(Vec3::ZERO, Vec3::Z * AXIS_LENGTH, Color::BLUE);
    }
}
