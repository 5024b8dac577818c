use std::collections::VecDeque;

use crate::camera::Camera;
use crate::scene::{SceneCommand, SceneManager, SceneStrategy};

const FRAME_HISTORY: usize = 120;

/// Rolling frame-time statistics shown by the overlay.
#[derive(Debug, Clone)]
pub struct FrameStats {
    frame_times: VecDeque<f32>,
    screen_size: (u32, u32),
}

impl FrameStats {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            frame_times: VecDeque::with_capacity(FRAME_HISTORY),
            screen_size: (width, height),
        }
    }

    pub fn record(&mut self, dt: f32) {
        if self.frame_times.len() == FRAME_HISTORY {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(dt);
    }

    /// Last frame time in seconds.
    pub fn frame_time(&self) -> f32 {
        self.frame_times.back().copied().unwrap_or(0.0)
    }

    pub fn fps(&self) -> f32 {
        per_second(self.frame_time())
    }

    pub fn average_frame_time(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32
    }

    pub fn average_fps(&self) -> f32 {
        per_second(self.average_frame_time())
    }

    pub fn screen_size(&self) -> (u32, u32) {
        self.screen_size
    }
}

fn per_second(seconds: f32) -> f32 {
    if seconds > 0.0 {
        1.0 / seconds
    } else {
        0.0
    }
}

/// Control panel, debug info and scene info windows.
///
/// Holds only what the panels themselves own: window visibility and the
/// camera tuning values. Scene navigation comes back as a [`SceneCommand`].
pub struct OverlayGui {
    pub visible: bool,
    pub show_control_panel: bool,
    pub show_debug_info: bool,
    pub show_scene_info: bool,
    pub show_inspection: bool,
    pub camera_speed: f32,
    pub camera_sensitivity: f32,
    /// Screen rects of the Previous / Next buttons from the last frame.
    nav_buttons: Option<(egui::Rect, egui::Rect)>,
}

impl Default for OverlayGui {
    fn default() -> Self {
        Self {
            visible: true,
            show_control_panel: true,
            show_debug_info: true,
            show_scene_info: true,
            show_inspection: false,
            camera_speed: 2.0,
            camera_sensitivity: 0.003,
            nav_buttons: None,
        }
    }
}

impl OverlayGui {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_visibility(&mut self) {
        self.visible = !self.visible;
    }

    /// Where the Previous and Next scene buttons were drawn last frame.
    pub fn scene_button_rects(&self) -> Option<(egui::Rect, egui::Rect)> {
        self.nav_buttons
    }

    /// Lay out every open window for this frame.
    pub fn show<S: SceneStrategy>(
        &mut self,
        ctx: &egui::Context,
        scenes: &SceneManager<S>,
        camera: &mut Camera,
        stats: &FrameStats,
    ) -> Option<SceneCommand> {
        if !self.visible {
            return None;
        }
        let command = self.control_panel(ctx, scenes, camera, stats);
        self.debug_panel(ctx, stats);
        self.scene_info(ctx, scenes);
        self.inspection(ctx);
        command
    }

    fn control_panel<S: SceneStrategy>(
        &mut self,
        ctx: &egui::Context,
        scenes: &SceneManager<S>,
        camera: &mut Camera,
        stats: &FrameStats,
    ) -> Option<SceneCommand> {
        self.nav_buttons = None;
        if !self.show_control_panel {
            return None;
        }

        let mut command = None;
        let mut nav_buttons = None;
        let mut open = true;
        egui::Window::new("Control Panel")
            .open(&mut open)
            .default_pos([10.0, 10.0])
            .default_width(280.0)
            .show(ctx, |ui| {
                egui::CollapsingHeader::new("Scene Management")
                    .default_open(true)
                    .show(ui, |ui| {
                        match (scenes.current(), scenes.current_index()) {
                            (Some(scene), Some(index)) => {
                                ui.label(format!("Current: {}", scene.name()));
                                ui.label(format!("Scene {} of {}", index + 1, scenes.len()));
                                ui.add_space(4.0);
                                ui.horizontal(|ui| {
                                    let previous = ui.button("Previous Scene");
                                    let next = ui.button("Next Scene");
                                    if previous.clicked() {
                                        command = Some(SceneCommand::Previous);
                                    }
                                    if next.clicked() {
                                        command = Some(SceneCommand::Next);
                                    }
                                    nav_buttons = Some((previous.rect, next.rect));
                                });
                            }
                            _ => {
                                ui.label("No scenes registered");
                            }
                        }
                    });

                egui::CollapsingHeader::new("Camera Controls")
                    .default_open(true)
                    .show(ui, |ui| {
                        vec3_drag(ui, "Position", &mut camera.position);
                        vec3_drag(ui, "Target", &mut camera.target);
                        ui.add(
                            egui::Slider::new(&mut camera.fov_y_degrees, 10.0..=120.0)
                                .text("FOV")
                                .fixed_decimals(1),
                        );
                        ui.add(
                            egui::Slider::new(&mut self.camera_speed, 0.1..=10.0)
                                .text("Camera Speed")
                                .fixed_decimals(2),
                        );
                        ui.add(
                            egui::Slider::new(&mut self.camera_sensitivity, 0.001..=0.01)
                                .text("Camera Sensitivity")
                                .fixed_decimals(4),
                        );
                    });

                egui::CollapsingHeader::new("Application Info").show(ui, |ui| {
                    let (width, height) = stats.screen_size();
                    ui.label(format!("FPS: {:.0}", stats.fps()));
                    ui.label(format!("Frame Time: {:.3} ms", stats.frame_time() * 1000.0));
                    ui.label(format!("Screen Size: {width} x {height}"));
                    ui.separator();
                    ui.small("TAB: Next scene | F4: Toggle camera tracking");
                    ui.small("Click outside the GUI: Re-enable camera | ESC: Exit");
                });
            });
        self.show_control_panel = open;
        self.nav_buttons = nav_buttons;
        command
    }

    fn debug_panel(&mut self, ctx: &egui::Context, stats: &FrameStats) {
        if !self.show_debug_info {
            return;
        }
        let mut open = true;
        let mut show_inspection = self.show_inspection;
        egui::Window::new("Debug Info")
            .open(&mut open)
            .default_pos([10.0, 420.0])
            .show(ctx, |ui| {
                ui.label(format!(
                    "Application average {:.3} ms/frame ({:.1} FPS)",
                    stats.average_frame_time() * 1000.0,
                    stats.average_fps()
                ));
                egui::CollapsingHeader::new("egui Metrics").show(ui, |ui| {
                    ui.checkbox(&mut show_inspection, "Inspection window");
                });
            });
        self.show_debug_info = open;
        self.show_inspection = show_inspection;
    }

    fn scene_info<S: SceneStrategy>(&mut self, ctx: &egui::Context, scenes: &SceneManager<S>) {
        if !self.show_scene_info {
            return;
        }
        let mut open = true;
        let mut toggle_inspection = false;
        egui::Window::new("Scene Information")
            .open(&mut open)
            .default_pos([520.0, 10.0])
            .show(ctx, |ui| {
                match (scenes.current(), scenes.current_index()) {
                    (Some(scene), Some(index)) => {
                        ui.label(format!("Current Scene: {}", scene.name()));
                        ui.label(format!("Scene Index: {} / {}", index + 1, scenes.len()));
                    }
                    _ => {
                        ui.label("No active scene");
                    }
                }
                ui.add_space(4.0);
                if ui.button("Toggle egui Inspection").clicked() {
                    toggle_inspection = true;
                }
            });
        self.show_scene_info = open;
        if toggle_inspection {
            self.show_inspection = !self.show_inspection;
        }
    }

    fn inspection(&mut self, ctx: &egui::Context) {
        if !self.show_inspection {
            return;
        }
        let mut open = true;
        egui::Window::new("egui Inspection")
            .open(&mut open)
            .vscroll(true)
            .show(ctx, |ui| {
                ctx.inspection_ui(ui);
            });
        self.show_inspection = open;
    }
}

fn vec3_drag(ui: &mut egui::Ui, label: &str, value: &mut glam::Vec3) {
    ui.horizontal(|ui| {
        for component in [&mut value.x, &mut value.y, &mut value.z] {
            ui.add(
                egui::DragValue::new(component)
                    .speed(0.1)
                    .range(-100.0..=100.0)
                    .fixed_decimals(2),
            );
        }
        ui.label(label);
    });
}
