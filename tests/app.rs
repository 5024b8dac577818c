use std::path::PathBuf;

use glam::{Vec2, Vec3};

use scene_sandbox::camera::OrbitInput;
use scene_sandbox::gui::GuiInput;
use scene_sandbox::render::DrawList;
use scene_sandbox::{FrameInput, SandboxApp, SandboxConfig, SceneStrategy};

fn headless_config() -> SandboxConfig {
    let mut config = SandboxConfig::default();
    config.assets.tree_model = PathBuf::from("assets/__missing__/tree-small.glb");
    config.assets.character_model = PathBuf::from("assets/__missing__/character-a.glb");
    config
}

fn current_name(app: &SandboxApp) -> String {
    app.scenes()
        .current()
        .map(|s| s.name().to_string())
        .unwrap_or_default()
}

#[test]
fn missing_tree_is_not_registered() {
    let app = SandboxApp::new(headless_config(), DrawList::new());
    assert_eq!(app.scenes().len(), 2);
    assert_eq!(current_name(&app), "Geometric Scene");
    assert_eq!(app.camera().position, Vec3::new(2.0, 1.5, 2.0));
    assert_eq!(app.camera().fov_y_degrees, 45.0);
}

#[test]
fn frame_draws_scene_grid_and_axes() {
    let mut app = SandboxApp::new(headless_config(), DrawList::new());
    let summary = app.frame(&FrameInput::default());

    assert_eq!(summary.grid_draws, 1);
    assert_eq!(summary.line_draws, 3);
    // Eight ring cubes plus the center one.
    assert_eq!(summary.model_draws, 9);
    assert_eq!(app.frame_count(), 1);
    assert!(app.renderer().commands().is_empty());
}

#[test]
fn tab_switches_and_wraps() {
    let mut app = SandboxApp::new(headless_config(), DrawList::new());
    let tab = FrameInput {
        switch_scene: true,
        ..FrameInput::default()
    };

    app.frame(&tab);
    assert_eq!(current_name(&app), "Physics Scene (ECS)");
    app.frame(&tab);
    assert_eq!(current_name(&app), "Geometric Scene");
}

#[test]
fn camera_orbits_only_while_tracking() {
    let mut app = SandboxApp::new(headless_config(), DrawList::new());
    let start = app.camera().position;

    app.frame(&FrameInput::default());
    let moved = app.camera().position;
    assert_ne!(moved, start);

    app.frame(&FrameInput {
        toggle_camera_tracking: true,
        ..FrameInput::default()
    });
    assert!(!app.camera_tracking());
    let frozen = app.camera().position;
    app.frame(&FrameInput::default());
    assert_eq!(app.camera().position, frozen);

    app.frame(&FrameInput {
        click: true,
        ..FrameInput::default()
    });
    assert!(app.camera_tracking());
}

#[test]
fn run_with_switching_then_shutdown() {
    let mut config = headless_config();
    config.headless.switch_every = 30;
    let mut app = SandboxApp::new(config, DrawList::new());

    assert_eq!(app.run(75), 75);
    // Switched at frames 30 and 60: geometric -> physics -> geometric.
    assert_eq!(current_name(&app), "Geometric Scene");

    app.shutdown();
    assert_eq!(app.renderer().loaded_model_count(), 0);
}

#[test]
fn gui_produces_output() {
    let mut app = SandboxApp::new(headless_config(), DrawList::new());
    app.frame(&FrameInput::default());
    app.frame(&FrameInput::default());
    assert!(app.last_gui_output().shape_count > 0);

    app.overlay_mut().toggle_visibility();
    app.frame(&FrameInput::default());
    assert_eq!(app.last_gui_output().shape_count, 0);
}

fn pointer_at(x: f32, y: f32) -> FrameInput {
    FrameInput {
        gui: GuiInput {
            pointer: Some(Vec2::new(x, y)),
            ..GuiInput::default()
        },
        ..FrameInput::default()
    }
}

#[test]
fn clicking_next_scene_in_the_overlay_switches() {
    let mut app = SandboxApp::new(headless_config(), DrawList::new());
    app.frame(&FrameInput::default());
    app.frame(&FrameInput::default());

    let (_, next) = app.overlay().scene_button_rects().unwrap();
    let hover = pointer_at(next.center().x, next.center().y);
    let mut press = hover.clone();
    press.gui.primary_down = true;

    app.frame(&hover);
    app.frame(&press);
    assert_eq!(current_name(&app), "Geometric Scene");
    app.frame(&hover);
    app.frame(&hover);
    assert_eq!(current_name(&app), "Physics Scene (ECS)");
}

fn camera_after_drag(pointer: (f32, f32), drag: Vec2) -> Vec3 {
    let mut app = SandboxApp::new(headless_config(), DrawList::new());
    app.frame(&FrameInput::default());
    app.frame(&FrameInput::default());

    let hover = pointer_at(pointer.0, pointer.1);
    app.frame(&hover);
    let mut dragging = hover;
    dragging.orbit = OrbitInput { drag, scroll: 0.0 };
    app.frame(&dragging);
    app.camera().position
}

#[test]
fn drag_orbits_unless_the_gui_owns_the_pointer() {
    let outside = (700.0, 560.0);
    let over_panel = (100.0, 20.0);

    let still = camera_after_drag(outside, Vec2::ZERO);
    let dragged = camera_after_drag(outside, Vec2::new(100.0, 0.0));
    assert_ne!(dragged, still);

    // Over the control panel egui owns the pointer and the camera holds still
    // for that frame, auto-orbit included.
    let captured = camera_after_drag(over_panel, Vec2::new(100.0, 0.0));
    assert_ne!(captured, dragged);
    assert_ne!(captured, still);
}
