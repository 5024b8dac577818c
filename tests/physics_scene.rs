use approx::assert_relative_eq;
use glam::Vec3;
use rapier3d::prelude::SharedShape;

use scene_sandbox::components::{unreleased_body_drops, Transform};
use scene_sandbox::physics::local_inertia;
use scene_sandbox::render::{Color, DrawList, Mesh, Renderer};
use scene_sandbox::scene::{PhysicsLayout, PhysicsScene, SceneStrategy, SpawnDesc};

const DT: f32 = 1.0 / 60.0;

fn run(scene: &mut PhysicsScene, frames: usize) {
    for _ in 0..frames {
        scene.update(DT);
    }
}

fn snapshot(scene: &PhysicsScene) -> Vec<Transform> {
    scene
        .bodies()
        .into_iter()
        .filter_map(|e| scene.transform(e))
        .collect()
}

// ---------------------------------------------------------------------------
// Static content
// ---------------------------------------------------------------------------

#[test]
fn ground_only_scene_is_unchanged_after_two_seconds() {
    let mut renderer = DrawList::new();
    let mut scene = PhysicsScene::with_layout(PhysicsLayout::ground_only());
    scene.initialize(&mut renderer).unwrap();

    let before = snapshot(&scene);
    assert_eq!(before.len(), 1);

    run(&mut scene, 120);
    assert_eq!(snapshot(&scene), before);

    scene.cleanup(&mut renderer).unwrap();
}

#[test]
fn zero_mass_body_never_moves() {
    let mut renderer = DrawList::new();
    let mut scene = PhysicsScene::with_layout(PhysicsLayout::ground_only());
    scene.initialize(&mut renderer).unwrap();

    let shape = SharedShape::cuboid(0.5, 0.5, 0.5);
    assert_eq!(local_inertia(&shape, 0.0), Vec3::ZERO);
    let floating = scene.spawn_body(SpawnDesc::new(shape, 0.0, Vec3::new(3.0, 4.0, 0.0)));

    run(&mut scene, 120);
    let t = scene.transform(floating).unwrap();
    assert_eq!(t.position, Vec3::new(3.0, 4.0, 0.0));

    scene.cleanup(&mut renderer).unwrap();
}

// ---------------------------------------------------------------------------
// Dynamics
// ---------------------------------------------------------------------------

#[test]
fn dynamic_box_settles_on_ground() {
    let mut renderer = DrawList::new();
    let mut scene = PhysicsScene::with_layout(PhysicsLayout::ground_only());
    scene.initialize(&mut renderer).unwrap();

    let cube = renderer.model_from_mesh(Mesh::cuboid(Vec3::ONE));
    let shape = SharedShape::cuboid(0.5, 0.5, 0.5);
    let falling = scene.spawn_body(
        SpawnDesc::new(shape, 1.0, Vec3::new(0.0, 5.0, 0.0)).with_render(cube, Color::RED),
    );

    run(&mut scene, 300);
    let t = scene.transform(falling).unwrap();
    assert_relative_eq!(t.position.y, 0.5, epsilon = 0.05);
    assert_relative_eq!(t.position.x, 0.0, epsilon = 0.05);

    scene.cleanup(&mut renderer).unwrap();
    renderer.unload_model(cube.handle());
    assert_eq!(renderer.loaded_model_count(), 0);
}

#[test]
fn default_grid_falls_and_stays_above_ground() {
    let mut renderer = DrawList::new();
    let mut scene = PhysicsScene::with_layout(PhysicsLayout {
        character: None,
        ..PhysicsLayout::default()
    });
    scene.initialize(&mut renderer).unwrap();

    run(&mut scene, 240);

    let boxes: Vec<Transform> = snapshot(&scene)
        .into_iter()
        .filter(|t| t.scale == Vec3::ONE)
        .collect();
    assert_eq!(boxes.len(), 9);
    for t in &boxes {
        assert!(t.position.y < 5.0, "box did not fall: {:?}", t.position);
        assert!(t.position.y > 0.0, "box went through the ground: {:?}", t.position);
        assert!(t.rotation.is_normalized());
    }

    scene.cleanup(&mut renderer).unwrap();
}

#[test]
fn large_frame_time_is_capped() {
    let mut renderer = DrawList::new();
    let mut scene = PhysicsScene::with_layout(PhysicsLayout {
        ground: false,
        falling_boxes: 1,
        character: None,
    });
    scene.initialize(&mut renderer).unwrap();

    // One huge frame simulates at most 10 fixed steps.
    scene.update(5.0);
    let t = snapshot(&scene)[0];
    let fall = 5.0 - t.position.y;
    // Free fall for 10/60 s is about 0.14 m; 5 s would be over 100 m.
    assert!(fall > 0.0 && fall < 1.0, "fell {fall}");

    scene.cleanup(&mut renderer).unwrap();
}

// ---------------------------------------------------------------------------
// Teardown
// ---------------------------------------------------------------------------

#[test]
fn cleanup_releases_bodies_and_models() {
    let mut renderer = DrawList::new();
    let mut scene = PhysicsScene::new();
    scene.initialize(&mut renderer).unwrap();
    run(&mut scene, 10);
    assert!(scene.physics_world().unwrap().body_count() > 0);

    scene.cleanup(&mut renderer).unwrap();
    assert!(scene.physics_world().is_none());
    assert_eq!(scene.entity_count(), 0);
    assert_eq!(renderer.loaded_model_count(), 0);

    scene.draw(&mut renderer);
    assert!(renderer.commands().is_empty());
}

#[test]
fn dropping_a_live_scene_releases_its_bodies() {
    let leaked_before = unreleased_body_drops();
    let mut renderer = DrawList::new();
    let mut scene = PhysicsScene::with_layout(PhysicsLayout {
        character: None,
        ..PhysicsLayout::default()
    });
    scene.initialize(&mut renderer).unwrap();
    run(&mut scene, 5);
    assert_eq!(scene.physics_world().unwrap().body_count(), 10);

    drop(scene);
    assert_eq!(unreleased_body_drops(), leaked_before);
}
