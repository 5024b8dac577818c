use std::path::{Path, PathBuf};

use bevy_ecs::prelude::*;
use glam::Vec3;
use rapier3d::prelude::SharedShape;

use crate::components::{Ground, Name, PhysicsBody, Renderable, Transform};
use crate::error::{PhysicsError, SceneError, SceneResult};
use crate::physics::{local_inertia, BodyDesc, PhysicsWorld};
use crate::render::{draw_with_transform, Color, Mesh, Model, Renderer};

use super::SceneStrategy;

const NAME: &str = "Physics Scene (ECS)";

const FIXED_STEP: f32 = 1.0 / 60.0;
const MAX_SUB_STEPS: u32 = 10;

const GROUND_HALF_EXTENTS: Vec3 = Vec3::new(20.0, 0.5, 20.0);
const GROUND_Y: f32 = -0.5;

const BOX_HALF_EXTENT: f32 = 0.5;
const BOX_MASS: f32 = 1.0;
const BOX_START_HEIGHT: f32 = 5.0;
const BOX_SPACING: f32 = 2.0;

const CHARACTER_MASS: f32 = 1.0;
const CHARACTER_START: Vec3 = Vec3::new(0.0, 3.0, 0.0);
const CHARACTER_MIN_HEIGHT: f32 = 0.1;

const DEFAULT_CHARACTER: &str = "assets/characters/character-a.glb";

/// What [`PhysicsScene::initialize`] populates the world with.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsLayout {
    pub ground: bool,
    /// Requested box count. Boxes are laid out on a `floor(sqrt(n))` square
    /// grid, so fewer may spawn.
    pub falling_boxes: usize,
    /// Optional character model. Skipped when missing or unreadable.
    pub character: Option<PathBuf>,
}

impl Default for PhysicsLayout {
    fn default() -> Self {
        Self {
            ground: true,
            falling_boxes: 10,
            character: Some(PathBuf::from(DEFAULT_CHARACTER)),
        }
    }
}

impl PhysicsLayout {
    /// Only the ground plane.
    pub fn ground_only() -> Self {
        Self {
            ground: true,
            falling_boxes: 0,
            character: None,
        }
    }
}

/// Everything needed to spawn one physics-backed entity.
#[derive(Clone)]
pub struct SpawnDesc {
    pub shape: SharedShape,
    pub mass: f32,
    pub position: Vec3,
    pub scale: Vec3,
    pub render: Option<Renderable>,
    pub ground: bool,
    pub name: Option<String>,
}

impl SpawnDesc {
    pub fn new(shape: SharedShape, mass: f32, position: Vec3) -> Self {
        Self {
            shape,
            mass,
            position,
            scale: Vec3::ONE,
            render: None,
            ground: false,
            name: None,
        }
    }

    pub fn with_render(mut self, model: Model, color: Color) -> Self {
        self.render = Some(Renderable::new(model, color));
        self
    }

    /// Visual scale of the model; the collision shape is unaffected.
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn as_ground(mut self) -> Self {
        self.ground = true;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Rigid bodies simulated by rapier and drawn through the entity store.
///
/// Each entity carries a [`Transform`] synced from its [`PhysicsBody`] after
/// every step. Dropping an initialized scene releases its bodies the same way
/// [`cleanup`](SceneStrategy::cleanup) does; renderer models are only
/// unloaded by `cleanup`.
pub struct PhysicsScene {
    layout: PhysicsLayout,
    physics: Option<PhysicsWorld>,
    world: World,
    models: Vec<Model>,
    initialized: bool,
}

impl Default for PhysicsScene {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsScene {
    pub fn new() -> Self {
        Self::with_layout(PhysicsLayout::default())
    }

    pub fn with_layout(layout: PhysicsLayout) -> Self {
        Self {
            layout,
            physics: None,
            world: World::new(),
            models: Vec::new(),
            initialized: false,
        }
    }

    pub fn layout(&self) -> &PhysicsLayout {
        &self.layout
    }

    pub fn physics_world(&self) -> Option<&PhysicsWorld> {
        self.physics.as_ref()
    }

    pub fn entity_count(&self) -> usize {
        self.world.iter_entities().count()
    }

    pub fn transform(&self, entity: Entity) -> Option<Transform> {
        self.world.get::<Transform>(entity).copied()
    }

    /// Entities carrying a [`PhysicsBody`].
    pub fn bodies(&self) -> Vec<Entity> {
        self.world
            .iter_entities()
            .filter(|e| e.contains::<PhysicsBody>())
            .map(|e| e.id())
            .collect()
    }

    pub fn find_named(&self, name: &str) -> Option<Entity> {
        self.world
            .iter_entities()
            .find(|e| e.get::<Name>().is_some_and(|n| n.as_str() == name))
            .map(|e| e.id())
    }

    /// Create an entity backed by a new rigid body.
    ///
    /// The render data is attached only when its model is valid.
    pub fn spawn_body(&mut self, desc: SpawnDesc) -> Entity {
        let physics = self.physics.get_or_insert_with(PhysicsWorld::new);

        let transform = Transform::from_position(desc.position).with_scale(desc.scale);
        let entity = self.world.spawn(transform).id();

        let inertia = if desc.mass != 0.0 {
            local_inertia(&desc.shape, desc.mass)
        } else {
            Vec3::ZERO
        };
        let body = physics.add_rigid_body(
            BodyDesc::new(desc.shape, desc.mass, desc.position).with_local_inertia(inertia),
        );

        let mut entity_mut = self.world.entity_mut(entity);
        entity_mut.insert(body);
        if let Some(render) = desc.render.filter(|r| r.model.is_valid()) {
            entity_mut.insert(render);
        }
        if desc.ground {
            entity_mut.insert(Ground);
        }
        if let Some(name) = desc.name {
            entity_mut.insert(Name::new(name));
        }
        entity
    }

    fn track_model(&mut self, model: Model) -> Model {
        if model.is_valid() {
            self.models.push(model);
        }
        model
    }

    fn spawn_ground(&mut self, cube: Model) {
        let desc = SpawnDesc::new(
            SharedShape::cuboid(
                GROUND_HALF_EXTENTS.x,
                GROUND_HALF_EXTENTS.y,
                GROUND_HALF_EXTENTS.z,
            ),
            0.0,
            Vec3::new(0.0, GROUND_Y, 0.0),
        )
        .with_render(cube, Color::DARKGREEN)
        .with_scale(GROUND_HALF_EXTENTS * 2.0)
        .as_ground();
        self.spawn_body(desc);
    }

    fn spawn_boxes(&mut self, cube: Model) {
        let requested = self.layout.falling_boxes;
        let grid = (requested as f32).sqrt().floor() as usize;
        let offset = grid as f32 / 2.0;

        for i in 0..grid {
            for j in 0..grid {
                let index = i * grid + j;
                if index >= requested {
                    break;
                }
                let position = Vec3::new(
                    (i as f32 - offset) * BOX_SPACING,
                    BOX_START_HEIGHT,
                    (j as f32 - offset) * BOX_SPACING,
                );
                let hue = index as f32 / requested as f32 * 360.0;
                let desc = SpawnDesc::new(
                    SharedShape::cuboid(BOX_HALF_EXTENT, BOX_HALF_EXTENT, BOX_HALF_EXTENT),
                    BOX_MASS,
                    position,
                )
                .with_render(cube, Color::from_hsv(hue, 0.8, 0.9))
                .with_scale(Vec3::splat(BOX_HALF_EXTENT * 2.0));
                self.spawn_body(desc);
            }
        }
    }

    fn spawn_character(&mut self, path: &Path, renderer: &mut dyn Renderer) {
        if !path.exists() {
            log::debug!("Character model {} not found, skipping", path.display());
            return;
        }
        let model = renderer.load_model(path);
        if !model.is_valid() {
            log::debug!("Character model {} is not loadable, skipping", path.display());
            return;
        }
        let model = self.track_model(model);

        let size = model.bounds().size();
        let radius = size.x.max(size.z) / 2.0;
        let height = (size.y - 2.0 * radius).max(CHARACTER_MIN_HEIGHT);
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("character")
            .to_string();

        log::debug!(
            "Character '{}': capsule radius {:.3}, height {:.3}",
            name,
            radius,
            height
        );
        let desc = SpawnDesc::new(
            SharedShape::capsule_y(height / 2.0, radius),
            CHARACTER_MASS,
            CHARACTER_START,
        )
        .with_render(model, Color::WHITE)
        .with_name(name);
        self.spawn_body(desc);
    }

    /// Release every body, clear the entities, then shut the physics world
    /// down. Bodies must go before the world that owns them.
    fn release_physics(&mut self) -> Result<(), PhysicsError> {
        let Some(mut physics) = self.physics.take() else {
            self.world.clear_entities();
            return Ok(());
        };
        let mut query = self.world.query::<&mut PhysicsBody>();
        for mut body in query.iter_mut(&mut self.world) {
            if let Err(e) = physics.remove_rigid_body(&mut body) {
                log::warn!("Releasing {:?}: {}", body.body(), e);
            }
        }
        self.world.clear_entities();
        physics.shutdown()
    }

    fn sync_transforms(&mut self) {
        let Some(physics) = self.physics.as_ref() else {
            return;
        };
        let mut query = self.world.query::<(&mut Transform, &PhysicsBody)>();
        for (mut transform, body) in query.iter_mut(&mut self.world) {
            if let Some((position, rotation)) = physics.world_transform(body) {
                transform.position = position;
                transform.rotation = rotation;
            }
        }
    }
}

impl SceneStrategy for PhysicsScene {
    fn name(&self) -> &str {
        NAME
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn initialize(&mut self, renderer: &mut dyn Renderer) -> SceneResult<()> {
        if self.initialized {
            return Ok(());
        }
        self.physics.get_or_insert_with(PhysicsWorld::new);

        let cube = renderer.model_from_mesh(Mesh::cuboid(Vec3::ONE));
        let cube = self.track_model(cube);

        if self.layout.ground {
            self.spawn_ground(cube);
        }
        self.spawn_boxes(cube);
        if let Some(path) = self.layout.character.clone() {
            self.spawn_character(&path, renderer);
        }

        self.initialized = true;
        log::info!("{} ready with {} entities", NAME, self.entity_count());
        Ok(())
    }

    fn update(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }
        if let Some(physics) = self.physics.as_mut() {
            physics.step_simulation(dt, MAX_SUB_STEPS, FIXED_STEP);
        }
        self.sync_transforms();
    }

    fn draw(&self, renderer: &mut dyn Renderer) {
        if !self.initialized {
            return;
        }

        // Ground first.
        for entity in self.world.iter_entities().filter(|e| e.contains::<Ground>()) {
            if let (Some(transform), Some(render)) =
                (entity.get::<Transform>(), entity.get::<Renderable>())
            {
                if render.model.is_valid() {
                    draw_with_transform(renderer, render.model.handle(), transform, render.color);
                }
            }
        }

        for entity in self.world.iter_entities().filter(|e| !e.contains::<Ground>()) {
            if let (Some(transform), Some(render)) =
                (entity.get::<Transform>(), entity.get::<Renderable>())
            {
                if render.model.is_valid() {
                    draw_with_transform(renderer, render.model.handle(), transform, render.color);
                }
            }
        }

        let Some(physics) = self.physics.as_ref() else {
            return;
        };
        for entity in self.world.iter_entities().filter(|e| !e.contains::<Ground>()) {
            let (Some(transform), Some(body)) =
                (entity.get::<Transform>(), entity.get::<PhysicsBody>())
            else {
                continue;
            };
            let named_bounds = entity
                .get::<Name>()
                .and(entity.get::<Renderable>())
                .map(|r| r.model.bounds());
            match named_bounds {
                Some(bounds) => {
                    renderer.draw_bounding_box(bounds.translated(transform.position), Color::GREEN)
                }
                None => {
                    if let Some(half) = physics.shape_half_extents(body) {
                        renderer.draw_cube_wires(transform.position, half * 2.0, Color::DARKGRAY);
                    }
                }
            }
        }
    }

    fn cleanup(&mut self, renderer: &mut dyn Renderer) -> SceneResult<()> {
        let result = self.release_physics().map_err(SceneError::from);

        for model in self.models.drain(..) {
            renderer.unload_model(model.handle());
        }

        if self.initialized {
            log::info!("{} cleaned up", NAME);
        }
        self.initialized = false;
        result
    }
}

impl Drop for PhysicsScene {
    fn drop(&mut self) {
        if self.physics.is_none() {
            return;
        }
        if let Err(e) = self.release_physics() {
            log::warn!("{} dropped with a failed physics shutdown: {}", NAME, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{test_assets, DrawCommand, DrawList};
    use approx::assert_relative_eq;

    fn no_character() -> PhysicsLayout {
        PhysicsLayout {
            character: None,
            ..PhysicsLayout::default()
        }
    }

    #[test]
    fn test_default_layout_spawns_grid() {
        let mut renderer = DrawList::new();
        let mut scene = PhysicsScene::with_layout(no_character());
        scene.initialize(&mut renderer).unwrap();

        // Ground plus a 3x3 grid out of 10 requested boxes.
        assert_eq!(scene.entity_count(), 10);
        assert_eq!(scene.physics_world().unwrap().body_count(), 10);

        let positions: Vec<Vec3> = scene
            .bodies()
            .into_iter()
            .filter_map(|e| scene.transform(e))
            .map(|t| t.position)
            .collect();
        assert!(positions.contains(&Vec3::new(-3.0, 5.0, -3.0)));
        assert!(positions.contains(&Vec3::new(1.0, 5.0, 1.0)));
        assert!(positions.contains(&Vec3::new(0.0, -0.5, 0.0)));
    }

    #[test]
    fn test_missing_character_is_skipped() {
        let mut renderer = DrawList::new();
        let mut scene = PhysicsScene::with_layout(PhysicsLayout {
            ground: false,
            falling_boxes: 0,
            character: Some(PathBuf::from("assets/nowhere/character.glb")),
        });
        scene.initialize(&mut renderer).unwrap();
        assert!(scene.is_initialized());
        assert_eq!(scene.entity_count(), 0);
    }

    #[test]
    fn test_character_capsule_fits_model_bounds() {
        // Bounds run from (0,1,0) to (1,3,0).
        let path = test_assets::write_triangle("character", "hero.gltf");
        let mut renderer = DrawList::new();
        let mut scene = PhysicsScene::with_layout(PhysicsLayout {
            ground: false,
            falling_boxes: 0,
            character: Some(path.clone()),
        });
        scene.initialize(&mut renderer).unwrap();
        std::fs::remove_file(&path).ok();

        let hero = scene.find_named("hero").unwrap();
        assert_eq!(scene.entity_count(), 1);
        let transform = scene.transform(hero).unwrap();
        assert_eq!(transform.position, Vec3::new(0.0, 3.0, 0.0));
        assert_eq!(transform.scale, Vec3::ONE);
        assert_eq!(scene.world.get::<Renderable>(hero).unwrap().color, Color::WHITE);

        // Radius 0.5, cylinder height 1.0: half extents (0.5, 1.0, 0.5).
        let body = scene.world.get::<PhysicsBody>(hero).unwrap();
        let half = scene.physics_world().unwrap().shape_half_extents(body).unwrap();
        assert_relative_eq!(half.x, 0.5, epsilon = 1e-5);
        assert_relative_eq!(half.y, 1.0, epsilon = 1e-5);
        assert_relative_eq!(half.z, 0.5, epsilon = 1e-5);

        scene.draw(&mut renderer);
        let boxes: Vec<_> = renderer
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::BoundingBox { bounds, color } => Some((*bounds, *color)),
                _ => None,
            })
            .collect();
        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0].1, Color::GREEN);
        assert_relative_eq!(boxes[0].0.min.y, 4.0);
        assert_relative_eq!(boxes[0].0.max.y, 6.0);

        scene.cleanup(&mut renderer).unwrap();
        assert_eq!(renderer.loaded_model_count(), 0);
    }

    #[test]
    fn test_draw_order_and_overlays() {
        let mut renderer = DrawList::new();
        let mut scene = PhysicsScene::with_layout(PhysicsLayout {
            falling_boxes: 4,
            ..no_character()
        });
        scene.initialize(&mut renderer).unwrap();
        scene.draw(&mut renderer);

        let commands = renderer.commands();
        match &commands[0] {
            DrawCommand::Model { params, .. } => {
                assert_eq!(params.color, Color::DARKGREEN);
                assert_eq!(params.scale, Vec3::new(40.0, 1.0, 40.0));
            }
            other => panic!("expected ground first, got {other:?}"),
        }
        let summary = renderer.finish_frame();
        assert_eq!(summary.model_draws, 5);
        // Ground is never wireframed.
        assert_eq!(summary.wire_draws, 4);
    }

    #[test]
    fn test_spawn_without_valid_model_has_no_renderable() {
        let mut scene = PhysicsScene::with_layout(PhysicsLayout::ground_only());
        let entity = scene.spawn_body(
            SpawnDesc::new(SharedShape::ball(0.5), 1.0, Vec3::Y).with_render(Model::invalid(), Color::RED),
        );
        assert!(scene.world.get::<Renderable>(entity).is_none());
        assert!(scene.world.get::<PhysicsBody>(entity).is_some());

        let mut renderer = DrawList::new();
        scene.cleanup(&mut renderer).unwrap();
    }

    #[test]
    fn test_named_entity_gets_bounding_box() {
        let mut renderer = DrawList::new();
        let mut scene = PhysicsScene::with_layout(PhysicsLayout {
            ground: false,
            falling_boxes: 0,
            character: None,
        });
        scene.initialize(&mut renderer).unwrap();
        let model = renderer.model_from_mesh(Mesh::cuboid(Vec3::new(1.0, 2.0, 1.0)));
        scene.spawn_body(
            SpawnDesc::new(SharedShape::capsule_y(0.5, 0.5), 1.0, Vec3::new(0.0, 3.0, 0.0))
                .with_render(model, Color::WHITE)
                .with_name("hero"),
        );
        assert!(scene.find_named("hero").is_some());

        scene.draw(&mut renderer);
        let bounds = renderer.commands().iter().find_map(|c| match c {
            DrawCommand::BoundingBox { bounds, .. } => Some(*bounds),
            _ => None,
        });
        let bounds = bounds.unwrap();
        assert_relative_eq!(bounds.min.y, 2.0);
        assert_relative_eq!(bounds.max.y, 4.0);
        scene.cleanup(&mut renderer).unwrap();
    }

    #[test]
    fn test_cleanup_releases_everything() {
        let mut renderer = DrawList::new();
        let mut scene = PhysicsScene::with_layout(no_character());
        scene.initialize(&mut renderer).unwrap();
        assert_eq!(renderer.loaded_model_count(), 1);

        scene.cleanup(&mut renderer).unwrap();
        assert!(!scene.is_initialized());
        assert_eq!(scene.entity_count(), 0);
        assert!(scene.physics_world().is_none());
        assert_eq!(renderer.loaded_model_count(), 0);

        // Idempotent, and safe before any initialize.
        scene.cleanup(&mut renderer).unwrap();
        PhysicsScene::new().cleanup(&mut renderer).unwrap();
    }

    #[test]
    fn test_reinitialize_after_cleanup() {
        let mut renderer = DrawList::new();
        let mut scene = PhysicsScene::with_layout(no_character());
        scene.initialize(&mut renderer).unwrap();
        scene.cleanup(&mut renderer).unwrap();
        scene.initialize(&mut renderer).unwrap();
        assert_eq!(scene.entity_count(), 10);
        scene.cleanup(&mut renderer).unwrap();
    }

    #[test]
    fn test_uninitialized_update_and_draw_are_noops() {
        let mut renderer = DrawList::new();
        let mut scene = PhysicsScene::new();
        scene.update(1.0 / 60.0);
        scene.draw(&mut renderer);
        assert!(renderer.commands().is_empty());
        assert!(scene.physics_world().is_none());
    }
}
