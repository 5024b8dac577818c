use glam::Vec3;

use crate::error::SceneResult;
use crate::render::{Color, DrawParams, Mesh, Model, Renderer};

use super::SceneStrategy;

const NAME: &str = "Geometric Scene";

const RING_COUNT: usize = 8;
const RING_RADIUS: f32 = 3.0;
const RING_HEIGHT: f32 = 1.0;
const RING_SIZE: f32 = 0.8;

const CENTER_HEIGHT: f32 = 0.5;
const CENTER_SIZE: f32 = 1.5;
const CENTER_SPEED: f32 = 20.0;

/// One spinning cube.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometricObject {
    pub position: Vec3,
    /// Yaw in degrees, in `[0, 360)`.
    pub rotation: f32,
    /// Degrees per second.
    pub rotation_speed: f32,
    pub size: f32,
    pub color: Color,
}

/// A ring of spinning cubes around a larger gold one. Animation is a pure
/// function of the scene clock.
pub struct GeometricScene {
    objects: Vec<GeometricObject>,
    cube: Option<Model>,
    clock: f32,
}

impl Default for GeometricScene {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometricScene {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            cube: None,
            clock: 0.0,
        }
    }

    pub fn objects(&self) -> &[GeometricObject] {
        &self.objects
    }

    /// Seconds since the scene was initialized.
    pub fn clock(&self) -> f32 {
        self.clock
    }

    fn build_objects() -> Vec<GeometricObject> {
        let mut objects: Vec<GeometricObject> = (0..RING_COUNT)
            .map(|i| {
                let fraction = i as f32 / RING_COUNT as f32;
                let angle = fraction * std::f32::consts::TAU;
                GeometricObject {
                    position: Vec3::new(
                        angle.cos() * RING_RADIUS,
                        RING_HEIGHT,
                        angle.sin() * RING_RADIUS,
                    ),
                    rotation: 0.0,
                    rotation_speed: 30.0 + i as f32 * 10.0,
                    size: RING_SIZE,
                    color: Color::from_hsv(fraction * 360.0, 0.8, 0.9),
                }
            })
            .collect();

        objects.push(GeometricObject {
            position: Vec3::new(0.0, CENTER_HEIGHT, 0.0),
            rotation: 0.0,
            rotation_speed: CENTER_SPEED,
            size: CENTER_SIZE,
            color: Color::GOLD,
        });
        objects
    }
}

impl SceneStrategy for GeometricScene {
    fn name(&self) -> &str {
        NAME
    }

    fn is_initialized(&self) -> bool {
        self.cube.is_some()
    }

    fn initialize(&mut self, renderer: &mut dyn Renderer) -> SceneResult<()> {
        if self.cube.is_some() {
            return Ok(());
        }
        self.cube = Some(renderer.model_from_mesh(Mesh::cuboid(Vec3::ONE)));
        self.objects = Self::build_objects();
        self.clock = 0.0;
        log::info!("{} ready with {} objects", NAME, self.objects.len());
        Ok(())
    }

    fn update(&mut self, dt: f32) {
        if self.cube.is_none() {
            return;
        }
        self.clock += dt;
        for object in &mut self.objects {
            object.rotation = (self.clock * object.rotation_speed).rem_euclid(360.0);
        }
    }

    fn draw(&self, renderer: &mut dyn Renderer) {
        let Some(cube) = self.cube.filter(Model::is_valid) else {
            return;
        };
        for object in &self.objects {
            let params = DrawParams::new(object.position, object.color)
                .with_rotation(Vec3::Y, object.rotation.to_radians())
                .with_scale(Vec3::splat(object.size));
            renderer.draw_model(cube.handle(), &params);
            renderer.draw_cube_wires(object.position, Vec3::splat(object.size), Color::DARKGRAY);
        }
    }

    fn cleanup(&mut self, renderer: &mut dyn Renderer) -> SceneResult<()> {
        if let Some(cube) = self.cube.take() {
            if cube.is_valid() {
                renderer.unload_model(cube.handle());
            }
        }
        self.objects.clear();
        Ok(())
    }
}
