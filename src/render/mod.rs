//! Renderer interface and the headless draw-list implementation.
//!
//! Scenes never talk to a GPU directly. They load models and issue draw calls
//! through the [`Renderer`] trait; [`DrawList`] records those calls for a frame
//! so the frame loop, the binary and the tests can run without a window.
//!
//! ## Conventions
//!
//! - Positions and scales are world-space [`Vec3`]s (Y up).
//! - Rotations reach draw calls as axis + angle in radians, see
//!   [`rotation_axis_angle`].
//! - A [`Model`] may carry a handle and still be invalid (the load failed);
//!   callers check [`Model::is_valid`] before drawing.

mod color;
mod draw_list;
mod mesh;
mod model;

pub use color::Color;
pub use draw_list::{DrawCommand, DrawList, FrameSummary};
pub use mesh::{Mesh, MeshVertex};
pub use model::{load_model_bounds, ModelError};
#[cfg(test)]
pub(crate) use model::test_assets;

use std::path::Path;

use glam::{Quat, Vec3};

use crate::components::Transform;

/// Below this length the vector part of a quaternion is treated as zero.
const AXIS_EPSILON: f32 = 1e-4;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub const ZERO: Self = Self {
        min: Vec3::ZERO,
        max: Vec3::ZERO,
    };

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point; [`BoundingBox::ZERO`] when empty.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut iter = points.into_iter();
        let Some(first) = iter.next() else {
            return Self::ZERO;
        };
        iter.fold(Self::new(first, first), |acc, p| {
            Self::new(acc.min.min(p), acc.max.max(p))
        })
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn translated(&self, offset: Vec3) -> Self {
        Self::new(self.min + offset, self.max + offset)
    }
}

/// Opaque index into a renderer's model store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelHandle(u32);

impl ModelHandle {
    /// Handle carried by models that failed to load.
    pub const INVALID: Self = Self(u32::MAX);

    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(self) -> u32 {
        self.0
    }
}

/// A loaded (or failed) model: handle, validity flag and local bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Model {
    handle: ModelHandle,
    valid: bool,
    bounds: BoundingBox,
}

impl Model {
    pub fn new(handle: ModelHandle, bounds: BoundingBox) -> Self {
        Self {
            handle,
            valid: true,
            bounds,
        }
    }

    /// A model whose data failed to load.
    pub fn invalid() -> Self {
        Self {
            handle: ModelHandle::INVALID,
            valid: false,
            bounds: BoundingBox::ZERO,
        }
    }

    pub fn handle(&self) -> ModelHandle {
        self.handle
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }
}

/// Parameters of a single model draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawParams {
    pub position: Vec3,
    pub rotation_axis: Vec3,
    /// Radians.
    pub rotation_angle: f32,
    pub scale: Vec3,
    pub color: Color,
}

impl DrawParams {
    pub fn new(position: Vec3, color: Color) -> Self {
        Self {
            position,
            rotation_axis: Vec3::Y,
            rotation_angle: 0.0,
            scale: Vec3::ONE,
            color,
        }
    }

    pub fn with_rotation(mut self, axis: Vec3, angle: f32) -> Self {
        self.rotation_axis = axis;
        self.rotation_angle = angle;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }
}

/// Converts a scalar-last unit quaternion to the axis + angle a draw call takes.
///
/// A quaternion whose vector part is (nearly) zero is the identity: the axis
/// defaults to +Y and the angle is 0.
pub fn rotation_axis_angle(rotation: Quat) -> (Vec3, f32) {
    let vector = Vec3::new(rotation.x, rotation.y, rotation.z);
    let length = vector.length();
    if length <= AXIS_EPSILON {
        return (Vec3::Y, 0.0);
    }
    let angle = 2.0 * rotation.w.clamp(-1.0, 1.0).acos();
    (vector / length, angle)
}

/// Draws `model` with the full TRS of `transform`.
///
/// Falls back to a uniform scale of 1 when any scale axis is not strictly
/// positive.
pub fn draw_with_transform(
    renderer: &mut dyn Renderer,
    model: ModelHandle,
    transform: &Transform,
    color: Color,
) {
    if transform.has_drawable_scale() {
        let (axis, angle) = rotation_axis_angle(transform.rotation);
        let params = DrawParams::new(transform.position, color)
            .with_rotation(axis, angle)
            .with_scale(transform.scale);
        renderer.draw_model(model, &params);
    } else {
        renderer.draw_model_uniform(model, transform.position, 1.0, color);
    }
}

/// The renderer as seen by scenes.
///
/// Model loading never fails hard: a missing or unreadable file yields a
/// [`Model`] with `is_valid() == false`.
pub trait Renderer {
    /// Load a model file (glTF / GLB).
    fn load_model(&mut self, path: &Path) -> Model;

    /// Turn a CPU mesh into a drawable model.
    fn model_from_mesh(&mut self, mesh: Mesh) -> Model;

    /// Release a model. Unknown or already released handles are ignored.
    fn unload_model(&mut self, handle: ModelHandle);

    fn draw_model(&mut self, handle: ModelHandle, params: &DrawParams);

    fn draw_model_uniform(&mut self, handle: ModelHandle, position: Vec3, scale: f32, color: Color);

    fn draw_cube_wires(&mut self, center: Vec3, size: Vec3, color: Color);

    fn draw_bounding_box(&mut self, bounds: BoundingBox, color: Color);

    fn draw_line(&mut self, start: Vec3, end: Vec3, color: Color);

    /// Reference grid on the XZ plane centered on the origin.
    fn draw_grid(&mut self, slices: u32, spacing: f32);

    /// Duration of the last frame in seconds.
    fn frame_time(&self) -> f32;
}
