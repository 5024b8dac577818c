//! Components attached to scene entities.

use std::sync::atomic::{AtomicUsize, Ordering};

use bevy_ecs::prelude::*;
use glam::{Quat, Vec3};
use rapier3d::prelude::{ColliderHandle, RigidBodyHandle};

use crate::physics::MotionStateKey;
use crate::render::{Color, Model};

/// World-space placement of an entity.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Every scale axis is strictly positive.
    pub fn has_drawable_scale(&self) -> bool {
        self.scale.cmpgt(Vec3::ZERO).all()
    }
}

static UNRELEASED_DROPS: AtomicUsize = AtomicUsize::new(0);

/// Number of [`PhysicsBody`] records dropped without being released, over the
/// whole process.
pub fn unreleased_body_drops() -> usize {
    UNRELEASED_DROPS.load(Ordering::Relaxed)
}

/// Ownership record for the engine objects behind one entity.
///
/// Created by [`PhysicsWorld::add_rigid_body`](crate::physics::PhysicsWorld::add_rigid_body)
/// and released by [`PhysicsWorld::remove_rigid_body`](crate::physics::PhysicsWorld::remove_rigid_body).
/// The record must be released before it is dropped; an unreleased drop means
/// the body leaked into a world that may outlive it, and is logged.
#[derive(Component, Debug)]
pub struct PhysicsBody {
    body: RigidBodyHandle,
    shape: ColliderHandle,
    motion_state: Option<MotionStateKey>,
    mass: f32,
    released: bool,
}

impl PhysicsBody {
    pub(crate) fn new(
        body: RigidBodyHandle,
        shape: ColliderHandle,
        motion_state: Option<MotionStateKey>,
        mass: f32,
    ) -> Self {
        Self {
            body,
            shape,
            motion_state,
            mass,
            released: false,
        }
    }

    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    pub fn shape(&self) -> ColliderHandle {
        self.shape
    }

    pub fn motion_state(&self) -> Option<MotionStateKey> {
        self.motion_state
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Mass 0 marks an immovable body.
    pub fn is_static(&self) -> bool {
        self.mass == 0.0
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub(crate) fn mark_released(&mut self) {
        self.released = true;
        self.motion_state = None;
    }
}

impl Drop for PhysicsBody {
    fn drop(&mut self) {
        if !self.released {
            UNRELEASED_DROPS.fetch_add(1, Ordering::Relaxed);
            log::warn!(
                "PhysicsBody {:?} dropped while still registered with a physics world",
                self.body
            );
        }
    }
}

/// Model and tint used to draw an entity.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Renderable {
    pub model: Model,
    pub color: Color,
}

impl Renderable {
    pub fn new(model: Model, color: Color) -> Self {
        Self { model, color }
    }
}

/// Tag: the ground plane. Drawn first, never wireframed.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ground;

/// Display name.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drawable_scale() {
        assert!(Transform::default().has_drawable_scale());
        assert!(Transform::default()
            .with_scale(Vec3::new(40.0, 1.0, 40.0))
            .has_drawable_scale());
        assert!(!Transform::default()
            .with_scale(Vec3::new(1.0, 0.0, 1.0))
            .has_drawable_scale());
        assert!(!Transform::default()
            .with_scale(Vec3::new(-1.0, 1.0, 1.0))
            .has_drawable_scale());
    }

    #[test]
    fn test_name() {
        let name = Name::new("character-a");
        assert_eq!(name.as_str(), "character-a");
    }
}
