//! Rigid-body world backed by rapier.
//!
//! [`PhysicsWorld`] bundles every rapier structure a simulation needs and adds
//! two things rapier leaves to the caller: a fixed-step accumulator and
//! per-body motion states holding the pose extrapolated to the current frame.

pub mod conversions;

use std::collections::HashMap;

use glam::{Quat, Vec3};
use rapier3d::na::UnitQuaternion;
use rapier3d::prelude::*;

use crate::components::PhysicsBody;
use crate::error::PhysicsError;
use conversions::{isometry_to_na, quat_from_na, vec3_from_na, vec3_to_na};

/// Default gravity along -Y.
pub const GRAVITY: f32 = -9.8;

/// Key of an engine-side motion state. One per rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MotionStateKey(RigidBodyHandle);

/// Pose of a body as last written by [`PhysicsWorld::step_simulation`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionState {
    pub position: Vec3,
    pub rotation: Quat,
}

/// Construction parameters of a rigid body: mass, start pose, shape and
/// local inertia.
#[derive(Clone)]
pub struct BodyDesc {
    pub mass: f32,
    pub position: Vec3,
    pub rotation: Quat,
    pub shape: SharedShape,
    pub local_inertia: Vec3,
}

impl BodyDesc {
    /// A body at `position` with identity rotation and zero inertia.
    pub fn new(shape: SharedShape, mass: f32, position: Vec3) -> Self {
        Self {
            mass,
            position,
            rotation: Quat::IDENTITY,
            shape,
            local_inertia: Vec3::ZERO,
        }
    }

    pub fn with_local_inertia(mut self, inertia: Vec3) -> Self {
        self.local_inertia = inertia;
        self
    }
}

/// Principal inertia of `shape` for a body of `mass`. Zero for mass 0.
pub fn local_inertia(shape: &SharedShape, mass: f32) -> Vec3 {
    if mass == 0.0 {
        return Vec3::ZERO;
    }
    let unit = shape.mass_properties(1.0);
    if unit.mass() <= 0.0 {
        return Vec3::ZERO;
    }
    vec3_from_na(&unit.principal_inertia()) * (mass / unit.mass())
}

/// All rapier state for one simulation.
///
/// Field order is the teardown order used by [`PhysicsWorld::shutdown`] in
/// reverse: the pipeline goes first, the narrow phase last.
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    narrow_phase: NarrowPhase,
    broad_phase: DefaultBroadPhase,
    island_manager: IslandManager,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    pipeline: PhysicsPipeline,
    motion_states: HashMap<MotionStateKey, MotionState>,
    accumulator: f32,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::with_gravity(Vec3::new(0.0, GRAVITY, 0.0))
    }
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gravity(gravity: Vec3) -> Self {
        let integration_parameters = IntegrationParameters {
            dt: 1.0 / 60.0,
            ..IntegrationParameters::default()
        };
        Self {
            gravity: vec3_to_na(gravity),
            integration_parameters,
            narrow_phase: NarrowPhase::new(),
            broad_phase: DefaultBroadPhase::new(),
            island_manager: IslandManager::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            pipeline: PhysicsPipeline::new(),
            motion_states: HashMap::new(),
            accumulator: 0.0,
        }
    }

    pub fn gravity(&self) -> Vec3 {
        vec3_from_na(&self.gravity)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// Build a body and its collider from `desc` and register both.
    ///
    /// Mass 0 yields a fixed body. Mass and inertia come from `desc`; the
    /// collider itself carries no density.
    pub fn add_rigid_body(&mut self, desc: BodyDesc) -> PhysicsBody {
        let builder = if desc.mass > 0.0 {
            RigidBodyBuilder::dynamic().additional_mass_properties(MassProperties::new(
                Point::origin(),
                desc.mass,
                vec3_to_na(desc.local_inertia),
            ))
        } else {
            RigidBodyBuilder::fixed()
        };
        let body = builder
            .position(isometry_to_na(desc.position, desc.rotation))
            .build();
        let body_handle = self.bodies.insert(body);

        let collider = ColliderBuilder::new(desc.shape).density(0.0).build();
        let collider_handle =
            self.colliders
                .insert_with_parent(collider, body_handle, &mut self.bodies);

        let key = MotionStateKey(body_handle);
        self.motion_states.insert(
            key,
            MotionState {
                position: desc.position,
                rotation: desc.rotation,
            },
        );

        log::debug!(
            "Added rigid body {:?} (mass {}, collider {:?})",
            body_handle,
            desc.mass,
            collider_handle
        );
        PhysicsBody::new(body_handle, collider_handle, Some(key), desc.mass)
    }

    /// Remove the body, its attached collider and its motion state, and mark
    /// the record released. Calling it again on a released record does nothing.
    pub fn remove_rigid_body(&mut self, record: &mut PhysicsBody) -> Result<(), PhysicsError> {
        if record.is_released() {
            return Ok(());
        }
        if let Some(key) = record.motion_state() {
            self.motion_states.remove(&key);
        }
        let removed = self.bodies.remove(
            record.body(),
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        record.mark_released();
        match removed {
            Some(_) => Ok(()),
            None => Err(PhysicsError::UnknownBody),
        }
    }

    /// Advance the simulation by `dt` seconds of wall time in steps of
    /// `fixed_step`.
    ///
    /// At most `max_sub_steps` steps run; time beyond that is dropped. Motion
    /// states are then written with each body's pose extrapolated by the
    /// leftover fraction of a step. Returns the number of whole steps that
    /// were due, including dropped ones.
    pub fn step_simulation(&mut self, dt: f32, max_sub_steps: u32, fixed_step: f32) -> u32 {
        if !dt.is_finite() || dt <= 0.0 || !fixed_step.is_finite() || fixed_step <= 0.0 {
            return 0;
        }

        self.accumulator += dt;
        let whole = (self.accumulator / fixed_step).floor();
        let due = if whole >= u32::MAX as f32 {
            u32::MAX
        } else {
            whole as u32
        };
        let rest = self.accumulator - whole * fixed_step;
        // Leftover stays within one step, whatever was dropped.
        self.accumulator = if rest.is_finite() && (0.0..fixed_step).contains(&rest) {
            rest
        } else {
            0.0
        };

        let run = due.min(max_sub_steps);
        if due > run {
            log::trace!("Dropping {} physics steps", due - run);
        }

        self.integration_parameters.dt = fixed_step;
        for _ in 0..run {
            self.step_once();
        }
        self.update_motion_states();
        due
    }

    /// Pose of the body behind `record`: its motion state if it has one,
    /// otherwise the engine's current pose. `None` once released.
    pub fn world_transform(&self, record: &PhysicsBody) -> Option<(Vec3, Quat)> {
        if record.is_released() {
            return None;
        }
        if let Some(state) = record.motion_state().and_then(|k| self.motion_states.get(&k)) {
            return Some((state.position, state.rotation));
        }
        let body = self.bodies.get(record.body())?;
        Some((vec3_from_na(body.translation()), quat_from_na(body.rotation())))
    }

    /// Half extents of the local AABB of the record's collider shape.
    pub fn shape_half_extents(&self, record: &PhysicsBody) -> Option<Vec3> {
        let collider = self.colliders.get(record.shape())?;
        let aabb = collider.shape().compute_local_aabb();
        Some(vec3_from_na(&aabb.half_extents()))
    }

    pub fn linear_velocity(&self, record: &PhysicsBody) -> Option<Vec3> {
        let body = self.bodies.get(record.body())?;
        Some(vec3_from_na(body.linvel()))
    }

    /// Tear the world down.
    ///
    /// Fails with [`PhysicsError::LiveBodies`] when bodies are still
    /// registered; the world is destroyed either way. Members go in order:
    /// pipeline, solver and joints, bodies and colliders, broad phase, then
    /// narrow phase. The integration parameters are plain `Copy` data and
    /// need no teardown.
    pub fn shutdown(self) -> Result<(), PhysicsError> {
        let live = self.bodies.len();
        let Self {
            gravity: _,
            integration_parameters: _,
            narrow_phase,
            broad_phase,
            island_manager,
            bodies,
            colliders,
            impulse_joints,
            multibody_joints,
            ccd_solver,
            query_pipeline,
            pipeline,
            motion_states,
            accumulator: _,
        } = self;

        drop(pipeline);
        drop(query_pipeline);
        drop(ccd_solver);
        drop(impulse_joints);
        drop(multibody_joints);
        drop(motion_states);
        drop(colliders);
        drop(bodies);
        drop(island_manager);
        drop(broad_phase);
        drop(narrow_phase);

        if live > 0 {
            log::error!("Physics world shut down with {} live bodies", live);
            return Err(PhysicsError::LiveBodies(live));
        }
        log::debug!("Physics world shut down");
        Ok(())
    }

    fn step_once(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    fn update_motion_states(&mut self) {
        let remainder = self.accumulator;
        for (key, state) in self.motion_states.iter_mut() {
            let Some(body) = self.bodies.get(key.0) else {
                continue;
            };
            let translation = body.translation() + body.linvel() * remainder;
            let rotation = UnitQuaternion::from_scaled_axis(body.angvel() * remainder) * body.rotation();
            state.position = vec3_from_na(&translation);
            state.rotation = quat_from_na(&rotation);
        }
    }
}
