//! Conversion helpers between glam render types and rapier's nalgebra types.
//!
//! nalgebra stores quaternions scalar-first `(w, i, j, k)`; glam is
//! scalar-last `(x, y, z, w)`.

use glam::{Quat, Vec3};
use rapier3d::na::{Isometry3, Quaternion, Translation3, UnitQuaternion, Vector3};

pub fn vec3_to_na(v: Vec3) -> Vector3<f32> {
    Vector3::new(v.x, v.y, v.z)
}

pub fn vec3_from_na(v: &Vector3<f32>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

pub fn quat_to_na(q: Quat) -> UnitQuaternion<f32> {
    UnitQuaternion::new_normalize(Quaternion::new(q.w, q.x, q.y, q.z))
}

pub fn quat_from_na(q: &UnitQuaternion<f32>) -> Quat {
    let q = q.quaternion();
    Quat::from_xyzw(q.i, q.j, q.k, q.w)
}

pub fn isometry_to_na(translation: Vec3, rotation: Quat) -> Isometry3<f32> {
    Isometry3::from_parts(
        Translation3::new(translation.x, translation.y, translation.z),
        quat_to_na(rotation),
    )
}
