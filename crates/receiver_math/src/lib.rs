//! # receiver_math - Springs and Poses
//!
//! Scalar springs drive every continuous, springy quantity of the gameplay
//! layer (aim blend, recoil, pose weights, inventory fly-in). Vector and
//! rotation math comes from `glam`; this crate only adds what the gameplay
//! code needs on top of it.

pub mod pose;
pub mod spring;

pub use glam::{EulerRot, Quat, Vec3};
pub use pose::*;
pub use spring::*;

/// Common math constants
pub mod consts {
    pub const PI: f32 = core::f32::consts::PI;
    pub const DEG_TO_RAD: f32 = PI / 180.0;
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Convert degrees to radians
#[inline]
pub fn radians(degrees: f32) -> f32 {
    degrees * consts::DEG_TO_RAD
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Round a 0..1 display value to the nearest end.
///
/// Used when springs are disabled and mechanisms should jump between
/// their resting positions.
#[inline]
pub fn snap(value: f32) -> f32 {
    (value + 0.5).floor()
}

pub mod prelude {
    pub use crate::pose::{look_rotation, mix_quat, mix_vec3, Pose};
    pub use crate::spring::Spring;
    pub use crate::{lerp, radians, snap};
    pub use glam::{EulerRot, Quat, Vec3};
}
