//! Rigid poses and blending helpers

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Position and orientation of an object or anchor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Pose {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Blend toward `other` by `amount`
    pub fn mix(&self, other: &Pose, amount: f32) -> Pose {
        Pose {
            position: mix_vec3(self.position, other.position, amount),
            rotation: mix_quat(self.rotation, other.rotation, amount),
        }
    }

    /// Express this pose relative to `frame`: offset in world axes,
    /// rotation in the frame's local axes
    pub fn relative_to(&self, frame: &Pose) -> Pose {
        Pose {
            position: self.position - frame.position,
            rotation: frame.rotation.inverse() * self.rotation,
        }
    }

    /// Inverse of [`Pose::relative_to`]
    pub fn from_relative(offset: &Pose, frame: &Pose) -> Pose {
        Pose {
            position: frame.position + offset.position,
            rotation: frame.rotation * offset.rotation,
        }
    }

    /// Resolve a pose expressed in this pose's local space into world space
    pub fn compose(&self, local: &Pose) -> Pose {
        Pose {
            position: self.position + self.rotation * local.position,
            rotation: self.rotation * local.rotation,
        }
    }

    /// Local forward axis (+Z)
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Rotate this pose by `angle_degrees` around `axis` through `pivot`
    pub fn rotate_around(&mut self, pivot: Vec3, axis: Vec3, angle_degrees: f32) {
        let axis = axis.normalize_or_zero();
        if axis == Vec3::ZERO || angle_degrees == 0.0 {
            return;
        }
        let rotation = Quat::from_axis_angle(axis, crate::radians(angle_degrees));
        self.position = pivot + rotation * (self.position - pivot);
        self.rotation = rotation * self.rotation;
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Linear blend between two points
#[inline]
pub fn mix_vec3(a: Vec3, b: Vec3, amount: f32) -> Vec3 {
    a + (b - a) * amount
}

/// Rotation whose forward axis (+Z) points along `forward`, with no roll.
///
/// Returns identity for a zero vector.
pub fn look_rotation(forward: Vec3) -> Quat {
    let forward = forward.normalize_or_zero();
    if forward == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    let yaw = forward.x.atan2(forward.z);
    let pitch = (-forward.y).clamp(-1.0, 1.0).asin();
    Quat::from_euler(glam::EulerRot::YXZ, yaw, pitch, 0.0)
}

/// Shortest-arc blend between two rotations; returns `a` when they match
pub fn mix_quat(a: Quat, b: Quat, amount: f32) -> Quat {
    if a.abs_diff_eq(b, 1e-6) || a.abs_diff_eq(-b, 1e-6) {
        return a;
    }
    a.slerp(b, amount)
}
