//! Camera rig: where the gun points versus where the eye looks

use crate::config::{PlayerConfig, Preferences};
use receiver_math::{lerp, radians, EulerRot, Quat, Vec3};

/// Gun and view angles in degrees.
///
/// While aiming the view trails the gun within a leeway box; otherwise the
/// gun trails the view.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraRig {
    /// Gun yaw
    pub rotation_x: f32,
    /// Gun pitch, positive up
    pub rotation_y: f32,
    pub view_rotation_x: f32,
    pub view_rotation_y: f32,
    x_leeway: f32,
    y_min_leeway: f32,
    y_max_leeway: f32,
}

impl CameraRig {
    /// Gun and view both facing `yaw`
    pub fn new(yaw: f32) -> Self {
        Self {
            rotation_x: yaw,
            view_rotation_x: yaw,
            ..Default::default()
        }
    }

    /// Add a one-shot rotation to the gun angles
    pub fn nudge(&mut self, x: f32, y: f32) {
        self.rotation_x += x;
        self.rotation_y += y;
    }

    /// Apply mouse motion for this tick.
    ///
    /// `aiming` means aim is held with a gun drawn; `aim_blend` widens the
    /// leeway box as the gun comes up.
    pub fn update(
        &mut self,
        mouse_x: f32,
        mouse_y: f32,
        aiming: bool,
        aim_blend: f32,
        config: &PlayerConfig,
    ) {
        let preferences = &config.preferences;
        if preferences.lock_gun_to_center {
            self.x_leeway = 0.0;
            self.y_min_leeway = 0.0;
            self.y_max_leeway = 0.0;
        } else {
            self.x_leeway = lerp(0.0, config.rotation_x_leeway, aim_blend);
            self.y_min_leeway = lerp(0.0, config.rotation_y_min_leeway, aim_blend);
            self.y_max_leeway = lerp(0.0, config.rotation_y_max_leeway, aim_blend);
        }

        let (sensitivity_x, sensitivity_y) = sensitivity(preferences);
        let (min_pitch, max_pitch) = (config.min_pitch, config.max_pitch);

        self.rotation_x += mouse_x * sensitivity_x;
        self.rotation_y += mouse_y * sensitivity_y;
        self.rotation_y = self.rotation_y.clamp(min_pitch, max_pitch);

        if aiming {
            self.view_rotation_y = clamp_loose(
                self.view_rotation_y,
                self.rotation_y - self.y_min_leeway,
                self.rotation_y + self.y_max_leeway,
            );
            self.view_rotation_x = clamp_loose(
                self.view_rotation_x,
                self.rotation_x - self.x_leeway,
                self.rotation_x + self.x_leeway,
            );
        } else {
            self.view_rotation_x += mouse_x * sensitivity_x;
            self.view_rotation_y += mouse_y * sensitivity_y;
            self.view_rotation_y = self.view_rotation_y.clamp(min_pitch, max_pitch);

            self.rotation_y = clamp_loose(
                self.rotation_y,
                self.view_rotation_y - self.y_max_leeway,
                self.view_rotation_y + self.y_min_leeway,
            );
            self.rotation_x = clamp_loose(
                self.rotation_x,
                self.view_rotation_x - self.x_leeway,
                self.view_rotation_x + self.x_leeway,
            );
        }
    }

    /// Direction the gun points
    pub fn aim_dir(&self) -> Vec3 {
        let rotation = Quat::from_euler(
            EulerRot::YXZ,
            radians(self.rotation_x),
            radians(-self.rotation_y),
            0.0,
        );
        rotation * Vec3::Z
    }

    /// Eye rotation with head recoil (`head_x` yaw, `head_y` pitch) added
    pub fn view_rotation(&self, head_x: f32, head_y: f32) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            radians(self.view_rotation_x + head_x),
            radians(-self.view_rotation_y + head_y),
            0.0,
        )
    }

    /// Horizontal facing of the body
    pub fn body_forward(&self) -> Vec3 {
        Quat::from_rotation_y(radians(self.view_rotation_x)) * Vec3::Z
    }
}

fn sensitivity(preferences: &Preferences) -> (f32, f32) {
    let x = preferences.mouse_sensitivity * 10.0;
    let y = preferences.mouse_sensitivity * 10.0;
    if preferences.invert_mouse {
        (x, -y.abs())
    } else {
        (x, y.abs())
    }
}

/// Clamp that tolerates `lo > hi` by preferring `lo`
fn clamp_loose(value: f32, lo: f32, hi: f32) -> f32 {
    value.min(hi).max(lo)
}
