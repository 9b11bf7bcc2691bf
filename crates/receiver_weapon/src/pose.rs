//! Display values for the moving parts of a gun

use receiver_math::snap;
use serde::{Deserialize, Serialize};

/// Per-part travel the renderer uses to place slide, hammer, levers and
/// cartridges. Every value is 0..1 except `cylinder_rotation` (degrees).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MechanismPose {
    pub slide: f32,
    pub hammer: f32,
    pub safety_off: f32,
    pub auto_mod: f32,
    pub mag_seated: f32,
    pub yolk_open: f32,
    pub cylinder_rotation: f32,
    pub extractor_rod: f32,
    /// Seating of each cylinder chamber, empty for automatics
    pub chamber_seating: Vec<f32>,
}

impl MechanismPose {
    /// Round every travel value to its nearest rest position.
    ///
    /// A slide held exactly at the press-check stop keeps that position.
    pub fn snapped(mut self, press_check_position: f32) -> Self {
        if self.slide != press_check_position {
            self.slide = snap(self.slide);
        }
        self.hammer = snap(self.hammer);
        self.safety_off = snap(self.safety_off);
        self.auto_mod = snap(self.auto_mod);
        self.mag_seated = snap(self.mag_seated);
        self.yolk_open = snap(self.yolk_open);
        self.extractor_rod = snap(self.extractor_rod);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapped_keeps_press_check() {
        let pose = MechanismPose {
            slide: 0.4,
            hammer: 0.7,
            mag_seated: 0.2,
            ..Default::default()
        }
        .snapped(0.4);
        assert_eq!(pose.slide, 0.4);
        assert_eq!(pose.hammer, 1.0);
        assert_eq!(pose.mag_seated, 0.0);
    }
}
