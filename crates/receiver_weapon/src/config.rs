//! Weapon tuning and archetype definitions

use crate::error::{Result, WeaponError};
use receiver_math::{Pose, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Mechanical family of a gun
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GunKind {
    /// Slide, chamber and detachable magazine
    Automatic,
    /// Swing-out cylinder with an extractor rod
    Revolver,
}

impl Default for GunKind {
    fn default() -> Self {
        Self::Automatic
    }
}

impl fmt::Display for GunKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GunKind::Automatic => write!(f, "automatic"),
            GunKind::Revolver => write!(f, "revolver"),
        }
    }
}

impl FromStr for GunKind {
    type Err = WeaponError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "automatic" | "pistol" => Ok(GunKind::Automatic),
            "revolver" => Ok(GunKind::Revolver),
            other => Err(WeaponError::InvalidArchetype(format!(
                "unknown gun kind '{}'",
                other
            ))),
        }
    }
}

/// Trigger action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Trigger only releases a cocked hammer
    Single,
    /// Holding the trigger cocks the hammer and fires on every tick it can
    Double,
}

impl Default for ActionType {
    fn default() -> Self {
        Self::Single
    }
}

/// Rates and thresholds shared by every gun.
///
/// Rates are in units of travel per second over a 0..1 range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponConfig {
    /// Slide travel while pulled back
    pub slide_pull_rate: f32,
    /// Slide travel when released
    pub slide_return_rate: f32,
    /// Slide position held by the slide lock
    pub slide_lock_position: f32,
    /// Slide position held during a press check
    pub press_check_position: f32,
    /// Seating a magazine chambers a round if the slide is past this
    pub chamber_on_seat_threshold: f32,
    /// Hammer cocking rate under the thumb
    pub hammer_rate: f32,
    /// Trigger cocking rate as a multiple of `hammer_rate`
    pub double_action_cock_multiplier: f32,
    /// Safety lever travel
    pub safety_rate: f32,
    /// Auto-mod toggle travel
    pub auto_mod_rate: f32,
    /// Magazine seating travel
    pub mag_seat_rate: f32,
    /// Yolk swing travel
    pub yolk_rate: f32,
    /// Extractor rod travel
    pub extractor_rod_rate: f32,
    /// Seating lost per second by a round sliding out of its chamber
    pub chamber_fall_rate: f32,
    /// Fraction of cylinder rotation error left after one second
    pub cylinder_settle_base: f32,
    /// Largest queued cylinder spin, in chambers
    pub max_cylinder_offset: i32,
    /// Projectile speed leaving the muzzle
    pub muzzle_speed: f32,
    /// Volume of mechanical clicks
    pub mechanic_volume: f32,
    /// Round display values to their resting positions
    pub snap_display: bool,
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self {
            slide_pull_rate: 10.0,
            slide_return_rate: 20.0,
            slide_lock_position: 0.9,
            press_check_position: 0.4,
            chamber_on_seat_threshold: 0.7,
            hammer_rate: 10.0,
            double_action_cock_multiplier: 2.0,
            safety_rate: 10.0,
            auto_mod_rate: 10.0,
            mag_seat_rate: 5.0,
            yolk_rate: 5.0,
            extractor_rod_rate: 10.0,
            chamber_fall_rate: 5.0,
            cylinder_settle_base: 0.2,
            max_cylinder_offset: 12,
            muzzle_speed: 251.0,
            mechanic_volume: 0.2,
            snap_display: false,
        }
    }
}

impl WeaponConfig {
    /// Set the muzzle speed
    pub fn with_muzzle_speed(mut self, speed: f32) -> Self {
        self.muzzle_speed = speed;
        self
    }

    /// Set the mechanical click volume
    pub fn with_mechanic_volume(mut self, volume: f32) -> Self {
        self.mechanic_volume = volume;
        self
    }

    /// Snap display values to 0/1
    pub fn with_snap_display(mut self, snap: bool) -> Self {
        self.snap_display = snap;
        self
    }
}

/// Static description of a gun model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponArchetype {
    /// Display name
    pub name: String,
    /// Mechanical family
    pub kind: GunKind,
    /// Trigger action
    #[serde(default)]
    pub action: ActionType,
    /// Has a thumb safety
    #[serde(default)]
    pub has_safety: bool,
    /// Has an exposed hammer the thumb can cock
    #[serde(default)]
    pub has_hammer: bool,
    /// Has a full-auto toggle on the slide
    #[serde(default)]
    pub has_auto_mod: bool,
    /// Rounds a magazine holds (automatics)
    #[serde(default)]
    pub magazine_capacity: u32,
    /// Chambers in the cylinder (revolvers)
    #[serde(default = "default_cylinder_capacity")]
    pub cylinder_capacity: usize,
    /// Named pose anchors in gun-local space
    #[serde(default)]
    pub anchors: BTreeMap<String, Pose>,
}

fn default_cylinder_capacity() -> usize {
    6
}

impl WeaponArchetype {
    /// Colt M1911: single action, thumb safety, exposed hammer
    pub fn m1911() -> Self {
        Self {
            name: "M1911".to_string(),
            kind: GunKind::Automatic,
            action: ActionType::Single,
            has_safety: true,
            has_hammer: true,
            has_auto_mod: false,
            magazine_capacity: 8,
            cylinder_capacity: default_cylinder_capacity(),
            anchors: default_pistol_anchors(),
        }
    }

    /// Glock 17 with an auto conversion; striker fired, no thumb hammer
    pub fn glock17() -> Self {
        Self {
            name: "Glock 17".to_string(),
            kind: GunKind::Automatic,
            action: ActionType::Double,
            has_safety: false,
            has_hammer: false,
            has_auto_mod: true,
            magazine_capacity: 17,
            cylinder_capacity: default_cylinder_capacity(),
            anchors: default_pistol_anchors(),
        }
    }

    /// S&W Model 10: double action six-shot revolver
    pub fn model10() -> Self {
        let mut anchors = default_pistol_anchors();
        anchors.remove("pose_slide_pull");
        anchors.remove("pose_press_check");
        anchors.insert(
            "pose_inspect_cylinder".to_string(),
            anchor(Vec3::new(-0.04, 0.05, -0.05), Quat::from_rotation_z(0.9)),
        );
        anchors.insert(
            "pose_eject_rounds".to_string(),
            anchor(Vec3::new(0.0, 0.1, -0.05), Quat::from_rotation_x(-1.2)),
        );
        Self {
            name: "Model 10".to_string(),
            kind: GunKind::Revolver,
            action: ActionType::Double,
            has_safety: false,
            has_hammer: true,
            has_auto_mod: false,
            magazine_capacity: 0,
            cylinder_capacity: default_cylinder_capacity(),
            anchors,
        }
    }

    /// Parse and validate an archetype from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let archetype: WeaponArchetype = serde_json::from_str(json)?;
        archetype.validate()?;
        Ok(archetype)
    }

    /// Reject archetypes the state machine cannot operate
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(WeaponError::InvalidArchetype("empty name".to_string()));
        }
        match self.kind {
            GunKind::Automatic => {
                if self.magazine_capacity == 0 {
                    return Err(WeaponError::InvalidArchetype(format!(
                        "{}: automatics need a magazine capacity",
                        self.name
                    )));
                }
            }
            GunKind::Revolver => {
                if self.cylinder_capacity == 0 {
                    return Err(WeaponError::InvalidArchetype(format!(
                        "{}: revolvers need at least one chamber",
                        self.name
                    )));
                }
                if self.has_auto_mod {
                    return Err(WeaponError::InvalidArchetype(format!(
                        "{}: the auto-mod toggle sits on a slide",
                        self.name
                    )));
                }
            }
        }
        Ok(())
    }

    /// Look up a pose anchor; missing anchors are not an error
    pub fn anchor(&self, name: &str) -> Option<&Pose> {
        self.anchors.get(name)
    }

    /// Automatics have a slide
    pub fn has_slide(&self) -> bool {
        self.kind == GunKind::Automatic
    }
}

impl Default for WeaponArchetype {
    fn default() -> Self {
        Self::m1911()
    }
}

fn anchor(position: Vec3, rotation: Quat) -> Pose {
    Pose::new(position, rotation)
}

fn default_pistol_anchors() -> BTreeMap<String, Pose> {
    let mut anchors = BTreeMap::new();
    anchors.insert(
        "point_recoil_rotate".to_string(),
        anchor(Vec3::new(0.0, -0.03, -0.05), Quat::IDENTITY),
    );
    anchors.insert(
        "point_muzzle".to_string(),
        anchor(Vec3::new(0.0, 0.02, 0.12), Quat::IDENTITY),
    );
    anchors.insert(
        "point_muzzleflash".to_string(),
        anchor(Vec3::new(0.0, 0.02, 0.13), Quat::IDENTITY),
    );
    anchors.insert(
        "point_chambered_round".to_string(),
        anchor(Vec3::new(0.0, 0.02, 0.02), Quat::IDENTITY),
    );
    anchors.insert(
        "pose_slide_pull".to_string(),
        anchor(Vec3::new(0.03, -0.02, -0.04), Quat::from_rotation_z(-0.6)),
    );
    anchors.insert(
        "pose_reload".to_string(),
        anchor(Vec3::new(-0.03, 0.02, -0.04), Quat::from_rotation_z(0.7)),
    );
    anchors.insert(
        "pose_press_check".to_string(),
        anchor(Vec3::new(0.0, 0.03, -0.06), Quat::from_rotation_y(-0.4)),
    );
    anchors
}
