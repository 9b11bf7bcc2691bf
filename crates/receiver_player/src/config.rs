//! Player tuning and preferences

use crate::error::{ConfigError, Result};
use receiver_inventory::InventoryConfig;
use receiver_weapon::WeaponConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings the player changes from the options menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Scale applied to every sound the player causes
    pub sound_volume: f32,
    /// 0 holds the gun close, 1 at full arm's length
    pub gun_distance: f32,
    pub mouse_sensitivity: f32,
    pub invert_mouse: bool,
    /// Keep the gun on the view center instead of letting it drift
    pub lock_gun_to_center: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            sound_volume: 1.0,
            gun_distance: 1.0,
            mouse_sensitivity: 1.0,
            invert_mouse: false,
            lock_gun_to_center: false,
        }
    }
}

/// Player configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Aim, pose and flashlight spring strength
    pub aim_spring_strength: f32,
    pub aim_spring_damping: f32,
    /// Gun and head recoil spring strength
    pub recoil_spring_strength: f32,
    pub recoil_spring_damping: f32,
    /// Gun distance from the eye at full preference
    pub gun_distance: f32,
    /// Seconds between a shot and the head kick
    pub head_recoil_delay: f32,
    /// Head kicks that can be pending at once
    pub head_recoil_slots: usize,
    /// Pickup radius around the camera
    pub grab_range: f32,
    /// Pickup radius with the short sleeves perk
    pub short_sleeves_grab_range: f32,
    /// Degrees the view may lead the gun while aiming
    pub rotation_x_leeway: f32,
    pub rotation_y_min_leeway: f32,
    pub rotation_y_max_leeway: f32,
    pub min_pitch: f32,
    pub max_pitch: f32,
    /// Ignore recoil when placing the gun and camera
    pub disable_recoil: bool,
    /// Place everything at spring targets instead of spring states
    pub disable_springs: bool,
    pub preferences: Preferences,
    pub inventory: InventoryConfig,
    pub weapon: WeaponConfig,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            aim_spring_strength: 100.0,
            aim_spring_damping: 0.00001,
            recoil_spring_strength: 800.0,
            recoil_spring_damping: 0.000001,
            gun_distance: 0.3,
            head_recoil_delay: 0.1,
            head_recoil_slots: 10,
            grab_range: 2.0,
            short_sleeves_grab_range: 4.0,
            rotation_x_leeway: 5.0,
            rotation_y_min_leeway: 20.0,
            rotation_y_max_leeway: 10.0,
            min_pitch: -89.0,
            max_pitch: 89.0,
            disable_recoil: false,
            disable_springs: false,
            preferences: Preferences::default(),
            inventory: InventoryConfig::default(),
            weapon: WeaponConfig::default(),
        }
    }
}

impl PlayerConfig {
    /// Read and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_json(&content)?;
        log::info!("Loaded player config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self> {
        let config: PlayerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the springs or camera cannot work with
    pub fn validate(&self) -> Result<()> {
        let springs = [
            ("aim", self.aim_spring_strength, self.aim_spring_damping),
            ("recoil", self.recoil_spring_strength, self.recoil_spring_damping),
        ];
        for (name, strength, damping) in springs {
            if strength <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{} spring strength must be positive",
                    name
                )));
            }
            if !(damping > 0.0 && damping <= 1.0) {
                return Err(ConfigError::Invalid(format!(
                    "{} spring damping must be in (0, 1]",
                    name
                )));
            }
        }
        if self.head_recoil_slots == 0 {
            return Err(ConfigError::Invalid(
                "head recoil needs at least one slot".to_string(),
            ));
        }
        if self.gun_distance <= 0.0 {
            return Err(ConfigError::Invalid(
                "gun distance must be positive".to_string(),
            ));
        }
        if self.min_pitch >= self.max_pitch {
            return Err(ConfigError::Invalid(format!(
                "pitch limits {}..{} are empty",
                self.min_pitch, self.max_pitch
            )));
        }
        Ok(())
    }

    /// Gun distance after the player's preference
    pub fn gun_dist(&self) -> f32 {
        self.gun_distance * (0.5 + self.preferences.gun_distance * 0.5)
    }

    pub fn with_preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn with_disable_recoil(mut self, disable: bool) -> Self {
        self.disable_recoil = disable;
        self
    }

    pub fn with_disable_springs(mut self, disable: bool) -> Self {
        self.disable_springs = disable;
        self.weapon.snap_display = disable;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults_validate() {
        let config = PlayerConfig::default();
        assert!(config.validate().is_ok());
        assert_relative_eq!(config.gun_dist(), 0.3);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = PlayerConfig::from_json(
            r#"{ "grab_range": 3.0, "preferences": { "invert_mouse": true } }"#,
        )
        .unwrap();
        assert_eq!(config.grab_range, 3.0);
        assert!(config.preferences.invert_mouse);
        assert_eq!(config.preferences.mouse_sensitivity, 1.0);
        assert_eq!(config.head_recoil_slots, 10);
    }

    #[test]
    fn test_invalid_pitch_rejected() {
        let err = PlayerConfig::from_json(r#"{ "min_pitch": 10.0, "max_pitch": -10.0 }"#);
        assert!(matches!(err, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let err = PlayerConfig::from_json("{ grab_range: }");
        assert!(matches!(err, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = PlayerConfig::load("/nonexistent/receiver/player.json");
        assert!(matches!(err, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_gun_distance_preference() {
        let config = PlayerConfig::default().with_preferences(Preferences {
            gun_distance: 0.0,
            ..Default::default()
        });
        assert_relative_eq!(config.gun_dist(), 0.15);
    }
}
