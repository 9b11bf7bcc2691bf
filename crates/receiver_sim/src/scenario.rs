//! Scenario files
//!
//! A scenario fixes everything a headless run needs: the seed, the tick
//! rate and length, the gun, perks, what lies on the ground and a script
//! of button holds.
//!
//! # Example
//!
//! ```toml
//! seed = 7
//! tick_rate = 60.0
//! ticks = 240
//! archetype = "m1911"      # m1911, glock17, model10 or a path to archetype JSON
//! perks = ["shrapnel"]
//!
//! [world]
//! rounds = 4
//! magazines = [8, 3]
//!
//! [[press]]
//! button = "trigger"
//! start_tick = 10
//! duration = 2
//! ```

use crate::error::{Result, SimError};
use receiver_player::{Button, Perk, PerkSet, PlayerConfig};
use receiver_weapon::WeaponArchetype;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A scripted button hold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Press {
    pub button: String,
    pub start_tick: u32,
    /// Ticks the button stays down
    #[serde(default = "default_duration")]
    pub duration: u32,
}

fn default_duration() -> u32 {
    1
}

/// What lies within reach of the player
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct World {
    /// Loose rounds on the ground
    pub rounds: u32,
    /// Round counts of magazines on the ground
    pub magazines: Vec<u32>,
    pub flashlight: bool,
    /// Distance of a wall in front of the player
    pub wall_distance: Option<f32>,
}

/// Scenario file contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub seed: u64,
    #[serde(default = "default_tick_rate")]
    pub tick_rate: f32,
    pub ticks: u32,
    #[serde(default = "default_archetype")]
    pub archetype: String,
    #[serde(default)]
    pub perks: Vec<Perk>,
    /// Player tuning as JSON; defaults when absent
    #[serde(default)]
    pub player_config: Option<PathBuf>,
    /// Spawn facing in degrees
    #[serde(default)]
    pub yaw: f32,
    #[serde(default)]
    pub world: World,
    #[serde(default)]
    pub press: Vec<Press>,
}

fn default_tick_rate() -> f32 {
    60.0
}

fn default_archetype() -> String {
    "m1911".to_string()
}

impl Scenario {
    /// Load a scenario from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let scenario = Self::from_toml(&content)?;
        log::info!("Loaded scenario from {}", path.display());
        Ok(scenario)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let scenario: Scenario = toml::from_str(content)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_rate.is_nan() || self.tick_rate <= 0.0 {
            return Err(SimError::Invalid(format!(
                "tick_rate must be positive, got {}",
                self.tick_rate
            )));
        }
        self.script().map(|_| ())
    }

    /// Fixed step length in seconds
    pub fn dt(&self) -> f32 {
        1.0 / self.tick_rate
    }

    /// Resolve the button names of the press list
    pub fn script(&self) -> Result<Script> {
        let presses = self
            .press
            .iter()
            .map(|press| {
                let button = Button::from_name(&press.button)
                    .ok_or_else(|| SimError::UnknownButton(press.button.clone()))?;
                Ok(ScriptedPress {
                    button,
                    start_tick: press.start_tick,
                    duration: press.duration,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Script { presses })
    }

    /// Built-in archetype by name, or archetype JSON at a path
    pub fn weapon_archetype(&self) -> Result<WeaponArchetype> {
        match self.archetype.to_lowercase().replace(['-', ' ', '_'], "").as_str() {
            "m1911" => Ok(WeaponArchetype::m1911()),
            "glock17" => Ok(WeaponArchetype::glock17()),
            "model10" => Ok(WeaponArchetype::model10()),
            _ if self.archetype.ends_with(".json") => {
                let json = std::fs::read_to_string(&self.archetype)?;
                Ok(WeaponArchetype::from_json(&json)?)
            }
            _ => Err(SimError::UnknownArchetype(self.archetype.clone())),
        }
    }

    pub fn player_config(&self) -> Result<PlayerConfig> {
        match &self.player_config {
            Some(path) => Ok(PlayerConfig::load(path)?),
            None => Ok(PlayerConfig::default()),
        }
    }

    pub fn perk_set(&self) -> PerkSet {
        self.perks.iter().copied().collect()
    }
}

/// A press with its button resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptedPress {
    pub button: Button,
    pub start_tick: u32,
    pub duration: u32,
}

impl ScriptedPress {
    pub fn is_down(&self, tick: u32) -> bool {
        tick >= self.start_tick && tick - self.start_tick < self.duration
    }
}

/// Timed button holds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    presses: Vec<ScriptedPress>,
}

impl Script {
    /// Buttons held during `tick`
    pub fn held_at(&self, tick: u32) -> HashSet<Button> {
        self.presses
            .iter()
            .filter(|press| press.is_down(tick))
            .map(|press| press.button)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.presses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presses.is_empty()
    }
}
