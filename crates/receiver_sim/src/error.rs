//! Errors raised while loading a scenario

use receiver_player::ConfigError;
use receiver_weapon::WeaponError;
use thiserror::Error;

/// Scenario loading error
#[derive(Error, Debug)]
pub enum SimError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse scenario: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Weapon(#[from] WeaponError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Unknown button: {0}")]
    UnknownButton(String),

    #[error("Unknown weapon archetype: {0}")]
    UnknownArchetype(String),

    #[error("Invalid scenario: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, SimError>;
