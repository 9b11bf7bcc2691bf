//! Error types for loading weapon data

use thiserror::Error;

/// Weapon loading errors
#[derive(Debug, Error)]
pub enum WeaponError {
    /// Archetype JSON could not be parsed
    #[error("Failed to parse weapon archetype: {0}")]
    Parse(#[from] serde_json::Error),

    /// Archetype parsed but describes an impossible gun
    #[error("Invalid weapon archetype: {0}")]
    InvalidArchetype(String),
}

/// Result type for weapon loading
pub type Result<T> = std::result::Result<T, WeaponError>;
