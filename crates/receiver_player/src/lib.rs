//! # receiver_player - Player Control Loop
//!
//! Turns per-tick input into weapon and inventory commands and places the
//! gun, flashlight and eye for display.
//!
//! # Features
//!
//! - Aim blend that backs off when scenery is in the way
//! - Gun recoil, delayed head recoil, footstep bob and hit reactions
//! - Hand poses (slide pull, reload, press check, cylinder work) blended
//!   from the gun's state
//! - Camera rig with aim leeway, sensitivity, invert and pitch limits
//! - Randomized starting loadout and perks
//! - [`GameHost`] trait for the engine's physics, audio and spawning
//!
//! # Example
//!
//! ```ignore
//! use receiver_player::prelude::*;
//!
//! let config = PlayerConfig::load("player.json")?;
//! let loadout = Loadout::roll(&mut rng, archetype, config.weapon.clone(), &perks, &ids);
//! let mut player = PlayerController::from_loadout(config, loadout, perks, rng);
//!
//! loop {
//!     let input = InputFrame::from_levels(&previous, &current);
//!     player.tick(&input, &mut host, 1.0 / 60.0);
//! }
//! ```

pub mod aim;
pub mod camera;
pub mod config;
pub mod controller;
pub mod error;
pub mod host;
pub mod input;
pub mod loadout;
pub mod perk;

pub mod prelude {
    pub use crate::aim::{AimModel, GunTilt, PoseChannel};
    pub use crate::camera::CameraRig;
    pub use crate::config::{PlayerConfig, Preferences};
    pub use crate::controller::PlayerController;
    pub use crate::error::{ConfigError, Result};
    pub use crate::host::{GameHost, LinecastHit, PhysicsBody, PickupFilter, Pickups};
    pub use crate::input::{Button, InputFrame};
    pub use crate::loadout::Loadout;
    pub use crate::perk::{Perk, PerkSet};
}

pub use prelude::*;
