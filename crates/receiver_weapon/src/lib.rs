//! # receiver_weapon - Weapon State Machine
//!
//! Mechanical simulation of a single handgun, driven by input edges and a
//! fixed per-tick advance.
//!
//! # Features
//!
//! - Automatics: slide pullback and return, slide lock, press check,
//!   chambering from a detachable magazine, ejection
//! - Revolvers: swing-out yolk, cylinder spin, extractor rod, loose rounds
//! - Hammer, thumb safety and full-auto toggle shared by both families
//! - Sounds, shots, ejected cartridges and recoil reported as events
//!
//! # Example
//!
//! ```ignore
//! use receiver_weapon::prelude::*;
//!
//! let mut gun = Weapon::new(id, WeaponArchetype::m1911(), WeaponConfig::default())
//!     .with_magazine(Magazine::new(mag_id, 8).with_rounds(7));
//!
//! gun.pull_back_slide();
//! gun.advance(dt, &mut rng);
//! gun.release_slide();
//!
//! for event in gun.drain_events() {
//!     // route sounds, projectiles and recoil
//! }
//! ```

mod action;
pub mod automatic;
pub mod config;
pub mod error;
pub mod events;
pub mod magazine;
pub mod pose;
pub mod revolver;
pub mod weapon;

pub mod prelude {
    pub use crate::automatic::{AutomaticAction, MagStage, RoundState, SlideStage};
    pub use crate::config::{ActionType, GunKind, WeaponArchetype, WeaponConfig};
    pub use crate::error::{Result, WeaponError};
    pub use crate::events::{Cartridge, RecoilImpulse, SoundCue, WeaponEvent};
    pub use crate::magazine::{MagLoadStage, Magazine};
    pub use crate::pose::MechanismPose;
    pub use crate::revolver::{Chamber, RevolverAction, SwingStage};
    pub use crate::weapon::{Mechanism, Thumb, TriggerPressure, Weapon};
}

pub use prelude::*;
