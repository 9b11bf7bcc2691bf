//! Events emitted by a weapon while it is operated

use receiver_math::Vec3;
use serde::{Deserialize, Serialize};

/// Named sound groups; the host picks a clip from the group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    Gunshot,
    DryFire,
    MagEjectButton,
    MagEjection,
    MagInsertion,
    SlideBack,
    SlideFront,
    Safety,
    BulletEject,
    CylinderOpen,
    CylinderClose,
    ExtractorRodOpen,
    ExtractorRodClose,
    CylinderRotate,
    HammerCock,
    HammerDecock,
    MagAddRound,
    MagBounce,
    BulletGrab,
}

/// Whether a cartridge still carries its bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cartridge {
    Live,
    Spent,
}

/// One-shot velocity kicks for the aim model.
///
/// `recoil_*` feed the recoil springs, `rotation_*` nudge the camera rig.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RecoilImpulse {
    pub recoil_x: f32,
    pub recoil_y: f32,
    pub rotation_x: f32,
    pub rotation_y: f32,
    /// Replay this kick on the head after a short delay
    pub head_recoil: bool,
}

/// Weapon event
#[derive(Debug, Clone, PartialEq)]
pub enum WeaponEvent {
    /// Play a sound from a group
    Sound { cue: SoundCue, volume: f32 },
    /// A fired round became an empty casing; `chamber` is the cylinder slot
    CasingFormed { chamber: Option<usize> },
    /// Muzzle flash at `point_muzzleflash`
    MuzzleFlash,
    /// Projectile leaves `point_muzzle` along the gun's forward axis
    ProjectileFired { muzzle_speed: f32 },
    /// A cartridge left the gun and becomes a physics body.
    ///
    /// `local_velocity` is in gun space and is added to the gun's own velocity.
    RoundEjected {
        cartridge: Cartridge,
        chamber: Option<usize>,
        local_velocity: Vec3,
        angular_velocity: Vec3,
    },
    /// Recoil for the aim model
    Recoil(RecoilImpulse),
}

impl WeaponEvent {
    /// Check if this event is a sound
    pub fn is_sound(&self) -> bool {
        matches!(self, WeaponEvent::Sound { .. })
    }

    /// Sound cue, if this event is a sound
    pub fn cue(&self) -> Option<SoundCue> {
        match self {
            WeaponEvent::Sound { cue, .. } => Some(*cue),
            _ => None,
        }
    }
}
