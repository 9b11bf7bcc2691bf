//! What the player needs from the engine around it

use receiver_inventory::{Flashlight, PoseSource};
use receiver_math::{Pose, Vec3};
use receiver_weapon::{Cartridge, Magazine, SoundCue};

/// Result of a linecast against level geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinecastHit {
    pub point: Vec3,
    pub normal: Vec3,
}

/// Something handed over to physics
#[derive(Debug, Clone)]
pub enum PhysicsBody {
    /// A cartridge thrown from the gun
    Cartridge(Cartridge),
    /// A magazine let go by the off hand; the world owns it from now on
    Magazine(Magazine),
    /// A flashlight handed back to the world
    Flashlight(Flashlight),
}

/// What the player can take in a pickup sweep this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PickupFilter {
    pub magazine: bool,
    pub flashlight: bool,
}

/// Objects taken out of the world by a pickup sweep
#[derive(Debug, Clone, Default)]
pub struct Pickups {
    /// Nearest magazine and where it lay
    pub magazine: Option<(Magazine, Pose)>,
    pub flashlight: Option<(Flashlight, Pose)>,
    /// Loose rounds collected
    pub rounds: u32,
}

/// Rendering, physics and audio services.
///
/// Poses of carried objects come from [`PoseSource`]; everything spawned
/// through this trait is fire-and-forget.
pub trait GameHost: PoseSource {
    /// First scenery hit between two points
    fn linecast(&self, from: Vec3, to: Vec3) -> Option<LinecastHit>;

    /// Fire a bullet
    fn spawn_projectile(&mut self, origin: Pose, velocity: Vec3, hostile: bool);

    fn spawn_muzzle_flash(&mut self, at: Pose);

    fn spawn_physics_body(
        &mut self,
        body: PhysicsBody,
        pose: Pose,
        velocity: Vec3,
        angular_velocity: Vec3,
    );

    fn play_sound(&mut self, cue: SoundCue, volume: f32, at: Vec3);

    /// Velocity of the player carrying the gun
    fn gun_velocity(&self) -> Vec3;

    /// Take objects within `range` of `origin`; only kinds allowed by
    /// `filter` are handed over, loose rounds always are
    fn pick_up(&mut self, origin: Vec3, range: f32, filter: PickupFilter) -> Pickups;
}
