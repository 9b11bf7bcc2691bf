//! A host with no engine behind it: everything is logged and counted

use crate::scenario::World;
use receiver_core::{IdAllocator, ObjectId};
use receiver_inventory::{Flashlight, PoseSource};
use receiver_math::{Pose, Quat, Vec3};
use receiver_player::{GameHost, LinecastHit, PhysicsBody, PickupFilter, Pickups};
use receiver_weapon::{Cartridge, Magazine, SoundCue};

/// Eye height of the standing player
const EYE_HEIGHT: f32 = 1.6;

/// Tallies of host calls for the end-of-run summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostStats {
    pub projectiles: u32,
    pub muzzle_flashes: u32,
    pub bodies: u32,
    pub sounds: u32,
    pub pickups: u32,
}

/// Flat ground in front of the player, optionally with a wall
#[derive(Debug)]
pub struct LoggingHost {
    camera: Pose,
    wall_distance: Option<f32>,
    magazines: Vec<Magazine>,
    flashlight: Option<Flashlight>,
    rounds: u32,
    stats: HostStats,
}

impl LoggingHost {
    pub fn new(world: &World, ids: &IdAllocator, capacity: u32) -> Self {
        let magazines = world
            .magazines
            .iter()
            .map(|&rounds| Magazine::new(ids.allocate(), capacity).with_rounds(rounds))
            .collect();
        let flashlight = world.flashlight.then(|| Flashlight::new(ids.allocate()));
        Self {
            camera: Pose::new(Vec3::new(0.0, EYE_HEIGHT, 0.0), Quat::IDENTITY),
            wall_distance: world.wall_distance,
            magazines,
            flashlight,
            rounds: world.rounds,
            stats: HostStats::default(),
        }
    }

    /// Follow the player's eye
    pub fn set_camera(&mut self, pose: Pose) {
        self.camera = pose;
    }

    pub fn stats(&self) -> HostStats {
        self.stats
    }

    pub fn rounds_on_ground(&self) -> u32 {
        self.rounds
    }

    pub fn magazines_on_ground(&self) -> usize {
        self.magazines.len()
    }

    /// Where a pickup lay
    fn ground_pose(&self) -> Pose {
        let ahead = self.camera.rotation * Vec3::Z;
        let flat = Vec3::new(ahead.x, 0.0, ahead.z).normalize_or_zero();
        Pose::new(
            Vec3::new(self.camera.position.x, 0.0, self.camera.position.z) + flat * 0.5,
            Quat::IDENTITY,
        )
    }
}

impl PoseSource for LoggingHost {
    fn camera_pose(&self) -> Pose {
        self.camera
    }

    fn object_pose(&self, _id: ObjectId) -> Option<Pose> {
        None
    }
}

impl GameHost for LoggingHost {
    fn linecast(&self, from: Vec3, to: Vec3) -> Option<LinecastHit> {
        let distance = self.wall_distance?;
        if distance > from.distance(to) {
            return None;
        }
        let dir = (to - from).normalize_or_zero();
        Some(LinecastHit {
            point: from + dir * distance,
            normal: -dir,
        })
    }

    fn spawn_projectile(&mut self, origin: Pose, velocity: Vec3, hostile: bool) {
        self.stats.projectiles += 1;
        log::info!(
            "projectile from {:.2} at {:.1} m/s (hostile: {})",
            origin.position,
            velocity.length(),
            hostile
        );
    }

    fn spawn_muzzle_flash(&mut self, at: Pose) {
        self.stats.muzzle_flashes += 1;
        log::debug!("muzzle flash at {:.2}", at.position);
    }

    fn spawn_physics_body(
        &mut self,
        body: PhysicsBody,
        pose: Pose,
        velocity: Vec3,
        _angular_velocity: Vec3,
    ) {
        self.stats.bodies += 1;
        log::info!("{:?} thrown from {:.2} at {:.2}", body, pose.position, velocity);
        match body {
            PhysicsBody::Cartridge(Cartridge::Live) => self.rounds += 1,
            PhysicsBody::Cartridge(Cartridge::Spent) => {}
            PhysicsBody::Magazine(magazine) => self.magazines.push(magazine),
            PhysicsBody::Flashlight(flashlight) => self.flashlight = Some(flashlight),
        }
    }

    fn play_sound(&mut self, cue: SoundCue, volume: f32, _at: Vec3) {
        self.stats.sounds += 1;
        log::info!("sound {:?} at volume {:.2}", cue, volume);
    }

    fn gun_velocity(&self) -> Vec3 {
        Vec3::ZERO
    }

    fn pick_up(&mut self, _origin: Vec3, range: f32, filter: PickupFilter) -> Pickups {
        let ground = self.ground_pose();
        let magazine = if filter.magazine && !self.magazines.is_empty() {
            Some((self.magazines.remove(0), ground))
        } else {
            None
        };
        let flashlight = if filter.flashlight {
            self.flashlight.take().map(|flashlight| (flashlight, ground))
        } else {
            None
        };
        let rounds = std::mem::take(&mut self.rounds);

        let taken = u32::from(magazine.is_some()) + u32::from(flashlight.is_some()) + rounds;
        if taken > 0 {
            self.stats.pickups += taken;
            log::info!(
                "picked up within {:.1} m: magazine {}, flashlight {}, {} rounds",
                range,
                magazine.is_some(),
                flashlight.is_some(),
                rounds
            );
        }
        Pickups {
            magazine,
            flashlight,
            rounds,
        }
    }
}
