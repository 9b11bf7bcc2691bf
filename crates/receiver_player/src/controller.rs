//! The per-tick player loop

use crate::aim::{AimModel, PoseChannel};
use crate::camera::CameraRig;
use crate::config::PlayerConfig;
use crate::host::{GameHost, PhysicsBody, PickupFilter};
use crate::input::{Button, InputFrame};
use crate::loadout::Loadout;
use crate::perk::{Perk, PerkSet};
use receiver_core::SimRng;
use receiver_inventory::{InventoryController, InventoryEvent, SlotRequest};
use receiver_math::{look_rotation, mix_vec3, Pose, Quat, Vec3};
use receiver_weapon::{Magazine, SoundCue, Weapon, WeaponArchetype, WeaponEvent};

/// Where the flashlight sits in the off hand, relative to the eye
const FLASHLIGHT_HOLD: Vec3 = Vec3::new(-0.15, -0.01, 0.15);
/// Flashlight clamped in the teeth
const FLASHLIGHT_MOUTH: Vec3 = Vec3::new(0.0, -0.08, 0.05);
/// Flashlight held under the gun while aiming, in gun space
const FLASHLIGHT_UNDER_GUN: Vec3 = Vec3::new(0.07, -0.03, 0.0);
const FLASHLIGHT_RECOIL_SCALE: f32 = 0.3;
const GRAB_VOLUME: f32 = 0.2;

/// One player: inventory, aim and camera, driven by [`InputFrame`]s.
///
/// The controller owns the random stream for everything it drives, so a
/// seed plus an input script replays a session exactly.
#[derive(Debug)]
pub struct PlayerController {
    config: PlayerConfig,
    perks: PerkSet,
    inventory: InventoryController,
    aim: AimModel,
    camera: CameraRig,
    rng: SimRng,
    eye: Pose,
    gun_pose: Option<Pose>,
    flashlight_pose: Option<Pose>,
    /// Last under-gun flashlight pose, relative to the eye
    flashlight_aim: Pose,
}

impl PlayerController {
    pub fn new(
        config: PlayerConfig,
        inventory: InventoryController,
        perks: PerkSet,
        rng: SimRng,
    ) -> Self {
        let aim = AimModel::new(&config);
        Self {
            config,
            perks,
            inventory,
            aim,
            camera: CameraRig::new(0.0),
            rng,
            eye: Pose::IDENTITY,
            gun_pose: None,
            flashlight_pose: None,
            flashlight_aim: Pose::IDENTITY,
        }
    }

    /// Start a run with a rolled loadout
    pub fn from_loadout(
        config: PlayerConfig,
        loadout: Loadout,
        perks: PerkSet,
        rng: SimRng,
    ) -> Self {
        let inventory = loadout.into_inventory(config.inventory.clone());
        Self::new(config, inventory, perks, rng)
    }

    /// Face the spawn point's yaw
    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.camera = CameraRig::new(yaw);
        self
    }

    // ---- accessors ----

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn perks(&self) -> &PerkSet {
        &self.perks
    }

    pub fn inventory(&self) -> &InventoryController {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut InventoryController {
        &mut self.inventory
    }

    pub fn aim(&self) -> &AimModel {
        &self.aim
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    /// The drawn gun
    pub fn weapon(&self) -> Option<&Weapon> {
        self.inventory.drawn()
    }

    /// Eye pose after the last tick; hosts copy it to their camera
    pub fn eye_pose(&self) -> Pose {
        self.eye
    }

    /// World pose of the drawn gun after the last tick
    pub fn gun_pose(&self) -> Option<Pose> {
        self.gun_pose
    }

    /// World pose of the held flashlight after the last tick
    pub fn flashlight_pose(&self) -> Option<Pose> {
        self.flashlight_pose
    }

    pub fn is_aiming(&self) -> bool {
        self.inventory.drawn().is_some() && self.aim.is_aiming()
    }

    // ---- outside impulses ----

    /// Footstep bob
    pub fn step_recoil(&mut self, amount: f32) {
        self.aim.step_recoil(amount, &mut self.rng);
    }

    /// The player was hit
    pub fn was_shot(&mut self) {
        self.aim.was_shot(&mut self.rng);
        let x = self.rng.range_i32(-4, 4) as f32;
        let y = self.rng.range_i32(-4, 4) as f32;
        self.camera.nudge(x, y);
    }

    // ---- tick ----

    /// Advance one tick: commands first, then continuous motion, then
    /// placement for display
    pub fn tick<H: GameHost>(&mut self, input: &InputFrame, host: &mut H, dt: f32) {
        self.aim.advance_head_recoil(dt, &mut self.rng);

        if input.held(Button::Get) {
            self.handle_get(host);
        }

        if input.pressed(Button::Holster) {
            self.inventory.request_slot(SlotRequest::Holster);
        }
        if let Some(request) = input.inventory_key().and_then(SlotRequest::from_key) {
            self.inventory.request_slot(request);
        }
        self.inventory.route_pending(&*host);

        if let Some(magazine) = self.inventory.eject_or_drop(input.pressed(Button::EjectDrop)) {
            self.drop_magazine(magazine, host);
        }

        if self.inventory.drawn().is_some() {
            self.handle_gun_controls(input);
        } else if self.inventory.hand().is_holding() {
            self.handle_magazine_controls(input, host);
        }
        if input.pressed(Button::Insert) {
            self.inventory.insert_round(&mut self.rng);
            self.inventory.begin_insert();
        }
        if input.pressed(Button::AimToggle) {
            self.aim.toggle_aim();
        }

        if let Some(weapon) = self.inventory.drawn_mut() {
            weapon.advance(dt, &mut self.rng);
        }
        self.dispatch_weapon_events(host);
        self.dispatch_inventory_events();

        match self.inventory.drawn() {
            Some(weapon) => self.aim.set_pose_targets(weapon),
            None => self.aim.clear_pose_targets(),
        }

        let aiming = self.inventory.drawn().is_some()
            && (input.held(Button::HoldToAim) || self.aim.aim_toggled());
        let occlusion = if aiming { self.aim_occlusion(host) } else { None };
        self.aim.update_aim(aiming, occlusion, dt);

        let aim_state = self.aim.aim_spring().state;
        self.camera
            .update(input.mouse_x, input.mouse_y, aiming, aim_state, &self.config);

        self.aim.integrate(dt);
        let hand_busy = !self.inventory.hand().is_empty();
        self.aim.update_flashlight_mouth(hand_busy, dt);

        self.inventory.advance(dt);

        self.place(host);
    }

    fn handle_get<H: GameHost>(&mut self, host: &mut H) {
        let range = if self.perks.has_perk(Perk::ShortSleeves) {
            self.config.short_sleeves_grab_range
        } else {
            self.config.grab_range
        };
        let filter = PickupFilter {
            magazine: self.inventory.hand().is_empty(),
            flashlight: self.inventory.flashlight().is_none(),
        };
        let origin = host.camera_pose().position;
        let pickups = host.pick_up(origin, range, filter);

        for _ in 0..pickups.rounds {
            self.inventory.collect_round();
            self.play(host, SoundCue::BulletGrab, GRAB_VOLUME, origin);
        }
        if let Some((flashlight, ground)) = pickups.flashlight {
            if let Err(flashlight) = self.inventory.grab_flashlight(flashlight, ground) {
                log::warn!("host handed over flashlight {} with one held", flashlight.id());
                host.spawn_physics_body(
                    PhysicsBody::Flashlight(flashlight),
                    ground,
                    Vec3::ZERO,
                    Vec3::ZERO,
                );
            }
        }
        if let Some((magazine, ground)) = pickups.magazine {
            match self.inventory.grab_magazine(magazine, ground) {
                Ok(true) => self.perks.did_pickup_mag(),
                Ok(false) => {}
                Err(magazine) => {
                    log::warn!("host handed over magazine {} with the hand full", magazine.id());
                    host.spawn_physics_body(
                        PhysicsBody::Magazine(magazine),
                        ground,
                        Vec3::ZERO,
                        Vec3::ZERO,
                    );
                }
            }
        }
    }

    fn drop_magazine<H: GameHost>(&mut self, magazine: Magazine, host: &mut H) {
        let pose = host
            .object_pose(magazine.id())
            .unwrap_or_else(|| host.camera_pose());
        let velocity = host.gun_velocity();
        host.spawn_physics_body(PhysicsBody::Magazine(magazine), pose, velocity, Vec3::ZERO);
    }

    fn handle_gun_controls(&mut self, input: &InputFrame) {
        let rng = &mut self.rng;
        let Some(weapon) = self.inventory.drawn_mut() else {
            return;
        };

        if input.held(Button::Trigger) {
            weapon.apply_pressure_to_trigger(rng);
        } else {
            weapon.release_pressure_from_trigger();
        }
        if input.pressed(Button::SlideLock) {
            weapon.release_slide_lock();
        }
        if input.released(Button::SlideLock) {
            weapon.release_pressure_on_slide_lock();
        }
        if input.held(Button::SlideLock) {
            weapon.pressure_on_slide_lock();
        }
        if input.pressed(Button::Safety) {
            weapon.toggle_safety();
        }
        if input.pressed(Button::AutoModToggle) {
            weapon.toggle_auto_mod();
        }
        if input.pressed(Button::PullBackSlide) {
            weapon.pull_back_slide();
        }
        if input.released(Button::PullBackSlide) {
            weapon.release_slide();
        }
        if input.pressed(Button::SwingOutCylinder) {
            weapon.swing_out_cylinder();
        }
        if input.pressed(Button::CloseCylinder) {
            weapon.close_cylinder();
        }
        if input.held(Button::ExtractorRod) {
            weapon.extractor_rod();
        }
        if input.held(Button::Hammer) {
            weapon.pressure_on_hammer();
        }
        if input.released(Button::Hammer) {
            weapon.release_hammer();
        }
        let spin = input.scroll.trunc() as i32;
        if spin != 0 {
            weapon.rotate_cylinder(spin);
        }
    }

    /// Holstered with a magazine in hand: the slide button thumbs rounds out
    fn handle_magazine_controls<H: GameHost>(&mut self, input: &InputFrame, host: &mut H) {
        if input.pressed(Button::PullBackSlide) && self.inventory.remove_round_from_mag() {
            let at = host.camera_pose().position;
            self.play(host, SoundCue::BulletGrab, GRAB_VOLUME, at);
        }
    }

    fn dispatch_weapon_events<H: GameHost>(&mut self, host: &mut H) {
        let Some(weapon) = self.inventory.drawn_mut() else {
            return;
        };
        let events = weapon.drain_events();
        let Some(weapon) = self.inventory.drawn() else {
            return;
        };
        let archetype = weapon.archetype();
        let gun = self.gun_pose.unwrap_or(self.eye);
        let volume_scale = self.config.preferences.sound_volume;

        for event in events {
            match event {
                WeaponEvent::Sound { cue, volume } => {
                    host.play_sound(cue, volume * volume_scale, gun.position);
                }
                WeaponEvent::CasingFormed { chamber } => {
                    log::trace!("casing formed in chamber {:?}", chamber);
                }
                WeaponEvent::MuzzleFlash => {
                    host.spawn_muzzle_flash(anchor_pose(archetype, &gun, "point_muzzleflash"));
                }
                WeaponEvent::ProjectileFired { muzzle_speed } => {
                    let origin = anchor_pose(archetype, &gun, "point_muzzle");
                    host.spawn_projectile(origin, origin.forward() * muzzle_speed, false);
                }
                WeaponEvent::RoundEjected {
                    cartridge,
                    local_velocity,
                    angular_velocity,
                    ..
                } => {
                    let pose = anchor_pose(archetype, &gun, "point_chambered_round");
                    let velocity = host.gun_velocity() + gun.rotation * local_velocity;
                    host.spawn_physics_body(
                        PhysicsBody::Cartridge(cartridge),
                        pose,
                        velocity,
                        gun.rotation * angular_velocity,
                    );
                }
                WeaponEvent::Recoil(impulse) => {
                    self.aim
                        .apply_impulse(&impulse, self.config.head_recoil_delay);
                    self.camera.nudge(impulse.rotation_x, impulse.rotation_y);
                }
            }
        }
    }

    fn dispatch_inventory_events(&mut self) {
        for event in self.inventory.drain_events() {
            match event {
                InventoryEvent::GunHolstered { slot, id } => {
                    log::debug!("holstered {} in slot {}", id, slot + 1);
                }
                InventoryEvent::GunDrawn { slot, id } => {
                    log::debug!("drew {} from slot {}", id, slot + 1);
                }
                other => log::trace!("{:?}", other),
            }
        }
    }

    /// Fraction of the gun's reach at which scenery blocks the aim line
    fn aim_occlusion<H: GameHost>(&self, host: &H) -> Option<f32> {
        let camera = host.camera_pose().position;
        let aim_dir = self.camera.aim_dir();
        let reach = self.config.gun_dist() + 0.2;
        let end = camera + aim_dir * reach;
        host.linecast(camera, end)
            .map(|hit| hit.point.distance(camera) / reach)
    }

    fn play<H: GameHost>(&self, host: &mut H, cue: SoundCue, volume: f32, at: Vec3) {
        host.play_sound(cue, volume * self.config.preferences.sound_volume, at);
    }

    // ---- placement ----

    fn place<H: GameHost>(&mut self, host: &H) {
        let (head_x, head_y) = self.aim.head_recoil();
        self.eye = Pose::new(
            host.camera_pose().position,
            self.camera.view_rotation(head_x, head_y),
        );
        self.gun_pose = self.inventory.drawn().map(|weapon| self.place_gun(weapon));
        self.flashlight_pose = if self.inventory.flashlight().is_some() {
            Some(self.place_flashlight())
        } else {
            None
        };
    }

    fn place_gun(&self, weapon: &Weapon) -> Pose {
        let distance = self.config.gun_dist();
        let aim_dir = self.camera.aim_dir();
        let aim_pos = self.eye.position + aim_dir * distance;
        let unaimed_dir = (self.camera.body_forward() + Vec3::NEG_Y).normalize_or_zero();
        let unaimed_pos = self.eye.position + unaimed_dir * distance;

        let blend = self.aim.aim_blend();
        let mut gun = Pose::new(
            mix_vec3(unaimed_pos, aim_pos, blend),
            look_rotation(mix_vec3(unaimed_dir, aim_dir, blend)),
        );

        let archetype = weapon.archetype();
        for channel in PoseChannel::ALL {
            apply_pose(&mut gun, archetype, channel.anchor_name(), self.aim.pose_weight(channel));
        }

        let (recoil_x, recoil_y) = self.aim.recoil();
        if let Some(pivot) = archetype.anchor("point_recoil_rotate") {
            let pivot = gun.compose(pivot).position;
            let right = gun.rotation * Vec3::X;
            gun.rotate_around(pivot, right, recoil_x);
            gun.rotate_around(pivot, Vec3::Y, recoil_y);
        }
        gun
    }

    fn place_flashlight(&mut self) -> Pose {
        let eye = self.eye;
        let mut light = eye.compose(&Pose::new(FLASHLIGHT_HOLD, Quat::IDENTITY));

        let (recoil_x, recoil_y) = self.aim.recoil();
        let pivot = light.position;
        let right = light.rotation * Vec3::X;
        light.rotate_around(pivot, right, recoil_x * FLASHLIGHT_RECOIL_SCALE);
        light.rotate_around(pivot, Vec3::Y, recoil_y * FLASHLIGHT_RECOIL_SCALE);

        if let Some(gun) = self.gun_pose {
            let under = gun.compose(&Pose::new(FLASHLIGHT_UNDER_GUN, Quat::IDENTITY));
            let inverse = eye.rotation.inverse();
            self.flashlight_aim = Pose::new(
                inverse * (under.position - eye.position),
                inverse * under.rotation,
            );
        }
        light = light.mix(&eye.compose(&self.flashlight_aim), self.aim.aim_blend());

        let mouth = eye.compose(&Pose::new(FLASHLIGHT_MOUTH, Quat::IDENTITY));
        light = light.mix(&mouth, self.aim.flashlight_mouth_blend());

        let springs = self.inventory.springs();
        let ground = if self.config.disable_springs {
            springs.flash_ground.target_state
        } else {
            springs.flash_ground.state
        };
        light.mix(&springs.flash_ground_pose, ground)
    }
}

/// World pose of a named anchor, or the gun itself when the archetype
/// lacks it
fn anchor_pose(archetype: &WeaponArchetype, gun: &Pose, name: &str) -> Pose {
    archetype
        .anchor(name)
        .map_or(*gun, |anchor| gun.compose(anchor))
}

/// Blend the gun toward a named hand pose; missing anchors are skipped
fn apply_pose(gun: &mut Pose, archetype: &WeaponArchetype, name: &str, amount: f32) {
    if amount == 0.0 {
        return;
    }
    let Some(anchor) = archetype.anchor(name) else {
        return;
    };
    let target = gun.compose(anchor);
    *gun = gun.mix(&target, amount);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_anchor_leaves_pose() {
        let archetype = WeaponArchetype::model10();
        let mut gun = Pose::new(Vec3::new(1.0, 2.0, 3.0), Quat::IDENTITY);
        apply_pose(&mut gun, &archetype, "pose_slide_pull", 1.0);
        assert_eq!(gun.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(anchor_pose(&archetype, &gun, "point_nowhere"), gun);
    }

    #[test]
    fn test_full_pose_reaches_anchor() {
        let archetype = WeaponArchetype::m1911();
        let mut gun = Pose::IDENTITY;
        apply_pose(&mut gun, &archetype, "pose_reload", 1.0);
        let anchor = archetype.anchor("pose_reload").unwrap();
        assert!(gun.position.abs_diff_eq(anchor.position, 1e-5));
    }
}
