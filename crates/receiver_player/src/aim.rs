//! Aim blend, recoil and gun pose weights

use crate::config::PlayerConfig;
use receiver_core::SimRng;
use receiver_math::Spring;
use receiver_weapon::{RecoilImpulse, Weapon};
use serde::{Deserialize, Serialize};

/// Named hand pose the gun blends toward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoseChannel {
    SlidePull,
    Reload,
    PressCheck,
    InspectCylinder,
    AddRounds,
    EjectRounds,
}

impl PoseChannel {
    /// Application order
    pub const ALL: [PoseChannel; 6] = [
        PoseChannel::SlidePull,
        PoseChannel::Reload,
        PoseChannel::PressCheck,
        PoseChannel::InspectCylinder,
        PoseChannel::AddRounds,
        PoseChannel::EjectRounds,
    ];

    /// Archetype anchor holding the pose
    pub fn anchor_name(&self) -> &'static str {
        match self {
            PoseChannel::SlidePull => "pose_slide_pull",
            PoseChannel::Reload => "pose_reload",
            PoseChannel::PressCheck => "pose_press_check",
            PoseChannel::InspectCylinder => "pose_inspect_cylinder",
            PoseChannel::AddRounds => "pose_add_rounds",
            PoseChannel::EjectRounds => "pose_eject_rounds",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// Which way the gun is turned for slide work.
///
/// Pulling the slide by hand tilts it left; the reload and safety poses
/// tilt it right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GunTilt {
    Center,
    Left,
    Right,
}

/// Aim and recoil state of one player.
///
/// Recoil only ever adds velocity to its springs; targets stay at rest so
/// every kick dies out through damping.
#[derive(Debug, Clone)]
pub struct AimModel {
    aim: Spring,
    aim_toggle: bool,
    recoil_x: Spring,
    recoil_y: Spring,
    head_recoil_x: Spring,
    head_recoil_y: Spring,
    /// Seconds left before each queued head kick
    head_recoil_delays: Vec<Option<f32>>,
    next_head_recoil: usize,
    poses: [Spring; 6],
    flashlight_mouth: Spring,
    disable_springs: bool,
    disable_recoil: bool,
}

impl AimModel {
    pub fn new(config: &PlayerConfig) -> Self {
        let aim = Spring::new(
            0.0,
            0.0,
            config.aim_spring_strength,
            config.aim_spring_damping,
        );
        let recoil = Spring::new(
            0.0,
            0.0,
            config.recoil_spring_strength,
            config.recoil_spring_damping,
        );
        Self {
            aim,
            aim_toggle: false,
            recoil_x: recoil,
            recoil_y: recoil,
            head_recoil_x: recoil,
            head_recoil_y: recoil,
            head_recoil_delays: vec![None; config.head_recoil_slots.max(1)],
            next_head_recoil: 0,
            poses: [aim; 6],
            flashlight_mouth: aim,
            disable_springs: config.disable_springs,
            disable_recoil: config.disable_recoil,
        }
    }

    // ---- impulses ----

    /// Take a recoil kick from the gun, queuing the delayed head kick
    pub fn apply_impulse(&mut self, impulse: &RecoilImpulse, head_delay: f32) {
        self.recoil_x.kick(impulse.recoil_x);
        self.recoil_y.kick(impulse.recoil_y);
        if impulse.head_recoil {
            self.queue_head_recoil(head_delay);
        }
    }

    /// Queue a head kick `delay` seconds from now; the oldest pending kick
    /// is overwritten once every slot is in use
    pub fn queue_head_recoil(&mut self, delay: f32) {
        let slots = self.head_recoil_delays.len();
        self.head_recoil_delays[self.next_head_recoil] = Some(delay);
        self.next_head_recoil = (self.next_head_recoil + 1) % slots;
    }

    /// Count down queued head kicks and fire the ones that are due
    pub fn advance_head_recoil(&mut self, dt: f32, rng: &mut SimRng) {
        for delay in &mut self.head_recoil_delays {
            let Some(left) = delay.as_mut() else {
                continue;
            };
            *left -= dt;
            if *left <= 0.0 {
                self.head_recoil_x.kick(rng.range_f32(-30.0, 30.0));
                self.head_recoil_y.kick(rng.range_f32(-30.0, 30.0));
                *delay = None;
            }
        }
    }

    pub fn pending_head_recoils(&self) -> usize {
        self.head_recoil_delays.iter().flatten().count()
    }

    /// Footstep bob
    pub fn step_recoil(&mut self, amount: f32, rng: &mut SimRng) {
        self.recoil_x.kick(rng.range_i32(100, 400) as f32 * amount);
        self.recoil_y.kick(rng.range_i32(-200, 200) as f32 * amount);
    }

    /// Hit reaction on gun and head
    pub fn was_shot(&mut self, rng: &mut SimRng) {
        self.head_recoil_x.kick(rng.range_i32(-400, 400) as f32);
        self.head_recoil_y.kick(rng.range_i32(-400, 400) as f32);
        self.recoil_x.kick(rng.range_i32(-400, 400) as f32);
        self.recoil_y.kick(rng.range_i32(-400, 400) as f32);
    }

    // ---- targets ----

    pub fn toggle_aim(&mut self) {
        self.aim_toggle = !self.aim_toggle;
    }

    pub fn aim_toggled(&self) -> bool {
        self.aim_toggle
    }

    /// Tilt implied by the current slide and reload targets
    pub fn tilt(&self) -> GunTilt {
        let slide = self.target(PoseChannel::SlidePull);
        let reload = self.target(PoseChannel::Reload);
        if slide < 0.1 && reload < 0.1 {
            GunTilt::Center
        } else if slide > reload {
            GunTilt::Left
        } else {
            GunTilt::Right
        }
    }

    /// Set every pose target from the gun's state
    pub fn set_pose_targets(&mut self, weapon: &Weapon) {
        let mut tilt = self.tilt();

        self.set_target(PoseChannel::SlidePull, 0.0);
        self.set_target(PoseChannel::Reload, 0.0);
        self.set_target(PoseChannel::PressCheck, 0.0);

        if weapon.is_safety_on() {
            self.set_target(PoseChannel::Reload, 0.2);
            tilt = GunTilt::Right;
        }
        if weapon.is_slide_locked() {
            // a slide that locks after the last shot enters the reload pose
            if tilt == GunTilt::Left {
                self.set_target(PoseChannel::SlidePull, 0.7);
            } else {
                self.set_target(PoseChannel::Reload, 0.7);
            }
        }
        if weapon.is_slide_pulled_back() {
            if tilt == GunTilt::Right {
                self.set_target(PoseChannel::Reload, 1.0);
            } else {
                self.set_target(PoseChannel::SlidePull, 1.0);
            }
        }
        if weapon.is_press_check() {
            self.set_target(PoseChannel::SlidePull, 0.0);
            self.set_target(PoseChannel::Reload, 0.0);
            self.set_target(PoseChannel::PressCheck, 0.6);
        }

        self.set_target(PoseChannel::AddRounds, 0.0);
        self.set_target(PoseChannel::EjectRounds, 0.0);
        self.set_target(PoseChannel::InspectCylinder, 0.0);
        if weapon.is_ejecting_rounds() {
            self.set_target(PoseChannel::EjectRounds, 1.0);
        } else if weapon.is_cylinder_open() {
            self.set_target(PoseChannel::InspectCylinder, 1.0);
        }
    }

    /// Relax every gun pose, e.g. once the gun is holstered
    pub fn clear_pose_targets(&mut self) {
        for spring in &mut self.poses {
            spring.target_state = 0.0;
        }
    }

    fn set_target(&mut self, channel: PoseChannel, target: f32) {
        self.poses[channel.index()].target_state = target;
    }

    pub fn target(&self, channel: PoseChannel) -> f32 {
        self.poses[channel.index()].target_state
    }

    /// Step the aim spring.
    ///
    /// `occlusion` is how far along the aim line scenery sits, as a
    /// fraction of the full gun reach; the gun only extends that far this
    /// tick and the target goes back to fully aimed afterwards.
    pub fn update_aim(&mut self, aiming: bool, occlusion: Option<f32>, dt: f32) {
        let mut occluded = false;
        if aiming {
            self.aim.target_state = 1.0;
            if let Some(fraction) = occlusion {
                self.aim.target_state = (1.0 - fraction).clamp(0.0, 1.0);
                occluded = true;
            }
        } else {
            self.aim.target_state = 0.0;
        }
        self.aim.update(dt);
        if occluded {
            self.aim.target_state = 1.0;
        }
    }

    /// Move the flashlight toward the mouth while the off hand is busy
    pub fn update_flashlight_mouth(&mut self, hand_busy: bool, dt: f32) {
        let state = |channel: PoseChannel| self.poses[channel.index()].state;
        let gun_needs_hand = (state(PoseChannel::InspectCylinder)
            + state(PoseChannel::EjectRounds)
            + state(PoseChannel::PressCheck) / 0.6
            + state(PoseChannel::Reload) / 0.7
            + state(PoseChannel::SlidePull))
            * self.aim.state;
        let target = if hand_busy { 1.0 } else { 0.0 };
        self.flashlight_mouth.target_state = f32::max(target, gun_needs_hand);
        self.flashlight_mouth.update(dt);
    }

    /// Integrate pose and recoil springs
    pub fn integrate(&mut self, dt: f32) {
        for spring in &mut self.poses {
            spring.update(dt);
        }
        self.recoil_x.update(dt);
        self.recoil_y.update(dt);
        self.head_recoil_x.update(dt);
        self.head_recoil_y.update(dt);
    }

    // ---- read-back ----

    /// True when aim is requested with a gun in hand
    pub fn is_aiming(&self) -> bool {
        self.aim.target_state == 1.0
    }

    pub fn aim_spring(&self) -> &Spring {
        &self.aim
    }

    /// Aim blend used for placement
    pub fn aim_blend(&self) -> f32 {
        self.display(&self.aim)
    }

    /// Weight of a hand pose used for placement
    pub fn pose_weight(&self, channel: PoseChannel) -> f32 {
        self.display(&self.poses[channel.index()])
    }

    pub fn flashlight_mouth_blend(&self) -> f32 {
        self.display(&self.flashlight_mouth)
    }

    /// Gun recoil rotation in degrees (about the gun's right axis, about up)
    pub fn recoil(&self) -> (f32, f32) {
        if self.disable_recoil {
            return (0.0, 0.0);
        }
        (self.recoil_x.state, self.recoil_y.state)
    }

    /// Head recoil in degrees (yaw, pitch)
    pub fn head_recoil(&self) -> (f32, f32) {
        if self.disable_recoil {
            return (0.0, 0.0);
        }
        (self.head_recoil_x.state, self.head_recoil_y.state)
    }

    pub fn recoil_springs(&self) -> (&Spring, &Spring) {
        (&self.recoil_x, &self.recoil_y)
    }

    fn display(&self, spring: &Spring) -> f32 {
        if self.disable_springs {
            spring.target_state
        } else {
            spring.state
        }
    }
}
