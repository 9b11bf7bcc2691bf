//! Operations shared by every mechanism family

use crate::config::{GunKind, WeaponConfig};
use crate::events::{RecoilImpulse, SoundCue, WeaponEvent};
use receiver_core::SimRng;

/// Everything a mechanism needs while it moves: tuning, randomness and
/// the owning weapon's event queue
pub(crate) struct Cycle<'a> {
    pub config: &'a WeaponConfig,
    pub rng: &'a mut SimRng,
    pub events: &'a mut Vec<WeaponEvent>,
}

impl<'a> Cycle<'a> {
    pub fn sound(&mut self, cue: SoundCue, volume: f32) {
        self.events.push(WeaponEvent::Sound { cue, volume });
    }

    /// Mechanical click at the configured volume, scaled
    pub fn click(&mut self, cue: SoundCue, scale: f32) {
        let volume = self.config.mechanic_volume * scale;
        self.sound(cue, volume);
    }

    pub fn emit(&mut self, event: WeaponEvent) {
        self.events.push(event);
    }

    /// Muzzle flash, projectile and the randomized kick of a shot
    pub fn shot(&mut self) {
        self.emit(WeaponEvent::MuzzleFlash);
        self.emit(WeaponEvent::ProjectileFired {
            muzzle_speed: self.config.muzzle_speed,
        });
    }

    pub fn shot_recoil(&mut self) {
        let impulse = RecoilImpulse {
            rotation_y: self.rng.range_f32(1.0, 2.0),
            rotation_x: self.rng.range_f32(-1.0, 1.0),
            recoil_x: -self.rng.range_f32(150.0, 300.0),
            recoil_y: self.rng.range_f32(-200.0, 200.0),
            head_recoil: true,
        };
        self.emit(WeaponEvent::Recoil(impulse));
    }
}

/// Cross-cutting behaviour the trigger, hammer and safety rely on.
///
/// Each mechanism family implements this once; [`crate::Weapon`] never
/// branches on the family itself.
pub(crate) trait Action {
    fn kind(&self) -> GunKind;

    /// The trigger cannot reach the sear at all
    fn blocks_trigger(&self) -> bool;

    /// The thumb cannot move the hammer
    fn blocks_hammer(&self) -> bool;

    fn is_slide_locked(&self) -> bool;

    /// Slide travel, zero for guns without a slide
    fn slide_amount(&self) -> f32;

    /// The breech is closed and a falling hammer can strike
    fn in_battery(&self) -> bool;

    /// Hammer fell; fire if a live round is under it. Returns true on a shot.
    fn discharge(&mut self, cx: &mut Cycle<'_>) -> bool;

    /// Hammer moved to `cocked`; `just_cocked` is the edge to full cock
    fn on_hammer_moved(&mut self, cocked: f32, just_cocked: bool);

    /// Hammer position after the mechanism acts on it. `released` means
    /// neither thumb nor a double-action trigger is holding it.
    fn couple_hammer(&self, cocked: f32, released: bool) -> f32;

    /// Feed and retraction, before the hammer settles
    fn advance_cycle(&mut self, dt: f32, cx: &mut Cycle<'_>);

    /// Return springs and rotating parts, after the hammer settles
    fn advance_settle(&mut self, dt: f32, hammer_cocked: f32, cx: &mut Cycle<'_>);
}
