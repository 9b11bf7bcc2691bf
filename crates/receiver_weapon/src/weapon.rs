//! The weapon state machine

use crate::action::{Action, Cycle};
use crate::automatic::{AutomaticAction, RoundState};
use crate::config::{ActionType, GunKind, WeaponArchetype, WeaponConfig};
use crate::events::{SoundCue, WeaponEvent};
use crate::magazine::Magazine;
use crate::pose::MechanismPose;
use crate::revolver::RevolverAction;
use receiver_core::{IdAllocator, ObjectId, SimRng};
use serde::{Deserialize, Serialize};

/// How long the trigger has been held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerPressure {
    None,
    /// First tick of a pull
    Initial,
    Continuing,
}

/// What the thumb is doing to the hammer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Thumb {
    OnHammer,
    OffHammer,
    /// Easing the hammer down after letting go under trigger pressure
    SlowLowering,
}

#[derive(Debug, Clone)]
struct Trigger {
    pressure: TriggerPressure,
    pressed: f32,
    fired_once_this_pull: bool,
    /// Double-action pull is cocking the hammer this tick
    cocking: bool,
}

#[derive(Debug, Clone)]
struct Hammer {
    thumb: Thumb,
    cocked: f32,
    /// Thumb is cocking the hammer this tick
    thumb_cocking: bool,
}

#[derive(Debug, Clone, Copy)]
struct Safety {
    engaged: bool,
    off_amount: f32,
}

#[derive(Debug, Clone, Copy)]
struct AutoMod {
    enabled: bool,
    amount: f32,
}

/// Family-specific parts of a gun
#[derive(Debug, Clone)]
pub enum Mechanism {
    Automatic(AutomaticAction),
    Revolver(RevolverAction),
}

impl Mechanism {
    fn for_archetype(archetype: &WeaponArchetype) -> Self {
        match archetype.kind {
            GunKind::Automatic => Mechanism::Automatic(AutomaticAction::new()),
            GunKind::Revolver => {
                Mechanism::Revolver(RevolverAction::new(archetype.cylinder_capacity))
            }
        }
    }

    pub(crate) fn action(&self) -> &dyn Action {
        match self {
            Mechanism::Automatic(action) => action,
            Mechanism::Revolver(action) => action,
        }
    }

    pub(crate) fn action_mut(&mut self) -> &mut dyn Action {
        match self {
            Mechanism::Automatic(action) => action,
            Mechanism::Revolver(action) => action,
        }
    }

    pub fn kind(&self) -> GunKind {
        self.action().kind()
    }
}

/// Raise the hammer by `amount`, rotating the cylinder with it
fn cock_hammer(hammer: &mut Hammer, mechanism: &mut Mechanism, amount: f32, cx: &mut Cycle<'_>) {
    let old = hammer.cocked;
    hammer.cocked = (hammer.cocked + amount).min(1.0);
    let just_cocked = hammer.cocked == 1.0 && old != 1.0;
    if just_cocked && hammer.thumb == Thumb::OnHammer {
        cx.click(SoundCue::HammerCock, 1.0);
    }
    mechanism.action_mut().on_hammer_moved(hammer.cocked, just_cocked);
}

/// One live gun.
///
/// Commands mirror input edges and levels and never fail; illegal commands
/// are no-ops. Continuous travel happens in [`Weapon::advance`]. Sounds,
/// shots and recoil queue up as [`WeaponEvent`]s until drained.
#[derive(Debug, Clone)]
pub struct Weapon {
    id: ObjectId,
    archetype: WeaponArchetype,
    config: WeaponConfig,
    trigger: Trigger,
    hammer: Hammer,
    safety: Option<Safety>,
    auto_mod: Option<AutoMod>,
    mechanism: Mechanism,
    events: Vec<WeaponEvent>,
}

impl Weapon {
    /// A gun at rest: hammer cocked, safety off, nothing loaded
    pub fn new(id: ObjectId, archetype: WeaponArchetype, config: WeaponConfig) -> Self {
        let mechanism = Mechanism::for_archetype(&archetype);
        let safety = archetype.has_safety.then_some(Safety {
            engaged: false,
            off_amount: 1.0,
        });
        let auto_mod = archetype.has_auto_mod.then_some(AutoMod {
            enabled: false,
            amount: 0.0,
        });
        Self {
            id,
            archetype,
            config,
            trigger: Trigger {
                pressure: TriggerPressure::None,
                pressed: 0.0,
                fired_once_this_pull: false,
                cocking: false,
            },
            hammer: Hammer {
                thumb: Thumb::OffHammer,
                cocked: 1.0,
                thumb_cocking: false,
            },
            safety,
            auto_mod,
            mechanism,
            events: Vec::new(),
        }
    }

    /// A gun as found in the world, with randomized loading and levers
    pub fn spawn(
        archetype: WeaponArchetype,
        config: WeaponConfig,
        ids: &IdAllocator,
        rng: &mut SimRng,
    ) -> Self {
        let mut weapon = Self::new(ids.allocate(), archetype, config);

        if let Some(auto_mod) = weapon.auto_mod.as_mut() {
            if rng.coin() {
                auto_mod.enabled = true;
                auto_mod.amount = 1.0;
            }
        }
        if weapon.archetype.has_hammer && rng.coin() {
            weapon.hammer.cocked = 0.0;
        }

        let lock_position = weapon.config.slide_lock_position;
        let capacity = weapon.archetype.magazine_capacity;
        match &mut weapon.mechanism {
            Mechanism::Automatic(action) => {
                let magazine = Magazine::spawn(ids.allocate(), capacity, rng).with_held();
                action.seat_magazine(magazine);
                if rng.coin() {
                    action.set_chambered(Some(RoundState::Ready));
                }
                if rng.coin() {
                    action.lock_open(lock_position);
                }
            }
            Mechanism::Revolver(action) => action.spawn_chambers(rng),
        }

        if weapon.safety.is_some() && rng.range_i32(0, 4) == 0 {
            weapon = weapon.with_safety_engaged();
        }

        log::debug!(
            "spawned {} {} (hammer {:.1}, safety {})",
            weapon.archetype.name,
            weapon.id,
            weapon.hammer.cocked,
            weapon.is_safety_on()
        );
        weapon
    }

    /// Seat a magazine fully
    pub fn with_magazine(mut self, magazine: Magazine) -> Self {
        if let Mechanism::Automatic(action) = &mut self.mechanism {
            action.seat_magazine(magazine);
        }
        self
    }

    /// Put a live round in battery
    pub fn with_chambered_round(mut self) -> Self {
        if let Mechanism::Automatic(action) = &mut self.mechanism {
            action.set_chambered(Some(RoundState::Ready));
        }
        self
    }

    /// Load live rounds into the given cylinder chambers
    pub fn with_loaded_chambers(mut self, chambers: impl IntoIterator<Item = usize>) -> Self {
        if let Mechanism::Revolver(action) = &mut self.mechanism {
            for index in chambers {
                action.load_chamber(index, 0.25);
            }
        }
        self
    }

    /// Engage the safety; the slide goes forward and unlocks
    pub fn with_safety_engaged(mut self) -> Self {
        if let Some(safety) = self.safety.as_mut() {
            safety.engaged = true;
            safety.off_amount = 0.0;
            if let Mechanism::Automatic(action) = &mut self.mechanism {
                action.close_slide();
            }
        }
        self
    }

    /// Start with the hammer down
    pub fn with_hammer_down(mut self) -> Self {
        self.hammer.cocked = 0.0;
        self
    }

    /// Start with full-auto enabled
    pub fn with_auto_mod_enabled(mut self) -> Self {
        if let Some(auto_mod) = self.auto_mod.as_mut() {
            auto_mod.enabled = true;
            auto_mod.amount = 1.0;
        }
        self
    }

    /// Lock the slide open at the lock position
    pub fn with_slide_locked(mut self) -> Self {
        let position = self.config.slide_lock_position;
        if let Mechanism::Automatic(action) = &mut self.mechanism {
            action.lock_open(position);
        }
        self
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn archetype(&self) -> &WeaponArchetype {
        &self.archetype
    }

    pub fn config(&self) -> &WeaponConfig {
        &self.config
    }

    pub fn kind(&self) -> GunKind {
        self.archetype.kind
    }

    pub fn action_type(&self) -> ActionType {
        self.archetype.action
    }

    pub fn mechanism(&self) -> &Mechanism {
        &self.mechanism
    }

    pub fn automatic(&self) -> Option<&AutomaticAction> {
        match &self.mechanism {
            Mechanism::Automatic(action) => Some(action),
            Mechanism::Revolver(_) => None,
        }
    }

    pub fn revolver(&self) -> Option<&RevolverAction> {
        match &self.mechanism {
            Mechanism::Revolver(action) => Some(action),
            Mechanism::Automatic(_) => None,
        }
    }

    fn automatic_mut(&mut self) -> Option<&mut AutomaticAction> {
        match &mut self.mechanism {
            Mechanism::Automatic(action) => Some(action),
            Mechanism::Revolver(_) => None,
        }
    }

    fn revolver_mut(&mut self) -> Option<&mut RevolverAction> {
        match &mut self.mechanism {
            Mechanism::Revolver(action) => Some(action),
            Mechanism::Automatic(_) => None,
        }
    }

    fn click(&mut self, cue: SoundCue, scale: f32) {
        let volume = self.config.mechanic_volume * scale;
        self.events.push(WeaponEvent::Sound { cue, volume });
    }

    pub fn hammer_cocked(&self) -> f32 {
        self.hammer.cocked
    }

    pub fn thumb(&self) -> Thumb {
        self.hammer.thumb
    }

    pub fn trigger_pressure(&self) -> TriggerPressure {
        self.trigger.pressure
    }

    /// Travel of the safety toward off; guns without one are always off
    pub fn safety_off(&self) -> f32 {
        self.safety.map_or(1.0, |safety| safety.off_amount)
    }

    pub fn slide_amount(&self) -> f32 {
        self.mechanism.action().slide_amount()
    }

    // ---- trigger ----

    /// Squeeze the trigger; call every tick it is held. True on a shot.
    pub fn apply_pressure_to_trigger(&mut self, rng: &mut SimRng) -> bool {
        if self.trigger.pressure == TriggerPressure::None {
            self.trigger.pressure = TriggerPressure::Initial;
            self.trigger.fired_once_this_pull = false;
        } else {
            self.trigger.pressure = TriggerPressure::Continuing;
        }
        if self.mechanism.action().blocks_trigger() || self.hammer.thumb != Thumb::OffHammer {
            return false;
        }

        let double_action = self.archetype.action == ActionType::Double;
        let can_release = (self.trigger.pressure == TriggerPressure::Initial || double_action)
            && !self.mechanism.action().is_slide_locked()
            && self.hammer.cocked == 1.0
            && self.safety_off() == 1.0
            && (self.should_toggle_auto_mod() || !self.trigger.fired_once_this_pull);

        if can_release {
            self.trigger.pressed = 1.0;
            if self.mechanism.action().in_battery() {
                self.hammer.cocked = 0.0;
                let mut cx = Cycle {
                    config: &self.config,
                    rng,
                    events: &mut self.events,
                };
                if self.mechanism.action_mut().discharge(&mut cx) {
                    self.trigger.fired_once_this_pull = true;
                    log::debug!("{} fired", self.id);
                    return true;
                }
            }
        }

        if double_action && self.trigger.pressed < 1.0 {
            self.trigger.cocking = true;
        }
        false
    }

    pub fn release_pressure_from_trigger(&mut self) {
        self.trigger.pressure = TriggerPressure::None;
        self.trigger.pressed = 0.0;
        self.trigger.cocking = false;
    }

    // ---- slide ----

    pub fn pull_back_slide(&mut self) {
        let safety_on = self.is_safety_on();
        if let Some(action) = self.automatic_mut() {
            action.pull_back_slide(safety_on);
        }
    }

    pub fn release_slide(&mut self) {
        if let Some(action) = self.automatic_mut() {
            action.release_slide();
        }
    }

    pub fn pressure_on_slide_lock(&mut self) {
        if let Mechanism::Automatic(action) = &mut self.mechanism {
            action.pressure_on_slide_lock(&self.config);
        }
    }

    pub fn release_pressure_on_slide_lock(&mut self) {
        if let Mechanism::Automatic(action) = &mut self.mechanism {
            action.release_pressure_on_slide_lock(&self.config);
        }
    }

    /// Drop the slide lock unconditionally
    pub fn release_slide_lock(&mut self) {
        if let Some(action) = self.automatic_mut() {
            action.release_slide_lock();
        }
    }

    /// Drop the slide lock only if it is holding the slide at the lock stop
    pub fn try_to_release_slide_lock(&mut self) {
        if let Mechanism::Automatic(action) = &mut self.mechanism {
            action.try_to_release_slide_lock(&self.config);
        }
    }

    // ---- levers ----

    /// Flip the safety; it only goes on with the slide forward and hammer cocked
    pub fn toggle_safety(&mut self) {
        let slide_forward = self.slide_amount() == 0.0;
        let hammer_cocked = self.hammer.cocked == 1.0;
        let Some(safety) = self.safety.as_mut() else {
            return;
        };
        if !safety.engaged {
            if slide_forward && hammer_cocked {
                safety.engaged = true;
                self.click(SoundCue::Safety, 1.0);
            }
        } else {
            safety.engaged = false;
            self.click(SoundCue::Safety, 1.0);
        }
    }

    pub fn toggle_auto_mod(&mut self) {
        let Some(auto_mod) = self.auto_mod.as_mut() else {
            return;
        };
        auto_mod.enabled = !auto_mod.enabled;
        self.click(SoundCue::Safety, 1.0);
    }

    // ---- hammer ----

    /// Thumb on the hammer; call every tick it is held
    pub fn pressure_on_hammer(&mut self) {
        if !self.archetype.has_hammer {
            return;
        }
        self.hammer.thumb = Thumb::OnHammer;
        if self.mechanism.action().blocks_hammer() {
            return;
        }
        self.hammer.thumb_cocking = true;
    }

    /// Thumb off. Under trigger pressure, or short of full cock, the hammer
    /// is eased down instead of staying back.
    pub fn release_hammer(&mut self) {
        if !self.archetype.has_hammer {
            return;
        }
        self.hammer.thumb_cocking = false;
        let under_trigger =
            self.trigger.pressure != TriggerPressure::None && self.safety_off() == 1.0;
        if under_trigger || self.hammer.cocked != 1.0 {
            self.hammer.thumb = Thumb::SlowLowering;
            self.trigger.pressed = 1.0;
        } else {
            self.hammer.thumb = Thumb::OffHammer;
        }
    }

    // ---- cylinder ----

    pub fn swing_out_cylinder(&mut self) -> bool {
        self.revolver_mut()
            .map_or(false, RevolverAction::swing_out_cylinder)
    }

    pub fn close_cylinder(&mut self) -> bool {
        self.revolver_mut().map_or(false, RevolverAction::close_cylinder)
    }

    /// Push the extractor rod; call every tick it is held
    pub fn extractor_rod(&mut self) -> bool {
        self.revolver_mut().map_or(false, RevolverAction::extractor_rod)
    }

    /// Queue a cylinder spin of `how_many` chambers
    pub fn rotate_cylinder(&mut self, how_many: i32) {
        let max_offset = self.config.max_cylinder_offset;
        if let Some(action) = self.revolver_mut() {
            action.rotate_cylinder(how_many, max_offset);
        }
    }

    /// Load one round into the open cylinder
    pub fn add_round_to_cylinder(&mut self, rng: &mut SimRng) -> bool {
        let hammer_cocked = self.is_hammer_cocked();
        let Mechanism::Revolver(action) = &mut self.mechanism else {
            return false;
        };
        let mut cx = Cycle {
            config: &self.config,
            rng,
            events: &mut self.events,
        };
        action.add_round_to_cylinder(hammer_cocked, &mut cx)
    }

    // ---- magazine ----

    /// Start seating a magazine; hands it back if the well is occupied
    pub fn insert_mag(&mut self, magazine: Magazine) -> Result<(), Magazine> {
        let Some(action) = self.automatic_mut() else {
            log::warn!("magazine {} offered to a gun without a well", magazine.id());
            return Err(magazine);
        };
        action.insert_mag(magazine)?;
        self.click(SoundCue::MagInsertion, 1.0);
        Ok(())
    }

    /// Press the magazine release; true if a magazine starts sliding out
    pub fn mag_eject(&mut self) -> bool {
        if self.automatic().is_none() {
            return false;
        }
        self.click(SoundCue::MagEjectButton, 1.0);
        let ejecting = self.automatic_mut().map_or(false, AutomaticAction::mag_eject);
        if ejecting {
            self.click(SoundCue::MagEjection, 1.0);
        }
        ejecting
    }

    /// Take the magazine out of the gun
    pub fn remove_mag(&mut self) -> Option<Magazine> {
        self.automatic_mut()?.remove_mag()
    }

    /// Seated magazine, for loading through the well
    pub fn magazine_mut(&mut self) -> Option<&mut Magazine> {
        self.automatic_mut()?.magazine_mut()
    }

    // ---- per tick ----

    /// Advance every moving part by `dt` seconds
    pub fn advance(&mut self, dt: f32, rng: &mut SimRng) {
        let mut cx = Cycle {
            config: &self.config,
            rng,
            events: &mut self.events,
        };

        if self.trigger.cocking {
            self.trigger.cocking = false;
            let amount = cx.config.hammer_rate * cx.config.double_action_cock_multiplier * dt;
            cock_hammer(&mut self.hammer, &mut self.mechanism, amount, &mut cx);
        }
        if self.hammer.thumb_cocking {
            self.hammer.thumb_cocking = false;
            let amount = cx.config.hammer_rate * dt;
            cock_hammer(&mut self.hammer, &mut self.mechanism, amount, &mut cx);
        }

        self.mechanism.action_mut().advance_cycle(dt, &mut cx);

        if let Some(auto_mod) = self.auto_mod.as_mut() {
            let step = dt * cx.config.auto_mod_rate;
            auto_mod.amount = if auto_mod.enabled {
                (auto_mod.amount + step).min(1.0)
            } else {
                (auto_mod.amount - step).max(0.0)
            };
        }

        if self.archetype.has_hammer && self.hammer.thumb == Thumb::SlowLowering {
            self.hammer.cocked -= dt * cx.config.hammer_rate;
            if self.hammer.cocked <= 0.0 {
                self.hammer.cocked = 0.0;
                self.hammer.thumb = Thumb::OffHammer;
                cx.click(SoundCue::HammerDecock, 1.0);
            }
        }

        let released = self.hammer.thumb == Thumb::OffHammer
            && (self.trigger.pressure == TriggerPressure::None
                || self.archetype.action == ActionType::Single);
        self.hammer.cocked = self
            .mechanism
            .action()
            .couple_hammer(self.hammer.cocked, released);

        if let Some(safety) = self.safety.as_mut() {
            let step = dt * cx.config.safety_rate;
            safety.off_amount = if safety.engaged {
                (safety.off_amount - step).max(0.0)
            } else {
                (safety.off_amount + step).min(1.0)
            };
        }

        self.mechanism
            .action_mut()
            .advance_settle(dt, self.hammer.cocked, &mut cx);
    }

    /// Take every event queued since the last drain
    pub fn drain_events(&mut self) -> Vec<WeaponEvent> {
        std::mem::take(&mut self.events)
    }

    /// Events queued since the last drain
    pub fn events(&self) -> &[WeaponEvent] {
        &self.events
    }

    /// Travel of every moving part for display
    pub fn mechanism_pose(&self) -> MechanismPose {
        let mut pose = MechanismPose {
            slide: self.slide_amount(),
            hammer: self.hammer.cocked,
            safety_off: self.safety_off(),
            auto_mod: self.auto_mod.map_or(0.0, |auto_mod| auto_mod.amount),
            ..Default::default()
        };
        match &self.mechanism {
            Mechanism::Automatic(action) => {
                pose.mag_seated = action.mag_seated();
            }
            Mechanism::Revolver(action) => {
                pose.yolk_open = action.yolk_open();
                pose.cylinder_rotation = action.cylinder_rotation();
                pose.extractor_rod = action.extractor_rod_amount();
                pose.chamber_seating = action.chambers().iter().map(|c| c.seated).collect();
            }
        }
        if self.config.snap_display {
            pose.snapped(self.config.press_check_position)
        } else {
            pose
        }
    }

    // ---- queries ----

    pub fn should_pull_slide(&self) -> bool {
        self.automatic().map_or(false, AutomaticAction::should_pull_slide)
    }

    pub fn should_release_slide_lock(&self) -> bool {
        self.automatic()
            .map_or(false, AutomaticAction::should_release_slide_lock)
    }

    pub fn should_eject_mag(&self) -> bool {
        self.automatic().map_or(false, AutomaticAction::should_eject_mag)
    }

    pub fn is_slide_locked(&self) -> bool {
        self.mechanism.action().is_slide_locked()
    }

    pub fn is_slide_pulled_back(&self) -> bool {
        self.automatic()
            .map_or(false, AutomaticAction::is_slide_pulled_back)
    }

    pub fn is_there_a_mag_in_gun(&self) -> bool {
        self.automatic()
            .map_or(false, |action| action.magazine().is_some())
    }

    pub fn is_mag_currently_ejecting(&self) -> bool {
        self.automatic()
            .map_or(false, AutomaticAction::is_mag_currently_ejecting)
    }

    /// The magazine has slid out and waits for [`Weapon::remove_mag`]
    pub fn ready_to_remove_mag(&self) -> bool {
        self.automatic()
            .map_or(false, AutomaticAction::ready_to_remove_mag)
    }

    pub fn is_press_check(&self) -> bool {
        self.automatic()
            .map_or(false, |action| action.is_press_check(&self.config))
    }

    pub fn is_adding_rounds(&self) -> bool {
        self.revolver().map_or(false, RevolverAction::is_adding_rounds)
    }

    pub fn is_ejecting_rounds(&self) -> bool {
        self.revolver().map_or(false, RevolverAction::is_ejecting_rounds)
    }

    pub fn is_cylinder_open(&self) -> bool {
        self.revolver().map_or(false, RevolverAction::is_cylinder_open)
    }

    pub fn should_open_cylinder(&self) -> bool {
        self.revolver()
            .map_or(false, RevolverAction::should_open_cylinder)
    }

    pub fn should_close_cylinder(&self) -> bool {
        self.revolver()
            .map_or(false, RevolverAction::should_close_cylinder)
    }

    pub fn should_extract_casings(&self) -> bool {
        self.revolver()
            .map_or(false, RevolverAction::should_extract_casings)
    }

    pub fn should_insert_bullet(&self) -> bool {
        self.revolver()
            .map_or(false, RevolverAction::should_insert_bullet)
    }

    pub fn is_safety_on(&self) -> bool {
        self.safety.map_or(false, |safety| safety.engaged)
    }

    pub fn has_slide(&self) -> bool {
        self.archetype.has_slide()
    }

    pub fn has_safety(&self) -> bool {
        self.safety.is_some()
    }

    pub fn has_hammer(&self) -> bool {
        self.archetype.has_hammer
    }

    pub fn has_auto_mod(&self) -> bool {
        self.auto_mod.is_some()
    }

    /// Full-auto is currently enabled
    pub fn should_toggle_auto_mod(&self) -> bool {
        self.auto_mod.map_or(false, |auto_mod| auto_mod.enabled)
    }

    pub fn is_hammer_cocked(&self) -> bool {
        self.hammer.cocked == 1.0
    }

    pub fn should_pull_back_hammer(&self) -> bool {
        self.hammer.cocked != 1.0
            && self.archetype.has_hammer
            && self.archetype.action == ActionType::Single
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m1911() -> Weapon {
        Weapon::new(
            ObjectId::from_raw(1),
            WeaponArchetype::m1911(),
            WeaponConfig::default(),
        )
    }

    #[test]
    fn test_new_weapon_defaults() {
        let weapon = m1911();
        assert!(weapon.is_hammer_cocked());
        assert!(!weapon.is_safety_on());
        assert_eq!(weapon.safety_off(), 1.0);
        assert!(!weapon.is_there_a_mag_in_gun());
        assert!(weapon.has_slide());
    }

    #[test]
    fn test_safety_requires_cocked_hammer() {
        let mut weapon = m1911().with_hammer_down();
        weapon.toggle_safety();
        assert!(!weapon.is_safety_on());

        let mut weapon = m1911();
        weapon.toggle_safety();
        assert!(weapon.is_safety_on());
        weapon.toggle_safety();
        assert!(!weapon.is_safety_on());
        assert_eq!(weapon.drain_events().len(), 2);
    }

    #[test]
    fn test_safety_lever_travels() {
        let mut rng = SimRng::seed_from_u64(1);
        let mut weapon = m1911();
        weapon.toggle_safety();
        for _ in 0..10 {
            weapon.advance(1.0 / 60.0, &mut rng);
        }
        assert_eq!(weapon.safety_off(), 0.0);
    }

    #[test]
    fn test_revolver_commands_ignored_on_automatic() {
        let mut rng = SimRng::seed_from_u64(1);
        let mut weapon = m1911();
        assert!(!weapon.swing_out_cylinder());
        assert!(!weapon.add_round_to_cylinder(&mut rng));
        assert!(!weapon.should_open_cylinder());
        weapon.rotate_cylinder(3);
    }

    #[test]
    fn test_insert_mag_rejects_second() {
        let mut weapon = m1911().with_magazine(Magazine::new(ObjectId::from_raw(2), 8));
        let spare = Magazine::new(ObjectId::from_raw(3), 8);
        let returned = weapon.insert_mag(spare).unwrap_err();
        assert_eq!(returned.id(), ObjectId::from_raw(3));
    }

    #[test]
    fn test_revolver_rejects_magazine() {
        let mut weapon = Weapon::new(
            ObjectId::from_raw(1),
            WeaponArchetype::model10(),
            WeaponConfig::default(),
        );
        assert!(weapon.insert_mag(Magazine::new(ObjectId::from_raw(2), 8)).is_err());
        assert!(weapon.remove_mag().is_none());
        assert!(!weapon.mag_eject());
    }

    #[test]
    fn test_thumb_cocks_hammer() {
        let mut rng = SimRng::seed_from_u64(1);
        let mut weapon = m1911().with_hammer_down();
        for _ in 0..8 {
            weapon.pressure_on_hammer();
            weapon.advance(1.0 / 60.0, &mut rng);
        }
        assert!(weapon.is_hammer_cocked());
        assert!(weapon
            .events()
            .iter()
            .any(|e| e.cue() == Some(SoundCue::HammerCock)));
        weapon.release_hammer();
        assert_eq!(weapon.thumb(), Thumb::OffHammer);
    }

    #[test]
    fn test_partial_hammer_eases_down() {
        let mut rng = SimRng::seed_from_u64(1);
        let mut weapon = m1911().with_hammer_down();
        weapon.pressure_on_hammer();
        weapon.advance(1.0 / 60.0, &mut rng);
        weapon.release_hammer();
        assert_eq!(weapon.thumb(), Thumb::SlowLowering);
        for _ in 0..5 {
            weapon.advance(1.0 / 60.0, &mut rng);
        }
        assert_eq!(weapon.hammer_cocked(), 0.0);
        assert_eq!(weapon.thumb(), Thumb::OffHammer);
    }

    #[test]
    fn test_spawn_is_reproducible() {
        let ids = IdAllocator::new();
        let mut a = SimRng::seed_from_u64(42);
        let mut b = SimRng::seed_from_u64(42);
        let first = Weapon::spawn(WeaponArchetype::m1911(), WeaponConfig::default(), &ids, &mut a);
        let second = Weapon::spawn(WeaponArchetype::m1911(), WeaponConfig::default(), &ids, &mut b);
        assert_eq!(first.hammer_cocked(), second.hammer_cocked());
        assert_eq!(first.is_safety_on(), second.is_safety_on());
        assert_eq!(
            first.automatic().and_then(|a| a.magazine()).map(Magazine::num_rounds),
            second.automatic().and_then(|a| a.magazine()).map(Magazine::num_rounds)
        );
        assert!(first.is_there_a_mag_in_gun());
    }

    #[test]
    fn test_spawned_safety_closes_slide() {
        let ids = IdAllocator::new();
        for seed in 0..64 {
            let mut rng = SimRng::seed_from_u64(seed);
            let weapon =
                Weapon::spawn(WeaponArchetype::m1911(), WeaponConfig::default(), &ids, &mut rng);
            if weapon.is_safety_on() {
                assert_eq!(weapon.slide_amount(), 0.0);
                assert!(!weapon.is_slide_locked());
            }
        }
    }

    #[test]
    fn test_mechanism_pose_snaps() {
        let config = WeaponConfig::default().with_snap_display(true);
        let mut weapon = Weapon::new(ObjectId::from_raw(1), WeaponArchetype::m1911(), config)
            .with_magazine(Magazine::new(ObjectId::from_raw(2), 8));
        let mut rng = SimRng::seed_from_u64(1);
        weapon.mag_eject();
        weapon.advance(1.0 / 60.0, &mut rng);
        let pose = weapon.mechanism_pose();
        assert_eq!(pose.mag_seated, 1.0);
    }
}
