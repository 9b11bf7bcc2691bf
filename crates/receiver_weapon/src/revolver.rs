//! Swing-out cylinder, yolk and extractor rod of a revolver

use crate::action::{Action, Cycle};
use crate::config::GunKind;
use crate::events::{Cartridge, SoundCue, WeaponEvent};
use receiver_core::SimRng;
use receiver_math::{lerp, Vec3};
use serde::{Deserialize, Serialize};

/// Travel of the yolk or the extractor rod
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwingStage {
    Closed,
    Opening,
    Open,
    Closing,
}

/// One chamber of the cylinder
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Chamber {
    /// Cartridge sitting in the chamber
    pub round: Option<Cartridge>,
    /// A live round waits here
    pub can_fire: bool,
    /// How deep the cartridge sits; zero means it drops out
    pub seated: f32,
    /// Sliding out under the extractor
    pub falling: bool,
}

impl Chamber {
    fn live(seated: f32) -> Self {
        Self {
            round: Some(Cartridge::Live),
            can_fire: true,
            seated,
            falling: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.round.is_none()
    }
}

/// Mechanism of a revolver.
///
/// `active_cylinder` is a running count of chamber advances and is never
/// wrapped; the chamber under the hammer is its euclidean remainder.
#[derive(Debug, Clone)]
pub struct RevolverAction {
    chambers: Vec<Chamber>,
    active_cylinder: i64,
    target_cylinder_offset: i32,
    cylinder_rotation: f32,
    yolk_stage: SwingStage,
    yolk_open: f32,
    extractor_rod_stage: SwingStage,
    extractor_rod_amount: f32,
    extracted: bool,
}

impl RevolverAction {
    /// Cylinder closed with every chamber empty
    pub fn new(capacity: usize) -> Self {
        Self {
            chambers: vec![Chamber::default(); capacity.max(1)],
            active_cylinder: 0,
            target_cylinder_offset: 0,
            cylinder_rotation: 0.0,
            yolk_stage: SwingStage::Closed,
            yolk_open: 0.0,
            extractor_rod_stage: SwingStage::Closed,
            extractor_rod_amount: 0.0,
            extracted: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.chambers.len()
    }

    pub fn chambers(&self) -> &[Chamber] {
        &self.chambers
    }

    pub fn active_cylinder(&self) -> i64 {
        self.active_cylinder
    }

    /// Chamber index `offset` positions after the one under the hammer
    pub fn chamber_index(&self, offset: i64) -> usize {
        (self.active_cylinder + offset).rem_euclid(self.capacity() as i64) as usize
    }

    /// Chamber under the hammer
    pub fn active_chamber(&self) -> usize {
        self.chamber_index(0)
    }

    pub fn target_cylinder_offset(&self) -> i32 {
        self.target_cylinder_offset
    }

    /// Cylinder angle in degrees
    pub fn cylinder_rotation(&self) -> f32 {
        self.cylinder_rotation
    }

    pub fn yolk_stage(&self) -> SwingStage {
        self.yolk_stage
    }

    pub fn yolk_open(&self) -> f32 {
        self.yolk_open
    }

    pub fn extractor_rod_stage(&self) -> SwingStage {
        self.extractor_rod_stage
    }

    pub fn extractor_rod_amount(&self) -> f32 {
        self.extractor_rod_amount
    }

    fn degrees_per_chamber(&self) -> f32 {
        360.0 / self.capacity() as f32
    }

    fn firable_count(&self) -> usize {
        self.chambers.iter().filter(|c| c.can_fire).count()
    }

    pub(crate) fn load_chamber(&mut self, index: usize, seated: f32) {
        if let Some(chamber) = self.chambers.get_mut(index) {
            *chamber = Chamber::live(seated);
        }
    }

    pub(crate) fn spawn_chambers(&mut self, rng: &mut SimRng) {
        for index in 0..self.capacity() {
            if rng.coin() {
                continue;
            }
            let seated = rng.range_f32(0.0, 0.5);
            self.load_chamber(index, seated);
        }
    }

    pub(crate) fn swing_out_cylinder(&mut self) -> bool {
        if matches!(self.yolk_stage, SwingStage::Closed | SwingStage::Closing) {
            self.yolk_stage = SwingStage::Opening;
            return true;
        }
        false
    }

    pub(crate) fn close_cylinder(&mut self) -> bool {
        let rod_clear =
            self.extractor_rod_stage == SwingStage::Closed && self.yolk_stage == SwingStage::Open;
        if rod_clear || self.yolk_stage == SwingStage::Opening {
            self.yolk_stage = SwingStage::Closing;
            return true;
        }
        false
    }

    /// Push the extractor rod; it springs back on any tick it is not pushed
    pub(crate) fn extractor_rod(&mut self) -> bool {
        let can_start =
            self.yolk_stage == SwingStage::Open && self.extractor_rod_stage == SwingStage::Closed;
        if can_start || self.extractor_rod_stage == SwingStage::Closing {
            self.extractor_rod_stage = SwingStage::Opening;
            if self.extractor_rod_amount < 1.0 {
                self.extracted = false;
            }
            return true;
        }
        false
    }

    /// Queue a spin; repeated spins in one direction accelerate
    pub(crate) fn rotate_cylinder(&mut self, how_many: i32, max_offset: i32) {
        let step = self.target_cylinder_offset.abs().max(1);
        self.target_cylinder_offset = (self.target_cylinder_offset + how_many * step)
            .clamp(-max_offset, max_offset);
    }

    /// Load a round into the first empty chamber from the next one to fire
    pub(crate) fn add_round_to_cylinder(
        &mut self,
        hammer_cocked: bool,
        cx: &mut Cycle<'_>,
    ) -> bool {
        if self.yolk_stage != SwingStage::Open {
            return false;
        }
        let start = if hammer_cocked { 0 } else { 1 };
        let capacity = self.capacity() as i64;
        let Some(index) = (0..capacity)
            .map(|i| self.chamber_index(start + i))
            .find(|&index| self.chambers[index].is_empty())
        else {
            return false;
        };
        let seated = cx.rng.range_f32(0.0, 1.0);
        self.load_chamber(index, seated);
        cx.click(SoundCue::BulletEject, 1.0);
        true
    }

    pub fn is_adding_rounds(&self) -> bool {
        self.yolk_stage == SwingStage::Open
    }

    pub fn is_ejecting_rounds(&self) -> bool {
        self.extractor_rod_stage != SwingStage::Closed
    }

    pub fn is_cylinder_open(&self) -> bool {
        matches!(self.yolk_stage, SwingStage::Open | SwingStage::Opening)
    }

    pub fn should_open_cylinder(&self) -> bool {
        self.firable_count() != self.capacity()
    }

    pub fn should_close_cylinder(&self) -> bool {
        self.firable_count() == self.capacity()
    }

    pub fn should_extract_casings(&self) -> bool {
        self.chambers
            .iter()
            .any(|c| c.round.is_some() && !c.can_fire)
    }

    pub fn should_insert_bullet(&self) -> bool {
        self.chambers.iter().any(Chamber::is_empty)
    }

    fn advance_spin(&mut self, dt: f32, hammer_cocked: f32, cx: &mut Cycle<'_>) {
        if self.yolk_stage == SwingStage::Closed && hammer_cocked == 1.0 {
            self.target_cylinder_offset = 0;
        }
        if self.target_cylinder_offset == 0 {
            return;
        }
        let per_chamber = self.degrees_per_chamber();
        let target = (self.active_cylinder + self.target_cylinder_offset as i64) as f32 * per_chamber;
        self.cylinder_rotation = lerp(
            target,
            self.cylinder_rotation,
            cx.config.cylinder_settle_base.powf(dt),
        );
        let closed = self.yolk_stage == SwingStage::Closed;
        if self.cylinder_rotation > (self.active_cylinder as f32 + 0.5) * per_chamber {
            self.active_cylinder += 1;
            self.target_cylinder_offset -= 1;
            if closed {
                cx.click(SoundCue::CylinderRotate, 1.0);
            }
        }
        if self.cylinder_rotation < (self.active_cylinder as f32 - 0.5) * per_chamber {
            self.active_cylinder -= 1;
            self.target_cylinder_offset += 1;
            if closed {
                cx.click(SoundCue::CylinderRotate, 1.0);
            }
        }
    }

    fn advance_yolk(&mut self, dt: f32, cx: &mut Cycle<'_>) {
        let rate = cx.config.yolk_rate;
        if self.yolk_stage == SwingStage::Closing {
            self.yolk_open -= dt * rate;
            if self.yolk_open <= 0.0 {
                self.yolk_open = 0.0;
                self.yolk_stage = SwingStage::Closed;
                self.target_cylinder_offset = 0;
                log::debug!("cylinder closed");
                cx.click(SoundCue::CylinderClose, 2.0);
            }
        }
        if self.yolk_stage == SwingStage::Opening {
            self.yolk_open += dt * rate;
            if self.yolk_open >= 1.0 {
                self.yolk_open = 1.0;
                self.yolk_stage = SwingStage::Open;
                log::debug!("cylinder swung out");
                cx.click(SoundCue::CylinderOpen, 2.0);
            }
        }
    }

    /// Decide once per stroke which cartridges the rod shakes loose
    fn shake_loose(&mut self, rng: &mut SimRng) {
        for chamber in self.chambers.iter_mut().filter(|c| c.round.is_some()) {
            if rng.range_f32(0.0, 3.0) > chamber.seated {
                chamber.falling = true;
                chamber.seated -= rng.range_f32(0.0, 0.5);
            } else {
                chamber.falling = false;
            }
        }
    }

    fn advance_extractor(&mut self, dt: f32, cx: &mut Cycle<'_>) {
        let rate = cx.config.extractor_rod_rate;
        if self.extractor_rod_stage == SwingStage::Closing {
            self.extractor_rod_amount -= dt * rate;
            if self.extractor_rod_amount <= 0.0 {
                self.extractor_rod_amount = 0.0;
                self.extractor_rod_stage = SwingStage::Closed;
                cx.click(SoundCue::ExtractorRodClose, 1.0);
            }
            for chamber in self.chambers.iter_mut().filter(|c| c.round.is_some()) {
                chamber.falling = false;
            }
        }
        if self.extractor_rod_stage == SwingStage::Opening {
            let old_amount = self.extractor_rod_amount;
            self.extractor_rod_amount += dt * rate;
            if self.extractor_rod_amount >= 1.0 {
                if !self.extracted {
                    self.shake_loose(&mut *cx.rng);
                    self.extracted = true;
                }
                let fall = dt * cx.config.chamber_fall_rate;
                for index in 0..self.chambers.len() {
                    let chamber = &mut self.chambers[index];
                    let Some(cartridge) = chamber.round else {
                        continue;
                    };
                    if !chamber.falling {
                        continue;
                    }
                    chamber.seated -= fall;
                    if chamber.seated <= 0.0 {
                        chamber.round = None;
                        chamber.can_fire = false;
                        let angular_velocity = Vec3::new(
                            cx.rng.range_f32(-40.0, 40.0),
                            cx.rng.range_f32(-40.0, 40.0),
                            cx.rng.range_f32(-40.0, 40.0),
                        );
                        cx.emit(WeaponEvent::RoundEjected {
                            cartridge,
                            chamber: Some(index),
                            local_velocity: Vec3::ZERO,
                            angular_velocity,
                        });
                    }
                }
                self.extractor_rod_amount = 1.0;
                self.extractor_rod_stage = SwingStage::Open;
                if old_amount < 1.0 {
                    cx.click(SoundCue::ExtractorRodOpen, 1.0);
                }
            }
        }
        if matches!(
            self.extractor_rod_stage,
            SwingStage::Opening | SwingStage::Open
        ) {
            self.extractor_rod_stage = SwingStage::Closing;
        }
    }
}

impl Action for RevolverAction {
    fn kind(&self) -> GunKind {
        GunKind::Revolver
    }

    fn blocks_trigger(&self) -> bool {
        self.yolk_stage != SwingStage::Closed
    }

    fn blocks_hammer(&self) -> bool {
        self.yolk_stage != SwingStage::Closed
    }

    fn is_slide_locked(&self) -> bool {
        false
    }

    fn slide_amount(&self) -> f32 {
        0.0
    }

    fn in_battery(&self) -> bool {
        true
    }

    fn discharge(&mut self, cx: &mut Cycle<'_>) -> bool {
        let index = self.active_chamber();
        let chamber = &mut self.chambers[index];
        if chamber.round.is_none() || !chamber.can_fire {
            cx.sound(SoundCue::DryFire, 0.5);
            return false;
        }
        cx.sound(SoundCue::Gunshot, 1.0);
        chamber.can_fire = false;
        chamber.seated += cx.rng.range_f32(0.0, 0.5);
        chamber.round = Some(Cartridge::Spent);
        cx.emit(WeaponEvent::CasingFormed {
            chamber: Some(index),
        });
        cx.shot();
        cx.shot_recoil();
        true
    }

    fn on_hammer_moved(&mut self, cocked: f32, just_cocked: bool) {
        let per_chamber = self.degrees_per_chamber();
        if just_cocked {
            self.active_cylinder += 1;
            self.cylinder_rotation = self.active_cylinder as f32 * per_chamber;
        }
        if cocked < 1.0 {
            self.cylinder_rotation = (self.active_cylinder as f32 + cocked) * per_chamber;
            self.target_cylinder_offset = 0;
        }
    }

    fn couple_hammer(&self, cocked: f32, released: bool) -> f32 {
        if cocked != 1.0 && cocked != 0.0 && released {
            0.0
        } else {
            cocked
        }
    }

    fn advance_cycle(&mut self, _dt: f32, _cx: &mut Cycle<'_>) {}

    fn advance_settle(&mut self, dt: f32, hammer_cocked: f32, cx: &mut Cycle<'_>) {
        self.advance_spin(dt, hammer_cocked, cx);
        self.advance_yolk(dt, cx);
        self.advance_extractor(dt, cx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WeaponConfig;

    const DT: f32 = 1.0 / 60.0;

    struct Rig {
        config: WeaponConfig,
        rng: SimRng,
        events: Vec<WeaponEvent>,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                config: WeaponConfig::default(),
                rng: SimRng::seed_from_u64(5),
                events: Vec::new(),
            }
        }

        fn cycle(&mut self) -> Cycle<'_> {
            Cycle {
                config: &self.config,
                rng: &mut self.rng,
                events: &mut self.events,
            }
        }
    }

    fn open(revolver: &mut RevolverAction, rig: &mut Rig) {
        revolver.swing_out_cylinder();
        for _ in 0..20 {
            revolver.advance_settle(DT, 1.0, &mut rig.cycle());
        }
        assert_eq!(revolver.yolk_stage(), SwingStage::Open);
    }

    #[test]
    fn test_chamber_index_wraps_negative() {
        let mut revolver = RevolverAction::new(6);
        revolver.active_cylinder = -1;
        assert_eq!(revolver.active_chamber(), 5);
        revolver.active_cylinder = 13;
        assert_eq!(revolver.active_chamber(), 1);
    }

    #[test]
    fn test_add_round_requires_open_yolk() {
        let mut rig = Rig::new();
        let mut revolver = RevolverAction::new(6);
        assert!(!revolver.add_round_to_cylinder(true, &mut rig.cycle()));
        open(&mut revolver, &mut rig);
        assert!(revolver.add_round_to_cylinder(true, &mut rig.cycle()));
        assert_eq!(revolver.chambers()[0].round, Some(Cartridge::Live));
    }

    #[test]
    fn test_add_round_skips_active_when_uncocked() {
        let mut rig = Rig::new();
        let mut revolver = RevolverAction::new(6);
        open(&mut revolver, &mut rig);
        assert!(revolver.add_round_to_cylinder(false, &mut rig.cycle()));
        assert!(revolver.chambers()[0].is_empty());
        assert!(revolver.chambers()[1].can_fire);
    }

    #[test]
    fn test_rotate_cylinder_clamps() {
        let mut revolver = RevolverAction::new(6);
        for _ in 0..10 {
            revolver.rotate_cylinder(1, 12);
        }
        assert_eq!(revolver.target_cylinder_offset(), 12);
        revolver.rotate_cylinder(-1, 12);
        assert_eq!(revolver.target_cylinder_offset(), 0);
    }

    #[test]
    fn test_open_cylinder_spins_to_offset() {
        let mut rig = Rig::new();
        let mut revolver = RevolverAction::new(6);
        open(&mut revolver, &mut rig);
        revolver.rotate_cylinder(1, 12);
        for _ in 0..200 {
            revolver.advance_settle(DT, 1.0, &mut rig.cycle());
        }
        assert_eq!(revolver.active_cylinder(), 1);
        assert_eq!(revolver.target_cylinder_offset(), 0);
    }

    #[test]
    fn test_extractor_springs_back() {
        let mut rig = Rig::new();
        let mut revolver = RevolverAction::new(6);
        assert!(!revolver.extractor_rod());
        open(&mut revolver, &mut rig);
        assert!(revolver.extractor_rod());
        revolver.advance_settle(DT, 1.0, &mut rig.cycle());
        assert_eq!(revolver.extractor_rod_stage(), SwingStage::Closing);
        for _ in 0..30 {
            revolver.advance_settle(DT, 1.0, &mut rig.cycle());
        }
        assert_eq!(revolver.extractor_rod_stage(), SwingStage::Closed);
    }

    #[test]
    fn test_extractor_ejects_loose_rounds() {
        let mut rig = Rig::new();
        let mut revolver = RevolverAction::new(6);
        for index in 0..6 {
            revolver.load_chamber(index, 0.0);
        }
        open(&mut revolver, &mut rig);
        for _ in 0..60 {
            revolver.extractor_rod();
            revolver.advance_settle(DT, 1.0, &mut rig.cycle());
        }
        // zero seating always loses the shake-loose roll
        assert!(revolver.chambers().iter().all(Chamber::is_empty));
        let ejected = rig
            .events
            .iter()
            .filter(|e| matches!(e, WeaponEvent::RoundEjected { .. }))
            .count();
        assert_eq!(ejected, 6);
    }

    #[test]
    fn test_partial_hammer_drops_when_released() {
        let revolver = RevolverAction::new(6);
        assert_eq!(revolver.couple_hammer(0.5, true), 0.0);
        assert_eq!(revolver.couple_hammer(0.5, false), 0.5);
        assert_eq!(revolver.couple_hammer(1.0, true), 1.0);
    }
}
