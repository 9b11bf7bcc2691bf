//! Slide, chamber and magazine well of an automatic pistol

use crate::action::{Action, Cycle};
use crate::config::{GunKind, WeaponConfig};
use crate::events::{Cartridge, RecoilImpulse, SoundCue, WeaponEvent};
use crate::magazine::Magazine;
use receiver_math::Vec3;
use serde::{Deserialize, Serialize};

/// State of the round in the chamber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundState {
    Empty,
    Ready,
    Fired,
    /// Stripped from the magazine, not yet in battery
    Loading,
    /// Reserved; nothing currently jams a round
    Jammed,
}

/// What the hand is doing to the slide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlideStage {
    /// Released; the recoil spring returns it
    Nothing,
    /// Being pulled back
    Pullback,
    /// Held where it stopped
    Hold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MagStage {
    Out,
    Inserting,
    In,
    Removing,
}

/// Mechanism of an automatic
#[derive(Debug, Clone)]
pub struct AutomaticAction {
    slide_amount: f32,
    slide_stage: SlideStage,
    slide_lock: bool,
    slide_pressure: bool,
    chamber: Option<RoundState>,
    magazine: Option<Magazine>,
    mag_stage: MagStage,
    mag_seated: f32,
    ready_to_remove_mag: bool,
}

impl AutomaticAction {
    /// Slide forward, chamber empty, no magazine
    pub fn new() -> Self {
        Self {
            slide_amount: 0.0,
            slide_stage: SlideStage::Nothing,
            slide_lock: false,
            slide_pressure: false,
            chamber: None,
            magazine: None,
            mag_stage: MagStage::Out,
            mag_seated: 0.0,
            ready_to_remove_mag: false,
        }
    }

    pub fn slide_stage(&self) -> SlideStage {
        self.slide_stage
    }

    /// Round in the chamber, if any
    pub fn chambered_round(&self) -> Option<RoundState> {
        self.chamber
    }

    pub fn magazine(&self) -> Option<&Magazine> {
        self.magazine.as_ref()
    }

    pub fn mag_stage(&self) -> MagStage {
        self.mag_stage
    }

    pub fn mag_seated(&self) -> f32 {
        self.mag_seated
    }

    pub fn ready_to_remove_mag(&self) -> bool {
        self.ready_to_remove_mag
    }

    fn mag_rounds(&self) -> u32 {
        self.magazine.as_ref().map_or(0, Magazine::num_rounds)
    }

    pub(crate) fn seat_magazine(&mut self, magazine: Magazine) {
        self.magazine = Some(magazine);
        self.mag_stage = MagStage::In;
        self.mag_seated = 1.0;
    }

    pub(crate) fn set_chambered(&mut self, round: Option<RoundState>) {
        self.chamber = round;
    }

    pub(crate) fn lock_open(&mut self, position: f32) {
        self.slide_amount = position;
        self.slide_lock = true;
    }

    pub(crate) fn close_slide(&mut self) {
        self.slide_amount = 0.0;
        self.slide_lock = false;
    }

    /// Strip a round from a seated magazine into an empty chamber.
    /// True when the magazine had a round to offer.
    fn chamber_round_from_mag(&mut self) -> bool {
        if self.mag_stage != MagStage::In {
            return false;
        }
        let Some(magazine) = self.magazine.as_mut() else {
            return false;
        };
        if magazine.num_rounds() == 0 {
            return false;
        }
        if self.chamber.is_none() {
            magazine.remove_round();
            self.chamber = Some(RoundState::Loading);
        }
        true
    }

    /// Slide reached full travel: extract, eject and try to feed
    fn pull_slide_back(&mut self, cx: &mut Cycle<'_>) {
        self.slide_amount = 1.0;
        if self.slide_lock && self.mag_stage == MagStage::In && self.mag_rounds() == 0 {
            return;
        }
        self.slide_lock = false;
        if let Some(state @ (RoundState::Fired | RoundState::Ready)) = self.chamber {
            cx.click(SoundCue::BulletEject, 1.0);
            let local_velocity = Vec3::new(
                cx.rng.range_f32(2.0, 4.0),
                cx.rng.range_f32(1.0, 2.0),
                cx.rng.range_f32(-3.0, -1.0),
            );
            let angular_velocity = Vec3::new(
                cx.rng.range_f32(-40.0, 40.0),
                cx.rng.range_f32(-40.0, 40.0),
                cx.rng.range_f32(-40.0, 40.0),
            );
            cx.emit(WeaponEvent::RoundEjected {
                cartridge: if state == RoundState::Fired {
                    Cartridge::Spent
                } else {
                    Cartridge::Live
                },
                chamber: None,
                local_velocity,
                angular_velocity,
            });
            self.chamber = None;
        }
        if !self.chamber_round_from_mag() && self.mag_stage == MagStage::In {
            log::debug!("slide locked back on empty magazine");
            self.slide_lock = true;
        }
    }

    /// Grab the slide. A safety that is on keeps it from moving.
    pub(crate) fn pull_back_slide(&mut self, safety_on: bool) {
        if self.slide_stage != SlideStage::Pullback && !safety_on {
            self.slide_stage = SlideStage::Pullback;
            self.slide_lock = false;
        }
        self.slide_pressure = true;
    }

    pub(crate) fn release_slide(&mut self) {
        self.slide_stage = SlideStage::Nothing;
        self.slide_pressure = false;
    }

    pub(crate) fn release_slide_lock(&mut self) {
        self.slide_lock = false;
    }

    pub(crate) fn try_to_release_slide_lock(&mut self, config: &WeaponConfig) {
        if self.slide_amount == config.slide_lock_position {
            self.release_slide_lock();
        }
    }

    pub(crate) fn pressure_on_slide_lock(&mut self, config: &WeaponConfig) {
        if self.slide_amount > config.press_check_position
            && self.slide_stage == SlideStage::Pullback
        {
            self.slide_lock = true;
        } else if self.slide_amount > config.slide_lock_position {
            self.slide_lock = true;
        }
    }

    pub(crate) fn release_pressure_on_slide_lock(&mut self, config: &WeaponConfig) {
        if self.slide_amount == config.press_check_position {
            self.slide_lock = false;
            if self.slide_pressure {
                self.slide_stage = SlideStage::Pullback;
            }
        } else if self.slide_amount == 1.0 {
            self.slide_lock = false;
        }
    }

    /// Start the magazine sliding out; false when the well is already empty
    pub(crate) fn mag_eject(&mut self) -> bool {
        if self.mag_stage != MagStage::Out {
            self.mag_stage = MagStage::Removing;
            return true;
        }
        false
    }

    pub(crate) fn insert_mag(&mut self, magazine: Magazine) -> Result<(), Magazine> {
        if self.magazine.is_some() {
            return Err(magazine);
        }
        self.magazine = Some(magazine);
        self.mag_stage = MagStage::Inserting;
        self.mag_seated = 0.0;
        Ok(())
    }

    pub(crate) fn remove_mag(&mut self) -> Option<Magazine> {
        let magazine = self.magazine.take()?;
        self.ready_to_remove_mag = false;
        Some(magazine)
    }

    pub(crate) fn magazine_mut(&mut self) -> Option<&mut Magazine> {
        self.magazine.as_mut()
    }

    pub fn should_pull_slide(&self) -> bool {
        self.chamber.is_none() && self.mag_rounds() > 0
    }

    pub fn should_release_slide_lock(&self) -> bool {
        self.chamber.is_some() && self.slide_lock
    }

    pub fn should_eject_mag(&self) -> bool {
        self.magazine.is_some() && self.mag_rounds() == 0
    }

    pub fn is_slide_pulled_back(&self) -> bool {
        self.slide_stage != SlideStage::Nothing
    }

    pub fn is_mag_currently_ejecting(&self) -> bool {
        self.mag_stage == MagStage::Removing
    }

    pub fn is_press_check(&self, config: &WeaponConfig) -> bool {
        self.slide_amount <= config.press_check_position
            && ((self.slide_stage == SlideStage::Pullback && self.slide_lock)
                || self.slide_stage == SlideStage::Hold)
    }

    fn advance_magazine(&mut self, dt: f32, cx: &mut Cycle<'_>) {
        match self.mag_stage {
            MagStage::Inserting => {
                self.mag_seated += dt * cx.config.mag_seat_rate;
                if self.mag_seated >= 1.0 {
                    self.mag_seated = 1.0;
                    self.mag_stage = MagStage::In;
                    log::debug!("magazine seated");
                    if self.slide_amount > cx.config.chamber_on_seat_threshold {
                        self.chamber_round_from_mag();
                    }
                    let impulse = RecoilImpulse {
                        recoil_y: cx.rng.range_f32(-40.0, 40.0),
                        recoil_x: cx.rng.range_f32(50.0, 300.0),
                        rotation_x: cx.rng.range_f32(-0.4, 0.4),
                        rotation_y: cx.rng.range_f32(0.0, 1.0),
                        head_recoil: false,
                    };
                    cx.emit(WeaponEvent::Recoil(impulse));
                }
            }
            MagStage::Removing => {
                self.mag_seated -= dt * cx.config.mag_seat_rate;
                if self.mag_seated <= 0.0 {
                    self.mag_seated = 0.0;
                    self.ready_to_remove_mag = true;
                    self.mag_stage = MagStage::Out;
                    log::debug!("magazine dropped free of the well");
                }
            }
            MagStage::Out | MagStage::In => {}
        }
    }

    fn advance_pullback(&mut self, dt: f32, cx: &mut Cycle<'_>) {
        if self.slide_stage != SlideStage::Pullback {
            return;
        }
        let lock_position = cx.config.slide_lock_position;
        let press_check = cx.config.press_check_position;
        self.slide_amount += dt * cx.config.slide_pull_rate;
        // The press-check stop below overrides this one whenever the lock is held
        if self.slide_amount >= lock_position && self.slide_lock {
            self.slide_amount = lock_position;
            self.slide_stage = SlideStage::Hold;
            cx.click(SoundCue::SlideBack, 1.0);
        }
        if self.slide_amount >= press_check && self.slide_lock {
            self.slide_amount = press_check;
            self.slide_stage = SlideStage::Hold;
            self.slide_lock = false;
            cx.click(SoundCue::SlideBack, 1.0);
        }
        if self.slide_amount >= 1.0 {
            self.pull_slide_back(cx);
            self.slide_stage = SlideStage::Hold;
            cx.click(SoundCue::SlideBack, 1.0);
        }
    }

    fn advance_return(&mut self, dt: f32, cx: &mut Cycle<'_>) {
        if self.slide_stage != SlideStage::Nothing {
            return;
        }
        let lock_position = cx.config.slide_lock_position;
        let old_amount = self.slide_amount;
        self.slide_amount = (self.slide_amount - dt * cx.config.slide_return_rate).max(0.0);
        if !self.slide_lock && self.slide_amount == 0.0 && old_amount != 0.0 {
            cx.click(SoundCue::SlideFront, 1.5);
        }
        if self.slide_amount == 0.0 && self.chamber == Some(RoundState::Loading) {
            self.chamber = Some(RoundState::Ready);
        }
        if self.slide_lock && old_amount >= lock_position {
            self.slide_amount = self.slide_amount.max(lock_position);
            if old_amount != lock_position && self.slide_amount == lock_position {
                cx.click(SoundCue::SlideFront, 1.0);
            }
        }
    }
}

impl Default for AutomaticAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for AutomaticAction {
    fn kind(&self) -> GunKind {
        GunKind::Automatic
    }

    fn blocks_trigger(&self) -> bool {
        false
    }

    fn blocks_hammer(&self) -> bool {
        false
    }

    fn is_slide_locked(&self) -> bool {
        self.slide_lock
    }

    fn slide_amount(&self) -> f32 {
        self.slide_amount
    }

    fn in_battery(&self) -> bool {
        self.slide_amount == 0.0
    }

    fn discharge(&mut self, cx: &mut Cycle<'_>) -> bool {
        if self.chamber != Some(RoundState::Ready) {
            cx.sound(SoundCue::DryFire, 0.5);
            return false;
        }
        cx.sound(SoundCue::Gunshot, 1.0);
        self.chamber = Some(RoundState::Fired);
        cx.emit(WeaponEvent::CasingFormed { chamber: None });
        cx.shot();
        self.pull_slide_back(cx);
        cx.shot_recoil();
        true
    }

    fn on_hammer_moved(&mut self, _cocked: f32, _just_cocked: bool) {}

    fn couple_hammer(&self, cocked: f32, released: bool) -> f32 {
        let mut cocked = cocked.max(self.slide_amount);
        if cocked != 1.0 && released {
            cocked = cocked.min(self.slide_amount);
        }
        cocked
    }

    fn advance_cycle(&mut self, dt: f32, cx: &mut Cycle<'_>) {
        self.advance_magazine(dt, cx);
        if let Some(magazine) = self.magazine.as_mut() {
            magazine.advance(dt);
        }
        self.advance_pullback(dt, cx);
    }

    fn advance_settle(&mut self, dt: f32, _hammer_cocked: f32, cx: &mut Cycle<'_>) {
        self.advance_return(dt, cx);
    }
}
