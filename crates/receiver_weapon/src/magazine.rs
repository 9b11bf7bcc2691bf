//! Detachable box magazine

use receiver_core::{ObjectId, SimRng};
use serde::{Deserialize, Serialize};

/// Stage of the round loading/unloading animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MagLoadStage {
    None,
    PushingDown,
    AddingRound,
    RemovingRound,
    PushingUp,
}

impl Default for MagLoadStage {
    fn default() -> Self {
        Self::None
    }
}

/// A magazine; owned by exactly one of gun, hand, slot or world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Magazine {
    id: ObjectId,
    capacity: u32,
    num_rounds: u32,
    /// Set the first time the player holds this magazine
    pub has_been_held: bool,
    load_stage: MagLoadStage,
    load_progress: f32,
}

impl Magazine {
    /// Stage units per second of the load animation
    pub const ROUND_LOAD_SPEED: f32 = 20.0;

    /// Create an empty magazine
    pub fn new(id: ObjectId, capacity: u32) -> Self {
        Self {
            id,
            capacity,
            num_rounds: 0,
            has_been_held: false,
            load_stage: MagLoadStage::None,
            load_progress: 0.0,
        }
    }

    /// Create a magazine with a random fill below capacity
    pub fn spawn(id: ObjectId, capacity: u32, rng: &mut SimRng) -> Self {
        let rounds = rng.range_i32(0, capacity as i32).max(0) as u32;
        Self::new(id, capacity).with_rounds(rounds)
    }

    /// Set the round count, clamped to capacity
    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.num_rounds = rounds.min(self.capacity);
        self
    }

    /// Mark as already held
    pub fn with_held(mut self) -> Self {
        self.has_been_held = true;
        self
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn num_rounds(&self) -> u32 {
        self.num_rounds
    }

    pub fn is_full(&self) -> bool {
        self.num_rounds == self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.num_rounds == 0
    }

    pub fn load_stage(&self) -> MagLoadStage {
        self.load_stage
    }

    /// Progress through the current load stage
    pub fn load_progress(&self) -> f32 {
        self.load_progress
    }

    /// True while a round is being pushed in or pulled out
    pub fn is_animating(&self) -> bool {
        self.load_stage != MagLoadStage::None
    }

    /// Remove the top round immediately
    pub fn remove_round(&mut self) -> bool {
        if self.num_rounds == 0 {
            return false;
        }
        self.num_rounds -= 1;
        true
    }

    /// Start removing the top round; it leaves at the end of the push-up
    pub fn remove_round_animated(&mut self) -> bool {
        if self.num_rounds == 0 || self.is_animating() {
            return false;
        }
        self.load_stage = MagLoadStage::RemovingRound;
        self.load_progress = 0.0;
        true
    }

    /// Push one round in; fails when full or mid-animation
    pub fn add_round(&mut self) -> bool {
        if self.num_rounds >= self.capacity || self.is_animating() {
            return false;
        }
        self.num_rounds += 1;
        self.load_stage = MagLoadStage::PushingDown;
        self.load_progress = 0.0;
        true
    }

    /// Advance the load animation
    pub fn advance(&mut self, dt: f32) {
        if self.load_stage == MagLoadStage::None {
            return;
        }
        self.load_progress += dt * Self::ROUND_LOAD_SPEED;
        if self.load_progress < 1.0 {
            return;
        }
        self.load_progress = 0.0;
        self.load_stage = match self.load_stage {
            MagLoadStage::PushingDown => MagLoadStage::AddingRound,
            MagLoadStage::RemovingRound => MagLoadStage::PushingUp,
            MagLoadStage::PushingUp => {
                self.remove_round();
                MagLoadStage::None
            }
            MagLoadStage::AddingRound | MagLoadStage::None => MagLoadStage::None,
        };
    }
}
