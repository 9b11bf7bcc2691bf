//! The off hand

use receiver_math::{Pose, Spring};
use receiver_weapon::Magazine;

/// What the off hand holds. A magazine is present in every variant but
/// `Empty`.
#[derive(Debug, Clone, Default)]
pub enum Hand {
    #[default]
    Empty,
    Hold(Magazine),
    /// Moving the magazine up to the gun's well
    HoldToInsert(Magazine),
}

impl Hand {
    pub fn magazine(&self) -> Option<&Magazine> {
        match self {
            Hand::Empty => None,
            Hand::Hold(magazine) | Hand::HoldToInsert(magazine) => Some(magazine),
        }
    }

    pub fn magazine_mut(&mut self) -> Option<&mut Magazine> {
        match self {
            Hand::Empty => None,
            Hand::Hold(magazine) | Hand::HoldToInsert(magazine) => Some(magazine),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Hand::Empty)
    }

    pub fn is_holding(&self) -> bool {
        matches!(self, Hand::Hold(_))
    }

    pub fn is_inserting(&self) -> bool {
        matches!(self, Hand::HoldToInsert(_))
    }

    /// Empty the hand, returning its magazine
    pub fn take(&mut self) -> Option<Magazine> {
        match std::mem::take(self) {
            Hand::Empty => None,
            Hand::Hold(magazine) | Hand::HoldToInsert(magazine) => Some(magazine),
        }
    }

    /// Switch between holding and inserting, keeping the magazine
    pub(crate) fn restage(&mut self, inserting: bool) {
        if let Some(magazine) = self.take() {
            *self = if inserting {
                Hand::HoldToInsert(magazine)
            } else {
                Hand::Hold(magazine)
            };
        }
    }
}

/// Display springs of the off hand.
///
/// `hold` runs from 0 (magazine at the gun) to 1 (held up). The ground
/// springs start at 1 when something is picked up and fall to 0 as it
/// reaches the hand; the poses are where it was picked up from.
#[derive(Debug, Clone)]
pub struct HandSprings {
    pub hold: Spring,
    pub mag_ground: Spring,
    pub flash_ground: Spring,
    pub mag_ground_pose: Pose,
    pub flash_ground_pose: Pose,
}

impl HandSprings {
    pub fn new(strength: f32, damping: f32) -> Self {
        Self {
            hold: Spring::new(0.0, 0.0, strength, damping),
            mag_ground: Spring::new(0.0, 0.0, strength, damping),
            flash_ground: Spring::new(0.0, 0.0, strength, damping),
            mag_ground_pose: Pose::IDENTITY,
            flash_ground_pose: Pose::IDENTITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use receiver_core::ObjectId;

    #[test]
    fn test_hand_take_empties() {
        let mut hand = Hand::Hold(Magazine::new(ObjectId::from_raw(1), 8));
        assert!(hand.is_holding());
        let magazine = hand.take().unwrap();
        assert_eq!(magazine.id(), ObjectId::from_raw(1));
        assert!(hand.is_empty());
        assert!(hand.take().is_none());
    }

    #[test]
    fn test_restage_keeps_magazine() {
        let mut hand = Hand::Hold(Magazine::new(ObjectId::from_raw(1), 8).with_rounds(3));
        hand.restage(true);
        assert!(hand.is_inserting());
        assert_eq!(hand.magazine().map(Magazine::num_rounds), Some(3));

        let mut empty = Hand::Empty;
        empty.restage(true);
        assert!(empty.is_empty());
    }
}
