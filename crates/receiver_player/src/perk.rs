//! Perks active for a run

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A run modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Perk {
    Moonshot,
    Psi1850,
    Monophobia,
    /// Longer pickup reach
    ShortSleeves,
    /// Start with ten extra loose rounds
    Shrapnel,
    Magnificent,
    DejaVu,
    SlowDay,
    Unseen,
    ConsumerGrade,
}

impl Perk {
    pub fn title(&self) -> &'static str {
        match self {
            Perk::Moonshot => "Moonshot",
            Perk::Psi1850 => "1850 psi",
            Perk::Monophobia => "Monophobia",
            Perk::ShortSleeves => "Short Sleeves",
            Perk::Shrapnel => "Pocketful of Shrapnel",
            Perk::Magnificent => "Magnificent",
            Perk::DejaVu => "Déjà vu",
            Perk::SlowDay => "Slow Day",
            Perk::Unseen => "The Unseen Bullet is the Deadliest",
            Perk::ConsumerGrade => "Consumer Grade",
        }
    }
}

/// The perks in play, plus the pickup bookkeeping perks read
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerkSet {
    active: BTreeSet<Perk>,
    #[serde(default)]
    mags_picked_up: u32,
}

impl PerkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_perk(mut self, perk: Perk) -> Self {
        self.active.insert(perk);
        self
    }

    pub fn has_perk(&self, perk: Perk) -> bool {
        self.active.contains(&perk)
    }

    pub fn titles(&self) -> Vec<&'static str> {
        self.active.iter().map(Perk::title).collect()
    }

    /// A magazine was held for the first time
    pub fn did_pickup_mag(&mut self) {
        self.mags_picked_up += 1;
    }

    pub fn mags_picked_up(&self) -> u32 {
        self.mags_picked_up
    }
}

impl FromIterator<Perk> for PerkSet {
    fn from_iter<I: IntoIterator<Item = Perk>>(iter: I) -> Self {
        Self {
            active: iter.into_iter().collect(),
            mags_picked_up: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_perk() {
        let perks = PerkSet::new().with_perk(Perk::Shrapnel);
        assert!(perks.has_perk(Perk::Shrapnel));
        assert!(!perks.has_perk(Perk::ShortSleeves));
        assert_eq!(perks.titles(), vec!["Pocketful of Shrapnel"]);
    }

    #[test]
    fn test_perk_names_in_json() {
        let perks: PerkSet =
            serde_json::from_str(r#"{ "active": ["short_sleeves", "psi1850"] }"#).unwrap();
        assert!(perks.has_perk(Perk::ShortSleeves));
        assert!(perks.has_perk(Perk::Psi1850));
        assert_eq!(perks.mags_picked_up(), 0);
    }
}
