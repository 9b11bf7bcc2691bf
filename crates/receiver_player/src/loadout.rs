//! What the player starts a run with

use crate::perk::{Perk, PerkSet};
use receiver_core::{IdAllocator, SimRng};
use receiver_inventory::{Flashlight, InventoryConfig, InventoryController};
use receiver_weapon::{GunKind, Magazine, Weapon, WeaponArchetype, WeaponConfig};

/// Starting equipment
#[derive(Debug, Clone)]
pub struct Loadout {
    pub weapon: Weapon,
    pub flashlight: Option<Flashlight>,
    /// Spare magazines and the slots they start in
    pub magazines: Vec<(usize, Magazine)>,
    pub loose_rounds: u32,
}

impl Loadout {
    /// Roll a random starting loadout.
    ///
    /// 35% chance of a flashlight. Automatics carry up to two spare
    /// magazines in slots 2 and 3. Loose rounds are drawn from `0..10`
    /// with an automatic and `0..20` with a revolver, ten more with the
    /// shrapnel perk.
    pub fn roll(
        rng: &mut SimRng,
        archetype: WeaponArchetype,
        config: WeaponConfig,
        perks: &PerkSet,
        ids: &IdAllocator,
    ) -> Self {
        let flashlight = rng.chance(0.35).then(|| Flashlight::new(ids.allocate()));
        let weapon = Weapon::spawn(archetype, config, ids, rng);

        let mut magazines = Vec::new();
        let (mut min_rounds, mut max_rounds) = (0, 10);
        match weapon.kind() {
            GunKind::Automatic => {
                let capacity = weapon.archetype().magazine_capacity;
                let count = rng.range_i32(0, 3) as usize;
                for slot in 1..=count {
                    let magazine = Magazine::spawn(ids.allocate(), capacity, rng).with_held();
                    magazines.push((slot, magazine));
                }
            }
            GunKind::Revolver => max_rounds = 20,
        }
        if perks.has_perk(Perk::Shrapnel) {
            min_rounds += 10;
            max_rounds += 10;
        }
        let loose_rounds = rng.range_i32(min_rounds, max_rounds).max(0) as u32;

        log::debug!(
            "loadout: {} with {} spare magazines, {} rounds, flashlight {}",
            weapon.archetype().name,
            magazines.len(),
            loose_rounds,
            flashlight.is_some()
        );
        Self {
            weapon,
            flashlight,
            magazines,
            loose_rounds,
        }
    }

    /// Put everything in an inventory with the gun drawn
    pub fn into_inventory(self, config: InventoryConfig) -> InventoryController {
        let mut inventory = InventoryController::new(config)
            .with_drawn(self.weapon)
            .with_loose_rounds(self.loose_rounds);
        if let Some(flashlight) = self.flashlight {
            inventory = inventory.with_flashlight(flashlight);
        }
        for (slot, magazine) in self.magazines {
            if let Err(item) = inventory.place(slot, magazine) {
                log::warn!("slot {} taken, spare magazine {} left behind", slot + 1, item.id());
            }
        }
        inventory
    }
}
