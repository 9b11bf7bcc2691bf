//! Integration tests for inventory routing and ownership

use approx::assert_abs_diff_eq;
use receiver_core::{ObjectId, SimRng};
use receiver_inventory::prelude::*;
use receiver_math::{Pose, Quat, Vec3};
use receiver_weapon::{Magazine, Weapon, WeaponArchetype, WeaponConfig};
use std::collections::HashSet;

const DT: f32 = 1.0 / 60.0;

/// Camera a little off the origin with everything carried half a metre ahead
struct Rig;

impl PoseSource for Rig {
    fn camera_pose(&self) -> Pose {
        Pose::new(Vec3::new(0.0, 1.6, 0.0), Quat::IDENTITY)
    }

    fn object_pose(&self, _id: ObjectId) -> Option<Pose> {
        Some(Pose::new(Vec3::new(0.0, 1.3, 0.5), Quat::IDENTITY))
    }
}

fn mag(id: u64, rounds: u32) -> Magazine {
    Magazine::new(ObjectId::from_raw(id), 8).with_rounds(rounds)
}

fn pistol(id: u64) -> Weapon {
    Weapon::new(
        ObjectId::from_raw(id),
        WeaponArchetype::m1911(),
        WeaponConfig::default(),
    )
}

fn assert_exclusive(inventory: &InventoryController) {
    let contents = inventory.contents();
    let unique: HashSet<ObjectId> = contents.iter().map(|(_, id)| *id).collect();
    assert_eq!(unique.len(), contents.len(), "duplicate owner in {:?}", contents);
}

#[test]
fn test_stash_held_magazine_in_empty_slot() {
    let mut inventory = InventoryController::default().with_hand(mag(5, 4));

    inventory.request_slot(SlotRequest::from_key(3).unwrap());
    inventory.route_pending(&Rig);

    let slot = inventory.slot(2).unwrap();
    assert_eq!(slot.kind(), SlotKind::Magazine);
    assert_eq!(slot.object_id(), Some(ObjectId::from_raw(5)));
    assert_eq!(slot.spring().target_state, 1.0);
    assert!(inventory.hand().is_empty());
    let start = slot.start_pose().position;
    assert_abs_diff_eq!(start.x, 0.0, epsilon = 1e-5);
    assert_abs_diff_eq!(start.y, -0.3, epsilon = 1e-5);
    assert_abs_diff_eq!(start.z, 0.5, epsilon = 1e-5);
}

#[test]
fn test_emptying_slot_settles() {
    let mut inventory = InventoryController::default();
    inventory.place(0, mag(5, 4)).unwrap();
    inventory.request_slot(SlotRequest::Slot(0));
    inventory.route_pending(&Rig);
    assert_eq!(inventory.slot(0).unwrap().kind(), SlotKind::Emptying);
    assert_eq!(inventory.emptying_slot_of(ObjectId::from_raw(5)), Some(0));

    for _ in 0..300 {
        inventory.advance(DT);
    }
    assert_eq!(inventory.slot(0).unwrap().kind(), SlotKind::Empty);
    assert!(inventory.emptying_slot_of(ObjectId::from_raw(5)).is_none());
}

#[test]
fn test_requests_wait_while_gun_ejects() {
    let mut rng = SimRng::seed_from_u64(3);
    let gun = pistol(1).with_magazine(mag(2, 3));
    let mut inventory = InventoryController::default().with_drawn(gun);

    assert!(inventory.eject_or_drop(true).is_none());
    inventory.request_slot(SlotRequest::Slot(4));
    inventory.route_pending(&Rig);
    assert_eq!(inventory.pending_request(), Some(SlotRequest::Slot(4)));

    for _ in 0..30 {
        if let Some(weapon) = inventory.drawn_mut() {
            weapon.advance(DT, &mut rng);
        }
        inventory.advance(DT);
    }
    // The ejected magazine lands in the off hand, so the request stashes it
    let caught = inventory.hand().magazine().map(Magazine::id);
    assert_eq!(caught, Some(ObjectId::from_raw(2)));

    inventory.route_pending(&Rig);
    assert!(inventory.pending_request().is_none());
    assert!(inventory.hand().is_empty());
    assert_eq!(inventory.slot(4).unwrap().kind(), SlotKind::Magazine);
}

#[test]
fn test_drop_queued_while_ejecting() {
    let mut rng = SimRng::seed_from_u64(4);
    let gun = pistol(1).with_magazine(mag(2, 3));
    let mut inventory = InventoryController::default().with_drawn(gun);

    inventory.eject_or_drop(true);
    if let Some(weapon) = inventory.drawn_mut() {
        weapon.advance(DT, &mut rng);
    }
    inventory.eject_or_drop(true);
    assert!(inventory.is_drop_queued());

    let mut dropped = None;
    for _ in 0..30 {
        if let Some(weapon) = inventory.drawn_mut() {
            weapon.advance(DT, &mut rng);
        }
        if let Some(magazine) = inventory.eject_or_drop(false) {
            dropped = Some(magazine);
        }
        inventory.advance(DT);
    }
    assert_eq!(dropped.map(|m| m.id()), Some(ObjectId::from_raw(2)));
    assert!(!inventory.is_drop_queued());
    assert!(inventory.hand().is_empty());
}

#[test]
fn test_reload_cycle_keeps_ownership_exclusive() {
    let mut rng = SimRng::seed_from_u64(5);
    let gun = pistol(1).with_magazine(mag(2, 0));
    let mut inventory = InventoryController::default()
        .with_drawn(gun)
        .with_flashlight(Flashlight::new(ObjectId::from_raw(3)));
    inventory.place(1, mag(4, 8)).unwrap();
    inventory.place(2, mag(5, 6)).unwrap();
    assert_exclusive(&inventory);

    let tick = |inventory: &mut InventoryController, rng: &mut SimRng, ticks: usize| {
        for _ in 0..ticks {
            inventory.route_pending(&Rig);
            if let Some(weapon) = inventory.drawn_mut() {
                weapon.advance(DT, rng);
                weapon.drain_events();
            }
            inventory.advance(DT);
            assert_exclusive(inventory);
        }
    };

    // Eject the empty magazine; it is caught by the off hand
    inventory.eject_or_drop(true);
    tick(&mut inventory, &mut rng, 30);
    assert_eq!(inventory.hand().magazine().map(Magazine::id), Some(ObjectId::from_raw(2)));

    // Stash it, take the full one, double-tap it into the gun
    inventory.request_slot(SlotRequest::Slot(0));
    tick(&mut inventory, &mut rng, 1);
    assert_eq!(inventory.slot(0).unwrap().kind(), SlotKind::Magazine);

    inventory.request_slot(SlotRequest::Slot(1));
    tick(&mut inventory, &mut rng, 1);
    inventory.request_slot(SlotRequest::Slot(1));
    tick(&mut inventory, &mut rng, 120);

    let seated = inventory
        .drawn()
        .and_then(Weapon::automatic)
        .and_then(|action| action.magazine())
        .map(Magazine::id);
    assert_eq!(seated, Some(ObjectId::from_raw(4)));
    assert!(inventory.hand().is_empty());

    // Holster, stash the flashlight, draw again
    inventory.request_slot(SlotRequest::Holster);
    tick(&mut inventory, &mut rng, 1);
    assert!(inventory.drawn().is_none());
    inventory.request_slot(SlotRequest::Slot(9));
    tick(&mut inventory, &mut rng, 1);
    assert_eq!(inventory.flashlight_slot(), Some(9));
    inventory.request_slot(SlotRequest::Holster);
    tick(&mut inventory, &mut rng, 1);
    assert!(inventory.drawn().is_some());
    assert_eq!(inventory.contents().len(), 5);
}

#[test]
fn test_random_requests_never_duplicate() {
    let mut rng = SimRng::seed_from_u64(6);
    let gun = pistol(1).with_magazine(mag(2, 5));
    let mut inventory = InventoryController::default()
        .with_drawn(gun)
        .with_loose_rounds(12);
    inventory.place(3, mag(4, 8)).unwrap();
    inventory.place(6, Flashlight::new(ObjectId::from_raw(7))).unwrap();
    let total = inventory.contents().len();
    let mut in_world: Vec<Magazine> = Vec::new();

    for _ in 0..4000 {
        match rng.range_i32(0, 7) {
            0 => inventory.request_slot(SlotRequest::Holster),
            1 | 2 => {
                let slot = rng.range_i32(0, SLOT_COUNT as i32) as usize;
                inventory.request_slot(SlotRequest::Slot(slot));
            }
            3 => {
                inventory.begin_insert();
            }
            4 => {
                if let Some(magazine) = inventory.eject_or_drop(true) {
                    in_world.push(magazine);
                }
            }
            5 => {
                if let Some(magazine) = in_world.pop() {
                    if let Err(magazine) = inventory.grab_magazine(magazine, Pose::IDENTITY) {
                        in_world.push(magazine);
                    }
                }
            }
            _ => {
                inventory.insert_round(&mut rng);
            }
        }
        inventory.route_pending(&Rig);
        if let Some(magazine) = inventory.eject_or_drop(false) {
            in_world.push(magazine);
        }
        if let Some(weapon) = inventory.drawn_mut() {
            weapon.advance(DT, &mut rng);
            weapon.drain_events();
        }
        inventory.advance(DT);

        assert_exclusive(&inventory);
        let world_ids: HashSet<ObjectId> = in_world.iter().map(Magazine::id).collect();
        for (_, id) in inventory.contents() {
            assert!(!world_ids.contains(&id));
        }
        assert_eq!(inventory.contents().len() + in_world.len(), total);
    }
}
