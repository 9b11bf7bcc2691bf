//! Integration tests for the weapon state machine

use approx::assert_abs_diff_eq;
use receiver_core::{ObjectId, SimRng};
use receiver_weapon::prelude::*;

const DT: f32 = 1.0 / 60.0;

fn mag(id: u64, rounds: u32) -> Magazine {
    Magazine::new(ObjectId::from_raw(id), 8).with_rounds(rounds)
}

fn gun(archetype: WeaponArchetype) -> Weapon {
    Weapon::new(ObjectId::from_raw(1), archetype, WeaponConfig::default())
}

fn shots(events: &[WeaponEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, WeaponEvent::ProjectileFired { .. }))
        .count()
}

fn position(events: &[WeaponEvent], pred: impl Fn(&WeaponEvent) -> bool) -> usize {
    events.iter().position(pred).unwrap()
}

fn tick_until(weapon: &mut Weapon, rng: &mut SimRng, max_ticks: usize, done: impl Fn(&Weapon) -> bool) {
    for _ in 0..max_ticks {
        if done(weapon) {
            return;
        }
        weapon.advance(DT, rng);
    }
}

#[test]
fn test_rack_slide_chambers_round() {
    let mut rng = SimRng::seed_from_u64(1);
    let mut weapon = gun(WeaponArchetype::m1911()).with_magazine(mag(2, 1));

    weapon.pull_back_slide();
    tick_until(&mut weapon, &mut rng, 20, |w| {
        w.automatic().map(AutomaticAction::slide_stage) == Some(SlideStage::Hold)
    });
    assert_abs_diff_eq!(weapon.slide_amount(), 1.0, epsilon = 1e-6);

    weapon.release_slide();
    tick_until(&mut weapon, &mut rng, 20, |w| w.slide_amount() == 0.0);
    weapon.advance(DT, &mut rng);

    let action = weapon.automatic().unwrap();
    assert_eq!(action.chambered_round(), Some(RoundState::Ready));
    assert_abs_diff_eq!(weapon.slide_amount(), 0.0, epsilon = 1e-6);
    assert_eq!(action.magazine().map(Magazine::num_rounds), Some(0));
    assert!(!weapon.is_slide_locked());
}

#[test]
fn test_revolver_fires_active_chamber() {
    let mut rng = SimRng::seed_from_u64(2);
    let mut weapon = gun(WeaponArchetype::model10()).with_loaded_chambers([0]);
    assert!(weapon.is_hammer_cocked());

    assert!(weapon.apply_pressure_to_trigger(&mut rng));

    let events = weapon.drain_events();
    assert_eq!(shots(&events), 1);
    let chamber = weapon.revolver().unwrap().chambers()[0];
    assert!(!chamber.can_fire);
    assert_eq!(chamber.round, Some(Cartridge::Spent));
    assert_eq!(weapon.hammer_cocked(), 0.0);
    assert!(events
        .iter()
        .any(|e| matches!(e, WeaponEvent::Recoil(RecoilImpulse { head_recoil: true, .. }))));
}

#[test]
fn test_shot_event_order() {
    let mut rng = SimRng::seed_from_u64(3);
    let mut weapon = gun(WeaponArchetype::m1911())
        .with_magazine(mag(2, 3))
        .with_chambered_round();

    assert!(weapon.apply_pressure_to_trigger(&mut rng));
    let events = weapon.drain_events();

    let gunshot = position(&events, |e| e.cue() == Some(SoundCue::Gunshot));
    let casing = position(&events, |e| matches!(e, WeaponEvent::CasingFormed { .. }));
    let flash = position(&events, |e| matches!(e, WeaponEvent::MuzzleFlash));
    let projectile = position(&events, |e| matches!(e, WeaponEvent::ProjectileFired { .. }));
    let ejected = position(&events, |e| matches!(e, WeaponEvent::RoundEjected { .. }));
    let recoil = position(&events, |e| matches!(e, WeaponEvent::Recoil(_)));
    assert!(gunshot < casing && casing < flash && flash < projectile);
    assert!(projectile < ejected && ejected < recoil);
}

#[test]
fn test_safety_blocks_trigger() {
    let mut rng = SimRng::seed_from_u64(4);
    let mut weapon = gun(WeaponArchetype::m1911())
        .with_magazine(mag(2, 5))
        .with_chambered_round()
        .with_safety_engaged();

    for _ in 0..30 {
        assert!(!weapon.apply_pressure_to_trigger(&mut rng));
        weapon.advance(DT, &mut rng);
    }

    let events = weapon.drain_events();
    assert_eq!(shots(&events), 0);
    assert!(!events.iter().any(|e| e.cue() == Some(SoundCue::DryFire)));
    assert_eq!(weapon.hammer_cocked(), 1.0);
    assert_abs_diff_eq!(weapon.slide_amount(), 0.0, epsilon = 1e-6);
    assert_eq!(
        weapon.automatic().unwrap().chambered_round(),
        Some(RoundState::Ready)
    );
}

#[test]
fn test_safety_keeps_slide_forward() {
    let mut rng = SimRng::seed_from_u64(4);
    let mut weapon = gun(WeaponArchetype::m1911())
        .with_magazine(mag(2, 5))
        .with_safety_engaged();

    weapon.pull_back_slide();
    for _ in 0..10 {
        weapon.advance(DT, &mut rng);
    }
    assert_abs_diff_eq!(weapon.slide_amount(), 0.0, epsilon = 1e-6);
}

#[test]
fn test_single_action_fires_once_per_pull() {
    let mut rng = SimRng::seed_from_u64(5);
    let mut weapon = gun(WeaponArchetype::m1911())
        .with_magazine(mag(2, 7))
        .with_chambered_round();

    let mut fired = 0;
    for _ in 0..60 {
        if weapon.apply_pressure_to_trigger(&mut rng) {
            fired += 1;
        }
        weapon.advance(DT, &mut rng);
    }
    assert_eq!(fired, 1);

    weapon.release_pressure_from_trigger();
    weapon.advance(DT, &mut rng);
    assert!(weapon.apply_pressure_to_trigger(&mut rng));
}

#[test]
fn test_full_auto_fires_while_held() {
    let mut rng = SimRng::seed_from_u64(6);
    let mut weapon = gun(WeaponArchetype::glock17())
        .with_magazine(Magazine::new(ObjectId::from_raw(2), 17).with_rounds(17))
        .with_chambered_round()
        .with_auto_mod_enabled();

    let mut fired = 0;
    for _ in 0..60 {
        if weapon.apply_pressure_to_trigger(&mut rng) {
            fired += 1;
        }
        weapon.advance(DT, &mut rng);
    }
    assert!(fired > 5, "only {} shots", fired);
    let remaining = weapon
        .automatic()
        .and_then(AutomaticAction::magazine)
        .map(Magazine::num_rounds)
        .unwrap();
    assert_eq!(remaining as usize, 17 - fired);
}

#[test]
fn test_double_action_without_auto_fires_once() {
    let mut rng = SimRng::seed_from_u64(7);
    let mut weapon = gun(WeaponArchetype::glock17())
        .with_magazine(Magazine::new(ObjectId::from_raw(2), 17).with_rounds(17))
        .with_chambered_round();

    let mut fired = 0;
    for _ in 0..60 {
        if weapon.apply_pressure_to_trigger(&mut rng) {
            fired += 1;
        }
        weapon.advance(DT, &mut rng);
    }
    assert_eq!(fired, 1);
}

#[test]
fn test_double_action_revolver_cocks_then_fires() {
    let mut rng = SimRng::seed_from_u64(8);
    let mut weapon = gun(WeaponArchetype::model10())
        .with_loaded_chambers(0..6)
        .with_hammer_down();

    let mut fired = 0;
    for _ in 0..20 {
        if weapon.apply_pressure_to_trigger(&mut rng) {
            fired += 1;
        }
        weapon.advance(DT, &mut rng);
    }

    assert_eq!(fired, 1);
    let revolver = weapon.revolver().unwrap();
    assert_eq!(revolver.active_cylinder(), 1);
    assert!(revolver.chambers()[0].can_fire);
    assert!(!revolver.chambers()[1].can_fire);
}

#[test]
fn test_released_trigger_drops_partial_hammer() {
    let mut rng = SimRng::seed_from_u64(9);
    let mut weapon = gun(WeaponArchetype::model10())
        .with_loaded_chambers(0..6)
        .with_hammer_down();

    weapon.apply_pressure_to_trigger(&mut rng);
    weapon.advance(DT, &mut rng);
    assert!(weapon.hammer_cocked() > 0.0);

    weapon.release_pressure_from_trigger();
    weapon.advance(DT, &mut rng);
    assert_eq!(weapon.hammer_cocked(), 0.0);
}

#[test]
fn test_magazine_round_trip() {
    let mut rng = SimRng::seed_from_u64(10);
    let mut weapon = gun(WeaponArchetype::m1911());
    let magazine = mag(77, 5);

    assert!(weapon.insert_mag(magazine).is_ok());
    tick_until(&mut weapon, &mut rng, 60, |w| {
        w.automatic().map(AutomaticAction::mag_seated) == Some(1.0)
    });
    assert_eq!(weapon.automatic().unwrap().mag_stage(), MagStage::In);

    assert!(weapon.mag_eject());
    assert!(weapon.is_mag_currently_ejecting());
    tick_until(&mut weapon, &mut rng, 60, Weapon::ready_to_remove_mag);
    assert_eq!(weapon.automatic().unwrap().mag_seated(), 0.0);

    let removed = weapon.remove_mag().unwrap();
    assert_eq!(removed.id(), ObjectId::from_raw(77));
    assert_eq!(removed.num_rounds(), 5);
    assert!(!weapon.ready_to_remove_mag());
    assert!(!weapon.is_there_a_mag_in_gun());
}

#[test]
fn test_empty_gun_locks_open_and_reloads() {
    let mut rng = SimRng::seed_from_u64(11);
    let mut weapon = gun(WeaponArchetype::m1911())
        .with_magazine(mag(2, 0))
        .with_chambered_round();

    assert!(weapon.apply_pressure_to_trigger(&mut rng));
    weapon.release_pressure_from_trigger();
    for _ in 0..10 {
        weapon.advance(DT, &mut rng);
    }
    assert!(weapon.is_slide_locked());
    assert_eq!(weapon.slide_amount(), 0.9);
    assert!(weapon.should_eject_mag());
    assert!(!weapon.apply_pressure_to_trigger(&mut rng));
    weapon.release_pressure_from_trigger();

    assert!(weapon.mag_eject());
    tick_until(&mut weapon, &mut rng, 60, Weapon::ready_to_remove_mag);
    let empty = weapon.remove_mag().unwrap();
    assert_eq!(empty.num_rounds(), 0);

    assert!(weapon.insert_mag(mag(3, 8)).is_ok());
    tick_until(&mut weapon, &mut rng, 60, |w| {
        w.automatic().map(AutomaticAction::mag_stage) == Some(MagStage::In)
    });
    assert_eq!(
        weapon.automatic().unwrap().chambered_round(),
        Some(RoundState::Loading)
    );

    weapon.release_slide_lock();
    tick_until(&mut weapon, &mut rng, 20, |w| w.slide_amount() == 0.0);
    weapon.advance(DT, &mut rng);
    assert_eq!(
        weapon.automatic().unwrap().chambered_round(),
        Some(RoundState::Ready)
    );
    assert!(weapon.apply_pressure_to_trigger(&mut rng));
}

#[test]
fn test_press_check_and_return() {
    let mut rng = SimRng::seed_from_u64(12);
    let mut weapon = gun(WeaponArchetype::m1911())
        .with_magazine(mag(2, 4))
        .with_chambered_round();

    weapon.pull_back_slide();
    for _ in 0..3 {
        weapon.advance(DT, &mut rng);
    }
    weapon.pressure_on_slide_lock();
    weapon.advance(DT, &mut rng);
    assert_eq!(weapon.slide_amount(), 0.4);
    assert!(weapon.is_press_check());

    weapon.release_slide();
    tick_until(&mut weapon, &mut rng, 20, |w| w.slide_amount() == 0.0);
    assert_eq!(
        weapon.automatic().unwrap().chambered_round(),
        Some(RoundState::Ready)
    );
    assert_eq!(
        weapon.automatic().and_then(AutomaticAction::magazine).map(Magazine::num_rounds),
        Some(4)
    );
}

#[test]
fn test_cylinder_capacity_invariant() {
    let mut rng = SimRng::seed_from_u64(13);
    let mut weapon = gun(WeaponArchetype::model10()).with_loaded_chambers([1, 4]);

    assert!(weapon.swing_out_cylinder());
    tick_until(&mut weapon, &mut rng, 60, Weapon::is_adding_rounds);

    let mut added = 0;
    loop {
        let full = !weapon.should_insert_bullet();
        let ok = weapon.add_round_to_cylinder(&mut rng);
        assert_eq!(ok, !full);
        if !ok {
            break;
        }
        added += 1;
        assert!(added <= 6);
    }
    assert_eq!(added, 4);
    let revolver = weapon.revolver().unwrap();
    assert_eq!(revolver.chambers().iter().filter(|c| c.can_fire).count(), 6);
    assert!(weapon.should_close_cylinder());
}

#[test]
fn test_random_operation_respects_capacity() {
    let mut rng = SimRng::seed_from_u64(14);
    let mut weapon = gun(WeaponArchetype::model10()).with_loaded_chambers(0..3);

    for _ in 0..3000 {
        match rng.range_i32(0, 8) {
            0 => {
                weapon.apply_pressure_to_trigger(&mut rng);
            }
            1 => weapon.release_pressure_from_trigger(),
            2 => {
                weapon.swing_out_cylinder();
            }
            3 => {
                weapon.close_cylinder();
            }
            4 => {
                weapon.extractor_rod();
            }
            5 => {
                let full = !weapon.should_insert_bullet();
                let open = weapon.is_adding_rounds();
                let ok = weapon.add_round_to_cylinder(&mut rng);
                assert_eq!(ok, open && !full);
            }
            6 => weapon.rotate_cylinder(if rng.coin() { 1 } else { -1 }),
            _ => weapon.pressure_on_hammer(),
        }
        if rng.chance(0.3) {
            weapon.release_hammer();
        }
        weapon.advance(DT, &mut rng);
        weapon.drain_events();

        let revolver = weapon.revolver().unwrap();
        assert!(revolver.chambers().iter().filter(|c| c.can_fire).count() <= 6);
        for chamber in revolver.chambers() {
            if chamber.can_fire {
                assert_eq!(chamber.round, Some(Cartridge::Live));
            }
        }
        assert!(revolver.target_cylinder_offset().abs() <= 12);
    }
}

#[test]
fn test_empty_chamber_dry_fires() {
    let mut rng = SimRng::seed_from_u64(15);
    let mut weapon = gun(WeaponArchetype::model10());

    assert!(!weapon.apply_pressure_to_trigger(&mut rng));
    let events = weapon.drain_events();
    assert!(events.iter().any(|e| e.cue() == Some(SoundCue::DryFire)));
    assert_eq!(shots(&events), 0);
}

#[test]
fn test_open_cylinder_blocks_trigger() {
    let mut rng = SimRng::seed_from_u64(16);
    let mut weapon = gun(WeaponArchetype::model10()).with_loaded_chambers(0..6);

    weapon.swing_out_cylinder();
    assert!(!weapon.apply_pressure_to_trigger(&mut rng));
    assert!(weapon.drain_events().is_empty());
}

#[test]
fn test_archetype_loaded_from_disk_format() {
    let json = include_str!("../archetypes/model10.json");
    let archetype = WeaponArchetype::from_json(json).unwrap();
    assert_eq!(archetype.kind, GunKind::Revolver);
    assert!(archetype.anchor("point_recoil_rotate").is_some());
}
