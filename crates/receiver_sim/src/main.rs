//! Receiver headless simulator
//!
//! Replays a scripted session from a TOML scenario: rolls a loadout from
//! the scenario's seed, runs the player tick at a fixed step and logs
//! every call the player makes into the host.
//!
//! Run with: cargo run -p receiver_sim -- crates/receiver_sim/scenarios/reload.toml
//!       or: RUST_LOG=debug cargo run --bin receiver-sim -- <scenario.toml>

mod error;
mod host;
mod scenario;

use error::Result;
use host::LoggingHost;
use receiver_core::{IdAllocator, SimRng};
use receiver_inventory::{Location, PoseSource};
use receiver_math::Pose;
use receiver_player::{InputFrame, Loadout, PlayerController};
use scenario::Scenario;
use std::collections::HashSet;

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Some(path) = std::env::args().skip(1).find(|arg| !arg.starts_with("--")) else {
        log::error!("usage: receiver-sim <scenario.toml>");
        std::process::exit(2);
    };

    let scenario = match Scenario::load(&path) {
        Ok(scenario) => scenario,
        Err(err) => {
            log::error!("Failed to load scenario {}: {}", path, err);
            std::process::exit(1);
        }
    };

    if let Err(err) = run(&scenario) {
        log::error!("Scenario {} failed: {}", path, err);
        std::process::exit(1);
    }
}

/// Roll the loadout and drive the player for the scenario's ticks
fn run(scenario: &Scenario) -> Result<()> {
    let config = scenario.player_config()?;
    let archetype = scenario.weapon_archetype()?;
    let script = scenario.script()?;
    let perks = scenario.perk_set();
    let ids = IdAllocator::new();
    let mut rng = SimRng::seed_from_u64(scenario.seed);

    log::info!("Scenario:");
    log::info!("  Seed: {}, ticks: {} at {} Hz", scenario.seed, scenario.ticks, scenario.tick_rate);
    log::info!("  Weapon: {} ({})", archetype.name, archetype.kind);
    log::info!("  Perks: {:?}", perks.titles());
    log::info!("  Scripted presses: {}", script.len());
    if script.is_empty() {
        log::warn!("Scenario has no scripted presses; the player will stand idle");
    }

    let capacity = archetype.magazine_capacity.max(1);
    let loadout = Loadout::roll(&mut rng, archetype, config.weapon.clone(), &perks, &ids);
    let mut host = LoggingHost::new(&scenario.world, &ids, capacity);
    let mut player = PlayerController::from_loadout(config, loadout, perks, rng).with_yaw(scenario.yaw);

    let dt = scenario.dt();
    let mut previous = HashSet::new();
    for tick in 0..scenario.ticks {
        let current = script.held_at(tick);
        let input = InputFrame::from_levels(&previous, &current);
        let pressed: Vec<_> = current.difference(&previous).collect();
        if !pressed.is_empty() {
            log::info!("tick {}: pressed {:?}", tick, pressed);
        }
        player.tick(&input, &mut host, dt);

        let position = host.camera_pose().position;
        host.set_camera(Pose::new(position, player.eye_pose().rotation));
        previous = current;
    }

    summarize(&player, &host);
    Ok(())
}

fn summarize(player: &PlayerController, host: &LoggingHost) {
    let stats = host.stats();
    let inventory = player.inventory();
    log::info!("Summary:");
    log::info!(
        "  Shots: {}, muzzle flashes: {}, bodies thrown: {}, sounds: {}",
        stats.projectiles,
        stats.muzzle_flashes,
        stats.bodies,
        stats.sounds
    );
    log::info!("  Objects picked up: {}", stats.pickups);
    log::info!(
        "  Loose rounds: {} carried, {} on the ground",
        inventory.loose_rounds(),
        host.rounds_on_ground()
    );
    log::info!("  Magazines on the ground: {}", host.magazines_on_ground());
    log::info!("  Magazines picked up: {}", player.perks().mags_picked_up());
    for (location, id) in inventory.contents() {
        match location {
            Location::Drawn => log::info!("  {} drawn", id),
            other => log::info!("  {} at {:?}", id, other),
        }
    }
}
