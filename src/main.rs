//! Hobo headless runner
//!
//! Plays one autopilot session at a fixed frame rate and prints the final
//! HUD state and run summary.
//!
//! Usage: `hobo [seed] [tuning.json]`

use std::path::Path;

use hobo::consts::{FRAME_MS, MAX_SESSION_MS};
use hobo::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
use hobo::{HudSnapshot, Tuning};
use serde::Serialize;

#[derive(Serialize)]
struct Report {
    summary: hobo::sim::SessionSummary,
    hud: HudSnapshot,
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(arg) => arg.parse().unwrap_or_else(|_| {
            log::warn!("Seed '{}' is not a number, using 0", arg);
            0
        }),
        None => 0,
    };
    let tuning = match args.next() {
        Some(path) => Tuning::load(Path::new(&path)),
        None => Tuning::default(),
    };

    log::info!("Hobo (headless) starting, seed {}", seed);

    let mut state = GameState::new(seed, tuning);
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };

    while state.time.clock().real_time() < MAX_SESSION_MS {
        tick(&mut state, &input, FRAME_MS);
        for event in state.drain_events() {
            log_event(&event);
        }
        if state.phase == GamePhase::Stopped {
            break;
        }
    }

    let mut hud = HudSnapshot::default();
    state.update_hud(&mut hud);
    let report = Report {
        summary: state.summary(),
        hud,
    };

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize report: {}", e),
    }
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::TriggerContact { kind } => log::debug!("Contact: {:?}", kind),
        GameEvent::ComboArmed { combo } => log::info!("Combo armed: {:?}", combo),
        GameEvent::ComboExecuted { combo, score } => {
            log::info!("Combo executed: {:?} ({:.2})", combo, score)
        }
        GameEvent::ComboMissed { combo } => log::info!("Combo missed: {:?}", combo),
        GameEvent::Soared => log::info!("Soaring"),
        GameEvent::AscentGaugeFull => log::info!("Ascent gauge full"),
        GameEvent::PlayerStopped { distance } => log::info!("Stopped at {:.1}", distance),
    }
}
