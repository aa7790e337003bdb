//! Per-frame simulation tick
//!
//! Core game loop: the host calls [`tick`] once per rendered frame with the
//! real milliseconds that passed.

use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Launch angle (radians) and strength, honoured while ready
    pub kick_off: Option<(f32, f32)>,
    /// Tap anywhere
    pub screen_touched: bool,
    /// Pause toggle
    pub pause: bool,
    /// Back to the start line
    pub restart: bool,
    /// Demo mode - AI plays the game
    pub autopilot: bool,
}

/// Advance the session by one frame of `real_ms` real time
pub fn tick(state: &mut GameState, input: &TickInput, real_ms: u32) {
    if input.restart {
        state.restart();
    }

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Running => {
                state.pause();
                return;
            }
            GamePhase::Paused => state.unpause(),
            _ => {}
        }
    }

    let mut input = input.clone();
    if input.autopilot {
        autopilot(state, &mut input);
    }

    if let Some((angle, strength)) = input.kick_off {
        state.kick_off(angle, strength);
    }

    if state.phase != GamePhase::Running {
        return;
    }

    if input.screen_touched {
        state.screen_touched();
    }

    // Long stalls would tunnel through zones
    let real_ms = real_ms.min(MAX_REAL_TICK_MS);
    state.time.clock_mut().advance(real_ms);
    state.time_ticks += 1;

    let step = state.time.clock().game_step();
    state.player.body.integrate(step);
    state.resolve_contacts();
    state.player.update(&mut state.combos, &mut state.time);

    let allow_block = !state.player.has_pass();
    let x = state.player.body.pos.x;
    state.triggers.update(x, allow_block, &mut state.combos);

    state.update_combo_window();
    state.time.update();

    if state.player.is_stopped() {
        let distance = state.player.stats().distance;
        state.phase = GamePhase::Stopped;
        state.push_event(GameEvent::PlayerStopped { distance });
        log::info!("Player stopped after {:.1} units", distance);
    }
}

/// Kick off when ready, tap for full score on armed combos and soar when the
/// gauge is full
fn autopilot(state: &GameState, input: &mut TickInput) {
    match state.phase {
        GamePhase::Ready => {
            input.kick_off = Some((
                AUTOPILOT_KICK_ANGLE_DEG.to_radians(),
                AUTOPILOT_KICK_STRENGTH,
            ));
        }
        GamePhase::Running => {
            if let Some(active) = state.combos.active_combo() {
                if active.remaining_ms <= state.tuning.combo.max_score_ms {
                    input.screen_touched = true;
                }
            } else if state.player.soar_gauge() >= 1.0 {
                input.screen_touched = true;
            }
        }
        GamePhase::Paused | GamePhase::Stopped => {}
    }
}
