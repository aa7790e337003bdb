//! Session state and operations
//!
//! [`GameState`] owns every simulation component so actions can borrow the
//! pieces they touch side by side.

use serde::{Deserialize, Serialize};

use super::combo::{ComboController, ComboType};
use super::contact::player_box;
use super::manager::TriggerManager;
use super::player::Player;
use super::time::{Clock, TimeController};
use super::trigger::{ActionContext, TriggerId, TriggerType};
use crate::hud::{ComboHud, PlayerHud, TriggerHud};
use crate::tuning::Tuning;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Player on the ground, waiting for kick-off
    Ready,
    /// Active gameplay
    Running,
    /// Game is paused
    Paused,
    /// Player came to rest; restart to play again
    Stopped,
}

/// Gameplay occurrences for audio and presentation, drained by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// First contact with a placed zone
    TriggerContact { kind: TriggerType },
    ComboArmed { combo: ComboType },
    ComboExecuted { combo: ComboType, score: f32 },
    /// Window ran out without a tap
    ComboMissed { combo: ComboType },
    Soared,
    AscentGaugeFull,
    PlayerStopped { distance: f32 },
}

/// End-of-run numbers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub seed: u64,
    pub ticks: u64,
    pub real_time_ms: u64,
    pub distance: f32,
    pub combos_executed: u32,
    pub combo_score: f32,
    pub stopped: bool,
}

#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub time: TimeController,
    pub combos: ComboController,
    pub triggers: TriggerManager,
    pub player: Player,
    /// Ticks simulated while running
    pub time_ticks: u64,
    pub combos_executed: u32,
    /// Sum of executed combo scores this run
    pub combo_score: f32,
    events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut state = Self {
            seed,
            tuning,
            phase: GamePhase::Ready,
            time: TimeController::new(Clock::new(), tuning.time),
            combos: ComboController::new(tuning.combo),
            triggers: TriggerManager::new(tuning.trigger, seed),
            player: Player::new(tuning.player),
            time_ticks: 0,
            combos_executed: 0,
            combo_score: 0.0,
            events: Vec::new(),
        };
        state.restart();
        state
    }

    /// Back to the start line, waiting for kick-off
    pub fn restart(&mut self) {
        self.triggers.reset(0.0);
        self.player.reset(0.0);
        self.combos.reset();
        self.time.reset();
        self.phase = GamePhase::Ready;
        self.time_ticks = 0;
        self.combos_executed = 0;
        self.combo_score = 0.0;
        self.events.clear();
        log::info!("Session ready (seed {})", self.seed);
    }

    /// Launch the player at `angle` radians with `strength` speed and place
    /// the opening zones. Only valid while ready.
    pub fn kick_off(&mut self, angle: f32, strength: f32) -> bool {
        if self.phase != GamePhase::Ready {
            log::debug!("Kick-off ignored in {:?}", self.phase);
            return false;
        }
        self.player.kick_off(angle, strength, self.time.time_now());
        self.triggers.kick_off(&mut self.combos);
        self.phase = GamePhase::Running;
        log::info!("Kick-off at {:.2} rad, strength {:.1}", angle, strength);
        true
    }

    pub fn pause(&mut self) {
        if self.phase == GamePhase::Running {
            self.phase = GamePhase::Paused;
        }
    }

    pub fn unpause(&mut self) {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Running;
        }
    }

    /// Tap: execute the armed combo, otherwise try to soar
    pub fn screen_touched(&mut self) {
        if self.phase != GamePhase::Running {
            return;
        }

        if let Some(execution) = self.combos.execute_combo() {
            self.triggers.set_action(execution.trigger, execution.action);
            let (triggers, mut ctx) = self.split();
            triggers.perform_action(execution.trigger, &mut ctx);

            self.combos_executed += 1;
            self.combo_score += execution.score;
            self.events.push(GameEvent::ComboExecuted {
                combo: execution.combo,
                score: execution.score,
            });

            if self.player.add_combo_score(execution.score) {
                self.events.push(GameEvent::AscentGaugeFull);
            }
        } else if self.player.soar() {
            self.events.push(GameEvent::Soared);
        }
    }

    /// Resolve every zone the player currently touches
    pub fn resolve_contacts(&mut self) {
        let hits = self.triggers.contacts(&player_box(self.player.body.pos));
        for id in hits {
            self.handle_collision(id);
        }
    }

    /// First-contact handling for one zone; repeat contacts are ignored
    pub fn handle_collision(&mut self, id: TriggerId) {
        let (triggers, mut ctx) = self.split();
        let Some(contact) = triggers.on_collision(id, &mut ctx) else {
            return;
        };

        self.events.push(GameEvent::TriggerContact { kind: contact.kind });
        if let Some(combo) = contact.armed {
            self.events.push(GameEvent::ComboArmed { combo });
        }
    }

    /// Count the combo window down; a miss falls back to the zone's own action
    pub fn update_combo_window(&mut self) {
        let Some(missed) = self.combos.update(self.time.clock().real_tick()) else {
            return;
        };
        let (triggers, mut ctx) = self.split();
        triggers.perform_action(missed.trigger, &mut ctx);
        self.events.push(GameEvent::ComboMissed {
            combo: missed.combo,
        });
    }

    /// Push the current state to every HUD element
    pub fn update_hud<H>(&self, hud: &mut H)
    where
        H: ComboHud + TriggerHud + PlayerHud,
    {
        self.combos.update_combo_hud(hud);
        self.triggers.update_trigger_hud(hud);
        self.player.update_player_hud(hud);
    }

    /// Take the events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            seed: self.seed,
            ticks: self.time_ticks,
            real_time_ms: self.time.clock().real_time(),
            distance: self.player.stats().distance,
            combos_executed: self.combos_executed,
            combo_score: self.combo_score,
            stopped: self.phase == GamePhase::Stopped,
        }
    }

    /// The pool alongside everything its actions may touch
    fn split(&mut self) -> (&mut TriggerManager, ActionContext<'_>) {
        (
            &mut self.triggers,
            ActionContext {
                player: &mut self.player,
                combos: &mut self.combos,
                time: &mut self.time,
            },
        )
    }
}
