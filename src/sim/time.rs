//! Game clock and slow-motion control
//!
//! The host advances the clock by real milliseconds each frame; game time
//! follows at the current multiplier.

use serde::{Deserialize, Serialize};

use crate::tuning::TimeTuning;

/// Real/game time source advanced by the host loop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clock {
    real_time: u64,
    game_time: f64,
    real_tick: u32,
    game_step: f32,
    multiplier: f32,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    pub fn new() -> Self {
        Self {
            real_time: 0,
            game_time: 0.0,
            real_tick: 0,
            game_step: 0.0,
            multiplier: 1.0,
        }
    }

    /// Advance by one frame of real time
    pub fn advance(&mut self, real_ms: u32) {
        self.real_tick = real_ms;
        self.game_step = real_ms as f32 * self.multiplier;
        self.real_time += u64::from(real_ms);
        self.game_time += f64::from(self.game_step);
    }

    /// Real milliseconds since the clock started
    #[inline]
    pub fn real_time(&self) -> u64 {
        self.real_time
    }

    /// Game milliseconds since the clock started
    #[inline]
    pub fn game_time(&self) -> f64 {
        self.game_time
    }

    /// Length of the last frame in real ms
    #[inline]
    pub fn real_tick(&self) -> u32 {
        self.real_tick
    }

    /// Length of the last frame in game ms
    #[inline]
    pub fn game_step(&self) -> f32 {
        self.game_step
    }

    pub fn game_time_multiplier(&self) -> f32 {
        self.multiplier
    }

    /// Takes effect from the next `advance`
    pub fn set_game_time_multiplier(&mut self, multiplier: f32) {
        self.multiplier = multiplier;
    }
}

/// Owns the clock and the slow-motion state layered on top of it
#[derive(Debug, Clone)]
pub struct TimeController {
    clock: Clock,
    tuning: TimeTuning,
    slow_motion: bool,
    entered_at: u64,
}

impl TimeController {
    pub fn new(clock: Clock, tuning: TimeTuning) -> Self {
        Self {
            clock,
            tuning,
            slow_motion: false,
            entered_at: 0,
        }
    }

    /// Slow the game down; entering again restarts the timer
    pub fn enter_slowmotion(&mut self) {
        self.clock
            .set_game_time_multiplier(self.tuning.slowmotion_multiplier);
        self.entered_at = self.clock.real_time();
        self.slow_motion = true;
    }

    /// Poll once per frame; restores normal speed once the real-time duration passed
    pub fn update(&mut self) {
        if self.slow_motion
            && self.entered_at + self.tuning.slowmotion_duration_ms < self.clock.real_time()
        {
            self.clock.set_game_time_multiplier(1.0);
            self.slow_motion = false;
        }
    }

    /// Back to normal speed without touching accumulated time
    pub fn reset(&mut self) {
        self.clock.set_game_time_multiplier(1.0);
        self.slow_motion = false;
        self.entered_at = self.clock.real_time();
    }

    pub fn is_slow_motion(&self) -> bool {
        self.slow_motion
    }

    /// Current game time (ms), the reference for game-time timers
    pub fn time_now(&self) -> f64 {
        self.clock.game_time()
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }
}
