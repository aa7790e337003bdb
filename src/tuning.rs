//! Data-driven game balance
//!
//! Every timing, distance and speed the simulation uses, grouped per
//! component and handed to each component at construction.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Slow-motion timing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeTuning {
    /// Game-time multiplier while slowed
    pub slowmotion_multiplier: f32,
    /// Real time slow-motion lasts (ms)
    pub slowmotion_duration_ms: u64,
}

impl Default for TimeTuning {
    fn default() -> Self {
        Self {
            slowmotion_multiplier: SLOWMOTION_MULTIPLIER,
            slowmotion_duration_ms: SLOWMOTION_DURATION_MS,
        }
    }
}

/// Combo window and scoring
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComboTuning {
    pub execution_window_ms: f32,
    pub max_score_ms: f32,
    pub history_len: usize,
}

impl Default for ComboTuning {
    fn default() -> Self {
        Self {
            execution_window_ms: COMBO_EXECUTION_WINDOW_MS,
            max_score_ms: COMBO_MAX_SCORE_MS,
            history_len: VISIBLE_TRIGGER_HISTORY,
        }
    }
}

/// Trigger placement and trigger action strengths
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerTuning {
    pub distance: f32,
    pub spawn_lead: f32,
    pub reload_offset: f32,
    pub kickoff_count: usize,
    pub height: f32,
    pub parked: Vec2,
    pub boost_speed: f32,
    pub combo_boost_speed: f32,
    pub stop_combo_speed: f32,
    pub head_straight_speed: f32,
    pub slowdown_vel_scale: f32,
}

impl Default for TriggerTuning {
    fn default() -> Self {
        Self {
            distance: TRIGGER_DISTANCE,
            spawn_lead: TRIGGER_SPAWN_LEAD,
            reload_offset: TRIGGER_RELOAD_OFFSET,
            kickoff_count: TRIGGER_KICKOFF_COUNT,
            height: TRIGGER_HEIGHT,
            parked: TRIGGER_PARKED,
            boost_speed: BOOST_SPEED,
            combo_boost_speed: COMBO_BOOST_SPEED,
            stop_combo_speed: STOP_COMBO_SPEED,
            head_straight_speed: HEAD_STRAIGHT_SPEED,
            slowdown_vel_scale: SLOWDOWN_VEL_SCALE,
        }
    }
}

/// Player movement, gauges and ground response
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub ground_offset: f32,
    pub ground_hit_vel_scale: f32,
    pub bounce_boost: f32,
    pub gravity: f32,
    pub soar_distance_full: f32,
    pub ascent_score_full: f32,
    pub hit_anim_duration_ms: f64,
    pub soar_angle_deg: f32,
    pub soar_min_height: f32,
    pub soar_max_height: f32,
    pub stop_speed: f32,
    pub hit_speed: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            ground_offset: GROUND_OFFSET,
            ground_hit_vel_scale: GROUND_HIT_VEL_SCALE,
            bounce_boost: BOUNCE_BOOST,
            gravity: GRAVITY,
            soar_distance_full: SOAR_DISTANCE_FULL,
            ascent_score_full: ASCENT_SCORE_FULL,
            hit_anim_duration_ms: HIT_ANIM_DURATION_MS,
            soar_angle_deg: SOAR_ANGLE_DEG,
            soar_min_height: SOAR_MIN_HEIGHT,
            soar_max_height: SOAR_MAX_HEIGHT,
            stop_speed: STOP_SPEED,
            hit_speed: HIT_SPEED,
        }
    }
}

/// Complete balance sheet for a session
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub time: TimeTuning,
    pub combo: ComboTuning,
    pub trigger: TriggerTuning,
    pub player: PlayerTuning,
}

impl Tuning {
    /// Parse a tuning sheet; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Load a tuning sheet from disk, falling back to defaults
    pub fn load(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    return tuning;
                }
                Err(e) => log::warn!("Bad tuning file {}: {}", path.display(), e),
            },
            Err(e) => log::warn!("Cannot read tuning file {}: {}", path.display(), e),
        }

        log::info!("Using default tuning");
        Self::default()
    }

    /// Serialize for editing/sharing
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Replace values the simulation cannot run with by their defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if self.trigger.distance <= 0.0 || self.trigger.distance.is_nan() {
            log::warn!("Trigger distance {} not positive, using default", self.trigger.distance);
            self.trigger.distance = defaults.trigger.distance;
        }
        if !(1..=MAX_TRIGGER_KICKOFF_COUNT).contains(&self.trigger.kickoff_count) {
            // The pool needs spare zones to recycle into
            log::warn!(
                "Kick-off count {} outside 1..={}, using default",
                self.trigger.kickoff_count,
                MAX_TRIGGER_KICKOFF_COUNT
            );
            self.trigger.kickoff_count = defaults.trigger.kickoff_count;
        }
        if !(0.0..1.0).contains(&self.trigger.reload_offset) {
            log::warn!(
                "Reload offset {} outside [0, 1), using default",
                self.trigger.reload_offset
            );
            self.trigger.reload_offset = defaults.trigger.reload_offset;
        }
        // New zones must land beyond the last kick-off zone
        let min_lead = (self.trigger.kickoff_count - 1) as f32 - self.trigger.reload_offset;
        if self.trigger.spawn_lead <= min_lead || self.trigger.spawn_lead.is_nan() {
            let lead = self.trigger.kickoff_count as f32 - self.trigger.reload_offset;
            log::warn!(
                "Spawn lead {} would place zones behind the kick-off run, using {}",
                self.trigger.spawn_lead,
                lead
            );
            self.trigger.spawn_lead = lead;
        }
        if self.combo.execution_window_ms <= 0.0 {
            log::warn!(
                "Combo window {}ms not positive, using default",
                self.combo.execution_window_ms
            );
            self.combo.execution_window_ms = defaults.combo.execution_window_ms;
        }
        if self.combo.max_score_ms <= 0.0 {
            log::warn!("Combo max score time {}ms not positive, using default", self.combo.max_score_ms);
            self.combo.max_score_ms = defaults.combo.max_score_ms;
        }
        if !(2..=MAX_VISIBLE_TRIGGER_HISTORY).contains(&self.combo.history_len) {
            // Pairs need at least two entries
            log::warn!(
                "Trigger history of {} outside 2..={}, using default",
                self.combo.history_len,
                MAX_VISIBLE_TRIGGER_HISTORY
            );
            self.combo.history_len = defaults.combo.history_len;
        }
        if self.time.slowmotion_multiplier <= 0.0 || self.time.slowmotion_multiplier.is_nan() {
            log::warn!(
                "Slow-motion multiplier {} not positive, using default",
                self.time.slowmotion_multiplier
            );
            self.time.slowmotion_multiplier = defaults.time.slowmotion_multiplier;
        }
        if self.player.soar_distance_full <= 0.0 {
            self.player.soar_distance_full = defaults.player.soar_distance_full;
        }
        if self.player.ascent_score_full <= 0.0 {
            self.player.ascent_score_full = defaults.player.ascent_score_full;
        }

        self
    }
}
