//! Hobo - gameplay core of a side-scrolling glider game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (trigger pool, combos, slow-motion, player)
//! - `hud`: Display contracts the presentation layer implements
//! - `tuning`: Data-driven game balance

pub mod hud;
pub mod sim;
pub mod tuning;

pub use hud::HudSnapshot;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    use glam::Vec2;

    /// Frame length used by the headless runner (ms)
    pub const FRAME_MS: u32 = 16;
    /// Longest real tick accepted per frame, prevents huge steps after a stall
    pub const MAX_REAL_TICK_MS: u32 = 100;

    /// Slow-motion: game time runs at this fraction of real time
    pub const SLOWMOTION_MULTIPLIER: f32 = 0.1;
    /// Slow-motion lasts this long in real time (ms)
    pub const SLOWMOTION_DURATION_MS: u64 = 700;

    /// Window to tap after a combo arms (real ms)
    pub const COMBO_EXECUTION_WINDOW_MS: f32 = 700.0;
    /// Remaining time at or above which a tap scores the full 1.0
    pub const COMBO_MAX_SCORE_MS: f32 = 500.0;
    /// Recently appeared triggers remembered for combo detection
    pub const VISIBLE_TRIGGER_HISTORY: usize = 3;
    /// Longest history a tuning file may ask for
    pub const MAX_VISIBLE_TRIGGER_HISTORY: usize = 16;

    /// Spacing between consecutive trigger zones
    pub const TRIGGER_DISTANCE: f32 = 10.0;
    /// New zones appear this many distances ahead of the reload cursor
    pub const TRIGGER_SPAWN_LEAD: f32 = 2.8;
    /// Reload cursor sits this fraction of a distance past the first zone
    pub const TRIGGER_RELOAD_OFFSET: f32 = 0.2;
    /// Zones introduced on kick-off
    pub const TRIGGER_KICKOFF_COUNT: usize = 3;
    /// Most zones a kick-off may place and still leave spares in the pool
    pub const MAX_TRIGGER_KICKOFF_COUNT: usize = 5;
    /// Height of a placed zone's anchor
    pub const TRIGGER_HEIGHT: f32 = 2.0;
    /// Where idle zones are parked (out of reach)
    pub const TRIGGER_PARKED: Vec2 = Vec2::new(0.0, -500.0);

    /// Plain boost speed added by a boost zone
    pub const BOOST_SPEED: f32 = 11.0;
    /// Speed added by combo boosts and combo follow-ups
    pub const COMBO_BOOST_SPEED: f32 = 16.0;
    /// Speed added by the stop combo
    pub const STOP_COMBO_SPEED: f32 = 22.0;
    /// Straight-line speed while a two-zone combo is in progress
    pub const HEAD_STRAIGHT_SPEED: f32 = 15.0;
    /// Velocity scale applied by a slow zone
    pub const SLOWDOWN_VEL_SCALE: f32 = 0.55;

    /// Height of the player's centre when resting on the ground
    pub const GROUND_OFFSET: f32 = 0.75;
    /// Velocity scale on a plain ground hit
    pub const GROUND_HIT_VEL_SCALE: f32 = 0.8;
    /// Speed added by a bounce ground hit
    pub const BOUNCE_BOOST: f32 = 2.0;
    /// Downward acceleration (units/s²)
    pub const GRAVITY: f32 = 9.82;
    /// Distance flown to fill the soar gauge
    pub const SOAR_DISTANCE_FULL: f32 = 500.0;
    /// Accumulated combo score that fills the ascent gauge
    pub const ASCENT_SCORE_FULL: f32 = 5.0;
    /// How long the hit graphic stays up (game ms)
    pub const HIT_ANIM_DURATION_MS: f64 = 500.0;
    /// Soaring glides this many degrees below horizontal
    pub const SOAR_ANGLE_DEG: f32 = 10.0;
    /// Soaring is only possible strictly between these heights
    pub const SOAR_MIN_HEIGHT: f32 = 2.0;
    pub const SOAR_MAX_HEIGHT: f32 = 15.0;
    /// Trajectory speed under which the player counts as stopped
    pub const STOP_SPEED: f32 = 0.01;
    /// Ground hits faster than this play the hit graphic
    pub const HIT_SPEED: f32 = 1.0;

    /// Half size of the player's contact box
    pub const PLAYER_HALF_EXTENT: f32 = 0.375;

    /// Demo mode launch
    pub const AUTOPILOT_KICK_ANGLE_DEG: f32 = 35.0;
    pub const AUTOPILOT_KICK_STRENGTH: f32 = 18.0;
    /// Headless runs give up after this much real time (ms)
    pub const MAX_SESSION_MS: u64 = 120_000;
}

/// Unit vector at `angle` radians above the forward (+x) axis
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Angle of a vector above the forward axis (radians)
#[inline]
pub fn angle_of(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}
