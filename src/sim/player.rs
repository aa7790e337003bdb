//! The glider
//!
//! Two velocities are tracked. `body.vel` is what the physics step moves the
//! player by; `vel` is the intended trajectory that trigger actions build up.
//! Ground hits re-launch the body along the trajectory, which is what makes
//! the player bounce.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::combo::ComboController;
use super::time::TimeController;
use crate::hud::{PlayerHud, PlayerStats};
use crate::tuning::PlayerTuning;
use crate::heading;

/// Shield level; consumed to override a trigger's action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerPass {
    #[default]
    None,
    Regular,
    Super,
}

/// Graphic currently shown for the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerGfx {
    Idle,
    Flying,
    Hit,
    /// Hidden (stopped by a stop zone)
    None,
}

/// Physics handle: position and velocity, x forward and y up
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Body {
    /// Move by the current velocity over `step_ms` of game time
    pub fn integrate(&mut self, step_ms: f32) {
        self.pos += self.vel * step_ms * 0.001;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    tuning: PlayerTuning,
    pub body: Body,
    vel: Vec2,
    distance: f32,
    stopped: bool,
    soaring: bool,
    gravity: bool,
    bounce: bool,
    pass: PlayerPass,
    soar_gauge: f32,
    ascent_gauge: f32,
    trigger_collision: bool,
    hit_anim: bool,
    time_hit: f64,
    gfx: PlayerGfx,
}

impl Player {
    pub fn new(tuning: PlayerTuning) -> Self {
        Self {
            tuning,
            body: Body::default(),
            vel: Vec2::ZERO,
            distance: 0.0,
            stopped: false,
            soaring: false,
            gravity: true,
            bounce: false,
            pass: PlayerPass::None,
            soar_gauge: 0.0,
            ascent_gauge: 0.0,
            trigger_collision: false,
            hit_anim: false,
            time_hit: 0.0,
            gfx: PlayerGfx::Idle,
        }
    }

    /// Place on the ground at `x`, at rest
    pub fn reset(&mut self, x: f32) {
        *self = Self::new(self.tuning);
        self.body.pos = Vec2::new(x, self.tuning.ground_offset);
        self.distance = x;
    }

    /// Per-tick update after the physics step and contact resolution
    pub fn update(&mut self, combos: &mut ComboController, time: &mut TimeController) {
        if self.stopped {
            return;
        }

        let now = time.time_now();
        if self.hit_anim && self.time_hit + self.tuning.hit_anim_duration_ms < now {
            self.gfx = PlayerGfx::Flying;
            self.hit_anim = false;
        }

        let ground = self.tuning.ground_offset;
        let ground_hit = self.body.pos.y < ground;
        if ground_hit {
            self.body.pos.y = -(self.body.pos.y - ground) * self.tuning.ground_hit_vel_scale + ground;

            if !self.trigger_collision {
                if self.bounce {
                    self.add_velocity(slope_angle(self.vel), self.tuning.bounce_boost);
                    if !combos.is_combo_activated() {
                        time.enter_slowmotion();
                    }
                } else {
                    self.scale_velocity(self.tuning.ground_hit_vel_scale);
                }

                combos.ground_hit();

                if self.vel.length() > self.tuning.hit_speed {
                    self.was_hit(now);
                }
            }
        }

        if self.soaring && (self.trigger_collision || ground_hit) {
            self.soaring = false;
        }

        self.trigger_collision = false;

        if self.gravity {
            self.body.vel.y -= self.tuning.gravity * time.clock().game_step() * 0.001;
        }

        let x = self.body.pos.x;
        self.soar_gauge =
            (self.soar_gauge + (x - self.distance) / self.tuning.soar_distance_full).min(1.0);
        self.distance = x;

        if self.vel.length() < self.tuning.stop_speed {
            self.stop();
        }
    }

    pub fn kick_off(&mut self, angle: f32, vel: f32, now: f64) {
        self.stopped = false;
        self.add_velocity(angle, vel);
        self.was_hit(now);
    }

    /// Feed a combo score into the ascent gauge; true once it is full
    pub fn add_combo_score(&mut self, score: f32) -> bool {
        self.ascent_gauge = (self.ascent_gauge + score / self.tuning.ascent_score_full).min(1.0);
        self.ascent_gauge >= 1.0
    }

    /// Glide if the soar gauge is full and the player is falling within the
    /// soar band. Returns whether the glide started.
    pub fn soar(&mut self) -> bool {
        let height = self.body.pos.y;
        let can_soar = self.soar_gauge >= 1.0
            && !self.stopped
            && self.body.vel.y < 0.0
            && height > self.tuning.soar_min_height
            && height < self.tuning.soar_max_height;
        if !can_soar {
            return false;
        }

        let speed = self.body.vel.length();
        self.body.vel = heading(-self.tuning.soar_angle_deg.to_radians()) * speed;
        self.soar_gauge = 0.0;
        self.soaring = true;
        true
    }

    /// Swap forward and upward components of the trajectory
    pub fn skew_trajectory(&mut self) {
        self.vel = Vec2::new(self.vel.y, self.vel.x);
        self.body.vel = self.vel;
    }

    pub fn scale_velocity(&mut self, factor: f32) {
        self.vel *= factor;
        self.body.vel = self.vel;
    }

    pub fn add_velocity(&mut self, angle: f32, vel: f32) {
        self.vel += heading(angle) * vel;
        self.body.vel = self.vel;
    }

    pub fn stop_by_trigger(&mut self) {
        self.stop();
        self.gfx = PlayerGfx::None;
    }

    /// Fly straight, ignoring gravity, without touching the trajectory
    pub fn head_straight(&mut self, angle: f32, vel: f32) {
        self.gravity = false;
        self.body.vel = heading(angle) * vel;
    }

    pub fn resume_gravity(&mut self) {
        self.gravity = true;
    }

    pub fn set_bounce(&mut self, bounce: bool) {
        self.bounce = bounce;
    }

    pub fn set_pass(&mut self, pass: PlayerPass, combos: &mut ComboController) {
        self.pass = pass;
        combos.set_player_has_pass(self.has_pass());
    }

    /// A trigger zone was touched this tick
    pub fn trigger_collision(&mut self, now: f64) {
        self.trigger_collision = true;
        self.was_hit(now);
    }

    fn stop(&mut self) {
        self.stopped = true;
        self.scale_velocity(0.0);
    }

    fn was_hit(&mut self, now: f64) {
        if !self.stopped {
            self.gfx = PlayerGfx::Hit;
            self.hit_anim = true;
            self.time_hit = now;
        }
    }

    pub fn pass(&self) -> PlayerPass {
        self.pass
    }

    pub fn has_pass(&self) -> bool {
        self.pass != PlayerPass::None
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn is_soaring(&self) -> bool {
        self.soaring
    }

    pub fn bounce(&self) -> bool {
        self.bounce
    }

    pub fn gravity_enabled(&self) -> bool {
        self.gravity
    }

    /// Intended trajectory velocity
    pub fn trajectory(&self) -> Vec2 {
        self.vel
    }

    pub fn gfx(&self) -> PlayerGfx {
        self.gfx
    }

    pub fn soar_gauge(&self) -> f32 {
        self.soar_gauge
    }

    pub fn ascent_gauge(&self) -> f32 {
        self.ascent_gauge
    }

    pub fn stats(&self) -> PlayerStats {
        PlayerStats {
            speed: self.vel.x,
            distance: self.distance,
            soar_gauge: self.soar_gauge,
            ascent_gauge: self.ascent_gauge,
            height: self.body.pos.y,
        }
    }

    pub fn update_player_hud(&self, hud: &mut impl PlayerHud) {
        hud.update(&self.stats());
    }
}

/// Angle of the trajectory's slope, folded into the forward half-plane so a
/// bounce always pushes forward
fn slope_angle(v: Vec2) -> f32 {
    if v.x == 0.0 && v.y == 0.0 {
        return 0.0;
    }
    (v.y / v.x).atan()
}
