//! Contact detection between the player and trigger zones
//!
//! Zones are tall boxes hanging below their anchor; the player is a small
//! square. Overlap is reported every tick the shapes touch and the zone's
//! one-shot flag turns that into a single contact.

use glam::Vec2;

use super::trigger::TriggerType;
use crate::consts::PLAYER_HALF_EXTENT;

/// Axis-aligned box, x forward and y up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    /// Touching edges count as overlap
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let delta = (self.center - other.center).abs();
        let reach = self.half_extents + other.half_extents;
        delta.x <= reach.x && delta.y <= reach.y
    }
}

/// Contact box of a zone anchored at `pos`
pub fn trigger_zone(kind: TriggerType, pos: Vec2) -> Aabb {
    match kind {
        // Boost zones sit low, only reachable along the ground
        TriggerType::Boost30 | TriggerType::Boost45 | TriggerType::Boost60 => {
            Aabb::new(pos + Vec2::new(0.0, -1.175), Vec2::new(0.5, 0.625))
        }
        TriggerType::Slow | TriggerType::Angle | TriggerType::Stop | TriggerType::Block => {
            Aabb::new(pos + Vec2::new(0.0, -0.55), Vec2::new(0.5, 1.25))
        }
    }
}

/// Contact box of the player centred at `pos`
pub fn player_box(pos: Vec2) -> Aabb {
    Aabb::new(pos, Vec2::splat(PLAYER_HALF_EXTENT))
}
