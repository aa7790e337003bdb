//! HUD contracts
//!
//! The simulation pushes its display state through these traits; the
//! presentation layer decides how to draw it. [`HudSnapshot`] records the
//! latest values and is what the headless runner prints.

use serde::{Deserialize, Serialize};

use crate::sim::{ComboTable, TriggerType};

/// Icon shown in one of the three "upcoming zone" slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TriggerIndicator {
    Boost30,
    Boost45,
    Boost60,
    Slow,
    Angle,
    Stop,
    Block,
    /// Empty slot
    #[default]
    None,
}

impl From<TriggerType> for TriggerIndicator {
    fn from(kind: TriggerType) -> Self {
        match kind {
            TriggerType::Boost30 => Self::Boost30,
            TriggerType::Boost45 => Self::Boost45,
            TriggerType::Boost60 => Self::Boost60,
            TriggerType::Slow => Self::Slow,
            TriggerType::Angle => Self::Angle,
            TriggerType::Stop => Self::Stop,
            TriggerType::Block => Self::Block,
        }
    }
}

/// Numbers shown for the player
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerStats {
    pub speed: f32,
    pub distance: f32,
    pub soar_gauge: f32,
    pub ascent_gauge: f32,
    pub height: f32,
}

/// Combo icons and the execution countdown bar
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ComboHudState {
    pub availability: ComboTable,
    /// Block variants are shown instead of plain boosts while a pass is held
    pub pass: bool,
    pub active: bool,
    /// Fraction of the window left
    pub time_left: f32,
}

pub trait ComboHud {
    fn set_combo_availability(&mut self, availability: &ComboTable, pass: bool);
    fn set_combo_active(&mut self, active: bool, time_left: f32);
}

pub trait TriggerHud {
    fn set_indicators(&mut self, indicators: [TriggerIndicator; 3]);
}

pub trait PlayerHud {
    fn update(&mut self, stats: &PlayerStats);
}

/// Latest state pushed to every HUD element
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub combos: ComboHudState,
    pub indicators: [TriggerIndicator; 3],
    pub player: PlayerStats,
}

impl ComboHud for HudSnapshot {
    fn set_combo_availability(&mut self, availability: &ComboTable, pass: bool) {
        self.combos.availability = *availability;
        self.combos.pass = pass;
    }

    fn set_combo_active(&mut self, active: bool, time_left: f32) {
        self.combos.active = active;
        self.combos.time_left = time_left;
    }
}

impl TriggerHud for HudSnapshot {
    fn set_indicators(&mut self, indicators: [TriggerIndicator; 3]) {
        self.indicators = indicators;
    }
}

impl PlayerHud for HudSnapshot {
    fn update(&mut self, stats: &PlayerStats) {
        self.player = *stats;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indicator_from_every_type() {
        for kind in TriggerType::ALL {
            assert_ne!(TriggerIndicator::from(kind), TriggerIndicator::None);
        }
        assert_eq!(TriggerIndicator::from(TriggerType::Block), TriggerIndicator::Block);
    }

    #[test]
    fn test_snapshot_records_latest() {
        let mut hud = HudSnapshot::default();
        hud.set_combo_active(true, 0.4);
        hud.set_combo_active(false, 0.0);
        assert!(!hud.combos.active);
        assert_eq!(hud.combos.time_left, 0.0);

        let stats = PlayerStats {
            speed: 3.0,
            height: 1.5,
            ..Default::default()
        };
        PlayerHud::update(&mut hud, &stats);
        assert_eq!(hud.player, stats);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut hud = HudSnapshot::default();
        hud.set_indicators([
            TriggerIndicator::Slow,
            TriggerIndicator::Stop,
            TriggerIndicator::None,
        ]);
        let json = serde_json::to_string(&hud).unwrap();
        assert!(json.contains("\"Slow\""));
        assert!(json.contains("\"time_left\""));
    }
}
