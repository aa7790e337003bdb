//! Combo detection, arming and the timed execution window
//!
//! Two independent pieces of state live here:
//! - which combos are *available*, recomputed from scratch whenever one of
//!   its inputs changes (trigger history, last hit, ground contact, pass)
//! - the *execution window* of the one combo that is currently armed
//!
//! The controller never touches triggers itself. Resolving a window hands the
//! trigger back to the caller, which owns the pool and performs the action.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::time::TimeController;
use super::trigger::{TriggerAction, TriggerId, TriggerType};
use crate::hud::ComboHud;
use crate::tuning::ComboTuning;

/// Bonus maneuvers a trigger contact can arm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComboType {
    Boost30,
    Boost45,
    Boost60,
    Stop,
    Block45,
    Block60,
}

impl ComboType {
    pub const ALL: [ComboType; 6] = [
        ComboType::Boost30,
        ComboType::Boost45,
        ComboType::Boost60,
        ComboType::Stop,
        ComboType::Block45,
        ComboType::Block60,
    ];

    #[inline]
    fn index(self) -> usize {
        self as usize
    }

    /// Action the armed trigger performs when the combo is executed
    pub fn combo_action(self) -> TriggerAction {
        match self {
            ComboType::Boost30 => TriggerAction::Boost30Combo,
            ComboType::Boost45 => TriggerAction::Boost45Combo,
            ComboType::Boost60 => TriggerAction::Boost60Combo,
            ComboType::Stop => TriggerAction::StopCombo,
            ComboType::Block45 => TriggerAction::Block45Combo,
            ComboType::Block60 => TriggerAction::Block60Combo,
        }
    }

    /// Combos a contact with `kind` may arm, in priority order
    pub fn candidates(kind: TriggerType) -> &'static [ComboType] {
        match kind {
            TriggerType::Stop => &[ComboType::Stop],
            TriggerType::Boost30 => &[ComboType::Boost30],
            TriggerType::Boost45 => &[ComboType::Boost45, ComboType::Block45],
            TriggerType::Boost60 => &[ComboType::Boost60, ComboType::Block60],
            TriggerType::Slow | TriggerType::Angle | TriggerType::Block => &[],
        }
    }
}

/// Availability flag per combo type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComboTable([bool; 6]);

impl ComboTable {
    pub fn get(&self, combo: ComboType) -> bool {
        self.0[combo.index()]
    }

    fn set(&mut self, combo: ComboType, available: bool) {
        self.0[combo.index()] = available;
    }

    pub fn any(&self) -> bool {
        self.0.iter().any(|&a| a)
    }
}

/// The armed combo waiting for a tap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveCombo {
    pub combo: ComboType,
    pub trigger: TriggerId,
    pub remaining_ms: f32,
}

/// What a tap on an armed combo resolved to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComboExecution {
    pub combo: ComboType,
    pub trigger: TriggerId,
    pub action: TriggerAction,
    /// 0.0..=1.0, higher for earlier taps
    pub score: f32,
}

#[derive(Debug, Clone)]
pub struct ComboController {
    tuning: ComboTuning,
    available: ComboTable,
    visible_triggers: VecDeque<TriggerType>,
    last_hit_ground: bool,
    last_trigger_hit_boost30: bool,
    last_trigger_hit_boost: bool,
    player_has_pass: bool,
    active: Option<ActiveCombo>,
}

impl ComboController {
    pub fn new(tuning: ComboTuning) -> Self {
        Self {
            tuning,
            available: ComboTable::default(),
            visible_triggers: VecDeque::new(),
            last_hit_ground: false,
            last_trigger_hit_boost30: false,
            last_trigger_hit_boost: false,
            player_has_pass: false,
            active: None,
        }
    }

    pub fn reset(&mut self) {
        self.visible_triggers.clear();
        self.active = None;
        self.last_hit_ground = false;
        self.last_trigger_hit_boost30 = false;
        self.last_trigger_hit_boost = false;
        self.player_has_pass = false;
        self.available = ComboTable::default();
    }

    /// A zone was placed ahead of the player
    pub fn trigger_appeared(&mut self, kind: TriggerType) {
        self.visible_triggers.push_back(kind);
        while self.visible_triggers.len() > self.tuning.history_len {
            self.visible_triggers.pop_front();
        }
        self.update_available_combos();
    }

    /// A zone's action was applied to the player
    pub fn trigger_hit(&mut self, kind: TriggerType) {
        self.last_hit_ground = false;
        self.last_trigger_hit_boost30 = kind == TriggerType::Boost30;
        self.last_trigger_hit_boost = kind.is_boost_or_stop();
        self.update_available_combos();
    }

    pub fn ground_hit(&mut self) {
        self.last_hit_ground = true;
        self.update_available_combos();
    }

    pub fn set_player_has_pass(&mut self, has_pass: bool) {
        self.player_has_pass = has_pass;
        self.update_available_combos();
    }

    /// Arm the highest-priority available combo for a contact with `kind`.
    ///
    /// An open window is re-armed when the new contact has an available
    /// combo; otherwise the window stays as it is but now belongs to
    /// `trigger`, whose action is deferred in place of the earlier one.
    pub fn try_activate_combo(
        &mut self,
        trigger: TriggerId,
        kind: TriggerType,
        time: &mut TimeController,
    ) -> Option<ComboType> {
        let combo = ComboType::candidates(kind)
            .iter()
            .copied()
            .find(|&c| self.available.get(c));

        if let Some(combo) = combo {
            self.activate_combo(combo, trigger, time);
        } else if let Some(active) = self.active.as_mut() {
            log::debug!("{:?} window taken over by {:?}", active.combo, trigger);
            active.trigger = trigger;
        }
        combo
    }

    fn activate_combo(&mut self, combo: ComboType, trigger: TriggerId, time: &mut TimeController) {
        time.enter_slowmotion();
        self.active = Some(ActiveCombo {
            combo,
            trigger,
            remaining_ms: self.tuning.execution_window_ms,
        });
        log::debug!("Armed {:?} on {:?}", combo, trigger);
    }

    pub fn is_combo_activated(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_combo(&self) -> Option<&ActiveCombo> {
        self.active.as_ref()
    }

    /// Trigger whose action is deferred by the open window
    pub fn active_trigger(&self) -> Option<TriggerId> {
        self.active.map(|a| a.trigger)
    }

    /// Count the window down by real (unscaled) time.
    ///
    /// Returns the combo that ran out; its trigger must perform its pending
    /// default action.
    pub fn update(&mut self, real_tick_ms: u32) -> Option<ActiveCombo> {
        let active = self.active.as_mut()?;
        active.remaining_ms -= real_tick_ms as f32;
        if active.remaining_ms <= 0.0 {
            log::debug!("{:?} window missed", active.combo);
            return self.resolve_window();
        }
        None
    }

    /// Close the open window without executing; the trigger falls back to
    /// its pending action
    pub fn resolve_window(&mut self) -> Option<ActiveCombo> {
        self.active.take()
    }

    /// Tap while armed: swap in the combo action and close the window
    pub fn execute_combo(&mut self) -> Option<ComboExecution> {
        let score = self.calculate_score();
        let active = self.active.take()?;
        log::debug!("Executed {:?} with score {:.2}", active.combo, score);
        Some(ComboExecution {
            combo: active.combo,
            trigger: active.trigger,
            action: active.combo.combo_action(),
            score,
        })
    }

    fn calculate_score(&self) -> f32 {
        self.active
            .map(|a| (a.remaining_ms / self.tuning.max_score_ms).clamp(0.0, 1.0))
            .unwrap_or(0.0)
    }

    fn update_available_combos(&mut self) {
        let mut boost45 = false;
        let mut boost60 = false;

        for (current, next) in self
            .visible_triggers
            .iter()
            .zip(self.visible_triggers.iter().skip(1))
        {
            match (current, next) {
                (TriggerType::Boost45, TriggerType::Boost60) => boost45 = true,
                (TriggerType::Boost60, TriggerType::Boost45) => boost60 = true,
                _ => {}
            }
        }

        let pass = self.player_has_pass;
        self.available.set(ComboType::Boost30, self.last_trigger_hit_boost30);
        self.available.set(ComboType::Boost45, boost45 && !pass);
        self.available.set(ComboType::Boost60, boost60 && !pass);
        self.available.set(ComboType::Block45, boost45 && pass);
        self.available.set(ComboType::Block60, boost60 && pass);
        self.available.set(
            ComboType::Stop,
            self.last_trigger_hit_boost && !self.last_hit_ground,
        );
    }

    pub fn available_combos(&self) -> &ComboTable {
        &self.available
    }

    pub fn is_available(&self, combo: ComboType) -> bool {
        self.available.get(combo)
    }

    /// Most recently appeared zone types, oldest first
    pub fn visible_triggers(&self) -> impl Iterator<Item = TriggerType> + '_ {
        self.visible_triggers.iter().copied()
    }

    pub fn player_has_pass(&self) -> bool {
        self.player_has_pass
    }

    /// Fraction of the window left, 0 when nothing is armed
    pub fn time_left(&self) -> f32 {
        self.active
            .map(|a| (a.remaining_ms / self.tuning.execution_window_ms).max(0.0))
            .unwrap_or(0.0)
    }

    pub fn update_combo_hud(&self, hud: &mut impl ComboHud) {
        hud.set_combo_availability(&self.available, self.player_has_pass);
        hud.set_combo_active(self.is_combo_activated(), self.time_left());
    }
}
