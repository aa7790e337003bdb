//! Trigger pool
//!
//! Seven zones, one per type, are created once and shuffled between an idle
//! *available* set and an *active* run placed ahead of the player in
//! ascending x. Recycling is driven by the player's x position, not by
//! frame count, so zone density stays constant at any speed.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::combo::{ComboController, ComboType};
use super::contact::{Aabb, trigger_zone};
use super::trigger::{ActionContext, Trigger, TriggerAction, TriggerId, TriggerType};
use crate::hud::{TriggerHud, TriggerIndicator};
use crate::tuning::TriggerTuning;

/// Outcome of the first contact with a zone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub trigger: TriggerId,
    pub kind: TriggerType,
    /// Combo armed by this contact
    pub armed: Option<ComboType>,
    /// The zone's action waits on an open combo window
    pub deferred: bool,
}

#[derive(Debug, Clone)]
pub struct TriggerManager {
    tuning: TriggerTuning,
    /// Arena; a trigger's id is its index
    triggers: Vec<Trigger>,
    available: Vec<TriggerId>,
    active: VecDeque<TriggerId>,
    reload_x: f32,
    start_x: f32,
    rng: Pcg32,
}

impl TriggerManager {
    pub fn new(tuning: TriggerTuning, seed: u64) -> Self {
        let triggers: Vec<Trigger> = TriggerType::ALL
            .iter()
            .enumerate()
            .map(|(i, &kind)| Trigger::new(TriggerId(i), kind, tuning.parked))
            .collect();
        let available = triggers.iter().map(Trigger::id).collect();

        let mut manager = Self {
            tuning,
            triggers,
            available,
            active: VecDeque::new(),
            reload_x: 0.0,
            start_x: 0.0,
            rng: Pcg32::seed_from_u64(seed),
        };
        manager.reset(0.0);
        manager
    }

    /// Recycle passed zones while the player is beyond the reload point
    pub fn update(&mut self, x: f32, allow_block: bool, combos: &mut ComboController) {
        while self.reload_x < x {
            // Return the left-most zone
            let Some(recycled) = self.active.pop_front() else {
                log::warn!("Reload point {} passed with no zones placed", self.reload_x);
                break;
            };

            let spawn_x = self.reload_x + self.tuning.distance * self.tuning.spawn_lead;
            self.introduce_trigger(spawn_x, allow_block, combos);

            // Back to the pool only after the draw so it is not placed again immediately
            self.triggers[recycled.0].set_position(self.tuning.parked);
            self.available.push(recycled);

            self.reload_x += self.tuning.distance;
        }
    }

    /// Park every zone and line the first placement up with the grid at/after `x`
    pub fn reset(&mut self, x: f32) {
        let d = self.tuning.distance;
        self.start_x = d + d * ((x + d - 0.001) / d).trunc();

        self.available.extend(self.active.drain(..));
        for &id in &self.available {
            self.triggers[id.0].set_position(self.tuning.parked);
        }

        // Reload right after the first zone
        self.reload_x = self.start_x + d * self.tuning.reload_offset;
    }

    /// Place the opening run of zones
    pub fn kick_off(&mut self, combos: &mut ComboController) {
        for i in 0..self.tuning.kickoff_count {
            let x = self.start_x + self.tuning.distance * i as f32;
            self.introduce_trigger(x, true, combos);
        }
    }

    /// Place a random available zone at `x`.
    ///
    /// When blocks are not allowed a drawn block is swapped for one more
    /// draw. The zone of an open combo window is never drawn.
    pub fn introduce_trigger(
        &mut self,
        x: f32,
        allow_block: bool,
        combos: &mut ComboController,
    ) -> Option<TriggerId> {
        let reserved = combos.active_trigger();
        let Some(mut id) = self.draw(reserved) else {
            log::warn!("No zone available to place at {}", x);
            return None;
        };

        if !allow_block && self.triggers[id.0].kind() == TriggerType::Block {
            if let Some(redrawn) = self.draw(reserved) {
                self.available.push(id);
                id = redrawn;
            }
        }

        if let Some(&last) = self.active.back() {
            self.triggers[last.0].set_next_trigger(Some(id));
        }

        let trigger = &mut self.triggers[id.0];
        trigger.initialize();
        trigger.set_position(Vec2::new(x, self.tuning.height));
        let kind = trigger.kind();
        self.active.push_back(id);

        log::debug!("Placed {:?} ({:?}) at {:.1}", kind, id, x);
        combos.trigger_appeared(kind);
        Some(id)
    }

    /// Take a uniformly random available zone, skipping `reserved`
    fn draw(&mut self, reserved: Option<TriggerId>) -> Option<TriggerId> {
        let candidates: Vec<usize> = self
            .available
            .iter()
            .enumerate()
            .filter(|&(_, &id)| Some(id) != reserved)
            .map(|(slot, _)| slot)
            .collect();
        if candidates.is_empty() {
            return None;
        }
        let slot = candidates[self.rng.random_range(0..candidates.len())];
        Some(self.available.remove(slot))
    }

    /// Run a zone's pending action and install any combo follow-up it chains
    pub fn perform_action(&mut self, id: TriggerId, ctx: &mut ActionContext<'_>) {
        let followup = self.triggers[id.0].perform_action(&self.tuning, ctx);
        if let Some(followup) = followup {
            self.set_action(followup.trigger, followup.action);
        }
    }

    pub fn set_action(&mut self, id: TriggerId, action: TriggerAction) {
        self.triggers[id.0].set_action(action);
    }

    /// Collision callback for a zone. Only the first contact per placement
    /// does anything.
    pub fn on_collision(&mut self, id: TriggerId, ctx: &mut ActionContext<'_>) -> Option<Contact> {
        if self.triggers[id.0].collision_registered() {
            return None;
        }

        let trigger = &mut self.triggers[id.0];
        trigger.register_collision(ctx.player.pass());
        let kind = trigger.kind();

        // An open window defers this zone's action, whether or not it armed
        let armed = ctx.combos.try_activate_combo(id, kind, ctx.time);
        let deferred = ctx.combos.is_combo_activated();
        if !deferred {
            self.perform_action(id, ctx);
        }

        ctx.player.trigger_collision(ctx.time.time_now());

        Some(Contact {
            trigger: id,
            kind,
            armed,
            deferred,
        })
    }

    /// Placed zones touching `player` that have not fired yet, left to right
    pub fn contacts(&self, player: &Aabb) -> Vec<TriggerId> {
        self.active
            .iter()
            .map(|&id| &self.triggers[id.0])
            .filter(|t| !t.collision_registered())
            .filter(|t| trigger_zone(t.kind(), t.pos()).overlaps(player))
            .map(Trigger::id)
            .collect()
    }

    pub fn update_trigger_hud(&self, hud: &mut impl TriggerHud) {
        hud.set_indicators(self.indicators());
    }

    /// Types of the next three placed zones, `None` for empty slots
    pub fn indicators(&self) -> [TriggerIndicator; 3] {
        let mut indicators = [TriggerIndicator::None; 3];
        for (slot, &id) in indicators.iter_mut().zip(self.active.iter()) {
            *slot = self.triggers[id.0].kind().into();
        }
        indicators
    }

    pub fn trigger(&self, id: TriggerId) -> &Trigger {
        &self.triggers[id.0]
    }

    pub fn triggers(&self) -> &[Trigger] {
        &self.triggers
    }

    /// Placed zones, ascending x
    pub fn active(&self) -> impl Iterator<Item = TriggerId> + '_ {
        self.active.iter().copied()
    }

    pub fn available(&self) -> &[TriggerId] {
        &self.available
    }

    pub fn reload_x(&self) -> f32 {
        self.reload_x
    }

    pub fn start_x(&self) -> f32 {
        self.start_x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hud::HudSnapshot;
    use crate::sim::player::Player;
    use crate::sim::time::{Clock, TimeController};
    use crate::tuning::{ComboTuning, PlayerTuning, TimeTuning};
    use proptest::prelude::*;

    fn setup(seed: u64) -> (TriggerManager, ComboController) {
        (
            TriggerManager::new(TriggerTuning::default(), seed),
            ComboController::new(ComboTuning::default()),
        )
    }

    fn id_of(manager: &TriggerManager, kind: TriggerType) -> TriggerId {
        manager
            .triggers()
            .iter()
            .find(|t| t.kind() == kind)
            .map(Trigger::id)
            .unwrap()
    }

    fn active_xs(manager: &TriggerManager) -> Vec<f32> {
        manager.active().map(|id| manager.trigger(id).pos().x).collect()
    }

    #[test]
    fn test_new_pool_is_idle() {
        let (manager, _) = setup(1);
        assert_eq!(manager.available().len(), 7);
        assert_eq!(manager.active().count(), 0);
        assert!(manager.triggers().iter().all(|t| t.pos() == crate::consts::TRIGGER_PARKED));
        assert_eq!(manager.indicators(), [TriggerIndicator::None; 3]);
    }

    #[test]
    fn test_reset_snaps_to_grid() {
        let (mut manager, _) = setup(1);
        manager.reset(0.0);
        assert_eq!(manager.start_x(), 10.0);
        assert!((manager.reload_x() - 12.0).abs() < 1e-5);

        manager.reset(10.0);
        assert_eq!(manager.start_x(), 20.0);

        manager.reset(13.5);
        assert_eq!(manager.start_x(), 30.0);
    }

    #[test]
    fn test_kick_off_places_linked_run() {
        let (mut manager, mut combos) = setup(7);
        manager.kick_off(&mut combos);

        assert_eq!(active_xs(&manager), vec![10.0, 20.0, 30.0]);
        assert_eq!(manager.available().len(), 4);

        let active: Vec<_> = manager.active().collect();
        assert_eq!(manager.trigger(active[0]).next(), Some(active[1]));
        assert_eq!(manager.trigger(active[1]).next(), Some(active[2]));
        assert_eq!(manager.trigger(active[2]).next(), None);

        let seen: Vec<_> = combos.visible_triggers().collect();
        let placed: Vec<_> = active.iter().map(|&id| manager.trigger(id).kind()).collect();
        assert_eq!(seen, placed);
    }

    #[test]
    fn test_update_recycles_leftmost() {
        let (mut manager, mut combos) = setup(3);
        manager.kick_off(&mut combos);
        let first = manager.active().next().unwrap();

        manager.update(11.0, true, &mut combos);
        assert_eq!(active_xs(&manager), vec![10.0, 20.0, 30.0]);

        manager.update(12.5, true, &mut combos);
        assert_eq!(active_xs(&manager), vec![20.0, 30.0, 40.0]);
        assert!((manager.reload_x() - 22.0).abs() < 1e-5);
        assert!(manager.available().contains(&first));
        assert_eq!(manager.trigger(first).pos(), crate::consts::TRIGGER_PARKED);
    }

    #[test]
    fn test_update_catches_up_after_jump() {
        let (mut manager, mut combos) = setup(3);
        manager.kick_off(&mut combos);
        manager.update(55.0, true, &mut combos);
        assert_eq!(active_xs(&manager), vec![60.0, 70.0, 80.0]);
    }

    #[test]
    fn test_update_before_kick_off_is_safe() {
        let (mut manager, mut combos) = setup(3);
        manager.update(100.0, true, &mut combos);
        assert_eq!(manager.active().count(), 0);
        assert_eq!(manager.available().len(), 7);
    }

    #[test]
    fn test_block_redrawn_when_disallowed() {
        for seed in 0..32 {
            let (mut manager, mut combos) = setup(seed);
            let block = id_of(&manager, TriggerType::Block);
            let slow = id_of(&manager, TriggerType::Slow);
            manager.available = vec![block, slow];

            let placed = manager.introduce_trigger(10.0, false, &mut combos).unwrap();
            assert_eq!(placed, slow);
            assert_eq!(manager.available(), &[block]);
        }
    }

    #[test]
    fn test_block_kept_when_nothing_else_left() {
        let (mut manager, mut combos) = setup(0);
        let block = id_of(&manager, TriggerType::Block);
        manager.available = vec![block];
        assert_eq!(manager.introduce_trigger(10.0, false, &mut combos), Some(block));
    }

    #[test]
    fn test_open_combo_zone_is_never_drawn() {
        for seed in 0..32 {
            let (mut manager, mut combos) = setup(seed);
            let mut time = TimeController::new(Clock::new(), TimeTuning::default());
            let boost30 = id_of(&manager, TriggerType::Boost30);
            combos.trigger_hit(TriggerType::Boost30);
            combos.try_activate_combo(boost30, TriggerType::Boost30, &mut time);

            for i in 0..6 {
                let placed = manager.introduce_trigger(10.0 * i as f32, true, &mut combos);
                assert_ne!(placed, Some(boost30));
            }
            assert_eq!(manager.available(), &[boost30]);
            assert_eq!(manager.introduce_trigger(70.0, true, &mut combos), None);
        }
    }

    #[test]
    fn test_followup_installed_on_next_zone() {
        let (mut manager, mut combos) = setup(11);
        manager.kick_off(&mut combos);
        let active: Vec<_> = manager.active().collect();
        manager.triggers[active[0].0].set_action(TriggerAction::Boost45Combo);

        let mut player = Player::new(PlayerTuning::default());
        player.reset(0.0);
        let mut time = TimeController::new(Clock::new(), TimeTuning::default());
        let mut ctx = ActionContext {
            player: &mut player,
            combos: &mut combos,
            time: &mut time,
        };
        manager.perform_action(active[0], &mut ctx);

        assert_eq!(
            manager.trigger(active[1]).action(),
            TriggerAction::Boost45ComboFollowup
        );
    }

    #[test]
    fn test_hud_indicators_follow_active_order() {
        let (mut manager, mut combos) = setup(5);
        manager.kick_off(&mut combos);
        let mut hud = HudSnapshot::default();
        manager.update_trigger_hud(&mut hud);

        let expected: Vec<TriggerIndicator> = manager
            .active()
            .map(|id| manager.trigger(id).kind().into())
            .collect();
        assert_eq!(hud.indicators.to_vec(), expected);
    }

    proptest! {
        #[test]
        fn prop_pool_partition_and_order(
            seed in any::<u64>(),
            steps in prop::collection::vec((0.0f32..400.0, any::<bool>()), 1..30),
        ) {
            let (mut manager, mut combos) = setup(seed);
            manager.kick_off(&mut combos);
            for (x, allow_block) in steps {
                manager.update(x, allow_block, &mut combos);

                prop_assert_eq!(manager.available().len() + manager.active().count(), 7);

                let mut all: Vec<_> = manager.available().to_vec();
                all.extend(manager.active());
                all.sort();
                all.dedup();
                prop_assert_eq!(all.len(), 7);

                let xs = active_xs(&manager);
                prop_assert!(xs.windows(2).all(|w| w[0] < w[1]));
            }
        }

        #[test]
        fn prop_disallowed_block_never_placed(seed in any::<u64>(), picks in 1usize..4) {
            let (mut manager, mut combos) = setup(seed);
            manager.kick_off(&mut combos);
            for i in 0..picks {
                let non_block = manager
                    .available()
                    .iter()
                    .filter(|&&id| manager.trigger(id).kind() != TriggerType::Block)
                    .count();
                let placed = manager
                    .introduce_trigger(40.0 + 10.0 * i as f32, false, &mut combos)
                    .unwrap();
                if non_block >= 2 {
                    prop_assert_ne!(manager.trigger(placed).kind(), TriggerType::Block);
                }
            }
        }
    }
}
