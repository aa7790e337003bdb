//! Trigger zones and the effects they apply to the player
//!
//! A trigger's *type* is what the HUD shows and what combos key on; its
//! *action* is what actually happens on contact. Combos swap the action
//! without touching the type.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::combo::ComboController;
use super::player::{Player, PlayerPass};
use super::time::TimeController;
use crate::tuning::TriggerTuning;

/// Intrinsic kind of a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerType {
    Boost30,
    Boost45,
    Boost60,
    Slow,
    Angle,
    Stop,
    Block,
}

impl TriggerType {
    /// One zone of each type makes up the pool
    pub const ALL: [TriggerType; 7] = [
        TriggerType::Boost30,
        TriggerType::Boost45,
        TriggerType::Boost60,
        TriggerType::Slow,
        TriggerType::Angle,
        TriggerType::Stop,
        TriggerType::Block,
    ];

    /// Action a freshly placed zone of this type performs
    pub fn default_action(self) -> TriggerAction {
        match self {
            TriggerType::Boost30 => TriggerAction::Boost30,
            TriggerType::Boost45 => TriggerAction::Boost45,
            TriggerType::Boost60 => TriggerAction::Boost60,
            TriggerType::Slow => TriggerAction::Slow,
            TriggerType::Angle => TriggerAction::Angle,
            TriggerType::Stop => TriggerAction::Stop,
            TriggerType::Block => TriggerAction::Block,
        }
    }

    /// Boost and stop zones open the stop combo when hit
    pub fn is_boost_or_stop(self) -> bool {
        matches!(
            self,
            TriggerType::Boost30 | TriggerType::Boost45 | TriggerType::Boost60 | TriggerType::Stop
        )
    }
}

/// Concrete effect performed on contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerAction {
    Boost30,
    Boost30Combo,
    Boost45,
    Boost45Combo,
    Boost45ComboFollowup,
    Boost60,
    Boost60Combo,
    Boost60ComboFollowup,
    Slow,
    Angle,
    Stop,
    StopCombo,
    Block,
    UseBlock,
    Block45Combo,
    Block45ComboFollowup,
    Block60Combo,
    Block60ComboFollowup,
}

impl TriggerAction {
    /// Second half of a two-zone combo, left on the next zone
    pub fn followup(self) -> Option<TriggerAction> {
        match self {
            TriggerAction::Boost45Combo => Some(TriggerAction::Boost45ComboFollowup),
            TriggerAction::Boost60Combo => Some(TriggerAction::Boost60ComboFollowup),
            TriggerAction::Block45Combo => Some(TriggerAction::Block45ComboFollowup),
            TriggerAction::Block60Combo => Some(TriggerAction::Block60ComboFollowup),
            _ => None,
        }
    }
}

/// Slot in the trigger pool; stays valid across recycling and resets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TriggerId(pub usize);

/// Which of the zone's two graphics is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerVisual {
    Active,
    Inactive,
}

/// Everything outside the pool a trigger action can reach
pub struct ActionContext<'a> {
    pub player: &'a mut Player,
    pub combos: &'a mut ComboController,
    pub time: &'a mut TimeController,
}

/// Action to install on another zone once this one has acted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Followup {
    pub trigger: TriggerId,
    pub action: TriggerAction,
}

/// A pooled zone instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trigger {
    id: TriggerId,
    kind: TriggerType,
    action: TriggerAction,
    next: Option<TriggerId>,
    pos: Vec2,
    visual: TriggerVisual,
    collision_registered: bool,
}

impl Trigger {
    pub fn new(id: TriggerId, kind: TriggerType, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            action: kind.default_action(),
            next: None,
            pos,
            visual: TriggerVisual::Active,
            collision_registered: false,
        }
    }

    /// Prepare for a new placement
    pub fn initialize(&mut self) {
        self.collision_registered = false;
        self.visual = TriggerVisual::Active;
        self.next = None;
        self.set_default_action();
    }

    pub fn set_default_action(&mut self) {
        self.action = self.kind.default_action();
    }

    pub fn set_action(&mut self, action: TriggerAction) {
        self.action = action;
    }

    pub fn set_next_trigger(&mut self, next: Option<TriggerId>) {
        self.next = next;
    }

    pub fn set_position(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    pub fn id(&self) -> TriggerId {
        self.id
    }

    pub fn kind(&self) -> TriggerType {
        self.kind
    }

    pub fn action(&self) -> TriggerAction {
        self.action
    }

    pub fn next(&self) -> Option<TriggerId> {
        self.next
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn visual(&self) -> TriggerVisual {
        self.visual
    }

    pub fn collision_registered(&self) -> bool {
        self.collision_registered
    }

    /// First contact since placement: latch the one-shot flag and let a held
    /// pass override the action. Returns false for repeat contacts.
    pub fn register_collision(&mut self, pass: PlayerPass) -> bool {
        if self.collision_registered {
            return false;
        }
        self.collision_registered = true;

        match pass {
            PlayerPass::Regular => self.set_action(TriggerAction::UseBlock),
            PlayerPass::Super => {
                if matches!(
                    self.kind,
                    TriggerType::Slow | TriggerType::Angle | TriggerType::Stop
                ) {
                    self.set_action(TriggerAction::UseBlock);
                }
            }
            PlayerPass::None => {}
        }

        true
    }

    /// Apply the pending action to the player.
    ///
    /// Two-zone combos return the follow-up to install on the next zone;
    /// the pool owns both zones so it does the installing.
    pub fn perform_action(
        &mut self,
        tuning: &TriggerTuning,
        ctx: &mut ActionContext<'_>,
    ) -> Option<Followup> {
        let action = self.action;
        let player = &mut *ctx.player;
        let mut followup = None;

        match action {
            TriggerAction::Boost30 => player.add_velocity(30f32.to_radians(), tuning.boost_speed),
            TriggerAction::Boost45 => player.add_velocity(45f32.to_radians(), tuning.boost_speed),
            TriggerAction::Boost60 => player.add_velocity(60f32.to_radians(), tuning.boost_speed),
            TriggerAction::Slow => {
                player.set_bounce(false);
                player.scale_velocity(tuning.slowdown_vel_scale);
            }
            TriggerAction::Angle => {
                player.set_bounce(false);
                player.skew_trajectory();
            }
            TriggerAction::Stop => player.stop_by_trigger(),
            TriggerAction::Block => player.set_pass(PlayerPass::Regular, ctx.combos),
            TriggerAction::UseBlock => player.set_pass(PlayerPass::None, ctx.combos),
            TriggerAction::Boost30Combo => {
                player.add_velocity(30f32.to_radians(), tuning.combo_boost_speed)
            }
            TriggerAction::StopCombo => {
                player.add_velocity(45f32.to_radians(), tuning.stop_combo_speed)
            }
            TriggerAction::Boost45Combo | TriggerAction::Boost60Combo => {
                followup = self.chain(action);
                player.head_straight(0.0, tuning.head_straight_speed);
            }
            TriggerAction::Block45Combo | TriggerAction::Block60Combo => {
                followup = self.chain(action);
                player.set_pass(PlayerPass::None, ctx.combos);
                player.head_straight(0.0, tuning.head_straight_speed);
            }
            TriggerAction::Block45ComboFollowup => {
                // Block variant keeps the player bouncing off the ground afterwards
                player.set_bounce(true);
                finish_combo_arc(player, 45.0, tuning);
            }
            TriggerAction::Boost45ComboFollowup => finish_combo_arc(player, 45.0, tuning),
            TriggerAction::Block60ComboFollowup => {
                // Block variant upgrades the pass to super
                player.set_pass(PlayerPass::Super, ctx.combos);
                finish_combo_arc(player, 60.0, tuning);
            }
            TriggerAction::Boost60ComboFollowup => finish_combo_arc(player, 60.0, tuning),
        }

        if !matches!(action, TriggerAction::UseBlock | TriggerAction::StopCombo) {
            self.visual = TriggerVisual::Inactive;
        }

        if !matches!(action, TriggerAction::UseBlock | TriggerAction::Stop) {
            ctx.combos.trigger_hit(self.kind);
        }

        ctx.time.enter_slowmotion();

        followup
    }

    fn chain(&self, action: TriggerAction) -> Option<Followup> {
        let followup = action.followup()?;
        match self.next {
            Some(trigger) => Some(Followup {
                trigger,
                action: followup,
            }),
            None => {
                log::warn!("{:?} on {:?} has no next zone to chain onto", action, self.id);
                None
            }
        }
    }
}

/// Second half of every two-zone combo: launch along the arc and fall again
fn finish_combo_arc(player: &mut Player, angle_deg: f32, tuning: &TriggerTuning) {
    player.add_velocity(angle_deg.to_radians(), tuning.combo_boost_speed);
    player.resume_gravity();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::time::Clock;
    use crate::tuning::{ComboTuning, PlayerTuning, TimeTuning};

    struct Rig {
        player: Player,
        combos: ComboController,
        time: TimeController,
    }

    impl Rig {
        fn new() -> Self {
            let mut player = Player::new(PlayerTuning::default());
            player.reset(0.0);
            Self {
                player,
                combos: ComboController::new(ComboTuning::default()),
                time: TimeController::new(Clock::new(), TimeTuning::default()),
            }
        }

        fn perform(&mut self, trigger: &mut Trigger) -> Option<Followup> {
            let mut ctx = ActionContext {
                player: &mut self.player,
                combos: &mut self.combos,
                time: &mut self.time,
            };
            trigger.perform_action(&TriggerTuning::default(), &mut ctx)
        }
    }

    fn trigger(kind: TriggerType) -> Trigger {
        Trigger::new(TriggerId(0), kind, Vec2::new(10.0, 2.0))
    }

    #[test]
    fn test_default_actions() {
        assert_eq!(TriggerType::Boost45.default_action(), TriggerAction::Boost45);
        assert_eq!(TriggerType::Stop.default_action(), TriggerAction::Stop);
        assert_eq!(TriggerType::Block.default_action(), TriggerAction::Block);

        let mut t = trigger(TriggerType::Slow);
        t.set_action(TriggerAction::UseBlock);
        t.initialize();
        assert_eq!(t.action(), TriggerAction::Slow);
    }

    #[test]
    fn test_collision_debounced_once_per_placement() {
        let mut t = trigger(TriggerType::Boost30);
        assert!(t.register_collision(PlayerPass::None));
        assert!(!t.register_collision(PlayerPass::None));

        t.initialize();
        assert!(t.register_collision(PlayerPass::None));
    }

    #[test]
    fn test_pass_overrides_action() {
        let mut boost = trigger(TriggerType::Boost60);
        boost.register_collision(PlayerPass::Regular);
        assert_eq!(boost.action(), TriggerAction::UseBlock);

        // Super pass only shields against the hindering zones
        let mut boost = trigger(TriggerType::Boost60);
        boost.register_collision(PlayerPass::Super);
        assert_eq!(boost.action(), TriggerAction::Boost60);

        let mut slow = trigger(TriggerType::Slow);
        slow.register_collision(PlayerPass::Super);
        assert_eq!(slow.action(), TriggerAction::UseBlock);
    }

    #[test]
    fn test_boost_adds_velocity_and_slows_time() {
        let mut rig = Rig::new();
        let mut t = trigger(TriggerType::Boost45);
        rig.perform(&mut t);

        let vel = rig.player.trajectory();
        assert!((vel.length() - 11.0).abs() < 1e-4);
        assert!((vel.x - vel.y).abs() < 1e-4);
        assert_eq!(t.visual(), TriggerVisual::Inactive);
        assert!(rig.time.is_slow_motion());
    }

    #[test]
    fn test_boost30_launches_at_exact_angle() {
        let mut rig = Rig::new();
        let mut t = trigger(TriggerType::Boost30);
        rig.perform(&mut t);

        let angle = crate::angle_of(rig.player.trajectory());
        assert!((angle - std::f32::consts::FRAC_PI_6).abs() < 1e-6);
    }

    #[test]
    fn test_two_zone_combo_chains_onto_next() {
        let mut rig = Rig::new();
        let mut t = trigger(TriggerType::Boost45);
        t.set_next_trigger(Some(TriggerId(4)));
        t.set_action(TriggerAction::Boost45Combo);

        let followup = rig.perform(&mut t);
        assert_eq!(
            followup,
            Some(Followup {
                trigger: TriggerId(4),
                action: TriggerAction::Boost45ComboFollowup,
            })
        );
        assert!(!rig.player.gravity_enabled());
        assert!((rig.player.body.vel - Vec2::new(15.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_combo_without_next_zone_is_noop_chain() {
        let mut rig = Rig::new();
        let mut t = trigger(TriggerType::Boost60);
        t.set_action(TriggerAction::Boost60Combo);
        assert_eq!(rig.perform(&mut t), None);
        assert!(!rig.player.gravity_enabled());
    }

    #[test]
    fn test_block60_followup_grants_super_pass() {
        let mut rig = Rig::new();
        let mut t = trigger(TriggerType::Boost45);
        t.set_action(TriggerAction::Block60ComboFollowup);
        rig.perform(&mut t);

        assert_eq!(rig.player.pass(), PlayerPass::Super);
        assert!(rig.player.gravity_enabled());
        let vel = rig.player.trajectory();
        assert!((vel.length() - 16.0).abs() < 1e-4);
        assert!((crate::angle_of(vel) - 60f32.to_radians()).abs() < 1e-4);
    }

    #[test]
    fn test_boost60_followup_leaves_pass_alone() {
        let mut rig = Rig::new();
        let mut t = trigger(TriggerType::Boost45);
        t.set_action(TriggerAction::Boost60ComboFollowup);
        rig.perform(&mut t);
        assert_eq!(rig.player.pass(), PlayerPass::None);
        assert!((rig.player.trajectory().length() - 16.0).abs() < 1e-4);
    }

    #[test]
    fn test_block45_followup_enables_bounce() {
        let mut rig = Rig::new();
        let mut t = trigger(TriggerType::Boost60);
        t.set_action(TriggerAction::Block45ComboFollowup);
        rig.perform(&mut t);
        assert!(rig.player.bounce());
        assert_eq!(rig.player.pass(), PlayerPass::None);
    }

    #[test]
    fn test_use_block_keeps_visual_and_skips_hit() {
        let mut rig = Rig::new();
        rig.player.set_pass(PlayerPass::Regular, &mut rig.combos);

        let mut t = trigger(TriggerType::Boost30);
        t.set_action(TriggerAction::UseBlock);
        rig.perform(&mut t);

        assert_eq!(rig.player.pass(), PlayerPass::None);
        assert_eq!(t.visual(), TriggerVisual::Active);
        // A boost30 hit would have opened the boost30 combo
        assert!(!rig.combos.is_available(crate::sim::ComboType::Boost30));
    }

    #[test]
    fn test_stop_goes_inactive_without_reporting_hit() {
        let mut rig = Rig::new();
        rig.player.kick_off(0.5, 10.0, 0.0);
        let mut t = trigger(TriggerType::Stop);
        rig.perform(&mut t);

        assert!(rig.player.is_stopped());
        assert_eq!(t.visual(), TriggerVisual::Inactive);
        assert!(!rig.combos.is_available(crate::sim::ComboType::Stop));
    }

    #[test]
    fn test_boost30_hit_reports_to_combos() {
        let mut rig = Rig::new();
        let mut t = trigger(TriggerType::Boost30);
        rig.perform(&mut t);
        assert!(rig.combos.is_available(crate::sim::ComboType::Boost30));
        assert!(rig.combos.is_available(crate::sim::ComboType::Stop));
    }
}
