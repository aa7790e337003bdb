//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Host-supplied frame times only
//! - Seeded RNG only
//! - Stable iteration order (pool order, ascending x)
//! - No rendering, audio or platform dependencies

pub mod combo;
pub mod contact;
pub mod manager;
pub mod player;
pub mod state;
pub mod tick;
pub mod time;
pub mod trigger;

pub use combo::{ActiveCombo, ComboController, ComboExecution, ComboTable, ComboType};
pub use contact::{Aabb, player_box, trigger_zone};
pub use manager::{Contact, TriggerManager};
pub use player::{Body, Player, PlayerGfx, PlayerPass};
pub use state::{GameEvent, GamePhase, GameState, SessionSummary};
pub use tick::{TickInput, tick};
pub use time::{Clock, TimeController};
pub use trigger::{ActionContext, Followup, Trigger, TriggerAction, TriggerId, TriggerType, TriggerVisual};
