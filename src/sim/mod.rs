//! Deterministic simulation module
//!
//! All gameplay logic lives here. Given the same seed, the same intents and
//! the same frame times, a banquet plays out identically:
//! - Seeded dice only (see [`rng`])
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod guests;
pub mod hands;
pub mod respect;
pub mod rng;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod table;
pub mod tick;

pub use autopilot::Autopilot;
pub use guests::{KickOutcome, kick_guest};
pub use hands::slap_hand;
pub use respect::serve_toast;
pub use rng::{Dice, ScriptedDice, SeededDice};
pub use session::{Frame, Intent, Session};
pub use snapshot::{GuestView, HandView, MessageView, Snapshot};
pub use state::{
    Cup, DISHES, Dish, GamePhase, GameState, Gender, Guest, GuestKind, Hand, HandPhase, Message,
    PourTier, Presence, PresenceLabel, Sentiment, SimEvent,
};
pub use table::{Table, TableForce};
pub use tick::{FrameReport, tick};
