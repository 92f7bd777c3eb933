//! Game state and core simulation types
//!
//! Everything the frame step reads or writes lives in [`GameState`].

use serde::{Deserialize, Serialize};

use super::table::Table;
use crate::consts::*;
use crate::normalize_angle;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first start
    Menu,
    /// Active gameplay
    Playing,
    /// Respect ran out
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuestKind {
    Elder,
    Adult,
    Child,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

/// Seat lifecycle: Seated -> Kicking -> Empty -> Seated
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Presence {
    Seated,
    /// Being thrown out; the seat empties when the timer runs out
    Kicking { remaining_ms: f32 },
    Empty,
}

impl Presence {
    /// Coarse label without timer data
    pub fn label(&self) -> PresenceLabel {
        match self {
            Presence::Seated => PresenceLabel::Seated,
            Presence::Kicking { .. } => PresenceLabel::Kicking,
            Presence::Empty => PresenceLabel::Empty,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PresenceLabel {
    Seated,
    Kicking,
    Empty,
}

pub const NAMES_MALE: [&str; 5] = ["Uncle Zhang", "Brother Li", "Boss Wang", "Old Liu", "Little Chen"];
pub const NAMES_FEMALE: [&str; 5] = ["Auntie Wang", "Sister Zhao", "Ms. Sun", "Little Wu", "Sister Qian"];
pub const ELDER_NAME: &str = "Eldest Uncle";
pub const CHILD_NAME: &str = "Nephew";

pub const EXCUSES: [&str; 6] = [
    "I'm driving tonight.",
    "Doctor says no alcohol.",
    "I have a meeting after this.",
    "My stomach hurts.",
    "I'll just have tea.",
    "My wife will kill me.",
];

/// One seat at the table and whoever sits in it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guest {
    /// Stable identity (the seat index)
    pub id: u32,
    /// Seat position around the table (degrees)
    pub angle: f32,
    pub name: String,
    pub kind: GuestKind,
    pub gender: Gender,
    pub presence: Presence,
    pub wants_toast: bool,
    pub toast_timer: f32,
    pub excuse: Option<String>,
    pub excuse_timer: f32,
    /// Time banked toward the next excuse roll
    pub excuse_check_accumulator: f32,
    /// Female guests: time left before their presence costs respect
    pub tolerance_timer: f32,
    pub respawn_timer: f32,
    /// False while waiting out the initial delay, true once retrying every interval
    pub respawn_retry: bool,
}

impl Guest {
    /// Guest occupying `seat` at session start
    pub fn for_seat(seat: usize) -> Self {
        let (kind, name) = if seat == ELDER_SEAT {
            (GuestKind::Elder, ELDER_NAME.to_string())
        } else if CHILD_SEATS.contains(&seat) {
            (GuestKind::Child, CHILD_NAME.to_string())
        } else {
            (GuestKind::Adult, format!("Guest {seat}"))
        };

        Self {
            id: seat as u32,
            angle: (seat as f32 * 360.0) / GUEST_COUNT as f32 - 90.0,
            name,
            kind,
            gender: Gender::Male,
            presence: Presence::Seated,
            wants_toast: false,
            toast_timer: 0.0,
            excuse: None,
            excuse_timer: 0.0,
            excuse_check_accumulator: 0.0,
            tolerance_timer: 0.0,
            respawn_timer: 0.0,
            respawn_retry: false,
        }
    }

    pub fn is_seated(&self) -> bool {
        self.presence == Presence::Seated
    }

    pub fn is_female(&self) -> bool {
        self.gender == Gender::Female
    }

    /// Kick is allowed against an excuse-maker or a woman at the table
    pub fn is_kickable(&self) -> bool {
        self.is_seated() && (self.excuse.is_some() || self.is_female())
    }

    /// Seat angle normalized to [0, 360)
    pub fn seat_angle(&self) -> f32 {
        normalize_angle(self.angle)
    }
}

/// Hand progression, driven by age since spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandPhase {
    Reaching,
    Grabbing,
    Retracting,
}

/// A guest's arm reaching across the table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hand {
    pub id: u32,
    pub guest_id: u32,
    pub phase: HandPhase,
    /// Session clock at spawn (ms)
    pub spawned_at: f64,
    /// Child hands spin the table until slapped
    pub naughty: bool,
    /// Rotation the owner wants the table at (polite hands only)
    pub target_rotation: Option<f32>,
}

impl Hand {
    pub fn age(&self, clock_ms: f64) -> f32 {
        (clock_ms - self.spawned_at) as f32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DishKind {
    Fish,
    Vegetable,
    Meat,
    Soup,
}

/// A dish fixed on the turntable
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Dish {
    pub id: u32,
    pub kind: DishKind,
    /// Position on the turntable (degrees)
    pub angle: f32,
    pub label: &'static str,
}

/// Dish 0, the fish, is the one whose head must face the elder
pub const DISHES: [Dish; 8] = [
    Dish { id: 0, kind: DishKind::Fish, angle: 0.0, label: "Braised Fish" },
    Dish { id: 1, kind: DishKind::Vegetable, angle: 45.0, label: "Bok Choy" },
    Dish { id: 2, kind: DishKind::Meat, angle: 90.0, label: "Red-Braised Pork" },
    Dish { id: 3, kind: DishKind::Soup, angle: 135.0, label: "Egg Drop Soup" },
    Dish { id: 4, kind: DishKind::Vegetable, angle: 180.0, label: "Broccoli" },
    Dish { id: 5, kind: DishKind::Meat, angle: 225.0, label: "Roast Duck" },
    Dish { id: 6, kind: DishKind::Vegetable, angle: 270.0, label: "Tofu" },
    Dish { id: 7, kind: DishKind::Meat, angle: 315.0, label: "Roast Chicken" },
];

/// The host's wine cup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cup {
    pub fill: f32,
    pub pouring: bool,
}

impl Cup {
    /// Advance one frame of pouring
    pub fn pour(&mut self) {
        if self.pouring {
            self.fill = (self.fill + POUR_RATE).min(CUP_MAX_FILL);
        }
    }

    pub fn dump(&mut self) {
        self.fill = 0.0;
        self.pouring = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    Neutral,
    Good,
    Bad,
}

/// Transient on-screen message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub sentiment: Sentiment,
    pub remaining_ms: f32,
}

/// Toast outcome tiers by cup fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PourTier {
    /// Not enough in the cup to offer
    Rejected,
    Weak,
    Careless,
    Perfect,
    Spilled,
}

/// Something that happened during a frame or an action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    ToastRequested { guest_id: u32 },
    ToastIgnored { guest_id: u32 },
    ToastServed { guest_id: u32, tier: PourTier },
    ExcuseStarted { guest_id: u32 },
    ExcuseEvaded { guest_id: u32 },
    FemaleOverstayed { guest_id: u32 },
    GuestKicked { guest_id: u32 },
    RudeKick { guest_id: u32 },
    GuestLeft { guest_id: u32 },
    GuestSeated { guest_id: u32, gender: Gender },
    HandSpawned { hand_id: u32, guest_id: u32, naughty: bool },
    HandRemoved { hand_id: u32 },
    HandSlapped { hand_id: u32 },
    RudeTurn { guest_id: u32 },
    GameOver { score: i64 },
}

/// Complete session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed the session's dice were created from
    pub seed: u64,
    pub phase: GamePhase,
    /// 0..=100; the session ends at 0
    pub respect: f32,
    pub score: i64,
    /// Elapsed session time (ms)
    pub clock_ms: f64,
    /// Frames simulated this session
    pub frames: u64,
    pub table: Table,
    /// One per seat, indexed by id
    pub guests: Vec<Guest>,
    /// At most one entry
    pub hands: Vec<Hand>,
    pub cup: Cup,
    pub message: Option<Message>,
    /// Player is turning the table while the elder is serving himself
    pub disturbing: bool,
    next_id: u32,
}

impl GameState {
    /// Fresh playing session
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            phase: GamePhase::Playing,
            respect: MAX_RESPECT,
            score: 0,
            clock_ms: 0.0,
            frames: 0,
            table: Table::default(),
            guests: (0..GUEST_COUNT).map(Guest::for_seat).collect(),
            hands: Vec::new(),
            cup: Cup::default(),
            message: None,
            disturbing: false,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn guest(&self, id: u32) -> Option<&Guest> {
        self.guests.iter().find(|g| g.id == id)
    }

    pub fn guest_mut(&mut self, id: u32) -> Option<&mut Guest> {
        self.guests.iter_mut().find(|g| g.id == id)
    }

    pub fn elder(&self) -> Option<&Guest> {
        self.guests.iter().find(|g| g.kind == GuestKind::Elder)
    }

    pub fn hand(&self, id: u32) -> Option<&Hand> {
        self.hands.iter().find(|h| h.id == id)
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Replace the on-screen message
    pub fn show_message(&mut self, text: impl Into<String>, sentiment: Sentiment) {
        self.message = Some(Message {
            text: text.into(),
            sentiment,
            remaining_ms: MESSAGE_MS,
        });
    }

    /// Age the on-screen message, dropping it once it has been shown long enough
    pub fn age_message(&mut self, dt: f32) {
        if let Some(message) = &mut self.message {
            message.remaining_ms -= dt;
            if message.remaining_ms <= 0.0 {
                self.message = None;
            }
        }
    }

    /// Ensure stable iteration order
    pub fn normalize_order(&mut self) {
        self.guests.sort_by_key(|g| g.id);
        self.hands.sort_by_key(|h| h.id);
    }
}
