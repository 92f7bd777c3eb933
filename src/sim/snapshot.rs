//! Per-frame snapshot handed to the presentation layer

use serde::Serialize;

use super::state::{
    GamePhase, GameState, Gender, GuestKind, HandPhase, PresenceLabel, Sentiment,
};

#[derive(Debug, Clone, Serialize)]
pub struct GuestView {
    pub id: u32,
    pub kind: GuestKind,
    pub gender: Gender,
    pub state: PresenceLabel,
    pub angle: f32,
    pub name: String,
    pub wants_toast: bool,
    pub toast_timer: f32,
    pub excuse: Option<String>,
    pub excuse_timer: f32,
    /// Female guests only: time left before their presence costs respect
    pub tolerance_timer: Option<f32>,
    pub kickable: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HandView {
    pub id: u32,
    pub guest_id: u32,
    pub state: HandPhase,
    pub naughty: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageView {
    pub text: String,
    pub sentiment: Sentiment,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    /// Degrees
    pub rotation: f32,
    pub respect: f32,
    pub score: i64,
    pub aligned: bool,
    /// Elder disturbance warning
    pub disturbing: bool,
    pub table_locked: bool,
    pub cup_fill: f32,
    pub pouring: bool,
    pub guests: Vec<GuestView>,
    pub hands: Vec<HandView>,
    pub message: Option<MessageView>,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        let guests = state
            .guests
            .iter()
            .map(|g| GuestView {
                id: g.id,
                kind: g.kind,
                gender: g.gender,
                state: g.presence.label(),
                angle: g.angle,
                name: g.name.clone(),
                wants_toast: g.wants_toast,
                toast_timer: g.toast_timer,
                excuse: g.excuse.clone(),
                excuse_timer: g.excuse_timer,
                tolerance_timer: g.is_female().then_some(g.tolerance_timer),
                kickable: g.is_kickable(),
            })
            .collect();

        let hands = state
            .hands
            .iter()
            .map(|h| HandView {
                id: h.id,
                guest_id: h.guest_id,
                state: h.phase,
                naughty: h.naughty,
            })
            .collect();

        Self {
            phase: state.phase,
            rotation: state.table.rotation,
            respect: state.respect,
            score: state.score,
            aligned: state.table.is_aligned(),
            disturbing: state.disturbing,
            table_locked: super::hands::locking_hand(state).is_some(),
            cup_fill: state.cup.fill,
            pouring: state.cup.pouring,
            guests,
            hands,
            message: state.message.as_ref().map(|m| MessageView {
                text: m.text.clone(),
                sentiment: m.sentiment,
            }),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
