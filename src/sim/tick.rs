//! Variable timestep simulation tick
//!
//! One call advances the banquet by one rendered frame. The order of the
//! passes below is part of the game's behaviour: penalties read the timers
//! before the guest pass writes them, so each expiry is charged exactly once.
//!
//! Roll order within a frame: guest pass (see `guests`), then hand spawn
//! (see `hands`).

use serde::{Deserialize, Serialize};

use super::guests::advance_guests;
use super::hands::{maybe_spawn_hand, update_hands};
use super::respect::{charge_expiries, check_game_over, elder_disturbance, settle_frame};
use super::rng::Dice;
use super::state::{GameState, SimEvent};
use crate::consts::*;
use crate::settings::FramePacing;

/// What happened during one frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameReport {
    /// Elapsed time actually simulated (ms)
    pub dt: f32,
    pub respect_delta: f32,
    pub score_delta: i64,
    pub aligned: bool,
    /// Elder disturbance warning
    pub disturbing: bool,
    /// A hand locked or spun the table
    pub table_locked: bool,
    pub events: Vec<SimEvent>,
}

/// Advance the game state by one frame of `dt` milliseconds
pub fn tick(state: &mut GameState, dice: &mut dyn Dice, pacing: FramePacing, dt: f32) -> FrameReport {
    let mut report = FrameReport {
        dt,
        ..Default::default()
    };

    // Don't tick outside play
    if !state.is_playing() {
        return report;
    }
    // Respect may have been spent by an action between frames
    if check_game_over(state, &mut report.events) {
        return report;
    }

    let dt = dt.max(0.0);
    let respect_before = state.respect;
    let score_before = state.score;

    state.frames += 1;
    state.clock_ms += dt as f64;
    state.age_message(dt);

    // (a) Pouring
    state.cup.pour();

    // (b) Turning the table on the elder
    report.disturbing = elder_disturbance(state);

    // (c) Penalties against the timers as they stand
    charge_expiries(state, dt, &mut report.events);

    // (b) and (c) only take respect away; nothing later in the frame may revive it
    if check_game_over(state, &mut report.events) {
        report.respect_delta = state.respect - respect_before;
        report.score_delta = state.score - score_before;
        return report;
    }

    // (d) Guests
    advance_guests(state, dice, pacing, dt, &mut report.events);

    // (e) Hand spawn
    let spawn_chance = pacing.scale_chance(HAND_SPAWN_CHANCE, dt);
    maybe_spawn_hand(state, dice, spawn_chance, &mut report.events);

    // (f) Hands push the table, (g) inertia moves what they don't hold
    let force = update_hands(state, &mut report.events);
    report.table_locked = state.table.step(force);

    // (h) Alignment and game over
    let settlement = settle_frame(state);
    report.aligned = settlement.aligned;
    check_game_over(state, &mut report.events);

    state.normalize_order();

    report.respect_delta = state.respect - respect_before;
    report.score_delta = state.score - score_before;
    report
}
