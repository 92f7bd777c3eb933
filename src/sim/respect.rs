//! Respect and score bookkeeping
//!
//! Penalties for expiring timers are evaluated against the timers as they
//! stand at the start of the frame, before the guest pass decrements them, so
//! each expiry is charged on exactly one frame.

use super::state::{GameState, GamePhase, GuestKind, PourTier, Sentiment, SimEvent};
use crate::consts::*;

/// Add `delta` to respect, clamped to [0, MAX_RESPECT]
pub fn adjust_respect(state: &mut GameState, delta: f32) {
    state.respect = (state.respect + delta).clamp(0.0, MAX_RESPECT);
}

/// End the session once respect is gone. Returns true on the transition.
pub fn check_game_over(state: &mut GameState, events: &mut Vec<SimEvent>) -> bool {
    if state.phase == GamePhase::Playing && state.respect <= 0.0 {
        state.respect = 0.0;
        state.phase = GamePhase::GameOver;
        log::info!(
            "Game over after {:.1}s, final score {}",
            state.clock_ms / 1000.0,
            state.score
        );
        events.push(SimEvent::GameOver { score: state.score });
        return true;
    }
    false
}

/// Turning the table while the elder's hand is out drains respect every frame.
/// Returns whether the disturbance warning should show.
pub fn elder_disturbance(state: &mut GameState) -> bool {
    let disturbing = state.table.dragging
        && state.elder().is_some_and(|elder| {
            let elder_id = elder.id;
            state.hands.iter().any(|h| h.guest_id == elder_id)
        });
    if disturbing {
        adjust_respect(state, -ELDER_DISTURB_DRAIN);
    }
    state.disturbing = disturbing;
    disturbing
}

/// Charge penalties for timers that will run out during this `dt`.
/// Must run before the guest pass mutates the timers.
pub fn charge_expiries(state: &mut GameState, dt: f32, events: &mut Vec<SimEvent>) {
    let mut penalty = 0.0;
    let mut last_message = None;

    for guest in state.guests.iter().filter(|g| g.is_seated()) {
        if guest.wants_toast && guest.toast_timer > 0.0 && guest.toast_timer - dt <= 0.0 {
            penalty += TOAST_PENALTY;
            last_message = Some(format!("{} is offended! (no toast)", guest.name));
            events.push(SimEvent::ToastIgnored { guest_id: guest.id });
        }

        if guest.excuse.is_some() && guest.excuse_timer > 0.0 && guest.excuse_timer - dt <= 0.0 {
            penalty += EXCUSE_PENALTY;
            last_message = Some(format!("You let {} dodge the drink! Weak!", guest.name));
            events.push(SimEvent::ExcuseEvaded { guest_id: guest.id });
        }

        if guest.is_female() {
            if guest.tolerance_timer > 0.0 && guest.tolerance_timer - dt <= 0.0 {
                penalty += FEMALE_OVERSTAY_PENALTY;
                last_message = Some(format!("{} is still at the table! Scandalous!", guest.name));
                events.push(SimEvent::FemaleOverstayed { guest_id: guest.id });
            } else if guest.tolerance_timer <= 0.0 {
                penalty += FEMALE_DRAIN;
            }
        }
    }

    if penalty > 0.0 {
        adjust_respect(state, -penalty);
    }
    if let Some(text) = last_message {
        log::debug!("{}", text);
        state.show_message(text, Sentiment::Bad);
    }
}

/// Per-frame alignment outcome
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settlement {
    pub aligned: bool,
    pub respect_delta: f32,
    pub score_delta: i64,
}

/// Baseline scoring for the frame: the fish must face the elder while nobody
/// is grabbing. With a hand out the frame only carries the background decay.
pub fn settle_frame(state: &mut GameState) -> Settlement {
    let aligned = state.table.is_aligned();
    let hand_out = !state.hands.is_empty();

    let respect_delta = match (hand_out, aligned) {
        (true, _) => -RESPECT_DECAY_RATE,
        (false, true) => RESPECT_GAIN_RATE,
        (false, false) => -PENALTY_FISH_WRONG,
    };
    let score_delta = if aligned && !hand_out {
        ALIGNED_SCORE_PER_FRAME
    } else {
        0
    };

    adjust_respect(state, respect_delta);
    state.score += score_delta;

    Settlement {
        aligned,
        respect_delta,
        score_delta,
    }
}

impl PourTier {
    /// Tier for a cup holding `fill`
    pub fn for_fill(fill: f32) -> PourTier {
        if fill <= CUP_MIN_OFFER {
            PourTier::Rejected
        } else if fill > CUP_BRIM {
            PourTier::Spilled
        } else if fill >= POUR_PERFECT {
            PourTier::Perfect
        } else if fill > POUR_CARELESS {
            PourTier::Careless
        } else {
            PourTier::Weak
        }
    }

    /// (score, respect) payout; the elder's perfect toast scores double
    pub fn payout(&self, elder: bool) -> (i64, f32) {
        match self {
            PourTier::Rejected => (0, 0.0),
            PourTier::Weak => (0, -10.0),
            PourTier::Careless => (-50, -5.0),
            PourTier::Perfect => (if elder { 300 } else { 150 }, 20.0),
            PourTier::Spilled => (-50, -10.0),
        }
    }

    fn message(&self) -> &'static str {
        match self {
            PourTier::Rejected => "The cup is empty! Pour first!",
            PourTier::Weak => "Is that all? Barely a sip!",
            PourTier::Careless => "What a careless pour!",
            PourTier::Perfect => "A perfect pour! Cheers!",
            PourTier::Spilled => "You spilled it all over them! Shameful!",
        }
    }
}

/// Offer the cup to a guest waiting for a toast. Returns the tier, or None if
/// the guest is not waiting for one.
pub fn serve_toast(state: &mut GameState, guest_id: u32, events: &mut Vec<SimEvent>) -> Option<PourTier> {
    let guest = state.guest(guest_id)?;
    if !guest.is_seated() || !guest.wants_toast {
        return None;
    }
    let elder = guest.kind == GuestKind::Elder;
    let name = guest.name.clone();

    let tier = PourTier::for_fill(state.cup.fill);
    if tier == PourTier::Rejected {
        state.show_message(tier.message(), Sentiment::Neutral);
        return Some(tier);
    }

    let (points, respect) = tier.payout(elder);
    log::debug!(
        "Toast to {}: {:?} (fill {:.1}, {:+} score, {:+} respect)",
        name,
        tier,
        state.cup.fill,
        points,
        respect
    );
    let sentiment = if points >= 50 {
        Sentiment::Good
    } else {
        Sentiment::Bad
    };
    state.show_message(tier.message(), sentiment);
    state.score += points;
    adjust_respect(state, respect);

    if let Some(guest) = state.guest_mut(guest_id) {
        guest.wants_toast = false;
        guest.toast_timer = 0.0;
    }
    state.cup.fill = 0.0;
    events.push(SimEvent::ToastServed { guest_id, tier });
    Some(tier)
}
