//! Grabbing hands
//!
//! At most one hand is out at a time. A polite hand turns the table so the
//! dish it wants reaches its owner, eats, then withdraws. A child's hand is
//! naughty: once it has reached the table it spins it every frame until the
//! player slaps it away.

use super::rng::Dice;
use super::state::{DISHES, GameState, GuestKind, Hand, HandPhase, Sentiment, SimEvent};
use super::table::TableForce;
use crate::consts::*;
use crate::normalize_angle;

/// Phase of a polite hand at `age` ms, or None once it is gone
pub fn polite_phase(age: f32) -> Option<HandPhase> {
    if age < HAND_REACH_MS {
        Some(HandPhase::Reaching)
    } else if age < HAND_EAT_MS {
        Some(HandPhase::Grabbing)
    } else if age < HAND_RETRACT_MS {
        Some(HandPhase::Retracting)
    } else {
        None
    }
}

/// Rotation that brings `dish_angle` round to a seat at `seat_angle`
pub fn rotation_to_serve(seat_angle: f32, dish_angle: f32) -> f32 {
    normalize_angle(seat_angle - dish_angle)
}

/// Roll for a new hand when none is out. Rolls: spawn chance, seated guest
/// pick, then dish pick for polite hands.
pub fn maybe_spawn_hand(
    state: &mut GameState,
    dice: &mut dyn Dice,
    chance: f32,
    events: &mut Vec<SimEvent>,
) -> Option<u32> {
    if !state.hands.is_empty() {
        return None;
    }
    let seated: Vec<u32> = state
        .guests
        .iter()
        .filter(|g| g.is_seated())
        .map(|g| g.id)
        .collect();
    if seated.is_empty() || !dice.chance(chance) {
        return None;
    }

    let guest_id = seated[dice.pick(seated.len())];
    let child = state
        .guest(guest_id)
        .is_some_and(|g| g.kind == GuestKind::Child);
    let dish = if child {
        None
    } else {
        Some(dice.pick(DISHES.len()))
    };
    spawn_hand_for(state, guest_id, dish, events)
}

/// Put out a hand for a seated guest reaching for `dish` (index into
/// [`DISHES`]). Children's hands ignore the dish and are always naughty; a
/// polite hand needs a valid dish.
pub fn spawn_hand_for(
    state: &mut GameState,
    guest_id: u32,
    dish: Option<usize>,
    events: &mut Vec<SimEvent>,
) -> Option<u32> {
    let guest = state.guest(guest_id).filter(|g| g.is_seated())?;
    let naughty = guest.kind == GuestKind::Child;
    let target_rotation = if naughty {
        None
    } else {
        let dish = DISHES.get(dish?)?;
        Some(rotation_to_serve(guest.seat_angle(), dish.angle))
    };

    let id = state.next_entity_id();
    state.hands.push(Hand {
        id,
        guest_id,
        phase: HandPhase::Reaching,
        spawned_at: state.clock_ms,
        naughty,
        target_rotation,
    });
    log::debug!(
        "Hand {} out for guest {} (naughty: {}, target: {:?})",
        id,
        guest_id,
        naughty,
        target_rotation
    );
    events.push(SimEvent::HandSpawned {
        hand_id: id,
        guest_id,
        naughty,
    });
    Some(id)
}

/// Age every hand, drop hands whose owner left or who are done, and report
/// the strongest force the remaining hands put on the table.
pub fn update_hands(state: &mut GameState, events: &mut Vec<SimEvent>) -> TableForce {
    let clock = state.clock_ms;
    let mut force = TableForce::Free;
    let guests = &state.guests;

    state.hands.retain_mut(|hand| {
        let owner_seated = guests
            .iter()
            .find(|g| g.id == hand.guest_id)
            .is_some_and(|g| g.is_seated());
        if !owner_seated {
            events.push(SimEvent::HandRemoved { hand_id: hand.id });
            return false;
        }

        let age = hand.age(clock);
        if hand.naughty {
            if age > HAND_REACH_MS {
                hand.phase = HandPhase::Grabbing;
                force = force.strongest(TableForce::Spin(NAUGHTY_SPIN));
            }
            return true;
        }

        let Some(phase) = polite_phase(age) else {
            events.push(SimEvent::HandRemoved { hand_id: hand.id });
            return false;
        };
        hand.phase = phase;
        if phase == HandPhase::Grabbing {
            if age < HAND_TURN_MS {
                if let Some(target) = hand.target_rotation {
                    force = force.strongest(TableForce::Nudge { target });
                }
            } else {
                force = force.strongest(TableForce::Hold);
            }
        }
        true
    });

    force
}

/// Slap away a naughty hand. Polite or unknown hands are left alone.
pub fn slap_hand(state: &mut GameState, hand_id: u32, events: &mut Vec<SimEvent>) -> bool {
    let Some(pos) = state.hands.iter().position(|h| h.id == hand_id && h.naughty) else {
        return false;
    };
    state.hands.remove(pos);
    state.table.stop();
    state.score += SLAP_BONUS;
    state.show_message("Caught you! Behave!", Sentiment::Good);
    log::debug!("Hand {} slapped", hand_id);
    events.push(SimEvent::HandSlapped { hand_id });
    true
}

/// The hand currently locking the table, if any (grabbing or naughty)
pub fn locking_hand(state: &GameState) -> Option<&Hand> {
    state
        .hands
        .iter()
        .find(|h| h.naughty || h.phase == HandPhase::Grabbing)
}
