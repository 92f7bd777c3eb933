//! Guest lifecycle
//!
//! Seated guests start toast requests and excuses, women at the table run a
//! tolerance countdown, kicked guests play out the kick and leave, and empty
//! seats are refilled by a two-phase respawn roll.
//!
//! Roll order per guest (seat order): respawn roll, then gender and name for
//! adult seats; for seated guests the excuse roll and excuse pick, then the
//! toast roll.

use super::respect::adjust_respect;
use super::rng::Dice;
use super::state::{
    EXCUSES, GameState, Gender, Guest, GuestKind, NAMES_FEMALE, NAMES_MALE, Presence, Sentiment,
    SimEvent,
};
use crate::consts::*;
use crate::settings::FramePacing;

/// Advance every guest by `dt` ms of session time
pub fn advance_guests(
    state: &mut GameState,
    dice: &mut dyn Dice,
    pacing: FramePacing,
    dt: f32,
    events: &mut Vec<SimEvent>,
) {
    let session_ms = state.clock_ms as f32;
    let toast_chance = pacing.scale_chance(TOAST_CHANCE, dt);

    for guest in &mut state.guests {
        match guest.presence {
            Presence::Empty => {
                if try_respawn(guest, dice, dt) {
                    log::debug!("{} takes seat {} ({:?})", guest.name, guest.id, guest.gender);
                    events.push(SimEvent::GuestSeated {
                        guest_id: guest.id,
                        gender: guest.gender,
                    });
                }
            }
            Presence::Kicking { remaining_ms } => {
                let remaining_ms = remaining_ms - dt;
                if remaining_ms <= 0.0 {
                    guest.presence = Presence::Empty;
                    guest.respawn_timer = 0.0;
                    guest.respawn_retry = false;
                    events.push(SimEvent::GuestLeft { guest_id: guest.id });
                } else {
                    guest.presence = Presence::Kicking { remaining_ms };
                }
            }
            Presence::Seated => advance_seated(guest, dice, toast_chance, session_ms, dt, events),
        }
    }
}

fn advance_seated(
    guest: &mut Guest,
    dice: &mut dyn Dice,
    toast_chance: f32,
    session_ms: f32,
    dt: f32,
    events: &mut Vec<SimEvent>,
) {
    if guest.is_female() {
        guest.tolerance_timer -= dt;
    }

    // Excuses
    if guest.excuse.is_some() {
        guest.excuse_timer -= dt;
        if guest.excuse_timer <= 0.0 {
            // Got away with it
            guest.excuse = None;
        }
    } else if excuse_eligible(guest, session_ms) {
        guest.excuse_check_accumulator += dt;
        if guest.excuse_check_accumulator >= EXCUSE_CHECK_INTERVAL_MS {
            guest.excuse_check_accumulator = 0.0;
            if dice.chance(EXCUSE_CHANCE) {
                let excuse = EXCUSES[dice.pick(EXCUSES.len())];
                log::debug!("{} makes an excuse: {}", guest.name, excuse);
                guest.excuse = Some(excuse.to_string());
                guest.excuse_timer = EXCUSE_MS;
                events.push(SimEvent::ExcuseStarted { guest_id: guest.id });
            }
        }
    }

    // Toasts
    let toast_capable = guest.excuse.is_none() && guest.gender == Gender::Male;
    if guest.wants_toast && toast_capable {
        guest.toast_timer -= dt;
        if guest.toast_timer <= 0.0 {
            guest.wants_toast = false;
        }
    } else if !guest.wants_toast && toast_capable && guest.kind != GuestKind::Child {
        if dice.chance(toast_chance) {
            guest.wants_toast = true;
            guest.toast_timer = TOAST_WAIT_MS;
            events.push(SimEvent::ToastRequested { guest_id: guest.id });
        }
    }
}

/// Adult men, once the banquet has been going for a while
fn excuse_eligible(guest: &Guest, session_ms: f32) -> bool {
    session_ms > EXCUSE_GRACE_MS
        && guest.kind == GuestKind::Adult
        && guest.gender == Gender::Male
        && !guest.wants_toast
}

/// Two-phase respawn: one 50% roll after the initial delay, then an 80% roll
/// every retry interval. Returns true when the seat was filled.
fn try_respawn(guest: &mut Guest, dice: &mut dyn Dice, dt: f32) -> bool {
    guest.respawn_timer += dt;

    if !guest.respawn_retry {
        if guest.respawn_timer >= RESPAWN_INITIAL_DELAY_MS {
            if dice.chance(RESPAWN_INITIAL_CHANCE) {
                seat_new_guest(guest, dice);
                return true;
            }
            guest.respawn_retry = true;
            guest.respawn_timer = 0.0;
        }
    } else if guest.respawn_timer >= RESPAWN_RETRY_INTERVAL_MS {
        // Keep the overflow so retries stay on a fixed cadence
        guest.respawn_timer -= RESPAWN_RETRY_INTERVAL_MS;
        if dice.chance(RESPAWN_RETRY_CHANCE) {
            seat_new_guest(guest, dice);
            return true;
        }
    }
    false
}

/// Fill the seat with a fresh identity
pub fn seat_new_guest(guest: &mut Guest, dice: &mut dyn Dice) {
    guest.presence = Presence::Seated;
    guest.excuse = None;
    guest.excuse_timer = 0.0;
    guest.wants_toast = false;
    guest.toast_timer = 0.0;
    guest.excuse_check_accumulator = 0.0;
    guest.respawn_timer = 0.0;
    guest.respawn_retry = false;

    match guest.kind {
        GuestKind::Elder | GuestKind::Child => {
            guest.gender = Gender::Male;
            guest.tolerance_timer = 0.0;
        }
        GuestKind::Adult => {
            let female = dice.chance(FEMALE_CHANCE);
            if female {
                guest.gender = Gender::Female;
                guest.name = NAMES_FEMALE[dice.pick(NAMES_FEMALE.len())].to_string();
                guest.tolerance_timer = FEMALE_TOLERANCE_MS;
            } else {
                guest.gender = Gender::Male;
                guest.name = NAMES_MALE[dice.pick(NAMES_MALE.len())].to_string();
                guest.tolerance_timer = 0.0;
            }
        }
    }
}

/// Result of a kick attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KickOutcome {
    Kicked,
    /// Guest was not kickable; respect was docked
    Rude,
    /// Nobody seated there
    Ignored,
}

/// Throw a guest out. Only excuse-makers and women may be kicked; anyone else
/// costs the rude-kick penalty and stays put.
pub fn kick_guest(state: &mut GameState, guest_id: u32, events: &mut Vec<SimEvent>) -> KickOutcome {
    let Some(guest) = state.guest_mut(guest_id) else {
        log::debug!("Kick ignored: no guest {}", guest_id);
        return KickOutcome::Ignored;
    };
    if !guest.is_seated() {
        return KickOutcome::Ignored;
    }

    if guest.is_kickable() {
        guest.presence = Presence::Kicking {
            remaining_ms: KICK_ANIMATION_MS,
        };
        guest.excuse = None;
        guest.wants_toast = false;
        let name = guest.name.clone();
        log::debug!("{} kicked from seat {}", name, guest_id);

        state.score += KICK_BONUS;
        state.show_message("Get out!", Sentiment::Good);
        events.push(SimEvent::GuestKicked { guest_id });
        KickOutcome::Kicked
    } else {
        log::warn!("Rude kick against {}", guest.name);
        adjust_respect(state, -PENALTY_RUDE_KICK);
        state.show_message("Why kick them?! How rude!", Sentiment::Bad);
        events.push(SimEvent::RudeKick { guest_id });
        KickOutcome::Rude
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::ScriptedDice;
    use crate::sim::state::PresenceLabel;

    const DT: f32 = 16.0;

    fn advance(state: &mut GameState, dice: &mut ScriptedDice, dt: f32) -> Vec<SimEvent> {
        let mut events = Vec::new();
        state.clock_ms += dt as f64;
        advance_guests(state, dice, FramePacing::PerFrame, dt, &mut events);
        events
    }

    #[test]
    fn test_toast_request_and_expiry() {
        let mut state = GameState::new(1);
        // Seat 0 (elder) is the first toast roll
        let mut dice = ScriptedDice::new([0.0], 0.999);
        let events = advance(&mut state, &mut dice, DT);
        assert!(events.contains(&SimEvent::ToastRequested { guest_id: 0 }));
        assert!(state.guests[0].wants_toast);
        assert_eq!(state.guests[0].toast_timer, TOAST_WAIT_MS);

        let mut elapsed = 0.0;
        while state.guests[0].wants_toast {
            advance(&mut state, &mut dice, 100.0);
            elapsed += 100.0;
        }
        assert_eq!(elapsed, TOAST_WAIT_MS);
    }

    #[test]
    fn test_children_never_toast() {
        let mut state = GameState::new(1);
        let mut dice = ScriptedDice::new([], 0.0);
        advance(&mut state, &mut dice, DT);
        assert!(!state.guests[3].wants_toast);
        assert!(!state.guests[5].wants_toast);
        assert!(state.guests[0].wants_toast);
    }

    #[test]
    fn test_excuse_needs_grace_period() {
        let mut state = GameState::new(1);
        state.clock_ms = 5000.0;
        let mut dice = ScriptedDice::new([], 0.0);
        for _ in 0..200 {
            advance(&mut state, &mut dice, DT);
        }
        // Every roll passes, yet nobody makes an excuse before the grace period
        assert!(state.guests.iter().all(|g| g.excuse.is_none()));
    }

    #[test]
    fn test_excuse_roll_each_second() {
        let mut state = GameState::new(1);
        state.clock_ms = EXCUSE_GRACE_MS as f64 + 1.0;
        // Only seat 1 is eligible and rolling
        for g in state.guests.iter_mut().filter(|g| g.id != 1) {
            g.presence = Presence::Empty;
            g.respawn_retry = true;
            g.respawn_timer = -1_000_000.0;
        }
        let mut dice = ScriptedDice::new([], 0.999);
        let events = advance(&mut state, &mut dice, 999.0);
        assert!(events.is_empty());
        assert_eq!(state.guests[1].excuse_check_accumulator, 999.0);

        // Crossing the interval: excuse roll passes, pick excuse 0
        dice.push(0.01);
        dice.push(0.0);
        let events = advance(&mut state, &mut dice, 1.0);
        assert!(events.contains(&SimEvent::ExcuseStarted { guest_id: 1 }));
        assert_eq!(state.guests[1].excuse.as_deref(), Some(EXCUSES[0]));
        assert_eq!(state.guests[1].excuse_timer, EXCUSE_MS);
        assert_eq!(state.guests[1].excuse_check_accumulator, 0.0);
        assert!(!state.guests[1].wants_toast);

        // Expiry clears the excuse without ejecting
        advance(&mut state, &mut dice, EXCUSE_MS);
        assert!(state.guests[1].excuse.is_none());
        assert!(state.guests[1].is_seated());
    }

    #[test]
    fn test_elder_never_makes_excuses() {
        let guest = Guest::for_seat(ELDER_SEAT);
        assert!(!excuse_eligible(&guest, 60_000.0));
        let child = Guest::for_seat(3);
        assert!(!excuse_eligible(&child, 60_000.0));
        let adult = Guest::for_seat(1);
        assert!(excuse_eligible(&adult, 60_000.0));
    }

    #[test]
    fn test_kick_walks_through_kicking() {
        let mut state = GameState::new(1);
        state.guests[2].excuse = Some(EXCUSES[1].to_string());
        state.guests[2].excuse_timer = 3000.0;
        let mut events = Vec::new();
        assert_eq!(kick_guest(&mut state, 2, &mut events), KickOutcome::Kicked);
        assert_eq!(state.guests[2].presence.label(), PresenceLabel::Kicking);
        assert!(state.guests[2].excuse.is_none());
        assert_eq!(state.score, KICK_BONUS);

        let mut dice = ScriptedDice::quiet();
        advance(&mut state, &mut dice, 700.0);
        assert_eq!(state.guests[2].presence.label(), PresenceLabel::Kicking);
        let events = advance(&mut state, &mut dice, 100.0);
        assert!(events.contains(&SimEvent::GuestLeft { guest_id: 2 }));
        assert_eq!(state.guests[2].presence, Presence::Empty);
        assert_eq!(state.guests[2].respawn_timer, 0.0);
        assert!(!state.guests[2].respawn_retry);

        // Kicking an empty seat does nothing
        let mut events = Vec::new();
        assert_eq!(kick_guest(&mut state, 2, &mut events), KickOutcome::Ignored);
        assert_eq!(state.score, KICK_BONUS);
    }

    #[test]
    fn test_rude_kick() {
        let mut state = GameState::new(1);
        state.respect = 80.0;
        let mut events = Vec::new();
        assert_eq!(kick_guest(&mut state, 1, &mut events), KickOutcome::Rude);
        assert_eq!(state.respect, 80.0 - PENALTY_RUDE_KICK);
        assert!(state.guests[1].is_seated());
        assert_eq!(events, vec![SimEvent::RudeKick { guest_id: 1 }]);
    }

    #[test]
    fn test_respawn_phases() {
        let mut state = GameState::new(1);
        for g in &mut state.guests {
            g.presence = Presence::Empty;
        }
        // Only seat 1 matters; park the others in retry mode far from a roll
        for g in state.guests.iter_mut().filter(|g| g.id != 1) {
            g.respawn_retry = true;
            g.respawn_timer = -1_000_000.0;
        }

        let mut dice = ScriptedDice::new([], 0.999);
        advance(&mut state, &mut dice, 1999.0);
        assert_eq!(state.guests[1].presence, Presence::Empty);
        assert!(!state.guests[1].respawn_retry);

        // Initial roll fails -> retry mode, accumulator reset
        dice.push(0.7);
        advance(&mut state, &mut dice, 50.0);
        assert!(state.guests[1].respawn_retry);
        assert_eq!(state.guests[1].respawn_timer, 0.0);

        // Retry keeps the overflow
        dice.push(0.9);
        advance(&mut state, &mut dice, 1250.0);
        assert_eq!(state.guests[1].presence, Presence::Empty);
        assert_eq!(state.guests[1].respawn_timer, 250.0);

        // Retry succeeds: adult seat rolls gender (female) then a name
        dice.push(0.1);
        dice.push(0.1);
        dice.push(0.0);
        let events = advance(&mut state, &mut dice, 750.0);
        assert!(events.contains(&SimEvent::GuestSeated {
            guest_id: 1,
            gender: Gender::Female
        }));
        let guest = &state.guests[1];
        assert!(guest.is_seated());
        assert_eq!(guest.kind, GuestKind::Adult);
        assert_eq!(guest.name, NAMES_FEMALE[0]);
        assert_eq!(guest.tolerance_timer, FEMALE_TOLERANCE_MS);
    }

    #[test]
    fn test_reserved_seats_respawn_male() {
        let mut guest = Guest::for_seat(3);
        guest.presence = Presence::Empty;
        let mut dice = ScriptedDice::new([], 0.0);
        seat_new_guest(&mut guest, &mut dice);
        assert_eq!(guest.kind, GuestKind::Child);
        assert_eq!(guest.gender, Gender::Male);
        assert_eq!(guest.name, "Nephew");
    }
}
