//! Session driver
//!
//! Owns the authoritative [`GameState`] and the dice. Hosts forward player
//! intents with [`Session::handle`] and call [`Session::frame`] once per
//! animation frame; both take `&mut self`, so an intent can never land in the
//! middle of a frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::guests::kick_guest;
use super::hands::{locking_hand, slap_hand};
use super::respect::{adjust_respect, check_game_over, serve_toast};
use super::rng::{Dice, SeededDice};
use super::snapshot::Snapshot;
use super::state::{GamePhase, GameState, GuestKind, Sentiment, SimEvent};
use super::tick::{FrameReport, tick};
use crate::consts::*;
use crate::settings::Settings;

/// Player intents forwarded by the presentation layer. Pointer positions are
/// relative to the table centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Intent {
    StartSession,
    RestartSession,
    BeginDrag(Vec2),
    MoveDrag(Vec2),
    EndDrag,
    /// Click on a seat: kicks an excuse-maker or woman, otherwise offers a toast
    ClickGuest(u32),
    /// Explicit kick, penalized when the guest has done nothing wrong
    KickGuest(u32),
    /// Click on a hand: slaps it if it is naughty
    ClickHand(u32),
    PourStart,
    PourEnd,
    DumpCup,
}

/// Output of one frame
#[derive(Debug, Clone)]
pub struct Frame {
    pub report: FrameReport,
    pub snapshot: Snapshot,
}

pub struct Session {
    state: GameState,
    dice: Box<dyn Dice>,
    settings: Settings,
}

impl Session {
    /// New session waiting in the menu, with seeded dice
    pub fn new(settings: Settings) -> Self {
        let seed = settings.resolve_seed();
        Self::with_dice(settings, seed, Box::new(SeededDice::new(seed)))
    }

    /// New session using the given dice (scripted runs, replays)
    pub fn with_dice(settings: Settings, seed: u64, dice: Box<dyn Dice>) -> Self {
        let mut state = GameState::new(seed);
        state.phase = GamePhase::Menu;
        Self {
            state,
            dice,
            settings,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for scripted setups
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Frames should keep being scheduled
    pub fn is_running(&self) -> bool {
        self.state.is_playing()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state)
    }

    /// Apply a player intent between frames
    pub fn handle(&mut self, intent: Intent) -> Vec<SimEvent> {
        let mut events = Vec::new();

        match intent {
            Intent::StartSession | Intent::RestartSession => {
                self.start();
                return events;
            }
            _ if !self.state.is_playing() => {
                log::debug!("Ignoring {:?} outside play", intent);
                return events;
            }
            Intent::BeginDrag(pointer) => self.begin_drag(pointer, &mut events),
            Intent::MoveDrag(pointer) => {
                self.state.table.drag_to(pointer);
            }
            Intent::EndDrag => self.state.table.end_drag(),
            Intent::ClickGuest(guest_id) => self.click_guest(guest_id, &mut events),
            Intent::KickGuest(guest_id) => {
                kick_guest(&mut self.state, guest_id, &mut events);
            }
            Intent::ClickHand(hand_id) => {
                slap_hand(&mut self.state, hand_id, &mut events);
            }
            Intent::PourStart => {
                if self.state.cup.fill <= CUP_POUR_LIMIT {
                    self.state.cup.pouring = true;
                }
            }
            Intent::PourEnd => self.state.cup.pouring = false,
            Intent::DumpCup => self.state.cup.dump(),
        }

        check_game_over(&mut self.state, &mut events);
        events
    }

    /// Advance one animation frame of `dt_ms` and publish the result
    pub fn frame(&mut self, dt_ms: f32) -> Frame {
        let dt = if dt_ms > self.settings.max_frame_ms {
            log::warn!(
                "Frame of {:.1}ms clamped to {:.1}ms",
                dt_ms,
                self.settings.max_frame_ms
            );
            self.settings.max_frame_ms
        } else {
            dt_ms
        };

        let report = tick(&mut self.state, self.dice.as_mut(), self.settings.pacing, dt);
        Frame {
            report,
            snapshot: self.snapshot(),
        }
    }

    fn start(&mut self) {
        let seed = self.state.seed;
        self.state = GameState::new(seed);
        log::info!("Banquet started (seed {})", seed);
    }

    /// Grabbing the table while someone is being served is rude, but the
    /// drag still happens
    fn begin_drag(&mut self, pointer: Vec2, events: &mut Vec<SimEvent>) {
        let rude = locking_hand(&self.state).map(|hand| {
            let owner = self.state.guest(hand.guest_id).map(|g| g.kind);
            (hand.naughty, hand.guest_id, owner)
        });

        match rude {
            Some((true, _, _)) => {
                self.state
                    .show_message("Deal with the little brat first!", Sentiment::Bad);
            }
            Some((false, _, Some(GuestKind::Elder))) => {
                adjust_respect(&mut self.state, -PENALTY_ELDER_GRAB);
            }
            Some((false, guest_id, _)) => {
                log::warn!("Table turned while guest {} is serving himself", guest_id);
                self.state.show_message(
                    "A guest is serving himself! Don't turn the table!",
                    Sentiment::Bad,
                );
                adjust_respect(&mut self.state, -PENALTY_RUDE_MOVE);
                events.push(SimEvent::RudeTurn { guest_id });
            }
            None => {}
        }

        self.state.table.begin_drag(pointer);
    }

    fn click_guest(&mut self, guest_id: u32, events: &mut Vec<SimEvent>) {
        let Some(guest) = self.state.guest(guest_id) else {
            log::debug!("Click on unknown guest {}", guest_id);
            return;
        };
        if !guest.is_seated() {
            return;
        }
        let (kickable, wants_toast) = (guest.is_kickable(), guest.wants_toast);

        if kickable {
            kick_guest(&mut self.state, guest_id, events);
        } else if wants_toast {
            serve_toast(&mut self.state, guest_id, events);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::hands::spawn_hand_for;
    use crate::sim::rng::ScriptedDice;
    use crate::sim::state::{Gender, PourTier, PresenceLabel};

    const FRAME: f32 = 16.0;

    fn playing() -> Session {
        let mut session = Session::with_dice(Settings::default(), 5, Box::new(ScriptedDice::quiet()));
        session.handle(Intent::StartSession);
        session
    }

    #[test]
    fn test_menu_until_started() {
        let mut session = Session::with_dice(Settings::default(), 5, Box::new(ScriptedDice::quiet()));
        assert_eq!(session.state().phase, GamePhase::Menu);
        assert!(!session.is_running());
        session.handle(Intent::PourStart);
        assert!(!session.state().cup.pouring);
        let frame = session.frame(FRAME);
        assert_eq!(session.state().frames, 0);
        assert_eq!(frame.snapshot.phase, GamePhase::Menu);

        session.handle(Intent::StartSession);
        assert!(session.is_running());
        let snap = session.snapshot();
        assert_eq!(snap.respect, 100.0);
        assert_eq!(snap.score, 0);
        assert_eq!(snap.guests.len(), 8);
        assert!(snap.guests.iter().all(|g| g.state == PresenceLabel::Seated));
        assert!(snap.hands.is_empty());
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut session = playing();
        {
            let state = session.state_mut();
            state.score = 1234;
            state.respect = 0.0;
            state.cup.fill = 77.0;
            state.guests[2].wants_toast = true;
            state.guests[2].toast_timer = 300.0;
            state.guests[4].presence = crate::sim::state::Presence::Empty;
        }
        let mut events = Vec::new();
        spawn_hand_for(session.state_mut(), 1, Some(0), &mut events);
        session.frame(FRAME);
        assert_eq!(session.state().phase, GamePhase::GameOver);

        session.handle(Intent::RestartSession);
        let state = session.state();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.respect, MAX_RESPECT);
        assert_eq!(state.score, 0);
        assert_eq!(state.cup.fill, 0.0);
        assert!(state.hands.is_empty());
        assert!(state.guests.iter().all(|g| g.is_seated() && !g.wants_toast && g.toast_timer == 0.0));
        assert!(state.guests.iter().all(|g| g.excuse.is_none()));
    }

    #[test]
    fn test_pour_and_perfect_toast() {
        let mut session = playing();
        session.state_mut().guests[1].wants_toast = true;
        session.state_mut().guests[1].toast_timer = TOAST_WAIT_MS;

        session.handle(Intent::PourStart);
        for _ in 0..34 {
            session.frame(FRAME);
        }
        session.handle(Intent::PourEnd);
        assert_eq!(session.state().cup.fill, 85.0);

        let score = session.state().score;
        let events = session.handle(Intent::ClickGuest(1));
        assert_eq!(
            events,
            vec![SimEvent::ToastServed {
                guest_id: 1,
                tier: PourTier::Perfect
            }]
        );
        assert_eq!(session.state().score, score + 150);
        assert_eq!(session.state().cup.fill, 0.0);
    }

    #[test]
    fn test_no_pouring_into_overfull_cup() {
        let mut session = playing();
        session.state_mut().cup.fill = 111.0;
        session.handle(Intent::PourStart);
        assert!(!session.state().cup.pouring);

        session.state_mut().cup.fill = CUP_POUR_LIMIT;
        session.handle(Intent::PourStart);
        assert!(session.state().cup.pouring);
        session.frame(FRAME);
        assert_eq!(session.state().cup.fill, CUP_POUR_LIMIT + POUR_RATE);
    }

    #[test]
    fn test_dump_cup() {
        let mut session = playing();
        session.handle(Intent::PourStart);
        session.frame(FRAME);
        session.handle(Intent::DumpCup);
        assert_eq!(session.state().cup.fill, 0.0);
        assert!(!session.state().cup.pouring);
    }

    #[test]
    fn test_click_kicks_female_guest() {
        let mut session = playing();
        session.state_mut().guests[7].gender = Gender::Female;
        session.state_mut().guests[7].tolerance_timer = FEMALE_TOLERANCE_MS;
        let events = session.handle(Intent::ClickGuest(7));
        assert_eq!(events, vec![SimEvent::GuestKicked { guest_id: 7 }]);
        assert_eq!(session.state().score, KICK_BONUS);
        assert_eq!(session.state().guests[7].presence.label(), PresenceLabel::Kicking);
    }

    #[test]
    fn test_rude_kick_keeps_guest() {
        let mut session = playing();
        let events = session.handle(Intent::KickGuest(0));
        assert_eq!(events, vec![SimEvent::RudeKick { guest_id: 0 }]);
        assert_eq!(session.state().respect, MAX_RESPECT - PENALTY_RUDE_KICK);
        assert!(session.state().guests[0].is_seated());
        assert_eq!(session.state().score, 0);
    }

    #[test]
    fn test_rude_turn_penalties() {
        let mut session = playing();
        let mut events = Vec::new();
        spawn_hand_for(session.state_mut(), 2, Some(3), &mut events);
        // Into the grabbing window
        for _ in 0..70 {
            session.frame(FRAME);
        }
        let respect = session.state().respect;
        let events = session.handle(Intent::BeginDrag(Vec2::new(1.0, 0.0)));
        assert_eq!(events, vec![SimEvent::RudeTurn { guest_id: 2 }]);
        assert!((session.state().respect - (respect - PENALTY_RUDE_MOVE)).abs() < 1e-4);
        assert!(session.state().table.dragging);

        // Input still moves the table
        let rotation = session.state().table.rotation;
        session.handle(Intent::MoveDrag(Vec2::new(0.0, 1.0)));
        assert!((session.state().table.rotation - rotation - 90.0).abs() < 1e-3);
        session.handle(Intent::EndDrag);
        assert!(!session.state().table.dragging);
    }

    #[test]
    fn test_naughty_turn_only_warns() {
        let mut session = playing();
        let mut events = Vec::new();
        spawn_hand_for(session.state_mut(), 3, None, &mut events);
        let respect = session.state().respect;
        let events = session.handle(Intent::BeginDrag(Vec2::new(1.0, 0.0)));
        assert!(events.is_empty());
        assert_eq!(session.state().respect, respect);
        assert!(session.state().message.is_some());
    }

    #[test]
    fn test_slap_through_click() {
        let mut session = playing();
        let mut events = Vec::new();
        let id = spawn_hand_for(session.state_mut(), 5, None, &mut events).unwrap();
        let events = session.handle(Intent::ClickHand(id));
        assert_eq!(events, vec![SimEvent::HandSlapped { hand_id: id }]);
        assert_eq!(session.state().score, SLAP_BONUS);
        assert!(session.state().hands.is_empty());

        // Unknown hand
        assert!(session.handle(Intent::ClickHand(999)).is_empty());
    }

    #[test]
    fn test_action_that_empties_respect_ends_game() {
        let mut session = playing();
        session.state_mut().respect = 20.0;
        let events = session.handle(Intent::KickGuest(1));
        assert!(events.contains(&SimEvent::GameOver { score: 0 }));
        assert!(!session.is_running());
        assert!(session.handle(Intent::ClickGuest(1)).is_empty());
    }

    #[test]
    fn test_long_frames_clamped() {
        let mut session = playing();
        let frame = session.frame(10_000.0);
        let max_frame_ms = session.settings().max_frame_ms;
        assert_eq!(max_frame_ms, Settings::default().max_frame_ms);
        assert_eq!(frame.report.dt, max_frame_ms);
        assert_eq!(session.state().clock_ms, max_frame_ms as f64);
    }
}
