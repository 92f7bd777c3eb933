//! Demo mode: a simple host that plays the banquet
//!
//! Produces the same intents a player would, so everything it does goes
//! through [`Session::handle`](super::session::Session::handle).

use glam::Vec2;

use super::session::Intent;
use super::state::GameState;
use crate::consts::*;

/// Pointer radius used for synthetic drags
const POINTER_RADIUS: f32 = 100.0;
/// Largest turn per frame while aligning
const MAX_STEP: f32 = 6.0;
/// Close enough to let go
const SETTLE_EPSILON: f32 = 1.0;
/// Pour until this fill, inside the perfect band
const POUR_TARGET: f32 = 85.0;

#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    /// Where the synthetic pointer is (degrees)
    pointer_angle: f32,
    dragging: bool,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intents to apply before the next frame
    pub fn plan(&mut self, state: &GameState) -> Vec<Intent> {
        let mut intents = Vec::new();
        if !state.is_playing() {
            return intents;
        }

        // Brats first, the table is spinning
        if let Some(hand) = state.hands.iter().find(|h| h.naughty) {
            intents.push(Intent::ClickHand(hand.id));
        }

        if let Some(guest) = state.guests.iter().find(|g| g.is_kickable()) {
            intents.push(Intent::ClickGuest(guest.id));
        }

        self.plan_toast(state, &mut intents);
        self.plan_table(state, &mut intents);
        intents
    }

    fn plan_toast(&self, state: &GameState, intents: &mut Vec<Intent>) {
        let cup = &state.cup;
        if cup.fill > CUP_BRIM {
            intents.push(Intent::DumpCup);
            return;
        }

        let toaster = state
            .guests
            .iter()
            .find(|g| g.is_seated() && g.wants_toast && !g.is_kickable());
        match toaster {
            Some(guest) if cup.fill >= POUR_TARGET => {
                if cup.pouring {
                    intents.push(Intent::PourEnd);
                }
                intents.push(Intent::ClickGuest(guest.id));
            }
            Some(_) if !cup.pouring => intents.push(Intent::PourStart),
            None if cup.pouring => intents.push(Intent::PourEnd),
            _ => {}
        }
    }

    /// Hold the table and walk the fish head round to the elder. Let go
    /// whenever a hand is out so nobody is disturbed.
    fn plan_table(&mut self, state: &GameState, intents: &mut Vec<Intent>) {
        let offset = state.table.offset_from_honor();
        let busy = !state.hands.is_empty();

        if busy || offset.abs() < SETTLE_EPSILON {
            if self.dragging {
                // Zero-length move kills the fling before release
                intents.push(Intent::MoveDrag(self.pointer()));
                intents.push(Intent::EndDrag);
                self.dragging = false;
            }
            return;
        }

        if !self.dragging {
            intents.push(Intent::BeginDrag(self.pointer()));
            self.dragging = true;
        }
        self.pointer_angle += offset.clamp(-MAX_STEP, MAX_STEP);
        intents.push(Intent::MoveDrag(self.pointer()));
    }

    fn pointer(&self) -> Vec2 {
        Vec2::from_angle(self.pointer_angle.to_radians()) * POINTER_RADIUS
    }
}
