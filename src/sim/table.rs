//! Lazy Susan physics
//!
//! The table is a single rotation scalar (degrees, unbounded) with an angular
//! velocity in degrees per frame. Guests never touch it directly: the player
//! drags it, hands push it, and inertia carries it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{normalize_angle, pointer_angle, shortest_rotation};

/// What the hands want from the table this frame, strongest first
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TableForce {
    /// A naughty hand spins the table every frame
    Spin(f32),
    /// A polite hand turns the dish it wants toward its owner
    Nudge { target: f32 },
    /// Someone is eating; the table must not move
    Hold,
    #[default]
    Free,
}

impl TableForce {
    fn rank(&self) -> u8 {
        match self {
            TableForce::Spin(_) => 3,
            TableForce::Nudge { .. } => 2,
            TableForce::Hold => 1,
            TableForce::Free => 0,
        }
    }

    /// Keep whichever force takes priority
    pub fn strongest(self, other: TableForce) -> TableForce {
        if other.rank() > self.rank() { other } else { self }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    /// Current rotation (degrees, not wrapped)
    pub rotation: f32,
    /// Degrees per frame
    pub angular_velocity: f32,
    /// Player is holding the table
    pub dragging: bool,
    /// Last pointer position relative to the table centre
    last_pointer: Vec2,
}

impl Table {
    pub fn begin_drag(&mut self, pointer: Vec2) {
        self.dragging = true;
        self.last_pointer = pointer;
    }

    /// Follow the pointer; returns the applied rotation delta
    pub fn drag_to(&mut self, pointer: Vec2) -> f32 {
        if !self.dragging {
            return 0.0;
        }
        // Wrap so crossing the pointer seam at 180 degrees never flings the table
        let delta = shortest_rotation(pointer_angle(self.last_pointer), pointer_angle(pointer));
        self.rotation += delta;
        self.angular_velocity = delta;
        self.last_pointer = pointer;
        delta
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    /// Stop dead (slaps, eating guests)
    pub fn stop(&mut self) {
        self.angular_velocity = 0.0;
    }

    /// Apply this frame's hand force, then inertia if nothing holds the table.
    /// Returns true when the table was locked by a hand.
    pub fn step(&mut self, force: TableForce) -> bool {
        let locked = match force {
            TableForce::Spin(amount) => {
                self.rotation += amount;
                self.angular_velocity = amount;
                return true;
            }
            TableForce::Nudge { target } => {
                let diff = shortest_rotation(normalize_angle(self.rotation), target);
                if diff.abs() > POLITE_DEADBAND {
                    let push = diff * POLITE_NUDGE;
                    self.rotation += push;
                    self.angular_velocity = push;
                    true
                } else {
                    false
                }
            }
            TableForce::Hold => {
                self.angular_velocity = 0.0;
                true
            }
            TableForce::Free => false,
        };

        if !locked && !self.dragging {
            self.coast();
        }
        locked
    }

    /// Inertia with damping
    fn coast(&mut self) {
        self.rotation += self.angular_velocity;
        self.angular_velocity *= VELOCITY_DAMPING;
        if self.angular_velocity.abs() < VELOCITY_SNAP {
            self.angular_velocity = 0.0;
        }
    }

    /// Signed distance from the fish head to the seat of honor
    pub fn offset_from_honor(&self) -> f32 {
        shortest_rotation(normalize_angle(self.rotation), HONOR_ANGLE)
    }

    /// The fish faces the elder
    pub fn is_aligned(&self) -> bool {
        self.offset_from_honor().abs() < ALIGN_TOLERANCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_at(rotation: f32) -> Table {
        Table {
            rotation,
            ..Default::default()
        }
    }

    #[test]
    fn test_alignment_window() {
        assert!(table_at(270.0).is_aligned());
        assert!(table_at(-90.0).is_aligned());
        assert!(table_at(270.0 + 19.9).is_aligned());
        assert!(!table_at(270.0 + 20.0).is_aligned());
        assert!(!table_at(0.0).is_aligned());
        assert!(table_at(270.0 + 720.0).is_aligned());
    }

    #[test]
    fn test_coast_decays_and_snaps() {
        let mut table = table_at(0.0);
        table.angular_velocity = 10.0;
        assert!(!table.step(TableForce::Free));
        assert_eq!(table.rotation, 10.0);
        assert!((table.angular_velocity - 9.5).abs() < 1e-5);

        table.angular_velocity = 0.105;
        table.step(TableForce::Free);
        assert_eq!(table.angular_velocity, 0.0);
    }

    #[test]
    fn test_no_coast_while_dragging() {
        let mut table = table_at(0.0);
        table.begin_drag(Vec2::new(1.0, 0.0));
        table.angular_velocity = 5.0;
        table.step(TableForce::Free);
        assert_eq!(table.rotation, 0.0);
    }

    #[test]
    fn test_nudge_approaches_target() {
        let mut table = table_at(0.0);
        assert!(table.step(TableForce::Nudge { target: 90.0 }));
        assert!((table.rotation - 9.0).abs() < 1e-4);

        // Inside the deadband the hand lets go and inertia takes over
        let mut table = table_at(89.0);
        assert!(!table.step(TableForce::Nudge { target: 90.0 }));
    }

    #[test]
    fn test_nudge_takes_short_way() {
        let mut table = table_at(350.0);
        table.step(TableForce::Nudge { target: 10.0 });
        assert!((table.rotation - 352.0).abs() < 1e-4);
    }

    #[test]
    fn test_spin_and_hold() {
        let mut table = table_at(0.0);
        assert!(table.step(TableForce::Spin(NAUGHTY_SPIN)));
        assert_eq!(table.rotation, NAUGHTY_SPIN);
        assert!(table.step(TableForce::Hold));
        assert_eq!(table.rotation, NAUGHTY_SPIN);
        assert_eq!(table.angular_velocity, 0.0);
    }

    #[test]
    fn test_drag_follows_pointer() {
        let mut table = table_at(0.0);
        assert_eq!(table.drag_to(Vec2::new(0.0, 1.0)), 0.0);

        table.begin_drag(Vec2::new(1.0, 0.0));
        let delta = table.drag_to(Vec2::new(0.0, 1.0));
        assert!((delta - 90.0).abs() < 1e-3);
        assert!((table.rotation - 90.0).abs() < 1e-3);
        assert!((table.angular_velocity - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_drag_across_seam() {
        let mut table = table_at(0.0);
        table.begin_drag(Vec2::new(-1.0, 0.01));
        let delta = table.drag_to(Vec2::new(-1.0, -0.01));
        assert!(delta.abs() < 2.0, "delta {delta}");
    }

    #[test]
    fn test_force_priority() {
        let f = TableForce::Free
            .strongest(TableForce::Hold)
            .strongest(TableForce::Nudge { target: 1.0 });
        assert_eq!(f, TableForce::Nudge { target: 1.0 });
        assert_eq!(TableForce::Spin(15.0).strongest(TableForce::Hold), TableForce::Spin(15.0));
    }
}
