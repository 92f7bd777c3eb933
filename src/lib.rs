//! Fish Head - a lazy Susan banquet etiquette game
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (guests, grabbing hands, table physics, respect)
//! - `settings`: Host settings (seed, frame pacing, frame clamp)
//!
//! Rendering, layout and menus live outside this crate. A host forwards
//! [`sim::Intent`]s into a [`sim::Session`] and draws the [`sim::Snapshot`]
//! it publishes once per frame.

pub mod settings;
pub mod sim;

pub use settings::{FramePacing, Settings, SettingsError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Number of seats around the table
    pub const GUEST_COUNT: usize = 8;
    /// Seat index of the elder (seat of honor)
    pub const ELDER_SEAT: usize = 0;
    /// Seat indices reserved for children
    pub const CHILD_SEATS: [usize; 2] = [3, 5];

    /// Respect bounds
    pub const MAX_RESPECT: f32 = 100.0;
    /// Background decay per frame (also the net result of any frame with a hand out)
    pub const RESPECT_DECAY_RATE: f32 = 0.05;
    /// Gain per frame while the fish faces the elder and nobody is grabbing
    pub const RESPECT_GAIN_RATE: f32 = 0.1;
    /// Loss per frame while the fish points elsewhere and nobody is grabbing
    pub const PENALTY_FISH_WRONG: f32 = 0.05;
    /// Score trickle per aligned, hand-free frame
    pub const ALIGNED_SCORE_PER_FRAME: i64 = 1;

    /// Seat of honor, in table degrees
    pub const HONOR_ANGLE: f32 = 270.0;
    /// Alignment tolerance (degrees, exclusive)
    pub const ALIGN_TOLERANCE: f32 = 20.0;

    /// Table physics (per frame)
    pub const VELOCITY_DAMPING: f32 = 0.95;
    pub const VELOCITY_SNAP: f32 = 0.1;
    pub const NAUGHTY_SPIN: f32 = 15.0;
    pub const POLITE_NUDGE: f32 = 0.1;
    pub const POLITE_DEADBAND: f32 = 2.0;

    /// Hand age windows (ms since spawn)
    pub const HAND_REACH_MS: f32 = 1000.0;
    pub const HAND_TURN_MS: f32 = 2500.0;
    pub const HAND_EAT_MS: f32 = 4500.0;
    pub const HAND_RETRACT_MS: f32 = 5500.0;
    /// Hand spawn chance per frame (when no hand is out)
    pub const HAND_SPAWN_CHANCE: f32 = 0.005;

    /// Toast requests
    pub const TOAST_CHANCE: f32 = 0.0005;
    pub const TOAST_WAIT_MS: f32 = 8000.0;
    pub const TOAST_PENALTY: f32 = 15.0;

    /// Excuses
    pub const EXCUSE_GRACE_MS: f32 = 10_000.0;
    pub const EXCUSE_CHECK_INTERVAL_MS: f32 = 1000.0;
    pub const EXCUSE_CHANCE: f32 = 0.04;
    pub const EXCUSE_MS: f32 = 5000.0;
    pub const EXCUSE_PENALTY: f32 = 20.0;

    /// Female guests
    pub const FEMALE_TOLERANCE_MS: f32 = 4000.0;
    pub const FEMALE_OVERSTAY_PENALTY: f32 = 30.0;
    pub const FEMALE_DRAIN: f32 = 0.2;
    pub const FEMALE_CHANCE: f32 = 0.4;

    /// Kicking
    pub const KICK_ANIMATION_MS: f32 = 800.0;
    pub const KICK_BONUS: i64 = 100;
    pub const PENALTY_RUDE_KICK: f32 = 30.0;

    /// Respawn
    pub const RESPAWN_INITIAL_DELAY_MS: f32 = 2000.0;
    pub const RESPAWN_INITIAL_CHANCE: f32 = 0.5;
    pub const RESPAWN_RETRY_INTERVAL_MS: f32 = 1000.0;
    pub const RESPAWN_RETRY_CHANCE: f32 = 0.8;

    /// Table etiquette
    pub const PENALTY_RUDE_MOVE: f32 = 10.0;
    pub const PENALTY_ELDER_GRAB: f32 = 5.0;
    pub const ELDER_DISTURB_DRAIN: f32 = 1.5;
    pub const SLAP_BONUS: i64 = 50;

    /// Wine cup
    pub const POUR_RATE: f32 = 2.5;
    pub const CUP_MAX_FILL: f32 = 120.0;
    /// Pouring can't be started on a cup fuller than this
    pub const CUP_POUR_LIMIT: f32 = 110.0;
    pub const CUP_MIN_OFFER: f32 = 5.0;
    pub const POUR_CARELESS: f32 = 50.0;
    pub const POUR_PERFECT: f32 = 80.0;
    pub const CUP_BRIM: f32 = 100.0;

    /// On-screen message lifetime
    pub const MESSAGE_MS: f32 = 2000.0;

    /// Nominal frame length (60 Hz), used by normalized pacing and the demo
    pub const REFERENCE_FRAME_MS: f32 = 1000.0 / 60.0;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if a >= 360.0 { 0.0 } else { a }
}

/// Shortest signed rotation (degrees) taking `current` to `target`, in [-180, 180)
#[inline]
pub fn shortest_rotation(current: f32, target: f32) -> f32 {
    normalize_angle(target - current + 180.0) - 180.0
}

/// Angle (degrees) of a pointer position relative to the table centre.
/// Uses screen orientation: +x right, +y down, angles grow clockwise.
#[inline]
pub fn pointer_angle(pos: Vec2) -> f32 {
    pos.y.atan2(pos.x).to_degrees()
}
