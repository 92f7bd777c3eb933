//! Random sources for the simulation
//!
//! Every random branch (toast onset, excuses, respawn, hand spawn) draws from
//! a [`Dice`], so tests and replays can script exact outcomes.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Source of uniform rolls in [0, 1)
pub trait Dice {
    fn roll(&mut self) -> f32;

    /// True with probability `p`
    fn chance(&mut self, p: f32) -> bool {
        self.roll() < p
    }

    /// Uniform index in `0..len` (`len` must be non-zero)
    fn pick(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        ((self.roll() * len as f32) as usize).min(len.saturating_sub(1))
    }
}

/// Seeded PCG dice
#[derive(Debug, Clone)]
pub struct SeededDice {
    rng: Pcg32,
}

impl SeededDice {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl Dice for SeededDice {
    fn roll(&mut self) -> f32 {
        self.rng.random::<f32>()
    }
}

/// Replays a fixed sequence of rolls, then repeats `fallback` forever
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptedDice {
    rolls: VecDeque<f32>,
    fallback: f32,
}

impl ScriptedDice {
    pub fn new(rolls: impl IntoIterator<Item = f32>, fallback: f32) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            fallback,
        }
    }

    /// Dice that never pass any chance below `0.999`
    pub fn quiet() -> Self {
        Self::new([], 0.999)
    }

    pub fn push(&mut self, roll: f32) {
        self.rolls.push_back(roll);
    }

    /// Scripted rolls not yet consumed
    pub fn remaining(&self) -> usize {
        self.rolls.len()
    }
}

impl Dice for ScriptedDice {
    fn roll(&mut self) -> f32 {
        self.rolls.pop_front().unwrap_or(self.fallback)
    }
}
