//! Random number sources for maze generation and voxel erosion.
//!
//! Everything random in the crate goes through `RandomSource`, so a seeded generator (or a scripted
//! fake in tests) reproduces a maze and its voxel world exactly.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

pub trait RandomSource {
    /// Uniform integer in `[0, n)`. `n` must be at least 1.
    fn below(&mut self, n: usize) -> usize;

    /// Bernoulli trial that succeeds with probability `numerator / denominator`.
    fn trial(&mut self, numerator: u32, denominator: u32) -> bool;
}

impl<R: Rng + ?Sized> RandomSource for R {
    #[inline]
    fn below(&mut self, n: usize) -> usize {
        self.gen_range(0..n)
    }

    #[inline]
    fn trial(&mut self, numerator: u32, denominator: u32) -> bool {
        self.gen_ratio(numerator, denominator)
    }
}

/// The reproducible generator used when the caller supplies a seed.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Success probability of a single erosion trial.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Serialize, Deserialize)]
pub struct Odds {
    pub numerator: u32,
    pub denominator: u32,
}

impl Odds {
    pub fn new(numerator: u32, denominator: u32) -> Odds {
        Odds { numerator, denominator }
    }

    /// A usable probability: non-zero denominator and numerator no larger than it.
    pub fn is_valid(&self) -> bool {
        self.denominator > 0 && self.numerator <= self.denominator
    }
}

/// Geometric-trial truncation of a stack of `full` blocks.
///
/// Walks down from the top of the stack: each step a trial is made and the first success stops the
/// walk. The number of failed trials is how many blocks are omitted from the top, never more than
/// `max_omitted` (nor `full`).
pub fn eroded_height<R>(rng: &mut R, full: u32, max_omitted: u32, stop_odds: Odds) -> u32
    where R: RandomSource + ?Sized
{
    let limit = max_omitted.min(full);
    let mut omitted = 0;
    while omitted < limit && !rng.trial(stop_odds.numerator, stop_odds.denominator) {
        omitted += 1;
    }
    full - omitted
}

/// A fake random source that replays prepared answers.
///
/// Once the scripted answers run out `below` returns 0 and `trial` succeeds, which means "first
/// choice" for generation and "no erosion" for synthesis.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    picks: VecDeque<usize>,
    trials: VecDeque<bool>,
}

impl ScriptedRandom {
    pub fn new(picks: Vec<usize>, trials: Vec<bool>) -> ScriptedRandom {
        ScriptedRandom {
            picks: picks.into(),
            trials: trials.into(),
        }
    }

    pub fn remaining_picks(&self) -> usize {
        self.picks.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn below(&mut self, n: usize) -> usize {
        self.picks.pop_front().map_or(0, |pick| pick % n)
    }

    fn trial(&mut self, _: u32, _: u32) -> bool {
        self.trials.pop_front().unwrap_or(true)
    }
}
