//! Pluggable randomness for progress steps, step intervals and share tokens.

use std::collections::VecDeque;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const TOKEN_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

pub trait RandomSource: Send + Sync {
    /// Uniform value in `[low, high)`.
    fn next_f64(&self, low: f64, high: f64) -> f64;

    /// Uniform value in `[low, high)`.
    fn next_u64(&self, low: u64, high: u64) -> u64;

    /// Lowercase base-36 token.
    fn token(&self, len: usize) -> String {
        (0..len)
            .map(|_| TOKEN_ALPHABET[self.next_u64(0, TOKEN_ALPHABET.len() as u64) as usize] as char)
            .collect()
    }
}

/// `StdRng`-backed source.
pub struct StdRandom {
    rng: Mutex<StdRng>,
}

impl StdRandom {
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Reproducible sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        match self.rng.lock() {
            Ok(mut guard) => f(&mut guard),
            Err(poisoned) => {
                log::warn!("Random source lock was poisoned, recovering");
                f(&mut poisoned.into_inner())
            }
        }
    }
}

impl Default for StdRandom {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RandomSource for StdRandom {
    fn next_f64(&self, low: f64, high: f64) -> f64 {
        if low >= high {
            return low;
        }
        self.with_rng(|rng| rng.gen_range(low..high))
    }

    fn next_u64(&self, low: u64, high: u64) -> u64 {
        if low >= high {
            return low;
        }
        self.with_rng(|rng| rng.gen_range(low..high))
    }
}

/// Replays fixed sequences, falling back to the lower bound once exhausted.
///
/// Values outside the requested range are clamped into it.
#[derive(Default)]
pub struct ScriptedRandom {
    floats: Mutex<VecDeque<f64>>,
    integers: Mutex<VecDeque<u64>>,
}

impl ScriptedRandom {
    pub fn new(floats: Vec<f64>, integers: Vec<u64>) -> Self {
        Self {
            floats: Mutex::new(floats.into()),
            integers: Mutex::new(integers.into()),
        }
    }

    fn pop<T>(queue: &Mutex<VecDeque<T>>) -> Option<T> {
        match queue.lock() {
            Ok(mut guard) => guard.pop_front(),
            Err(poisoned) => poisoned.into_inner().pop_front(),
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&self, low: f64, high: f64) -> f64 {
        Self::pop(&self.floats).map_or(low, |v| v.clamp(low, high.max(low)))
    }

    fn next_u64(&self, low: u64, high: u64) -> u64 {
        let max = high.saturating_sub(1).max(low);
        Self::pop(&self.integers).map_or(low, |v| v.clamp(low, max))
    }
}
