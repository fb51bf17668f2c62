//! Randomness for shark-fight tie-breaks.
//!
//! The engine never reaches for a global generator; it draws from whatever
//! [`TieBreaker`] it was built with, so tests can force either outcome.

use bracket_core::Slot;
use rand::rngs::StdRng;
use rand::{thread_rng, Rng, SeedableRng};

/// A fair binary draw between the two slots of a battle.
pub trait TieBreaker {
    fn draw(&mut self) -> Slot;
}

fn slot_from(first: bool) -> Slot {
    if first {
        Slot::First
    } else {
        Slot::Second
    }
}

/// Draws from the thread-local generator
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngCoin;

impl TieBreaker for ThreadRngCoin {
    fn draw(&mut self) -> Slot {
        slot_from(thread_rng().gen_bool(0.5))
    }
}

/// Reproducible draws from a seeded generator
#[derive(Debug, Clone)]
pub struct SeededCoin {
    rng: StdRng,
}

impl SeededCoin {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl TieBreaker for SeededCoin {
    fn draw(&mut self) -> Slot {
        slot_from(self.rng.gen_bool(0.5))
    }
}

/// Always lands on the same slot
#[derive(Debug, Clone, Copy)]
pub struct FixedCoin(pub Slot);

impl TieBreaker for FixedCoin {
    fn draw(&mut self) -> Slot {
        self.0
    }
}

impl<T: TieBreaker + ?Sized> TieBreaker for &mut T {
    fn draw(&mut self) -> Slot {
        (**self).draw()
    }
}
