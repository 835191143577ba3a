use crate::error::GameResult;
use crate::game::{Prompt, Selector};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

/// Picks uniformly among the offered options.
pub struct RandomPlayer {
    rng: Pcg64,
}

impl RandomPlayer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg64::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng().gen())
    }
}

impl Selector for RandomPlayer {
    fn select(&mut self, prompt: Prompt<'_>) -> GameResult<isize> {
        // The game never prompts with an empty option list.
        let count = prompt.option_count().max(1);
        Ok(self.rng.gen_range(0..count) as isize)
    }
}
