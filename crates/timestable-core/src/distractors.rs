//! Answer-option generation.
//!
//! Wrong options are drawn so that they look like plausible mistakes: close
//! neighbors of the right answer, other products from the same tier, or values
//! from a window around the right answer.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::model::Difficulty;

/// Number of options shown per question, including the correct one.
pub const OPTION_COUNT: usize = 3;

/// Half-width of the window used by the "nearby value" strategy.
const NEARBY_WINDOW: u32 = 50;

/// Largest offset used by the "off by a little" strategy.
const MAX_NEIGHBOR_OFFSET: u32 = 10;

/// Distractor strategy, picked per candidate with weights 30/30/40.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    Neighbor,
    TierProduct,
    Nearby,
}

impl Strategy {
    fn pick<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let roll: f64 = rng.random();
        if roll < 0.3 {
            Strategy::Neighbor
        } else if roll < 0.6 {
            Strategy::TierProduct
        } else {
            Strategy::Nearby
        }
    }

    /// Produce a raw candidate; may be out of bounds, the caller filters.
    fn candidate<R: Rng + ?Sized>(self, correct: u32, difficulty: Difficulty, rng: &mut R) -> i64 {
        let correct = i64::from(correct);
        match self {
            Strategy::Neighbor => {
                let offset = i64::from(rng.random_range(1..=MAX_NEIGHBOR_OFFSET));
                if rng.random_bool(0.5) {
                    correct + offset
                } else {
                    correct - offset
                }
            }
            Strategy::TierProduct => {
                let a = rng.random_range(difficulty.multiplicand_range());
                let b = rng.random_range(difficulty.multiplier_range());
                i64::from(a) * i64::from(b)
            }
            Strategy::Nearby => {
                let window = i64::from(NEARBY_WINDOW);
                let low = (correct - window).max(1);
                let high = correct + window;
                rng.random_range(low..=high)
            }
        }
    }
}

/// Build the answer options for a question: the correct answer plus two
/// distinct plausible distractors, in random order.
///
/// Every option lies in `1..=difficulty.max_product()`.
pub fn generate_answer_options<R: Rng + ?Sized>(
    correct_answer: u32,
    difficulty: Difficulty,
    rng: &mut R,
) -> [u32; OPTION_COUNT] {
    let max = i64::from(difficulty.max_product());
    let mut options = [correct_answer; OPTION_COUNT];
    let mut filled = 1;

    while filled < OPTION_COUNT {
        let candidate = Strategy::pick(rng).candidate(correct_answer, difficulty, rng);
        if candidate <= 0 || candidate > max {
            continue;
        }
        // In range of u32 since 0 < candidate <= max product.
        let candidate = candidate as u32;
        if options[..filled].contains(&candidate) {
            continue;
        }
        options[filled] = candidate;
        filled += 1;
    }

    options.shuffle(rng);
    options
}
