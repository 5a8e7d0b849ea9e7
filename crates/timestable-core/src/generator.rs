//! Question generation for quiz and review turns.

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::model::{Difficulty, Question, WrongQuestion};

/// Draw a fresh question uniformly from the difficulty's ranges.
pub fn generate_random_question<R: Rng + ?Sized>(difficulty: Difficulty, rng: &mut R) -> Question {
    let multiplicand = rng.random_range(difficulty.multiplicand_range());
    let multiplier = rng.random_range(difficulty.multiplier_range());
    Question::new(multiplicand, multiplier)
}

/// Pick a previously missed question uniformly at random.
///
/// Returns `None` when there is nothing to review.
pub fn generate_review_question<R: Rng + ?Sized>(
    wrong_questions: &[WrongQuestion],
    rng: &mut R,
) -> Option<Question> {
    wrong_questions.choose(rng).map(WrongQuestion::to_question)
}
