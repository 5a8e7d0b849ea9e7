//! Parsing of typed answers and table cells.

use timestable_core::driver::UserInput;
use timestable_core::learn::GRID_SIZE;

/// Interpret one line typed during a quiz.
///
/// `a`/`b`/`c` pick an option, a number answers directly, `p`/`r`/`q` pause,
/// resume and quit. Anything else is `None`, including `0`, which is stored
/// for a timed-out answer.
pub fn parse_answer(line: &str) -> Option<UserInput> {
    let line = line.trim().to_lowercase();
    match line.as_str() {
        "a" => Some(UserInput::Choose(0)),
        "b" => Some(UserInput::Choose(1)),
        "c" => Some(UserInput::Choose(2)),
        "p" | "pause" => Some(UserInput::Pause),
        "r" | "resume" => Some(UserInput::Resume),
        "q" | "quit" | "exit" => Some(UserInput::Stop),
        other => other.parse().ok().filter(|&n| n != 0).map(UserInput::Answer),
    }
}

/// Parse a learn-mode cell such as `7x8`, `7*8` or `7 × 8`.
pub fn parse_cell(text: &str) -> Option<(u32, u32)> {
    let (left, right) = text.trim().split_once(['x', 'X', '*', '×'])?;
    let multiplicand: u32 = left.trim().parse().ok()?;
    let multiplier: u32 = right.trim().parse().ok()?;
    let in_grid = |n: u32| (1..=GRID_SIZE).contains(&n);
    (in_grid(multiplicand) && in_grid(multiplier)).then_some((multiplicand, multiplier))
}
