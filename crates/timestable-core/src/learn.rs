//! Learn mode: the 9×9 table, cell details and spoken formulas.

use crate::locale::Locale;
use crate::traits::{Narrator, Utterance};

/// Side length of the learn-mode table.
pub const GRID_SIZE: u32 = 9;

const CHINESE_DIGITS: [&str; 10] = ["", "一", "二", "三", "四", "五", "六", "七", "八", "九"];

/// The `size`×`size` multiplication table, row-major, 1-based factors.
pub fn grid(size: u32) -> Vec<Vec<u32>> {
    (1..=size)
        .map(|row| (1..=size).map(|col| row * col).collect())
        .collect()
}

/// All `(row, col)` cells of the 9×9 table whose product is `product`.
pub fn same_result_combinations(product: u32) -> Vec<(u32, u32)> {
    (1..=GRID_SIZE)
        .flat_map(|row| (1..=GRID_SIZE).map(move |col| (row, col)))
        .filter(|(row, col)| row * col == product)
        .collect()
}

/// What learn mode shows for a selected cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellInfo {
    pub multiplicand: u32,
    pub multiplier: u32,
    pub product: u32,
    /// `"7 × 8 = 56"`.
    pub equation: String,
    /// Other cells with the same product.
    pub other_combinations: Vec<(u32, u32)>,
}

pub fn describe_cell(multiplicand: u32, multiplier: u32) -> CellInfo {
    let product = multiplicand * multiplier;
    let other_combinations = same_result_combinations(product)
        .into_iter()
        .filter(|&cell| cell != (multiplicand, multiplier))
        .collect();
    CellInfo {
        multiplicand,
        multiplier,
        product,
        equation: format!("{multiplicand} × {multiplier} = {product}"),
        other_combinations,
    }
}

/// Chinese numeral for `0..=99`.
fn chinese_number(n: u32) -> String {
    match n {
        0 => "零".to_string(),
        1..=9 => CHINESE_DIGITS[n as usize].to_string(),
        10 => "十".to_string(),
        11..=19 => format!("十{}", CHINESE_DIGITS[(n - 10) as usize]),
        _ => format!(
            "{}十{}",
            CHINESE_DIGITS[(n / 10) as usize],
            CHINESE_DIGITS[(n % 10) as usize]
        ),
    }
}

/// The traditional rhyme, e.g. "七八五十六" or "一三得三".
fn chinese_rhyme(multiplicand: u32, multiplier: u32) -> String {
    let m = CHINESE_DIGITS[multiplicand as usize];
    let n = CHINESE_DIGITS[multiplier as usize];
    if multiplicand == 1 {
        return format!("一{n}得{n}");
    }
    format!("{m}{n}{}", chinese_number(multiplicand * multiplier))
}

/// The sentence spoken for `multiplicand × multiplier` in `locale`.
pub fn formula_text(multiplicand: u32, multiplier: u32, locale: Locale) -> String {
    let product = multiplicand * multiplier;
    let single_digits = (1..=9).contains(&multiplicand) && (1..=9).contains(&multiplier);
    match locale {
        Locale::Zh if single_digits => chinese_rhyme(multiplicand, multiplier),
        Locale::Zh => format!("{multiplicand}乘{multiplier}等于{product}"),
        Locale::En => format!("{multiplicand} times {multiplier} is {product}"),
        Locale::De => format!("{multiplicand} mal {multiplier} ist {product}"),
        Locale::Ja => format!("{multiplicand}かける{multiplier}は{product}"),
    }
}

/// Speak the formula for a cell.
///
/// Returns `Ok(false)` without speaking when speech is off or the backend is
/// unavailable.
pub async fn speak_formula(
    narrator: &dyn Narrator,
    multiplicand: u32,
    multiplier: u32,
    speech_enabled: bool,
    locale: Locale,
) -> anyhow::Result<bool> {
    if !speech_enabled || !narrator.is_supported() {
        return Ok(false);
    }
    let utterance = Utterance::new(formula_text(multiplicand, multiplier, locale), locale.voice());
    tracing::debug!(narrator = narrator.name(), text = %utterance.text, "speaking");
    narrator.speak(&utterance).await?;
    Ok(true)
}
