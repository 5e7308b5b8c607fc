//! Spelling out numeric tokens as English words.
//!
//! Output follows the common British-style reading: `105` is
//! `one hundred and five`, `42` is `forty-two`. Scale words are joined with
//! plain spaces, never commas, so the result re-tokenizes cleanly.

use crate::error::NormalizationError;

const ONES: [&str; 20] = [
    "zero",
    "one",
    "two",
    "three",
    "four",
    "five",
    "six",
    "seven",
    "eight",
    "nine",
    "ten",
    "eleven",
    "twelve",
    "thirteen",
    "fourteen",
    "fifteen",
    "sixteen",
    "seventeen",
    "eighteen",
    "nineteen",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

/// Scale word for each group of three digits, lowest first.
const SCALES: [&str; 12] = [
    "",
    "thousand",
    "million",
    "billion",
    "trillion",
    "quadrillion",
    "quintillion",
    "sextillion",
    "septillion",
    "octillion",
    "nonillion",
    "decillion",
];

/// Largest number of significant digits that can be spelled.
pub const MAX_DIGITS: usize = SCALES.len() * 3;

/// Whether every character of `token` is a numeral in any script.
pub fn is_numeric(token: &str) -> bool {
    !token.is_empty() && token.chars().all(char::is_numeric)
}

/// Spell a run of ASCII digits. Leading zeros are ignored.
pub fn spell(token: &str) -> Result<String, NormalizationError> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NormalizationError::UnsupportedNumeral(token.to_string()));
    }

    let digits = token.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(ONES[0].to_string());
    }
    if digits.len() > MAX_DIGITS {
        return Err(NormalizationError::NumberTooLarge {
            digits: digits.len(),
        });
    }

    let groups = groups_of_three(digits);
    let highest = groups.len() - 1;
    let mut words: Vec<String> = Vec::new();

    for (scale, &group) in groups.iter().enumerate().rev() {
        if group == 0 {
            continue;
        }
        // "and" bridges a trailing group below one hundred onto larger parts.
        let bridge = scale == 0 && group < 100 && highest > 0;
        let mut part = spell_group(group);
        if bridge {
            part = format!("and {}", part);
        }
        if !SCALES[scale].is_empty() {
            part = format!("{} {}", part, SCALES[scale]);
        }
        words.push(part);
    }

    Ok(words.join(" "))
}

/// Split digits into numeric groups of three, lowest group first.
fn groups_of_three(digits: &str) -> Vec<u16> {
    let bytes = digits.as_bytes();
    bytes
        .rchunks(3)
        .map(|chunk| {
            chunk
                .iter()
                .fold(0u16, |acc, b| acc * 10 + u16::from(b - b'0'))
        })
        .collect()
}

/// Spell 1..=999.
fn spell_group(n: u16) -> String {
    let hundreds = n / 100;
    let rest = n % 100;

    match (hundreds, rest) {
        (0, rest) => spell_below_hundred(rest),
        (h, 0) => format!("{} hundred", ONES[h as usize]),
        (h, rest) => format!("{} hundred and {}", ONES[h as usize], spell_below_hundred(rest)),
    }
}

fn spell_below_hundred(n: u16) -> String {
    let n = n as usize;
    if n < 20 {
        return ONES[n].to_string();
    }
    match n % 10 {
        0 => TENS[n / 10].to_string(),
        unit => format!("{}-{}", TENS[n / 10], ONES[unit]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_numbers() {
        assert_eq!(spell("0").unwrap(), "zero");
        assert_eq!(spell("5").unwrap(), "five");
        assert_eq!(spell("13").unwrap(), "thirteen");
        assert_eq!(spell("40").unwrap(), "forty");
        assert_eq!(spell("42").unwrap(), "forty-two");
    }

    #[test]
    fn test_hundreds_take_and() {
        assert_eq!(spell("100").unwrap(), "one hundred");
        assert_eq!(spell("105").unwrap(), "one hundred and five");
        assert_eq!(spell("999").unwrap(), "nine hundred and ninety-nine");
    }

    #[test]
    fn test_scales() {
        assert_eq!(spell("1005").unwrap(), "one thousand and five");
        assert_eq!(spell("1200").unwrap(), "one thousand two hundred");
        assert_eq!(spell("2016").unwrap(), "two thousand and sixteen");
        assert_eq!(
            spell("1000250").unwrap(),
            "one million two hundred and fifty"
        );
        assert_eq!(spell("3000000000").unwrap(), "three billion");
    }

    #[test]
    fn test_leading_zeros_are_ignored() {
        assert_eq!(spell("007").unwrap(), "seven");
        assert_eq!(spell("000").unwrap(), "zero");
    }

    #[test]
    fn test_largest_supported_scale() {
        let max = "9".repeat(MAX_DIGITS);
        assert!(spell(&max).unwrap().starts_with("nine hundred and ninety-nine decillion"));

        let too_big = format!("1{}", "0".repeat(MAX_DIGITS));
        assert!(matches!(
            spell(&too_big),
            Err(NormalizationError::NumberTooLarge { digits: 37 })
        ));
    }

    #[test]
    fn test_non_ascii_numerals_are_rejected() {
        assert!(is_numeric("²"));
        assert!(is_numeric("٣"));
        assert!(matches!(
            spell("²"),
            Err(NormalizationError::UnsupportedNumeral(_))
        ));
    }
}
