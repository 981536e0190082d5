//! ISO/IEC 7064 MOD97-10 check digits.
//!
//! The transcoded number easily exceeds 30 digits, so the remainder is
//! folded in one digit (or one two-digit letter value) at a time instead of
//! materialising the integer.

use crate::error::{IbanError, Result};

const MODULUS: u32 = 97;

/// Letters become 10..=35 (`A`/`a` = 10), digits pass through.
fn transcode(ch: char) -> Result<u32> {
    if let Some(digit) = ch.to_digit(10) {
        return Ok(digit);
    }
    if ch.is_ascii_alphabetic() {
        return Ok(ch.to_ascii_uppercase() as u32 - 'A' as u32 + 10);
    }
    Err(IbanError::bban(format!(
        "Illegal character in BBAN. May only contain digits and letters: '{}'",
        ch
    )))
}

/// Remainder of the transcoded concatenation of `parts`, modulo 97.
pub fn mod97<'a>(parts: impl IntoIterator<Item = &'a str>) -> Result<u32> {
    let mut remainder: u32 = 0;
    for part in parts {
        for ch in part.chars() {
            let value = transcode(ch)?;
            let shift = if value < 10 { 10 } else { 100 };
            remainder = (remainder * shift + value) % MODULUS;
        }
    }
    Ok(remainder)
}

/// Fresh check digits for `country` + `bban`, always in `02..=98`.
pub fn compute(country: &str, bban: &str) -> Result<String> {
    let remainder = mod97([bban, country, "00"])?;
    let check = 98 - remainder;
    debug_assert!((2..=98).contains(&check));
    Ok(format!("{:02}", check))
}

/// Rotates the check digits behind the BBAN and requires a remainder of 1.
pub fn verify(country: &str, check_digits: &str, bban: &str) -> Result<()> {
    let remainder = mod97([bban, country, check_digits])?;
    if remainder == 1 {
        return Ok(());
    }
    Err(IbanError::checksum(
        format!("{}{}{}", country, check_digits, bban),
        format!(
            "check digits {} give MOD97-10 remainder {}, expected 1",
            check_digits, remainder
        ),
    ))
}
