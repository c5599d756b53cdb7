//! National identity number (`D-V`) validation.
//!
//! # Responsibility
//! - Check the `digits-check` lexical shape.
//! - Recompute the modulo-11 check character and compare it.
//!
//! # Invariants
//! - The digit body is read as an integer, so leading zeros never affect
//!   the computed check character.
//! - The check character comparison is case-insensitive (`k` == `K`).

use super::{ValidationError, ValidationResult};
use once_cell::sync::Lazy;
use regex::Regex;

static IDENTITY_NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{1,8})-([0-9kK])$").expect("valid identity number regex")
});

const WEIGHT_BASE: u32 = 2;
const WEIGHT_CYCLE: u32 = 6;

/// Validates a national identity number such as `12345678-5`.
pub fn validate_identity_number(input: &str) -> ValidationResult {
    check_identity_number(input).into()
}

/// Same as [`validate_identity_number`] but in `Result` form.
pub fn check_identity_number(input: &str) -> Result<(), ValidationError> {
    parse_identity_number(input).map(|_| ())
}

/// Returns the stored spelling of a valid identity number.
///
/// Leading zeros are dropped from the body and the check character is
/// uppercased, so `"01-9"` and `"1-9"` map to the same value.
pub fn canonical_identity_number(input: &str) -> Result<String, ValidationError> {
    let (body, check) = parse_identity_number(input)?;
    Ok(format!("{body}-{check}"))
}

/// Computes the check character for a digit body.
pub fn compute_check_digit(body: u32) -> char {
    let mut remaining = body;
    let mut position = 0;
    let mut total = 0;
    while remaining > 0 {
        let digit = remaining % 10;
        total += digit * (WEIGHT_BASE + position % WEIGHT_CYCLE);
        remaining /= 10;
        position += 1;
    }

    match 11 - total % 11 {
        11 => '0',
        10 => 'K',
        // 1..=9 by construction
        value => char::from_digit(value, 10).unwrap_or('0'),
    }
}

fn parse_identity_number(input: &str) -> Result<(u32, char), ValidationError> {
    let captures = IDENTITY_NUMBER_RE
        .captures(input)
        .ok_or(ValidationError::Format)?;

    // At most 8 ASCII digits, always fits in u32.
    let body = captures[1]
        .parse::<u32>()
        .map_err(|_| ValidationError::Format)?;
    let given = captures[2]
        .chars()
        .next()
        .ok_or(ValidationError::Format)?
        .to_ascii_uppercase();

    if given != compute_check_digit(body) {
        return Err(ValidationError::Checksum);
    }

    Ok((body, given))
}

#[cfg(test)]
mod tests {
    use super::{canonical_identity_number, compute_check_digit, validate_identity_number};
    use crate::validation::ValidationResult;

    #[test]
    fn computes_known_check_digits() {
        assert_eq!(compute_check_digit(12_345_678), '5');
        assert_eq!(compute_check_digit(11_111_111), '1');
        assert_eq!(compute_check_digit(1), '9');
        assert_eq!(compute_check_digit(7), '8');
    }

    #[test]
    fn wraps_eleven_to_zero_and_ten_to_k() {
        // 2*8 + 3*2 = 22, 22 % 11 == 0
        assert_eq!(compute_check_digit(28), '0');
        assert_eq!(compute_check_digit(0), '0');
        // 2*6 = 12, 12 % 11 == 1
        assert_eq!(compute_check_digit(6), 'K');
    }

    #[test]
    fn weights_cycle_after_seven() {
        // Weights 2,3,4,5,6,7,2 for a 7-digit body of ones: 29, 29 % 11 == 7.
        assert_eq!(compute_check_digit(1_111_111), '4');
    }

    #[test]
    fn canonical_form_drops_leading_zeros_and_uppercases() {
        assert_eq!(canonical_identity_number("01-9").unwrap(), "1-9");
        assert_eq!(canonical_identity_number("6-k").unwrap(), "6-K");
        assert_eq!(canonical_identity_number("00000000-0").unwrap(), "0-0");
    }

    #[test]
    fn checksum_mismatch_is_reported_separately_from_format() {
        assert_eq!(
            validate_identity_number("1-0"),
            ValidationResult::InvalidChecksum
        );
        assert_eq!(
            validate_identity_number("1-"),
            ValidationResult::InvalidFormat
        );
    }
}
