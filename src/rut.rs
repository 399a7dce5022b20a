//! Chilean RUT (Rol Único Tributario) parsing and validation.
//!
//! A RUT is a 7-8 digit body plus a modulo-11 check digit (`0`-`9` or `K`),
//! written `12345678-5`. Input arrives in many spellings (`12.345.678-5`,
//! `123456785`, lowercase `k`); [`Rut::parse`] accepts all of them and
//! produces the canonical dotless uppercase hyphenated form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const BODY_MIN_DIGITS: usize = 7;
const BODY_MAX_DIGITS: usize = 8;

/// Cyclic checksum weights, applied to body digits from right to left.
const WEIGHTS: [u32; 6] = [2, 3, 4, 5, 6, 7];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RutError {
    #[error("RUT is empty")]
    Empty,
    #[error("RUT body must be {BODY_MIN_DIGITS}-{BODY_MAX_DIGITS} digits, got {0}")]
    BadLength(usize),
    #[error("RUT contains invalid character '{0}'")]
    InvalidCharacter(char),
    #[error("RUT check digit mismatch: expected '{expected}', got '{actual}'")]
    CheckDigitMismatch { expected: char, actual: char },
}

/// A validated RUT. Construction via [`Rut::parse`] guarantees the checksum
/// holds, so a stored `Rut` is always canonical.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rut {
    body: u32,
    check_digit: char,
}

impl Rut {
    /// Parse an arbitrary spelling into a validated RUT.
    ///
    /// Dots and whitespace are stripped, letters uppercased, and a missing
    /// hyphen is treated as separating the last character from the rest.
    pub fn parse(input: &str) -> Result<Self, RutError> {
        let cleaned: String = input
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '.' && *c != '-')
            .collect::<String>()
            .to_uppercase();

        if cleaned.is_empty() {
            return Err(RutError::Empty);
        }

        let mut chars = cleaned.chars();
        let check_digit = chars.next_back().ok_or(RutError::Empty)?;
        let body_str: String = chars.collect();
        let body_str = body_str.as_str();

        if !check_digit.is_ascii_digit() && check_digit != 'K' {
            return Err(RutError::InvalidCharacter(check_digit));
        }
        if let Some(bad) = body_str.chars().find(|c| !c.is_ascii_digit()) {
            return Err(RutError::InvalidCharacter(bad));
        }
        if body_str.len() < BODY_MIN_DIGITS || body_str.len() > BODY_MAX_DIGITS {
            return Err(RutError::BadLength(body_str.len()));
        }

        // 8 ASCII digits always fit in a u32.
        let body: u32 = body_str.parse().map_err(|_| RutError::BadLength(body_str.len()))?;

        let expected = compute_check_digit(body);
        if expected != check_digit {
            return Err(RutError::CheckDigitMismatch {
                expected,
                actual: check_digit,
            });
        }

        Ok(Self { body, check_digit })
    }

    pub fn body(&self) -> u32 {
        self.body
    }

    pub fn check_digit(&self) -> char {
        self.check_digit
    }

    /// Canonical form, e.g. `12345678-5`.
    pub fn canonical(&self) -> String {
        format!("{}-{}", self.body, self.check_digit)
    }
}

impl fmt::Display for Rut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.body, self.check_digit)
    }
}

impl FromStr for Rut {
    type Err = RutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Rut> for String {
    fn from(rut: Rut) -> Self {
        rut.canonical()
    }
}

impl TryFrom<String> for Rut {
    type Error = RutError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// Modulo-11 check digit for a RUT body: multiply digits right-to-left by the
/// cyclic weights 2,3,4,5,6,7, sum, then `11 - (sum % 11)` with 11 mapping to
/// '0' and 10 to 'K'.
pub fn compute_check_digit(body: u32) -> char {
    let mut sum = 0u32;
    let mut remaining = body;
    let mut i = 0usize;
    while remaining > 0 {
        sum += (remaining % 10) * WEIGHTS[i % WEIGHTS.len()];
        remaining /= 10;
        i += 1;
    }
    match 11 - (sum % 11) {
        11 => '0',
        10 => 'K',
        d => char::from_digit(d, 10).unwrap_or('0'),
    }
}

/// Normalize a RUT into canonical form, rejecting invalid input.
pub fn normalize(input: &str) -> Result<String, RutError> {
    Rut::parse(input).map(|rut| rut.canonical())
}

/// Whether the input parses as a checksum-valid RUT.
pub fn is_valid(input: &str) -> bool {
    Rut::parse(input).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rstest::rstest;

    #[rstest]
    #[case("12345678-5", 12_345_678, '5')]
    #[case("12.345.678-5", 12_345_678, '5')]
    #[case("123456785", 12_345_678, '5')]
    #[case("11111112-k", 11_111_112, 'K')]
    #[case(" 11.111.112-K ", 11_111_112, 'K')]
    fn parses_accepted_spellings(#[case] input: &str, #[case] body: u32, #[case] dv: char) {
        let rut = Rut::parse(input).expect("should parse");
        assert_eq!(rut.body(), body);
        assert_eq!(rut.check_digit(), dv);
    }

    #[rstest]
    #[case(12_345_678, '5')]
    #[case(11_111_112, 'K')]
    #[case(11_111_111, '1')]
    #[case(1_000_000, '9')]
    fn check_digit_table(#[case] body: u32, #[case] expected: char) {
        assert_eq!(compute_check_digit(body), expected);
    }

    #[test]
    fn rejects_empty_input() {
        assert_matches!(Rut::parse(""), Err(RutError::Empty));
        assert_matches!(Rut::parse("  .-  "), Err(RutError::Empty));
    }

    #[test]
    fn rejects_wrong_body_length() {
        // 6-digit body.
        assert_matches!(Rut::parse("123456-0"), Err(RutError::BadLength(6)));
        // 9-digit body.
        assert_matches!(Rut::parse("123456789-0"), Err(RutError::BadLength(9)));
    }

    #[test]
    fn rejects_non_digit_body() {
        assert_matches!(Rut::parse("12a45678-5"), Err(RutError::InvalidCharacter('A')));
    }

    #[test]
    fn rejects_bad_check_digit() {
        assert_matches!(
            Rut::parse("12345678-4"),
            Err(RutError::CheckDigitMismatch { expected: '5', actual: '4' })
        );
    }

    #[test]
    fn every_other_check_digit_is_rejected() {
        let valid = compute_check_digit(12_345_678);
        for candidate in "0123456789K".chars() {
            let input = format!("12345678-{candidate}");
            assert_eq!(is_valid(&input), candidate == valid, "digit {candidate}");
        }
    }

    #[test]
    fn normalize_is_idempotent() {
        for input in ["12.345.678-5", "123456785", "11111112-k"] {
            let once = normalize(input).expect("valid");
            let twice = normalize(&once).expect("still valid");
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn serde_round_trip() {
        let rut: Rut = serde_json::from_str("\"12.345.678-5\"").expect("deserialize");
        assert_eq!(serde_json::to_string(&rut).unwrap(), "\"12345678-5\"");
    }
}
