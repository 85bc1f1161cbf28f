//! Structural validators for pattern matches
//!
//! Each validator is a pure pass/fail check on the matched surface text:
//! checksums (Luhn, NIR key, DNI letter) or structural rules (SSN area/group
//! ranges). Whitespace and punctuation are stripped before checking and letter
//! comparisons are case-insensitive. Malformed input is a validation failure,
//! never an error.
//!
//! Validators are referenced from pattern catalogs by identifier, so the set
//! here is closed and parsed once at registry construction.

use crate::domain::{Result, ScrubError};
use serde::Deserialize;
use std::str::FromStr;

/// Identifier for a structural validator, as named in pattern catalogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidatorId {
    UsSsn,
    UsPhone,
    Luhn,
    Npi,
    FrenchNir,
    GermanSteuerId,
    ItalianCodiceFiscale,
    SpanishDni,
    SpanishNie,
}

impl ValidatorId {
    /// Run this validator against a matched surface string.
    pub fn validate(&self, text: &str) -> bool {
        match self {
            Self::UsSsn => validate_us_ssn(text),
            Self::UsPhone => validate_us_phone(text),
            Self::Luhn => validate_luhn(text),
            Self::Npi => validate_npi(text),
            Self::FrenchNir => validate_french_nir(text),
            Self::GermanSteuerId => validate_german_steuer_id(text),
            Self::ItalianCodiceFiscale => validate_italian_codice_fiscale(text),
            Self::SpanishDni => validate_spanish_dni(text),
            Self::SpanishNie => validate_spanish_nie(text),
        }
    }
}

impl FromStr for ValidatorId {
    type Err = ScrubError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "us_ssn" => Ok(Self::UsSsn),
            "us_phone" => Ok(Self::UsPhone),
            "luhn" => Ok(Self::Luhn),
            "npi" => Ok(Self::Npi),
            "french_nir" => Ok(Self::FrenchNir),
            "german_steuer_id" => Ok(Self::GermanSteuerId),
            "italian_codice_fiscale" => Ok(Self::ItalianCodiceFiscale),
            "spanish_dni" => Ok(Self::SpanishDni),
            "spanish_nie" => Ok(Self::SpanishNie),
            other => Err(ScrubError::Pattern(format!("unknown validator id: {other}"))),
        }
    }
}

/// Digits of `text` with everything else stripped.
fn digits_of(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Alphanumeric characters of `text`, uppercased.
fn alnum_upper(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Validate a US Social Security Number.
///
/// Nine digits in groups 3-2-4. Area must not be 000, 666, or 900-999;
/// group must not be 00; serial must not be 0000.
pub fn validate_us_ssn(text: &str) -> bool {
    let digits = digits_of(text);
    if digits.len() != 9 {
        return false;
    }
    let (area, rest) = digits.split_at(3);
    let (group, serial) = rest.split_at(2);
    if area == "000" || area == "666" || area.starts_with('9') {
        return false;
    }
    if group == "00" || serial == "0000" {
        return false;
    }
    true
}

/// Validate a US phone number (NANP).
///
/// Ten significant digits after stripping an optional leading country code 1;
/// the area code may not start with 0 or 1 and the exchange may not start
/// with 0.
pub fn validate_us_phone(text: &str) -> bool {
    let mut digits = digits_of(text);
    if digits.len() == 11 && digits.starts_with('1') {
        digits.remove(0);
    }
    if digits.len() != 10 {
        return false;
    }
    let bytes = digits.as_bytes();
    !matches!(bytes[0], b'0' | b'1') && bytes[3] != b'0'
}

/// Standard mod-10 Luhn checksum (credit-card style).
pub fn validate_luhn(text: &str) -> bool {
    let cleaned = alnum_upper(text);
    if cleaned.is_empty() || cleaned.chars().any(|c| !c.is_ascii_digit()) {
        return false;
    }
    luhn_checksum_ok(&cleaned)
}

fn luhn_checksum_ok(digits: &str) -> bool {
    let mut sum = 0u32;
    for (i, c) in digits.chars().rev().enumerate() {
        let mut d = c.to_digit(10).unwrap_or(0);
        if i % 2 == 1 {
            d *= 2;
            if d > 9 {
                d -= 9;
            }
        }
        sum += d;
    }
    sum % 10 == 0
}

/// Validate a US National Provider Identifier.
///
/// Ten digits; the Luhn check runs over the fixed `80840` prefix plus the
/// ten digits (the card-issuer prefix assigned to US health providers).
pub fn validate_npi(text: &str) -> bool {
    let digits = digits_of(text);
    if digits.len() != 10 {
        return false;
    }
    luhn_checksum_ok(&format!("80840{digits}"))
}

/// Validate a French NIR/INSEE number.
///
/// Fifteen digits; first digit 1 or 2; the check key (last two digits)
/// equals `97 - (first 13 digits mod 97)`.
pub fn validate_french_nir(text: &str) -> bool {
    let digits = digits_of(text);
    if digits.len() != 15 {
        return false;
    }
    if !digits.starts_with('1') && !digits.starts_with('2') {
        return false;
    }
    let number: u64 = match digits[..13].parse() {
        Ok(n) => n,
        Err(_) => return false,
    };
    let key: u64 = match digits[13..].parse() {
        Ok(k) => k,
        Err(_) => return false,
    };
    key == 97 - (number % 97)
}

/// Validate a German Steuer-ID (tax identification number).
///
/// Eleven digits, first digit nonzero. Among the first ten digits exactly one
/// digit value occurs two or three times; every other value occurs at most
/// once.
pub fn validate_german_steuer_id(text: &str) -> bool {
    let digits = digits_of(text);
    if digits.len() != 11 || digits.starts_with('0') {
        return false;
    }
    let mut counts = [0u8; 10];
    for c in digits[..10].chars() {
        counts[c.to_digit(10).unwrap_or(0) as usize] += 1;
    }
    let repeated: Vec<u8> = counts.iter().copied().filter(|&c| c >= 2).collect();
    repeated.len() == 1 && repeated[0] <= 3
}

/// Validate the format of an Italian Codice Fiscale.
///
/// Sixteen characters matching LLLLLLDDLDDLDDDL. The full official check
/// character is not verified, only the structural shape.
pub fn validate_italian_codice_fiscale(text: &str) -> bool {
    let cleaned = alnum_upper(text);
    if cleaned.len() != 16 {
        return false;
    }
    // Expected class per position: L=letter, D=digit
    const SHAPE: &[u8; 16] = b"LLLLLLDDLDDLDDDL";
    cleaned.bytes().zip(SHAPE.iter()).all(|(c, class)| match class {
        b'L' => c.is_ascii_uppercase(),
        _ => c.is_ascii_digit(),
    })
}

const DNI_LETTERS: &[u8; 23] = b"TRWAGMYFPDXBNJZSQVHLCKE";

/// Validate a Spanish DNI (8 digits + mod-23 check letter).
pub fn validate_spanish_dni(text: &str) -> bool {
    let cleaned = alnum_upper(text);
    if cleaned.len() != 9 {
        return false;
    }
    let (number_part, letter_part) = cleaned.split_at(8);
    let number: u32 = match number_part.parse() {
        Ok(n) => n,
        Err(_) => return false,
    };
    let letter = letter_part.as_bytes()[0];
    letter.is_ascii_uppercase() && letter == DNI_LETTERS[(number % 23) as usize]
}

/// Validate a Spanish NIE (X/Y/Z prefix + 7 digits + mod-23 check letter).
///
/// The prefix maps to 0/1/2 and the result is checked like a DNI.
pub fn validate_spanish_nie(text: &str) -> bool {
    let cleaned = alnum_upper(text);
    if cleaned.len() != 9 {
        return false;
    }
    let prefix_digit = match cleaned.as_bytes()[0] {
        b'X' => '0',
        b'Y' => '1',
        b'Z' => '2',
        _ => return false,
    };
    let mut as_dni = String::with_capacity(9);
    as_dni.push(prefix_digit);
    as_dni.push_str(&cleaned[1..]);
    validate_spanish_dni(&as_dni)
}
