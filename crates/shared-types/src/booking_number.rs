//! Human-readable booking numbers
//!
//! A booking number is assigned once at creation and never changes:
//! a fixed prefix, the low-order 8 digits of the creation timestamp in
//! milliseconds, and a 4-character random base-36 suffix. Uniqueness is
//! enforced by the persistence layer; callers regenerate on collision.

use crate::error::DomainError;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

const SUFFIX_LEN: usize = 4;
const TIMESTAMP_DIGITS: u32 = 8;
const CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Unique, immutable, human-readable booking identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingNumber(String);

impl BookingNumber {
    pub const PREFIX: &'static str = "BK";

    /// Generate a fresh booking number for the given creation instant
    ///
    /// Two calls with the same instant still differ in the random suffix,
    /// which is what the collision-retry path relies on.
    pub fn generate(at: DateTime<Utc>) -> Self {
        let ts = at.timestamp_millis().unsigned_abs() % 10u64.pow(TIMESTAMP_DIGITS);
        let mut rng = rand::rng();
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
            .collect();
        Self(format!("{}{:08}{}", Self::PREFIX, ts, suffix))
    }

    /// Rehydrate a booking number from storage
    ///
    /// # Errors
    /// Returns `DomainError::Validation` if the raw value does not have the
    /// generated shape.
    pub fn new(raw: String) -> Result<Self, DomainError> {
        let expected_len = Self::PREFIX.len() + TIMESTAMP_DIGITS as usize + SUFFIX_LEN;
        let valid = raw.len() == expected_len
            && raw.starts_with(Self::PREFIX)
            && raw[Self::PREFIX.len()..]
                .bytes()
                .all(|b| CHARSET.contains(&b));
        if valid {
            Ok(Self(raw))
        } else {
            Err(DomainError::Validation(format!(
                "invalid booking number: {}",
                raw
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BookingNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_shape() {
        let number = BookingNumber::generate(Utc::now());
        let s = number.as_str();
        assert_eq!(s.len(), 14);
        assert!(s.starts_with("BK"));
        assert!(s[2..10].bytes().all(|b| b.is_ascii_digit()));
        assert!(s[10..].bytes().all(|b| b.is_ascii_digit() || b.is_ascii_uppercase()));
    }

    #[test]
    fn test_same_instant_varies_by_suffix() {
        // Forced timestamp collision: every number shares the digits, only
        // the random suffix distinguishes them.
        let at = Utc::now();
        let numbers: HashSet<String> = (0..50)
            .map(|_| BookingNumber::generate(at).as_str().to_string())
            .collect();
        assert!(numbers.len() > 1);
        let prefix = &numbers.iter().next().unwrap()[..10];
        assert!(numbers.iter().all(|n| n.starts_with(prefix)));
    }

    #[test]
    fn test_rehydrate_valid() {
        let number = BookingNumber::generate(Utc::now());
        let raw = number.as_str().to_string();
        assert_eq!(BookingNumber::new(raw).unwrap(), number);
    }

    #[test]
    fn test_rehydrate_invalid() {
        assert!(BookingNumber::new("BK123".to_string()).is_err());
        assert!(BookingNumber::new("XX12345678ABCD".to_string()).is_err());
        assert!(BookingNumber::new("BK12345678ab!d".to_string()).is_err());
    }
}
