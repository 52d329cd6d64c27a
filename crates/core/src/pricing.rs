//! Pricing and commission computation
//!
//! The platform retains a percentage of each booking's total; the
//! remainder is the provider payout. All monetary values are rounded to
//! cents so the split invariant holds exactly.

use crate::Result;
use serde::{Deserialize, Serialize};
use zaintza_shared_types::DomainError;

/// Platform commission rate (percent) applied when a provider has none set
pub const DEFAULT_COMMISSION_RATE: f64 = 10.0;

/// Round a monetary or rating value to two decimals
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Commission split for one booking
///
/// Invariant: `provider_amount + commission_amount == total_amount`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub total_amount: f64,
    pub commission_amount: f64,
    pub provider_amount: f64,
}

impl Quote {
    /// Split a total amount at the given commission rate
    ///
    /// # Errors
    /// Returns `DomainError::Validation` for a negative total or a rate
    /// outside 0..=100.
    pub fn new(total_amount: f64, commission_rate: f64) -> Result<Self> {
        if !total_amount.is_finite() || total_amount < 0.0 {
            return Err(DomainError::Validation(format!(
                "invalid total amount: {}",
                total_amount
            )));
        }
        if !(0.0..=100.0).contains(&commission_rate) {
            return Err(DomainError::Validation(format!(
                "invalid commission rate: {}",
                commission_rate
            )));
        }

        let total = round2(total_amount);
        let commission = round2(total * commission_rate / 100.0);
        Ok(Self {
            total_amount: total,
            commission_amount: commission,
            provider_amount: round2(total - commission),
        })
    }

    /// Quote an hourly engagement: `total = rate × hours`
    pub fn for_hours(hourly_rate: f64, duration_hours: u32, commission_rate: f64) -> Result<Self> {
        Self::new(hourly_rate * duration_hours as f64, commission_rate)
    }
}
