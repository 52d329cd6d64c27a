//! Provider aggregate root
//!
//! A care professional's public profile and commercial terms. The rating
//! fields are a running accumulator (`rating_sum`, `total_reviews`) kept
//! in step by the review aggregator; `rating` is the mean rounded to two
//! decimals for display.

use crate::pricing::{round2, DEFAULT_COMMISSION_RATE};
use crate::Result;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use zaintza_shared_types::{CityId, DomainError, ProviderId, ServiceId, UserId};

/// Provider aggregate root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    pub id: ProviderId,
    pub user_id: UserId,
    pub display_name: String,
    pub bio: Option<String>,
    pub city_id: CityId,
    pub hourly_rate: f64,
    pub commission_rate: f64,
    pub is_active: bool,
    pub is_verified: bool,
    pub rating: f64,
    pub rating_sum: u32,
    pub total_reviews: u32,
    pub total_bookings: u64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Provider {
    /// Create an active, unverified provider with the default commission rate
    ///
    /// # Errors
    /// Returns `DomainError::Validation` for an empty name or a
    /// non-positive hourly rate.
    pub fn new(
        id: ProviderId,
        user_id: UserId,
        display_name: String,
        city_id: CityId,
        hourly_rate: f64,
    ) -> Result<Self> {
        if display_name.trim().is_empty() {
            return Err(DomainError::Validation(
                "provider name must not be empty".to_string(),
            ));
        }
        if !hourly_rate.is_finite() || hourly_rate <= 0.0 {
            return Err(DomainError::Validation(format!(
                "invalid hourly rate: {}",
                hourly_rate
            )));
        }

        let now = chrono::Utc::now();
        Ok(Self {
            id,
            user_id,
            display_name,
            bio: None,
            city_id,
            hourly_rate,
            commission_rate: DEFAULT_COMMISSION_RATE,
            is_active: true,
            is_verified: false,
            rating: 0.0,
            rating_sum: 0,
            total_reviews: 0,
            total_bookings: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Override the platform commission rate for this provider
    ///
    /// # Errors
    /// Returns `DomainError::Validation` for a rate outside 0..=100
    pub fn with_commission_rate(mut self, rate: f64) -> Result<Self> {
        if !(0.0..=100.0).contains(&rate) {
            return Err(DomainError::Validation(format!(
                "invalid commission rate: {}",
                rate
            )));
        }
        self.commission_rate = rate;
        Ok(self)
    }

    pub fn activate(&mut self) {
        self.is_active = true;
        self.updated_at = chrono::Utc::now();
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = chrono::Utc::now();
    }

    pub fn verify(&mut self) {
        self.is_verified = true;
        self.updated_at = chrono::Utc::now();
    }

    /// Count one more booking against this provider
    pub fn record_booking(&mut self) {
        self.total_bookings += 1;
        self.updated_at = chrono::Utc::now();
    }

    /// Fold a new review rating into the running aggregate
    ///
    /// # Errors
    /// Returns `DomainError::Validation` for a rating outside 1..=5
    pub fn apply_review(&mut self, rating: u8) -> Result<()> {
        if !(1..=5).contains(&rating) {
            return Err(DomainError::Validation(format!(
                "rating must be between 1 and 5, got {}",
                rating
            )));
        }
        self.rating_sum += rating as u32;
        self.total_reviews += 1;
        self.rating = round2(self.rating_sum as f64 / self.total_reviews as f64);
        self.updated_at = chrono::Utc::now();
        Ok(())
    }

    /// Remove a deactivated review's rating from the running aggregate
    ///
    /// # Errors
    /// Returns `DomainError::Concurrency` if the aggregate does not contain
    /// the rating being retracted.
    pub fn retract_review(&mut self, rating: u8) -> Result<()> {
        if self.total_reviews == 0 || self.rating_sum < rating as u32 {
            return Err(DomainError::Concurrency(
                "review aggregate out of step with review set".to_string(),
            ));
        }
        self.rating_sum -= rating as u32;
        self.total_reviews -= 1;
        self.rating = if self.total_reviews == 0 {
            0.0
        } else {
            round2(self.rating_sum as f64 / self.total_reviews as f64)
        };
        self.updated_at = chrono::Utc::now();
        Ok(())
    }
}

/// A provider's price override for one catalogue service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderService {
    pub provider_id: ProviderId,
    pub service_id: ServiceId,
    pub custom_rate: Option<f64>,
    pub is_active: bool,
}

/// One weekly availability window
///
/// A provider with no availability rows accepts any schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderAvailability {
    pub provider_id: ProviderId,
    /// 0 = Monday .. 6 = Sunday
    pub weekday: u8,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl ProviderAvailability {
    /// Does a booking starting at `start` for `duration_hours` fit this window?
    ///
    /// Bookings crossing midnight never fit a single window.
    pub fn covers(&self, start: NaiveTime, duration_hours: u32) -> bool {
        let (end, wrapped) =
            start.overflowing_add_signed(chrono::Duration::hours(duration_hours as i64));
        if wrapped != 0 {
            return false;
        }
        self.start <= start && end <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> Provider {
        Provider::new(
            ProviderId::new(),
            UserId::new(),
            "Miren Etxebarria".to_string(),
            CityId::new(),
            250.0,
        )
        .unwrap()
    }

    #[test]
    fn test_new_provider_defaults() {
        let p = provider();
        assert!(p.is_active);
        assert!(!p.is_verified);
        assert_eq!(p.commission_rate, DEFAULT_COMMISSION_RATE);
        assert_eq!(p.rating, 0.0);
        assert_eq!(p.total_reviews, 0);
        assert_eq!(p.total_bookings, 0);
    }

    #[test]
    fn test_rejects_invalid_profile() {
        assert!(
            Provider::new(ProviderId::new(), UserId::new(), "  ".to_string(), CityId::new(), 250.0)
                .is_err()
        );
        assert!(
            Provider::new(ProviderId::new(), UserId::new(), "Ana".to_string(), CityId::new(), 0.0)
                .is_err()
        );
        assert!(provider().with_commission_rate(101.0).is_err());
    }

    #[test]
    fn test_record_booking_increments() {
        let mut p = provider();
        p.record_booking();
        p.record_booking();
        assert_eq!(p.total_bookings, 2);
    }

    #[test]
    fn test_review_aggregate_mean() {
        let mut p = provider();
        p.apply_review(5).unwrap();
        p.apply_review(5).unwrap();
        assert_eq!(p.rating, 5.0);
        assert_eq!(p.total_reviews, 2);

        // Third review of 4: (5 + 5 + 4) / 3 rounded to 2 decimals
        p.apply_review(4).unwrap();
        assert_eq!(p.rating, 4.67);
        assert_eq!(p.total_reviews, 3);
    }

    #[test]
    fn test_apply_review_rejects_out_of_range() {
        let mut p = provider();
        assert!(p.apply_review(0).is_err());
        assert!(p.apply_review(6).is_err());
        assert_eq!(p.total_reviews, 0);
    }

    #[test]
    fn test_retract_review() {
        let mut p = provider();
        p.apply_review(5).unwrap();
        p.apply_review(3).unwrap();
        p.retract_review(3).unwrap();
        assert_eq!(p.rating, 5.0);
        assert_eq!(p.total_reviews, 1);

        p.retract_review(5).unwrap();
        assert_eq!(p.rating, 0.0);
        assert_eq!(p.total_reviews, 0);

        assert!(p.retract_review(1).is_err());
    }

    #[test]
    fn test_availability_covers() {
        let slot = ProviderAvailability {
            provider_id: ProviderId::new(),
            weekday: 0,
            start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
        };

        assert!(slot.covers(NaiveTime::from_hms_opt(9, 0, 0).unwrap(), 4));
        assert!(slot.covers(NaiveTime::from_hms_opt(14, 0, 0).unwrap(), 4));
        assert!(!slot.covers(NaiveTime::from_hms_opt(8, 0, 0).unwrap(), 2));
        assert!(!slot.covers(NaiveTime::from_hms_opt(16, 0, 0).unwrap(), 4));
        // Crossing midnight never fits
        assert!(!slot.covers(NaiveTime::from_hms_opt(23, 0, 0).unwrap(), 2));
    }
}
