//! Payment entity
//!
//! One payment per booking. There is no gateway integration: payments
//! are recorded synchronously as completed with a locally generated
//! transaction id.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zaintza_shared_types::{BookingId, PaymentId, PaymentMethod, PaymentStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub booking_id: BookingId,
    pub amount: f64,
    pub method: PaymentMethod,
    pub transaction_id: String,
    pub status: PaymentStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Payment {
    /// Record a completed payment for a booking
    pub fn completed(
        id: PaymentId,
        booking_id: BookingId,
        amount: f64,
        method: PaymentMethod,
    ) -> Self {
        Self {
            id,
            booking_id,
            amount,
            method,
            transaction_id: format!("TXN-{}", Uuid::new_v4().simple()),
            status: PaymentStatus::Paid,
            created_at: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_payment() {
        let payment =
            Payment::completed(PaymentId::new(), BookingId::new(), 2000.0, PaymentMethod::Card);
        assert_eq!(payment.status, PaymentStatus::Paid);
        assert_eq!(payment.amount, 2000.0);
        assert!(payment.transaction_id.starts_with("TXN-"));
    }

    #[test]
    fn test_transaction_ids_are_unique() {
        let a = Payment::completed(PaymentId::new(), BookingId::new(), 10.0, PaymentMethod::Cash);
        let b = Payment::completed(PaymentId::new(), BookingId::new(), 10.0, PaymentMethod::Cash);
        assert_ne!(a.transaction_id, b.transaction_id);
    }
}
