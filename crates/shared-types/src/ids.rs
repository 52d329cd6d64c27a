//! Typed identifiers for every aggregate in the system
//!
//! All ids are uuid-backed newtypes so they cannot be mixed up at call
//! sites (a `BookingId` never flows into a provider lookup).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// User identifier (clients, providers' accounts, admins)
    UserId
);
entity_id!(
    /// Provider profile identifier
    ProviderId
);
entity_id!(
    /// Service catalogue entry identifier
    ServiceId
);
entity_id!(
    /// Service category identifier
    CategoryId
);
entity_id!(
    /// City identifier
    CityId
);
entity_id!(
    /// Booking identifier (internal row id, distinct from the booking number)
    BookingId
);
entity_id!(
    /// Review identifier
    ReviewId
);
entity_id!(
    /// Payment identifier
    PaymentId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let id1 = BookingId::new();
        let id2 = BookingId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_id_display_roundtrip() {
        let id = ProviderId::new();
        let parsed = Uuid::parse_str(&id.to_string()).unwrap();
        assert_eq!(ProviderId::from_uuid(parsed), id);
    }
}
