//! Provider Repository Port

use async_trait::async_trait;
use zaintza_core::{Provider, ProviderAvailability};
use zaintza_shared_types::{CityId, DomainResult, ProviderId, ServiceId};

/// Search filter for provider browsing
#[derive(Debug, Clone, Default)]
pub struct ProviderFilter {
    pub city_id: Option<CityId>,
    pub service_id: Option<ServiceId>,
    pub verified_only: bool,
}

/// Provider persistence port
///
/// The counter mutations (`increment_total_bookings`, the review
/// aggregate) are separate operations so adapters can make them atomic
/// single-statement updates.
#[async_trait]
pub trait ProviderRepository: Send + Sync {
    async fn save(&self, provider: &Provider) -> DomainResult<()>;

    async fn find_by_id(&self, id: &ProviderId) -> DomainResult<Option<Provider>>;

    /// Active providers matching the filter
    async fn search(&self, filter: &ProviderFilter) -> DomainResult<Vec<Provider>>;

    /// Count one more booking against the provider, atomically
    async fn increment_total_bookings(&self, id: &ProviderId) -> DomainResult<()>;

    /// Fold a review rating into the provider's running aggregate,
    /// atomically (rating sum, review count, and displayed mean move
    /// together)
    async fn apply_review_rating(&self, id: &ProviderId, rating: u8) -> DomainResult<()>;

    /// Remove a deactivated review's rating from the aggregate, atomically
    async fn retract_review_rating(&self, id: &ProviderId, rating: u8) -> DomainResult<()>;

    /// The provider's weekly availability windows (empty = always bookable)
    async fn list_availability(&self, id: &ProviderId) -> DomainResult<Vec<ProviderAvailability>>;

    /// The provider's custom rate for a service, if they set one
    async fn custom_rate_for(
        &self,
        id: &ProviderId,
        service_id: &ServiceId,
    ) -> DomainResult<Option<f64>>;
}
