//! City Repository Port

use async_trait::async_trait;
use zaintza_core::City;
use zaintza_shared_types::{CityId, DomainResult};

/// City persistence port
#[async_trait]
pub trait CityRepository: Send + Sync {
    async fn save(&self, city: &City) -> DomainResult<()>;

    async fn find_by_id(&self, id: &CityId) -> DomainResult<Option<City>>;

    /// Active cities (the candidate set for the nearest-city lookup)
    async fn list_active(&self) -> DomainResult<Vec<City>>;
}
