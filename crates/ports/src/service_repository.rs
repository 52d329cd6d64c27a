//! Service Catalogue Repository Port

use async_trait::async_trait;
use zaintza_core::{Service, ServiceCategory};
use zaintza_shared_types::{CategoryId, DomainResult, ServiceId};

/// Catalogue persistence port (services and their categories)
#[async_trait]
pub trait ServiceRepository: Send + Sync {
    async fn save(&self, service: &Service) -> DomainResult<()>;

    async fn save_category(&self, category: &ServiceCategory) -> DomainResult<()>;

    async fn find_by_id(&self, id: &ServiceId) -> DomainResult<Option<Service>>;

    /// Active services, optionally restricted to one category
    async fn list(&self, category_id: Option<&CategoryId>) -> DomainResult<Vec<Service>>;

    /// Active categories
    async fn list_categories(&self) -> DomainResult<Vec<ServiceCategory>>;
}
