//! User Repository Port

use async_trait::async_trait;
use zaintza_core::User;
use zaintza_shared_types::{DomainResult, UserId};

/// User persistence port
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn save(&self, user: &User) -> DomainResult<()>;

    async fn find_by_id(&self, id: &UserId) -> DomainResult<Option<User>>;
}
