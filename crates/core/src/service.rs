//! Service catalogue entities

use crate::Result;
use serde::{Deserialize, Serialize};
use zaintza_shared_types::{CategoryId, DomainError, ServiceId};

/// Top-level service grouping (home care, medical care, child care, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceCategory {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
}

impl ServiceCategory {
    pub fn new(id: CategoryId, name: String) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(DomainError::Validation(
                "category name must not be empty".to_string(),
            ));
        }
        Ok(Self {
            id,
            name,
            description: None,
            is_active: true,
        })
    }
}

/// A bookable service within a category
///
/// `base_price` is the catalogue display price; the actual booking rate
/// comes from the provider (or their per-service override).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub category_id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub base_price: f64,
    pub is_active: bool,
}

impl Service {
    pub fn new(id: ServiceId, category_id: CategoryId, name: String, base_price: f64) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(DomainError::Validation(
                "service name must not be empty".to_string(),
            ));
        }
        if !base_price.is_finite() || base_price < 0.0 {
            return Err(DomainError::Validation(format!(
                "invalid base price: {}",
                base_price
            )));
        }
        Ok(Self {
            id,
            category_id,
            name,
            description: None,
            base_price,
            is_active: true,
        })
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
    }
}
