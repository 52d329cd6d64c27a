//! User entity
//!
//! Minimal account profile. Authentication and session handling live
//! outside this core; handlers receive the acting user's id.

use crate::Result;
use serde::{Deserialize, Serialize};
use zaintza_shared_types::{DomainError, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Client,
    Provider,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Provider => "provider",
            Self::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "client" => Ok(Self::Client),
            "provider" => Ok(Self::Provider),
            "admin" => Ok(Self::Admin),
            _ => Err(DomainError::Validation(format!("invalid user role: {}", s))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    pub fn new(id: UserId, full_name: String, email: String, role: UserRole) -> Result<Self> {
        if full_name.trim().is_empty() {
            return Err(DomainError::Validation(
                "user name must not be empty".to_string(),
            ));
        }
        if !email.contains('@') {
            return Err(DomainError::Validation(format!("invalid email: {}", email)));
        }
        Ok(Self {
            id,
            full_name,
            email,
            phone: None,
            role,
            is_active: true,
            created_at: chrono::Utc::now(),
        })
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
    }
}
