//! Zaintza REST API
//!
//! Thin HTTP layer over the application services: request/response DTOs,
//! handlers, and the router. Errors from the domain map onto HTTP status
//! codes here and nowhere else.

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
