//! HTTP transport for the product service.

mod error;
mod handlers;
mod routes;

pub use error::ApiError;
pub use handlers::AppState;
pub use routes::create_router;
