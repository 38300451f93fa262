//! HTTP API layer for the Canopy identify proxy.

pub mod enrich;
pub mod extractors;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;

pub use routes::router;
pub use state::AppState;
