//! HTTP API handlers for catalog-api

pub mod composers;
pub mod extract;
pub mod health;

pub use composers::composer_routes;
pub use health::health_routes;
