//! HTTP surface of the game ranking service
//!
//! Exposes the ranking operations as JSON endpoints next to the health and
//! metrics endpoints. Not-found maps to 404, invalid arguments to 400 and
//! storage failures to 500.

pub mod error;
pub mod routes;

pub use routes::{create_router, ApiState};
