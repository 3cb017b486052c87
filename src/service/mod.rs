//! Service layer for the game ranking service
//!
//! This module contains the main application state, HTTP server wiring and
//! health checks for the production service.

pub mod app;
pub mod health;

pub use app::{AppState, ServiceError};
pub use health::{HealthCheck, HealthStatus};
