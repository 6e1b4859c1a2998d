//! Used-car resale price estimation over HTTP.
//!
//! The pricing itself lives in [`estimator`] and is a pure function of the validated
//! [`models::VehicleDescription`]; everything else is the actix-web boundary around it.

pub mod config;
pub mod error;
pub mod estimator;
pub mod models;
pub mod routes;
pub mod stats;

use config::ServerConfig;
use estimator::PriceEstimator;

/// Shared, read-only per-app state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub estimator: PriceEstimator,
    pub max_batch_size: usize,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        AppState {
            estimator: PriceEstimator::new(),
            max_batch_size: config.max_batch_size,
        }
    }
}
