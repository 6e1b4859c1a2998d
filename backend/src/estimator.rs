//! Closed-form resale price heuristic.
//!
//! `price = max(FLOOR, BASE - (REFERENCE_YEAR - year) * PER_YEAR - mileage * PER_MILE)`,
//! rounded to a whole currency unit. The reference year is a fixed policy constant,
//! not the wall-clock year.

use serde::Serialize;

use crate::models::{PricePrediction, VehicleDescription};

pub const BASE_PRICE: f64 = 25_000.0;
pub const REFERENCE_YEAR: i32 = 2024;
pub const DEPRECIATION_PER_YEAR: f64 = 2_000.0;
pub const DEPRECIATION_PER_MILE: f64 = 0.15;
pub const PRICE_FLOOR: u64 = 5_000;
pub const CONFIDENCE: f64 = 0.85;
pub const ESTIMATOR_VERSION: &str = "linear-heuristic-1";

#[derive(Debug, Clone, Copy, Default)]
pub struct PriceEstimator;

impl PriceEstimator {
    pub fn new() -> Self {
        PriceEstimator
    }

    pub fn estimate(&self, vehicle: &VehicleDescription) -> PricePrediction {
        // i64 so that any i32 year is safe to subtract.
        let age = i64::from(REFERENCE_YEAR) - i64::from(vehicle.year);
        let depreciation = age as f64 * DEPRECIATION_PER_YEAR;
        let mileage_depreciation = vehicle.mileage as f64 * DEPRECIATION_PER_MILE;

        let raw_price = BASE_PRICE - depreciation - mileage_depreciation;
        let price = raw_price.max(PRICE_FLOOR as f64).round() as u64;

        PricePrediction {
            price,
            confidence: CONFIDENCE,
            factors: vehicle.clone(),
        }
    }

    pub fn estimate_batch(&self, vehicles: &[VehicleDescription]) -> Vec<PricePrediction> {
        vehicles.iter().map(|v| self.estimate(v)).collect()
    }

    pub fn info(&self) -> EstimatorInfo {
        EstimatorInfo {
            version: ESTIMATOR_VERSION,
            base_price: BASE_PRICE,
            reference_year: REFERENCE_YEAR,
            depreciation_per_year: DEPRECIATION_PER_YEAR,
            depreciation_per_mile: DEPRECIATION_PER_MILE,
            price_floor: PRICE_FLOOR,
            confidence: CONFIDENCE,
            inputs: vec!["make", "model", "year", "mileage", "condition"],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EstimatorInfo {
    pub version: &'static str,
    pub base_price: f64,
    pub reference_year: i32,
    pub depreciation_per_year: f64,
    pub depreciation_per_mile: f64,
    pub price_floor: u64,
    pub confidence: f64,
    pub inputs: Vec<&'static str>,
}
