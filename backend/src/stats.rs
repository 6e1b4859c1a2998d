use dashmap::DashMap;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::estimator::PRICE_FLOOR;
use crate::models::PricePrediction;

static STATS: Lazy<PredictionStats> = Lazy::new(PredictionStats::new);

/// Distinct makes tracked before new ones are folded into [`OTHER_MAKES`].
pub const MAX_TRACKED_MAKES: usize = 256;
/// Longer makes are truncated before being used as a key.
pub const MAX_MAKE_KEY_CHARS: usize = 64;
pub const OTHER_MAKES: &str = "other";

/// Process-wide counters shared by every worker.
pub fn global() -> &'static PredictionStats {
    &STATS
}

pub fn get_stats() -> StatsSnapshot {
    STATS.snapshot()
}

#[derive(Debug, Default)]
pub struct PredictionStats {
    served: AtomicU64,
    rejected: AtomicU64,
    floor_hits: AtomicU64,
    price_total: AtomicU64,
    by_make: DashMap<String, u64>,
}

impl PredictionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_prediction(&self, prediction: &PricePrediction) {
        self.served.fetch_add(1, Ordering::Relaxed);
        // The closure always returns Some, so the update cannot fail.
        let _ = self
            .price_total
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |total| {
                Some(total.saturating_add(prediction.price))
            });
        if prediction.price == PRICE_FLOOR {
            self.floor_hits.fetch_add(1, Ordering::Relaxed);
        }
        self.count_make(&prediction.factors.make);
    }

    fn count_make(&self, make: &str) {
        let key: String = make.chars().take(MAX_MAKE_KEY_CHARS).collect();
        if let Some(mut count) = self.by_make.get_mut(&key) {
            *count += 1;
            return;
        }
        // Racing inserts may overshoot the cap by at most one key per concurrent caller.
        let key = if self.by_make.len() < MAX_TRACKED_MAKES {
            key
        } else {
            OTHER_MAKES.to_string()
        };
        *self.by_make.entry(key).or_insert(0) += 1;
    }

    pub fn record_rejection(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        // Counters are read independently; a snapshot taken mid-record may be off by one.
        let served = self.served.load(Ordering::Relaxed);
        let price_total = self.price_total.load(Ordering::Relaxed);
        let average_price = if served == 0 {
            0.0
        } else {
            price_total as f64 / served as f64
        };

        StatsSnapshot {
            predictions_served: served,
            requests_rejected: self.rejected.load(Ordering::Relaxed),
            floor_hits: self.floor_hits.load(Ordering::Relaxed),
            average_price,
            predictions_by_make: self
                .by_make
                .iter()
                .map(|entry| (entry.key().clone(), *entry.value()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub predictions_served: u64,
    pub requests_rejected: u64,
    pub floor_hits: u64,
    pub average_price: f64,
    pub predictions_by_make: BTreeMap<String, u64>,
}
