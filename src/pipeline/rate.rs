/// Minimum count of usable timestamp deltas before the median is trusted.
const MIN_VALID_DELTAS: usize = 11;

/// Deltas at or above this are clock resets or gaps, not sample spacing.
const MAX_DELTA_SECS: f64 = 1.0;

/// Derives the effective sampling rate for one analysis cycle.
///
/// The median of the inter-sample deltas is robust to the jitter and the
/// occasional dropped or duplicated timestamp of a cooperative, non-real-time
/// sender. The estimate is recomputed from scratch every cycle.
#[derive(Clone, Copy, Debug)]
pub struct RateEstimator {
    fallback_hz: f64,
}

impl RateEstimator {
    pub fn new(fallback_hz: f64) -> Self {
        Self { fallback_hz }
    }

    pub fn fallback_hz(&self) -> f64 {
        self.fallback_hz
    }

    /// Returns `1 / median(deltas)` over the filtered consecutive timestamp
    /// deltas, or the fallback rate when timestamps are absent or fewer than
    /// `MIN_VALID_DELTAS` deltas survive filtering.
    pub fn estimate(&self, timestamps: Option<&[f64]>) -> f64 {
        let Some(ts) = timestamps else {
            return self.fallback_hz;
        };
        let mut deltas: Vec<f64> = ts
            .windows(2)
            .map(|w| w[1] - w[0])
            .filter(|&d| d > 0.0 && d < MAX_DELTA_SECS)
            .collect();
        if deltas.len() < MIN_VALID_DELTAS {
            return self.fallback_hz;
        }
        deltas.sort_by(|a, b| a.total_cmp(b));
        let mid = deltas.len() / 2;
        let median = if deltas.len() % 2 == 0 {
            (deltas[mid - 1] + deltas[mid]) / 2.0
        } else {
            deltas[mid]
        };
        1.0 / median
    }
}
