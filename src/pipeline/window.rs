use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::pipeline::decode::Sample;

/// Converts raw ADC counts to volts at window insertion.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdcCalibration {
    /// Reference voltage of the converter, in volts.
    pub vref: f64,
    /// Converter resolution in bits (10 for a stock Arduino Uno).
    pub bits: u32,
}

impl AdcCalibration {
    pub fn to_volts(&self, raw: f64) -> f64 {
        raw / ((1u64 << self.bits) - 1) as f64 * self.vref
    }
}

/// Fixed-capacity FIFO of the most recent N samples, oldest first.
///
/// The buffer is zero-prefilled, so a full-length view exists from the first
/// push; every push evicts the oldest element. A parallel timestamp buffer of
/// the same capacity advances whenever a timestamped sample arrives, and is
/// only exposed once at least one real timestamp has been seen.
pub struct SampleWindow {
    values: VecDeque<f64>,
    timestamps: VecDeque<f64>,
    have_timestamps: bool,
    calibration: Option<AdcCalibration>,
    capacity: usize,
}

impl SampleWindow {
    pub fn new(capacity: usize, calibration: Option<AdcCalibration>) -> Self {
        Self {
            values: vec![0.0; capacity].into(),
            timestamps: vec![0.0; capacity].into(),
            have_timestamps: false,
            calibration,
            capacity,
        }
    }

    /// Window length N. Constant for the lifetime of the buffer.
    pub fn len(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.capacity == 0
    }

    pub fn have_timestamps(&self) -> bool {
        self.have_timestamps
    }

    pub fn push(&mut self, sample: Sample) {
        let value = match self.calibration {
            Some(cal) => cal.to_volts(sample.value),
            None => sample.value,
        };
        self.values.pop_front();
        self.values.push_back(value);
        if let Some(t) = sample.timestamp {
            self.have_timestamps = true;
            self.timestamps.pop_front();
            self.timestamps.push_back(t);
        }
    }

    /// Contiguous oldest-first copy of the current values.
    pub fn values(&self) -> Vec<f64> {
        self.values.iter().copied().collect()
    }

    /// Oldest-first timestamps, or `None` when the sender never supplied any.
    pub fn timestamps(&self) -> Option<Vec<f64>> {
        self.have_timestamps
            .then(|| self.timestamps.iter().copied().collect())
    }
}
