use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::pipeline::{AcquireError, AdcCalibration, FramingMode};

/// Everything the acquisition loop needs to know, loadable from a JSON file.
///
/// Unspecified fields take the defaults below, which mirror a stock Arduino
/// Uno sending `millis,adc` lines over USB.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquireConfig {
    /// Serial port path, e.g. `/dev/ttyACM0`.
    pub port: String,
    pub baud: u32,
    /// Upper bound on one blocking serial read.
    pub read_timeout_ms: u64,
    pub framing: FramingMode,
    /// Samples per analysis window (N). Power of two.
    pub window_len: usize,
    /// New samples between successive spectra (HOP).
    pub hop: usize,
    /// Sampling rate assumed when the sender supplies no usable timestamps.
    pub fallback_hz: f64,
    /// Count-to-volts conversion; `None` keeps raw counts.
    pub calibration: Option<AdcCalibration>,
    /// Subtract the window mean before the FFT.
    pub remove_dc: bool,
}

impl Default for AcquireConfig {
    fn default() -> Self {
        Self {
            port: "/dev/ttyACM0".to_string(),
            baud: 115_200,
            read_timeout_ms: 1000,
            framing: FramingMode::DelimitedText,
            window_len: 2048,
            hop: 128,
            fallback_hz: 1000.0,
            calibration: Some(AdcCalibration {
                vref: 5.0,
                bits: 10,
            }),
            remove_dc: false,
        }
    }
}

impl AcquireConfig {
    /// Defaults for a raw-count u16 stream: no volt scaling, and the mean
    /// subtracted so the count offset does not bury the spectrum.
    pub fn binary_defaults() -> Self {
        Self {
            baud: 230_400,
            framing: FramingMode::BinaryU16Le,
            calibration: None,
            remove_dc: true,
            ..Self::default()
        }
    }

    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AcquireError> {
        if self.window_len < 2 || !self.window_len.is_power_of_two() {
            return Err(AcquireError::InvalidWindowLen(self.window_len));
        }
        if self.hop == 0 || self.hop > self.window_len {
            return Err(AcquireError::InvalidHop {
                hop: self.hop,
                window: self.window_len,
            });
        }
        if !(self.fallback_hz > 0.0) {
            return Err(AcquireError::InvalidFallbackRate);
        }
        if let Some(cal) = self.calibration {
            if cal.bits == 0 || cal.bits > 32 || !(cal.vref > 0.0) {
                return Err(AcquireError::InvalidCalibration {
                    vref: cal.vref,
                    bits: cal.bits,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        AcquireConfig::default().validate().unwrap();
        AcquireConfig::binary_defaults().validate().unwrap();
    }

    #[test]
    fn rejects_non_power_of_two_windows() {
        let config = AcquireConfig {
            window_len: 1000,
            ..AcquireConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AcquireError::InvalidWindowLen(1000))
        ));
    }

    #[test]
    fn rejects_hop_larger_than_window() {
        let config = AcquireConfig {
            window_len: 256,
            hop: 512,
            ..AcquireConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AcquireError::InvalidHop { hop: 512, window: 256 })
        ));
    }

    #[test]
    fn parses_a_partial_json_config() {
        let config: AcquireConfig = serde_json::from_str(
            r#"{"port": "/dev/ttyUSB0", "framing": "binary_u16_le", "hop": 256}"#,
        )
        .unwrap();
        assert_eq!(config.port, "/dev/ttyUSB0");
        assert_eq!(config.framing, FramingMode::BinaryU16Le);
        assert_eq!(config.hop, 256);
        // Untouched fields keep their defaults.
        assert_eq!(config.window_len, 2048);
        assert_eq!(config.baud, 115_200);
    }
}
