use thiserror::Error;

#[derive(Debug, Error)]
pub enum AcquireError {
    #[error("window length must be a power of two of at least 2, got {0}")]
    InvalidWindowLen(usize),
    #[error("hop size must be between 1 and the window length, got {hop} for window {window}")]
    InvalidHop { hop: usize, window: usize },
    #[error("fallback sample rate must be greater than zero")]
    InvalidFallbackRate,
    #[error("ADC calibration invalid: vref {vref} V at {bits} bits")]
    InvalidCalibration { vref: f64, bits: u32 },
    #[error("serial transport failure: {0}")]
    Transport(#[from] std::io::Error),
}
