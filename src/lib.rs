//! Streaming acquisition of ADC samples over a serial link with live
//! spectral analysis.
//!
//! Raw bytes flow one way through the pipeline: frames are decoded into
//! samples, samples land in a fixed-length sliding window, and every HOP new
//! samples the effective rate is estimated and a Hann-windowed FFT turns the
//! window into one [`pipeline::AnalysisSnapshot`] for the consumer. The
//! serial transport sits behind [`pipeline::ByteSource`], so the whole core
//! runs deterministically against in-memory byte chunks in tests.

pub mod config;
pub mod pipeline;
pub mod serial;

pub use config::AcquireConfig;
pub use pipeline::{AcquirePipeline, AnalysisSnapshot};
pub use serial::SerialSource;
