pub mod decode;
pub mod engine;
pub mod error;
pub mod rate;
pub mod source;
pub mod spectrum;
pub mod window;

pub use decode::{parse_line, FrameDecoder, FramingMode, Sample};
pub use engine::{AcquirePipeline, AnalysisSnapshot};
pub use error::AcquireError;
pub use rate::RateEstimator;
pub use source::{ByteSource, ManualSource};
pub use spectrum::{MagnitudeSpectrum, SpectrumBuilder};
pub use window::{AdcCalibration, SampleWindow};
