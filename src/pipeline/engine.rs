use log::{debug, trace};

use crate::config::AcquireConfig;
use crate::pipeline::decode::FrameDecoder;
use crate::pipeline::error::AcquireError;
use crate::pipeline::rate::RateEstimator;
use crate::pipeline::source::ByteSource;
use crate::pipeline::spectrum::{MagnitudeSpectrum, SpectrumBuilder};
use crate::pipeline::window::SampleWindow;

/// One atomic emission: the time-domain window, its spectrum, and the rate
/// estimate both were computed with. Never handed out partially built.
#[derive(Clone, Debug)]
pub struct AnalysisSnapshot {
    /// Effective sampling rate used for this cycle, in Hz.
    pub sample_rate_hz: f64,
    /// Seconds, length N. Relative to the newest sample (ending at 0) when
    /// the sender supplied timestamps, `i / fs` otherwise.
    pub time_axis: Vec<f64>,
    /// Window values oldest first, length N; volts when calibrated, raw
    /// counts otherwise.
    pub amplitudes: Vec<f64>,
    pub spectrum: MagnitudeSpectrum,
}

/// The whole acquisition core wired together: decode, window, hop scheduling,
/// rate estimation and spectral analysis.
///
/// Bytes flow strictly one way: `ingest` pushes every decoded sample into the
/// window and runs one full analysis cycle each time `hop` new samples have
/// accumulated. Emission cadence is therefore sample-count-driven and
/// self-throttles to whatever rate the transport actually delivers.
pub struct AcquirePipeline {
    decoder: FrameDecoder,
    window: SampleWindow,
    rate: RateEstimator,
    builder: SpectrumBuilder,
    hop: usize,
    since_emit: usize,
}

impl AcquirePipeline {
    pub fn new(config: &AcquireConfig) -> Result<Self, AcquireError> {
        config.validate()?;
        Ok(Self {
            decoder: FrameDecoder::new(config.framing),
            window: SampleWindow::new(config.window_len, config.calibration),
            rate: RateEstimator::new(config.fallback_hz),
            builder: SpectrumBuilder::new(config.window_len, config.remove_dc),
            hop: config.hop,
            since_emit: 0,
        })
    }

    /// Feeds one transport chunk; returns a snapshot per hop boundary crossed.
    pub fn ingest(&mut self, chunk: &[u8]) -> Vec<AnalysisSnapshot> {
        let mut out = Vec::new();
        for sample in self.decoder.feed(chunk) {
            self.window.push(sample);
            self.since_emit += 1;
            if self.since_emit >= self.hop {
                self.since_emit = 0;
                out.push(self.analyze());
            }
        }
        out
    }

    /// Runs one full analysis cycle against the current window state.
    pub fn analyze(&self) -> AnalysisSnapshot {
        let amplitudes = self.window.values();
        let timestamps = self.window.timestamps();
        let sample_rate_hz = self.rate.estimate(timestamps.as_deref());
        let spectrum = self.builder.compute(&amplitudes, sample_rate_hz);
        let time_axis = match &timestamps {
            Some(ts) => {
                let newest = ts.last().copied().unwrap_or(0.0);
                ts.iter().map(|t| t - newest).collect()
            }
            None => (0..amplitudes.len())
                .map(|i| i as f64 / sample_rate_hz)
                .collect(),
        };
        trace!(
            "cycle: fs {:.2} Hz, {} bins",
            sample_rate_hz,
            spectrum.magnitudes.len()
        );
        AnalysisSnapshot {
            sample_rate_hz,
            time_axis,
            amplitudes,
            spectrum,
        }
    }

    /// Drains the transport until it closes or `stop` returns true, handing
    /// each emitted snapshot to `on_snapshot`.
    ///
    /// Timeouts (empty chunks) are transient and keep the loop alive; IO
    /// failures propagate out untouched.
    pub fn run<S: ByteSource>(
        &mut self,
        source: &mut S,
        mut on_snapshot: impl FnMut(&AnalysisSnapshot),
        mut stop: impl FnMut() -> bool,
    ) -> Result<(), AcquireError> {
        while !stop() {
            let Some(chunk) = source.next_chunk()? else {
                debug!("transport closed");
                return Ok(());
            };
            if chunk.is_empty() {
                continue;
            }
            for snapshot in self.ingest(&chunk) {
                on_snapshot(&snapshot);
            }
        }
        Ok(())
    }
}
