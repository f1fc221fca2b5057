use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use log::info;

use serialscope::config::AcquireConfig;
use serialscope::pipeline::{AcquirePipeline, AnalysisSnapshot, FramingMode};
use serialscope::serial::SerialSource;

#[derive(Parser, Debug)]
#[command(name = "serialscope")]
#[command(about = "Live spectrum analysis of ADC samples from a serial port", long_about = None)]
struct Args {
    /// JSON config file; command-line flags override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Serial port path, e.g. /dev/ttyACM0
    #[arg(short, long)]
    port: Option<String>,

    /// Baud rate
    #[arg(short, long)]
    baud: Option<u32>,

    /// Framing: text ("millis,adc" lines) or binary (u16 LE stream)
    #[arg(long, value_name = "MODE")]
    framing: Option<String>,

    /// Samples per analysis window (power of two)
    #[arg(short = 'n', long, value_name = "N")]
    window: Option<usize>,

    /// New samples between successive spectra
    #[arg(long, value_name = "HOP")]
    hop: Option<usize>,

    /// Sampling rate assumed when no timestamps arrive
    #[arg(long, value_name = "HZ")]
    fallback_hz: Option<f64>,

    /// Subtract the window mean before the FFT
    #[arg(long, value_name = "BOOL")]
    remove_dc: Option<bool>,
}

impl Args {
    fn parse_framing(&self) -> Result<Option<FramingMode>> {
        match self.framing.as_deref() {
            None => Ok(None),
            Some("text") => Ok(Some(FramingMode::DelimitedText)),
            Some("binary") => Ok(Some(FramingMode::BinaryU16Le)),
            Some(other) => bail!("unknown framing mode {other:?} (expected text or binary)"),
        }
    }

    fn build_config(&self) -> Result<AcquireConfig> {
        let framing = self.parse_framing()?;
        let mut config = match &self.config {
            Some(path) => AcquireConfig::from_json_file(path)?,
            None => match framing {
                Some(FramingMode::BinaryU16Le) => AcquireConfig::binary_defaults(),
                _ => AcquireConfig::default(),
            },
        };
        if let Some(framing) = framing {
            config.framing = framing;
        }
        if let Some(port) = &self.port {
            config.port = port.clone();
        }
        if let Some(baud) = self.baud {
            config.baud = baud;
        }
        if let Some(window) = self.window {
            config.window_len = window;
        }
        if let Some(hop) = self.hop {
            config.hop = hop;
        }
        if let Some(fallback_hz) = self.fallback_hz {
            config.fallback_hz = fallback_hz;
        }
        if let Some(remove_dc) = self.remove_dc {
            config.remove_dc = remove_dc;
        }
        config.validate()?;
        Ok(config)
    }
}

fn report(snapshot: &AnalysisSnapshot) {
    let (peak_hz, peak_mag) = snapshot.spectrum.peak();
    let (lo, hi) = snapshot
        .amplitudes
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    info!(
        "fs {:7.1} Hz | peak {:7.1} Hz @ {:.4} | window [{:+.4}, {:+.4}]",
        snapshot.sample_rate_hz, peak_hz, peak_mag, lo, hi
    );
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = args.build_config()?;
    info!(
        "acquiring {:?} frames, N={} HOP={}",
        config.framing, config.window_len, config.hop
    );

    let mut source = SerialSource::open(&config)?;
    let mut pipeline = AcquirePipeline::new(&config)?;
    pipeline.run(&mut source, report, || false)?;
    info!("transport closed, exiting");
    Ok(())
}
