//! End-to-end scenarios: raw transport bytes in, analysis snapshots out.

use serialscope::config::AcquireConfig;
use serialscope::pipeline::{
    AcquirePipeline, AdcCalibration, AnalysisSnapshot, FramingMode, ManualSource,
};

/// Runs a pipeline to completion over in-memory chunks, collecting every
/// emitted snapshot.
fn acquire(config: &AcquireConfig, chunks: Vec<Vec<u8>>) -> Vec<AnalysisSnapshot> {
    let mut pipeline = AcquirePipeline::new(config).expect("config should validate");
    let mut source = ManualSource::new(chunks);
    let mut snapshots = Vec::new();
    pipeline
        .run(&mut source, |s| snapshots.push(s.clone()), || false)
        .expect("in-memory acquisition should not fail");
    snapshots
}

/// Constant ADC value 512 at 1 ms spacing: the Arduino text deployment from
/// the field. Rate must come out near 1 kHz, the window must sit at the
/// converted voltage, and the spectrum must concentrate at DC.
#[test]
fn timestamped_text_stream_recovers_rate_and_dc_level() {
    let config = AcquireConfig {
        framing: FramingMode::DelimitedText,
        window_len: 1024,
        hop: 128,
        fallback_hz: 500.0,
        calibration: Some(AdcCalibration {
            vref: 5.0,
            bits: 10,
        }),
        remove_dc: false,
        ..AcquireConfig::default()
    };

    // 1100 lines, millis 1000..2100, split into uneven chunks so frames
    // straddle read boundaries.
    let mut bytes = Vec::new();
    for millis in 1000..2100u64 {
        bytes.extend_from_slice(format!("{millis},512\n").as_bytes());
    }
    let chunks: Vec<Vec<u8>> = bytes.chunks(337).map(|c| c.to_vec()).collect();

    let snapshots = acquire(&config, chunks);
    // 1100 samples, one snapshot per 128.
    assert_eq!(snapshots.len(), 1100 / 128);

    // The 8th snapshot lands exactly when the window first holds 1024 real
    // samples (8 * 128 = 1024).
    let snap = &snapshots[7];
    let volts = 512.0 / 1023.0 * 5.0;

    assert!(
        (snap.sample_rate_hz - 1000.0).abs() < 1.0,
        "rate estimate {}",
        snap.sample_rate_hz
    );
    assert_eq!(snap.amplitudes.len(), 1024);
    for &v in &snap.amplitudes {
        assert!((v - volts).abs() < 1e-9, "amplitude {v}");
    }

    // Relative time axis: newest sample at 0, oldest ~1.023 s earlier.
    assert_eq!(*snap.time_axis.last().unwrap(), 0.0);
    assert!((snap.time_axis[0] + 1.023).abs() < 1e-6);

    // All spectral energy at DC, reading the true level without doubling.
    assert!((snap.spectrum.magnitudes[0] - volts).abs() < 1e-6);
    for (k, &mag) in snap.spectrum.magnitudes.iter().enumerate().skip(2) {
        assert!(mag < 0.05 * volts, "bin {k} holds {mag}");
    }
}

/// Alternating 0/1023 counts in binary framing toggle at half the sampling
/// rate: with DC removed, the spectrum must peak at Nyquist.
#[test]
fn binary_stream_shows_nyquist_peak_after_dc_removal() {
    let config = AcquireConfig {
        window_len: 2048,
        hop: 256,
        ..AcquireConfig::binary_defaults()
    };

    // 0x0000, 0x03ff, 0x0000, ... enough to fill the window twice over.
    let mut bytes = Vec::new();
    for i in 0..4096u32 {
        let value: u16 = if i % 2 == 0 { 0 } else { 1023 };
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    let chunks: Vec<Vec<u8>> = bytes.chunks(4096).map(|c| c.to_vec()).collect();

    let snapshots = acquire(&config, chunks);
    assert_eq!(snapshots.len(), 4096 / 256);

    let snap = snapshots.last().unwrap();
    // No timestamps in binary framing, so the fallback applies.
    assert_eq!(snap.sample_rate_hz, 1000.0);

    let (peak_hz, peak_mag) = snap.spectrum.peak();
    assert_eq!(peak_hz, 500.0, "peak should sit at fs/2");
    // A full-scale square alternation reads its peak-to-peak swing at
    // Nyquist (the one-sided doubling is not halved there).
    assert!((peak_mag - 1023.0).abs() < 1.0, "peak magnitude {peak_mag}");
    // DC is gone (a symmetric Hann leaves a sub-percent residue).
    assert!(snap.spectrum.magnitudes[0] < 0.01);
}

/// Timeout chunks and garbled lines must neither kill the loop nor skew the
/// sample alignment.
#[test]
fn recovers_from_timeouts_and_garbage() {
    let config = AcquireConfig {
        framing: FramingMode::DelimitedText,
        window_len: 64,
        hop: 64,
        calibration: None,
        ..AcquireConfig::default()
    };

    let mut chunks = Vec::new();
    chunks.push(b"not a sample\n".to_vec());
    chunks.push(Vec::new()); // read timeout
    for i in 0..64u32 {
        chunks.push(format!("{}\n", i % 8).into_bytes());
        if i % 16 == 0 {
            chunks.push(vec![0xff, 0xfe, b'\n']); // line noise
        }
    }

    let snapshots = acquire(&config, chunks);
    assert_eq!(snapshots.len(), 1);
    let snap = &snapshots[0];
    assert_eq!(snap.amplitudes.len(), 64);
    // Only the 64 valid samples made it in, in arrival order.
    for (i, &v) in snap.amplitudes.iter().enumerate() {
        assert_eq!(v, (i % 8) as f64);
    }
}
