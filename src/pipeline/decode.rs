use serde::{Deserialize, Serialize};

/// One decoded measurement from the transport.
///
/// `value` is the raw ADC count as sent; conversion to physical units happens
/// at window insertion, not here.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub value: f64,
    /// Acquisition time in seconds, when the sender supplied one.
    pub timestamp: Option<f64>,
}

/// How the transport frames samples on the wire. Fixed per run, never
/// auto-detected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FramingMode {
    /// Newline-terminated `"millis,adc"` or bare `"adc"` records.
    DelimitedText,
    /// Back-to-back unsigned 16-bit little-endian values, no markers.
    BinaryU16Le,
}

/// No sane text record is this long; carry-over past it without a newline is
/// dropped wholesale so a newline-free sender cannot grow the buffer forever.
const MAX_PENDING_LINE_BYTES: usize = 4096;

/// Incremental decoder for one framing mode.
///
/// Carries partial units (an unterminated line, an odd trailing byte) across
/// reads, so chunk boundaries never cost a sample. Malformed units are
/// dropped and decoding resumes at the next unit; there is no fatal decode
/// error.
pub struct FrameDecoder {
    mode: FramingMode,
    pending: Vec<u8>,
}

impl FrameDecoder {
    pub fn new(mode: FramingMode) -> Self {
        Self {
            mode,
            pending: Vec::new(),
        }
    }

    pub fn mode(&self) -> FramingMode {
        self.mode
    }

    /// Feeds one chunk of raw transport bytes, returning every sample that
    /// became complete.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<Sample> {
        self.pending.extend_from_slice(bytes);
        match self.mode {
            FramingMode::DelimitedText => self.drain_lines(),
            FramingMode::BinaryU16Le => self.drain_words(),
        }
    }

    fn drain_lines(&mut self) -> Vec<Sample> {
        let mut out = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            if let Some(sample) = parse_line(&String::from_utf8_lossy(&line)) {
                out.push(sample);
            }
        }
        if self.pending.len() > MAX_PENDING_LINE_BYTES {
            self.pending.clear();
        }
        out
    }

    fn drain_words(&mut self) -> Vec<Sample> {
        let complete = self.pending.len() / 2 * 2;
        let mut out = Vec::with_capacity(complete / 2);
        for pair in self.pending[..complete].chunks_exact(2) {
            let raw = u16::from_le_bytes([pair[0], pair[1]]);
            out.push(Sample {
                value: raw as f64,
                timestamp: None,
            });
        }
        self.pending.drain(..complete);
        out
    }
}

/// Parses one text record.
///
/// `"millis,adc"` yields a timestamped sample (`millis / 1000` seconds), a
/// bare `"adc"` an untimestamped one. Anything else (empty line, non-integer
/// field, extra fields) is discarded as `None`.
pub fn parse_line(line: &str) -> Option<Sample> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match line.split_once(',') {
        Some((millis, adc)) => {
            let t_ms: u64 = millis.trim().parse().ok()?;
            let adc: u32 = adc.trim().parse().ok()?;
            Some(Sample {
                value: adc as f64,
                timestamp: Some(t_ms as f64 / 1000.0),
            })
        }
        None => {
            let adc: u32 = line.parse().ok()?;
            Some(Sample {
                value: adc as f64,
                timestamp: None,
            })
        }
    }
}
