use std::io::{ErrorKind, Read};
use std::time::Duration;

use anyhow::{Context, Result};
use log::info;
use serialport::SerialPort;

use crate::config::AcquireConfig;
use crate::pipeline::{AcquireError, ByteSource};

/// Bytes requested per blocking read.
const READ_CHUNK: usize = 4096;

/// Serial-port transport behind the `ByteSource` trait.
///
/// The configured timeout bounds each read; a timeout with nothing on the
/// wire surfaces as an empty chunk, any other IO failure as a fatal
/// transport error.
pub struct SerialSource {
    port: Box<dyn SerialPort>,
}

impl SerialSource {
    pub fn open(config: &AcquireConfig) -> Result<Self> {
        let port = serialport::new(&config.port, config.baud)
            .timeout(Duration::from_millis(config.read_timeout_ms))
            .open()
            .with_context(|| format!("failed to open serial port {}", config.port))?;
        info!("opened {} at {} baud", config.port, config.baud);
        Ok(Self { port })
    }
}

impl ByteSource for SerialSource {
    fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, AcquireError> {
        chunk_from_read(&mut self.port)
    }
}

/// Classifies one blocking read. Timeouts arrive as `TimedOut` errors and
/// become an empty chunk; a zero-byte `Ok` is the `Read` contract's EOF, so
/// it means the device went away and closes the source.
fn chunk_from_read(reader: &mut impl Read) -> Result<Option<Vec<u8>>, AcquireError> {
    let mut buf = vec![0u8; READ_CHUNK];
    match reader.read(&mut buf) {
        Ok(0) => Ok(None),
        Ok(n) => {
            buf.truncate(n);
            Ok(Some(buf))
        }
        Err(e) if e.kind() == ErrorKind::TimedOut => Ok(Some(Vec::new())),
        Err(e) => Err(AcquireError::Transport(e)),
    }
}
