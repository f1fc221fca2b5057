use std::collections::VecDeque;

use crate::pipeline::error::AcquireError;

/// A byte-oriented transport the acquisition loop can drain.
///
/// `Ok(Some(chunk))` delivers raw bytes; an empty chunk means a read timeout
/// elapsed with nothing on the wire (transient, keep going). `Ok(None)` means
/// the transport closed cleanly. IO failures are fatal and surface as `Err`.
pub trait ByteSource {
    fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, AcquireError>;
}

/// In-memory source useful for tests and deterministic playback.
pub struct ManualSource {
    queue: VecDeque<Vec<u8>>,
}

impl ManualSource {
    pub fn new(chunks: impl IntoIterator<Item = Vec<u8>>) -> Self {
        Self {
            queue: chunks.into_iter().collect(),
        }
    }
}

impl ByteSource for ManualSource {
    fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, AcquireError> {
        Ok(self.queue.pop_front())
    }
}
