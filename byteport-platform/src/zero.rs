//! Unbounded zero source.

use embedded_io::{ErrorType, Read};

/// A device that fills every read with zero bytes and reports the full
/// requested length.
///
/// Never reaches end-of-device. Useful for exercising buffer mechanics and
/// for throughput measurements where the data content is irrelevant.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZeroDevice;

impl ZeroDevice {
    /// Create a zero source.
    pub fn new() -> Self {
        Self
    }
}

impl ErrorType for ZeroDevice {
    type Error = core::convert::Infallible;
}

impl Read for ZeroDevice {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        buf.fill(0);
        Ok(buf.len())
    }
}
