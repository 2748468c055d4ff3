//! Implementations of embedded_io traits for ports.
//!
//! These implementations make a [`BinaryPort`] itself usable as a device by
//! downstream embedded_io consumers: buffered reads through [`Read`], the
//! buffered window through [`BufRead`], and logical seeking through [`Seek`]
//! when the underlying device supports it.

use crate::binary::BinaryPort;
use crate::error::{DeviceOp, PortError};
use embedded_io::{BufRead, ErrorType, Read, Seek, SeekFrom};

impl<D, T> ErrorType for BinaryPort<D, T>
where
    D: Read,
    T: AsRef<[u8]> + AsMut<[u8]>,
{
    type Error = PortError<D::Error>;
}

impl<D, T> Read for BinaryPort<D, T>
where
    D: Read,
    T: AsRef<[u8]> + AsMut<[u8]>,
{
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() {
            return Ok(0);
        }

        // Serve buffered bytes first.
        if !self.buffer.is_empty() {
            let n = self.buffer.len().min(buf.len());
            buf[..n].copy_from_slice(&self.buffer.data()[..n]);
            self.buffer.skip(n);
            return Ok(n);
        }

        // Buffer is empty. A request at least as large as the buffer bypasses
        // it entirely, avoiding the double copy.
        if buf.len() >= self.buffer.capacity() {
            return self
                .device
                .read(buf)
                .map_err(|e| PortError::device(DeviceOp::Read, e));
        }

        self.buffer.fill(&mut self.device)?;
        let n = self.buffer.len().min(buf.len());
        buf[..n].copy_from_slice(&self.buffer.data()[..n]);
        self.buffer.skip(n);
        Ok(n)
    }
}

impl<D, T> BufRead for BinaryPort<D, T>
where
    D: Read,
    T: AsRef<[u8]> + AsMut<[u8]>,
{
    fn fill_buf(&mut self) -> Result<&[u8], Self::Error> {
        if self.buffer.is_empty() {
            self.buffer.fill(&mut self.device)?;
        }
        Ok(self.buffer.data())
    }

    fn consume(&mut self, amt: usize) {
        let n = amt.min(self.buffer.len());
        self.buffer.skip(n);
    }
}

impl<D, T> Seek for BinaryPort<D, T>
where
    D: Read + Seek,
    T: AsRef<[u8]> + AsMut<[u8]>,
{
    fn seek(&mut self, pos: SeekFrom) -> Result<u64, Self::Error> {
        match pos {
            SeekFrom::Current(step) => {
                self.seek_relative(step)?;
                self.position()
            }
            other => {
                // Absolute targets discard the window; the device cursor and
                // the logical position coincide afterwards.
                self.buffer.clear();
                self.device
                    .seek(other)
                    .map_err(|e| PortError::device(DeviceOp::Seek, e))
            }
        }
    }
}
