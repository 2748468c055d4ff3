//! Generic std stream device adapter
//!
//! Provides the `embedded_io` device capability set over any `std::io`
//! stream.

use embedded_io::{ErrorType, Read, Seek, SeekFrom, Write};

/// Byte device wrapper for `std::io` streams
///
/// Wraps any type implementing `std::io::{Read, Write, Seek}` and provides
/// the matching `embedded_io` traits, each capability available exactly when
/// the inner stream has it.
///
/// Transient interruption (`ErrorKind::Interrupted`) is retried internally,
/// so a port over this device never observes it; this discharges the retry
/// duty of the device contract.
///
/// This is useful for wrapping file handles, standard input, or any other
/// stream-like interface to feed a port.
///
/// # Example
///
/// ```ignore
/// use byteport::BinaryPort;
/// use byteport_platform::StdDevice;
///
/// let file = std::fs::File::open("data.bin")?;
/// let mut port = BinaryPort::new(StdDevice::new(file), 4096);
/// ```
pub struct StdDevice<T> {
    inner: T,
}

impl<T> StdDevice<T> {
    /// Create a new StdDevice wrapping the given stream.
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Get a reference to the inner stream.
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Get a mutable reference to the inner stream.
    ///
    /// Reading or seeking the inner stream directly will desynchronize any
    /// port buffering on top of this device.
    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the wrapper and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T> ErrorType for StdDevice<T> {
    type Error = std::io::Error;
}

impl<T: std::io::Read> Read for StdDevice<T> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        loop {
            match self.inner.read(buf) {
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {
                    #[cfg(feature = "logging")]
                    log::trace!("retrying interrupted read");
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl<T: std::io::Write> Write for StdDevice<T> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        loop {
            match self.inner.write(buf) {
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {
                    #[cfg(feature = "logging")]
                    log::trace!("retrying interrupted write");
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.inner.flush()
    }
}

impl<T: std::io::Seek> Seek for StdDevice<T> {
    fn seek(&mut self, pos: SeekFrom) -> Result<u64, Self::Error> {
        let std_pos = match pos {
            SeekFrom::Start(n) => std::io::SeekFrom::Start(n),
            SeekFrom::End(n) => std::io::SeekFrom::End(n),
            SeekFrom::Current(n) => std::io::SeekFrom::Current(n),
        };
        self.inner.seek(std_pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as StdWrite;

    // Fails with Interrupted a fixed number of times before each successful
    // read.
    struct InterruptingReader<'a> {
        data: &'a [u8],
        interruptions: u32,
    }

    impl std::io::Read for InterruptingReader<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.interruptions > 0 {
                self.interruptions -= 1;
                return Err(std::io::Error::new(
                    std::io::ErrorKind::Interrupted,
                    "interrupted",
                ));
            }
            let n = self.data.len().min(buf.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn read_retries_transient_interruption() {
        let mut device = StdDevice::new(InterruptingReader {
            data: b"payload",
            interruptions: 3,
        });

        let mut buf = [0u8; 7];
        let n = Read::read(&mut device, &mut buf).unwrap();
        assert_eq!(n, 7);
        assert_eq!(&buf, b"payload");
    }

    #[test]
    fn hard_errors_are_surfaced() {
        struct BrokenReader;
        impl std::io::Read for BrokenReader {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "denied",
                ))
            }
        }

        let mut device = StdDevice::new(BrokenReader);
        let mut buf = [0u8; 4];
        let err = Read::read(&mut device, &mut buf).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn file_device_reads_and_seeks() {
        let mut file = tempfile::tempfile().unwrap();
        file.write_all(b"0123456789").unwrap();

        let mut device = StdDevice::new(file);
        device.seek(SeekFrom::Start(0)).unwrap();

        let mut buf = [0u8; 4];
        let n = Read::read(&mut device, &mut buf).unwrap();
        assert_eq!(n, 4);
        assert_eq!(&buf, b"0123");

        device.seek(SeekFrom::Current(2)).unwrap();
        let n = Read::read(&mut device, &mut buf).unwrap();
        assert_eq!(n, 4);
        assert_eq!(&buf, b"6789");

        assert_eq!(device.seek(SeekFrom::End(0)).unwrap(), 10);
    }
}
