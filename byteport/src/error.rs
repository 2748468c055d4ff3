//! Port-level errors.
//!
//! Device errors are surfaced unmodified, tagged with the operation that
//! failed. Transient interruption never reaches this layer; devices retry it
//! internally (see the device contract in the crate docs).

use core::fmt;

/// The device operation a port was performing when the device failed.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceOp {
    /// A read into the buffer or directly into caller storage.
    Read,
    /// A write from caller storage.
    Write,
    /// A physical reposition of the device cursor.
    Seek,
    /// A query of the device cursor position.
    Position,
    /// A query of the device size.
    Size,
}

impl DeviceOp {
    fn name(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Seek => "seek",
            Self::Position => "position",
            Self::Size => "size",
        }
    }
}

impl fmt::Display for DeviceOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unified error type for port operations.
#[derive(Debug)]
pub enum PortError<E> {
    /// The device failed while servicing the named operation.
    Device {
        /// The operation the port was performing.
        op: DeviceOp,
        /// The device's own error.
        source: E,
    },
    /// The device ended before an exact-length read was satisfied.
    ///
    /// Distinct from "no data currently available": the request can never
    /// complete, and `store` holds only `filled` valid bytes.
    UnexpectedEnd {
        /// Total number of bytes the caller asked for.
        requested: usize,
        /// Number of bytes actually copied before the device ended.
        filled: usize,
    },
}

impl<E> PortError<E> {
    pub(crate) fn device(op: DeviceOp, source: E) -> Self {
        Self::Device { op, source }
    }
}

impl<E: fmt::Display> fmt::Display for PortError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Device { op, source } => write!(f, "Device {} failed: {}", op, source),
            Self::UnexpectedEnd { requested, filled } => write!(
                f,
                "Device ended after {} of {} requested bytes",
                filled, requested
            ),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> core::error::Error for PortError<E> {}

// Implement embedded_io::Error so port errors flow through downstream
// embedded_io consumers unchanged.
impl<E: embedded_io::Error> embedded_io::Error for PortError<E> {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            Self::Device { source, .. } => source.kind(),
            Self::UnexpectedEnd { .. } => embedded_io::ErrorKind::InvalidData,
        }
    }
}
