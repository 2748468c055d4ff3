//! Byte device implementations for hosted targets.
//!
//! This crate provides concrete devices for the `byteport` ports:
//!
//! - [`StdDevice`]: wraps any `std::io` stream and adapts it to the
//!   `embedded_io` capability set, retrying transparently on transient
//!   interruption so ports never observe it.
//! - [`MemDevice`]: a growable in-memory read/write/seek device.
//! - [`ZeroDevice`]: an unbounded source of zero bytes, for tests and
//!   measurements.
//!
//! Devices on embedded targets implement the `embedded_io` traits directly
//! and need nothing from this crate.

#![warn(missing_docs)]

mod mem;
mod stream;
mod zero;

pub use mem::{MemDevice, MemDeviceError};
pub use stream::StdDevice;
pub use zero::ZeroDevice;

// Re-export embedded_io so users don't need a separate dependency
// just to name the device traits.
pub use embedded_io;
