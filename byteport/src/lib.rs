//! Buffered binary and text ports over byte devices.
//!
//! This crate provides a small buffered-I/O layer between a raw byte-oriented
//! device and consumers that want chunked binary access or line-oriented text
//! access.
//!
//! # Architecture
//!
//! The crate is organized leaf-first:
//!
//! - **[`lazy`]**: a reusable one-ahead lazy-sequence engine. A producing
//!   function is injected through the [`lazy::Produce`] trait and is invoked
//!   at most once per position, its result cached until the consumer advances.
//! - **[`buffer`]**: [`buffer::InputBuffer`], a fixed-capacity read buffer
//!   with two cursors delimiting the valid unread region. Knows how to refill
//!   from a device and how to satisfy small relative seeks without device I/O.
//! - **[`binary`]**: [`binary::BinaryPort`], exact-length and typed reads plus
//!   a lazy sequence of buffer-sized chunks.
//! - **[`text`]**: [`text::TextPort`], a lazy sequence of lines delimited by
//!   an arbitrary byte-sequence terminator (requires `alloc`).
//!
//! Devices are anything implementing the sync [`embedded_io`] traits:
//! [`embedded_io::Read`] is required, [`embedded_io::Seek`] unlocks cheap
//! in-window seeking and position reporting.
//!
//! # Ports and sequence views
//!
//! A port owns its device and its buffer. The sequence views returned by
//! [`binary::BinaryPort::chunks`] and [`text::TextPort::lines`] mutably borrow
//! the port, so exactly one view can be active at a time and the elements they
//! lend are invalidated by the next advance. Both facts are enforced by the
//! borrow checker; no runtime borrow flags are needed.
//!
//! # Quick Start
//!
//! ```ignore
//! use byteport::text::TextPort;
//! use byteport_platform::StdDevice;
//!
//! let file = std::fs::File::open("input.txt")?;
//! let mut port = TextPort::new(StdDevice::new(file), 4096);
//!
//! let mut lines = port.lines();
//! while !lines.is_empty()? {
//!     consume(lines.front()?);
//!     lines.advance();
//! }
//! ```
//!
//! # Features
//!
//! - `std`: Use the Rust standard library
//! - `alloc`: Enable heap-backed buffers and the text port
//! - `log`: Enable logging through the `log` crate
//! - `defmt`: Enable logging through `defmt` for embedded targets

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

#[macro_use]
mod log_macros;

pub mod buffer;
pub mod error;
pub mod lazy;

pub mod binary;
#[cfg(feature = "alloc")]
pub mod text;

mod embedded_io_impl;

// Re-export commonly used types for convenience
pub use binary::{BinaryPort, Chunks, FixedValue};
pub use buffer::InputBuffer;
pub use error::{DeviceOp, PortError};
pub use lazy::{Lazy, Produce};

#[cfg(feature = "alloc")]
pub use text::{Lines, TextPort};

// Re-export embedded_io so users don't need a separate dependency
// just to implement a device.
pub use embedded_io;
