//! Text input port - line-oriented lazy decoding over a buffered device.
//!
//! Lines are delimited by an arbitrary non-empty byte-sequence terminator
//! (default: a single newline byte). Text is treated as a raw byte stream;
//! no encoding or decoding is performed beyond terminator matching.
//!
//! # Terminator matching
//!
//! The matcher is naive: each buffered byte is compared against the next
//! expected terminator byte, and any mismatch resets the running match to
//! zero without re-examining the byte. A terminator with a repeated-prefix
//! ambiguity can therefore miss overlapping occurrences (terminator `"ab"`
//! never fires on input `"aab"`, because the second `a` resets the match and
//! is not reconsidered as a fresh start). This semantics is kept
//! deliberately; see the matcher test pinning it.

use crate::buffer::InputBuffer;
use crate::error::PortError;
use crate::lazy::{Lazy, Produce};
use core::ops::Range;
use embedded_io::Read;

extern crate alloc;
use alloc::vec::Vec;

/// A buffered text port over a byte device.
///
/// Wraps a device implementing [`embedded_io::Read`] with an internal
/// [`InputBuffer`] and exposes a lazy sequence of lines through
/// [`lines`](Self::lines).
///
/// # Type Parameters
///
/// - `D`: The device type (must implement `embedded_io::Read`)
/// - `T`: The buffer storage type (`Vec<u8>` for heap, `[u8; N]` for stack)
pub struct TextPort<D, T> {
    device: D,
    buffer: InputBuffer<T>,
    terminator: Vec<u8>,
}

// Constructors for heap-backed ports
impl<D: Read> TextPort<D, Vec<u8>> {
    /// Create a text port over `device` with a heap buffer of `capacity`
    /// bytes and a single-newline terminator.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(device: D, capacity: usize) -> Self {
        Self::with_terminator(device, capacity, b"\n")
    }

    /// Create a text port with an explicit terminator byte sequence.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero or `terminator` is empty.
    pub fn with_terminator(device: D, capacity: usize, terminator: &[u8]) -> Self {
        assert!(!terminator.is_empty(), "terminator must be non-empty");
        Self {
            device,
            buffer: InputBuffer::with_capacity(capacity),
            terminator: terminator.into(),
        }
    }
}

// Constructors for stack-backed ports
impl<D: Read, const N: usize> TextPort<D, [u8; N]> {
    /// Create a text port with an `N`-byte stack buffer and a single-newline
    /// terminator.
    ///
    /// # Panics
    ///
    /// Panics if `N` is zero.
    pub fn new_stack(device: D) -> Self {
        Self::with_terminator_stack(device, b"\n")
    }

    /// Create a stack-buffered text port with an explicit terminator.
    ///
    /// # Panics
    ///
    /// Panics if `N` is zero or `terminator` is empty.
    pub fn with_terminator_stack(device: D, terminator: &[u8]) -> Self {
        assert!(!terminator.is_empty(), "terminator must be non-empty");
        Self {
            device,
            buffer: InputBuffer::new_stack(),
            terminator: terminator.into(),
        }
    }
}

// Common implementation for all storage types
impl<D: Read, T: AsRef<[u8]> + AsMut<[u8]>> TextPort<D, T> {
    /// The terminator byte sequence.
    pub fn terminator(&self) -> &[u8] {
        &self.terminator
    }

    /// Consume the port and return the device.
    ///
    /// Any buffered bytes that have not been consumed are lost.
    pub fn into_device(self) -> D {
        self.device
    }

    /// A lazy sequence of lines.
    ///
    /// Each element is the content of one line, excluding the terminator. A
    /// final line without a trailing terminator is yielded as-is; a device
    /// that ends exactly on a terminator yields no extra empty line.
    ///
    /// A line wholly inside one buffered window is lent as a zero-copy view
    /// into the buffer; a line spanning physical refills is served from an
    /// owned spill accumulator. Either way the returned slice is valid only
    /// until the next advance. The view mutably borrows the port, so no
    /// other port operation can interleave with it.
    pub fn lines(&mut self) -> Lines<'_, D, T> {
        Lines {
            seq: Lazy::new(LineProducer {
                port: self,
                spill: Vec::new(),
            }),
        }
    }
}

/// Lazy sequence of lines, returned by [`TextPort::lines`].
pub struct Lines<'p, D, T>
where
    D: Read,
    T: AsRef<[u8]> + AsMut<[u8]>,
{
    seq: Lazy<LineProducer<'p, D, T>>,
}

impl<D, T> Lines<'_, D, T>
where
    D: Read,
    T: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Whether the sequence has ended, scanning for the front line first if
    /// one is pending.
    pub fn is_empty(&mut self) -> Result<bool, PortError<D::Error>> {
        self.seq.is_empty()
    }

    /// The front line, without its terminator.
    ///
    /// Valid until the next [`advance`](Self::advance).
    ///
    /// # Panics
    ///
    /// Panics if the sequence has ended.
    pub fn front(&mut self) -> Result<&[u8], PortError<D::Error>> {
        let slot = self.seq.front()?.clone();
        let producer = self.seq.producer();
        Ok(match slot {
            LineSlot::Window(range) => producer.port.buffer.slice(range),
            LineSlot::Spill => producer.spill.as_slice(),
        })
    }

    /// Mark the front line as consumed.
    pub fn advance(&mut self) {
        self.seq.advance();
    }
}

// Where the front line's content lives.
#[derive(Clone)]
enum LineSlot {
    // Wholly inside the current buffered window; the range is in absolute
    // buffer coordinates and stays valid until the next refill.
    Window(Range<usize>),
    // Accumulated across refills; the content is the producer's spill buffer.
    Spill,
}

impl Default for LineSlot {
    fn default() -> Self {
        Self::Window(0..0)
    }
}

struct LineProducer<'p, D, T> {
    port: &'p mut TextPort<D, T>,
    // Accumulator for line content spanning physical refills. Holds whole
    // unmatched windows, including a partially-matched terminator tail; the
    // tail is truncated when the match completes and kept as literal content
    // when the device ends first.
    spill: Vec<u8>,
}

impl<D, T> Produce for LineProducer<'_, D, T>
where
    D: Read,
    T: AsRef<[u8]> + AsMut<[u8]>,
{
    type Item = LineSlot;
    type Error = PortError<D::Error>;

    fn produce(&mut self, slot: &mut LineSlot) -> Result<bool, Self::Error> {
        let TextPort {
            device,
            buffer,
            terminator,
        } = &mut *self.port;
        let term = terminator.as_slice();
        self.spill.clear();
        // Running match against the terminator, carried across refills.
        let mut matched = 0usize;

        loop {
            // Scan the current window for the rest of the terminator.
            let mut idx = 0;
            {
                let window = buffer.data();
                while idx < window.len() {
                    if window[idx] == term[matched] {
                        matched += 1;
                    } else {
                        matched = 0;
                    }
                    idx += 1;
                    if matched == term.len() {
                        break;
                    }
                }
            }

            if matched == term.len() {
                // Terminator complete; its final byte is window[idx - 1].
                let line_in_window = idx as i64 - term.len() as i64;
                if line_in_window >= 0 {
                    // Terminator lies entirely in this window.
                    let line_len = line_in_window as usize;
                    if self.spill.is_empty() {
                        let start = buffer.start();
                        *slot = LineSlot::Window(start..start + line_len);
                    } else {
                        self.spill.extend_from_slice(&buffer.data()[..line_len]);
                        *slot = LineSlot::Spill;
                    }
                } else {
                    // The terminator began in a previous window; its prefix
                    // sits at the end of the spill and is not line content.
                    let tail = (-line_in_window) as usize;
                    self.spill.truncate(self.spill.len() - tail);
                    *slot = LineSlot::Spill;
                }
                buffer.skip(idx);
                return Ok(true);
            }

            // Window exhausted without completing a match: accumulate it and
            // refill. The drain sets start = end, so the refill compacts the
            // window instead of discarding referenced bytes.
            self.spill.extend_from_slice(buffer.data());
            buffer.skip(buffer.len());
            if buffer.fill(device)? == 0 {
                // End-of-device. Accumulated content is the final line,
                // without a terminator; a clean ending yields nothing.
                if self.spill.is_empty() {
                    return Ok(false);
                }
                trace!("final line without terminator, {} bytes", self.spill.len());
                *slot = LineSlot::Spill;
                return Ok(true);
            }
        }
    }
}
