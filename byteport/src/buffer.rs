//! Raw input buffer.
//!
//! [`InputBuffer`] owns a fixed-capacity byte buffer and two cursors
//! delimiting the valid unread region. It knows how to refill from a device
//! and how to satisfy small relative seeks without touching the device. Ports
//! compose it with a device; it performs no I/O of its own beyond the single
//! read issued by [`fill`](InputBuffer::fill).

use crate::error::{DeviceOp, PortError};
use core::ops::Range;
use embedded_io::Read;

#[cfg(feature = "alloc")]
extern crate alloc;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// A fixed-capacity read buffer with a `[start, end)` valid-region window.
///
/// Invariant: `0 <= start <= end <= capacity`. Bytes in `[start, end)` have
/// been read from the device but not yet consumed; bytes outside it are
/// either consumed or not yet filled.
///
/// # Type Parameters
///
/// The backing storage is generic so heap and stack buffers share one
/// implementation:
/// - Heap-allocated: `InputBuffer<Vec<u8>>` (requires the `alloc` feature)
/// - Stack-allocated: `InputBuffer<[u8; N]>` for `no_std` environments
pub struct InputBuffer<T> {
    data: T,
    start: usize,
    end: usize,
}

// Constructors for heap-allocated buffers
#[cfg(feature = "alloc")]
impl InputBuffer<Vec<u8>> {
    /// Create a heap-allocated buffer with the given capacity in bytes.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "buffer capacity must be non-zero");
        Self {
            data: alloc::vec![0u8; capacity],
            start: 0,
            end: 0,
        }
    }
}

// Constructors for stack-allocated buffers
impl<const N: usize> InputBuffer<[u8; N]> {
    /// Create a stack-allocated buffer of `N` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `N` is zero.
    pub fn new_stack() -> Self {
        assert!(N > 0, "buffer capacity must be non-zero");
        Self {
            data: [0u8; N],
            start: 0,
            end: 0,
        }
    }
}

// Common implementation for all storage types
impl<T: AsRef<[u8]> + AsMut<[u8]>> InputBuffer<T> {
    /// Total buffer capacity in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.as_ref().len()
    }

    /// Number of valid unread bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the valid region is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// The valid unread region as a zero-copy view.
    ///
    /// The view is invalidated by the next [`fill`](Self::fill),
    /// [`skip`](Self::skip) or [`try_seek`](Self::try_seek).
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data.as_ref()[self.start..self.end]
    }

    /// Advance `start` past `n` consumed bytes.
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds the valid region length.
    pub fn skip(&mut self, n: usize) {
        assert!(n <= self.len(), "skip past the valid region");
        self.start += n;
    }

    /// Discard the valid region and reset both cursors.
    pub fn clear(&mut self) {
        self.start = 0;
        self.end = 0;
    }

    /// Refill from the device with a single read into trailing free space.
    ///
    /// When the valid region is already empty both cursors reset to zero
    /// first, so the whole capacity is reused. Otherwise the region is left
    /// in place and growth happens only into `[end, capacity)`; no compaction
    /// is performed.
    ///
    /// Returns the byte count the device reported. Zero is not an error: it
    /// means no data is currently available (end-of-device, or no trailing
    /// free space to read into) and the caller decides how to proceed.
    pub fn fill<D: Read>(&mut self, device: &mut D) -> Result<usize, PortError<D::Error>> {
        if self.is_empty() {
            self.start = 0;
            self.end = 0;
        }
        let free = &mut self.data.as_mut()[self.end..];
        if free.is_empty() {
            return Ok(0);
        }
        let n = device
            .read(free)
            .map_err(|e| PortError::device(DeviceOp::Read, e))?;
        self.end += n;
        trace!("refill: {} bytes, window [{}, {})", n, self.start, self.end);
        Ok(n)
    }

    /// Try to adjust the read position by `step` bytes without device I/O.
    ///
    /// Succeeds when the target stays inside the filled window `[0, end]`:
    /// within one window generation `data[0..end]` is a contiguous image of
    /// the device, so backward moves over already-consumed bytes are as free
    /// as forward moves over unread ones. Returns `false` without touching
    /// any state when the target falls outside the window; the caller must
    /// then reposition the device physically.
    pub fn try_seek(&mut self, step: i64) -> bool {
        let target = match (self.start as i64).checked_add(step) {
            Some(t) => t,
            None => return false,
        };
        if target < 0 || target > self.end as i64 {
            return false;
        }
        self.start = target as usize;
        true
    }

    // Absolute coordinates of the valid region, for sequence views that
    // record window spans across cursor movement.
    pub(crate) fn window(&self) -> Range<usize> {
        self.start..self.end
    }

    pub(crate) fn start(&self) -> usize {
        self.start
    }

    // Raw view into the backing storage by absolute coordinates. The caller
    // guarantees the range lies within the current window generation.
    pub(crate) fn slice(&self, range: Range<usize>) -> &[u8] {
        &self.data.as_ref()[range]
    }
}

#[cfg(test)]
#[cfg(feature = "alloc")]
mod tests {
    use super::*;

    // Serves scripted read lengths from a byte source, counting device calls.
    struct CountingDevice<'a> {
        data: &'a [u8],
        reads: usize,
    }

    impl embedded_io::ErrorType for CountingDevice<'_> {
        type Error = core::convert::Infallible;
    }

    impl Read for CountingDevice<'_> {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            self.reads += 1;
            let n = self.data.len().min(buf.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn fill_then_data_exposes_window() {
        let mut device: &[u8] = b"hello world";
        let mut buffer = InputBuffer::with_capacity(8);

        let n = buffer.fill(&mut device).unwrap();
        assert_eq!(n, 8);
        assert_eq!(buffer.data(), b"hello wo");
        assert_eq!(buffer.len(), 8);
    }

    #[test]
    fn skip_advances_start() {
        let mut device: &[u8] = b"abcdef";
        let mut buffer = InputBuffer::with_capacity(16);

        buffer.fill(&mut device).unwrap();
        buffer.skip(2);
        assert_eq!(buffer.data(), b"cdef");
        buffer.skip(4);
        assert!(buffer.is_empty());
    }

    #[test]
    #[should_panic(expected = "skip past the valid region")]
    fn skip_past_region_panics() {
        let mut device: &[u8] = b"ab";
        let mut buffer = InputBuffer::with_capacity(16);
        buffer.fill(&mut device).unwrap();
        buffer.skip(3);
    }

    #[test]
    fn fill_grows_into_trailing_space() {
        let mut buffer = InputBuffer::with_capacity(8);

        let mut device: &[u8] = b"abcd";
        buffer.fill(&mut device).unwrap();
        assert_eq!(buffer.data(), b"abcd");

        // Region not drained: the second fill appends after `end` without
        // moving `start`.
        let mut device: &[u8] = b"efgh";
        buffer.fill(&mut device).unwrap();
        assert_eq!(buffer.data(), b"abcdefgh");
    }

    #[test]
    fn fill_resets_cursors_when_drained() {
        let mut buffer = InputBuffer::with_capacity(4);

        let mut device: &[u8] = b"abcd";
        buffer.fill(&mut device).unwrap();
        buffer.skip(4);

        let mut device: &[u8] = b"efgh";
        let n = buffer.fill(&mut device).unwrap();
        assert_eq!(n, 4);
        assert_eq!(buffer.data(), b"efgh");
        assert_eq!(buffer.window(), 0..4);
    }

    #[test]
    fn fill_with_no_free_space_skips_device() {
        let mut buffer = InputBuffer::with_capacity(4);
        let mut first: &[u8] = b"abcd";
        buffer.fill(&mut first).unwrap();

        let mut device = CountingDevice {
            data: b"efgh",
            reads: 0,
        };
        assert_eq!(buffer.fill(&mut device).unwrap(), 0);
        assert_eq!(device.reads, 0);
    }

    #[test]
    fn zero_byte_read_is_not_an_error() {
        let mut device: &[u8] = b"";
        let mut buffer = InputBuffer::with_capacity(8);
        assert_eq!(buffer.fill(&mut device).unwrap(), 0);
        assert!(buffer.is_empty());
    }

    #[test]
    fn in_window_seek_moves_cursor_only() {
        let mut device = CountingDevice {
            data: b"0123456789",
            reads: 0,
        };
        let mut buffer = InputBuffer::with_capacity(16);
        buffer.fill(&mut device).unwrap();
        assert_eq!(device.reads, 1);

        // Forward within the window
        assert!(buffer.try_seek(4));
        assert_eq!(buffer.data(), b"456789");

        // Backward over already-consumed bytes of the same window
        assert!(buffer.try_seek(-3));
        assert_eq!(buffer.data(), b"123456789");

        // To the very end of the window (drain-all) is still in-window
        assert!(buffer.try_seek(9));
        assert!(buffer.is_empty());

        // No additional device calls for any of the above
        assert_eq!(device.reads, 1);
    }

    #[test]
    fn out_of_window_seek_is_rejected() {
        let mut device: &[u8] = b"0123456789";
        let mut buffer = InputBuffer::with_capacity(16);
        buffer.fill(&mut device).unwrap();

        buffer.skip(2);
        assert!(!buffer.try_seek(-3));
        assert!(!buffer.try_seek(9));
        assert!(!buffer.try_seek(i64::MIN));
        // Rejection leaves the cursors untouched
        assert_eq!(buffer.data(), b"23456789");
    }

    #[test]
    fn stack_buffer_shares_the_implementation() {
        let mut device: &[u8] = b"abcdef";
        let mut buffer = InputBuffer::<[u8; 4]>::new_stack();

        assert_eq!(buffer.capacity(), 4);
        buffer.fill(&mut device).unwrap();
        assert_eq!(buffer.data(), b"abcd");
    }

    #[test]
    #[should_panic(expected = "capacity must be non-zero")]
    fn zero_capacity_panics() {
        let _ = InputBuffer::with_capacity(0);
    }
}
