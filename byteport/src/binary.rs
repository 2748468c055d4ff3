//! Binary port - exact-length, typed and chunked reads over a buffered device.

use crate::buffer::InputBuffer;
use crate::error::{DeviceOp, PortError};
use crate::lazy::{Lazy, Produce};
use core::ops::Range;
use embedded_io::{Read, Seek, SeekFrom};

#[cfg(feature = "alloc")]
extern crate alloc;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// A buffered binary port over a byte device.
///
/// Wraps a device implementing [`embedded_io::Read`] with an internal
/// [`InputBuffer`] and exposes exact-length reads that transparently span
/// buffer and device, typed fixed-size value reads with explicit endianness,
/// and a lazy sequence of buffer-sized chunks.
///
/// For devices that also implement [`embedded_io::Seek`], small relative
/// seeks whose target stays inside the buffered window are satisfied by a
/// cursor move alone, with no device I/O.
///
/// # Type Parameters
///
/// - `D`: The device type (must implement `embedded_io::Read`)
/// - `T`: The buffer storage type (`Vec<u8>` for heap, `[u8; N]` for stack)
pub struct BinaryPort<D, T> {
    pub(crate) device: D,
    pub(crate) buffer: InputBuffer<T>,
}

// Constructors for heap-backed ports
#[cfg(feature = "alloc")]
impl<D: Read> BinaryPort<D, Vec<u8>> {
    /// Create a binary port over `device` with a heap buffer of `capacity`
    /// bytes.
    ///
    /// The device is moved into the port; recover it with
    /// [`into_device`](Self::into_device).
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(device: D, capacity: usize) -> Self {
        Self {
            device,
            buffer: InputBuffer::with_capacity(capacity),
        }
    }
}

// Constructors for stack-backed ports
impl<D: Read, const N: usize> BinaryPort<D, [u8; N]> {
    /// Create a binary port over `device` with an `N`-byte stack buffer.
    ///
    /// # Panics
    ///
    /// Panics if `N` is zero.
    pub fn new_stack(device: D) -> Self {
        Self {
            device,
            buffer: InputBuffer::new_stack(),
        }
    }
}

// Common implementation for all storage types
impl<D: Read, T: AsRef<[u8]> + AsMut<[u8]>> BinaryPort<D, T> {
    /// Shared access to the device.
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Consume the port and return the device.
    ///
    /// Any buffered bytes that have not been consumed are lost; the device's
    /// physical cursor is wherever the last refill left it.
    pub fn into_device(self) -> D {
        self.device
    }

    /// Buffer capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// The currently buffered, unconsumed bytes.
    pub fn buffered(&self) -> &[u8] {
        self.buffer.data()
    }

    /// Fill `store` completely, spanning buffer and device.
    ///
    /// Buffered bytes are copied first without a device call. The remainder
    /// is read directly into `store` in a loop, bypassing the buffer, until
    /// the request is satisfied.
    ///
    /// # Errors
    ///
    /// [`PortError::UnexpectedEnd`] if the device ends before `store` is
    /// full; `store` then holds the reported number of valid bytes followed
    /// by unspecified content. This is fatal to the request and distinct
    /// from "no data yet".
    pub fn read_exact(&mut self, store: &mut [u8]) -> Result<(), PortError<D::Error>> {
        let requested = store.len();
        let buffered = self.buffer.len().min(requested);
        store[..buffered].copy_from_slice(&self.buffer.data()[..buffered]);
        self.buffer.skip(buffered);

        let mut filled = buffered;
        while filled < requested {
            let n = self
                .device
                .read(&mut store[filled..])
                .map_err(|e| PortError::device(DeviceOp::Read, e))?;
            if n == 0 {
                warn!("device ended after {} of {} bytes", filled, requested);
                return Err(PortError::UnexpectedEnd { requested, filled });
            }
            filled += n;
        }
        Ok(())
    }

    /// Read a fixed-size little-endian value.
    ///
    /// # Errors
    ///
    /// Same as [`read_exact`](Self::read_exact).
    pub fn read_le<V: FixedValue>(&mut self) -> Result<V, PortError<D::Error>> {
        let mut raw = V::Raw::default();
        self.read_exact(raw.as_mut())?;
        Ok(V::from_le(raw))
    }

    /// Read a fixed-size big-endian value.
    ///
    /// # Errors
    ///
    /// Same as [`read_exact`](Self::read_exact).
    pub fn read_be<V: FixedValue>(&mut self) -> Result<V, PortError<D::Error>> {
        let mut raw = V::Raw::default();
        self.read_exact(raw.as_mut())?;
        Ok(V::from_be(raw))
    }

    /// A lazy sequence of variable-length byte chunks.
    ///
    /// Each element is exactly whatever is resident in the buffer, with one
    /// physical refill per element once the buffer is drained. Elements are
    /// zero-copy views valid until the next advance. The sequence ends when a
    /// refill returns zero bytes.
    ///
    /// The view mutably borrows the port, so no other port operation can
    /// interleave with it.
    pub fn chunks(&mut self) -> Chunks<'_, D, T> {
        Chunks {
            seq: Lazy::with_slot(ChunkProducer { port: self }, 0..0),
        }
    }
}

// Operations available when the device can seek
impl<D: Read + Seek, T: AsRef<[u8]> + AsMut<[u8]>> BinaryPort<D, T> {
    /// Adjust the logical read position by `step` bytes.
    ///
    /// When the target stays inside the buffered window only the buffer
    /// cursor moves and no device I/O occurs. Otherwise the device is
    /// physically repositioned to the target, the buffer discarded, and one
    /// refill performed at the new position.
    pub fn seek_relative(&mut self, step: i64) -> Result<(), PortError<D::Error>> {
        if self.buffer.try_seek(step) {
            trace!("seek {}: in-window", step);
            return Ok(());
        }
        // The device's physical cursor runs ahead of the logical position by
        // the number of buffered bytes.
        let physical_step = step - self.buffer.len() as i64;
        self.device
            .seek(SeekFrom::Current(physical_step))
            .map_err(|e| PortError::device(DeviceOp::Seek, e))?;
        self.buffer.clear();
        self.buffer.fill(&mut self.device)?;
        debug!("seek {}: physical reposition", step);
        Ok(())
    }

    /// The logical read position as observed by the consumer.
    ///
    /// This is the device's physical cursor minus the number of buffered but
    /// unconsumed bytes.
    pub fn position(&mut self) -> Result<u64, PortError<D::Error>> {
        let physical = self
            .device
            .seek(SeekFrom::Current(0))
            .map_err(|e| PortError::device(DeviceOp::Position, e))?;
        Ok(physical - self.buffer.len() as u64)
    }

    /// Total device size in bytes.
    ///
    /// Realized as a seek to the end with the physical cursor restored
    /// afterwards; the buffered window stays valid.
    pub fn size(&mut self) -> Result<u64, PortError<D::Error>> {
        let saved = self
            .device
            .seek(SeekFrom::Current(0))
            .map_err(|e| PortError::device(DeviceOp::Size, e))?;
        let size = self
            .device
            .seek(SeekFrom::End(0))
            .map_err(|e| PortError::device(DeviceOp::Size, e))?;
        self.device
            .seek(SeekFrom::Start(saved))
            .map_err(|e| PortError::device(DeviceOp::Size, e))?;
        Ok(size)
    }
}

/// Lazy sequence of buffer-sized chunks, returned by
/// [`BinaryPort::chunks`].
pub struct Chunks<'p, D, T>
where
    D: Read,
    T: AsRef<[u8]> + AsMut<[u8]>,
{
    seq: Lazy<ChunkProducer<'p, D, T>>,
}

impl<D, T> Chunks<'_, D, T>
where
    D: Read,
    T: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Whether the sequence has ended, refilling the buffer first if the
    /// front chunk is pending.
    pub fn is_empty(&mut self) -> Result<bool, PortError<D::Error>> {
        self.seq.is_empty()
    }

    /// The front chunk, a zero-copy view into the port buffer.
    ///
    /// Valid until the next [`advance`](Self::advance).
    ///
    /// # Panics
    ///
    /// Panics if the sequence has ended.
    pub fn front(&mut self) -> Result<&[u8], PortError<D::Error>> {
        let window = self.seq.front()?.clone();
        Ok(self.seq.producer().port.buffer.slice(window))
    }

    /// Mark the front chunk as consumed.
    pub fn advance(&mut self) {
        self.seq.advance();
    }
}

struct ChunkProducer<'p, D, T> {
    port: &'p mut BinaryPort<D, T>,
}

impl<D, T> Produce for ChunkProducer<'_, D, T>
where
    D: Read,
    T: AsRef<[u8]> + AsMut<[u8]>,
{
    type Item = Range<usize>;
    type Error = PortError<D::Error>;

    fn produce(&mut self, slot: &mut Range<usize>) -> Result<bool, Self::Error> {
        let BinaryPort { device, buffer } = &mut *self.port;
        // The previous element was the slot's window span; it is consumed in
        // full before the next chunk is formed.
        buffer.skip(slot.len());
        if buffer.is_empty() && buffer.fill(device)? == 0 {
            *slot = 0..0;
            return Ok(false);
        }
        *slot = buffer.window();
        Ok(true)
    }
}

/// A value with a fixed-size raw byte encoding.
///
/// Implemented for the primitive integer and floating-point types. Decoding
/// performs no validation; the caller is responsible for the on-device
/// encoding actually matching, and picks the byte order explicitly through
/// [`BinaryPort::read_le`] / [`BinaryPort::read_be`].
pub trait FixedValue: Sized + Copy {
    /// Raw byte representation, sized exactly to the value.
    type Raw: AsRef<[u8]> + AsMut<[u8]> + Default;

    /// Decode from little-endian bytes.
    fn from_le(raw: Self::Raw) -> Self;
    /// Decode from big-endian bytes.
    fn from_be(raw: Self::Raw) -> Self;
}

macro_rules! fixed_value {
    ($($t:ty),* $(,)?) => {
        $(
            impl FixedValue for $t {
                type Raw = [u8; core::mem::size_of::<$t>()];

                #[inline]
                fn from_le(raw: Self::Raw) -> Self {
                    <$t>::from_le_bytes(raw)
                }

                #[inline]
                fn from_be(raw: Self::Raw) -> Self {
                    <$t>::from_be_bytes(raw)
                }
            }
        )*
    };
}

fixed_value!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128, f32, f64);
