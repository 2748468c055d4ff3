//! One-ahead lazy sequence engine.
//!
//! This module contains the iteration discipline shared by the binary chunk
//! sequence and the text line sequence: a producing function is invoked at
//! most once per position, its result cached in a slot until the consumer
//! advances. The production function is injected through the [`Produce`]
//! trait so both sequence types compose the engine instead of duplicating it.

/// A production function for a lazy sequence.
///
/// `produce` writes the next element into `slot` and returns `Ok(true)`, or
/// returns `Ok(false)` to signal the end of the sequence. End-of-sequence is
/// terminal: once signalled, `produce` is never called again.
///
/// An `Err` leaves the current position un-computed; the next query of the
/// owning [`Lazy`] calls `produce` again. Whether the retry can succeed is
/// the producer's own affair.
pub trait Produce {
    /// Element type of the sequence.
    type Item;
    /// Error type surfaced by a failed production.
    type Error;

    /// Compute the next element into `slot`.
    ///
    /// Returns `Ok(false)` when the sequence has ended; `slot` is then
    /// unspecified and must not be observed.
    fn produce(&mut self, slot: &mut Self::Item) -> Result<bool, Self::Error>;
}

/// A finite, non-restartable lazy sequence over a [`Produce`] implementation.
///
/// The sequence computes one element ahead, on demand: observing the front
/// (via [`is_empty`](Self::is_empty) or [`front`](Self::front)) forces at
/// most one `produce` call; [`advance`](Self::advance) marks the cached
/// element consumed without computing its successor. A consumer that abandons
/// the sequence after `advance` therefore never pays for the element it did
/// not look at.
///
/// # Examples
///
/// ```ignore
/// let mut seq = Lazy::new(counter);
/// while !seq.is_empty()? {
///     use_item(seq.front()?);
///     seq.advance();
/// }
/// ```
pub struct Lazy<P: Produce> {
    producer: P,
    front: P::Item,
    finished: bool,
    want_next: bool,
}

impl<P: Produce> Lazy<P> {
    /// Create a new sequence with a default-initialized slot.
    pub fn new(producer: P) -> Self
    where
        P::Item: Default,
    {
        Self::with_slot(producer, P::Item::default())
    }

    /// Create a new sequence with an explicit initial slot value.
    ///
    /// The slot value is never observed before the first `produce` call; this
    /// constructor only exists for element types without a `Default`.
    pub fn with_slot(producer: P, slot: P::Item) -> Self {
        Self {
            producer,
            front: slot,
            finished: false,
            want_next: true,
        }
    }

    // Compute the pending position, if any. At most one produce call per
    // advance: a computed front clears `want_next` and is served from cache
    // until the next advance.
    fn force(&mut self) -> Result<(), P::Error> {
        if self.want_next && !self.finished {
            let more = self.producer.produce(&mut self.front)?;
            self.finished = !more;
            self.want_next = false;
        }
        Ok(())
    }

    /// Whether the sequence has ended, computing the front element first if
    /// one is pending.
    pub fn is_empty(&mut self) -> Result<bool, P::Error> {
        self.force()?;
        Ok(self.finished)
    }

    /// The cached front element, computing it first if one is pending.
    ///
    /// The reference is valid until the next [`advance`](Self::advance).
    ///
    /// # Panics
    ///
    /// Panics if the sequence has ended. Check [`is_empty`](Self::is_empty)
    /// first.
    pub fn front(&mut self) -> Result<&P::Item, P::Error> {
        self.force()?;
        assert!(!self.finished, "front() called on an exhausted sequence");
        Ok(&self.front)
    }

    /// Mark the front element as consumed.
    ///
    /// Does not compute the next element; computation is deferred to the next
    /// [`is_empty`](Self::is_empty) or [`front`](Self::front) call. Calling
    /// `advance` without having observed the front does not skip an element,
    /// and calling it past the end of the sequence is a no-op.
    pub fn advance(&mut self) {
        self.want_next = true;
    }

    /// Shared access to the producer.
    pub fn producer(&self) -> &P {
        &self.producer
    }

    /// Consume the sequence and return the producer.
    pub fn into_producer(self) -> P {
        self.producer
    }
}
