//! Octet buffer over a blocking byte source.
//!
//! The buffer keeps unread bytes contiguous between `offset` and `end`.
//! Whenever more data is needed the unread tail is moved to the front
//! (growing the backing vector if a single request exceeds its capacity)
//! and the source is read until the request is satisfied.
//!
//! Zero-copy captures are handed out as [`Span`]s. A span carries the
//! buffer generation it was taken in; every refill bumps the generation,
//! and resolving an older span fails with [`Error::StaleSpan`] instead of
//! silently reading overwritten bytes.

use std::io::{ErrorKind, Read};

use crate::{Error, Result};

/// Initial buffer capacity when nothing else is configured.
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Kleinste zulaessige Kapazitaet (Header + Sequenzlaenge passen immer).
const MIN_BUFFER_SIZE: usize = 8;

/// A zero-copy reference into an [`OctetBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    start: usize,
    len: usize,
    generation: u64,
}

impl Span {
    /// Number of octets covered by the span.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the span covers no octets.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Refillable octet buffer.
pub struct OctetBuffer<R> {
    /// Quelle; `None` nach `close()`.
    source: Option<R>,
    buf: Vec<u8>,
    /// Next unread octet.
    offset: usize,
    /// End of valid data.
    end: usize,
    /// Incremented whenever buffered bytes move or get overwritten.
    generation: u64,
    /// Octets consumed before the current buffer window.
    consumed: u64,
}

impl<R: Read> OctetBuffer<R> {
    /// Creates a buffer with [`DEFAULT_BUFFER_SIZE`] capacity.
    pub fn new(source: R) -> Self {
        Self::with_capacity(source, DEFAULT_BUFFER_SIZE)
    }

    /// Creates a buffer with the given initial capacity.
    pub fn with_capacity(source: R, capacity: usize) -> Self {
        Self {
            source: Some(source),
            buf: vec![0; capacity.max(MIN_BUFFER_SIZE)],
            offset: 0,
            end: 0,
            generation: 0,
            consumed: 0,
        }
    }

    /// Current capacity of the backing storage.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Number of buffered, unread octets.
    pub fn available(&self) -> usize {
        self.end - self.offset
    }

    /// Current buffer generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Absolute stream position of the next unread octet.
    pub fn position(&self) -> u64 {
        self.consumed + self.offset as u64
    }

    /// Reads and consumes one octet.
    #[inline]
    pub fn read(&mut self) -> Result<u8> {
        if self.offset == self.end {
            self.ensure(1)?;
        }
        let b = self.buf[self.offset];
        self.offset += 1;
        Ok(b)
    }

    /// Returns the next octet without consuming it.
    #[inline]
    pub fn peek(&mut self) -> Result<u8> {
        if self.offset == self.end {
            self.ensure(1)?;
        }
        Ok(self.buf[self.offset])
    }

    /// Returns the octet after the next one without consuming anything.
    pub fn peek2(&mut self) -> Result<u8> {
        self.ensure(2)?;
        Ok(self.buf[self.offset + 1])
    }

    /// Reads a 4-octet big-endian value.
    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_slice(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Consumes `n` octets and borrows them directly from the buffer.
    pub fn read_slice(&mut self, n: usize) -> Result<&[u8]> {
        self.ensure(n)?;
        let start = self.offset;
        self.offset += n;
        Ok(&self.buf[start..start + n])
    }

    /// Consumes `n` octets and returns a span over them.
    pub fn take(&mut self, n: usize) -> Result<Span> {
        self.ensure(n)?;
        let span = Span {
            start: self.offset,
            len: n,
            generation: self.generation,
        };
        self.offset += n;
        Ok(span)
    }

    /// Resolves a span taken from this buffer.
    pub fn slice(&self, span: &Span) -> Result<&[u8]> {
        if span.generation != self.generation {
            return Err(Error::StaleSpan);
        }
        Ok(&self.buf[span.start..span.start + span.len])
    }

    /// Makes sure that `n` contiguous unread octets are buffered.
    pub fn ensure(&mut self, n: usize) -> Result<()> {
        if self.end - self.offset >= n {
            return Ok(());
        }
        self.compact();
        while self.end < n {
            self.reserve(n);
            if self.fill()? == 0 {
                return Err(Error::UnexpectedEndOfInput);
            }
        }
        Ok(())
    }

    /// Buffers up to `n` octets and borrows them without consuming.
    ///
    /// Returns fewer than `n` octets only at end of data.
    pub fn peek_up_to(&mut self, n: usize) -> Result<&[u8]> {
        if self.end - self.offset < n {
            self.compact();
            while self.end < n {
                self.reserve(n);
                if self.fill()? == 0 {
                    break;
                }
            }
        }
        let len = n.min(self.end - self.offset);
        Ok(&self.buf[self.offset..self.offset + len])
    }

    /// True when nothing is buffered and the source reports end of data.
    pub fn is_exhausted(&mut self) -> Result<bool> {
        if self.offset < self.end {
            return Ok(false);
        }
        self.compact();
        Ok(self.fill()? == 0)
    }

    /// Drops the source. Later refills report end of data.
    pub fn close(&mut self) {
        self.source = None;
    }

    /// True once [`close`](Self::close) was called.
    pub fn is_closed(&self) -> bool {
        self.source.is_none()
    }

    /// Returns the source unless it was closed.
    pub fn into_inner(self) -> Option<R> {
        self.source
    }

    /// Schiebt ungelesene Bytes an den Anfang.
    fn compact(&mut self) {
        let unread = self.end - self.offset;
        if self.offset > 0 {
            self.buf.copy_within(self.offset..self.end, 0);
        }
        self.consumed += self.offset as u64;
        self.offset = 0;
        self.end = unread;
        self.generation += 1;
    }

    /// Verdoppelt den Puffer, wenn er voll ist und `n` noch nicht erreicht.
    ///
    /// Gewachsen wird nur um bereits gelieferte Daten, nie auf eine
    /// angekuendigte Laenge.
    fn reserve(&mut self, n: usize) {
        if self.end == self.buf.len() && self.buf.len() < n {
            let grown = n.min(self.buf.len().saturating_mul(2));
            self.buf.resize(grown, 0);
        }
    }

    /// One read from the source into the free tail; 0 means end of data.
    fn fill(&mut self) -> Result<usize> {
        let Some(source) = self.source.as_mut() else {
            return Ok(0);
        };
        loop {
            match source.read(&mut self.buf[self.end..]) {
                Ok(n) => {
                    self.end += n;
                    return Ok(n);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}
