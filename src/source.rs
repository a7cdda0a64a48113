//! Single-byte-lookahead wrapper over a byte source.
//!
//! The framer needs to "peek" one byte ahead when it finds a sync candidate
//! that turns out not to be a real frame header; `push_back` lets it return
//! that byte to the stream instead of re-architecting the framer as a
//! buffer-scanner. The framer is defined over a single blocking byte
//! source, so a one-slot pushback is the minimal equivalent of a
//! chunk-buffering reader.

/// A source of bytes, finite or infinite. Mirrors `Read` in spirit but
/// yields one byte at a time so the framer can be written against any
/// `Iterator<Item = u8>`.
pub trait ByteSource {
    /// Returns the next byte, or `None` at end of stream.
    fn next_byte(&mut self) -> Option<u8>;
}

impl<I: Iterator<Item = u8>> ByteSource for I {
    fn next_byte(&mut self) -> Option<u8> {
        self.next()
    }
}

/// Wraps a [`ByteSource`] with a single-byte pushback slot.
///
/// Behaviour with more than one pending push-back is undefined (only the
/// most recent `push_back` is honoured) — exactly one slot, no more.
pub struct PushbackByteSource<S> {
    inner: S,
    pending: Option<u8>,
}

impl<S: ByteSource> PushbackByteSource<S> {
    pub fn new(inner: S) -> Self {
        Self { inner, pending: None }
    }

    /// Returns the next byte, or `None` at end of stream.
    pub fn next(&mut self) -> Option<u8> {
        self.pending.take().or_else(|| self.inner.next_byte())
    }

    /// Stores one byte to be returned by the next call to [`next`](Self::next).
    pub fn push_back(&mut self, byte: u8) {
        self.pending = Some(byte);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yields_bytes_in_order() {
        let mut src = PushbackByteSource::new([1u8, 2, 3].into_iter());
        assert_eq!(src.next(), Some(1));
        assert_eq!(src.next(), Some(2));
        assert_eq!(src.next(), Some(3));
        assert_eq!(src.next(), None);
    }

    #[test]
    fn push_back_is_returned_next() {
        let mut src = PushbackByteSource::new([1u8, 2, 3].into_iter());
        assert_eq!(src.next(), Some(1));
        src.push_back(0xFF);
        assert_eq!(src.next(), Some(0xFF));
        assert_eq!(src.next(), Some(2));
    }

    #[test]
    fn push_back_at_end_of_stream() {
        let mut src = PushbackByteSource::new(std::iter::empty::<u8>());
        assert_eq!(src.next(), None);
        src.push_back(0x42);
        assert_eq!(src.next(), Some(0x42));
        assert_eq!(src.next(), None);
    }
}
