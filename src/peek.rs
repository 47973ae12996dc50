// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `peek` module provides the byte-window-provider (BWP) abstraction: bounds-checked,
//! non-blocking, non-mutating access to a possibly-partial byte source.

/// `PeekSource` is the abstract byte source a probe inspects. It is deliberately minimal: no
/// buffering policy, no mutation, no blocking. A host embeds the recognizer by implementing this
/// trait over whatever reader/cache it already maintains.
pub trait PeekSource {
    /// Return a window of exactly `length` bytes starting at `offset`.
    ///
    /// `offset` is signed: a non-negative offset counts from the start of the source; a negative
    /// offset counts from the end of the source and requires [`PeekSource::length`] to return
    /// `Some`. Returns `None` ("unavailable") if the offset is out of range, if fewer than
    /// `length` bytes are currently buffered, or if the length is known not to fit.
    ///
    /// `peek` is idempotent: two calls with identical arguments within one recognition run must
    /// return identical data. Probes may rely on this.
    fn peek(&self, offset: i64, length: usize) -> Option<&[u8]>;

    /// The total length of the source in bytes, if known. Streaming/unbounded sources return
    /// `None`; negative-offset peeks against such a source always report unavailable.
    fn length(&self) -> Option<u64>;
}

/// A straightforward in-memory [`PeekSource`] backed by a single contiguous byte slice. The
/// source's length is always known.
///
/// This is the reference implementation used by this crate's own tests; a production host
/// embedding the recognizer typically implements [`PeekSource`] over its own read-ahead buffer
/// instead, since the whole point of the abstraction is to avoid requiring the entire input to be
/// resident.
pub struct SliceSource<'a> {
    data: &'a [u8],
}

impl<'a> SliceSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        SliceSource { data }
    }

    fn resolve_offset(&self, offset: i64) -> Option<usize> {
        let len = self.data.len() as i64;
        let start = if offset < 0 { len + offset } else { offset };
        if start < 0 || start > len {
            None
        }
        else {
            Some(start as usize)
        }
    }
}

impl PeekSource for SliceSource<'_> {
    fn peek(&self, offset: i64, length: usize) -> Option<&[u8]> {
        let start = self.resolve_offset(offset)?;
        let end = start.checked_add(length)?;
        self.data.get(start..end)
    }

    fn length(&self) -> Option<u64> {
        Some(self.data.len() as u64)
    }
}

/// Wraps another [`PeekSource`] but reports only the first `available` bytes as present,
/// regardless of the wrapped source's actual length. Used by tests to exercise the
/// partially-buffered / streaming "unavailable" path without writing a second real source.
pub struct TruncatedSource<'a> {
    inner: SliceSource<'a>,
    available: usize,
    known_length: Option<u64>,
}

impl<'a> TruncatedSource<'a> {
    /// `known_length`: `None` models a streaming source whose total size is unknown (negative
    /// offsets always unavailable); `Some(n)` models a source whose size is known but not fully
    /// buffered yet.
    pub fn new(data: &'a [u8], available: usize, known_length: Option<u64>) -> Self {
        TruncatedSource { inner: SliceSource::new(data), available, known_length }
    }
}

impl PeekSource for TruncatedSource<'_> {
    fn peek(&self, offset: i64, length: usize) -> Option<&[u8]> {
        if offset < 0 && self.known_length.is_none() {
            return None;
        }
        let start = if offset < 0 {
            let len = self.known_length.unwrap() as i64;
            let start = len + offset;
            if start < 0 {
                return None;
            }
            start as usize
        }
        else {
            offset as usize
        };
        if start.checked_add(length)? > self.available {
            return None;
        }
        self.inner.peek(start as i64, length)
    }

    fn length(&self) -> Option<u64> {
        self.known_length
    }
}

/// A bounds-checked cursor over bytes obtained from a [`PeekSource`], replacing ad-hoc raw
/// pointer/length tracking (Design Notes §9). A `Cursor` owns a running absolute position and
/// re-peeks through its source on demand; it never exposes bytes beyond what the source actually
/// returned.
pub struct Cursor<'p, S: PeekSource + ?Sized + 'p> {
    source: &'p S,
    pos: i64,
}

impl<'p, S: PeekSource + ?Sized + 'p> Cursor<'p, S> {
    pub fn new(source: &'p S, start: i64) -> Self {
        Cursor { source, pos: start }
    }

    /// Current absolute position.
    pub fn pos(&self) -> i64 {
        self.pos
    }

    /// Read exactly `length` bytes at the current position and advance past them. Returns
    /// `None` (without advancing) if the bytes are unavailable.
    pub fn take(&mut self, length: usize) -> Option<&'p [u8]> {
        let bytes = self.source.peek(self.pos, length)?;
        self.pos += length as i64;
        Some(bytes)
    }

    /// Peek `length` bytes at the current position without advancing.
    pub fn peek(&self, length: usize) -> Option<&'p [u8]> {
        self.source.peek(self.pos, length)
    }

    /// Advance the cursor by `delta` bytes without reading anything.
    pub fn advance(&mut self, delta: i64) {
        self.pos += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peek_out_of_range_is_none() {
        let s = SliceSource::new(b"hello");
        assert!(s.peek(10, 1).is_none());
        assert!(s.peek(0, 10).is_none());
    }

    #[test]
    fn peek_negative_offset_counts_from_end() {
        let s = SliceSource::new(b"0123456789");
        assert_eq!(s.peek(-3, 3), Some(&b"789"[..]));
    }

    #[test]
    fn peek_is_idempotent() {
        let s = SliceSource::new(b"abcdef");
        assert_eq!(s.peek(1, 3), s.peek(1, 3));
    }

    #[test]
    fn truncated_source_reports_unavailable_past_cap() {
        let s = TruncatedSource::new(b"0123456789", 4, Some(10));
        assert_eq!(s.peek(0, 4), Some(&b"0123"[..]));
        assert!(s.peek(0, 5).is_none());
        assert!(s.peek(3, 2).is_none());
    }

    #[test]
    fn truncated_source_with_unknown_length_refuses_negative_offsets() {
        let s = TruncatedSource::new(b"0123456789", 4, None);
        assert!(s.peek(-1, 1).is_none());
        assert_eq!(s.length(), None);
    }

    #[test]
    fn truncated_source_rejects_negative_offset_past_start() {
        let s = TruncatedSource::new(b"0123456789", 4, Some(10));
        assert!(s.peek(-20, 1).is_none());
    }

    #[test]
    fn cursor_take_advances_and_fails_cleanly() {
        let s = SliceSource::new(b"abcdef");
        let mut c = Cursor::new(&s, 0);
        assert_eq!(c.take(2), Some(&b"ab"[..]));
        assert_eq!(c.pos(), 2);
        assert_eq!(c.take(4), Some(&b"cdef"[..]));
        assert!(c.take(1).is_none());
        // A failed take does not advance the cursor.
        assert_eq!(c.pos(), 6);
    }
}
