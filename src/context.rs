// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `context` module defines [`ProbeContext`], the object passed to every probe invocation.

use crate::common::{Probability, Rank};
use crate::label::Label;
use crate::peek::{Cursor, PeekSource};
use crate::sink::Sink;

/// `ProbeContext` bundles a [`PeekSource`] and a [`Sink`] for a single probe invocation, along
/// with the registration rank of the probe currently running (used to stamp suggestions for
/// [`Sink::best`] tie-breaking).
///
/// The explicit `S: 'p` bound matters when `S = dyn PeekSource`: it ties the trait object's
/// default lifetime bound to `'p` instead of `'static`, which is what lets [`crate::registry::ProbeFn`]
/// be higher-ranked over `'p` without spelling out `for<'p>` by hand.
pub struct ProbeContext<'p, S: PeekSource + ?Sized + 'p> {
    source: &'p S,
    sink: &'p mut Sink,
    rank: Rank,
}

impl<'p, S: PeekSource + ?Sized + 'p> ProbeContext<'p, S> {
    pub(crate) fn new(source: &'p S, sink: &'p mut Sink, rank: Rank) -> Self {
        ProbeContext { source, sink, rank }
    }

    /// Request a byte window; see [`PeekSource::peek`].
    pub fn peek(&self, offset: i64, length: usize) -> Option<&'p [u8]> {
        self.source.peek(offset, length)
    }

    /// The source's total length, if known; see [`PeekSource::length`].
    pub fn length(&self) -> Option<u64> {
        self.source.length()
    }

    /// A bounds-checked [`Cursor`] starting at `offset`.
    pub fn cursor(&self, offset: i64) -> Cursor<'p, S> {
        Cursor::new(self.source, offset)
    }

    /// Record a suggestion. A `probability` of `0` is silently dropped.
    pub fn suggest(&mut self, probability: Probability, label: Label) {
        self.sink.suggest_ranked(self.rank, probability, label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::RANK_PRIMARY;
    use crate::peek::SliceSource;

    #[test]
    fn suggest_is_visible_in_sink_after_context_drops() {
        let src = SliceSource::new(b"RIFFxxxxWAVE");
        let mut sink = Sink::new();
        {
            let mut ctx = ProbeContext::new(&src, &mut sink, RANK_PRIMARY);
            assert_eq!(ctx.peek(0, 4), Some(&b"RIFF"[..]));
            ctx.suggest(100, Label::new("audio/x-wav"));
        }
        assert_eq!(sink.suggestions().len(), 1);
    }
}
