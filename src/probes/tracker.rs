// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tracker module format probes (spec.md §4.4): a table of fixed-offset magic literals, each
//! identifying one tracker dialect, all sharing the `audio/x-mod` label.

use crate::common::{MAXIMUM, RANK_SECONDARY};
use crate::context::ProbeContext;
use crate::errors::Result;
use crate::label::Label;
use crate::peek::PeekSource;
use crate::registry::Registry;

struct Magic {
    offset: i64,
    bytes: &'static [u8],
}

// Offsets 60 and 71 are left out: spec.md names them as fixed-offset candidates but no
// well-known tracker magic at either exact offset could be grounded with confidence (see
// DESIGN.md), and a fabricated pattern there risks a false MAXIMUM match on unrelated data.
const MAGICS: &[Magic] = &[
    Magic { offset: 0, bytes: b"IMPM" },                    // Impulse Tracker
    Magic { offset: 0, bytes: b"Extended Module: " },       // FastTracker II (XM)
    Magic { offset: 44, bytes: b"SCRM" },                   // ScreamTracker 3 (S3M)
    Magic { offset: 1080, bytes: b"M.K." },                 // Protracker (4-channel)
    Magic { offset: 1080, bytes: b"M!K!" },                 // Protracker (>64 patterns)
    Magic { offset: 1080, bytes: b"FLT4" },                 // Startrekker (4-channel)
    Magic { offset: 1080, bytes: b"FLT8" },                 // Startrekker (8-channel)
    Magic { offset: 1080, bytes: b"8CHN" },                 // 8-channel Protracker variant
];

fn probe_mod<S: PeekSource + ?Sized>(ctx: &mut ProbeContext<'_, S>) {
    for magic in MAGICS {
        if ctx.peek(magic.offset, magic.bytes.len()) == Some(magic.bytes) {
            ctx.suggest(MAXIMUM, Label::new("audio/x-mod"));
            return;
        }
    }
}

pub fn register_all(registry: &mut Registry) -> Result<()> {
    registry.register(
        "tracker-module",
        RANK_SECONDARY,
        &["mod", "s3m", "xm", "it"],
        Label::new("audio/x-mod"),
        Box::new(|ctx| probe_mod(ctx)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peek::SliceSource;

    fn registry() -> Registry {
        let mut reg = Registry::new();
        register_all(&mut reg).unwrap();
        reg
    }

    fn at(offset: usize, bytes: &[u8], total_len: usize) -> Vec<u8> {
        let mut data = vec![0u8; total_len];
        data[offset..offset + bytes.len()].copy_from_slice(bytes);
        data
    }

    #[test]
    fn impulse_tracker_magic_at_offset_zero() {
        let data = at(0, b"IMPM", 64);
        let src = SliceSource::new(&data);
        assert!(registry().recognize(&src).iter().any(|s| s.label().name() == "audio/x-mod"));
    }

    #[test]
    fn xm_magic_at_offset_zero() {
        let data = at(0, b"Extended Module: ", 64);
        let src = SliceSource::new(&data);
        assert!(registry().recognize(&src).iter().any(|s| s.label().name() == "audio/x-mod"));
    }

    #[test]
    fn s3m_magic_at_offset_44() {
        let data = at(44, b"SCRM", 64);
        let src = SliceSource::new(&data);
        assert!(registry().recognize(&src).iter().any(|s| s.label().name() == "audio/x-mod"));
    }

    #[test]
    fn protracker_magic_at_offset_1080() {
        let data = at(1080, b"M.K.", 1090);
        let src = SliceSource::new(&data);
        assert!(registry().recognize(&src).iter().any(|s| s.label().name() == "audio/x-mod"));
    }

    #[test]
    fn no_magic_matches_nothing() {
        let data = vec![0u8; 1090];
        let src = SliceSource::new(&data);
        assert!(registry().recognize(&src).is_empty());
    }
}
