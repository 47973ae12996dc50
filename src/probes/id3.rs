// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ID3v2/v1 and APE tag probes (spec.md §4.4). These are metadata containers, not media streams
//! in their own right, but spec.md models them as ordinary probes with their own labels.

use crate::common::{RANK_PRIMARY, MAXIMUM};
use crate::context::ProbeContext;
use crate::errors::Result;
use crate::label::Label;
use crate::peek::PeekSource;
use crate::registry::Registry;

fn probe_id3<S: PeekSource + ?Sized>(ctx: &mut ProbeContext<'_, S>) {
    if let Some(header) = ctx.peek(0, 10) {
        if &header[0..3] == b"ID3" {
            // Bytes 3,4 are the major/minor version; 0xFF is reserved (sync-unsafe).
            let version_ok = header[3] != 0xFF && header[4] != 0xFF;
            // Bytes 6..10 are the synchsafe size; each byte's high bit must be clear.
            let size_ok = header[6..10].iter().all(|b| b & 0x80 == 0);

            if version_ok && size_ok {
                ctx.suggest(MAXIMUM, Label::new("application/x-id3"));
                return;
            }
        }
    }

    if ctx.peek(-128, 3) == Some(b"TAG") {
        ctx.suggest(MAXIMUM - 3, Label::new("application/x-id3"));
    }
}

fn probe_ape<S: PeekSource + ?Sized>(ctx: &mut ProbeContext<'_, S>) {
    if ctx.peek(0, 8) == Some(b"APETAGEX") {
        ctx.suggest(MAXIMUM - 1, Label::new("application/x-apetag"));
        return;
    }
    if ctx.peek(-32, 8) == Some(b"APETAGEX") {
        ctx.suggest(MAXIMUM - 2, Label::new("application/x-apetag"));
    }
}

pub fn register_all(registry: &mut Registry) -> Result<()> {
    registry.register(
        "id3",
        RANK_PRIMARY,
        &["id3"],
        Label::new("application/x-id3"),
        Box::new(|ctx| probe_id3(ctx)),
    )?;

    registry.register(
        "apetag",
        RANK_PRIMARY,
        &["ape", "apl"],
        Label::new("application/x-apetag"),
        Box::new(|ctx| probe_ape(ctx)),
    )?;

    Ok(())
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

    #[test]
    fn id3v2_header_matches() {
        let mut data = vec![b'I', b'D', b'3', 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x7F];
        data.extend_from_slice(b"non-audio-gibberish-that-is-not-an-mp3-frame");
        let src = SliceSource::new(&data);
        let suggestions = registry().recognize(&src);
        assert!(suggestions
            .iter()
            .any(|s| s.label().name() == "application/x-id3" && s.probability() == MAXIMUM));
    }

    #[test]
    fn id3v2_rejects_bad_version_byte() {
        let data = vec![b'I', b'D', b'3', 0xFF, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        let src = SliceSource::new(&data);
        let suggestions = registry().recognize(&src);
        assert!(!suggestions.iter().any(|s| s.label().name() == "application/x-id3"));
    }

    #[test]
    fn id3v1_trailer_matches_at_downgraded_probability() {
        let mut data = vec![0u8; 200];
        let tag_pos = data.len() - 128;
        data[tag_pos..tag_pos + 3].copy_from_slice(b"TAG");
        let src = SliceSource::new(&data);
        let suggestions = registry().recognize(&src);
        assert!(suggestions
            .iter()
            .any(|s| s.label().name() == "application/x-id3" && s.probability() == MAXIMUM - 3));
    }

    #[test]
    fn apetag_header_and_footer() {
        let src = SliceSource::new(b"APETAGEXmore-bytes-here");
        let suggestions = registry().recognize(&src);
        assert!(suggestions
            .iter()
            .any(|s| s.label().name() == "application/x-apetag" && s.probability() == MAXIMUM - 1));
    }
}
