// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MPEG-1/2 and MPEG-4 video elementary-stream probes (spec.md §4.4).

use crate::common::{MAXIMUM, RANK_PRIMARY};
use crate::context::ProbeContext;
use crate::errors::Result;
use crate::label::Label;
use crate::peek::PeekSource;
use crate::registry::Registry;

const PICTURE_SCAN_LIMIT: i64 = 64 * 1024;
const PICTURES_FOR_HIGH_CONFIDENCE: u32 = 6;

fn start_code(window: &[u8]) -> Option<u8> {
    if window.len() >= 4 && window[0] == 0 && window[1] == 0 && window[2] == 1 {
        Some(window[3])
    }
    else {
        None
    }
}

/// Count pictures, each a `0x00` (picture_start_code) start code immediately preceded by a
/// sequence (`0xB3`) or GOP (`0xB8`) header and immediately followed by a slice start code
/// (`0x01..=0xAF`). Stops at the first code that breaks the pattern.
fn count_pictures<S: PeekSource + ?Sized>(ctx: &ProbeContext<'_, S>) -> u32 {
    let mut pos = 4i64;
    let mut pictures = 0u32;
    let mut saw_sequence_or_gop = true; // the B3 prefix that triggered this probe counts.

    while pos < PICTURE_SCAN_LIMIT {
        let Some(window) = ctx.peek(pos, 4)
        else {
            break;
        };
        let Some(code) = start_code(window)
        else {
            break;
        };

        match code {
            0xB3 | 0xB8 => {
                saw_sequence_or_gop = true;
                pos += 4;
            }
            0x00 if saw_sequence_or_gop => {
                let Some(slice_window) = ctx.peek(pos + 4, 4)
                else {
                    break;
                };
                match start_code(slice_window) {
                    Some(slice_code) if (0x01..=0xAF).contains(&slice_code) => {
                        pictures += 1;
                        pos += 8;
                    }
                    _ => break,
                }
            }
            _ => break,
        }
    }

    pictures
}

fn probe_mpeg_video<S: PeekSource + ?Sized>(ctx: &mut ProbeContext<'_, S>) {
    let Some(w) = ctx.peek(0, 4)
    else {
        return;
    };
    if !(w[0] == 0 && w[1] == 0 && w[2] == 1 && w[3] == 0xB3) {
        return;
    }

    let probability =
        if count_pictures(ctx) >= PICTURES_FOR_HIGH_CONFIDENCE { MAXIMUM - 2 } else { MAXIMUM - 1 };

    ctx.suggest(
        probability,
        Label::new("video/mpeg").with("systemstream", false).with("mpegversion", 1i64),
    );
}

fn probe_mpeg4_video<S: PeekSource + ?Sized>(ctx: &mut ProbeContext<'_, S>) {
    let Some(w) = ctx.peek(0, 8)
    else {
        return;
    };
    let prefix_ok = w[0] == 0
        && w[1] == 0
        && w[2] == 1
        && w[3] == 0x00
        && w[4] == 0
        && w[5] == 0
        && w[6] == 1
        && (0x20..=0x2F).contains(&w[7]);

    if prefix_ok {
        ctx.suggest(MAXIMUM - 1, Label::new("video/mpeg").with("mpegversion", 4i64));
    }
}

pub fn register_all(registry: &mut Registry) -> Result<()> {
    registry.register(
        "mpeg-video",
        RANK_PRIMARY,
        &["m1v", "m2v", "mpv"],
        Label::new("video/mpeg").with("systemstream", false).with("mpegversion", 1i64),
        Box::new(|ctx| probe_mpeg_video(ctx)),
    )?;

    registry.register(
        "mpeg4-video",
        RANK_PRIMARY,
        &["m4v"],
        Label::new("video/mpeg").with("mpegversion", 4i64),
        Box::new(|ctx| probe_mpeg4_video(ctx)),
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
    fn bare_sequence_header_matches_at_maximum_minus_one() {
        let data = vec![0x00, 0x00, 0x01, 0xB3, 0x00, 0x00, 0x00, 0x00];
        let src = SliceSource::new(&data);
        let suggestions = registry().recognize(&src);
        assert!(suggestions
            .iter()
            .any(|s| s.label().name() == "video/mpeg" && s.probability() == MAXIMUM - 1));
    }

    #[test]
    fn six_pictures_raises_to_maximum_minus_two() {
        let mut data = vec![0x00, 0x00, 0x01, 0xB3];
        for _ in 0..6 {
            // picture_start_code (0x00) followed immediately by a slice start code (0x01).
            data.extend_from_slice(&[0x00, 0x00, 0x01, 0x00]);
            data.extend_from_slice(&[0x00, 0x00, 0x01, 0x01]);
        }
        let src = SliceSource::new(&data);
        let suggestions = registry().recognize(&src);
        let best = suggestions.iter().find(|s| s.label().name() == "video/mpeg").unwrap();
        assert_eq!(best.probability(), MAXIMUM - 2);
    }

    #[test]
    fn mpeg4_video_prefix_matches() {
        let data = vec![0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x25];
        let src = SliceSource::new(&data);
        let suggestions = registry().recognize(&src);
        assert!(suggestions
            .iter()
            .any(|s| s.label().name() == "video/mpeg" && s.probability() == MAXIMUM - 1));
    }

    #[test]
    fn unrelated_prefix_does_not_match() {
        let data = vec![0x00, 0x00, 0x01, 0xAA, 0, 0, 0, 0];
        let src = SliceSource::new(&data);
        assert!(registry().recognize(&src).is_empty());
    }
}
