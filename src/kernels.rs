// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Generic probe kernels (spec.md §4.3): two parameterized probe bodies that most of the registry
//! table drives instead of hand-writing a function per format.

use crate::common::{Probability, MAXIMUM};
use crate::context::ProbeContext;
use crate::label::Label;
use crate::peek::PeekSource;

/// The "starts-with" kernel: if the source begins with `pattern`, emit `(probability, label)`.
pub fn starts_with<S: PeekSource + ?Sized>(
    ctx: &mut ProbeContext<'_, S>,
    pattern: &[u8],
    probability: Probability,
    label: Label,
) {
    magic_at(ctx, 0, pattern, probability, label);
}

/// A fixed-offset sibling of [`starts_with`], for the handful of trivial magic tests that sit a
/// few bytes into the stream (e.g. the FLIC `0xAF11`/`0xAF12` word at offset 4) rather than at
/// offset 0.
pub fn magic_at<S: PeekSource + ?Sized>(
    ctx: &mut ProbeContext<'_, S>,
    offset: i64,
    pattern: &[u8],
    probability: Probability,
    label: Label,
) {
    if let Some(window) = ctx.peek(offset, pattern.len()) {
        if window == pattern {
            ctx.suggest(probability, label);
        }
    }
}

/// A generalization of the RIFF-form kernel to any 4-byte-magic, 4-byte-form-tag container
/// (`RIFF` and the IFF `FORM` family share this exact layout). `riff_form` below is the spec's
/// named instance of this with `magic = "RIFF"`.
fn container_form<S: PeekSource + ?Sized>(
    ctx: &mut ProbeContext<'_, S>,
    magic: &[u8; 4],
    form_tag: &[u8; 4],
    label: Label,
) {
    let Some(window) = ctx.peek(0, 12) else { return };
    if &window[0..4] != magic {
        return;
    }
    if &window[8..12] != form_tag {
        return;
    }
    ctx.suggest(MAXIMUM, label);
}

/// The RIFF-form kernel (spec.md §4.3): realizes WAV, AVI, CDXA, and DSMF by checking the 4-byte
/// `RIFF` tag, then the form tag at byte offset 8.
pub fn riff_form<S: PeekSource + ?Sized>(
    ctx: &mut ProbeContext<'_, S>,
    form_tag: &[u8; 4],
    label: Label,
) {
    container_form(ctx, b"RIFF", form_tag, label);
}

/// The IFF/`FORM` variant of the RIFF-form kernel, used by AIFF, AIFF-C, 8SVX, and 16SV, which
/// share RIFF's "4-byte magic, size, 4-byte form tag" layout under the `FORM` magic instead of
/// `RIFF`.
pub fn iff_form<S: PeekSource + ?Sized>(
    ctx: &mut ProbeContext<'_, S>,
    form_tag: &[u8; 4],
    label: Label,
) {
    container_form(ctx, b"FORM", form_tag, label);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::RANK_PRIMARY;
    use crate::peek::SliceSource;
    use crate::sink::Sink;

    #[test]
    fn starts_with_matches_exact_prefix() {
        let src = SliceSource::new(b"\xFF\xD8\xFFtrailing junk");
        let mut sink = Sink::new();
        let mut ctx = ProbeContext::new(&src, &mut sink, RANK_PRIMARY);
        starts_with(&mut ctx, &[0xFF, 0xD8, 0xFF], MAXIMUM, Label::new("image/jpeg"));
        assert_eq!(sink.best().unwrap().label().name(), "image/jpeg");
    }

    #[test]
    fn starts_with_rejects_mismatch() {
        let src = SliceSource::new(b"nope");
        let mut sink = Sink::new();
        let mut ctx = ProbeContext::new(&src, &mut sink, RANK_PRIMARY);
        starts_with(&mut ctx, &[0xFF, 0xD8, 0xFF], MAXIMUM, Label::new("image/jpeg"));
        assert!(sink.suggestions().is_empty());
    }

    #[test]
    fn riff_form_matches_wave() {
        let mut data = b"RIFF\x00\x00\x00\x00WAVEfmt ".to_vec();
        data.truncate(16);
        let src = SliceSource::new(&data);
        let mut sink = Sink::new();
        let mut ctx = ProbeContext::new(&src, &mut sink, RANK_PRIMARY);
        riff_form(&mut ctx, b"WAVE", Label::new("audio/x-wav"));
        assert_eq!(sink.best().unwrap().probability(), MAXIMUM);
    }

    #[test]
    fn iff_form_matches_aiff() {
        let data = b"FORM\x00\x00\x00\x00AIFFCOMM".to_vec();
        let src = SliceSource::new(&data);
        let mut sink = Sink::new();
        let mut ctx = ProbeContext::new(&src, &mut sink, RANK_PRIMARY);
        iff_form(&mut ctx, b"AIFF", Label::new("audio/x-aiff"));
        assert_eq!(sink.best().unwrap().probability(), MAXIMUM);
    }

    #[test]
    fn riff_form_rejects_wrong_tag() {
        let data = b"RIFF\x00\x00\x00\x00AVI LIST".to_vec();
        let src = SliceSource::new(&data);
        let mut sink = Sink::new();
        let mut ctx = ProbeContext::new(&src, &mut sink, RANK_PRIMARY);
        riff_form(&mut ctx, b"WAVE", Label::new("audio/x-wav"));
        assert!(sink.suggestions().is_empty());
    }
}
