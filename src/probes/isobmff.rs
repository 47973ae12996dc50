// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! QuickTime / ISO-BMFF box-chain probes (spec.md §4.4), plus the 3GPP and M4A brand checks layered
//! on top of the same `ftyp` box. Box-chain walking is grounded in `symphonia-format-isomp4`'s
//! `ftyp`/score pattern, generalized from "parse a specific box" to "is this plausibly a box chain".

use crate::common::{LIKELY, MAXIMUM, NEARLY_CERTAIN, RANK_PRIMARY, RANK_SECONDARY};
use crate::context::ProbeContext;
use crate::errors::Result;
use crate::label::Label;
use crate::peek::PeekSource;
use crate::registry::Registry;

const COMMON_BOXES: &[&[u8; 4]] = &[b"moov", b"mdat", b"ftyp", b"free", b"skip"];
const QUICKTIME_BOXES: &[&[u8; 4]] = &[b"pnot", b"PICT", b"wide"];

struct Box4 {
    size: u64,
    kind: [u8; 4],
    header_len: u64,
}

fn read_box<S: PeekSource + ?Sized>(ctx: &ProbeContext<'_, S>, offset: i64) -> Option<Box4> {
    let header = ctx.peek(offset, 8)?;
    let size32 = u32::from_be_bytes(header[0..4].try_into().unwrap());
    let mut kind = [0u8; 4];
    kind.copy_from_slice(&header[4..8]);

    if size32 == 1 {
        let ext = ctx.peek(offset + 8, 8)?;
        let size64 = u64::from_be_bytes(ext.try_into().unwrap());
        Some(Box4 { size: size64, kind, header_len: 16 })
    }
    else {
        Some(Box4 { size: u64::from(size32), kind, header_len: 8 })
    }
}

/// Walk the box chain from offset 0, per spec.md: common boxes raise confidence from LIKELY to
/// NEARLY_CERTAIN, a QuickTime-specific box yields MAXIMUM immediately, and any unrecognized box
/// aborts the walk.
fn probe_isobmff<S: PeekSource + ?Sized>(ctx: &mut ProbeContext<'_, S>) {
    let mut offset = 0i64;
    let mut probability = None;

    loop {
        let Some(b) = read_box(ctx, offset)
        else {
            break;
        };

        if QUICKTIME_BOXES.iter().any(|q| **q == b.kind) {
            ctx.suggest(MAXIMUM, Label::new("video/quicktime"));
            return;
        }

        if COMMON_BOXES.iter().any(|c| **c == b.kind) {
            probability = Some(match probability {
                None => LIKELY,
                Some(_) => NEARLY_CERTAIN,
            });
        }
        else {
            break;
        }

        if b.size < b.header_len {
            break;
        }
        offset += b.size as i64;
    }

    if let Some(probability) = probability {
        ctx.suggest(probability, Label::new("video/quicktime"));
    }
}

const BRAND_3GPP: &[&[u8; 3]] = &[b"3gp", b"3gr", b"3gs", b"3gg"];

/// Compatible-brand slots to examine before giving up; bounds `probe_3gpp`'s walk the same way
/// every other scanning probe in this crate bounds its own (`mp3::TRY_SYNC`, `text::URI_SCAN_LIMIT`).
const COMPATIBLE_BRAND_SCAN_LIMIT: i64 = 64;

fn probe_3gpp<S: PeekSource + ?Sized>(ctx: &mut ProbeContext<'_, S>) {
    let Some(tag) = ctx.peek(4, 4)
    else {
        return;
    };
    if tag != b"ftyp" {
        return;
    }

    let Some(major_brand) = ctx.peek(8, 3)
    else {
        return;
    };
    if BRAND_3GPP.iter().any(|b| **b == major_brand) {
        ctx.suggest(MAXIMUM, Label::new("video/3gpp"));
        return;
    }

    // Walk the compatible-brands slots (each a 4-byte brand, starting at offset 16) until EOF or
    // a matching brand.
    let mut slot = 0i64;
    while slot < COMPATIBLE_BRAND_SCAN_LIMIT {
        let Some(brand) = ctx.peek(16 + slot * 4, 3)
        else {
            return;
        };
        if BRAND_3GPP.iter().any(|b| **b == brand) {
            ctx.suggest(LIKELY, Label::new("video/3gpp"));
            return;
        }
        slot += 1;
    }
}

fn probe_m4a<S: PeekSource + ?Sized>(ctx: &mut ProbeContext<'_, S>) {
    let Some(tag) = ctx.peek(4, 4)
    else {
        return;
    };
    if tag != b"ftyp" {
        return;
    }

    if let Some(brand) = ctx.peek(8, 4) {
        if brand == b"M4A " || brand == b"mp42" {
            ctx.suggest(MAXIMUM, Label::new("audio/x-m4a"));
        }
    }
}

pub fn register_all(registry: &mut Registry) -> Result<()> {
    registry.register(
        "isobmff",
        RANK_PRIMARY,
        &["mov", "qt"],
        Label::new("video/quicktime"),
        Box::new(|ctx| probe_isobmff(ctx)),
    )?;

    registry.register(
        "3gpp",
        RANK_SECONDARY,
        &["3gp", "3g2"],
        Label::new("video/3gpp"),
        Box::new(|ctx| probe_3gpp(ctx)),
    )?;

    registry.register(
        "m4a",
        RANK_SECONDARY,
        &["m4a"],
        Label::new("audio/x-m4a"),
        Box::new(|ctx| probe_m4a(ctx)),
    )?;

    Ok(())
}
