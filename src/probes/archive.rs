// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Archive and executable container probes (spec.md §4.4): TAR, AR, and the MS-DOS/PE stub.

use crate::common::{NEARLY_CERTAIN, POSSIBLE, RANK_SECONDARY};
use crate::context::ProbeContext;
use crate::errors::Result;
use crate::label::Label;
use crate::peek::PeekSource;
use crate::registry::Registry;

fn probe_tar<S: PeekSource + ?Sized>(ctx: &mut ProbeContext<'_, S>) {
    let Some(w) = ctx.peek(257, 8)
    else {
        return;
    };

    // Old-GNU tar writes "ustar  \0" (two spaces, no version digits); POSIX ustar writes
    // "ustar\0" followed by a two-digit version. Both share the 5-byte "ustar" prefix, so a
    // separate old-GNU branch was redundant with the prefix check.
    let old_gnu = w == b"ustar  \0";
    let posix = &w[0..5] == b"ustar" && w[6].is_ascii_digit() && w[7].is_ascii_digit();

    if old_gnu || posix {
        ctx.suggest(NEARLY_CERTAIN, Label::new("application/x-tar"));
    }
}

fn probe_ar<S: PeekSource + ?Sized>(ctx: &mut ProbeContext<'_, S>) {
    if ctx.peek(0, 7) != Some(b"!<arch>") {
        return;
    }

    let probability = match ctx.peek(7, 17) {
        Some(tail) if tail.iter().all(|&b| b == b'\n' || (0x20..0x7F).contains(&b)) => {
            NEARLY_CERTAIN
        }
        _ => POSSIBLE,
    };

    ctx.suggest(probability, Label::new("application/x-archive"));
}

fn probe_ms_dos_pe<S: PeekSource + ?Sized>(ctx: &mut ProbeContext<'_, S>) {
    if ctx.peek(0, 2) != Some(b"MZ") {
        return;
    }
    let Some(reloc) = ctx.peek(8, 2)
    else {
        return;
    };
    if u16::from_le_bytes([reloc[0], reloc[1]]) != 4 {
        return;
    }

    let Some(pe_offset_bytes) = ctx.peek(60, 4)
    else {
        return;
    };
    let pe_offset = u32::from_le_bytes(pe_offset_bytes.try_into().unwrap()) as i64;

    if ctx.peek(pe_offset, 2) == Some(b"PE") {
        ctx.suggest(NEARLY_CERTAIN, Label::new("application/x-msdownload"));
    }
}

pub fn register_all(registry: &mut Registry) -> Result<()> {
    registry.register(
        "tar",
        RANK_SECONDARY,
        &["tar"],
        Label::new("application/x-tar"),
        Box::new(|ctx| probe_tar(ctx)),
    )?;

    registry.register(
        "ar",
        RANK_SECONDARY,
        &["a", "deb"],
        Label::new("application/x-archive"),
        Box::new(|ctx| probe_ar(ctx)),
    )?;

    registry.register(
        "ms-dos-pe",
        RANK_SECONDARY,
        &["exe", "dll"],
        Label::new("application/x-msdownload"),
        Box::new(|ctx| probe_ms_dos_pe(ctx)),
    )?;

    Ok(())
}
