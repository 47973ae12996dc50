// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! DV (Digital Video) probe (spec.md §4.4): a fixed 5-byte DIF block header pattern, with the
//! PAL/NTSC format carried in a marker bit of the fourth byte.

use crate::common::{MAXIMUM, RANK_SECONDARY};
use crate::context::ProbeContext;
use crate::errors::Result;
use crate::label::Label;
use crate::peek::PeekSource;
use crate::registry::Registry;

fn probe_dv<S: PeekSource + ?Sized>(ctx: &mut ProbeContext<'_, S>) {
    let Some(w) = ctx.peek(0, 5)
    else {
        return;
    };

    let header_ok = w[0] == 0x1F && w[1] == 0x07 && w[2] == 0x00 && (w[4] & 0x01) == 0;
    if !header_ok {
        return;
    }

    let format = if w[3] & 0x80 != 0 { "PAL" } else { "NTSC" };

    ctx.suggest(
        MAXIMUM,
        Label::new("video/x-dv").with("systemstream", true).with("format", format),
    );
}

pub fn register_all(registry: &mut Registry) -> Result<()> {
    registry.register(
        "dv",
        RANK_SECONDARY,
        &["dv"],
        Label::new("video/x-dv").with("systemstream", true),
        Box::new(|ctx| probe_dv(ctx)),
    )
}
