// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The AAC ADTS/ADIF probe (spec.md §4.4): a double-sync check within the first 4 KiB, or a bare
//! `"ADIF"` literal. Sync-word and frame-length bit layout grounded in `symphonia-codec-aac`'s
//! `adts.rs`, simplified from "parse a full ADTS header" to "confirm two consecutive syncs".

use crate::common::{LIKELY, RANK_PRIMARY};
use crate::context::ProbeContext;
use crate::errors::Result;
use crate::label::Label;
use crate::peek::PeekSource;
use crate::registry::Registry;

const SCAN_WINDOW: usize = 4096;

fn frame_length(b3: u8, b4: u8, b5: u8) -> usize {
    ((usize::from(b3 & 0x03)) << 11) | (usize::from(b4) << 3) | (usize::from(b5 & 0xE0) >> 5)
}

/// `None` if `window[at]` isn't a recognized ADTS sync; otherwise the MPEG version it implies.
fn sync_version(window: &[u8], at: usize) -> Option<i64> {
    if window.get(at) != Some(&0xFF) {
        return None;
    }
    match window.get(at + 1) {
        Some(0xF0) => Some(4),
        Some(0xF6) => Some(2),
        _ => None,
    }
}

fn probe_aac<S: PeekSource + ?Sized>(ctx: &mut ProbeContext<'_, S>) {
    let cap = match ctx.length() {
        Some(len) => (SCAN_WINDOW as u64).min(len) as usize,
        None => SCAN_WINDOW,
    };
    if cap < 4 {
        return;
    }

    let Some(window) = ctx.peek(0, cap)
    else {
        return;
    };

    for i in 0..window.len().saturating_sub(6) {
        let Some(version) = sync_version(window, i)
        else {
            continue;
        };

        let len = frame_length(window[i + 3], window[i + 4], window[i + 5]);
        if len == 0 {
            continue;
        }
        let next = i + len;
        if sync_version(window, next).is_some() {
            ctx.suggest(
                LIKELY,
                Label::new("audio/mpeg").with("mpegversion", version).with("framed", false),
            );
            return;
        }
    }

    if window.windows(4).any(|w| w == b"ADIF") {
        ctx.suggest(
            LIKELY,
            Label::new("audio/mpeg").with("mpegversion", 4i64).with("framed", false),
        );
    }
}

pub fn register_all(registry: &mut Registry) -> Result<()> {
    registry.register(
        "aac",
        RANK_PRIMARY,
        &["aac", "adts"],
        Label::new("audio/mpeg").with("mpegversion", 4i64),
        Box::new(|ctx| probe_aac(ctx)),
    )
}
