// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MPEG-1/2 system (program) stream probes (spec.md §4.4). The MPEG-1 probe walks a handful of
//! packets from a candidate pack start, counting structurally valid ones the same way the MP3
//! probe counts frames; the MPEG-2 probe is a single fixed-offset check.

use crate::common::{MAXIMUM, RANK_PRIMARY};
use crate::context::ProbeContext;
use crate::errors::Result;
use crate::label::Label;
use crate::peek::PeekSource;
use crate::registry::Registry;

const SCAN_LIMIT: usize = 100 * 1024;
const TRY_HEADERS: u32 = 4;
const MIN_HEADERS: u32 = 1;

fn is_start_code(window: &[u8]) -> bool {
    window[0] == 0 && window[1] == 0 && window[2] == 1
}

fn verify_pack_header(payload: &[u8]) -> bool {
    (payload[0] & 0xF1) == 0x21
        && (payload[2] & 0x01) == 0x01
        && (payload[4] & 0x01) == 0x01
        && (payload[5] & 0x80) == 0x80
        && (payload[7] & 0x01) == 0x01
}

/// Validate the system-header payload following a `BB` start code: a marker bit in its first
/// byte, then a run of 3-byte stream entries (`entry[0] > 0xBB && entry[1] & 0xC0 == 0xC0`).
fn verify_system_header(body: &[u8]) -> bool {
    if body.is_empty() || body[0] & 0x80 != 0x80 {
        return false;
    }
    let mut i = 6;
    while i + 3 <= body.len() {
        let entry = &body[i..i + 3];
        if !(entry[0] > 0xBB && entry[1] & 0xC0 == 0xC0) {
            return false;
        }
        i += 3;
    }
    true
}

enum Packet {
    Valid(i64),
    Invalid,
    Exhausted,
}

fn packet_at<S: PeekSource + ?Sized>(ctx: &ProbeContext<'_, S>, pos: i64) -> Packet {
    let Some(prefix) = ctx.peek(pos, 4)
    else {
        return Packet::Exhausted;
    };
    if !is_start_code(prefix) {
        return Packet::Invalid;
    }

    match prefix[3] {
        0xBA => match ctx.peek(pos + 4, 8) {
            Some(payload) if verify_pack_header(payload) => Packet::Valid(12),
            Some(_) => Packet::Invalid,
            None => Packet::Exhausted,
        },
        0xB9 => Packet::Valid(4),
        0xBB => match ctx.peek(pos + 4, 2) {
            Some(len_bytes) => {
                let hlen = u16::from_be_bytes([len_bytes[0], len_bytes[1]]) as usize;
                match ctx.peek(pos + 6, hlen) {
                    Some(body) if verify_system_header(body) => Packet::Valid(6 + hlen as i64),
                    Some(_) => Packet::Invalid,
                    None => Packet::Exhausted,
                }
            }
            None => Packet::Exhausted,
        },
        id if id < 0xB9 => Packet::Invalid,
        _ => match ctx.peek(pos + 4, 2) {
            Some(len_bytes) => {
                let plen = u16::from_be_bytes([len_bytes[0], len_bytes[1]]) as usize;
                Packet::Valid(6 + plen as i64)
            }
            None => Packet::Exhausted,
        },
    }
}

fn walk_packets<S: PeekSource + ?Sized>(ctx: &ProbeContext<'_, S>, start: i64) -> (u32, bool) {
    let mut pos = start;
    let mut found = 0u32;

    while found < TRY_HEADERS {
        match packet_at(ctx, pos) {
            Packet::Valid(len) => {
                found += 1;
                pos += len;
            }
            Packet::Invalid => return (found, false),
            Packet::Exhausted => return (found, true),
        }
    }
    (found, false)
}

fn probe_mpeg1_system<S: PeekSource + ?Sized>(ctx: &mut ProbeContext<'_, S>) {
    let cap = match ctx.length() {
        Some(len) => SCAN_LIMIT.min(len as usize),
        None => SCAN_LIMIT,
    };

    let mut pos: i64 = 0;
    while (pos as usize) < cap {
        match ctx.peek(pos, 4) {
            Some(w) if is_start_code(w) && w[3] == 0xBA => {
                let (found, exhausted) = walk_packets(ctx, pos);
                if found >= TRY_HEADERS || (exhausted && found >= MIN_HEADERS) {
                    ctx.suggest(
                        MAXIMUM - 1,
                        Label::new("video/mpeg").with("systemstream", true).with("mpegversion", 1i64),
                    );
                    return;
                }
            }
            Some(_) => {}
            None => return,
        }
        pos += 1;
    }
}

fn probe_mpeg2_system<S: PeekSource + ?Sized>(ctx: &mut ProbeContext<'_, S>) {
    let Some(w) = ctx.peek(0, 5)
    else {
        return;
    };
    if !is_start_code(w) {
        return;
    }

    match w[3] {
        0xBA => {
            if w[4] >> 6 == 0b10 {
                ctx.suggest(
                    MAXIMUM,
                    Label::new("video/mpeg").with("systemstream", true).with("mpegversion", 2i64),
                );
            }
            else if w[4] >> 4 == 0b0010 {
                ctx.suggest(
                    MAXIMUM,
                    Label::new("video/mpeg").with("systemstream", true).with("mpegversion", 1i64),
                );
            }
        }
        0xE0 | 0xC0 | 0xBD => {
            ctx.suggest(
                MAXIMUM,
                Label::new("video/mpeg").with("systemstream", true).with("mpegversion", 2i64),
            );
        }
        _ => {}
    }
}

pub fn register_all(registry: &mut Registry) -> Result<()> {
    registry.register(
        "mpeg1-system",
        RANK_PRIMARY,
        &["mpg", "mpeg", "vob"],
        Label::new("video/mpeg").with("systemstream", true).with("mpegversion", 1i64),
        Box::new(|ctx| probe_mpeg1_system(ctx)),
    )?;

    registry.register(
        "mpeg2-system",
        RANK_PRIMARY,
        &["mpg", "mpeg", "vob", "m2p"],
        Label::new("video/mpeg").with("systemstream", true).with("mpegversion", 2i64),
        Box::new(|ctx| probe_mpeg2_system(ctx)),
    )?;

    Ok(())
}
