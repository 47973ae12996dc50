// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! WavPack probe (spec.md §4.4): a `wvpk` magic, a block-size field, and a sub-block walk.

use crate::common::{LIKELY, RANK_SECONDARY};
use crate::context::ProbeContext;
use crate::errors::Result;
use crate::label::Label;
use crate::peek::PeekSource;
use crate::registry::Registry;

/// Size of the fixed WavPack block header (magic, sizes, version, indices, flags, crc) that
/// precedes the first metadata sub-block.
const BLOCK_HEADER_LEN: usize = 32;
const MIN_SCAN_WINDOW: usize = 64;

/// Peek as much of the block as we can, retrying with a shrinking window when the full block
/// (as declared by its size field) isn't available from the source.
fn scan_window<'p, S: PeekSource + ?Sized>(
    ctx: &ProbeContext<'p, S>,
    wanted: usize,
) -> Option<&'p [u8]> {
    let mut window_len = wanted;
    loop {
        if window_len < MIN_SCAN_WINDOW {
            return None;
        }
        if let Some(w) = ctx.peek(0, window_len) {
            return Some(w);
        }
        window_len /= 2;
    }
}

fn probe_wavpack<S: PeekSource + ?Sized>(ctx: &mut ProbeContext<'_, S>) {
    if ctx.peek(0, 4) != Some(b"wvpk") {
        return;
    }
    let Some(size_bytes) = ctx.peek(4, 4)
    else {
        return;
    };
    let block_size = u32::from_le_bytes(size_bytes.try_into().unwrap()) as usize;
    let wanted = 8usize.saturating_add(block_size);

    let Some(window) = scan_window(ctx, wanted)
    else {
        return;
    };
    if window.len() <= BLOCK_HEADER_LEN {
        return;
    }

    let mut pos = BLOCK_HEADER_LEN;
    while pos + 1 < window.len() {
        let id = window[pos];
        let large = id & 0x80 != 0;
        let len_field_len = if large { 3 } else { 1 };
        if pos + 1 + len_field_len > window.len() {
            break;
        }

        let raw_len = if large {
            u32::from(window[pos + 1])
                | (u32::from(window[pos + 2]) << 8)
                | (u32::from(window[pos + 3]) << 16)
        }
        else {
            u32::from(window[pos + 1])
        };
        let sub_len = raw_len as usize * 2;

        if id & 0x20 == 0 {
            match id & 0x0F {
                0xA | 0xC => {
                    ctx.suggest(LIKELY, Label::new("audio/x-wavpack"));
                    return;
                }
                0xB => {
                    ctx.suggest(LIKELY, Label::new("audio/x-wavpack-correction"));
                    return;
                }
                _ => {}
            }
        }

        pos += 1 + len_field_len + sub_len;
    }
}

pub fn register_all(registry: &mut Registry) -> Result<()> {
    registry.register(
        "wavpack",
        RANK_SECONDARY,
        &["wv"],
        Label::new("audio/x-wavpack"),
        Box::new(|ctx| probe_wavpack(ctx)),
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

    /// A minimal WavPack block: a 32-byte header (magic + LE32 size field, rest zeroed) followed
    /// by one small-form sub-block carrying `sub_id`.
    fn wavpack_block(sub_id: u8, payload: &[u8]) -> Vec<u8> {
        let raw_len = (payload.len() as u32 + 1) / 2;
        let sub_len = raw_len as usize * 2;
        let mut padded_payload = payload.to_vec();
        padded_payload.resize(sub_len, 0);

        let mut subblock = vec![sub_id, raw_len as u8];
        subblock.extend_from_slice(&padded_payload);

        let mut header = vec![0u8; BLOCK_HEADER_LEN];
        header[0..4].copy_from_slice(b"wvpk");
        let body_after_size_field = (BLOCK_HEADER_LEN - 8 + subblock.len()) as u32;
        header[4..8].copy_from_slice(&body_after_size_field.to_le_bytes());

        header.extend_from_slice(&subblock);
        header
    }

    #[test]
    fn audio_subblock_id_0xa_matches() {
        let data = wavpack_block(0x0A, b"samples");
        let src = SliceSource::new(&data);
        let suggestions = registry().recognize(&src);
        assert!(suggestions
            .iter()
            .any(|s| s.label().name() == "audio/x-wavpack" && s.probability() == LIKELY));
    }

    #[test]
    fn audio_subblock_id_0xc_matches() {
        let data = wavpack_block(0x0C, b"samples");
        let src = SliceSource::new(&data);
        let suggestions = registry().recognize(&src);
        assert!(suggestions.iter().any(|s| s.label().name() == "audio/x-wavpack"));
    }

    #[test]
    fn correction_subblock_id_0xb_matches() {
        let data = wavpack_block(0x0B, b"samples");
        let src = SliceSource::new(&data);
        let suggestions = registry().recognize(&src);
        assert!(suggestions
            .iter()
            .any(|s| s.label().name() == "audio/x-wavpack-correction" && s.probability() == LIKELY));
    }

    #[test]
    fn bit5_set_is_excluded_even_with_matching_nibble() {
        // id 0x2A: low nibble 0xA, but bit 5 (0x20) set, so this sub-block must be skipped.
        let data = wavpack_block(0x2A, b"samples");
        let src = SliceSource::new(&data);
        assert!(registry().recognize(&src).is_empty());
    }

    #[test]
    fn missing_magic_does_not_match() {
        let data = vec![0u8; 64];
        let src = SliceSource::new(&data);
        assert!(registry().recognize(&src).is_empty());
    }
}
