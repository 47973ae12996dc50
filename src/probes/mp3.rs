// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The MPEG-1 audio (MP3) probe (spec.md §4.4): scans for a run of consecutive, structurally
//! consistent frame headers. Header bit layout and frame-size arithmetic are grounded in
//! `symphonia-bundle-mp3`'s `header.rs`, generalized from "parse and decode" to "does a
//! plausible run of frames exist here".

use log::warn;

use crate::common::{average_probability, clamp_probability, LIKELY, MAXIMUM, MINIMUM, RANK_PRIMARY};
use crate::context::ProbeContext;
use crate::errors::Result;
use crate::label::Label;
use crate::peek::PeekSource;
use crate::registry::Registry;

const TRY_SYNC: usize = 10_000;
const TRY_HEADERS: u32 = 5;
const MIN_HEADERS: u32 = 2;

const BIT_RATES_MPEG1_L1: [u32; 16] =
    [0, 32, 64, 96, 128, 160, 192, 224, 256, 288, 320, 352, 384, 416, 448, 0];
const BIT_RATES_MPEG1_L2: [u32; 16] =
    [0, 32, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320, 384, 0];
const BIT_RATES_MPEG1_L3: [u32; 16] =
    [0, 32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320, 0];
const BIT_RATES_MPEG2_L1: [u32; 16] =
    [0, 32, 48, 56, 64, 80, 96, 112, 128, 144, 160, 176, 192, 224, 256, 0];
const BIT_RATES_MPEG2_L23: [u32; 16] =
    [0, 8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160, 0];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Header {
    layer: u8,
    is_mpeg1: bool,
    sample_rate: u32,
    channel_mode: u8,
    bitrate_idx: u8,
    padding: bool,
}

impl Header {
    fn is_free(&self) -> bool {
        self.bitrate_idx == 0
    }

    /// Frame length in bytes including the 4-byte header, or `None` for free-format frames
    /// (whose length can't be derived from the header alone; spec.md's free-format handling
    /// infers it from a second candidate instead).
    fn frame_length(&self) -> Option<usize> {
        let kbps = match (self.is_mpeg1, self.layer) {
            (true, 1) => BIT_RATES_MPEG1_L1[self.bitrate_idx as usize],
            (true, 2) => BIT_RATES_MPEG1_L2[self.bitrate_idx as usize],
            (true, 3) => BIT_RATES_MPEG1_L3[self.bitrate_idx as usize],
            (false, 1) => BIT_RATES_MPEG2_L1[self.bitrate_idx as usize],
            (false, _) => BIT_RATES_MPEG2_L23[self.bitrate_idx as usize],
            _ => unreachable!("layer is always 1..=3"),
        };
        if kbps == 0 {
            return None;
        }
        let pad = usize::from(self.padding);
        let len = match self.layer {
            1 => (12_000 * kbps as usize / self.sample_rate as usize + pad) * 4,
            2 => 144_000 * kbps as usize / self.sample_rate as usize + pad,
            3 if self.is_mpeg1 => 144_000 * kbps as usize / self.sample_rate as usize + pad,
            3 => 72_000 * kbps as usize / self.sample_rate as usize + pad,
            _ => unreachable!(),
        };
        Some(len)
    }
}

fn is_synced(word: u32) -> bool {
    (word & 0xFFE0_0000) == 0xFFE0_0000
}

fn parse_header(word: u32) -> Option<Header> {
    let version_bits = (word >> 19) & 0x3;
    if version_bits == 0b01 {
        return None; // reserved version
    }
    let layer_bits = (word >> 17) & 0x3;
    if layer_bits == 0b00 {
        return None; // reserved layer
    }
    let bitrate_idx = ((word >> 12) & 0xF) as u8;
    if bitrate_idx == 0xF {
        return None; // reserved bitrate
    }
    let sample_idx = (word >> 10) & 0x3;
    if sample_idx == 0b11 {
        return None; // reserved sample rate
    }
    let padding = (word >> 9) & 0x1 == 1;
    let channel_mode = ((word >> 6) & 0x3) as u8;

    let layer = match layer_bits {
        0b01 => 3,
        0b10 => 2,
        0b11 => 1,
        _ => unreachable!(),
    };
    let is_mpeg1 = version_bits == 0b11;

    let sample_rate = match (version_bits, sample_idx) {
        (0b11, 0b00) => 44_100,
        (0b11, 0b01) => 48_000,
        (0b11, 0b10) => 32_000,
        (0b10, 0b00) => 22_050,
        (0b10, 0b01) => 24_000,
        (0b10, 0b10) => 16_000,
        (0b00, 0b00) => 11_025,
        (0b00, 0b01) => 12_000,
        (0b00, 0b10) => 8_000,
        _ => unreachable!(),
    };

    Some(Header { layer, is_mpeg1, sample_rate, channel_mode, bitrate_idx, padding })
}

fn read_header_word<S: PeekSource + ?Sized>(ctx: &ProbeContext<'_, S>, pos: i64) -> Option<u32> {
    let bytes = ctx.peek(pos, 4)?;
    Some(u32::from_be_bytes(bytes.try_into().unwrap()))
}

/// Find the next synced header word at or after `from` whose layer, sample rate, and channel mode
/// match `expected`, scanning at most `budget` bytes. Used only to resolve the second free-format
/// candidate's implied frame length; matching on the run's other fields (not just "any valid
/// header") keeps a coincidentally header-shaped byte sequence inside a payload from being
/// mistaken for the true frame boundary.
fn find_next_header<S: PeekSource + ?Sized>(
    ctx: &ProbeContext<'_, S>,
    from: i64,
    budget: usize,
    expected: Header,
) -> Option<i64> {
    for i in 0..budget {
        let pos = from + i as i64;
        let word = read_header_word(ctx, pos)?;
        if !is_synced(word) {
            continue;
        }
        let Some(header) = parse_header(word)
        else {
            continue;
        };
        if header.layer == expected.layer
            && header.sample_rate == expected.sample_rate
            && header.channel_mode == expected.channel_mode
        {
            return Some(pos);
        }
    }
    None
}

/// Walk consecutive frames from `start`, returning `(frames_found, layer_of_run, exhausted)`.
/// `exhausted` is true if the walk stopped because the source ran out of data (the
/// MIN_HEADERS-with-exhaustion success case), rather than because a header failed validation.
fn walk_frames<S: PeekSource + ?Sized>(
    ctx: &ProbeContext<'_, S>,
    start: i64,
    scan_budget: usize,
) -> (u32, Option<u8>, bool) {
    let mut pos = start;
    let mut found = 0u32;
    let mut run_layer: Option<u8> = None;
    let mut run_sample_rate: Option<u32> = None;
    let mut run_channels: Option<u8> = None;
    let mut free_frame_len: Option<usize> = None;

    while found < TRY_HEADERS {
        let Some(word) = read_header_word(ctx, pos)
        else {
            return (found, run_layer, true);
        };
        if !is_synced(word) {
            break;
        }
        let Some(header) = parse_header(word)
        else {
            break;
        };

        // A mid-stream change of layer, sample rate, or channel mode invalidates this header
        // and ends the run (bitrate alone may vary: VBR is expected).
        if let (Some(l), Some(sr), Some(ch)) = (run_layer, run_sample_rate, run_channels) {
            if l != header.layer || sr != header.sample_rate || ch != header.channel_mode {
                break;
            }
        }
        run_layer = Some(header.layer);
        run_sample_rate = Some(header.sample_rate);
        run_channels = Some(header.channel_mode);

        let frame_len = if header.is_free() {
            match free_frame_len {
                Some(len) => len,
                None => {
                    let remaining = scan_budget.saturating_sub((pos - start) as usize);
                    match find_next_header(ctx, pos + 1, remaining, header) {
                        Some(next) => {
                            let len = (next - pos) as usize;
                            free_frame_len = Some(len);
                            len
                        }
                        None => return (found, run_layer, true),
                    }
                }
            }
        } else {
            match header.frame_length() {
                Some(len) => len,
                None => break,
            }
        };

        found += 1;
        pos += frame_len as i64;
    }

    (found, run_layer, false)
}

fn probe_pass<S: PeekSource + ?Sized>(
    ctx: &ProbeContext<'_, S>,
    start_offset: i64,
) -> Option<(u8, u8)> {
    let mut skipped = 0usize;

    while skipped < TRY_SYNC {
        let candidate = start_offset + skipped as i64;
        let Some(byte) = ctx.peek(candidate, 1)
        else {
            return None;
        };

        if byte[0] != 0xFF {
            skipped += 1;
            continue;
        }

        let Some(word) = read_header_word(ctx, candidate)
        else {
            skipped += 1;
            continue;
        };

        if !is_synced(word) || parse_header(word).is_none() {
            skipped += 1;
            continue;
        }

        let budget = TRY_SYNC - skipped;
        let (found, layer, exhausted) = walk_frames(ctx, candidate, budget);
        let success = found >= TRY_HEADERS || (exhausted && found >= MIN_HEADERS);

        if success {
            let layer = layer.unwrap_or(parse_header(word).unwrap().layer);

            let scale = (f64::from(found) / f64::from(TRY_HEADERS))
                * ((TRY_SYNC - skipped) as f64 / TRY_SYNC as f64);
            let mut probability = (f64::from(MAXIMUM) * scale) as i32;
            probability = probability.max(i32::from(MINIMUM));

            if start_offset > 0 {
                probability /= 2;
            }

            return Some((clamp_probability(probability), layer));
        }

        skipped += 1;
    }

    None
}

fn mp3_label(layer: u8) -> Label {
    Label::new("audio/mpeg").with("mpegversion", 1i64).with("layer", i64::from(layer))
}

fn probe_mp3<S: PeekSource + ?Sized>(ctx: &mut ProbeContext<'_, S>) {
    // An ID3v1 trailer on an otherwise-unverified stream zeroes the MP3 probability outright;
    // don't let an unrelated tagged file get misidentified as MP3.
    if ctx.peek(-128, 3) == Some(b"TAG") {
        return;
    }

    let Some((prob0, layer0)) = probe_pass(ctx, 0)
    else {
        return;
    };

    if prob0 >= LIKELY {
        ctx.suggest(prob0, mp3_label(layer0));
        return;
    }

    let Some(length) = ctx.length()
    else {
        ctx.suggest(prob0, mp3_label(layer0));
        return;
    };

    match probe_pass(ctx, (length / 2) as i64) {
        Some((prob_mid, layer_mid)) if layer_mid == layer0 => {
            ctx.suggest(average_probability(prob0, prob_mid), mp3_label(layer0));
        }
        Some((_, layer_mid)) => {
            warn!(
                "mp3: start-of-stream probe found layer {} but mid-stream probe found layer {}; discarding",
                layer0, layer_mid
            );
        }
        None => {
            // The mid-point pass found nothing, but the start-of-stream evidence stands on its
            // own (spec.md §7: strong start evidence is never silently discarded).
            ctx.suggest(prob0, mp3_label(layer0));
        }
    }
}

pub fn register_all(registry: &mut Registry) -> Result<()> {
    registry.register(
        "mp3",
        RANK_PRIMARY,
        &["mp3", "mp2", "mp1"],
        Label::new("audio/mpeg").with("mpegversion", 1i64),
        Box::new(|ctx| probe_mp3(ctx)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peek::SliceSource;

    /// Build one MPEG-1 Layer III frame at 128 kbps / 44100 Hz / joint-stereo, with `padding`
    /// applied to alternate frames to match the real encoder's bit-reservoir rounding (ensures
    /// every frame is exactly `frame_length()` bytes, since the test data is otherwise silent).
    fn build_layer3_frame(padding: bool) -> Vec<u8> {
        let header = Header {
            layer: 3,
            is_mpeg1: true,
            sample_rate: 44_100,
            channel_mode: 0b01,
            bitrate_idx: 9, // 128 kbps
            padding,
        };
        let len = header.frame_length().unwrap();
        let mut frame = vec![0u8; len];
        frame[0] = 0xFF;
        frame[1] = 0xFB; // version=11 (MPEG1), layer=01 (L3), protect=1 (no CRC)
        frame[2] = (header.bitrate_idx << 4) | 0b0000 | (u8::from(padding) << 1);
        // sample rate idx 00 (44100) occupies bits 3-2 of byte 2; already zero.
        frame[3] = header.channel_mode << 6;
        frame
    }

    fn valid_mp3_stream(frames: usize) -> Vec<u8> {
        let mut data = Vec::new();
        for i in 0..frames {
            data.extend(build_layer3_frame(i % 2 == 0));
        }
        data
    }

    fn registry() -> Registry {
        let mut reg = Registry::new();
        register_all(&mut reg).unwrap();
        reg
    }

    #[test]
    fn recognizes_a_run_of_valid_frames() {
        let data = valid_mp3_stream(40);
        let src = SliceSource::new(&data);
        let suggestions = registry().recognize(&src);
        let best = suggestions.iter().find(|s| s.label().name() == "audio/mpeg").unwrap();
        assert_eq!(best.label().attribute("layer"), Some(&crate::label::AttributeValue::Int(3)));
        assert!(best.probability() >= LIKELY);
    }

    #[test]
    fn id3v1_trailer_suppresses_mp3_suggestion() {
        let mut data = valid_mp3_stream(40);
        let tag_pos = data.len() - 128;
        data[tag_pos..tag_pos + 3].copy_from_slice(b"TAG");
        let src = SliceSource::new(&data);
        let suggestions = registry().recognize(&src);
        assert!(!suggestions.iter().any(|s| s.label().name() == "audio/mpeg"));
    }

    #[test]
    fn garbage_yields_no_suggestion() {
        let data = vec![0u8; 4096];
        let src = SliceSource::new(&data);
        let suggestions = registry().recognize(&src);
        assert!(!suggestions.iter().any(|s| s.label().name() == "audio/mpeg"));
    }

    #[test]
    fn leading_junk_lowers_confidence_below_a_clean_start() {
        let clean = valid_mp3_stream(40);
        let mut junky = vec![0u8; 2048];
        junky.extend(valid_mp3_stream(20));

        let clean_src = SliceSource::new(&clean);
        let junky_src = SliceSource::new(&junky);

        let clean_best =
            registry().recognize(&clean_src).into_iter().find(|s| s.label().name() == "audio/mpeg");
        let junky_best =
            registry().recognize(&junky_src).into_iter().find(|s| s.label().name() == "audio/mpeg");

        // Bytes skipped before the first candidate sync, and the mid-point pass required to
        // confirm a run that doesn't reach LIKELY on its own, both pull confidence down relative
        // to a clean, offset-0, TRY_HEADERS-deep run.
        assert!(junky_best.is_some());
        assert!(junky_best.unwrap().probability() < clean_best.unwrap().probability());
    }
}
