// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The Matroska/EBML probe (spec.md §4.4). EBML variable-length integer decoding is grounded in
//! `symphonia-format-mkv`'s `ebml.rs`.

use crate::common::{MAXIMUM, RANK_PRIMARY};
use crate::context::ProbeContext;
use crate::errors::Result;
use crate::label::Label;
use crate::peek::PeekSource;
use crate::registry::Registry;

const EBML_HEADER_ID: [u8; 4] = [0x1A, 0x45, 0xDF, 0xA3];

/// The width, in bytes, of an EBML vint: one past the position of its leading 1-bit.
fn vint_width(first_byte: u8) -> Option<usize> {
    (1..=8).find(|w| first_byte & (0x80 >> (w - 1)) != 0)
}

fn vint_value(bytes: &[u8]) -> u64 {
    let width = bytes.len();
    // An 8-byte vint's marker bit is the leading byte's bit 0, leaving no payload bits in that
    // byte; `0xFF >> 8` would overflow an 8-bit shift, so that width is masked explicitly.
    let lead_mask: u8 = if width >= 8 { 0 } else { 0xFF >> width };
    let mut value = u64::from(bytes[0] & lead_mask);
    for &b in &bytes[1..] {
        value = (value << 8) | u64::from(b);
    }
    value
}

fn probe_mkv<S: PeekSource + ?Sized>(ctx: &mut ProbeContext<'_, S>) {
    let Some(w) = ctx.peek(0, 5)
    else {
        return;
    };
    if w[0..4] != EBML_HEADER_ID {
        return;
    }

    let Some(width) = vint_width(w[4])
    else {
        return;
    };

    let Some(size_bytes) = ctx.peek(4, width)
    else {
        return;
    };
    let size = vint_value(size_bytes);

    let total = 4 + width as u64 + size;
    let Ok(total) = usize::try_from(total)
    else {
        return;
    };

    let Some(header) = ctx.peek(0, total)
    else {
        return;
    };

    if header.windows(8).any(|win| win == b"matroska") {
        ctx.suggest(MAXIMUM, Label::new("video/x-matroska"));
    }
}

pub fn register_all(registry: &mut Registry) -> Result<()> {
    registry.register(
        "matroska",
        RANK_PRIMARY,
        &["mkv", "mka", "webm"],
        Label::new("video/x-matroska"),
        Box::new(|ctx| probe_mkv(ctx)),
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

    fn ebml_header_with_doctype(doctype: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        // EBML DocType element (id 0x4282), a single-byte-width vint size, then the literal.
        body.extend_from_slice(&[0x42, 0x82]);
        body.push(0x80 | doctype.len() as u8); // width-1 vint size
        body.extend_from_slice(doctype);

        let size = body.len() as u8;
        let mut data = EBML_HEADER_ID.to_vec();
        data.push(0x80 | size); // width-1 vint size for the EBML header element itself
        data.extend_from_slice(&body);
        data
    }

    #[test]
    fn matroska_doctype_matches() {
        let data = ebml_header_with_doctype(b"matroska");
        let src = SliceSource::new(&data);
        let suggestions = registry().recognize(&src);
        assert!(suggestions
            .iter()
            .any(|s| s.label().name() == "video/x-matroska" && s.probability() == MAXIMUM));
    }

    #[test]
    fn webm_doctype_also_matches_via_shared_literal() {
        // "webm" alone doesn't contain "matroska"; this should NOT match.
        let data = ebml_header_with_doctype(b"webm");
        let src = SliceSource::new(&data);
        let suggestions = registry().recognize(&src);
        assert!(!suggestions.iter().any(|s| s.label().name() == "video/x-matroska"));
    }

    #[test]
    fn wrong_id_does_not_match() {
        let mut data = EBML_HEADER_ID.to_vec();
        data[0] = 0x00;
        data.extend_from_slice(&[0x80, b'm', b'a', b't', b'r', b'o', b's', b'k', b'a']);
        let src = SliceSource::new(&data);
        assert!(registry().recognize(&src).is_empty());
    }

    #[test]
    fn vint_width_reads_leading_bit_position() {
        assert_eq!(vint_width(0x1A), Some(4));
        assert_eq!(vint_width(0x80), Some(1));
        assert_eq!(vint_width(0x01), Some(8));
    }

    #[test]
    fn vint_value_handles_full_width_leading_byte() {
        // width == 8: the leading byte's marker bit (0x01) leaves no payload bits in that byte.
        let bytes = [0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x2A];
        assert_eq!(vint_value(&bytes), 0x2A);
    }
}
