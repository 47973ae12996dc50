// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Textual and XML probes (spec.md §4.4): UTF-8 plaintext plausibility, URI lists, and XML
//! prolog + root-element detection.

use crate::common::{average_probability, clamp_probability, MINIMUM, POSSIBLE, RANK_PRIMARY};
use crate::context::ProbeContext;
use crate::errors::Result;
use crate::label::Label;
use crate::peek::PeekSource;
use crate::registry::Registry;

const UTF8_START_WINDOW: usize = 32 * 1024;
const UTF8_MIN_WINDOW: usize = 16;
const UTF8_START_PROBABILITY: i32 = 95;
const UTF8_SHRINK_STEP: i32 = 10;
const SIXTY_FOUR_KIB: u64 = 64 * 1024;

/// A window is valid UTF-8 text if it decodes cleanly, or if the only decode error is an
/// incomplete multibyte sequence within 4 bytes of the window's end (a split sequence caused by
/// the window boundary, not a real encoding error).
fn utf8_window_is_valid(window: &[u8]) -> bool {
    match std::str::from_utf8(window) {
        Ok(_) => true,
        Err(e) => e.error_len().is_none() && window.len() - e.valid_up_to() <= 4,
    }
}

/// Evaluate UTF-8 plausibility at `offset` using a shrinking window: start at 32 KiB, halve on
/// each unavailable attempt down to a 16 B floor, losing 10 points of confidence per shrink.
///
/// When the source's total length is known, the first attempt is capped to how many bytes
/// actually remain from `offset` to end-of-source: a short, fully-available file should not be
/// penalized by shrinking purely because 32 KiB of it don't exist. Shrinking still applies, and
/// still costs confidence, when the source is genuinely short on *buffered* data (the streaming
/// case a partially-filled read-ahead buffer models).
fn evaluate_utf8_at<S: PeekSource + ?Sized>(ctx: &ProbeContext<'_, S>, offset: i64) -> Option<u8> {
    let mut size = UTF8_START_WINDOW;

    if let Some(len) = ctx.length() {
        let remaining = len.saturating_sub(offset.max(0) as u64);
        size = size.min(remaining as usize);
    }

    let mut probability = UTF8_START_PROBABILITY;

    while size >= UTF8_MIN_WINDOW {
        if let Some(window) = ctx.peek(offset, size) {
            return utf8_window_is_valid(window).then(|| clamp_probability(probability));
        }
        size /= 2;
        probability -= UTF8_SHRINK_STEP;
    }
    None
}

fn probe_plain_text<S: PeekSource + ?Sized>(ctx: &mut ProbeContext<'_, S>) {
    // An XML prolog at offset 0 should be left to the XML probes; don't mask them.
    if ctx.peek(0, 5) == Some(b"<?xml") {
        return;
    }

    let Some(start_probability) = evaluate_utf8_at(ctx, 0)
    else {
        return;
    };

    let probability = match ctx.length() {
        None => start_probability.min(POSSIBLE),
        Some(0) => start_probability.min(POSSIBLE),
        Some(len) if len < SIXTY_FOUR_KIB => start_probability,
        Some(len) => {
            let mid = (len / 2) as i64;
            match evaluate_utf8_at(ctx, mid) {
                None => return,
                Some(mid_probability) => average_probability(start_probability, mid_probability),
            }
        }
    };

    ctx.suggest(probability, Label::new("text/plain"));
}

const URI_SCAN_LIMIT: i64 = 4096;

fn is_uri_scheme_start(window: &[u8]) -> bool {
    let mut i = 0;
    while i < window.len() && window[i].is_ascii_alphanumeric() {
        i += 1;
    }
    i > 0 && window.get(i..i + 3) == Some(&b"://"[..])
}

/// Skip any number of leading `#`-comment lines, returning the offset of the first
/// non-comment line, or `None` if the source runs out (or the scan limit is hit) first.
fn skip_comment_lines<S: PeekSource + ?Sized>(ctx: &ProbeContext<'_, S>) -> Option<i64> {
    let mut offset = 0i64;
    loop {
        let byte = ctx.peek(offset, 1)?[0];
        if byte != b'#' {
            return Some(offset);
        }
        loop {
            if offset > URI_SCAN_LIMIT {
                return None;
            }
            let byte = ctx.peek(offset, 1)?[0];
            offset += 1;
            if byte == b'\n' {
                break;
            }
        }
    }
}

fn probe_uri_list<S: PeekSource + ?Sized>(ctx: &mut ProbeContext<'_, S>) {
    let Some(offset) = skip_comment_lines(ctx)
    else {
        return;
    };

    // Try successively smaller rolling windows; the scheme pattern needs at least 4 bytes
    // ("a://") but a 16-byte window is preferred when available.
    for size in [16usize, 8, 4] {
        if let Some(window) = ctx.peek(offset, size) {
            if is_uri_scheme_start(window) {
                ctx.suggest(crate::common::MAXIMUM, Label::new("text/uri-list"));
            }
            return;
        }
    }
}

const XML_PROLOG_WINDOW: usize = 256;

fn find_root_element(window: &[u8]) -> Option<&[u8]> {
    let mut i = 5; // past "<?xml"

    loop {
        while i < window.len() && window[i] != b'<' {
            i += 1;
        }
        if i >= window.len() {
            return None;
        }

        match window.get(i + 1) {
            Some(b'!') if window[i..].starts_with(b"<!--") => {
                // A comment body can contain '>' and even '<tag>'-shaped text; only its
                // literal "-->" terminator ends it.
                match window[i + 4..].windows(3).position(|w| w == b"-->") {
                    Some(rel) => i = i + 4 + rel + 3,
                    None => return None,
                }
            }
            Some(b'?') | Some(b'!') => {
                // Skip the whole `<?...>` or `<!...>` construction.
                while i < window.len() && window[i] != b'>' {
                    i += 1;
                }
                i += 1;
            }
            Some(&c) if c.is_ascii_alphabetic() => {
                let start = i + 1;
                let mut end = start;
                while end < window.len()
                    && (window[end].is_ascii_alphanumeric()
                        || matches!(window[end], b'-' | b'_' | b':'))
                {
                    end += 1;
                }
                return Some(&window[start..end]);
            }
            _ => return None,
        }
    }
}

/// The XML prolog probe (spec.md §4.4). `required_element` is `None` for the generic
/// `application/xml` case (explicit, per Design Notes §9, rather than an empty-string
/// comparison) or `Some(name)` for a format like SMIL that is recognized by its root element.
fn probe_xml<S: PeekSource + ?Sized>(
    ctx: &mut ProbeContext<'_, S>,
    required_element: Option<&'static str>,
    matched_label: &Label,
) {
    let Some(window) = ctx.peek(0, XML_PROLOG_WINDOW)
    else {
        return;
    };
    if !window.starts_with(b"<?xml") {
        return;
    }

    let Some(element) = find_root_element(window)
    else {
        return;
    };

    match required_element {
        Some(required) if element == required.as_bytes() => {
            ctx.suggest(crate::common::MAXIMUM, matched_label.clone());
        }
        Some(_) => {}
        None => ctx.suggest(MINIMUM, Label::new("application/xml")),
    }
}

pub fn register_all(registry: &mut Registry) -> Result<()> {
    registry.register(
        "plain-text",
        RANK_PRIMARY,
        &["txt"],
        Label::new("text/plain"),
        Box::new(|ctx| probe_plain_text(ctx)),
    )?;

    registry.register(
        "uri-list",
        RANK_PRIMARY,
        &["uri", "uris", "urls"],
        Label::new("text/uri-list"),
        Box::new(|ctx| probe_uri_list(ctx)),
    )?;

    registry.register(
        "xml-smil",
        RANK_PRIMARY,
        &["smil"],
        Label::new("application/smil"),
        Box::new(|ctx| probe_xml(ctx, Some("smil"), &Label::new("application/smil"))),
    )?;

    registry.register(
        "xml-generic",
        RANK_PRIMARY,
        &["xml"],
        Label::new("application/xml"),
        Box::new(|ctx| probe_xml(ctx, None, &Label::new("application/xml"))),
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peek::{SliceSource, TruncatedSource};

    fn registry() -> Registry {
        let mut reg = Registry::new();
        register_all(&mut reg).unwrap();
        reg
    }

    #[test]
    fn short_ascii_text_is_plain_text() {
        let data = b"The quick brown fox jumps over the lazy dog.".to_vec();
        let src = SliceSource::new(&data);
        let suggestions = registry().recognize(&src);
        let best = suggestions.iter().find(|s| s.label().name() == "text/plain").unwrap();
        assert_eq!(best.probability(), 95);
    }

    #[test]
    fn xml_prolog_is_masked_from_plain_text() {
        let data = b"<?xml version=\"1.0\"?><root/>".to_vec();
        let src = SliceSource::new(&data);
        let suggestions = registry().recognize(&src);
        assert!(!suggestions.iter().any(|s| s.label().name() == "text/plain"));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let data = vec![0xFF, 0xFE, 0xFD, 0x00, 0x01, 0x02, 0x41, 0x42, 0x43, 0x44, 0x45, 0x46,
            0x47, 0x48, 0x49, 0x4A, 0x4B, 0x4C];
        let src = SliceSource::new(&data);
        let suggestions = registry().recognize(&src);
        assert!(!suggestions.iter().any(|s| s.label().name() == "text/plain"));
    }

    #[test]
    fn truncated_source_degrades_confidence() {
        let mut data = vec![b'a'; 10 * 1024];
        data.extend_from_slice(b" trailing unseen text");
        // Only the first 9000 bytes are "buffered": the 32 KiB window is unavailable, forcing a
        // shrink and a probability below the un-shrunk 95.
        let src = TruncatedSource::new(&data, 9000, Some(data.len() as u64));
        let suggestions = registry().recognize(&src);
        let best = suggestions.iter().find(|s| s.label().name() == "text/plain");
        assert!(best.is_some());
        assert!(best.unwrap().probability() < 95);
    }

    #[test]
    fn uri_list_matches_after_comment_lines() {
        let data = b"# a comment\n# another\nhttp://example.com/resource\n".to_vec();
        let src = SliceSource::new(&data);
        let suggestions = registry().recognize(&src);
        assert!(suggestions
            .iter()
            .any(|s| s.label().name() == "text/uri-list" && s.probability() == crate::common::MAXIMUM));
    }

    #[test]
    fn uri_list_rejects_plain_comment_only_file() {
        let data = b"# just a comment, no uri here\n".to_vec();
        let src = SliceSource::new(&data);
        let suggestions = registry().recognize(&src);
        assert!(!suggestions.iter().any(|s| s.label().name() == "text/uri-list"));
    }

    #[test]
    fn smil_wins_over_generic_xml() {
        let data = b"<?xml version=\"1.0\"?><smil><body/></smil>".to_vec();
        let src = SliceSource::new(&data);
        let suggestions = registry().recognize(&src);

        let smil = suggestions.iter().find(|s| s.label().name() == "application/smil");
        let xml = suggestions.iter().find(|s| s.label().name() == "application/xml");
        assert_eq!(smil.unwrap().probability(), crate::common::MAXIMUM);
        assert_eq!(xml.unwrap().probability(), MINIMUM);

        let mut sink = crate::sink::Sink::new();
        for s in &suggestions {
            sink.suggest_ranked(RANK_PRIMARY, s.probability(), s.label().clone());
        }
        assert_eq!(sink.best().unwrap().label().name(), "application/smil");
    }

    #[test]
    fn generic_xml_with_other_root_element() {
        let data = b"<?xml version=\"1.0\"?><rss version=\"2.0\"/>".to_vec();
        let src = SliceSource::new(&data);
        let suggestions = registry().recognize(&src);
        assert!(!suggestions.iter().any(|s| s.label().name() == "application/smil"));
        assert!(suggestions
            .iter()
            .any(|s| s.label().name() == "application/xml" && s.probability() == MINIMUM));
    }

    #[test]
    fn tag_shaped_text_inside_a_comment_is_not_mistaken_for_the_root_element() {
        let data = b"<?xml version=\"1.0\"?><!-- > <smil> --><root/>".to_vec();
        let src = SliceSource::new(&data);
        let suggestions = registry().recognize(&src);
        assert!(!suggestions.iter().any(|s| s.label().name() == "application/smil"));
        assert!(suggestions
            .iter()
            .any(|s| s.label().name() == "application/xml" && s.probability() == MINIMUM));
    }
}
