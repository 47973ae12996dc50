// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! RIFF-container probes (spec.md §4.3): WAV, AVI, CDXA, and DSMF all share RIFF's
//! "magic, size, form tag" layout, realized once via the `riff_form` kernel; AIFF/AIFC/8SVX/16SV
//! share the same layout under the IFF `FORM` magic instead.

use crate::common::RANK_PRIMARY;
use crate::errors::Result;
use crate::kernels::{iff_form, riff_form};
use crate::label::Label;
use crate::registry::Registry;

pub fn register_all(registry: &mut Registry) -> Result<()> {
    registry.register(
        "wav",
        RANK_PRIMARY,
        &["wav"],
        Label::new("audio/x-wav"),
        Box::new(|ctx| riff_form(ctx, b"WAVE", Label::new("audio/x-wav"))),
    )?;

    registry.register(
        "avi",
        RANK_PRIMARY,
        &["avi"],
        Label::new("video/x-msvideo"),
        Box::new(|ctx| riff_form(ctx, b"AVI ", Label::new("video/x-msvideo"))),
    )?;

    registry.register(
        "cdxa",
        RANK_PRIMARY,
        &["dat"],
        Label::new("application/x-cdxa"),
        Box::new(|ctx| riff_form(ctx, b"CDXA", Label::new("application/x-cdxa"))),
    )?;

    registry.register(
        "dsmf",
        RANK_PRIMARY,
        &["dsm"],
        Label::new("audio/x-dsmf"),
        Box::new(|ctx| riff_form(ctx, b"DSMF", Label::new("audio/x-dsmf"))),
    )?;

    registry.register(
        "aiff",
        RANK_PRIMARY,
        &["aif", "aiff"],
        Label::new("audio/x-aiff"),
        Box::new(|ctx| iff_form(ctx, b"AIFF", Label::new("audio/x-aiff"))),
    )?;

    registry.register(
        "aifc",
        RANK_PRIMARY,
        &["aifc"],
        Label::new("audio/x-aifc"),
        Box::new(|ctx| iff_form(ctx, b"AIFC", Label::new("audio/x-aifc"))),
    )?;

    registry.register(
        "8svx",
        RANK_PRIMARY,
        &["8sv", "8svx"],
        Label::new("audio/x-8svx"),
        Box::new(|ctx| iff_form(ctx, b"8SVX", Label::new("audio/x-8svx"))),
    )?;

    registry.register(
        "16sv",
        RANK_PRIMARY,
        &["16sv"],
        Label::new("audio/x-16sv"),
        Box::new(|ctx| iff_form(ctx, b"16SV", Label::new("audio/x-16sv"))),
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::MAXIMUM;
    use crate::peek::SliceSource;

    fn registry() -> Registry {
        let mut reg = Registry::new();
        register_all(&mut reg).unwrap();
        reg
    }

    #[test]
    fn wav_matches() {
        let data = b"RIFF\x24\x00\x00\x00WAVEfmt ".to_vec();
        let src = SliceSource::new(&data);
        let suggestions = registry().recognize(&src);
        assert!(suggestions
            .iter()
            .any(|s| s.label().name() == "audio/x-wav" && s.probability() == MAXIMUM));
    }

    #[test]
    fn avi_matches_and_wav_does_not() {
        let data = b"RIFF\x24\x00\x00\x00AVI LIST".to_vec();
        let src = SliceSource::new(&data);
        let suggestions = registry().recognize(&src);
        assert!(suggestions.iter().any(|s| s.label().name() == "video/x-msvideo"));
        assert!(!suggestions.iter().any(|s| s.label().name() == "audio/x-wav"));
    }

    #[test]
    fn aiff_matches_form_magic() {
        let data = b"FORM\x00\x00\x00\x00AIFFCOMM".to_vec();
        let src = SliceSource::new(&data);
        let suggestions = registry().recognize(&src);
        assert!(suggestions.iter().any(|s| s.label().name() == "audio/x-aiff"));
    }

    #[test]
    fn short_input_yields_nothing() {
        let src = SliceSource::new(b"RIFF");
        assert!(registry().recognize(&src).is_empty());
    }
}
