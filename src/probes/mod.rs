// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The probe catalog: ~40 format detectors grouped by family (spec.md §4.4), plus the
//! data-driven table that wires the trivial magic-only probes into a [`Registry`]
//! (Design Notes §9: "macro-generated probe families → data-driven registry").

mod aac;
mod archive;
mod dv;
mod id3;
mod isobmff;
mod mkv;
mod mpeg_ps;
mod mpeg_video;
mod mp3;
mod ogg;
mod riff;
mod text;
mod tracker;
mod trivial;
mod wavpack;

use crate::errors::Result;
use crate::registry::Registry;

/// Build a [`Registry`] with every probe described by spec.md §4.4 registered at its natural
/// rank. This is the table-driven startup path referenced throughout spec.md: every probe here is
/// a pure function over `(ProbeContext, closure-captured parameters)`, registered once.
pub fn default_registry() -> Result<Registry> {
    let mut registry = Registry::new();

    trivial::register_all(&mut registry)?;
    riff::register_all(&mut registry)?;
    text::register_all(&mut registry)?;
    id3::register_all(&mut registry)?;
    mp3::register_all(&mut registry)?;
    aac::register_all(&mut registry)?;
    mpeg_ps::register_all(&mut registry)?;
    mpeg_video::register_all(&mut registry)?;
    isobmff::register_all(&mut registry)?;
    mkv::register_all(&mut registry)?;
    ogg::register_all(&mut registry)?;
    wavpack::register_all(&mut registry)?;
    dv::register_all(&mut registry)?;
    tracker::register_all(&mut registry)?;
    archive::register_all(&mut registry)?;

    Ok(registry)
}
