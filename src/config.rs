// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scan-depth configuration, grounded in `symphonia_core::probe::ProbeOptions`.
//!
//! Every scan-depth cap in this crate (spec.md §6) is an invariant of the algorithm it bounds —
//! MP3's `TRY_SYNC` window, for instance, is baked into that probe's confidence formula, not a
//! knob a host can safely retune without also re-deriving the formula. Unlike the teacher, which
//! exposes a host-tunable `max_probe_depth` consumed by its format readers, this crate's probes
//! never read a depth cap back from anywhere, so no such field is exposed here; it would be dead
//! API. [`scan_depths`] instead documents each probe's own constant for reference.

/// The built-in scan-depth caps named in spec.md §6, gathered here for reference; each probe
/// module defines and uses its own copy of the relevant constant rather than reading through this
/// table, since the values are part of each probe's algorithm.
pub mod scan_depths {
    /// MP3: bytes scanned while searching for a frame sync word (`probes::mp3::TRY_SYNC`).
    pub const MP3_SYNC_SCAN: usize = 10_000;
    /// MPEG-1/2 program stream: bytes scanned for a pack start code (`probes::mpeg_ps::SCAN_LIMIT`).
    pub const MPEG_PS_SCAN: usize = 100 * 1024;
    /// UTF-8 text: starting window size for the confidence-decay scan (`probes::text::UTF8_START_WINDOW`).
    pub const UTF8_SCAN: usize = 32 * 1024;
    /// AAC ADTS/ADIF: fixed scan window (`probes::aac::SCAN_WINDOW`).
    pub const AAC_SCAN: usize = 4096;
    /// MPEG-1/2/4 video: bytes scanned while counting pictures (`probes::mpeg_video::PICTURE_SCAN_LIMIT`).
    pub const MPEG_VIDEO_PICTURE_SCAN: usize = 64 * 1024;
}
