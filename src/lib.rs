// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Content-based media type recognition.
//!
//! This crate probes a byte source — content, a filename, or both — and returns a ranked list of
//! [`Suggestion`]s describing what media type it likely holds. It is organized around a handful
//! of ideas (spec.md §3):
//!
//! - A [`Registry`] holds probe registrations for the lifetime of the process. Probes register at
//!   startup and the registry is read-only thereafter, so concurrent recognition runs from
//!   multiple threads need no locking.
//! - Each probe is a pure function over a [`ProbeContext`]: a bounds-checked, read-only window
//!   into the source plus a place to record suggestions. Probes never block and never mutate
//!   their input.
//! - A [`Label`] names a media type and carries structured attributes (`mpegversion`,
//!   `systemstream`, `endianness`, ...); the engine never interprets a label's contents.
//!
//! Most callers only need [`recognize_full`] or [`recognize_by_extension`], run against the
//! crate-wide default registry built from every probe in [`probes`]. Embedders that want a custom
//! probe set can build their own [`Registry`] directly.
//!
//! ```
//! use symphonia_typefind::{recognize_full, peek::SliceSource};
//!
//! let data = [0xFFu8, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
//! let src = SliceSource::new(&data);
//! let suggestions = recognize_full(&src);
//! assert!(suggestions.iter().any(|s| s.label().name() == "image/jpeg"));
//! ```

pub mod common;
pub mod config;
pub mod context;
pub mod errors;
pub mod kernels;
pub mod label;
pub mod peek;
pub mod probes;
pub mod registry;
pub mod sink;

pub use common::{Probability, Rank};
pub use context::ProbeContext;
pub use errors::{Result, TypeFindError};
pub use label::{AttributeValue, Label};
pub use peek::PeekSource;
pub use registry::{ProbeFn, RecognizeOptions, Registration, Registry};
pub use sink::Suggestion;

use once_cell::sync::Lazy;

/// The crate-wide default registry: every probe in [`probes::default_registry`], built once and
/// shared across calls. Building it can only fail on a duplicate probe name, which would be a bug
/// in this crate rather than a runtime condition callers need to handle, so a failure here panics
/// at first use rather than threading a `Result` through every public entry point.
static DEFAULT_REGISTRY: Lazy<Registry> =
    Lazy::new(|| probes::default_registry().expect("default probe registrations are well-formed"));

/// Run every probe in the default registry against `source` and return every suggestion produced,
/// in descending-rank dispatch order. This is the primary entry point (spec.md §4.6); it
/// considers only content, never a filename.
pub fn recognize_full(source: &dyn PeekSource) -> Vec<Suggestion> {
    DEFAULT_REGISTRY.recognize(source)
}

/// Like [`recognize_full`], honoring `opts` (e.g. stopping dispatch at the first `MAXIMUM`
/// suggestion).
pub fn recognize_with_options(
    source: &dyn PeekSource,
    opts: &RecognizeOptions,
) -> Vec<Suggestion> {
    DEFAULT_REGISTRY.recognize_with_options(source, opts)
}

/// Return suggestions, at [`common::LIKELY`], from every default-registry probe whose extension
/// hints include `filename`'s extension. Content is never inspected.
pub fn recognize_by_extension(filename: &str) -> Vec<Suggestion> {
    DEFAULT_REGISTRY.recognize_by_extension(filename)
}
