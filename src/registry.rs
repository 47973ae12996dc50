// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `registry` module holds probe registrations and dispatches a recognition run across them
//! (spec.md §4.5/§4.6).

use log::debug;

use crate::common::Rank;
use crate::context::ProbeContext;
use crate::errors::{duplicate_name_error, Result};
use crate::label::Label;
use crate::peek::PeekSource;
use crate::sink::{Sink, Suggestion};

/// The signature every registered probe implements. Parameters specific to a single probe (a
/// magic pattern, a required element name, ...) are captured by the closure rather than threaded
/// through a `user_data` pointer, which is the idiomatic Rust analogue of the source's
/// `(probe_fn, user_data)` pair (see DESIGN.md).
pub type ProbeFn = Box<dyn Fn(&mut ProbeContext<'_, dyn PeekSource>) + Send + Sync>;

/// One registered probe: a name, its tie-breaking rank, the probe body, the filename extensions
/// it is associated with, and the label it falls back to for extension-only recognition.
pub struct Registration {
    name: String,
    rank: Rank,
    probe: ProbeFn,
    extensions: &'static [&'static str],
    default_label: Label,
}

impl Registration {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn extensions(&self) -> &'static [&'static str] {
        self.extensions
    }
}

/// Options controlling a dispatcher run (spec.md §4.5: "the dispatcher still runs remaining
/// probes unless a host policy caps at first MAXIMUM").
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RecognizeOptions {
    /// Stop running further probes as soon as one emits `MAXIMUM`.
    pub stop_at_first_maximum: bool,
}

/// `Registry` holds probe registrations for the lifetime of the process (spec.md §3
/// "Lifecycles": the registry lives for the process lifetime; it is immutable once built, so
/// concurrent read-only `recognize` calls from multiple threads are safe without locking, per
/// spec.md §5).
#[derive(Default)]
pub struct Registry {
    registrations: Vec<Registration>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    /// Register a probe. Fails with `DuplicateName` if `name` is already present.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        rank: Rank,
        extensions: &'static [&'static str],
        default_label: Label,
        probe: ProbeFn,
    ) -> Result<()> {
        let name = name.into();
        if self.registrations.iter().any(|r| r.name == name) {
            return duplicate_name_error(&name);
        }
        self.registrations.push(Registration { name, rank, probe, extensions, default_label });
        Ok(())
    }

    /// Registrations ordered for a dispatch: descending rank, ties broken by registration order.
    fn ordered(&self) -> Vec<&Registration> {
        let mut ordered: Vec<&Registration> = self.registrations.iter().collect();
        ordered.sort_by(|a, b| b.rank.cmp(&a.rank));
        ordered
    }

    /// Run every registered probe (in descending rank order) against `source` and return every
    /// suggestion produced.
    pub fn recognize(&self, source: &dyn PeekSource) -> Vec<Suggestion> {
        self.recognize_with_options(source, &RecognizeOptions::default())
    }

    /// Like [`Registry::recognize`], honoring `opts`.
    pub fn recognize_with_options(
        &self,
        source: &dyn PeekSource,
        opts: &RecognizeOptions,
    ) -> Vec<Suggestion> {
        let mut sink = Sink::new();

        for reg in self.ordered() {
            let before = sink.suggestions().len();
            let mut ctx = ProbeContext::new(source, &mut sink, reg.rank);
            (reg.probe)(&mut ctx);

            if log::log_enabled!(log::Level::Debug) && sink.suggestions().len() > before {
                debug!("probe '{}' produced {} suggestion(s)", reg.name, sink.suggestions().len() - before);
            }

            if opts.stop_at_first_maximum
                && sink.suggestions()[before..]
                    .iter()
                    .any(|s| s.probability() == crate::common::MAXIMUM)
            {
                break;
            }
        }

        sink.into_suggestions()
    }

    /// Return suggestions, at [`crate::common::LIKELY`], from every probe whose extension hints
    /// include `filename`'s extension. Content is never inspected.
    pub fn recognize_by_extension(&self, filename: &str) -> Vec<Suggestion> {
        let ext = match filename.rsplit_once('.') {
            Some((_, ext)) => ext.to_ascii_lowercase(),
            None => return Vec::new(),
        };

        let mut sink = Sink::new();
        for reg in self.ordered() {
            if reg.extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext)) {
                sink.suggest_ranked(reg.rank, crate::common::LIKELY, reg.default_label.clone());
            }
        }
        sink.into_suggestions()
    }
}
