// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `sink` module accumulates `(probability, label)` suggestions produced during a single
//! recognition run.

use crate::common::{Probability, Rank};
use crate::label::Label;

/// A single `(probability, label)` pair produced by a probe, annotated with the rank and
/// registration order of the probe that produced it (used only for [`Sink::best`] tie-breaking;
/// the label itself carries no notion of rank).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Suggestion {
    pub probability: Probability,
    pub label: Label,
    pub(crate) rank: Rank,
    pub(crate) order: usize,
}

impl Suggestion {
    pub fn probability(&self) -> Probability {
        self.probability
    }

    pub fn label(&self) -> &Label {
        &self.label
    }
}

/// `Sink` accumulates suggestions emitted within a single recognition run.
///
/// Suggestions with `probability == 0` are silently dropped per the data model; everything else
/// is preserved in the order it was produced.
#[derive(Default)]
pub struct Sink {
    suggestions: Vec<Suggestion>,
}

impl Sink {
    pub fn new() -> Self {
        Sink::default()
    }

    /// Record a suggestion from a probe registered at `rank`. `probability == 0` is a no-op.
    pub(crate) fn suggest_ranked(&mut self, rank: Rank, probability: Probability, label: Label) {
        if probability == 0 {
            return;
        }
        let order = self.suggestions.len();
        self.suggestions.push(Suggestion { probability, label, rank, order });
    }

    /// All suggestions recorded so far, in production order.
    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    /// Consume the sink and return the accumulated suggestions.
    pub fn into_suggestions(self) -> Vec<Suggestion> {
        self.suggestions
    }

    /// The highest-probability suggestion, tie-broken by registration rank, then insertion
    /// order.
    pub fn best(&self) -> Option<&Suggestion> {
        self.suggestions
            .iter()
            .max_by_key(|s| (s.probability, s.rank, std::cmp::Reverse(s.order)))
    }
}
