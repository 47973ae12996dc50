// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `common` module defines the probability and rank scales shared by every probe.

/// `Probability` is an integer confidence score in `[MINIMUM, MAXIMUM]`.
///
/// Probes may compute intermediate values outside this range (e.g. an average of two scaled
/// terms); [`clamp_probability`] brings such a value back into range before it is emitted as a
/// [`crate::sink::Suggestion`].
pub type Probability = u8;

/// No suggestion should be made; equivalent to omitting a suggestion entirely.
pub const NONE: Probability = 0;
/// The lowest non-zero confidence a probe may emit.
pub const MINIMUM: Probability = 1;
/// A middling confidence: the data is plausible but commonly confused with another format.
pub const POSSIBLE: Probability = 50;
/// High confidence: the data matches a format's structural invariants but wasn't exhaustively
/// verified.
pub const LIKELY: Probability = 80;
/// Near certainty: exhaustive structural verification succeeded.
pub const NEARLY_CERTAIN: Probability = 99;
/// Absolute certainty: an unambiguous, unique magic sequence matched exactly.
pub const MAXIMUM: Probability = 100;

/// Clamp a probability-like value into `[MINIMUM, MAXIMUM]`.
///
/// A value of exactly `0` is passed through unclamped: callers that intend to suppress a
/// suggestion entirely should return `NONE` directly rather than rely on clamping, since the
/// [`crate::sink::Sink`] silently discards probability-0 suggestions per the data model.
pub fn clamp_probability(p: i32) -> Probability {
    if p <= 0 {
        NONE
    }
    else {
        p.clamp(i32::from(MINIMUM), i32::from(MAXIMUM)) as Probability
    }
}

/// Average two probabilities and clamp the result into `[MINIMUM, MAXIMUM]`.
///
/// Centralizes the "average-then-clamp" arithmetic that spec.md's UTF-8 and MP3 probes both
/// perform, per Design Notes §9.
pub fn average_probability(a: Probability, b: Probability) -> Probability {
    clamp_probability((i32::from(a) + i32::from(b)) / 2)
}

/// `Rank` is a registration-time priority controlling probe execution order and suggestion
/// tie-breaking. Higher ranks run, and win ties, before lower ones.
pub type Rank = i32;

/// The probe should not be used unless no other probe claims the format.
pub const RANK_NONE: Rank = 0;
/// A marginal, easily-confused probe (e.g. extremely short or generic magic).
pub const RANK_MARGINAL: Rank = 64;
/// A probe for a well-defined but secondary format.
pub const RANK_SECONDARY: Rank = 128;
/// The default rank for most format probes.
pub const RANK_PRIMARY: Rank = 256;

/// Compute a rank above [`RANK_PRIMARY`] by `n`, for probes that should be preferred over the
/// common case (e.g. a highly specific container sub-type).
pub const fn rank_primary_plus(n: Rank) -> Rank {
    RANK_PRIMARY + n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_keeps_in_range_values() {
        assert_eq!(clamp_probability(50), 50);
        assert_eq!(clamp_probability(1), MINIMUM);
        assert_eq!(clamp_probability(100), MAXIMUM);
    }

    #[test]
    fn clamp_pulls_out_of_range_values_in() {
        assert_eq!(clamp_probability(200), MAXIMUM);
        assert_eq!(clamp_probability(-5), NONE);
        assert_eq!(clamp_probability(0), NONE);
    }

    #[test]
    fn average_clamps() {
        assert_eq!(average_probability(MAXIMUM, MAXIMUM), MAXIMUM);
        assert_eq!(average_probability(90, 100), 95);
    }
}
