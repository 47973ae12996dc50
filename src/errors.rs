// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `errors` module defines the common error type used throughout type-finding.

use std::fmt;
use std::result;

/// `TypeFindError` enumerates all possible errors reported while registering probes or running a
/// recognition. Per-probe failures (bad magic, out-of-range peek) never reach this type; they are
/// swallowed at the probe boundary and simply produce no suggestion.
#[derive(Debug)]
pub enum TypeFindError {
    /// The byte source could not supply the requested window.
    Unavailable,
    /// A probe's structural validation failed.
    MalformedHeader(&'static str),
    /// A second registration used a name already present in the registry.
    DuplicateName(String),
    /// A label could not be constructed from the given attributes.
    InvalidLabel(String),
}

impl fmt::Display for TypeFindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeFindError::Unavailable => write!(f, "requested byte window is unavailable"),
            TypeFindError::MalformedHeader(msg) => write!(f, "malformed header: {}", msg),
            TypeFindError::DuplicateName(name) => {
                write!(f, "a probe named '{}' is already registered", name)
            }
            TypeFindError::InvalidLabel(msg) => write!(f, "invalid label: {}", msg),
        }
    }
}

impl std::error::Error for TypeFindError {}

pub type Result<T> = result::Result<T, TypeFindError>;

/// Convenience function to create an unavailable-window error.
pub fn unavailable_error<T>() -> Result<T> {
    Err(TypeFindError::Unavailable)
}

/// Convenience function to create a malformed-header error.
pub fn malformed_error<T>(desc: &'static str) -> Result<T> {
    Err(TypeFindError::MalformedHeader(desc))
}

/// Convenience function to create a duplicate-name registration error.
pub fn duplicate_name_error<T>(name: &str) -> Result<T> {
    Err(TypeFindError::DuplicateName(name.to_owned()))
}

/// Convenience function to create an invalid-label error.
pub fn invalid_label_error<T>(desc: &str) -> Result<T> {
    Err(TypeFindError::InvalidLabel(desc.to_owned()))
}
