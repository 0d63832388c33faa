//! Validated name segments for projects, versions, and artifact files.
//!
//! All three segment kinds share the same rule: non-empty, ASCII letters,
//! digits, `-`, `_`, or `.`, with no leading `.`. This rules out `.` and
//! `..` as well as anything containing a path separator, so a validated
//! name can be joined onto a directory path without further checks. The
//! check runs at construction time, strictly before any filesystem access.

use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;

/// Validate a single path segment against the allowed charset.
fn validate_segment(kind: &str, s: &str) -> Result<()> {
    if s.is_empty() {
        return Err(Error::InvalidName(format!("empty {kind}")));
    }
    if s.starts_with('.') {
        return Err(Error::InvalidName(format!(
            "{kind} must not start with '.': {s:?}"
        )));
    }
    if !s
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err(Error::InvalidName(format!(
            "{kind} contains disallowed characters: {s:?}"
        )));
    }
    Ok(())
}

macro_rules! name_type {
    ($(#[$doc:meta])* $name:ident, $kind:literal) => {
        $(#[$doc])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Validate and wrap a raw segment.
            pub fn new(s: impl Into<String>) -> Result<Self> {
                let s = s.into();
                validate_segment($kind, &s)?;
                Ok(Self(s))
            }

            /// The validated segment as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<std::path::Path> for $name {
            fn as_ref(&self) -> &std::path::Path {
                self.0.as_ref()
            }
        }
    };
}

name_type!(
    /// A validated project name.
    ProjectName,
    "project name"
);
name_type!(
    /// A validated version name.
    VersionName,
    "version name"
);
name_type!(
    /// A validated artifact file name.
    FileName,
    "file name"
);
