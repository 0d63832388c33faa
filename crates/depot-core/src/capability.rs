//! Access capabilities.

use std::fmt;

/// A per-project access capability.
///
/// Read and write are independent grants backed by independent list files;
/// membership in one implies nothing about the other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Download artifacts and enumerate versions/files.
    Read,
    /// Upload artifacts and create versions.
    Write,
}

impl Capability {
    /// The access-list file backing this capability inside a project directory.
    pub fn list_file(self) -> &'static str {
        match self {
            Self::Read => "readers.txt",
            Self::Write => "writers.txt",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => f.write_str("read"),
            Self::Write => f.write_str("write"),
        }
    }
}
