//! On-disk layout of the state directory.
//!
//! ```text
//! <root>/<project>/readers.txt
//! <root>/<project>/writers.txt
//! <root>/<project>/versions/<version>/files/<filename>
//! ```
//!
//! All joins take validated name newtypes, so every constructed path stays
//! inside the root by construction. Raw strings never reach this module.

use depot_core::{Capability, FileName, ProjectName, VersionName, FILES_DIR, VERSIONS_DIR};
use std::path::{Path, PathBuf};

/// Path construction relative to the configured state root.
#[derive(Clone, Debug)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    /// Create a layout rooted at the given state directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The state directory root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<project>`
    pub fn project_dir(&self, project: &ProjectName) -> PathBuf {
        self.root.join(project)
    }

    /// `<root>/<project>/readers.txt` or `writers.txt`
    pub fn access_list(&self, project: &ProjectName, capability: Capability) -> PathBuf {
        self.project_dir(project).join(capability.list_file())
    }

    /// `<root>/<project>/versions`
    pub fn versions_dir(&self, project: &ProjectName) -> PathBuf {
        self.project_dir(project).join(VERSIONS_DIR)
    }

    /// `<root>/<project>/versions/<version>/files`
    pub fn files_dir(&self, project: &ProjectName, version: &VersionName) -> PathBuf {
        self.versions_dir(project).join(version).join(FILES_DIR)
    }

    /// `<root>/<project>/versions/<version>/files/<filename>`
    pub fn file_path(
        &self,
        project: &ProjectName,
        version: &VersionName,
        file: &FileName,
    ) -> PathBuf {
        self.files_dir(project, version).join(file)
    }
}
