//! Project folder layout.
//!
//! # Responsibility
//! - Resolve the directories derived files are read from and written to.
//!
//! # Invariants
//! - Document text lives in `<project>/content/<handle>.nwd`.

use crate::model::handle::Handle;
use std::path::{Path, PathBuf};

/// Name of the content folder inside a project.
pub const CONTENT_DIR_NAME: &str = "content";
/// Extension of document text files.
pub const DOCUMENT_FILE_EXT: &str = "nwd";
/// Name of the table of contents file written to the runtime folder.
pub const TOC_FILE_NAME: &str = "ToC.txt";

/// Directory layout of one project on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectStorage {
    project_path: PathBuf,
}

impl ProjectStorage {
    pub fn new(project_path: impl Into<PathBuf>) -> Self {
        Self {
            project_path: project_path.into(),
        }
    }

    pub fn project_path(&self) -> &Path {
        self.project_path.as_path()
    }

    /// Folder holding one text file per document handle.
    pub fn content_path(&self) -> PathBuf {
        self.project_path.join(CONTENT_DIR_NAME)
    }

    /// Folder for derived, regenerable files.
    pub fn runtime_path(&self) -> PathBuf {
        self.project_path.clone()
    }

    /// File name of the document text for `handle`.
    pub fn document_file_name(handle: &Handle) -> String {
        format!("{handle}.{DOCUMENT_FILE_EXT}")
    }

    /// Absolute path of the document text for `handle`.
    pub fn document_path(&self, handle: &Handle) -> PathBuf {
        self.content_path().join(Self::document_file_name(handle))
    }

    /// Path of the document text relative to the project folder.
    pub fn relative_document_path(handle: &Handle) -> PathBuf {
        Path::new(CONTENT_DIR_NAME).join(Self::document_file_name(handle))
    }
}

#[cfg(test)]
mod tests {
    use super::ProjectStorage;
    use crate::model::handle::Handle;
    use std::path::Path;

    #[test]
    fn document_paths_follow_content_layout() {
        let storage = ProjectStorage::new("/tmp/novel");
        let handle = Handle::parse("000000000000a").expect("valid handle");

        assert_eq!(storage.content_path(), Path::new("/tmp/novel/content"));
        assert_eq!(
            storage.document_path(&handle),
            Path::new("/tmp/novel/content/000000000000a.nwd")
        );
        assert_eq!(
            ProjectStorage::relative_document_path(&handle),
            Path::new("content/000000000000a.nwd")
        );
    }
}
