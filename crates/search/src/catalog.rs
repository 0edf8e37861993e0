use crate::error::{Result, SearchError};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Enumerates corpus files under a root directory
pub struct FileCatalog {
    root: PathBuf,
    extension: String,
}

impl FileCatalog {
    pub fn new(root: impl AsRef<Path>, extension: impl Into<String>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            extension: extension.into(),
        }
    }

    /// Walk the whole tree and collect files ending in `.<extension>`.
    ///
    /// Enumeration is all-or-nothing: the first traversal error aborts the
    /// walk and no partial list is returned.
    pub fn list_files(&self) -> Result<Vec<PathBuf>> {
        let suffix = format!(".{}", self.extension);
        let mut files = Vec::new();

        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|source| SearchError::Catalog {
                path: self.root.clone(),
                source,
            })?;

            if !Self::is_regular_file(&entry) {
                continue;
            }

            // Byte comparison keeps names that are not valid UTF-8.
            let matches_extension = entry
                .file_name()
                .as_encoded_bytes()
                .ends_with(suffix.as_bytes());
            if !matches_extension {
                continue;
            }

            files.push(entry.into_path());
        }

        log::info!(
            "Found {} .{} files under {}",
            files.len(),
            self.extension,
            self.root.display()
        );
        Ok(files)
    }

    fn is_regular_file(entry: &walkdir::DirEntry) -> bool {
        let file_type = entry.file_type();
        if file_type.is_file() {
            return true;
        }
        // Symlinks count only when they resolve to a regular file.
        file_type.is_symlink() && entry.path().is_file()
    }
}

/// Convenience wrapper over [`FileCatalog::list_files`].
pub fn list_files(root: impl AsRef<Path>, extension: &str) -> Result<Vec<PathBuf>> {
    FileCatalog::new(root, extension).list_files()
}
