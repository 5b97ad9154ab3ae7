use anyhow::Result;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Finds definition files of one kind below a directory.
pub struct FileScanner {
    extension: String,
}

impl FileScanner {
    pub fn new() -> Self {
        Self {
            extension: "py".to_string(),
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Every file named `<prefix>*.<extension>` below `root_path`, sorted.
    pub fn scan_directory(&self, root_path: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
        let entries: Vec<_> = WalkDir::new(root_path)
            .follow_links(false)
            .into_iter()
            .collect::<std::result::Result<_, _>>()?;

        let mut files: Vec<PathBuf> = entries
            .par_iter()
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let path = entry.path();
                let matches_extension = path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext == self.extension);
                let matches_prefix = path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(prefix));
                (matches_extension && matches_prefix).then(|| path.to_path_buf())
            })
            .collect();

        files.sort();
        Ok(files)
    }
}

impl Default for FileScanner {
    fn default() -> Self {
        Self::new()
    }
}
