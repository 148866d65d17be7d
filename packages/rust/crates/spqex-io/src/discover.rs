//! Source file discovery.
//!
//! Walks a root directory with `walkdir`, keeping files whose extension
//! matches and pruning skipped directories before they are descended into.

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::IoError;

/// Options for file discovery.
#[derive(Debug, Clone)]
pub struct DiscoverOptions {
    /// File extensions to include, with or without the leading dot.
    pub extensions: Vec<String>,
    /// Skip hidden files and directories (names starting with `.`).
    pub skip_hidden: bool,
    /// Directory names that are pruned entirely.
    pub skip_dirs: Vec<String>,
}

impl Default for DiscoverOptions {
    fn default() -> Self {
        Self {
            extensions: vec!["go".to_string()],
            skip_hidden: true,
            skip_dirs: vec!["testdata".to_string()],
        }
    }
}

impl DiscoverOptions {
    fn matches_extension(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.extensions
            .iter()
            .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }

    fn is_pruned(&self, entry: &DirEntry) -> bool {
        // The root itself is never pruned, even when it is "." or hidden.
        if entry.depth() == 0 {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        if self.skip_hidden && name.starts_with('.') {
            return true;
        }
        entry.file_type().is_dir() && self.skip_dirs.iter().any(|skip| *skip == name)
    }
}

/// Discover files under `root` matching `options`, sorted by path.
///
/// A `root` that is itself a file is returned as-is when its extension
/// matches.
///
/// # Errors
/// `IoError::NotFound` when `root` does not exist, `IoError::Walk` when a
/// directory cannot be read.
pub fn discover_files<P: AsRef<Path>>(
    root: P,
    options: &DiscoverOptions,
) -> Result<Vec<PathBuf>, IoError> {
    let root = root.as_ref();
    if !root.exists() {
        return Err(IoError::NotFound(root.to_string_lossy().to_string()));
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| !options.is_pruned(entry));

    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && options.matches_extension(entry.path()) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    tracing::debug!(root = %root.display(), count = files.len(), "discovered files");
    Ok(files)
}

/// Discover Go sources under `root`, skipping `testdata` and hidden directories.
///
/// # Errors
/// See [`discover_files`].
pub fn discover_go_files<P: AsRef<Path>>(root: P) -> Result<Vec<PathBuf>, IoError> {
    discover_files(root, &DiscoverOptions::default())
}
