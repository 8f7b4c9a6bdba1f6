use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::fixture::FIXTURE_EXTENSION;

/// Recursively scans `root` for `.irt` fixture files.
///
/// Symlinked directories are not descended into, but a symlink to a fixture
/// file is collected under its own path. Directories that cannot be read are logged and
/// contribute nothing; discovery itself never fails. The result is sorted by
/// full path, byte-wise, so execution order is stable across runs.
pub fn discover_fixtures<P: AsRef<Path>>(root: P) -> Vec<PathBuf> {
    let root = root.as_ref();
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(root = %root.display(), error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| is_file_entry(entry) && is_fixture_file(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    files.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
    debug!(root = %root.display(), count = files.len(), "discovered fixtures");
    files
}

fn is_file_entry(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())
}

/// Returns true if the given path has the fixture extension.
fn is_fixture_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == FIXTURE_EXTENSION)
}
