use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Recursively collects every regular file under `root`.
///
/// Directories are descended into, never reported, and no order is
/// guaranteed. Any enumeration error (unreadable directory, missing root)
/// aborts the scan; callers treat that as fatal for the run.
pub fn collect_files(root: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    visit_dir(root, &mut files)?;
    debug!(root = %root.display(), entries = files.len(), "Inbox scan complete");
    Ok(files)
}

fn visit_dir(dir: &Path, results: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry_res in fs::read_dir(dir)? {
        let entry = entry_res?;
        let path = entry.path();
        if path.is_dir() {
            visit_dir(&path, results)?;
        } else {
            results.push(path);
        }
    }
    Ok(())
}
