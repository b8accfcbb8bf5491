//! Lists the direct children of each configured folder.

use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, Clone, Default)]
pub struct FolderListing {
    pub files: Vec<PathBuf>,
    pub skipped_dirs: Vec<PathBuf>,
}

/// Regular files directly under `root`, sorted by name. Subdirectories are not
/// descended into; they are returned in `skipped_dirs`. A missing or unreadable
/// folder gives an empty listing.
pub fn list_folder(root: &Path) -> FolderListing {
    let mut listing = FolderListing::default();
    if !root.is_dir() {
        debug!("Folder {:?} does not exist or is not a directory", root);
        return listing;
    }
    for entry in WalkDir::new(root)
        .follow_links(true)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                debug!("Skipping unreadable entry under {:?}: {}", root, err);
                continue;
            }
        };
        if entry.file_type().is_dir() {
            listing.skipped_dirs.push(entry.into_path());
        } else if entry.file_type().is_file() {
            listing.files.push(entry.into_path());
        }
    }
    listing
}
