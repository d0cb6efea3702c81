//! Locating and reading input documents.

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Expand `paths` into the documents to analyse.
///
/// Files are checked for existence and extension. Directories are scanned recursively for
/// files carrying one of `extensions`. An empty `paths` scans the working directory. The result
/// is sorted and free of duplicates.
///
/// # Errors
///
/// Returns an error for a missing path, a file with the wrong extension, or an unreadable
/// directory.
pub fn find_documents(paths: &[PathBuf], extensions: &[String]) -> Result<Vec<PathBuf>> {
    let default_root = [PathBuf::from(".")];
    let roots = if paths.is_empty() {
        &default_root[..]
    } else {
        paths
    };

    let mut documents = Vec::new();
    for root in roots {
        if root.is_dir() {
            scan_directory(root, extensions, &mut documents)?;
        } else {
            verify_document_path(root, extensions)?;
            documents.push(root.clone());
        }
    }
    documents.sort();
    documents.dedup();
    Ok(documents)
}

/// Check that `path` exists and has one of `extensions`.
///
/// # Errors
///
/// Returns [`Error::NotFound`] or [`Error::UnsupportedExtension`].
pub fn verify_document_path(path: &Path, extensions: &[String]) -> Result<()> {
    if !path.exists() {
        return Err(Error::NotFound {
            path: path.to_path_buf(),
        });
    }
    if !has_extension(path, extensions) {
        return Err(Error::UnsupportedExtension {
            path: path.to_path_buf(),
            expected: extensions.join(", ."),
        });
    }
    Ok(())
}

/// Read a document as UTF-8 text.
///
/// # Errors
///
/// Returns [`Error::Io`] naming the path on failure.
pub fn read_document(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.trim_start_matches('.') == ext))
}

fn scan_directory(root: &Path, extensions: &[String], found: &mut Vec<PathBuf>) -> Result<()> {
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let entries = fs::read_dir(&dir).map_err(|source| Error::Io {
            path: dir.clone(),
            source,
        })?;
        for entry in entries {
            let path = entry
                .map_err(|source| Error::Io {
                    path: dir.clone(),
                    source,
                })?
                .path();
            if path.is_dir() {
                pending.push(path);
            } else if has_extension(&path, extensions) {
                found.push(path);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/input.rs"]
mod tests;
