use std::io;
use std::path::Path;

use crate::use_enabled_fs_module;

use_enabled_fs_module!();

use crate::error::FixtureTeardownError;


/// Recursively removes a fixture root directory and everything under it.
///
/// Removal is idempotent: a root that no longer exists counts as already
/// removed. Symbolic links inside the tree are removed as links and never
/// followed, so content outside the root is left untouched even when a test
/// links to it. Read-only files are removed as well, see
/// [`remove_non_directory_entry`].
pub(crate) fn remove_directory_tree(root_path: &Path) -> Result<(), FixtureTeardownError> {
    // `try_exists` instead of `exists` so permission and other IO errors
    // surface as teardown errors instead of being mistaken for a missing root.
    match root_path.try_exists() {
        Ok(true) => {}
        Ok(false) => return Ok(()),
        Err(error) => {
            return Err(FixtureTeardownError::UnableToInspectPath {
                path: root_path.to_path_buf(),
                error,
            });
        }
    }

    remove_directory_recursively(root_path)
}


fn remove_directory_recursively(directory_path: &Path) -> Result<(), FixtureTeardownError> {
    let directory_reader = fs::read_dir(directory_path).map_err(|error| {
        FixtureTeardownError::UnableToInspectPath {
            path: directory_path.to_path_buf(),
            error,
        }
    })?;

    for entry in directory_reader {
        let entry = entry.map_err(|error| FixtureTeardownError::UnableToInspectPath {
            path: directory_path.to_path_buf(),
            error,
        })?;

        let entry_path = entry.path();

        // `symlink_metadata` never follows links, so a symlink to a directory
        // elsewhere reports as a symlink here and is removed as a link below,
        // not descended into.
        let entry_metadata = fs::symlink_metadata(&entry_path).map_err(|error| {
            FixtureTeardownError::UnableToInspectPath {
                path: entry_path.clone(),
                error,
            }
        })?;

        if entry_metadata.is_dir() {
            remove_directory_recursively(&entry_path)?;
        } else {
            remove_non_directory_entry(&entry_path, entry_metadata.file_type().is_symlink())?;
        }
    }

    fs::remove_dir(directory_path).map_err(|error| {
        FixtureTeardownError::UnableToRemoveDirectory {
            path: directory_path.to_path_buf(),
            error,
        }
    })
}


/// Removes a file or symbolic link.
///
/// A `PermissionDenied` failure gets one retry after clearing the read-only
/// attribute; tests commonly leave read-only files behind, and on Windows
/// those cannot be deleted as-is.
fn remove_non_directory_entry(
    entry_path: &Path,
    entry_is_symlink: bool,
) -> Result<(), FixtureTeardownError> {
    cfg_if::cfg_if! {
        if #[cfg(windows)] {
            // Directory symbolic links and junctions must be removed
            // with `remove_dir` on Windows, not `remove_file`.
            if entry_is_symlink
                && fs::metadata(entry_path)
                    .map(|target_metadata| target_metadata.is_dir())
                    .unwrap_or(false)
            {
                return fs::remove_dir(entry_path).map_err(|error| {
                    FixtureTeardownError::UnableToRemoveDirectory {
                        path: entry_path.to_path_buf(),
                        error,
                    }
                });
            }
        } else {
            let _ = entry_is_symlink;
        }
    }

    match fs::remove_file(entry_path) {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == io::ErrorKind::PermissionDenied => {
            clear_read_only_and_remove(entry_path)
        }
        Err(error) => Err(FixtureTeardownError::UnableToRemoveFile {
            path: entry_path.to_path_buf(),
            error,
        }),
    }
}


fn clear_read_only_and_remove(file_path: &Path) -> Result<(), FixtureTeardownError> {
    let file_metadata = fs::symlink_metadata(file_path).map_err(|error| {
        FixtureTeardownError::UnableToInspectPath {
            path: file_path.to_path_buf(),
            error,
        }
    })?;

    let mut permissions = file_metadata.permissions();
    #[allow(clippy::permissions_set_readonly_false)]
    permissions.set_readonly(false);

    fs::set_permissions(file_path, permissions).map_err(|error| {
        FixtureTeardownError::UnableToRemoveFile {
            path: file_path.to_path_buf(),
            error,
        }
    })?;

    fs::remove_file(file_path).map_err(|error| FixtureTeardownError::UnableToRemoveFile {
        path: file_path.to_path_buf(),
        error,
    })
}
