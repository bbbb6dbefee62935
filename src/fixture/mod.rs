//! The temporary directory fixture and its lifecycle.
//!
//! See [`TempDirectoryFixture`] for the full contract.

use std::io;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use crate::use_enabled_fs_module;

use_enabled_fs_module!();

use crate::error::{ChildPathError, FixtureSetupError, FixtureTeardownError};

mod name;
mod removal;


/// How many fresh names to try before giving up on root creation.
/// With 12 random alphanumeric characters per name, reaching this limit
/// in practice means something other than collisions is wrong.
const MAX_ROOT_CREATION_RETRIES: usize = 16;


/// An isolated temporary directory for a single test case.
///
/// Construction creates a uniquely named directory on disk
/// (setup); dropping the fixture - or calling [`close`] explicitly -
/// recursively removes it (teardown). Because teardown runs from [`Drop`],
/// it happens on every exit path out of the owning scope, including assertion
/// failures and other panics.
///
/// Each fixture exclusively owns its directory: fixtures created concurrently,
/// whether on separate threads or in separate processes, always receive
/// distinct roots. A fixture is single-use; there is no way to reset or reuse
/// one after teardown, because [`close`] consumes it.
///
///
/// # Examples
/// ```
/// # use temp_fixture::TempDirectoryFixture;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let fixture = TempDirectoryFixture::new()?;
///
/// let config_path = fixture.new_file_with_contents("config/app.toml", "retries = 3")?;
/// assert_eq!(std::fs::read_to_string(&config_path)?, "retries = 3");
///
/// fixture.close()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TempDirectoryFixture {
    /// Absolute, canonicalized path to the fixture's root directory.
    root_directory_path: PathBuf,

    /// Set by [`Self::close`] so the [`Drop`] implementation
    /// does not attempt a second teardown.
    torn_down: bool,
}

impl TempDirectoryFixture {
    /// Sets up a fixture rooted under the system temporary directory
    /// (see [`std::env::temp_dir`]).
    ///
    ///
    /// # Errors
    /// If the root directory cannot be created or canonicalized,
    /// a [`FixtureSetupError`] is returned; see its documentation for details.
    /// Nothing is left on disk when this constructor fails.
    pub fn new() -> Result<Self, FixtureSetupError> {
        Self::new_in(std::env::temp_dir())
    }

    /// Sets up a fixture rooted under the provided parent directory
    /// instead of the system temporary directory.
    ///
    /// The parent directory must already exist; it is not created on demand,
    /// since the fixture would then own more than its root and teardown
    /// could remove paths the caller considers theirs.
    ///
    ///
    /// # Errors
    /// If the parent does not exist, [`ParentDirectoryNotFound`] is returned;
    /// if it exists but is not a directory, [`ParentPathNotADirectory`].
    /// Creation and canonicalization failures are returned as described
    /// in [`FixtureSetupError`].
    ///
    ///
    /// [`ParentDirectoryNotFound`]: FixtureSetupError::ParentDirectoryNotFound
    /// [`ParentPathNotADirectory`]: FixtureSetupError::ParentPathNotADirectory
    pub fn new_in<P>(parent_directory_path: P) -> Result<Self, FixtureSetupError>
    where
        P: AsRef<Path>,
    {
        let parent_directory_path = parent_directory_path.as_ref();

        // `try_exists` instead of `exists` to catch permission and other
        // IO errors as distinct from the `ParentDirectoryNotFound` error.
        match parent_directory_path.try_exists() {
            Ok(exists) => {
                if !exists {
                    return Err(FixtureSetupError::ParentDirectoryNotFound {
                        path: parent_directory_path.to_path_buf(),
                    });
                }
            }
            Err(error) => {
                return Err(FixtureSetupError::UnableToAccessParentDirectory {
                    path: parent_directory_path.to_path_buf(),
                    error,
                });
            }
        }

        if !parent_directory_path.is_dir() {
            return Err(FixtureSetupError::ParentPathNotADirectory {
                path: parent_directory_path.to_path_buf(),
            });
        }

        let root_directory_path = create_uniquely_named_root(parent_directory_path)?;

        let root_directory_path = canonicalize_root_path(&root_directory_path)?;

        Ok(Self {
            root_directory_path,
            torn_down: false,
        })
    }

    /// Returns the absolute path of the fixture's root directory.
    ///
    /// The directory is guaranteed to exist, be writable and start out empty
    /// for as long as the fixture value is alive; only the owning test
    /// mutates anything beneath it.
    pub fn root_path(&self) -> &Path {
        &self.root_directory_path
    }

    /// Resolves a relative path to an absolute path under the fixture root,
    /// without touching the filesystem.
    ///
    /// Validation is purely lexical, component by component:
    /// `.` components are ignored, while absolute paths and any `..`
    /// component are rejected - even a `..` that would lexically remain
    /// inside the root.
    ///
    ///
    /// # Errors
    /// - [`EmptyRelativePath`] if `relative_path` is empty
    ///   or resolves to the root itself (e.g. `"."`).
    /// - [`RelativePathEscapesRoot`] if `relative_path` is absolute
    ///   or contains a `..` component.
    ///
    ///
    /// [`EmptyRelativePath`]: ChildPathError::EmptyRelativePath
    /// [`RelativePathEscapesRoot`]: ChildPathError::RelativePathEscapesRoot
    pub fn child_path<P>(&self, relative_path: P) -> Result<PathBuf, ChildPathError>
    where
        P: AsRef<Path>,
    {
        let relative_path = relative_path.as_ref();

        if relative_path.as_os_str().is_empty() {
            return Err(ChildPathError::EmptyRelativePath);
        }

        let mut resolved_path = self.root_directory_path.clone();

        for component in relative_path.components() {
            match component {
                Component::Normal(component_value) => resolved_path.push(component_value),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(ChildPathError::RelativePathEscapesRoot {
                        path: relative_path.to_path_buf(),
                    });
                }
            }
        }

        if resolved_path == self.root_directory_path {
            return Err(ChildPathError::EmptyRelativePath);
        }

        Ok(resolved_path)
    }

    /// Creates an empty file at the given relative path under the root,
    /// creating intermediate directories as needed, and returns its
    /// absolute path.
    ///
    /// An existing entry at the resolved path is never overwritten.
    ///
    ///
    /// # Errors
    /// In addition to the path validation errors of [`child_path`]:
    /// - [`AlreadyExists`] if an entry already exists at the resolved path.
    /// - [`UnableToCreateParentDirectories`] / [`UnableToCreateFile`]
    ///   for underlying IO failures.
    ///
    ///
    /// [`child_path`]: Self::child_path
    /// [`AlreadyExists`]: ChildPathError::AlreadyExists
    /// [`UnableToCreateParentDirectories`]: ChildPathError::UnableToCreateParentDirectories
    /// [`UnableToCreateFile`]: ChildPathError::UnableToCreateFile
    pub fn new_file<P>(&self, relative_path: P) -> Result<PathBuf, ChildPathError>
    where
        P: AsRef<Path>,
    {
        let file_path = self.child_path(relative_path)?;

        create_parent_directories(&file_path)?;
        create_new_file(&file_path)?;

        Ok(file_path)
    }

    /// Like [`new_file`], but also writes the provided contents to the
    /// freshly created file.
    ///
    ///
    /// # Errors
    /// The same errors as [`new_file`], plus [`UnableToWriteToFile`]
    /// if the file was created but its contents could not be written
    /// (the empty file is left in place in that case).
    ///
    ///
    /// [`new_file`]: Self::new_file
    /// [`UnableToWriteToFile`]: ChildPathError::UnableToWriteToFile
    pub fn new_file_with_contents<P, C>(
        &self,
        relative_path: P,
        contents: C,
    ) -> Result<PathBuf, ChildPathError>
    where
        P: AsRef<Path>,
        C: AsRef<[u8]>,
    {
        let file_path = self.child_path(relative_path)?;

        create_parent_directories(&file_path)?;
        let mut file = create_new_file(&file_path)?;

        file.write_all(contents.as_ref())
            .map_err(|error| ChildPathError::UnableToWriteToFile {
                path: file_path.clone(),
                error,
            })?;

        Ok(file_path)
    }

    /// Creates a subdirectory at the given relative path under the root,
    /// creating intermediate directories as needed, and returns its
    /// absolute path.
    ///
    /// Requesting a directory that already exists is an error rather than
    /// a silent success: `new_directory("x")` twice fails with
    /// [`AlreadyExists`] on the second call, so a test cannot accidentally
    /// treat one directory as two independent locations.
    ///
    ///
    /// # Errors
    /// In addition to the path validation errors of [`child_path`]:
    /// - [`AlreadyExists`] if an entry already exists at the resolved path.
    /// - [`UnableToCreateParentDirectories`] / [`UnableToCreateDirectory`]
    ///   for underlying IO failures.
    ///
    ///
    /// [`child_path`]: Self::child_path
    /// [`AlreadyExists`]: ChildPathError::AlreadyExists
    /// [`UnableToCreateParentDirectories`]: ChildPathError::UnableToCreateParentDirectories
    /// [`UnableToCreateDirectory`]: ChildPathError::UnableToCreateDirectory
    pub fn new_directory<P>(&self, relative_path: P) -> Result<PathBuf, ChildPathError>
    where
        P: AsRef<Path>,
    {
        let directory_path = self.child_path(relative_path)?;

        create_parent_directories(&directory_path)?;

        fs::create_dir(&directory_path).map_err(|error| {
            if error.kind() == io::ErrorKind::AlreadyExists {
                ChildPathError::AlreadyExists {
                    path: directory_path.clone(),
                }
            } else {
                ChildPathError::UnableToCreateDirectory {
                    path: directory_path.clone(),
                    error,
                }
            }
        })?;

        Ok(directory_path)
    }

    /// Tears the fixture down, recursively removing its root directory
    /// and everything under it.
    ///
    /// Dropping the fixture performs the same teardown; call `close`
    /// when the test should fail on incomplete cleanup, since `Drop`
    /// can only report the failure to standard error.
    ///
    /// Teardown is idempotent with respect to the filesystem: a root that
    /// was already removed by outside forces counts as cleaned up.
    ///
    ///
    /// # Errors
    /// If some entry under the root cannot be removed - for example a file
    /// still held open with a mandatory lock - a [`FixtureTeardownError`]
    /// is returned describing the first path that failed.
    pub fn close(mut self) -> Result<(), FixtureTeardownError> {
        self.torn_down = true;

        removal::remove_directory_tree(&self.root_directory_path)
    }
}

impl Drop for TempDirectoryFixture {
    fn drop(&mut self) {
        if self.torn_down {
            return;
        }

        // Never panic out of drop; a teardown failure here must not
        // mask a panic already unwinding through the test body.
        if let Err(error) = removal::remove_directory_tree(&self.root_directory_path) {
            eprintln!(
                "TempDirectoryFixture: failed to remove fixture root {} on drop: {}",
                self.root_directory_path.display(),
                error
            );
        }
    }
}


/// Creates a uniquely named directory under `parent_directory_path`
/// and returns its (non-canonicalized) path.
///
/// `create_dir` fails on an existing path, so a name collision with another
/// fixture - however unlikely - is detected atomically and retried with a
/// fresh name instead of silently sharing the directory.
fn create_uniquely_named_root(
    parent_directory_path: &Path,
) -> Result<PathBuf, FixtureSetupError> {
    let mut remaining_attempts = MAX_ROOT_CREATION_RETRIES;

    loop {
        let candidate_path = parent_directory_path.join(name::unique_root_directory_name());

        match fs::create_dir(&candidate_path) {
            Ok(()) => return Ok(candidate_path),
            Err(error) if error.kind() == io::ErrorKind::AlreadyExists => {
                remaining_attempts -= 1;

                if remaining_attempts == 0 {
                    return Err(FixtureSetupError::UnableToCreateRootDirectory {
                        path: parent_directory_path.to_path_buf(),
                        error,
                    });
                }
            }
            Err(error) => {
                return Err(FixtureSetupError::UnableToCreateRootDirectory {
                    path: parent_directory_path.to_path_buf(),
                    error,
                });
            }
        }
    }
}


fn canonicalize_root_path(root_directory_path: &Path) -> Result<PathBuf, FixtureSetupError> {
    let canonicalized_path = fs::canonicalize(root_directory_path).map_err(|error| {
        FixtureSetupError::UnableToCanonicalizeRootPath {
            path: root_directory_path.to_path_buf(),
            error,
        }
    })?;

    #[cfg(feature = "dunce")]
    {
        Ok(dunce::simplified(&canonicalized_path).to_path_buf())
    }

    #[cfg(not(feature = "dunce"))]
    {
        Ok(canonicalized_path)
    }
}


fn create_parent_directories(child_path: &Path) -> Result<(), ChildPathError> {
    if let Some(parent_directory_path) = child_path.parent() {
        fs::create_dir_all(parent_directory_path).map_err(|error| {
            ChildPathError::UnableToCreateParentDirectories {
                path: child_path.to_path_buf(),
                error,
            }
        })?;
    }

    Ok(())
}


fn create_new_file(file_path: &Path) -> Result<fs::File, ChildPathError> {
    fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(file_path)
        .map_err(|error| {
            if error.kind() == io::ErrorKind::AlreadyExists {
                ChildPathError::AlreadyExists {
                    path: file_path.to_path_buf(),
                }
            } else {
                ChildPathError::UnableToCreateFile {
                    path: file_path.to_path_buf(),
                    error,
                }
            }
        })
}
