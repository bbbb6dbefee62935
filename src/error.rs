//! Error types for fixture setup, child path operations and teardown.

use std::path::PathBuf;

use thiserror::Error;


/// An error that can occur while setting up a [`TempDirectoryFixture`].
///
/// A setup error means no fixture root was left behind on disk:
/// either nothing was created, or construction failed before the
/// fixture took ownership of anything.
///
/// [`TempDirectoryFixture`]: crate::fixture::TempDirectoryFixture
#[derive(Error, Debug)]
#[cfg_attr(feature = "miette", derive(miette::Diagnostic))]
pub enum FixtureSetupError {
    /// The provided parent directory does not exist.
    #[error("parent directory does not exist: {}", .path.display())]
    ParentDirectoryNotFound {
        /// The path that does not exist.
        path: PathBuf,
    },

    /// The provided parent path exists, but is not a directory.
    #[error("parent path exists, but is not a directory: {}", .path.display())]
    ParentPathNotADirectory {
        /// The path that exists, but is not a directory.
        path: PathBuf,
    },

    /// The parent directory cannot be accessed, for example due to missing permissions.
    ///
    /// The inner [`std::io::Error`] will likely describe the real cause of this error.
    #[error("unable to access parent directory: {}", .path.display())]
    UnableToAccessParentDirectory {
        /// Parent directory path that could not be accessed.
        path: PathBuf,

        /// Underlying IO error describing why the parent directory could not be accessed.
        #[source]
        error: std::io::Error,
    },

    /// The fixture root directory could not be created,
    /// for example due to missing permissions or a full disk.
    ///
    /// Name collisions are not reported through this variant;
    /// they are retried internally with a fresh unique name.
    #[error("unable to create fixture root directory under: {}", .path.display())]
    UnableToCreateRootDirectory {
        /// The parent directory the root was to be created under.
        path: PathBuf,

        /// Underlying IO error describing why the root directory could not be created.
        #[source]
        error: std::io::Error,
    },

    /// The freshly created fixture root path could not be canonicalized.
    ///
    /// See also: [`std::fs::canonicalize`].
    #[error("unable to canonicalize fixture root path: {}", .path.display())]
    UnableToCanonicalizeRootPath {
        /// Root path that could not be canonicalized.
        path: PathBuf,

        /// Underlying IO error describing why the root path could not be canonicalized.
        #[source]
        error: std::io::Error,
    },
}


/// An error that can occur when creating or resolving a child path
/// under a fixture root, e.g. in [`new_file`] or [`new_directory`].
///
/// A rejected child operation never affects the fixture root itself.
///
/// [`new_file`]: crate::fixture::TempDirectoryFixture::new_file
/// [`new_directory`]: crate::fixture::TempDirectoryFixture::new_directory
#[derive(Error, Debug)]
#[cfg_attr(feature = "miette", derive(miette::Diagnostic))]
pub enum ChildPathError {
    /// The provided relative path is empty, or resolves to the fixture root itself.
    #[error("provided relative path is empty")]
    EmptyRelativePath,

    /// The provided relative path would escape the fixture root.
    ///
    /// This is returned for absolute paths and for paths containing
    /// any `..` component, even one that would lexically stay inside the root.
    #[error("provided relative path escapes the fixture root: {}", .path.display())]
    RelativePathEscapesRoot {
        /// The offending relative path, as provided.
        path: PathBuf,
    },

    /// The resolved child path already exists.
    #[error("child path already exists: {}", .path.display())]
    AlreadyExists {
        /// The resolved path that already exists.
        path: PathBuf,
    },

    /// One of the intermediate directories leading up to the child path
    /// could not be created.
    #[error("unable to create intermediate directories for: {}", .path.display())]
    UnableToCreateParentDirectories {
        /// The resolved child path whose intermediate directories could not be created.
        path: PathBuf,

        /// Underlying IO error describing why the directories could not be created.
        #[source]
        error: std::io::Error,
    },

    /// The child file could not be created.
    #[error("unable to create file: {}", .path.display())]
    UnableToCreateFile {
        /// The resolved file path that could not be created.
        path: PathBuf,

        /// Underlying IO error describing why the file could not be created.
        #[source]
        error: std::io::Error,
    },

    /// The child file was created, but its contents could not be written.
    #[error("unable to write to file: {}", .path.display())]
    UnableToWriteToFile {
        /// The resolved file path that could not be written to.
        path: PathBuf,

        /// Underlying IO error describing why the file could not be written to.
        #[source]
        error: std::io::Error,
    },

    /// The child directory could not be created.
    #[error("unable to create directory: {}", .path.display())]
    UnableToCreateDirectory {
        /// The resolved directory path that could not be created.
        path: PathBuf,

        /// Underlying IO error describing why the directory could not be created.
        #[source]
        error: std::io::Error,
    },
}


/// An error that can occur while tearing down a fixture,
/// i.e. while recursively removing its root directory.
///
/// Returned by [`close`]; on the implicit [`Drop`] path the same error
/// is reported to standard error instead, so it can never mask a panic
/// already unwinding through the test body.
///
/// [`close`]: crate::fixture::TempDirectoryFixture::close
#[derive(Error, Debug)]
#[cfg_attr(feature = "miette", derive(miette::Diagnostic))]
pub enum FixtureTeardownError {
    /// A path under the fixture root could not be inspected,
    /// for example due to missing permissions.
    #[error("unable to inspect path during teardown: {}", .path.display())]
    UnableToInspectPath {
        /// The path that could not be inspected.
        path: PathBuf,

        /// Underlying IO error describing why the path could not be inspected.
        #[source]
        error: std::io::Error,
    },

    /// A file (or symbolic link) under the fixture root could not be removed.
    #[error("unable to remove file during teardown: {}", .path.display())]
    UnableToRemoveFile {
        /// The file path that could not be removed.
        path: PathBuf,

        /// Underlying IO error describing why the file could not be removed.
        #[source]
        error: std::io::Error,
    },

    /// A directory under the fixture root (or the root itself) could not be removed.
    #[error("unable to remove directory during teardown: {}", .path.display())]
    UnableToRemoveDirectory {
        /// The directory path that could not be removed.
        path: PathBuf,

        /// Underlying IO error describing why the directory could not be removed.
        #[source]
        error: std::io::Error,
    },
}
