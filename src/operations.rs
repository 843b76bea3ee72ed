//! Filesystem operation abstractions for dependency injection.
//!
//! Provides the [`FileSystemOps`] trait so the resolution and placement
//! pipeline can be unit-tested without touching the real filesystem.
//! Production code uses [`SystemFileSystemOps`]; unit tests use
//! `MockFileSystemOps`.  No other module performs I/O directly.

use std::io;
use std::path::{Path, PathBuf};

use crate::error::DeployError;

/// Abstraction over the filesystem primitives the deployment engine needs.
///
/// Implement this trait to swap in a mock during unit tests, keeping the
/// resolver and strategy logic independent of real I/O.  The production
/// implementation is [`SystemFileSystemOps`].
pub trait FileSystemOps: Send + Sync + std::fmt::Debug {
    /// Returns `true` if `path` exists on the filesystem (following symlinks).
    fn exists(&self, path: &Path) -> bool;

    /// Returns `true` if `path` is a regular file (following symlinks).
    fn is_file(&self, path: &Path) -> bool;

    /// Returns `true` if `path` is a directory (following symlinks).
    fn is_directory(&self, path: &Path) -> bool;

    /// Returns `true` if `path` itself is a symbolic link.
    fn is_symlink(&self, path: &Path) -> bool;

    /// Read the target of the symbolic link at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not a symlink or cannot be read.
    fn read_link(&self, path: &Path) -> io::Result<PathBuf>;

    /// Recursively create `path` as a directory.  Idempotent: succeeds if
    /// the directory already exists.
    ///
    /// # Errors
    ///
    /// Returns an error on a genuine I/O failure, including `path` (or an
    /// ancestor) existing as a non-directory node.
    fn ensure_dir(&self, path: &Path) -> io::Result<()>;

    /// Returns the immediate child paths inside `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` cannot be opened or read as a directory.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    /// Copy the regular file at `src` to `dst`, byte for byte.  An existing
    /// regular file at `dst` is overwritten.
    ///
    /// # Errors
    ///
    /// Returns an error if `src` cannot be read or `dst` cannot be written,
    /// including `dst` being occupied by a directory.
    fn copy_file(&self, src: &Path, dst: &Path) -> io::Result<()>;

    /// Recursively copy the directory tree at `src` to `dst`.
    ///
    /// Symlinks within the source tree are followed: their content is
    /// copied, not the link itself.
    ///
    /// # Errors
    ///
    /// Returns an error if a destination directory cannot be created, a
    /// source entry cannot be read, or a file cannot be copied.
    fn copy_tree(&self, src: &Path, dst: &Path) -> io::Result<()>;

    /// Create `link` as a symbolic link whose resolution target is `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if the link cannot be created, including `link`
    /// already existing.
    fn create_symlink(&self, target: &Path, link: &Path) -> io::Result<()>;

    /// Create `dst` as a hard link to the regular file at `src`.
    ///
    /// # Errors
    ///
    /// Returns an error if the link cannot be created, including `dst`
    /// already existing or `src` being a directory.
    fn hard_link(&self, src: &Path, dst: &Path) -> io::Result<()>;

    /// Remove the node at `path`: files and symlinks are unlinked,
    /// directories are removed recursively.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` does not exist or removal fails.
    fn remove(&self, path: &Path) -> io::Result<()>;

    /// Expand a glob `pattern` into the ordered sequence of matching paths.
    ///
    /// `*` matches any sequence of characters within one path segment, not
    /// across separators.  Matches are returned in a deterministic
    /// (alphabetical) order; zero matches yields an empty sequence, not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns an error with kind [`io::ErrorKind::InvalidInput`] if the
    /// pattern itself is malformed, or the underlying I/O error if a
    /// matched path cannot be inspected.
    fn glob(&self, pattern: &str) -> io::Result<Vec<PathBuf>>;
}

/// Production [`FileSystemOps`] implementation that delegates to
/// [`std::fs`] and the `glob` crate.
#[derive(Debug, Default)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_directory(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_symlink(&self, path: &Path) -> bool {
        path.symlink_metadata()
            .map(|m| m.is_symlink())
            .unwrap_or(false)
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::read_link(path)
    }

    fn ensure_dir(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        std::fs::read_dir(path)?
            .map(|e| e.map(|entry| entry.path()))
            .collect()
    }

    fn copy_file(&self, src: &Path, dst: &Path) -> io::Result<()> {
        std::fs::copy(src, dst).map(|_| ())
    }

    fn copy_tree(&self, src: &Path, dst: &Path) -> io::Result<()> {
        copy_dir_recursive(src, dst)
    }

    fn create_symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
        #[cfg(unix)]
        {
            std::os::unix::fs::symlink(target, link)
        }

        #[cfg(windows)]
        {
            if target.is_dir() {
                std::os::windows::fs::symlink_dir(target, link)
            } else {
                std::os::windows::fs::symlink_file(target, link)
            }
        }
    }

    fn hard_link(&self, src: &Path, dst: &Path) -> io::Result<()> {
        std::fs::hard_link(src, dst)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        let meta = std::fs::symlink_metadata(path)?;
        if meta.is_symlink() {
            // Windows directory symlinks must go through remove_dir.
            if is_dir_like(&meta) {
                std::fs::remove_dir(path)
            } else {
                std::fs::remove_file(path)
            }
        } else if meta.is_dir() {
            std::fs::remove_dir_all(path)
        } else {
            std::fs::remove_file(path)
        }
    }

    fn glob(&self, pattern: &str) -> io::Result<Vec<PathBuf>> {
        let paths = glob::glob(pattern)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        let mut matches = Vec::new();
        for entry in paths {
            match entry {
                Ok(path) => matches.push(path),
                Err(e) => return Err(e.into_error()),
            }
        }
        Ok(matches)
    }
}

/// Recursively copy a directory tree.
///
/// Symlinks within the source tree are *followed*: the function uses
/// [`Path::is_dir`] (which follows symlinks) so directory symlinks are
/// recursed into and their contents materialised rather than copying the
/// link itself.
fn copy_dir_recursive(src: &Path, dst: &Path) -> io::Result<()> {
    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Check if metadata represents a directory-like entry.
/// On Windows, `symlink_metadata().is_dir()` returns `false` for directory
/// symlinks, so we check the raw `FILE_ATTRIBUTE_DIRECTORY` bit instead.
fn is_dir_like(meta: &std::fs::Metadata) -> bool {
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        meta.file_attributes() & 0x10 != 0 // FILE_ATTRIBUTE_DIRECTORY
    }
    #[cfg(not(windows))]
    {
        meta.is_dir()
    }
}

/// The kind of node a path may hold on disk.
///
/// Classification is symlink-aware: [`FileKind::File`] and
/// [`FileKind::Directory`] require the node *not* be a symlink, while
/// [`FileKind::Link`] requires it be one.  This is what lets callers tell a
/// physically copied file apart from a symlinked one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// A regular file that is not a symlink.
    File,
    /// A symbolic link (regardless of what it points at).
    Link,
    /// A directory that is not a symlink.
    Directory,
}

impl FileKind {
    /// Returns `true` if the node at `path` is of this kind.
    #[must_use]
    pub fn matches(self, fs: &dyn FileSystemOps, path: &Path) -> bool {
        match self {
            Self::File => fs.is_file(path) && !fs.is_symlink(path),
            Self::Link => fs.is_symlink(path),
            Self::Directory => fs.is_directory(path) && !fs.is_symlink(path),
        }
    }
}

impl std::str::FromStr for FileKind {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" => Ok(Self::File),
            "link" => Ok(Self::Link),
            "dir" => Ok(Self::Directory),
            other => Err(DeployError::InvalidFileTypeQuery {
                tag: other.to_string(),
            }),
        }
    }
}

/// Mock [`FileSystemOps`] for unit tests.
///
/// Pre-configure files, directories, and symlinks using the builder-style
/// methods, then pass the mock wherever a [`FileSystemOps`] is accepted.
/// Query methods answer from the configured state; mutating methods are
/// accepted and discarded, so resolution logic can be exercised without a
/// real filesystem.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockFileSystemOps {
    files: Vec<PathBuf>,
    dirs: Vec<PathBuf>,
    symlinks: std::collections::HashMap<PathBuf, PathBuf>,
}

#[cfg(test)]
impl MockFileSystemOps {
    /// Create an empty mock with nothing configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `path` as a regular file.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push(path.into());
        self
    }

    /// Mark `path` as a directory.
    #[must_use]
    pub fn with_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.dirs.push(path.into());
        self
    }

    /// Register `path` as a symbolic link pointing to `target`.
    #[must_use]
    pub fn with_symlink(mut self, path: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        self.symlinks.insert(path.into(), target.into());
        self
    }

    fn link_resolves_to_dir(&self, path: &Path) -> bool {
        self.symlinks
            .get(path)
            .is_some_and(|target| self.dirs.contains(target))
    }

    fn link_resolves_to_file(&self, path: &Path) -> bool {
        self.symlinks
            .get(path)
            .is_some_and(|target| self.files.contains(target))
    }
}

#[cfg(test)]
impl FileSystemOps for MockFileSystemOps {
    fn exists(&self, path: &Path) -> bool {
        self.files.iter().any(|p| p == path)
            || self.dirs.iter().any(|p| p == path)
            || self.symlinks.contains_key(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.iter().any(|p| p == path) || self.link_resolves_to_file(path)
    }

    fn is_directory(&self, path: &Path) -> bool {
        self.dirs.iter().any(|p| p == path) || self.link_resolves_to_dir(path)
    }

    fn is_symlink(&self, path: &Path) -> bool {
        self.symlinks.contains_key(path)
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        self.symlinks
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "not a symlink"))
    }

    fn ensure_dir(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }

    fn read_dir(&self, _path: &Path) -> io::Result<Vec<PathBuf>> {
        Ok(Vec::new())
    }

    fn copy_file(&self, _src: &Path, _dst: &Path) -> io::Result<()> {
        Ok(())
    }

    fn copy_tree(&self, _src: &Path, _dst: &Path) -> io::Result<()> {
        Ok(())
    }

    fn create_symlink(&self, _target: &Path, _link: &Path) -> io::Result<()> {
        Ok(())
    }

    fn hard_link(&self, _src: &Path, _dst: &Path) -> io::Result<()> {
        Ok(())
    }

    fn remove(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }

    fn glob(&self, _pattern: &str) -> io::Result<Vec<PathBuf>> {
        Ok(Vec::new())
    }
}
