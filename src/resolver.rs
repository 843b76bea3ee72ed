//! Destination disambiguation for one resolved source entry.
//!
//! A destination specification is ambiguous three ways at once: it may or
//! may not end in a path separator, it may or may not already exist as a
//! directory, and the source side may have expanded to more than one entry.
//! [`resolve_target`] turns that ambiguity into a concrete destination path
//! plus the directory that must exist before placement.

use std::path::{Path, PathBuf};

use crate::operations::FileSystemOps;

/// Filesystem kind of a resolved source entry, observed at resolution time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file, placed via the strategy's single-file primitive.
    File,
    /// A directory, placed via the strategy's subtree primitive.
    Directory,
}

/// One concrete path produced by expanding a source specification, together
/// with its observed kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// Absolute path of the entry under the source root.
    pub path: PathBuf,
    /// Kind observed when the entry was resolved.
    pub kind: EntryKind,
}

impl SourceEntry {
    /// Create a resolved source entry.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, kind: EntryKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// A concrete destination for one source entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetResolution {
    /// Final destination path for the entry.
    pub path: PathBuf,
    /// Directory that must exist (created recursively) before placement.
    pub dir_to_ensure: PathBuf,
}

/// Compute the concrete destination for `entry` under `dest_root`, given
/// the destination specification exactly as written in the mapping.
///
/// Rules, first match wins:
///
/// 1. `dest_spec` ends with a path separator — always directory semantics,
///    whether or not the directory exists yet: the entry lands inside it
///    under its own basename.
/// 2. `dest_spec` names an existing real directory (a symlink to a
///    directory deliberately does not count, so a previously symlinked
///    directory is re-identified rather than descended into): the entry
///    lands inside it.
/// 3. The source side expanded to more than one entry (`multi`) — a single
///    literal name cannot receive multiple entries, so the specification is
///    forced into directory semantics.
/// 4. Otherwise `dest_spec` is the literal target path; only its parent
///    must exist.
///
/// The basename is taken from the resolved entry, never from the pattern
/// that matched it.
#[must_use]
pub fn resolve_target(
    fs: &dyn FileSystemOps,
    dest_root: &Path,
    dest_spec: &str,
    entry: &SourceEntry,
    multi: bool,
) -> TargetResolution {
    let name = entry.path.file_name().unwrap_or_default();
    let full = dest_root.join(dest_spec);

    if has_trailing_separator(dest_spec) || is_real_directory(fs, &full) || multi {
        return TargetResolution {
            path: full.join(name),
            dir_to_ensure: full,
        };
    }

    let parent = full
        .parent()
        .map_or_else(|| dest_root.to_path_buf(), Path::to_path_buf);
    TargetResolution {
        path: full,
        dir_to_ensure: parent,
    }
}

/// A trailing separator is the one bit of encoded semantics in a
/// destination specification: it forces directory interpretation.
fn has_trailing_separator(spec: &str) -> bool {
    spec.ends_with('/') || spec.ends_with(std::path::MAIN_SEPARATOR)
}

/// An existing directory reached through a symlink must not count as a
/// directory here, or re-deploying a symlinked tree would nest a second
/// copy inside it instead of re-identifying the link.
fn is_real_directory(fs: &dyn FileSystemOps, path: &Path) -> bool {
    fs.is_directory(path) && !fs.is_symlink(path)
}
