//! Typed error variants for deployment operations.
//!
//! This module provides [`DeployError`], a structured error type covering
//! every failure the deployment pipeline can surface.  Internal code returns
//! these variants directly; callers convert to [`anyhow::Error`] via `?`
//! when they do not need to match on the failure.
//!
//! Failures propagate immediately: no step retries, and a failure partway
//! through a multi-match wildcard expansion leaves previously placed
//! entries in place.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that arise while resolving and materialising mappings.
#[derive(Error, Debug)]
pub enum DeployError {
    /// A non-wildcard source specification does not exist at resolution
    /// time, or a wildcard expanded to zero matches under
    /// [`NoMatchPolicy::Error`](crate::strategy::NoMatchPolicy::Error).
    #[error("source not found: {}", path.display())]
    SourceNotFound {
        /// Absolute source path or pattern that failed to resolve.
        path: PathBuf,
    },

    /// A wildcard source specification was rejected by the glob engine.
    #[error("invalid source pattern '{pattern}': {message}")]
    InvalidSourcePattern {
        /// The offending pattern, as expanded against the source root.
        pattern: String,
        /// Explanation from the glob engine.
        message: String,
    },

    /// A required destination directory could not be created.
    #[error("cannot create directory {}: {source}", path.display())]
    DirectoryCreationFailed {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The placement primitive itself failed after directories were ensured,
    /// e.g. the destination is occupied by an incompatible node.
    #[error("cannot place {} at {}: {source}", entry.display(), dest.display())]
    PlacementFailed {
        /// Resolved source entry that was being placed.
        entry: PathBuf,
        /// Concrete destination path the placement targeted.
        dest: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A file-kind classification request used an unrecognized kind tag.
    /// This is a programming error, never expected in normal operation.
    #[error("invalid file type query: '{tag}'")]
    InvalidFileTypeQuery {
        /// The unrecognized tag (valid tags are `file`, `link`, `dir`).
        tag: String,
    },
}
