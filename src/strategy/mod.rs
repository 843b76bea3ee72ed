//! Deployment strategies: wildcard expansion, resolution, and placement.
//!
//! The pipeline — expand the source specification, resolve each matched
//! entry's destination, ensure directories, place — is implemented once in
//! [`Deployer`] and parameterised by the [`Placement`] seam, so the
//! disambiguation algorithm is never duplicated per strategy.  The shipped
//! placements are [`CopyPlacement`], [`SymlinkPlacement`], and
//! [`HardlinkPlacement`].

pub mod copy;
pub mod hardlink;
pub mod symlink;

pub use copy::CopyPlacement;
pub use hardlink::HardlinkPlacement;
pub use symlink::SymlinkPlacement;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::error::DeployError;
use crate::mappings::{Mapping, MappingSet};
use crate::operations::{FileKind, FileSystemOps, SystemFileSystemOps};
use crate::resolver::{self, EntryKind, SourceEntry};

/// A placement strategy: how one resolved source entry is materialised at
/// its destination.
///
/// Implementations receive the filesystem capability rather than owning
/// one, so a single strategy value works against any [`FileSystemOps`].
pub trait Placement: Send + Sync + std::fmt::Debug {
    /// Short strategy name used in log events (e.g. `"copy"`).
    fn name(&self) -> &'static str;

    /// The node kind this strategy leaves at a file destination.
    fn kind(&self) -> FileKind;

    /// Materialise a regular file at `dest`.
    ///
    /// # Errors
    ///
    /// Returns an error if the placement primitive fails, e.g. the
    /// destination is occupied by an incompatible node.
    fn place_file(&self, fs: &dyn FileSystemOps, source: &Path, dest: &Path) -> io::Result<()>;

    /// Materialise a directory entry at `dest`.
    ///
    /// Strategies differ materially here: copying reproduces the full
    /// subtree, symlinking creates a single link node.
    ///
    /// # Errors
    ///
    /// Returns an error if the placement primitive fails.
    fn place_directory(&self, fs: &dyn FileSystemOps, source: &Path, dest: &Path)
    -> io::Result<()>;
}

/// What to do when a wildcard source specification matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoMatchPolicy {
    /// Silently skip the mapping (the default).
    #[default]
    Ignore,
    /// Surface [`DeployError::SourceNotFound`] for the pattern.
    Error,
}

/// Deploys mappings from a source root into a destination root through a
/// [`Placement`] strategy.
///
/// Both roots must already exist as distinct directories; the deployer
/// never mutates the source tree.  Processing is single-threaded and
/// synchronous: mappings are handled strictly in insertion order, and
/// within a wildcard expansion matched entries are handled strictly in
/// enumeration order.
///
/// # Examples
///
/// ```
/// use mapdeploy::strategy::{CopyPlacement, Deployer};
///
/// let mut deployer = Deployer::new("/src/module", "/srv/app", Box::new(CopyPlacement));
/// deployer.add_mapping("app/etc/module.xml", "app/etc/module.xml");
/// deployer.add_mapping("skin/*", "skin/frontend/");
/// assert_eq!(deployer.mappings().len(), 2);
/// ```
#[derive(Debug)]
pub struct Deployer {
    source_root: PathBuf,
    dest_root: PathBuf,
    mappings: MappingSet,
    placement: Box<dyn Placement>,
    fs: Arc<dyn FileSystemOps>,
    no_match: NoMatchPolicy,
}

impl Deployer {
    /// Create a deployer for the given roots and placement strategy,
    /// backed by the real filesystem.
    #[must_use]
    pub fn new(
        source_root: impl Into<PathBuf>,
        dest_root: impl Into<PathBuf>,
        placement: Box<dyn Placement>,
    ) -> Self {
        Self {
            source_root: source_root.into(),
            dest_root: dest_root.into(),
            mappings: MappingSet::new(),
            placement,
            fs: Arc::new(SystemFileSystemOps),
            no_match: NoMatchPolicy::default(),
        }
    }

    /// Replace the filesystem capability.
    ///
    /// Used in tests to inject a mock so resolution logic can be exercised
    /// without real I/O.
    #[must_use]
    pub fn with_fs_ops(mut self, fs: Arc<dyn FileSystemOps>) -> Self {
        self.fs = fs;
        self
    }

    /// Set the policy applied when a wildcard matches nothing.
    #[must_use]
    pub const fn with_no_match_policy(mut self, policy: NoMatchPolicy) -> Self {
        self.no_match = policy;
        self
    }

    /// Replace the entire mapping sequence.
    pub fn set_mappings(&mut self, mappings: Vec<Mapping>) {
        self.mappings.set(mappings);
    }

    /// The stored mappings, in insertion order.
    #[must_use]
    pub fn mappings(&self) -> &[Mapping] {
        self.mappings.entries()
    }

    /// Append a single mapping to the end of the sequence.
    pub fn add_mapping(&mut self, source: impl Into<String>, dest: impl Into<String>) {
        self.mappings.add(source, dest);
    }

    /// The placement strategy this deployer materialises entries with.
    #[must_use]
    pub fn placement(&self) -> &dyn Placement {
        self.placement.as_ref()
    }

    /// Deploy every stored mapping, strictly in insertion order, halting on
    /// the first failure.
    ///
    /// When two mappings resolve to the same destination the later mapping
    /// wins — order of application is the insertion order of the store,
    /// never filesystem enumeration order across mappings.
    ///
    /// # Errors
    ///
    /// Propagates the first [`DeployError`] from [`Deployer::create`];
    /// mappings placed before the failure stay in place.
    pub fn deploy(&self) -> Result<(), DeployError> {
        for mapping in &self.mappings {
            self.create(&mapping.source, &mapping.dest)?;
        }
        Ok(())
    }

    /// Deploy one mapping: expand `source_spec`, resolve each matched
    /// entry's destination against `dest_spec`, ensure the required
    /// directories, and materialise the entry via the placement strategy.
    ///
    /// Matched entries are placed independently in enumeration order; a
    /// failure on one entry aborts the remaining entries of this mapping
    /// but does not undo entries already placed.
    ///
    /// # Errors
    ///
    /// - [`DeployError::SourceNotFound`] — non-wildcard source that does
    ///   not exist, or a zero-match wildcard under [`NoMatchPolicy::Error`].
    /// - [`DeployError::InvalidSourcePattern`] — malformed wildcard.
    /// - [`DeployError::DirectoryCreationFailed`] — a required destination
    ///   directory could not be created.
    /// - [`DeployError::PlacementFailed`] — the placement primitive failed.
    pub fn create(&self, source_spec: &str, dest_spec: &str) -> Result<(), DeployError> {
        let entries = self.expand_source(source_spec)?;
        let multi = entries.len() > 1;

        for entry in &entries {
            let resolution =
                resolver::resolve_target(self.fs.as_ref(), &self.dest_root, dest_spec, entry, multi);
            debug!(
                source = %entry.path.display(),
                dest = %resolution.path.display(),
                strategy = self.placement.name(),
                "deploying entry"
            );

            self.fs
                .ensure_dir(&resolution.dir_to_ensure)
                .map_err(|source| DeployError::DirectoryCreationFailed {
                    path: resolution.dir_to_ensure.clone(),
                    source,
                })?;

            let placed = match entry.kind {
                EntryKind::Directory => {
                    self.placement
                        .place_directory(self.fs.as_ref(), &entry.path, &resolution.path)
                }
                EntryKind::File => {
                    self.placement
                        .place_file(self.fs.as_ref(), &entry.path, &resolution.path)
                }
            };
            placed.map_err(|source| DeployError::PlacementFailed {
                entry: entry.path.clone(),
                dest: resolution.path.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// Expand a source specification against the source root.
    ///
    /// A wildcard specification goes through glob expansion; anything else
    /// is a single literal entry whose kind is classified here (and whose
    /// absence is reported as [`DeployError::SourceNotFound`]).
    fn expand_source(&self, spec: &str) -> Result<Vec<SourceEntry>, DeployError> {
        let absolute = self.source_root.join(spec);

        if spec.contains('*') {
            let pattern = absolute.to_string_lossy().into_owned();
            let matches =
                self.fs
                    .glob(&pattern)
                    .map_err(|e| DeployError::InvalidSourcePattern {
                        pattern: pattern.clone(),
                        message: e.to_string(),
                    })?;

            if matches.is_empty() {
                return match self.no_match {
                    NoMatchPolicy::Ignore => {
                        debug!(pattern = %pattern, "source pattern matched nothing, skipping");
                        Ok(Vec::new())
                    }
                    NoMatchPolicy::Error => Err(DeployError::SourceNotFound { path: absolute }),
                };
            }

            Ok(matches
                .into_iter()
                .map(|path| {
                    let kind = if self.fs.is_directory(&path) {
                        EntryKind::Directory
                    } else {
                        EntryKind::File
                    };
                    SourceEntry::new(path, kind)
                })
                .collect())
        } else {
            let kind = if self.fs.is_directory(&absolute) {
                EntryKind::Directory
            } else if self.fs.exists(&absolute) {
                EntryKind::File
            } else {
                return Err(DeployError::SourceNotFound { path: absolute });
            };
            Ok(vec![SourceEntry::new(absolute, kind)])
        }
    }
}
