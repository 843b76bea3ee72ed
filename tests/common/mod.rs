// Shared helpers for strategy integration tests.
//
// Provides a temporary-directory-backed pair of source/destination trees so
// each integration test can exercise a full deployment without repeating
// filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use mapdeploy::operations::{FileKind, SystemFileSystemOps};
use mapdeploy::strategy::{Deployer, Placement};

/// An isolated deployment environment backed by a [`tempfile::TempDir`]:
/// a module source tree and a distinct, pre-existing destination tree.
///
/// Both directories are automatically deleted when the fixture drops.
pub struct DeployFixture {
    tmp: tempfile::TempDir,
    /// Root of the module source tree.
    pub source_dir: PathBuf,
    /// Root of the deployment destination tree.
    pub dest_dir: PathBuf,
}

impl DeployFixture {
    /// Create a fixture with empty `module_dir` and `deploy_dir` trees.
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let source_dir = tmp.path().join("module_dir");
        let dest_dir = tmp.path().join("deploy_dir");
        std::fs::create_dir_all(&source_dir).expect("create source dir");
        std::fs::create_dir_all(&dest_dir).expect("create dest dir");
        Self {
            tmp,
            source_dir,
            dest_dir,
        }
    }

    /// Build a deployer over this fixture's roots with the given placement.
    pub fn deployer(&self, placement: Box<dyn Placement>) -> Deployer {
        Deployer::new(&self.source_dir, &self.dest_dir, placement)
    }

    /// Create a file at `rel` under the source tree (and any parents),
    /// returning its absolute path.  The file's content is its own relative
    /// path, which makes byte-level assertions self-describing.
    pub fn touch_source(&self, rel: &str) -> PathBuf {
        let path = self.source_dir.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create source parents");
        }
        std::fs::write(&path, rel.as_bytes()).expect("write source file");
        path
    }

    /// Create a directory at `rel` under the source tree.
    pub fn mkdir_source(&self, rel: &str) -> PathBuf {
        let path = self.source_dir.join(rel);
        std::fs::create_dir_all(&path).expect("create source dir");
        path
    }

    /// Create a directory at `rel` under the destination tree.
    pub fn mkdir_dest(&self, rel: &str) -> PathBuf {
        let path = self.dest_dir.join(rel);
        std::fs::create_dir_all(&path).expect("create dest dir");
        path
    }

    /// Absolute path of `rel` under the destination tree.
    pub fn dest(&self, rel: &str) -> PathBuf {
        self.dest_dir.join(rel)
    }

    /// Absolute path of `rel` under the source tree.
    pub fn source(&self, rel: &str) -> PathBuf {
        self.source_dir.join(rel)
    }
}

/// Assert that the node at `path` exists and is of `kind`, using the same
/// symlink-aware classification the engine exposes.
pub fn assert_kind(path: &Path, kind: FileKind) {
    assert!(
        path.symlink_metadata().is_ok(),
        "expected {} to exist",
        path.display()
    );
    assert!(
        kind.matches(&SystemFileSystemOps, path),
        "expected {} to be {kind:?}",
        path.display()
    );
}
