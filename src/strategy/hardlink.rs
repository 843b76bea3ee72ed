//! Hard-link placement.

use std::io;
use std::path::Path;

use super::Placement;
use crate::operations::{FileKind, FileSystemOps};

/// Places files as hard links to their source.
///
/// A directory entry is reproduced as a real directory skeleton whose
/// regular files are hard-linked back to the source tree, so the deployed
/// tree shares file content with the module without sharing its directory
/// nodes.
#[derive(Debug, Default, Clone, Copy)]
pub struct HardlinkPlacement;

impl Placement for HardlinkPlacement {
    fn name(&self) -> &'static str {
        "hardlink"
    }

    fn kind(&self) -> FileKind {
        FileKind::File
    }

    fn place_file(&self, fs: &dyn FileSystemOps, source: &Path, dest: &Path) -> io::Result<()> {
        link_file(fs, source, dest)
    }

    fn place_directory(
        &self,
        fs: &dyn FileSystemOps,
        source: &Path,
        dest: &Path,
    ) -> io::Result<()> {
        link_tree(fs, source, dest)
    }
}

/// Hard-link one regular file, replacing a previously deployed file or
/// stale symlink at `dest`.
fn link_file(fs: &dyn FileSystemOps, source: &Path, dest: &Path) -> io::Result<()> {
    if fs.is_symlink(dest) || fs.is_file(dest) {
        fs.remove(dest)?;
    }
    fs.hard_link(source, dest)
}

fn link_tree(fs: &dyn FileSystemOps, source: &Path, dest: &Path) -> io::Result<()> {
    fs.ensure_dir(dest)?;
    for child in fs.read_dir(source)? {
        let name = child.file_name().unwrap_or_default();
        let target = dest.join(name);
        if fs.is_directory(&child) {
            link_tree(fs, &child, &target)?;
        } else {
            link_file(fs, &child, &target)?;
        }
    }
    Ok(())
}
