//! Physical copy placement.

use std::io;
use std::path::Path;

use super::Placement;
use crate::operations::{FileKind, FileSystemOps};

/// Places entries by physical copy: a byte-for-byte file copy for files, a
/// full recursive reproduction of the subtree for directories.
#[derive(Debug, Default, Clone, Copy)]
pub struct CopyPlacement;

impl Placement for CopyPlacement {
    fn name(&self) -> &'static str {
        "copy"
    }

    fn kind(&self) -> FileKind {
        FileKind::File
    }

    fn place_file(&self, fs: &dyn FileSystemOps, source: &Path, dest: &Path) -> io::Result<()> {
        fs.copy_file(source, dest)
    }

    fn place_directory(
        &self,
        fs: &dyn FileSystemOps,
        source: &Path,
        dest: &Path,
    ) -> io::Result<()> {
        fs.copy_tree(source, dest)
    }
}
