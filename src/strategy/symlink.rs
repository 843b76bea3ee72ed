//! Symbolic-link placement.

use std::io;
use std::path::Path;

use super::Placement;
use crate::operations::{FileKind, FileSystemOps};

/// Places entries as symbolic links pointing at the source path.
///
/// Files and directories alike become a single link node — symlinking a
/// directory never mirrors its tree.  Placement is idempotent: an existing
/// link that already resolves to the source is left alone, a link to a
/// different target is replaced, and any other occupant fails the
/// placement.
#[derive(Debug, Default, Clone, Copy)]
pub struct SymlinkPlacement;

impl Placement for SymlinkPlacement {
    fn name(&self) -> &'static str {
        "symlink"
    }

    fn kind(&self) -> FileKind {
        FileKind::Link
    }

    fn place_file(&self, fs: &dyn FileSystemOps, source: &Path, dest: &Path) -> io::Result<()> {
        link(fs, source, dest)
    }

    fn place_directory(
        &self,
        fs: &dyn FileSystemOps,
        source: &Path,
        dest: &Path,
    ) -> io::Result<()> {
        link(fs, source, dest)
    }
}

fn link(fs: &dyn FileSystemOps, source: &Path, dest: &Path) -> io::Result<()> {
    if fs.is_symlink(dest) {
        if let Ok(existing) = fs.read_link(dest)
            && paths_equal(&existing, source)
        {
            return Ok(());
        }
        fs.remove(dest)?;
    } else if fs.exists(dest) {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!(
                "destination occupied by a non-symlink node: {}",
                dest.display()
            ),
        ));
    }
    fs.create_symlink(source, dest)
}

/// Compare two paths, normalising the `\\?\` prefix that Windows
/// `read_link` prepends to extended-length paths.
fn paths_equal(a: &Path, b: &Path) -> bool {
    dunce::simplified(a) == dunce::simplified(b)
}
