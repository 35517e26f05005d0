//! # Charm Source: the Filesystem View of a Charm
//!
//! Rules never touch `std::fs` directly. They observe a charm through
//! [`CharmSource`], a read-only interface with exactly the operations the
//! checks need: existence, root listing, owner-executable bit, and full
//! text retrieval. Paths are always relative to the charm root.

use std::io;
use std::path::{Path, PathBuf};

/// Read-only view of one charm directory.
pub trait CharmSource {
    /// Absolute or caller-supplied path of the charm root.
    fn root(&self) -> &Path;

    /// Whether `rel` exists under the charm root (file or directory).
    fn exists(&self, rel: &Path) -> bool;

    /// Whether `rel` exists and is a directory.
    fn is_dir(&self, rel: &Path) -> bool;

    /// Names of all entries directly under the charm root, sorted.
    fn list_root(&self) -> io::Result<Vec<String>>;

    /// Whether `rel` carries the owner-executable permission bit.
    fn is_owner_executable(&self, rel: &Path) -> io::Result<bool>;

    /// Full text of the file at `rel`.
    ///
    /// Fails with [`io::ErrorKind::NotFound`] when the file is absent.
    /// Invalid UTF-8 is replaced rather than rejected, so binary hooks
    /// can still be scanned line by line.
    fn read_text(&self, rel: &Path) -> io::Result<String>;

    /// Base name of the charm directory, used to check the descriptor's
    /// `name` field.
    fn base_name(&self) -> String {
        let root = self.root();
        if let Some(name) = root.file_name() {
            return name.to_string_lossy().into_owned();
        }
        // `.` or `..` style roots have no file name until resolved.
        root.canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_default()
    }

    /// Full path of `rel`, for messages.
    fn path_of(&self, rel: &Path) -> PathBuf {
        self.root().join(rel)
    }
}

/// A charm on the local disk.
#[derive(Debug, Clone)]
pub struct LocalCharm {
    root: PathBuf,
}

impl LocalCharm {
    /// Wrap a charm directory. The path is not checked here; callers
    /// decide how to report a root that is not a directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl CharmSource for LocalCharm {
    fn root(&self) -> &Path {
        &self.root
    }

    fn exists(&self, rel: &Path) -> bool {
        self.root.join(rel).exists()
    }

    fn is_dir(&self, rel: &Path) -> bool {
        self.root.join(rel).is_dir()
    }

    fn list_root(&self) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    #[cfg(unix)]
    fn is_owner_executable(&self, rel: &Path) -> io::Result<bool> {
        use std::os::unix::fs::PermissionsExt;

        let mode = std::fs::metadata(self.root.join(rel))?.permissions().mode();
        Ok(mode & 0o100 != 0)
    }

    #[cfg(not(unix))]
    fn is_owner_executable(&self, rel: &Path) -> io::Result<bool> {
        std::fs::metadata(self.root.join(rel))?;
        Ok(true)
    }

    fn read_text(&self, rel: &Path) -> io::Result<String> {
        let bytes = std::fs::read(self.root.join(rel))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
