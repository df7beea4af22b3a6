//! Archive location configuration.

use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Storage backend an archive is opened against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Parquet partitions under a local root directory.
    Local {
        /// Archive root directory.
        root: PathBuf,
    },
    /// Process-local, non-durable store (tests, dry runs).
    Memory,
}

/// Identifies where a bar store persists data.
///
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArchiveConfig {
    backend: Backend,
}

impl ArchiveConfig {
    /// Archive backed by a local directory.
    #[must_use]
    pub fn local(root: impl Into<PathBuf>) -> Self {
        Self {
            backend: Backend::Local { root: root.into() },
        }
    }

    /// In-memory archive.
    #[must_use]
    pub const fn memory() -> Self {
        Self {
            backend: Backend::Memory,
        }
    }

    /// Local archive at the platform data directory.
    ///
    /// - Linux: `~/.local/share/barvault/archive`
    /// - macOS: `~/Library/Application Support/barvault/archive`
    /// - Windows: `C:\Users\<User>\AppData\Roaming\barvault\archive`
    ///
    /// Falls back to `~/.barvault/archive`.
    #[must_use]
    pub fn default_local() -> Self {
        Self::local(default_root())
    }

    /// Returns the backend.
    #[must_use]
    pub const fn backend(&self) -> &Backend {
        &self.backend
    }

    /// Returns the local root, if this is a local archive.
    #[must_use]
    pub fn root(&self) -> Option<&Path> {
        match &self.backend {
            Backend::Local { root } => Some(root),
            Backend::Memory => None,
        }
    }
}

impl std::fmt::Display for ArchiveConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.backend {
            Backend::Local { root } => write!(f, "local:{}", root.display()),
            Backend::Memory => write!(f, "memory"),
        }
    }
}

fn default_root() -> PathBuf {
    ProjectDirs::from("", "", "barvault").map_or_else(
        || {
            std::env::var("HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(".barvault")
                .join("archive")
        },
        |dirs| dirs.data_dir().join("archive"),
    )
}
