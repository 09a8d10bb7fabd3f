use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::names::validate_container_name;

/// A directory uniquely associated with one record, derived from a
/// human-assigned name and a parent folder.
///
/// Resolution is pure: the same `(name, parent)` pair always yields the same
/// on-disk location, and nothing touches the filesystem until [`ensure`] is
/// called. Creation is lazy and idempotent — resolving or ensuring twice
/// never errors and never duplicates.
///
/// [`ensure`]: Container::ensure
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    name: String,
    parent: PathBuf,
}

impl Container {
    /// Resolve a container from a name and a parent folder.
    ///
    /// Fails only if the name is syntactically invalid (see
    /// [`validate_container_name`]); a valid name on a writable parent
    /// never fails to resolve or ensure.
    pub fn resolve(name: impl Into<String>, parent: impl Into<PathBuf>) -> Result<Self> {
        let name = name.into();
        validate_container_name(&name)?;
        Ok(Self {
            name,
            parent: parent.into(),
        })
    }

    /// The container's name (its final path component).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parent folder this container lives under.
    pub fn parent(&self) -> &Path {
        &self.parent
    }

    /// The resolved on-disk path, `parent/name`. Pure; does not touch disk.
    pub fn path(&self) -> PathBuf {
        self.parent.join(&self.name)
    }

    /// Create the directory if absent and return its path.
    ///
    /// Idempotent: an existing directory is returned as-is.
    pub fn ensure(&self) -> Result<PathBuf> {
        let path = self.path();
        fs::create_dir_all(&path)?;
        Ok(path)
    }

    /// Resolve a sub-container under this one.
    pub fn child(&self, name: impl Into<String>) -> Result<Container> {
        Container::resolve(name, self.path())
    }

    /// Remove the directory tree rooted at this container.
    ///
    /// Idempotent: a container that was never created is a no-op.
    pub fn destroy(&self) -> Result<()> {
        let path = self.path();
        if path.exists() {
            fs::remove_dir_all(&path)?;
        }
        Ok(())
    }

    /// Returns `true` if the directory currently exists on disk.
    pub fn exists(&self) -> bool {
        self.path().is_dir()
    }
}

impl std::fmt::Display for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path().display())
    }
}
