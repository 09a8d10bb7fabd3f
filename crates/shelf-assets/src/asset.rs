use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shelf_types::{AssetId, Container, Record};
use tracing::debug;

use crate::error::{AssetError, AssetResult};

/// Fixed sub-container name under which every asset's backing file lives.
pub const ASSET_SUBFOLDER: &str = "Photos";

/// An asset with a backing file on disk.
///
/// Shared by both lifecycle phases: the backing file is always
/// `container/<id>` (the hyphenated UUID, no extension), and `container()`
/// is pure — it derives the location without touching the filesystem.
pub trait DiskAsset {
    /// The asset's stable identity.
    fn id(&self) -> AssetId;

    /// When the asset was created. Survives promotion.
    fn created_at(&self) -> DateTime<Utc>;

    /// The container the backing file lives in.
    fn container(&self) -> Container;

    /// The backing file's path, `container/<id>`.
    fn file_path(&self) -> PathBuf {
        self.container().path().join(self.id().file_name())
    }
}

/// An asset created before its owning record exists.
///
/// Rooted at a process-wide temporary area (`std::env::temp_dir()` unless
/// a root is injected). A `TempAsset` is either explicitly deleted or
/// consumed by [`Asset::promote`] — never both.
#[derive(Clone, Debug)]
pub struct TempAsset {
    id: AssetId,
    created_at: DateTime<Utc>,
    root: PathBuf,
}

impl TempAsset {
    /// Create a temporary asset with a fresh identity, rooted at the
    /// process temporary directory.
    pub fn new() -> Self {
        Self::new_in(std::env::temp_dir())
    }

    /// Create a temporary asset rooted at an explicit directory.
    pub fn new_in(root: impl Into<PathBuf>) -> Self {
        Self {
            id: AssetId::new(),
            created_at: Utc::now(),
            root: root.into(),
        }
    }

    /// The temporary root this asset lives under.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Default for TempAsset {
    fn default() -> Self {
        Self::new()
    }
}

impl DiskAsset for TempAsset {
    fn id(&self) -> AssetId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn container(&self) -> Container {
        Container::resolve(ASSET_SUBFOLDER, self.root.clone())
            .expect("fixed subfolder name is valid")
    }
}

/// A permanent asset owned by a record.
///
/// The serialized form embeds the owner record, so the container re-derives
/// on decode: `owner.container()/Photos`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Asset<O> {
    id: AssetId,
    created_at: DateTime<Utc>,
    owner: O,
}

impl<O: Record> Asset<O> {
    /// Allocate a new asset under `owner` with a fresh identity.
    pub fn new(owner: O) -> Self {
        Self {
            id: AssetId::new(),
            created_at: Utc::now(),
            owner,
        }
    }

    /// Promote a temporary asset into `owner`'s permanent container.
    ///
    /// Consumes the temporary record: identity and creation time carry
    /// over, the backing file is moved (rename, with a copy-and-remove
    /// fallback for cross-device roots), and the old location is left
    /// empty. A temporary asset that was never written cannot be promoted.
    pub fn promote(temp: TempAsset, owner: O) -> AssetResult<Self> {
        let source = temp.file_path();
        if !source.is_file() {
            return Err(AssetError::MissingBacking(temp.id()));
        }
        let asset = Self {
            id: temp.id(),
            created_at: temp.created_at(),
            owner,
        };
        let destination = DiskAsset::container(&asset);
        destination.ensure().map_err(AssetError::Location)?;
        move_file(&source, &asset.file_path())?;
        debug!(id = %asset.id, to = %destination, "asset promoted");
        Ok(asset)
    }

    /// The owning record.
    pub fn owner(&self) -> &O {
        &self.owner
    }
}

impl<O> Asset<O> {
    /// The asset's stable identity.
    pub fn id(&self) -> AssetId {
        self.id
    }

    /// When the asset was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl<O: Record> DiskAsset for Asset<O> {
    fn id(&self) -> AssetId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn container(&self) -> Container {
        Container::resolve(ASSET_SUBFOLDER, self.owner.container().path())
            .expect("fixed subfolder name is valid")
    }
}

/// Equality is by identity alone; the owner plays no part.
impl<O> PartialEq for Asset<O> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<O> Eq for Asset<O> {}

/// Default order: newest first. Compares timestamps only, so a stable sort
/// keeps insertion order for assets created at the same instant.
impl<O> Ord for Asset<O> {
    fn cmp(&self, other: &Self) -> Ordering {
        other.created_at.cmp(&self.created_at)
    }
}

impl<O> PartialOrd for Asset<O> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<O: Record> Record for Asset<O> {
    fn container(&self) -> Container {
        DiskAsset::container(self)
    }

    /// Assets share the owner's `Photos` container with their siblings, so
    /// deleting one removes only its own backing file, never the folder.
    fn discard(&self) -> shelf_types::Result<()> {
        let path = self.file_path();
        if path.exists() {
            fs::remove_file(&path).map_err(shelf_types::ContainerError::from)?;
        }
        Ok(())
    }
}

fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        // Rename cannot cross filesystems; fall back to copy-then-remove.
        Err(_) => {
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
    }
}
