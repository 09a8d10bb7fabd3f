use bytes::Bytes;
use shelf_store::RecordStore;
use shelf_types::Record;

use crate::asset::{Asset, TempAsset};
use crate::error::AssetResult;
use crate::io::AssetIo;

/// Backing file name for an owner's asset collection.
const STORE_FILE: &str = "photos.json";

/// The assets belonging to one owner record.
///
/// A [`RecordStore`] of [`Asset<O>`] whose backing file lives inside the
/// owner's container, plus the [`AssetIo`] boundary. Every helper that
/// introduces new binary data writes the backing file, stashes the decoded
/// blob in the cache, and persists the record in one call.
pub struct AssetCollection<O: Record + Clone> {
    store: RecordStore<Asset<O>>,
    owner: O,
    io: AssetIo,
}

impl<O: Record + Clone> AssetCollection<O> {
    /// Open the asset collection for `owner`.
    ///
    /// The store file is `owner.container()/photos.json`; the owner's
    /// container is created if needed.
    pub fn open(owner: O, io: AssetIo) -> AssetResult<Self> {
        let store = RecordStore::open(&owner.container(), STORE_FILE)?;
        Ok(Self { store, owner, io })
    }

    /// Open the collection with persistence disabled: mutations stay in
    /// memory and `photos.json` is never created or modified.
    pub fn open_preview(owner: O, io: AssetIo) -> AssetResult<Self> {
        let store = RecordStore::open_preview(&owner.container(), STORE_FILE)?;
        Ok(Self { store, owner, io })
    }

    /// The underlying record store.
    pub fn store(&self) -> &RecordStore<Asset<O>> {
        &self.store
    }

    /// Mutable access to the underlying record store, for operations not
    /// mirrored here (`delete_at`, `move_records`, `subscribe`, ...).
    pub fn store_mut(&mut self) -> &mut RecordStore<Asset<O>> {
        &mut self.store
    }

    /// The owning record.
    pub fn owner(&self) -> &O {
        &self.owner
    }

    /// Replace the in-memory collection from `photos.json` on the caller's
    /// thread.
    pub fn load_blocking(&mut self) -> AssetResult<()> {
        self.store.load_blocking()?;
        Ok(())
    }

    /// The assets currently in memory, in collection order.
    pub fn records(&self) -> &[Asset<O>] {
        self.store.records()
    }

    /// Number of assets currently in memory.
    pub fn count(&self) -> usize {
        self.store.count()
    }

    /// Returns `true` if no assets are loaded.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Create a permanent asset from raw bytes: allocate a record under
    /// the owner, write the backing file, stash the blob, and append.
    pub fn append_new(&mut self, data: &[u8]) -> AssetResult<Asset<O>> {
        let asset = Asset::new(self.owner.clone());
        self.io.write(&asset, data)?;
        self.store.append(asset.clone())?;
        Ok(asset)
    }

    /// Bulk [`append_new`](Self::append_new): one record per data blob,
    /// appended in the given order.
    pub fn append_new_all(&mut self, datas: &[Vec<u8>]) -> AssetResult<Vec<Asset<O>>> {
        let mut assets = Vec::with_capacity(datas.len());
        for data in datas {
            let asset = Asset::new(self.owner.clone());
            self.io.write(&asset, data)?;
            assets.push(asset);
        }
        self.store.append_all(assets.clone())?;
        Ok(assets)
    }

    /// Promote `temp` under the owner and append the resulting record.
    ///
    /// The asset keeps its identity, so a blob stashed when the temporary
    /// asset was written still serves from the cache.
    pub fn promote_and_append(&mut self, temp: TempAsset) -> AssetResult<Asset<O>> {
        let asset = Asset::promote(temp, self.owner.clone())?;
        self.store.append(asset.clone())?;
        Ok(asset)
    }

    /// Bulk [`promote_and_append`](Self::promote_and_append), preserving
    /// the given order.
    pub fn promote_and_append_all(
        &mut self,
        temps: Vec<TempAsset>,
    ) -> AssetResult<Vec<Asset<O>>> {
        let mut assets = Vec::with_capacity(temps.len());
        for temp in temps {
            assets.push(Asset::promote(temp, self.owner.clone())?);
        }
        self.store.append_all(assets.clone())?;
        Ok(assets)
    }

    /// Promote `temp` and insert the record in sort order (newest first).
    pub fn promote_and_insert(&mut self, temp: TempAsset) -> AssetResult<Asset<O>> {
        let asset = Asset::promote(temp, self.owner.clone())?;
        self.store.insert(asset.clone())?;
        Ok(asset)
    }

    /// Remove an asset record, deleting its backing file. No-op if absent.
    pub fn delete(&mut self, asset: &Asset<O>) -> AssetResult<()> {
        self.store.delete(asset)?;
        Ok(())
    }

    /// The first record's blob, through the cache. Absent if the
    /// collection is empty or the blob cannot be produced.
    pub fn first_blob(&self) -> Option<Bytes> {
        self.store
            .records()
            .first()
            .and_then(|asset| self.io.read(asset))
    }

    /// Read one asset's blob through the cache.
    pub fn blob(&self, asset: &Asset<O>) -> Option<Bytes> {
        self.io.read(asset)
    }
}

impl<O: Record + Clone + Send + 'static> AssetCollection<O> {
    /// Replace the in-memory collection from `photos.json` on a blocking
    /// worker.
    pub async fn load(&mut self) -> AssetResult<()> {
        self.store.load().await?;
        Ok(())
    }
}

impl<O: Record + Clone> std::fmt::Debug for AssetCollection<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetCollection")
            .field("store", &self.store)
            .field("io", &self.io)
            .finish()
    }
}
