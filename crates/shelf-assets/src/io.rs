use std::fs;
use std::io;
use std::sync::Arc;

use bytes::Bytes;
use shelf_cache::{AssetCache, Expiry};
use tracing::{debug, warn};

use crate::asset::DiskAsset;
use crate::error::{AssetError, AssetResult};

/// Decodes raw file bytes into the blob callers consume.
///
/// This is the boundary where a platform image decoder plugs in; the core
/// only ever sees opaque bytes. Returning `None` means "undecodable" —
/// on the read path that degrades to "no asset", on the write path it
/// rejects the data.
pub trait BlobDecoder: Send + Sync {
    fn decode(&self, data: &[u8]) -> Option<Bytes>;
}

/// Identity decoder: any non-empty byte sequence is its own blob.
#[derive(Clone, Copy, Debug, Default)]
pub struct RawBlobDecoder;

impl BlobDecoder for RawBlobDecoder {
    fn decode(&self, data: &[u8]) -> Option<Bytes> {
        if data.is_empty() {
            None
        } else {
            Some(Bytes::copy_from_slice(data))
        }
    }
}

/// Disk boundary for asset backing files, fronted by the shared cache.
///
/// One `AssetIo` is constructed at process start (with the process-wide
/// [`AssetCache`]) and handed to every component that reads or writes
/// assets; it is cheap to clone.
#[derive(Clone)]
pub struct AssetIo {
    cache: Arc<AssetCache>,
    decoder: Arc<dyn BlobDecoder>,
    expiry: Expiry,
}

impl AssetIo {
    /// Create an `AssetIo` over the given cache, with the identity decoder
    /// and the default expiry.
    pub fn new(cache: Arc<AssetCache>) -> Self {
        Self {
            cache,
            decoder: Arc::new(RawBlobDecoder),
            expiry: Expiry::default(),
        }
    }

    /// Replace the blob decoder.
    pub fn with_decoder(mut self, decoder: Arc<dyn BlobDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    /// Replace the cache expiry applied to stashed blobs.
    pub fn with_expiry(mut self, expiry: Expiry) -> Self {
        self.expiry = expiry;
        self
    }

    /// The shared cache behind this boundary.
    pub fn cache(&self) -> &Arc<AssetCache> {
        &self.cache
    }

    /// Write `data` as the asset's content.
    ///
    /// Empty data means "no asset": any existing backing file is deleted
    /// and the cache entry dropped. Otherwise the data must decode; the
    /// container is created if needed, the backing file written, and the
    /// decoded blob stashed in the cache.
    pub fn write(&self, asset: &impl DiskAsset, data: &[u8]) -> AssetResult<()> {
        if data.is_empty() {
            let path = asset.file_path();
            if path.exists() {
                fs::remove_file(&path)?;
            }
            self.cache.remove(&asset.id());
            debug!(id = %asset.id(), "empty write deleted asset");
            return Ok(());
        }

        let blob = self.decoder.decode(data).ok_or(AssetError::InvalidData)?;
        asset.container().ensure().map_err(AssetError::Location)?;
        fs::write(asset.file_path(), data)?;
        self.cache.put(asset.id(), blob, self.expiry);
        debug!(id = %asset.id(), bytes = data.len(), "asset written");
        Ok(())
    }

    /// Read the asset's blob, cache first.
    ///
    /// On a cache miss the backing file is read, decoded, and stashed.
    /// A missing file or a failed decode is "no asset", never an error.
    pub fn read(&self, asset: &impl DiskAsset) -> Option<Bytes> {
        if let Some(blob) = self.cache.get(&asset.id()) {
            return Some(blob);
        }

        let path = asset.file_path();
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    warn!(id = %asset.id(), error = %e, "asset read failed");
                }
                return None;
            }
        };
        let blob = self.decoder.decode(&data)?;
        self.cache.put(asset.id(), blob.clone(), self.expiry);
        Some(blob)
    }
}

impl std::fmt::Debug for AssetIo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetIo")
            .field("cache", &self.cache)
            .field("expiry", &self.expiry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::asset::TempAsset;

    use super::*;

    fn io_with_cache() -> AssetIo {
        AssetIo::new(Arc::new(AssetCache::new()))
    }

    #[test]
    fn write_then_read_through_cache() {
        let dir = tempfile::tempdir().unwrap();
        let io = io_with_cache();
        let temp = TempAsset::new_in(dir.path());

        io.write(&temp, b"abc").unwrap();
        assert!(temp.file_path().is_file());
        assert_eq!(io.read(&temp), Some(Bytes::from_static(b"abc")));
    }

    #[test]
    fn read_misses_then_stashes_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let io = io_with_cache();
        let temp = TempAsset::new_in(dir.path());
        io.write(&temp, b"abc").unwrap();

        // Forget the cached copy; the next read must hit disk and re-stash.
        io.cache().remove(&temp.id());
        assert_eq!(io.read(&temp), Some(Bytes::from_static(b"abc")));
        assert!(io.cache().get(&temp.id()).is_some());
    }

    #[test]
    fn read_of_never_written_asset_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let io = io_with_cache();
        let temp = TempAsset::new_in(dir.path());
        assert_eq!(io.read(&temp), None);
    }

    #[test]
    fn empty_write_deletes_existing_asset() {
        let dir = tempfile::tempdir().unwrap();
        let io = io_with_cache();
        let temp = TempAsset::new_in(dir.path());
        io.write(&temp, b"abc").unwrap();

        io.write(&temp, b"").unwrap();
        assert!(!temp.file_path().exists());
        assert_eq!(io.read(&temp), None);
    }

    #[test]
    fn empty_write_without_existing_asset_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let io = io_with_cache();
        let temp = TempAsset::new_in(dir.path());
        io.write(&temp, b"").unwrap();
        assert!(!temp.file_path().exists());
    }

    struct RejectEverything;

    impl BlobDecoder for RejectEverything {
        fn decode(&self, _data: &[u8]) -> Option<Bytes> {
            None
        }
    }

    #[test]
    fn undecodable_write_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let io = io_with_cache().with_decoder(Arc::new(RejectEverything));
        let temp = TempAsset::new_in(dir.path());
        assert!(matches!(
            io.write(&temp, b"abc"),
            Err(AssetError::InvalidData)
        ));
        assert!(!temp.file_path().exists());
    }

    #[test]
    fn undecodable_read_degrades_to_none() {
        let dir = tempfile::tempdir().unwrap();
        let temp = TempAsset::new_in(dir.path());
        io_with_cache().write(&temp, b"abc").unwrap();

        // A reader with a stricter decoder (and a cold cache) sees nothing
        // rather than an error.
        let strict = AssetIo::new(Arc::new(AssetCache::new()))
            .with_decoder(Arc::new(RejectEverything));
        assert_eq!(strict.read(&temp), None);
    }

    #[test]
    fn expired_cache_entry_falls_back_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let io = io_with_cache().with_expiry(Expiry::Custom(Duration::ZERO));
        let temp = TempAsset::new_in(dir.path());
        io.write(&temp, b"abc").unwrap();

        // The stashed blob expired immediately, but the file still serves.
        assert_eq!(io.cache().get(&temp.id()), None);
        assert_eq!(io.read(&temp), Some(Bytes::from_static(b"abc")));
    }
}
