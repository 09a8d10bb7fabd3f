//! Two-phase binary asset lifecycle for shelf.
//!
//! An asset is an opaque binary blob (typically an image) stored in a file
//! named by its [`AssetId`](shelf_types::AssetId) under a `Photos`
//! sub-container. Assets live in one of two phases:
//!
//! - [`TempAsset`] — created before its owning record exists, rooted at a
//!   process-wide temporary area
//! - [`Asset`] — owned by a record; its container derives from the owner's
//!
//! Promotion ([`Asset::promote`]) consumes a `TempAsset` and moves its
//! backing file into the owner's permanent container, preserving identity
//! and creation time — because the identity survives, so does any blob
//! already stashed in the cache.
//!
//! [`AssetIo`] is the disk boundary: it writes and reads backing files
//! through an injected [`AssetCache`](shelf_cache::AssetCache) and a
//! pluggable [`BlobDecoder`]. Read failures degrade to "no asset" rather
//! than erroring.
//!
//! [`AssetCollection`] composes the pieces: a
//! [`RecordStore`](shelf_store::RecordStore) of assets scoped to one owner
//! record, with helpers that write, promote, and persist in one call.

pub mod asset;
pub mod collection;
pub mod error;
pub mod io;

pub use asset::{Asset, DiskAsset, TempAsset, ASSET_SUBFOLDER};
pub use collection::AssetCollection;
pub use error::{AssetError, AssetResult};
pub use io::{AssetIo, BlobDecoder, RawBlobDecoder};
