//! Bounded, expiring in-memory cache for asset blobs.
//!
//! [`AssetCache`] shadows disk reads for hot assets: a capacity-bounded map
//! from [`AssetId`](shelf_types::AssetId) to an opaque blob, where entries
//! expire after a configurable duration. It is a pure side-cache — a miss
//! only means the caller falls back to disk, never an error.
//!
//! # Design Rules
//!
//! 1. The capacity bound is the invariant: the cache never holds more than
//!    `capacity` entries, whichever entry eviction picks.
//! 2. Eviction is deterministic: expired entries go first, then the oldest
//!    insertion.
//! 3. Expiry is lazy — there is no background sweep; an expired entry is
//!    treated as absent and dropped when touched.
//! 4. All internal bookkeeping is serialized behind a mutex so concurrent
//!    `get`/`put` from any thread cannot corrupt it or exceed capacity.
//! 5. The cache is an explicit service instance, shared via `Arc` —
//!    no global singleton.

pub mod cache;
pub mod expiry;

pub use cache::{AssetCache, DEFAULT_CAPACITY};
pub use expiry::Expiry;
