//! JSON-file-backed ordered record collections.
//!
//! A [`RecordStore`] holds an ordered collection of [`Record`]s in memory
//! and mirrors it to a single JSON file: the unit of I/O is always "read
//! whole file / write whole file". Loads may be offloaded to a blocking
//! worker; mutations run on the caller's thread and immediately re-persist
//! the full collection with an atomic overwrite.
//!
//! # Design Rules
//!
//! 1. A missing or zero-length backing file is an empty collection, never
//!    an error.
//! 2. `save` is all-or-nothing: on failure the previous file contents stay
//!    intact (write to a temp file, then rename into place).
//! 3. `append` deduplicates by the record's equality; bulk append does not.
//! 4. Sorted insertion re-sorts the whole collection with a stable sort, so
//!    equal elements keep their insertion order.
//! 5. Deleting a record also discards its on-disk container before the
//!    store file is rewritten.
//! 6. A store has a single logical owner: mutations take `&mut self` and
//!    are never internally locked.
//!
//! [`Record`]: shelf_types::Record

pub mod error;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use store::RecordStore;
