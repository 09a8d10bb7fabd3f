use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use shelf_types::{validate_container_name, Container, Record};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// Change-notification callback, invoked with the post-mutation snapshot.
pub type Subscriber<T> = Box<dyn Fn(&[T]) + Send>;

/// An ordered collection of records backed by one JSON file.
///
/// The collection lives in memory; every successful mutation re-serializes
/// it in full and atomically overwrites the backing file. A store has a
/// single logical owner — mutations take `&mut self` and must be
/// externally serialized if shared across threads.
///
/// A *preview* store (see [`open_preview`]) mutates in memory only and
/// never creates or touches the backing file, without changing call sites.
///
/// [`open_preview`]: RecordStore::open_preview
pub struct RecordStore<T: Record> {
    path: PathBuf,
    records: Vec<T>,
    persist: bool,
    subscribers: Vec<Subscriber<T>>,
}

impl<T: Record> std::fmt::Debug for RecordStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("path", &self.path)
            .field("records", &self.records.len())
            .field("persist", &self.persist)
            .finish()
    }
}

impl<T: Record> RecordStore<T> {
    /// Open a store backed by `file_name` inside `container`.
    ///
    /// The container directory is created if needed. The backing file is
    /// not read until [`load`](Self::load) and not created until the first
    /// mutation.
    pub fn open(container: &Container, file_name: &str) -> StoreResult<Self> {
        Self::open_inner(container, file_name, true)
    }

    /// Open a store whose `save` is a no-op.
    ///
    /// Mutations change the in-memory collection (and notify subscribers)
    /// but the backing file is never created or modified.
    pub fn open_preview(container: &Container, file_name: &str) -> StoreResult<Self> {
        Self::open_inner(container, file_name, false)
    }

    fn open_inner(container: &Container, file_name: &str, persist: bool) -> StoreResult<Self> {
        validate_container_name(file_name)?;
        let dir = container.ensure()?;
        Ok(Self {
            path: dir.join(file_name),
            records: Vec::new(),
            persist,
            subscribers: Vec::new(),
        })
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if this store never writes to disk.
    pub fn is_preview(&self) -> bool {
        !self.persist
    }

    /// The current in-memory collection, in order.
    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Number of records currently in memory.
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the in-memory collection is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Register a change callback.
    ///
    /// The callback receives the post-mutation snapshot after every
    /// successful mutating operation, including in preview mode. This is
    /// the seam a UI layer binds to.
    ///
    /// Loads do not fire callbacks: [`load`](Self::load) and
    /// [`load_blocking`](Self::load_blocking) replace the collection
    /// wholesale rather than mutating it, and the caller that initiated
    /// the load already holds the result.
    pub fn subscribe<F>(&mut self, subscriber: F)
    where
        F: Fn(&[T]) + Send + 'static,
    {
        self.subscribers.push(Box::new(subscriber));
    }

    // ---------------------------------------------------------------
    // Load / save
    // ---------------------------------------------------------------

    /// Replace the in-memory collection with the backing file's contents,
    /// reading on the caller's thread.
    ///
    /// A missing or zero-length file yields an empty collection. Malformed
    /// content fails with [`StoreError::Decode`] and leaves the in-memory
    /// collection unchanged. Never mutates the file.
    pub fn load_blocking(&mut self) -> StoreResult<()> {
        let records = read_records(&self.path)?;
        debug!(path = %self.path.display(), count = records.len(), "store loaded");
        self.records = records;
        Ok(())
    }

    /// Serialize the full in-memory collection and overwrite the backing
    /// file in one atomic step.
    ///
    /// The bytes are written to a temporary file in the same directory and
    /// renamed into place, so a failed save leaves the previous contents
    /// visible to any subsequent read. No-op in preview mode.
    pub fn save(&self) -> StoreResult<()> {
        if !self.persist {
            return Ok(());
        }
        let data = serde_json::to_vec_pretty(&self.records).map_err(StoreError::Encode)?;
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut staged = NamedTempFile::new_in(dir)?;
        staged.write_all(&data)?;
        staged.as_file().sync_all()?;
        staged
            .persist(&self.path)
            .map_err(|e| StoreError::Io(e.error))?;
        debug!(path = %self.path.display(), count = self.records.len(), "store saved");
        Ok(())
    }

    // ---------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------

    /// Add `item` at the end unless an equal record is already present.
    pub fn append(&mut self, item: T) -> StoreResult<()> {
        if self.records.contains(&item) {
            return Ok(());
        }
        self.records.push(item);
        self.commit()
    }

    /// Add all `items` at the end, preserving their given order.
    ///
    /// Unlike [`append`](Self::append), no deduplication is applied.
    pub fn append_all(&mut self, items: Vec<T>) -> StoreResult<()> {
        self.records.extend(items);
        self.commit()
    }

    /// Remove the record equal to `item`, discarding its on-disk
    /// container. No-op if absent.
    pub fn delete(&mut self, item: &T) -> StoreResult<()> {
        match self.records.iter().position(|record| record == item) {
            Some(index) => self.remove_at(index),
            None => Ok(()),
        }
    }

    /// Remove the record at `index`, discarding its on-disk container.
    pub fn delete_at(&mut self, index: usize) -> StoreResult<()> {
        if index >= self.records.len() {
            return Err(StoreError::OutOfBounds {
                index,
                len: self.records.len(),
            });
        }
        self.remove_at(index)
    }

    fn remove_at(&mut self, index: usize) -> StoreResult<()> {
        let item = self.records.remove(index);
        item.discard()?;
        self.commit()
    }

    /// Move the records at `from` (any order, duplicates ignored) so they
    /// sit, in their original relative order, before the record that was at
    /// offset `to`. `to == count()` moves them to the end.
    pub fn move_records(&mut self, from: &[usize], to: usize) -> StoreResult<()> {
        let len = self.records.len();
        if let Some(&bad) = from.iter().find(|&&index| index >= len) {
            return Err(StoreError::OutOfBounds { index: bad, len });
        }
        if to > len {
            return Err(StoreError::OutOfBounds { index: to, len });
        }

        let mut sources: Vec<usize> = from.to_vec();
        sources.sort_unstable();
        sources.dedup();

        let mut moved = Vec::with_capacity(sources.len());
        for &index in sources.iter().rev() {
            moved.push(self.records.remove(index));
        }
        moved.reverse();

        // Removing sources below `to` shifts the destination left.
        let insert_at = to - sources.iter().filter(|&&index| index < to).count();
        for (slot, item) in moved.into_iter().enumerate() {
            self.records.insert(insert_at + slot, item);
        }
        self.commit()
    }

    fn commit(&mut self) -> StoreResult<()> {
        self.save()?;
        self.notify();
        Ok(())
    }

    fn notify(&self) {
        for subscriber in &self.subscribers {
            subscriber(&self.records);
        }
    }
}

impl<T: Record + Send + 'static> RecordStore<T> {
    /// Replace the in-memory collection with the backing file's contents,
    /// reading on a blocking worker so a large file does not stall the
    /// caller's task.
    ///
    /// Two overlapping loads against the same store have no result-order
    /// guarantee; callers that need determinism must not overlap them.
    pub async fn load(&mut self) -> StoreResult<()> {
        let path = self.path.clone();
        let records = tokio::task::spawn_blocking(move || read_records::<T>(&path))
            .await
            .map_err(|e| StoreError::Background(e.to_string()))??;
        debug!(path = %self.path.display(), count = records.len(), "store loaded");
        self.records = records;
        Ok(())
    }
}

impl<T: Record + Ord> RecordStore<T> {
    /// Add `item` and re-sort the whole collection.
    ///
    /// The sort is stable: records that compare equal keep their insertion
    /// order.
    pub fn insert(&mut self, item: T) -> StoreResult<()> {
        self.records.push(item);
        self.records.sort();
        self.commit()
    }

    /// Add all `items` and re-sort the whole collection.
    pub fn insert_all(&mut self, items: Vec<T>) -> StoreResult<()> {
        self.records.extend(items);
        self.records.sort();
        self.commit()
    }
}

fn read_records<T: Record>(path: &Path) -> StoreResult<Vec<T>> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    if data.is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_slice(&data).map_err(|source| StoreError::Decode {
        path: path.to_path_buf(),
        source,
    })
}
