use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::container::Container;
use crate::error::Result;

/// A value that can live in a record store.
///
/// A record is serializable (it is persisted as one element of a
/// JSON-array-backed collection), comparable for equality (used for
/// dedup-on-append and delete-by-value), and owns an isolated directory —
/// its [`Container`] — where any data belonging to it lives.
///
/// Requirements on implementations:
/// - `container()` must be pure: the same record always resolves to the
///   same location, and calling it never touches the filesystem.
/// - Equality must be stable across a serialization round trip.
pub trait Record: Serialize + DeserializeOwned + PartialEq {
    /// The directory owned by this record.
    fn container(&self) -> Container;

    /// Release this record's on-disk footprint.
    ///
    /// Called by the store when the record is deleted, before the store
    /// file is rewritten. The default destroys the whole container
    /// directory; types whose container is shared (e.g. assets living in a
    /// common subfolder) override this to remove only what they own.
    fn discard(&self) -> Result<()> {
        self.container().destroy()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use serde::Deserialize;

    use super::*;

    #[derive(Serialize, Deserialize, PartialEq)]
    struct Note {
        title: String,
        parent: PathBuf,
    }

    impl Record for Note {
        fn container(&self) -> Container {
            Container::resolve(self.title.clone(), self.parent.clone())
                .expect("note title is a valid container name")
        }
    }

    #[test]
    fn default_discard_destroys_container() {
        let dir = tempfile::tempdir().unwrap();
        let note = Note {
            title: "groceries".into(),
            parent: dir.path().to_path_buf(),
        };
        let path = note.container().ensure().unwrap();
        assert!(path.is_dir());

        note.discard().unwrap();
        assert!(!note.container().exists());
    }

    #[test]
    fn discard_of_never_created_container_is_noop() {
        let note = Note {
            title: "phantom".into(),
            parent: PathBuf::from("/nonexistent/shelf-test"),
        };
        assert!(note.discard().is_ok());
    }
}
