//! Generic identity-keyed store backed by a single JSON array document.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use storekeeper_core::Entity;

use super::RepositoryError;

/// Durable storage for one entity type.
///
/// The whole set is cached in memory and every mutation rewrites the full
/// document. Writes go to a sibling `*.tmp` file which is synced and then
/// renamed over the document, so a crash mid-write leaves the previous
/// version intact. The cache only changes after the write succeeds.
///
/// Identity uniqueness is not checked here; callers generate identities.
#[derive(Debug)]
pub struct JsonStore<T> {
    path: PathBuf,
    items: Vec<T>,
}

impl<T: Entity> JsonStore<T> {
    /// Open the document at `path`, creating it (and its directory) as `[]`
    /// when missing, and load it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidExtension` if `path` does not end in
    /// `.json` (any case), or an I/O or parse error from the initial load.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let path = path.into();
        if !has_json_extension(&path) {
            return Err(RepositoryError::InvalidExtension(path));
        }

        let mut store = Self {
            path,
            items: Vec::new(),
        };
        store.load_all()?;
        Ok(store)
    }

    /// Cached entities, in document order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Number of cached entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Re-read the document and replace the cache.
    ///
    /// A missing document is recreated as `[]` first. Whitespace-only and
    /// `null` documents load as empty.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Io` or `RepositoryError::Parse`.
    pub fn load_all(&mut self) -> Result<Vec<T>, RepositoryError> {
        self.ensure_document()?;

        let text = fs::read_to_string(&self.path).map_err(|source| RepositoryError::Io {
            path: self.path.clone(),
            source,
        })?;

        let items = if text.trim().is_empty() {
            Vec::new()
        } else {
            serde_json::from_str::<Option<Vec<T>>>(&text)
                .map_err(|source| RepositoryError::Parse {
                    path: self.path.clone(),
                    source,
                })?
                .unwrap_or_default()
        };

        tracing::debug!(path = %self.path.display(), count = items.len(), "Loaded document");
        self.items.clone_from(&items);
        Ok(items)
    }

    /// Find a cached entity by identity.
    #[must_use]
    pub fn get_by_id(&self, id: &T::Id) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Append an entity and rewrite the document.
    ///
    /// # Errors
    ///
    /// Returns a serialization or I/O error; the cache is left unchanged.
    pub fn add(&mut self, entity: T) -> Result<(), RepositoryError> {
        let mut next = self.items.clone();
        next.push(entity);
        self.save_all(next)
    }

    /// Replace the entity with the same identity and rewrite the document.
    ///
    /// Returns `false` without writing when no entity has that identity.
    ///
    /// # Errors
    ///
    /// Returns a serialization or I/O error; the cache is left unchanged.
    pub fn update(&mut self, entity: T) -> Result<bool, RepositoryError> {
        let mut next = self.items.clone();
        let Some(slot) = next.iter_mut().find(|item| item.id() == entity.id()) else {
            tracing::debug!(path = %self.path.display(), id = %entity.id(), "Update skipped, id not found");
            return Ok(false);
        };
        *slot = entity;
        self.save_all(next)?;
        Ok(true)
    }

    /// Remove every entity with the given identity and rewrite the document.
    ///
    /// Returns the number of entities removed.
    ///
    /// # Errors
    ///
    /// Returns a serialization or I/O error; the cache is left unchanged.
    pub fn delete(&mut self, id: &T::Id) -> Result<usize, RepositoryError> {
        let next: Vec<T> = self
            .items
            .iter()
            .filter(|item| item.id() != id)
            .cloned()
            .collect();
        let removed = self.items.len() - next.len();
        self.save_all(next)?;
        Ok(removed)
    }

    /// Unconditionally rewrite the document with `items` and replace the cache.
    ///
    /// # Errors
    ///
    /// Returns a serialization or I/O error; the cache is left unchanged.
    pub fn save_all(&mut self, items: Vec<T>) -> Result<(), RepositoryError> {
        let json =
            serde_json::to_string_pretty(&items).map_err(|source| RepositoryError::Serialize {
                path: self.path.clone(),
                source,
            })?;

        write_atomically(&self.path, json.as_bytes())?;

        tracing::debug!(path = %self.path.display(), count = items.len(), "Saved document");
        self.items = items;
        Ok(())
    }

    fn ensure_document(&self) -> Result<(), RepositoryError> {
        let io_err = |source| RepositoryError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        if !self.path.exists() {
            tracing::info!(path = %self.path.display(), "Creating empty document");
            fs::write(&self.path, "[]").map_err(io_err)?;
        }

        Ok(())
    }
}

/// Whether `path` names a `.json` document (case-insensitive).
fn has_json_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Write `bytes` to `path` via a synced `.tmp` sibling and a rename.
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), RepositoryError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let result = File::create(&tmp)
        .and_then(|mut file| {
            file.write_all(bytes)?;
            file.sync_all()
        })
        .and_then(|()| fs::rename(&tmp, path));

    result.map_err(|source| {
        let _ = fs::remove_file(&tmp);
        RepositoryError::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: String,
        body: String,
    }

    impl Entity for Note {
        type Id = String;

        fn id(&self) -> &String {
            &self.id
        }
    }

    fn note(id: &str, body: &str) -> Note {
        Note {
            id: id.to_string(),
            body: body.to_string(),
        }
    }

    fn open_in(dir: &Path) -> JsonStore<Note> {
        JsonStore::open(dir.join("notes.json")).unwrap()
    }

    #[test]
    fn test_open_rejects_non_json_extension() {
        let tmp = tempfile::tempdir().unwrap();
        let err = JsonStore::<Note>::open(tmp.path().join("notes.txt")).unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidExtension(_)));
        assert!(!tmp.path().join("notes.txt").exists());
    }

    #[test]
    fn test_open_accepts_uppercase_extension() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(JsonStore::<Note>::open(tmp.path().join("NOTES.JSON")).is_ok());
    }

    #[test]
    fn test_roundtrip_preserves_fields_and_order() {
        let tmp = tempfile::tempdir().unwrap();
        let notes = vec![note("a", "first"), note("b", "second"), note("c", "third")];

        let mut store = open_in(tmp.path());
        store.save_all(notes.clone()).unwrap();

        let mut reopened = open_in(tmp.path());
        assert_eq!(reopened.load_all().unwrap(), notes);
        assert_eq!(reopened.items(), notes.as_slice());
    }

    #[test]
    fn test_add_and_get_by_id() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = open_in(tmp.path());

        store.add(note("a", "hello")).unwrap();
        store.add(note("b", "world")).unwrap();

        assert_eq!(store.get_by_id(&"b".to_string()).unwrap().body, "world");
        assert!(store.get_by_id(&"zzz".to_string()).is_none());
        assert_eq!(open_in(tmp.path()).len(), 2);
    }

    #[test]
    fn test_update_replaces_in_place() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = open_in(tmp.path());
        store
            .save_all(vec![note("a", "1"), note("b", "2"), note("c", "3")])
            .unwrap();

        assert!(store.update(note("b", "two")).unwrap());

        let reloaded = open_in(tmp.path());
        let bodies: Vec<_> = reloaded.items().iter().map(|n| n.body.as_str()).collect();
        assert_eq!(bodies, ["1", "two", "3"]);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = open_in(tmp.path());
        store.add(note("a", "1")).unwrap();

        assert!(!store.update(note("missing", "x")).unwrap());
        assert_eq!(store.len(), 1);
        assert_eq!(open_in(tmp.path()).items(), &[note("a", "1")]);
    }

    #[test]
    fn test_delete_removes_all_matches() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = open_in(tmp.path());
        store
            .save_all(vec![note("a", "1"), note("b", "2"), note("a", "dup")])
            .unwrap();

        assert_eq!(store.delete(&"a".to_string()).unwrap(), 2);
        assert_eq!(open_in(tmp.path()).items(), &[note("b", "2")]);
        assert_eq!(store.delete(&"a".to_string()).unwrap(), 0);
    }

    #[test]
    fn test_load_all_recreates_missing_document() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = open_in(tmp.path());
        store.add(note("a", "1")).unwrap();

        fs::remove_file(tmp.path().join("notes.json")).unwrap();

        assert!(store.load_all().unwrap().is_empty());
        assert_eq!(
            fs::read_to_string(tmp.path().join("notes.json")).unwrap(),
            "[]"
        );
    }

    #[test]
    fn test_load_all_treats_blank_and_null_as_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("notes.json");

        fs::write(&path, "  \n").unwrap();
        assert!(open_in(tmp.path()).is_empty());

        fs::write(&path, "null").unwrap();
        assert!(open_in(tmp.path()).is_empty());
    }

    #[test]
    fn test_load_all_reports_parse_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = open_in(tmp.path());
        store.add(note("a", "1")).unwrap();

        fs::write(tmp.path().join("notes.json"), r#"{"id": "a"}"#).unwrap();

        let err = store.load_all().unwrap_err();
        assert!(matches!(err, RepositoryError::Parse { .. }));
        // Cache keeps the last good load
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_failed_write_leaves_cache_untouched() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = open_in(tmp.path());
        store.add(note("a", "1")).unwrap();

        // A directory where the temp file should go makes File::create fail
        fs::create_dir(tmp.path().join("notes.json.tmp")).unwrap();

        assert!(matches!(
            store.add(note("b", "2")),
            Err(RepositoryError::Io { .. })
        ));
        assert_eq!(store.items(), &[note("a", "1")]);
        assert_eq!(open_in(tmp.path()).items(), &[note("a", "1")]);
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = open_in(tmp.path());
        store.add(note("a", "1")).unwrap();
        assert!(!tmp.path().join("notes.json.tmp").exists());
    }
}
