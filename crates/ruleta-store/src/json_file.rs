//! A JSON array persisted as one file, guarded by a mutex.
//!
//! Elements are kept as raw JSON values between read and write, so an
//! element that does not match `T` is carried through every rewrite
//! untouched. Only a non-array or unreadable file counts as empty.

use ruleta_core::error::{Result, RuletaError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// The elements of a list file during a read-modify-write.
///
/// Indices are positions in the file, including elements that do not
/// parse as `T`.
pub struct Records<T> {
    values: Vec<Value>,
    _items: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> Records<T> {
    fn new(values: Vec<Value>) -> Self {
        Self {
            values,
            _items: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Elements that parse as `T`, with their position in the file.
    pub fn parsed(&self) -> Vec<(usize, T)> {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| serde_json::from_value(v.clone()).ok().map(|item| (i, item)))
            .collect()
    }

    /// String field `key` of the element at `index`, whether or not the element parses.
    pub fn str_field(&self, index: usize, key: &str) -> Option<&str> {
        self.values.get(index)?.get(key)?.as_str()
    }

    pub fn push(&mut self, item: &T) -> Result<()> {
        self.values.push(serde_json::to_value(item)?);
        Ok(())
    }

    pub fn insert(&mut self, index: usize, item: &T) -> Result<()> {
        self.values.insert(index.min(self.values.len()), serde_json::to_value(item)?);
        Ok(())
    }

    /// Remove the element at `index`, parsed or not.
    pub fn remove(&mut self, index: usize) {
        if index < self.values.len() {
            self.values.remove(index);
        }
    }

    /// Keep only the elements for which `keep` returns true.
    pub fn retain(&mut self, keep: impl FnMut(&Value) -> bool) {
        self.values.retain(keep);
    }
}

/// File-backed list of `T`.
///
/// Every operation holds the file lock for its whole read-modify-write cycle,
/// so writers in the same process never interleave.
pub struct JsonListFile<T> {
    path: PathBuf,
    lock: Mutex<()>,
    _items: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> JsonListFile<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
            _items: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the items that parse as `T`, in file order.
    pub fn load(&self) -> Vec<T> {
        let _guard = self.guard();
        let values = self.read();
        let total = values.len();
        let items: Vec<T> = Records::new(values).parsed().into_iter().map(|(_, item)| item).collect();
        if items.len() < total {
            tracing::warn!(
                "⚠️ Skipping {} malformed element(s) in {}",
                total - items.len(),
                self.path.display()
            );
        }
        items
    }

    /// Overwrite the file with `items`.
    pub fn save(&self, items: &[T]) -> Result<()> {
        let _guard = self.guard();
        let values = items
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        self.write(&values)
    }

    /// Load, let `f` mutate the records, then persist them.
    ///
    /// If `f` fails the file is left untouched and the error is returned.
    pub fn modify<R>(&self, f: impl FnOnce(&mut Records<T>) -> Result<R>) -> Result<R> {
        let _guard = self.guard();
        let mut records = Records::new(self.read());
        let out = f(&mut records)?;
        self.write(&records.values)?;
        Ok(out)
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read(&self) -> Vec<Value> {
        if !self.path.exists() {
            return Vec::new();
        }
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("⚠️ Failed to read {}: {e}", self.path.display());
                return Vec::new();
            }
        };
        match serde_json::from_str(&json) {
            Ok(Value::Array(values)) => values,
            Ok(_) => {
                tracing::warn!("⚠️ {} does not hold a JSON array", self.path.display());
                Vec::new()
            }
            Err(e) => {
                tracing::warn!("⚠️ Failed to parse {}: {e}", self.path.display());
                Vec::new()
            }
        }
    }

    fn write(&self, values: &[Value]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // 4-space indent, non-ASCII written as-is.
        let mut buf = Vec::new();
        let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        values.serialize(&mut ser)?;

        // Write beside the target and rename so readers never see a half-written file.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, &buf)
            .map_err(|e| RuletaError::Storage(format!("Write {}: {e}", tmp.display())))?;
        std::fs::rename(&tmp, &self.path)
            .map_err(|e| RuletaError::Storage(format!("Replace {}: {e}", self.path.display())))?;

        tracing::debug!("💾 Saved {} item(s) to {}", values.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ruleta_core::Person;

    fn temp_file(name: &str) -> (PathBuf, JsonListFile<Person>) {
        let dir = std::env::temp_dir().join(format!("ruleta-test-json-{}", uuid::Uuid::new_v4()));
        let file = JsonListFile::new(dir.join(name));
        (dir, file)
    }

    #[test]
    fn test_missing_file_is_empty() {
        let (dir, file) = temp_file("people.json");
        assert!(file.load().is_empty());
        assert!(!dir.exists());
    }

    #[test]
    fn test_save_creates_dir_and_pretty_prints() {
        let (dir, file) = temp_file("people.json");
        file.save(&[Person::new("José", Some("jose@example.com".into()))]).unwrap();

        let raw = std::fs::read_to_string(file.path()).unwrap();
        assert!(raw.contains("José"), "non-ASCII must not be escaped: {raw}");
        assert!(raw.contains("\n        \"name\": \"José\""), "4-space indent: {raw}");
        assert!(raw.find("\"name\"").unwrap() < raw.find("\"email\"").unwrap(), "field order: {raw}");
        assert!(!dir.join("people.json.tmp").exists());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_object_instead_of_array_is_empty() {
        let (dir, file) = temp_file("people.json");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(file.path(), r#"{"name": "Ana", "email": null}"#).unwrap();
        assert!(file.load().is_empty());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_garbage_is_empty() {
        let (dir, file) = temp_file("people.json");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(file.path(), "not json at all [").unwrap();
        assert!(file.load().is_empty());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_malformed_elements_survive_rewrite() {
        let (dir, file) = temp_file("people.json");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            file.path(),
            r#"[{"name": "Ana"}, {"email": "sin-nombre@example.com", "extra": 1}, {"name": "Bruno", "email": null}]"#,
        )
        .unwrap();

        assert_eq!(
            file.load(),
            vec![Person::new("Ana", None), Person::new("Bruno", None)]
        );

        file.modify(|records| {
            assert_eq!(records.len(), 3);
            assert_eq!(records.parsed().len(), 2);
            records.push(&Person::new("Carla", None))
        })
        .unwrap();

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(file.path()).unwrap()).unwrap();
        let values = raw.as_array().unwrap();
        assert_eq!(values.len(), 4);
        assert_eq!(
            values[1],
            serde_json::json!({"email": "sin-nombre@example.com", "extra": 1})
        );
        assert_eq!(values[3]["name"], "Carla");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_str_field_reads_unparsed_elements() {
        let records: Records<Person> = Records::new(vec![
            serde_json::json!({"date": "01/01/2024"}),
            serde_json::json!(42),
        ]);
        assert_eq!(records.str_field(0, "date"), Some("01/01/2024"));
        assert_eq!(records.str_field(1, "date"), None);
        assert_eq!(records.str_field(5, "date"), None);
    }

    #[test]
    fn test_failed_modify_leaves_file_untouched() {
        let (dir, file) = temp_file("people.json");
        file.save(&[Person::new("Ana", None)]).unwrap();
        let before = std::fs::read(file.path()).unwrap();

        let result: Result<()> = file.modify(|records| {
            records.remove(0);
            Err(RuletaError::NoParticipants)
        });
        assert!(matches!(result, Err(RuletaError::NoParticipants)));
        assert_eq!(std::fs::read(file.path()).unwrap(), before);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_concurrent_modifications_are_serialized() {
        let (dir, file) = temp_file("people.json");
        let file = std::sync::Arc::new(file);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let file = file.clone();
                std::thread::spawn(move || {
                    file.modify(|records| records.push(&Person::new(format!("p{i}"), None)))
                        .unwrap();
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(file.load().len(), 8);
        std::fs::remove_dir_all(&dir).ok();
    }
}
