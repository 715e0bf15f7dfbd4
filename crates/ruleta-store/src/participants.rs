//! Participant roster store.

use crate::json_file::{JsonListFile, Records};
use ruleta_core::Person;
use ruleta_core::error::Result;
use std::path::{Path, PathBuf};

/// File-based roster of people eligible to be drawn.
pub struct ParticipantStore {
    file: JsonListFile<Person>,
}

impl ParticipantStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: JsonListFile::new(path),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Current roster in insertion order.
    pub fn list(&self) -> Vec<Person> {
        self.file.load()
    }

    /// Add `person` at the end. Duplicate names are accepted.
    pub fn append(&self, person: Person) -> Result<Person> {
        self.file.modify(|people| people.push(&person))?;
        tracing::info!("➕ Participant added: {}", person.name);
        Ok(person)
    }

    /// Remove every entry called `name`. Returns how many were removed.
    ///
    /// Matches on the raw `name` field, so entries that are otherwise
    /// malformed are removed too, and entries without a name are kept.
    pub fn remove_by_name(&self, name: &str) -> Result<usize> {
        let removed = self.file.modify(|people| {
            let before = people.len();
            people.retain(|p| p.get("name").and_then(|n| n.as_str()) != Some(name));
            Ok(before - people.len())
        })?;
        tracing::info!("➖ Removed {removed} participant(s) named {name:?}");
        Ok(removed)
    }

    /// Overwrite the whole roster.
    pub fn replace(&self, people: &[Person]) -> Result<()> {
        self.file.save(people)
    }

    /// Read-modify-write under the roster lock. Nothing is written if `f` fails.
    pub fn modify<R>(&self, f: impl FnOnce(&mut Records<Person>) -> Result<R>) -> Result<R> {
        self.file.modify(f)
    }
}
