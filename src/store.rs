//! Roster store: the only owner of class and student records.
//!
//! Every mutation builds a fresh roster collection and swaps it in as a new
//! snapshot, so readers holding an older `Arc` never see a half-applied
//! update. The new collection is persisted before the swap.

use crate::db;
use crate::exchange;
use crate::model::{ClassRoster, Student};
use rusqlite::Connection;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

/// Where the serialized roster blob lives between sessions.
pub trait Persistence {
    fn read(&self) -> anyhow::Result<Option<String>>;
    fn write(&mut self, blob: &str) -> anyhow::Result<()>;
}

pub struct SqlitePersistence {
    conn: Connection,
    key: String,
}

impl SqlitePersistence {
    pub fn new(conn: Connection, key: impl Into<String>) -> Self {
        Self {
            conn,
            key: key.into(),
        }
    }
}

impl Persistence for SqlitePersistence {
    fn read(&self) -> anyhow::Result<Option<String>> {
        db::kv_get(&self.conn, &self.key)
    }

    fn write(&mut self, blob: &str) -> anyhow::Result<()> {
        db::kv_set(&self.conn, &self.key, blob)
    }
}

#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct MemoryPersistence {
    pub blob: Option<String>,
}

#[cfg(test)]
impl Persistence for MemoryPersistence {
    fn read(&self) -> anyhow::Result<Option<String>> {
        Ok(self.blob.clone())
    }

    fn write(&mut self, blob: &str) -> anyhow::Result<()> {
        self.blob = Some(blob.to_string());
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("class not found: {0}")]
    ClassNotFound(String),

    #[error("failed to persist rosters: {0:#}")]
    Persist(anyhow::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Restored,
    SeededEmpty,
    SeededMalformed,
}

pub struct RosterStore {
    backend: Box<dyn Persistence>,
    snapshot: Arc<Vec<ClassRoster>>,
    revision: u64,
}

impl RosterStore {
    /// Restores the persisted rosters, or falls back to `seed` when nothing
    /// is stored or the stored blob cannot be read. Fallbacks never fail the
    /// load; the seed is written back so avatars stay stable across restarts.
    pub fn load<F>(mut backend: Box<dyn Persistence>, seed: F) -> (Self, LoadOutcome)
    where
        F: FnOnce() -> Vec<ClassRoster>,
    {
        let restored = match backend.read() {
            Ok(Some(blob)) => match exchange::decode_rosters(&blob) {
                Ok(rosters) => Ok(rosters),
                Err(e) => {
                    tracing::warn!(error = %e, "stored rosters are malformed; using default seed");
                    Err(LoadOutcome::SeededMalformed)
                }
            },
            Ok(None) => Err(LoadOutcome::SeededEmpty),
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "could not read stored rosters; using default seed");
                Err(LoadOutcome::SeededMalformed)
            }
        };

        let (rosters, outcome) = match restored {
            Ok(rosters) => (rosters, LoadOutcome::Restored),
            Err(outcome) => {
                let rosters = seed();
                match exchange::encode_rosters(&rosters).and_then(|blob| backend.write(&blob)) {
                    Ok(()) => {}
                    Err(e) => tracing::warn!(error = %format!("{e:#}"), "could not persist default seed"),
                }
                (rosters, outcome)
            }
        };

        tracing::info!(classes = rosters.len(), ?outcome, "rosters loaded");
        (
            Self {
                backend,
                snapshot: Arc::new(rosters),
                revision: 0,
            },
            outcome,
        )
    }

    pub fn snapshot(&self) -> Arc<Vec<ClassRoster>> {
        Arc::clone(&self.snapshot)
    }

    pub fn rosters(&self) -> &[ClassRoster] {
        &self.snapshot
    }

    /// Bumped on every committed mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn roster(&self, class_name: &str) -> Option<&ClassRoster> {
        self.snapshot.iter().find(|c| c.class_name == class_name)
    }

    pub fn replace_all(&mut self, rosters: Vec<ClassRoster>) -> Result<(), StoreError> {
        self.commit(rosters)
    }

    /// Replaces each student of `class_name` whose id is in `ids` with
    /// `update(student)`. Returns how many records were replaced.
    pub fn apply_to_students<F>(
        &mut self,
        class_name: &str,
        ids: &HashSet<String>,
        update: F,
    ) -> Result<usize, StoreError>
    where
        F: Fn(&Student) -> Student,
    {
        if self.roster(class_name).is_none() {
            return Err(StoreError::ClassNotFound(class_name.to_string()));
        }
        if ids.is_empty() {
            return Ok(0);
        }

        let mut touched = 0;
        let next: Vec<ClassRoster> = self
            .snapshot
            .iter()
            .map(|c| {
                if c.class_name != class_name {
                    return c.clone();
                }
                ClassRoster {
                    class_name: c.class_name.clone(),
                    students: c
                        .students
                        .iter()
                        .map(|s| {
                            if ids.contains(&s.id) {
                                touched += 1;
                                update(s)
                            } else {
                                s.clone()
                            }
                        })
                        .collect(),
                }
            })
            .collect();

        if touched > 0 {
            self.commit(next)?;
        }
        Ok(touched)
    }

    fn commit(&mut self, rosters: Vec<ClassRoster>) -> Result<(), StoreError> {
        let blob = exchange::encode_rosters(&rosters).map_err(StoreError::Persist)?;
        self.backend.write(&blob).map_err(StoreError::Persist)?;
        self.snapshot = Arc::new(rosters);
        self.revision += 1;
        Ok(())
    }
}
