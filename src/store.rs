//! Persistence contract for the working set.
//!
//! The tracker only knows [`Store`]: `load` at startup and `save` after each
//! mutation. `load` never fails; anything it cannot read comes back as
//! `None` and the tracker seeds instead.

use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;

use crate::config::Config;
use crate::error::Result;
use crate::model::WorkingSet;
use crate::storage::Storage;

pub trait Store {
    /// Previously saved working set, or `None` when absent or unreadable.
    fn load(&self) -> Option<WorkingSet>;

    /// Persist the full working set.
    fn save(&self, set: &WorkingSet) -> Result<()>;
}

impl<S: Store + ?Sized> Store for &S {
    fn load(&self) -> Option<WorkingSet> {
        (**self).load()
    }

    fn save(&self, set: &WorkingSet) -> Result<()> {
        (**self).save(set)
    }
}

/// Working set as a pretty JSON file in the data directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    storage: Storage,
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(storage: Storage, key: &str) -> Self {
        let path = storage.working_set_file(key);
        Self { storage, path }
    }

    pub fn from_config(storage: Storage, config: &Config) -> Self {
        Self::new(storage, config.storage.key.trim())
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Store for JsonFileStore {
    fn load(&self) -> Option<WorkingSet> {
        match self.storage.read_json::<WorkingSet>(&self.path) {
            Ok(Some(set)) => {
                tracing::debug!(
                    path = %self.path.display(),
                    projects = set.projects.len(),
                    tasks = set.tasks.len(),
                    "loaded working set"
                );
                Some(set)
            }
            Ok(None) => {
                tracing::debug!(path = %self.path.display(), "no saved working set");
                None
            }
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "unreadable working set");
                None
            }
        }
    }

    fn save(&self, set: &WorkingSet) -> Result<()> {
        self.storage.ensure_dir()?;
        self.storage.write_json(&self.path, set)?;
        tracing::debug!(path = %self.path.display(), "saved working set");
        Ok(())
    }
}

/// In-process store. Clones share the same slot, so a second tracker opened
/// on a clone sees what the first one saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Rc<RefCell<Option<WorkingSet>>>,
    saves: Rc<Cell<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(set: WorkingSet) -> Self {
        let store = Self::default();
        store.slot.replace(Some(set));
        store
    }

    /// Number of successful `save` calls so far
    pub fn saves(&self) -> usize {
        self.saves.get()
    }

    pub fn snapshot(&self) -> Option<WorkingSet> {
        self.slot.borrow().clone()
    }
}

impl Store for MemoryStore {
    fn load(&self) -> Option<WorkingSet> {
        self.snapshot()
    }

    fn save(&self, set: &WorkingSet) -> Result<()> {
        self.slot.replace(Some(set.clone()));
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
