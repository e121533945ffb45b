use crate::error::Result;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::reminder_models::Reminder;

/// Source of truth for reminder records.
pub trait ReminderStore: Send + Sync {
    fn list_all(&self) -> Result<Vec<Reminder>>;

    fn find_by_id(&self, id: &str) -> Result<Option<Reminder>>;

    fn insert(&self, reminder: Reminder) -> Result<Reminder>;

    /// Replaces the stored record with the same id. `None` if there is none.
    fn update(&self, reminder: Reminder) -> Result<Option<Reminder>>;

    fn delete(&self, id: &str) -> Result<bool>;
}

#[derive(Default)]
pub struct InMemoryReminderStore {
    reminders: DashMap<String, Reminder>,
}

impl InMemoryReminderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReminderStore for InMemoryReminderStore {
    fn list_all(&self) -> Result<Vec<Reminder>> {
        let mut reminders: Vec<Reminder> = self
            .reminders
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        reminders.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(reminders)
    }

    fn find_by_id(&self, id: &str) -> Result<Option<Reminder>> {
        Ok(self.reminders.get(id).map(|entry| entry.value().clone()))
    }

    fn insert(&self, reminder: Reminder) -> Result<Reminder> {
        self.reminders.insert(reminder.id.clone(), reminder.clone());
        Ok(reminder)
    }

    fn update(&self, reminder: Reminder) -> Result<Option<Reminder>> {
        match self.reminders.get_mut(&reminder.id) {
            Some(mut entry) => {
                *entry = reminder.clone();
                Ok(Some(reminder))
            }
            None => Ok(None),
        }
    }

    fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.reminders.remove(id).is_some())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RemindersFile {
    #[serde(default)]
    reminders: Vec<Reminder>,
}

/// Reminders persisted as `{"reminders": [...]}` in a single JSON file.
pub struct JsonReminderStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonReminderStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn load(&self) -> Result<Vec<Reminder>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(Vec::new()),
            Ok(raw) => {
                let file: RemindersFile = serde_json::from_str(&raw)?;
                Ok(file.reminders)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn persist(&self, reminders: Vec<Reminder>) -> Result<()> {
        let json = serde_json::to_string_pretty(&RemindersFile { reminders })?;
        write_atomically(&self.path, &json)
    }

    /// Runs a read-modify-write cycle under the store's write lock.
    fn modify<T>(&self, f: impl FnOnce(&mut Vec<Reminder>) -> (T, bool)) -> Result<T> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut reminders = self.load()?;
        let (out, changed) = f(&mut reminders);
        if changed {
            self.persist(reminders)?;
        }
        Ok(out)
    }
}

impl ReminderStore for JsonReminderStore {
    fn list_all(&self) -> Result<Vec<Reminder>> {
        self.load()
    }

    fn find_by_id(&self, id: &str) -> Result<Option<Reminder>> {
        Ok(self.load()?.into_iter().find(|r| r.id == id))
    }

    fn insert(&self, reminder: Reminder) -> Result<Reminder> {
        self.modify(|reminders| {
            reminders.push(reminder.clone());
            (reminder, true)
        })
    }

    fn update(&self, reminder: Reminder) -> Result<Option<Reminder>> {
        self.modify(|reminders| match reminders.iter_mut().find(|r| r.id == reminder.id) {
            Some(slot) => {
                *slot = reminder.clone();
                (Some(reminder), true)
            }
            None => (None, false),
        })
    }

    fn delete(&self, id: &str) -> Result<bool> {
        self.modify(|reminders| {
            let before = reminders.len();
            reminders.retain(|r| r.id != id);
            let removed = reminders.len() != before;
            (removed, removed)
        })
    }
}

/// Writes through a sibling temp file so readers never observe a torn file.
pub(crate) fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
