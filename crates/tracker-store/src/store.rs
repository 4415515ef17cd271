use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracker_core::{Category, Record, StoreError, WeightEntry};

use crate::lock::{with_exclusive, with_shared};
use crate::sequence::{SEQUENCE_FILE, Sequence};

/// JSON array files, one per category, under a single data directory.
///
/// ```text
/// <data_dir>/
/// ├── weight.json      [ {...}, ... ]
/// ├── exercise.json
/// ├── fasting.json
/// ├── soda.json
/// ├── sequence.toml    (weight ID counter)
/// └── .<category>.lock (advisory lock per file)
/// ```
///
/// Reads take a shared lock, every read-modify-write takes an exclusive lock,
/// and files are replaced with temp-file + rename.
#[derive(Debug, Clone)]
pub struct RecordStore {
    data_dir: PathBuf,
}

impl RecordStore {
    /// Open the store, creating the directory and empty category files as needed.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir).map_err(|source| StoreError::Io {
            path: data_dir.clone(),
            source,
        })?;

        let store = Self { data_dir };
        for category in Category::ALL {
            let path = store.path_for(category);
            if !path.exists() {
                with_exclusive(&store.lock_path_for(category), || {
                    if !path.exists() {
                        atomic_write(&path, b"[]\n")?;
                        tracing::debug!(file = %path.display(), "initialized empty data file");
                    }
                    Ok(())
                })?;
            }
        }
        Ok(store)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn path_for(&self, category: Category) -> PathBuf {
        self.data_dir.join(category.file_name())
    }

    fn lock_path_for(&self, category: Category) -> PathBuf {
        self.data_dir.join(category.lock_file_name())
    }

    // -- Reads (shared lock) -------------------------------------------------

    /// All entries in file order.
    pub fn load_all<T: Record>(&self) -> Result<Vec<T>, StoreError> {
        with_shared(&self.lock_path_for(T::CATEGORY), || {
            read_entries(&self.path_for(T::CATEGORY))
        })
    }

    pub fn find_by_date<T: Record>(&self, date: NaiveDate) -> Result<Option<T>, StoreError> {
        Ok(self
            .load_all::<T>()?
            .into_iter()
            .find(|entry| entry.date() == date))
    }

    /// Entries with `from <= date <= to`, sorted by date.
    pub fn range<T: Record>(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<T>, StoreError> {
        let mut entries: Vec<T> = self
            .load_all::<T>()?
            .into_iter()
            .filter(|entry| from <= entry.date() && entry.date() <= to)
            .collect();
        entries.sort_by_key(Record::date);
        Ok(entries)
    }

    /// The chronologically latest entry, regardless of file order.
    pub fn latest<T: Record>(&self) -> Result<Option<T>, StoreError> {
        Ok(self.load_all::<T>()?.into_iter().max_by_key(Record::date))
    }

    /// Closest entries strictly before and strictly after `date`.
    ///
    /// Entries dated `skip` are ignored, which lets an update exclude the
    /// entry being edited when its date changes.
    pub fn neighbors<T: Record>(
        &self,
        date: NaiveDate,
        skip: Option<NaiveDate>,
    ) -> Result<(Option<T>, Option<T>), StoreError> {
        let entries = self.load_all::<T>()?;
        let mut previous: Option<T> = None;
        let mut next: Option<T> = None;

        for entry in entries {
            let day = entry.date();
            if Some(day) == skip {
                continue;
            }
            if day < date && previous.as_ref().is_none_or(|p| p.date() < day) {
                previous = Some(entry);
            } else if day > date && next.as_ref().is_none_or(|n| n.date() > day) {
                next = Some(entry);
            }
        }
        Ok((previous, next))
    }

    // -- Writes (exclusive lock) --------------------------------------------

    /// Append an entry. Fails when one already exists for its date.
    pub fn insert<T: Record>(&self, entry: &T) -> Result<(), StoreError> {
        self.modify::<T, _>(|entries| {
            if entries.iter().any(|e| e.date() == entry.date()) {
                return Err(StoreError::DuplicateDate {
                    category: T::CATEGORY,
                    date: entry.date(),
                });
            }
            entries.push(entry.clone());
            Ok(())
        })
    }

    /// Replace the entry on `date` with `entry`, keeping any store-assigned identity.
    ///
    /// Returns the entry as stored.
    pub fn replace_by_date<T: Record>(&self, date: NaiveDate, mut entry: T) -> Result<T, StoreError> {
        self.modify::<T, _>(|entries| {
            let index = position_by_date(entries, date).ok_or_else(|| not_found::<T>(date))?;
            if entry.date() != date && entries.iter().any(|e| e.date() == entry.date()) {
                return Err(StoreError::DuplicateDate {
                    category: T::CATEGORY,
                    date: entry.date(),
                });
            }
            entry.inherit_identity(&entries[index]);
            entries[index] = entry.clone();
            Ok(entry)
        })
    }

    /// Replace `expected` with `entry`, failing with `Conflict` if the stored
    /// entry on that date no longer equals `expected`.
    ///
    /// The comparison runs under the same exclusive lock as the write, so a
    /// decision made on an earlier read is never applied to changed data.
    pub fn replace_if_unchanged<T: Record>(&self, expected: &T, mut entry: T) -> Result<T, StoreError> {
        self.modify::<T, _>(|entries| {
            let index = position_unchanged(entries, expected)?;
            if entry.date() != expected.date() && entries.iter().any(|e| e.date() == entry.date()) {
                return Err(StoreError::DuplicateDate {
                    category: T::CATEGORY,
                    date: entry.date(),
                });
            }
            entry.inherit_identity(&entries[index]);
            entries[index] = entry.clone();
            Ok(entry)
        })
    }

    /// Remove `expected`, failing with `Conflict` if it changed since it was read.
    pub fn delete_if_unchanged<T: Record>(&self, expected: &T) -> Result<T, StoreError> {
        self.modify::<T, _>(|entries| {
            let index = position_unchanged(entries, expected)?;
            Ok(entries.remove(index))
        })
    }

    /// Remove and return the entry on `date`.
    pub fn delete_by_date<T: Record>(&self, date: NaiveDate) -> Result<T, StoreError> {
        self.modify::<T, _>(|entries| {
            let index = position_by_date(entries, date).ok_or_else(|| not_found::<T>(date))?;
            Ok(entries.remove(index))
        })
    }

    // -- Weight entries, addressed by ID ------------------------------------

    /// Append a weight entry under a freshly assigned ID.
    pub fn add_weight(&self, mut entry: WeightEntry) -> Result<WeightEntry, StoreError> {
        let sequence_path = self.data_dir.join(SEQUENCE_FILE);
        self.modify::<WeightEntry, _>(|entries| {
            if entries.iter().any(|e| e.date == entry.date) {
                return Err(StoreError::DuplicateDate {
                    category: Category::Weight,
                    date: entry.date,
                });
            }
            let mut sequence = Sequence::load_or_seed(&sequence_path, entries)?;
            entry.id = sequence.next_weight_id()?;
            sequence.save(&sequence_path)?;
            tracing::info!(id = %entry.id, date = %entry.date, "assigned weight entry ID");

            entries.push(entry.clone());
            Ok(entry)
        })
    }

    pub fn find_weight_by_id(&self, id: &str) -> Result<Option<WeightEntry>, StoreError> {
        Ok(self
            .load_all::<WeightEntry>()?
            .into_iter()
            .find(|entry| entry.id == id))
    }

    /// Overwrite the weight entry `id`, keeping the ID.
    pub fn update_weight(&self, id: &str, mut entry: WeightEntry) -> Result<WeightEntry, StoreError> {
        self.modify::<WeightEntry, _>(|entries| {
            let index = entries
                .iter()
                .position(|e| e.id == id)
                .ok_or_else(|| weight_not_found(id))?;
            if entries.iter().any(|e| e.id != id && e.date == entry.date) {
                return Err(StoreError::DuplicateDate {
                    category: Category::Weight,
                    date: entry.date,
                });
            }
            entry.id = id.to_string();
            entries[index] = entry.clone();
            Ok(entry)
        })
    }

    /// Overwrite `expected` with `entry`, keeping its ID, unless the stored
    /// entry with that ID changed since it was read.
    pub fn update_weight_if_unchanged(
        &self,
        expected: &WeightEntry,
        mut entry: WeightEntry,
    ) -> Result<WeightEntry, StoreError> {
        self.modify::<WeightEntry, _>(|entries| {
            let index = weight_unchanged(entries, expected)?;
            if entries
                .iter()
                .any(|e| e.id != expected.id && e.date == entry.date)
            {
                return Err(StoreError::DuplicateDate {
                    category: Category::Weight,
                    date: entry.date,
                });
            }
            entry.id.clone_from(&expected.id);
            entries[index] = entry.clone();
            Ok(entry)
        })
    }

    /// Remove and return the weight entry `id`. The ID is not reused.
    pub fn delete_weight(&self, id: &str) -> Result<WeightEntry, StoreError> {
        self.remove_weight(|entries| {
            entries
                .iter()
                .position(|e| e.id == id)
                .ok_or_else(|| weight_not_found(id))
        })
    }

    /// Remove `expected` unless the stored entry with its ID changed since it was read.
    pub fn delete_weight_if_unchanged(&self, expected: &WeightEntry) -> Result<WeightEntry, StoreError> {
        self.remove_weight(|entries| weight_unchanged(entries, expected))
    }

    fn remove_weight(
        &self,
        locate: impl FnOnce(&[WeightEntry]) -> Result<usize, StoreError>,
    ) -> Result<WeightEntry, StoreError> {
        let sequence_path = self.data_dir.join(SEQUENCE_FILE);
        self.modify::<WeightEntry, _>(|entries| {
            let index = locate(entries)?;
            // Pin the counter before the highest ID can disappear from the data.
            if !sequence_path.exists() {
                Sequence::load_or_seed(&sequence_path, entries)?.save(&sequence_path)?;
            }
            Ok(entries.remove(index))
        })
    }

    // -- Internal helpers ---------------------------------------------------

    /// Read-modify-write one category file under its exclusive lock.
    ///
    /// The file is rewritten only when `f` succeeds.
    fn modify<T: Record, R>(
        &self,
        f: impl FnOnce(&mut Vec<T>) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let path = self.path_for(T::CATEGORY);
        with_exclusive(&self.lock_path_for(T::CATEGORY), || {
            let mut entries = read_entries::<T>(&path)?;
            let result = f(&mut entries)?;
            write_entries(&path, &entries)?;
            Ok(result)
        })
    }
}

fn position_by_date<T: Record>(entries: &[T], date: NaiveDate) -> Option<usize> {
    entries.iter().position(|e| e.date() == date)
}

/// Index of the entry dated like `expected`, provided it still equals `expected`.
fn position_unchanged<T: Record>(entries: &[T], expected: &T) -> Result<usize, StoreError> {
    match position_by_date(entries, expected.date()) {
        Some(index) if entries[index] == *expected => Ok(index),
        _ => {
            tracing::warn!(
                category = %T::CATEGORY,
                date = %expected.date(),
                "entry changed since it was read"
            );
            Err(StoreError::Conflict {
                category: T::CATEGORY,
                key: expected.date().to_string(),
            })
        }
    }
}

fn not_found<T: Record>(date: NaiveDate) -> StoreError {
    StoreError::NotFound {
        category: T::CATEGORY,
        key: date.to_string(),
    }
}

fn weight_unchanged(entries: &[WeightEntry], expected: &WeightEntry) -> Result<usize, StoreError> {
    match entries.iter().position(|e| e.id == expected.id) {
        Some(index) if entries[index] == *expected => Ok(index),
        _ => {
            tracing::warn!(id = %expected.id, "weight entry changed since it was read");
            Err(StoreError::Conflict {
                category: Category::Weight,
                key: expected.id.clone(),
            })
        }
    }
}

fn weight_not_found(id: &str) -> StoreError {
    StoreError::NotFound {
        category: Category::Weight,
        key: id.to_string(),
    }
}

fn read_entries<T: Record>(path: &Path) -> Result<Vec<T>, StoreError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let entries: Vec<T> = serde_json::from_str(&content).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(file = %path.display(), count = entries.len(), "loaded entries");
    Ok(entries)
}

fn write_entries<T: Record>(path: &Path, entries: &[T]) -> Result<(), StoreError> {
    let mut json = serde_json::to_vec_pretty(entries).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    json.push(b'\n');
    atomic_write(path, &json)?;
    tracing::debug!(file = %path.display(), count = entries.len(), "wrote entries");
    Ok(())
}

/// Write data to a file atomically using temp-file + rename.
pub(crate) fn atomic_write(target: &Path, data: &[u8]) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: target.to_path_buf(),
        source,
    };
    let parent = target.parent().unwrap_or_else(|| Path::new("."));

    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(io_err)?;
    std::io::Write::write_all(&mut tmp, data).map_err(io_err)?;
    tmp.persist(target).map_err(|e| io_err(e.error))?;
    Ok(())
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
