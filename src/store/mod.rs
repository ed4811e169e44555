//! Record store: the persisted set of shift observations
//!
//! Every mutation is a full load-mutate-store cycle: `save` reads the whole
//! set, validates the new observation against it, and rewrites the whole set
//! through [`Storage::replace`]. There is no in-memory cache, so two
//! processes saving at once can lose one update (last writer wins).
//!
//! Reads fail open. A missing store is an empty store, and rows that cannot
//! be decoded are dropped with a [`PersistenceWarning`].

mod codec;
mod storage;

pub use codec::{decode, encode, HEADER};
pub use storage::{write_atomic, FileStorage, MemoryStorage, Storage};

use crate::error::{Outcome, PersistenceWarning, SaveError};
use crate::observation::{parse_date, Observation, Shift, Weekday};
use chrono::{Days, Local, NaiveDate};
use std::io;
use std::path::PathBuf;

/// Observations read from the store, with any decode warnings
pub type Loaded = Outcome<Vec<Observation>>;

/// Owner of the persisted observation set
#[derive(Debug)]
pub struct RecordStore<S = FileStorage> {
    storage: S,
    today: Option<NaiveDate>,
}

impl RecordStore<FileStorage> {
    /// Store backed by a CSV file; the file is created on first save
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::new(FileStorage::new(path))
    }
}

impl RecordStore<MemoryStorage> {
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }
}

impl<S: Storage> RecordStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            today: None,
        }
    }

    /// Pin "today" instead of reading the local clock
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Reference date for future-date checks and `recent`
    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Read every persisted observation
    pub fn load(&self) -> Loaded {
        match self.storage.read() {
            Ok(Some(bytes)) => {
                let loaded = decode(&bytes);
                tracing::debug!(
                    "loaded {} observations from {} ({} warnings)",
                    loaded.value.len(),
                    self.storage.describe(),
                    loaded.warnings.len()
                );
                loaded
            }
            Ok(None) => Outcome::new(Vec::new()),
            Err(e) => {
                let mut outcome = Outcome::new(Vec::new());
                outcome.warn(PersistenceWarning::Unreadable(e.to_string()));
                outcome
            }
        }
    }

    /// True if an observation for this date and shift is already stored
    pub fn exists(&self, date: NaiveDate, shift: Shift) -> bool {
        self.load().value.iter().any(|obs| obs.is_slot(date, shift))
    }

    /// Validate and persist a new observation
    ///
    /// `date` is raw user input; any time-of-day part is discarded. On
    /// success the returned set includes the new observation, sorted by date
    /// (observations sharing a date keep their insertion order).
    ///
    /// # Errors
    /// `InvalidDate`, `FutureDate` or `DuplicateEntry` when the observation
    /// is rejected; `UnreadableStore` when the existing store could not be
    /// read as a whole; `Storage` when the rewrite failed. In the last two
    /// cases the previous contents are untouched.
    pub fn save(&self, date: &str, shift: Shift, headcount: u32) -> Result<Loaded, SaveError> {
        let date = parse_date(date).ok_or_else(|| SaveError::InvalidDate(date.to_string()))?;

        let today = self.today();
        if date > today {
            return Err(SaveError::FutureDate { date, today });
        }

        let mut loaded = self.load();
        // Rewriting an unreadable store would replace every existing row
        if let Some(PersistenceWarning::Unreadable(reason)) = loaded
            .warnings
            .iter()
            .find(|w| matches!(w, PersistenceWarning::Unreadable(_)))
        {
            return Err(SaveError::UnreadableStore(reason.clone()));
        }
        if loaded.value.iter().any(|obs| obs.is_slot(date, shift)) {
            return Err(SaveError::DuplicateEntry { date, shift });
        }

        loaded.value.push(Observation::new(date, shift, headcount));
        loaded.value.sort_by_key(Observation::date);

        let bytes = encode(&loaded.value)?;
        self.storage.replace(&bytes)?;

        tracing::info!(
            "recorded {} {} ({}) = {} in {}",
            date,
            shift,
            Weekday::from_date(date),
            headcount,
            self.storage.describe()
        );
        Ok(loaded)
    }

    /// Observations dated on or after `today - days`
    pub fn recent(&self, days: u32) -> Loaded {
        let cutoff = self
            .today()
            .checked_sub_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MIN);
        let mut loaded = self.load();
        loaded.value.retain(|obs| obs.date() >= cutoff);
        loaded
    }

    /// Normalized CSV of every valid observation (ISO dates, derived weekdays)
    pub fn export(&self) -> io::Result<Outcome<Vec<u8>>> {
        let loaded = self.load();
        let bytes = encode(&loaded.value)?;
        Ok(Outcome::with_warnings(bytes, loaded.warnings))
    }
}
