//! Error and warning types shared by the store, the aggregator and the reports
//!
//! `SaveError` is the only failure a caller has to handle. Everything else is
//! a `PersistenceWarning`: the operation carried on with degraded input or
//! skipped a secondary artifact, and the warning says what happened.

use crate::observation::Shift;
use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Reasons a new observation was not recorded
#[derive(Error, Debug)]
pub enum SaveError {
    #[error("Formato de data inválido: '{0}'")]
    InvalidDate(String),

    #[error("Não é possível registrar datas futuras: {date} é posterior a {today}")]
    FutureDate { date: NaiveDate, today: NaiveDate },

    #[error("Já existe um registro para {date} no turno {shift}")]
    DuplicateEntry { date: NaiveDate, shift: Shift },

    #[error("Erro ao salvar dados: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Arquivo de dados ilegível, nada foi gravado: {0}")]
    UnreadableStore(String),
}

/// Non-fatal degradation while reading the store or writing an artifact
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PersistenceWarning {
    #[error("row {line}: date '{value}' could not be parsed, row dropped")]
    UnparseableDate { line: u64, value: String },

    #[error("row {line}: {reason}, row dropped")]
    MalformedRow { line: u64, reason: String },

    #[error("store could not be read ({0}), continuing with no observations")]
    Unreadable(String),

    #[error("could not write {}: {reason}", path.display())]
    ArtifactWrite { path: PathBuf, reason: String },
}

/// A value produced despite zero or more persistence warnings
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub value: T,
    pub warnings: Vec<PersistenceWarning>,
}

impl<T> Outcome<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(value: T, warnings: Vec<PersistenceWarning>) -> Self {
        Self { value, warnings }
    }

    /// Record a warning, logging it as it is collected
    pub fn warn(&mut self, warning: PersistenceWarning) {
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            value: f(self.value),
            warnings: self.warnings,
        }
    }
}
