//! Read-only record repository.
//!
//! The engine never talks to a database directly; it goes through
//! [`RecordRepository`], which also makes it easy to swap in
//! [`InMemoryRepository`] for tests.

mod memory;
mod mysql;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::record::Record;

pub use memory::InMemoryRepository;
pub use mysql::MySqlRepository;

/// Upper bound of a selective harvest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Until {
    /// Full timestamp given, the instant itself is included.
    Inclusive(DateTime<Utc>),
    /// Bare date given, stored as the start of the following day.
    Before(DateTime<Utc>),
}

impl Until {
    #[must_use]
    pub fn admits(&self, datestamp: DateTime<Utc>) -> bool {
        match *self {
            Self::Inclusive(bound) => datestamp <= bound,
            Self::Before(bound) => datestamp < bound,
        }
    }
}

/// Last-modified range of a selective harvest. Open ends are unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub until: Option<Until>,
}

impl DateRange {
    #[must_use]
    pub fn unbounded() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, datestamp: DateTime<Utc>) -> bool {
        self.from.is_none_or(|from| datestamp >= from)
            && self.until.is_none_or(|until| until.admits(datestamp))
    }
}

/// Source of normalized records.
///
/// Implementations exclude deleted records from every operation and resolve
/// all type-specific payload before returning a [`Record`].
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Fetch one record. `Ok(None)` means not found or deleted.
    async fn fetch(&self, identifier: &str) -> Result<Option<Record>>;

    /// All records whose last modification falls into `range`.
    async fn list(&self, range: &DateRange) -> Result<Vec<Record>>;

    /// Whether a non-deleted record with this identifier exists.
    async fn exists(&self, identifier: &str) -> Result<bool>;

    /// Oldest datestamp in the catalog, `None` when it is empty.
    async fn earliest_datestamp(&self) -> Result<Option<DateTime<Utc>>>;

    /// Cheap connectivity check used by the health endpoint.
    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
