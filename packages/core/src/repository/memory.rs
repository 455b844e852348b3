use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{DateRange, RecordRepository};
use crate::error::{Error, Result};
use crate::record::Record;

#[derive(Debug, Clone)]
struct Entry {
    record: Record,
    deleted: bool,
}

/// Repository backed by a vector, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    entries: Vec<Entry>,
    unavailable: bool,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository whose every call fails like a lost database connection.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            entries: Vec::new(),
            unavailable: true,
        }
    }

    pub fn with_record(mut self, record: Record) -> Self {
        self.entries.push(Entry {
            record,
            deleted: false,
        });
        self
    }

    /// Add a record flagged as deleted; it stays invisible to every operation.
    pub fn with_deleted(mut self, record: Record) -> Self {
        self.entries.push(Entry {
            record,
            deleted: true,
        });
        self
    }

    fn live(&self) -> Result<impl Iterator<Item = &Record>> {
        if self.unavailable {
            return Err(Error::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(self
            .entries
            .iter()
            .filter(|e| !e.deleted)
            .map(|e| &e.record))
    }
}

#[async_trait]
impl RecordRepository for InMemoryRepository {
    async fn fetch(&self, identifier: &str) -> Result<Option<Record>> {
        Ok(self
            .live()?
            .find(|r| r.identifier() == identifier)
            .cloned())
    }

    async fn list(&self, range: &DateRange) -> Result<Vec<Record>> {
        Ok(self
            .live()?
            .filter(|r| range.contains(r.datestamp))
            .cloned()
            .collect())
    }

    async fn exists(&self, identifier: &str) -> Result<bool> {
        Ok(self.live()?.any(|r| r.identifier() == identifier))
    }

    async fn earliest_datestamp(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self.live()?.map(|r| r.datestamp).min())
    }

    async fn ping(&self) -> Result<()> {
        self.live().map(|_| ())
    }
}
