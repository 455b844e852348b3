use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;

use super::{DateRange, RecordRepository, Until};
use crate::config::DatabaseSetup;
use crate::error::Result;
use crate::locale::parse_locale;
use crate::record::{ContactPerson, CorpusData, Record, RecordKind};

/// Catalog stored in the KonText MySQL database.
///
/// DATETIME columns hold server-local time; they are converted to UTC on
/// the way out and back to local time for range filters.
#[derive(Debug, Clone)]
pub struct MySqlRepository {
    pool: MySqlPool,
    select_sql: String,
}

#[derive(Debug, sqlx::FromRow)]
struct RecordRow {
    id: i64,
    datestamp: NaiveDateTime,
    record_type: String,
    name: String,
    title_en: String,
    title_cs: String,
    description_en: Option<String>,
    description_cs: Option<String>,
    license: String,
    authors: String,
    link: Option<String>,
    contact_first_name: String,
    contact_last_name: String,
    contact_email: String,
    contact_affiliation: Option<String>,
    corpus_size: Option<i64>,
    corpus_locale: Option<String>,
    corpus_keywords: Option<String>,
}

impl RecordRow {
    fn into_record(self) -> Record {
        let locale = self
            .corpus_locale
            .as_deref()
            .filter(|l| !l.is_empty())
            .and_then(|raw| match parse_locale(raw) {
                Ok(locale) => Some(locale),
                Err(e) => {
                    tracing::warn!(record_id = self.id, error = %e, "dropping unparseable locale");
                    None
                }
            });
        let corpus = CorpusData {
            size: self.corpus_size,
            locale,
            keywords: self.corpus_keywords,
        };

        Record {
            id: self.id,
            name: self.name,
            datestamp: to_utc(self.datestamp),
            title_en: self.title_en,
            title_cs: self.title_cs,
            description_en: self.description_en,
            description_cs: self.description_cs,
            license: self.license,
            authors: self.authors,
            contact: ContactPerson {
                first_name: self.contact_first_name,
                last_name: self.contact_last_name,
                email: self.contact_email,
                affiliation: self.contact_affiliation,
            },
            link: self.link,
            kind: RecordKind::from_type(&self.record_type, corpus),
        }
    }
}

fn to_utc(naive: NaiveDateTime) -> DateTime<Utc> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}

fn to_local(instant: DateTime<Utc>) -> NaiveDateTime {
    instant.with_timezone(&Local).naive_local()
}

impl MySqlRepository {
    /// Connect to the catalog database.
    pub async fn connect(setup: &DatabaseSetup) -> Result<Self> {
        setup.validate()?;
        let pool = MySqlPoolOptions::new()
            .max_connections(setup.max_connections)
            .acquire_timeout(setup.acquire_timeout)
            .connect(&setup.database_url)
            .await?;
        Ok(Self::with_pool(pool, setup))
    }

    /// Wrap an existing pool. `setup` must already be validated.
    pub fn with_pool(pool: MySqlPool, setup: &DatabaseSetup) -> Self {
        // identifiers below are checked by DatabaseSetup::validate
        let select_sql = format!(
            "SELECT CAST(m.id AS SIGNED) AS id, \
             GREATEST(m.created, COALESCE(m.updated, m.created)) AS datestamp, \
             m.type AS record_type, \
             COALESCE(c.name, ms.name, '') AS name, \
             COALESCE(m.title_en, '') AS title_en, \
             COALESCE(m.title_cs, '') AS title_cs, \
             COALESCE(c.description_en, ms.description_en) AS description_en, \
             COALESCE(c.description_cs, ms.description_cs) AS description_cs, \
             COALESCE(m.license_info, '') AS license, \
             COALESCE(m.authors, '') AS authors, \
             COALESCE(c.web, ms.link) AS link, \
             u.{first} AS contact_first_name, \
             u.{last} AS contact_last_name, \
             u.email AS contact_email, \
             u.affiliation AS contact_affiliation, \
             CAST(c.size AS SIGNED) AS corpus_size, \
             c.locale AS corpus_locale, \
             c.keywords AS corpus_keywords \
             FROM metadata_common AS m \
             LEFT JOIN metadata_corpus AS mc ON m.corpus_metadata_id = mc.id \
             LEFT JOIN metadata_service AS ms ON m.service_metadata_id = ms.id \
             LEFT JOIN {corpora} AS c ON mc.corpus_name = c.name \
             JOIN {users} AS u ON m.contact_user_id = u.id",
            first = setup.user_first_name_col,
            last = setup.user_last_name_col,
            corpora = setup.corpora_table,
            users = setup.user_table,
        );
        Self { pool, select_sql }
    }
}

#[async_trait]
impl RecordRepository for MySqlRepository {
    async fn fetch(&self, identifier: &str) -> Result<Option<Record>> {
        let sql = format!("{} WHERE m.id = ? AND m.deleted = FALSE", self.select_sql);
        let row = sqlx::query_as::<_, RecordRow>(&sql)
            .bind(identifier)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(RecordRow::into_record))
    }

    async fn list(&self, range: &DateRange) -> Result<Vec<Record>> {
        let datestamp = "GREATEST(m.created, COALESCE(m.updated, m.created))";
        let mut where_clauses = vec!["m.deleted = FALSE".to_string()];
        let mut bounds: Vec<NaiveDateTime> = Vec::new();

        if let Some(from) = range.from {
            where_clauses.push(format!("{datestamp} >= ?"));
            bounds.push(to_local(from));
        }
        match range.until {
            Some(Until::Inclusive(until)) => {
                where_clauses.push(format!("{datestamp} <= ?"));
                bounds.push(to_local(until));
            }
            Some(Until::Before(until)) => {
                where_clauses.push(format!("{datestamp} < ?"));
                bounds.push(to_local(until));
            }
            None => {}
        }

        let sql = format!(
            "{} WHERE {} ORDER BY m.id",
            self.select_sql,
            where_clauses.join(" AND ")
        );
        let mut query = sqlx::query_as::<_, RecordRow>(&sql);
        for bound in bounds {
            query = query.bind(bound);
        }
        let rows = query.fetch_all(&self.pool).await?;
        tracing::debug!(count = rows.len(), "listed records");

        Ok(rows.into_iter().map(RecordRow::into_record).collect())
    }

    async fn exists(&self, identifier: &str) -> Result<bool> {
        let found = sqlx::query_scalar::<_, i64>(
            "SELECT CAST(id AS SIGNED) FROM metadata_common WHERE id = ? AND deleted = FALSE",
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?;
        Ok(found.is_some())
    }

    async fn earliest_datestamp(&self) -> Result<Option<DateTime<Utc>>> {
        let earliest = sqlx::query_scalar::<_, Option<NaiveDateTime>>(
            "SELECT MIN(created) FROM metadata_common WHERE deleted = FALSE",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(earliest.map(to_utc))
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}
