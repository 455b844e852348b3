//! Configuration values shared by the engine, converters and repository.
//!
//! Everything is read once at start-up from the environment and is
//! immutable afterwards.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use crate::error::{Error, Result};

/// Default corpora table joined for corpus records.
pub const DEFAULT_CORPORA_TABLE: &str = "kontext_corpus";

/// Default user table holding contact persons.
pub const DEFAULT_USER_TABLE: &str = "kontext_user";

/// How long a query waits for a free pool connection.
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// Default search page; the corpus name goes into its `corpname` parameter.
pub const DEFAULT_SEARCH_PAGE_URL: &str = "https://www.korpus.cz/kontext/query";

/// Plain SQL identifier: letters, digits and underscores.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static SQL_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex"));

/// Validate a table or column name that gets interpolated into SQL.
///
/// # Examples
/// ```
/// use vlo_core::config::validate_identifier;
///
/// assert!(validate_identifier("kontext_corpus").is_ok());
/// assert!(validate_identifier("corpus; DROP TABLE x").is_err());
/// ```
pub fn validate_identifier(name: &str) -> Result<()> {
    if SQL_IDENTIFIER.is_match(name) {
        Ok(())
    } else {
        Err(Error::InvalidIdentifier(name.to_string()))
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Identity of the repository as reported by `Identify`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryInfo {
    pub name: String,
    /// Public base URL without trailing slash; `/oai` and `/record` hang off it.
    pub base_url: String,
    pub admin_emails: Vec<String>,
}

impl RepositoryInfo {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            admin_emails: Vec::new(),
        }
    }

    pub fn with_admin_emails(mut self, emails: Vec<String>) -> Self {
        self.admin_emails = emails;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn from_env() -> Self {
        let name = env_or("REPOSITORY_NAME", "CNC VLO repository");
        let base_url = env_or("BASE_URL", "http://localhost:8000");

        let admin_emails: Vec<String> = std::env::var("ADMIN_EMAIL")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(String::from)
            .collect();
        if admin_emails.is_empty() {
            tracing::warn!("ADMIN_EMAIL not set, Identify will report no admin e-mail");
        }

        Self::new(name, base_url).with_admin_emails(admin_emails)
    }

    /// Base URL of the protocol endpoint.
    #[must_use]
    pub fn oai_url(&self) -> String {
        format!("{}/oai", self.base_url)
    }

    /// Self link of a record in the given format.
    #[must_use]
    pub fn record_url(&self, identifier: &str, prefix: &str) -> String {
        format!("{}/record/{identifier}?format={prefix}", self.base_url)
    }
}

/// Values common to all metadata records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataValues {
    pub publisher: String,
    pub search_page_url: String,
}

impl MetadataValues {
    pub fn new(publisher: impl Into<String>) -> Self {
        Self {
            publisher: publisher.into(),
            search_page_url: DEFAULT_SEARCH_PAGE_URL.to_string(),
        }
    }

    pub fn with_search_page_url(mut self, url: impl Into<String>) -> Self {
        self.search_page_url = url.into();
        self
    }

    pub fn from_env() -> Result<Self> {
        let publisher = std::env::var("METADATA_PUBLISHER").unwrap_or_default();
        if publisher.is_empty() {
            tracing::warn!("METADATA_PUBLISHER not set, CMDI records will carry an empty publisher");
        }
        let search_page_url = env_or("SEARCH_PAGE_URL", DEFAULT_SEARCH_PAGE_URL);
        url::Url::parse(&search_page_url)?;

        Ok(Self::new(publisher).with_search_page_url(search_page_url))
    }
}

/// Connection and schema settings of the MySQL catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSetup {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub corpora_table: String,
    pub user_table: String,
    pub user_first_name_col: String,
    pub user_last_name_col: String,
}

impl DatabaseSetup {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: 5,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
            corpora_table: DEFAULT_CORPORA_TABLE.to_string(),
            user_table: DEFAULT_USER_TABLE.to_string(),
            user_first_name_col: "firstname".to_string(),
            user_last_name_col: "lastname".to_string(),
        }
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn with_acquire_timeout(mut self, acquire_timeout: Duration) -> Self {
        self.acquire_timeout = acquire_timeout;
        self
    }

    pub fn from_env() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| Error::Config("DATABASE_URL not set".into()))?;

        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);

        let acquire_timeout = std::env::var("DATABASE_ACQUIRE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map_or(DEFAULT_ACQUIRE_TIMEOUT, Duration::from_secs);

        let mut setup = Self::new(database_url)
            .with_max_connections(max_connections)
            .with_acquire_timeout(acquire_timeout);
        for (var, target) in [
            ("CORPORA_TABLE", &mut setup.corpora_table),
            ("USER_TABLE", &mut setup.user_table),
            ("USER_FIRSTNAME_COL", &mut setup.user_first_name_col),
            ("USER_LASTNAME_COL", &mut setup.user_last_name_col),
        ] {
            if let Ok(value) = std::env::var(var) {
                if !value.is_empty() {
                    tracing::warn!("overriding default {var} with '{value}'");
                    *target = value;
                }
            }
        }
        setup.validate()?;
        Ok(setup)
    }

    /// Check every name that ends up in SQL text.
    pub fn validate(&self) -> Result<()> {
        validate_identifier(&self.corpora_table)?;
        validate_identifier(&self.user_table)?;
        validate_identifier(&self.user_first_name_col)?;
        validate_identifier(&self.user_last_name_col)?;
        Ok(())
    }
}
