//! The normalized catalog record.
//!
//! A repository joins whatever tables it needs and hands over a [`Record`];
//! everything downstream (converters, dispatcher) only ever reads it.

use chrono::{DateTime, Utc};

use crate::locale::Locale;

/// Type literal of corpus records.
pub const CORPUS_TYPE: &str = "corpus";

/// Type literal of service records.
pub const SERVICE_TYPE: &str = "service";

/// Contact person attached to a record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactPerson {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub affiliation: Option<String>,
}

/// Payload only corpus records carry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CorpusData {
    /// Size in words.
    pub size: Option<i64>,
    /// Locale resolved by the repository.
    pub locale: Option<Locale>,
    /// Comma-joined keyword list as stored in the catalog.
    pub keywords: Option<String>,
}

impl CorpusData {
    /// Keywords in their original order, trimmed, blanks dropped.
    #[must_use]
    pub fn keyword_list(&self) -> Vec<String> {
        self.keywords
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Record type together with its type-specific payload.
///
/// Exactly one payload exists per type, so a corpus payload on a service
/// record cannot be expressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordKind {
    Corpus(CorpusData),
    Service,
    /// Any other type literal found in the catalog. Carries no payload.
    Other(String),
}

impl RecordKind {
    /// Build the kind from the catalog's type column.
    ///
    /// The corpus payload is attached only when the type says `corpus`;
    /// for every other type it is dropped.
    #[must_use]
    pub fn from_type(record_type: &str, corpus: CorpusData) -> Self {
        match record_type {
            CORPUS_TYPE => Self::Corpus(corpus),
            SERVICE_TYPE => Self::Service,
            other => Self::Other(other.to_string()),
        }
    }

    /// The type literal emitted into metadata.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Corpus(_) => CORPUS_TYPE,
            Self::Service => SERVICE_TYPE,
            Self::Other(literal) => literal,
        }
    }

    #[must_use]
    pub fn corpus(&self) -> Option<&CorpusData> {
        match self {
            Self::Corpus(data) => Some(data),
            _ => None,
        }
    }
}

/// A text value in one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LangString {
    pub lang: &'static str,
    pub value: String,
}

impl LangString {
    pub fn new(lang: &'static str, value: impl Into<String>) -> Self {
        Self {
            lang,
            value: value.into(),
        }
    }
}

/// The unit being harvested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Stable numeric identifier, exposed as the OAI identifier.
    pub id: i64,
    /// Stable name (corpus name or service name).
    pub name: String,
    /// Last modification, UTC.
    pub datestamp: DateTime<Utc>,
    pub title_en: String,
    pub title_cs: String,
    pub description_en: Option<String>,
    pub description_cs: Option<String>,
    pub license: String,
    /// Free-text author block, one author per line.
    pub authors: String,
    pub contact: ContactPerson,
    pub link: Option<String>,
    pub kind: RecordKind,
}

impl Record {
    /// OAI identifier of the record.
    #[must_use]
    pub fn identifier(&self) -> String {
        self.id.to_string()
    }

    /// Titles in emission order (English first).
    #[must_use]
    pub fn titles(&self) -> Vec<LangString> {
        vec![
            LangString::new("en", self.title_en.as_str()),
            LangString::new("cs", self.title_cs.as_str()),
        ]
    }

    /// Descriptions in emission order (Czech first); absent ones are skipped.
    #[must_use]
    pub fn descriptions(&self) -> Vec<LangString> {
        [("cs", &self.description_cs), ("en", &self.description_en)]
            .into_iter()
            .filter_map(|(lang, value)| value.as_deref().map(|v| LangString::new(lang, v)))
            .collect()
    }

    /// Non-empty link, if any.
    #[must_use]
    pub fn link(&self) -> Option<&str> {
        self.link.as_deref().filter(|l| !l.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_kind_from_type() {
        let corpus = CorpusData {
            size: Some(10),
            ..CorpusData::default()
        };
        assert_eq!(
            RecordKind::from_type("corpus", corpus.clone()),
            RecordKind::Corpus(corpus.clone())
        );
        assert_eq!(RecordKind::from_type("service", corpus.clone()), RecordKind::Service);
        assert_eq!(
            RecordKind::from_type("tool", corpus),
            RecordKind::Other("tool".to_string())
        );
    }

    #[test]
    fn test_kind_literal() {
        assert_eq!(RecordKind::Service.as_str(), "service");
        assert_eq!(RecordKind::Corpus(CorpusData::default()).as_str(), "corpus");
        assert_eq!(RecordKind::Other("tool".into()).as_str(), "tool");
    }

    #[test]
    fn test_keyword_list() {
        let data = CorpusData {
            keywords: Some("spoken, written,,  fiction ".to_string()),
            ..CorpusData::default()
        };
        assert_eq!(data.keyword_list(), vec!["spoken", "written", "fiction"]);
        assert!(CorpusData::default().keyword_list().is_empty());
    }
}
