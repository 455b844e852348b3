//! Result payloads of the six verbs.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use super::verb::Verb;
use crate::formats::{MetadataDocument, MetadataFormat};
use crate::record::Record;

/// Datestamp granularity of the repository.
pub const GRANULARITY: &str = "YYYY-MM-DDThh:mm:ssZ";

/// chrono format string matching [`GRANULARITY`].
pub const DATESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

pub const PROTOCOL_VERSION: &str = "2.0";

/// Format a UTC instant with second granularity.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use vlo_core::oaipmh::types::format_datestamp;
///
/// let instant = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
/// assert_eq!(format_datestamp(&instant), "2024-05-06T07:08:09Z");
/// ```
#[must_use]
pub fn format_datestamp(instant: &DateTime<Utc>) -> String {
    instant.format(DATESTAMP_FORMAT).to_string()
}

fn serialize_datestamp<S: Serializer>(
    instant: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_datestamp(instant))
}

/// Record header: identifier and last modification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub identifier: String,
    #[serde(serialize_with = "serialize_datestamp")]
    pub datestamp: DateTime<Utc>,
}

impl From<&Record> for Header {
    fn from(record: &Record) -> Self {
        Self {
            identifier: record.identifier(),
            datestamp: record.datestamp,
        }
    }
}

/// The `metadata` element of a record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    #[serde(rename = "$value")]
    pub document: MetadataDocument,
}

/// A record as harvested: header plus metadata in one format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OaiRecord {
    pub header: Header,
    pub metadata: Metadata,
}

impl OaiRecord {
    pub fn new(header: Header, document: MetadataDocument) -> Self {
        Self {
            header,
            metadata: Metadata { document },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identify {
    pub repository_name: String,
    #[serde(rename = "baseURL")]
    pub base_url: String,
    pub protocol_version: &'static str,
    #[serde(rename = "adminEmail", skip_serializing_if = "Vec::is_empty")]
    pub admin_emails: Vec<String>,
    #[serde(serialize_with = "serialize_datestamp")]
    pub earliest_datestamp: DateTime<Utc>,
    pub deleted_record: &'static str,
    pub granularity: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OaiSet {
    pub set_spec: String,
    pub set_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GetRecord {
    pub record: OaiRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListIdentifiers {
    #[serde(rename = "header")]
    pub headers: Vec<Header>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListMetadataFormats {
    #[serde(rename = "metadataFormat")]
    pub formats: Vec<MetadataFormat>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListRecords {
    #[serde(rename = "record")]
    pub records: Vec<OaiRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListSets {
    #[serde(rename = "set", skip_serializing_if = "Vec::is_empty")]
    pub sets: Vec<OaiSet>,
}

/// Successful result of one verb. Serialized, the variant name is the
/// element wrapping the result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Payload {
    Identify(Identify),
    GetRecord(GetRecord),
    ListIdentifiers(ListIdentifiers),
    ListMetadataFormats(ListMetadataFormats),
    ListRecords(ListRecords),
    ListSets(ListSets),
}

impl Payload {
    /// Verb this payload answers.
    #[must_use]
    pub fn verb(&self) -> Verb {
        match self {
            Self::Identify(_) => Verb::Identify,
            Self::GetRecord(_) => Verb::GetRecord,
            Self::ListIdentifiers(_) => Verb::ListIdentifiers,
            Self::ListMetadataFormats(_) => Verb::ListMetadataFormats,
            Self::ListRecords(_) => Verb::ListRecords,
            Self::ListSets(_) => Verb::ListSets,
        }
    }
}
