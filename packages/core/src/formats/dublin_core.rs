//! Simple Dublin Core (`oai_dc`), the format every OAI-PMH repository must offer.

use serde::Serialize;

use super::{MetadataConverter, MetadataDocument, MetadataFormat};
use crate::authors::parse_authors;
use crate::oaipmh::types::format_datestamp;
use crate::record::{LangString, Record};

pub const OAI_DC_PREFIX: &str = "oai_dc";
pub const OAI_DC_NAMESPACE: &str = "http://www.openarchives.org/OAI/2.0/oai_dc/";
pub const OAI_DC_SCHEMA: &str = "http://www.openarchives.org/OAI/2.0/oai_dc.xsd";
pub const DC_NAMESPACE: &str = "http://purl.org/dc/elements/1.1/";
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// One Dublin Core element, optionally language tagged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DcElement {
    #[serde(rename = "@xml:lang", skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(rename = "$text")]
    pub value: String,
}

impl DcElement {
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            lang: None,
            value: value.into(),
        }
    }

    pub fn tagged(lang: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            lang: Some(lang.into()),
            value: value.into(),
        }
    }
}

impl From<LangString> for DcElement {
    fn from(s: LangString) -> Self {
        Self::tagged(s.lang, s.value)
    }
}

/// An `oai_dc:dc` document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename = "oai_dc:dc")]
pub struct DublinCore {
    #[serde(rename = "@xmlns:oai_dc")]
    xmlns_oai_dc: &'static str,
    #[serde(rename = "@xmlns:dc")]
    xmlns_dc: &'static str,
    #[serde(rename = "@xmlns:xsi")]
    xmlns_xsi: &'static str,
    #[serde(rename = "@xsi:schemaLocation")]
    schema_location: String,

    #[serde(rename = "dc:title", skip_serializing_if = "Vec::is_empty")]
    pub title: Vec<DcElement>,
    #[serde(rename = "dc:creator", skip_serializing_if = "Vec::is_empty")]
    pub creator: Vec<DcElement>,
    #[serde(rename = "dc:description", skip_serializing_if = "Vec::is_empty")]
    pub description: Vec<DcElement>,
    #[serde(rename = "dc:date", skip_serializing_if = "Vec::is_empty")]
    pub date: Vec<DcElement>,
    #[serde(rename = "dc:type", skip_serializing_if = "Vec::is_empty")]
    pub r#type: Vec<DcElement>,
    #[serde(rename = "dc:identifier", skip_serializing_if = "Vec::is_empty")]
    pub identifier: Vec<DcElement>,
    #[serde(rename = "dc:language", skip_serializing_if = "Vec::is_empty")]
    pub language: Vec<DcElement>,
    #[serde(rename = "dc:rights", skip_serializing_if = "Vec::is_empty")]
    pub rights: Vec<DcElement>,
}

impl Default for DublinCore {
    fn default() -> Self {
        Self {
            xmlns_oai_dc: OAI_DC_NAMESPACE,
            xmlns_dc: DC_NAMESPACE,
            xmlns_xsi: XSI_NAMESPACE,
            schema_location: format!("{OAI_DC_NAMESPACE} {OAI_DC_SCHEMA}"),
            title: Vec::new(),
            creator: Vec::new(),
            description: Vec::new(),
            date: Vec::new(),
            r#type: Vec::new(),
            identifier: Vec::new(),
            language: Vec::new(),
            rights: Vec::new(),
        }
    }
}

fn non_empty(values: Vec<LangString>) -> Vec<DcElement> {
    values
        .into_iter()
        .filter(|s| !s.value.trim().is_empty())
        .map(DcElement::from)
        .collect()
}

/// Converter producing [`DublinCore`] documents.
#[derive(Debug, Clone)]
pub struct DublinCoreConverter {
    format: MetadataFormat,
}

impl DublinCoreConverter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            format: MetadataFormat::new(OAI_DC_PREFIX, OAI_DC_SCHEMA, OAI_DC_NAMESPACE),
        }
    }

    /// Build the Dublin Core view of a record.
    #[must_use]
    pub fn dublin_core(record: &Record) -> DublinCore {
        let language = record
            .kind
            .corpus()
            .and_then(|corpus| corpus.locale.as_ref())
            .map(|locale| vec![DcElement::plain(locale.base())])
            .unwrap_or_default();

        DublinCore {
            title: non_empty(record.titles()),
            creator: parse_authors(&record.authors)
                .iter()
                .map(|a| DcElement::plain(a.display_name()))
                .collect(),
            description: non_empty(record.descriptions()),
            date: vec![DcElement::plain(format_datestamp(&record.datestamp))],
            r#type: vec![DcElement::plain(record.kind.as_str())],
            identifier: vec![DcElement::plain(record.name.as_str())],
            language,
            rights: vec![DcElement::plain(record.license.as_str())],
            ..DublinCore::default()
        }
    }
}

impl Default for DublinCoreConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataConverter for DublinCoreConverter {
    fn format(&self) -> &MetadataFormat {
        &self.format
    }

    fn convert(&self, record: &Record) -> MetadataDocument {
        MetadataDocument::DublinCore(Self::dublin_core(record))
    }
}
