//! Metadata formats offered to harvesters.
//!
//! Each format is a [`MetadataConverter`] turning a [`Record`] into a
//! [`MetadataDocument`]. Converters are looked up by metadata prefix through
//! the [`FormatRegistry`].

pub mod cmdi;
pub mod dublin_core;
pub mod profile;

use serde::Serialize;

use crate::config::{MetadataValues, RepositoryInfo};
use crate::error::Result;
use crate::record::Record;

pub use cmdi::{Cmdi, CmdiConverter};
pub use dublin_core::{DublinCore, DublinCoreConverter};

/// Standalone XML documents start with this declaration.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Descriptor of a metadata format as listed by `ListMetadataFormats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataFormat {
    pub metadata_prefix: String,
    pub schema: String,
    pub metadata_namespace: String,
}

impl MetadataFormat {
    pub fn new(
        prefix: impl Into<String>,
        schema: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            metadata_prefix: prefix.into(),
            schema: schema.into(),
            metadata_namespace: namespace.into(),
        }
    }
}

/// A record rendered in one metadata format.
///
/// Serialized inside an OAI-PMH `metadata` element the variant name becomes
/// the root tag of the document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MetadataDocument {
    #[serde(rename = "oai_dc:dc")]
    DublinCore(DublinCore),
    #[serde(rename = "cmd:CMD")]
    Cmdi(Box<Cmdi>),
}

impl MetadataDocument {
    /// Serialize the document on its own, with XML declaration.
    pub fn to_xml(&self) -> Result<String> {
        let body = match self {
            Self::DublinCore(dc) => quick_xml::se::to_string(dc)?,
            Self::Cmdi(cmdi) => quick_xml::se::to_string(cmdi.as_ref())?,
        };
        Ok(format!("{XML_DECLARATION}\n{body}"))
    }
}

/// Conversion of catalog records into one metadata format.
pub trait MetadataConverter: Send + Sync {
    /// Descriptor of the produced format.
    fn format(&self) -> &MetadataFormat;

    /// Convert a record. Never fails; missing optional data is left out.
    fn convert(&self, record: &Record) -> MetadataDocument;

    fn prefix(&self) -> &str {
        &self.format().metadata_prefix
    }
}

/// Registry of converters keyed by metadata prefix.
///
/// Formats are listed in registration order.
pub struct FormatRegistry {
    converters: Vec<Box<dyn MetadataConverter>>,
}

impl FormatRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            converters: Vec::new(),
        }
    }

    /// Registry with the two formats the endpoint serves: `oai_dc` and `cmdi`.
    #[must_use]
    pub fn standard(repository: &RepositoryInfo, values: &MetadataValues) -> Self {
        let mut registry = Self::new();
        registry.register(DublinCoreConverter::new());
        registry.register(CmdiConverter::new(repository.clone(), values.clone()));
        registry
    }

    /// Register a converter. A converter with the same prefix is replaced.
    pub fn register(&mut self, converter: impl MetadataConverter + 'static) {
        let converter: Box<dyn MetadataConverter> = Box::new(converter);
        match self
            .converters
            .iter_mut()
            .find(|c| c.prefix() == converter.prefix())
        {
            Some(slot) => *slot = converter,
            None => self.converters.push(converter),
        }
    }

    /// Get the converter for a metadata prefix.
    pub fn get(&self, prefix: &str) -> Option<&dyn MetadataConverter> {
        self.converters
            .iter()
            .find(|c| c.prefix() == prefix)
            .map(|c| c.as_ref())
    }

    #[must_use]
    pub fn supports(&self, prefix: &str) -> bool {
        self.get(prefix).is_some()
    }

    /// Descriptors of all registered formats.
    #[must_use]
    pub fn formats(&self) -> Vec<MetadataFormat> {
        self.converters.iter().map(|c| c.format().clone()).collect()
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn registry() -> FormatRegistry {
        FormatRegistry::standard(
            &RepositoryInfo::new("Test", "http://localhost:8000"),
            &MetadataValues::new("Test Publisher"),
        )
    }

    #[test]
    fn test_standard_formats_in_order() {
        let prefixes: Vec<String> = registry()
            .formats()
            .into_iter()
            .map(|f| f.metadata_prefix)
            .collect();
        assert_eq!(prefixes, vec!["oai_dc", "cmdi"]);
    }

    #[test]
    fn test_lookup() {
        let registry = registry();
        assert!(registry.supports("cmdi"));
        assert!(!registry.supports("marc21"));
        assert_eq!(registry.get("oai_dc").unwrap().prefix(), "oai_dc");
    }

    #[test]
    fn test_register_replaces_same_prefix() {
        let mut registry = registry();
        registry.register(DublinCoreConverter::new());
        assert_eq!(registry.formats().len(), 2);
    }
}
