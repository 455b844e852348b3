//! CMDI 1.2 envelope around the `CNC_Resource` profile.

use serde::{Serialize, Serializer};
use strum::AsRefStr;
use url::Url;

use super::profile::{
    CncResource, CNC_RESOURCE_PROFILE_ID, CNC_RESOURCE_SCHEMA_URL, CNC_RESOURCE_XSD_URL,
};
use super::{MetadataConverter, MetadataDocument, MetadataFormat};
use crate::config::{MetadataValues, RepositoryInfo};
use crate::record::{Record, RecordKind};

pub const CMDI_PREFIX: &str = "cmdi";
pub const CMD_NAMESPACE: &str = "http://www.clarin.eu/cmd/1";
pub const CMD_ENVELOPE_XSD: &str = "http://www.clarin.eu/cmd/1/xsd/cmd-envelop.xsd";
pub const CMDI_METADATA_NAMESPACE: &str = "http://www.clarin.eu/cmd/";
pub const CMD_VERSION: &str = "1.2";

const WIKI_HOST: &str = "wiki.korpus.cz";
const HTML_MIMETYPE: &str = "text/html";

/// Kind of a resource proxy, as defined by the CMDI envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
pub enum ResourceKind {
    /// The described resource itself.
    Resource,
    Metadata,
    LandingPage,
    SearchService,
    /// Web page where an end user can query the resource.
    SearchPage,
}

impl Serialize for ResourceKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceType {
    #[serde(rename = "@mimetype")]
    pub mimetype: String,
    #[serde(rename = "$text")]
    pub kind: ResourceKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceProxy {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "cmd:ResourceType")]
    pub resource_type: ResourceType,
    #[serde(rename = "cmd:ResourceRef")]
    pub resource_ref: String,
}

impl ResourceProxy {
    fn html(id: String, kind: ResourceKind, resource_ref: String) -> Self {
        Self {
            id,
            resource_type: ResourceType {
                mimetype: HTML_MIMETYPE.to_string(),
                kind,
            },
            resource_ref,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceProxyList {
    #[serde(rename = "cmd:ResourceProxy")]
    pub proxies: Vec<ResourceProxy>,
}

/// List element the catalog never fills.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct EmptyList {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resources {
    #[serde(rename = "cmd:ResourceProxyList")]
    pub resource_proxy_list: ResourceProxyList,
    #[serde(rename = "cmd:JournalFileProxyList")]
    pub journal_file_proxy_list: EmptyList,
    #[serde(rename = "cmd:ResourceRelationList")]
    pub resource_relation_list: EmptyList,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CmdiHeader {
    #[serde(rename = "cmd:MdCreationDate")]
    pub md_creation_date: String,
    #[serde(rename = "cmd:MdSelfLink")]
    pub md_self_link: String,
    #[serde(rename = "cmd:MdProfile")]
    pub md_profile: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Components {
    #[serde(rename = "cmdp:CNC_Resource")]
    pub cnc_resource: CncResource,
}

/// A `cmd:CMD` document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename = "cmd:CMD")]
pub struct Cmdi {
    #[serde(rename = "@xmlns:xsi")]
    xmlns_xsi: &'static str,
    #[serde(rename = "@xmlns:cmd")]
    xmlns_cmd: &'static str,
    #[serde(rename = "@xmlns:cmdp")]
    xmlns_cmdp: &'static str,
    #[serde(rename = "@xsi:schemaLocation")]
    schema_location: String,
    #[serde(rename = "@CMDVersion")]
    version: &'static str,

    #[serde(rename = "cmd:Header")]
    pub header: CmdiHeader,
    #[serde(rename = "cmd:Resources")]
    pub resources: Resources,
    #[serde(rename = "cmd:Components")]
    pub components: Components,
}

impl Cmdi {
    fn new(header: CmdiHeader, proxies: Vec<ResourceProxy>, profile: CncResource) -> Self {
        Self {
            xmlns_xsi: super::dublin_core::XSI_NAMESPACE,
            xmlns_cmd: CMD_NAMESPACE,
            xmlns_cmdp: CNC_RESOURCE_SCHEMA_URL,
            schema_location: format!(
                "{CMD_NAMESPACE} {CMD_ENVELOPE_XSD} {CNC_RESOURCE_SCHEMA_URL} {CNC_RESOURCE_XSD_URL}"
            ),
            version: CMD_VERSION,
            header,
            resources: Resources {
                resource_proxy_list: ResourceProxyList { proxies },
                journal_file_proxy_list: EmptyList::default(),
                resource_relation_list: EmptyList::default(),
            },
            components: Components {
                cnc_resource: profile,
            },
        }
    }
}

/// Point links into the CNC wiki at its English version.
///
/// # Examples
/// ```
/// use vlo_core::formats::cmdi::english_wiki_link;
///
/// assert_eq!(
///     english_wiki_link("https://wiki.korpus.cz/doku.php/cnk:syn2020"),
///     "https://wiki.korpus.cz/doku.php/en:cnk:syn2020"
/// );
/// assert_eq!(english_wiki_link("https://example.org/cnk:x"), "https://example.org/cnk:x");
/// ```
#[must_use]
pub fn english_wiki_link(link: &str) -> String {
    if link.contains(WIKI_HOST) {
        link.replace("/cnk:", "/en:cnk:")
    } else {
        link.to_string()
    }
}

/// Converter producing [`Cmdi`] documents.
#[derive(Debug, Clone)]
pub struct CmdiConverter {
    format: MetadataFormat,
    repository: RepositoryInfo,
    values: MetadataValues,
}

impl CmdiConverter {
    #[must_use]
    pub fn new(repository: RepositoryInfo, values: MetadataValues) -> Self {
        Self {
            format: MetadataFormat::new(
                CMDI_PREFIX,
                CNC_RESOURCE_SCHEMA_URL,
                CMDI_METADATA_NAMESPACE,
            ),
            repository,
            values,
        }
    }

    /// Search page of a corpus, with the corpus name as `corpname`.
    #[must_use]
    pub fn search_page_url(&self, corpus_name: &str) -> String {
        match Url::parse_with_params(&self.values.search_page_url, [("corpname", corpus_name)]) {
            Ok(url) => url.into(),
            Err(e) => {
                tracing::warn!(
                    url = %self.values.search_page_url,
                    error = %e,
                    "search page URL does not parse, appending query verbatim"
                );
                format!("{}?corpname={corpus_name}", self.values.search_page_url)
            }
        }
    }

    /// Build the CMDI view of a record.
    #[must_use]
    pub fn cmdi(&self, record: &Record) -> Cmdi {
        let identifier = record.identifier();
        let mut proxies = Vec::new();

        if matches!(record.kind, RecordKind::Corpus(_)) {
            proxies.push(ResourceProxy::html(
                format!("sp_{identifier}"),
                ResourceKind::SearchPage,
                self.search_page_url(&record.name),
            ));
        }
        if let Some(link) = record.link() {
            proxies.push(ResourceProxy::html(
                format!("uri_{identifier}"),
                ResourceKind::Resource,
                english_wiki_link(link),
            ));
        }

        let header = CmdiHeader {
            md_creation_date: record.datestamp.format("%Y-%m-%d").to_string(),
            md_self_link: self.repository.record_url(&identifier, CMDI_PREFIX),
            md_profile: CNC_RESOURCE_PROFILE_ID.to_string(),
        };

        Cmdi::new(
            header,
            proxies,
            CncResource::from_record(record, &self.values.publisher),
        )
    }
}

impl MetadataConverter for CmdiConverter {
    fn format(&self) -> &MetadataFormat {
        &self.format
    }

    fn convert(&self, record: &Record) -> MetadataDocument {
        MetadataDocument::Cmdi(Box::new(self.cmdi(record)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{ContactPerson, CorpusData};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn converter() -> CmdiConverter {
        CmdiConverter::new(
            RepositoryInfo::new("Test", "https://vlo.example.org/"),
            MetadataValues::new("Czech National Corpus"),
        )
    }

    fn record(kind: RecordKind, link: Option<&str>) -> Record {
        Record {
            id: 5,
            name: "syn v9".to_string(),
            datestamp: Utc.with_ymd_and_hms(2023, 11, 30, 22, 15, 0).unwrap(),
            title_en: "SYN v9".to_string(),
            title_cs: "SYN v9".to_string(),
            description_en: None,
            description_cs: None,
            license: "CC BY-NC-SA 4.0".to_string(),
            authors: String::new(),
            contact: ContactPerson::default(),
            link: link.map(String::from),
            kind,
        }
    }

    #[test]
    fn test_header() {
        let cmdi = converter().cmdi(&record(RecordKind::Service, None));
        assert_eq!(
            cmdi.header,
            CmdiHeader {
                md_creation_date: "2023-11-30".to_string(),
                md_self_link: "https://vlo.example.org/record/5?format=cmdi".to_string(),
                md_profile: "clarin.eu:cr1:p_1712653174418".to_string(),
            }
        );
    }

    #[test]
    fn test_corpus_gets_search_page_proxy() {
        let cmdi = converter().cmdi(&record(RecordKind::Corpus(CorpusData::default()), None));
        let proxies = cmdi.resources.resource_proxy_list.proxies;
        assert_eq!(proxies.len(), 1);
        assert_eq!(proxies[0].id, "sp_5");
        assert_eq!(proxies[0].resource_type.kind, ResourceKind::SearchPage);
        assert_eq!(
            proxies[0].resource_ref,
            "https://www.korpus.cz/kontext/query?corpname=syn+v9"
        );
    }

    #[test]
    fn test_link_proxy_is_rewritten_for_wiki() {
        let cmdi = converter().cmdi(&record(
            RecordKind::Service,
            Some("https://wiki.korpus.cz/doku.php/cnk:kontext"),
        ));
        let proxies = cmdi.resources.resource_proxy_list.proxies;
        assert_eq!(proxies.len(), 1);
        assert_eq!(proxies[0].id, "uri_5");
        assert_eq!(proxies[0].resource_type.kind, ResourceKind::Resource);
        assert_eq!(
            proxies[0].resource_ref,
            "https://wiki.korpus.cz/doku.php/en:cnk:kontext"
        );
    }

    #[test]
    fn test_empty_link_has_no_proxy() {
        let cmdi = converter().cmdi(&record(RecordKind::Other("tool".into()), Some("")));
        assert!(cmdi.resources.resource_proxy_list.proxies.is_empty());
    }

    #[test]
    fn test_serialized_envelope() {
        let doc = converter().convert(&record(
            RecordKind::Corpus(CorpusData::default()),
            Some("https://example.org/about"),
        ));
        let xml = doc.to_xml().unwrap();
        let parsed = roxmltree::Document::parse(&xml).unwrap();
        let root = parsed.root_element();

        assert!(root.has_tag_name((CMD_NAMESPACE, "CMD")));
        assert_eq!(root.attribute("CMDVersion"), Some("1.2"));

        let resources = root
            .children()
            .find(|n| n.has_tag_name((CMD_NAMESPACE, "Resources")))
            .unwrap();
        let lists: Vec<&str> = resources
            .children()
            .filter(|n| n.is_element())
            .map(|n| n.tag_name().name())
            .collect();
        assert_eq!(
            lists,
            vec![
                "ResourceProxyList",
                "JournalFileProxyList",
                "ResourceRelationList"
            ]
        );

        let proxy_ids: Vec<&str> = parsed
            .descendants()
            .filter(|n| n.has_tag_name((CMD_NAMESPACE, "ResourceProxy")))
            .filter_map(|n| n.attribute("id"))
            .collect();
        assert_eq!(proxy_ids, vec!["sp_5", "uri_5"]);

        let profile = parsed
            .descendants()
            .find(|n| n.has_tag_name((CNC_RESOURCE_SCHEMA_URL, "CNC_Resource")));
        assert!(profile.is_some());
    }
}
