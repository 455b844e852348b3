//! Component tree of the `CNC_Resource` CMDI profile.
//!
//! The profile is derived from the LINDAT/CLARIN one; only the components the
//! catalog can fill are modelled.

use serde::Serialize;

use crate::authors::{parse_authors, Author};
use crate::record::{LangString, Record, RecordKind};

pub const CNC_RESOURCE_PROFILE_ID: &str = "clarin.eu:cr1:p_1712653174418";

/// Namespace of the profile components (the `cmdp` prefix).
pub const CNC_RESOURCE_SCHEMA_URL: &str =
    "http://www.clarin.eu/cmd/1/profiles/clarin.eu:cr1:p_1712653174418";

/// XSD of the profile in the CLARIN component registry.
pub const CNC_RESOURCE_XSD_URL: &str = "https://catalog.clarin.eu/ds/ComponentRegistry/rest/registry/1.x/profiles/clarin.eu:cr1:p_1712653174418/xsd";

pub const SIZE_UNIT_WORDS: &str = "words";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LangElement {
    #[serde(rename = "@xml:lang")]
    pub lang: String,
    #[serde(rename = "$text")]
    pub value: String,
}

impl From<LangString> for LangElement {
    fn from(s: LangString) -> Self {
        Self {
            lang: s.lang.to_string(),
            value: s.value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Titles {
    #[serde(rename = "cmdp:title")]
    pub title: Vec<LangElement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorComponent {
    #[serde(rename = "cmdp:lastName")]
    pub last_name: String,
    #[serde(rename = "cmdp:firstName", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
}

impl From<Author> for AuthorComponent {
    fn from(author: Author) -> Self {
        Self {
            last_name: author.last_name,
            first_name: author.first_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Authors {
    #[serde(rename = "cmdp:author")]
    pub author: Vec<AuthorComponent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identifiers {
    #[serde(rename = "cmdp:identifier")]
    pub identifier: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactPersonComponent {
    #[serde(rename = "cmdp:lastName")]
    pub last_name: String,
    #[serde(rename = "cmdp:firstName")]
    pub first_name: String,
    #[serde(rename = "cmdp:email")]
    pub email: String,
    #[serde(rename = "cmdp:affiliation")]
    pub affiliation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Publishers {
    #[serde(rename = "cmdp:publisher")]
    pub publisher: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BibliographicInfo {
    #[serde(rename = "cmdp:titles")]
    pub titles: Titles,
    #[serde(rename = "cmdp:authors", skip_serializing_if = "Option::is_none")]
    pub authors: Option<Authors>,
    #[serde(rename = "cmdp:identifiers")]
    pub identifiers: Identifiers,
    #[serde(rename = "cmdp:contactPerson")]
    pub contact_person: ContactPersonComponent,
    #[serde(rename = "cmdp:publishers")]
    pub publishers: Publishers,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageComponent {
    #[serde(rename = "cmdp:name")]
    pub name: String,
    #[serde(rename = "cmdp:code")]
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Languages {
    #[serde(rename = "cmdp:language")]
    pub language: Vec<LanguageComponent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Keywords {
    #[serde(rename = "cmdp:keyword")]
    pub keyword: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizeComponent {
    #[serde(rename = "cmdp:size")]
    pub size: String,
    #[serde(rename = "cmdp:unit")]
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizeInfo {
    #[serde(rename = "cmdp:size")]
    pub size: Vec<SizeComponent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataInfo {
    #[serde(rename = "cmdp:type")]
    pub r#type: String,
    #[serde(rename = "cmdp:description", skip_serializing_if = "Vec::is_empty")]
    pub description: Vec<LangElement>,
    #[serde(rename = "cmdp:languages", skip_serializing_if = "Option::is_none")]
    pub languages: Option<Languages>,
    #[serde(rename = "cmdp:keywords", skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Keywords>,
    #[serde(rename = "cmdp:sizeInfo", skip_serializing_if = "Option::is_none")]
    pub size_info: Option<SizeInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct License {
    #[serde(rename = "cmdp:uri")]
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LicenseInfo {
    #[serde(rename = "cmdp:license")]
    pub license: Vec<License>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CncResource {
    #[serde(rename = "cmdp:bibliographicInfo")]
    pub bibliographic_info: BibliographicInfo,
    #[serde(rename = "cmdp:dataInfo")]
    pub data_info: DataInfo,
    #[serde(rename = "cmdp:licenseInfo")]
    pub license_info: LicenseInfo,
}

impl CncResource {
    /// Fill the profile from a record.
    ///
    /// Size, languages and keywords are only ever taken from a corpus payload.
    #[must_use]
    pub fn from_record(record: &Record, publisher: &str) -> Self {
        let authors: Vec<AuthorComponent> = parse_authors(&record.authors)
            .into_iter()
            .map(AuthorComponent::from)
            .collect();

        let mut data_info = DataInfo {
            r#type: record.kind.as_str().to_string(),
            description: [
                ("en", &record.description_en),
                ("cs", &record.description_cs),
            ]
            .into_iter()
            .filter_map(|(lang, value)| {
                value
                    .as_deref()
                    .filter(|v| !v.trim().is_empty())
                    .map(|v| LangElement::from(LangString::new(lang, v)))
            })
            .collect(),
            languages: None,
            keywords: None,
            size_info: None,
        };

        if let RecordKind::Corpus(corpus) = &record.kind {
            data_info.size_info = corpus.size.map(|size| SizeInfo {
                size: vec![SizeComponent {
                    size: size.to_string(),
                    unit: SIZE_UNIT_WORDS.to_string(),
                }],
            });
            data_info.languages = corpus.locale.as_ref().map(|locale| Languages {
                language: vec![LanguageComponent {
                    name: locale.display_name(),
                    code: locale.base().to_string(),
                }],
            });
            let keywords = corpus.keyword_list();
            if !keywords.is_empty() {
                data_info.keywords = Some(Keywords { keyword: keywords });
            }
        }

        Self {
            bibliographic_info: BibliographicInfo {
                titles: Titles {
                    title: record.titles().into_iter().map(LangElement::from).collect(),
                },
                authors: (!authors.is_empty()).then_some(Authors { author: authors }),
                identifiers: Identifiers {
                    identifier: vec![record.name.clone()],
                },
                contact_person: ContactPersonComponent {
                    last_name: record.contact.last_name.clone(),
                    first_name: record.contact.first_name.clone(),
                    email: record.contact.email.clone(),
                    affiliation: record.contact.affiliation.clone().unwrap_or_default(),
                },
                publishers: Publishers {
                    publisher: vec![publisher.to_string()],
                },
            },
            data_info,
            license_info: LicenseInfo {
                license: vec![License {
                    uri: record.license.clone(),
                }],
            },
        }
    }
}
