#![allow(dead_code)]

use std::sync::Arc;

use chrono::{TimeZone, Utc};

use vlo_core::locale::parse_locale;
use vlo_core::repository::InMemoryRepository;
use vlo_core::{
    ContactPerson, CorpusData, Engine, FormatRegistry, MetadataValues, Record, RecordKind,
    RepositoryInfo,
};

pub const BASE_URL: &str = "https://vlo.example.org";
pub const OAI_NS: &str = "http://www.openarchives.org/OAI/2.0/";

pub fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn contact() -> ContactPerson {
    ContactPerson {
        first_name: "Jana".to_string(),
        last_name: "Dvořáková".to_string(),
        email: "jana@example.org".to_string(),
        affiliation: Some("ÚČNK".to_string()),
    }
}

/// Corpus record modified on 2024-01-15 at noon.
pub fn corpus_record() -> Record {
    Record {
        id: 1,
        name: "syn2020".to_string(),
        datestamp: Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap(),
        title_en: "SYN2020".to_string(),
        title_cs: "SYN2020".to_string(),
        description_en: Some("Representative corpus of written Czech".to_string()),
        description_cs: Some(String::new()),
        license: "https://creativecommons.org/licenses/by-nc-sa/4.0/".to_string(),
        authors: "Křen\nMichal Cvrček".to_string(),
        contact: contact(),
        link: Some("https://wiki.korpus.cz/doku.php/cnk:syn2020".to_string()),
        kind: RecordKind::Corpus(CorpusData {
            size: Some(100_000_000),
            locale: Some(parse_locale("cs_CZ.UTF-8").unwrap()),
            keywords: Some("written, contemporary".to_string()),
        }),
    }
}

/// Service record modified on 2024-03-01.
pub fn service_record() -> Record {
    Record {
        id: 2,
        name: "kontext".to_string(),
        datestamp: Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap(),
        title_en: "KonText".to_string(),
        title_cs: "KonText".to_string(),
        description_en: Some("Corpus query interface".to_string()),
        description_cs: Some("Rozhraní pro dotazování korpusů".to_string()),
        license: "https://www.gnu.org/licenses/gpl-3.0.html".to_string(),
        authors: "Tomáš Machálek".to_string(),
        contact: contact(),
        link: Some("https://github.com/czcorpus/kontext".to_string()),
        kind: RecordKind::Service,
    }
}

/// Deleted record, older than everything else.
pub fn deleted_record() -> Record {
    Record {
        id: 3,
        name: "syn2015".to_string(),
        datestamp: Utc.with_ymd_and_hms(2020, 6, 1, 0, 0, 0).unwrap(),
        ..corpus_record()
    }
}

pub fn repository() -> InMemoryRepository {
    InMemoryRepository::new()
        .with_record(corpus_record())
        .with_record(service_record())
        .with_deleted(deleted_record())
}

pub fn info() -> RepositoryInfo {
    RepositoryInfo::new("Test VLO", BASE_URL).with_admin_emails(vec!["admin@example.org".into()])
}

pub fn engine_with(repository: InMemoryRepository) -> Engine {
    let info = info();
    let formats = FormatRegistry::standard(&info, &MetadataValues::new("Czech National Corpus"));
    Engine::new(Arc::new(repository), formats, info)
}

pub fn engine() -> Engine {
    engine_with(repository())
}
