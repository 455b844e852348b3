//! VLO core - OAI-PMH endpoint over a catalog of linguistic corpora and services.
//!
//! This crate holds everything between the raw query parameters of an
//! OAI-PMH request and the XML document sent back to the harvester.
//!
//! # Example
//!
//! ```
//! use vlo_core::authors::parse_authors;
//! use vlo_core::locale::parse_locale;
//!
//! let authors = parse_authors("Doe\nJane Smith");
//! assert_eq!(authors.len(), 2);
//! assert_eq!(parse_locale("cs_CZ.UTF-8").unwrap().base(), "cs");
//! ```
//!
//! # Architecture
//!
//! - [`record`]: the normalized record handed over by a repository
//! - [`locale`]: best-effort locale string parsing
//! - [`authors`]: free-text author block parsing
//! - [`formats`]: Dublin Core and CMDI documents, converters and the format registry
//! - [`oaipmh`]: request validation, verb dispatch, error taxonomy and the response envelope
//! - [`repository`]: the record repository trait with MySQL and in-memory implementations
//! - [`config`]: configuration values shared by the engine and the converters
//! - [`error`]: error types and Result alias

pub mod authors;
pub mod config;
pub mod error;
pub mod formats;
pub mod locale;
pub mod oaipmh;
pub mod record;
pub mod repository;

pub use config::{DatabaseSetup, MetadataValues, RepositoryInfo};
pub use error::{Error, Result};
pub use formats::{FormatRegistry, MetadataConverter, MetadataDocument};
pub use oaipmh::{Engine, HandledRequest, SelfLink};
pub use record::{ContactPerson, CorpusData, Record, RecordKind};
pub use repository::{DateRange, RecordRepository};
