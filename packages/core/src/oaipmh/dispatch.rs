//! Verb dispatch.
//!
//! Every verb checks its preconditions before touching the repository, so a
//! request that is bound to fail never costs a query.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::error::{ProtocolError, ProtocolErrors};
use super::request::Request;
use super::response::Outcome;
use super::types::{
    GetRecord, Header, Identify, ListIdentifiers, ListMetadataFormats, ListRecords, ListSets,
    OaiRecord, Payload, GRANULARITY, PROTOCOL_VERSION,
};
use super::verb::{Argument, Verb};
use crate::config::RepositoryInfo;
use crate::error::Result;
use crate::formats::{FormatRegistry, MetadataConverter};
use crate::record::Record;
use crate::repository::RecordRepository;

/// Maps validated requests onto repository calls and converters.
pub struct Dispatcher {
    repository: Arc<dyn RecordRepository>,
    formats: FormatRegistry,
    info: RepositoryInfo,
    sets_supported: bool,
}

type Step<T> = std::result::Result<T, ProtocolError>;

fn required<'a>(value: &'a Option<String>, argument: Argument, verb: Verb) -> Step<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| ProtocolError::missing_argument(argument, verb))
}

impl Dispatcher {
    pub fn new(
        repository: Arc<dyn RecordRepository>,
        formats: FormatRegistry,
        info: RepositoryInfo,
    ) -> Self {
        Self {
            repository,
            formats,
            info,
            sets_supported: false,
        }
    }

    /// Enable sets. No hierarchy is modelled, so `ListSets` answers with an
    /// empty list instead of `noSetHierarchy`.
    #[must_use]
    pub fn with_sets(mut self, supported: bool) -> Self {
        self.sets_supported = supported;
        self
    }

    #[must_use]
    pub fn info(&self) -> &RepositoryInfo {
        &self.info
    }

    pub fn repository(&self) -> &dyn RecordRepository {
        self.repository.as_ref()
    }

    /// Run the request's verb.
    ///
    /// Protocol errors end up in the returned [`Outcome`]; `Err` means the
    /// repository failed.
    pub async fn dispatch(&self, request: &Request) -> Result<Outcome> {
        let verb = request.verb;
        let result = match verb {
            Verb::Identify => self.identify().await?,
            Verb::GetRecord => self.get_record(request).await?,
            Verb::ListIdentifiers => self.list_identifiers(request).await?,
            Verb::ListMetadataFormats => self.list_metadata_formats(request).await?,
            Verb::ListRecords => self.list_records(request).await?,
            Verb::ListSets => self.list_sets(),
        };

        Ok(match result {
            Ok(payload) => Outcome::Success(payload),
            Err(error) => {
                tracing::debug!(%verb, code = %error.code, message = %error.message, "protocol error");
                Outcome::Failure(ProtocolErrors::new(error))
            }
        })
    }

    fn converter(&self, request: &Request) -> Step<&dyn MetadataConverter> {
        let prefix = required(&request.metadata_prefix, Argument::MetadataPrefix, request.verb)?;
        self.formats
            .get(prefix)
            .ok_or_else(|| ProtocolError::cannot_disseminate(prefix))
    }

    fn check_set(&self, request: &Request) -> Step<()> {
        if request.set.is_some() && !self.sets_supported {
            return Err(ProtocolError::no_set_hierarchy());
        }
        Ok(())
    }

    async fn identify(&self) -> Result<Step<Payload>> {
        let earliest = self
            .repository
            .earliest_datestamp()
            .await?
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);

        Ok(Ok(Payload::Identify(Identify {
            repository_name: self.info.name.clone(),
            base_url: self.info.oai_url(),
            protocol_version: PROTOCOL_VERSION,
            admin_emails: self.info.admin_emails.clone(),
            earliest_datestamp: earliest,
            deleted_record: "no",
            granularity: GRANULARITY,
        })))
    }

    async fn get_record(&self, request: &Request) -> Result<Step<Payload>> {
        let target = self.converter(request).and_then(|converter| {
            let identifier = required(&request.identifier, Argument::Identifier, request.verb)?;
            Ok((converter, identifier))
        });

        Ok(match target {
            Err(e) => Err(e),
            Ok((converter, identifier)) => match self.repository.fetch(identifier).await? {
                Some(record) => Ok(Payload::GetRecord(GetRecord {
                    record: to_oai_record(converter, &record),
                })),
                None => Err(ProtocolError::id_does_not_exist(identifier)),
            },
        })
    }

    /// Shared preconditions and query of the two list verbs.
    async fn matching_records(
        &self,
        request: &Request,
    ) -> Result<Step<(&dyn MetadataConverter, Vec<Record>)>> {
        let converter = self
            .converter(request)
            .and_then(|converter| self.check_set(request).map(|()| converter));

        Ok(match converter {
            Err(e) => Err(e),
            Ok(converter) => {
                let records = self.repository.list(&request.range).await?;
                tracing::debug!(count = records.len(), range = ?request.range, "records in range");
                if records.is_empty() {
                    Err(ProtocolError::no_records_match())
                } else {
                    Ok((converter, records))
                }
            }
        })
    }

    async fn list_identifiers(&self, request: &Request) -> Result<Step<Payload>> {
        Ok(self.matching_records(request).await?.map(|(_, records)| {
            Payload::ListIdentifiers(ListIdentifiers {
                headers: records.iter().map(Header::from).collect(),
            })
        }))
    }

    async fn list_records(&self, request: &Request) -> Result<Step<Payload>> {
        Ok(self
            .matching_records(request)
            .await?
            .map(|(converter, records)| {
                Payload::ListRecords(ListRecords {
                    records: records
                        .iter()
                        .map(|record| to_oai_record(converter, record))
                        .collect(),
                })
            }))
    }

    async fn list_metadata_formats(&self, request: &Request) -> Result<Step<Payload>> {
        if let Some(identifier) = request.identifier.as_deref() {
            if !self.repository.exists(identifier).await? {
                return Ok(Err(ProtocolError::id_does_not_exist(identifier)));
            }
        }
        Ok(Ok(Payload::ListMetadataFormats(ListMetadataFormats {
            formats: self.formats.formats(),
        })))
    }

    fn list_sets(&self) -> Step<Payload> {
        if !self.sets_supported {
            return Err(ProtocolError::no_set_hierarchy());
        }
        Ok(Payload::ListSets(ListSets { sets: Vec::new() }))
    }
}

fn to_oai_record(converter: &dyn MetadataConverter, record: &Record) -> OaiRecord {
    OaiRecord::new(Header::from(record), converter.convert(record))
}
