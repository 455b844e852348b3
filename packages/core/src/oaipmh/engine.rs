//! Entry point tying validation, dispatch and serialization together.

use std::sync::Arc;

use super::dispatch::Dispatcher;
use super::request::{Request, RequestError};
use super::response::{Outcome, RequestEcho, Response};
use super::types::Payload;
use super::verb::Verb;
use crate::config::RepositoryInfo;
use crate::error::Result;
use crate::formats::dublin_core::OAI_DC_PREFIX;
use crate::formats::FormatRegistry;
use crate::repository::{DateRange, RecordRepository};

/// A serialized protocol response ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandledRequest {
    pub status: u16,
    pub body: String,
}

/// Result of resolving a record self link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelfLink {
    /// The bare metadata document.
    Document(String),
    /// GetRecord failed with a protocol error carrying this status.
    Status(u16),
}

/// The OAI-PMH endpoint without its HTTP layer.
pub struct Engine {
    dispatcher: Dispatcher,
}

impl Engine {
    pub fn new(
        repository: Arc<dyn RecordRepository>,
        formats: FormatRegistry,
        info: RepositoryInfo,
    ) -> Self {
        Self {
            dispatcher: Dispatcher::new(repository, formats, info),
        }
    }

    /// See [`Dispatcher::with_sets`].
    #[must_use]
    pub fn with_sets(mut self, supported: bool) -> Self {
        self.dispatcher = self.dispatcher.with_sets(supported);
        self
    }

    #[must_use]
    pub fn info(&self) -> &RepositoryInfo {
        self.dispatcher.info()
    }

    /// Validate and dispatch a raw parameter list.
    pub async fn respond(&self, params: &[(String, String)]) -> Result<Response> {
        let oai_url = self.info().oai_url();
        let request = match Request::parse(params) {
            Ok(request) => request,
            Err(RequestError::Protocol(error)) => {
                tracing::debug!(code = %error.code, message = %error.message, "invalid request");
                return Ok(Response::new(RequestEcho::bare(oai_url), Outcome::Failure(error.into())));
            }
            Err(RequestError::Internal(e)) => return Err(e),
        };

        let outcome = self.dispatcher.dispatch(&request).await?;
        Ok(Response::new(RequestEcho::of(oai_url, &request), outcome))
    }

    /// Handle a request end to end: status code plus XML body.
    pub async fn handle(&self, params: &[(String, String)]) -> Result<HandledRequest> {
        let response = self.respond(params).await?;
        Ok(HandledRequest {
            status: response.http_status(),
            body: response.to_xml()?,
        })
    }

    /// Run GetRecord for a self link and return only the metadata document.
    ///
    /// `format` defaults to `oai_dc`.
    pub async fn self_link(&self, identifier: &str, format: Option<&str>) -> Result<SelfLink> {
        let request = Request {
            verb: Verb::GetRecord,
            identifier: Some(identifier.to_string()),
            metadata_prefix: Some(format.unwrap_or(OAI_DC_PREFIX).to_string()),
            from: None,
            until: None,
            set: None,
            resumption_token: None,
            range: DateRange::unbounded(),
        };

        match self.dispatcher.dispatch(&request).await? {
            Outcome::Success(Payload::GetRecord(found)) => {
                Ok(SelfLink::Document(found.record.metadata.document.to_xml()?))
            }
            outcome => Ok(SelfLink::Status(outcome.http_status())),
        }
    }

    /// Check that the repository answers.
    pub async fn ping(&self) -> Result<()> {
        self.dispatcher.repository().ping().await
    }
}
