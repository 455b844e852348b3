//! Response assembly and the OAI-PMH XML envelope.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::error::ProtocolErrors;
use super::request::Request;
use super::types::{format_datestamp, Payload};
use crate::error::Result;
use crate::formats::XML_DECLARATION;

pub const OAI_NAMESPACE: &str = "http://www.openarchives.org/OAI/2.0/";
pub const OAI_SCHEMA_LOCATION: &str =
    "http://www.openarchives.org/OAI/2.0/ http://www.openarchives.org/OAI/2.0/OAI-PMH.xsd";
const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Either the verb result or a non-empty list of protocol errors.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(Payload),
    Failure(ProtocolErrors),
}

impl Outcome {
    /// HTTP status of the response carrying this outcome.
    #[must_use]
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Success(_) => 200,
            Self::Failure(errors) => errors.http_status(),
        }
    }
}

impl From<ProtocolErrors> for Outcome {
    fn from(errors: ProtocolErrors) -> Self {
        Self::Failure(errors)
    }
}

/// The `request` element: endpoint URL plus the accepted arguments.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RequestEcho {
    #[serde(rename = "@verb", skip_serializing_if = "Option::is_none")]
    pub verb: Option<String>,
    #[serde(rename = "@identifier", skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(rename = "@metadataPrefix", skip_serializing_if = "Option::is_none")]
    pub metadata_prefix: Option<String>,
    #[serde(rename = "@from", skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(rename = "@until", skip_serializing_if = "Option::is_none")]
    pub until: Option<String>,
    #[serde(rename = "@set", skip_serializing_if = "Option::is_none")]
    pub set: Option<String>,
    #[serde(rename = "@resumptionToken", skip_serializing_if = "Option::is_none")]
    pub resumption_token: Option<String>,
    #[serde(rename = "$text")]
    pub url: String,
}

impl RequestEcho {
    /// Echo without attributes, used when the request did not validate.
    pub fn bare(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Echo of a validated request.
    pub fn of(url: impl Into<String>, request: &Request) -> Self {
        Self {
            verb: Some(request.verb.to_string()),
            identifier: request.identifier.clone(),
            metadata_prefix: request.metadata_prefix.clone(),
            from: request.from.clone(),
            until: request.until.clone(),
            set: request.set.clone(),
            resumption_token: request.resumption_token.clone(),
            url: url.into(),
        }
    }
}

/// One protocol response.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub response_date: DateTime<Utc>,
    pub request: RequestEcho,
    pub outcome: Outcome,
}

#[derive(Serialize)]
struct ErrorElement<'a> {
    #[serde(rename = "@code")]
    code: &'a str,
    #[serde(rename = "$text")]
    message: &'a str,
}

#[derive(Serialize)]
#[serde(rename = "OAI-PMH")]
struct Envelope<'a> {
    #[serde(rename = "@xmlns")]
    xmlns: &'static str,
    #[serde(rename = "@xmlns:xsi")]
    xmlns_xsi: &'static str,
    #[serde(rename = "@xsi:schemaLocation")]
    schema_location: &'static str,
    #[serde(rename = "responseDate")]
    response_date: String,
    request: &'a RequestEcho,
    #[serde(rename = "error", skip_serializing_if = "Vec::is_empty")]
    errors: Vec<ErrorElement<'a>>,
    #[serde(rename = "$value", skip_serializing_if = "Option::is_none")]
    payload: Option<&'a Payload>,
}

impl Response {
    /// Response dated now.
    pub fn new(request: RequestEcho, outcome: impl Into<Outcome>) -> Self {
        Self {
            response_date: Utc::now(),
            request,
            outcome: outcome.into(),
        }
    }

    #[must_use]
    pub fn http_status(&self) -> u16 {
        self.outcome.http_status()
    }

    /// Serialize the full envelope, XML declaration included.
    pub fn to_xml(&self) -> Result<String> {
        let (errors, payload) = match &self.outcome {
            Outcome::Success(payload) => (Vec::new(), Some(payload)),
            Outcome::Failure(errors) => (
                errors
                    .iter()
                    .map(|e| ErrorElement {
                        code: e.code.as_ref(),
                        message: &e.message,
                    })
                    .collect(),
                None,
            ),
        };
        let envelope = Envelope {
            xmlns: OAI_NAMESPACE,
            xmlns_xsi: XSI_NAMESPACE,
            schema_location: OAI_SCHEMA_LOCATION,
            response_date: format_datestamp(&self.response_date),
            request: &self.request,
            errors,
            payload,
        };
        let body = quick_xml::se::to_string(&envelope)?;
        Ok(format!("{XML_DECLARATION}\n{body}"))
    }
}
