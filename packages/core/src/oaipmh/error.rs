//! OAI-PMH error conditions.
//!
//! See <http://www.openarchives.org/OAI/openarchivesprotocol.html#ErrorConditions>.

use strum::{AsRefStr, Display, EnumIter};

use super::verb::{Argument, Verb};

/// Machine readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum ErrorCode {
    BadArgument,
    /// Reserved, resumption tokens never paginate.
    BadResumptionToken,
    BadVerb,
    CannotDisseminateFormat,
    IdDoesNotExist,
    NoRecordsMatch,
    /// Reserved, every record is available in every registered format.
    NoMetadataFormats,
    NoSetHierarchy,
}

impl ErrorCode {
    /// HTTP status sent when this error ends the request.
    #[must_use]
    pub fn http_status(self) -> u16 {
        match self {
            Self::BadArgument
            | Self::BadResumptionToken
            | Self::BadVerb
            | Self::CannotDisseminateFormat
            | Self::NoMetadataFormats => 400,
            Self::IdDoesNotExist => 404,
            Self::NoRecordsMatch => 200,
            Self::NoSetHierarchy => 501,
        }
    }
}

/// A single protocol error with its human readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolError {
    pub code: ErrorCode,
    pub message: String,
}

impl ProtocolError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn missing_verb() -> Self {
        Self::new(ErrorCode::BadArgument, "Missing required argument `verb`")
    }

    pub fn bad_verb(verb: &str) -> Self {
        Self::new(ErrorCode::BadVerb, format!("Invalid verb `{verb}`"))
    }

    pub fn missing_argument(argument: Argument, verb: Verb) -> Self {
        Self::new(
            ErrorCode::BadArgument,
            format!("Missing required argument `{argument}` for verb `{verb}`"),
        )
    }

    pub fn invalid_argument(argument: &str, verb: Verb) -> Self {
        Self::new(
            ErrorCode::BadArgument,
            format!("Invalid argument `{argument}` for verb `{verb}`"),
        )
    }

    pub fn repeated_argument(argument: &str) -> Self {
        Self::new(
            ErrorCode::BadArgument,
            format!("Argument `{argument}` must not be repeated"),
        )
    }

    pub fn cannot_disseminate(prefix: &str) -> Self {
        Self::new(
            ErrorCode::CannotDisseminateFormat,
            format!("Unknown metadata format `{prefix}`"),
        )
    }

    pub fn id_does_not_exist(identifier: &str) -> Self {
        Self::new(
            ErrorCode::IdDoesNotExist,
            format!("Record with identifier `{identifier}` not found"),
        )
    }

    pub fn no_records_match() -> Self {
        Self::new(ErrorCode::NoRecordsMatch, "No records match the request")
    }

    pub fn no_set_hierarchy() -> Self {
        Self::new(ErrorCode::NoSetHierarchy, "Sets are not supported")
    }

    /// Whether this error carries the given argument name in its message.
    #[must_use]
    pub fn names(&self, argument: &str) -> bool {
        self.message.contains(&format!("`{argument}`"))
    }
}

/// Non-empty list of protocol errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolErrors {
    first: ProtocolError,
    rest: Vec<ProtocolError>,
}

impl ProtocolErrors {
    pub fn new(first: ProtocolError) -> Self {
        Self {
            first,
            rest: Vec::new(),
        }
    }

    pub fn push(&mut self, error: ProtocolError) {
        self.rest.push(error);
    }

    /// The error deciding the HTTP status.
    #[must_use]
    pub fn first(&self) -> &ProtocolError {
        &self.first
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProtocolError> {
        std::iter::once(&self.first).chain(self.rest.iter())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        1 + self.rest.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    #[must_use]
    pub fn http_status(&self) -> u16 {
        self.first.code.http_status()
    }
}

impl From<ProtocolError> for ProtocolErrors {
    fn from(error: ProtocolError) -> Self {
        Self::new(error)
    }
}
