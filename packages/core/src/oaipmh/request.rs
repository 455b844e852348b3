//! Request validation.
//!
//! Turns the raw parameter list of an HTTP request into a typed [`Request`],
//! stopping at the first grammar violation.

use std::collections::HashSet;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use thiserror::Error;

use super::error::ProtocolError;
use super::verb::{Argument, Verb, VERB_ARG};
use crate::error::Error;
use crate::repository::{DateRange, Until};

/// Why a parameter list did not become a [`Request`].
#[derive(Debug, Error)]
pub enum RequestError {
    /// Grammar violation, answered inside the protocol envelope.
    #[error("{}: {}", .0.code, .0.message)]
    Protocol(ProtocolError),

    /// Malformed date bound. Ends the request as an internal failure.
    #[error(transparent)]
    Internal(#[from] Error),
}

impl From<ProtocolError> for RequestError {
    fn from(error: ProtocolError) -> Self {
        Self::Protocol(error)
    }
}

/// A validated OAI-PMH request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub verb: Verb,
    pub identifier: Option<String>,
    pub metadata_prefix: Option<String>,
    /// Raw `from` value, kept for the request echo.
    pub from: Option<String>,
    /// Raw `until` value, kept for the request echo.
    pub until: Option<String>,
    pub set: Option<String>,
    /// Accepted but never acted upon.
    pub resumption_token: Option<String>,
    /// Parsed `from`/`until` bounds.
    pub range: DateRange,
}

fn value_of<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

fn start_of(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

enum Bound {
    Timestamp(DateTime<Utc>),
    Date(NaiveDate),
}

fn parse_bound(argument: &'static str, value: &str) -> Result<Bound, Error> {
    let invalid = |source| Error::InvalidDate {
        argument,
        value: value.to_string(),
        source,
    };
    if value.contains('T') {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| Bound::Timestamp(dt.with_timezone(&Utc)))
            .map_err(invalid)
    } else {
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Bound::Date)
            .map_err(invalid)
    }
}

/// Parse a `from` value into an inclusive lower bound.
pub fn parse_from(value: &str) -> Result<DateTime<Utc>, Error> {
    Ok(match parse_bound("from", value)? {
        Bound::Timestamp(instant) => instant,
        Bound::Date(date) => start_of(date),
    })
}

/// Parse an `until` value.
///
/// A bare date covers the whole day, so it becomes the exclusive start of the
/// following day.
///
/// # Examples
/// ```
/// use vlo_core::oaipmh::request::parse_until;
/// use vlo_core::repository::Until;
///
/// let Until::Before(bound) = parse_until("2024-01-15").unwrap() else {
///     unreachable!()
/// };
/// assert_eq!(bound.to_rfc3339(), "2024-01-16T00:00:00+00:00");
/// ```
pub fn parse_until(value: &str) -> Result<Until, Error> {
    Ok(match parse_bound("until", value)? {
        Bound::Timestamp(instant) => Until::Inclusive(instant),
        Bound::Date(date) => match date.succ_opt() {
            Some(next) => Until::Before(start_of(next)),
            None => Until::Inclusive(DateTime::<Utc>::MAX_UTC),
        },
    })
}

impl Request {
    /// Validate raw parameters, in the order they were received.
    ///
    /// Checks run in a fixed order and the first failure wins: missing verb,
    /// unknown verb, missing required argument, argument not allowed for the
    /// verb, repeated argument, malformed date.
    pub fn parse(params: &[(String, String)]) -> Result<Self, RequestError> {
        let raw_verb = value_of(params, VERB_ARG).ok_or_else(ProtocolError::missing_verb)?;
        let verb = Verb::from_str(raw_verb).map_err(|_| ProtocolError::bad_verb(raw_verb))?;
        let grammar = verb.grammar();

        if let Some(missing) = grammar
            .required
            .iter()
            .find(|arg| value_of(params, arg.as_ref()).is_none())
        {
            return Err(ProtocolError::missing_argument(*missing, verb).into());
        }

        for (key, _) in params {
            if key == VERB_ARG {
                continue;
            }
            match Argument::from_str(key) {
                Ok(arg) if grammar.allows(arg) => {}
                _ => return Err(ProtocolError::invalid_argument(key, verb).into()),
            }
        }

        let mut seen = HashSet::new();
        if let Some((key, _)) = params.iter().find(|(key, _)| !seen.insert(key.as_str())) {
            return Err(ProtocolError::repeated_argument(key).into());
        }

        let get = |arg: Argument| value_of(params, arg.as_ref()).map(String::from);
        // an empty bound counts as absent
        let from = get(Argument::From).filter(|v| !v.is_empty());
        let until = get(Argument::Until).filter(|v| !v.is_empty());
        let range = DateRange {
            from: from.as_deref().map(parse_from).transpose()?,
            until: until.as_deref().map(parse_until).transpose()?,
        };

        Ok(Self {
            verb,
            identifier: get(Argument::Identifier),
            metadata_prefix: get(Argument::MetadataPrefix),
            from,
            until,
            set: get(Argument::Set),
            resumption_token: get(Argument::ResumptionToken),
            range,
        })
    }

    /// Accepted arguments as `(name, value)` pairs, `verb` first.
    #[must_use]
    pub fn arguments(&self) -> Vec<(&'static str, &str)> {
        let optional = [
            (Argument::Identifier, &self.identifier),
            (Argument::MetadataPrefix, &self.metadata_prefix),
            (Argument::From, &self.from),
            (Argument::Until, &self.until),
            (Argument::Set, &self.set),
            (Argument::ResumptionToken, &self.resumption_token),
        ];
        let mut echoed: Vec<(&'static str, &str)> = vec![(VERB_ARG, self.verb.into())];
        echoed.extend(optional.into_iter().filter_map(|(arg, value)| {
            value.as_deref().map(|v| (<&'static str>::from(arg), v))
        }));
        echoed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oaipmh::error::ErrorCode;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn protocol_error(pairs: &[(&str, &str)]) -> ProtocolError {
        match Request::parse(&params(pairs)) {
            Err(RequestError::Protocol(e)) => e,
            other => panic!("expected protocol error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_verb() {
        let err = protocol_error(&[("identifier", "1")]);
        assert_eq!(err.code, ErrorCode::BadArgument);
        assert!(err.names("verb"));
    }

    #[test]
    fn test_unknown_verb_is_bad_verb() {
        let err = protocol_error(&[("verb", "ListEverything"), ("foo", "bar")]);
        assert_eq!(err.code, ErrorCode::BadVerb);
    }

    #[test]
    fn test_missing_required_argument() {
        let err = protocol_error(&[("verb", "GetRecord"), ("metadataPrefix", "oai_dc")]);
        assert_eq!(err.code, ErrorCode::BadArgument);
        assert!(err.names("identifier"));
        assert!(!err.names("metadataPrefix"));
    }

    #[test]
    fn test_required_checked_before_allowed() {
        let err = protocol_error(&[("verb", "ListRecords"), ("identifier", "1")]);
        assert!(err.names("metadataPrefix"));
    }

    #[test]
    fn test_argument_not_allowed() {
        let err = protocol_error(&[("verb", "Identify"), ("from", "2024-01-01")]);
        assert_eq!(err.code, ErrorCode::BadArgument);
        assert!(err.names("from"));
    }

    #[test]
    fn test_unknown_argument() {
        let err = protocol_error(&[("verb", "ListSets"), ("colour", "blue")]);
        assert!(err.names("colour"));
    }

    #[test]
    fn test_repeated_argument() {
        let err = protocol_error(&[
            ("verb", "ListRecords"),
            ("metadataPrefix", "oai_dc"),
            ("metadataPrefix", "cmdi"),
        ]);
        assert_eq!(err.code, ErrorCode::BadArgument);
        assert!(err.names("metadataPrefix"));
    }

    #[test]
    fn test_bare_until_is_exclusive_next_day() {
        let request = Request::parse(&params(&[
            ("verb", "ListIdentifiers"),
            ("metadataPrefix", "oai_dc"),
            ("from", "2024-01-01"),
            ("until", "2024-01-15"),
        ]))
        .unwrap();
        assert_eq!(
            request.range,
            DateRange {
                from: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
                until: Some(Until::Before(Utc.with_ymd_and_hms(2024, 1, 16, 0, 0, 0).unwrap())),
            }
        );
    }

    #[test]
    fn test_timestamp_until_is_inclusive_utc() {
        let until = parse_until("2024-01-15T12:00:00+02:00").unwrap();
        assert_eq!(
            until,
            Until::Inclusive(Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_malformed_date_is_internal() {
        let result = Request::parse(&params(&[
            ("verb", "ListRecords"),
            ("metadataPrefix", "oai_dc"),
            ("from", "yesterday"),
        ]));
        assert!(matches!(
            result,
            Err(RequestError::Internal(Error::InvalidDate { argument: "from", .. }))
        ));
    }

    #[test]
    fn test_empty_bounds_are_absent() {
        let request = Request::parse(&params(&[
            ("verb", "ListRecords"),
            ("metadataPrefix", "oai_dc"),
            ("from", ""),
            ("until", ""),
        ]))
        .unwrap();
        assert_eq!(request.range, DateRange::default());
        assert_eq!(request.from, None);
        assert_eq!(request.until, None);
    }

    #[test]
    fn test_arguments_echo() {
        let request = Request::parse(&params(&[
            ("metadataPrefix", "cmdi"),
            ("identifier", "42"),
            ("verb", "GetRecord"),
        ]))
        .unwrap();
        assert_eq!(
            request.arguments(),
            vec![
                ("verb", "GetRecord"),
                ("identifier", "42"),
                ("metadataPrefix", "cmdi"),
            ]
        );
    }
}
