//! Protocol verbs and the per-verb argument grammar.

use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Name of the argument selecting the verb. Always required.
pub const VERB_ARG: &str = "verb";

/// The six OAI-PMH verbs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, IntoStaticStr, EnumString, EnumIter,
)]
pub enum Verb {
    Identify,
    GetRecord,
    ListIdentifiers,
    ListMetadataFormats,
    ListRecords,
    ListSets,
}

/// Arguments a verb may take besides `verb` itself.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, IntoStaticStr, EnumString, EnumIter,
)]
#[strum(serialize_all = "camelCase")]
pub enum Argument {
    Identifier,
    MetadataPrefix,
    From,
    Until,
    Set,
    ResumptionToken,
}

/// Required and allowed arguments of one verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grammar {
    pub required: &'static [Argument],
    pub allowed: &'static [Argument],
}

impl Grammar {
    #[must_use]
    pub fn allows(&self, argument: Argument) -> bool {
        self.allowed.contains(&argument)
    }
}

const LIST_ARGS: &[Argument] = &[
    Argument::MetadataPrefix,
    Argument::From,
    Argument::Until,
    Argument::Set,
    Argument::ResumptionToken,
];

impl Verb {
    /// Argument grammar of the verb.
    ///
    /// # Examples
    /// ```
    /// use vlo_core::oaipmh::verb::{Argument, Verb};
    ///
    /// let grammar = Verb::GetRecord.grammar();
    /// assert!(grammar.required.contains(&Argument::Identifier));
    /// assert!(!grammar.allows(Argument::From));
    /// ```
    #[must_use]
    pub fn grammar(self) -> Grammar {
        match self {
            Self::Identify => Grammar {
                required: &[],
                allowed: &[],
            },
            Self::GetRecord => Grammar {
                required: &[Argument::Identifier, Argument::MetadataPrefix],
                allowed: &[Argument::Identifier, Argument::MetadataPrefix],
            },
            Self::ListMetadataFormats => Grammar {
                required: &[],
                allowed: &[Argument::Identifier],
            },
            Self::ListIdentifiers | Self::ListRecords => Grammar {
                required: &[Argument::MetadataPrefix],
                allowed: LIST_ARGS,
            },
            Self::ListSets => Grammar {
                required: &[],
                allowed: &[Argument::ResumptionToken],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_verb_names_round_trip() {
        for verb in Verb::iter() {
            assert_eq!(Verb::from_str(verb.as_ref()).unwrap(), verb);
        }
        assert!(Verb::from_str("getrecord").is_err());
    }

    #[test]
    fn test_argument_names() {
        assert_eq!(Argument::MetadataPrefix.as_ref(), "metadataPrefix");
        assert_eq!(Argument::ResumptionToken.to_string(), "resumptionToken");
        assert_eq!(Argument::from_str("until").unwrap(), Argument::Until);
    }

    #[test]
    fn test_required_arguments_are_allowed() {
        for verb in Verb::iter() {
            let grammar = verb.grammar();
            for arg in grammar.required {
                assert!(grammar.allows(*arg), "{verb}: {arg} required but not allowed");
            }
        }
    }

    #[test]
    fn test_list_verbs_share_grammar() {
        assert_eq!(Verb::ListIdentifiers.grammar(), Verb::ListRecords.grammar());
        assert_eq!(Verb::Identify.grammar().allowed.len(), 0);
    }
}
