//! Best-effort parsing of free-text locale strings.
//!
//! Catalog locales look like `cs_CZ`, `en_US.UTF-8` or plain `de`. They are
//! turned into a [`Locale`] with at least a base language.
//!
//! When the full tag is not valid (e.g. `en_EN`, where `EN` is not a region)
//! the parser falls back to the base language alone and the region is lost.

use std::fmt;

use language_tags::LanguageTag;
use thiserror::Error;

/// Failure to resolve a locale string even through the fallback path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot parse locale '{input}': {reason}")]
pub struct LocaleError {
    pub input: String,
    pub reason: String,
}

impl LocaleError {
    fn new(input: &str, reason: impl Into<String>) -> Self {
        Self {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// A language tag reduced to the parts metadata needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    base: String,
    region: Option<String>,
}

impl Locale {
    /// ISO 639 base language code, lower case.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Region code, upper case, if it survived parsing.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// English name of the base language, falling back to the code itself.
    #[must_use]
    pub fn display_name(&self) -> String {
        isolang::Language::from_639_1(&self.base)
            .or_else(|| isolang::Language::from_639_3(&self.base))
            .map(|lang| lang.to_name().to_string())
            .unwrap_or_else(|| self.base.clone())
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.region {
            Some(region) => write!(f, "{}-{}", self.base, region),
            None => f.write_str(&self.base),
        }
    }
}

/// Parse a locale string of the form `base[_REGION][.encoding]`.
///
/// # Examples
/// ```
/// use vlo_core::locale::parse_locale;
///
/// let locale = parse_locale("en_US.UTF-8").unwrap();
/// assert_eq!(locale.base(), "en");
/// assert_eq!(locale.region(), Some("US"));
///
/// // invalid region, base language survives
/// let locale = parse_locale("en_EN").unwrap();
/// assert_eq!(locale.base(), "en");
/// assert_eq!(locale.region(), None);
///
/// assert!(parse_locale("xx_YY_ZZ").is_err());
/// ```
pub fn parse_locale(input: &str) -> Result<Locale, LocaleError> {
    let without_encoding = input.split('.').next().unwrap_or_default().trim();

    if let Ok(locale) = parse_tag(&without_encoding.replace('_', "-")) {
        return Ok(locale);
    }

    let mut parts: Vec<&str> = without_encoding.split('_').collect();
    if parts.len() < 2 {
        parts = without_encoding.split('-').collect();
    }
    if parts.len() != 2 {
        return Err(LocaleError::new(
            input,
            format!("expected `language_REGION`, found {} component(s)", parts.len()),
        ));
    }

    let base = parse_tag(parts[0]).map_err(|reason| LocaleError::new(input, reason))?;
    Ok(Locale {
        base: base.base,
        region: None,
    })
}

/// Parse and validate a hyphen-separated tag against the subtag registry.
fn parse_tag(tag: &str) -> Result<Locale, String> {
    let parsed = LanguageTag::parse(&canonical_case(tag)).map_err(|e| e.to_string())?;
    parsed.validate().map_err(|e| e.to_string())?;
    Ok(Locale {
        base: parsed.primary_language().to_ascii_lowercase(),
        region: parsed.region().map(str::to_ascii_uppercase),
    })
}

/// Apply BCP 47 letter case conventions (`en-US`, `sr-Latn-RS`).
fn canonical_case(tag: &str) -> String {
    tag.split('-')
        .enumerate()
        .map(|(i, subtag)| match (i, subtag.len()) {
            (0, _) => subtag.to_ascii_lowercase(),
            (_, 2) => subtag.to_ascii_uppercase(),
            (_, 4) => {
                let lower = subtag.to_ascii_lowercase();
                let mut chars = lower.chars();
                chars
                    .next()
                    .map(|first| first.to_ascii_uppercase().to_string() + chars.as_str())
                    .unwrap_or_default()
            }
            _ => subtag.to_ascii_lowercase(),
        })
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_locale() {
        let locale = parse_locale("en_US").unwrap();
        assert_eq!(locale.base(), "en");
        assert_eq!(locale.region(), Some("US"));
        assert_eq!(locale.to_string(), "en-US");
    }

    #[test]
    fn test_encoding_suffix_dropped() {
        let locale = parse_locale("cs_CZ.UTF-8").unwrap();
        assert_eq!(locale.base(), "cs");
        assert_eq!(locale.region(), Some("CZ"));
    }

    #[test]
    fn test_base_only() {
        let locale = parse_locale("cs").unwrap();
        assert_eq!(locale.base(), "cs");
        assert_eq!(locale.region(), None);
    }

    #[test]
    fn test_invalid_region_falls_back_to_base() {
        let locale = parse_locale("en_EN").unwrap();
        assert_eq!(locale.base(), "en");
        assert_eq!(locale.region(), None);
    }

    #[test]
    fn test_hyphen_fallback() {
        let locale = parse_locale("de-EN").unwrap();
        assert_eq!(locale.base(), "de");
        assert_eq!(locale.region(), None);
    }

    #[test]
    fn test_three_components_fail() {
        let err = parse_locale("xx_YY_ZZ").unwrap_err();
        assert_eq!(err.input, "xx_YY_ZZ");
    }

    #[test]
    fn test_empty_input_fails() {
        assert!(parse_locale("").is_err());
        assert!(parse_locale(".UTF-8").is_err());
    }

    #[test]
    fn test_display_name() {
        assert_eq!(parse_locale("cs_CZ").unwrap().display_name(), "Czech");
        assert_eq!(parse_locale("en").unwrap().display_name(), "English");
    }
}
