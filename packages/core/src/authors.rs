//! Parsing of the free-text author block.

/// One author as it appears in metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Author {
    pub first_name: Option<String>,
    pub last_name: String,
}

impl Author {
    /// "First Last", or just "Last" when there is no first name.
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.first_name {
            Some(first) => format!("{first} {}", self.last_name),
            None => self.last_name.clone(),
        }
    }
}

/// Split an author block into authors, one per line.
///
/// A line with a single token is a last name. With two or more tokens the
/// first is the first name and the second the last name; further tokens are
/// dropped, so "Juan de la Cruz" becomes first name "Juan", last name "de".
///
/// # Examples
/// ```
/// use vlo_core::authors::parse_authors;
///
/// let authors = parse_authors("Doe\r\nJane Smith\n\n");
/// assert_eq!(authors.len(), 2);
/// assert_eq!(authors[0].display_name(), "Doe");
/// assert_eq!(authors[1].display_name(), "Jane Smith");
/// ```
pub fn parse_authors(block: &str) -> Vec<Author> {
    block
        .replace("\r\n", "\n")
        .split('\n')
        .filter_map(|line| {
            let mut tokens = line.split_whitespace();
            match (tokens.next(), tokens.next()) {
                (Some(last), None) => Some(Author {
                    first_name: None,
                    last_name: last.to_string(),
                }),
                (Some(first), Some(last)) => Some(Author {
                    first_name: Some(first.to_string()),
                    last_name: last.to_string(),
                }),
                _ => None,
            }
        })
        .collect()
}
