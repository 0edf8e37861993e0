use crate::error::{Result, SearchError};

/// Separator between query terms, e.g. `City|Street|Number`.
pub const TERM_SEPARATOR: char = '|';

/// An ordered, non-empty list of search terms.
///
/// The first term goes to the search tool; the rest are applied locally as
/// an AND filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    terms: Vec<String>,
}

impl Query {
    /// Split a raw query on [`TERM_SEPARATOR`].
    ///
    /// The first term is always the primary term, even when it is blank:
    /// `"|Main"` sends an empty pattern to the search tool (matching every
    /// line) and filters locally on `Main`. Blank secondary terms are
    /// dropped since they would match anything. Terms are kept verbatim.
    /// Returns [`SearchError::EmptyQuery`] when every term is blank.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.split(TERM_SEPARATOR).all(|term| term.trim().is_empty()) {
            return Err(SearchError::EmptyQuery);
        }

        let mut parts = raw.split(TERM_SEPARATOR);
        let primary = parts.next().unwrap_or_default().to_string();
        let terms: Vec<String> = std::iter::once(primary)
            .chain(
                parts
                    .filter(|term| !term.trim().is_empty())
                    .map(str::to_string),
            )
            .collect();
        Ok(Self { terms })
    }

    pub fn primary(&self) -> &str {
        &self.terms[0]
    }

    pub fn secondary(&self) -> &[String] {
        &self.terms[1..]
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}
