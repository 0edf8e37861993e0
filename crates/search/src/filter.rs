//! Secondary AND-filtering of matched lines.
//!
//! Both sides are lower-cased and stripped of all whitespace before the
//! containment check, so `"Main St"` matches `"mainst"` and a term typed as
//! `"42 main"` still matches a source line written as `"42  Main"`.

/// Lower-case `text` and drop every whitespace character.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|ch| !ch.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// `true` when every secondary term occurs in `line` after normalization.
pub fn matches_all_terms<S: AsRef<str>>(line: &str, secondary_terms: &[S]) -> bool {
    if secondary_terms.is_empty() {
        return true;
    }
    let haystack = normalize(line);
    secondary_terms
        .iter()
        .all(|term| haystack.contains(&normalize(term.as_ref())))
}

/// Pre-normalized secondary terms, reused across every line of one query.
#[derive(Debug, Clone, Default)]
pub struct TermFilter {
    terms: Vec<String>,
}

impl TermFilter {
    pub fn new<S: AsRef<str>>(secondary_terms: &[S]) -> Self {
        Self {
            terms: secondary_terms
                .iter()
                .map(|term| normalize(term.as_ref()))
                .collect(),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn accepts(&self, line: &str) -> bool {
        if self.is_noop() {
            return true;
        }
        let haystack = normalize(line);
        self.terms.iter().all(|term| haystack.contains(term.as_str()))
    }
}
