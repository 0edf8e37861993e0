use crate::executor::MatchLine;
use crate::filter::TermFilter;
use serde::Serialize;
use std::collections::HashMap;

/// Accepted lines from one file, in tool output order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileMatches {
    pub path: String,
    pub lines: Vec<String>,
}

/// File-grouped outcome of one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    /// Files in order of their first accepted line.
    pub files: Vec<FileMatches>,
    /// Non-blank lines returned by the primary search, before filtering and capping.
    pub total_candidate_lines: usize,
    /// Limit in force when aggregation started.
    pub display_limit: usize,
    /// The search tool failed and the result was degraded to empty.
    pub tool_failed: bool,
}

impl SearchResult {
    pub fn empty(display_limit: usize) -> Self {
        Self {
            files: Vec::new(),
            total_candidate_lines: 0,
            display_limit,
            tool_failed: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn accepted_lines(&self) -> usize {
        self.files.iter().map(|file| file.lines.len()).sum()
    }

    pub fn lines_for(&self, path: &str) -> Option<&[String]> {
        self.files
            .iter()
            .find(|file| file.path == path)
            .map(|file| file.lines.as_slice())
    }

    /// More candidate lines came back than the display limit allows.
    pub fn is_truncated(&self) -> bool {
        self.total_candidate_lines > self.display_limit
    }
}

/// Group raw tool lines by file, keeping only lines that pass every
/// secondary term, and stop once `display_limit` lines were accepted.
///
/// The cut is a prefix cut over the raw order: files that only appear after
/// the limit is reached are left out entirely.
pub fn aggregate<L, S>(raw_lines: &[L], secondary_terms: &[S], display_limit: usize) -> SearchResult
where
    L: AsRef<str>,
    S: AsRef<str>,
{
    let filter = TermFilter::new(secondary_terms);
    let mut result = SearchResult::empty(display_limit);
    result.total_candidate_lines = raw_lines
        .iter()
        .filter(|line| !line.as_ref().trim().is_empty())
        .count();

    if display_limit == 0 {
        return result;
    }

    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut accepted = 0usize;

    for raw in raw_lines {
        let raw = raw.as_ref();
        if raw.trim().is_empty() {
            continue;
        }
        let Some(line) = MatchLine::parse(raw) else {
            log::debug!("Skipping unparseable tool line: {raw:?}");
            continue;
        };
        if !filter.accepts(line.text) {
            continue;
        }

        let slot = *slots.entry(line.file_path.to_string()).or_insert_with(|| {
            result.files.push(FileMatches {
                path: line.file_path.to_string(),
                lines: Vec::new(),
            });
            result.files.len() - 1
        });
        result.files[slot].lines.push(line.text.to_string());

        accepted += 1;
        if accepted >= display_limit {
            break;
        }
    }

    result
}
