use corpus_search::{FileMatches, SearchResult};
use std::path::Path;
use std::time::Duration;

pub const NOTHING_TO_SEARCH: &str = "Nothing to search";
pub const NO_RESULTS: &str = "No results found.";

/// Messages for one finished query, in delivery order.
pub fn search_messages(
    result: &SearchResult,
    root: &Path,
    per_file_cap: usize,
    elapsed: Duration,
) -> Vec<String> {
    let mut messages = Vec::new();

    if result.is_empty() {
        messages.push(NO_RESULTS.to_string());
    } else {
        if result.is_truncated() {
            messages.push(truncation_warning(result, per_file_cap));
        }
        messages.extend(result.files.iter().map(|file| file_block(file, root)));
    }

    messages.push(summary(elapsed, result.display_limit));
    messages
}

pub fn truncation_warning(result: &SearchResult, per_file_cap: usize) -> String {
    format!(
        "Warning: {} lines found (at most {} per file), showing only {}. \
         Results are incomplete; narrow the query, e.g. 'City|Street|Number'.",
        result.total_candidate_lines, per_file_cap, result.display_limit
    )
}

pub fn file_block(file: &FileMatches, root: &Path) -> String {
    let mut block = format!("== {}", file_label(&file.path, root));
    for line in &file.lines {
        block.push_str("\n- ");
        block.push_str(line);
    }
    block
}

pub fn summary(elapsed: Duration, limit: usize) -> String {
    format!("Finished in {elapsed:.2?}, output limit is {limit}")
}

/// Files are labelled by the directory that holds them; files at the top of
/// the corpus fall back to their own name.
pub fn file_label(path: &str, root: &Path) -> String {
    let path = Path::new(path);
    let relative = path.strip_prefix(root).unwrap_or(path);

    let parent = relative
        .parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned());
    if let Some(parent) = parent {
        return parent;
    }

    relative
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| relative.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn result(files: Vec<FileMatches>, total: usize, limit: usize) -> SearchResult {
        SearchResult {
            files,
            total_candidate_lines: total,
            display_limit: limit,
            tool_failed: false,
        }
    }

    #[test]
    fn labels_use_parent_directory() {
        let root = Path::new("/srv/corpus");
        assert_eq!(file_label("/srv/corpus/berlin/people.txt", root), "berlin");
        assert_eq!(file_label("/srv/corpus/a/b/c.txt", root), "b");
        assert_eq!(file_label("/srv/corpus/top.txt", root), "top.txt");
        assert_eq!(file_label("elsewhere/x.txt", root), "elsewhere");
    }

    #[test]
    fn empty_result_renders_no_results_and_summary() {
        let messages = search_messages(
            &result(Vec::new(), 0, 10),
            Path::new("/c"),
            200,
            Duration::from_millis(5),
        );
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], NO_RESULTS);
        assert!(messages[1].ends_with("output limit is 10"));
    }

    #[test]
    fn truncated_result_starts_with_warning() {
        let files = vec![FileMatches {
            path: "/c/berlin/p.txt".to_string(),
            lines: vec!["Alice".to_string()],
        }];
        let messages =
            search_messages(&result(files, 3, 1), Path::new("/c"), 200, Duration::ZERO);

        assert_eq!(messages.len(), 3);
        assert!(messages[0].starts_with("Warning: 3 lines found (at most 200 per file)"));
        assert_eq!(messages[1], "== berlin\n- Alice");
        assert!(messages[2].starts_with("Finished in"));
    }
}
