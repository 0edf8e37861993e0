use crate::aggregate::{aggregate, SearchResult};
use crate::catalog::FileCatalog;
use crate::config::SearchConfig;
use crate::error::Result;
use crate::executor::{run_primary_search, RipgrepBackend, SearchBackend};
use crate::limiter::QueryLimiter;
use crate::query::Query;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Query entry point: primary search, secondary filtering and capping.
pub struct CorpusSearch {
    config: SearchConfig,
    backend: Arc<dyn SearchBackend>,
    limiter: Arc<QueryLimiter>,
}

impl CorpusSearch {
    pub fn new(
        config: SearchConfig,
        backend: Arc<dyn SearchBackend>,
        limiter: Arc<QueryLimiter>,
    ) -> Self {
        Self {
            config,
            backend,
            limiter,
        }
    }

    /// Ripgrep-backed engine with a fresh limiter at the configured default.
    pub fn with_ripgrep(config: SearchConfig) -> Self {
        let backend = Arc::new(RipgrepBackend::from_config(&config));
        let limiter = Arc::new(QueryLimiter::new(config.default_limit()));
        Self::new(config, backend, limiter)
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn limit(&self) -> usize {
        self.limiter.get()
    }

    pub fn set_limit(&self, raw: &str) -> Result<usize> {
        self.limiter.set(raw)
    }

    pub fn list_files(&self) -> Result<Vec<PathBuf>> {
        FileCatalog::new(self.config.root(), self.config.extension()).list_files()
    }

    /// Run a `|`-separated query.
    ///
    /// Returns [`crate::SearchError::EmptyQuery`] for a blank query, before
    /// any process is spawned. Tool failures surface as an empty result with
    /// `tool_failed` set.
    pub fn search(&self, raw_query: &str) -> Result<SearchResult> {
        let query = Query::parse(raw_query)?;
        let display_limit = self.limiter.get();
        let started = Instant::now();

        let primary = run_primary_search(self.backend.as_ref(), &self.config, query.terms());
        let mut result = aggregate(&primary.lines, query.secondary(), display_limit);
        result.tool_failed = primary.failed;

        log::info!(
            "Query {:?}: {} candidate lines, {} accepted in {} files (limit {}, {:?})",
            raw_query,
            result.total_candidate_lines,
            result.accepted_lines(),
            result.files.len(),
            display_limit,
            started.elapsed()
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::FileMatches;
    use crate::error::SearchError;
    use pretty_assertions::assert_eq;
    use std::path::Path;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingBackend {
        output: String,
        fail: bool,
        patterns: Mutex<Vec<String>>,
    }

    impl SearchBackend for RecordingBackend {
        fn run_search(
            &self,
            root: &Path,
            pattern: &str,
            extension: &str,
            per_file_cap: usize,
        ) -> Result<String> {
            assert_eq!(root, Path::new("/corpus"));
            assert_eq!(extension, "log");
            assert_eq!(per_file_cap, 200);
            self.patterns.lock().unwrap().push(pattern.to_string());
            if self.fail {
                return Err(SearchError::ExternalTool("exit 2".to_string()));
            }
            Ok(self.output.clone())
        }
    }

    fn engine(backend: Arc<RecordingBackend>, limit: usize) -> CorpusSearch {
        let config = SearchConfig::new("/corpus", "log").unwrap();
        CorpusSearch::new(config, backend, Arc::new(QueryLimiter::new(limit)))
    }

    #[test]
    fn primary_term_goes_to_tool_and_rest_filter_locally() {
        let backend = Arc::new(RecordingBackend {
            output: "primary.log:Alice Smith 42 Main St\nprimary.log:Bob Jones 7 Oak Ave\n"
                .to_string(),
            ..Default::default()
        });
        let search = engine(Arc::clone(&backend), 10);

        let result = search.search("Smith|Main").unwrap();

        assert_eq!(
            result.files,
            vec![FileMatches {
                path: "primary.log".to_string(),
                lines: vec!["Alice Smith 42 Main St".to_string()],
            }]
        );
        assert_eq!(result.total_candidate_lines, 2);
        assert!(!result.tool_failed);
        assert_eq!(*backend.patterns.lock().unwrap(), vec!["Smith".to_string()]);
    }

    #[test]
    fn empty_query_spawns_nothing() {
        let backend = Arc::new(RecordingBackend::default());
        let search = engine(Arc::clone(&backend), 10);

        assert!(matches!(search.search(""), Err(SearchError::EmptyQuery)));
        assert!(backend.patterns.lock().unwrap().is_empty());
    }

    #[test]
    fn limit_of_one_truncates_across_files() {
        let backend = Arc::new(RecordingBackend {
            output: "a/x.log:first\nb/y.log:second\na/x.log:third\n".to_string(),
            ..Default::default()
        });
        let search = engine(backend, 1);

        let result = search.search("i").unwrap();
        assert_eq!(result.accepted_lines(), 1);
        assert_eq!(result.total_candidate_lines, 3);
        assert_eq!(result.display_limit, 1);
        assert!(result.is_truncated());
    }

    #[test]
    fn tool_failure_is_flagged_but_not_raised() {
        let backend = Arc::new(RecordingBackend {
            fail: true,
            ..Default::default()
        });
        let search = engine(backend, 10);

        let result = search.search("anything").unwrap();
        assert!(result.is_empty());
        assert!(result.tool_failed);
        assert_eq!(result.total_candidate_lines, 0);
    }

    #[test]
    fn limit_changes_apply_to_the_next_query() {
        let backend = Arc::new(RecordingBackend {
            output: "a.log:1\na.log:2\na.log:3\n".to_string(),
            ..Default::default()
        });
        let search = engine(backend, 10);

        assert_eq!(search.search("x").unwrap().accepted_lines(), 3);
        assert_eq!(search.set_limit(" 2 ").unwrap(), 2);
        assert_eq!(search.search("x").unwrap().accepted_lines(), 2);
        assert!(search.set_limit("zero").is_err());
        assert_eq!(search.limit(), 2);
    }

    #[test]
    fn blank_primary_term_sends_empty_pattern() {
        let backend = Arc::new(RecordingBackend {
            output: "a.log:Alice 42 Main St\na.log:Bob 7 Oak Ave\n".to_string(),
            ..Default::default()
        });
        let search = engine(Arc::clone(&backend), 10);

        let result = search.search("|main").unwrap();
        assert_eq!(*backend.patterns.lock().unwrap(), vec![String::new()]);
        assert_eq!(result.lines_for("a.log"), Some(&["Alice 42 Main St".to_string()][..]));
        assert_eq!(result.total_candidate_lines, 2);
    }

    #[test]
    fn ripgrep_engine_starts_at_configured_default_limit() {
        let config = SearchConfig::new("/corpus", "log")
            .unwrap()
            .with_default_limit(25)
            .with_max_count_per_file(50);
        let search = CorpusSearch::with_ripgrep(config);

        assert_eq!(search.limit(), 25);
        assert_eq!(search.config().max_count_per_file(), 50);
    }

    #[test]
    fn engine_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CorpusSearch>();
    }
}
