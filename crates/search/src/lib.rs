//! # Corpus Search
//!
//! Line search over a directory of flat files, backed by ripgrep.
//!
//! ## Pipeline
//!
//! ```text
//! "Smith|Main|42"
//!     │
//!     ├──> Query (split on `|`)
//!     │      └─> primary term + secondary terms
//!     │
//!     ├──> SearchBackend (rg, case-insensitive, per-file cap)
//!     │      └─> raw `path:text` lines
//!     │
//!     ├──> TermFilter (AND over secondary terms, whitespace/case-insensitive)
//!     │
//!     └──> aggregate (group by file, stop at the display limit)
//!            └─> SearchResult
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use corpus_search::{CorpusSearch, SearchConfig};
//!
//! fn main() -> corpus_search::Result<()> {
//!     let config = SearchConfig::new("/srv/corpus", "txt")?;
//!     let search = CorpusSearch::with_ripgrep(config);
//!     let result = search.search("Smith|Main St")?;
//!
//!     for file in &result.files {
//!         println!("{}: {} lines", file.path, file.lines.len());
//!     }
//!     Ok(())
//! }
//! ```

mod aggregate;
mod catalog;
mod config;
mod engine;
mod error;
mod executor;
mod filter;
mod limiter;
mod query;

pub use aggregate::{aggregate, FileMatches, SearchResult};
pub use catalog::{list_files, FileCatalog};
pub use config::{
    SearchConfig, DEFAULT_DISPLAY_LIMIT, DEFAULT_MAX_COUNT_PER_FILE, DEFAULT_RG_PATH,
};
pub use engine::CorpusSearch;
pub use error::{Result, SearchError};
pub use executor::{
    run_primary_search, split_output, MatchLine, PrimarySearch, RipgrepBackend, SearchBackend,
};
pub use filter::{matches_all_terms, normalize, TermFilter};
pub use limiter::QueryLimiter;
pub use query::{Query, TERM_SEPARATOR};
