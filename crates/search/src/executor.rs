use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Name of the ad-hoc ripgrep file type covering the corpus extension.
const CORPUS_TYPE: &str = "corpus";

/// Line-oriented search tool invoked once per query.
///
/// Implementations return the tool's raw stdout: newline-delimited
/// `<path>:<text>` lines.
pub trait SearchBackend: Send + Sync {
    fn run_search(
        &self,
        root: &Path,
        pattern: &str,
        extension: &str,
        per_file_cap: usize,
    ) -> Result<String>;
}

/// Runs `rg` as a child process.
#[derive(Debug, Clone)]
pub struct RipgrepBackend {
    program: PathBuf,
}

impl Default for RipgrepBackend {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_RG_PATH)
    }
}

impl RipgrepBackend {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(config.rg_path())
    }

    /// Arguments for one invocation: case-insensitive, filename-prefixed,
    /// restricted to `*.<extension>`, capped at `per_file_cap` matches per file.
    pub fn args(root: &Path, pattern: &str, extension: &str, per_file_cap: usize) -> Vec<OsString> {
        vec![
            "--with-filename".into(),
            "--no-heading".into(),
            "--ignore-case".into(),
            "--no-config".into(),
            "--color".into(),
            "never".into(),
            "--max-count".into(),
            per_file_cap.to_string().into(),
            "--type-add".into(),
            format!("{CORPUS_TYPE}:*.{extension}").into(),
            "--type".into(),
            CORPUS_TYPE.into(),
            "--".into(),
            pattern.into(),
            root.as_os_str().to_os_string(),
        ]
    }
}

impl SearchBackend for RipgrepBackend {
    fn run_search(
        &self,
        root: &Path,
        pattern: &str,
        extension: &str,
        per_file_cap: usize,
    ) -> Result<String> {
        let args = Self::args(root, pattern, extension, per_file_cap);
        log::info!("Executing {}: {:?}", self.program.display(), args);

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|err| {
                SearchError::ExternalTool(format!(
                    "failed to spawn {}: {err}",
                    self.program.display()
                ))
            })?;

        // Exit code: 0=matches, 1=no matches, 2+=error, None=killed by signal
        match output.status.code() {
            Some(0) => Ok(String::from_utf8_lossy(&output.stdout).into_owned()),
            Some(1) => Ok(String::new()),
            other => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(SearchError::ExternalTool(format!(
                    "{} exited with {other:?}: {}",
                    self.program.display(),
                    stderr.trim()
                )))
            }
        }
    }
}

/// Raw candidate lines from the primary search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrimarySearch {
    pub lines: Vec<String>,
    /// Set when the tool could not run; `lines` is then empty.
    pub failed: bool,
}

/// Run the primary term through `backend` over the configured corpus.
///
/// Never fails: a tool error is logged and degrades to an empty result with
/// `failed` set. An empty term list returns immediately without spawning
/// anything.
pub fn run_primary_search<S: AsRef<str>>(
    backend: &dyn SearchBackend,
    config: &SearchConfig,
    terms: &[S],
) -> PrimarySearch {
    let Some(primary) = terms.first() else {
        return PrimarySearch::default();
    };

    match backend.run_search(
        config.root(),
        primary.as_ref(),
        config.extension(),
        config.max_count_per_file(),
    ) {
        Ok(raw) => PrimarySearch {
            lines: split_output(&raw),
            failed: false,
        },
        Err(err) => {
            log::error!("Primary search for {:?} failed: {err}", primary.as_ref());
            PrimarySearch {
                lines: Vec::new(),
                failed: true,
            }
        }
    }
}

/// Split raw tool output into non-blank lines.
pub fn split_output(raw: &str) -> Vec<String> {
    raw.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// One tool output line split into its file and matched text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchLine<'a> {
    pub file_path: &'a str,
    pub text: &'a str,
}

impl<'a> MatchLine<'a> {
    /// Split at the first `:`; lines without one are rejected.
    pub fn parse(line: &'a str) -> Option<Self> {
        let (file_path, text) = line.split_once(':')?;
        Some(Self { file_path, text })
    }
}
