use crate::error::{Result, SearchError};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Per-file match ceiling handed to the search tool.
pub const DEFAULT_MAX_COUNT_PER_FILE: usize = 200;
/// Display limit used until an operator changes it.
pub const DEFAULT_DISPLAY_LIMIT: usize = 10;
pub const DEFAULT_RG_PATH: &str = "rg";

/// Immutable search settings, loaded once at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    root: PathBuf,
    extension: String,
    max_count_per_file: usize,
    default_limit: usize,
    rg_path: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSearchConfig {
    root: Option<PathBuf>,
    extension: Option<String>,
    max_count_per_file: Option<usize>,
    default_limit: Option<usize>,
    rg_path: Option<PathBuf>,
}

impl SearchConfig {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Result<Self> {
        let cfg = Self {
            root: root.into(),
            extension: normalize_extension(&extension.into()),
            max_count_per_file: DEFAULT_MAX_COUNT_PER_FILE,
            default_limit: DEFAULT_DISPLAY_LIMIT,
            rg_path: PathBuf::from(DEFAULT_RG_PATH),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read a TOML config file.
    ///
    /// `root` and `extension` may be omitted from the file when the caller
    /// supplies them as overrides.
    pub fn load(
        path: &Path,
        root_override: Option<PathBuf>,
        extension_override: Option<String>,
    ) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|err| {
            SearchError::Config(format!("failed to read {}: {err}", path.display()))
        })?;
        let cfg = Self::from_toml_str(&raw, root_override, extension_override)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(cfg)
    }

    pub fn from_toml_str(
        raw: &str,
        root_override: Option<PathBuf>,
        extension_override: Option<String>,
    ) -> Result<Self> {
        let parsed: RawSearchConfig =
            toml::from_str(raw).map_err(|err| SearchError::Config(err.to_string()))?;
        Self::from_raw(parsed, root_override, extension_override)
    }

    /// Build a config purely from overrides, for runs without a config file.
    pub fn from_overrides(root: Option<PathBuf>, extension: Option<String>) -> Result<Self> {
        Self::from_raw(RawSearchConfig::default(), root, extension)
    }

    fn from_raw(
        raw: RawSearchConfig,
        root_override: Option<PathBuf>,
        extension_override: Option<String>,
    ) -> Result<Self> {
        let root = root_override
            .or(raw.root)
            .ok_or_else(|| SearchError::Config("`root` is required".to_string()))?;
        let extension = extension_override
            .or(raw.extension)
            .ok_or_else(|| SearchError::Config("`extension` is required".to_string()))?;

        let cfg = Self {
            root,
            extension: normalize_extension(&extension),
            max_count_per_file: raw
                .max_count_per_file
                .unwrap_or(DEFAULT_MAX_COUNT_PER_FILE),
            default_limit: raw.default_limit.unwrap_or(DEFAULT_DISPLAY_LIMIT),
            rg_path: raw
                .rg_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_RG_PATH)),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        if self.root.as_os_str().is_empty() {
            return Err(SearchError::Config("`root` must not be empty".to_string()));
        }
        if self.extension.is_empty() {
            return Err(SearchError::Config(
                "`extension` must not be empty".to_string(),
            ));
        }
        if self.extension.contains(['/', '\\', '*', '?', '{', '}', ',']) {
            return Err(SearchError::Config(format!(
                "`extension` contains unsupported characters: {}",
                self.extension
            )));
        }
        if self.max_count_per_file == 0 {
            return Err(SearchError::Config(
                "`max_count_per_file` must be positive".to_string(),
            ));
        }
        if self.default_limit == 0 {
            return Err(SearchError::Config(
                "`default_limit` must be positive".to_string(),
            ));
        }
        if self.rg_path.as_os_str().is_empty() {
            return Err(SearchError::Config("`rg_path` must not be empty".to_string()));
        }
        Ok(())
    }

    #[must_use]
    pub fn with_max_count_per_file(mut self, value: usize) -> Self {
        self.max_count_per_file = value.max(1);
        self
    }

    #[must_use]
    pub fn with_default_limit(mut self, value: usize) -> Self {
        self.default_limit = value.max(1);
        self
    }

    #[must_use]
    pub fn with_rg_path(mut self, value: impl Into<PathBuf>) -> Self {
        self.rg_path = value.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn max_count_per_file(&self) -> usize {
        self.max_count_per_file
    }

    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    pub fn rg_path(&self) -> &Path {
        &self.rg_path
    }
}

fn normalize_extension(raw: &str) -> String {
    raw.trim().trim_start_matches('.').to_string()
}
