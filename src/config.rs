//! Centralized configuration and builder for sniplib.
//!
//! Goals:
//! - Single place to collect tunables instead of scattering env lookups.
//! - LibraryConfig::from_env() reads SNIPLIB_* variables; builder overrides on top.
//!
//! Env:
//! - SNIPLIB_DATA_FSYNC    = 0|1 (fsync partition files before rename)
//! - SNIPLIB_STRICT_PATHS  = 0|1 (save into an unknown language is an error; delete stays a no-op)
//! - SNIPLIB_KEEP_CORRUPT  = 0|1 (copy malformed partition bytes aside before overwrite)
//! - SNIPLIB_LANG_ALIASES  = "javascriptreact=javascript,typescriptreact=typescript"

use std::collections::BTreeMap;
use std::fmt;

pub const ENV_ROOT: &str = "SNIPLIB_ROOT";
pub const ENV_DATA_FSYNC: &str = "SNIPLIB_DATA_FSYNC";
pub const ENV_STRICT_PATHS: &str = "SNIPLIB_STRICT_PATHS";
pub const ENV_KEEP_CORRUPT: &str = "SNIPLIB_KEEP_CORRUPT";
pub const ENV_LANG_ALIASES: &str = "SNIPLIB_LANG_ALIASES";

/// Top-level configuration for a snippet library.
#[derive(Clone, Debug)]
pub struct LibraryConfig {
    /// fsync partition tmp file before rename.
    /// Env: SNIPLIB_DATA_FSYNC (default false)
    pub data_fsync: bool,

    /// Save into a language without a partition file returns Err instead of a soft no-op.
    /// Delete is never affected.
    /// Env: SNIPLIB_STRICT_PATHS (default false)
    pub strict_paths: bool,

    /// Before overwriting a partition that failed to parse, keep its bytes in
    /// <lang>.json.corrupt-<ms>.
    /// Env: SNIPLIB_KEEP_CORRUPT (default true)
    pub keep_corrupt: bool,

    /// Editor language id -> partition language id, applied to completion lookups.
    /// Env: SNIPLIB_LANG_ALIASES (default javascriptreact=javascript)
    pub language_aliases: BTreeMap<String, String>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        let mut language_aliases = BTreeMap::new();
        language_aliases.insert("javascriptreact".to_string(), "javascript".to_string());
        Self {
            data_fsync: false,
            strict_paths: false,
            keep_corrupt: true,
            language_aliases,
        }
    }
}

fn parse_flag(v: &str) -> bool {
    let s = v.trim().to_ascii_lowercase();
    s == "1" || s == "true" || s == "on" || s == "yes"
}

/// "a=b, c=d" -> {a: b, c: d}. Malformed pairs are skipped.
pub fn parse_aliases(v: &str) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    for pair in v.split(',') {
        let Some((from, to)) = pair.split_once('=') else {
            continue;
        };
        let from = from.trim().to_lowercase();
        let to = to.trim().to_lowercase();
        if !from.is_empty() && !to.is_empty() {
            out.insert(from, to);
        }
    }
    out
}

impl LibraryConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var(ENV_DATA_FSYNC) {
            cfg.data_fsync = parse_flag(&v);
        }
        if let Ok(v) = std::env::var(ENV_STRICT_PATHS) {
            cfg.strict_paths = parse_flag(&v);
        }
        if let Ok(v) = std::env::var(ENV_KEEP_CORRUPT) {
            cfg.keep_corrupt = parse_flag(&v);
        }
        if let Ok(v) = std::env::var(ENV_LANG_ALIASES) {
            // Явно заданная переменная заменяет дефолтные алиасы целиком (пустая строка = без алиасов).
            cfg.language_aliases = parse_aliases(&v);
        }

        cfg
    }

    pub fn with_data_fsync(mut self, on: bool) -> Self {
        self.data_fsync = on;
        self
    }

    pub fn with_strict_paths(mut self, on: bool) -> Self {
        self.strict_paths = on;
        self
    }

    pub fn with_keep_corrupt(mut self, on: bool) -> Self {
        self.keep_corrupt = on;
        self
    }

    pub fn with_alias<F: Into<String>, T: Into<String>>(mut self, from: F, to: T) -> Self {
        self.language_aliases.insert(from.into(), to.into());
        self
    }

    pub fn without_aliases(mut self) -> Self {
        self.language_aliases.clear();
        self
    }

    /// Partition language for an editor language id.
    pub fn resolve_alias<'a>(&'a self, language: &'a str) -> &'a str {
        self.language_aliases
            .get(language)
            .map(|s| s.as_str())
            .unwrap_or(language)
    }

    /// Finish the builder and obtain the configuration.
    pub fn build(self) -> Self {
        self
    }
}

impl fmt::Display for LibraryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let aliases: Vec<String> = self
            .language_aliases
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        write!(
            f,
            "LibraryConfig {{ data_fsync: {}, strict_paths: {}, keep_corrupt: {}, language_aliases: [{}] }}",
            self.data_fsync,
            self.strict_paths,
            self.keep_corrupt,
            aliases.join(","),
        )
    }
}

/// Lightweight builder that produces a LibraryConfig.
/// Starts from env (as `SnippetStore::open` does), then applies overrides.
#[derive(Clone, Debug)]
pub struct LibraryBuilder {
    cfg: LibraryConfig,
}

impl Default for LibraryBuilder {
    fn default() -> Self {
        Self {
            cfg: LibraryConfig::from_env(),
        }
    }
}

impl LibraryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a clean default (without reading env).
    pub fn from_default() -> Self {
        Self {
            cfg: LibraryConfig::default(),
        }
    }

    pub fn data_fsync(mut self, on: bool) -> Self {
        self.cfg.data_fsync = on;
        self
    }

    pub fn strict_paths(mut self, on: bool) -> Self {
        self.cfg.strict_paths = on;
        self
    }

    pub fn keep_corrupt(mut self, on: bool) -> Self {
        self.cfg.keep_corrupt = on;
        self
    }

    pub fn alias<F: Into<String>, T: Into<String>>(mut self, from: F, to: T) -> Self {
        self.cfg.language_aliases.insert(from.into(), to.into());
        self
    }

    pub fn build(self) -> LibraryConfig {
        self.cfg
    }
}
