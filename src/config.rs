//! Centralized configuration and builder for RunIndex.
//!
//! Goals:
//! - Single place to collect tunables instead of scattering env lookups.
//! - IndexConfig::from_env() reads RI_* env vars; IndexBuilder starts from env
//!   and allows overrides.
//!
//! None of these knobs can change a query result. They trade Loader calls
//! against memory (memo) and control how loudly sparse caches are reported.

use std::fmt;

use crate::loader::MemoPolicy;

/// Top-level configuration of a LazySortedIndex.
#[derive(Clone, Debug)]
pub struct IndexConfig {
    /// Consult an attached CacheStore at all.
    /// Env: RI_USE_CACHE (default true; "1|true|on|yes" => true)
    pub use_cache: bool,

    /// Memoization of Loader outcomes.
    /// Env: RI_MEMO = off|unloadable|all (default off)
    pub memo: MemoPolicy,

    /// Warn when a single gap-scan visits more keys than this (0 disables).
    /// Env: RI_GAP_WARN_KEYS (default 1024)
    pub gap_warn_keys: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            use_cache: true,
            memo: MemoPolicy::Off,
            gap_warn_keys: 1024,
        }
    }
}

#[inline]
fn parse_bool(v: &str) -> bool {
    let s = v.trim().to_ascii_lowercase();
    s == "1" || s == "true" || s == "on" || s == "yes"
}

impl IndexConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("RI_USE_CACHE") {
            cfg.use_cache = parse_bool(&v);
        }

        if let Ok(v) = std::env::var("RI_MEMO") {
            if let Ok(p) = v.parse::<MemoPolicy>() {
                cfg.memo = p;
            }
        }

        if let Ok(v) = std::env::var("RI_GAP_WARN_KEYS") {
            if let Ok(n) = v.trim().parse::<usize>() {
                cfg.gap_warn_keys = n;
            }
        }

        cfg
    }

    /// Fluent setters (builder-style) to override specific fields.

    pub fn with_use_cache(mut self, on: bool) -> Self {
        self.use_cache = on;
        self
    }

    pub fn with_memo(mut self, memo: MemoPolicy) -> Self {
        self.memo = memo;
        self
    }

    pub fn with_gap_warn_keys(mut self, n: usize) -> Self {
        self.gap_warn_keys = n;
        self
    }

    /// Finish the builder and obtain the configuration.
    pub fn build(self) -> Self {
        self
    }
}

impl fmt::Display for IndexConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "IndexConfig {{ use_cache: {}, memo: {}, gap_warn_keys: {} }}",
            self.use_cache,
            self.memo,
            if self.gap_warn_keys == 0 {
                "off".to_string()
            } else {
                self.gap_warn_keys.to_string()
            },
        )
    }
}

/// Lightweight builder that produces an IndexConfig.
#[derive(Clone, Debug)]
pub struct IndexBuilder {
    cfg: IndexConfig,
}

impl Default for IndexBuilder {
    fn default() -> Self {
        // Start from env, then allow overrides.
        Self {
            cfg: IndexConfig::from_env(),
        }
    }
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a clean default (without reading env).
    pub fn from_default() -> Self {
        Self {
            cfg: IndexConfig::default(),
        }
    }

    pub fn use_cache(mut self, on: bool) -> Self {
        self.cfg.use_cache = on;
        self
    }

    pub fn memo(mut self, memo: MemoPolicy) -> Self {
        self.cfg.memo = memo;
        self
    }

    pub fn gap_warn_keys(mut self, n: usize) -> Self {
        self.cfg.gap_warn_keys = n;
        self
    }

    pub fn build(self) -> IndexConfig {
        self.cfg
    }
}
