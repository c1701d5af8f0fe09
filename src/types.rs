//! types — базовые типы индекса: направление поиска, исходы загрузки и кэша, запись.
//!
//! - Direction: Exact / Asc / Desc (FromStr: "exact|asc|desc", а также "=", ">=", "<=").
//! - LoadResult: Present / Absent / Unloadable. Снаружи Absent и Unloadable
//!   намеренно сливаются в "нет значения" (LoadResult::into_option).
//! - CacheHit: Unusable / Mismatched / Valid.
//! - Keyed: запись сама знает свой ключ-владелец; это единственная основа
//!   для отбраковки кэша.
//! - RunRecord: конкретная запись файлового бэкенда (ключ u64).

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Query mode for directional search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Exact key only.
    Exact,
    /// Nearest key at or after the query key.
    Asc,
    /// Nearest key at or before the query key.
    Desc,
}

impl Direction {
    /// Whether `candidate` lies on the permitted side of `key` for this direction.
    #[inline]
    pub fn admits<K: Ord>(self, key: &K, candidate: &K) -> bool {
        match self {
            Direction::Exact => candidate == key,
            Direction::Asc => candidate >= key,
            Direction::Desc => candidate <= key,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Exact => write!(f, "exact"),
            Direction::Asc => write!(f, "asc"),
            Direction::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for Direction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" | "eq" | "=" => Ok(Direction::Exact),
            "asc" | "ceil" | ">=" => Ok(Direction::Asc),
            "desc" | "floor" | "<=" => Ok(Direction::Desc),
            other => Err(anyhow!("unknown direction '{}', expected exact|asc|desc", other)),
        }
    }
}

/// A materialized record that knows the key it was authoritatively stored under.
pub trait Keyed<K> {
    fn owner_key(&self) -> &K;
}

/// Outcome of materializing one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadResult<R> {
    Present(R),
    /// Key is unknown to the store.
    Absent,
    /// Key is known but the record could not be materialized.
    Unloadable,
}

impl<R> LoadResult<R> {
    #[inline]
    pub fn is_present(&self) -> bool {
        matches!(self, LoadResult::Present(_))
    }

    /// Collapse to the external contract: Absent and Unloadable both become None.
    #[inline]
    pub fn into_option(self) -> Option<R> {
        match self {
            LoadResult::Present(r) => Some(r),
            LoadResult::Absent | LoadResult::Unloadable => None,
        }
    }
}

/// Outcome of consulting the cache for one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheHit<R> {
    /// Entry could not be parsed.
    Unusable,
    /// Entry parsed, but its embedded owner key differs from the entry key.
    Mismatched,
    Valid(R),
}

/// Raised by first_key/last_key on an index with no keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EmptyIndex;

impl fmt::Display for EmptyIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "index is empty")
    }
}

impl std::error::Error for EmptyIndex {}

/// Run record of the filesystem backend: run number plus an opaque value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub number: u64,
    pub value: String,
}

impl RunRecord {
    pub fn new<S: Into<String>>(number: u64, value: S) -> Self {
        Self {
            number,
            value: value.into(),
        }
    }
}

impl Keyed<u64> for RunRecord {
    #[inline]
    fn owner_key(&self) -> &u64 {
        &self.number
    }
}
