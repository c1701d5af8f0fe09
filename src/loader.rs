//! loader — материализация записи по ключу (Loader) и опциональная мемоизация.
//!
//! Ядро не предполагает, что Loader мемоизирует результаты. LoadMemo — это
//! бесплатная оптимизация поверх него: результаты остаются value-equal,
//! меняется только число вызовов Loader.
//!
//! Политика (MemoPolicy, ENV RI_MEMO):
//! - off        — без мемоизации (по умолчанию);
//! - unloadable — запоминаем только Unloadable (дорогие повторные падения);
//! - all        — запоминаем Present и Unloadable.
//! Absent не запоминается никогда: это дешёвый ответ по KeyIndex.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;

use anyhow::{anyhow, Result};

use crate::metrics::{record_load, record_memo_hit};
use crate::types::LoadResult;

/// Converts a key into a materialized record, or reports why it cannot.
pub trait Loader<K, R> {
    fn load(&self, key: &K) -> LoadResult<R>;
}

impl<K, R, F> Loader<K, R> for F
where
    F: Fn(&K) -> LoadResult<R>,
{
    #[inline]
    fn load(&self, key: &K) -> LoadResult<R> {
        self(key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MemoPolicy {
    #[default]
    Off,
    Unloadable,
    All,
}

impl MemoPolicy {
    #[inline]
    fn keeps<R>(self, res: &LoadResult<R>) -> bool {
        match (self, res) {
            (MemoPolicy::Off, _) | (_, LoadResult::Absent) => false,
            (MemoPolicy::Unloadable, LoadResult::Unloadable) => true,
            (MemoPolicy::Unloadable, LoadResult::Present(_)) => false,
            (MemoPolicy::All, _) => true,
        }
    }
}

impl fmt::Display for MemoPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoPolicy::Off => write!(f, "off"),
            MemoPolicy::Unloadable => write!(f, "unloadable"),
            MemoPolicy::All => write!(f, "all"),
        }
    }
}

impl FromStr for MemoPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "0" | "none" | "false" => Ok(MemoPolicy::Off),
            "unloadable" | "failures" => Ok(MemoPolicy::Unloadable),
            "all" | "1" | "true" => Ok(MemoPolicy::All),
            other => Err(anyhow!("unknown memo policy '{}'", other)),
        }
    }
}

/// Memo table in front of a Loader.
pub struct LoadMemo<K, R> {
    policy: MemoPolicy,
    map: Mutex<BTreeMap<K, LoadResult<R>>>,
}

impl<K: Ord + Clone, R: Clone> LoadMemo<K, R> {
    pub fn new(policy: MemoPolicy) -> Self {
        Self {
            policy,
            map: Mutex::new(BTreeMap::new()),
        }
    }

    #[inline]
    pub fn policy(&self) -> MemoPolicy {
        self.policy
    }

    /// Load through the memo table. Every real Loader call is counted in metrics.
    pub fn load_with<L: Loader<K, R> + ?Sized>(&self, loader: &L, key: &K) -> LoadResult<R> {
        if self.policy == MemoPolicy::Off {
            return counted_load(loader, key);
        }

        if let Ok(guard) = self.map.lock() {
            if let Some(res) = guard.get(key) {
                record_memo_hit();
                return res.clone();
            }
        }

        let res = counted_load(loader, key);
        if self.policy.keeps(&res) {
            // poisoned lock — просто не запоминаем
            if let Ok(mut guard) = self.map.lock() {
                guard.insert(key.clone(), res.clone());
            }
        }
        res
    }

    pub fn len(&self) -> usize {
        self.map.lock().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut guard) = self.map.lock() {
            guard.clear();
        }
    }
}

fn counted_load<K, R, L: Loader<K, R> + ?Sized>(loader: &L, key: &K) -> LoadResult<R> {
    let res = loader.load(key);
    record_load(matches!(res, LoadResult::Unloadable));
    res
}
