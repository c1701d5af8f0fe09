//! index/core — структура LazySortedIndex и общий путь разрешения ключа.
//!
//! Индекс не хранит состояния запросов: каждая операция — чистая функция
//! текущего состояния коллабораторов (KeyIndex, Loader, CacheStore).
//! Единственное внутреннее состояние — необязательная memo-таблица Loader'а.

use std::fmt;

use log::debug;

use crate::cache::CacheStore;
use crate::config::IndexConfig;
use crate::keys::KeyIndex;
use crate::loader::{LoadMemo, Loader};
use crate::metrics::{
    record_cache_miss, record_cache_mismatched, record_cache_unusable, record_cache_valid,
};
use crate::types::{CacheHit, Keyed, LoadResult};

/// Read-only sorted index over lazily loaded records.
pub struct LazySortedIndex<K, R, I, L> {
    pub(crate) keys: I,
    pub(crate) loader: L,
    pub(crate) cache: Option<Box<dyn CacheStore<K, R>>>,
    pub(crate) memo: LoadMemo<K, R>,
    pub(crate) cfg: IndexConfig,
}

impl<K, R, I, L> LazySortedIndex<K, R, I, L>
where
    K: Ord + Clone + fmt::Debug + 'static,
    R: Keyed<K> + Clone,
    I: KeyIndex<K>,
    L: Loader<K, R>,
{
    pub fn new(keys: I, loader: L) -> Self {
        Self::with_config(keys, loader, IndexConfig::default())
    }

    pub fn with_config(keys: I, loader: L, cfg: IndexConfig) -> Self {
        let memo = LoadMemo::new(cfg.memo);
        Self {
            keys,
            loader,
            cache: None,
            memo,
            cfg,
        }
    }

    /// Attach an accelerating cache. Results never depend on it.
    pub fn with_cache<C>(mut self, cache: C) -> Self
    where
        C: CacheStore<K, R> + 'static,
    {
        self.cache = Some(Box::new(cache));
        self
    }

    #[inline]
    pub fn config(&self) -> &IndexConfig {
        &self.cfg
    }

    #[inline]
    pub fn key_index(&self) -> &I {
        &self.keys
    }

    #[inline]
    pub fn loader(&self) -> &L {
        &self.loader
    }

    #[inline]
    pub fn has_cache(&self) -> bool {
        self.cache.is_some()
    }

    /// Cache to consult, if one is attached and enabled by config.
    #[inline]
    pub(crate) fn active_cache(&self) -> Option<&dyn CacheStore<K, R>> {
        if self.cfg.use_cache {
            self.cache.as_deref()
        } else {
            None
        }
    }

    #[inline]
    pub(crate) fn load(&self, key: &K) -> LoadResult<R> {
        self.memo.load_with(&self.loader, key)
    }

    /// Materialize a key already known to KeyIndex: verified cache hit first,
    /// then the Loader. At most one Loader call.
    pub(crate) fn resolve(&self, key: &K) -> Option<R> {
        if let Some(cache) = self.active_cache() {
            match cache.candidate(key) {
                Some(CacheHit::Valid(rec)) if rec.owner_key() == key => {
                    record_cache_valid();
                    return Some(rec);
                }
                Some(CacheHit::Valid(rec)) => {
                    record_cache_mismatched();
                    debug!(
                        "cache entry {:?} is owned by {:?}, loading instead",
                        key,
                        rec.owner_key()
                    );
                }
                Some(CacheHit::Mismatched) => {
                    record_cache_mismatched();
                    debug!("cache entry {:?} has a foreign owner, loading instead", key);
                }
                Some(CacheHit::Unusable) => {
                    record_cache_unusable();
                    debug!("cache entry {:?} is unusable, loading instead", key);
                }
                None => record_cache_miss(),
            }
        }
        self.load(key).into_option()
    }
}
