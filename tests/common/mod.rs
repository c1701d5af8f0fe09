// Общий стенд для тестов индекса: in-memory KeyIndex, считающий Loader и MemCache.
//
// FakeMapBuilder повторяет сценарии "реальные данные / кэш / оба / битый кэш":
// - add(k, v)                 — авторитетная запись k -> v
// - add_unloadable(k)         — ключ известен KeyIndex, но не загружается
// - add_both(k, v)            — запись + корректная запись в кэше
// - add_unloadable_cache(k)   — в кэше мусор под ключом k
// - add_bogus_cache(k, o, v)  — запись o -> v, а в кэше под ключом k лежит запись o
// - add_cache_only(k, v)      — устаревший кэш: записи нет в KeyIndex

#![allow(dead_code)]

use std::cell::Cell;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use RunIndex::{
    IndexConfig, LazySortedIndex, LoadResult, Loader, MemCache, RunRecord, SortedKeys,
};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

pub fn unique_root(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    let base = std::env::temp_dir();
    base.join(format!("ritest-{prefix}-{pid}-{t}-{id}"))
}

/// Loader over a fixed table; None in the table means "known but unloadable".
pub struct FakeLoader {
    records: BTreeMap<u64, Option<RunRecord>>,
    calls: Cell<u64>,
    per_key: std::cell::RefCell<BTreeMap<u64, u64>>,
}

impl FakeLoader {
    pub fn calls(&self) -> u64 {
        self.calls.get()
    }

    pub fn calls_for(&self, key: u64) -> u64 {
        self.per_key.borrow().get(&key).copied().unwrap_or(0)
    }
}

impl Loader<u64, RunRecord> for FakeLoader {
    fn load(&self, key: &u64) -> LoadResult<RunRecord> {
        self.calls.set(self.calls.get() + 1);
        *self.per_key.borrow_mut().entry(*key).or_insert(0) += 1;
        match self.records.get(key) {
            Some(Some(rec)) => LoadResult::Present(rec.clone()),
            Some(None) => LoadResult::Unloadable,
            None => LoadResult::Absent,
        }
    }
}

pub type FakeMap = LazySortedIndex<u64, RunRecord, SortedKeys<u64>, FakeLoader>;

#[derive(Clone, Default)]
pub struct FakeMapBuilder {
    keys: BTreeSet<u64>,
    records: BTreeMap<u64, Option<RunRecord>>,
    cache: MemCache<u64, RunRecord>,
    cfg: Option<IndexConfig>,
}

impl FakeMapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, k: u64, v: &str) -> Self {
        self.keys.insert(k);
        self.records.insert(k, Some(RunRecord::new(k, v)));
        self
    }

    pub fn add_unloadable(mut self, k: u64) -> Self {
        self.keys.insert(k);
        self.records.insert(k, None);
        self
    }

    pub fn add_both(self, k: u64, v: &str) -> Self {
        let mut me = self.add(k, v);
        me.cache
            .insert_record(&RunRecord::new(k, v))
            .expect("cache insert");
        me
    }

    pub fn add_unloadable_cache(mut self, k: u64) -> Self {
        self.cache.insert_raw(k, b"\x00\x01 definitely not a run".to_vec());
        self
    }

    pub fn add_bogus_cache(self, cache_key: u64, owner: u64, v: &str) -> Self {
        let mut me = self.add(owner, v);
        me.cache
            .insert_record_at(cache_key, &RunRecord::new(owner, v))
            .expect("cache insert");
        me
    }

    /// Valid cache entry for a key the KeyIndex does not know (stale cache).
    pub fn add_cache_only(mut self, k: u64, v: &str) -> Self {
        self.cache
            .insert_record(&RunRecord::new(k, v))
            .expect("cache insert");
        self
    }

    pub fn config(mut self, cfg: IndexConfig) -> Self {
        self.cfg = Some(cfg);
        self
    }

    fn loader(&self) -> FakeLoader {
        FakeLoader {
            records: self.records.clone(),
            calls: Cell::new(0),
            per_key: Default::default(),
        }
    }

    fn key_index(&self) -> SortedKeys<u64> {
        self.keys.iter().copied().collect()
    }

    /// Fresh index with the cache attached.
    pub fn make(&self) -> FakeMap {
        self.make_uncached().with_cache(self.cache.clone())
    }

    /// Fresh index with no cache at all.
    pub fn make_uncached(&self) -> FakeMap {
        let cfg = self.cfg.clone().unwrap_or_default();
        LazySortedIndex::with_config(self.key_index(), self.loader(), cfg)
    }
}

#[track_caller]
pub fn assert_run(got: Option<RunRecord>, number: u64, value: &str) {
    let rec = got.unwrap_or_else(|| panic!("expected run #{number} = {value}, got none"));
    assert_eq!(rec.number, number, "owner key");
    assert_eq!(rec.value, value, "value of run #{number}");
}
