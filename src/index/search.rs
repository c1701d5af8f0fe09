//! index/search — поиск по направлению (EXACT / ASC / DESC).
//!
//! Без кэша: идём по KeyIndex от key в нужную сторону, пропуская ключи,
//! которые не загрузились (Unloadable/Absent); первый Present — ответ.
//!
//! С кэшем:
//! 1) candidate_in_direction(key, dir) даёт ближайшую закэшированную границу kc.
//!    Отвергаем её, если запись Unusable/Mismatched, владелец != kc, kc лежит не
//!    с той стороны от key или kc уже нет в KeyIndex. Тогда — полный обход.
//! 2) Gap-scan: кэш может не знать о ключах ближе kc, поэтому проходим ключи
//!    KeyIndex между key (включительно) и kc (исключительно) от key к kc и
//!    грузим их; первый Present — ответ.
//! 3) Промежуток пуст — отдаём уже проверенную запись из кэша в kc.
//!
//! Стоимость gap-scan пропорциональна расстоянию до kc: плотный кэш — рычаг
//! производительности, а не условие корректности. Слишком длинный gap-scan
//! логируется (RI_GAP_WARN_KEYS).

use std::fmt;
use std::ops::Bound;

use log::{debug, warn};

use crate::cache::CacheStore;
use crate::keys::{KeyIndex, KeyIter};
use crate::loader::Loader;
use crate::metrics::{
    record_cache_bound_rejected, record_cache_mismatched, record_cache_unusable,
    record_cache_valid, record_gap_scan, record_uncached_scan,
};
use crate::types::{CacheHit, Direction, Keyed, LoadResult};

use super::core::LazySortedIndex;

impl<K, R, I, L> LazySortedIndex<K, R, I, L>
where
    K: Ord + Clone + fmt::Debug + 'static,
    R: Keyed<K> + Clone,
    I: KeyIndex<K>,
    L: Loader<K, R>,
{
    /// Nearest loadable record to `key` in direction `dir`.
    pub fn search(&self, key: &K, dir: Direction) -> Option<R> {
        if dir == Direction::Exact {
            return self.get(key);
        }

        if let Some(cache) = self.active_cache() {
            if let Some((bound, rec)) = self.verified_bound(cache, key, dir) {
                return self.scan_gap(key, &bound, dir).or(Some(rec));
            }
        }
        self.scan_uncached(key, dir)
    }

    /// Oldest loadable record (None on an empty index).
    pub fn oldest(&self) -> Option<R> {
        let first = self.first_key().ok()?;
        self.search(&first, Direction::Asc)
    }

    /// Newest loadable record (None on an empty index).
    pub fn newest(&self) -> Option<R> {
        let last = self.last_key().ok()?;
        self.search(&last, Direction::Desc)
    }

    fn scan_uncached(&self, key: &K, dir: Direction) -> Option<R> {
        record_uncached_scan();
        let mut walk: KeyIter<'_, K> = match dir {
            Direction::Asc => self.keys.ceiling_from(key),
            Direction::Desc => self.keys.floor_from(key),
            Direction::Exact => return self.get(key),
        };
        walk.find_map(|k| self.load(&k).into_option())
    }

    /// Directional cache candidate that survived every self-consistency check.
    fn verified_bound(
        &self,
        cache: &dyn CacheStore<K, R>,
        key: &K,
        dir: Direction,
    ) -> Option<(K, R)> {
        let (bound, hit) = cache.candidate_in_direction(key, dir)?;
        let rec = match hit {
            CacheHit::Valid(rec) if rec.owner_key() == &bound => rec,
            CacheHit::Valid(_) | CacheHit::Mismatched => {
                record_cache_mismatched();
                debug!("search {:?} {}: cached bound {:?} has a foreign owner", key, dir, bound);
                return None;
            }
            CacheHit::Unusable => {
                record_cache_unusable();
                debug!("search {:?} {}: cached bound {:?} is unusable", key, dir, bound);
                return None;
            }
        };

        if !dir.admits(key, &bound) {
            record_cache_bound_rejected();
            debug!("search {:?} {}: cached bound {:?} is on the wrong side", key, dir, bound);
            return None;
        }
        if !self.keys.contains(&bound) {
            record_cache_bound_rejected();
            debug!("search {:?} {}: cached bound {:?} is stale", key, dir, bound);
            return None;
        }

        record_cache_valid();
        Some((bound, rec))
    }

    /// Load the KeyIndex keys between `key` (inclusive) and `bound` (exclusive),
    /// walking outward from `key`; first Present wins.
    fn scan_gap(&self, key: &K, bound: &K, dir: Direction) -> Option<R> {
        let gap: KeyIter<'_, K> = match dir {
            Direction::Asc => self
                .keys
                .keys_in_range(Bound::Included(key.clone()), Bound::Excluded(bound.clone())),
            Direction::Desc => Box::new(
                self.keys
                    .keys_in_range(Bound::Excluded(bound.clone()), Bound::Included(key.clone()))
                    .rev(),
            ),
            Direction::Exact => return None,
        };

        let mut visited = 0u64;
        let mut found = None;
        for k in gap {
            visited += 1;
            if let LoadResult::Present(rec) = self.load(&k) {
                found = Some(rec);
                break;
            }
        }

        record_gap_scan(visited);
        let limit = self.cfg.gap_warn_keys as u64;
        if limit > 0 && visited > limit {
            warn!(
                "gap-scan {:?} -> {:?} ({}) visited {} keys; cache is sparse here",
                key, bound, dir, visited
            );
        }
        found
    }
}
