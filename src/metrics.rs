//! Lightweight global metrics for RunIndex.
//!
//! Потокобезопасные атомарные счётчики для подсистем:
//! - Loader (вызовы, неудачные загрузки, попадания в memo)
//! - Cache (Valid / Unusable / Mismatched / miss, отвергнутые направленные кандидаты)
//! - Search (gap-scan, полный обход без кэша)

use std::sync::atomic::{AtomicU64, Ordering};

// ----- Loader -----
static LOADER_CALLS: AtomicU64 = AtomicU64::new(0);
static LOADER_UNLOADABLE: AtomicU64 = AtomicU64::new(0);
static MEMO_HITS: AtomicU64 = AtomicU64::new(0);

// ----- Cache -----
static CACHE_VALID: AtomicU64 = AtomicU64::new(0);
static CACHE_UNUSABLE: AtomicU64 = AtomicU64::new(0);
static CACHE_MISMATCHED: AtomicU64 = AtomicU64::new(0);
static CACHE_MISSES: AtomicU64 = AtomicU64::new(0);
static CACHE_BOUNDS_REJECTED: AtomicU64 = AtomicU64::new(0);

// ----- Search -----
static GAP_SCANS: AtomicU64 = AtomicU64::new(0);
static GAP_SCAN_KEYS: AtomicU64 = AtomicU64::new(0);
static UNCACHED_SCANS: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    // Loader
    pub loader_calls: u64,
    pub loader_unloadable: u64,
    pub memo_hits: u64,

    // Cache
    pub cache_valid: u64,
    pub cache_unusable: u64,
    pub cache_mismatched: u64,
    pub cache_misses: u64,
    pub cache_bounds_rejected: u64,

    // Search
    pub gap_scans: u64,
    pub gap_scan_keys: u64,
    pub uncached_scans: u64,
}

impl MetricsSnapshot {
    pub fn cache_hit_ratio(&self) -> f64 {
        let total = self.cache_valid + self.cache_unusable + self.cache_mismatched + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_valid as f64 / total as f64
        }
    }

    pub fn avg_gap_scan_keys(&self) -> f64 {
        if self.gap_scans == 0 {
            0.0
        } else {
            self.gap_scan_keys as f64 / self.gap_scans as f64
        }
    }
}

// ----- Recorders (Loader) -----
pub fn record_load(unloadable: bool) {
    LOADER_CALLS.fetch_add(1, Ordering::Relaxed);
    if unloadable {
        LOADER_UNLOADABLE.fetch_add(1, Ordering::Relaxed);
    }
}

pub fn record_memo_hit() {
    MEMO_HITS.fetch_add(1, Ordering::Relaxed);
}

// ----- Recorders (Cache) -----
pub fn record_cache_valid() {
    CACHE_VALID.fetch_add(1, Ordering::Relaxed);
}
pub fn record_cache_unusable() {
    CACHE_UNUSABLE.fetch_add(1, Ordering::Relaxed);
}
pub fn record_cache_mismatched() {
    CACHE_MISMATCHED.fetch_add(1, Ordering::Relaxed);
}
pub fn record_cache_miss() {
    CACHE_MISSES.fetch_add(1, Ordering::Relaxed);
}
pub fn record_cache_bound_rejected() {
    CACHE_BOUNDS_REJECTED.fetch_add(1, Ordering::Relaxed);
}

// ----- Recorders (Search) -----
pub fn record_gap_scan(keys_visited: u64) {
    GAP_SCANS.fetch_add(1, Ordering::Relaxed);
    GAP_SCAN_KEYS.fetch_add(keys_visited, Ordering::Relaxed);
}

pub fn record_uncached_scan() {
    UNCACHED_SCANS.fetch_add(1, Ordering::Relaxed);
}

// ----- Snapshot / Reset -----
pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        loader_calls: LOADER_CALLS.load(Ordering::Relaxed),
        loader_unloadable: LOADER_UNLOADABLE.load(Ordering::Relaxed),
        memo_hits: MEMO_HITS.load(Ordering::Relaxed),

        cache_valid: CACHE_VALID.load(Ordering::Relaxed),
        cache_unusable: CACHE_UNUSABLE.load(Ordering::Relaxed),
        cache_mismatched: CACHE_MISMATCHED.load(Ordering::Relaxed),
        cache_misses: CACHE_MISSES.load(Ordering::Relaxed),
        cache_bounds_rejected: CACHE_BOUNDS_REJECTED.load(Ordering::Relaxed),

        gap_scans: GAP_SCANS.load(Ordering::Relaxed),
        gap_scan_keys: GAP_SCAN_KEYS.load(Ordering::Relaxed),
        uncached_scans: UNCACHED_SCANS.load(Ordering::Relaxed),
    }
}

pub fn reset() {
    LOADER_CALLS.store(0, Ordering::Relaxed);
    LOADER_UNLOADABLE.store(0, Ordering::Relaxed);
    MEMO_HITS.store(0, Ordering::Relaxed);

    CACHE_VALID.store(0, Ordering::Relaxed);
    CACHE_UNUSABLE.store(0, Ordering::Relaxed);
    CACHE_MISMATCHED.store(0, Ordering::Relaxed);
    CACHE_MISSES.store(0, Ordering::Relaxed);
    CACHE_BOUNDS_REJECTED.store(0, Ordering::Relaxed);

    GAP_SCANS.store(0, Ordering::Relaxed);
    GAP_SCAN_KEYS.store(0, Ordering::Relaxed);
    UNCACHED_SCANS.store(0, Ordering::Relaxed);
}
