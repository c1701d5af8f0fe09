//! cache — необязательный ускоряющий слой (CacheStore) и его in-memory реализация.
//!
//! Кэш никогда не авторитетен: он может отсутствовать, отставать, быть
//! неполным или повреждённым. Контракт реализации:
//! - candidate(key) -> None (нет записи) | Some(CacheHit);
//! - candidate_in_direction(key, dir) -> ближайший закэшированный ключ в
//!   направлении dir (без обхода KeyIndex) и его CacheHit;
//! - битая запись всегда даёт Unusable, никогда панику/ошибку.
//!
//! MemCache хранит СЫРЫЕ байты (JSON) и декодирует их при каждом обращении,
//! поэтому повреждённые/чужие записи проявляются ровно так же, как в
//! реальном дисковом кэше.

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::ops::Bound;

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::types::{CacheHit, Direction, Keyed};

/// Fast, untrusted source of key -> record candidates.
pub trait CacheStore<K, R> {
    /// Pointwise lookup; None means the key is not cached.
    fn candidate(&self, key: &K) -> Option<CacheHit<R>>;

    /// Nearest cached key satisfying `dir` relative to `key`.
    fn candidate_in_direction(&self, key: &K, dir: Direction) -> Option<(K, CacheHit<R>)>;
}

/// Ordered in-memory cache of raw encoded entries.
#[derive(Debug, Clone)]
pub struct MemCache<K, R> {
    entries: BTreeMap<K, Vec<u8>>,
    _rec: PhantomData<fn() -> R>,
}

impl<K, R> Default for MemCache<K, R>
where
    K: Ord,
{
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            _rec: PhantomData,
        }
    }
}

impl<K, R> MemCache<K, R>
where
    K: Ord + Clone,
    R: Keyed<K> + Serialize + DeserializeOwned,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache `rec` under its own owner key.
    pub fn insert_record(&mut self, rec: &R) -> Result<()> {
        let bytes = serde_json::to_vec(rec)?;
        self.entries.insert(rec.owner_key().clone(), bytes);
        Ok(())
    }

    /// Cache `rec` under an arbitrary key (owner key is not checked here).
    pub fn insert_record_at(&mut self, key: K, rec: &R) -> Result<()> {
        let bytes = serde_json::to_vec(rec)?;
        self.entries.insert(key, bytes);
        Ok(())
    }

    /// Store raw bytes as-is; used to model corrupted entries.
    pub fn insert_raw(&mut self, key: K, bytes: Vec<u8>) {
        self.entries.insert(key, bytes);
    }

    pub fn remove(&mut self, key: &K) -> bool {
        self.entries.remove(key).is_some()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn decode(key: &K, bytes: &[u8]) -> CacheHit<R> {
        match serde_json::from_slice::<R>(bytes) {
            Ok(rec) if rec.owner_key() == key => CacheHit::Valid(rec),
            Ok(_) => CacheHit::Mismatched,
            Err(_) => CacheHit::Unusable,
        }
    }
}

impl<K, R> CacheStore<K, R> for MemCache<K, R>
where
    K: Ord + Clone,
    R: Keyed<K> + Serialize + DeserializeOwned,
{
    fn candidate(&self, key: &K) -> Option<CacheHit<R>> {
        self.entries.get(key).map(|b| Self::decode(key, b))
    }

    fn candidate_in_direction(&self, key: &K, dir: Direction) -> Option<(K, CacheHit<R>)> {
        let found = match dir {
            Direction::Exact => self.entries.get_key_value(key),
            Direction::Asc => self
                .entries
                .range((Bound::Included(key), Bound::Unbounded))
                .next(),
            Direction::Desc => self
                .entries
                .range((Bound::Unbounded, Bound::Included(key)))
                .next_back(),
        };
        found.map(|(k, b)| (k.clone(), Self::decode(k, b)))
    }
}
