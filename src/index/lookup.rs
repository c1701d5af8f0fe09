//! index/lookup — точечные запросы.
//!
//! - get(key): KeyIndex → проверенный кэш → Loader; любая аномалия = None.
//! - get_dyn(key): безопасная проверка типа (downcast), None/чужой тип = None.
//! - first_key/last_key: единственные операции, отдающие ошибку (EmptyIndex).

use std::any::Any;
use std::fmt;

use crate::keys::KeyIndex;
use crate::loader::Loader;
use crate::types::{EmptyIndex, Keyed};

use super::core::LazySortedIndex;

impl<K, R, I, L> LazySortedIndex<K, R, I, L>
where
    K: Ord + Clone + fmt::Debug + 'static,
    R: Keyed<K> + Clone,
    I: KeyIndex<K>,
    L: Loader<K, R>,
{
    /// Record stored under `key`, or None if the key is unknown or unloadable.
    pub fn get(&self, key: &K) -> Option<R> {
        if !self.keys.contains(key) {
            return None;
        }
        self.resolve(key)
    }

    /// Same as `get` for a caller-supplied key of unknown type.
    pub fn get_dyn(&self, key: Option<&dyn Any>) -> Option<R> {
        let key = key?.downcast_ref::<K>()?;
        self.get(key)
    }

    pub fn first_key(&self) -> Result<K, EmptyIndex> {
        self.keys.first_key()
    }

    pub fn last_key(&self) -> Result<K, EmptyIndex> {
        self.keys.last_key()
    }

    /// KeyIndex membership only; nothing is loaded.
    pub fn contains_key(&self, key: &K) -> bool {
        self.keys.contains(key)
    }

    pub fn keys(&self) -> Vec<K> {
        self.keys.keys().collect()
    }

    pub fn len(&self) -> usize {
        self.keys.keys().count()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.first_key().is_err()
    }
}
