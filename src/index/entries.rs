//! index/entries — жадная материализация пар (ключ, запись).
//!
//! Все записи грузятся в момент вызова, а не при обращении к элементу.
//! Ключи, которые не загрузились, в результат не попадают.

use std::fmt;
use std::ops::Bound;

use crate::keys::KeyIndex;
use crate::loader::Loader;
use crate::types::Keyed;

use super::core::LazySortedIndex;

impl<K, R, I, L> LazySortedIndex<K, R, I, L>
where
    K: Ord + Clone + fmt::Debug + 'static,
    R: Keyed<K> + Clone,
    I: KeyIndex<K>,
    L: Loader<K, R>,
{
    /// Fully realized ascending snapshot of every loadable record.
    pub fn entries(&self) -> Vec<(K, R)> {
        self.materialize(self.keys.keys())
    }

    /// Same as `entries`, restricted to keys in `[lo, hi]`.
    pub fn entries_in_range(&self, lo: &K, hi: &K) -> Vec<(K, R)> {
        self.materialize(
            self.keys
                .keys_in_range(Bound::Included(lo.clone()), Bound::Included(hi.clone())),
        )
    }

    fn materialize(&self, keys: impl Iterator<Item = K>) -> Vec<(K, R)> {
        keys.filter_map(|k| {
            let rec = self.resolve(&k)?;
            Some((k, rec))
        })
        .collect()
    }
}
