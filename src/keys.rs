//! keys — авторитетный перечень существующих ключей (KeyIndex).
//!
//! Дёшево, без загрузки записей. Все итераторы ленивые и двусторонние
//! (KeyIter), так что диапазон можно обходить в любом направлении.
//!
//! SortedKeys — реализация поверх BTreeSet. Пустые/перевёрнутые диапазоны
//! возвращают пустой итератор (BTreeSet::range на таких паникует).

use std::collections::BTreeSet;
use std::ops::Bound;

use crate::types::EmptyIndex;

/// Lazy key iterator returned by KeyIndex range primitives.
pub type KeyIter<'a, K> = Box<dyn DoubleEndedIterator<Item = K> + 'a>;

/// Authoritative, cheap enumeration of existing keys.
pub trait KeyIndex<K: Ord + Clone> {
    /// All keys, ascending.
    fn keys(&self) -> KeyIter<'_, K>;

    fn first_key(&self) -> Result<K, EmptyIndex>;

    fn last_key(&self) -> Result<K, EmptyIndex>;

    /// Keys >= `key`, ascending.
    fn ceiling_from(&self, key: &K) -> KeyIter<'_, K>;

    /// Keys <= `key`, descending.
    fn floor_from(&self, key: &K) -> KeyIter<'_, K>;

    /// Keys within the bounds, ascending.
    fn keys_in_range(&self, lo: Bound<K>, hi: Bound<K>) -> KeyIter<'_, K>;

    fn contains(&self, key: &K) -> bool {
        self.ceiling_from(key).next().as_ref() == Some(key)
    }
}

/// True if no key can satisfy both bounds.
pub(crate) fn range_is_empty<K: Ord>(lo: &Bound<K>, hi: &Bound<K>) -> bool {
    use Bound::{Excluded, Included, Unbounded};
    match (lo, hi) {
        (Unbounded, _) | (_, Unbounded) => false,
        (Included(a), Included(b)) => a > b,
        (Included(a), Excluded(b)) | (Excluded(a), Included(b)) | (Excluded(a), Excluded(b)) => a >= b,
    }
}

/// In-memory KeyIndex over a BTreeSet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortedKeys<K: Ord> {
    set: BTreeSet<K>,
}

impl<K: Ord + Clone> SortedKeys<K> {
    pub fn new() -> Self {
        Self {
            set: BTreeSet::new(),
        }
    }

    pub fn insert(&mut self, key: K) -> bool {
        self.set.insert(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.set.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

impl<K: Ord + Clone> FromIterator<K> for SortedKeys<K> {
    fn from_iter<T: IntoIterator<Item = K>>(iter: T) -> Self {
        Self {
            set: iter.into_iter().collect(),
        }
    }
}

impl<K: Ord + Clone> KeyIndex<K> for SortedKeys<K> {
    fn keys(&self) -> KeyIter<'_, K> {
        Box::new(self.set.iter().cloned())
    }

    fn first_key(&self) -> Result<K, EmptyIndex> {
        self.set.first().cloned().ok_or(EmptyIndex)
    }

    fn last_key(&self) -> Result<K, EmptyIndex> {
        self.set.last().cloned().ok_or(EmptyIndex)
    }

    fn ceiling_from(&self, key: &K) -> KeyIter<'_, K> {
        Box::new(
            self.set
                .range((Bound::Included(key.clone()), Bound::Unbounded))
                .cloned(),
        )
    }

    fn floor_from(&self, key: &K) -> KeyIter<'_, K> {
        Box::new(
            self.set
                .range((Bound::Unbounded, Bound::Included(key.clone())))
                .rev()
                .cloned(),
        )
    }

    fn keys_in_range(&self, lo: Bound<K>, hi: Bound<K>) -> KeyIter<'_, K> {
        if range_is_empty(&lo, &hi) {
            return Box::new(std::iter::empty());
        }
        Box::new(self.set.range((lo, hi)).cloned())
    }

    fn contains(&self, key: &K) -> bool {
        self.set.contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ops::Bound::{Excluded, Included, Unbounded};

    fn sample() -> SortedKeys<i64> {
        [5, 1, 3, 3].into_iter().collect()
    }

    #[test]
    fn first_last_and_empty() {
        let k = sample();
        assert_eq!(k.len(), 3);
        assert_eq!(k.first_key(), Ok(1));
        assert_eq!(k.last_key(), Ok(5));

        let e: SortedKeys<i64> = SortedKeys::new();
        assert_eq!(e.first_key(), Err(EmptyIndex));
        assert_eq!(e.last_key(), Err(EmptyIndex));
    }

    #[test]
    fn ceiling_and_floor_order() {
        let k = sample();
        assert_eq!(k.ceiling_from(&2).collect::<Vec<_>>(), vec![3, 5]);
        assert_eq!(k.floor_from(&4).collect::<Vec<_>>(), vec![3, 1]);
        assert_eq!(k.ceiling_from(&6).count(), 0);
        assert_eq!(k.floor_from(&0).count(), 0);
    }

    #[test]
    fn ranges_never_panic() {
        let k = sample();
        assert_eq!(
            k.keys_in_range(Included(1), Excluded(5)).collect::<Vec<_>>(),
            vec![1, 3]
        );
        assert_eq!(
            k.keys_in_range(Excluded(1), Included(5)).rev().collect::<Vec<_>>(),
            vec![5, 3]
        );
        assert_eq!(k.keys_in_range(Included(3), Excluded(3)).count(), 0);
        assert_eq!(k.keys_in_range(Excluded(3), Excluded(3)).count(), 0);
        assert_eq!(k.keys_in_range(Included(5), Included(1)).count(), 0);
        assert_eq!(k.keys_in_range(Included(3), Included(3)).count(), 1);
        assert_eq!(k.keys_in_range(Unbounded, Excluded(4)).count(), 2);
    }

    #[test]
    fn contains_default_matches_set() {
        struct Wrapped(SortedKeys<i64>);
        impl KeyIndex<i64> for Wrapped {
            fn keys(&self) -> KeyIter<'_, i64> {
                self.0.keys()
            }
            fn first_key(&self) -> Result<i64, EmptyIndex> {
                self.0.first_key()
            }
            fn last_key(&self) -> Result<i64, EmptyIndex> {
                self.0.last_key()
            }
            fn ceiling_from(&self, key: &i64) -> KeyIter<'_, i64> {
                self.0.ceiling_from(key)
            }
            fn floor_from(&self, key: &i64) -> KeyIter<'_, i64> {
                self.0.floor_from(key)
            }
            fn keys_in_range(&self, lo: Bound<i64>, hi: Bound<i64>) -> KeyIter<'_, i64> {
                self.0.keys_in_range(lo, hi)
            }
        }
        let w = Wrapped(sample());
        for probe in -1..7 {
            assert_eq!(w.contains(&probe), w.0.contains(&probe), "probe {}", probe);
        }
    }
}
