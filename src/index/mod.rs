//! index — ленивый отсортированный индекс (LazySortedIndex).
//!
//! Разделение по подмодулям:
//! - core.rs    — структура, конструкторы, общий путь разрешения ключа (кэш → Loader)
//! - lookup.rs  — get / get_dyn / first_key / last_key / contains_key / len
//! - search.rs  — search(EXACT|ASC|DESC): полный обход и ускорение через кэш с gap-scan
//! - entries.rs — entries / entries_in_range: жадная материализация
//!
//! Инвариант: состояние кэша (пустой, полный, битый, чужие записи) никогда
//! не меняет результат запроса — только стоимость.

pub mod core;
pub mod entries;
pub mod lookup;
pub mod search;

pub use self::core::LazySortedIndex;
