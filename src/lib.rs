#![allow(non_snake_case)]

// Базовые типы и контракты коллабораторов
pub mod types;
pub mod keys;    // KeyIndex + SortedKeys
pub mod loader;  // Loader + LoadMemo
pub mod cache;   // CacheStore + MemCache

// Ядро: ленивый отсортированный индекс
pub mod index;   // src/index/{mod,core,lookup,search,entries}.rs

// Окружение
pub mod config;
pub mod consts;
pub mod metrics;

// Файловый бэкенд (run.rec по каталогам) и CLI
pub mod store;   // src/store/{mod,record}.rs
pub mod cli;

// Удобные реэкспорты
pub use cache::{CacheStore, MemCache};
pub use config::{IndexBuilder, IndexConfig};
pub use index::LazySortedIndex;
pub use keys::{KeyIndex, KeyIter, SortedKeys};
pub use loader::{LoadMemo, Loader, MemoPolicy};
pub use store::{FsLoader, RunIndexFs, RunStore};
pub use types::{CacheHit, Direction, EmptyIndex, Keyed, LoadResult, RunRecord};
