//! store — файловый бэкенд прогонов: KeyIndex по каталогу и Loader по файлам.
//!
//! Раскладка: <root>/<number>/run.rec (number — u64 в десятичной записи).
//! - key_index(): сканирует root; ключ — каталог, имя которого парсится как u64.
//!   Прочие записи (файлы, симлинки вида "lastSuccessful", мусор) игнорируются.
//! - loader(): FsLoader. Нет каталога → Absent; не читается, битый файл или
//!   номер внутри != номеру каталога → Unloadable.
//! - put(): запись-фикстура через tmp+rename. Это не часть ядра: индекс
//!   только читает.

pub mod record;

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use log::debug;

use crate::config::IndexConfig;
use crate::consts::{RECORD_FILE, TMP_SUFFIX};
use crate::index::LazySortedIndex;
use crate::keys::SortedKeys;
use crate::loader::Loader;
use crate::types::{LoadResult, RunRecord};

pub use record::{decode_record, encode_record};

/// Index assembled from a RunStore.
pub type RunIndexFs = LazySortedIndex<u64, RunRecord, SortedKeys<u64>, FsLoader>;

#[derive(Debug, Clone)]
pub struct RunStore {
    root: PathBuf,
}

impl RunStore {
    /// Create the root directory (if missing) and open it.
    pub fn create(root: &Path) -> Result<Self> {
        fs::create_dir_all(root).with_context(|| format!("create run store {}", root.display()))?;
        Self::open(root)
    }

    pub fn open(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(anyhow!("run store root {} is not a directory", root.display()));
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[inline]
    pub fn run_dir(&self, number: u64) -> PathBuf {
        self.root.join(number.to_string())
    }

    #[inline]
    pub fn record_path(&self, number: u64) -> PathBuf {
        self.run_dir(number).join(RECORD_FILE)
    }

    /// Discover existing run numbers from the directory layout.
    pub fn key_index(&self) -> Result<SortedKeys<u64>> {
        let mut keys = SortedKeys::new();
        let rd = fs::read_dir(&self.root)
            .with_context(|| format!("read run store {}", self.root.display()))?;
        for ent in rd {
            let ent = ent?;
            let name = ent.file_name();
            // только каноническая запись: "007" не то же самое, что каталог "7"
            let Some(number) = name
                .to_str()
                .and_then(|s| s.parse::<u64>().ok().filter(|n| n.to_string() == s))
            else {
                continue;
            };
            // file_type() не идёт по симлинкам: ярлыки на каталоги прогонов ключами не считаем
            let ft = ent.file_type()?;
            if ft.is_dir() {
                keys.insert(number);
            }
        }
        Ok(keys)
    }

    pub fn loader(&self) -> FsLoader {
        FsLoader {
            store: self.clone(),
        }
    }

    /// Atomically write `rec` into its run directory.
    pub fn put(&self, rec: &RunRecord) -> Result<()> {
        let dir = self.run_dir(rec.number);
        fs::create_dir_all(&dir).with_context(|| format!("create run dir {}", dir.display()))?;

        let path = dir.join(RECORD_FILE);
        let tmp = dir.join(format!("{}{}", RECORD_FILE, TMP_SUFFIX));
        let _ = fs::remove_file(&tmp); // best‑effort

        let bytes = encode_record(rec)?;
        let mut f = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp)
            .with_context(|| format!("open record tmp {}", tmp.display()))?;
        f.write_all(&bytes)?;
        f.sync_all()?;

        fs::rename(&tmp, &path)
            .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
        Ok(())
    }

    /// Assemble a cache-less index over the current directory state.
    pub fn open_index(&self, cfg: IndexConfig) -> Result<RunIndexFs> {
        let keys = self.key_index()?;
        debug!(
            "run store {}: {} keys, {}",
            self.root.display(),
            keys.len(),
            cfg
        );
        Ok(LazySortedIndex::with_config(keys, self.loader(), cfg))
    }
}

/// Loader reading `<root>/<number>/run.rec`.
#[derive(Debug, Clone)]
pub struct FsLoader {
    store: RunStore,
}

impl FsLoader {
    fn try_load(&self, number: u64) -> Result<RunRecord> {
        let path = self.store.record_path(number);
        let buf = fs::read(&path).with_context(|| format!("read {}", path.display()))?;
        let rec = decode_record(&buf).with_context(|| format!("decode {}", path.display()))?;
        if rec.number != number {
            return Err(anyhow!(
                "{} claims run {}, expected {}",
                path.display(),
                rec.number,
                number
            ));
        }
        Ok(rec)
    }
}

impl Loader<u64, RunRecord> for FsLoader {
    fn load(&self, key: &u64) -> LoadResult<RunRecord> {
        if !self.store.run_dir(*key).is_dir() {
            return LoadResult::Absent;
        }
        match self.try_load(*key) {
            Ok(rec) => LoadResult::Present(rec),
            Err(e) => {
                debug!("run {} is unloadable: {:#}", key, e);
                LoadResult::Unloadable
            }
        }
    }
}
