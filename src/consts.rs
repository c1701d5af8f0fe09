//! Общие константы формата хранилища прогонов (run store).

// -------- Layout --------
// <root>/<number>/run.rec
pub const RECORD_FILE: &str = "run.rec";
pub const TMP_SUFFIX: &str = ".tmp";

// -------- Record file --------
pub const RECORD_MAGIC: &[u8; 8] = b"RIRUN001";
pub const RECORD_VERSION: u32 = 1;
pub const RECORD_HDR_SIZE: usize = 20; // [magic8][ver u32][body_len u32][crc32 u32]

// Верхняя граница тела записи; всё, что больше, считаем повреждением.
pub const RECORD_MAX_BODY: usize = 64 * 1024 * 1024;
