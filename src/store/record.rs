//! store/record — бинарная обёртка файла записи прогона.
//!
//! Формат <root>/<number>/run.rec (LE):
//! MAGIC8 = "RIRUN001"
//! u32 version   = 1
//! u32 body_len
//! u32 crc32     (crc32fast по телу)
//! body          = JSON RunRecord
//!
//! decode отвергает плохой magic/версию/длину/CRC/JSON — для Loader'а всё это
//! одинаково означает Unloadable.

use anyhow::{anyhow, Context, Result};
use byteorder::{ByteOrder, LittleEndian};
use crc32fast::Hasher as Crc32;

use crate::consts::{RECORD_HDR_SIZE, RECORD_MAGIC, RECORD_MAX_BODY, RECORD_VERSION};
use crate::types::RunRecord;

#[inline]
fn body_crc(body: &[u8]) -> u32 {
    let mut h = Crc32::new();
    h.update(body);
    h.finalize()
}

/// Serialize a record into the on-disk frame.
pub fn encode_record(rec: &RunRecord) -> Result<Vec<u8>> {
    let body = serde_json::to_vec(rec).context("serialize run record")?;
    if body.len() > RECORD_MAX_BODY {
        return Err(anyhow!("run record body too large: {} B", body.len()));
    }

    let mut out = vec![0u8; RECORD_HDR_SIZE];
    out[0..8].copy_from_slice(RECORD_MAGIC);
    LittleEndian::write_u32(&mut out[8..12], RECORD_VERSION);
    LittleEndian::write_u32(&mut out[12..16], body.len() as u32);
    LittleEndian::write_u32(&mut out[16..20], body_crc(&body));
    out.extend_from_slice(&body);
    Ok(out)
}

/// Parse and verify an on-disk frame.
pub fn decode_record(buf: &[u8]) -> Result<RunRecord> {
    if buf.len() < RECORD_HDR_SIZE {
        return Err(anyhow!("run record too short: {} B", buf.len()));
    }
    if &buf[0..8] != RECORD_MAGIC {
        return Err(anyhow!("bad run record magic"));
    }
    let version = LittleEndian::read_u32(&buf[8..12]);
    if version != RECORD_VERSION {
        return Err(anyhow!("unsupported run record version {}", version));
    }
    let body_len = LittleEndian::read_u32(&buf[12..16]) as usize;
    if body_len > RECORD_MAX_BODY || RECORD_HDR_SIZE + body_len != buf.len() {
        return Err(anyhow!(
            "run record length mismatch (header={}, actual={})",
            body_len,
            buf.len() - RECORD_HDR_SIZE
        ));
    }
    let body = &buf[RECORD_HDR_SIZE..];
    let stored = LittleEndian::read_u32(&buf[16..20]);
    let calc = body_crc(body);
    if stored != calc {
        return Err(anyhow!(
            "run record CRC mismatch (stored={}, calc={})",
            stored,
            calc
        ));
    }
    serde_json::from_slice(body).context("parse run record body")
}
