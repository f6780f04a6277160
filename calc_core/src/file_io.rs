//! # File I/O Module
//!
//! Reads and writes the history file:
//! - **Atomic saves**: write to `.tmp`, sync, rename, so an interrupted save
//!   never leaves a half-written history behind
//! - **Directory creation**: the parent directory is created on save
//! - **Encodings**: text is encoded/decoded with the configured encoding
//!
//! There is no locking; with several processes on one file the last writer
//! wins.
//!
//! ## Example
//!
//! ```rust,no_run
//! use calc_core::file_io::{load_history, save_history};
//! use calc_core::operations::OperationKind;
//! use calc_core::record::HistoryRecord;
//! use rust_decimal::Decimal;
//! use std::path::Path;
//!
//! let records = vec![HistoryRecord::new(
//!     OperationKind::Add,
//!     Decimal::from(1),
//!     Decimal::from(2),
//!     Decimal::from(3),
//! )];
//! let path = Path::new("history/calculator_history.csv");
//!
//! save_history(&records, path, encoding_rs::UTF_8)?;
//! assert_eq!(load_history(path, encoding_rs::UTF_8)?, records);
//! # Ok::<(), calc_core::errors::CalcError>(())
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use encoding_rs::Encoding;
use tracing::{debug, warn};

use crate::codec;
use crate::errors::{CalcError, CalcResult};
use crate::record::HistoryRecord;

/// Save history records to `path` with atomic write semantics.
///
/// The save process:
/// 1. Serialize records to CSV and encode with `encoding`
/// 2. Write to a temporary sibling file (`<path>.tmp`)
/// 3. Sync to disk (fsync)
/// 4. Rename over `path` (atomic on most filesystems)
///
/// The temporary file is removed if any step after its creation fails.
/// Decode-only encodings (UTF-16, replacement) write their output encoding,
/// UTF-8, and [`load_history`] reads them back the same way.
pub fn save_history(
    records: &[HistoryRecord],
    path: &Path,
    encoding: &'static Encoding,
) -> CalcResult<()> {
    let text = codec::serialize(records).map_err(|e| at_path(e, path))?;

    let encoding = encoding.output_encoding();
    let (bytes, _, unmappable) = encoding.encode(&text);
    if unmappable {
        warn!(
            "Some characters could not be represented in {}; they were replaced",
            encoding.name()
        );
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }

    let tmp_path = path.with_extension(match path.extension() {
        Some(ext) => format!("{}.tmp", ext.to_string_lossy()),
        None => "tmp".to_string(),
    });

    let saved = write_synced(&tmp_path, &bytes).and_then(|()| {
        fs::rename(&tmp_path, path).map_err(|e| {
            CalcError::persistence("rename to final", path.display().to_string(), e.to_string())
        })
    });
    if let Err(e) = saved {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    debug!(records = records.len(), path = %path.display(), "history saved");
    Ok(())
}

/// Create `tmp_path`, write `bytes` and fsync. The handle is closed on return.
fn write_synced(tmp_path: &Path, bytes: &[u8]) -> CalcResult<()> {
    let mut tmp_file = File::create(tmp_path).map_err(|e| {
        CalcError::persistence("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(bytes).map_err(|e| {
        CalcError::persistence("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        CalcError::persistence("sync temp file", tmp_path.display().to_string(), e.to_string())
    })
}

/// Load history records from `path`.
///
/// # Returns
///
/// * `Ok(records)` - Records in file order
/// * `Err(CalcError::Persistence)` - I/O failure or malformed content
pub fn load_history(path: &Path, encoding: &'static Encoding) -> CalcResult<Vec<HistoryRecord>> {
    let mut file = File::open(path).map_err(|e| {
        CalcError::persistence("open", path.display().to_string(), e.to_string())
    })?;

    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|e| {
        CalcError::persistence("read", path.display().to_string(), e.to_string())
    })?;

    let encoding = encoding.output_encoding();
    let (text, malformed) = encoding.decode_with_bom_removal(&bytes);
    if malformed {
        return Err(CalcError::persistence(
            "decode",
            path.display().to_string(),
            format!("file is not valid {}", encoding.name()),
        ));
    }

    codec::deserialize(&text).map_err(|e| at_path(e, path))
}

/// Create `dir` (and parents) if it does not exist yet.
pub fn ensure_dir(dir: &Path) -> CalcResult<()> {
    fs::create_dir_all(dir).map_err(|e| {
        CalcError::persistence("create directory", dir.display().to_string(), e.to_string())
    })
}

/// Attach the file path to a codec error raised on in-memory text.
fn at_path(error: CalcError, path: &Path) -> CalcError {
    match error {
        CalcError::Persistence { operation, reason, .. } => {
            CalcError::persistence(operation, path.display().to_string(), reason)
        }
        other => other,
    }
}
