//! Content-addressed result cache.
//!
//! Parsed results are keyed by a SHA-256 fingerprint of the raw input
//! bytes, so renaming or moving an unchanged file still hits while any
//! byte edit misses. Entries are MessagePack-encoded, LZ4-compressed, one
//! file per fingerprint, never evicted.

use crate::error::CacheError;
use crate::models::ResultSet;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

/// Entry format version; bumping it invalidates every existing entry.
pub const CACHE_SCHEMA_VERSION: &str = "v1";

/// Block size for streaming input files through the hasher.
const FINGERPRINT_BLOCK_SIZE: usize = 8192;

const ENTRY_EXTENSION: &str = "qlc";

/// Compute the SHA-256 fingerprint of a file's full byte content, as
/// lowercase hex. The file is streamed in fixed-size blocks; identical
/// content yields the same fingerprint regardless of read chunking.
pub fn fingerprint_file(path: &Path) -> std::io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut block = [0u8; FINGERPRINT_BLOCK_SIZE];
    loop {
        let read = file.read(&mut block)?;
        if read == 0 {
            break;
        }
        hasher.update(&block[..read]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// One persisted cache value.
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    schema_version: String,
    fingerprint: String,
    created_at: String,
    results: ResultSet,
}

/// Filesystem-backed fingerprint → [`ResultSet`] store.
#[derive(Debug, Clone)]
pub struct ResultCache {
    dir: PathBuf,
}

impl ResultCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn entry_path(&self, fingerprint: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", fingerprint, ENTRY_EXTENSION))
    }

    /// Look up the ResultSet stored under `fingerprint`.
    ///
    /// An unreadable, corrupt, or schema-mismatched entry is a miss; the
    /// cache can always be rebuilt from the source log, and the next store
    /// overwrites the bad entry.
    pub fn lookup(&self, fingerprint: &str) -> Option<ResultSet> {
        let path = self.entry_path(fingerprint);
        let compressed = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return None,
            Err(err) => {
                log::warn!("Unreadable cache entry {}: {}", path.display(), err);
                return None;
            }
        };

        let entry = match decode_entry(&compressed) {
            Ok(entry) => entry,
            Err(err) => {
                log::warn!("Corrupt cache entry {}: {}", path.display(), err);
                return None;
            }
        };

        if entry.schema_version != CACHE_SCHEMA_VERSION {
            log::warn!(
                "Cache entry {} has schema {}, expected {}; ignoring",
                path.display(),
                entry.schema_version,
                CACHE_SCHEMA_VERSION
            );
            return None;
        }

        Some(entry.results)
    }

    /// Persist `results` under `fingerprint`, returning the same set for
    /// chaining. Writes are idempotent for identical input; concurrent
    /// writers race benignly with last-write-wins.
    pub fn store(&self, fingerprint: &str, results: ResultSet) -> Result<ResultSet, CacheError> {
        let entry = CacheEntry {
            schema_version: CACHE_SCHEMA_VERSION.to_string(),
            fingerprint: fingerprint.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            results,
        };

        let encoded = rmp_serde::to_vec(&entry)?;
        let compressed = lz4_flex::compress_prepend_size(&encoded);

        fs::create_dir_all(&self.dir)?;
        fs::write(self.entry_path(fingerprint), &compressed)?;
        log::info!(
            "Cached {} match(es) under fingerprint {}",
            entry.results.len(),
            fingerprint
        );

        Ok(entry.results)
    }
}

fn decode_entry(compressed: &[u8]) -> Result<CacheEntry, CacheError> {
    let encoded = lz4_flex::decompress_size_prepended(compressed)
        .map_err(|_| CacheError::Decompression)?;
    Ok(rmp_serde::from_slice(&encoded)?)
}
