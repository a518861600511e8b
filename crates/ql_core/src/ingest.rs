//! Log ingestion: fingerprint, cache consult, single-pass line scan.

use crate::cache::{fingerprint_file, ResultCache};
use crate::classifier::{classify, LogEvent};
use crate::error::{IngestError, Result};
use crate::models::ResultSet;
use crate::tracker::MatchTracker;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

/// Orchestrates one parse pass over a complete, static log file.
pub struct LogIngestor {
    cache: ResultCache,
}

impl LogIngestor {
    pub fn new(cache: ResultCache) -> Self {
        Self { cache }
    }

    /// Parse `path` into per-match statistics.
    ///
    /// On a cache hit the stored ResultSet is returned unchanged: no
    /// re-scan, no cache write. On a miss the file is scanned line by line
    /// in original order and the result is stored under its fingerprint
    /// before being returned. A missing or unresolvable path fails with
    /// [`IngestError::NotFound`]; any mid-scan I/O failure aborts the whole
    /// parse with no partial result.
    pub fn parse(&self, path: &Path) -> Result<ResultSet> {
        let fingerprint = fingerprint_file(path).map_err(|err| not_found_or_io(err, path))?;

        if let Some(results) = self.cache.lookup(&fingerprint) {
            log::debug!("Cache hit for {} ({})", path.display(), fingerprint);
            return Ok(results);
        }

        log::debug!("Cache miss for {}; scanning", path.display());
        let file = File::open(path).map_err(|err| not_found_or_io(err, path))?;
        let results = scan(BufReader::new(file))?;

        Ok(self.cache.store(&fingerprint, results)?)
    }
}

/// Run the classification pass over `reader`, one event per line.
///
/// The final match is left in whatever open/closed state the last relevant
/// event produced; an unterminated match comes back un-deduplicated.
pub fn scan<R: BufRead>(reader: R) -> Result<ResultSet> {
    let mut tracker = MatchTracker::new();
    for line in reader.lines() {
        match classify(&line?) {
            LogEvent::MatchStart => tracker.on_start(),
            LogEvent::MatchEnd => tracker.on_end(),
            LogEvent::PlayerJoined(name) => tracker.on_player_joined(&name),
            LogEvent::Kill { killer, victim } => tracker.on_kill(&killer, &victim),
            LogEvent::Ignored => {}
        }
    }
    Ok(tracker.into_results())
}

fn not_found_or_io(err: std::io::Error, path: &Path) -> IngestError {
    match err.kind() {
        ErrorKind::NotFound => IngestError::NotFound {
            path: path.display().to_string(),
        },
        _ => IngestError::Io(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_scan_dispatches_each_event_kind() {
        let log = concat!(
            "  0:00 InitGame: \\sv_floodProtect\\1\\sv_maxPing\\0\n",
            " 20:38 ClientUserinfoChanged: 2 n\\Isgalamido\\t\\0\\model\\uriel/zael\\t\\0\n",
            " 20:54 Kill: 1022 2 22: <world> killed Isgalamido by MOD_TRIGGER_HURT\n",
            " 20:55 some unrelated chatter\n",
            " 21:00 ShutdownGame:\n",
        );

        let results = scan(Cursor::new(log)).unwrap();
        assert_eq!(results.len(), 1);

        let stats = results.get("game_1").unwrap();
        assert_eq!(stats.total_kills, 1);
        assert_eq!(stats.players, vec!["Isgalamido"]);
        assert_eq!(stats.kills.get("Isgalamido"), Some(&-1));
    }

    #[test]
    fn test_scan_of_empty_input_is_empty() {
        let results = scan(Cursor::new("")).unwrap();
        assert!(results.is_empty());
    }
}
