//! Leaderboard stores shared by the HTTP handlers
//!
//! The compare-and-set in `submit` runs under one write lock, so concurrent
//! submissions for the same player can never lose the higher score.

use std::path::PathBuf;
use std::sync::RwLock;

use super::{Leaderboard, LeaderboardEntry, SubmitOutcome};
use crate::Result;
use crate::persistence;

/// Backing table for the leaderboard service.
///
/// Calls may block on file I/O; async callers run them on the blocking pool.
pub trait LeaderboardStore: Send + Sync + 'static {
    /// Top `limit` entries by score descending
    fn top(&self, limit: usize) -> Result<Vec<LeaderboardEntry>>;

    /// Store the entry iff it beats the player's current best
    fn submit(&self, entry: LeaderboardEntry) -> Result<SubmitOutcome>;
}

/// Volatile store (lost on restart)
#[derive(Debug, Default)]
pub struct MemoryStore {
    table: RwLock<Leaderboard>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LeaderboardStore for MemoryStore {
    fn top(&self, limit: usize) -> Result<Vec<LeaderboardEntry>> {
        Ok(self.table.read()?.top(limit))
    }

    fn submit(&self, entry: LeaderboardEntry) -> Result<SubmitOutcome> {
        let stored = self.table.write()?.submit(entry);
        Ok(SubmitOutcome::stored(stored))
    }
}

/// Store persisted to a JSON file, rewritten on every new high score
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    table: RwLock<Leaderboard>,
}

impl FileStore {
    /// Open (or create) the store at `path`
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let table = persistence::load(&path)?;
        log::info!("Loaded {} leaderboard entries from {}", table.len(), path.display());
        Ok(Self {
            path,
            table: RwLock::new(table),
        })
    }
}

impl LeaderboardStore for FileStore {
    fn top(&self, limit: usize) -> Result<Vec<LeaderboardEntry>> {
        Ok(self.table.read()?.top(limit))
    }

    fn submit(&self, entry: LeaderboardEntry) -> Result<SubmitOutcome> {
        let mut table = self.table.write()?;
        let fid = entry.fid;
        let score = entry.score;

        if !table.qualifies(fid, score) {
            return Ok(SubmitOutcome::stored(false));
        }

        // Persist a candidate first so a failed write leaves memory untouched
        let mut candidate = table.clone();
        candidate.submit(entry);
        persistence::save(&self.path, &candidate)?;
        *table = candidate;
        log::info!("New high score {score} for fid {fid}");
        Ok(SubmitOutcome::stored(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(fid: u64, score: u64) -> LeaderboardEntry {
        LeaderboardEntry {
            fid,
            username: format!("user{fid}"),
            score,
            pfp_url: None,
        }
    }

    #[test]
    fn test_memory_store_conditional_upsert() {
        let store = MemoryStore::new();
        assert!(store.submit(entry(1, 5)).unwrap().new_high_score);
        assert!(!store.submit(entry(1, 2)).unwrap().new_high_score);
        assert_eq!(store.top(10).unwrap()[0].score, 5);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.json");
        {
            let store = FileStore::open(&path).unwrap();
            store.submit(entry(1, 5)).unwrap();
            store.submit(entry(2, 9)).unwrap();
            store.submit(entry(1, 3)).unwrap();
        }
        let store = FileStore::open(&path).unwrap();
        let top = store.top(10).unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!((top[0].fid, top[0].score), (2, 9));
        assert_eq!((top[1].fid, top[1].score), (1, 5));
    }

    #[test]
    fn test_file_store_skips_write_when_not_a_high_score() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.json");
        let store = FileStore::open(&path).unwrap();
        store.submit(entry(1, 5)).unwrap();
        let saved = std::fs::read(&path).unwrap();

        assert!(!store.submit(entry(1, 5)).unwrap().new_high_score);
        assert!(!store.submit(entry(1, 2)).unwrap().new_high_score);

        // A rewrite would have rotated the first save into the backup
        assert!(!persistence::backup_path(&path).exists());
        assert_eq!(std::fs::read(&path).unwrap(), saved);
    }

    #[test]
    fn test_concurrent_submissions_keep_max() {
        use std::sync::Arc;

        let store = Arc::new(MemoryStore::new());
        let handles: Vec<_> = (0..8u64)
            .map(|t| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for s in 0..100 {
                        store.submit(entry(1, s * 8 + t)).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(store.top(1).unwrap()[0].score, 99 * 8 + 7);
    }
}
