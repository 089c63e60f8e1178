//! Leaderboard persistence with integrity verification
//!
//! Features:
//! - Versioned JSON envelope
//! - BLAKE3 integrity digest over the entry payload
//! - Backup rotation (tmp → save, old save → backup)
//! - Corruption detection and recovery from the backup

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::leaderboard::{Leaderboard, LeaderboardEntry};
use crate::{Error, Result};

/// Current envelope format version
pub const FORMAT_VERSION: u32 = 1;

/// On-disk wrapper around the leaderboard rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub version: u32,
    /// Hex BLAKE3 digest of the serialized `entries`
    pub digest: String,
    pub entries: Vec<LeaderboardEntry>,
}

impl Envelope {
    pub fn new(entries: Vec<LeaderboardEntry>) -> Result<Self> {
        let digest = digest_of(&entries)?;
        Ok(Self {
            version: FORMAT_VERSION,
            digest,
            entries,
        })
    }

    /// Check version and digest
    pub fn validate(&self) -> Result<()> {
        if self.version != FORMAT_VERSION {
            return Err(Error::Corrupt(format!(
                "unsupported format version {}",
                self.version
            )));
        }
        let expected = digest_of(&self.entries)?;
        if expected != self.digest {
            return Err(Error::Corrupt("digest mismatch".into()));
        }
        Ok(())
    }
}

fn digest_of(entries: &[LeaderboardEntry]) -> Result<String> {
    let payload = serde_json::to_vec(entries)?;
    Ok(blake3::hash(&payload).to_hex().to_string())
}

fn sibling(path: &Path, ext: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(ext);
    PathBuf::from(name)
}

/// Path of the backup copy kept next to `path`
pub fn backup_path(path: &Path) -> PathBuf {
    sibling(path, ".bak")
}

fn read_envelope(path: &Path) -> Result<Leaderboard> {
    let json = fs::read(path)?;
    let envelope: Envelope = serde_json::from_slice(&json)?;
    envelope.validate()?;
    Ok(Leaderboard::from_entries(envelope.entries))
}

/// Load the leaderboard, falling back to the backup and then to empty.
///
/// A missing file is a fresh start, not an error.
pub fn load(path: &Path) -> Result<Leaderboard> {
    if !path.exists() {
        log::info!("No leaderboard at {}, starting fresh", path.display());
        return Ok(Leaderboard::new());
    }

    match read_envelope(path) {
        Ok(board) => Ok(board),
        Err(e) => {
            log::warn!("Leaderboard {} unreadable: {e}", path.display());
            let backup = backup_path(path);
            match read_envelope(&backup) {
                Ok(board) => {
                    log::warn!("Recovered {} entries from {}", board.len(), backup.display());
                    Ok(board)
                }
                Err(e) => {
                    log::warn!("Backup {} unusable ({e}), starting fresh", backup.display());
                    Ok(Leaderboard::new())
                }
            }
        }
    }
}

/// Atomically write the leaderboard: tmp → save, previous save → backup
pub fn save(path: &Path, board: &Leaderboard) -> Result<()> {
    let envelope = Envelope::new(board.entries())?;
    let json = serde_json::to_vec_pretty(&envelope)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp = sibling(path, ".tmp");
    fs::write(&tmp, json)?;
    if path.exists() {
        fs::copy(path, backup_path(path))?;
    }
    fs::rename(&tmp, path)?;
    log::debug!("Leaderboard saved ({} entries)", board.len());
    Ok(())
}
