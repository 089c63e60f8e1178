//! Player identity for score submission
//!
//! The host shell hands the player's platform identity to the page as query
//! parameters (`?fid=..&username=..&pfp=..`).

use serde::{Deserialize, Serialize};

use crate::leaderboard::ScoreSubmission;

/// Username shown when the host gives none
pub const DEFAULT_USERNAME: &str = "Warplet";

/// Identity of the local player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub fid: u64,
    pub username: String,
    pub pfp_url: String,
}

impl PlayerProfile {
    /// Parse from a URL query string (with or without the leading `?`).
    /// Returns None without a usable fid.
    pub fn from_query(query: &str) -> Option<Self> {
        let mut fid = None;
        let mut username = None;
        let mut pfp_url = None;

        for pair in query.trim_start_matches('?').split('&') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let value = percent_decode(value);
            match key {
                "fid" => fid = value.parse::<u64>().ok().filter(|&f| f != 0),
                "username" if !value.is_empty() => username = Some(value),
                "pfp" | "pfpUrl" => pfp_url = Some(value),
                _ => {}
            }
        }

        Some(Self {
            fid: fid?,
            username: username.unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
            pfp_url: pfp_url.unwrap_or_default(),
        })
    }

    /// Build the submission for a finished run
    pub fn submission(&self, score: u32) -> ScoreSubmission {
        ScoreSubmission {
            fid: Some(self.fid),
            username: Some(self.username.clone()),
            score: Some(u64::from(score)),
            pfp_url: Some(self.pfp_url.clone()),
        }
    }
}

/// Decode `%XX` escapes and `+` as space; invalid escapes pass through
fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len() => {
                match (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        out.push(hi << 4 | lo);
                        i += 3;
                        continue;
                    }
                    _ => out.push(b'%'),
                }
            }
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(b: u8) -> Option<u8> {
    (b as char).to_digit(16).map(|d| d as u8)
}
