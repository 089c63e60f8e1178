//! High score leaderboard
//!
//! One personal best per player id. A score is stored only when it beats the
//! player's previous best; no history is kept.

#[cfg(not(target_arch = "wasm32"))]
mod store;

#[cfg(not(target_arch = "wasm32"))]
pub use store::{FileStore, LeaderboardStore, MemoryStore};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Maximum number of entries a leaderboard read returns
pub const LEADERBOARD_LIMIT: usize = 50;

/// A player's personal best
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Platform user id (unique key)
    pub fid: u64,
    pub username: String,
    pub score: u64,
    /// Avatar URL
    #[serde(default)]
    pub pfp_url: Option<String>,
}

/// Score submission as sent by the client
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    #[serde(default)]
    pub fid: Option<u64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub score: Option<u64>,
    #[serde(default)]
    pub pfp_url: Option<String>,
}

impl ScoreSubmission {
    /// Validate into a table entry; fid 0 counts as missing
    pub fn into_entry(self) -> crate::Result<LeaderboardEntry> {
        let (Some(fid), Some(score)) = (self.fid.filter(|&f| f != 0), self.score) else {
            return Err(crate::Error::MissingData);
        };
        Ok(LeaderboardEntry {
            fid,
            username: self.username.unwrap_or_default(),
            score,
            pfp_url: self.pfp_url.filter(|u| !u.is_empty()),
        })
    }
}

/// Response to a score submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOutcome {
    pub success: bool,
    pub new_high_score: bool,
}

impl SubmitOutcome {
    pub fn stored(new_high_score: bool) -> Self {
        Self {
            success: true,
            new_high_score,
        }
    }
}

/// In-memory personal-best table
#[derive(Debug, Clone, Default)]
pub struct Leaderboard {
    entries: HashMap<u64, LeaderboardEntry>,
}

impl Leaderboard {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from stored rows, keeping the best row per fid
    pub fn from_entries(entries: impl IntoIterator<Item = LeaderboardEntry>) -> Self {
        let mut board = Self::new();
        for entry in entries {
            board.submit(entry);
        }
        board
    }

    /// Whether a score would replace the stored best for `fid`
    pub fn qualifies(&self, fid: u64, score: u64) -> bool {
        self.entries.get(&fid).is_none_or(|e| score > e.score)
    }

    /// Store the entry iff it is the player's first or a strictly higher score.
    /// Returns whether it was stored.
    pub fn submit(&mut self, entry: LeaderboardEntry) -> bool {
        if !self.qualifies(entry.fid, entry.score) {
            return false;
        }
        self.entries.insert(entry.fid, entry);
        true
    }

    /// Stored best for a player
    pub fn get(&self, fid: u64) -> Option<&LeaderboardEntry> {
        self.entries.get(&fid)
    }

    /// Top `limit` entries by score descending (ties by fid ascending)
    pub fn top(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let mut rows: Vec<&LeaderboardEntry> = self.entries.values().collect();
        rows.sort_by(|a, b| b.score.cmp(&a.score).then(a.fid.cmp(&b.fid)));
        rows.into_iter().take(limit).cloned().collect()
    }

    /// 1-indexed rank of a player, if present
    pub fn rank_of(&self, fid: u64) -> Option<usize> {
        let score = self.entries.get(&fid)?.score;
        let ahead = self
            .entries
            .values()
            .filter(|e| e.score > score || (e.score == score && e.fid < fid))
            .count();
        Some(ahead + 1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All rows in leaderboard order
    pub fn entries(&self) -> Vec<LeaderboardEntry> {
        self.top(usize::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entry(fid: u64, score: u64) -> LeaderboardEntry {
        LeaderboardEntry {
            fid,
            username: format!("user{fid}"),
            score,
            pfp_url: None,
        }
    }

    #[test]
    fn test_first_submission_is_stored() {
        let mut board = Leaderboard::new();
        assert!(board.submit(entry(1, 0)));
        assert_eq!(board.get(1).map(|e| e.score), Some(0));
    }

    #[test]
    fn test_lower_or_equal_score_is_ignored() {
        let mut board = Leaderboard::new();
        board.submit(entry(1, 10));
        assert!(!board.submit(entry(1, 10)));
        assert!(!board.submit(entry(1, 3)));
        assert_eq!(board.get(1).map(|e| e.score), Some(10));
    }

    #[test]
    fn test_profile_kept_unless_score_improves() {
        let mut board = Leaderboard::new();
        let mut first = entry(1, 10);
        first.pfp_url = Some("https://a/old.png".into());
        board.submit(first);

        for score in [10, 4] {
            let mut resubmit = entry(1, score);
            resubmit.username = "renamed".into();
            resubmit.pfp_url = Some("https://a/new.png".into());
            assert!(!board.submit(resubmit));
        }

        let stored = board.get(1).unwrap();
        assert_eq!(stored.username, "user1");
        assert_eq!(stored.pfp_url.as_deref(), Some("https://a/old.png"));
    }

    #[test]
    fn test_higher_score_replaces_profile_too() {
        let mut board = Leaderboard::new();
        board.submit(entry(1, 10));
        let mut better = entry(1, 11);
        better.username = "renamed".into();
        assert!(board.submit(better));
        assert_eq!(board.get(1).map(|e| e.username.as_str()), Some("renamed"));
    }

    #[test]
    fn test_top_sorted_and_limited() {
        let board = Leaderboard::from_entries((1..=80).map(|fid| entry(fid, fid * 7 % 31)));
        let top = board.top(LEADERBOARD_LIMIT);
        assert_eq!(top.len(), LEADERBOARD_LIMIT);
        assert!(top.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_ties_break_by_fid() {
        let board = Leaderboard::from_entries([entry(9, 5), entry(3, 5), entry(4, 6)]);
        let fids: Vec<u64> = board.top(10).iter().map(|e| e.fid).collect();
        assert_eq!(fids, vec![4, 3, 9]);
        assert_eq!(board.rank_of(9), Some(3));
        assert_eq!(board.rank_of(100), None);
    }

    #[test]
    fn test_rank_within_fetched_top_rows() {
        let full = Leaderboard::from_entries((1..=80).map(|fid| entry(fid, fid)));
        let fetched = Leaderboard::from_entries(full.top(LEADERBOARD_LIMIT));
        assert_eq!(fetched.rank_of(80), Some(1));
        assert_eq!(fetched.rank_of(80 - LEADERBOARD_LIMIT as u64 + 1), Some(LEADERBOARD_LIMIT));
        assert_eq!(fetched.rank_of(1), None);
    }

    #[test]
    fn test_submission_requires_fid_and_score() {
        let missing_score = ScoreSubmission {
            fid: Some(1),
            ..Default::default()
        };
        assert!(matches!(missing_score.into_entry(), Err(crate::Error::MissingData)));

        let zero_fid = ScoreSubmission {
            fid: Some(0),
            score: Some(4),
            ..Default::default()
        };
        assert!(zero_fid.into_entry().is_err());

        let ok = ScoreSubmission {
            fid: Some(1),
            score: Some(0),
            username: Some("a".into()),
            pfp_url: Some(String::new()),
        };
        let entry = ok.into_entry().unwrap();
        assert_eq!(entry.score, 0);
        assert_eq!(entry.pfp_url, None);
    }

    #[test]
    fn test_wire_field_names() {
        let sub: ScoreSubmission =
            serde_json::from_str(r#"{"fid":3,"username":"a","score":9,"pfpUrl":"p"}"#).unwrap();
        assert_eq!(sub.pfp_url.as_deref(), Some("p"));

        let json = serde_json::to_value(SubmitOutcome::stored(true)).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "newHighScore": true}));

        let json = serde_json::to_value(entry(2, 1)).unwrap();
        assert!(json.get("pfp_url").is_some());
    }

    proptest! {
        #[test]
        fn prop_stored_score_is_running_max(
            scores in proptest::collection::vec((1u64..5, 0u64..1000), 1..200),
        ) {
            let mut board = Leaderboard::new();
            let mut best: HashMap<u64, u64> = HashMap::new();
            for (fid, score) in scores {
                let improved = board.submit(entry(fid, score));
                let prev = best.get(&fid).copied();
                prop_assert_eq!(improved, prev.is_none_or(|p| score > p));
                let max = prev.map_or(score, |p| p.max(score));
                best.insert(fid, max);
                prop_assert_eq!(board.get(fid).map(|e| e.score), Some(max));
            }
        }

        #[test]
        fn prop_top_never_exceeds_limit(
            scores in proptest::collection::vec((any::<u64>(), any::<u64>()), 0..150),
            limit in 0usize..80,
        ) {
            let board = Leaderboard::from_entries(scores.into_iter().map(|(f, s)| entry(f, s)));
            let top = board.top(limit);
            prop_assert!(top.len() <= limit);
            prop_assert!(top.windows(2).all(|w| w[0].score >= w[1].score));
        }
    }
}
