//! Server configuration
//!
//! Flags fall back to `WARP_FLAP_*` environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Leaderboard and share-card service for Warp Flap
#[derive(Debug, Clone, Parser)]
#[command(name = "warp-flap", version, about)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "WARP_FLAP_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// Leaderboard JSON file; omit to keep scores in memory only
    #[arg(long, env = "WARP_FLAP_DATA")]
    pub data_file: Option<PathBuf>,

    /// Cache lifetime (seconds) for share cards with a numeric score
    #[arg(long, env = "WARP_FLAP_SHARE_MAX_AGE", default_value_t = 3600)]
    pub share_card_max_age: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            data_file: None,
            share_card_max_age: 3600,
        }
    }
}
