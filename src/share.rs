//! Share card and share text
//!
//! The card is an SVG templated over a score; the server only adds headers.

use std::fmt::Write;

/// Card dimensions (3:2, as mini-app embeds expect)
pub const CARD_WIDTH: u32 = 1200;
pub const CARD_HEIGHT: u32 = 800;

/// Phrases cycled behind the HUD as the score climbs
pub const MEMES: [&str; 8] = [
    "WAGMI", "LFG", "Based", "HODL", "Up Only", "Mint It", "Higher", "Warplet",
];

/// Background phrase for a score
pub fn meme_for_score(score: u32) -> &'static str {
    MEMES[score as usize % MEMES.len()]
}

/// What a share card shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardScore {
    Score(u64),
    /// No (or an unreadable) score was given
    Unknown,
}

impl CardScore {
    /// Parse the `score` query parameter
    pub fn from_param(param: Option<&str>) -> Self {
        param
            .map(str::trim)
            .and_then(|s| s.parse().ok())
            .map(CardScore::Score)
            .unwrap_or(CardScore::Unknown)
    }

    pub fn label(&self) -> String {
        match self {
            CardScore::Score(s) => s.to_string(),
            CardScore::Unknown => "?".to_string(),
        }
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the share card as SVG
pub fn render_card(score: CardScore) -> Result<String, std::fmt::Error> {
    let label = escape_xml(&format!("{} ETH", score.label()));
    let (w, h) = (CARD_WIDTH, CARD_HEIGHT);
    let cx = w / 2;

    let mut svg = String::with_capacity(2048);
    write!(
        svg,
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
<defs><linearGradient id="bg" x1="0" y1="0" x2="0" y2="1"><stop offset="0" stop-color="#0f0518"/><stop offset="1" stop-color="#2a0a4a"/></linearGradient></defs>
<rect width="{w}" height="{h}" fill="url(#bg)"/>
<circle cx="50" cy="50" r="150" fill="#855DCD" fill-opacity="0.2"/>
<circle cx="{rx}" cy="{ry}" r="200" fill="#10B981" fill-opacity="0.1"/>
<g font-family="monospace" text-anchor="middle">
<text x="{cx}" y="250" font-size="40" fill="#855DCD">WARP FLAP</text>
<text x="{cx}" y="310" font-size="20" fill="#9ca3af">PORTFOLIO VALUE</text>
<text x="{cx}" y="450" font-size="120" font-weight="900" fill="#ffffff">{label}</text>
<rect x="{px}" y="530" width="400" height="60" rx="20" fill="#ffffff" fill-opacity="0.125"/>
<text x="{cx}" y="570" font-size="24" fill="#ffffff">Play on Farcaster</text>
</g>
</svg>"##,
        rx = w - 150,
        ry = h - 150,
        px = cx - 200,
    )?;
    Ok(svg)
}

/// Score as shown in the HUD and share text
pub fn score_label(score: u32) -> String {
    format!("{score} ETH")
}

/// Text offered when sharing a finished run
pub fn share_text(score: u32, fid: u64) -> String {
    format!(
        "I just scored {} on Warp Flap with Warplet #{fid}! 🚀\n\nCan you beat me?",
        score_label(score)
    )
}

/// Share-card URL for a score, relative to the app origin
pub fn card_url(app_url: &str, score: u32) -> String {
    format!("{}/api/og?score={score}", app_url.trim_end_matches('/'))
}
