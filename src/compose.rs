// src/compose.rs
//! Turn a [`Summary`] into post text that fits the platform limit.

use serde::Serialize;

use crate::summarize::Summary;

pub const ELLIPSIS: &str = "...";

/// Budget for the full format; leaves headroom under the hard limit.
const FULL_FORMAT_BUDGET: usize = 260;

const NEWS_MARK: &str = "📰 ";
const BULLET: &str = "▸ ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PostFormat {
    Full,
    Abbreviated,
    Minimal,
}

pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Cut `s` to at most `max` characters, marking the cut with [`ELLIPSIS`].
pub fn truncate_with_ellipsis(s: &str, max: usize) -> String {
    if char_len(s) <= max {
        return s.to_string();
    }
    let keep = max.saturating_sub(ELLIPSIS.len());
    let mut out: String = s.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Pick the richest format that fits:
/// headline + all points (≤ 260), headline + first point (≤ limit), headline only.
pub fn compose_post(summary: &Summary, limit: usize) -> (String, PostFormat) {
    let headline = summary.headline.trim();
    let points: Vec<&str> = summary
        .key_points
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .take(3)
        .collect();

    let head = format!("{NEWS_MARK}{headline}");

    if !points.is_empty() {
        let full = format!(
            "{head}\n\n{}",
            points
                .iter()
                .map(|p| format!("{BULLET}{p}"))
                .collect::<Vec<_>>()
                .join("\n")
        );
        if char_len(&full) <= FULL_FORMAT_BUDGET.min(limit) {
            return (full, PostFormat::Full);
        }

        let abbreviated = format!("{head}\n\n{BULLET}{}", points[0]);
        if char_len(&abbreviated) <= limit {
            return (abbreviated, PostFormat::Abbreviated);
        }
    }

    (truncate_with_ellipsis(&head, limit), PostFormat::Minimal)
}

/// Up to three hashtags derived from the summary's keywords.
pub fn extract_hashtags(summary: &Summary) -> String {
    const KEYWORDS: &[(&str, &str)] = &[
        ("BITCOIN", "#Bitcoin"),
        ("BTC", "#Bitcoin"),
        ("ETHEREUM", "#Ethereum"),
        ("ETH", "#Ethereum"),
        ("SOLANA", "#Solana"),
        ("SOL", "#Solana"),
        ("ZCASH", "#Zcash"),
        ("MONERO", "#Monero"),
        ("XMR", "#Monero"),
        ("UNISWAP", "#Uniswap"),
        ("NFT", "#NFTs"),
        ("WEB3", "#Web3"),
        ("BLOCKCHAIN", "#Web3"),
        ("AI", "#AI"),
    ];
    const DEFAULTS: &[&str] = &["#Crypto", "#Tech", "#News"];

    let text = format!("{} {}", summary.headline, summary.key_points.join(" ")).to_uppercase();
    let words: Vec<&str> = text
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    let mut tags: Vec<&str> = Vec::new();
    for (keyword, tag) in KEYWORDS {
        let hit = words.iter().any(|w| w == keyword || w.strip_suffix('S') == Some(*keyword));
        if hit && !tags.contains(tag) {
            tags.push(*tag);
        }
    }
    for d in DEFAULTS {
        if tags.len() >= 3 {
            break;
        }
        if !tags.contains(d) {
            tags.push(*d);
        }
    }
    tags.truncate(3);
    tags.join(" ")
}
