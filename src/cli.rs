// src/cli.rs
//! Command-line flags. Every flag overrides the matching config value.

use clap::Parser;

use crate::config::bot::MAX_INTERVAL_MINUTES;
use crate::media::ImageKind;

/// Post a news summary to X/Twitter, once, on a timer, or behind an HTTP API.
///
/// ```sh
/// # one post right now, with an image, without publishing
/// news-tweet-bot --once --image --dry-run
///
/// # every 30 minutes
/// news-tweet-bot --interval-minutes 30 --image
///
/// # HTTP API on :8000
/// news-tweet-bot --serve
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Run once and exit (default: run on a schedule)
    #[arg(long, conflicts_with = "serve")]
    pub once: bool,

    /// Attach a generated image to each post
    #[arg(long)]
    pub image: bool,

    /// Attach a video (not supported; accepted and ignored)
    #[arg(long)]
    pub video: bool,

    /// Build the post but do not publish it
    #[arg(long)]
    pub dry_run: bool,

    /// Minutes between scheduled runs
    #[arg(long, env = "POST_INTERVAL_MINUTES", value_parser = clap::value_parser!(u64).range(1..=MAX_INTERVAL_MINUTES))]
    pub interval_minutes: Option<u64>,

    /// Image source: ai, chart or both
    #[arg(long, value_parser = clap::value_parser!(ImageKind))]
    pub image_kind: Option<ImageKind>,

    /// Serve the HTTP API instead of posting from the command line
    #[arg(long)]
    pub serve: bool,

    /// Port for --serve
    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from(["news-tweet-bot", "--once", "--image", "--dry-run", "--image-kind", "chart"]);
        assert!(cli.once);
        assert!(cli.image);
        assert!(cli.dry_run);
        assert!(!cli.serve);
        assert_eq!(cli.image_kind, Some(ImageKind::Chart));
    }

    #[test]
    fn test_cli_interval_must_be_positive() {
        assert!(Cli::try_parse_from(["news-tweet-bot", "--interval-minutes", "0"]).is_err());
        assert!(Cli::try_parse_from(["news-tweet-bot", "--interval-minutes", "4611686018427387904"]).is_err());
        let cli = Cli::try_parse_from(["news-tweet-bot", "--interval-minutes", "15"]).unwrap();
        assert_eq!(cli.interval_minutes, Some(15));
    }

    #[test]
    fn test_cli_once_conflicts_with_serve() {
        assert!(Cli::try_parse_from(["news-tweet-bot", "--once", "--serve"]).is_err());
    }

    #[test]
    fn test_cli_rejects_unknown_image_kind() {
        assert!(Cli::try_parse_from(["news-tweet-bot", "--image-kind", "video"]).is_err());
    }
}
