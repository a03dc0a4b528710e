//! CLI argument definitions for trucktok.
//!
//! | Command | Description |
//! |---------|-------------|
//! | `search` | Search one or every provider |
//! | `sources` | List providers and their configuration |
//!
//! ```bash
//! trucktok search "lifted trucks" --pretty
//! trucktok search --source twitter --limit 5
//! trucktok sources
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use trucktok_core::ProviderId;

/// Multi-provider short-video search from the command line.
#[derive(Debug, Parser)]
#[command(
    name = "trucktok",
    author,
    version,
    about = "Search short videos across YouTube, Twitter and TikTok"
)]
pub struct Cli {
    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search videos. Prints a provider-keyed object for `--source all`,
    /// otherwise the provider's record array.
    Search(SearchArgs),

    /// List providers, whether they are configured, and their auth scheme.
    Sources,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Search text. Defaults to the configured query.
    pub query: Option<String>,

    /// Provider to search.
    #[arg(long, value_enum, default_value_t = SourceSelector::All)]
    pub source: SourceSelector,

    /// Maximum results per provider. Defaults to the configured value.
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceSelector {
    /// Every enabled provider, concurrently.
    All,
    Youtube,
    Twitter,
    Tiktok,
}

impl SourceSelector {
    pub const fn provider(self) -> Option<ProviderId> {
        match self {
            Self::All => None,
            Self::Youtube => Some(ProviderId::Youtube),
            Self::Twitter => Some(ProviderId::Twitter),
            Self::Tiktok => Some(ProviderId::Tiktok),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_defaults_to_every_provider() {
        let cli = Cli::try_parse_from(["trucktok", "search"]).expect("valid arguments");

        let Command::Search(args) = cli.command else {
            panic!("expected search command");
        };
        assert_eq!(args.query, None);
        assert_eq!(args.source, SourceSelector::All);
        assert_eq!(args.limit, None);
        assert!(!cli.pretty);
    }

    #[test]
    fn search_accepts_source_limit_and_global_pretty() {
        let cli = Cli::try_parse_from([
            "trucktok",
            "search",
            "lifted trucks",
            "--source",
            "twitter",
            "--limit",
            "5",
            "--pretty",
        ])
        .expect("valid arguments");

        let Command::Search(args) = cli.command else {
            panic!("expected search command");
        };
        assert_eq!(args.query.as_deref(), Some("lifted trucks"));
        assert_eq!(args.source.provider(), Some(ProviderId::Twitter));
        assert_eq!(args.limit, Some(5));
        assert!(cli.pretty);
    }

    #[test]
    fn unknown_source_is_rejected() {
        let error = Cli::try_parse_from(["trucktok", "search", "--source", "vimeo"])
            .expect_err("unknown source");
        assert_eq!(error.exit_code(), 2);
    }
}
