use crate::application::resolver::DEFAULT_MATCH_COUNT;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "recap")]
#[command(about = "A year in review for Teamfight Tactics players.")]
#[command(version)]
pub struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Choose color theme
    #[arg(short = 'T', long, global = true)]
    pub theme: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Year-in-review statistics for a player
    Stats {
        /// Riot ID (Name#TAG) or bare name
        name: String,
        /// Platform region, e.g. na1, euw1, kr
        #[arg(short = 'r', long)]
        region: Option<String>,
        /// Calendar year (defaults to the current year)
        #[arg(short = 'y', long)]
        year: Option<i32>,
    },
    /// Look up a summoner profile
    Summoner {
        /// Riot ID (Name#TAG) or bare name
        name: String,
        #[arg(short = 'r', long)]
        region: Option<String>,
    },
    /// List recent match IDs for a PUUID
    Matches {
        puuid: String,
        #[arg(short = 'r', long)]
        region: Option<String>,
        /// Number of match IDs to list
        #[arg(short = 'c', long, default_value_t = DEFAULT_MATCH_COUNT)]
        count: usize,
    },
    /// Inspect or maintain the local cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum CacheAction {
    /// Show row counts per table
    Status,
    /// Delete every cached entry
    Clear,
    /// Delete match-ID lists past their TTL
    Cleanup,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigAction {
    /// Write a sample config file
    Generate,
}
