// Year-in-review summary types
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct YearlyStats {
    pub summoner: SummonerCard,
    pub overview: Overview,
    pub ranked_performance: RankedStats,
    pub playstyle: PlaystyleStats,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SummonerCard {
    pub name: String,
    pub level: i64,
    pub profile_icon_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_games: usize,
    pub total_hours_played: u64,
    pub average_placement: f64,
    /// Percent, rounded.
    pub top4_rate: u32,
    /// Percent, rounded.
    pub win_rate: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Rank {
    pub tier: String,
    pub division: String,
    pub lp: i64,
}

impl Rank {
    pub fn unranked() -> Self {
        Self {
            tier: "UNRANKED".to_string(),
            division: String::new(),
            lp: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RankedStats {
    pub current_rank: Rank,
    /// No rank history is kept; this mirrors `current_rank`.
    pub peak_rank: Rank,
    pub total_wins: usize,
    pub total_losses: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EconomyStyle {
    Greedy,
    Balanced,
    Aggressive,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlaystyleStats {
    /// Minutes.
    pub average_game_length: u64,
    pub most_played_set: i64,
    pub favorite_units: Vec<UsageStats>,
    pub favorite_traits: Vec<UsageStats>,
    pub favorite_items: Vec<UsageStats>,
    pub economy_style: EconomyStyle,
}

/// How often something was fielded and how those games went.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UsageStats {
    pub id: String,
    pub name: String,
    pub times_used: usize,
    pub average_placement: f64,
}
