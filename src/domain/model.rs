use crate::domain::policy::ResourceType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// Riot account (riot/account/v1)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub puuid: String,
    #[serde(default)]
    pub game_name: Option<String>,
    #[serde(default)]
    pub tag_line: Option<String>,
}

// TFT summoner profile (tft/summoner/v1)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Summoner {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
    pub puuid: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub profile_icon_id: i64,
    #[serde(default)]
    pub revision_date: i64,
    #[serde(default)]
    pub summoner_level: i64,
}

// TFT match (tft/match/v1). Field names follow the upstream payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Match {
    pub metadata: MatchMetadata,
    pub info: MatchInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchMetadata {
    #[serde(default)]
    pub data_version: String,
    pub match_id: String,
    #[serde(default)]
    pub participants: Vec<String>, // PUUIDs
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchInfo {
    /// Milliseconds since the Unix epoch.
    pub game_datetime: i64,
    /// Seconds.
    #[serde(default)]
    pub game_length: f64,
    #[serde(default)]
    pub game_version: String,
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub queue_id: i64,
    #[serde(default)]
    pub tft_set_number: i64,
}

impl Match {
    pub fn played_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.info.game_datetime)
    }

    pub fn participant(&self, puuid: &str) -> Option<&Participant> {
        self.info.participants.iter().find(|p| p.puuid == puuid)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Participant {
    pub puuid: String,
    pub placement: u32,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub time_eliminated: f64,
    #[serde(default)]
    pub gold_left: i64,
    #[serde(default)]
    pub total_damage_to_players: i64,
    #[serde(default)]
    pub companion: Option<Companion>,
    #[serde(default)]
    pub traits: Vec<Trait>,
    #[serde(default)]
    pub units: Vec<Unit>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Companion {
    #[serde(rename = "content_ID", default)]
    pub content_id: String,
    #[serde(rename = "skin_ID", default)]
    pub skin_id: i64,
    #[serde(default)]
    pub species: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trait {
    pub name: String,
    #[serde(default)]
    pub num_units: u32,
    /// 0 means the trait was present but inactive.
    #[serde(default)]
    pub style: u32,
    #[serde(default)]
    pub tier_current: u32,
    #[serde(default)]
    pub tier_total: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Unit {
    pub character_id: String,
    #[serde(rename = "itemNames", default)]
    pub item_names: Vec<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rarity: u32,
    #[serde(default)]
    pub tier: u32,
}

// Ranked standing (tft/league/v1)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeagueEntry {
    #[serde(default)]
    pub league_id: Option<String>,
    #[serde(default)]
    pub summoner_id: Option<String>,
    #[serde(default)]
    pub queue_type: String,
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default)]
    pub rank: Option<String>,
    #[serde(default)]
    pub league_points: i64,
    #[serde(default)]
    pub wins: i64,
    #[serde(default)]
    pub losses: i64,
    #[serde(default)]
    pub hot_streak: bool,
    #[serde(default)]
    pub veteran: bool,
    #[serde(default)]
    pub fresh_blood: bool,
    #[serde(default)]
    pub inactive: bool,
}

/// Identifies one cached resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    resource: ResourceType,
    region: String,
    natural_key: String,
}

impl CacheKey {
    pub fn account(region: &str, game_name: &str, tag_line: &str) -> Self {
        Self::new(
            ResourceType::Account,
            region,
            format!("{}#{}", game_name, tag_line),
        )
    }

    pub fn profile(region: &str, puuid: &str) -> Self {
        Self::new(ResourceType::Profile, region, puuid)
    }

    pub fn match_ids(region: &str, puuid: &str) -> Self {
        Self::new(ResourceType::MatchIds, region, puuid)
    }

    pub fn match_detail(region: &str, match_id: &str) -> Self {
        Self::new(ResourceType::MatchDetail, region, match_id)
    }

    pub fn ranked(region: &str, summoner_id: &str) -> Self {
        Self::new(ResourceType::RankedStanding, region, summoner_id)
    }

    fn new(resource: ResourceType, region: &str, natural_key: impl Into<String>) -> Self {
        Self {
            resource,
            region: region.to_string(),
            natural_key: natural_key.into(),
        }
    }

    pub fn resource(&self) -> ResourceType {
        self.resource
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn natural_key(&self) -> &str {
        &self.natural_key
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.resource.as_str(),
            self.region,
            self.natural_key
        )
    }
}

/// A stored payload and the time the store wrote it.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub key: CacheKey,
    pub payload: serde_json::Value,
    pub stored_at: DateTime<Utc>,
}
