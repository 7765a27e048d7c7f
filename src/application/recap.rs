use crate::application::resolver::Resolver;
use crate::application::stats::aggregate_yearly_stats;
use crate::domain::error::RecapError;
use crate::domain::model::LeagueEntry;
use crate::domain::region::RiotId;
use crate::domain::stats::{Rank, YearlyStats};
use chrono::{DateTime, TimeZone, Utc};
use tracing::info;

const RANKED_QUEUE: &str = "RANKED_TFT";

/// First and last instant of a calendar year, UTC.
pub fn year_bounds(year: i32) -> Result<(DateTime<Utc>, DateTime<Utc>), RecapError> {
    let start = Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).single();
    let end = Utc
        .with_ymd_and_hms(year, 12, 31, 23, 59, 59)
        .single()
        .map(|t| t + chrono::Duration::milliseconds(999));
    match (start, end) {
        (Some(start), Some(end)) => Ok((start, end)),
        _ => Err(RecapError::Config(format!("Unsupported year: {}", year))),
    }
}

/// Standing in the ranked TFT queue, or unranked.
pub fn current_rank(entries: &[LeagueEntry]) -> Rank {
    entries
        .iter()
        .find(|e| e.queue_type == RANKED_QUEUE)
        .map(|e| Rank {
            tier: e.tier.clone().unwrap_or_else(|| "UNRANKED".to_string()),
            division: e.rank.clone().unwrap_or_default(),
            lp: e.league_points,
        })
        .unwrap_or_else(Rank::unranked)
}

/// Year-in-review for a player name (`Name#TAG` or bare name) on a platform.
///
/// Returns [`RecapError::NotFound`] when the player has no games in `year`.
/// Any upstream failure along the way fails the whole summary.
pub async fn year_in_review(
    resolver: &Resolver,
    name: &str,
    region: &str,
    year: i32,
) -> Result<YearlyStats, RecapError> {
    let riot_id = RiotId::parse(name, region);
    let summoner = resolver.get_summoner_by_riot_id(region, &riot_id).await?;

    let (start, end) = year_bounds(year)?;
    let matches = resolver
        .matches_in_date_range(region, &summoner.puuid, start, end)
        .await?;

    if matches.is_empty() {
        return Err(RecapError::NotFound(format!(
            "No matches found for {} in {}",
            riot_id, year
        )));
    }
    info!(riot_id = %riot_id, year, matches = matches.len(), "building year in review");

    let mut stats = aggregate_yearly_stats(&matches, &summoner.puuid, &riot_id.to_string());
    stats.summoner.level = summoner.summoner_level;
    stats.summoner.profile_icon_id = summoner.profile_icon_id;

    if let Some(summoner_id) = summoner.id.as_deref() {
        let entries = resolver.get_ranked_standing(region, summoner_id).await?;
        let rank = current_rank(&entries);
        // No rank history is available, so the peak is the current rank.
        stats.ranked_performance.peak_rank = rank.clone();
        stats.ranked_performance.current_rank = rank;
    }

    Ok(stats)
}
