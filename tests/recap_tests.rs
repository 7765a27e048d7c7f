//! Year-in-review assembly over a fake upstream

mod common;

use common::*;
use serde_json::json;
use std::sync::Arc;
use tft_recap::application::recap::year_in_review;
use tft_recap::domain::error::RecapError;
use tft_recap::domain::stats::EconomyStyle;

fn player_fixture(fake: &FakeRiot, summoner_id: Option<&str>) {
    fake.route("by-riot-id/Tactician/NA1", 200, account_json("p-1", "Tactician", "NA1"));
    fake.route("summoners/by-puuid/p-1", 200, summoner_json("p-1", summoner_id));
}

#[tokio::test]
async fn test_year_without_games_is_not_found() {
    let fake = Arc::new(FakeRiot::new());
    player_fixture(&fake, Some("s-1"));
    fake.route("by-puuid/p-1/ids", 200, json!([]));
    let resolver = resolver_with_cache(fake.clone()).await;

    let err = year_in_review(&resolver, "Tactician#NA1", "na1", 2024)
        .await
        .unwrap_err();

    assert!(matches!(err, RecapError::NotFound(_)));
    assert_eq!(err.status_code(), 404);
    assert_eq!(fake.calls_to("entries/by-summoner"), 0);
}

#[tokio::test]
async fn test_full_year_in_review() {
    let fake = Arc::new(FakeRiot::new());
    player_fixture(&fake, Some("s-1"));
    fake.route("by-puuid/p-1/ids", 200, json!(["NA1_30", "NA1_20", "NA1_10"]));
    fake.route("matches/NA1_30", 200, match_json("NA1_30", "p-1", millis(2024, 9, 1), 1));
    fake.route("matches/NA1_20", 200, match_json("NA1_20", "p-1", millis(2024, 4, 1), 4));
    fake.route("matches/NA1_10", 200, match_json("NA1_10", "p-1", millis(2023, 4, 1), 8));
    fake.route(
        "entries/by-summoner/s-1",
        200,
        json!([{ "queueType": "RANKED_TFT", "tier": "PLATINUM", "rank": "III", "leaguePoints": 62 }]),
    );
    let resolver = resolver_with_cache(fake.clone()).await;

    let stats = year_in_review(&resolver, "Tactician", "na1", 2024).await.unwrap();

    assert_eq!(stats.summoner.name, "Tactician#NA1");
    assert_eq!(stats.summoner.level, 250);
    assert_eq!(stats.summoner.profile_icon_id, 29);
    assert_eq!(stats.overview.total_games, 2);
    assert_eq!(stats.overview.average_placement, 2.5);
    assert_eq!(stats.overview.top4_rate, 100);
    assert_eq!(stats.overview.win_rate, 50);
    assert_eq!(stats.ranked_performance.current_rank.tier, "PLATINUM");
    assert_eq!(stats.ranked_performance.peak_rank, stats.ranked_performance.current_rank);
    assert_eq!(stats.playstyle.favorite_units[0].name, "Akali");
    assert_eq!(stats.playstyle.economy_style, EconomyStyle::Aggressive);

    let value = serde_json::to_value(&stats).unwrap();
    assert_eq!(value["overview"]["top4Rate"], json!(100));
    assert_eq!(value["rankedPerformance"]["currentRank"]["lp"], json!(62));
}

#[tokio::test]
async fn test_missing_summoner_id_skips_ranked_lookup() {
    let fake = Arc::new(FakeRiot::new());
    player_fixture(&fake, None);
    fake.route("by-puuid/p-1/ids", 200, json!(["NA1_30"]));
    fake.route("matches/NA1_30", 200, match_json("NA1_30", "p-1", millis(2024, 9, 1), 6));
    let resolver = resolver_with_cache(fake.clone()).await;

    let stats = year_in_review(&resolver, "Tactician#NA1", "na1", 2024).await.unwrap();

    assert_eq!(stats.ranked_performance.current_rank.tier, "UNRANKED");
    assert_eq!(fake.calls_to("entries/by-summoner"), 0);
}

#[tokio::test]
async fn test_upstream_failure_fails_the_summary() {
    let fake = Arc::new(FakeRiot::new());
    player_fixture(&fake, Some("s-1"));
    fake.route("by-puuid/p-1/ids", 200, json!(["NA1_30"]));
    fake.route("matches/NA1_30", 500, json!({"status": {"message": "boom"}}));
    let resolver = resolver_with_cache(fake).await;

    let err = year_in_review(&resolver, "Tactician#NA1", "na1", 2024)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        RecapError::UpstreamServer {
            status: 500,
            message: "boom".to_string()
        }
    );
    assert_eq!(err.exit_code(), 4);
}
