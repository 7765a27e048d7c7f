// Single-pass reduction of match records into a year-in-review summary
use crate::domain::model::{Match, Participant};
use crate::domain::stats::{
    EconomyStyle, Overview, PlaystyleStats, Rank, RankedStats, SummonerCard, UsageStats,
    YearlyStats,
};
use std::collections::HashMap;

const TOP_N: usize = 5;

/// Counts occurrences and placements, remembering first-seen order so ties
/// rank deterministically.
#[derive(Default)]
struct Tally {
    order: Vec<String>,
    seen: HashMap<String, (usize, u64)>,
}

impl Tally {
    fn add(&mut self, id: &str, placement: u32) {
        let slot = self.seen.entry(id.to_string()).or_insert_with(|| {
            self.order.push(id.to_string());
            (0, 0)
        });
        slot.0 += 1;
        slot.1 += u64::from(placement);
    }

    fn top(self, n: usize, name: fn(&str) -> String) -> Vec<UsageStats> {
        let mut stats: Vec<UsageStats> = self
            .order
            .iter()
            .map(|id| {
                let (count, placement_sum) = self.seen[id];
                UsageStats {
                    id: id.clone(),
                    name: name(id),
                    times_used: count,
                    average_placement: placement_sum as f64 / count as f64,
                }
            })
            .collect();
        stats.sort_by(|a, b| b.times_used.cmp(&a.times_used));
        stats.truncate(n);
        stats
    }
}

// "TFT10_Ahri" -> "Ahri"
fn unit_name(id: &str) -> String {
    id.rsplit('_').next().unwrap_or(id).to_string()
}

fn same_name(id: &str) -> String {
    id.to_string()
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}

fn economy_style(average_gold_left: f64) -> EconomyStyle {
    if average_gold_left > 15.0 {
        EconomyStyle::Greedy
    } else if average_gold_left > 5.0 {
        EconomyStyle::Balanced
    } else {
        EconomyStyle::Aggressive
    }
}

/// Summarise the games `puuid` took part in. Matches without that player
/// are ignored. Profile and rank fields are left at their defaults for the
/// caller to fill in.
pub fn aggregate_yearly_stats(matches: &[Match], puuid: &str, display_name: &str) -> YearlyStats {
    let played: Vec<(&Match, &Participant)> = matches
        .iter()
        .filter_map(|m| m.participant(puuid).map(|p| (m, p)))
        .collect();

    let total_games = played.len();
    let games = total_games.max(1) as f64;

    let total_seconds: f64 = played.iter().map(|(m, _)| m.info.game_length).sum();
    let placement_sum: u64 = played.iter().map(|(_, p)| u64::from(p.placement)).sum();
    let top4 = played.iter().filter(|(_, p)| p.placement <= 4).count();
    let wins = played.iter().filter(|(_, p)| p.placement == 1).count();
    let gold_left: i64 = played.iter().map(|(_, p)| p.gold_left).sum();

    let mut units = Tally::default();
    let mut traits = Tally::default();
    let mut items = Tally::default();
    let mut sets: Vec<(i64, usize)> = Vec::new();

    for (game, participant) in &played {
        for unit in &participant.units {
            units.add(&unit.character_id, participant.placement);
            for item in &unit.item_names {
                items.add(item, participant.placement);
            }
        }
        for t in participant.traits.iter().filter(|t| t.style > 0) {
            traits.add(&t.name, participant.placement);
        }
        match sets.iter_mut().find(|(set, _)| *set == game.info.tft_set_number) {
            Some((_, count)) => *count += 1,
            None => sets.push((game.info.tft_set_number, 1)),
        }
    }

    // First set to reach the highest count wins ties.
    let most_played_set = sets
        .iter()
        .fold(None::<(i64, usize)>, |best, &(set, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((set, count)),
        })
        .map(|(set, _)| set)
        .unwrap_or(0);

    YearlyStats {
        summoner: SummonerCard {
            name: display_name.to_string(),
            level: 0,
            profile_icon_id: 0,
        },
        overview: Overview {
            total_games,
            total_hours_played: (total_seconds / 3600.0).round() as u64,
            average_placement: round_to(placement_sum as f64 / games, 1),
            top4_rate: percent(top4, total_games),
            win_rate: percent(wins, total_games),
        },
        ranked_performance: RankedStats {
            current_rank: Rank::unranked(),
            peak_rank: Rank::unranked(),
            total_wins: wins,
            total_losses: total_games - wins,
        },
        playstyle: PlaystyleStats {
            average_game_length: (total_seconds / games / 60.0).round() as u64,
            most_played_set,
            favorite_units: units.top(TOP_N, unit_name),
            favorite_traits: traits.top(TOP_N, same_name),
            favorite_items: items.top(TOP_N, same_name),
            economy_style: economy_style(gold_left as f64 / games),
        },
    }
}
