// Plain-text renderings for terminal output
use crate::domain::model::Summoner;
use crate::domain::stats::{EconomyStyle, Rank, UsageStats, YearlyStats};
use crate::presentation::theme::Theme;
use std::fmt::Write;
use std::path::Path;

fn rank_text(rank: &Rank) -> String {
    if rank.division.is_empty() {
        rank.tier.clone()
    } else {
        format!("{} {} ({} LP)", rank.tier, rank.division, rank.lp)
    }
}

fn economy_text(style: EconomyStyle) -> &'static str {
    match style {
        EconomyStyle::Greedy => "greedy (banks gold)",
        EconomyStyle::Balanced => "balanced",
        EconomyStyle::Aggressive => "aggressive (spends everything)",
    }
}

fn write_usage(output: &mut String, heading: &str, usage: &[UsageStats], theme: &Theme) {
    if usage.is_empty() {
        return;
    }
    writeln!(output).ok();
    writeln!(output, "  {}", (theme.heading)(heading)).ok();
    for (i, entry) in usage.iter().enumerate() {
        writeln!(
            output,
            "  {}. {}  {}",
            (theme.idx)(&(i + 1).to_string()),
            (theme.value)(&entry.name),
            (theme.dim)(&format!(
                "{} games, avg #{:.1}",
                entry.times_used, entry.average_placement
            ))
        )
        .ok();
    }
}

fn write_row(output: &mut String, label: &str, value: &str, theme: &Theme) {
    writeln!(output, "  {:<20}{}", (theme.label)(label), (theme.value)(value)).ok();
}

/// Format a year-in-review as a terminal report.
pub fn format_stats(stats: &YearlyStats, year: i32, theme: &Theme, enable_emoji: bool) -> String {
    let mut output = String::new();
    let trophy = if enable_emoji { "🏆 " } else { "" };

    writeln!(
        output,
        "{}{}  {}",
        trophy,
        (theme.title)(&stats.summoner.name),
        (theme.dim)(&format!("{} recap, level {}", year, stats.summoner.level))
    )
    .ok();
    let cutoff = "⸺".repeat(40);
    writeln!(output, "  {}", (theme.line)(&cutoff)).ok();

    let overview = &stats.overview;
    write_row(&mut output, "Games", &overview.total_games.to_string(), theme);
    write_row(&mut output, "Hours played", &overview.total_hours_played.to_string(), theme);
    write_row(&mut output, "Avg placement", &format!("{:.1}", overview.average_placement), theme);
    write_row(&mut output, "Top 4 rate", &format!("{}%", overview.top4_rate), theme);
    write_row(&mut output, "Win rate", &format!("{}%", overview.win_rate), theme);

    let ranked = &stats.ranked_performance;
    writeln!(output).ok();
    writeln!(
        output,
        "  {:<20}{}",
        (theme.label)("Rank"),
        (theme.rank)(&rank_text(&ranked.current_rank))
    )
    .ok();
    write_row(
        &mut output,
        "Wins / losses",
        &format!("{} / {}", ranked.total_wins, ranked.total_losses),
        theme,
    );

    let playstyle = &stats.playstyle;
    write_row(&mut output, "Avg game length", &format!("{} min", playstyle.average_game_length), theme);
    write_row(&mut output, "Most played set", &playstyle.most_played_set.to_string(), theme);
    write_row(&mut output, "Economy", economy_text(playstyle.economy_style), theme);

    write_usage(&mut output, "Favorite units", &playstyle.favorite_units, theme);
    write_usage(&mut output, "Favorite traits", &playstyle.favorite_traits, theme);
    write_usage(&mut output, "Favorite items", &playstyle.favorite_items, theme);

    writeln!(output).ok();
    output
}

pub fn format_summoner(summoner: &Summoner, display_name: &str, theme: &Theme) -> String {
    let mut output = String::new();
    writeln!(output, "{}", (theme.title)(display_name)).ok();
    write_row(&mut output, "PUUID", &summoner.puuid, theme);
    if let Some(id) = &summoner.id {
        write_row(&mut output, "Summoner ID", id, theme);
    }
    write_row(&mut output, "Level", &summoner.summoner_level.to_string(), theme);
    write_row(&mut output, "Profile icon", &summoner.profile_icon_id.to_string(), theme);
    output
}

pub fn format_match_ids(ids: &[String], theme: &Theme) -> String {
    let mut output = String::new();
    if ids.is_empty() {
        writeln!(output, "  {}", (theme.dim)("No matches")).ok();
        return output;
    }
    for (i, id) in ids.iter().enumerate() {
        writeln!(output, "  {}. {}", (theme.idx)(&(i + 1).to_string()), id).ok();
    }
    output
}

pub fn format_cache_status(
    db_path: Option<&Path>,
    counts: &[(&'static str, usize)],
    theme: &Theme,
) -> String {
    let mut output = String::new();
    writeln!(output, "{}", (theme.title)("recap cache")).ok();
    let location = db_path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "disabled".to_string());
    write_row(&mut output, "Database", &location, theme);
    for (table, count) in counts {
        write_row(&mut output, table, &count.to_string(), theme);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stats::{Overview, PlaystyleStats, RankedStats, SummonerCard};

    fn sample() -> YearlyStats {
        YearlyStats {
            summoner: SummonerCard {
                name: "Me#NA1".to_string(),
                level: 321,
                profile_icon_id: 7,
            },
            overview: Overview {
                total_games: 42,
                total_hours_played: 25,
                average_placement: 3.8,
                top4_rate: 60,
                win_rate: 14,
            },
            ranked_performance: RankedStats {
                current_rank: Rank {
                    tier: "MASTER".to_string(),
                    division: "I".to_string(),
                    lp: 120,
                },
                peak_rank: Rank::unranked(),
                total_wins: 6,
                total_losses: 36,
            },
            playstyle: PlaystyleStats {
                average_game_length: 35,
                most_played_set: 13,
                favorite_units: vec![UsageStats {
                    id: "TFT13_Jinx".to_string(),
                    name: "Jinx".to_string(),
                    times_used: 12,
                    average_placement: 2.5,
                }],
                favorite_traits: vec![],
                favorite_items: vec![],
                economy_style: EconomyStyle::Balanced,
            },
        }
    }

    #[test]
    fn test_stats_report_contents() {
        colored::control::set_override(false);
        let output = format_stats(&sample(), 2024, &Theme::from_name("temp"), false);

        assert!(output.starts_with("Me#NA1"));
        assert!(output.contains("2024 recap, level 321"));
        assert!(output.contains("MASTER I (120 LP)"));
        assert!(output.contains("60%"));
        assert!(output.contains("1. Jinx  12 games, avg #2.5"));
        assert!(!output.contains("Favorite traits"));
    }

    #[test]
    fn test_unranked_has_no_division() {
        assert_eq!(rank_text(&Rank::unranked()), "UNRANKED");
    }

    #[test]
    fn test_disabled_cache_status() {
        colored::control::set_override(false);
        let output = format_cache_status(None, &[], &Theme::from_name("canvas"));
        assert!(output.contains("disabled"));
    }
}
