// Main entry point
use chrono::Datelike;
use clap::Parser;
use colored::Colorize;
use tft_recap::application::recap::year_in_review;
use tft_recap::domain::error::RecapError;
use tft_recap::domain::region::RiotId;
use tft_recap::infrastructure::config::{self, load_config, Config};
use tft_recap::interfaces::cli::{CacheAction, Cli, Command, ConfigAction};
use tft_recap::presentation::report;
use tft_recap::presentation::theme::Theme;
use tft_recap::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config()?;

    // Initialize logging
    if config.logging.enable {
        init_logging(&config.logging)?;
    }

    // Config generation needs no network or cache
    if let Command::Config {
        action: ConfigAction::Generate,
    } = cli.command
    {
        if let Err(e) = config::generate_config_sample() {
            fail(&e);
        }
        return Ok(());
    }

    let state = match AppState::new(config).await {
        Ok(state) => state,
        Err(e) => fail(&e),
    };

    // Setup graceful shutdown handler
    let result = tokio::select! {
        result = run(&cli, &state) => result,
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                eprintln!("Failed to listen for shutdown signal: {}", e);
            }
            eprintln!("\nInterrupted");
            std::process::exit(130);
        }
    };

    if let Err(e) = result {
        fail(&e);
    }
    Ok(())
}

fn fail(error: &RecapError) -> ! {
    eprintln!("{}", format!("✘ {}", error).red());
    if error.is_retriable_later() {
        eprintln!("{}", "Riot API is busy or unreachable, try again in a minute.".yellow());
    }
    std::process::exit(error.exit_code());
}

fn region_or_default(region: Option<&str>, config: &Config) -> String {
    region
        .unwrap_or(&config.default_region)
        .trim()
        .to_lowercase()
}

async fn run(cli: &Cli, state: &AppState) -> Result<(), RecapError> {
    let config = &state.config;
    let theme_name = cli.theme.as_deref().unwrap_or(config.theme.as_str());
    let theme = Theme::from_name(theme_name);

    match &cli.command {
        Command::Stats { name, region, year } => {
            let region = region_or_default(region.as_deref(), config);
            let year = year.unwrap_or_else(|| chrono::Utc::now().year());
            let stats = year_in_review(&state.resolver, name, &region, year).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print!("{}", report::format_stats(&stats, year, &theme, config.enable_emoji));
            }
        }
        Command::Summoner { name, region } => {
            let region = region_or_default(region.as_deref(), config);
            let riot_id = RiotId::parse(name, &region);
            let summoner = state
                .resolver
                .get_summoner_by_riot_id(&region, &riot_id)
                .await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summoner)?);
            } else {
                print!("{}", report::format_summoner(&summoner, &riot_id.to_string(), &theme));
            }
        }
        Command::Matches {
            puuid,
            region,
            count,
        } => {
            let region = region_or_default(region.as_deref(), config);
            let ids = state.resolver.list_match_ids(&region, puuid, *count).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&ids)?);
            } else {
                print!("{}", report::format_match_ids(&ids, &theme));
            }
        }
        Command::Cache { action } => run_cache(action, cli.json, state, &theme).await?,
        Command::Config { .. } => {}
    }

    Ok(())
}

async fn run_cache(
    action: &CacheAction,
    json: bool,
    state: &AppState,
    theme: &Theme,
) -> Result<(), RecapError> {
    let gateway = state.gateway();
    match action {
        CacheAction::Status => {
            let counts = gateway.table_counts().await?;
            if json {
                let map: serde_json::Map<String, serde_json::Value> = counts
                    .iter()
                    .map(|(table, count)| (table.to_string(), serde_json::json!(count)))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&map)?);
            } else {
                print!(
                    "{}",
                    report::format_cache_status(state.db_path.as_deref(), &counts, theme)
                );
            }
        }
        CacheAction::Clear => {
            let removed = gateway.purge_all().await;
            println!("{}", format!("✔ Removed {} cached entries", removed).green());
        }
        CacheAction::Cleanup => {
            let removed = gateway.cleanup_expired_match_lists().await;
            println!("{}", format!("✔ Removed {} expired match lists", removed).green());
        }
    }
    Ok(())
}

/// Initialize logging with path and level configuration
fn init_logging(logging: &config::Logging) -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    let level = match logging.level.to_uppercase().as_str() {
        "TRACE" => "trace",
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARN" => "warn",
        "ERROR" => "error",
        _ => "warn",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if let Some(path) = &logging.path {
        if !path.is_empty() {
            // Log to file
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(file)
                .with_ansi(false)
                .init();
            return Ok(());
        }
    }

    // Log to stderr (default)
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}
