//! TrendScope — keyword importance scoring over document batches.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Days, NaiveDate, Utc};
use tracing::info;
use tracing_subscriber::EnvFilter;

use trendscope_core::EngineConfig;
use trendscope_runtime::BatchOrchestrator;
use trendscope_store::{NewDocument, SqliteStore};

fn resolve_data_dir() -> PathBuf {
    std::env::var("TRENDSCOPE_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let exe_dir = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()));
            if let Some(dir) = exe_dir {
                let parent_data = dir.join("../data");
                if parent_data.exists() {
                    return parent_data;
                }
            }
            PathBuf::from("data")
        })
}

fn print_help() {
    println!("TrendScope — keyword importance scoring engine");
    println!();
    println!("Usage: trendscope <command> [args]");
    println!();
    println!("Commands:");
    println!("  ingest <file> [type] [name]              Store documents from a JSON array");
    println!("  process [limit] [team]                   Score unprocessed documents as one batch");
    println!("  top [team] [date] [limit] [min]          Top keywords for a team and date");
    println!("  history <keyword> [team] [start] [end]   A keyword's daily records");
    println!("  timeseries <keyword> [team] [days]       Rebuild and print a keyword's series");
    println!("  stats                                    Store statistics");
    println!("  help                                     Show this help message");
}

fn open_store(config: &EngineConfig) -> anyhow::Result<Arc<SqliteStore>> {
    let store = SqliteStore::open(&config.data_paths.db)
        .map_err(|e| anyhow::anyhow!("Failed to open store: {}", e))?;
    Ok(Arc::new(store))
}

fn parse_date(arg: Option<&String>) -> anyhow::Result<NaiveDate> {
    match arg {
        Some(s) => Ok(s.parse()?),
        None => Ok(Utc::now().date_naive()),
    }
}

fn cmd_ingest(config: &EngineConfig, args: &[String]) -> anyhow::Result<()> {
    let path = args
        .first()
        .ok_or_else(|| anyhow::anyhow!("Usage: trendscope ingest <file> [type] [name]"))?;
    let source_type = args.get(1).map(String::as_str).unwrap_or("file");
    let source_name = args.get(2).map(String::as_str).unwrap_or("inbox");

    let raw = std::fs::read_to_string(path)?;
    let docs: Vec<NewDocument> = serde_json::from_str(&raw)?;

    let store = open_store(config)?;
    let report = store.save_documents(&docs, source_type, source_name)?;
    info!(
        "Ingested {}: {} saved, {} duplicates",
        path, report.saved, report.duplicates
    );
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn cmd_process(config: &EngineConfig, args: &[String]) -> anyhow::Result<()> {
    let limit: usize = match args.first() {
        Some(s) => s.parse()?,
        None => 500,
    };
    let team_key = args.get(1).map(String::as_str).unwrap_or("default");

    let store = open_store(config)?;
    let mut orchestrator = BatchOrchestrator::new(store, config.into());
    let report = orchestrator.run(limit, team_key)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn cmd_top(config: &EngineConfig, args: &[String]) -> anyhow::Result<()> {
    let team_key = args.first().map(String::as_str).unwrap_or("default");
    let date = parse_date(args.get(1))?;
    let limit: usize = match args.get(2) {
        Some(s) => s.parse()?,
        None => 20,
    };
    let min_importance: f64 = match args.get(3) {
        Some(s) => s.parse()?,
        None => 0.0,
    };

    let store = open_store(config)?;
    let records = store.top_keywords(team_key, date, limit, min_importance)?;
    let reports: Vec<_> = records.iter().map(|r| r.to_report()).collect();
    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(())
}

fn cmd_history(config: &EngineConfig, args: &[String]) -> anyhow::Result<()> {
    let keyword = args
        .first()
        .ok_or_else(|| anyhow::anyhow!("Usage: trendscope history <keyword> [team] [start] [end]"))?;
    let team_key = args.get(1).map(String::as_str).unwrap_or("default");
    let end = parse_date(args.get(3))?;
    let start = match args.get(2) {
        Some(s) => s.parse()?,
        None => end.checked_sub_days(Days::new(30)).unwrap_or(end),
    };

    let store = open_store(config)?;
    let records = store.importance_history(keyword, team_key, start, end)?;
    let reports: Vec<_> = records.iter().map(|r| r.to_report()).collect();
    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(())
}

fn cmd_timeseries(config: &EngineConfig, args: &[String]) -> anyhow::Result<()> {
    let keyword = args
        .first()
        .ok_or_else(|| anyhow::anyhow!("Usage: trendscope timeseries <keyword> [team] [days]"))?;
    let team_key = args.get(1).map(String::as_str).unwrap_or("default");
    let days: u32 = match args.get(2) {
        Some(s) => s.parse()?,
        None => config.history_days,
    };

    let store = open_store(config)?;
    let series = store.compute_timeseries(keyword, team_key, days, Utc::now().date_naive())?;
    println!("{}", serde_json::to_string_pretty(&series)?);
    Ok(())
}

fn cmd_stats(config: &EngineConfig) -> anyhow::Result<()> {
    let store = open_store(config)?;
    println!("{}", serde_json::to_string_pretty(&store.stats()?)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(String::as_str).unwrap_or("help");

    if matches!(command, "--help" | "-h" | "help") {
        print_help();
        return Ok(());
    }

    let data_dir = resolve_data_dir();
    info!("Data directory: {}", data_dir.display());
    let config = EngineConfig::from_env(&data_dir)?;

    let rest = &args[2..];
    match command {
        "ingest" => cmd_ingest(&config, rest),
        "process" => cmd_process(&config, rest),
        "top" => cmd_top(&config, rest),
        "history" => cmd_history(&config, rest),
        "timeseries" => cmd_timeseries(&config, rest),
        "stats" => cmd_stats(&config),
        other => {
            eprintln!("Unknown command: {}. Use 'trendscope help' for usage.", other);
            std::process::exit(1);
        }
    }
}
