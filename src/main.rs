use analytics::analyze_periods;
use clap::{Parser, Subcommand};
use comfy_table::Table;
use core_types::{PeriodType, Trade};
use std::net::SocketAddr;
use std::path::PathBuf;

/// The main entry point for the forex-lab trading journal.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => handle_serve(args).await,
        Commands::Report(args) => handle_report(args),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A forex trading journal with rule-compliance tracking and analytics.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the journal's JSON API server.
    Serve(ServeArgs),
    /// Print a period-analysis table for a JSON file of trades.
    Report(ReportArgs),
}

#[derive(Parser)]
struct ServeArgs {
    /// Path to the configuration file.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Seed the journal with demo data at startup, regardless of config.
    #[arg(long)]
    seed_demo: bool,
}

#[derive(Parser)]
struct ReportArgs {
    /// Path to a JSON array of trades (e.g. data/demo-trades.json).
    #[arg(long, default_value = "data/demo-trades.json")]
    input: PathBuf,

    /// Bucket granularity: day, week, month, quarter, half, year.
    /// Parsed through `PeriodType`'s `FromStr`.
    #[arg(long, default_value = "month")]
    period: PeriodType,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = configuration::load_config(&args.config)?;
    tracing::info!(config = %args.config.display(), "Loaded configuration.");

    let repo = store::JournalRepository::new();
    if args.seed_demo || config.journal.seed_demo {
        store::seed_demo(&repo).await;
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    web_server::run_server(addr, repo).await
}

fn handle_report(args: ReportArgs) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(&args.input)?;
    let mut trades: Vec<Trade> = serde_json::from_str(&raw)?;
    trades.sort_by_key(|t| t.entry_time);

    let analysis = analyze_periods(&trades, args.period);

    let mut table = Table::new();
    table.set_header(vec![
        "Period",
        "Trades",
        "Wins",
        "Losses",
        "Win rate %",
        "Total RR",
        "Expectancy",
        "Profit factor",
    ]);
    for (key, pm) in &analysis {
        let m = &pm.metrics;
        table.add_row(vec![
            key.clone(),
            m.total_trades.to_string(),
            m.wins.to_string(),
            m.losses.to_string(),
            m.win_rate.to_string(),
            m.total_rr.to_string(),
            m.expectancy.to_string(),
            m.profit_factor.to_string(),
        ]);
    }

    println!("{table}");
    Ok(())
}
