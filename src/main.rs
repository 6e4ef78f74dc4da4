use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

mod calendar;
mod config;
mod critical;
mod dashboard;
mod db;
mod directory;
mod feed;
mod i18n;
mod models;
mod notify;
mod report;
mod score;
mod trend;

use crate::config::Source;
use crate::i18n::Language;
use crate::notify::LogNotifier;
use crate::score::ScoreCalculator;

#[derive(Parser)]
#[command(name = "inspection-dashboard")]
#[command(about = "Compliance dashboard over inspection reports and incident disclosures", long_about = None)]
struct Cli {
    /// JSON snapshot of reports, CDRs, locations, forms, zones and users
    #[arg(long, global = true, env = "DASHBOARD_SNAPSHOT")]
    snapshot: Option<PathBuf>,
    #[arg(long, global = true, env = "DASHBOARD_LANGUAGE", value_enum, default_value_t = Language::En)]
    language: Language,
    /// Anchor date for monthly windows and the trend series (defaults to today)
    #[arg(long, global = true)]
    today: Option<NaiveDate>,
    /// Seed for the forecast overlay
    #[arg(long, global = true)]
    seed: Option<u64>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Markdown,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the manager dashboard
    Dashboard {
        #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
        format: OutputFormat,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List every critical report
    Critical {
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Show the merged activity feed
    Feed {
        #[arg(long, default_value_t = feed::FEED_LIMIT)]
        limit: usize,
    },
    /// Show the thirty-day compliance trend
    Trend,
    /// Warn the inspector responsible for a report
    Warn {
        #[arg(long)]
        report: Uuid,
    },
}

fn emit(output: &str, out: Option<&Path>) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            std::fs::write(path, output)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Report written to {}.", path.display());
        }
        None => print!("{output}"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let source = Source::resolve(cli.snapshot, std::env::var("DATABASE_URL").ok())?;
    let snapshot = source.load().await?;
    let calculator = ScoreCalculator::new(&snapshot);
    let today = config::resolve_today(cli.today);
    let language = cli.language;
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    match cli.command {
        Commands::Dashboard { format, out } => {
            let stats = dashboard::aggregate(&calculator, today, language);
            let trend = trend::trend_series(&calculator, today, stats.overall_compliance, &mut rng);
            let view = report::DashboardView {
                generated_for: today,
                language,
                stats,
                trend,
                activity_feed: feed::activity_feed(&snapshot.reports, &snapshot.cdrs, feed::FEED_LIMIT),
            };
            let output = match format {
                OutputFormat::Markdown => report::build_dashboard(&view, &calculator),
                OutputFormat::Json => {
                    let mut json = serde_json::to_string_pretty(&view)
                        .context("failed to serialize dashboard")?;
                    json.push('\n');
                    json
                }
            };
            emit(&output, out.as_deref())?;
        }
        Commands::Critical { csv, out } => {
            let issues = critical::critical_issues(&calculator, language);
            if let Some(path) = csv {
                let file = std::fs::File::create(&path)
                    .with_context(|| format!("failed to create {}", path.display()))?;
                critical::write_csv(file, &issues)?;
                println!("Wrote {} critical issues to {}.", issues.len(), path.display());
            } else {
                emit(&report::build_critical_page(&issues, language), out.as_deref())?;
            }
        }
        Commands::Feed { limit } => {
            let entries = feed::activity_feed(&snapshot.reports, &snapshot.cdrs, limit);
            if entries.is_empty() {
                println!("No recent activity.");
                return Ok(());
            }
            for entry in &entries {
                println!("- {}", report::feed_line(entry, &calculator, language));
            }
        }
        Commands::Trend => {
            let stats = dashboard::aggregate(&calculator, today, language);
            let points = trend::trend_series(&calculator, today, stats.overall_compliance, &mut rng);
            print!("{}", report::build_trend(&points));
        }
        Commands::Warn { report } => {
            let notice = notify::send_report_warning(&snapshot, &LogNotifier, report, language)?;
            println!("{}", notice.message);
        }
    }

    Ok(())
}
