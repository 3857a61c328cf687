use anyhow::{Context, Result};
use civic_core::catalog::Catalog;
use civic_core::filter::IssueFilter;
use civic_core::schema::{IssueRecord, IssueStatus};
use civic_core::scoring::{HealthBand, RankedEntry};
use civic_core::store::AppState;
use civic_core::timing::time_ago;
use clap::{Parser, Subcommand};
use schemars::schema_for;
use std::fs;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "fixmycity")]
#[command(about = "FixMyCity civic issue and leaderboard CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export canonical JSON Schemas to the ./schemas directory
    Schema {
        #[command(subcommand)]
        command: SchemaCommands,
    },
    /// Write one seeded demo issue per catalog city
    Seed {
        #[arg(long)]
        out: PathBuf,
        /// Seed for the random generator (same seed, same data)
        #[arg(long, default_value_t = 0)]
        rng_seed: u64,
        /// TOML or YAML city catalog (default: built-in Maharashtra list)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Print one city's civic health score
    Score {
        #[arg(long)]
        issues: PathBuf,
        #[arg(long)]
        city: String,
    },
    /// Print the ranked city leaderboard
    Leaderboard {
        #[arg(long)]
        issues: PathBuf,
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Only show cities whose name contains this term; ranks stay global
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Move an issue forward in its lifecycle and save the file
    Status {
        #[arg(long)]
        issues: PathBuf,
        #[arg(long)]
        id: String,
        /// reported, in_progress or fixed
        #[arg(long)]
        to: IssueStatus,
    },
    /// Build a Markdown vault of the leaderboard and city notes
    Vault {
        #[arg(long)]
        issues: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum SchemaCommands {
    /// Export JSON Schema files for canonical types
    Export {
        /// Output directory (default: ./schemas)
        #[arg(long, default_value = "schemas")]
        out_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fixmycity=info,civic_core=info,vault=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Schema { command } => match command {
            SchemaCommands::Export { out_dir } => schema_export(out_dir),
        },
        Commands::Seed { out, rng_seed, catalog } => seed(&out, rng_seed, catalog.as_deref()),
        Commands::Score { issues, city } => score(&issues, &city),
        Commands::Leaderboard {
            issues,
            catalog,
            search,
            json,
        } => leaderboard(&issues, catalog.as_deref(), search.as_deref(), json),
        Commands::Status { issues, id, to } => status(&issues, &id, to),
        Commands::Vault { issues, out, catalog } => write_vault(&issues, &out, catalog.as_deref()),
    }
}

fn schema_export(out_dir: PathBuf) -> Result<()> {
    fs::create_dir_all(&out_dir)?;

    let issue_schema = schema_for!(civic_core::schema::IssueRecord);
    fs::write(
        out_dir.join("IssueRecord.schema.json"),
        serde_json::to_string_pretty(&issue_schema)?,
    )?;

    let entry_schema = schema_for!(civic_core::schema::CityScoreEntry);
    fs::write(
        out_dir.join("CityScoreEntry.schema.json"),
        serde_json::to_string_pretty(&entry_schema)?,
    )?;

    let notification_schema = schema_for!(civic_core::schema::Notification);
    fs::write(
        out_dir.join("Notification.schema.json"),
        serde_json::to_string_pretty(&notification_schema)?,
    )?;

    let city_schema = schema_for!(civic_core::catalog::CityData);
    fs::write(
        out_dir.join("CityData.schema.json"),
        serde_json::to_string_pretty(&city_schema)?,
    )?;

    println!("Exported schemas to {}", out_dir.display());
    Ok(())
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    match path {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("loading catalog {}", path.display())),
        None => Ok(Catalog::maharashtra()),
    }
}

fn load_issues(path: &Path) -> Result<Vec<IssueRecord>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading issues {}", path.display()))?;
    let issues: Vec<IssueRecord> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing issues {}", path.display()))?;
    tracing::debug!(count = issues.len(), path = %path.display(), "issues loaded");
    Ok(issues)
}

fn save_issues(path: &Path, issues: &[IssueRecord]) -> Result<()> {
    fs::write(path, serde_json::to_string_pretty(issues)?)?;
    Ok(())
}

fn seed(out: &Path, rng_seed: u64, catalog: Option<&Path>) -> Result<()> {
    let count = seed_file(out, rng_seed, catalog, OffsetDateTime::now_utc())?;
    println!("Seeded {count} issues into {}", out.display());
    Ok(())
}

fn seed_file(out: &Path, rng_seed: u64, catalog: Option<&Path>, now: OffsetDateTime) -> Result<usize> {
    let catalog = load_catalog(catalog)?;
    let issues = AppState::seeded(&catalog, rng_seed, now).into_issues();
    save_issues(out, &issues)?;
    Ok(issues.len())
}

fn score(issues: &Path, city: &str) -> Result<()> {
    let state = AppState::new(load_issues(issues)?);
    let health = state.city_health(city);
    println!(
        "{city}: {}% ({} active, {} resolved)",
        health.score, health.active, health.resolved
    );

    let now = OffsetDateTime::now_utc();
    for issue in state.filtered_issues(&IssueFilter::for_city(city)) {
        if issue.status.is_resolved() {
            continue;
        }
        println!(
            "  - {} [{}] {} ({})",
            issue.issue_type.label(),
            issue.severity.label(),
            issue.status.label(),
            time_ago(&issue.created_at, now, state.language())?
        );
    }
    Ok(())
}

fn leaderboard(issues: &Path, catalog: Option<&Path>, search: Option<&str>, json: bool) -> Result<()> {
    let rows = leaderboard_rows(issues, catalog, search)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No cities found");
        return Ok(());
    }
    println!("{:<6} {:<40} {:>8} {:>9} {:>9}", "Rank", "City", "Health", "Resolved", "Reports");
    for row in rows {
        let band = match HealthBand::for_score(row.entry.civic_health_score) {
            HealthBand::Good => "good",
            HealthBand::Fair => "fair",
            HealthBand::Poor => "poor",
        };
        println!(
            "#{:<5} {:<40} {:>7}% {:>9} {:>9}  {band}",
            format!("{:02}", row.rank),
            row.entry.city,
            row.entry.civic_health_score,
            row.entry.resolved_issues,
            row.entry.total_issues
        );
    }
    Ok(())
}

/// Full-table ranks, even when `search` narrows the rows.
fn leaderboard_rows(issues: &Path, catalog: Option<&Path>, search: Option<&str>) -> Result<Vec<RankedEntry>> {
    let catalog = load_catalog(catalog)?;
    let state = AppState::new(load_issues(issues)?);
    let board = state.leaderboard(&catalog.city_names());
    Ok(match search {
        Some(term) => board.search(term),
        None => board.ranked(),
    })
}

fn status(issues: &Path, id: &str, to: IssueStatus) -> Result<()> {
    let updated = apply_status(issues, id, to, OffsetDateTime::now_utc())?;
    println!("{} is now {}", updated.id, updated.status.label());
    Ok(())
}

/// The file is rewritten only after the transition is accepted.
fn apply_status(issues: &Path, id: &str, to: IssueStatus, now: OffsetDateTime) -> Result<IssueRecord> {
    let mut state = AppState::new(load_issues(issues)?);
    let updated = state.update_status(id, to, now)?.clone();
    save_issues(issues, state.issues())?;
    Ok(updated)
}

fn write_vault(issues: &Path, out: &Path, catalog: Option<&Path>) -> Result<()> {
    let paths = build_vault_from_files(issues, out, catalog, OffsetDateTime::now_utc())?;
    println!("Vault written to {}", paths.root.display());
    Ok(())
}

fn build_vault_from_files(
    issues: &Path,
    out: &Path,
    catalog: Option<&Path>,
    now: OffsetDateTime,
) -> Result<vault::VaultPaths> {
    let catalog = load_catalog(catalog)?;
    let state = AppState::new(load_issues(issues)?);
    let board = state.leaderboard(&catalog.city_names());
    vault::build_vault(out, &board, state.issues(), now)
}
