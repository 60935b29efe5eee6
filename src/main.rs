use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::{LevelFilter, info};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use toolscout::catalog::{CatalogSnapshot, CatalogSource, CatalogStore, FetchRequest};
use toolscout::cli::Cli;
use toolscout::cli::commands::{Commands, QueryArgs};
use toolscout::config::Config;
use toolscout::domain::{CatalogEntry, EntryId, QueryState};
use toolscout::format::{format_date, format_number, rating_stars, summary_line};
use toolscout::projection::{project, rating_bucket, split_featured};
use toolscout::ScoutError;
use toolscout::tui::{self, App, AppState, TuiRunner};

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("toolscout")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("toolscout.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    let mut builder = env_logger::Builder::new();
    builder.filter_level(LevelFilter::Info);
    builder.parse_env("RUST_LOG");
    builder.target(env_logger::Target::Pipe(target)).init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

/// Config and `--verbose` may lower the level unless `RUST_LOG` is set
fn apply_log_level(cli: &Cli, config: &Config) {
    if std::env::var_os("RUST_LOG").is_some() {
        return;
    }
    let level = if cli.is_verbose() {
        Some(LevelFilter::Debug)
    } else {
        config.log_level.as_deref().and_then(|l| l.parse().ok())
    };
    if let Some(level) = level {
        log::set_max_level(level);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    apply_log_level(&cli, &config);
    if let Some(path) = &cli.file {
        config.use_file(path.clone());
    }
    if let Some(url) = &cli.api {
        config.use_api(url.clone());
    }

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    let source = config.source.build()?;
    info!("Using catalog source: {}", source.name());

    if cli.is_verbose() {
        eprintln!("{} {}", "Catalog source:".yellow(), source.name());
    }

    match &cli.command {
        None => run_tui(source, config).await,
        Some(Commands::List { query, json }) => handle_list_command(source.as_ref(), query, *json, config).await,
        Some(Commands::Categories) => handle_categories_command(source.as_ref()).await,
        Some(Commands::Show { id }) => handle_show_command(source.as_ref(), id).await,
    }
}

async fn run_tui(source: Arc<dyn CatalogSource>, config: &Config) -> Result<()> {
    info!("Launching TUI mode");
    let identity = Arc::new(config.identity.provider()?);

    let query = QueryState {
        sort: config.browse.default_sort,
        ..QueryState::default()
    };
    let mut state = AppState::new(query, source.name(), source.filters_server_side());
    state.featured = config.browse.featured.clone();

    let terminal = tui::init_terminal()?;
    let mut runner = TuiRunner::new(terminal, App::new(state), source, identity, config.browse.tick_rate_ms);
    let result = runner.run().await;
    tui::restore_terminal()?;
    result
}

/// Load the whole catalog, or the server-side slice of it for `request`
async fn load_store(source: &dyn CatalogSource, request: &FetchRequest) -> Result<CatalogStore> {
    let entries = source.fetch_entries(request).await?;
    Ok(CatalogStore::from_entries(entries)?)
}

async fn handle_list_command(source: &dyn CatalogSource, args: &QueryArgs, json: bool, config: &Config) -> Result<()> {
    let query = args.to_query(config.browse.default_sort)?;
    info!("Listing catalog with query: {:?}", query);

    let request = if source.filters_server_side() {
        FetchRequest::new(query.category.clone(), query.sort)
    } else {
        FetchRequest::default()
    };
    let CatalogSnapshot {
        store,
        categories,
        problems,
    } = CatalogSnapshot::load(source, &request).await;
    for problem in &problems {
        eprintln!("{} {}", "warning:".yellow(), problem);
    }

    let visible = project(store.entries(), &query);

    if json {
        println!("{}", serde_json::to_string_pretty(&visible)?);
        return Ok(());
    }

    let (featured, rest) = split_featured(&visible, &config.browse.featured);
    if !featured.is_empty() {
        println!("{}", "Featured".bold().yellow());
        for entry in &featured {
            println!("  {}", summary_line(entry));
        }
        println!();
    }
    for entry in &rest {
        println!("  {}", summary_line(entry));
    }

    println!(
        "\n{} of {} tools across {} categories",
        visible.len().to_string().green(),
        store.len(),
        categories.len()
    );
    Ok(())
}

async fn handle_categories_command(source: &dyn CatalogSource) -> Result<()> {
    let categories = source.list_categories().await.unwrap_or_else(|e| {
        log::warn!("Category list from {} unavailable: {}", source.name(), e);
        eprintln!("{} {}", "warning:".yellow(), e);
        Vec::new()
    });
    for category in categories {
        println!("{}", category);
    }
    Ok(())
}

async fn handle_show_command(source: &dyn CatalogSource, id: &str) -> Result<()> {
    let store = load_store(source, &FetchRequest::default()).await?;
    let entry = store
        .get(&EntryId::new(id))
        .ok_or_else(|| ScoutError::EntryNotFound(id.to_string()))?;
    print_entry(entry);
    Ok(())
}

fn print_entry(entry: &CatalogEntry) {
    let rating = rating_bucket(entry.stars);
    println!("{} {}", entry.name.bold().cyan(), format!("({})", entry.id).dimmed());
    println!("{}  {}", entry.category, entry.pricing.label().green());
    if !entry.description.is_empty() {
        println!("\n{}\n", entry.description);
    }
    println!("{} {} {:.1}", format!("{:<10}", "Rating").dimmed(), rating_stars(rating), rating);
    println!(
        "{} {}  forks {}  downloads {}",
        format!("{:<10}", "Stars").dimmed(),
        format_number(entry.stars),
        format_number(entry.forks),
        format_number(entry.downloads)
    );
    println!(
        "{} {}  updated {}",
        format!("{:<10}", "Added").dimmed(),
        format_date(entry.created_at),
        format_date(entry.last_updated)
    );
    if let Some(license) = &entry.license {
        println!("{} {}", format!("{:<10}", "License").dimmed(), license);
    }
    if !entry.url.is_empty() {
        println!("{} {}", format!("{:<10}", "Website").dimmed(), entry.url);
    }
    if let Some(repo) = &entry.repo_url {
        println!("{} {}", format!("{:<10}", "Repo").dimmed(), repo);
    }
}
