use std::path::PathBuf;

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};

mod config;
mod error;
mod models;
mod progress;
mod report;
mod store;
mod transition;

use config::{Backend, Config, LogFormat, StoreSettings};
use error::StoreError;
use models::{Idea, NewIdea, Priority, ProjectProgress, ProjectStatus};
use store::{IdeaStore, PgIdeaStore};

#[derive(Parser)]
#[command(name = "idea-progress")]
#[command(about = "Track ideas through the innovation pipeline", long_about = None)]
struct Cli {
    /// Overrides IDEA_STORE_BACKEND
    #[arg(long, global = true, value_enum)]
    backend: Option<Backend>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load sample ideas into the database
    Seed,
    /// Import ideas from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// List derived project progress
    List {
        #[arg(long, default_value = progress::ALL)]
        category: String,
        #[arg(long, default_value = progress::ALL)]
        status: String,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Show aggregate statistics
    Stats {
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Generate a markdown report
    Report {
        #[arg(long, default_value = progress::ALL)]
        category: String,
        #[arg(long, default_value = progress::ALL)]
        status: String,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Show one project with its milestones
    Show { id: String },
    /// Submit a new idea
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value_t = Priority::Medium)]
        priority: Priority,
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long, default_value = "")]
        assigned_to: String,
        #[arg(long)]
        due: Option<NaiveDate>,
    },
    /// Move a project to another status
    SetStatus { id: String, status: ProjectStatus },
    /// Upvote an idea
    Upvote { id: String },
    /// Delete an idea
    Delete { id: String },
}

fn init_tracing(format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

/// A failed fetch is reported and treated as an empty pipeline.
async fn load_ideas(store: &dyn IdeaStore) -> Vec<Idea> {
    match store.list_ideas().await {
        Ok(records) => records.into_iter().map(Idea::from_record).collect(),
        Err(err) => {
            tracing::error!(error = %err, backend = store.backend(), "failed to load ideas");
            eprintln!("Could not load ideas: {err}");
            Vec::new()
        }
    }
}

async fn load_projects(
    store: &dyn IdeaStore,
    category: &str,
    status: &str,
    today: NaiveDate,
) -> Vec<ProjectProgress> {
    let ideas = load_ideas(store).await;
    let projects = progress::derive_project_progress(&ideas, today);
    progress::filter_projects(&projects, category, status)
}

fn filter_label(category: &str, status: &str) -> Option<String> {
    match (category == progress::ALL, status == progress::ALL) {
        (true, true) => None,
        (false, true) => Some(format!("category {category}")),
        (true, false) => Some(format!("status {status}")),
        (false, false) => Some(format!("category {category}, status {status}")),
    }
}

async fn open_postgres(
    settings: &StoreSettings,
    operation: &'static str,
) -> anyhow::Result<PgIdeaStore> {
    match settings {
        StoreSettings::Postgres {
            database_url,
            max_connections,
        } => PgIdeaStore::connect(database_url, *max_connections)
            .await
            .context("failed to connect to Postgres"),
        StoreSettings::Memory => Err(StoreError::unsupported("memory", operation).into()),
        StoreSettings::Http { .. } => Err(StoreError::unsupported("http", operation).into()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env().context("invalid configuration")?;
    init_tracing(config.log_format);

    let settings = config
        .store_settings(cli.backend)
        .context("invalid store configuration")?;
    let today = Utc::now().date_naive();

    match &cli.command {
        Commands::InitDb => {
            open_postgres(&settings, "init-db").await?.init_schema().await?;
            println!("Schema ready.");
            return Ok(());
        }
        Commands::Seed => {
            let inserted = open_postgres(&settings, "seed").await?.seed().await?;
            println!("Inserted {inserted} sample ideas.");
            return Ok(());
        }
        Commands::Import { csv } => {
            let inserted = open_postgres(&settings, "import")
                .await?
                .import_csv(csv)
                .await
                .with_context(|| format!("failed to import {}", csv.display()))?;
            println!("Inserted {inserted} ideas from {}.", csv.display());
            return Ok(());
        }
        _ => {}
    }

    let store = store::open(&settings)
        .await
        .context("failed to open idea store")?;
    let store = store.as_ref();

    match cli.command {
        Commands::InitDb | Commands::Seed | Commands::Import { .. } => {}
        Commands::List {
            category,
            status,
            format,
        } => {
            let projects = load_projects(store, &category, &status, today).await;
            match format {
                OutputFormat::Table => print!("{}", report::render_table(&projects, today)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&projects)?),
            }
        }
        Commands::Stats { format } => {
            let projects = load_projects(store, progress::ALL, progress::ALL, today).await;
            let stats = progress::compute_aggregates(&projects, today);
            match format {
                OutputFormat::Table => print!("{}", report::render_stats(&stats)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
            }
        }
        Commands::Report {
            category,
            status,
            out,
        } => {
            let projects = load_projects(store, &category, &status, today).await;
            let report = report::build_report(
                filter_label(&category, &status).as_deref(),
                today,
                &projects,
            );
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
        Commands::Show { id } => {
            let idea = Idea::from_record(store.get_idea(&id).await?);
            let project = progress::derive_project(&idea, today);
            print!("{}", report::render_project(&project, today));
        }
        Commands::Add {
            title,
            description,
            priority,
            tags,
            assigned_to,
            due,
        } => {
            let created = store
                .create_idea(&NewIdea {
                    title,
                    description,
                    priority,
                    tags,
                    assigned_to,
                    due_date: due,
                })
                .await?;
            let project = progress::derive_project(&Idea::from_record(created), today);
            tracing::info!(id = %project.id, "idea created");
            println!("Created {} ({}).", project.title, project.id);
        }
        Commands::SetStatus { id, status } => {
            let idea = Idea::from_record(store.get_idea(&id).await?);
            let current = progress::map_idea_status(&idea.status);
            let change = transition::plan_status_change(current, status)?;

            if change.collapsed {
                tracing::warn!(
                    %id,
                    requested = %status,
                    "no backing idea status for this state; storing it as {}",
                    change.idea_status
                );
            }

            let updated = store.update_idea_status(&id, &change.idea_status).await?;
            let project = progress::derive_project(&Idea::from_record(updated), today);
            tracing::info!(%id, from = %current, to = %project.status, "status updated");
            println!(
                "{} is now {} ({}%).",
                project.title, project.status, project.progress
            );
        }
        Commands::Upvote { id } => {
            let idea = Idea::from_record(store.upvote_idea(&id).await?);
            println!("{} now has {} upvotes.", idea.title, idea.upvotes);
        }
        Commands::Delete { id } => {
            store.delete_idea(&id).await?;
            tracing::info!(%id, "idea deleted");
            println!("Deleted {id}.");
        }
    }

    Ok(())
}
