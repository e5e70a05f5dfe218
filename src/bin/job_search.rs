//! Job search CLI
//!
//! Runs one aggregated search across the configured sources and prints the
//! resulting page as JSON.
//!
//! # Usage
//!
//! ```bash
//! # Search everything with the default configuration
//! job-search
//!
//! # Seed the internal store and filter
//! job-search --seed demos/seed_jobs.json --country USA --min-salary 50000 --sort salary,desc
//!
//! # Internal store only
//! SOURCES_EXTERNAL_ENABLED=false job-search --seed demos/seed_jobs.json
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use job_aggregator::{
    config::CONFIG_PATH_ENV,
    sources::wiring::build_composite,
    AppConfig, InMemoryJobRepository, JobRepository, JobSearchCriteria, JobService, JobSource,
    NewJob, PageRequest,
};

#[derive(Parser)]
#[command(name = "job-search")]
#[command(version)]
#[command(about = "Search jobs across the internal store and external providers")]
struct Cli {
    /// Configuration file (defaults to config/aggregator.yaml when present)
    #[arg(long, env = CONFIG_PATH_ENV)]
    config: Option<PathBuf>,

    /// JSON file with an array of jobs to create in the internal store first
    #[arg(long)]
    seed: Option<PathBuf>,

    /// Case-insensitive title substring
    #[arg(long)]
    title: Option<String>,

    /// Country, matched case-insensitively
    #[arg(long)]
    country: Option<String>,

    #[arg(long)]
    min_salary: Option<Decimal>,

    #[arg(long)]
    max_salary: Option<Decimal>,

    #[arg(long)]
    skill: Option<String>,

    /// Zero-based page
    #[arg(long)]
    page: Option<i64>,

    /// Page size (1-100)
    #[arg(long)]
    size: Option<i64>,

    /// Sort as field[,asc|desc]; fields: title, company, country, salary, createdAt
    #[arg(long)]
    sort: Option<String>,
}

impl Cli {
    fn criteria(&self) -> JobSearchCriteria {
        JobSearchCriteria {
            title: self.title.clone(),
            country: self.country.clone(),
            min_salary: self.min_salary,
            max_salary: self.max_salary,
            skill: self.skill.clone(),
        }
    }

    fn page_request(&self) -> PageRequest {
        PageRequest {
            page: self.page,
            size: self.size,
            sort: self.sort.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "job_aggregator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load_from(cli.config.as_deref())?;
    config.apply_overrides(|key| std::env::var(key).ok())?;
    tracing::info!(
        internal = config.sources.internal.enabled,
        external = config.sources.external.enabled,
        external_url = %config.sources.external.base_url,
        "Configuration loaded"
    );

    let repository: Arc<dyn JobRepository> = Arc::new(InMemoryJobRepository::new());
    let composite = build_composite(&config, Arc::clone(&repository))?;
    let source: Arc<dyn JobSource> = Arc::new(composite);
    let service = JobService::new(repository, source);

    if let Some(seed) = &cli.seed {
        let created = seed_jobs(&service, seed).await?;
        tracing::info!(count = created, path = %seed.display(), "Seeded internal jobs");
    }

    let page = service
        .search_paged(Some(cli.criteria()), cli.page_request())
        .await?;

    println!("{}", serde_json::to_string_pretty(&page)?);
    Ok(())
}

async fn seed_jobs(service: &JobService, path: &Path) -> Result<usize> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))?;
    let jobs: Vec<NewJob> =
        serde_json::from_str(&content).with_context(|| format!("Parsing {}", path.display()))?;

    let count = jobs.len();
    for job in jobs {
        let title = job.title.clone();
        service
            .create(job)
            .await
            .with_context(|| format!("Creating seed job '{title}'"))?;
    }
    Ok(count)
}
