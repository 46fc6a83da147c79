//! Seed a storefront database with referentially consistent sample data.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use ortho_config::OrthoConfig;
use storefront_backend::domain::ports::StorefrontStore;
use storefront_backend::domain::{RunError, RunOutcome, StorefrontSeeder};
use storefront_backend::outbound::InMemoryStorefrontStore;
use storefront_backend::outbound::persistence::{
    DbPool, DieselStorefrontStore, MigrationError, PoolConfig, PoolError, run_pending_migrations,
};
use storefront_backend::seeding::SeedingSettings;
use storefront_data::{FakeValueProvider, RunRequest};
use thiserror::Error;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// `storefront-seed` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "storefront-seed",
    about = "Generate storefront sample data and commit it in one transaction",
    version
)]
struct CliArgs {
    /// Entity kind to generate; repeat for several. Defaults to every kind.
    #[arg(long = "kind", value_name = "name", default_value = "all")]
    kinds: Vec<String>,
    /// Number of records to generate for each selected kind.
    #[arg(long, value_name = "n", allow_negative_numbers = true)]
    count: i64,
    /// Seed for reproducible output. Overrides `STOREFRONT_SEED_SEED`.
    #[arg(long, value_name = "u64")]
    seed: Option<u64>,
    /// Database connection URL. Falls back to settings, then `DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
    /// Apply pending schema migrations before seeding.
    #[arg(long = "run-migrations")]
    run_migrations: bool,
    /// Generate against an empty in-memory store without connecting.
    #[arg(long = "dry-run")]
    dry_run: bool,
}

/// Failures that end the process with a non-zero status.
#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Arguments(#[from] clap::Error),
    #[error("load settings: {0}")]
    Settings(String),
    #[error("create Tokio runtime: {0}")]
    Runtime(#[source] io::Error),
    #[error(
        "database URL missing: set --database-url, STOREFRONT_SEED_DATABASE_URL or DATABASE_URL"
    )]
    MissingDatabaseUrl,
    #[error("create database pool: {0}")]
    Pool(#[from] PoolError),
    #[error(transparent)]
    Migration(#[from] MigrationError),
    #[error(transparent)]
    Run(#[from] RunError),
}

/// Effective options after applying CLI overrides to loaded settings.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SeedOptions {
    kinds: Vec<String>,
    count: i64,
    seed: Option<u64>,
    database_url: Option<String>,
    pool_max_size: Option<u32>,
    run_migrations: bool,
    dry_run: bool,
}

impl SeedOptions {
    fn resolve(args: CliArgs, settings: &SeedingSettings) -> Self {
        Self {
            kinds: args.kinds,
            count: args.count,
            seed: args.seed.or(settings.seed),
            database_url: args
                .database_url
                .filter(|url| !url.trim().is_empty())
                .or_else(|| settings.database_url()),
            pool_max_size: settings.pool_max_size,
            run_migrations: args.run_migrations || settings.run_migrations,
            dry_run: args.dry_run,
        }
    }
}

fn main() -> ExitCode {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    match run() {
        Ok(outcome) => {
            println!("{}", outcome.summary());
            ExitCode::SUCCESS
        }
        Err(CliError::Arguments(error)) => {
            // Help and version requests are not failures.
            let _ = error.print();
            if error.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<RunOutcome, CliError> {
    let args = CliArgs::try_parse()?;
    let settings = SeedingSettings::load_from_iter([OsString::from("storefront-seed")])
        .map_err(|error| CliError::Settings(error.to_string()))?;
    let options = SeedOptions::resolve(args, &settings);

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    runtime.block_on(async_main(options))
}

async fn async_main(options: SeedOptions) -> Result<RunOutcome, CliError> {
    // Reject bad requests before touching the database.
    let request = RunRequest::parse(&options.kinds, options.count).map_err(RunError::from)?;
    let mut provider = match options.seed {
        Some(seed) => FakeValueProvider::from_seed(seed),
        None => FakeValueProvider::from_entropy().map_err(RunError::from)?,
    };

    if options.dry_run {
        info!("dry run against an in-memory store");
        let store = Arc::new(InMemoryStorefrontStore::new());
        return seed(store, &request, &mut provider).await;
    }

    let database_url = options.database_url.ok_or(CliError::MissingDatabaseUrl)?;
    if options.run_migrations {
        let applied = run_pending_migrations(&database_url).await?;
        info!(applied, "schema migrations complete");
    }

    let mut config = PoolConfig::new(&database_url);
    if let Some(max_size) = options.pool_max_size {
        config = config.with_max_size(max_size);
    }
    let pool = DbPool::new(config).await?;
    seed(
        Arc::new(DieselStorefrontStore::new(pool)),
        &request,
        &mut provider,
    )
    .await
}

async fn seed<S: StorefrontStore>(
    store: Arc<S>,
    request: &RunRequest,
    provider: &mut FakeValueProvider,
) -> Result<RunOutcome, CliError> {
    let outcome = StorefrontSeeder::new(store).run(request, provider).await?;
    Ok(outcome)
}
