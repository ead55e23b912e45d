//! bounded-fetch
//!
//! Demonstrates bounding outbound calls with deadlines and cooperative
//! cancellation.
//!
//! # Architecture Overview
//!
//! ```text
//!   main ──▶ Aggregator ──▶ BoundedOperation (× N, one task each)
//!                │                 │
//!                │                 ├─ stage delay   ┐
//!                │                 ├─ Fetcher (GET) ├─ raced against deadline + token
//!                │                 └─ Decoder       ┘
//!                ▼
//!           BatchResult { records, errors, pending }
//! ```
//!
//! # Scenarios
//! - `single`: one request whose artificial delay exceeds its deadline
//! - `batch`: concurrent requests sharing one deadline
//! - `demo` (default): both, separated by a rule

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::time::Instant;

use bounded_fetch::config::{load_config, validate_config, ConfigError, DemoConfig};
use bounded_fetch::display;
use bounded_fetch::fetch::{HttpFetcher, JsonDecoder, Todo};
use bounded_fetch::lifecycle::{signals::spawn_signal_listener, Shutdown};
use bounded_fetch::observability::init_tracing;
use bounded_fetch::operation::{Aggregator, BoundedOperation, PendingPolicy};
use bounded_fetch::resilience::Deadline;

type TodoOperation = BoundedOperation<HttpFetcher, JsonDecoder<Todo>>;

#[derive(Parser)]
#[command(name = "bounded-fetch")]
#[command(about = "Fetch todos under deadlines and cooperative cancellation", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the endpoint base URL.
    #[arg(long)]
    base_url: Option<String>,

    /// Override the artificial delay before each request.
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Override the single-request deadline.
    #[arg(long)]
    single_timeout_ms: Option<u64>,

    /// Override the batch deadline.
    #[arg(long)]
    batch_timeout_ms: Option<u64>,

    /// Override the batch identifiers (comma separated).
    #[arg(long, value_delimiter = ',')]
    ids: Option<Vec<u64>>,

    /// Report requests still pending at the batch deadline as cancelled.
    #[arg(long)]
    report_pending: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// One request that outlives its deadline
    Single,
    /// Concurrent requests sharing one deadline
    Batch,
    /// Both scenarios
    Demo,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    init_tracing(&config.logging);
    tracing::info!("bounded-fetch v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        base_url = %config.endpoint.base_url,
        stage_delay_ms = config.scenario.stage_delay_ms,
        single_timeout_ms = config.scenario.single_timeout_ms,
        batch_timeout_ms = config.scenario.batch_timeout_ms,
        "Configuration loaded"
    );

    let fetcher = HttpFetcher::new(&config.endpoint.base_url)?;
    tracing::debug!(base_url = %fetcher.base_url(), "Fetcher ready");
    let operation = BoundedOperation::new(fetcher, JsonDecoder::<Todo>::new());

    let shutdown = Shutdown::new();
    let signals = spawn_signal_listener(shutdown.clone());

    match cli.command.unwrap_or(Commands::Demo) {
        Commands::Single => single_request(&operation, &config, &shutdown).await,
        Commands::Batch => concurrent_requests(operation, &config, &shutdown).await,
        Commands::Demo => {
            single_request(&operation, &config, &shutdown).await;
            tracing::info!("\n{}\n", display::separator());
            concurrent_requests(operation, &config, &shutdown).await;
        }
    }

    shutdown.trigger();
    let _ = signals.await;
    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<DemoConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => DemoConfig::default(),
    };

    if let Some(base_url) = &cli.base_url {
        config.endpoint.base_url = base_url.clone();
    }
    if let Some(delay_ms) = cli.delay_ms {
        config.scenario.stage_delay_ms = delay_ms;
    }
    if let Some(timeout_ms) = cli.single_timeout_ms {
        config.scenario.single_timeout_ms = timeout_ms;
    }
    if let Some(timeout_ms) = cli.batch_timeout_ms {
        config.scenario.batch_timeout_ms = timeout_ms;
    }
    if let Some(ids) = &cli.ids {
        config.scenario.batch_ids = ids.clone();
    }
    if cli.report_pending {
        config.scenario.report_pending = true;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

async fn single_request(operation: &TodoOperation, config: &DemoConfig, shutdown: &Shutdown) {
    let scenario = &config.scenario;
    tracing::info!("=== Example 1: Single Request with Timeout ===");
    tracing::info!(
        "This example demonstrates a request that will time out after {:?}",
        scenario.single_timeout()
    );
    tracing::info!(
        "The request has an artificial {:?} delay to ensure timeout",
        scenario.stage_delay()
    );

    tracing::info!("Starting request...");
    let start = Instant::now();
    let deadline = Deadline::after(scenario.single_timeout());
    let outcome = operation
        .run(
            scenario.single_id,
            scenario.stage_delay(),
            deadline,
            &shutdown.subscribe(),
        )
        .await;

    display::report_single(&outcome, start.elapsed());
}

async fn concurrent_requests(operation: TodoOperation, config: &DemoConfig, shutdown: &Shutdown) {
    let scenario = &config.scenario;
    tracing::info!("=== Example 2: Multiple Concurrent Requests ===");
    tracing::info!(
        "This example shows multiple concurrent requests with a {:?} timeout",
        scenario.batch_timeout()
    );

    let policy = if scenario.report_pending {
        PendingPolicy::ReportCancelled
    } else {
        PendingPolicy::Omit
    };
    let aggregator = Aggregator::new(operation)
        .stage_delay(scenario.stage_delay())
        .stage_jitter(scenario.stage_jitter())
        .pending_policy(policy);

    tracing::info!("Fetching {} todos concurrently...", scenario.batch_ids.len());
    let start = Instant::now();
    let deadline = Deadline::after(scenario.batch_timeout());
    let batch = aggregator
        .run_all(&scenario.batch_ids, deadline, &shutdown.subscribe())
        .await;

    display::report_batch(&batch, start.elapsed(), config.display.title_width);
}
