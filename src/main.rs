//! CLI entry point for the MBTA next-train tool.
//!
//! With no arguments, asks for a line, stop and direction and prints the next
//! predicted departure. Subcommands expose the underlying catalog queries.

use anyhow::{Context, Result, ensure};
use clap::{Parser, Subcommand, ValueEnum};
use mbta_predict::filter::Constraints;
use mbta_predict::infra::mbta::{ClientConfig, DEFAULT_API_ROOT, MbtaClient};
use mbta_predict::predict::{Answers, predict_departure};
use mbta_predict::route_types::{RouteTypeSelection, filter_route_types};
use mbta_predict::selection::Console;
use mbta_predict::services::transit_api::{Route, TransitService};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "mbta_predict")]
#[command(about = "Find the next train leaving an MBTA stop", long_about = None)]
struct Cli {
    /// Base URL of the MBTA v3 API [default: $MBTA_API_ROOT or https://api-v3.mbta.com]
    #[arg(long, global = true)]
    api_root: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    timeout: u64,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Choose a line, stop and direction and show the next departure (default)
    Predict {
        /// Route categories to choose the line from, or "all" [default: LightRail,HeavyRail]
        #[arg(long, value_delimiter = ',')]
        route_types: Vec<String>,

        /// Line name to use instead of asking
        #[arg(long)]
        route: Option<String>,

        /// Stop name to use instead of asking
        #[arg(long)]
        stop: Option<String>,

        /// Destination to head toward instead of asking
        #[arg(long)]
        direction: Option<String>,
    },
    /// List catalog entries matching a set of filters
    List {
        #[arg(value_enum)]
        resource: Resource,

        /// Filters as a JSON object, e.g. '{"route": "Red", "type": ["0", "1"]}'
        #[arg(short, long)]
        filters: Option<String>,

        /// Maximum number of predictions to return (predictions only)
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// List the routes in the given categories
    RouteTypes {
        /// Category names (LightRail, HeavyRail, CommuterRail, Bus, Ferry) or "all"
        #[arg(default_value = "all")]
        categories: Vec<String>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Resource {
    Routes,
    Stops,
    Predictions,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/mbta_predict.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("mbta_predict.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    // stdout carries the prompts, so stderr only shows warnings by default
    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("warn".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let api_root = cli
        .api_root
        .or_else(|| std::env::var("MBTA_API_ROOT").ok())
        .unwrap_or_else(|| DEFAULT_API_ROOT.to_string());
    let config = ClientConfig::new()
        .with_api_root(api_root)
        .with_timeout(cli.timeout);
    debug!(api_root = %config.api_root, timeout = config.timeout_secs, "Client configured");

    let client = MbtaClient::new(config).context("Failed to create MBTA client")?;

    match cli.command {
        None => predict(&client, Answers::default()).await?,
        Some(Commands::Predict {
            route_types,
            route,
            stop,
            direction,
        }) => {
            let answers = Answers {
                route_types: route_type_selection(route_types),
                route,
                stop,
                direction,
            };
            predict(&client, answers).await?;
        }
        Some(Commands::List {
            resource,
            filters,
            limit,
        }) => {
            list_resources(&client, resource, filters.as_deref(), limit).await?;
        }
        Some(Commands::RouteTypes { categories }) => {
            let selection = RouteTypeSelection::from_names(categories);
            let routes = filter_route_types(&client, &selection).await?;
            print_routes(&routes);
        }
    }

    Ok(())
}

async fn predict<S: TransitService>(client: &S, answers: Answers) -> Result<()> {
    let mut console = Console::stdio();
    let report = predict_departure(client, &mut console, &answers).await?;
    info!(%report, "Departure lookup finished");
    Ok(())
}

/// `--route-types` left out means the rail default.
fn route_type_selection(names: Vec<String>) -> RouteTypeSelection {
    if names.is_empty() {
        RouteTypeSelection::default()
    } else {
        RouteTypeSelection::from_names(names)
    }
}

/// Only the predictions endpoint takes a page limit.
fn check_limit(resource: Resource, limit: Option<u32>) -> Result<()> {
    if let Some(limit) = limit {
        ensure!(
            matches!(resource, Resource::Predictions),
            "--limit {limit} only applies to predictions, not {resource:?}"
        );
    }
    Ok(())
}

/// Prints the entries of `resource` matching the JSON `filters`.
#[tracing::instrument(skip(client))]
async fn list_resources<S: TransitService>(
    client: &S,
    resource: Resource,
    filters: Option<&str>,
    limit: Option<u32>,
) -> Result<()> {
    check_limit(resource, limit)?;

    let constraints = match filters {
        Some(json) => {
            let value: serde_json::Value =
                serde_json::from_str(json).context("--filters must be a JSON object")?;
            Constraints::try_from(value)?
        }
        None => Constraints::new(),
    };

    match resource {
        Resource::Routes => print_routes(&client.list_routes(&constraints).await?),
        Resource::Stops => {
            let stops = client.list_stops(&constraints).await?;
            info!(total = stops.len(), "Stops fetched");
            for stop in &stops {
                println!("{}\t{}", stop.id, stop.name);
            }
        }
        Resource::Predictions => {
            let predictions = client.list_predictions(&constraints, limit).await?;
            info!(total = predictions.len(), "Predictions fetched");
            for prediction in &predictions {
                let departure = prediction
                    .departure_time
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "-".to_string());
                println!("{}\t{}", departure, prediction.direction_id);
            }
        }
    }

    Ok(())
}

fn print_routes(routes: &[Route]) {
    info!(total = routes.len(), "Routes fetched");
    for route in routes {
        println!(
            "{}\t{}\t{}\t{} / {}",
            route.id,
            route.long_name,
            route.route_type,
            route.direction_destinations[0],
            route.direction_destinations[1]
        );
    }
}
