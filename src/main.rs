use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use ingest_feeder::channel::ChannelBuilder;
use ingest_feeder::channel::config::{parse_channel_kv, parse_engine};
use ingest_feeder::dispatch::{DispatchConfig, EmptyRunPolicy, run_dispatch};
use ingest_feeder::logging;
use ingest_feeder::output::OutputWriter;
use ingest_feeder::roles::generator::{GeneratorConfig, run_generator};
use ingest_feeder::routing::RoutingTable;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ingest-feeder")]
#[command(about = "Synthetic record injection harness for ingestion nodes")]
struct Cli {
    /// Run ID for tagging outputs
    #[arg(long, default_value = "")]
    run_id: String,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Feed newline-delimited record files, one producer per file
    Feed {
        /// Routing config (JSON document with an address_map object)
        #[arg(long, default_value = "routing_config.json")]
        config: PathBuf,

        /// Logical node key to resolve
        #[arg(long)]
        node: String,

        /// Record source file (repeat for one producer per file)
        #[arg(long, required = true)]
        source: Vec<PathBuf>,

        /// Channel engine (tcp, mock)
        #[arg(long, default_value = "tcp")]
        engine: String,

        /// Per-send timeout (ms)
        #[arg(long, default_value = "5000")]
        timeout_ms: u64,

        /// Extra channel options as key=value
        #[arg(long = "channel-opt")]
        channel_opt: Vec<String>,

        /// Report a zero summary instead of failing when no source opens
        #[arg(long)]
        allow_empty: bool,

        /// Optional CSV summary file path (stdout if omitted)
        #[arg(long)]
        csv: Option<String>,
    },
    /// Generate synthetic userID/event records
    Gen {
        /// Routing config (JSON document with an address_map object)
        #[arg(long, default_value = "routing_config.json")]
        config: PathBuf,

        /// Logical node key to resolve
        #[arg(long)]
        node: String,

        /// Channel engine (tcp, mock)
        #[arg(long, default_value = "tcp")]
        engine: String,

        /// Per-send timeout (ms)
        #[arg(long, default_value = "5000")]
        timeout_ms: u64,

        /// Number of records to send
        #[arg(long, default_value = "10")]
        count: u64,

        /// Rate (msg/s). If omitted or <= 0, runs at max speed (no delay)
        #[arg(long, allow_hyphen_values = true)]
        rate: Option<f64>,

        /// First synthetic user id
        #[arg(long, default_value = "100")]
        user_base: u64,

        /// Extra channel options as key=value
        #[arg(long = "channel-opt")]
        channel_opt: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&cli.log_level)?;

    let run_id = if cli.run_id.is_empty() {
        uuid::Uuid::new_v4().to_string()
    } else {
        cli.run_id.clone()
    };
    println!("ingest-feeder starting with run_id: {}", run_id);

    match cli.command {
        Commands::Feed {
            config,
            node,
            source,
            engine,
            timeout_ms,
            channel_opt,
            allow_empty,
            csv,
        } => {
            let engine =
                parse_engine(&engine).ok_or_else(|| anyhow!("unknown engine '{}'", engine))?;
            let mut options = parse_channel_kv(&channel_opt);
            options
                .params
                .entry("timeout_ms".to_string())
                .or_insert(timeout_ms.to_string());

            let summary = run_dispatch(DispatchConfig {
                routing_config: config,
                node,
                sources: source,
                engine,
                options,
                empty_policy: if allow_empty {
                    EmptyRunPolicy::Degrade
                } else {
                    EmptyRunPolicy::Abort
                },
            })
            .await?;

            let mut output = match csv {
                Some(path) => OutputWriter::new_csv(path).await?,
                None => OutputWriter::new_stdout(),
            };
            output.write_summary(&summary).await?;

            println!("\nDispatch complete:");
            println!("  Attempted: {}", summary.attempted);
            println!("  Succeeded: {}", summary.succeeded);
            println!("  Failed: {}", summary.failed);
            println!("  Duration: {:.2}s", summary.elapsed.as_secs_f64());
            for failure in summary.failures() {
                println!(
                    "  failed {}:{} [{}] {}",
                    failure.source, failure.line, failure.kind, failure.message
                );
            }
            // Record failures are data, not process errors.
            Ok(())
        }
        Commands::Gen {
            config,
            node,
            engine,
            timeout_ms,
            count,
            rate,
            user_base,
            channel_opt,
        } => {
            let engine =
                parse_engine(&engine).ok_or_else(|| anyhow!("unknown engine '{}'", engine))?;
            let mut options = parse_channel_kv(&channel_opt);
            options
                .params
                .entry("timeout_ms".to_string())
                .or_insert(timeout_ms.to_string());

            let table = RoutingTable::load(&config).await?;
            let address = table.resolve(&node)?.to_string();
            println!("Resolved node {} -> {}", node, address);

            let channel = ChannelBuilder::open(engine, &address, options).await?;
            let report = run_generator(
                GeneratorConfig {
                    count,
                    rate: rate.filter(|r| *r > 0.0),
                    user_base,
                },
                channel.clone(),
            )
            .await;
            if let Err(err) = channel.shutdown().await {
                tracing::debug!(%err, "channel shutdown failed");
            }

            println!(
                "\nGenerator complete: sent {}, errors {}",
                report.sent, report.errors
            );
            Ok(())
        }
    }
}
