use clap::{Parser, Subcommand};
use tracing::error;

use xdm_bridge::app::pipeline_use_case::PipelineRunner;
use xdm_bridge::config::Config;
use xdm_bridge::infra::output_store::ObjectStoreWriter;
use xdm_bridge::infra::platform_client::PlatformClient;
use xdm_bridge::infra::row_source::ObjectStoreRowSource;
use xdm_bridge::payload::IngestPayload;
use xdm_bridge::records::RawRecord;
use xdm_bridge::{logging, tasks, validate};

#[derive(Parser)]
#[command(name = "xdm_bridge")]
#[command(about = "Warehouse-to-CDP ingestion bridge")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: fetch, validate, ingest, read back, persist
    Run {
        /// Source location (file path or URL) of the raw rows JSON array
        #[arg(long)]
        source: String,
        /// Target location (file path or URL) for the read-back results
        #[arg(long)]
        output: String,
        /// Platform dataset to ingest into and query back from
        #[arg(long)]
        dataset_id: String,
    },
    /// Validate a local rows file and print the resulting NDJSON
    Validate {
        /// Path to a JSON array of raw rows
        #[arg(long)]
        input: String,
        /// Optional NDJSON output path; defaults to stdout
        #[arg(long)]
        output: Option<String>,
    },
    /// Run a standalone query against the platform and print the rows
    Query {
        /// SQL to execute
        #[arg(long)]
        sql: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Run {
            source,
            output,
            dataset_id,
        } => {
            let client_for_ingest = PlatformClient::new(config.platform.clone());
            let client_for_query = PlatformClient::new(config.platform.clone());
            let runner = PipelineRunner::new(
                Box::new(ObjectStoreRowSource),
                Box::new(client_for_ingest),
                Box::new(client_for_query),
                Box::new(ObjectStoreWriter::new(Some(
                    config.platform.access_token.clone(),
                ))),
            );

            match runner.run(&source, &output, &dataset_id).await {
                Ok(summary) => {
                    println!("\n📊 Pipeline summary for {dataset_id}:");
                    println!("   Batch id: {}", summary.batch_id);
                    println!("   Validated records: {}", summary.validated_count);
                    println!("   Returned rows: {}", summary.returned_count);
                    println!("   Output: {}", summary.output_location);
                }
                Err(e) => {
                    error!("Pipeline failed: {e:#}");
                    return Err(e.into());
                }
            }
        }
        Commands::Validate { input, output } => {
            let bytes = std::fs::read(&input)?;
            let rows: Vec<RawRecord> = serde_json::from_slice(&bytes)?;
            let validated = validate::validate_records(&rows);
            let count = validated.len();
            let payload = IngestPayload::new("local", validated);
            let ndjson = payload.to_ndjson()?;

            match output {
                Some(path) => {
                    std::fs::write(&path, ndjson)?;
                    println!("✅ Validated {count} of {} rows into {path}", rows.len());
                }
                None => println!("{ndjson}"),
            }
        }
        Commands::Query { sql } => {
            let client = PlatformClient::new(config.platform.clone());
            let rows = tasks::run_query(&client, &sql).await?;
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }
    Ok(())
}
