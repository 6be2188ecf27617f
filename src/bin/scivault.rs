use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use scivault::app::App;
use scivault::config::{ConfigLoader, wallet_key_from_env};
use scivault::domain::{Paper, Receipt, SearchField, Tag, TransactionEdge};
use scivault::error::ScivaultError;
use scivault::gateway::{GatewayClient, IrysGatewayClient};
use scivault::graphql::{GraphqlClient, IrysGraphqlClient};
use scivault::output::{
    ConsoleOutput, JsonOutput, OutputMode, print_search_results, print_upload_summary,
};
use scivault::uploader::{IrysCliUploader, UploadClient};

#[derive(Parser)]
#[command(name = "scivault")]
#[command(about = "Search and batch-upload arXiv paper metadata on the Irys network")]
#[command(version, author)]
struct Cli {
    #[arg(long, global = true)]
    non_interactive: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Search uploaded paper metadata and linked PDFs")]
    Search(SearchArgs),
    #[command(about = "Upload paper metadata chunk files")]
    Upload(UploadArgs),
}

#[derive(Args)]
struct SearchArgs {
    #[arg(value_enum)]
    field: SearchField,

    value: String,

    #[arg(long)]
    config: Option<String>,
}

#[derive(Args)]
struct UploadArgs {
    #[arg(long)]
    config: Option<String>,

    #[arg(long)]
    chunk_dir: Option<String>,

    #[arg(long)]
    chunks: Option<u32>,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(err) = report.downcast_ref::<ScivaultError>() {
            return ExitCode::from(map_exit_code(err));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &ScivaultError) -> u8 {
    match error {
        ScivaultError::InvalidSearchField(_)
        | ScivaultError::ConfigRead(_)
        | ScivaultError::ConfigParse(_)
        | ScivaultError::ChunkRead(_)
        | ScivaultError::MissingPrivateKey => 2,
        ScivaultError::GraphqlHttp(_)
        | ScivaultError::GraphqlStatus { .. }
        | ScivaultError::GatewayHttp(_)
        | ScivaultError::GatewayStatus { .. }
        | ScivaultError::MalformedDocument(_)
        | ScivaultError::UploadFailed(_)
        | ScivaultError::MissingTool(_) => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_mode = if cli.non_interactive {
        OutputMode::NonInteractive
    } else {
        OutputMode::Interactive
    };

    match cli.command {
        Commands::Search(args) => run_search(args, output_mode),
        Commands::Upload(args) => run_upload(args, output_mode),
    }
}

fn run_search(args: SearchArgs, output_mode: OutputMode) -> miette::Result<()> {
    let config = ConfigLoader::resolve(args.config.as_deref()).into_diagnostic()?;
    let graphql = IrysGraphqlClient::new(&config.graphql_url).into_diagnostic()?;
    let gateway = IrysGatewayClient::new(&config.gateway_url).into_diagnostic()?;
    let app = App::new(graphql, gateway, NopUploader);

    match output_mode {
        OutputMode::NonInteractive => {
            let outcome = app.search(args.field, &args.value, &JsonOutput);
            JsonOutput::print_search(&outcome).into_diagnostic()?;
        }
        OutputMode::Interactive => {
            let outcome = app.search(args.field, &args.value, &ConsoleOutput);
            print_search_results(&outcome, &config.gateway_url);
        }
    }
    Ok(())
}

fn run_upload(args: UploadArgs, output_mode: OutputMode) -> miette::Result<()> {
    let mut config = ConfigLoader::resolve(args.config.as_deref()).into_diagnostic()?;
    if let Some(chunk_dir) = args.chunk_dir {
        config.chunk_dir = chunk_dir.into();
    }
    if let Some(chunks) = args.chunks {
        config.chunk_count = chunks;
    }

    let wallet_key = wallet_key_from_env().into_diagnostic()?;
    let uploader = IrysCliUploader::new(&wallet_key).into_diagnostic()?;
    let app = App::new(NopGraphql, NopGateway, uploader);

    match output_mode {
        OutputMode::NonInteractive => {
            let result = app.upload(&config, &JsonOutput).into_diagnostic()?;
            JsonOutput::print_upload(&result).into_diagnostic()?;
        }
        OutputMode::Interactive => {
            let result = app.upload(&config, &ConsoleOutput).into_diagnostic()?;
            print_upload_summary(&result);
        }
    }
    Ok(())
}

struct NopGraphql;
struct NopGateway;
struct NopUploader;

impl GraphqlClient for NopGraphql {
    fn metadata_edges(
        &self,
        _field: SearchField,
        _value: &str,
    ) -> Result<Vec<TransactionEdge>, ScivaultError> {
        Err(ScivaultError::GraphqlHttp(
            "GraphQL client not configured".to_string(),
        ))
    }

    fn pdf_edges(&self, _dois: &[String]) -> Result<Vec<TransactionEdge>, ScivaultError> {
        Err(ScivaultError::GraphqlHttp(
            "GraphQL client not configured".to_string(),
        ))
    }
}

impl GatewayClient for NopGateway {
    fn fetch_paper(&self, _id: &str) -> Result<Paper, ScivaultError> {
        Err(ScivaultError::GatewayHttp(
            "gateway client not configured".to_string(),
        ))
    }
}

impl UploadClient for NopUploader {
    fn upload(&self, _payload: &[u8], _tags: &[Tag]) -> Result<Receipt, ScivaultError> {
        Err(ScivaultError::UploadFailed(
            "uploader not configured".to_string(),
        ))
    }
}
