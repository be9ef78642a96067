//! blobpush - Chunked block uploads to Azure Blob Storage

use blobpush::cli::{Cli, Commands, ConfigArgs, UploadArgs};
use blobpush::config::{Config, Credentials};
use blobpush::format::{DryRunReport, UploadReport};
use blobpush::store::AzureStore;
use blobpush::transfer::UploadEngine;
use blobpush::uri::Destination;
use blobpush::walk::walk_source;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose, cli.json);

    // Handle Ctrl+C gracefully
    let shutdown = setup_shutdown_handler();

    match cli.command {
        Commands::Upload(args) => {
            run_upload(args).await?;
        }

        Commands::Config(args) => {
            handle_config_command(args)?;
        }
    }

    drop(shutdown);
    Ok(())
}

async fn run_upload(args: UploadArgs) -> anyhow::Result<()> {
    let config = args.to_config()?;
    let destination = Destination::parse(&args.destination)?;

    tracing::info!(
        source = %args.source.display(),
        destination = %destination,
        block_size = config.block_size,
        dry_run = config.dry_run,
        "Starting upload"
    );

    let files = walk_source(&args.source, &config.exclude).await?;

    // A dry run lists the plan and never needs credentials or the network
    if config.dry_run {
        DryRunReport {
            destination: destination.to_string(),
            files: &files,
        }
        .print();
        return Ok(());
    }

    let credentials = Credentials::resolve(args.account, args.access_key)?;
    let store = AzureStore::new(&credentials);
    store.ensure_container(&destination.container).await?;

    let engine = UploadEngine::new(config, store, destination);
    let stats = engine.run(&files).await?;

    UploadReport::from(&stats).print();
    Ok(())
}

fn init_tracing(verbose: u8, json: bool) {
    let filter = match verbose {
        0 => EnvFilter::new("blobpush=info"),
        1 => EnvFilter::new("blobpush=debug"),
        2 => EnvFilter::new("blobpush=trace"),
        _ => EnvFilter::new("trace"),
    };

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().pretty())
            .init();
    }
}

fn setup_shutdown_handler() -> tokio::sync::oneshot::Sender<()> {
    let (tx, rx) = tokio::sync::oneshot::channel();

    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                // Aborting mid-transfer is safe: nothing commits, and the
                // service expires staged blocks on its own
                tracing::warn!("Received Ctrl+C, aborting");
                std::process::exit(130);
            }
            _ = rx => {
                // Normal shutdown
            }
        }
    });

    tx
}

fn handle_config_command(args: ConfigArgs) -> anyhow::Result<()> {
    if args.path {
        println!("{}", Config::default_config_path()?.display());
    } else if args.init {
        let config = Config::default();
        config.save()?;
        println!(
            "Created default configuration at {}",
            Config::default_config_path()?.display()
        );
    } else {
        // Show current config
        let config = Config::load()?;
        println!("{}", toml::to_string_pretty(&config)?);
    }
    Ok(())
}
