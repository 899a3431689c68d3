//! ItemStore Server Binary
//!
//! # Examples
//!
//! ```bash
//! # Start server with the sample items loaded
//! itemstore serve --bind 0.0.0.0 --port 8080 --seed-fixtures
//!
//! # Start from a config file
//! itemstore --config itemstore.toml serve
//!
//! # Show the effective configuration
//! itemstore config
//! ```

use clap::{Args, Parser, Subcommand};
use itemstore::config::AppConfig;
use itemstore::server::start_server;
use itemstore::storage::{Catalog, CodeReusePolicy, ItemStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// ItemStore - in-memory item catalog
#[derive(Parser, Debug)]
#[command(name = "itemstore")]
#[command(version = itemstore::VERSION)]
#[command(about = "ItemStore - in-memory item catalog", long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML)
    #[arg(short, long, global = true, env = "ITEMSTORE_CONFIG")]
    config: Option<PathBuf>,

    /// Log directory path
    #[arg(long, global = true, default_value = "logs", env = "ITEMSTORE_LOG_DIR")]
    log_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Print the effective configuration as TOML
    Config,

    /// Show version
    Version,
}

/// Server arguments, overriding the configuration file
#[derive(Args, Debug)]
struct ServeArgs {
    /// HTTP bind address
    #[arg(short, long)]
    bind: Option<String>,

    /// HTTP port
    #[arg(short, long)]
    port: Option<u16>,

    /// Records per table page
    #[arg(long)]
    page_capacity: Option<usize>,

    /// Load the sample items at startup
    #[arg(long)]
    seed_fixtures: bool,

    /// Reject codes that belonged to deleted items
    #[arg(long)]
    forbid_code_reuse: bool,

    /// Disable CORS
    #[arg(long)]
    no_cors: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(ref args) => {
            let _guard = setup_logging(&cli)?;
            let config = AppConfig::load(cli.config.as_deref())?;
            serve_command(config, args).await
        }
        Commands::Config => {
            let config = AppConfig::load(cli.config.as_deref())?;
            print!("{}", config.to_toml()?);
            Ok(())
        }
        Commands::Version => {
            println!("ItemStore {}", itemstore::VERSION);
            Ok(())
        }
    }
}

/// Setup logging with rolling files and console output
fn setup_logging(cli: &Cli) -> anyhow::Result<tracing_appender::non_blocking::WorkerGuard> {
    std::fs::create_dir_all(&cli.log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &cli.log_dir, "itemstore.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let log_level = cli
        .log_level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stdout)
                .with_ansi(!cli.no_color)
                .pretty(),
        )
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .init();

    Ok(guard)
}

/// Serve command - build the catalog and start the HTTP server
async fn serve_command(mut config: AppConfig, args: &ServeArgs) -> anyhow::Result<()> {
    info!(version = %itemstore::VERSION, "ItemStore starting");

    if let Some(bind) = &args.bind {
        config.server.http_addr = bind.clone();
    }
    if let Some(port) = args.port {
        config.server.http_port = port;
    }
    if let Some(page_capacity) = args.page_capacity {
        config.storage.page_capacity = page_capacity;
    }
    if args.seed_fixtures {
        config.storage.seed_fixtures = true;
    }
    if args.forbid_code_reuse {
        config.storage.code_reuse = CodeReusePolicy::Forbid;
    }
    if args.no_cors {
        config.server.enable_cors = false;
    }

    let catalog = Catalog::with_config(&config.storage)?;
    let stats = catalog.stats();
    info!(
        page_capacity = stats.page_capacity,
        items = stats.live_records,
        code_reuse = ?catalog.code_reuse(),
        name_index = ?config.storage.name_index,
        "Catalog initialized"
    );

    let store: Arc<dyn ItemStore> = Arc::new(catalog);
    start_server(config.server, store).await
}
