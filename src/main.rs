use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};

use plugin_worker::build;
use plugin_worker::config;
use plugin_worker::error::Result;
use plugin_worker::rpc::{Add, MethodRegistry};
use plugin_worker::server::Worker;

#[derive(Parser, Debug)]
#[command(name = "plugin-worker")]
#[command(about = "A concurrent stdio RPC worker for CLI plugin processes", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (TOML/JSON/YAML)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    /// Serve RPC requests over stdin/stdout (default)
    Serve,
    /// Run a plugin's build script and install its output
    Build {
        /// Directory containing the plugin sources and build script
        #[arg(long, value_name = "DIR")]
        source: PathBuf,
        /// Directory the built output is installed into
        #[arg(long, value_name = "DIR")]
        install: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Diagnostics go to stderr; stdout belongs to the protocol.
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("plugin_worker={log_level}").parse().unwrap()),
        )
        .init();

    let config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            config::load_from_path(path)?
        }
        None => config::load_from_env_or_file()?,
    };

    match args.command.unwrap_or(Command::Serve) {
        Command::Build { source, install } => {
            build::build(&source, &install, &config.build).await?;
            info!("plugin built and installed to {}", install.display());
            Ok(())
        }
        Command::Serve => {
            let registry = Arc::new(MethodRegistry::new());
            registry.register("add", Arc::new(Add::new(config.latency.clone())));

            let worker = Worker::new(config, registry);
            if let Err(e) = worker.serve().await {
                error!("worker failed: {}", e);
                return Err(e);
            }

            Ok(())
        }
    }
}
