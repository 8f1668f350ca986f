mod config_commands;
mod preview_commands;

use std::path::PathBuf;

use {
    clap::{Parser, Subcommand},
    courier_config::CourierConfig,
    tracing::{info, warn},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "courier", about = "Courier: outgoing message payload builder")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file to use instead of the discovered one.
    #[arg(long, global = true, env = "COURIER_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a message and print the payload that would be sent.
    Preview(preview_commands::PreviewArgs),
    /// Configuration management.
    Config {
        #[command(subcommand)]
        action: config_commands::ConfigAction,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so stdout stays machine-readable.
    if cli.json_logs {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

/// The explicit config file if one was given, else the discovered one.
fn load_config(path: Option<&PathBuf>) -> CourierConfig {
    match path {
        Some(path) => courier_config::load_config(path).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            CourierConfig::default()
        }),
        None => courier_config::discover_and_load(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "courier starting");

    match cli.command {
        Commands::Preview(args) => {
            let config = load_config(cli.config.as_ref());
            preview_commands::handle_preview(args, config).await
        },
        Commands::Config { action } => {
            config_commands::handle_config(action, cli.config.as_deref())
        },
    }
}
