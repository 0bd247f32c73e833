use std::{path::PathBuf, sync::Arc};

use {
    clap::{Parser, Subcommand},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use {
    rollcall_config::{EnvOverrides, discover_and_load, resolve},
    rollcall_i18n::Catalog,
    rollcall_snapshot::AppContext,
};

#[derive(Parser)]
#[command(name = "rollcall", about = "Rollcall — role membership snapshots for Discord")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path (skips discovery).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to Discord and serve the /snapshot command.
    Run,
    /// Load and validate configuration, then print the resolved values.
    Doctor,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "rollcall starting");

    match cli.command {
        Commands::Run => {
            let app = build_context(&cli)?;
            rollcall_discord::start_client(Arc::new(app)).await
        },
        Commands::Doctor => doctor(&cli),
    }
}

/// Resolve configuration and localization once; everything downstream
/// receives this context by reference.
fn build_context(cli: &Cli) -> anyhow::Result<AppContext> {
    let file = discover_and_load(cli.config.as_deref())?;
    let config = resolve(file, EnvOverrides::from_env())?;
    let catalog = match &config.lang_file {
        Some(path) => Catalog::load_or_builtin(path),
        None => Catalog::builtin(),
    };
    Ok(AppContext { config, catalog })
}

fn doctor(cli: &Cli) -> anyhow::Result<()> {
    let app = build_context(cli)?;
    println!("locale:          {}", app.config.locale.as_str());
    println!("timezone:        {}", app.config.timezone);
    println!("datetime format: {}", app.config.datetime_format);
    println!(
        "default channel: {}",
        app.config
            .default_channel
            .map(|c| c.to_string())
            .unwrap_or_else(|| "(invocation channel)".to_string())
    );
    println!(
        "lang file:       {}",
        app.config
            .lang_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(built-in)".to_string())
    );
    println!("token:           set");
    Ok(())
}
