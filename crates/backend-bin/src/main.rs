use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;

use backend_lib::{
    auth::hash_password_secure,
    config::{load_settings, Settings},
    router, AppState,
};
use clap::{Args, Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;
use zeroize::Zeroize;

/// Personal cloud storage server
#[derive(Parser, Debug)]
#[command(name = "batcloud", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve(ServeArgs),
    /// Print an Argon2id hash to use as `auth.password_hash`
    HashPassword {
        /// Password to hash; read from stdin when omitted
        password: Option<String>,
    },
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// TOML config file (defaults to ./batcloud.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::HashPassword { password }) => print_hash(password),
        Some(Command::Serve(args)) => serve(args).await,
        None => serve(ServeArgs::default()).await,
    }
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let settings = load_settings(args.config.as_deref())?;
    init_tracing(&settings, args.log_json);
    settings.validate()?;

    let state = Arc::new(AppState::from_settings(&settings)?);
    let app = router::create_router(state);

    let listener = TcpListener::bind(settings.bind_addr).await?;
    info!(
        addr = %settings.bind_addr,
        storage = %settings.storage.root.display(),
        "listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

fn init_tracing(settings: &Settings, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn print_hash(password: Option<String>) -> anyhow::Result<()> {
    let mut plain = match password {
        Some(password) => password,
        None => {
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            let trimmed = line.trim_end_matches(['\r', '\n']).to_string();
            line.zeroize();
            trimmed
        },
    };
    if plain.is_empty() {
        anyhow::bail!("refusing to hash an empty password");
    }

    let hash = hash_password_secure(&mut plain)?;
    println!("{hash}");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
