use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use opportunities_client::{ApiError, ClientConfig, ConfigError, SessionContext, StatusPolicy, User};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("api request failed: {0}")]
    Api(#[from] ApiError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Flags override the matching `OPPORTUNITIES_*` environment variables.
#[derive(Parser, Debug)]
#[command(name = "opportunities", about = "Opportunities API and session CLI")]
struct Cli {
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Raw `name=value` cookie sent with every request.
    #[arg(long, global = true)]
    session_cookie: Option<String>,

    /// Directory holding the persisted session.
    #[arg(long, global = true)]
    session_dir: Option<PathBuf>,

    /// Treat non-2xx responses as errors.
    #[arg(long, global = true, default_value_t = false)]
    strict_status: bool,

    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn config(&self) -> Result<ClientConfig, CliError> {
        let mut config = ClientConfig::from_env()?;
        if let Some(base_url) = &self.base_url {
            config.base_url = ClientConfig::new(base_url)?.base_url;
        }
        if let Some(cookie) = &self.session_cookie {
            config.session_cookie = Some(cookie.clone());
        }
        if let Some(dir) = &self.session_dir {
            config.session_dir = Some(dir.clone());
        }
        if self.strict_status {
            config.status_policy = StatusPolicy::Strict;
        }
        if let Some(secs) = self.timeout_secs {
            config.request_timeout = Some(Duration::from_secs(secs));
        }
        Ok(config)
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve the current user against `@me` and persist the result.
    Whoami,
    /// Print the persisted user without touching the network.
    Session,
    /// End the server session and clear the persisted user.
    Logout,
    Api(ApiCommand),
}

#[derive(Args, Debug)]
struct ApiCommand {
    #[command(subcommand)]
    command: ApiSubcommand,
}

#[derive(Subcommand, Debug)]
enum ApiSubcommand {
    Get {
        path: String,
    },
    Post {
        path: String,
        #[arg(long)]
        data: Option<String>,
    },
    Put {
        path: String,
        #[arg(long)]
        data: Option<String>,
    },
    Delete {
        path: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CliError> {
    let dotenv = dotenvy::dotenv();
    init_tracing();
    if let Err(e) = dotenv {
        if !e.not_found() {
            tracing::warn!(error = %e, "failed to load .env");
        }
    }

    let cli = Cli::parse();
    let config = cli.config()?;
    tracing::debug!(base_url = %config.base_url, "starting");
    let ctx = SessionContext::from_config(&config)?;

    match cli.command {
        Command::Whoami => {
            let user = ctx.bootstrap().await;
            print_user(user.as_ref())
        }
        Command::Session => print_user(ctx.store().get().as_ref()),
        Command::Logout => {
            ctx.logout().await;
            println!("logged out");
            Ok(())
        }
        Command::Api(api) => run_api(&ctx, api).await,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_api(ctx: &SessionContext, api: ApiCommand) -> Result<(), CliError> {
    let client = ctx.api();
    let value: Value = match api.command {
        ApiSubcommand::Get { path } => client.get(&path).await?,
        ApiSubcommand::Delete { path } => client.del(&path).await?,
        ApiSubcommand::Post { path, data } => client.post(&path, &parse_data(data.as_deref())?).await?,
        ApiSubcommand::Put { path, data } => client.put(&path, &parse_data(data.as_deref())?).await?,
    };
    print_json(&value)
}

fn parse_data(raw: Option<&str>) -> Result<Option<Value>, CliError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
    }
}

fn print_user(user: Option<&User>) -> Result<(), CliError> {
    match user {
        Some(user) => print_json(&serde_json::to_value(user)?),
        None => {
            println!("anonymous");
            Ok(())
        }
    }
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
