//! PixelForge console: browse and bulk-edit the catalog from a terminal.
//!
//! This binary loads the configuration, opens one table against the REST
//! backend and runs a line-based command loop until `quit` or end of input.

mod api;
mod app;
mod input;
mod render;

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use pixelforge_core::{Config, EntityKind, ListItem, MemoryNotifier, PageSource};

use crate::api::{categories, products, users, ApiClient};
use crate::app::{build_session, App, Flow, QueryInput};
use crate::render::TableRow;

const CONFIG_ENV: &str = "PIXELFORGE_CONFIG";
const LOG_ENV: &str = "PIXELFORGE_LOG";

#[derive(Debug, Parser)]
#[command(name = "pixelforge-console", version, about = "PixelForge catalog admin console")]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides `api.base_url`.
    #[arg(long)]
    base_url: Option<String>,
    /// Overrides `api.token`.
    #[arg(long)]
    token: Option<String>,
    /// Where to write the log.
    #[arg(long, default_value = "/tmp/pixelforge-console.log")]
    log_file: PathBuf,
    /// Table to open: products, categories or users.
    entity: EntityKind,
}

/// Reads the config file named by `--config` or `PIXELFORGE_CONFIG`, then
/// applies command-line overrides. Without a file the defaults are used.
fn load_config(args: &Args) -> anyhow::Result<Config> {
    let path = args
        .config
        .clone()
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
    let mut config = match path {
        Some(path) => Config::load(&path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(base_url) = &args.base_url {
        config.api.base_url = base_url.clone();
    }
    if let Some(token) = &args.token {
        config.api.token = token.clone();
    }
    Ok(config)
}

fn init_tracing(log_file: &Path) -> anyhow::Result<()> {
    // Logs go to a file so they do not interleave with the table output.
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("failed to open log file {}", log_file.display()))?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_env_filter(filter)
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_file)?;

    let config = load_config(&args)?;
    let client = Arc::new(ApiClient::new(
        &config.api.base_url,
        config.request_timeout(),
        config.api.token().map(str::to_string),
    )?);
    tracing::info!(entity = %args.entity, base_url = %client.base_url(), "starting console");
    let notifications = Arc::new(MemoryNotifier::new());

    match args.entity {
        EntityKind::Products => {
            let session = build_session(
                products::source(client.clone()),
                products::operations(client),
                &config,
                args.entity,
                notifications.clone(),
            );
            run_repl(App::new(session, notifications)).await
        }
        EntityKind::Categories => {
            let session = build_session(
                categories::source(client.clone()),
                categories::operations(client),
                &config,
                args.entity,
                notifications.clone(),
            );
            run_repl(App::new(session, notifications)).await
        }
        EntityKind::Users => {
            let session = build_session(
                users::source(client),
                users::operations(),
                &config,
                args.entity,
                notifications.clone(),
            );
            run_repl(App::new(session, notifications)).await
        }
    }
}

async fn run_repl<S>(mut app: App<S>) -> anyhow::Result<()>
where
    S: PageSource,
    S::Item: TableRow,
    S::Query: QueryInput,
    <S::Item as ListItem>::Id: FromStr,
    <<S::Item as ListItem>::Id as FromStr>::Err: fmt::Display,
{
    println!("{}", app.start().await);
    println!("type 'help' for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        match app.dispatch(&line).await {
            Flow::Quit => break,
            Flow::Continue(output) if output.is_empty() => {}
            Flow::Continue(output) => println!("{output}"),
        }
    }
    tracing::info!(table = app.session().noun(), "console closed");
    Ok(())
}
