use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

pub(crate) mod config;
pub(crate) mod database;
pub(crate) mod error;
pub(crate) mod models;
pub(crate) mod server;

#[cfg(test)]
mod tests;

#[derive(Parser)]
#[clap(author, version, about)]
struct ServerArgs {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    /// YAML configuration file; the environment is used when omitted.
    #[clap(short, long, global = true)]
    config: Option<PathBuf>,
    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API (default).
    Serve,
    /// Create the catalog tables.
    InitSchema,
    /// Drop the catalog tables.
    DropSchema,
    /// Register a study group member.
    AddUser {
        name: String,
        #[clap(long)]
        faculty: bool,
    },
    /// Add a label to the tag vocabulary.
    AddTag { name: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServerArgs::parse();
    setup_logging(args.log_level.as_deref());
    // a missing .env file is fine, variables may come from the real environment
    dotenv::dotenv().ok();

    let config = match &args.config {
        Some(path) => AppConfig::from_yaml_file(path.clone())?,
        None => AppConfig::from_env()?,
    };
    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => server::run_all(&config).await?,
        Command::InitSchema => server::init_schema(&config).await?,
        Command::DropSchema => server::drop_schema(&config).await?,
        Command::AddUser { name, faculty } => server::add_user(&config, name, faculty).await?,
        Command::AddTag { name } => server::add_tag(&config, &name).await?,
    }

    Ok(())
}

fn setup_logging(log_level: Option<&str>) {
    let log_level = log_level.unwrap_or("info").to_lowercase();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .init();
}
