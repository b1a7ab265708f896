use std::fs::read_to_string;
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};

use crate::database::connection::DbConfig;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    pub address: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DbConfig,
}

impl AppConfig {
    pub fn from_yaml_file<P: Into<PathBuf>>(path: P) -> Result<Self, anyhow::Error> {
        let path = path.into();
        let content = read_to_string(&path).with_context(|| format!("path: {path:?}"))?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Reads `DATABASE_URL`, `PORT`, `LOCAL` and `DB_MAX_CONNECTIONS` from the
    /// process environment.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| anyhow!("missing {key} environment variable"))
        };
        let url = require("DATABASE_URL")?;
        let port: u16 = require("PORT")?
            .parse()
            .context("PORT should be a valid port number")?;
        let local = lookup("LOCAL").is_some_and(|value| !value.is_empty());
        let max_connections = lookup("DB_MAX_CONNECTIONS")
            .map(|value| value.parse::<u32>())
            .transpose()
            .context("DB_MAX_CONNECTIONS should be a positive number")?;
        Ok(Self {
            server: ServerConfig {
                address: format!("0.0.0.0:{port}"),
            },
            database: DbConfig {
                url,
                local,
                max_connections,
            },
        })
    }
}
