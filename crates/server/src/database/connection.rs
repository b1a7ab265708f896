use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use sqlx::{Error as SqlxError, Postgres, Transaction};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DbConfig {
    pub url: String,
    /// Plaintext transport for a database on the local machine. Otherwise the
    /// connection is encrypted without verifying the server certificate.
    #[serde(default)]
    pub local: bool,
    pub max_connections: Option<u32>,
}

impl DbConfig {
    const MAX_CONN_FALLBACK: u32 = 5;

    #[cfg(test)]
    pub fn development(url: &str) -> Self {
        Self {
            url: url.to_string(),
            local: true,
            max_connections: None,
        }
    }

    pub fn max_connections(&self) -> u32 {
        self.max_connections.unwrap_or(Self::MAX_CONN_FALLBACK)
    }

    pub fn ssl_mode(&self) -> PgSslMode {
        if self.local {
            PgSslMode::Disable
        } else {
            PgSslMode::Require
        }
    }

    pub fn connect_options(&self) -> Result<PgConnectOptions, SqlxError> {
        Ok(PgConnectOptions::from_str(&self.url)?.ssl_mode(self.ssl_mode()))
    }
}

pub struct DbConnection {
    pool: PgPool,
}

impl DbConnection {
    pub async fn connect(config: &DbConfig) -> Result<Self, SqlxError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections())
            .connect_with(config.connect_options()?)
            .await?;
        Ok(Self { pool })
    }

    /// Builds the pool without opening any connection until first use.
    #[cfg(test)]
    pub fn connect_lazy(config: &DbConfig) -> Result<Self, SqlxError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections())
            .connect_lazy_with(config.connect_options()?);
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Read-only transaction whose queries all observe the same snapshot.
    pub async fn begin_snapshot(&self) -> Result<Transaction<'static, Postgres>, SqlxError> {
        let mut transaction = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY;")
            .execute(transaction.as_mut())
            .await?;
        Ok(transaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_flag_selects_plaintext() {
        let mut config = DbConfig::development("postgresql://u:p@localhost/db");
        assert!(matches!(config.ssl_mode(), PgSslMode::Disable));
        config.local = false;
        assert!(matches!(config.ssl_mode(), PgSslMode::Require));
    }

    #[test]
    fn max_connections_falls_back() {
        let config = DbConfig::development("postgresql://u:p@localhost/db");
        assert_eq!(config.max_connections(), 5);
    }

    #[test]
    fn rejects_malformed_url() {
        let config = DbConfig::development("not a url");
        assert!(config.connect_options().is_err());
    }
}
