use aws_config::meta::region::RegionProviderChain;
use aws_sdk_dynamodb::Client as DynamoClient;
use std::env;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

use crate::store::{DynamoUserStore, MemoryUserStore, UserStore};

pub const DEFAULT_REGION: &str = "eu-central-1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid PORT value {0:?}")]
    Port(String),
    #[error("unknown USERS_STORE backend {0:?} (expected \"dynamodb\" or \"memory\")")]
    Backend(String),
}

/// Which [`UserStore`] implementation to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    DynamoDb,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dynamodb" | "dynamo" => Ok(StoreBackend::DynamoDb),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(ConfigError::Backend(s.to_string())),
        }
    }
}

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub table_name: String,
    pub backend: StoreBackend,
    pub bind_addr: String,
    pub port: u16,
}

impl Config {
    /// Read settings from the environment, using `default_table` when
    /// `TABLE_NAME` is unset.
    pub fn from_env(default_table: &str) -> Result<Self, ConfigError> {
        Self::from_lookup(default_table, |key| env::var(key).ok())
    }

    fn from_lookup<F>(default_table: &str, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let table_name = lookup("TABLE_NAME").unwrap_or_else(|| default_table.to_string());
        let backend = match lookup("USERS_STORE") {
            Some(value) => value.parse()?,
            None => StoreBackend::DynamoDb,
        };
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let port = match lookup("PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::Port(value))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            table_name,
            backend,
            bind_addr,
            port,
        })
    }

    /// Build the store handle shared by every request.
    pub async fn build_store(&self) -> Arc<dyn UserStore> {
        match self.backend {
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory user store; data is lost on exit");
                Arc::new(MemoryUserStore::new())
            }
            StoreBackend::DynamoDb => {
                let region = RegionProviderChain::default_provider().or_else(DEFAULT_REGION);
                let config = aws_config::from_env().region(region).load().await;
                let store = DynamoUserStore::new(DynamoClient::new(&config), self.table_name.clone());
                tracing::info!("Using DynamoDB table {}", store.table_name());
                Arc::new(store)
            }
        }
    }
}
