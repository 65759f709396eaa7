use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;

/// Connection settings for the Spanner backend
#[derive(Debug, Clone, PartialEq)]
pub struct SpannerSettings {
    pub emulator_host: Option<String>,
    pub project: String,
    pub instance: String,
    pub database: String,
}

/// Which accessor the service stores menu items in
#[derive(Debug, Clone, PartialEq)]
pub enum StorageBackend {
    Memory,
    Spanner(SpannerSettings),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub storage_backend: StorageBackend,
    pub service_port: u16,
    pub service_host: String,
    pub public_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup, e.g. a map in tests
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = lookup("STORAGE_BACKEND").unwrap_or_else(|| "memory".to_string());

        let storage_backend = match backend.to_ascii_lowercase().as_str() {
            "memory" => StorageBackend::Memory,
            "spanner" => StorageBackend::Spanner(SpannerSettings {
                emulator_host: lookup("SPANNER_EMULATOR_HOST"),
                project: lookup("SPANNER_PROJECT")
                    .context("SPANNER_PROJECT environment variable is required")?,
                instance: lookup("SPANNER_INSTANCE")
                    .context("SPANNER_INSTANCE environment variable is required")?,
                database: lookup("SPANNER_DATABASE")
                    .context("SPANNER_DATABASE environment variable is required")?,
            }),
            other => bail!(
                "STORAGE_BACKEND must be one of: memory, spanner, got '{}'",
                other
            ),
        };

        let service_port = lookup("SERVICE_PORT")
            .unwrap_or_else(|| "8000".to_string())
            .parse::<u16>()
            .context("SERVICE_PORT must be a valid port number (0-65535)")?;

        let service_host = lookup("SERVICE_HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let public_dir = PathBuf::from(lookup("PUBLIC_DIR").unwrap_or_else(|| "public".to_string()));

        Ok(Config {
            storage_backend,
            service_port,
            service_host,
            public_dir,
        })
    }

    /// Page served with a 404 status for unmatched non-API requests
    pub fn page_404(&self) -> PathBuf {
        self.public_dir.join("404.html")
    }

    pub fn log_startup(&self) {
        tracing::info!("Configuration loaded:");
        match &self.storage_backend {
            StorageBackend::Memory => {
                tracing::info!("  Storage backend: memory");
            }
            StorageBackend::Spanner(spanner) => {
                tracing::info!("  Storage backend: spanner");
                tracing::info!(
                    "  Spanner emulator: {}",
                    spanner
                        .emulator_host
                        .as_deref()
                        .unwrap_or("disabled (using production)")
                );
                tracing::info!("  Spanner project: {}", spanner.project);
                tracing::info!("  Spanner instance: {}", spanner.instance);
                tracing::info!("  Spanner database: {}", spanner.database);
            }
        }
        tracing::info!("  Public directory: {}", self.public_dir.display());
        tracing::info!("  Service listening on: {}:{}", self.service_host, self.service_port);
    }
}
