//! Application settings loaded via OrthoConfig.
//!
//! Values layer in the usual OrthoConfig order: defaults, configuration
//! file, `BUGTRACKER_*` environment variables, then command-line flags.
//! Session cookie settings are read separately; see
//! [`crate::inbound::http::session_config`].

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::inbound::http::state::DEFAULT_MAX_UPLOAD_BYTES;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Settings for the HTTP server and its storage backends.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BUGTRACKER")]
pub struct AppSettings {
    /// Interface to bind.
    pub host: Option<IpAddr>,
    /// Port to bind.
    pub port: Option<u16>,
    /// PostgreSQL connection string. Without one the process keeps
    /// everything in memory.
    pub database_url: Option<String>,
    /// Directory uploaded attachments are written to.
    pub upload_dir: Option<PathBuf>,
    /// Per-file upload limit in bytes.
    pub max_upload_bytes: Option<usize>,
    /// Maximum number of pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Apply pending migrations at startup.
    pub run_migrations: Option<bool>,
}

impl AppSettings {
    /// Address the server listens on.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.host.unwrap_or(DEFAULT_HOST),
            self.port.unwrap_or(DEFAULT_PORT),
        )
    }

    /// Configured database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Upload directory, falling back to `uploads` in the working directory.
    pub fn upload_dir(&self) -> PathBuf {
        self.upload_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR))
    }

    /// Per-file upload limit.
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes.unwrap_or(DEFAULT_MAX_UPLOAD_BYTES)
    }

    /// Database pool size.
    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    /// Whether to migrate on startup. Defaults to on.
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }
}
