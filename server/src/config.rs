//! # Server Configuration
//!
//! Settings are read from an optional YAML file named by `REPAIR_SHOP_CONFIG`,
//! then selected environment variables override individual fields.
//! Every field has a default except the JWT secret, which must be provided.
//!
//! ## YAML Format
//!
//! ```yaml
//! server:
//!   host: "0.0.0.0"
//!   port: 5000
//! database:
//!   url: "sqlite:repair_shop.db"
//!   max_connections: 5
//! auth:
//!   jwt_secret: "change-me"
//!   token_ttl_days: 30
//!   bcrypt_cost: 12
//! cors:
//!   allowed_origin: "http://localhost:5173"
//! reporting:
//!   utc_offset: "+05:30"
//! storage:
//!   uploads_dir: "uploads"
//! logging:
//!   level: "info"
//! ```

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::backend::storage::connection::DEFAULT_DATABASE_URL;

/// Environment variable naming the YAML config file
pub const CONFIG_PATH_ENV: &str = "REPAIR_SHOP_CONFIG";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub cors: CorsConfig,
    pub reporting: ReportingConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: Option<String>,
    pub token_ttl_days: i64,
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_days: 30,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origin: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: "http://localhost:5173".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportingConfig {
    /// Offset whose calendar defines report days and months, e.g. `+05:30`
    pub utc_offset: String,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            utc_offset: "+00:00".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root directory that photo storage ids are relative to
    pub uploads_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            uploads_dir: "uploads".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from the process environment
    pub fn load() -> Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` in place of the process environment
    pub fn load_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = match lookup(CONFIG_PATH_ENV) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_overrides(&lookup)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    fn apply_overrides(&mut self, lookup: &impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(port) = lookup("PORT") {
            self.server.port = port.trim().parse().with_context(|| format!("Invalid PORT: {}", port))?;
        }
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(secret) = lookup("JWT_SECRET") {
            self.auth.jwt_secret = Some(secret);
        }
        if let Some(origin) = lookup("CLIENT_URL") {
            self.cors.allowed_origin = origin;
        }
        if let Some(offset) = lookup("REPORT_UTC_OFFSET") {
            self.reporting.utc_offset = offset;
        }
        if let Some(dir) = lookup("UPLOADS_DIR") {
            self.storage.uploads_dir = dir;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.jwt_secret()?;
        self.reporting_offset()?;
        if self.auth.token_ttl_days <= 0 {
            bail!("auth.token_ttl_days must be positive");
        }
        if !(4..=31).contains(&self.auth.bcrypt_cost) {
            bail!("auth.bcrypt_cost must be between 4 and 31");
        }
        if self.database.max_connections == 0 {
            bail!("database.max_connections must be at least 1");
        }
        Ok(())
    }

    pub fn jwt_secret(&self) -> Result<&str> {
        match self.auth.jwt_secret.as_deref().map(str::trim) {
            Some(secret) if !secret.is_empty() => Ok(secret),
            _ => bail!("JWT secret is not configured (set JWT_SECRET or auth.jwt_secret)"),
        }
    }

    pub fn reporting_offset(&self) -> Result<FixedOffset> {
        parse_utc_offset(&self.reporting.utc_offset)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Parse `Z`, `UTC`, `+HH`, `+HHMM` or `+HH:MM` (and the `-` forms)
pub fn parse_utc_offset(value: &str) -> Result<FixedOffset> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("z") || value.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).context("UTC offset");
    }

    let (sign, rest) = if let Some(rest) = value.strip_prefix('+') {
        (1, rest)
    } else if let Some(rest) = value.strip_prefix('-') {
        (-1, rest)
    } else {
        bail!("UTC offset must start with + or -: {:?}", value);
    };
    if !rest.bytes().all(|b| b.is_ascii_digit() || b == b':') {
        bail!("Invalid UTC offset: {:?}", value);
    }

    let (hours, minutes) = match rest.split_once(':') {
        Some((hours, minutes)) => (hours, minutes),
        None if rest.len() == 4 => rest.split_at(2),
        None => (rest, "0"),
    };
    let hours: i32 = hours.parse().with_context(|| format!("Invalid UTC offset hours: {:?}", value))?;
    let minutes: i32 = minutes.parse().with_context(|| format!("Invalid UTC offset minutes: {:?}", value))?;
    if !(0..=14).contains(&hours) || !(0..60).contains(&minutes) {
        bail!("UTC offset out of range: {:?}", value);
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .with_context(|| format!("UTC offset out of range: {:?}", value))
}
