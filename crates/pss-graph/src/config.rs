//! Neo4j connection configuration sourced from the environment.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::error::{GraphError, GraphResult};

pub const ENV_URI: &str = "NEO4J_URI";
pub const ENV_USERNAME: &str = "NEO4J_USERNAME";
pub const ENV_PASSWORD: &str = "NEO4J_PASSWORD";
pub const ENV_DATABASE: &str = "NEO4J_DATABASE";
pub const ENV_MAX_CONNECTIONS: &str = "NEO4J_MAX_CONNECTIONS";
pub const ENV_FETCH_SIZE: &str = "NEO4J_FETCH_SIZE";
pub const ENV_CONNECT_TIMEOUT_SECS: &str = "NEO4J_CONNECT_TIMEOUT_SECS";

pub const DEFAULT_DATABASE: &str = "neo4j";
pub const DEFAULT_MAX_CONNECTIONS: usize = 4;
pub const DEFAULT_FETCH_SIZE: usize = 20;
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

const SUPPORTED_SCHEMES: &[&str] = &["bolt", "bolt+s", "bolt+ssc", "neo4j", "neo4j+s", "neo4j+ssc"];

/// Configuration for connecting to Neo4j.
///
/// Built once at startup and never mutated afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct GraphConfig {
    pub uri: String,
    pub username: String,
    pub password: String,
    pub database: String,
    pub max_connections: usize,
    pub fetch_size: usize,
    pub connect_timeout: Duration,
}

impl fmt::Debug for GraphConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphConfig")
            .field("uri", &self.uri)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("max_connections", &self.max_connections)
            .field("fetch_size", &self.fetch_size)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

impl GraphConfig {
    /// Build a config from explicit credentials, using defaults for the rest.
    pub fn new(
        uri: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> GraphResult<Self> {
        let config = Self {
            uri: uri.into(),
            username: username.into(),
            password: password.into(),
            database: DEFAULT_DATABASE.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            fetch_size: DEFAULT_FETCH_SIZE,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        };
        config.validate()?;
        Ok(config)
    }

    /// Use a database other than the default one.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        let database = database.into();
        if !database.trim().is_empty() {
            self.database = database;
        }
        self
    }

    /// Bound the connection handshake by `timeout`.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Read the configuration from process environment variables.
    pub fn from_env() -> GraphResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`, which maps a variable name
    /// to its value.
    pub fn from_lookup<F>(lookup: F) -> GraphResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let uri = required(&lookup, ENV_URI)?.trim().to_string();
        let username = required(&lookup, ENV_USERNAME)?.trim().to_string();
        let password = required(&lookup, ENV_PASSWORD)?;

        let database = lookup(ENV_DATABASE)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        let max_connections =
            positive(&lookup, ENV_MAX_CONNECTIONS)?.unwrap_or(DEFAULT_MAX_CONNECTIONS);
        let fetch_size = positive(&lookup, ENV_FETCH_SIZE)?.unwrap_or(DEFAULT_FETCH_SIZE);
        let connect_timeout = positive(&lookup, ENV_CONNECT_TIMEOUT_SECS)?
            .map(|secs| Duration::from_secs(secs as u64))
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT);

        let config = Self {
            uri,
            username,
            password,
            database,
            max_connections,
            fetch_size,
            connect_timeout,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check required fields and the URI scheme.
    pub fn validate(&self) -> GraphResult<()> {
        if self.uri.trim().is_empty() {
            return Err(GraphError::configuration(format!("{} must not be empty", ENV_URI)));
        }
        if self.username.trim().is_empty() {
            return Err(GraphError::configuration(format!("{} must not be empty", ENV_USERNAME)));
        }
        if self.password.is_empty() {
            return Err(GraphError::configuration(format!("{} must not be empty", ENV_PASSWORD)));
        }

        let scheme = self
            .uri
            .split_once("://")
            .map(|(scheme, _)| scheme)
            .ok_or_else(|| {
                GraphError::configuration(format!("{} has no scheme: {}", ENV_URI, self.uri))
            })?;
        if !SUPPORTED_SCHEMES.contains(&scheme) {
            return Err(GraphError::configuration(format!(
                "{} uses unsupported scheme '{}' (expected one of: {})",
                ENV_URI,
                scheme,
                SUPPORTED_SCHEMES.join(", ")
            )));
        }

        if self.max_connections == 0 {
            return Err(GraphError::configuration("max_connections must be positive"));
        }
        if self.fetch_size == 0 {
            return Err(GraphError::configuration("fetch_size must be positive"));
        }
        if self.connect_timeout.is_zero() {
            return Err(GraphError::configuration("connect_timeout must be positive"));
        }
        Ok(())
    }
}

/// Load a `.env` file into the process environment.
///
/// With an explicit `path` the file must exist. Without one, the nearest
/// `.env` is loaded if present. Returns the path that was loaded.
pub fn load_dotenv(path: Option<&Path>) -> GraphResult<Option<std::path::PathBuf>> {
    match path {
        Some(path) => dotenvy::from_path(path)
            .map(|_| Some(path.to_path_buf()))
            .map_err(|e| {
                GraphError::configuration(format!("Failed to load {}: {}", path.display(), e))
            }),
        None => match dotenvy::dotenv() {
            Ok(loaded) => Ok(Some(loaded)),
            Err(e) if e.not_found() => Ok(None),
            Err(e) => Err(GraphError::configuration(format!("Failed to load .env: {}", e))),
        },
    }
}

fn required<F>(lookup: &F, key: &str) -> GraphResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        Some(_) => Err(GraphError::configuration(format!("{} must not be empty", key))),
        None => Err(GraphError::configuration(format!("{} must be set", key))),
    }
}

fn positive<F>(lookup: &F, key: &str) -> GraphResult<Option<usize>>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    match raw.trim().parse::<usize>() {
        Ok(0) | Err(_) => Err(GraphError::configuration(format!(
            "{} must be a positive integer, got '{}'",
            key, raw
        ))),
        Ok(n) => Ok(Some(n)),
    }
}
