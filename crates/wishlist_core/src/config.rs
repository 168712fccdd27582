//! Store and logging configuration.
//!
//! # Responsibility
//! - Describe where the wishlist store lives and how it is opened.
//! - Carry logging bootstrap inputs for hosts that embed the core.
//!
//! # Invariants
//! - `StoreConfig::default()` targets the `test.db` file with a 5 s busy timeout.
//! - Config values are plain data; validation happens where they are consumed.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Default file name of the local store.
pub const DEFAULT_DB_FILE_NAME: &str = "test.db";
/// Default bound on waiting for a locked database before failing.
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Physical location of the store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "path")]
pub enum StoreLocation {
    /// File-backed SQLite database.
    File(PathBuf),
    /// Private in-memory database, discarded on close.
    Memory,
}

/// How `ensure_schema` reacts to a table that cannot be created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaPolicy {
    /// Every table is attempted independently; failures are collected.
    #[default]
    BestEffort,
    /// All tables are created in one transaction; the first failure aborts.
    Atomic,
}

/// Options used by `open_store`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub location: StoreLocation,
    /// Upper bound for lock acquisition, in milliseconds.
    pub busy_timeout_ms: u64,
    pub schema_policy: SchemaPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            location: StoreLocation::File(PathBuf::from(DEFAULT_DB_FILE_NAME)),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            schema_policy: SchemaPolicy::BestEffort,
        }
    }
}

impl StoreConfig {
    /// File-backed config with default timeout and policy.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            location: StoreLocation::File(path.into()),
            ..Self::default()
        }
    }

    /// In-memory config with default timeout and policy.
    pub fn in_memory() -> Self {
        Self {
            location: StoreLocation::Memory,
            ..Self::default()
        }
    }

    pub fn with_schema_policy(mut self, policy: SchemaPolicy) -> Self {
        self.schema_policy = policy;
        self
    }

    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    /// Short label used in log events.
    pub(crate) fn mode_label(&self) -> &'static str {
        match self.location {
            StoreLocation::File(_) => "file",
            StoreLocation::Memory => "memory",
        }
    }
}

/// Inputs for `init_logging`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogConfig {
    /// One of `trace|debug|info|warn|error`, case-insensitive.
    pub level: String,
    /// Absolute directory receiving rolling log files.
    pub log_dir: PathBuf,
}

impl LogConfig {
    /// Builds a config using the build-mode default level.
    pub fn with_default_level(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            level: crate::logging::default_log_level().to_string(),
            log_dir: log_dir.into(),
        }
    }
}
