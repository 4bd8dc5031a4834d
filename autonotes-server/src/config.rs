//! Server configuration from the environment.
//!
//! | variable | default |
//! |---|---|
//! | `AUTONOTES_HOST` | `127.0.0.1` |
//! | `AUTONOTES_PORT` | `9110` |
//! | `AUTONOTES_DATA_DIR` | see [`default_data_dir`] |
//!
//! A `.env` file in the working directory is honoured by `main`.

use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 9110;

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Root under which each user's namespace directory is created.
    pub data_dir: PathBuf,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = match lookup("AUTONOTES_PORT") {
            None => DEFAULT_PORT,
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                log::warn!("AUTONOTES_PORT={raw} is not a port number, using {DEFAULT_PORT}");
                DEFAULT_PORT
            }),
        };

        Self {
            host: lookup("AUTONOTES_HOST")
                .filter(|h| !h.is_empty())
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            data_dir: lookup("AUTONOTES_DATA_DIR")
                .filter(|d| !d.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(default_data_dir),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Returns the default storage root.
///
/// - Linux: `~/.local/share/autonotes/user`
/// - macOS: `~/Library/Application Support/autonotes/user`
/// - Windows: `%APPDATA%/autonotes/user`
///
/// Falls back to `./user` when the platform data directory is unknown.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|base| base.join("autonotes").join("user"))
        .unwrap_or_else(|| PathBuf::from("user"))
}
