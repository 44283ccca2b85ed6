use serde::Deserialize;
use std::path::Path;

use crate::error::Error;


/// Loaded once at startup by the composition root and passed down; nothing
/// else reads the file.
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub token: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_database")]
    pub database: String,
    /// Maximum number of commands running at once. Absent means unbounded,
    /// which reproduces the historical behavior.
    #[serde(default)]
    pub max_in_flight: Option<usize>,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}


fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_database() -> String {
    "dispatch.db".to_string()
}
