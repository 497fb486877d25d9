use serde::Deserialize;
use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

fn default_max_file_size() -> usize {
    // 10 MB in bytes
    10 * 1024 * 1024
}

fn default_session_idle_secs() -> u64 {
    60 * 60
}

fn default_max_sessions() -> u64 {
    1000
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub max_file_size: usize,
    pub session_idle_secs: u64,
    pub max_sessions: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            max_file_size: default_max_file_size(),
            session_idle_secs: default_session_idle_secs(),
            max_sessions: default_max_sessions(),
        }
    }
}

impl Config {
    pub fn new() -> Result<Self> {
        // Load .env file first
        dotenv().ok();

        Ok(Config {
            bind_addr: env_or("BIND_ADDR", default_bind_addr)?,
            max_file_size: env_or("MAX_FILE_SIZE", default_max_file_size)?,
            session_idle_secs: env_or("SESSION_IDLE_SECS", default_session_idle_secs)?,
            max_sessions: env_or("MAX_SESSIONS", default_max_sessions)?,
        })
    }

    pub fn session_idle(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }
}

fn env_or<T>(key: &str, default: fn() -> T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Failed to parse {}={:?}: {}", key, raw, e)),
        Err(_) => Ok(default()),
    }
}

pub fn load_config() -> Result<Config> {
    Config::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.max_file_size, 10 * 1024 * 1024);
        assert_eq!(config.session_idle(), Duration::from_secs(3600));
        assert_eq!(config.max_sessions, 1000);
    }

    #[test]
    fn env_or_falls_back_when_unset() {
        let value: u64 = env_or("SUPPLY_DASH_TEST_UNSET_VAR", || 7).unwrap();
        assert_eq!(value, 7);
    }
}
