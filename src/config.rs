//! Server configuration from environment variables

use std::path::PathBuf;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_CURRENCY: &str = "EUR";

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// JSON snapshot location; `None` keeps the ledger in memory
    pub ledger_path: Option<PathBuf>,
    /// Currency of a newly created ledger
    pub currency: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            ledger_path: None,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl ServerConfig {
    /// Read `HOST`, `PORT`, `LEDGER_PATH` and `BANKROLL_CURRENCY`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            host: non_empty("HOST").unwrap_or(defaults.host),
            port: non_empty("PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(defaults.port),
            ledger_path: non_empty("LEDGER_PATH").map(PathBuf::from),
            currency: non_empty("BANKROLL_CURRENCY")
                .map(|c| c.trim().to_ascii_uppercase())
                .unwrap_or(defaults.currency),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
