use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::account::AccountSeed;
use crate::directory::Directory;
use crate::error::ConfigError;

pub const DEFAULT_SESSION_TIMEOUT_SECS: u32 = 300;
pub const DEFAULT_TICK_MS: u64 = 1000;
pub const DEFAULT_LOAN_DELAY_MS: u64 = 2500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Ticks before an idle session is logged out.
    pub session_timeout_secs: u32,
    pub tick_ms: u64,
    pub loan_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            session_timeout_secs: DEFAULT_SESSION_TIMEOUT_SECS,
            tick_ms: DEFAULT_TICK_MS,
            loan_delay_ms: DEFAULT_LOAN_DELAY_MS,
        }
    }
}

/// Reads a JSON array of account seeds.
pub fn load_accounts(path: impl AsRef<Path>) -> Result<Directory, ConfigError> {
    let reader = BufReader::new(File::open(path)?);
    let seeds: Vec<AccountSeed> = serde_json::from_reader(reader)?;
    Ok(Directory::from_seeds(seeds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.session_timeout_secs, 300);
        assert_eq!(config.tick_ms, 1000);
        assert_eq!(config.loan_delay_ms, 2500);
    }

    #[test]
    fn test_load_accounts() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{ "owner": "Steven Thomas Williams", "pin": 3333, "interest_rate": 0.7,
                   "currency": "EUR", "locale": "de-DE",
                   "movements": [{{ "amount": 200, "date": "2020-01-01T00:00:00Z" }}] }},
                {{ "owner": "Sarah Smith", "pin": 4444, "interest_rate": 1,
                   "currency": "GBP", "locale": "en-GB" }}
            ]"#
        )
        .unwrap();

        let directory = load_accounts(file.path()).unwrap();

        assert_eq!(directory.len(), 2);
        assert_eq!(directory.find_by_username("stw").unwrap().balance(), dec!(200));
        assert!(directory.find_by_username("ss").unwrap().ledger.is_empty());
    }

    #[test]
    fn test_load_accounts_missing_file() {
        let result = load_accounts("/nonexistent/accounts.json");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
