use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::ledger::{Ledger, Movement, Summary};

/// Account description as found in an accounts file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AccountSeed {
    pub owner: String,
    pub pin: u32,
    pub interest_rate: Decimal,
    pub currency: String,
    pub locale: String,
    #[serde(default)]
    pub movements: Vec<Movement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub owner: String,
    pub username: String,
    pub pin: u32,
    pub interest_rate: Decimal,
    pub currency: String,
    pub locale: String,
    pub ledger: Ledger,
}

impl From<AccountSeed> for Account {
    fn from(seed: AccountSeed) -> Self {
        Account {
            username: derive_username(&seed.owner),
            owner: seed.owner,
            pin: seed.pin,
            interest_rate: seed.interest_rate,
            currency: seed.currency,
            locale: seed.locale,
            ledger: Ledger::from_movements(seed.movements),
        }
    }
}

impl Account {
    pub fn new(
        owner: &str,
        pin: u32,
        interest_rate: Decimal,
        currency: &str,
        locale: &str,
    ) -> Self {
        Account {
            owner: owner.to_string(),
            username: derive_username(owner),
            pin,
            interest_rate,
            currency: currency.to_string(),
            locale: locale.to_string(),
            ledger: Ledger::new(),
        }
    }

    #[inline]
    pub fn record_movement(&mut self, amount: Decimal, date: DateTime<Utc>) {
        self.ledger.record(amount, date);
    }

    #[inline]
    pub fn balance(&self) -> Decimal {
        self.ledger.balance()
    }

    pub fn total_interest(&self) -> Decimal {
        self.ledger.total_interest(self.interest_rate)
    }

    pub fn summary(&self) -> Summary {
        self.ledger.summary(self.interest_rate)
    }

    pub fn first_name(&self) -> &str {
        self.owner.split_whitespace().next().unwrap_or_default()
    }

    pub fn matches(&self, username: &str, pin: u32) -> bool {
        self.username == username && self.pin == pin
    }
}

/// Initials of the lowercased owner name, e.g. "Jonas Schmedtmann" -> "js".
pub fn derive_username(owner: &str) -> String {
    owner
        .to_lowercase()
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .collect()
}
