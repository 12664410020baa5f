use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use thiserror::Error;

use crate::entry::{EventEntry, EventType};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Login { username: String, pin: u32 },
    Transfer { to: String, amount: Decimal },
    Loan { amount: Decimal },
    Close { username: String, pin: u32 },
    Sort,
    Wait { ms: u64 },
}

impl TryFrom<EventEntry> for Command {
    type Error = ConvertionError;

    fn try_from(value: EventEntry) -> Result<Self, Self::Error> {
        match value.action {
            EventType::Login => Ok(Command::Login {
                username: required(value.user, "user")?,
                pin: parse_pin(value.pin)?,
            }),
            EventType::Transfer => Ok(Command::Transfer {
                to: required(value.user, "user")?,
                amount: parse_amount(value.amount)?,
            }),
            EventType::Loan => Ok(Command::Loan {
                amount: parse_amount(value.amount)?,
            }),
            EventType::Close => Ok(Command::Close {
                username: required(value.user, "user")?,
                pin: parse_pin(value.pin)?,
            }),
            EventType::Sort => Ok(Command::Sort),
            EventType::Wait => {
                let seconds = parse_amount(value.amount)?;
                let ms = (seconds * Decimal::ONE_THOUSAND)
                    .round()
                    .to_u64()
                    .ok_or(ConvertionError::InvalidAmount(seconds.to_string()))?;
                Ok(Command::Wait { ms })
            }
        }
    }
}

#[inline]
fn required(field: Option<String>, name: &'static str) -> Result<String, ConvertionError> {
    field
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .ok_or(ConvertionError::MissingField(name))
}

/// Numeric value of the pin, so "1111" and "1111.0" are the same pin.
#[inline]
fn parse_pin(field: Option<String>) -> Result<u32, ConvertionError> {
    let pin = required(field, "pin")?;
    Decimal::from_str(&pin)
        .ok()
        .filter(|value| value.fract().is_zero())
        .and_then(|value| value.to_u32())
        .ok_or(ConvertionError::InvalidPin(pin))
}

#[inline]
fn parse_amount(field: Option<String>) -> Result<Decimal, ConvertionError> {
    let amount = required(field, "amount")?;
    Decimal::from_str(&amount).map_err(|_| ConvertionError::InvalidAmount(amount))
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConvertionError {
    #[error("Missing {0} for command")]
    MissingField(&'static str),
    #[error("Invalid pin: {0}")]
    InvalidPin(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    fn entry(action: EventType, user: &str, pin: &str, amount: &str) -> EventEntry {
        let field = |s: &str| (!s.is_empty()).then(|| s.to_string());
        EventEntry {
            action,
            user: field(user),
            pin: field(pin),
            amount: field(amount),
        }
    }

    #[test]
    fn test_convert_commands() {
        assert_eq!(
            Command::try_from(entry(EventType::Login, "js", "1111", "")).unwrap(),
            Command::Login {
                username: "js".to_string(),
                pin: 1111
            }
        );
        assert_eq!(
            Command::try_from(entry(EventType::Transfer, "jd", "", "100.5")).unwrap(),
            Command::Transfer {
                to: "jd".to_string(),
                amount: dec!(100.5)
            }
        );
        assert_eq!(
            Command::try_from(entry(EventType::Loan, "", "", "-3")).unwrap(),
            Command::Loan { amount: dec!(-3) }
        );
        assert_eq!(
            Command::try_from(entry(EventType::Sort, "", "", "")).unwrap(),
            Command::Sort
        );
        assert_eq!(
            Command::try_from(entry(EventType::Wait, "", "", "2.5")).unwrap(),
            Command::Wait { ms: 2500 }
        );
    }

    #[test]
    fn test_pin_compares_numerically() {
        let login = Command::Login {
            username: "js".to_string(),
            pin: 1111,
        };
        assert_eq!(
            Command::try_from(entry(EventType::Login, "js", "1111.0", "")).unwrap(),
            login
        );
        assert_eq!(
            Command::try_from(entry(EventType::Login, "js", " 1111 ", "")).unwrap(),
            login
        );
        assert_eq!(
            Command::try_from(entry(EventType::Close, "js", "01111", "")).unwrap(),
            Command::Close {
                username: "js".to_string(),
                pin: 1111
            }
        );
    }

    #[test]
    fn test_convert_errors() {
        assert_eq!(
            Command::try_from(entry(EventType::Login, "", "1111", "")),
            Err(ConvertionError::MissingField("user"))
        );
        assert_eq!(
            Command::try_from(entry(EventType::Close, "js", "abc", "")),
            Err(ConvertionError::InvalidPin("abc".to_string()))
        );
        assert_eq!(
            Command::try_from(entry(EventType::Login, "js", "1111.5", "")),
            Err(ConvertionError::InvalidPin("1111.5".to_string()))
        );
        assert_eq!(
            Command::try_from(entry(EventType::Login, "js", "-1111", "")),
            Err(ConvertionError::InvalidPin("-1111".to_string()))
        );
        assert_eq!(
            Command::try_from(entry(EventType::Transfer, "jd", "", "ten")),
            Err(ConvertionError::InvalidAmount("ten".to_string()))
        );
        assert_eq!(
            Command::try_from(entry(EventType::Loan, "", "", "")),
            Err(ConvertionError::MissingField("amount"))
        );
        assert!(Command::try_from(entry(EventType::Wait, "", "", "-1")).is_err());
    }
}
