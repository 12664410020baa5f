use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

/// A single signed amount and the instant it was recorded.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Movement {
    pub amount: Decimal,
    pub date: DateTime<Utc>,
}

impl Movement {
    #[inline]
    pub fn is_deposit(&self) -> bool {
        self.amount > Decimal::ZERO
    }
}

/// Totals derived from a ledger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub balance: Decimal,
    pub income: Decimal,
    pub expense: Decimal,
    pub interest: Decimal,
}

/// Chronological record of an account's movements.
///
/// Amounts and dates are kept as pairs, so every amount always has exactly one
/// date at the same position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    movements: Vec<Movement>,
}

impl Ledger {
    pub fn new() -> Self {
        Ledger::default()
    }

    pub fn from_movements(movements: Vec<Movement>) -> Self {
        Ledger { movements }
    }

    #[inline]
    pub fn record(&mut self, amount: Decimal, date: DateTime<Utc>) {
        self.movements.push(Movement { amount, date });
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.movements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.movements.is_empty()
    }

    pub fn movements(&self) -> &[Movement] {
        &self.movements
    }

    pub fn amounts(&self) -> impl Iterator<Item = Decimal> + '_ {
        self.movements.iter().map(|m| m.amount)
    }

    pub fn dates(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        self.movements.iter().map(|m| m.date)
    }

    // Totals saturate at the Decimal range; `can_record` keeps recorded
    // movements inside it.
    pub fn balance(&self) -> Decimal {
        self.amounts().fold(Decimal::ZERO, |acc, a| acc.saturating_add(a))
    }

    pub fn total_income(&self) -> Decimal {
        self.amounts()
            .filter(|a| *a > Decimal::ZERO)
            .fold(Decimal::ZERO, |acc, a| acc.saturating_add(a))
    }

    pub fn total_expense(&self) -> Decimal {
        self.amounts()
            .filter(|a| *a < Decimal::ZERO)
            .fold(Decimal::ZERO, |acc, a| acc.saturating_add(a))
    }

    /// Interest on every deposit at `rate` percent.
    pub fn total_interest(&self, rate: Decimal) -> Decimal {
        let factor = rate / Decimal::ONE_HUNDRED;
        self.amounts()
            .filter(|a| *a > Decimal::ZERO)
            .map(|deposit| deposit.saturating_mul(factor))
            .fold(Decimal::ZERO, |acc, i| acc.saturating_add(i))
    }

    /// Totals with `extra` appended, or `None` if any of them overflows.
    pub fn checked_summary(&self, rate: Decimal, extra: Option<Decimal>) -> Option<Summary> {
        let factor = rate.checked_div(Decimal::ONE_HUNDRED)?;
        let mut summary = Summary {
            balance: Decimal::ZERO,
            income: Decimal::ZERO,
            expense: Decimal::ZERO,
            interest: Decimal::ZERO,
        };
        for amount in self.amounts().chain(extra) {
            summary.balance = summary.balance.checked_add(amount)?;
            if amount > Decimal::ZERO {
                summary.income = summary.income.checked_add(amount)?;
                summary.interest = summary.interest.checked_add(amount.checked_mul(factor)?)?;
            } else if amount < Decimal::ZERO {
                summary.expense = summary.expense.checked_add(amount)?;
            }
        }
        Some(summary)
    }

    /// True if recording `amount` keeps every total representable.
    #[inline]
    pub fn can_record(&self, amount: Decimal, rate: Decimal) -> bool {
        self.checked_summary(rate, Some(amount)).is_some()
    }

    /// True if any single movement is at least `threshold`.
    pub fn any_at_least(&self, threshold: Decimal) -> bool {
        self.amounts().any(|a| a >= threshold)
    }

    /// Movements ordered ascending by amount, each keeping its own date.
    /// Equal amounts stay in recording order.
    pub fn sorted_movements(&self) -> Vec<Movement> {
        let mut sorted = self.movements.clone();
        sorted.sort_by(|a, b| a.amount.cmp(&b.amount));
        sorted
    }

    pub fn summary(&self, rate: Decimal) -> Summary {
        Summary {
            balance: self.balance(),
            income: self.total_income(),
            expense: self.total_expense(),
            interest: self.total_interest(rate),
        }
    }
}
