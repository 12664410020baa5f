use std::fmt;
use std::fmt::Display;
use std::io::{self, Write};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::account::Account;
use crate::timer::LogoutTimer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementKind {
    Deposit,
    Withdrawal,
}

impl Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MovementKind::Deposit => f.pad("deposit"),
            MovementKind::Withdrawal => f.pad("withdrawal"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MovementRow {
    /// 1-based position in the listed order.
    pub index: usize,
    pub kind: MovementKind,
    pub date: String,
    pub amount: String,
}

/// Everything a surface needs to draw the logged in account.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountView {
    pub welcome: String,
    pub date: String,
    pub balance: String,
    pub income: String,
    pub expense: String,
    pub interest: String,
    /// Top to bottom: newest first, or largest first when sorted.
    pub rows: Vec<MovementRow>,
    pub timer: String,
    pub currency: String,
    pub locale: String,
}

impl AccountView {
    pub fn build(
        account: &Account,
        timer: &LogoutTimer,
        sorted: bool,
        now: DateTime<Utc>,
    ) -> Self {
        let summary = account.summary();
        let currency = account.currency.as_str();

        let movements = if sorted {
            account.ledger.sorted_movements()
        } else {
            account.ledger.movements().to_vec()
        };
        let mut rows: Vec<MovementRow> = movements
            .iter()
            .enumerate()
            .map(|(i, movement)| MovementRow {
                index: i + 1,
                kind: if movement.is_deposit() {
                    MovementKind::Deposit
                } else {
                    MovementKind::Withdrawal
                },
                date: format_movement_date(movement.date, now, &account.locale),
                amount: format_amount(movement.amount.abs(), currency),
            })
            .collect();
        rows.reverse();

        AccountView {
            welcome: format!("Welcome back, {}", account.first_name()),
            date: format_timestamp(now, &account.locale),
            balance: format_amount(summary.balance, currency),
            income: format_amount(summary.income, currency),
            expense: format_amount(summary.expense.abs(), currency),
            interest: format_amount(summary.interest, currency),
            rows,
            timer: timer.label(),
            currency: account.currency.clone(),
            locale: account.locale.clone(),
        }
    }
}

impl Display for AccountView {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{} ({})", self.welcome, self.date)?;
        writeln!(f, "balance: {}", self.balance)?;
        for row in &self.rows {
            writeln!(f, "{:>3} {:<10} {:<12} {}", row.index, row.kind, row.date, row.amount)?;
        }
        writeln!(
            f,
            "in: {}, out: {}, interest: {}",
            self.income, self.expense, self.interest
        )?;
        writeln!(f, "logout in {}", self.timer)
    }
}

/// Write-only display sink.
pub trait Surface {
    fn render(&mut self, view: &AccountView);

    /// Hides account data after logout or closure.
    fn lock(&mut self);

    fn timer(&mut self, _remaining: &str) {}
}

/// Plain text surface.
pub struct TextSurface<W: Write> {
    out: W,
}

impl<W: Write> TextSurface<W> {
    pub fn new(out: W) -> Self {
        TextSurface { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()) {
            tracing::error!("Failed to write output: {}", e);
        }
    }
}

impl TextSurface<io::Stdout> {
    pub fn stdout() -> Self {
        TextSurface::new(io::stdout())
    }
}

impl<W: Write> Surface for TextSurface<W> {
    fn render(&mut self, view: &AccountView) {
        self.write(&format!("{}\n", view));
    }

    fn lock(&mut self) {
        self.write("Log in to get started\n\n");
    }
}

/// Two decimals followed by the currency code.
pub fn format_amount(value: Decimal, currency: &str) -> String {
    format!("{:.2} {}", value.round_dp(2), currency)
}

fn date_pattern(locale: &str) -> &'static str {
    if locale == "en-US" {
        "%m/%d/%Y"
    } else {
        "%d/%m/%Y"
    }
}

pub fn format_timestamp(date: DateTime<Utc>, locale: &str) -> String {
    format!("{}, {}", date.format(date_pattern(locale)), date.format("%H:%M"))
}

/// Relative label for recent movements, a locale ordered date otherwise.
pub fn format_movement_date(date: DateTime<Utc>, now: DateTime<Utc>, locale: &str) -> String {
    let millis = (now - date).num_milliseconds().abs() as f64;
    let days = (millis / 86_400_000.0).round() as i64;

    match days {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        2..=7 => format!("{} days ago", days),
        _ => date.format(date_pattern(locale)).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};
    use rust_decimal::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 8, 1, 12, 0, 0).unwrap()
    }

    fn account() -> Account {
        let mut account = Account::new("Jonas Schmedtmann", 1111, dec!(1.2), "EUR", "pt-PT");
        account.record_movement(dec!(200), Utc.with_ymd_and_hms(2020, 7, 1, 10, 0, 0).unwrap());
        account.record_movement(dec!(455.23), now() - TimeDelta::days(1));
        account.record_movement(dec!(-306.5), now() - TimeDelta::hours(2));
        account
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(dec!(348.73), "EUR"), "348.73 EUR");
        assert_eq!(format_amount(dec!(1300), "USD"), "1300.00 USD");
        assert_eq!(format_amount(dec!(7.866), "EUR"), "7.87 EUR");
    }

    #[test]
    fn test_format_movement_date() {
        assert_eq!(format_movement_date(now(), now(), "pt-PT"), "Today");
        assert_eq!(
            format_movement_date(now() - TimeDelta::hours(30), now(), "pt-PT"),
            "Yesterday"
        );
        assert_eq!(
            format_movement_date(now() - TimeDelta::days(7), now(), "pt-PT"),
            "7 days ago"
        );

        let old = Utc.with_ymd_and_hms(2020, 3, 4, 8, 0, 0).unwrap();
        assert_eq!(format_movement_date(old, now(), "pt-PT"), "04/03/2020");
        assert_eq!(format_movement_date(old, now(), "en-US"), "03/04/2020");
    }

    #[test]
    fn test_build_view() {
        let timer = LogoutTimer::start(0, 299, 1000);
        let view = AccountView::build(&account(), &timer, false, now());

        assert_eq!(view.welcome, "Welcome back, Jonas");
        assert_eq!(view.date, "01/08/2020, 12:00");
        assert_eq!(view.balance, "348.73 EUR");
        assert_eq!(view.income, "655.23 EUR");
        assert_eq!(view.expense, "306.50 EUR");
        assert_eq!(view.interest, "7.86 EUR");
        assert_eq!(view.timer, "04:59");

        assert_eq!(view.rows.len(), 3);
        assert_eq!(
            view.rows[0],
            MovementRow {
                index: 3,
                kind: MovementKind::Withdrawal,
                date: "Today".to_string(),
                amount: "306.50 EUR".to_string(),
            }
        );
        assert_eq!(view.rows[1].date, "Yesterday");
        assert_eq!(view.rows[2].index, 1);
        assert_eq!(view.rows[2].date, "01/07/2020");
    }

    #[test]
    fn test_sorted_view_keeps_dates_with_amounts() {
        let timer = LogoutTimer::start(0, 300, 1000);
        let view = AccountView::build(&account(), &timer, true, now());

        let amounts: Vec<&str> = view.rows.iter().map(|r| r.amount.as_str()).collect();
        assert_eq!(amounts, vec!["455.23 EUR", "200.00 EUR", "306.50 EUR"]);
        assert_eq!(view.rows[0].date, "Yesterday");
        assert_eq!(view.rows[1].date, "01/07/2020");
        assert_eq!(view.rows[2].date, "Today");
        assert_eq!(view.rows[2].kind, MovementKind::Withdrawal);
    }

    #[test]
    fn test_text_surface() {
        let timer = LogoutTimer::start(0, 300, 1000);
        let view = AccountView::build(&account(), &timer, false, now());
        let mut surface = TextSurface::new(Vec::new());

        surface.render(&view);
        surface.lock();

        let output = String::from_utf8(surface.into_inner()).unwrap();
        assert!(output.contains("Welcome back, Jonas"));
        assert!(output.contains("balance: 348.73 EUR"));
        assert!(output.contains("deposit"));
        assert!(output.contains("logout in 05:00"));
        assert!(output.ends_with("Log in to get started\n\n"));
    }
}
