use std::fmt;
use std::fmt::Display;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::dec;

use crate::account::{Account, AccountSeed};
use crate::ledger::Movement;

/// All known accounts, in insertion order.
///
/// Lookups scan linearly and the first match wins, so duplicate usernames
/// shadow later accounts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Directory {
    accounts: Vec<Account>,
}

impl Directory {
    pub fn new() -> Self {
        Directory::default()
    }

    pub fn from_seeds(seeds: Vec<AccountSeed>) -> Self {
        Directory {
            accounts: seeds.into_iter().map(Account::from).collect(),
        }
    }

    pub fn push(&mut self, account: Account) {
        self.accounts.push(account);
    }

    #[inline]
    pub fn find_by_username(&self, username: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.username == username)
    }

    #[inline]
    pub fn find_by_username_mut(&mut self, username: &str) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| a.username == username)
    }

    /// Removes the first account with `username`, if any.
    pub fn remove_by_username(&mut self, username: &str) -> Option<Account> {
        let index = self.accounts.iter().position(|a| a.username == username)?;
        Some(self.accounts.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// The two demo accounts the application ships with.
    pub fn demo() -> Self {
        Directory::from_seeds(vec![
            demo_seed(
                "Jonas Schmedtmann",
                1111,
                dec!(1.2),
                "EUR",
                "pt-PT",
                &[
                    (dec!(200), "2019-11-18T21:31:17.178Z"),
                    (dec!(455.23), "2019-12-23T07:42:02.383Z"),
                    (dec!(-306.5), "2020-01-28T09:15:04.904Z"),
                    (dec!(25000), "2020-04-01T10:17:24.185Z"),
                    (dec!(-642.21), "2020-05-08T14:11:59.604Z"),
                    (dec!(-133.9), "2020-05-27T17:01:17.194Z"),
                    (dec!(79.97), "2020-07-11T23:36:17.929Z"),
                    (dec!(1300), "2020-07-01T10:51:36.790Z"),
                ],
            ),
            demo_seed(
                "Jessica Davis",
                2222,
                dec!(1.5),
                "USD",
                "en-US",
                &[
                    (dec!(5000), "2019-11-01T13:15:33.035Z"),
                    (dec!(3400), "2019-11-30T09:48:16.867Z"),
                    (dec!(-150), "2019-12-25T06:04:23.907Z"),
                    (dec!(-790), "2020-01-25T14:18:46.235Z"),
                    (dec!(-3210), "2020-02-05T16:33:06.386Z"),
                    (dec!(-1000), "2020-04-10T14:43:26.374Z"),
                    (dec!(8500), "2020-06-25T18:49:59.371Z"),
                    (dec!(-30), "2023-01-27T12:01:20.894Z"),
                ],
            ),
        ])
    }
}

fn demo_seed(
    owner: &str,
    pin: u32,
    interest_rate: Decimal,
    currency: &str,
    locale: &str,
    movements: &[(Decimal, &str)],
) -> AccountSeed {
    AccountSeed {
        owner: owner.to_string(),
        pin,
        interest_rate,
        currency: currency.to_string(),
        locale: locale.to_string(),
        movements: movements
            .iter()
            .map(|(amount, date)| Movement {
                amount: *amount,
                date: date
                    .parse::<DateTime<Utc>>()
                    .expect("demo movement dates are valid RFC 3339"),
            })
            .collect(),
    }
}

impl Display for Directory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "owner, username, balance, movements")?;

        for account in &self.accounts {
            writeln!(
                f,
                "{}, {}, {:.2}, {}",
                account.owner,
                account.username,
                account.balance(),
                account.ledger.len()
            )?;
        }
        Ok(())
    }
}
