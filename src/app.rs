use chrono::{DateTime, TimeDelta, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::account::Account;
use crate::config::Config;
use crate::directory::Directory;
use crate::error::BankError;
use crate::session::{ActiveSession, Session};
use crate::timer::{LogoutTimer, TimerState, format_countdown};
use crate::view::AccountView;

/// A loan credit waiting for its delay to elapse.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingLoan {
    pub session_id: u64,
    pub username: String,
    pub amount: Decimal,
    pub due_at: u64,
}

/// Something that happened while the clock advanced.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Tick { remaining: String },
    LoanCredited { username: String, amount: Decimal },
    LoanCancelled { username: String, amount: Decimal },
    SessionExpired { username: String },
}

/// Logical clock: a fixed origin plus elapsed milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    origin: DateTime<Utc>,
    elapsed_ms: u64,
}

impl Clock {
    pub fn new(origin: DateTime<Utc>) -> Self {
        Clock {
            origin,
            elapsed_ms: 0,
        }
    }

    #[inline]
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Current instant; clamps at the latest representable date.
    pub fn now(&self) -> DateTime<Utc> {
        self.at(self.elapsed_ms).unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    fn at(&self, elapsed_ms: u64) -> Option<DateTime<Utc>> {
        let delta = TimeDelta::try_milliseconds(i64::try_from(elapsed_ms).ok()?)?;
        self.origin.checked_add_signed(delta)
    }

    /// Elapsed milliseconds `ms` from now, if that instant is representable.
    pub fn checked_offset(&self, ms: u64) -> Option<u64> {
        let target = self.elapsed_ms.checked_add(ms)?;
        self.at(target)?;
        Some(target)
    }

    fn set(&mut self, elapsed_ms: u64) {
        self.elapsed_ms = self.elapsed_ms.max(elapsed_ms);
    }
}

/// Application state: accounts, the current session and everything scheduled
/// against the clock. Every operation either succeeds or leaves state as it
/// was.
pub struct App {
    config: Config,
    directory: Directory,
    session: Session,
    sorted: bool,
    clock: Clock,
    pending_loans: Vec<PendingLoan>,
    next_session_id: u64,
    notices: Vec<Notice>,
}

impl App {
    pub fn new(directory: Directory, config: Config, origin: DateTime<Utc>) -> Self {
        App {
            config,
            directory,
            session: Session::LoggedOut,
            sorted: false,
            clock: Clock::new(origin),
            pending_loans: Vec::new(),
            next_session_id: 1,
            notices: Vec::new(),
        }
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn pending_loans(&self) -> &[PendingLoan] {
        &self.pending_loans
    }

    /// Notices queued since the last call, including loans cancelled by
    /// login, logout or account closure.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    #[inline]
    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    pub fn current_account(&self) -> Option<&Account> {
        self.directory.find_by_username(self.session.username()?)
    }

    #[inline]
    fn start_timer(&self) -> LogoutTimer {
        LogoutTimer::start(
            self.clock.elapsed_ms(),
            self.config.session_timeout_secs,
            self.config.tick_ms,
        )
    }

    #[inline]
    fn current(&self) -> Result<(&ActiveSession, &Account), BankError> {
        let active = self.session.active().ok_or(BankError::NotLoggedIn)?;
        let account = self
            .directory
            .find_by_username(&active.username)
            .ok_or(BankError::NotLoggedIn)?;
        Ok((active, account))
    }

    pub fn login(&mut self, username: &str, pin: u32) -> Result<(), BankError> {
        let account = self
            .directory
            .find_by_username(username)
            .filter(|a| a.pin == pin)
            .ok_or(BankError::InvalidCredentials)?;
        let username = account.username.clone();

        self.logout();

        let id = self.next_session_id;
        self.next_session_id += 1;
        self.session = Session::LoggedIn(ActiveSession {
            id,
            username: username.clone(),
            timer: self.start_timer(),
        });
        self.sorted = false;

        info!(username = %username, session = id, "logged in");
        Ok(())
    }

    /// Ends the current session and drops loans still pending for it.
    pub fn logout(&mut self) -> Option<String> {
        let ended = self.session.end()?;
        let (cancelled, kept): (Vec<PendingLoan>, Vec<PendingLoan>) = self
            .pending_loans
            .drain(..)
            .partition(|loan| loan.session_id == ended.id);
        self.pending_loans = kept;
        for loan in cancelled {
            self.cancel_loan(loan);
        }
        Some(ended.username)
    }

    pub fn transfer(&mut self, to: &str, amount: Decimal) -> Result<(), BankError> {
        let (_, from) = self.current()?;
        if amount <= Decimal::ZERO {
            return Err(BankError::NonPositiveAmount);
        }
        let receiver = self
            .directory
            .find_by_username(to)
            .ok_or_else(|| BankError::AccountNotFound(to.to_string()))?;
        if receiver.username == from.username {
            return Err(BankError::SelfTransfer);
        }
        if amount > from.balance() {
            return Err(BankError::InsufficientBalance);
        }
        if !receiver.ledger.can_record(amount, receiver.interest_rate)
            || !from.ledger.can_record(-amount, from.interest_rate)
        {
            return Err(BankError::AmountOutOfRange);
        }

        let from = from.username.clone();
        let now = self.clock.now();
        if let Some(receiver) = self.directory.find_by_username_mut(to) {
            receiver.record_movement(amount, now);
        }
        if let Some(sender) = self.directory.find_by_username_mut(&from) {
            sender.record_movement(-amount, now);
        }
        let timer = self.start_timer();
        self.session.restart_timer(timer);

        info!(from = %from, to = %to, %amount, "transfer completed");
        Ok(())
    }

    /// Schedules a loan credit; returns the clock instant it will land at.
    pub fn request_loan(&mut self, amount: Decimal) -> Result<u64, BankError> {
        let (active, account) = self.current()?;
        if amount <= Decimal::ZERO {
            return Err(BankError::NonPositiveAmount);
        }
        if !account.ledger.any_at_least(amount / Decimal::TEN) {
            return Err(BankError::LoanNotEligible);
        }
        if !account.ledger.can_record(amount, account.interest_rate) {
            return Err(BankError::AmountOutOfRange);
        }
        let due_at = self
            .clock
            .checked_offset(self.config.loan_delay_ms)
            .ok_or(BankError::TimeOutOfRange)?;

        let loan = PendingLoan {
            session_id: active.id,
            username: active.username.clone(),
            amount,
            due_at,
        };
        info!(username = %loan.username, %amount, due_at, "loan approved");
        self.pending_loans.push(loan);
        Ok(due_at)
    }

    pub fn close_account(&mut self, username: &str, pin: u32) -> Result<Account, BankError> {
        let (_, account) = self.current()?;
        if !account.matches(username, pin) {
            return Err(BankError::InvalidCredentials);
        }

        self.logout();
        let closed = self
            .directory
            .remove_by_username(username)
            .ok_or_else(|| BankError::AccountNotFound(username.to_string()))?;
        info!(username = %username, "account closed");
        Ok(closed)
    }

    pub fn toggle_sort(&mut self) -> bool {
        self.sorted = !self.sorted;
        self.sorted
    }

    /// Moves the clock forward by `ms`, firing due loans and timer ticks in
    /// time order, and returns every queued notice. Loans due at the same
    /// instant as a tick land first.
    pub fn advance(&mut self, ms: u64) -> Result<Vec<Notice>, BankError> {
        let target = self
            .clock
            .checked_offset(ms)
            .ok_or(BankError::TimeOutOfRange)?;

        loop {
            let next_loan = self.pending_loans.iter().map(|l| l.due_at).min();
            let next_tick = self.session.timer().map(LogoutTimer::next_tick_at);

            match (next_loan, next_tick) {
                (Some(loan), tick) if loan <= target && tick.is_none_or(|t| loan <= t) => {
                    self.clock.set(loan);
                    self.complete_loans(loan);
                }
                (_, Some(tick)) if tick <= target => {
                    self.clock.set(tick);
                    self.tick();
                }
                _ => break,
            }
        }

        self.clock.set(target);
        Ok(self.take_notices())
    }

    fn cancel_loan(&mut self, loan: PendingLoan) {
        info!(username = %loan.username, amount = %loan.amount, "pending loan cancelled");
        self.notices.push(Notice::LoanCancelled {
            username: loan.username,
            amount: loan.amount,
        });
    }

    fn complete_loans(&mut self, at: u64) {
        let (due, waiting): (Vec<PendingLoan>, Vec<PendingLoan>) = self
            .pending_loans
            .drain(..)
            .partition(|loan| loan.due_at <= at);
        self.pending_loans = waiting;

        let now = self.clock.now();
        for loan in due {
            if !self.session.active().is_some_and(|s| s.id == loan.session_id) {
                continue;
            }
            let Some(account) = self.directory.find_by_username_mut(&loan.username) else {
                continue;
            };
            if !account.ledger.can_record(loan.amount, account.interest_rate) {
                self.cancel_loan(loan);
                continue;
            }
            account.record_movement(loan.amount, now);
            let timer = self.start_timer();
            self.session.restart_timer(timer);

            info!(username = %loan.username, amount = %loan.amount, "loan credited");
            self.notices.push(Notice::LoanCredited {
                username: loan.username,
                amount: loan.amount,
            });
        }
    }

    fn tick(&mut self) {
        let Some(active) = self.session.active_mut() else {
            return;
        };
        match active.timer.tick() {
            TimerState::Running(_) => {
                let remaining = active.timer.label();
                debug!(username = %active.username, %remaining, "tick");
                self.notices.push(Notice::Tick { remaining });
            }
            TimerState::Expired => {
                if let Some(username) = self.logout() {
                    info!(username = %username, "session expired");
                    self.notices.push(Notice::Tick {
                        remaining: format_countdown(0),
                    });
                    self.notices.push(Notice::SessionExpired { username });
                }
            }
        }
    }

    /// Display model for the logged in account.
    pub fn view(&self) -> Option<AccountView> {
        let (active, account) = self.current().ok()?;
        Some(AccountView::build(
            account,
            &active.timer,
            self.sorted,
            self.clock.now(),
        ))
    }
}
