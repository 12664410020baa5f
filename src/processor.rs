use crate::app::{App, Notice};
use crate::command::Command;
use crate::entry::EventEntry;
use crate::error::BankError;
use crate::view::Surface;

use std::io::Read;
use std::iter::Iterator;

use csv::{ReaderBuilder, Trim};
use tracing::{info, warn};

#[inline]
pub fn process_csv_stream(app: &mut App, reader: impl Read, surface: &mut impl Surface) {
    let mut binding = ReaderBuilder::new()
        .has_headers(true)
        .quoting(false)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let stream = binding
        .deserialize()
        .inspect(|result: &Result<EventEntry, csv::Error>| {
            if let Err(e) = result {
                warn!("Error parsing event: {}", e);
            }
        })
        .filter_map(Result::ok);

    process_stream(app, stream, surface);
}

#[inline]
pub fn process_stream(
    app: &mut App,
    stream: impl Iterator<Item = EventEntry>,
    surface: &mut impl Surface,
) {
    for entry in stream {
        let result = process_entry(app, entry, surface);

        result.unwrap_or_else(|e| {
            warn!("Event rejected: {}", e);
        });
    }
}

#[inline]
fn render(app: &App, surface: &mut impl Surface) {
    if let Some(view) = app.view() {
        surface.render(&view);
    }
}

fn process_entry(
    app: &mut App,
    entry: EventEntry,
    surface: &mut impl Surface,
) -> Result<(), BankError> {
    match Command::try_from(entry)? {
        Command::Login { username, pin } => {
            app.login(&username, pin)?;
            render(app, surface);
        }
        Command::Transfer { to, amount } => {
            app.transfer(&to, amount)?;
            render(app, surface);
        }
        Command::Loan { amount } => {
            let due_at = app.request_loan(amount)?;
            info!(%amount, due_at, "loan scheduled");
        }
        Command::Close { username, pin } => {
            app.close_account(&username, pin)?;
            surface.lock();
        }
        Command::Sort => {
            app.toggle_sort();
            render(app, surface);
        }
        Command::Wait { ms } => {
            let notices = app.advance(ms)?;
            process_notices(app, notices, surface);
            return Ok(());
        }
    }
    let notices = app.take_notices();
    process_notices(app, notices, surface);
    Ok(())
}

#[inline]
fn process_notices(app: &App, notices: Vec<Notice>, surface: &mut impl Surface) {
    for notice in notices {
        match notice {
            Notice::Tick { remaining } => surface.timer(&remaining),
            Notice::LoanCredited { .. } => render(app, surface),
            Notice::LoanCancelled { username, amount } => {
                info!(username = %username, %amount, "loan cancelled before it was credited");
            }
            Notice::SessionExpired { .. } => surface.lock(),
        }
    }
}
