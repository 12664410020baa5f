use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use bankist::app::App;
use bankist::config::{self, Config};
use bankist::directory::Directory;
use bankist::processor::process_csv_stream;
use bankist::view::TextSurface;

/// Replays a CSV stream of banking UI events against in-memory accounts.
#[derive(Parser, Debug)]
#[command(name = "bankist", version)]
struct Args {
    /// Events file with header `action, user, pin, amount`
    events: PathBuf,

    /// JSON array of accounts to start with instead of the demo accounts
    #[arg(long)]
    accounts: Option<PathBuf>,

    /// Idle seconds before the session is logged out
    #[arg(
        long,
        default_value_t = config::DEFAULT_SESSION_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    timeout: u32,

    /// Delay before an approved loan is credited
    #[arg(long, default_value_t = config::DEFAULT_LOAN_DELAY_MS)]
    loan_delay_ms: u64,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let directory = match &args.accounts {
        Some(path) => match config::load_accounts(path) {
            Ok(directory) => directory,
            Err(e) => {
                error!("{}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => Directory::demo(),
    };

    let reader = match File::open(&args.events) {
        Ok(file) => BufReader::new(file),
        Err(e) => {
            error!("Failed to open {}: {}", args.events.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let config = Config {
        session_timeout_secs: args.timeout,
        loan_delay_ms: args.loan_delay_ms,
        ..Config::default()
    };
    let mut app = App::new(directory, config, Utc::now());
    let mut surface = TextSurface::stdout();

    process_csv_stream(&mut app, reader, &mut surface);

    println!("{}", app.directory());
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["bankist", "events.csv"]).unwrap();
        assert_eq!(args.events, PathBuf::from("events.csv"));
        assert_eq!(args.timeout, 300);
        assert_eq!(args.loan_delay_ms, 2500);
        assert!(args.accounts.is_none());
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        assert!(Args::try_parse_from(["bankist", "events.csv", "--timeout", "0"]).is_err());

        let args = Args::try_parse_from(["bankist", "events.csv", "--timeout", "1"]).unwrap();
        assert_eq!(args.timeout, 1);
    }
}
