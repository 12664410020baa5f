pub mod account;
pub mod app;
pub mod command;
pub mod config;
pub mod directory;
pub mod entry;
pub mod error;
pub mod ledger;
pub mod processor;
pub mod session;
pub mod timer;
pub mod view;
