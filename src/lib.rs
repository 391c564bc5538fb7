//! budgetflow: a personal finance dashboard.
//!
//! Transactions live in a remote store. From a snapshot of them the crate derives the dashboard
//! totals, a naive month-end projection and a month calendar grid, and it validates new
//! transactions before they are sent to the store.

pub mod api;
pub mod args;
pub mod calendar;
pub mod commands;
mod config;
pub mod dashboard;
pub mod error;
pub mod form;
pub mod ledger;
pub mod model;
mod utils;


pub use api::Mode;
pub use config::Config;
pub use error::{Error, ErrorType, Result};
