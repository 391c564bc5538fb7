//! Types that represent the core data model: `Transaction`, its `Kind` and `Amount`.
mod amount;
mod transaction;

pub use amount::{Amount, AmountError};
pub use transaction::{parse_day, Kind, NewTransaction, Transaction, DATE_FORMAT};
