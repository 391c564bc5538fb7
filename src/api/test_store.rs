//! Implements the `Store` trait using in-memory data for testing purposes.
//!
//! Note: this is compiled even in the release build so that the whole app can run, top-to-bottom,
//! without a store backend. When given a path, the rows are persisted there as JSON so that one
//! CLI invocation sees what an earlier one inserted.

use crate::api::{sort_date_descending, Order, Store};
use crate::model::{NewTransaction, Transaction, DATE_FORMAT};
use crate::{utils, Result};
use anyhow::Context;
use chrono::{SecondsFormat, Utc};
use std::path::PathBuf;
use tracing::debug;
use uuid::Uuid;

/// The owner given to every row created by the `TestStore`.
pub const TEST_OWNER: &str = "test-user";

/// An implementation of the `Store` trait that holds its rows in memory.
#[derive(Debug, Clone)]
pub struct TestStore {
    rows: Vec<Transaction>,
    path: Option<PathBuf>,
}

impl TestStore {
    /// Creates an in-memory store holding `rows` that is never written to disk.
    pub fn new(rows: Vec<Transaction>) -> Self {
        Self { rows, path: None }
    }

    /// Loads the store persisted at `path`. If nothing has been persisted yet the store starts
    /// with the seed data.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let rows = if path.is_file() {
            debug!("Loading test store from {}", path.display());
            utils::deserialize(&path).await?
        } else {
            seed_data()?
        };
        Ok(Self {
            rows,
            path: Some(path),
        })
    }

    pub fn rows(&self) -> &[Transaction] {
        &self.rows
    }

    /// Writes `rows` to the backing file, if there is one.
    async fn persist(&self, rows: &[Transaction]) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let data = serde_json::to_string_pretty(rows)
            .context("Unable to serialize the test store")?;
        utils::write(path, data).await
    }
}

impl Default for TestStore {
    /// An in-memory store holding the seed data.
    fn default() -> Self {
        // The seed data is a constant in this file and is covered by tests.
        Self::new(seed_data().unwrap_or_default())
    }
}

#[async_trait::async_trait]
impl Store for TestStore {
    async fn fetch_all(&mut self, order: Order) -> Result<Vec<Transaction>> {
        let mut rows = self.rows.clone();
        if order == Order::DateDescending {
            sort_date_descending(&mut rows);
        }
        Ok(rows)
    }

    async fn insert(&mut self, transaction: &NewTransaction) -> Result<()> {
        let row = Transaction {
            id: Uuid::new_v4().to_string(),
            owner: TEST_OWNER.to_string(),
            amount: transaction.amount,
            kind: transaction.kind,
            category: transaction.category.clone(),
            description: transaction.description.clone(),
            date: transaction.date.format(DATE_FORMAT).to_string(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        };
        debug!("Inserting {} into the test store", row.id);
        // The row only becomes visible once it has been written.
        let mut rows = self.rows.clone();
        rows.push(row);
        self.persist(&rows).await?;
        self.rows = rows;
        Ok(())
    }
}

/// Parses the seed rows from this module.
fn seed_data() -> Result<Vec<Transaction>> {
    let mut reader = csv::Reader::from_reader(SEED_TRANSACTIONS.as_bytes());
    reader
        .deserialize()
        .collect::<std::result::Result<Vec<Transaction>, _>>()
        .context("Unable to parse the test store seed data")
}

/// Seed transaction data, in the column layout of the `transactions` table.
const SEED_TRANSACTIONS: &str = r##"id,user_id,amount,type,category,description,date,created_at
seed-0001,test-user,3200.00,credit,Income,Salary,2025-10-01,2025-10-01T09:00:00.000000Z
seed-0002,test-user,1450.00,debit,Housing,Rent,2025-10-01,2025-10-01T09:05:00.000000Z
seed-0003,test-user,87.43,debit,Groceries,Whole Foods Market,2025-10-04,2025-10-04T17:12:30.000000Z
seed-0004,test-user,6.75,debit,Coffee,Starbucks,2025-10-06,2025-10-06T08:45:12.000000Z
seed-0005,test-user,142.67,debit,Utilities,Electric bill,2025-10-08,2025-10-08T06:00:00.000000Z
seed-0006,test-user,250.00,credit,Freelance,Logo design,2025-10-10,2025-10-10T14:20:00.000000Z
seed-0007,test-user,52.30,debit,Transport,Gas,2025-10-10,2025-10-10T18:02:41.000000Z
seed-0008,test-user,15.99,debit,General,Netflix,2025-10-15,2025-10-15T00:00:00.000000Z
seed-0009,test-user,63.21,debit,Groceries,Trader Joe's,2025-10-18,2025-10-18T16:18:33.000000Z
seed-0010,test-user,40.00,credit,,Sold old bike,2025-10-21,2025-10-21T11:30:00.000000Z
"##;
