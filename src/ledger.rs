//! The `Ledger` holds the current view of the store's transactions and everything derived from
//! them.

use crate::api::{Order, Store};
use crate::calendar::MonthGrid;
use crate::dashboard::Totals;
use crate::error::{ErrorType, IntoResult};
use crate::form::TransactionForm;
use crate::model::Transaction;
use crate::Result;
use chrono::NaiveDate;
use tracing::{debug, error, warn};

/// Owns a `Store` and the most recent snapshot of its rows. The snapshot is only ever replaced
/// wholesale by a successful `refresh`.
pub struct Ledger {
    store: Box<dyn Store + Send>,
    order: Order,
    transactions: Vec<Transaction>,
}

impl Ledger {
    /// Creates a ledger with an empty snapshot that will fetch rows in `order`. Call `refresh` to
    /// load it.
    pub fn new(store: Box<dyn Store + Send>, order: Order) -> Self {
        Self {
            store,
            order,
            transactions: Vec::new(),
        }
    }

    /// Creates a ledger and loads the first snapshot.
    pub async fn load(store: Box<dyn Store + Send>, order: Order) -> Self {
        let mut ledger = Self::new(store, order);
        ledger.refresh().await;
        ledger
    }

    /// Re-reads every transaction in the ledger's order. If the store fails, the failure is logged
    /// and the previous snapshot is kept. Returns whether the snapshot was replaced.
    pub async fn refresh(&mut self) -> bool {
        match self.store.fetch_all(self.order).await {
            Ok(transactions) => {
                debug!("Loaded {} transactions", transactions.len());
                self.transactions = transactions;
                true
            }
            Err(e) => {
                warn!(
                    "Unable to load transactions, showing the {} previously loaded: {e:#}",
                    self.transactions.len()
                );
                false
            }
        }
    }

    /// Validates `form` and, if it is acceptable, inserts it and refreshes the snapshot. A
    /// validation failure never reaches the store.
    pub async fn submit(&mut self, form: &TransactionForm, today: NaiveDate) -> Result<()> {
        let new = form.validate(today).pub_result(ErrorType::Validation)?;
        if let Err(e) = self.store.insert(&new).await {
            error!("Unable to save the transaction: {e:#}");
            return Err(e).pub_result(ErrorType::Store);
        }
        self.refresh().await;
        Ok(())
    }

    /// The current snapshot.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// The first `n` transactions of the snapshot, the most recent ones when ordered by date.
    pub fn recent(&self, n: usize) -> &[Transaction] {
        &self.transactions[..n.min(self.transactions.len())]
    }

    pub fn totals(&self) -> Totals {
        Totals::compute(&self.transactions)
    }

    pub fn calendar(&self, reference: NaiveDate, today: NaiveDate) -> MonthGrid {
        MonthGrid::build(reference, &self.transactions, today)
    }
}
