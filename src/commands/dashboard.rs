use crate::api::{AssetCache, AssetLoader, HttpAssetSource, Mode, Order};
use crate::commands::{open_ledger, Out};
use crate::dashboard::{listing_line, money, signed_money, Totals};
use crate::model::Transaction;
use crate::{Config, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Whether a dashboard animation could be loaded.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationStatus {
    Loaded,
    Placeholder,
}

serde_plain::derive_display_from_serialize!(AnimationStatus);

/// Everything shown on the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub totals: Totals,
    pub projected_balance: Decimal,
    pub animations: BTreeMap<String, AnimationStatus>,
    pub recent: Vec<Transaction>,
}

/// Loads every transaction and the configured animations and summarizes them. If the store cannot
/// be read the dashboard is shown with no transactions.
pub async fn dashboard(config: Config, mode: Mode, recent: usize) -> Result<Out<DashboardReport>> {
    let ledger = open_ledger(&config, mode, Order::DateDescending).await?;
    let totals = ledger.totals();

    let source = HttpAssetSource::new(config.asset_dir());
    let mut loader = AssetLoader::new(Box::new(source), AssetCache::new());
    let mut animations = BTreeMap::new();
    for (name, url) in config.animations() {
        let status = if loader.load(url).await.is_placeholder() {
            AnimationStatus::Placeholder
        } else {
            AnimationStatus::Loaded
        };
        animations.insert(name.clone(), status);
    }

    let report = DashboardReport {
        totals,
        projected_balance: totals.projected_balance(),
        animations,
        recent: ledger.recent(recent).to_vec(),
    };
    Ok(Out::new(report.to_string(), report))
}

impl fmt::Display for DashboardReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let totals = &self.totals;
        writeln!(f, "Total Balance      {}", money(totals.balance))?;
        writeln!(f, "Monthly Income     {}", money(totals.total_income))?;
        writeln!(f, "Monthly Expenses   {}", money(totals.total_expenses))?;
        writeln!(
            f,
            "Projection         {}  (expected month end)",
            money(self.projected_balance)
        )?;
        writeln!(f, "Net Flow           {}", signed_money(totals.net_flow))?;
        if !self.animations.is_empty() {
            let animations: Vec<String> = self
                .animations
                .iter()
                .map(|(name, status)| format!("{name}: {status}"))
                .collect();
            writeln!(f, "Animations         {}", animations.join(", "))?;
        }
        write!(f, "Recent Transactions")?;
        if self.recent.is_empty() {
            write!(f, "\n  (none)")?;
        }
        for t in &self.recent {
            write!(f, "\n  {}", listing_line(t))?;
        }
        Ok(())
    }
}
