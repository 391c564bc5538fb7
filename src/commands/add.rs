use crate::api::{Mode, Order};
use crate::calendar;
use crate::commands::{open_ledger, Out};
use crate::dashboard::{money, Totals};
use crate::form::TransactionForm;
use crate::model::Kind;
use crate::{Config, Result};

/// Validates and stores one transaction, then reports the refreshed totals.
pub async fn add(
    config: Config,
    mode: Mode,
    description: &str,
    amount: &str,
    kind: Kind,
    category: Option<&str>,
    date: Option<&str>,
) -> Result<Out<Totals>> {
    let mut form = TransactionForm::new(description, amount, kind);
    if let Some(category) = category {
        form = form.with_category(category);
    }
    if let Some(date) = date {
        form = form.with_date(date);
    }

    let mut ledger = open_ledger(&config, mode, Order::DateDescending).await?;
    ledger.submit(&form, calendar::today()).await?;

    let totals = ledger.totals();
    let noun = match kind {
        Kind::Credit => "income",
        Kind::Debit => "expense",
    };
    Ok(Out::new(
        format!(
            "Added {noun} '{}', the balance is now {}",
            description.trim(),
            money(totals.balance)
        ),
        totals,
    ))
}
