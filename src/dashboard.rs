//! Dashboard totals.
//!
//! All totals are computed over the whole collection that was handed in. There is no period
//! filter: "monthly" income and expenses on the dashboard are in fact all-time sums.

use crate::model::{Amount, Kind, Transaction};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// The summary figures shown on the dashboard cards.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    /// `total_income - total_expenses`.
    pub balance: Decimal,
    /// Income minus expenses over the same unfiltered set, so always equal to `balance`.
    pub net_flow: Decimal,
}

impl Totals {
    /// Sums a collection of transactions. An empty collection yields all zeros.
    pub fn compute(transactions: &[Transaction]) -> Self {
        let (total_income, total_expenses) = transactions.iter().fold(
            (Decimal::ZERO, Decimal::ZERO),
            |(income, expenses), t| match t.kind {
                Kind::Credit => (add(income, t.amount.magnitude()), expenses),
                Kind::Debit => (income, add(expenses, t.amount.magnitude())),
            },
        );
        let balance = total_income - total_expenses;
        Self {
            total_income,
            total_expenses,
            balance,
            net_flow: total_income - total_expenses,
        }
    }

    /// A naive end-of-period estimate: a non-negative net flow is assumed to repeat once more, a
    /// negative one is not projected forward.
    pub fn projected_balance(&self) -> Decimal {
        if self.net_flow >= Decimal::ZERO {
            add(self.balance, self.net_flow)
        } else {
            self.balance
        }
    }

    pub fn is_surplus(&self) -> bool {
        self.net_flow >= Decimal::ZERO
    }
}

/// Adds two values, saturating at the bounds of `Decimal` instead of panicking.
pub(crate) fn add(a: Decimal, b: Decimal) -> Decimal {
    a.checked_add(b).unwrap_or_else(|| {
        warn!("Adding {a} and {b} overflows, the total is capped");
        if b.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        }
    })
}

/// Formats a value as money, e.g. `$750.00` or `-$20.00`.
pub fn money(value: Decimal) -> String {
    Amount::new(value).to_string()
}

/// Formats the net flow with an explicit `+` when it is not negative.
pub fn signed_money(value: Decimal) -> String {
    if value >= Decimal::ZERO {
        format!("+{}", money(value))
    } else {
        money(value)
    }
}

/// One line of the recent transactions listing, e.g. `+$1,000.00  Salary  (Income • 2024-03-01)`.
pub fn listing_line(t: &Transaction) -> String {
    let sign = match t.kind {
        Kind::Credit => '+',
        Kind::Debit => '-',
    };
    format!(
        "{sign}{}  {}  ({} • {})",
        Amount::new(t.amount.magnitude()),
        t.description(),
        t.category().unwrap_or("Uncategorized"),
        t.date
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::tx;

    #[test]
    fn test_empty_is_zero() {
        let totals = Totals::compute(&[]);
        assert_eq!(totals, Totals::default());
        assert_eq!(totals.projected_balance(), Decimal::ZERO);
        assert!(totals.is_surplus());
    }

    #[test]
    fn test_march_scenario() {
        let transactions = vec![
            tx("1", "1000", Kind::Credit, "2024-03-01"),
            tx("2", "200", Kind::Debit, "2024-03-05"),
            tx("3", "50", Kind::Debit, "2024-03-05"),
        ];
        let totals = Totals::compute(&transactions);
        assert_eq!(totals.total_income, Decimal::from(1000));
        assert_eq!(totals.total_expenses, Decimal::from(250));
        assert_eq!(totals.balance, Decimal::from(750));
        assert_eq!(totals.net_flow, totals.balance);
        assert_eq!(totals.projected_balance(), Decimal::from(1500));
    }

    #[test]
    fn test_order_does_not_matter() {
        let mut transactions = vec![
            tx("1", "10.25", Kind::Credit, "2024-01-01"),
            tx("2", "3.10", Kind::Debit, "2024-01-02"),
            tx("3", "99.99", Kind::Debit, "2023-12-31"),
            tx("4", "0.01", Kind::Credit, "2024-02-29"),
        ];
        let forward = Totals::compute(&transactions);
        transactions.reverse();
        let backward = Totals::compute(&transactions);
        assert_eq!(forward, backward);
        assert_eq!(
            forward.total_income - forward.total_expenses,
            forward.balance
        );
    }

    #[test]
    fn test_negative_flow_is_not_projected() {
        let transactions = vec![
            tx("1", "100", Kind::Credit, "2024-03-01"),
            tx("2", "150", Kind::Debit, "2024-03-02"),
        ];
        let totals = Totals::compute(&transactions);
        assert_eq!(totals.balance, Decimal::from(-50));
        assert_eq!(totals.projected_balance(), Decimal::from(-50));
        assert!(!totals.is_surplus());
    }

    #[test]
    fn test_unparseable_dates_still_count() {
        let transactions = vec![tx("1", "5", Kind::Credit, "garbage")];
        assert_eq!(Totals::compute(&transactions).balance, Decimal::from(5));
    }

    #[test]
    fn test_huge_amounts_saturate() {
        let huge = "50000000000000000000000000000";
        let one = Totals::compute(&[tx("1", huge, Kind::Credit, "2024-03-01")]);
        assert_eq!(one.projected_balance(), Decimal::MAX);

        let two = Totals::compute(&[
            tx("1", huge, Kind::Credit, "2024-03-01"),
            tx("2", huge, Kind::Credit, "2024-03-02"),
        ]);
        assert_eq!(two.total_income, Decimal::MAX);
        assert_eq!(two.balance, Decimal::MAX);

        let spent = Totals::compute(&[
            tx("1", huge, Kind::Debit, "2024-03-01"),
            tx("2", huge, Kind::Debit, "2024-03-02"),
        ]);
        assert_eq!(spent.balance, -Decimal::MAX);
        assert_eq!(spent.projected_balance(), -Decimal::MAX);
        assert_eq!(add(Decimal::MIN, Decimal::NEGATIVE_ONE), Decimal::MIN);
    }

    #[test]
    fn test_formatting() {
        assert_eq!(money(Decimal::from(750)), "$750.00");
        assert_eq!(signed_money(Decimal::ZERO), "+$0.00");
        assert_eq!(signed_money(Decimal::from(-20)), "-$20.00");
    }

    #[test]
    fn test_listing_line() {
        let mut t = tx("1", "12", Kind::Debit, "2024-03-05");
        t.description = Some("Netflix".to_string());
        t.category = Some("General".to_string());
        assert_eq!(listing_line(&t), "-$12.00  Netflix  (General • 2024-03-05)");
    }
}
