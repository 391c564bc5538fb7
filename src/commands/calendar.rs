use crate::api::{Mode, Order};
use crate::calendar::{self, MonthCursor, MonthGrid};
use crate::commands::{open_ledger, Out};
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use chrono::NaiveDate;

/// Renders one month of transactions. The month is `month` (`YYYY-MM`, default the current
/// month) moved forward by `next` and back by `prev` months.
pub async fn calendar(
    config: Config,
    mode: Mode,
    month: Option<&str>,
    next: u32,
    prev: u32,
) -> Result<Out<MonthGrid>> {
    let today = calendar::today();
    let reference = match month {
        Some(month) => parse_month(month).pub_result(ErrorType::Validation)?,
        None => today,
    };
    let mut cursor = MonthCursor::new(reference);
    let shift = i64::from(next) - i64::from(prev);
    let shift = i32::try_from(shift)
        .context("Too many months to move")
        .pub_result(ErrorType::Validation)?;
    cursor.shift(shift);

    // Within a day, transactions are listed in the order the store keeps them.
    let ledger = open_ledger(&config, mode, Order::Unordered).await?;
    let grid = ledger.calendar(cursor.reference(), today);
    Ok(Out::new(grid.to_string().trim_end(), grid))
}

/// Parses `YYYY-MM` into the first day of that month.
pub fn parse_month(month: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", month.trim()), "%Y-%m-%d")
        .with_context(|| format!("'{month}' is not a valid month, expected YYYY-MM"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::error_type;
    use crate::model::Kind;
    use crate::test::{tx, TestEnv};
    use rust_decimal::Decimal;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2024-03").unwrap(), day(2024, 3, 1));
        assert!(parse_month("2024-13").is_err());
        assert!(parse_month("March").is_err());
    }

    #[tokio::test]
    async fn test_calendar_month() {
        let env = TestEnv::with_rows(vec![
            tx("1", "1000", Kind::Credit, "2024-03-01"),
            tx("2", "200", Kind::Debit, "2024-03-05"),
            tx("3", "50", Kind::Debit, "2024-03-05"),
        ])
        .await;
        let out = calendar(env.config(), Mode::Test, Some("2024-03"), 0, 0)
            .await
            .unwrap();
        let grid = out.structure().unwrap();
        assert_eq!(grid.month(), day(2024, 3, 1));
        let fifth = grid.cell(day(2024, 3, 5)).unwrap();
        assert_eq!(fifth.transactions.len(), 2);
        assert_eq!(fifth.daily_total, Decimal::from(-250));
        assert!(out.message().starts_with("March 2024"));
        assert!(out.message().contains("+1000"));
    }

    #[tokio::test]
    async fn test_calendar_navigation() {
        let env = TestEnv::with_rows(Vec::new()).await;
        let out = calendar(env.config(), Mode::Test, Some("2024-01"), 3, 1)
            .await
            .unwrap();
        assert_eq!(out.structure().unwrap().month(), day(2024, 3, 1));

        let out = calendar(env.config(), Mode::Test, Some("2024-01"), 0, 1)
            .await
            .unwrap();
        assert_eq!(out.structure().unwrap().title(), "December 2023");
    }

    #[tokio::test]
    async fn test_calendar_huge_shift() {
        let env = TestEnv::with_rows(Vec::new()).await;
        let out = calendar(env.config(), Mode::Test, Some("2024-03"), i32::MAX as u32, 0)
            .await
            .unwrap();
        assert_eq!(out.structure().unwrap().month(), day(2024, 3, 1));

        let e = calendar(env.config(), Mode::Test, Some("2024-03"), u32::MAX, 0)
            .await
            .unwrap_err();
        assert_eq!(error_type(&e), Some(ErrorType::Validation));
    }

    #[tokio::test]
    async fn test_calendar_keeps_store_order_within_a_day() {
        let env = TestEnv::with_rows(vec![
            tx("first", "1", Kind::Debit, "2024-03-05"),
            tx("other", "1", Kind::Debit, "2024-03-09"),
            tx("second", "2", Kind::Debit, "2024-03-05"),
        ])
        .await;
        let out = calendar(env.config(), Mode::Test, Some("2024-03"), 0, 0)
            .await
            .unwrap();
        let cell = out.structure().unwrap().cell(day(2024, 3, 5)).unwrap();
        let ids: Vec<_> = cell.transactions.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_calendar_bad_month() {
        let env = TestEnv::new().await;
        let e = calendar(env.config(), Mode::Test, Some("03/2024"), 0, 0)
            .await
            .unwrap_err();
        assert_eq!(error_type(&e), Some(ErrorType::Validation));
    }
}
