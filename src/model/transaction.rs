use crate::model::Amount;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The format of a calendar date as it is sent to and received from the store.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Whether a transaction adds money (`Credit`) or takes it away (`Debit`).
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Credit,
    #[default]
    Debit,
}

serde_plain::derive_display_from_serialize!(Kind);
serde_plain::derive_fromstr_from_deserialize!(Kind);

impl Kind {
    /// Applies the sign of this kind to a magnitude.
    pub fn signed(self, magnitude: Decimal) -> Decimal {
        match self {
            Kind::Credit => magnitude,
            Kind::Debit => -magnitude,
        }
    }
}

/// A single recorded money movement as it is stored in the `transactions` table.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Assigned by the store on creation.
    pub id: String,
    /// The owning user. Carried through but never interpreted.
    #[serde(rename = "user_id", default)]
    pub owner: String,
    pub amount: Amount,
    #[serde(rename = "type")]
    pub kind: Kind,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// The day the transaction happened, as received. See `Transaction::day`.
    pub date: String,
    /// When the row was inserted. Informational only.
    #[serde(default)]
    pub created_at: String,
}

impl Transaction {
    /// The calendar day this transaction belongs to, or `None` if `date` cannot be understood.
    ///
    /// The comparison is timezone-naive: a full timestamp is reduced to the date written in it,
    /// without converting it to local time first.
    pub fn day(&self) -> Option<NaiveDate> {
        parse_day(&self.date)
    }

    /// The amount with its sign taken from `kind`.
    pub fn signed_amount(&self) -> Decimal {
        self.kind.signed(self.amount.magnitude())
    }

    /// The category, or `None` when it is missing or blank.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref().filter(|s| !s.trim().is_empty())
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }
}

/// Parses the day out of a date string: `2024-03-05`, `2024-03-05T10:00:00` or
/// `2024-03-05T10:00:00-04:00`.
pub fn parse_day(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(s) {
        return Some(timestamp.date_naive());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|t| t.date())
}

/// The fields a caller supplies when creating a transaction. The store assigns `id`, `owner` and
/// `created_at`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub amount: Amount,
    #[serde(rename = "type")]
    pub kind: Kind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "wire_date")]
    pub date: NaiveDate,
}

mod wire_date {
    use super::DATE_FORMAT;
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(DATE_FORMAT).to_string())
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&s, DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}
