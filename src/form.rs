//! The add-transaction form and its validation.

use crate::model::{Amount, Kind, NewTransaction, DATE_FORMAT};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The category given to transactions when the user does not pick one.
pub const DEFAULT_CATEGORY: &str = "General";

/// The largest amount a single transaction may carry.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Amounts are whole cents.
const MAX_DECIMAL_PLACES: u32 = 2;

/// What the user typed into the add-transaction form. Nothing here has been checked yet.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct TransactionForm {
    pub description: String,
    pub amount: String,
    pub kind: Kind,
    pub category: Option<String>,
    pub date: Option<String>,
}

/// A required form field is missing or malformed. Fatal to the one submission only.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ValidationError {
    EmptyDescription,
    MissingAmount,
    InvalidAmount(String),
    AmountNotPositive,
    AmountTooLarge,
    TooManyDecimalPlaces,
    InvalidDate(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyDescription => write!(f, "A description is required"),
            ValidationError::MissingAmount => write!(f, "An amount is required"),
            ValidationError::InvalidAmount(s) => write!(f, "'{s}' is not a valid amount"),
            ValidationError::AmountNotPositive => write!(f, "The amount must be greater than zero"),
            ValidationError::AmountTooLarge => {
                write!(f, "The amount must not be more than {}", Amount::new(MAX_AMOUNT))
            }
            ValidationError::TooManyDecimalPlaces => {
                write!(f, "The amount must have at most {MAX_DECIMAL_PLACES} decimal places")
            }
            ValidationError::InvalidDate(s) => {
                write!(f, "'{s}' is not a valid date, expected YYYY-MM-DD")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl TransactionForm {
    pub fn new(description: impl Into<String>, amount: impl Into<String>, kind: Kind) -> Self {
        Self {
            description: description.into(),
            amount: amount.into(),
            kind,
            category: None,
            date: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Checks the form and turns it into an insert payload. `today` is used when no date was
    /// given.
    pub fn validate(&self, today: NaiveDate) -> Result<NewTransaction, ValidationError> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }

        let amount = self.amount.trim();
        if amount.is_empty() {
            return Err(ValidationError::MissingAmount);
        }
        let amount = Amount::from_str(amount)
            .map_err(|_| ValidationError::InvalidAmount(self.amount.clone()))?;
        if !amount.is_positive() {
            return Err(ValidationError::AmountNotPositive);
        }
        if amount.value() > MAX_AMOUNT {
            return Err(ValidationError::AmountTooLarge);
        }
        if amount.value().normalize().scale() > MAX_DECIMAL_PLACES {
            return Err(ValidationError::TooManyDecimalPlaces);
        }

        let category = match self.category.as_deref().map(str::trim) {
            Some(c) if !c.is_empty() => c.to_string(),
            _ => DEFAULT_CATEGORY.to_string(),
        };

        let date = match self.date.as_deref().map(str::trim) {
            Some(d) if !d.is_empty() => NaiveDate::parse_from_str(d, DATE_FORMAT)
                .map_err(|_| ValidationError::InvalidDate(d.to_string()))?,
            _ => today,
        };

        Ok(NewTransaction {
            amount,
            kind: self.kind,
            category: Some(category),
            description: Some(description.to_string()),
            date,
        })
    }
}
