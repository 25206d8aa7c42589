//! Tiered discount pricing.
//!
//! A subscription is sold for a fixed term of 6 or 12 months. The total is
//! the monthly price times the term, less either a percentage discount
//! (floored to the whole currency unit) or a flat amount.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Supported subscription terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum TermMonths {
    /// Six months.
    Six,
    /// Twelve months.
    Twelve,
}

impl TermMonths {
    /// Number of months in the term.
    pub fn months(self) -> u32 {
        match self {
            TermMonths::Six => 6,
            TermMonths::Twelve => 12,
        }
    }
}

impl TryFrom<u32> for TermMonths {
    type Error = EngineError;

    fn try_from(months: u32) -> Result<Self, Self::Error> {
        match months {
            6 => Ok(TermMonths::Six),
            12 => Ok(TermMonths::Twelve),
            other => Err(EngineError::UnsupportedTerm { months: other }),
        }
    }
}

impl From<TermMonths> for u32 {
    fn from(term: TermMonths) -> Self {
        term.months()
    }
}

/// How the discount value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountMode {
    /// Percentage of the total price.
    Rate,
    /// Flat amount off the total price.
    Amount,
}

/// A discount as entered by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discount {
    /// Percentage or flat amount.
    pub mode: DiscountMode,
    /// The entered value; absent until the user fills the field.
    #[serde(default)]
    pub value: Option<Decimal>,
}

/// Derived prices for one term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountResult {
    /// Price per month.
    pub monthly_price: Decimal,
    /// Term the price applies to.
    pub term_months: TermMonths,
    /// `monthly_price × term_months`.
    pub total_price: Decimal,
    /// Amount taken off the total.
    pub discount_amount: Decimal,
    /// `total_price − discount_amount`, always positive.
    pub final_price: Decimal,
}

/// Computes the discounted price of a term.
///
/// # Errors
///
/// - [`EngineError::MissingInput`] when the monthly price or discount value is absent
/// - [`EngineError::InvalidField`] when either is negative, or so large the
///   total cannot be represented
/// - [`EngineError::InvalidDiscount`] when the final price would be zero or less
///
/// # Examples
///
/// ```
/// use wage_engine::pricing::{Discount, DiscountMode, TermMonths, compute_discount};
/// use rust_decimal::Decimal;
///
/// let discount = Discount { mode: DiscountMode::Rate, value: Some(Decimal::new(10, 0)) };
/// let result = compute_discount(Some(Decimal::new(10_000, 0)), TermMonths::Six, &discount).unwrap();
/// assert_eq!(result.total_price, Decimal::new(60_000, 0));
/// assert_eq!(result.discount_amount, Decimal::new(6_000, 0));
/// assert_eq!(result.final_price, Decimal::new(54_000, 0));
/// ```
pub fn compute_discount(
    monthly_price: Option<Decimal>,
    term: TermMonths,
    discount: &Discount,
) -> EngineResult<DiscountResult> {
    let monthly_price = monthly_price.ok_or_else(|| EngineError::MissingInput {
        field: "monthly_price".to_string(),
    })?;
    let value = discount.value.ok_or_else(|| EngineError::MissingInput {
        field: "discount_value".to_string(),
    })?;

    if monthly_price < Decimal::ZERO {
        return Err(EngineError::InvalidField {
            field: "monthly_price".to_string(),
            message: "must not be negative".to_string(),
        });
    }
    if value < Decimal::ZERO {
        return Err(EngineError::InvalidField {
            field: "discount_value".to_string(),
            message: "must not be negative".to_string(),
        });
    }

    let too_large = |field: &str| EngineError::InvalidField {
        field: field.to_string(),
        message: "value is too large".to_string(),
    };

    let total_price = monthly_price
        .checked_mul(Decimal::from(term.months()))
        .ok_or_else(|| too_large("monthly_price"))?;
    let discount_amount = match discount.mode {
        DiscountMode::Rate => total_price
            .checked_mul(value)
            .ok_or_else(|| too_large("discount_value"))?
            .checked_div(Decimal::ONE_HUNDRED)
            .ok_or_else(|| too_large("discount_value"))?
            .floor(),
        DiscountMode::Amount => value,
    };
    let final_price = total_price - discount_amount;

    if final_price <= Decimal::ZERO {
        return Err(EngineError::InvalidDiscount { final_price });
    }

    Ok(DiscountResult {
        monthly_price,
        term_months: term,
        total_price,
        discount_amount,
        final_price,
    })
}
