//! Subscription pricing.
//!
//! Price calculation for 6- and 12-month terms with a percentage or flat
//! discount, and the lifecycle of pricing records checked against a
//! [`PricingRepository`] for overlapping periods.

mod discount;
mod record;
mod repository;

pub use discount::{Discount, DiscountMode, DiscountResult, TermMonths, compute_discount};
pub use record::{PricingRecord, PricingStatus};
pub use repository::{InMemoryPricingRepository, PricingRepository};
