//! Fare analysis over a validated plan.
//!
//! Each itinerary is folded into usage records keyed by occurrence id,
//! per-currency totals that credit every id at most once, and a summary of
//! reused and varied fare products.

pub mod analyzer;
pub mod signature;
pub mod totals;
pub mod types;
pub mod usage;

pub use analyzer::{analyze_itinerary, analyze_plan};
pub use totals::MoneyTotal;
pub use types::{AnalyzedFareProduct, AnalyzedItinerary, AnalyzedLeg, FareAnalysis, FareSummary};
pub use usage::{FareProductOccurrence, FareProductUsage, UsageId};
