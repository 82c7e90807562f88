//! Data types produced by the fare analysis.

use serde::Serialize;

use crate::analyzers::totals::MoneyTotal;
use crate::analyzers::usage::{FareProductOccurrence, FareProductUsage, UsageId};
use crate::model::FareProductType;

/// Occurrence counts per product type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProductTypeCounts {
    #[serde(rename = "DefaultFareProduct")]
    pub default: usize,
    #[serde(rename = "DependentFareProduct")]
    pub dependent: usize,
}

impl ProductTypeCounts {
    pub fn record(&mut self, product_type: FareProductType) {
        match product_type {
            FareProductType::DefaultFareProduct => self.default += 1,
            FareProductType::DependentFareProduct => self.dependent += 1,
        }
    }

    pub fn get(&self, product_type: FareProductType) -> usize {
        match product_type {
            FareProductType::DefaultFareProduct => self.default,
            FareProductType::DependentFareProduct => self.dependent,
        }
    }

    pub fn total(&self) -> usize {
        self.default + self.dependent
    }
}

/// Itinerary-level summary. Reused and varied lists reference the
/// itinerary's usage records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FareSummary {
    pub totals_by_currency: Vec<MoneyTotal>,
    pub product_type_counts: ProductTypeCounts,
    pub reused_products: Vec<UsageId>,
    pub variation_products: Vec<UsageId>,
}

/// A fare product on a leg, paired with the usage record for its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyzedFareProduct {
    pub occurrence: FareProductOccurrence,
    pub usage: UsageId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedLeg {
    pub leg_index: usize,
    pub route_short_name: Option<String>,
    pub fare_products: Vec<AnalyzedFareProduct>,
    pub transit_leg: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedItinerary {
    pub itinerary_index: usize,
    pub legs: Vec<AnalyzedLeg>,
    /// Usage records in first-seen order, indexed by [`UsageId`].
    pub usages: Vec<FareProductUsage>,
    pub totals_by_currency: Vec<MoneyTotal>,
    pub summary: FareSummary,
}

impl AnalyzedItinerary {
    pub fn usage(&self, id: UsageId) -> Option<&FareProductUsage> {
        self.usages.get(id.index())
    }

    /// Usage record behind an annotated fare product.
    pub fn usage_for(&self, product: &AnalyzedFareProduct) -> Option<&FareProductUsage> {
        self.usage(product.usage)
    }

    pub fn reused_products(&self) -> impl Iterator<Item = &FareProductUsage> {
        self.summary
            .reused_products
            .iter()
            .filter_map(|id| self.usage(*id))
    }

    pub fn variation_products(&self) -> impl Iterator<Item = &FareProductUsage> {
        self.summary
            .variation_products
            .iter()
            .filter_map(|id| self.usage(*id))
    }

    pub fn fare_product_count(&self) -> usize {
        self.legs.iter().map(|leg| leg.fare_products.len()).sum()
    }

    pub fn transit_leg_count(&self) -> usize {
        self.legs.iter().filter(|leg| leg.transit_leg).count()
    }
}

/// Complete analysis of a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FareAnalysis {
    pub itineraries: Vec<AnalyzedItinerary>,
}
