//! Itinerary-scoped usage records for reuse and variation detection.

use serde::Serialize;
use std::collections::HashMap;

use crate::model::{FareProduct, FareProductType};

/// Index of a [`FareProductUsage`] inside its itinerary's registry.
///
/// Every annotation of the same occurrence id holds the same `UsageId`, so
/// they all observe one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UsageId(pub(crate) usize);

impl UsageId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One appearance of a fare product on a leg.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FareProductOccurrence {
    pub itinerary_index: usize,
    pub leg_index: usize,
    pub fare_product: FareProduct,
    pub signature: String,
}

/// Everything seen for one occurrence id within an itinerary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FareProductUsage {
    pub product_id: String,
    pub occurrences: Vec<FareProductOccurrence>,
    /// Distinct signatures in first-seen order.
    pub signatures: Vec<String>,
    pub is_reused: bool,
    pub has_variation: bool,
    pub product_type: FareProductType,
    pub representative: FareProduct,
}

impl FareProductUsage {
    fn new(occurrence: FareProductOccurrence) -> Self {
        let mut usage = Self {
            product_id: occurrence.fare_product.id.clone(),
            occurrences: Vec::new(),
            signatures: Vec::new(),
            is_reused: false,
            has_variation: false,
            product_type: occurrence.fare_product.product.product_type(),
            representative: occurrence.fare_product.clone(),
        };
        usage.push(occurrence);
        usage
    }

    fn push(&mut self, occurrence: FareProductOccurrence) {
        if !self.signatures.contains(&occurrence.signature) {
            self.signatures.push(occurrence.signature.clone());
        }
        self.occurrences.push(occurrence);
        self.is_reused = self.occurrences.len() > 1;
        self.has_variation = self.signatures.len() > 1;
    }
}

/// Usage records keyed by occurrence id, in first-seen order.
#[derive(Debug, Default)]
pub struct UsageRegistry {
    usages: Vec<FareProductUsage>,
    by_product: HashMap<String, UsageId>,
}

impl UsageRegistry {
    /// Folds an occurrence into the record for its id, creating it on first sight.
    pub fn record(&mut self, occurrence: FareProductOccurrence) -> UsageId {
        if let Some(&id) = self.by_product.get(&occurrence.fare_product.id) {
            self.usages[id.0].push(occurrence);
            return id;
        }

        let id = UsageId(self.usages.len());
        self.by_product
            .insert(occurrence.fare_product.id.clone(), id);
        self.usages.push(FareProductUsage::new(occurrence));
        id
    }

    pub fn into_usages(self) -> Vec<FareProductUsage> {
        self.usages
    }
}
