use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analyzers::types::{AnalyzedItinerary, FareAnalysis};
use crate::format::format_totals;

/// Flat per-itinerary record, suitable for CSV rows.
#[derive(Debug, Default, Serialize)]
pub struct ItineraryStats {
    pub timestamp: DateTime<Utc>,
    pub source: Option<String>,
    pub itinerary_index: Option<usize>,

    // legs
    pub legs: usize,
    pub transit_legs: usize,

    // fare products
    pub fare_products: usize,
    pub default_products: usize,
    pub dependent_products: usize,
    pub distinct_products: usize,
    pub reused_products: usize,
    pub varied_products: usize,
    pub totals: String,

    // error tracking
    pub error_type: Option<String>,
    pub error_message: Option<String>,
}

impl ItineraryStats {
    pub fn from_itinerary(itinerary: &AnalyzedItinerary) -> Self {
        let counts = itinerary.summary.product_type_counts;

        ItineraryStats {
            timestamp: Utc::now(),
            itinerary_index: Some(itinerary.itinerary_index),
            legs: itinerary.legs.len(),
            transit_legs: itinerary.transit_leg_count(),
            fare_products: itinerary.fare_product_count(),
            default_products: counts.default,
            dependent_products: counts.dependent,
            distinct_products: itinerary.usages.len(),
            reused_products: itinerary.summary.reused_products.len(),
            varied_products: itinerary.summary.variation_products.len(),
            totals: format_totals(&itinerary.totals_by_currency),
            ..Default::default()
        }
    }

    pub fn from_analysis(analysis: &FareAnalysis) -> Vec<Self> {
        analysis
            .itineraries
            .iter()
            .map(Self::from_itinerary)
            .collect()
    }

    pub fn pct(part: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            (part as f64 / total as f64) * 100.0
        }
    }

    /// Share of distinct fare products that appear on more than one leg.
    pub fn reuse_pct(&self) -> f64 {
        Self::pct(self.reused_products, self.distinct_products)
    }

    /// Create an error record with timestamp and error information
    pub fn from_error(error_type: &str, error_message: &str) -> Self {
        ItineraryStats {
            timestamp: Utc::now(),
            error_type: Some(error_type.to_string()),
            error_message: Some(error_message.to_string()),
            ..Default::default()
        }
    }

    /// Set where the plan was read from
    pub fn with_source(mut self, source: &str) -> Self {
        self.source = Some(source.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::analyze_plan;
    use crate::parser::parse_plan_input;

    fn analysis() -> FareAnalysis {
        let raw = r#"{
            "plan": { "itineraries": [{
                "legs": [
                    { "transitLeg": true, "fareProducts": [
                        { "id": "fare:a", "product": { "__typename": "DefaultFareProduct", "id": "a",
                          "price": { "amount": 250, "currency": { "code": "USD", "digits": 2 } } } }
                    ] },
                    { "transitLeg": false, "fareProducts": [] },
                    { "transitLeg": true, "fareProducts": [
                        { "id": "fare:a", "product": { "__typename": "DefaultFareProduct", "id": "a",
                          "price": { "amount": 250, "currency": { "code": "USD", "digits": 2 } } } },
                        { "id": "fare:t", "product": { "__typename": "DependentFareProduct", "id": "t" } }
                    ] }
                ]
            }] }
        }"#;
        analyze_plan(&parse_plan_input(raw).unwrap().unwrap())
    }

    #[test]
    fn test_pct_with_zero_total() {
        assert_eq!(ItineraryStats::pct(10, 0), 0.0);
    }

    #[test]
    fn test_pct_normal_values() {
        assert_eq!(ItineraryStats::pct(50, 100), 50.0);
        assert_eq!(ItineraryStats::pct(1, 4), 25.0);
    }

    #[test]
    fn test_from_analysis() {
        let rows = ItineraryStats::from_analysis(&analysis());
        assert_eq!(rows.len(), 1);

        let stats = &rows[0];
        assert_eq!(stats.itinerary_index, Some(0));
        assert_eq!(stats.legs, 3);
        assert_eq!(stats.transit_legs, 2);
        assert_eq!(stats.fare_products, 3);
        assert_eq!(stats.default_products, 2);
        assert_eq!(stats.dependent_products, 1);
        assert_eq!(stats.distinct_products, 2);
        assert_eq!(stats.reused_products, 1);
        assert_eq!(stats.varied_products, 0);
        assert_eq!(stats.totals, "USD 2.50");
        assert_eq!(stats.reuse_pct(), 50.0);
    }

    #[test]
    fn test_from_error() {
        let stats = ItineraryStats::from_error("parse_error", "bad json").with_source("plan.json");
        assert_eq!(stats.error_type.as_deref(), Some("parse_error"));
        assert_eq!(stats.error_message.as_deref(), Some("bad json"));
        assert_eq!(stats.source.as_deref(), Some("plan.json"));
        assert_eq!(stats.itinerary_index, None);
    }
}
