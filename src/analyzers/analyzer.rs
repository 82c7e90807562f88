use std::collections::HashSet;

use tracing::debug;

use crate::analyzers::signature::signature_for_product;
use crate::analyzers::totals::CurrencyTotals;
use crate::analyzers::types::{
    AnalyzedFareProduct, AnalyzedItinerary, AnalyzedLeg, FareAnalysis, FareSummary,
    ProductTypeCounts,
};
use crate::analyzers::usage::{FareProductOccurrence, UsageId, UsageRegistry};
use crate::model::{Itinerary, Plan};

/// Analyzes every itinerary of a plan.
///
/// Itineraries, legs and fare products are visited in source order. Usage
/// records are scoped to a single itinerary, so an id shared across
/// itineraries is not reuse.
#[tracing::instrument(skip_all, fields(itineraries = plan.itineraries.len()))]
pub fn analyze_plan(plan: &Plan) -> FareAnalysis {
    FareAnalysis {
        itineraries: plan
            .itineraries
            .iter()
            .enumerate()
            .map(|(index, itinerary)| analyze_itinerary(index, itinerary))
            .collect(),
    }
}

/// Folds one itinerary's fare products into usage records and totals.
///
/// Each occurrence id adds its price to the totals at most once; the first
/// priced occurrence wins.
pub fn analyze_itinerary(itinerary_index: usize, itinerary: &Itinerary) -> AnalyzedItinerary {
    let mut registry = UsageRegistry::default();
    let mut totals = CurrencyTotals::default();
    let mut credited: HashSet<&str> = HashSet::new();
    let mut type_counts = ProductTypeCounts::default();
    let mut legs = Vec::with_capacity(itinerary.legs.len());

    for (leg_index, leg) in itinerary.legs.iter().enumerate() {
        let mut fare_products = Vec::with_capacity(leg.fare_products.len());

        for fare_product in &leg.fare_products {
            type_counts.record(fare_product.product.product_type());

            let occurrence = FareProductOccurrence {
                itinerary_index,
                leg_index,
                fare_product: fare_product.clone(),
                signature: signature_for_product(&fare_product.product),
            };
            let usage = registry.record(occurrence.clone());
            fare_products.push(AnalyzedFareProduct { occurrence, usage });

            if let Some(price) = fare_product.product.price() {
                if credited.insert(fare_product.id.as_str()) {
                    totals.add(price);
                }
            }
        }

        legs.push(AnalyzedLeg {
            leg_index,
            route_short_name: leg.route_short_name.clone(),
            fare_products,
            transit_leg: leg.transit_leg,
        });
    }

    let usages = registry.into_usages();
    let reused_products = usages
        .iter()
        .enumerate()
        .filter(|(_, usage)| usage.is_reused)
        .map(|(index, _)| UsageId(index))
        .collect::<Vec<_>>();
    let variation_products = usages
        .iter()
        .enumerate()
        .filter(|(_, usage)| usage.has_variation)
        .map(|(index, _)| UsageId(index))
        .collect::<Vec<_>>();
    let totals_by_currency = totals.into_vec();

    debug!(
        itinerary_index,
        legs = legs.len(),
        products = usages.len(),
        reused = reused_products.len(),
        varied = variation_products.len(),
        "Itinerary analyzed"
    );

    AnalyzedItinerary {
        itinerary_index,
        legs,
        usages,
        totals_by_currency: totals_by_currency.clone(),
        summary: FareSummary {
            totals_by_currency,
            product_type_counts: type_counts,
            reused_products,
            variation_products,
        },
    }
}
