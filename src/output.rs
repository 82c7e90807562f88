//! Output formatting and persistence for fare analyses.
//!
//! Supports a plain-text report, JSON serialization, and CSV append.

use anyhow::Result;
use tracing::debug;

use crate::analyzers::types::{AnalyzedItinerary, FareAnalysis};
use crate::format::{describe_fare_product, format_totals};
use crate::stats::ItineraryStats;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Logs an analysis using Rust's debug pretty-print format.
pub fn print_pretty(analysis: &FareAnalysis) {
    debug!("{:#?}", analysis);
}

/// Writes the analysis as pretty-printed JSON.
pub fn write_json<W: Write>(mut writer: W, analysis: &FareAnalysis) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, analysis)?;
    writeln!(writer)?;
    Ok(())
}

/// Writes a plain-text report: legs with their fare products, then the
/// itinerary totals and reuse/variation summary.
pub fn write_report<W: Write>(mut writer: W, analysis: &FareAnalysis) -> Result<()> {
    if analysis.itineraries.is_empty() {
        writeln!(writer, "No itineraries found.")?;
        return Ok(());
    }

    for itinerary in &analysis.itineraries {
        write_itinerary(&mut writer, itinerary)?;
    }
    Ok(())
}

fn write_itinerary<W: Write>(writer: &mut W, itinerary: &AnalyzedItinerary) -> Result<()> {
    writeln!(
        writer,
        "Itinerary {}: {} legs, total {}",
        itinerary.itinerary_index + 1,
        itinerary.legs.len(),
        format_totals(&itinerary.totals_by_currency)
    )?;

    for leg in &itinerary.legs {
        let route = leg.route_short_name.as_deref().unwrap_or("-");
        let mode = if leg.transit_leg { "transit" } else { "non-transit" };
        writeln!(writer, "  Leg {} [{}] {}", leg.leg_index + 1, route, mode)?;

        for analyzed in &leg.fare_products {
            let fare_product = &analyzed.occurrence.fare_product;
            let mut markers = String::new();
            if let Some(usage) = itinerary.usage_for(analyzed) {
                if usage.is_reused {
                    markers.push_str(&format!(" [reused x{}]", usage.occurrences.len()));
                }
                if usage.has_variation {
                    markers.push_str(&format!(" [varies: {} signatures]", usage.signatures.len()));
                }
            }
            writeln!(
                writer,
                "    {} ({}){}",
                fare_product.id,
                describe_fare_product(&fare_product.product),
                markers
            )?;
        }
    }

    let counts = itinerary.summary.product_type_counts;
    let reused = join_ids(itinerary.reused_products().map(|u| u.product_id.as_str()));
    let varied = join_ids(itinerary.variation_products().map(|u| u.product_id.as_str()));
    writeln!(
        writer,
        "  Summary: {} default, {} dependent; reused: {}; varied: {}",
        counts.default, counts.dependent, reused, varied
    )?;
    Ok(())
}

fn join_ids<'a>(ids: impl Iterator<Item = &'a str>) -> String {
    let ids: Vec<_> = ids.collect();
    if ids.is_empty() {
        "none".to_string()
    } else {
        ids.join(", ")
    }
}

/// Appends [`ItineraryStats`] records as rows to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_records(path: &str, records: &[ItineraryStats]) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, rows = records.len(), "Appending CSV records");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(())
}
