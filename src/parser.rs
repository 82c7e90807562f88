//! Tolerant JSON parser for OTP plan responses.
//!
//! Only the outer shape is enforced. Itineraries, legs and fare products that
//! do not have the expected shape are dropped one at a time, and malformed
//! optional fields are simply left out.

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, trace};

use crate::model::{
    DependentProduct, EntityRef, FareProduct, FareProductType, FareProductVariant, Itinerary, Leg,
    Plan, Price, ProductDetails,
};

/// Digits assumed when a currency does not declare a usable value.
pub const DEFAULT_CURRENCY_DIGITS: u32 = 2;

/// Largest currency digit count accepted from the input.
pub const MAX_CURRENCY_DIGITS: u32 = 18;

#[derive(Debug, Error)]
pub enum PlanParseError {
    #[error("{0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error(
        "Input does not match expected OTP plan structure; expected {{ \"plan\": ... }} or {{ \"data\": {{ \"plan\": ... }} }}"
    )]
    UnexpectedStructure,
}

/// Parses raw text into a validated [`Plan`].
///
/// Returns `Ok(None)` for blank input so callers can stay quiet on first load.
///
/// # Errors
///
/// Returns [`PlanParseError::InvalidJson`] when the text is not JSON and
/// [`PlanParseError::UnexpectedStructure`] when no itinerary list is found.
#[tracing::instrument(skip_all, fields(len = raw.len()))]
pub fn parse_plan_input(raw: &str) -> Result<Option<Plan>, PlanParseError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(raw)?;
    let root = value.as_object().ok_or(PlanParseError::UnexpectedStructure)?;

    let plan_record = root.get("plan").and_then(Value::as_object).or_else(|| {
        root.get("data")
            .and_then(Value::as_object)
            .and_then(|data| data.get("plan"))
            .and_then(Value::as_object)
    });

    let plan = match plan_record {
        Some(record) => {
            let raw_itineraries = record
                .get("itineraries")
                .and_then(Value::as_array)
                .ok_or(PlanParseError::UnexpectedStructure)?;
            Plan {
                itineraries: raw_itineraries.iter().filter_map(parse_itinerary).collect(),
            }
        }
        // A bare itinerary pasted without its plan wrapper.
        None if root.get("legs").is_some_and(Value::is_array) => Plan {
            itineraries: parse_itinerary(&value).into_iter().collect(),
        },
        None => return Err(PlanParseError::UnexpectedStructure),
    };

    debug!(itineraries = plan.itineraries.len(), "Plan parsed");
    Ok(Some(plan))
}

/// Decodes UTF-8 bytes and parses them with [`parse_plan_input`].
///
/// # Errors
///
/// Returns an error if the bytes are not UTF-8 or the text fails to parse.
pub fn parse_plan_bytes(bytes: &[u8]) -> Result<Option<Plan>> {
    let raw = std::str::from_utf8(bytes).context("Plan input is not valid UTF-8")?;
    Ok(parse_plan_input(raw)?)
}

fn parse_itinerary(raw: &Value) -> Option<Itinerary> {
    let Some(record) = raw.as_object() else {
        trace!("Dropping non-object itinerary");
        return None;
    };
    let legs: Vec<Leg> = record
        .get("legs")
        .and_then(Value::as_array)
        .map(|legs| legs.iter().filter_map(parse_leg).collect())
        .unwrap_or_default();
    Some(Itinerary { legs })
}

fn parse_leg(raw: &Value) -> Option<Leg> {
    let Some(record) = raw.as_object() else {
        trace!("Dropping non-object leg");
        return None;
    };
    let route_short_name = record
        .get("route")
        .and_then(Value::as_object)
        .and_then(|route| string_field(route, "shortName"));
    let fare_products: Vec<FareProduct> = record
        .get("fareProducts")
        .and_then(Value::as_array)
        .map(|products| products.iter().filter_map(parse_fare_product).collect())
        .unwrap_or_default();
    let transit_leg = record
        .get("transitLeg")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    Some(Leg {
        route_short_name,
        fare_products,
        transit_leg,
    })
}

fn parse_fare_product(raw: &Value) -> Option<FareProduct> {
    let record = raw.as_object()?;
    let id = string_field(record, "id")?;
    let product = record.get("product").and_then(Value::as_object)?;
    let typename = product.get("__typename").and_then(Value::as_str)?;
    let product_id = string_field(product, "id")?;

    let Some(product_type) = FareProductType::from_typename(typename) else {
        trace!(id = %id, typename, "Dropping fare product with unknown type");
        return None;
    };

    let details = ProductDetails {
        id: product_id,
        name: string_field(product, "name"),
        medium: product.get("medium").and_then(parse_entity),
        rider_category: product.get("riderCategory").and_then(parse_entity),
        price: product.get("price").and_then(parse_price),
    };

    let variant = match product_type {
        FareProductType::DefaultFareProduct => FareProductVariant::Default(details),
        FareProductType::DependentFareProduct => {
            let dependencies: Vec<EntityRef> = product
                .get("dependencies")
                .and_then(Value::as_array)
                .map(|deps| deps.iter().filter_map(parse_entity).collect())
                .unwrap_or_default();
            FareProductVariant::Dependent(DependentProduct {
                details,
                dependencies,
            })
        }
    };

    Some(FareProduct {
        id,
        product: variant,
    })
}

fn parse_entity(raw: &Value) -> Option<EntityRef> {
    let record = raw.as_object()?;
    let non_blank = |key: &str| string_field(record, key).filter(|s| !s.trim().is_empty());
    EntityRef::new(non_blank("id"), non_blank("name"))
}

fn parse_price(raw: &Value) -> Option<Price> {
    let record = raw.as_object()?;
    let currency = record.get("currency").and_then(Value::as_object)?;
    let currency_code = string_field(currency, "code")?;
    let currency_digits = currency.get("digits").and_then(parse_digits);
    let digits = currency_digits.unwrap_or(DEFAULT_CURRENCY_DIGITS);

    let amount = match record.get("amount")? {
        Value::Number(number) => match number.as_i64() {
            Some(minor) => Some(minor),
            None => number.as_f64().and_then(|value| {
                if value.fract() == 0.0 {
                    to_minor_units(value)
                } else {
                    // Fractional bare numbers cannot be minor units; read them as major units.
                    scale_to_minor_units(value, digits)
                }
            }),
        },
        Value::Object(amount) => decimal_amount(amount).and_then(|v| scale_to_minor_units(v, digits)),
        _ => None,
    }?;

    Some(Price {
        amount,
        currency_code,
        currency_digits,
    })
}

fn decimal_amount(amount: &Map<String, Value>) -> Option<f64> {
    if let Some(parsed) = amount.get("parsedValue").and_then(Value::as_f64) {
        if parsed.is_finite() {
            return Some(parsed);
        }
    }
    amount
        .get("source")
        .and_then(Value::as_str)
        .and_then(|source| source.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite())
}

fn parse_digits(raw: &Value) -> Option<u32> {
    let digits = match raw.as_u64() {
        Some(digits) => digits,
        None => {
            let value = raw.as_f64()?;
            if value < 0.0 || value.fract() != 0.0 {
                return None;
            }
            value as u64
        }
    };
    u32::try_from(digits)
        .ok()
        .filter(|digits| *digits <= MAX_CURRENCY_DIGITS)
}

/// Rounds half-way values toward positive infinity, so `-12.5` becomes `-12`.
fn scale_to_minor_units(value: f64, digits: u32) -> Option<i64> {
    to_minor_units((value * 10f64.powi(digits as i32) + 0.5).floor())
}

fn to_minor_units(value: f64) -> Option<i64> {
    if value.is_finite() && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

fn string_field(record: &Map<String, Value>, key: &str) -> Option<String> {
    record.get(key).and_then(Value::as_str).map(str::to_string)
}
