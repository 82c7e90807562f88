//! Human-readable rendering of prices, totals and fare products.

use crate::analyzers::totals::MoneyTotal;
use crate::model::{EntityRef, FareProductVariant, Price};
use crate::parser::{DEFAULT_CURRENCY_DIGITS, MAX_CURRENCY_DIGITS};

/// Placeholder rendered for an empty list of totals.
pub const NO_TOTAL: &str = "—";

/// Anything carrying an amount in minor units and a currency.
pub trait Monetary {
    fn amount(&self) -> i64;
    fn currency_code(&self) -> &str;
    fn currency_digits(&self) -> Option<u32>;
}

impl Monetary for Price {
    fn amount(&self) -> i64 {
        self.amount
    }
    fn currency_code(&self) -> &str {
        &self.currency_code
    }
    fn currency_digits(&self) -> Option<u32> {
        self.currency_digits
    }
}

impl Monetary for MoneyTotal {
    fn amount(&self) -> i64 {
        self.amount
    }
    fn currency_code(&self) -> &str {
        &self.currency_code
    }
    fn currency_digits(&self) -> Option<u32> {
        Some(self.currency_digits)
    }
}

/// Formats an amount as `<CODE> <major>.<minor>`, e.g. `USD 2.50`.
///
/// | amount | digits | output      |
/// |--------|--------|-------------|
/// | 250    | 2      | `USD 2.50`  |
/// | -25    | unset  | `USD -0.25` |
/// | 210    | 0      | `JPY 210`   |
///
/// Digits above [`MAX_CURRENCY_DIGITS`] render with that many places.
pub fn format_money(value: &impl Monetary) -> String {
    let digits = value
        .currency_digits()
        .unwrap_or(DEFAULT_CURRENCY_DIGITS)
        .min(MAX_CURRENCY_DIGITS);
    format!(
        "{} {}",
        value.currency_code(),
        format_minor_units(value.amount(), digits)
    )
}

fn format_minor_units(amount: i64, digits: u32) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = u128::from(amount.unsigned_abs());
    if digits == 0 {
        return format!("{sign}{abs}");
    }
    let divisor = 10u128.pow(digits);
    format!(
        "{sign}{}.{:0width$}",
        abs / divisor,
        abs % divisor,
        width = digits as usize
    )
}

/// Joins totals with ` + `, or returns [`NO_TOTAL`] when there are none.
pub fn format_totals(totals: &[MoneyTotal]) -> String {
    if totals.is_empty() {
        return NO_TOTAL.to_string();
    }
    totals
        .iter()
        .map(format_money)
        .collect::<Vec<_>>()
        .join(" + ")
}

/// One-line caption for a fare product: type, price, medium, rider and,
/// for dependent products, the dependency ids.
pub fn describe_fare_product(product: &FareProductVariant) -> String {
    let details = product.details();
    let mut parts = vec![product.product_type().as_str().to_string()];

    if let Some(price) = &details.price {
        parts.push(format_money(price));
    }
    if let Some(medium) = details.medium.as_ref().and_then(|e| labeled("Medium", e)) {
        parts.push(medium);
    }
    if let Some(rider) = details.rider_category.as_ref().and_then(|e| labeled("Rider", e)) {
        parts.push(rider);
    }
    if let FareProductVariant::Dependent(dependent) = product {
        if !dependent.dependencies.is_empty() {
            let deps = dependent
                .dependencies
                .iter()
                .map(|dep| {
                    dep.id
                        .as_deref()
                        .or(dep.name.as_deref())
                        .unwrap_or("unknown")
                })
                .collect::<Vec<_>>()
                .join(", ");
            parts.push(format!("Dependencies: {deps}"));
        }
    }

    parts.join(" · ")
}

fn labeled(label: &str, entity: &EntityRef) -> Option<String> {
    let text = [entity.name.as_deref(), entity.id.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
    (!text.is_empty()).then(|| format!("{label}: {text}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DependentProduct, ProductDetails};

    fn price(amount: i64, code: &str, digits: Option<u32>) -> Price {
        Price {
            amount,
            currency_code: code.into(),
            currency_digits: digits,
        }
    }

    fn total(amount: i64, code: &str, digits: u32) -> MoneyTotal {
        MoneyTotal {
            currency_code: code.into(),
            currency_digits: digits,
            amount,
        }
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(&price(100, "USD", Some(2))), "USD 1.00");
        assert_eq!(format_money(&price(250, "USD", Some(2))), "USD 2.50");
        assert_eq!(format_money(&price(210, "JPY", Some(0))), "JPY 210");
        assert_eq!(format_money(&price(1234, "KWD", Some(3))), "KWD 1.234");
        assert_eq!(format_money(&price(-25, "USD", None)), "USD -0.25");
        assert_eq!(format_money(&price(-250, "USD", Some(2))), "USD -2.50");
    }

    #[test]
    fn test_missing_digits_default_to_two_places() {
        assert_eq!(format_money(&price(5, "EUR", None)), "EUR 0.05");
        assert_eq!(format_money(&price(1999, "EUR", None)), "EUR 19.99");
    }

    #[test]
    fn test_oversized_digits_are_capped() {
        let expected = format!("XTS 0.{:018}", 5);
        assert_eq!(format_money(&total(5, "XTS", 40)), expected);
        assert_eq!(format_money(&price(5, "XTS", Some(u32::MAX))), expected);
        assert_eq!(
            format_money(&total(i64::MIN, "XTS", 18)),
            "XTS -9.223372036854775808"
        );
    }

    #[test]
    fn test_format_totals() {
        assert_eq!(format_totals(&[]), "—");
        assert_eq!(format_totals(&[total(200, "USD", 2)]), "USD 2.00");
        assert_eq!(
            format_totals(&[total(200, "USD", 2), total(300, "EUR", 2)]),
            "USD 2.00 + EUR 3.00"
        );
    }

    fn details() -> ProductDetails {
        ProductDetails {
            id: "dependent-1".into(),
            name: Some("Transfer Discount".into()),
            medium: Some(EntityRef {
                id: Some("mobile-pass".into()),
                name: Some("Mobile App".into()),
            }),
            rider_category: Some(EntityRef {
                id: Some("adult".into()),
                name: None,
            }),
            price: Some(price(-50, "USD", None)),
        }
    }

    #[test]
    fn test_describe_dependent_product() {
        let product = FareProductVariant::Dependent(DependentProduct {
            details: details(),
            dependencies: vec![
                EntityRef {
                    id: Some("default-1".into()),
                    name: Some("Single".into()),
                },
                EntityRef {
                    id: None,
                    name: Some("Night Transfer".into()),
                },
            ],
        });
        assert_eq!(
            describe_fare_product(&product),
            "DependentFareProduct · USD -0.50 · Medium: Mobile App mobile-pass · Rider: adult · Dependencies: default-1, Night Transfer"
        );
    }

    #[test]
    fn test_describe_bare_default_product() {
        let product = FareProductVariant::Default(ProductDetails {
            id: "default-1".into(),
            name: None,
            medium: None,
            rider_category: None,
            price: None,
        });
        assert_eq!(describe_fare_product(&product), "DefaultFareProduct");
    }

    #[test]
    fn test_describe_dependent_without_dependencies() {
        let product = FareProductVariant::Dependent(DependentProduct {
            details: details(),
            dependencies: vec![],
        });
        assert!(!describe_fare_product(&product).contains("Dependencies"));
    }
}
