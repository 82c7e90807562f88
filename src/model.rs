//! Validated plan model produced by the parser.
//!
//! Everything here is built once per parse and never mutated afterwards.

use serde::Serialize;

/// A loosely identified referenced object (fare medium, rider category,
/// dependency). The parser only builds one when `id` or `name` is present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRef {
    pub id: Option<String>,
    pub name: Option<String>,
}

impl EntityRef {
    /// Returns `None` when neither field is populated.
    pub fn new(id: Option<String>, name: Option<String>) -> Option<Self> {
        if id.is_none() && name.is_none() {
            return None;
        }
        Some(Self { id, name })
    }
}

/// A price normalized to integer minor units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub amount: i64,
    pub currency_code: String,
    /// Digits as declared by the source; `None` when missing or invalid.
    pub currency_digits: Option<u32>,
}

/// The two known fare product shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FareProductType {
    DefaultFareProduct,
    DependentFareProduct,
}

impl FareProductType {
    pub fn as_str(self) -> &'static str {
        match self {
            FareProductType::DefaultFareProduct => "DefaultFareProduct",
            FareProductType::DependentFareProduct => "DependentFareProduct",
        }
    }

    /// Maps a GraphQL `__typename` onto a known type.
    pub fn from_typename(typename: &str) -> Option<Self> {
        match typename {
            "DefaultFareProduct" => Some(FareProductType::DefaultFareProduct),
            "DependentFareProduct" => Some(FareProductType::DependentFareProduct),
            _ => None,
        }
    }
}

/// Fields shared by every fare product variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
    pub id: String,
    pub name: Option<String>,
    pub medium: Option<EntityRef>,
    pub rider_category: Option<EntityRef>,
    pub price: Option<Price>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependentProduct {
    #[serde(flatten)]
    pub details: ProductDetails,
    pub dependencies: Vec<EntityRef>,
}

/// Catalog product behind an occurrence, discriminated by its GraphQL tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "__typename")]
pub enum FareProductVariant {
    #[serde(rename = "DefaultFareProduct")]
    Default(ProductDetails),
    #[serde(rename = "DependentFareProduct")]
    Dependent(DependentProduct),
}

impl FareProductVariant {
    pub fn details(&self) -> &ProductDetails {
        match self {
            FareProductVariant::Default(details) => details,
            FareProductVariant::Dependent(dependent) => &dependent.details,
        }
    }

    pub fn product_type(&self) -> FareProductType {
        match self {
            FareProductVariant::Default(_) => FareProductType::DefaultFareProduct,
            FareProductVariant::Dependent(_) => FareProductType::DependentFareProduct,
        }
    }

    pub fn price(&self) -> Option<&Price> {
        self.details().price.as_ref()
    }
}

/// A fare product as it appears on one leg.
///
/// `id` is the occurrence identifier used for reuse grouping; the catalog
/// identifier lives in `product.details().id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FareProduct {
    pub id: String,
    pub product: FareProductVariant,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Leg {
    pub route_short_name: Option<String>,
    pub fare_products: Vec<FareProduct>,
    pub transit_leg: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Itinerary {
    pub legs: Vec<Leg>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub itineraries: Vec<Itinerary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(id: &str) -> ProductDetails {
        ProductDetails {
            id: id.to_string(),
            name: None,
            medium: None,
            rider_category: None,
            price: None,
        }
    }

    #[test]
    fn test_entity_ref_requires_a_field() {
        assert_eq!(EntityRef::new(None, None), None);
        let entity = EntityRef::new(None, Some("Adult".into())).unwrap();
        assert_eq!(entity.name.as_deref(), Some("Adult"));
    }

    #[test]
    fn test_typename_mapping() {
        assert_eq!(
            FareProductType::from_typename("DependentFareProduct"),
            Some(FareProductType::DependentFareProduct)
        );
        assert_eq!(FareProductType::from_typename("Unknown"), None);
        assert_eq!(
            FareProductType::DefaultFareProduct.as_str(),
            "DefaultFareProduct"
        );
    }

    #[test]
    fn test_variant_serializes_with_typename_tag() {
        let variant = FareProductVariant::Dependent(DependentProduct {
            details: details("dep-1"),
            dependencies: vec![],
        });
        let json = serde_json::to_value(&variant).unwrap();
        assert_eq!(json["__typename"], "DependentFareProduct");
        assert_eq!(json["id"], "dep-1");
        assert!(json["dependencies"].as_array().unwrap().is_empty());
        assert_eq!(variant.product_type(), FareProductType::DependentFareProduct);
        assert_eq!(variant.details().id, "dep-1");
    }
}
