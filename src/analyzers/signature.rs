//! Normalized product signatures used for variation detection.

use serde_json::{Value, json};

use crate::model::{EntityRef, FareProductVariant};

/// Serializes the normalized details of a product variant.
///
/// Absent fields become explicit `null`s and object keys are emitted in
/// sorted order, so two products with identical details always produce the
/// same string. Dependencies are only present for dependent products and
/// keep their source order.
pub fn signature_for_product(product: &FareProductVariant) -> String {
    normalized_details(product).to_string()
}

fn normalized_details(product: &FareProductVariant) -> Value {
    let details = product.details();
    let mut normalized = json!({
        "__typename": product.product_type().as_str(),
        "id": details.id,
        "name": details.name,
        "medium": details.medium.as_ref().map(normalized_entity),
        "riderCategory": details.rider_category.as_ref().map(normalized_entity),
        "price": details.price.as_ref().map(|price| json!({
            "amount": price.amount,
            "currencyCode": price.currency_code,
            "currencyDigits": price.currency_digits,
        })),
    });

    if let FareProductVariant::Dependent(dependent) = product {
        normalized["dependencies"] = dependent
            .dependencies
            .iter()
            .map(normalized_entity)
            .collect();
    }

    normalized
}

fn normalized_entity(entity: &EntityRef) -> Value {
    json!({ "id": entity.id, "name": entity.name })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DependentProduct, Price, ProductDetails};

    fn details() -> ProductDetails {
        ProductDetails {
            id: "default-1".into(),
            name: Some("Adult Single Ride".into()),
            medium: Some(EntityRef {
                id: Some("mobile-pass".into()),
                name: None,
            }),
            rider_category: None,
            price: Some(Price {
                amount: 250,
                currency_code: "USD".into(),
                currency_digits: Some(2),
            }),
        }
    }

    #[test]
    fn test_identical_details_share_signature() {
        let a = FareProductVariant::Default(details());
        let b = FareProductVariant::Default(details());
        assert_eq!(signature_for_product(&a), signature_for_product(&b));
    }

    #[test]
    fn test_absent_fields_serialize_as_null() {
        let mut bare = details();
        bare.name = None;
        bare.medium = None;
        bare.price = None;
        let value: Value =
            serde_json::from_str(&signature_for_product(&FareProductVariant::Default(bare)))
                .unwrap();
        assert_eq!(value["name"], Value::Null);
        assert_eq!(value["medium"], Value::Null);
        assert_eq!(value["riderCategory"], Value::Null);
        assert_eq!(value["price"], Value::Null);
        assert!(value.get("dependencies").is_none());
    }

    #[test]
    fn test_price_change_changes_signature() {
        let mut cheaper = details();
        if let Some(price) = cheaper.price.as_mut() {
            price.amount = 200;
        }
        assert_ne!(
            signature_for_product(&FareProductVariant::Default(details())),
            signature_for_product(&FareProductVariant::Default(cheaper))
        );
    }

    #[test]
    fn test_tag_is_part_of_signature() {
        let default = FareProductVariant::Default(details());
        let dependent = FareProductVariant::Dependent(DependentProduct {
            details: details(),
            dependencies: vec![],
        });
        assert_ne!(signature_for_product(&default), signature_for_product(&dependent));
    }

    #[test]
    fn test_dependency_order_matters() {
        let a = EntityRef { id: Some("a".into()), name: None };
        let b = EntityRef { id: None, name: Some("b".into()) };
        let forward = FareProductVariant::Dependent(DependentProduct {
            details: details(),
            dependencies: vec![a.clone(), b.clone()],
        });
        let backward = FareProductVariant::Dependent(DependentProduct {
            details: details(),
            dependencies: vec![b, a],
        });
        assert_ne!(signature_for_product(&forward), signature_for_product(&backward));

        let value: Value = serde_json::from_str(&signature_for_product(&forward)).unwrap();
        assert_eq!(value["dependencies"][0], json!({ "id": "a", "name": null }));
    }
}
