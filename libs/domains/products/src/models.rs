use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::validation;

/// A catalog product as stored.
///
/// `id` is assigned by the store and `created_at` by the factory; neither
/// changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Widget")]
    pub name: String,
    #[schema(example = "A small widget")]
    pub description: String,
    #[schema(value_type = String, example = "9.99")]
    pub price: Decimal,
    #[schema(example = 5)]
    pub stock: i32,
    pub created_at: DateTime<Utc>,
}

/// A product that passed the factory but has no id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
}

impl NewProduct {
    /// Attach the id assigned by the store.
    pub fn with_id(self, id: i32) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            stock: self.stock,
            created_at: self.created_at,
        }
    }
}

/// Read projection returned by `GET /products/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: i32,
    pub name: String,
    pub description: String,
    #[schema(value_type = String, example = "9.99")]
    pub price: Decimal,
    pub stock: i32,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            in_stock: product.stock > 0,
            name: product.name,
            description: product.description,
            price: product.price,
            stock: product.stock,
            created_at: product.created_at,
        }
    }
}

/// Body of `POST /products`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    #[validate(custom(function = "validation::validate_name"))]
    #[schema(example = "Widget", min_length = 3, max_length = 100)]
    pub name: String,
    #[serde(default)]
    #[validate(custom(function = "validation::validate_description"))]
    #[schema(example = "A small widget", max_length = 500)]
    pub description: String,
    #[validate(custom(function = "validation::validate_price"))]
    #[schema(value_type = String, example = "9.99")]
    pub price: Decimal,
    #[validate(custom(function = "validation::validate_stock"))]
    #[schema(example = 5, minimum = 0)]
    pub stock: i32,
}

/// Body of `PUT /products/{id}`; every field is required.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceProduct {
    #[validate(custom(function = "validation::validate_name"))]
    #[schema(example = "Widget", min_length = 3, max_length = 100)]
    pub name: String,
    #[validate(custom(function = "validation::validate_description"))]
    #[schema(example = "A small widget", max_length = 500)]
    pub description: String,
    #[validate(custom(function = "validation::validate_price"))]
    #[schema(value_type = String, example = "9.99")]
    pub price: Decimal,
    #[validate(custom(function = "validation::validate_stock"))]
    #[schema(example = 5, minimum = 0)]
    pub stock: i32,
}

/// A PATCH field: either left out of the body, or supplied with a value.
///
/// An explicit `null` is not a value for any product field and fails to
/// deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Patch<T> {
    #[default]
    Absent,
    Present(T),
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Patch::Absent => None,
            Patch::Present(value) => Some(value),
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Patch::Absent, Patch::Present)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Patch::Present)
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Patch::Absent => serializer.serialize_none(),
            Patch::Present(value) => value.serialize(serializer),
        }
    }
}

/// Body of `PATCH /products/{id}`; any subset of the fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatchProduct {
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    #[schema(value_type = Option<String>, example = "Widget")]
    pub name: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    #[schema(value_type = Option<String>)]
    pub description: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    #[schema(value_type = Option<String>, example = "9.99")]
    pub price: Patch<Decimal>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    #[schema(value_type = Option<i32>, example = 10)]
    pub stock: Patch<i32>,
}

impl PatchProduct {
    pub fn is_empty(&self) -> bool {
        self.name.is_absent()
            && self.description.is_absent()
            && self.price.is_absent()
            && self.stock.is_absent()
    }
}

/// Supplied fields get the same rules as a full replacement.
impl Validate for PatchProduct {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Patch::Present(name) = &self.name {
            if let Err(e) = validation::validate_name(name) {
                errors.add("name", e);
            }
        }
        if let Patch::Present(description) = &self.description {
            if let Err(e) = validation::validate_description(description) {
                errors.add("description", e);
            }
        }
        if let Patch::Present(price) = &self.price {
            if let Err(e) = validation::validate_price(price) {
                errors.add("price", e);
            }
        }
        if let Patch::Present(stock) = &self.stock {
            if let Err(e) = validation::validate_stock(*stock) {
                errors.add("stock", e);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_patch_distinguishes_absent_from_empty() {
        let patch: PatchProduct = serde_json::from_value(json!({ "description": "" })).unwrap();
        assert_eq!(patch.description, Patch::Present(String::new()));
        assert!(patch.name.is_absent());
        assert!(patch.price.is_absent());
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_patch_rejects_explicit_null() {
        let result = serde_json::from_value::<PatchProduct>(json!({ "stock": null }));
        assert!(result.is_err());
    }

    #[test]
    fn test_patch_serializes_only_present_fields() {
        let patch = PatchProduct {
            stock: Patch::Present(10),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({ "stock": 10 }));
    }

    #[test]
    fn test_patch_validation_names_each_bad_field() {
        let patch = PatchProduct {
            name: Patch::Present("  ".into()),
            price: Patch::Present(dec!(0)),
            stock: Patch::Present(3),
            ..Default::default()
        };
        let errors = patch.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("price"));
        assert!(!fields.contains_key("stock"));
    }

    #[test]
    fn test_price_accepts_string_and_number() {
        let from_string: CreateProduct =
            serde_json::from_value(json!({ "name": "Widget", "price": "9.99", "stock": 5 })).unwrap();
        let from_number: CreateProduct =
            serde_json::from_value(json!({ "name": "Widget", "price": 9.99, "stock": 5 })).unwrap();
        assert_eq!(from_string.price, dec!(9.99));
        assert_eq!(from_number.price, dec!(9.99));
        assert_eq!(from_string.description, "");
    }

    #[test]
    fn test_product_serializes_camel_case_with_string_price() {
        let product = Product {
            id: 1,
            name: "Widget".into(),
            description: String::new(),
            price: dec!(9.99),
            stock: 0,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["price"], "9.99");
        assert!(json.get("createdAt").is_some());

        let view = ProductView::from(product);
        assert!(!view.in_stock);
    }
}
