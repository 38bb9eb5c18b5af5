use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::NewProduct;

/// A raw field the factory refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid argument '{field}': {message}")]
pub struct InvalidArgument {
    pub field: &'static str,
    pub message: &'static str,
}

/// The single constructor for new products.
///
/// Checks run in a fixed order and the first failure wins: blank name, then
/// non-positive price, then negative stock. Strings are taken as given.
pub struct ProductFactory;

impl ProductFactory {
    pub fn create(
        name: String,
        description: String,
        price: Decimal,
        stock: i32,
    ) -> Result<NewProduct, InvalidArgument> {
        Self::create_at(name, description, price, stock, Utc::now())
    }

    /// Same as [`create`](Self::create) with a fixed creation time.
    pub fn create_at(
        name: String,
        description: String,
        price: Decimal,
        stock: i32,
        created_at: DateTime<Utc>,
    ) -> Result<NewProduct, InvalidArgument> {
        if name.trim().is_empty() {
            return Err(InvalidArgument {
                field: "name",
                message: "Name is required.",
            });
        }
        if price <= Decimal::ZERO {
            return Err(InvalidArgument {
                field: "price",
                message: "Price must be greater than zero.",
            });
        }
        if stock < 0 {
            return Err(InvalidArgument {
                field: "stock",
                message: "Stock cannot be negative.",
            });
        }

        Ok(NewProduct {
            name,
            description,
            price,
            stock,
            created_at,
        })
    }
}
