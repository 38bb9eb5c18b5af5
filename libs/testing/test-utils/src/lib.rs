//! Shared test utilities for the catalog crates
//!
//! - `TestDatabase`: PostgreSQL container with the catalog schema migrated
//! - `TestDataBuilder`: deterministic product data per test
//! - `assertions`: assertion helpers
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! #[ignore = "requires Docker"]
//! async fn my_postgres_test() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let name = builder.product_name("main");
//!     let price = builder.price();
//! }
//! ```

use rust_decimal::Decimal;

mod postgres;

pub use postgres::TestDatabase;

/// Builder for test data with deterministic randomization
///
/// The same test name always yields the same values, different test names
/// yield different ones, so tests sharing a database do not collide.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed from a hash of the test name.
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_product");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Product name that fits the 100 character limit.
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let name = TestDataBuilder::new(7).product_name("main");
    /// assert_eq!(name, "Product 7 main");
    /// ```
    pub fn product_name(&self, suffix: &str) -> String {
        format!("Product {} {}", self.seed % 1_000_000, suffix)
    }

    /// Price between 1.00 and 999.99 with two decimals.
    pub fn price(&self) -> Decimal {
        let cents = (self.seed % 99_900) as i64 + 100;
        Decimal::new(cents, 2)
    }

    /// Stock between 0 and 999.
    pub fn stock(&self) -> i32 {
        (self.seed % 1000) as i32
    }
}

/// Test assertion helpers
pub mod assertions {
    use rust_decimal::Decimal;

    /// Compare decimals by value, so `9.9` equals `9.90`.
    pub fn assert_decimal_eq(actual: Decimal, expected: Decimal, context: &str) {
        assert_eq!(
            actual.normalize(),
            expected.normalize(),
            "{}: expected {}, got {}",
            context,
            expected,
            actual
        );
    }

    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }
}
