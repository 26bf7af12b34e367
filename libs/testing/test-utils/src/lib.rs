//! Shared test utilities for the domain crates
//!
//! - `TestDatabase`: migrated PostgreSQL container with automatic cleanup (feature: "postgres")
//! - `TestDataBuilder`: deterministic test data derived from the test name
//! - `assertions`: assertion helpers with readable failure messages
//!
//! # Usage
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn my_postgres_test() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let username = builder.username("buyer");
//!     let product = builder.name("product", "main");
//! }
//! ```

use uuid::Uuid;

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

/// Builder for test data with deterministic randomization
///
/// Each test gets its own seed, so rows created by parallel tests sharing one
/// database never collide on unique columns.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (seed is the hash of the name)
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_register_duplicate");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Deterministic UUID for ids that are not generated by the database
    pub fn uuid(&self) -> Uuid {
        let bytes = self.seed.to_le_bytes();
        let mut uuid_bytes = [0u8; 16];
        uuid_bytes[..8].copy_from_slice(&bytes);
        uuid_bytes[8..16].copy_from_slice(&bytes);
        Uuid::from_bytes(uuid_bytes)
    }

    /// Unique name such as `test-product-12345-main`
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(7);
    /// assert_eq!(builder.name("product", "main"), "test-product-7-main");
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// User name that is unique per test
    pub fn username(&self, suffix: &str) -> String {
        format!("user{}{}", self.seed, suffix)
    }

    pub fn email(&self, suffix: &str) -> String {
        format!("{}@example.com", self.username(suffix))
    }
}

/// Test assertion helpers
pub mod assertions {
    use uuid::Uuid;

    pub fn assert_uuid_eq(actual: Uuid, expected: Uuid, context: &str) {
        assert_eq!(
            actual, expected,
            "{}: expected UUID {}, got {}",
            context, expected, actual
        );
    }

    /// Unwrap an option, naming what was expected on failure
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert that a slice is sorted by `key` in descending order
    pub fn assert_sorted_desc<T, K: PartialOrd + std::fmt::Debug>(
        items: &[T],
        key: impl Fn(&T) -> K,
        context: &str,
    ) {
        for pair in items.windows(2) {
            let (a, b) = (key(&pair[0]), key(&pair[1]));
            assert!(a >= b, "{}: {:?} listed before {:?}", context, a, b);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_builder_deterministic() {
        let builder1 = TestDataBuilder::new(42);
        let builder2 = TestDataBuilder::new(42);

        assert_eq!(builder1.uuid(), builder2.uuid());
        assert_eq!(builder1.username("a"), builder2.username("a"));
    }

    #[test]
    fn test_data_builder_different_names() {
        let builder1 = TestDataBuilder::from_test_name("test1");
        let builder2 = TestDataBuilder::from_test_name("test2");

        assert_ne!(builder1.uuid(), builder2.uuid());
        assert_ne!(builder1.username("a"), builder2.username("a"));
    }

    #[test]
    fn test_email_uses_username() {
        let builder = TestDataBuilder::new(9);
        assert_eq!(builder.email("x"), "user9x@example.com");
    }

    #[test]
    fn test_assert_sorted_desc_accepts_descending() {
        assertions::assert_sorted_desc(&[5, 3, 3, 1], |v| *v, "ids");
    }

    #[test]
    #[should_panic]
    fn test_assert_sorted_desc_rejects_ascending() {
        assertions::assert_sorted_desc(&[1, 2], |v| *v, "ids");
    }
}
