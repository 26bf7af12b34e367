use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;
use validator::Validate;

/// Picture reference meaning "no image"; never deleted from disk
pub const NO_IMAGE: &str = "noimg.jpg";

pub const DEFAULT_PAGE_SIZE: i64 = 100;

/// Upper bound for `limit` on product listings
pub const MAX_PAGE_SIZE: i64 = 1000;

/// Category status for active categories
pub const CATEGORY_ACTIVE: i32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub category_id: i32,
    pub category_name: String,
    pub category_status: i32,
}

impl Category {
    pub fn new(category_id: i32, category_name: impl Into<String>) -> Self {
        Self {
            category_id,
            category_name: category_name.into(),
            category_status: CATEGORY_ACTIVE,
        }
    }

    /// The categories every installation starts with
    pub fn seeded() -> Vec<Category> {
        vec![
            Category::new(1, "Mobile"),
            Category::new(2, "Tablet"),
            Category::new(3, "Smart Watch"),
            Category::new(4, "Laptop"),
        ]
    }
}

/// A product row as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_id: i32,
    pub product_name: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub unit_price: Option<Decimal>,
    pub unit_in_stock: Option<i32>,
    /// Stored filename, absolute URL, or [`NO_IMAGE`]
    pub product_picture: String,
    pub category_id: i32,
    pub created_date: DateTime<Utc>,
    pub modified_date: Option<DateTime<Utc>>,
}

/// Product joined with its category, as returned by reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    pub product_id: i32,
    pub product_name: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub unit_price: Option<Decimal>,
    pub unit_in_stock: Option<i32>,
    pub product_picture: String,
    pub created_date: DateTime<Utc>,
    pub modified_date: Option<DateTime<Utc>>,
    pub category_id: i32,
    pub category_name: String,
}

impl ProductDetail {
    pub fn from_parts(product: Product, category_name: impl Into<String>) -> Self {
        Self {
            product_id: product.product_id,
            product_name: product.product_name,
            unit_price: product.unit_price,
            unit_in_stock: product.unit_in_stock,
            product_picture: product.product_picture,
            created_date: product.created_date,
            modified_date: product.modified_date,
            category_id: product.category_id,
            category_name: category_name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    /// Size of the whole filtered set, independent of paging
    pub total: u64,
    pub products: Vec<ProductDetail>,
}

/// Query string of `GET /Product`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub limit: Option<i64>,
    #[serde(default)]
    pub search_query: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub selected_category: Option<i32>,
}

/// Normalised listing parameters handed to repositories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFilter {
    pub offset: u64,
    pub limit: u64,
    /// Lower-cased, never empty. Whitespace is part of the term.
    pub search: Option<String>,
    pub category_id: Option<i32>,
}

impl ProductFilter {
    /// Case-insensitive "name contains" check used by in-memory stores
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category_id) = self.category_id {
            if product.category_id != category_id {
                return false;
            }
        }
        if let Some(search) = &self.search {
            return product
                .product_name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(search));
        }
        true
    }
}

impl From<ProductQuery> for ProductFilter {
    fn from(query: ProductQuery) -> Self {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        // Pages past the addressable range land on an empty slice
        let offset = (page - 1).checked_mul(limit).unwrap_or(i64::MAX);

        Self {
            offset: offset as u64,
            limit: limit as u64,
            search: query
                .search_query
                .filter(|q| !q.is_empty())
                .map(|q| q.to_lowercase()),
            category_id: query.selected_category,
        }
    }
}

/// Text fields of the create/update multipart form
#[derive(Debug, Clone, PartialEq, Default, Validate)]
pub struct ProductForm {
    #[validate(length(max = 128, message = "productName must be at most 128 characters"))]
    pub product_name: Option<String>,
    pub unit_price: Option<Decimal>,
    #[validate(range(min = 0, message = "unitInStock cannot be negative"))]
    pub unit_in_stock: Option<i32>,
    pub category_id: i32,
}

/// File part of the multipart form
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Insert payload; the id comes from the database sequence
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub product_name: Option<String>,
    pub unit_price: Option<Decimal>,
    pub unit_in_stock: Option<i32>,
    pub product_picture: String,
    pub category_id: i32,
    pub created_date: DateTime<Utc>,
}

fn empty_string_as_none<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let opt = Option::<String>::deserialize(de)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => T::from_str(s).map_err(serde::de::Error::custom).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i32, name: Option<&str>, category_id: i32) -> Product {
        Product {
            product_id: id,
            product_name: name.map(str::to_string),
            unit_price: None,
            unit_in_stock: None,
            product_picture: NO_IMAGE.to_string(),
            category_id,
            created_date: Utc::now(),
            modified_date: None,
        }
    }

    #[test]
    fn test_filter_defaults() {
        let filter = ProductFilter::from(ProductQuery::default());
        assert_eq!(filter.offset, 0);
        assert_eq!(filter.limit, 100);
        assert!(filter.search.is_none());
        assert!(filter.category_id.is_none());
    }

    #[test]
    fn test_filter_offset_from_page() {
        let filter = ProductFilter::from(ProductQuery {
            page: Some(3),
            limit: Some(20),
            ..Default::default()
        });
        assert_eq!(filter.offset, 40);
        assert_eq!(filter.limit, 20);
    }

    #[test]
    fn test_filter_clamps_out_of_range_values() {
        let filter = ProductFilter::from(ProductQuery {
            page: Some(0),
            limit: Some(50_000),
            ..Default::default()
        });
        assert_eq!(filter.offset, 0);
        assert_eq!(filter.limit, MAX_PAGE_SIZE as u64);

        let filter = ProductFilter::from(ProductQuery {
            page: Some(-4),
            limit: Some(0),
            ..Default::default()
        });
        assert_eq!(filter.offset, 0);
        assert_eq!(filter.limit, 1);
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        let filter = ProductFilter::from(ProductQuery {
            page: Some(i64::MAX),
            limit: Some(100),
            ..Default::default()
        });
        assert_eq!(filter.offset, i64::MAX as u64);
        assert_eq!(filter.limit, 100);
    }

    #[test]
    fn test_empty_search_is_ignored() {
        let filter = ProductFilter::from(ProductQuery {
            search_query: Some(String::new()),
            ..Default::default()
        });
        assert!(filter.search.is_none());
    }

    #[test]
    fn test_search_keeps_whitespace() {
        let filter = ProductFilter::from(ProductQuery {
            search_query: Some(" Pro".to_string()),
            ..Default::default()
        });
        assert_eq!(filter.search.as_deref(), Some(" pro"));

        assert!(!filter.matches(&product(1, Some("Propeller"), 1)));
        assert!(filter.matches(&product(2, Some("iPad Pro"), 2)));
        assert!(!filter.matches(&product(3, None, 1)));

        let blank = ProductFilter::from(ProductQuery {
            search_query: Some(" ".to_string()),
            ..Default::default()
        });
        assert!(!blank.matches(&product(1, Some("Propeller"), 1)));
        assert!(blank.matches(&product(2, Some("Phone X"), 1)));
    }

    #[test]
    fn test_search_is_case_insensitive_and_skips_unnamed() {
        let filter = ProductFilter::from(ProductQuery {
            search_query: Some("PRO".to_string()),
            ..Default::default()
        });

        assert!(filter.matches(&product(1, Some("iPad Pro 2021"), 2)));
        assert!(!filter.matches(&product(2, Some("Galaxy S21"), 1)));
        assert!(!filter.matches(&product(3, None, 1)));
    }

    #[test]
    fn test_category_filter() {
        let filter = ProductFilter::from(ProductQuery {
            selected_category: Some(4),
            ..Default::default()
        });

        assert!(filter.matches(&product(1, Some("Macbook Pro M1"), 4)));
        assert!(!filter.matches(&product(2, Some("iPhone"), 1)));
    }

    #[test]
    fn test_query_accepts_empty_category_parameter() {
        let query: ProductQuery =
            serde_json::from_str(r#"{"page":"2","selectedCategory":"","searchQuery":"mac"}"#)
                .unwrap();
        assert_eq!(query.page, Some(2));
        assert_eq!(query.selected_category, None);
        assert_eq!(query.search_query.as_deref(), Some("mac"));
    }

    #[test]
    fn test_product_serializes_camel_case() {
        let json = serde_json::to_value(product(7, Some("Phone X"), 1)).unwrap();
        assert_eq!(json["productId"], 7);
        assert_eq!(json["productName"], "Phone X");
        assert_eq!(json["productPicture"], NO_IMAGE);
        assert!(json["modifiedDate"].is_null());
        assert!(json["unitPrice"].is_null());
    }

    #[test]
    fn test_unit_price_serializes_as_number() {
        let mut item = product(7, Some("Phone X"), 1);
        item.unit_price = Some(Decimal::new(1999, 2));

        let json = serde_json::to_value(&item).unwrap();
        assert!(json["unitPrice"].is_number());
        assert_eq!(json["unitPrice"].as_f64(), Some(19.99));
    }

    #[test]
    fn test_form_rejects_long_name() {
        let form = ProductForm {
            product_name: Some("x".repeat(129)),
            category_id: 1,
            ..Default::default()
        };
        assert!(form.validate().is_err());
    }
}
