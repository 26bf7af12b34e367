//! Integration tests for the catalog domain
//!
//! Run against real PostgreSQL via testcontainers with the workspace
//! migrations applied, so the seeded categories and products are present:
//! - join projection and column mapping
//! - search, category filter, counting and ordering in SQL
//! - full-row updates and deletes

use chrono::Utc;
use domain_catalog::*;
use rust_decimal::Decimal;
use test_utils::{TestDataBuilder, TestDatabase, assertions::*};

fn new_product(name: &str, category_id: i32) -> NewProduct {
    NewProduct {
        product_name: Some(name.to_string()),
        unit_price: Some(Decimal::new(9990, 2)),
        unit_in_stock: Some(3),
        product_picture: NO_IMAGE.to_string(),
        category_id,
        created_date: Utc::now(),
    }
}

fn filter(query: ProductQuery) -> ProductFilter {
    ProductFilter::from(query)
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_seed_data_is_visible_through_join() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());

    let page = repo.list(filter(ProductQuery::default())).await.unwrap();
    assert_eq!(page.total, 4);

    let ids: Vec<i32> = page.products.iter().map(|p| p.product_id).collect();
    assert_eq!(ids, vec![4, 3, 2, 1]);

    let iphone = assert_some(repo.get_detail(1).await.unwrap(), "seeded iPhone");
    assert_eq!(iphone.product_name.as_deref(), Some("iPhone 13 Pro Max"));
    assert_eq!(iphone.unit_price, Some(Decimal::new(55000, 0)));
    assert_eq!(iphone.category_name, "Mobile");
    assert!(iphone.product_picture.starts_with("https://"));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_create_continues_after_seeded_ids() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("create_after_seed");

    let created = repo
        .create(new_product(&builder.name("product", "main"), 1))
        .await
        .unwrap();

    assert!(created.product_id > 4);
    assert_eq!(created.product_picture, NO_IMAGE);
    assert!(created.modified_date.is_none());

    let detail = assert_some(
        repo.get_detail(created.product_id).await.unwrap(),
        "created product",
    );
    assert_eq!(detail.category_name, "Mobile");
    assert_eq!(detail.unit_price, Some(Decimal::new(9990, 2)));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_search_is_case_insensitive_and_counted_before_paging() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());

    let page = repo
        .list(filter(ProductQuery {
            search_query: Some("PRO".to_string()),
            limit: Some(1),
            ..Default::default()
        }))
        .await
        .unwrap();

    // iPhone 13 Pro Max, iPad Pro 2021, Airpods Pro, Macbook Pro M1
    assert_eq!(page.total, 4);
    assert_eq!(page.products.len(), 1);
    assert_eq!(page.products[0].product_id, 4);

    let page = repo
        .list(filter(ProductQuery {
            search_query: Some("ipad".to_string()),
            ..Default::default()
        }))
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.products[0].category_name, "Tablet");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_wildcards_in_search_match_literally() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());

    let page = repo
        .list(filter(ProductQuery {
            search_query: Some("%".to_string()),
            ..Default::default()
        }))
        .await
        .unwrap();

    assert_eq!(page.total, 0);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_search_whitespace_is_significant() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());

    let page = repo
        .list(filter(ProductQuery {
            search_query: Some("pro ".to_string()),
            ..Default::default()
        }))
        .await
        .unwrap();

    // iPhone 13 Pro Max, Macbook Pro M1
    assert_eq!(page.total, 2);
    let ids: Vec<i32> = page.products.iter().map(|p| p.product_id).collect();
    assert_eq!(ids, vec![4, 1]);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_page_past_the_end_is_empty() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());

    let page = repo
        .list(filter(ProductQuery {
            page: Some(i64::MAX),
            limit: Some(100),
            ..Default::default()
        }))
        .await
        .unwrap();

    assert_eq!(page.total, 4);
    assert!(page.products.is_empty());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_category_filter_and_ordering() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("category_filter");

    for suffix in ["a", "b", "c"] {
        repo.create(new_product(&builder.name("laptop", suffix), 4))
            .await
            .unwrap();
    }

    let page = repo
        .list(filter(ProductQuery {
            selected_category: Some(4),
            ..Default::default()
        }))
        .await
        .unwrap();

    assert_eq!(page.total, 4);
    assert!(page.products.iter().all(|p| p.category_id == 4));
    assert_sorted_desc(&page.products, |p| p.product_id, "laptops");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_update_overwrites_row() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());

    let existing = assert_some(repo.get_by_id(2).await.unwrap(), "seeded iPad");
    let modified = Utc::now();

    let updated = repo
        .update(Product {
            product_name: Some("iPad Pro 2022".to_string()),
            unit_price: None,
            unit_in_stock: None,
            modified_date: Some(modified),
            ..existing.clone()
        })
        .await
        .unwrap();

    assert_eq!(updated.product_name.as_deref(), Some("iPad Pro 2022"));
    assert_eq!(updated.unit_price, None);
    assert_eq!(updated.product_picture, existing.product_picture);
    assert_eq!(updated.created_date, existing.created_date);
    assert!(updated.modified_date.is_some());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_update_and_delete_missing_rows() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());

    let existing = assert_some(repo.get_by_id(3).await.unwrap(), "seeded Airpods");
    let result = repo
        .update(Product {
            product_id: 9_999,
            ..existing
        })
        .await;
    assert!(matches!(result, Err(CatalogError::NotFound(9_999))));

    assert!(!repo.delete(9_999).await.unwrap());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_delete_and_category_lookup() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());

    assert!(repo.category_exists(3).await.unwrap());
    assert!(!repo.category_exists(42).await.unwrap());

    assert!(repo.delete(3).await.unwrap());
    assert!(repo.get_detail(3).await.unwrap().is_none());
}
