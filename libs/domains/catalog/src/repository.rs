use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{Category, NewProduct, Product, ProductDetail, ProductFilter, ProductPage};

/// Repository trait for products and their (read-only) categories
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Filtered, paginated page of joined rows ordered by descending id
    async fn list(&self, filter: ProductFilter) -> CatalogResult<ProductPage>;

    /// Joined row for one product
    async fn get_detail(&self, id: i32) -> CatalogResult<Option<ProductDetail>>;

    /// Plain row for one product
    async fn get_by_id(&self, id: i32) -> CatalogResult<Option<Product>>;

    async fn create(&self, input: NewProduct) -> CatalogResult<Product>;

    /// Overwrite every column of an existing product
    async fn update(&self, product: Product) -> CatalogResult<Product>;

    /// Returns false when no row was removed
    async fn delete(&self, id: i32) -> CatalogResult<bool>;

    async fn category_exists(&self, category_id: i32) -> CatalogResult<bool>;
}

#[derive(Debug, Default)]
struct Store {
    // Ordered by id so listings can walk it backwards
    products: BTreeMap<i32, Product>,
    categories: HashMap<i32, Category>,
    next_id: i32,
}

/// In-memory implementation of ProductRepository (for development/testing)
#[derive(Debug, Clone)]
pub struct InMemoryProductRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryProductRepository {
    /// Starts with the seeded categories and no products
    pub fn new() -> Self {
        Self::with_categories(Category::seeded())
    }

    pub fn with_categories(categories: Vec<Category>) -> Self {
        let store = Store {
            products: BTreeMap::new(),
            categories: categories
                .into_iter()
                .map(|c| (c.category_id, c))
                .collect(),
            next_id: 1,
        };

        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }
}

impl Default for InMemoryProductRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn join(store: &Store, product: &Product) -> Option<ProductDetail> {
    store
        .categories
        .get(&product.category_id)
        .map(|c| ProductDetail::from_parts(product.clone(), c.category_name.clone()))
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn list(&self, filter: ProductFilter) -> CatalogResult<ProductPage> {
        let store = self.store.read().await;

        let matching: Vec<ProductDetail> = store
            .products
            .values()
            .rev()
            .filter(|p| filter.matches(p))
            .filter_map(|p| join(&store, p))
            .collect();

        let total = matching.len() as u64;
        let products = matching
            .into_iter()
            .skip(usize::try_from(filter.offset).unwrap_or(usize::MAX))
            .take(filter.limit as usize)
            .collect();

        Ok(ProductPage { total, products })
    }

    async fn get_detail(&self, id: i32) -> CatalogResult<Option<ProductDetail>> {
        let store = self.store.read().await;
        Ok(store.products.get(&id).and_then(|p| join(&store, p)))
    }

    async fn get_by_id(&self, id: i32) -> CatalogResult<Option<Product>> {
        let store = self.store.read().await;
        Ok(store.products.get(&id).cloned())
    }

    async fn create(&self, input: NewProduct) -> CatalogResult<Product> {
        let mut store = self.store.write().await;

        if !store.categories.contains_key(&input.category_id) {
            return Err(CatalogError::UnknownCategory(input.category_id));
        }

        let product_id = store.next_id;
        store.next_id += 1;

        let product = Product {
            product_id,
            product_name: input.product_name,
            unit_price: input.unit_price,
            unit_in_stock: input.unit_in_stock,
            product_picture: input.product_picture,
            category_id: input.category_id,
            created_date: input.created_date,
            modified_date: None,
        };
        store.products.insert(product_id, product.clone());

        tracing::info!(product_id, "Created product");
        Ok(product)
    }

    async fn update(&self, product: Product) -> CatalogResult<Product> {
        let mut store = self.store.write().await;

        if !store.categories.contains_key(&product.category_id) {
            return Err(CatalogError::UnknownCategory(product.category_id));
        }

        let slot = store
            .products
            .get_mut(&product.product_id)
            .ok_or(CatalogError::NotFound(product.product_id))?;
        *slot = product.clone();

        tracing::info!(product_id = product.product_id, "Updated product");
        Ok(product)
    }

    async fn delete(&self, id: i32) -> CatalogResult<bool> {
        let mut store = self.store.write().await;

        if store.products.remove(&id).is_some() {
            tracing::info!(product_id = id, "Deleted product");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn category_exists(&self, category_id: i32) -> CatalogResult<bool> {
        let store = self.store.read().await;
        Ok(store.categories.contains_key(&category_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NO_IMAGE, ProductQuery};
    use chrono::Utc;

    fn new_product(name: &str, category_id: i32) -> NewProduct {
        NewProduct {
            product_name: Some(name.to_string()),
            unit_price: None,
            unit_in_stock: Some(1),
            product_picture: NO_IMAGE.to_string(),
            category_id,
            created_date: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_joined_row() {
        let repo = InMemoryProductRepository::new();

        let created = repo.create(new_product("Phone X", 1)).await.unwrap();
        assert_eq!(created.product_id, 1);

        let detail = repo.get_detail(created.product_id).await.unwrap().unwrap();
        assert_eq!(detail.category_name, "Mobile");
        assert_eq!(detail.product_name.as_deref(), Some("Phone X"));
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_category() {
        let repo = InMemoryProductRepository::new();
        let result = repo.create(new_product("Ghost", 99)).await;
        assert!(matches!(result, Err(CatalogError::UnknownCategory(99))));
    }

    #[tokio::test]
    async fn test_list_total_ignores_paging_and_orders_desc() {
        let repo = InMemoryProductRepository::new();
        for i in 0..5 {
            repo.create(new_product(&format!("Item {}", i), 1)).await.unwrap();
        }

        let page = repo
            .list(ProductFilter::from(ProductQuery {
                page: Some(2),
                limit: Some(2),
                ..Default::default()
            }))
            .await
            .unwrap();

        assert_eq!(page.total, 5);
        let ids: Vec<i32> = page.products.iter().map(|p| p.product_id).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[tokio::test]
    async fn test_delete_missing_returns_false() {
        let repo = InMemoryProductRepository::new();
        assert!(!repo.delete(12).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = InMemoryProductRepository::new();
        let created = repo.create(new_product("Tab", 2)).await.unwrap();
        let ghost = Product {
            product_id: created.product_id + 10,
            ..created
        };

        assert!(matches!(
            repo.update(ghost).await,
            Err(CatalogError::NotFound(_))
        ));
    }
}
