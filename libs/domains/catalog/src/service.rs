use chrono::Utc;
use std::sync::Arc;
use validator::Validate;

use crate::error::{CatalogError, CatalogResult};
use crate::images::ImageStore;
use crate::models::{
    ImageUpload, NO_IMAGE, NewProduct, Product, ProductDetail, ProductFilter, ProductForm,
    ProductPage, ProductQuery,
};
use crate::repository::ProductRepository;

/// Product queries and mutations, keeping stored pictures in step with rows
#[derive(Clone)]
pub struct ProductService<R: ProductRepository, I: ImageStore> {
    repository: Arc<R>,
    images: Arc<I>,
}

impl<R: ProductRepository, I: ImageStore> ProductService<R, I> {
    pub fn new(repository: R, images: I) -> Self {
        Self {
            repository: Arc::new(repository),
            images: Arc::new(images),
        }
    }

    pub async fn list_products(&self, query: ProductQuery) -> CatalogResult<ProductPage> {
        self.repository.list(ProductFilter::from(query)).await
    }

    pub async fn get_product(&self, id: i32) -> CatalogResult<ProductDetail> {
        self.repository
            .get_detail(id)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    pub async fn create_product(
        &self,
        form: ProductForm,
        image: Option<ImageUpload>,
    ) -> CatalogResult<Product> {
        self.check_form(&form).await?;

        let stored = self.store_image(image).await?;

        let input = NewProduct {
            product_name: form.product_name,
            unit_price: form.unit_price,
            unit_in_stock: form.unit_in_stock,
            product_picture: stored.clone().unwrap_or_else(|| NO_IMAGE.to_string()),
            category_id: form.category_id,
            created_date: Utc::now(),
        };

        match self.repository.create(input).await {
            Ok(product) => Ok(product),
            Err(e) => {
                self.discard(stored.as_deref()).await;
                Err(e)
            }
        }
    }

    /// Overwrites the text fields from the form. The picture only changes
    /// when a new image is supplied, in which case the old file is removed.
    pub async fn update_product(
        &self,
        id: i32,
        form: ProductForm,
        image: Option<ImageUpload>,
    ) -> CatalogResult<Product> {
        let existing = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound(id))?;

        self.check_form(&form).await?;

        let stored = self.store_image(image).await?;

        let updated = Product {
            product_id: existing.product_id,
            product_name: form.product_name,
            unit_price: form.unit_price,
            unit_in_stock: form.unit_in_stock,
            product_picture: stored
                .clone()
                .unwrap_or_else(|| existing.product_picture.clone()),
            category_id: form.category_id,
            created_date: existing.created_date,
            modified_date: Some(Utc::now()),
        };

        let product = match self.repository.update(updated).await {
            Ok(product) => product,
            Err(e) => {
                self.discard(stored.as_deref()).await;
                return Err(e);
            }
        };

        if stored.is_some() {
            self.discard(Some(&existing.product_picture)).await;
        }

        Ok(product)
    }

    /// Removes the picture file, then the row. Returns the removed product.
    pub async fn delete_product(&self, id: i32) -> CatalogResult<Product> {
        let existing = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound(id))?;

        self.images.delete(&existing.product_picture).await?;

        if !self.repository.delete(id).await? {
            return Err(CatalogError::NotFound(id));
        }

        Ok(existing)
    }

    async fn check_form(&self, form: &ProductForm) -> CatalogResult<()> {
        form.validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        if !self.repository.category_exists(form.category_id).await? {
            return Err(CatalogError::UnknownCategory(form.category_id));
        }

        Ok(())
    }

    async fn store_image(&self, image: Option<ImageUpload>) -> CatalogResult<Option<String>> {
        match image {
            Some(upload) => {
                let name = self.images.save(upload.bytes, &upload.file_name).await?;
                Ok(Some(name))
            }
            None => Ok(None),
        }
    }

    /// Best-effort removal; a failure here must not mask the outcome
    async fn discard(&self, filename: Option<&str>) {
        let Some(filename) = filename else {
            return;
        };

        if filename == NO_IMAGE {
            return;
        }

        if let Err(e) = self.images.delete(filename).await {
            tracing::warn!(file = %filename, "Failed to remove product image: {}", e);
        }
    }
}
