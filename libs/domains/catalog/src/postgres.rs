use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, ExprTrait, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult,
    JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select,
    prelude::DateTimeWithTimeZone,
};

use crate::{
    entity::{category, product},
    error::{CatalogError, CatalogResult},
    models::{NewProduct, Product, ProductDetail, ProductFilter, ProductPage},
    repository::ProductRepository,
};

/// Projection of `products ⋈ categories`
#[derive(Debug, FromQueryResult)]
struct ProductDetailRow {
    product_id: i32,
    product_name: Option<String>,
    unit_price: Option<Decimal>,
    unit_in_stock: Option<i32>,
    product_picture: String,
    created_date: DateTimeWithTimeZone,
    modified_date: Option<DateTimeWithTimeZone>,
    category_id: i32,
    category_name: String,
}

impl From<ProductDetailRow> for ProductDetail {
    fn from(row: ProductDetailRow) -> Self {
        Self {
            product_id: row.product_id,
            product_name: row.product_name,
            unit_price: row.unit_price,
            unit_in_stock: row.unit_in_stock,
            product_picture: row.product_picture,
            created_date: row.created_date.into(),
            modified_date: row.modified_date.map(Into::into),
            category_id: row.category_id,
            category_name: row.category_name,
        }
    }
}

fn db_error(e: DbErr) -> CatalogError {
    CatalogError::Internal(format!("Database error: {}", e))
}

/// Escape LIKE wildcards so user input only ever matches literally
fn like_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn detail_query() -> Select<product::Entity> {
        product::Entity::find()
            .select_only()
            .columns([
                product::Column::ProductId,
                product::Column::ProductName,
                product::Column::UnitPrice,
                product::Column::UnitInStock,
                product::Column::ProductPicture,
                product::Column::CreatedDate,
                product::Column::ModifiedDate,
                product::Column::CategoryId,
            ])
            .column(category::Column::CategoryName)
            .join(JoinType::InnerJoin, product::Relation::Category.def())
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn list(&self, filter: ProductFilter) -> CatalogResult<ProductPage> {
        let mut query = Self::detail_query();

        if let Some(category_id) = filter.category_id {
            query = query.filter(product::Column::CategoryId.eq(category_id));
        }

        if let Some(search) = &filter.search {
            let name = Expr::col((product::Entity, product::Column::ProductName));
            query = query.filter(Expr::expr(Func::lower(name)).like(like_pattern(search)));
        }

        let total = query.clone().count(&self.db).await.map_err(db_error)?;

        let rows = query
            .order_by_desc(product::Column::ProductId)
            .limit(filter.limit)
            .offset(filter.offset)
            .into_model::<ProductDetailRow>()
            .all(&self.db)
            .await
            .map_err(db_error)?;

        Ok(ProductPage {
            total,
            products: rows.into_iter().map(Into::into).collect(),
        })
    }

    async fn get_detail(&self, id: i32) -> CatalogResult<Option<ProductDetail>> {
        let row = Self::detail_query()
            .filter(product::Column::ProductId.eq(id))
            .into_model::<ProductDetailRow>()
            .one(&self.db)
            .await
            .map_err(db_error)?;

        Ok(row.map(Into::into))
    }

    async fn get_by_id(&self, id: i32) -> CatalogResult<Option<Product>> {
        let model = product::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error)?;

        Ok(model.map(Into::into))
    }

    async fn create(&self, input: NewProduct) -> CatalogResult<Product> {
        let active_model: product::ActiveModel = input.into();

        let model = active_model.insert(&self.db).await.map_err(db_error)?;

        tracing::info!(product_id = model.product_id, "Created product");
        Ok(model.into())
    }

    async fn update(&self, product: Product) -> CatalogResult<Product> {
        let id = product.product_id;
        let active_model: product::ActiveModel = product.into();

        let model = active_model.update(&self.db).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => CatalogError::NotFound(id),
            other => db_error(other),
        })?;

        tracing::info!(product_id = id, "Updated product");
        Ok(model.into())
    }

    async fn delete(&self, id: i32) -> CatalogResult<bool> {
        let result = product::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error)?;

        if result.rows_affected > 0 {
            tracing::info!(product_id = id, "Deleted product");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn category_exists(&self, category_id: i32) -> CatalogResult<bool> {
        let count = category::Entity::find_by_id(category_id)
            .count(&self.db)
            .await
            .map_err(db_error)?;

        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("pro"), "%pro%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
