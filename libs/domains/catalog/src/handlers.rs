use axum::{
    Extension, Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::HeaderMap,
    routing::get,
};
use axum_helpers::{AuditEvent, AuditOutcome, JwtClaims};
use rust_decimal::Decimal;
use serde_json::json;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{CatalogError, CatalogResult};
use crate::images::ImageStore;
use crate::models::{ImageUpload, Product, ProductDetail, ProductForm, ProductPage, ProductQuery};
use crate::repository::ProductRepository;
use crate::service::ProductService;

type SharedService<R, I> = Arc<ProductService<R, I>>;

/// Create the product router. `max_upload_bytes` caps multipart bodies.
pub fn router<R, I>(service: ProductService<R, I>, max_upload_bytes: usize) -> Router
where
    R: ProductRepository + 'static,
    I: ImageStore + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(shared_service)
}

async fn list_products<R: ProductRepository, I: ImageStore>(
    State(service): State<SharedService<R, I>>,
    Query(query): Query<ProductQuery>,
) -> CatalogResult<Json<ProductPage>> {
    let page = service.list_products(query).await?;
    Ok(Json(page))
}

async fn get_product<R: ProductRepository, I: ImageStore>(
    State(service): State<SharedService<R, I>>,
    Path(id): Path<i32>,
) -> CatalogResult<Json<ProductDetail>> {
    let product = service.get_product(id).await?;
    Ok(Json(product))
}

async fn create_product<R: ProductRepository, I: ImageStore>(
    State(service): State<SharedService<R, I>>,
    claims: Option<Extension<JwtClaims>>,
    headers: HeaderMap,
    multipart: Multipart,
) -> CatalogResult<Json<Product>> {
    let (form, image) = read_product_form(multipart).await?;
    let product = service.create_product(form, image).await?;

    audit(&claims, &headers, "product.create", &product);
    Ok(Json(product))
}

async fn update_product<R: ProductRepository, I: ImageStore>(
    State(service): State<SharedService<R, I>>,
    Path(id): Path<i32>,
    claims: Option<Extension<JwtClaims>>,
    headers: HeaderMap,
    multipart: Multipart,
) -> CatalogResult<Json<Product>> {
    let (form, image) = read_product_form(multipart).await?;
    let product = service.update_product(id, form, image).await?;

    audit(&claims, &headers, "product.update", &product);
    Ok(Json(product))
}

async fn delete_product<R: ProductRepository, I: ImageStore>(
    State(service): State<SharedService<R, I>>,
    Path(id): Path<i32>,
    claims: Option<Extension<JwtClaims>>,
    headers: HeaderMap,
) -> CatalogResult<Json<Product>> {
    let product = service.delete_product(id).await?;

    audit(&claims, &headers, "product.delete", &product);
    Ok(Json(product))
}

fn audit(
    claims: &Option<Extension<JwtClaims>>,
    headers: &HeaderMap,
    action: &str,
    product: &Product,
) {
    AuditEvent::new(
        claims.as_ref().map(|Extension(c)| c.sub.clone()),
        action,
        Some(format!("product:{}", product.product_id)),
        AuditOutcome::Success,
    )
    .with_request(headers)
    .with_details(json!({
        "product_name": product.product_name,
        "category_id": product.category_id,
        "picture": product.product_picture,
    }))
    .log();
}

fn parse_field<T>(field: &str, raw: &str) -> CatalogResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    raw.parse()
        .map(Some)
        .map_err(|e| CatalogError::Validation(format!("{} is invalid: {}", field, e)))
}

/// Decode the product form. Field names match case-insensitively; unknown
/// fields are ignored and an empty file part counts as no image.
async fn read_product_form(
    mut multipart: Multipart,
) -> CatalogResult<(ProductForm, Option<ImageUpload>)> {
    let mut product_name = None;
    let mut unit_price: Option<Decimal> = None;
    let mut unit_in_stock: Option<i32> = None;
    let mut category_id: Option<i32> = None;
    let mut image = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_ascii_lowercase();

        match name.as_str() {
            "image" => {
                let file_name = field.file_name().map(str::to_owned);
                let bytes = field.bytes().await?;

                if let Some(file_name) = file_name.filter(|n| !n.is_empty()) {
                    if !bytes.is_empty() {
                        image = Some(ImageUpload {
                            file_name,
                            bytes: bytes.to_vec(),
                        });
                    }
                }
            }
            "productname" => {
                let text = field.text().await?;
                product_name = Some(text).filter(|t| !t.is_empty());
            }
            "unitprice" => unit_price = parse_field("unitPrice", &field.text().await?)?,
            "unitinstock" => unit_in_stock = parse_field("unitInStock", &field.text().await?)?,
            "categoryid" => category_id = parse_field("categoryId", &field.text().await?)?,
            other => tracing::debug!(field = %other, "Ignoring form field"),
        }
    }

    let category_id =
        category_id.ok_or_else(|| CatalogError::Validation("categoryId is required".to_string()))?;

    let form = ProductForm {
        product_name,
        unit_price,
        unit_in_stock,
        category_id,
    };

    Ok((form, image))
}
