//! Catalog Domain
//!
//! Products, their seeded categories and the pictures uploaded for them.
//!
//! ```text
//! handlers ──► ProductService ──► ProductRepository (Postgres / in-memory)
//!                     │
//!                     └─────────► ImageStore (local directory)
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_catalog::{
//!     handlers, InMemoryProductRepository, LocalImageStore, ProductService,
//! };
//!
//! let service = ProductService::new(
//!     InMemoryProductRepository::new(),
//!     LocalImageStore::new("wwwroot/uploads"),
//! );
//! let router = handlers::router(service, 10 * 1024 * 1024);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod images;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{CatalogError, CatalogResult};
pub use images::{ImageStore, LocalImageStore, UploadConfig};
pub use models::{
    Category, ImageUpload, MAX_PAGE_SIZE, NO_IMAGE, NewProduct, Product, ProductDetail,
    ProductFilter, ProductForm, ProductPage, ProductQuery,
};
pub use postgres::PgProductRepository;
pub use repository::{InMemoryProductRepository, ProductRepository};
pub use service::ProductService;
