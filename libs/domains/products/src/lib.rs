//! Products Domain
//!
//! Domain implementation for the product catalog: CRUD over PostgreSQL,
//! category-name enrichment from the external category service, and the
//! order-placed consumer that decrements stock.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐
//! │  Handlers   │     │ OrderProcessor│  ← HTTP endpoints / queue consumer
//! └──────┬──────┘     └──────┬───────┘
//!        │                   │
//! ┌──────▼───────────────────▼──────┐
//! │            Service              │  ← business logic, enrichment, events
//! └──────┬──────────┬──────────┬────┘
//!        │          │          │
//! ┌──────▼─────┐ ┌──▼───────┐ ┌▼──────────────┐
//! │ Repository │ │ Category │ │ ChangePublisher│
//! │  (trait)   │ │ Provider │ │    (trait)     │
//! └────────────┘ └──────────┘ └───────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use axum_helpers::JwtAuth;
//! use domain_products::{
//!     category::HttpCategoryClient,
//!     handlers,
//!     repository::InMemoryProductRepository,
//!     service::ProductService,
//! };
//!
//! let repository = InMemoryProductRepository::new();
//! let categories = HttpCategoryClient::new("https://localhost:7286");
//! let service = ProductService::new(repository, categories);
//!
//! let router = handlers::router(service, JwtAuth::from_env());
//! ```

pub mod category;
pub mod entity;
pub mod error;
pub mod events;
pub mod handlers;
pub mod models;
pub mod orders;
pub mod postgres;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use category::{CategoryProvider, HttpCategoryClient};
pub use error::{ProductError, ProductResult};
pub use events::{AmqpChangePublisher, ChangePublisher};
pub use handlers::ApiDoc;
pub use models::{OrderPlaced, Product, ProductChanged, ProductDto, ProductInput};
pub use orders::OrderProcessor;
pub use postgres::PgProductRepository;
pub use repository::{InMemoryProductRepository, ProductRepository};
pub use service::ProductService;
