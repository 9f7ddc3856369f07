//! API routes module

use axum::Router;
use axum_helpers::JwtAuth;
use domain_products::{
    handlers, CategoryProvider, ProductRepository, ProductService,
};

/// Create all API routes
pub fn routes<R, C>(service: ProductService<R, C>, auth: JwtAuth) -> Router
where
    R: ProductRepository + 'static,
    C: CategoryProvider + 'static,
{
    Router::new().nest("/products", handlers::router(service, auth))
}
