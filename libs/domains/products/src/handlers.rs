use axum::{
    extract::{Path, State},
    http::{Method, StatusCode},
    middleware,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestValidationResponse, ForbiddenResponse, InternalServerErrorResponse,
        NotFoundResponse, UnauthorizedResponse,
    },
    jwt_auth_middleware, role_guard_middleware, BearerToken, JwtAuth, RoleGuard, ValidatedJson,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::category::CategoryProvider;
use crate::error::{ProductError, ProductResult};
use crate::models::{ProductDto, ProductInput};
use crate::repository::ProductRepository;
use crate::service::ProductService;

pub const TAG: &str = "Products";

/// Role required for create/update/delete
pub const ADMIN_ROLE: &str = "Admin";

/// OpenAPI documentation for the Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        get_product,
        update_product,
        delete_product,
        products_by_category,
    ),
    components(
        schemas(ProductDto, ProductInput),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Product catalog endpoints")
    )
)]
pub struct ApiDoc;

/// Create the product router with all HTTP endpoints.
///
/// Every route requires a valid bearer JWT; POST/PUT/DELETE additionally
/// require the Admin role.
pub fn router<R, C>(service: ProductService<R, C>, auth: JwtAuth) -> Router
where
    R: ProductRepository + 'static,
    C: CategoryProvider + 'static,
{
    let shared_service = Arc::new(service);

    let guard = RoleGuard::new()
        .require(Method::POST, ADMIN_ROLE)
        .require(Method::PUT, ADMIN_ROLE)
        .require(Method::DELETE, ADMIN_ROLE);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/byCategory/{category_id}", get(products_by_category))
        .layer(middleware::from_fn_with_state(guard, role_guard_middleware))
        .layer(middleware::from_fn_with_state(auth, jwt_auth_middleware))
        .with_state(shared_service)
}

/// List all products, each enriched with its category name
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    responses(
        (status = 200, description = "List of products", body = Vec<ProductDto>),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R, C>(
    State(service): State<Arc<ProductService<R, C>>>,
    Extension(token): Extension<BearerToken>,
) -> ProductResult<Json<Vec<ProductDto>>>
where
    R: ProductRepository + 'static,
    C: CategoryProvider + 'static,
{
    let products = service.list(Some(token.0.as_str())).await?;
    Ok(Json(products))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = ProductInput,
    responses(
        (status = 201, description = "Product created successfully", body = ProductDto),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R, C>(
    State(service): State<Arc<ProductService<R, C>>>,
    Extension(token): Extension<BearerToken>,
    ValidatedJson(input): ValidatedJson<ProductInput>,
) -> ProductResult<impl IntoResponse>
where
    R: ProductRepository + 'static,
    C: CategoryProvider + 'static,
{
    let product = service.create(input, Some(token.0.as_str())).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = ProductDto),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R, C>(
    State(service): State<Arc<ProductService<R, C>>>,
    Extension(token): Extension<BearerToken>,
    Path(id): Path<i32>,
) -> ProductResult<Json<ProductDto>>
where
    R: ProductRepository + 'static,
    C: CategoryProvider + 'static,
{
    let product = service.get(id, Some(token.0.as_str())).await?;
    Ok(Json(product))
}

/// Replace a product's fields
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    request_body = ProductInput,
    responses(
        (status = 204, description = "Product updated successfully"),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R, C>(
    State(service): State<Arc<ProductService<R, C>>>,
    Path(id): Path<i32>,
    ValidatedJson(input): ValidatedJson<ProductInput>,
) -> ProductResult<StatusCode>
where
    R: ProductRepository + 'static,
    C: CategoryProvider + 'static,
{
    service.update(id, input).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product deleted successfully"),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R, C>(
    State(service): State<Arc<ProductService<R, C>>>,
    Path(id): Path<i32>,
) -> ProductResult<StatusCode>
where
    R: ProductRepository + 'static,
    C: CategoryProvider + 'static,
{
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List products referencing a category
#[utoipa::path(
    get,
    path = "/byCategory/{category_id}",
    tag = TAG,
    params(
        ("category_id" = i32, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Products in the category", body = Vec<ProductDto>),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn products_by_category<R, C>(
    State(service): State<Arc<ProductService<R, C>>>,
    Extension(token): Extension<BearerToken>,
    Path(category_id): Path<i32>,
) -> ProductResult<Json<Vec<ProductDto>>>
where
    R: ProductRepository + 'static,
    C: CategoryProvider + 'static,
{
    let products = service
        .list_by_category(category_id, Some(token.0.as_str()))
        .await?;

    if products.is_empty() {
        return Err(ProductError::CategoryEmpty(category_id));
    }

    Ok(Json(products))
}
