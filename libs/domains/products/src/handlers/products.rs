use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ConflictResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
    jwt_auth_middleware, JwtAuth, Paginated, UuidPath, ValidatedJson,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProductResult;
use crate::models::{
    CreateProduct, Product, ProductFilter, ProductImage, ProductStatus, Specification,
    UpdateProduct,
};
use crate::repository::{CategoryRepository, ProductRepository};
use crate::service::ProductService;

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        featured_products,
        get_product,
        create_product,
        update_product,
        delete_product,
    ),
    components(
        schemas(Product, CreateProduct, UpdateProduct, ProductStatus, ProductImage, Specification),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Product catalog endpoints")
    )
)]
pub struct ApiDoc;

type Service<P, C> = State<Arc<ProductService<P, C>>>;

/// Create the products router
pub fn router<P, C>(service: ProductService<P, C>, auth: JwtAuth) -> Router
where
    P: ProductRepository + 'static,
    C: CategoryRepository + 'static,
{
    let require_auth = middleware::from_fn_with_state(auth, jwt_auth_middleware);

    Router::new()
        .route(
            "/",
            get(list_products).merge(post(create_product).route_layer(require_auth.clone())),
        )
        .route("/featured", get(featured_products))
        .route(
            "/{id}",
            get(get_product).merge(
                put(update_product)
                    .merge(delete(delete_product))
                    .route_layer(require_auth),
            ),
        )
        .with_state(Arc::new(service))
}

/// List products with optional filters
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    params(ProductFilter),
    responses(
        (status = 200, description = "Page of products", body = Paginated<Product>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<P: ProductRepository, C: CategoryRepository>(
    State(service): Service<P, C>,
    Query(filter): Query<ProductFilter>,
) -> ProductResult<Json<Paginated<Product>>> {
    Ok(Json(service.list_products(filter).await?))
}

/// Active featured products, best rated first
#[utoipa::path(
    get,
    path = "/featured",
    tag = "Products",
    responses(
        (status = 200, description = "Featured products", body = Vec<Product>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn featured_products<P: ProductRepository, C: CategoryRepository>(
    State(service): Service<P, C>,
) -> ProductResult<Json<Vec<Product>>> {
    Ok(Json(service.featured_products().await?))
}

/// Get a product by id or slug
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product id or slug")),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<P: ProductRepository, C: CategoryRepository>(
    State(service): Service<P, C>,
    Path(id_or_slug): Path<String>,
) -> ProductResult<Json<Product>> {
    Ok(Json(service.find_product(&id_or_slug).await?))
}

/// Create a new product
///
/// `rating` and `num_reviews` are derived from reviews and ignored if sent.
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body = CreateProduct,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<P: ProductRepository, C: CategoryRepository>(
    State(service): Service<P, C>,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> ProductResult<impl IntoResponse> {
    let product = service.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product; absent fields are left unchanged
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = UpdateProduct,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<P: ProductRepository, C: CategoryRepository>(
    State(service): Service<P, C>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateProduct>,
) -> ProductResult<Json<Product>> {
    Ok(Json(service.update_product(id, input).await?))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Product id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<P: ProductRepository, C: CategoryRepository>(
    State(service): Service<P, C>,
    UuidPath(id): UuidPath,
) -> ProductResult<StatusCode> {
    service.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
