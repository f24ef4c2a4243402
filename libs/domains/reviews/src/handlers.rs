//! HTTP handlers for the Reviews API
//!
//! The whole router runs behind [`optional_jwt_auth_middleware`], so handlers
//! see a [`Caller`] that is either anonymous or carries verified claims.
//! Moderation endpoints answer 403 for anyone the policy does not accept.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ConflictResponse,
        ForbiddenResponse, InternalServerErrorResponse, NotFoundResponse,
    },
    optional_jwt_auth_middleware, Caller, JsonBody, JwtAuth, PageQuery, Paginated, UuidPath,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::catalog::ProductCatalog;
use crate::error::ReviewResult;
use crate::models::{CreateReview, RatingAggregate, Review, ReviewFilter, ReviewStatus};
use crate::repository::ReviewRepository;
use crate::service::{ReviewService, REVIEW_PAGE_SIZE};

#[derive(OpenApi)]
#[openapi(
    paths(
        list_reviews,
        create_review,
        list_product_reviews,
        get_review,
        mark_helpful,
        approve_review,
        reject_review,
        delete_review,
        recompute_rating,
    ),
    components(
        schemas(Review, CreateReview, ReviewStatus, RatingAggregate),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            ForbiddenResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Reviews", description = "Product reviews and moderation")
    )
)]
pub struct ApiDoc;

type Service<R, C> = State<Arc<ReviewService<R, C>>>;

pub fn router<R, C>(service: ReviewService<R, C>, auth: JwtAuth) -> Router
where
    R: ReviewRepository + 'static,
    C: ProductCatalog + 'static,
{
    Router::new()
        .route("/", get(list_reviews).post(create_review))
        .route("/product/{product_id}", get(list_product_reviews))
        .route("/product/{product_id}/recompute", post(recompute_rating))
        .route("/{id}", get(get_review).delete(delete_review))
        .route("/{id}/helpful", put(mark_helpful))
        .route("/{id}/approve", put(approve_review))
        .route("/{id}/reject", put(reject_review))
        .with_state(Arc::new(service))
        .layer(middleware::from_fn_with_state(
            auth,
            optional_jwt_auth_middleware,
        ))
}

/// List reviews
///
/// Anonymous and non-moderator callers only ever see approved reviews,
/// whatever `status` they ask for.
#[utoipa::path(
    get,
    path = "",
    tag = "Reviews",
    params(ReviewFilter, PageQuery),
    responses(
        (status = 200, description = "Page of reviews", body = Paginated<Review>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_reviews<R: ReviewRepository, C: ProductCatalog>(
    State(service): Service<R, C>,
    caller: Caller,
    Query(filter): Query<ReviewFilter>,
    Query(page): Query<PageQuery>,
) -> ReviewResult<Json<Paginated<Review>>> {
    let reviews = service
        .list_reviews(&caller, filter, page.resolve(REVIEW_PAGE_SIZE))
        .await?;
    Ok(Json(reviews))
}

/// Submit a review; it stays pending until a moderator approves it
///
/// Text fields are trimmed and the email lowercased before validation.
#[utoipa::path(
    post,
    path = "",
    tag = "Reviews",
    request_body = CreateReview,
    responses(
        (status = 201, description = "Review submitted", body = Review),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_review<R: ReviewRepository, C: ProductCatalog>(
    State(service): Service<R, C>,
    JsonBody(input): JsonBody<CreateReview>,
) -> ReviewResult<impl IntoResponse> {
    let review = service.create_review(input).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// Approved reviews of a product, newest first
#[utoipa::path(
    get,
    path = "/product/{product_id}",
    tag = "Reviews",
    params(("product_id" = Uuid, Path, description = "Product id"), PageQuery),
    responses(
        (status = 200, description = "Page of approved reviews", body = Paginated<Review>),
        (status = 400, response = BadRequestUuidResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_product_reviews<R: ReviewRepository, C: ProductCatalog>(
    State(service): Service<R, C>,
    UuidPath(product_id): UuidPath,
    Query(page): Query<PageQuery>,
) -> ReviewResult<Json<Paginated<Review>>> {
    let reviews = service
        .list_approved_reviews(product_id, page.resolve(REVIEW_PAGE_SIZE))
        .await?;
    Ok(Json(reviews))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Reviews",
    params(("id" = Uuid, Path, description = "Review id")),
    responses(
        (status = 200, description = "Review found", body = Review),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_review<R: ReviewRepository, C: ProductCatalog>(
    State(service): Service<R, C>,
    caller: Caller,
    UuidPath(id): UuidPath,
) -> ReviewResult<Json<Review>> {
    Ok(Json(service.get_review(&caller, id).await?))
}

#[utoipa::path(
    put,
    path = "/{id}/helpful",
    tag = "Reviews",
    params(("id" = Uuid, Path, description = "Review id")),
    responses(
        (status = 200, description = "Helpful count incremented", body = Review),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn mark_helpful<R: ReviewRepository, C: ProductCatalog>(
    State(service): Service<R, C>,
    UuidPath(id): UuidPath,
) -> ReviewResult<Json<Review>> {
    Ok(Json(service.increment_helpful(id).await?))
}

#[utoipa::path(
    put,
    path = "/{id}/approve",
    tag = "Reviews",
    params(("id" = Uuid, Path, description = "Review id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Review approved", body = Review),
        (status = 400, response = BadRequestUuidResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn approve_review<R: ReviewRepository, C: ProductCatalog>(
    State(service): Service<R, C>,
    caller: Caller,
    UuidPath(id): UuidPath,
) -> ReviewResult<Json<Review>> {
    Ok(Json(service.approve_review(&caller, id).await?))
}

#[utoipa::path(
    put,
    path = "/{id}/reject",
    tag = "Reviews",
    params(("id" = Uuid, Path, description = "Review id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Review rejected", body = Review),
        (status = 400, response = BadRequestUuidResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn reject_review<R: ReviewRepository, C: ProductCatalog>(
    State(service): Service<R, C>,
    caller: Caller,
    UuidPath(id): UuidPath,
) -> ReviewResult<Json<Review>> {
    Ok(Json(service.reject_review(&caller, id).await?))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Reviews",
    params(("id" = Uuid, Path, description = "Review id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Review deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_review<R: ReviewRepository, C: ProductCatalog>(
    State(service): Service<R, C>,
    caller: Caller,
    UuidPath(id): UuidPath,
) -> ReviewResult<StatusCode> {
    service.delete_review(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Recompute a product's rating from its approved reviews
#[utoipa::path(
    post,
    path = "/product/{product_id}/recompute",
    tag = "Reviews",
    params(("product_id" = Uuid, Path, description = "Product id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Aggregate written to the product", body = RatingAggregate),
        (status = 400, response = BadRequestUuidResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn recompute_rating<R: ReviewRepository, C: ProductCatalog>(
    State(service): Service<R, C>,
    caller: Caller,
    UuidPath(product_id): UuidPath,
) -> ReviewResult<Json<RatingAggregate>> {
    Ok(Json(service.recompute_product(&caller, product_id).await?))
}
