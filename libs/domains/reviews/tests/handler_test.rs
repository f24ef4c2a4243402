//! Handler tests for the Reviews domain
//!
//! These drive the reviews router end to end over in-memory repositories:
//! - JSON in/out and status codes
//! - moderator gating through real HS256 tokens
//! - the product rating seen after each moderation step

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use axum_helpers::{JwtAuth, JwtConfig, Paginated, ACCESS_TOKEN_TTL};
use domain_products::{CreateProduct, InMemoryProductRepository, ProductRepository, ProductStatus};
use domain_reviews::*;
use http_body_util::BodyExt;
use serde_json::json;
use test_utils::TestDataBuilder;
use tower::ServiceExt; // For oneshot()
use uuid::Uuid;

const SECRET: &str = "handler-test-secret-with-at-least-32-chars";

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

struct TestApp {
    router: Router,
    products: Arc<InMemoryProductRepository>,
    auth: JwtAuth,
}

impl TestApp {
    fn new() -> Self {
        let products = Arc::new(InMemoryProductRepository::new());
        let auth = JwtAuth::new(&JwtConfig::new(SECRET).unwrap());
        let service = ReviewService::new(
            Arc::new(InMemoryReviewRepository::new()),
            Arc::new(RepositoryCatalog::new(products.clone())),
            Arc::new(RolePolicy::default()),
        );

        Self {
            router: handlers::router(service, auth.clone()),
            products,
            auth,
        }
    }

    fn token(&self, roles: &[&str]) -> String {
        let roles: Vec<String> = roles.iter().map(|r| r.to_string()).collect();
        self.auth
            .issue_token("acct-1", "staff@example.com", "Staff", &roles, ACCESS_TOKEN_TTL)
            .unwrap()
    }

    async fn product(&self, name: &str) -> Uuid {
        let input = CreateProduct {
            name: name.to_string(),
            description: "Handler test product".to_string(),
            price: 2_500,
            discount_price: None,
            category_id: None,
            images: vec![],
            thumbnail: None,
            stock: 5,
            specifications: vec![],
            features: vec![],
            status: ProductStatus::Active,
            featured: false,
            video_url: None,
            tags: vec![],
        };
        self.products.create(input).await.unwrap().id
    }

    async fn send(&self, request: Request<Body>) -> axum::response::Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn submit(&self, product_id: Uuid, email: &str, rating: i32) -> Review {
        let response = self
            .send(post_json(
                "/",
                json!({
                    "product_id": product_id,
                    "reviewer_name": "Test Reviewer",
                    "reviewer_email": email,
                    "rating": rating,
                    "comment": "Does what it says"
                }),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        json_body(response.into_body()).await
    }

    async fn moderate(&self, id: Uuid, action: &str, token: Option<&str>) -> StatusCode {
        let mut builder = Request::builder()
            .method("PUT")
            .uri(format!("/{}/{}", id, action));
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        self.send(builder.body(Body::empty()).unwrap())
            .await
            .status()
    }

    async fn rating(&self, product_id: Uuid) -> (f64, i64) {
        let product = self.products.get_by_id(product_id).await.unwrap().unwrap();
        (product.rating, product.num_reviews)
    }
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn test_create_review_returns_201_pending() {
    let app = TestApp::new();
    let builder = TestDataBuilder::from_test_name("create_review_201");
    let product_id = app.product("Kettle").await;

    let review = app.submit(product_id, &builder.email("ann"), 5).await;

    assert_eq!(review.status, ReviewStatus::Pending);
    assert_eq!(review.product_id, product_id);
    assert_eq!(app.rating(product_id).await, (0.0, 0));
}

#[tokio::test]
async fn test_create_review_rejects_out_of_range_rating() {
    let app = TestApp::new();
    let product_id = app.product("Toaster").await;

    let response = app
        .send(post_json(
            "/",
            json!({
                "product_id": product_id,
                "reviewer_name": "Ann",
                "reviewer_email": "ann@example.com",
                "rating": 6,
                "comment": "Too good"
            }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(body["details"]["rating"].is_array());
}

#[tokio::test]
async fn test_create_review_normalizes_email_before_validating() {
    let app = TestApp::new();
    let product_id = app.product("Blender").await;

    let review = app.submit(product_id, "  Ann@Example.COM ", 4).await;
    assert_eq!(review.reviewer_email, "ann@example.com");

    let response = app
        .send(post_json(
            "/",
            json!({
                "product_id": product_id,
                "reviewer_name": "Ann again",
                "reviewer_email": "ann@example.com",
                "rating": 2,
                "comment": "Second try"
            }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_malformed_body_returns_json_error() {
    let app = TestApp::new();

    let response = app
        .send(
            Request::builder()
                .method("POST")
                .uri("/")
                .header("content-type", "application/json")
                .body(Body::from("{\"rating\": "))
                .unwrap(),
        )
        .await;

    assert!(response.status().is_client_error());
    let body: serde_json::Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "JSON_EXTRACTION");
}

#[tokio::test]
async fn test_duplicate_review_returns_409() {
    let app = TestApp::new();
    let product_id = app.product("Blender").await;
    app.submit(product_id, "bob@example.com", 4).await;

    let response = app
        .send(post_json(
            "/",
            json!({
                "product_id": product_id,
                "reviewer_name": "Bob again",
                "reviewer_email": "BOB@example.com",
                "rating": 1,
                "comment": "Changed my mind"
            }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_review_for_unknown_product_returns_404() {
    let app = TestApp::new();

    let response = app
        .send(post_json(
            "/",
            json!({
                "product_id": Uuid::now_v7(),
                "reviewer_name": "Ann",
                "reviewer_email": "ann@example.com",
                "rating": 3,
                "comment": "Where is it"
            }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_moderation_requires_moderator_role() {
    let app = TestApp::new();
    let product_id = app.product("Mixer").await;
    let review = app.submit(product_id, "cy@example.com", 5).await;

    assert_eq!(
        app.moderate(review.id, "approve", None).await,
        StatusCode::FORBIDDEN
    );
    let customer = app.token(&["customer"]);
    assert_eq!(
        app.moderate(review.id, "approve", Some(&customer)).await,
        StatusCode::FORBIDDEN
    );
    assert_eq!(app.rating(product_id).await, (0.0, 0));

    let admin = app.token(&["admin"]);
    assert_eq!(
        app.moderate(review.id, "approve", Some(&admin)).await,
        StatusCode::OK
    );
    assert_eq!(app.rating(product_id).await, (5.0, 1));
}

#[tokio::test]
async fn test_rating_follows_moderation_and_delete() {
    let app = TestApp::new();
    let admin = app.token(&["admin"]);
    let product_id = app.product("Grinder").await;

    let r1 = app.submit(product_id, "r1@example.com", 5).await;
    let r2 = app.submit(product_id, "r2@example.com", 4).await;
    let r3 = app.submit(product_id, "r3@example.com", 2).await;

    app.moderate(r2.id, "approve", Some(&admin)).await;
    app.moderate(r3.id, "approve", Some(&admin)).await;
    assert_eq!(app.rating(product_id).await, (3.0, 2));

    app.moderate(r1.id, "approve", Some(&admin)).await;
    assert_eq!(app.rating(product_id).await, (3.7, 3));

    let response = app
        .send(
            Request::builder()
                .method("DELETE")
                .uri(format!("/{}", r3.id))
                .header("authorization", format!("Bearer {}", admin))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(app.rating(product_id).await, (4.5, 2));

    app.moderate(r2.id, "reject", Some(&admin)).await;
    assert_eq!(app.rating(product_id).await, (5.0, 1));
}

#[tokio::test]
async fn test_product_reviews_lists_only_approved() {
    let app = TestApp::new();
    let admin = app.token(&["moderator"]);
    let product_id = app.product("Scale").await;

    let approved = app.submit(product_id, "a@example.com", 4).await;
    app.submit(product_id, "b@example.com", 1).await;
    app.moderate(approved.id, "approve", Some(&admin)).await;

    let response = app
        .send(
            Request::builder()
                .uri(format!("/product/{}?limit=5", product_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let page: Paginated<Review> = json_body(response.into_body()).await;
    assert_eq!(page.pagination.total, 1);
    assert_eq!(page.pagination.limit, 5);
    assert_eq!(page.data[0].id, approved.id);
}

#[tokio::test]
async fn test_public_list_ignores_status_filter() {
    let app = TestApp::new();
    let product_id = app.product("Juicer").await;
    app.submit(product_id, "a@example.com", 2).await;

    let response = app
        .send(
            Request::builder()
                .uri("/?status=pending")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    let page: Paginated<Review> = json_body(response.into_body()).await;
    assert_eq!(page.pagination.total, 0);
    assert_eq!(page.pagination.limit, 10);
}

#[tokio::test]
async fn test_huge_page_number_is_clamped() {
    let app = TestApp::new();
    let product_id = app.product("Grinder").await;

    for uri in [
        format!("/?page={}&limit=50", u64::MAX),
        format!("/product/{}?page={}", product_id, u64::MAX),
    ] {
        let response = app
            .send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let page: Paginated<Review> = json_body(response.into_body()).await;
        assert!(page.data.is_empty());
        assert_eq!(page.pagination.page, axum_helpers::MAX_PAGE);
    }
}

#[tokio::test]
async fn test_helpful_increments_count() {
    let app = TestApp::new();
    let product_id = app.product("Peeler").await;
    let review = app.submit(product_id, "a@example.com", 3).await;

    let response = app
        .send(
            Request::builder()
                .method("PUT")
                .uri(format!("/{}/helpful", review.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let updated: Review = json_body(response.into_body()).await;
    assert_eq!(updated.helpful_count, 1);
}

#[tokio::test]
async fn test_invalid_uuid_returns_400() {
    let app = TestApp::new();
    let admin = app.token(&["admin"]);

    let response = app
        .send(
            Request::builder()
                .method("PUT")
                .uri("/not-a-uuid/approve")
                .header("authorization", format!("Bearer {}", admin))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "INVALID_UUID");
}

#[tokio::test]
async fn test_recompute_endpoint() {
    let app = TestApp::new();
    let admin = app.token(&["superadmin"]);
    let product_id = app.product("Ladle").await;

    // Rating drifted, e.g. after a manual data import
    app.products.set_rating(product_id, 1.0, 40).await.unwrap();

    let response = app
        .send(
            Request::builder()
                .method("POST")
                .uri(format!("/product/{}/recompute", product_id))
                .header("authorization", format!("Bearer {}", admin))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let aggregate: RatingAggregate = json_body(response.into_body()).await;
    assert_eq!(aggregate, RatingAggregate::EMPTY);
    assert_eq!(app.rating(product_id).await, (0.0, 0));
}

#[tokio::test]
async fn test_recompute_unknown_product_returns_404() {
    let app = TestApp::new();
    let admin = app.token(&["admin"]);

    let response = app
        .send(
            Request::builder()
                .method("POST")
                .uri(format!("/product/{}/recompute", Uuid::now_v7()))
                .header("authorization", format!("Bearer {}", admin))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
