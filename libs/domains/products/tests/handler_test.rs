//! Handler tests for the Products domain
//!
//! Routers run over in-memory repositories. Write routes need a valid bearer
//! token; reads are public.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use axum_helpers::{JwtAuth, JwtConfig, Paginated, ACCESS_TOKEN_TTL};
use domain_products::*;
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt; // For oneshot()

const SECRET: &str = "products-handler-secret-32-characters!";

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

struct TestApp {
    products: Router,
    categories: Router,
    repository: Arc<InMemoryProductRepository>,
    token: String,
}

impl TestApp {
    fn new() -> Self {
        let repository = Arc::new(InMemoryProductRepository::new());
        let category_repository = Arc::new(InMemoryCategoryRepository::new());
        let auth = JwtAuth::new(&JwtConfig::new(SECRET).unwrap());
        let token = auth
            .issue_token("acct-1", "admin@example.com", "Admin", &["admin".to_string()], ACCESS_TOKEN_TTL)
            .unwrap();

        Self {
            products: handlers::products::router(
                ProductService::new(repository.clone(), category_repository.clone()),
                auth.clone(),
            ),
            categories: handlers::categories::router(
                CategoryService::new(category_repository, repository.clone()),
                auth,
            ),
            repository,
            token,
        }
    }

    fn authed(&self, method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {}", self.token))
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn create_product(&self, body: serde_json::Value) -> Product {
        let response = self
            .products
            .clone()
            .oneshot(self.authed("POST", "/", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        json_body(response.into_body()).await
    }
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_create_product_requires_token() {
    let app = TestApp::new();

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "name": "Lamp", "description": "Bright", "price": 1000 }).to_string(),
        ))
        .unwrap();

    let response = app.products.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_product_ignores_rating_fields() {
    let app = TestApp::new();

    let product = app
        .create_product(json!({
            "name": "Desk Lamp",
            "description": "Bright",
            "price": 1999,
            "stock": 4,
            "rating": 5.0,
            "num_reviews": 120
        }))
        .await;

    assert_eq!(product.slug, "desk-lamp");
    assert_eq!(product.rating, 0.0);
    assert_eq!(product.num_reviews, 0);
    assert!(product.in_stock);
}

#[tokio::test]
async fn test_update_product_keeps_rating() {
    let app = TestApp::new();
    let product = app
        .create_product(json!({ "name": "Fan", "description": "Breezy", "price": 3000 }))
        .await;
    app.repository.set_rating(product.id, 4.2, 9).await.unwrap();

    let response = app
        .products
        .clone()
        .oneshot(app.authed(
            "PUT",
            &format!("/{}", product.id),
            json!({ "price": 2500, "rating": 1.0, "num_reviews": 0 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let updated: Product = json_body(response.into_body()).await;
    assert_eq!(updated.price, 2500);
    assert_eq!(updated.rating, 4.2);
    assert_eq!(updated.num_reviews, 9);
}

#[tokio::test]
async fn test_get_product_by_slug_and_missing() {
    let app = TestApp::new();
    let product = app
        .create_product(json!({ "name": "Wall Clock", "description": "Ticks", "price": 4500 }))
        .await;

    let response = app.products.clone().oneshot(get("/wall-clock")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let found: Product = json_body(response.into_body()).await;
    assert_eq!(found.id, product.id);

    let response = app.products.clone().oneshot(get("/no-such-thing")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_products_filters_and_paginates() {
    let app = TestApp::new();
    for (name, price) in [("Cheap Pen", 150), ("Nice Pen", 2500), ("Gold Pen", 90000)] {
        app.create_product(json!({ "name": name, "description": "Writes", "price": price }))
            .await;
    }

    let response = app
        .products
        .clone()
        .oneshot(get("/?min_price=100&max_price=5000&search=pen&limit=1"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let page: Paginated<Product> = json_body(response.into_body()).await;
    assert_eq!(page.pagination.total, 2);
    assert_eq!(page.pagination.pages, 2);
    assert_eq!(page.data.len(), 1);
}

#[tokio::test]
async fn test_featured_products() {
    let app = TestApp::new();
    let star = app
        .create_product(json!({ "name": "Star", "description": "Shiny", "price": 100, "featured": true }))
        .await;
    app.create_product(json!({ "name": "Plain", "description": "Dull", "price": 100 }))
        .await;

    let response = app.products.clone().oneshot(get("/featured")).await.unwrap();
    let featured: Vec<Product> = json_body(response.into_body()).await;
    assert_eq!(featured.len(), 1);
    assert_eq!(featured[0].id, star.id);
}

#[tokio::test]
async fn test_category_delete_refused_while_in_use() {
    let app = TestApp::new();

    let response = app
        .categories
        .clone()
        .oneshot(app.authed("POST", "/", json!({ "name": "Lighting" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let category: Category = json_body(response.into_body()).await;

    app.create_product(json!({
        "name": "Lamp",
        "description": "Bright",
        "price": 1000,
        "category_id": category.id
    }))
    .await;

    let response = app.categories.clone().oneshot(get("/lighting")).await.unwrap();
    let category: Category = json_body(response.into_body()).await;
    assert_eq!(category.product_count, 1);

    let response = app
        .categories
        .clone()
        .oneshot(app.authed("DELETE", &format!("/{}", category.id), json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
