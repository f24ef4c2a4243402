//! MongoDB integration tests for the rating path
//!
//! Run with a Docker daemon available:
//! `cargo test -p domain_reviews --test integration_test -- --ignored`

use std::sync::Arc;

use axum_helpers::{Caller, JwtClaims};
use domain_products::{
    CreateProduct, MongoProductRepository, ProductRepository, ProductStatus,
};
use domain_reviews::*;
use test_utils::{TestDataBuilder, TestMongo};
use uuid::Uuid;

fn moderator() -> Caller {
    Caller::authenticated(JwtClaims {
        sub: "it-admin".into(),
        email: "it@example.com".into(),
        name: "IT".into(),
        roles: vec!["admin".into()],
        exp: 0,
        iat: 0,
        jti: "it".into(),
    })
}

fn product_input(name: String) -> CreateProduct {
    CreateProduct {
        name,
        description: "Integration product".to_string(),
        price: 999,
        discount_price: None,
        category_id: None,
        images: vec![],
        thumbnail: None,
        stock: 2,
        specifications: vec![],
        features: vec![],
        status: ProductStatus::Active,
        featured: false,
        video_url: None,
        tags: vec![],
    }
}

fn review_input(product_id: Uuid, email: String, rating: i32) -> CreateReview {
    CreateReview {
        product_id,
        reviewer_name: "IT Reviewer".to_string(),
        reviewer_email: email,
        rating,
        comment: "Integration comment".to_string(),
    }
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_rating_consistency_against_mongodb() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("rating_consistency_mongo");
    let db = mongo.database(&builder.database_name());

    let products = Arc::new(MongoProductRepository::new(&db));
    products.init_indexes().await.unwrap();
    let reviews = Arc::new(MongoReviewRepository::new(&db));
    reviews.init_indexes().await.unwrap();

    let service = ReviewService::new(
        reviews,
        Arc::new(RepositoryCatalog::new(products.clone())),
        Arc::new(RolePolicy::default()),
    );

    let product = products
        .create(product_input(builder.name("product", "main")))
        .await
        .unwrap();

    let mut ids = Vec::new();
    for (who, rating) in [("r1", 5), ("r2", 4), ("r3", 2)] {
        let review = service
            .create_review(review_input(product.id, builder.email(who), rating))
            .await
            .unwrap();
        ids.push(review.id);
    }

    service.approve_review(&moderator(), ids[1]).await.unwrap();
    service.approve_review(&moderator(), ids[2]).await.unwrap();
    let stored = products.get_by_id(product.id).await.unwrap().unwrap();
    assert_eq!((stored.rating, stored.num_reviews), (3.0, 2));

    service.approve_review(&moderator(), ids[0]).await.unwrap();
    let stored = products.get_by_id(product.id).await.unwrap().unwrap();
    assert_eq!((stored.rating, stored.num_reviews), (3.7, 3));

    service.delete_review(&moderator(), ids[2]).await.unwrap();
    let stored = products.get_by_id(product.id).await.unwrap().unwrap();
    assert_eq!((stored.rating, stored.num_reviews), (4.5, 2));
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_unique_index_rejects_duplicate_reviewer() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("unique_reviewer_mongo");
    let db = mongo.database(&builder.database_name());

    let reviews = MongoReviewRepository::new(&db);
    reviews.init_indexes().await.unwrap();

    let product_id = builder.id();
    let email = builder.email("dup");
    reviews
        .create(Review::new(review_input(product_id, email.clone(), 4)))
        .await
        .unwrap();

    // Bypasses the service pre-check, as a racing request would
    let result = reviews
        .create(Review::new(review_input(product_id, email, 2)))
        .await;
    assert!(matches!(result, Err(ReviewError::DuplicateReview { .. })));
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_aggregate_write_never_creates_product() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("no_upsert_mongo");
    let db = mongo.database(&builder.database_name());

    let products = Arc::new(MongoProductRepository::new(&db));
    let aggregator = RatingAggregator::new(
        Arc::new(MongoReviewRepository::new(&db)),
        Arc::new(RepositoryCatalog::new(products.clone())),
    );

    let missing = builder.id();
    assert_eq!(aggregator.recompute(missing).await.unwrap(), None);
    assert!(!products.exists(missing).await.unwrap());
    assert!(products.ids().await.unwrap().is_empty());
}
