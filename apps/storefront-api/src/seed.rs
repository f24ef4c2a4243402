//! Demo data loader
//!
//! Inserts categories, products, reviews and messages from a JSON document.
//! Ratings in the database are never taken from the file: once reviews are
//! in, every product the file touched is recomputed through
//! [`RatingAggregator::recompute_many`].
//!
//! Categories and products are matched by slug and reused when they already
//! exist, and reviews already on file for a reviewer are skipped, so loading
//! the same file twice does not duplicate the catalog. Messages have no
//! natural key and are inserted every time.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use domain_messages::{CreateMessage, MessageRepository, MessageService, MessageStatus};
use domain_products::models::slugify;
use domain_products::{
    CategoryRepository, CategoryService, CreateCategory, CreateProduct, ProductError,
    ProductRepository, ProductService,
};
use domain_reviews::{
    CreateReview, RatingAggregator, RepositoryCatalog, Review, ReviewError, ReviewRepository,
    ReviewStatus,
};
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub categories: Vec<CreateCategory>,
    #[serde(default)]
    pub products: Vec<SeedProduct>,
    #[serde(default)]
    pub reviews: Vec<SeedReview>,
    #[serde(default)]
    pub messages: Vec<SeedMessage>,
}

#[derive(Debug, Deserialize)]
pub struct SeedProduct {
    /// Category slug
    pub category: Option<String>,
    #[serde(flatten)]
    pub product: CreateProduct,
}

/// A review with its moderation outcome already decided
#[derive(Debug, Deserialize)]
pub struct SeedReview {
    /// Product slug
    pub product: String,
    pub reviewer_name: String,
    pub reviewer_email: String,
    pub rating: i32,
    pub comment: String,
    #[serde(default)]
    pub status: ReviewStatus,
    #[serde(default)]
    pub helpful_count: i64,
    #[serde(default)]
    pub verified: bool,
}

#[derive(Debug, Deserialize)]
pub struct SeedMessage {
    #[serde(flatten)]
    pub message: CreateMessage,
    #[serde(default)]
    pub status: MessageStatus,
    pub notes: Option<String>,
}

/// What a seed run wrote
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub categories: usize,
    pub products: usize,
    pub reviews: usize,
    pub messages: usize,
    pub ratings_refreshed: usize,
}

pub struct Seeder<P, C, R, M>
where
    P: ProductRepository,
    C: CategoryRepository,
    R: ReviewRepository,
    M: MessageRepository,
{
    products: ProductService<P, C>,
    categories: CategoryService<C, P>,
    reviews: Arc<R>,
    aggregator: RatingAggregator<R, RepositoryCatalog<P>>,
    messages: MessageService<M>,
    message_repository: Arc<M>,
}

impl<P, C, R, M> Seeder<P, C, R, M>
where
    P: ProductRepository,
    C: CategoryRepository,
    R: ReviewRepository,
    M: MessageRepository,
{
    pub fn new(products: Arc<P>, categories: Arc<C>, reviews: Arc<R>, messages: Arc<M>) -> Self {
        Self {
            products: ProductService::new(Arc::clone(&products), Arc::clone(&categories)),
            categories: CategoryService::new(categories, Arc::clone(&products)),
            aggregator: RatingAggregator::new(
                Arc::clone(&reviews),
                Arc::new(RepositoryCatalog::new(products)),
            ),
            reviews,
            messages: MessageService::new(Arc::clone(&messages)),
            message_repository: messages,
        }
    }

    pub async fn run(&self, data: SeedData) -> eyre::Result<SeedReport> {
        let mut report = SeedReport::default();

        let mut category_ids = HashMap::new();
        for input in data.categories {
            let slug = slugify(&input.name);
            let category = match self.categories.find_category(&slug).await {
                Ok(existing) => existing,
                Err(ProductError::CategoryNotFound(_)) => {
                    report.categories += 1;
                    self.categories.create_category(input).await?
                }
                Err(e) => return Err(e.into()),
            };
            category_ids.insert(category.slug, category.id);
        }

        let mut product_ids = HashMap::new();
        for SeedProduct {
            category,
            mut product,
        } in data.products
        {
            if let Some(slug) = category {
                let id = category_ids.get(&slug).ok_or_else(|| {
                    eyre::eyre!("Unknown category '{}' for product '{}'", slug, product.name)
                })?;
                product.category_id = Some(*id);
            }

            let slug = slugify(&product.name);
            let product = match self.products.find_product(&slug).await {
                Ok(existing) => existing,
                Err(ProductError::NotFound(_)) => {
                    report.products += 1;
                    self.products.create_product(product).await?
                }
                Err(e) => return Err(e.into()),
            };
            product_ids.insert(product.slug, product.id);
        }

        let mut touched = BTreeSet::new();
        for seed in data.reviews {
            let product_id = *product_ids
                .get(&seed.product)
                .ok_or_else(|| eyre::eyre!("Unknown product '{}' for review", seed.product))?;
            touched.insert(product_id);

            if self.insert_review(product_id, seed).await? {
                report.reviews += 1;
            }
        }

        for seed in data.messages {
            let message = self.messages.create_message(seed.message).await?;
            if seed.status != MessageStatus::New {
                self.message_repository
                    .set_status(message.id, seed.status, seed.notes)
                    .await?;
            }
            report.messages += 1;
        }

        let touched: Vec<Uuid> = touched.into_iter().collect();
        report.ratings_refreshed = self.aggregator.recompute_many(&touched).await;

        info!(?report, "Seed data loaded");
        Ok(report)
    }

    /// Returns false when the reviewer already reviewed the product
    async fn insert_review(&self, product_id: Uuid, seed: SeedReview) -> eyre::Result<bool> {
        let input = CreateReview {
            product_id,
            reviewer_name: seed.reviewer_name,
            reviewer_email: seed.reviewer_email,
            rating: seed.rating,
            comment: seed.comment,
        }
        .normalized();
        input.validate()?;

        let mut review = Review::new(input);
        review.status = seed.status;
        review.helpful_count = seed.helpful_count;
        review.verified = seed.verified;

        match self.reviews.create(review).await {
            Ok(_) => Ok(true),
            Err(ReviewError::DuplicateReview { email, .. }) => {
                debug!(%product_id, %email, "Review already seeded");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_messages::{InMemoryMessageRepository, MessageFilter};
    use domain_products::{InMemoryCategoryRepository, InMemoryProductRepository};
    use domain_reviews::InMemoryReviewRepository;
    use serde_json::json;

    struct Fixture {
        products: Arc<InMemoryProductRepository>,
        categories: Arc<InMemoryCategoryRepository>,
        messages: Arc<InMemoryMessageRepository>,
        seeder: Seeder<
            InMemoryProductRepository,
            InMemoryCategoryRepository,
            InMemoryReviewRepository,
            InMemoryMessageRepository,
        >,
    }

    fn fixture() -> Fixture {
        let products = Arc::new(InMemoryProductRepository::new());
        let categories = Arc::new(InMemoryCategoryRepository::new());
        let reviews = Arc::new(InMemoryReviewRepository::new());
        let messages = Arc::new(InMemoryMessageRepository::new());
        Fixture {
            seeder: Seeder::new(
                Arc::clone(&products),
                Arc::clone(&categories),
                reviews,
                Arc::clone(&messages),
            ),
            products,
            categories,
            messages,
        }
    }

    fn data() -> SeedData {
        serde_json::from_value(json!({
            "categories": [{ "name": "Robot Cleaners" }],
            "products": [
                {
                    "name": "RoboClean Pro X1",
                    "description": "Robotic vacuum",
                    "price": 59999,
                    "category": "robot-cleaners",
                    "rating": 4.8
                },
                { "name": "ChefBot Deluxe", "description": "Cooking robot", "price": 129999 }
            ],
            "reviews": [
                { "product": "roboclean-pro-x1", "reviewer_name": "Sarah", "reviewer_email": "sarah@example.com",
                  "rating": 5, "comment": "Amazing", "status": "approved", "helpful_count": 45, "verified": true },
                { "product": "roboclean-pro-x1", "reviewer_name": "Mike", "reviewer_email": "mike@example.com",
                  "rating": 4, "comment": "Good", "status": "approved" },
                { "product": "roboclean-pro-x1", "reviewer_name": "Troll", "reviewer_email": "troll@example.com",
                  "rating": 1, "comment": "Bad", "status": "pending" }
            ],
            "messages": [
                { "name": "John", "email": "john@example.com", "subject": "Bulk order",
                  "message": "Do you ship to Canada?", "status": "replied", "notes": "Sent quote" },
                { "name": "Jane", "email": "jane@example.com", "subject": "Hello", "message": "Hi" }
            ]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_ratings_come_from_approved_reviews_only() {
        let fx = fixture();
        let report = fx.seeder.run(data()).await.unwrap();

        assert_eq!(
            report,
            SeedReport {
                categories: 1,
                products: 2,
                reviews: 3,
                messages: 2,
                ratings_refreshed: 1,
            }
        );

        let product = fx
            .products
            .get_by_slug("roboclean-pro-x1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(product.rating, 4.5);
        assert_eq!(product.num_reviews, 2);

        let untouched = fx
            .products
            .get_by_slug("chefbot-deluxe")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(untouched.rating, 0.0);
        assert_eq!(untouched.num_reviews, 0);
    }

    #[tokio::test]
    async fn test_products_link_to_seeded_categories() {
        let fx = fixture();
        fx.seeder.run(data()).await.unwrap();

        let category = fx
            .categories
            .get_by_slug("robot-cleaners")
            .await
            .unwrap()
            .unwrap();
        let product = fx
            .products
            .get_by_slug("roboclean-pro-x1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(product.category_id, Some(category.id));
    }

    #[tokio::test]
    async fn test_messages_keep_seeded_status() {
        let fx = fixture();
        fx.seeder.run(data()).await.unwrap();

        let replied = fx
            .messages
            .count(&MessageFilter {
                status: Some(MessageStatus::Replied),
                priority: None,
            })
            .await
            .unwrap();
        assert_eq!(replied, 1);
        assert_eq!(fx.messages.status_counts().await.unwrap().new, 1);
    }

    #[tokio::test]
    async fn test_second_run_reuses_catalog() {
        let fx = fixture();
        fx.seeder.run(data()).await.unwrap();
        let again = fx.seeder.run(data()).await.unwrap();

        assert_eq!(again.categories, 0);
        assert_eq!(again.products, 0);
        assert_eq!(again.reviews, 0);
        assert_eq!(again.ratings_refreshed, 1);

        let product = fx
            .products
            .get_by_slug("roboclean-pro-x1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(product.num_reviews, 2);
    }

    #[tokio::test]
    async fn test_bundled_demo_file_loads() {
        let fx = fixture();
        let data: SeedData = serde_json::from_str(include_str!("../seed/demo.json")).unwrap();

        let report = fx.seeder.run(data).await.unwrap();
        assert_eq!(report.ratings_refreshed, 4);

        let pending_only = fx
            .products
            .get_by_slug("roboclean-mini")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(pending_only.num_reviews, 0);
        assert_eq!(pending_only.rating, 0.0);
    }

    #[tokio::test]
    async fn test_unknown_product_reference_fails() {
        let fx = fixture();
        let mut data = data();
        data.reviews[0].product = "no-such-robot".into();

        assert!(fx.seeder.run(data).await.is_err());
    }
}
