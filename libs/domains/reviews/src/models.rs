use chrono::{DateTime, Utc};
use database::mongodb::uuid_as_string;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Moderation state of a review
///
/// Reviews start `pending`. Moderators move them to `approved` or `rejected`
/// and back and forth between those two; nothing returns to `pending`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReviewStatus {
    #[default]
    Pending,
    /// Visible to the public and counted in the product rating
    Approved,
    Rejected,
}

/// Review entity as stored in MongoDB
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Review {
    #[serde(rename = "_id", alias = "id", with = "uuid_as_string")]
    pub id: Uuid,
    #[serde(with = "uuid_as_string")]
    pub product_id: Uuid,
    pub reviewer_name: String,
    /// Trimmed and lowercased
    pub reviewer_email: String,
    /// 1 to 5 stars
    pub rating: i32,
    pub comment: String,
    pub status: ReviewStatus,
    #[serde(default)]
    pub helpful_count: i64,
    /// Reviewer bought the product
    #[serde(default)]
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for submitting a review
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateReview {
    pub product_id: Uuid,
    #[validate(length(min = 1, max = 100))]
    pub reviewer_name: String,
    #[validate(email)]
    pub reviewer_email: String,
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    #[validate(length(min = 1, max = 1000))]
    pub comment: String,
}

impl CreateReview {
    /// Trims text fields and lowercases the email so uniqueness is per person, not per spelling.
    pub fn normalized(self) -> Self {
        Self {
            product_id: self.product_id,
            reviewer_name: self.reviewer_name.trim().to_string(),
            reviewer_email: self.reviewer_email.trim().to_lowercase(),
            rating: self.rating,
            comment: self.comment.trim().to_string(),
        }
    }
}

/// Query filters for listing reviews
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReviewFilter {
    pub product_id: Option<Uuid>,
    /// Ignored for non-moderators, who only ever see approved reviews
    pub status: Option<ReviewStatus>,
    pub rating: Option<i32>,
    pub verified: Option<bool>,
}

impl ReviewFilter {
    pub fn approved_for(product_id: Uuid) -> Self {
        Self {
            product_id: Some(product_id),
            status: Some(ReviewStatus::Approved),
            ..Default::default()
        }
    }
}

/// Sum and count of approved ratings for one product
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RatingTotals {
    pub sum: i64,
    pub count: i64,
}

/// Rating summary cached on the product record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RatingAggregate {
    /// Mean of approved ratings, one decimal, 0 when there are none
    pub rating: f64,
    pub num_reviews: i64,
}

impl RatingAggregate {
    pub const EMPTY: Self = Self {
        rating: 0.0,
        num_reviews: 0,
    };

    /// The only place the displayed rating is computed.
    ///
    /// Rounds the mean half-up to one decimal in integer arithmetic, so
    /// midpoints such as 3.65 never depend on float representation.
    ///
    /// ```
    /// use domain_reviews::RatingAggregate;
    ///
    /// assert_eq!(RatingAggregate::from_totals(11, 3).rating, 3.7);
    /// assert_eq!(RatingAggregate::from_totals(0, 0), RatingAggregate::EMPTY);
    /// ```
    pub fn from_totals(sum: i64, count: i64) -> Self {
        if count <= 0 {
            return Self::EMPTY;
        }
        let tenths = (sum * 20 + count) / (2 * count);
        Self {
            rating: tenths as f64 / 10.0,
            num_reviews: count,
        }
    }
}

impl From<RatingTotals> for RatingAggregate {
    fn from(totals: RatingTotals) -> Self {
        Self::from_totals(totals.sum, totals.count)
    }
}

impl Review {
    /// New reviews are always pending; callers cannot choose the status.
    pub fn new(input: CreateReview) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            product_id: input.product_id,
            reviewer_name: input.reviewer_name,
            reviewer_email: input.reviewer_email,
            rating: input.rating,
            comment: input.comment,
            status: ReviewStatus::Pending,
            helpful_count: 0,
            verified: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_approved(&self) -> bool {
        self.status == ReviewStatus::Approved
    }
}
