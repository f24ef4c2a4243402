use axum_helpers::PaginationMeta;
use chrono::{DateTime, Utc};
use database::mongodb::uuid_as_string;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Where a message is in the support workflow
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
pub enum MessageStatus {
    #[default]
    New,
    Read,
    Replied,
    Archived,
}

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
pub enum MessagePriority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

/// Contact-form message as stored in MongoDB
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Message {
    #[serde(rename = "_id", alias = "id", with = "uuid_as_string")]
    pub id: Uuid,
    pub name: String,
    /// Trimmed and lowercased
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub status: MessageStatus,
    pub priority: MessagePriority,
    /// Internal notes, usually written when replying
    #[serde(default)]
    pub notes: Option<String>,
    /// First time the message was marked replied
    #[serde(default)]
    pub replied_at: Option<DateTime<Utc>>,
    /// First time the message was archived
    #[serde(default)]
    pub archived_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Message {
    /// New messages always start as `new`; the sender may only pick a priority.
    pub fn new(input: CreateMessage) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            email: input.email,
            phone: input.phone,
            subject: input.subject,
            message: input.message,
            status: MessageStatus::New,
            priority: input.priority.unwrap_or_default(),
            notes: None,
            replied_at: None,
            archived_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Moves to `status`. `replied_at` and `archived_at` keep the first time
    /// they were stamped.
    pub fn transition(
        &mut self,
        status: MessageStatus,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) {
        self.status = status;
        match status {
            MessageStatus::Replied => {
                self.replied_at.get_or_insert(now);
            }
            MessageStatus::Archived => {
                self.archived_at.get_or_insert(now);
            }
            MessageStatus::New | MessageStatus::Read => {}
        }
        if notes.is_some() {
            self.notes = notes;
        }
        self.updated_at = now;
    }
}

/// DTO for the public contact form
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateMessage {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub subject: String,
    #[validate(length(min = 1, max = 2000))]
    pub message: String,
    /// Defaults to `normal`
    pub priority: Option<MessagePriority>,
}

impl CreateMessage {
    /// Trims text fields, lowercases the email and drops a blank phone.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            phone: self
                .phone
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
            subject: self.subject.trim().to_string(),
            message: self.message.trim().to_string(),
            priority: self.priority,
        }
    }
}

/// Body of the reply endpoint; `{}` keeps the existing notes
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct ReplyMessage {
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdatePriority {
    pub priority: MessagePriority,
}

/// Query filters for listing messages
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MessageFilter {
    pub status: Option<MessageStatus>,
    pub priority: Option<MessagePriority>,
}

/// Number of messages in each status, across the whole inbox
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusCounts {
    pub new: u64,
    pub read: u64,
    pub replied: u64,
    pub archived: u64,
}

impl StatusCounts {
    pub fn add(&mut self, status: MessageStatus, count: u64) {
        let slot = match status {
            MessageStatus::New => &mut self.new,
            MessageStatus::Read => &mut self.read,
            MessageStatus::Replied => &mut self.replied,
            MessageStatus::Archived => &mut self.archived,
        };
        *slot += count;
    }
}

/// A page of messages plus the inbox-wide status counts
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessagePage {
    pub data: Vec<Message>,
    pub pagination: PaginationMeta,
    pub status_counts: StatusCounts,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn input() -> CreateMessage {
        CreateMessage {
            name: "  Ann Lee ".into(),
            email: " Ann@Example.COM".into(),
            phone: Some("   ".into()),
            subject: " Order 1042 ".into(),
            message: "Where is my parcel?".into(),
            priority: None,
        }
    }

    #[test]
    fn test_normalized_trims_and_drops_blank_phone() {
        let input = input().normalized();
        assert_eq!(input.name, "Ann Lee");
        assert_eq!(input.email, "ann@example.com");
        assert_eq!(input.phone, None);
        assert_eq!(input.subject, "Order 1042");
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_blank_subject_is_rejected() {
        let mut raw = input();
        raw.subject = "   ".into();
        let errors = raw.normalized().validate().unwrap_err();
        assert!(errors.field_errors().contains_key("subject"));
    }

    #[test]
    fn test_new_message_defaults() {
        let message = Message::new(input().normalized());
        assert_eq!(message.status, MessageStatus::New);
        assert_eq!(message.priority, MessagePriority::Normal);
        assert!(message.replied_at.is_none());
        assert!(message.archived_at.is_none());
    }

    #[test]
    fn test_transition_keeps_first_timestamps() {
        let mut message = Message::new(input().normalized());
        let first = Utc::now();
        let later = first + Duration::minutes(5);

        message.transition(MessageStatus::Replied, Some("Refunded".into()), first);
        message.transition(MessageStatus::Replied, None, later);
        assert_eq!(message.replied_at, Some(first));
        assert_eq!(message.notes.as_deref(), Some("Refunded"));

        message.transition(MessageStatus::Archived, None, later);
        assert_eq!(message.archived_at, Some(later));
        assert_eq!(message.replied_at, Some(first));
        assert_eq!(message.updated_at, later);
    }

    #[test]
    fn test_status_counts_add() {
        let mut counts = StatusCounts::default();
        counts.add(MessageStatus::New, 3);
        counts.add(MessageStatus::Archived, 1);
        counts.add(MessageStatus::New, 1);
        assert_eq!(
            counts,
            StatusCounts {
                new: 4,
                archived: 1,
                ..Default::default()
            }
        );
    }
}
