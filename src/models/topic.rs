// src/models/topic.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A topic pool the question bank and exam generation draw from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub id: i64,
    pub name: String,
    /// Parent subject (e.g. "Chemistry"); display-only.
    pub subject: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for creating a topic.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTopicRequest {
    #[validate(length(min = 1, max = 200, message = "Topic name must be between 1 and 200 characters."))]
    pub name: String,
    #[validate(length(max = 200))]
    pub subject: Option<String>,
}
