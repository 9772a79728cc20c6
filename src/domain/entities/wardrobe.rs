use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct WardrobeItem {
    pub id: Uuid,
    pub user_id: String,
    pub item_type: String,
    pub color: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct WardrobeItemInsert {
    pub user_id: String,
    pub item_type: String,
    pub color: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

// ───── API Request Models ───────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct NewWardrobeItem {
    #[serde(rename = "userId", default)]
    #[validate(length(min = 1, max = 128, message = "userId is required"))]
    pub user_id: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 50, message = "item_type is required (max 50 characters)"))]
    pub item_type: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 50, message = "color is required (max 50 characters)"))]
    pub color: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 500, message = "description is required (max 500 characters)"))]
    pub description: String,
}

impl NewWardrobeItem {
    pub fn prepare_for_insert(self) -> WardrobeItemInsert {
        WardrobeItemInsert {
            user_id: self.user_id.trim().to_string(),
            item_type: self.item_type.trim().to_lowercase(),
            color: self.color.trim().to_string(),
            description: self.description.trim().to_string(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct WardrobeQuery {
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteWardrobeItem {
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteWardrobeResponse {
    pub success: bool,
}

impl WardrobeItem {
    /// Short phrase used when describing the wardrobe to the stylist model.
    pub fn summary(&self) -> String {
        format!("{} {} ({})", self.color, self.item_type, self.description)
    }
}
