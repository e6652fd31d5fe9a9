// Notification, gallery, and shortlist DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{FestError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateNotificationRequest {
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl CreateNotificationRequest {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(FestError::validation("title must not be empty"));
        }
        if self.message.trim().is_empty() {
            return Err(FestError::validation("message must not be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GalleryImage {
    pub id: Uuid,
    pub sub_fest: String,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateGalleryImageRequest {
    pub sub_fest: String,
    pub image_url: String,
    #[serde(default)]
    pub caption: Option<String>,
}

impl CreateGalleryImageRequest {
    pub fn validate(&self) -> Result<()> {
        if self.sub_fest.trim().is_empty() {
            return Err(FestError::validation("sub_fest must not be empty"));
        }
        if self.image_url.trim().is_empty() {
            return Err(FestError::validation("image_url must not be empty"));
        }
        Ok(())
    }
}

/// One uploaded shortlist batch. Entries are the spreadsheet rows as
/// column-name → value objects, stored verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Shortlist {
    pub id: Uuid,
    pub name: String,
    pub uploaded_at: DateTime<Utc>,
    #[schema(value_type = Vec<Object>)]
    pub entries: Vec<serde_json::Value>,
}

/// Batch listing row; entries stay behind the detail endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShortlistSummary {
    pub id: Uuid,
    pub name: String,
    pub uploaded_at: DateTime<Utc>,
    pub entry_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_requires_title_and_message() {
        let ok = CreateNotificationRequest {
            title: "Schedule change".to_string(),
            message: "Finals moved to 5pm".to_string(),
            image_url: None,
        };
        assert!(ok.validate().is_ok());

        let no_title = CreateNotificationRequest {
            title: "  ".to_string(),
            message: "x".to_string(),
            image_url: None,
        };
        assert!(no_title.validate().is_err());
    }

    #[test]
    fn test_gallery_image_requires_url() {
        let bad = CreateGalleryImageRequest {
            sub_fest: "CULTURAL-AKANKSHA".to_string(),
            image_url: String::new(),
            caption: None,
        };
        assert!(bad.validate().is_err());
    }
}
