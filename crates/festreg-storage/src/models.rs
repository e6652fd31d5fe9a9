// Database models (internal, may differ from public DTOs)
//
// Row-to-domain conversions live here so legacy defaulting happens in one
// place: malformed JSON payload columns default with a logged warning,
// while a row whose event type cannot be parsed fails conversion and is
// skipped by listing callers.

use anyhow::bail;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use festreg_core::{
    Event, EventType, GalleryImage, Notification, Registration, Role, Rulebook, Shortlist,
    ShortlistSummary, TeamMember, User,
};

// ============================================
// Users
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub roll_number: String,
    pub department: String,
    pub year: i32,
    pub mobile_number: String,
    pub role: String,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            email: row.email,
            full_name: row.full_name,
            roll_number: row.roll_number,
            department: row.department,
            year: row.year,
            mobile_number: row.mobile_number,
            role: Role::from(row.role.as_str()),
            verified: row.verified,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub roll_number: String,
    pub department: String,
    pub year: i32,
    pub mobile_number: String,
    pub role: String,
    pub verified: bool,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateProfile {
    pub full_name: Option<String>,
    pub department: Option<String>,
    pub year: Option<i32>,
    pub mobile_number: Option<String>,
}

// ============================================
// Events
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub sub_fest: String,
    pub event_type: String,
    pub coordinators: Vec<String>,
    pub timing: String,
    pub venue: String,
    pub registration_deadline: DateTime<Utc>,
    pub capacity: i32,
    pub registered_count: i32,
    pub is_active: bool,
    pub is_registration_open: bool,
    pub min_team_size: i32,
    pub max_team_size: i32,
    pub max_events_per_student: i32,
    pub sub_events: Vec<String>,
    pub rulebooks: sqlx::types::JsonValue,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<EventRow> for Event {
    type Error = anyhow::Error;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let Some(event_type) = EventType::parse(&row.event_type) else {
            bail!("event {} has unknown event_type {:?}", row.id, row.event_type);
        };

        let rulebooks: Vec<Rulebook> = match serde_json::from_value(row.rulebooks) {
            Ok(rulebooks) => rulebooks,
            Err(err) => {
                tracing::warn!(
                    event_id = %row.id,
                    %err,
                    "malformed rulebooks column, defaulting to empty"
                );
                Vec::new()
            }
        };

        Ok(Event {
            id: row.id,
            name: row.name,
            description: row.description,
            sub_fest: row.sub_fest,
            event_type,
            coordinators: row.coordinators,
            timing: row.timing,
            venue: row.venue,
            registration_deadline: row.registration_deadline,
            capacity: row.capacity,
            registered_count: row.registered_count,
            is_active: row.is_active,
            is_registration_open: row.is_registration_open,
            min_team_size: row.min_team_size,
            max_team_size: row.max_team_size,
            max_events_per_student: row.max_events_per_student,
            sub_events: row.sub_events,
            rulebooks,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CreateEvent {
    pub id: String,
    pub name: String,
    pub description: String,
    pub sub_fest: String,
    pub event_type: String,
    pub coordinators: Vec<String>,
    pub timing: String,
    pub venue: String,
    pub registration_deadline: DateTime<Utc>,
    pub capacity: i32,
    pub min_team_size: i32,
    pub max_team_size: i32,
    pub max_events_per_student: i32,
    pub sub_events: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateEvent {
    pub name: Option<String>,
    pub description: Option<String>,
    pub coordinators: Option<Vec<String>>,
    pub timing: Option<String>,
    pub venue: Option<String>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub capacity: Option<i32>,
    pub is_registration_open: Option<bool>,
    pub min_team_size: Option<i32>,
    pub max_team_size: Option<i32>,
    pub max_events_per_student: Option<i32>,
    pub sub_events: Option<Vec<String>>,
}

// ============================================
// Registrations
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct RegistrationRow {
    pub id: Uuid,
    pub event_id: String,
    pub student_email: String,
    pub full_name: String,
    pub roll_number: String,
    pub department: String,
    pub year: i32,
    pub mobile_number: String,
    pub team_members: Option<sqlx::types::JsonValue>,
    pub selected_sub_events: Option<Vec<String>>,
    pub registered_at: DateTime<Utc>,
    pub event_name: String,
    pub sub_fest: String,
}

impl From<RegistrationRow> for Registration {
    fn from(row: RegistrationRow) -> Self {
        let team_members: Option<Vec<TeamMember>> = match row.team_members {
            Some(value) => match serde_json::from_value(value) {
                Ok(members) => Some(members),
                Err(err) => {
                    tracing::warn!(
                        registration_id = %row.id,
                        %err,
                        "malformed team_members column, defaulting to none"
                    );
                    None
                }
            },
            None => None,
        };

        Registration {
            id: row.id,
            event_id: row.event_id,
            student_email: row.student_email,
            full_name: row.full_name,
            roll_number: row.roll_number,
            department: row.department,
            year: row.year,
            mobile_number: row.mobile_number,
            team_members,
            selected_sub_events: row.selected_sub_events,
            registered_at: row.registered_at,
            event_name: row.event_name,
            sub_fest: row.sub_fest,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateRegistration {
    pub event_id: String,
    pub student_email: String,
    pub full_name: String,
    pub roll_number: String,
    pub department: String,
    pub year: i32,
    pub mobile_number: String,
    pub team_members: Option<serde_json::Value>,
    pub selected_sub_events: Option<Vec<String>>,
    pub event_name: String,
    pub sub_fest: String,
}

// ============================================
// Notifications / gallery
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct NotificationRow {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<NotificationRow> for Notification {
    fn from(row: NotificationRow) -> Self {
        Notification {
            id: row.id,
            title: row.title,
            message: row.message,
            image_url: row.image_url,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct GalleryImageRow {
    pub id: Uuid,
    pub sub_fest: String,
    pub image_url: String,
    pub caption: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

impl From<GalleryImageRow> for GalleryImage {
    fn from(row: GalleryImageRow) -> Self {
        GalleryImage {
            id: row.id,
            sub_fest: row.sub_fest,
            image_url: row.image_url,
            caption: row.caption,
            uploaded_at: row.uploaded_at,
        }
    }
}

// ============================================
// Shortlists
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct ShortlistRow {
    pub id: Uuid,
    pub name: String,
    pub entries: sqlx::types::JsonValue,
    pub uploaded_at: DateTime<Utc>,
}

impl From<ShortlistRow> for Shortlist {
    fn from(row: ShortlistRow) -> Self {
        let entries = match row.entries {
            serde_json::Value::Array(entries) => entries,
            other => {
                tracing::warn!(
                    shortlist_id = %row.id,
                    "entries column is not an array ({}), defaulting to empty",
                    other
                );
                Vec::new()
            }
        };
        Shortlist {
            id: row.id,
            name: row.name,
            uploaded_at: row.uploaded_at,
            entries,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ShortlistSummaryRow {
    pub id: Uuid,
    pub name: String,
    pub uploaded_at: DateTime<Utc>,
    pub entry_count: i64,
}

impl From<ShortlistSummaryRow> for ShortlistSummary {
    fn from(row: ShortlistSummaryRow) -> Self {
        ShortlistSummary {
            id: row.id,
            name: row.name,
            uploaded_at: row.uploaded_at,
            entry_count: row.entry_count,
        }
    }
}

// ============================================
// Stored files
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct FileRow {
    pub id: Uuid,
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
    pub uploaded_at: DateTime<Utc>,
}

/// File metadata without the payload, for inserts and listings.
#[derive(Debug, Clone, FromRow)]
pub struct FileMetaRow {
    pub id: Uuid,
    pub filename: String,
    pub content_type: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateFile {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

// ============================================
// Password resets
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct PasswordResetRow {
    pub id: Uuid,
    pub user_email: String,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event_row() -> EventRow {
        EventRow {
            id: "cultural-akanksha-solo-dance".to_string(),
            name: "Solo Dance".to_string(),
            description: String::new(),
            sub_fest: "CULTURAL-AKANKSHA".to_string(),
            event_type: "individual".to_string(),
            coordinators: vec![],
            timing: "10:00".to_string(),
            venue: "Hall A".to_string(),
            registration_deadline: Utc::now(),
            capacity: 100,
            registered_count: 3,
            is_active: true,
            is_registration_open: true,
            min_team_size: 1,
            max_team_size: 1,
            max_events_per_student: 3,
            sub_events: vec![],
            rulebooks: json!([]),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_event_row_converts() {
        let event = Event::try_from(event_row()).unwrap();
        assert_eq!(event.event_type, EventType::Individual);
        assert!(event.rulebooks.is_empty());
    }

    #[test]
    fn test_event_row_with_unknown_type_is_rejected() {
        let mut row = event_row();
        row.event_type = "pairs".to_string();
        assert!(Event::try_from(row).is_err());
    }

    #[test]
    fn test_malformed_rulebooks_default_to_empty() {
        let mut row = event_row();
        row.rulebooks = json!({"not": "an array"});
        let event = Event::try_from(row).unwrap();
        assert!(event.rulebooks.is_empty());
    }

    #[test]
    fn test_rulebooks_parse() {
        let mut row = event_row();
        let file_id = Uuid::now_v7();
        row.rulebooks = json!([{"file_id": file_id, "filename": "rules.pdf"}]);
        let event = Event::try_from(row).unwrap();
        assert_eq!(event.rulebooks.len(), 1);
        assert_eq!(event.rulebooks[0].file_id, file_id);
    }

    #[test]
    fn test_malformed_team_members_default_to_none() {
        let row = RegistrationRow {
            id: Uuid::now_v7(),
            event_id: "x".to_string(),
            student_email: "a@b.co".to_string(),
            full_name: "A".to_string(),
            roll_number: "R1".to_string(),
            department: "CSE".to_string(),
            year: 1,
            mobile_number: "9876543210".to_string(),
            team_members: Some(json!("not a list")),
            selected_sub_events: None,
            registered_at: Utc::now(),
            event_name: "X".to_string(),
            sub_fest: "CULTURAL-AKANKSHA".to_string(),
        };
        let registration = Registration::from(row);
        assert!(registration.team_members.is_none());
    }
}
