// Event catalog DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{FestError, Result};

/// Whether students register alone or as a team.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Individual,
    Team,
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventType::Individual => write!(f, "individual"),
            EventType::Team => write!(f, "team"),
        }
    }
}

impl EventType {
    /// Strict parse for values read back from storage. A row carrying an
    /// unknown event type is corrupt and gets skipped by listings.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "individual" => Some(EventType::Individual),
            "team" => Some(EventType::Team),
            _ => None,
        }
    }
}

/// Rulebook attachment reference; the bytes live in file storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct Rulebook {
    pub file_id: Uuid,
    pub filename: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Event {
    /// Deterministic slug of sub_fest + name, see [`crate::fest::event_id`].
    pub id: String,
    pub name: String,
    pub description: String,
    pub sub_fest: String,
    pub event_type: EventType,
    pub coordinators: Vec<String>,
    pub timing: String,
    pub venue: String,
    pub registration_deadline: DateTime<Utc>,
    pub capacity: i32,
    pub registered_count: i32,
    pub is_active: bool,
    /// Manual override; closes registration regardless of the deadline.
    pub is_registration_open: bool,
    pub min_team_size: i32,
    pub max_team_size: i32,
    pub max_events_per_student: i32,
    /// Named sub-events students may pick from at registration time.
    #[serde(default)]
    pub sub_events: Vec<String>,
    #[serde(default)]
    pub rulebooks: Vec<Rulebook>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateEventRequest {
    pub name: String,
    pub description: String,
    pub sub_fest: String,
    pub event_type: EventType,
    #[serde(default)]
    pub coordinators: Vec<String>,
    pub timing: String,
    pub venue: String,
    pub registration_deadline: DateTime<Utc>,
    pub capacity: i32,
    #[serde(default = "default_team_size")]
    pub min_team_size: i32,
    #[serde(default = "default_team_size")]
    pub max_team_size: i32,
    #[serde(default = "default_max_events")]
    pub max_events_per_student: i32,
    #[serde(default)]
    pub sub_events: Vec<String>,
}

fn default_team_size() -> i32 {
    1
}

fn default_max_events() -> i32 {
    3
}

impl CreateEventRequest {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(FestError::validation("event name must not be empty"));
        }
        if self.sub_fest.trim().is_empty() {
            return Err(FestError::validation("sub_fest must not be empty"));
        }
        if self.capacity < 0 {
            return Err(FestError::validation("capacity must not be negative"));
        }
        if self.min_team_size < 1 {
            return Err(FestError::validation("min_team_size must be at least 1"));
        }
        if self.max_team_size < self.min_team_size {
            return Err(FestError::validation(
                "max_team_size must not be smaller than min_team_size",
            ));
        }
        Ok(())
    }
}

/// Partial patch; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateEventRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub coordinators: Option<Vec<String>>,
    #[serde(default)]
    pub timing: Option<String>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub registration_deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub capacity: Option<i32>,
    #[serde(default)]
    pub is_registration_open: Option<bool>,
    #[serde(default)]
    pub min_team_size: Option<i32>,
    #[serde(default)]
    pub max_team_size: Option<i32>,
    #[serde(default)]
    pub max_events_per_student: Option<i32>,
    #[serde(default)]
    pub sub_events: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fest;

    fn request() -> CreateEventRequest {
        CreateEventRequest {
            name: "Robo Race".to_string(),
            description: "Line-follower race".to_string(),
            sub_fest: fest::TECHNOLOGY.to_string(),
            event_type: EventType::Team,
            coordinators: vec!["R. Iyer".to_string()],
            timing: "10:00".to_string(),
            venue: "Lab 2".to_string(),
            registration_deadline: Utc::now(),
            capacity: 40,
            min_team_size: 2,
            max_team_size: 4,
            max_events_per_student: 3,
            sub_events: vec![],
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_team_size_bounds_checked() {
        let mut req = request();
        req.min_team_size = 0;
        assert!(req.validate().is_err());

        let mut req = request();
        req.max_team_size = 1;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_event_type_parse_is_strict() {
        assert_eq!(EventType::parse("team"), Some(EventType::Team));
        assert_eq!(EventType::parse("individual"), Some(EventType::Individual));
        assert_eq!(EventType::parse("TEAM"), None);
        assert_eq!(EventType::parse("solo"), None);
    }

    #[test]
    fn test_request_defaults() {
        let json = r#"{
            "name": "Quiz",
            "description": "General quiz",
            "sub_fest": "CULTURAL-AKANKSHA",
            "event_type": "individual",
            "timing": "14:00",
            "venue": "Hall A",
            "registration_deadline": "2026-02-01T10:00:00Z",
            "capacity": 100
        }"#;
        let req: CreateEventRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.min_team_size, 1);
        assert_eq!(req.max_team_size, 1);
        assert_eq!(req.max_events_per_student, 3);
        assert!(req.coordinators.is_empty());
        assert!(req.sub_events.is_empty());
    }
}
