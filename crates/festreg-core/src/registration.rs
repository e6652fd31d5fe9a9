// Registration DTOs and the eligibility rule chain

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{FestError, Result};
use crate::event::{Event, EventType};
use crate::fest;
use crate::user::{validate_email, validate_mobile, validate_year};

/// Team member identity record; same field shape as a user profile.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TeamMember {
    pub full_name: String,
    pub email: String,
    pub roll_number: String,
    pub department: String,
    pub year: i32,
    pub mobile_number: String,
}

impl TeamMember {
    pub fn validate(&self) -> Result<()> {
        if self.full_name.trim().is_empty() {
            return Err(FestError::validation(
                "team member full name must not be empty",
            ));
        }
        if self.roll_number.trim().is_empty() {
            return Err(FestError::validation(
                "team member roll number must not be empty",
            ));
        }
        validate_email(&self.email)?;
        validate_year(self.year)?;
        validate_mobile(&self.mobile_number)?;
        Ok(())
    }
}

/// Registration row as exposed by the API. Carries a denormalized snapshot
/// of the registrant's profile taken at registration time, plus the event
/// name and sub-fest so listings and exports need no joins.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Registration {
    pub id: Uuid,
    pub event_id: String,
    pub student_email: String,
    pub full_name: String,
    pub roll_number: String,
    pub department: String,
    pub year: i32,
    pub mobile_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_members: Option<Vec<TeamMember>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_sub_events: Option<Vec<String>>,
    pub registered_at: DateTime<Utc>,
    pub event_name: String,
    pub sub_fest: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateRegistrationRequest {
    pub event_id: String,
    #[serde(default)]
    pub team_members: Option<Vec<TeamMember>>,
    #[serde(default)]
    pub selected_sub_events: Option<Vec<String>>,
}

/// Facts gathered from storage before the rule chain runs. Event
/// resolution itself (the `NotFound` case) happens while fetching these.
#[derive(Debug)]
pub struct EligibilityFacts<'a> {
    pub event: &'a Event,
    pub now: DateTime<Utc>,
    /// A registration for (event, caller) already exists.
    pub already_registered: bool,
    /// Caller's registration count within this event's sub-fest.
    pub sub_fest_registrations: i64,
}

/// The registration eligibility chain. Checks run in a fixed order and
/// short-circuit at the first failure:
///
/// 1. closed gate (manual override or past deadline)
/// 2. duplicate registration
/// 3. per-sub-fest quota
/// 4. team membership rules (team events only)
/// 5. selected sub-events must exist on the event
pub fn check_eligibility(
    facts: &EligibilityFacts<'_>,
    team_members: Option<&[TeamMember]>,
    selected_sub_events: Option<&[String]>,
) -> Result<()> {
    let event = facts.event;

    if !event.is_registration_open || facts.now > event.registration_deadline {
        return Err(FestError::RegistrationClosed);
    }

    if facts.already_registered {
        return Err(FestError::AlreadyRegistered);
    }

    let quota = fest::quota_for(&event.sub_fest);
    if facts.sub_fest_registrations >= i64::from(quota) {
        return Err(FestError::QuotaExceeded {
            quota,
            sub_fest: event.sub_fest.clone(),
        });
    }

    match event.event_type {
        EventType::Team => check_team_members(event, team_members)?,
        EventType::Individual => {
            if team_members.is_some_and(|members| !members.is_empty()) {
                return Err(FestError::validation(
                    "team members are only accepted for team events",
                ));
            }
        }
    }

    if let Some(selected) = selected_sub_events {
        for name in selected {
            if !event.sub_events.iter().any(|s| s == name) {
                return Err(FestError::validation(format!("unknown sub-event: {name}")));
            }
        }
    }

    Ok(())
}

fn check_team_members(event: &Event, team_members: Option<&[TeamMember]>) -> Result<()> {
    let members = match team_members {
        Some(members) if !members.is_empty() => members,
        _ => return Err(FestError::TeamMembersRequired),
    };

    let size = members.len() as i32;
    if size < event.min_team_size || size > event.max_team_size {
        return Err(FestError::InvalidTeamSize {
            min: event.min_team_size,
            max: event.max_team_size,
        });
    }

    let mut seen = HashSet::new();
    for member in members {
        if !seen.insert(member.email.to_ascii_lowercase()) {
            return Err(FestError::DuplicateTeamMember);
        }
    }

    for member in members {
        member.validate()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn event(sub_fest: &str, event_type: EventType) -> Event {
        Event {
            id: fest::event_id(sub_fest, "Test Event"),
            name: "Test Event".to_string(),
            description: String::new(),
            sub_fest: sub_fest.to_string(),
            event_type,
            coordinators: vec![],
            timing: "10:00".to_string(),
            venue: "Main Hall".to_string(),
            registration_deadline: Utc::now() + Duration::days(7),
            capacity: 100,
            registered_count: 0,
            is_active: true,
            is_registration_open: true,
            min_team_size: 3,
            max_team_size: 4,
            max_events_per_student: 3,
            sub_events: vec!["solo".to_string(), "duet".to_string()],
            rulebooks: vec![],
            created_at: Utc::now(),
        }
    }

    fn member(email: &str) -> TeamMember {
        TeamMember {
            full_name: "Member".to_string(),
            email: email.to_string(),
            roll_number: "R-001".to_string(),
            department: "CSE".to_string(),
            year: 2,
            mobile_number: "9876543210".to_string(),
        }
    }

    fn facts(event: &Event) -> EligibilityFacts<'_> {
        EligibilityFacts {
            event,
            now: Utc::now(),
            already_registered: false,
            sub_fest_registrations: 0,
        }
    }

    #[test]
    fn test_individual_registration_accepted() {
        let event = event(fest::CULTURAL, EventType::Individual);
        assert!(check_eligibility(&facts(&event), None, None).is_ok());
    }

    #[test]
    fn test_closed_flag_rejects() {
        let mut event = event(fest::CULTURAL, EventType::Individual);
        event.is_registration_open = false;
        assert!(matches!(
            check_eligibility(&facts(&event), None, None),
            Err(FestError::RegistrationClosed)
        ));
    }

    #[test]
    fn test_past_deadline_rejects_as_closed() {
        let mut event = event(fest::CULTURAL, EventType::Individual);
        event.registration_deadline = Utc::now() - Duration::hours(1);
        assert!(matches!(
            check_eligibility(&facts(&event), None, None),
            Err(FestError::RegistrationClosed)
        ));
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let event = event(fest::CULTURAL, EventType::Individual);
        let mut facts = facts(&event);
        facts.already_registered = true;
        assert!(matches!(
            check_eligibility(&facts, None, None),
            Err(FestError::AlreadyRegistered)
        ));
    }

    #[test]
    fn test_quota_exceeded_at_limit() {
        let event = event(fest::CULTURAL, EventType::Individual);
        let mut facts = facts(&event);
        facts.sub_fest_registrations = 2;
        match check_eligibility(&facts, None, None) {
            Err(FestError::QuotaExceeded { quota, sub_fest }) => {
                assert_eq!(quota, 2);
                assert_eq!(sub_fest, fest::CULTURAL);
            }
            other => panic!("expected QuotaExceeded, got {other:?}"),
        }
    }

    #[test]
    fn test_below_quota_accepted() {
        let event = event(fest::SPORTS, EventType::Individual);
        let mut facts = facts(&event);
        // Sports quota is 4; a third registration is still fine.
        facts.sub_fest_registrations = 2;
        assert!(check_eligibility(&facts, None, None).is_ok());
    }

    #[test]
    fn test_team_members_required() {
        let event = event(fest::TECHNOLOGY, EventType::Team);
        assert!(matches!(
            check_eligibility(&facts(&event), None, None),
            Err(FestError::TeamMembersRequired)
        ));
        assert!(matches!(
            check_eligibility(&facts(&event), Some(&[]), None),
            Err(FestError::TeamMembersRequired)
        ));
    }

    #[test]
    fn test_team_size_bounds() {
        let event = event(fest::TECHNOLOGY, EventType::Team);
        // min=3, max=4; two members is too few.
        let members = vec![member("a@x.co"), member("b@x.co")];
        match check_eligibility(&facts(&event), Some(&members), None) {
            Err(FestError::InvalidTeamSize { min, max }) => {
                assert_eq!((min, max), (3, 4));
            }
            other => panic!("expected InvalidTeamSize, got {other:?}"),
        }

        let members = vec![
            member("a@x.co"),
            member("b@x.co"),
            member("c@x.co"),
            member("d@x.co"),
            member("e@x.co"),
        ];
        assert!(matches!(
            check_eligibility(&facts(&event), Some(&members), None),
            Err(FestError::InvalidTeamSize { .. })
        ));
    }

    #[test]
    fn test_duplicate_team_member_rejected() {
        let event = event(fest::TECHNOLOGY, EventType::Team);
        let members = vec![member("a@x.co"), member("A@X.CO"), member("b@x.co")];
        assert!(matches!(
            check_eligibility(&facts(&event), Some(&members), None),
            Err(FestError::DuplicateTeamMember)
        ));
    }

    #[test]
    fn test_team_member_identity_fields_checked() {
        let event = event(fest::TECHNOLOGY, EventType::Team);
        let mut bad = member("c@x.co");
        bad.mobile_number = "12345".to_string();
        let members = vec![member("a@x.co"), member("b@x.co"), bad];
        assert!(matches!(
            check_eligibility(&facts(&event), Some(&members), None),
            Err(FestError::Validation(_))
        ));
    }

    #[test]
    fn test_valid_team_accepted() {
        let event = event(fest::TECHNOLOGY, EventType::Team);
        let members = vec![member("a@x.co"), member("b@x.co"), member("c@x.co")];
        assert!(check_eligibility(&facts(&event), Some(&members), None).is_ok());
    }

    #[test]
    fn test_individual_event_rejects_team_members() {
        let event = event(fest::CULTURAL, EventType::Individual);
        let members = vec![member("a@x.co")];
        assert!(matches!(
            check_eligibility(&facts(&event), Some(&members), None),
            Err(FestError::Validation(_))
        ));
    }

    #[test]
    fn test_unknown_sub_event_rejected() {
        let event = event(fest::CULTURAL, EventType::Individual);
        let selected = vec!["solo".to_string(), "chorus".to_string()];
        assert!(matches!(
            check_eligibility(&facts(&event), None, Some(&selected)),
            Err(FestError::Validation(msg)) if msg.contains("chorus")
        ));
    }

    #[test]
    fn test_known_sub_events_accepted() {
        let event = event(fest::CULTURAL, EventType::Individual);
        let selected = vec!["solo".to_string()];
        assert!(check_eligibility(&facts(&event), None, Some(&selected)).is_ok());
    }

    #[test]
    fn test_chain_reports_earliest_failure() {
        // Closed event with a duplicate registration and a blown quota:
        // the closed gate wins because it runs first.
        let mut closed = event(fest::CULTURAL, EventType::Team);
        closed.is_registration_open = false;
        let mut closed_facts = facts(&closed);
        closed_facts.already_registered = true;
        closed_facts.sub_fest_registrations = 99;
        assert!(matches!(
            check_eligibility(&closed_facts, None, None),
            Err(FestError::RegistrationClosed)
        ));

        // Same request against an open event: the duplicate check is next
        // in line, ahead of quota and team validation.
        let open = event(fest::CULTURAL, EventType::Team);
        let mut open_facts = facts(&open);
        open_facts.already_registered = true;
        open_facts.sub_fest_registrations = 99;
        assert!(matches!(
            check_eligibility(&open_facts, None, None),
            Err(FestError::AlreadyRegistered)
        ));
    }
}
