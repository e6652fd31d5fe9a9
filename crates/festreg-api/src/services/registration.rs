// Registration service: the eligibility chain plus its reads and writes

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use festreg_core::{
    check_eligibility, CreateRegistrationRequest, EligibilityFacts, Event, FestError, Registration,
    Result, User,
};
use festreg_storage::{models::CreateRegistration, Database};

pub struct RegistrationService {
    db: Arc<Database>,
}

impl RegistrationService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Register the caller for an event. Gathers the facts the rule chain
    /// needs, runs it, then persists the registration and bumps the event
    /// counter in one transaction.
    pub async fn register(&self, caller: &User, req: CreateRegistrationRequest) -> Result<Registration> {
        let event_row = self
            .db
            .get_event(&req.event_id)
            .await
            .map_err(FestError::internal)?
            .ok_or_else(|| FestError::not_found("event not found"))?;

        let event = Event::try_from(event_row).map_err(|err| {
            tracing::warn!(event_id = %req.event_id, %err, "corrupt event row");
            FestError::not_found("event not found")
        })?;

        let already_registered = self
            .db
            .get_registration(&event.id, &caller.email)
            .await
            .map_err(FestError::internal)?
            .is_some();

        let sub_fest_registrations = self
            .db
            .count_sub_fest_registrations(&caller.email, &event.sub_fest)
            .await
            .map_err(FestError::internal)?;

        let facts = EligibilityFacts {
            event: &event,
            now: Utc::now(),
            already_registered,
            sub_fest_registrations,
        };
        check_eligibility(
            &facts,
            req.team_members.as_deref(),
            req.selected_sub_events.as_deref(),
        )?;

        let team_members = req
            .team_members
            .filter(|members| !members.is_empty())
            .map(serde_json::to_value)
            .transpose()
            .map_err(FestError::internal)?;

        let row = self
            .db
            .create_registration(CreateRegistration {
                event_id: event.id.clone(),
                student_email: caller.email.clone(),
                full_name: caller.full_name.clone(),
                roll_number: caller.roll_number.clone(),
                department: caller.department.clone(),
                year: caller.year,
                mobile_number: caller.mobile_number.clone(),
                team_members,
                selected_sub_events: req.selected_sub_events,
                event_name: event.name.clone(),
                sub_fest: event.sub_fest.clone(),
            })
            .await
            .map_err(FestError::internal)?
            // A concurrent duplicate raced past the pre-check and lost to
            // the unique constraint.
            .ok_or(FestError::AlreadyRegistered)?;

        Ok(Registration::from(row))
    }

    pub async fn list_mine(&self, email: &str) -> Result<Vec<Registration>> {
        let rows = self
            .db
            .list_registrations_for_student(email)
            .await
            .map_err(FestError::internal)?;

        Ok(rows.into_iter().map(Registration::from).collect())
    }

    pub async fn list_all(&self, event_id: Option<&str>) -> Result<Vec<Registration>> {
        let rows = self
            .db
            .list_registrations(event_id)
            .await
            .map_err(FestError::internal)?;

        Ok(rows.into_iter().map(Registration::from).collect())
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let deleted = self
            .db
            .delete_registration(id)
            .await
            .map_err(FestError::internal)?;

        if deleted {
            Ok(())
        } else {
            Err(FestError::not_found("registration not found"))
        }
    }

    /// Recompute per-event registered_count from live rows. Returns the
    /// number of events corrected.
    pub async fn reconcile(&self) -> Result<u64> {
        self.db
            .sync_registration_counts()
            .await
            .map_err(FestError::internal)
    }

    pub async fn export_csv(&self, event_id: Option<&str>) -> Result<Vec<u8>> {
        let registrations = self.list_all(event_id).await?;
        super::export::registrations_to_csv(&registrations).map_err(FestError::internal)
    }
}
