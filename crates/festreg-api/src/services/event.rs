// Event catalog service

use std::sync::Arc;

use uuid::Uuid;

use festreg_core::{
    fest, CreateEventRequest, Event, FestError, Result, Rulebook, UpdateEventRequest,
};
use festreg_storage::{
    models::{CreateEvent, CreateFile, EventRow, UpdateEvent},
    Database,
};

pub struct EventService {
    db: Arc<Database>,
}

impl EventService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn create(&self, req: CreateEventRequest) -> Result<Event> {
        req.validate()?;

        let id = fest::event_id(&req.sub_fest, &req.name);

        // Ids are deterministic, so the same sub-fest + name is a
        // duplicate even if the earlier event was soft-deleted.
        if self
            .db
            .get_event_any(&id)
            .await
            .map_err(FestError::internal)?
            .is_some()
        {
            return Err(FestError::conflict(
                "an event with this sub-fest and name already exists",
            ));
        }

        let row = self
            .db
            .create_event(CreateEvent {
                id,
                name: req.name,
                description: req.description,
                sub_fest: req.sub_fest,
                event_type: req.event_type.to_string(),
                coordinators: req.coordinators,
                timing: req.timing,
                venue: req.venue,
                registration_deadline: req.registration_deadline,
                capacity: req.capacity,
                min_team_size: req.min_team_size,
                max_team_size: req.max_team_size,
                max_events_per_student: req.max_events_per_student,
                sub_events: req.sub_events,
            })
            .await
            .map_err(FestError::internal)?;

        convert(row)
    }

    pub async fn get(&self, id: &str) -> Result<Event> {
        let row = self
            .db
            .get_event(id)
            .await
            .map_err(FestError::internal)?
            .ok_or_else(|| FestError::not_found("event not found"))?;

        convert(row)
    }

    /// List active events; corrupt rows are skipped with a warning rather
    /// than failing the whole batch.
    pub async fn list(&self, sub_fest: Option<&str>) -> Result<Vec<Event>> {
        let rows = self
            .db
            .list_events(sub_fest)
            .await
            .map_err(FestError::internal)?;

        let events = rows
            .into_iter()
            .filter_map(|row| match Event::try_from(row) {
                Ok(event) => Some(event),
                Err(err) => {
                    tracing::warn!(%err, "skipping corrupt event row in listing");
                    None
                }
            })
            .collect();

        Ok(events)
    }

    pub async fn update(&self, id: &str, req: UpdateEventRequest) -> Result<Event> {
        if let (Some(min), Some(max)) = (req.min_team_size, req.max_team_size) {
            if min < 1 || max < min {
                return Err(FestError::validation(
                    "team size bounds must satisfy 1 <= min <= max",
                ));
            }
        }

        let row = self
            .db
            .update_event(
                id,
                UpdateEvent {
                    name: req.name,
                    description: req.description,
                    coordinators: req.coordinators,
                    timing: req.timing,
                    venue: req.venue,
                    registration_deadline: req.registration_deadline,
                    capacity: req.capacity,
                    is_registration_open: req.is_registration_open,
                    min_team_size: req.min_team_size,
                    max_team_size: req.max_team_size,
                    max_events_per_student: req.max_events_per_student,
                    sub_events: req.sub_events,
                },
            )
            .await
            .map_err(FestError::internal)?
            .ok_or_else(|| FestError::not_found("event not found"))?;

        convert(row)
    }

    /// Soft delete by default; `purge` removes the event and cascades to
    /// its registrations.
    pub async fn delete(&self, id: &str, purge: bool) -> Result<()> {
        let deleted = if purge {
            self.db.purge_event(id).await.map_err(FestError::internal)?
        } else {
            self.db
                .disable_event(id)
                .await
                .map_err(FestError::internal)?
        };

        if deleted {
            Ok(())
        } else {
            Err(FestError::not_found("event not found"))
        }
    }

    pub async fn add_rulebook(
        &self,
        event_id: &str,
        filename: String,
        content_type: String,
        data: Vec<u8>,
    ) -> Result<Event> {
        if !filename.to_lowercase().ends_with(".pdf") {
            return Err(FestError::validation("only PDF rulebooks are accepted"));
        }
        if data.is_empty() {
            return Err(FestError::validation("rulebook file is empty"));
        }

        if self
            .db
            .get_event_any(event_id)
            .await
            .map_err(FestError::internal)?
            .is_none()
        {
            return Err(FestError::not_found("event not found"));
        }

        let file = self
            .db
            .create_file(CreateFile {
                filename: filename.clone(),
                content_type,
                data,
            })
            .await
            .map_err(FestError::internal)?;

        let row = self
            .db
            .add_rulebook(
                event_id,
                &Rulebook {
                    file_id: file.id,
                    filename,
                },
            )
            .await
            .map_err(FestError::internal)?
            .ok_or_else(|| FestError::not_found("event not found"))?;

        convert(row)
    }

    pub async fn remove_rulebook(&self, event_id: &str, file_id: Uuid) -> Result<()> {
        let detached = self
            .db
            .remove_rulebook(event_id, file_id)
            .await
            .map_err(FestError::internal)?;

        if !detached {
            return Err(FestError::not_found("rulebook not found on this event"));
        }

        self.db
            .delete_file(file_id)
            .await
            .map_err(FestError::internal)?;

        Ok(())
    }
}

/// Single-row conversion: a corrupt row on a direct lookup reads as
/// absent, mirroring the skip-with-warning rule for listings.
fn convert(row: EventRow) -> Result<Event> {
    let id = row.id.clone();
    Event::try_from(row).map_err(|err| {
        tracing::warn!(event_id = %id, %err, "corrupt event row");
        FestError::not_found("event not found")
    })
}
