// Repository layer for database operations

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::*;

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create database connection from URL
    pub async fn from_url(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply pending schema migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("failed to run database migrations")?;
        Ok(())
    }

    // ============================================
    // Users
    // ============================================

    pub async fn create_user(&self, input: CreateUser) -> Result<UserRow> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (email, password_hash, full_name, roll_number, department, year, mobile_number, role, verified)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING email, password_hash, full_name, roll_number, department, year, mobile_number, role, verified, created_at
            "#,
        )
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(&input.full_name)
        .bind(&input.roll_number)
        .bind(&input.department)
        .bind(input.year)
        .bind(&input.mobile_number)
        .bind(&input.role)
        .bind(input.verified)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT email, password_hash, full_name, roll_number, department, year, mobile_number, role, verified, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_user_by_roll_number(&self, roll_number: &str) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT email, password_hash, full_name, roll_number, department, year, mobile_number, role, verified, created_at
            FROM users
            WHERE roll_number = $1
            "#,
        )
        .bind(roll_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn update_profile(
        &self,
        email: &str,
        input: UpdateProfile,
    ) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET
                full_name = COALESCE($2, full_name),
                department = COALESCE($3, department),
                year = COALESCE($4, year),
                mobile_number = COALESCE($5, mobile_number)
            WHERE email = $1
            RETURNING email, password_hash, full_name, roll_number, department, year, mobile_number, role, verified, created_at
            "#,
        )
        .bind(email)
        .bind(&input.full_name)
        .bind(&input.department)
        .bind(input.year)
        .bind(&input.mobile_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn update_password(&self, email: &str, password_hash: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE email = $1")
            .bind(email)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ============================================
    // Events
    // ============================================

    pub async fn create_event(&self, input: CreateEvent) -> Result<EventRow> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            INSERT INTO events (
                id, name, description, sub_fest, event_type, coordinators, timing, venue,
                registration_deadline, capacity, min_team_size, max_team_size,
                max_events_per_student, sub_events
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING id, name, description, sub_fest, event_type, coordinators, timing, venue,
                      registration_deadline, capacity, registered_count, is_active,
                      is_registration_open, min_team_size, max_team_size,
                      max_events_per_student, sub_events, rulebooks, created_at
            "#,
        )
        .bind(&input.id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.sub_fest)
        .bind(&input.event_type)
        .bind(&input.coordinators)
        .bind(&input.timing)
        .bind(&input.venue)
        .bind(input.registration_deadline)
        .bind(input.capacity)
        .bind(input.min_team_size)
        .bind(input.max_team_size)
        .bind(input.max_events_per_student)
        .bind(&input.sub_events)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Fetch an active event. Soft-deleted events read as absent.
    pub async fn get_event(&self, id: &str) -> Result<Option<EventRow>> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, name, description, sub_fest, event_type, coordinators, timing, venue,
                   registration_deadline, capacity, registered_count, is_active,
                   is_registration_open, min_team_size, max_team_size,
                   max_events_per_student, sub_events, rulebooks, created_at
            FROM events
            WHERE id = $1 AND is_active
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Fetch an event regardless of its soft-delete flag (admin paths and
    /// duplicate-id checks).
    pub async fn get_event_any(&self, id: &str) -> Result<Option<EventRow>> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, name, description, sub_fest, event_type, coordinators, timing, venue,
                   registration_deadline, capacity, registered_count, is_active,
                   is_registration_open, min_team_size, max_team_size,
                   max_events_per_student, sub_events, rulebooks, created_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_events(&self, sub_fest: Option<&str>) -> Result<Vec<EventRow>> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, name, description, sub_fest, event_type, coordinators, timing, venue,
                   registration_deadline, capacity, registered_count, is_active,
                   is_registration_open, min_team_size, max_team_size,
                   max_events_per_student, sub_events, rulebooks, created_at
            FROM events
            WHERE is_active AND ($1::text IS NULL OR sub_fest = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(sub_fest)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn update_event(&self, id: &str, input: UpdateEvent) -> Result<Option<EventRow>> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            UPDATE events
            SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                coordinators = COALESCE($4, coordinators),
                timing = COALESCE($5, timing),
                venue = COALESCE($6, venue),
                registration_deadline = COALESCE($7, registration_deadline),
                capacity = COALESCE($8, capacity),
                is_registration_open = COALESCE($9, is_registration_open),
                min_team_size = COALESCE($10, min_team_size),
                max_team_size = COALESCE($11, max_team_size),
                max_events_per_student = COALESCE($12, max_events_per_student),
                sub_events = COALESCE($13, sub_events)
            WHERE id = $1
            RETURNING id, name, description, sub_fest, event_type, coordinators, timing, venue,
                      registration_deadline, capacity, registered_count, is_active,
                      is_registration_open, min_team_size, max_team_size,
                      max_events_per_student, sub_events, rulebooks, created_at
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.coordinators)
        .bind(&input.timing)
        .bind(&input.venue)
        .bind(input.registration_deadline)
        .bind(input.capacity)
        .bind(input.is_registration_open)
        .bind(input.min_team_size)
        .bind(input.max_team_size)
        .bind(input.max_events_per_student)
        .bind(&input.sub_events)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Soft delete: the event disappears from listings and lookups but its
    /// registrations stay.
    pub async fn disable_event(&self, id: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE events
            SET is_active = FALSE
            WHERE id = $1 AND is_active
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Hard delete: removes the event and cascades to its registrations.
    pub async fn purge_event(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn add_rulebook(
        &self,
        event_id: &str,
        rulebook: &festreg_core::Rulebook,
    ) -> Result<Option<EventRow>> {
        let entry = serde_json::to_value(rulebook)?;

        let row = sqlx::query_as::<_, EventRow>(
            r#"
            UPDATE events
            SET rulebooks = rulebooks || jsonb_build_array($2::jsonb)
            WHERE id = $1
            RETURNING id, name, description, sub_fest, event_type, coordinators, timing, venue,
                      registration_deadline, capacity, registered_count, is_active,
                      is_registration_open, min_team_size, max_team_size,
                      max_events_per_student, sub_events, rulebooks, created_at
            "#,
        )
        .bind(event_id)
        .bind(entry)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn remove_rulebook(&self, event_id: &str, file_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE events
            SET rulebooks = COALESCE(
                (
                    SELECT jsonb_agg(entry)
                    FROM jsonb_array_elements(rulebooks) AS entry
                    WHERE entry->>'file_id' <> $2
                ),
                '[]'::jsonb
            )
            WHERE id = $1 AND rulebooks @> jsonb_build_array(jsonb_build_object('file_id', $2::text))
            "#,
        )
        .bind(event_id)
        .bind(file_id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Recompute registered_count from live registration rows and correct
    /// any drift. Returns the number of events touched.
    pub async fn sync_registration_counts(&self) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE events e
            SET registered_count = sub.actual
            FROM (
                SELECT e2.id, COALESCE(COUNT(r.id), 0)::int AS actual
                FROM events e2
                LEFT JOIN registrations r ON r.event_id = e2.id
                GROUP BY e2.id
            ) sub
            WHERE sub.id = e.id AND e.registered_count <> sub.actual
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    // ============================================
    // Registrations
    // ============================================

    /// Insert a registration and bump the event counter in one
    /// transaction. Returns `None` when the (event_id, student_email)
    /// uniqueness constraint fires, i.e. a concurrent duplicate won.
    pub async fn create_registration(
        &self,
        input: CreateRegistration,
    ) -> Result<Option<RegistrationRow>> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query_as::<_, RegistrationRow>(
            r#"
            INSERT INTO registrations (
                event_id, student_email, full_name, roll_number, department, year,
                mobile_number, team_members, selected_sub_events, event_name, sub_fest
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, event_id, student_email, full_name, roll_number, department, year,
                      mobile_number, team_members, selected_sub_events, registered_at,
                      event_name, sub_fest
            "#,
        )
        .bind(&input.event_id)
        .bind(&input.student_email)
        .bind(&input.full_name)
        .bind(&input.roll_number)
        .bind(&input.department)
        .bind(input.year)
        .bind(&input.mobile_number)
        .bind(&input.team_members)
        .bind(&input.selected_sub_events)
        .bind(&input.event_name)
        .bind(&input.sub_fest)
        .fetch_one(&mut *tx)
        .await;

        let row = match inserted {
            Ok(row) => row,
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                tx.rollback().await?;
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };

        sqlx::query("UPDATE events SET registered_count = registered_count + 1 WHERE id = $1")
            .bind(&input.event_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(row))
    }

    pub async fn get_registration(
        &self,
        event_id: &str,
        student_email: &str,
    ) -> Result<Option<RegistrationRow>> {
        let row = sqlx::query_as::<_, RegistrationRow>(
            r#"
            SELECT id, event_id, student_email, full_name, roll_number, department, year,
                   mobile_number, team_members, selected_sub_events, registered_at,
                   event_name, sub_fest
            FROM registrations
            WHERE event_id = $1 AND student_email = $2
            "#,
        )
        .bind(event_id)
        .bind(student_email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Caller's registration count within one sub-fest, for the quota gate.
    pub async fn count_sub_fest_registrations(
        &self,
        student_email: &str,
        sub_fest: &str,
    ) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM registrations
            WHERE student_email = $1 AND sub_fest = $2
            "#,
        )
        .bind(student_email)
        .bind(sub_fest)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    pub async fn list_registrations_for_student(
        &self,
        student_email: &str,
    ) -> Result<Vec<RegistrationRow>> {
        let rows = sqlx::query_as::<_, RegistrationRow>(
            r#"
            SELECT id, event_id, student_email, full_name, roll_number, department, year,
                   mobile_number, team_members, selected_sub_events, registered_at,
                   event_name, sub_fest
            FROM registrations
            WHERE student_email = $1
            ORDER BY registered_at DESC
            "#,
        )
        .bind(student_email)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn list_registrations(
        &self,
        event_id: Option<&str>,
    ) -> Result<Vec<RegistrationRow>> {
        let rows = sqlx::query_as::<_, RegistrationRow>(
            r#"
            SELECT id, event_id, student_email, full_name, roll_number, department, year,
                   mobile_number, team_members, selected_sub_events, registered_at,
                   event_name, sub_fest
            FROM registrations
            WHERE $1::text IS NULL OR event_id = $1
            ORDER BY registered_at DESC
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Remove a registration and decrement the event counter, floored at
    /// zero, in one transaction.
    pub async fn delete_registration(&self, id: Uuid) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let event_id: Option<String> =
            sqlx::query_scalar("DELETE FROM registrations WHERE id = $1 RETURNING event_id")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(event_id) = event_id else {
            tx.rollback().await?;
            return Ok(false);
        };

        sqlx::query(
            "UPDATE events SET registered_count = GREATEST(registered_count - 1, 0) WHERE id = $1",
        )
        .bind(&event_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(true)
    }

    // ============================================
    // Notifications
    // ============================================

    pub async fn create_notification(
        &self,
        title: &str,
        message: &str,
        image_url: Option<&str>,
    ) -> Result<NotificationRow> {
        let row = sqlx::query_as::<_, NotificationRow>(
            r#"
            INSERT INTO notifications (title, message, image_url)
            VALUES ($1, $2, $3)
            RETURNING id, title, message, image_url, created_at
            "#,
        )
        .bind(title)
        .bind(message)
        .bind(image_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_notifications(&self) -> Result<Vec<NotificationRow>> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT id, title, message, image_url, created_at
            FROM notifications
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn delete_notification(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ============================================
    // Gallery
    // ============================================

    pub async fn create_gallery_image(
        &self,
        sub_fest: &str,
        image_url: &str,
        caption: Option<&str>,
    ) -> Result<GalleryImageRow> {
        let row = sqlx::query_as::<_, GalleryImageRow>(
            r#"
            INSERT INTO gallery_images (sub_fest, image_url, caption)
            VALUES ($1, $2, $3)
            RETURNING id, sub_fest, image_url, caption, uploaded_at
            "#,
        )
        .bind(sub_fest)
        .bind(image_url)
        .bind(caption)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_gallery_images(
        &self,
        sub_fest: Option<&str>,
    ) -> Result<Vec<GalleryImageRow>> {
        let rows = sqlx::query_as::<_, GalleryImageRow>(
            r#"
            SELECT id, sub_fest, image_url, caption, uploaded_at
            FROM gallery_images
            WHERE $1::text IS NULL OR sub_fest = $1
            ORDER BY uploaded_at DESC
            "#,
        )
        .bind(sub_fest)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn delete_gallery_image(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM gallery_images WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ============================================
    // Shortlists
    // ============================================

    pub async fn create_shortlist(
        &self,
        name: &str,
        entries: serde_json::Value,
    ) -> Result<ShortlistRow> {
        let row = sqlx::query_as::<_, ShortlistRow>(
            r#"
            INSERT INTO shortlists (name, entries)
            VALUES ($1, $2)
            RETURNING id, name, entries, uploaded_at
            "#,
        )
        .bind(name)
        .bind(entries)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_shortlists(&self) -> Result<Vec<ShortlistSummaryRow>> {
        let rows = sqlx::query_as::<_, ShortlistSummaryRow>(
            r#"
            SELECT id, name, uploaded_at, jsonb_array_length(entries)::bigint AS entry_count
            FROM shortlists
            ORDER BY uploaded_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn get_shortlist(&self, id: Uuid) -> Result<Option<ShortlistRow>> {
        let row = sqlx::query_as::<_, ShortlistRow>(
            r#"
            SELECT id, name, entries, uploaded_at
            FROM shortlists
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn delete_shortlist(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM shortlists WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ============================================
    // Stored files
    // ============================================

    pub async fn create_file(&self, input: CreateFile) -> Result<FileMetaRow> {
        let row = sqlx::query_as::<_, FileMetaRow>(
            r#"
            INSERT INTO files (filename, content_type, data)
            VALUES ($1, $2, $3)
            RETURNING id, filename, content_type, uploaded_at
            "#,
        )
        .bind(&input.filename)
        .bind(&input.content_type)
        .bind(&input.data)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_file(&self, id: Uuid) -> Result<Option<FileRow>> {
        let row = sqlx::query_as::<_, FileRow>(
            r#"
            SELECT id, filename, content_type, data, uploaded_at
            FROM files
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn delete_file(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ============================================
    // Password resets
    // ============================================

    pub async fn create_password_reset(
        &self,
        user_email: &str,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<PasswordResetRow> {
        let row = sqlx::query_as::<_, PasswordResetRow>(
            r#"
            INSERT INTO password_resets (user_email, token_hash, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id, user_email, token_hash, expires_at, used_at, created_at
            "#,
        )
        .bind(user_email)
        .bind(token_hash)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Mark an unexpired, unused reset token as consumed and return its
    /// owner. The UPDATE makes single-use atomic: a second consume of the
    /// same token matches zero rows.
    pub async fn consume_password_reset(&self, token_hash: &str) -> Result<Option<String>> {
        let email: Option<String> = sqlx::query_scalar(
            r#"
            UPDATE password_resets
            SET used_at = NOW()
            WHERE token_hash = $1 AND used_at IS NULL AND expires_at > NOW()
            RETURNING user_email
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(email)
    }
}
