use super::models::*;
use super::schema::MARKETPLACE_VERSIONED_SCHEMAS;
use super::{
    CategoryStore, ChatStore, EventLogStore, JobStore, NotificationStore, SocialStore, StoreError,
    StoreResult,
};
use crate::jobs::JobStatus;
use crate::sqlite_persistence::open_versioned;
use anyhow::Result;
use rusqlite::{ffi, params, types::Type, Connection, ErrorCode, OptionalExtension, Row};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::{Arc, Mutex};

const JOB_COLUMNS: &str = "job_id, title, description, category, posted_by, location, price, \
                           status, assigned_to, applicants, created_at";
const CATEGORY_COLUMNS: &str =
    "name, types, jobs, image_path, use_category_default_image, created_at";
const NOTIFICATION_COLUMNS: &str = "id, recipient, message, link, is_read, created_at";
const EVENT_LOG_COLUMNS: &str = "id, event_type, actor, details, target, context, created_at";

pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = open_versioned(
            db_path.as_ref(),
            MARKETPLACE_VERSIONED_SCHEMAS,
            "marketplace",
        )?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// A throwaway store with the latest schema, for tests and tooling.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        if let Some(schema) = MARKETPLACE_VERSIONED_SCHEMAS.last() {
            schema.create(&conn)?;
        }
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn conversion_error(row: &Row, column: &str, message: String) -> rusqlite::Error {
        let index = row.as_ref().column_index(column).unwrap_or(0);
        rusqlite::Error::FromSqlConversionFailure(index, Type::Text, message.into())
    }

    fn json_column<T: DeserializeOwned>(row: &Row, column: &str) -> rusqlite::Result<T> {
        let raw: String = row.get(column)?;
        serde_json::from_str(&raw)
            .map_err(|e| Self::conversion_error(row, column, format!("invalid JSON: {}", e)))
    }

    fn optional_json_column<T: DeserializeOwned>(
        row: &Row,
        column: &str,
    ) -> rusqlite::Result<Option<T>> {
        let raw: Option<String> = row.get(column)?;
        raw.map(|s| {
            serde_json::from_str(&s)
                .map_err(|e| Self::conversion_error(row, column, format!("invalid JSON: {}", e)))
        })
        .transpose()
    }

    fn row_to_job(row: &Row) -> rusqlite::Result<Job> {
        let status_str: String = row.get("status")?;
        let status = JobStatus::parse(&status_str).ok_or_else(|| {
            Self::conversion_error(row, "status", format!("unknown job status {}", status_str))
        })?;
        Ok(Job {
            job_id: row.get("job_id")?,
            title: row.get("title")?,
            description: row.get("description")?,
            category: row.get("category")?,
            posted_by: row.get("posted_by")?,
            location: row.get("location")?,
            price: row.get("price")?,
            status,
            assigned_to: row.get("assigned_to")?,
            applicants: Self::json_column(row, "applicants")?,
            created_at: row.get("created_at")?,
        })
    }

    fn row_to_category(row: &Row) -> rusqlite::Result<JobCategory> {
        Ok(JobCategory {
            name: row.get("name")?,
            types: Self::json_column(row, "types")?,
            jobs: Self::json_column(row, "jobs")?,
            image_path: row.get("image_path")?,
            use_category_default_image: row.get::<_, i64>("use_category_default_image")? != 0,
            created_at: row.get("created_at")?,
        })
    }

    fn row_to_notification(row: &Row) -> rusqlite::Result<Notification> {
        Ok(Notification {
            id: row.get("id")?,
            recipient: row.get("recipient")?,
            message: row.get("message")?,
            link: row.get("link")?,
            is_read: row.get::<_, i64>("is_read")? != 0,
            created_at: row.get("created_at")?,
        })
    }

    fn row_to_event_log(row: &Row) -> rusqlite::Result<EventLog> {
        let event_type_str: String = row.get("event_type")?;
        let event_type = EventType::parse(&event_type_str).ok_or_else(|| {
            Self::conversion_error(
                row,
                "event_type",
                format!("unknown event type {}", event_type_str),
            )
        })?;
        Ok(EventLog {
            id: row.get("id")?,
            event_type,
            actor: row.get("actor")?,
            details: Self::json_column(row, "details")?,
            target: Self::optional_json_column(row, "target")?,
            context: Self::optional_json_column(row, "context")?,
            created_at: row.get("created_at")?,
        })
    }

    fn row_to_rating(row: &Row) -> rusqlite::Result<Rating> {
        Ok(Rating {
            id: row.get("id")?,
            job_id: row.get("job_id")?,
            rated: row.get("rated")?,
            rater: row.get("rater")?,
            rating: row.get("rating")?,
            comment: row.get("comment")?,
            created_at: row.get("created_at")?,
        })
    }

    fn row_to_agency_request(row: &Row) -> rusqlite::Result<AgencyRequest> {
        let status_str: String = row.get("status")?;
        let status = AgencyRequestStatus::parse(&status_str).ok_or_else(|| {
            Self::conversion_error(row, "status", format!("unknown request status {}", status_str))
        })?;
        Ok(AgencyRequest {
            request_id: row.get("request_id")?,
            agency_id: row.get("agency_id")?,
            username: row.get("username")?,
            status,
            requested_at: row.get("requested_at")?,
        })
    }

    fn row_to_chat_message(row: &Row) -> rusqlite::Result<ChatMessage> {
        Ok(ChatMessage {
            id: row.get("id")?,
            sender: row.get("sender")?,
            recipient: row.get("recipient")?,
            content: row.get("content")?,
            timestamp: row.get("timestamp")?,
        })
    }

    fn fetch_job(conn: &Connection, job_id: &str) -> StoreResult<Option<Job>> {
        Ok(conn
            .query_row(
                &format!("SELECT {} FROM jobs WHERE job_id = ?1", JOB_COLUMNS),
                params![job_id],
                Self::row_to_job,
            )
            .optional()?)
    }

    fn fetch_category(conn: &Connection, name: &str) -> StoreResult<Option<JobCategory>> {
        Ok(conn
            .query_row(
                &format!(
                    "SELECT {} FROM job_categories WHERE name = ?1",
                    CATEGORY_COLUMNS
                ),
                params![name],
                Self::row_to_category,
            )
            .optional()?)
    }

    fn write_category_body(conn: &Connection, category: &JobCategory) -> StoreResult<()> {
        conn.execute(
            "UPDATE job_categories SET jobs = ?1, image_path = ?2, use_category_default_image = ?3
             WHERE name = ?4",
            params![
                serde_json::to_string(&category.jobs)?,
                category.image_path,
                category.use_category_default_image,
                category.name
            ],
        )?;
        Ok(())
    }
}

/// Maps a uniqueness violation to [`StoreError::Duplicate`], anything else to a database error.
fn map_unique(err: rusqlite::Error, entity: &'static str, key: impl Into<String>) -> StoreError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::ConstraintViolation
                && (e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
                    || e.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY) =>
        {
            StoreError::Duplicate {
                entity,
                key: key.into(),
            }
        }
        _ => StoreError::Database(err),
    }
}

fn not_found(entity: &'static str, key: &str) -> StoreError {
    StoreError::NotFound {
        entity,
        key: key.to_string(),
    }
}

impl JobStore for SqliteStore {
    fn insert_job(&self, job: &Job) -> StoreResult<Job> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            &format!(
                "INSERT INTO jobs ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                JOB_COLUMNS
            ),
            params![
                job.job_id,
                job.title,
                job.description,
                job.category,
                job.posted_by,
                job.location,
                job.price,
                job.status.as_str(),
                job.assigned_to,
                serde_json::to_string(&job.applicants)?,
                job.created_at,
            ],
        )
        .map_err(|e| map_unique(e, "job", &job.job_id))?;
        Ok(job.clone())
    }

    fn get_job(&self, job_id: &str) -> StoreResult<Option<Job>> {
        let conn = self.conn.lock().unwrap();
        Self::fetch_job(&conn, job_id)
    }

    fn list_jobs(&self) -> StoreResult<Vec<Job>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM jobs ORDER BY created_at DESC, id DESC",
            JOB_COLUMNS
        ))?;
        let jobs = stmt
            .query_map([], Self::row_to_job)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(jobs)
    }

    fn update_job_assignment(&self, job: &Job, expected: JobStatus) -> StoreResult<Option<Job>> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "UPDATE jobs SET status = ?1, assigned_to = ?2, applicants = ?3
             WHERE job_id = ?4 AND status = ?5",
            params![
                job.status.as_str(),
                job.assigned_to,
                serde_json::to_string(&job.applicants)?,
                job.job_id,
                expected.as_str()
            ],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        Self::fetch_job(&conn, &job.job_id)
    }

    fn update_job_category(&self, job_id: &str, category: &str) -> StoreResult<Option<Job>> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "UPDATE jobs SET category = ?1 WHERE job_id = ?2",
            params![category, job_id],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        Self::fetch_job(&conn, job_id)
    }

    fn add_applicant(&self, job_id: &str, username: &str) -> StoreResult<Option<Job>> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        let mut job = match Self::fetch_job(&tx, job_id)? {
            Some(job) if job.status == JobStatus::Open => job,
            _ => return Ok(None),
        };
        if !job.applicants.iter().any(|a| a == username) {
            job.applicants.push(username.to_string());
            tx.execute(
                "UPDATE jobs SET applicants = ?1 WHERE job_id = ?2",
                params![serde_json::to_string(&job.applicants)?, job_id],
            )?;
        }
        tx.commit()?;
        Ok(Some(job))
    }

    fn remove_applicant(&self, job_id: &str, username: &str) -> StoreResult<Option<Job>> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        let Some(mut job) = Self::fetch_job(&tx, job_id)? else {
            return Ok(None);
        };
        job.applicants.retain(|a| a != username);
        tx.execute(
            "UPDATE jobs SET applicants = ?1 WHERE job_id = ?2",
            params![serde_json::to_string(&job.applicants)?, job_id],
        )?;
        tx.commit()?;
        Ok(Some(job))
    }

    fn delete_job(&self, job_id: &str) -> StoreResult<bool> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute("DELETE FROM jobs WHERE job_id = ?1", params![job_id])?;
        Ok(deleted > 0)
    }
}

impl CategoryStore for SqliteStore {
    fn list_categories(&self) -> StoreResult<Vec<JobCategory>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM job_categories ORDER BY name",
            CATEGORY_COLUMNS
        ))?;
        let categories = stmt
            .query_map([], Self::row_to_category)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(categories)
    }

    fn list_category_names(&self) -> StoreResult<Vec<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT name FROM job_categories ORDER BY name")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }

    fn get_category(&self, name: &str) -> StoreResult<Option<JobCategory>> {
        let conn = self.conn.lock().unwrap();
        Self::fetch_category(&conn, name)
    }

    fn find_category_ignore_case(&self, name: &str) -> StoreResult<Option<JobCategory>> {
        let conn = self.conn.lock().unwrap();
        Ok(conn
            .query_row(
                &format!(
                    "SELECT {} FROM job_categories WHERE name = ?1 COLLATE NOCASE LIMIT 1",
                    CATEGORY_COLUMNS
                ),
                params![name],
                Self::row_to_category,
            )
            .optional()?)
    }

    fn insert_category(&self, category: &JobCategory) -> StoreResult<JobCategory> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO job_categories (name, types, jobs, image_path, use_category_default_image)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                category.name,
                serde_json::to_string(&category.types)?,
                serde_json::to_string(&category.jobs)?,
                category.image_path,
                category.use_category_default_image,
            ],
        )
        .map_err(|e| map_unique(e, "job category", &category.name))?;
        Self::fetch_category(&conn, &category.name)?
            .ok_or_else(|| not_found("job category", &category.name))
    }

    fn create_or_get_category(&self, category: &JobCategory) -> StoreResult<(JobCategory, bool)> {
        let conn = self.conn.lock().unwrap();
        let inserted = conn.execute(
            "INSERT INTO job_categories (name, types, jobs, image_path, use_category_default_image)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(name) DO NOTHING",
            params![
                category.name,
                serde_json::to_string(&category.types)?,
                serde_json::to_string(&category.jobs)?,
                category.image_path,
                category.use_category_default_image,
            ],
        )?;
        let stored = Self::fetch_category(&conn, &category.name)?
            .ok_or_else(|| not_found("job category", &category.name))?;
        Ok((stored, inserted > 0))
    }

    fn add_job_type_if_missing(
        &self,
        category_name: &str,
        job_type: &JobType,
    ) -> StoreResult<Option<JobCategory>> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        let mut category = Self::fetch_category(&tx, category_name)?
            .ok_or_else(|| not_found("job category", category_name))?;
        if category.has_job_type(&job_type.name) {
            return Ok(None);
        }
        category.jobs.push(job_type.clone());
        Self::write_category_body(&tx, &category)?;
        tx.commit()?;
        Ok(Some(category))
    }

    fn update_category_config(
        &self,
        category_name: &str,
        update: &CategoryConfigUpdate,
    ) -> StoreResult<JobCategory> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        let mut category = Self::fetch_category(&tx, category_name)?
            .ok_or_else(|| not_found("job category", category_name))?;

        if let Some(image_path) = &update.image_path {
            category.image_path = image_path.clone();
        }
        if let Some(use_default) = update.use_category_default_image {
            category.use_category_default_image = use_default;
        }
        for job_update in &update.jobs {
            if let Some(existing) = category.jobs.iter_mut().find(|j| j.name == job_update.name) {
                existing.image_path = job_update.image_path.clone();
            }
        }

        Self::write_category_body(&tx, &category)?;
        tx.commit()?;
        Ok(category)
    }
}

impl NotificationStore for SqliteStore {
    fn create_notification(
        &self,
        recipient: &str,
        message: &str,
        link: &str,
    ) -> StoreResult<Notification> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO notifications (recipient, message, link) VALUES (?1, ?2, ?3)",
            params![recipient, message, link],
        )?;
        let id = conn.last_insert_rowid();
        Ok(conn.query_row(
            &format!(
                "SELECT {} FROM notifications WHERE id = ?1",
                NOTIFICATION_COLUMNS
            ),
            params![id],
            Self::row_to_notification,
        )?)
    }

    fn list_notifications(&self, recipient: &str, limit: usize) -> StoreResult<Vec<Notification>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM notifications WHERE recipient = ?1
             ORDER BY created_at DESC, id DESC LIMIT ?2",
            NOTIFICATION_COLUMNS
        ))?;
        let notifications = stmt
            .query_map(params![recipient, limit as i64], Self::row_to_notification)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(notifications)
    }

    fn mark_notifications_read(&self, recipient: &str, ids: &[i64]) -> StoreResult<usize> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        let mut updated = 0;
        for id in ids {
            updated += tx.execute(
                "UPDATE notifications SET is_read = 1 WHERE id = ?1 AND recipient = ?2",
                params![id, recipient],
            )?;
        }
        tx.commit()?;
        Ok(updated)
    }

    fn count_unread_notifications(&self, recipient: &str) -> StoreResult<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM notifications WHERE recipient = ?1 AND is_read = 0",
            params![recipient],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

impl EventLogStore for SqliteStore {
    fn append_event_log(&self, entry: &NewEventLog) -> StoreResult<EventLog> {
        let target = entry.target.as_ref().map(serde_json::to_string).transpose()?;
        let context = entry
            .context
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO event_logs (event_type, actor, details, target, context)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.event_type.as_str(),
                entry.actor,
                serde_json::to_string(&entry.details)?,
                target,
                context,
            ],
        )?;
        let id = conn.last_insert_rowid();
        Ok(conn.query_row(
            &format!("SELECT {} FROM event_logs WHERE id = ?1", EVENT_LOG_COLUMNS),
            params![id],
            Self::row_to_event_log,
        )?)
    }

    fn list_event_logs(&self, limit: usize, offset: usize) -> StoreResult<Vec<EventLog>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM event_logs ORDER BY id DESC LIMIT ?1 OFFSET ?2",
            EVENT_LOG_COLUMNS
        ))?;
        let entries = stmt
            .query_map(params![limit as i64, offset as i64], Self::row_to_event_log)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    fn delete_event_logs(&self, before_timestamp: Option<i64>) -> StoreResult<usize> {
        let conn = self.conn.lock().unwrap();
        let deleted = match before_timestamp {
            Some(before) => conn.execute(
                "DELETE FROM event_logs WHERE created_at < ?1",
                params![before],
            )?,
            None => conn.execute("DELETE FROM event_logs", [])?,
        };
        Ok(deleted)
    }
}

impl SocialStore for SqliteStore {
    fn insert_rating(
        &self,
        job_id: &str,
        rated: &str,
        rater: &str,
        rating: u8,
        comment: Option<&str>,
    ) -> StoreResult<Rating> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO ratings (job_id, rated, rater, rating, comment) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![job_id, rated, rater, rating, comment],
        )
        .map_err(|e| map_unique(e, "rating", format!("{} by {}", job_id, rater)))?;
        let id = conn.last_insert_rowid();
        Ok(conn.query_row(
            "SELECT id, job_id, rated, rater, rating, comment, created_at FROM ratings WHERE id = ?1",
            params![id],
            Self::row_to_rating,
        )?)
    }

    fn rating_summary(&self, rated: &str) -> StoreResult<RatingSummary> {
        let conn = self.conn.lock().unwrap();
        let (average, count): (Option<f64>, i64) = conn.query_row(
            "SELECT AVG(rating), COUNT(*) FROM ratings WHERE rated = ?1",
            params![rated],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(RatingSummary {
            average_rating: average.map(|a| (a * 10.0).round() / 10.0).unwrap_or(0.0),
            rating_count: count as u32,
        })
    }

    fn insert_follow(&self, username: &str, follower: &str) -> StoreResult<Follow> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO follows (username, follower) VALUES (?1, ?2)",
            params![username, follower],
        )
        .map_err(|e| map_unique(e, "follow", format!("{} -> {}", follower, username)))?;
        Ok(conn.query_row(
            "SELECT username, follower, created_at FROM follows
             WHERE username = ?1 AND follower = ?2",
            params![username, follower],
            |row| {
                Ok(Follow {
                    username: row.get(0)?,
                    follower: row.get(1)?,
                    created_at: row.get(2)?,
                })
            },
        )?)
    }

    fn delete_follow(&self, username: &str, follower: &str) -> StoreResult<bool> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute(
            "DELETE FROM follows WHERE username = ?1 AND follower = ?2",
            params![username, follower],
        )?;
        Ok(deleted > 0)
    }

    fn list_followers(&self, username: &str) -> StoreResult<Vec<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare("SELECT follower FROM follows WHERE username = ?1 ORDER BY created_at, follower")?;
        let followers = stmt
            .query_map(params![username], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(followers)
    }

    fn insert_agency_request(
        &self,
        agency_id: &str,
        username: &str,
    ) -> StoreResult<AgencyRequest> {
        let request_id = uuid::Uuid::new_v4().to_string();
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO agency_requests (request_id, agency_id, username, status)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                request_id,
                agency_id,
                username,
                AgencyRequestStatus::Pending.as_str()
            ],
        )
        .map_err(|e| map_unique(e, "agency request", format!("{} -> {}", username, agency_id)))?;
        Ok(conn.query_row(
            "SELECT request_id, agency_id, username, status, requested_at
             FROM agency_requests WHERE request_id = ?1",
            params![request_id],
            Self::row_to_agency_request,
        )?)
    }
}

impl ChatStore for SqliteStore {
    fn insert_chat_message(
        &self,
        sender: &str,
        recipient: &str,
        content: &str,
    ) -> StoreResult<ChatMessage> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO chat_messages (sender, recipient, content) VALUES (?1, ?2, ?3)",
            params![sender, recipient, content],
        )?;
        let id = conn.last_insert_rowid();
        Ok(conn.query_row(
            "SELECT id, sender, recipient, content, timestamp FROM chat_messages WHERE id = ?1",
            params![id],
            Self::row_to_chat_message,
        )?)
    }

    fn conversation(&self, a: &str, b: &str) -> StoreResult<Vec<ChatMessage>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, sender, recipient, content, timestamp FROM chat_messages
             WHERE (sender = ?1 AND recipient = ?2) OR (sender = ?2 AND recipient = ?1)
             ORDER BY timestamp, id",
        )?;
        let messages = stmt
            .query_map(params![a, b], Self::row_to_chat_message)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(messages)
    }
}
