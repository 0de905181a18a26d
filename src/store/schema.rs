//! SQLite schema for the marketplace database.
//!
//! Structured fields that a document store would nest (applicants, job types,
//! event details) are kept as JSON text columns.

use crate::sqlite_column;
use crate::sqlite_persistence::{Column, SqlType, Table, VersionedSchema, DEFAULT_TIMESTAMP};

const JOBS_TABLE_V1: Table = Table {
    name: "jobs",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("job_id", &SqlType::Text, non_null = true, is_unique = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("description", &SqlType::Text, non_null = true),
        sqlite_column!("category", &SqlType::Text, non_null = true),
        sqlite_column!("posted_by", &SqlType::Text, non_null = true),
        sqlite_column!("location", &SqlType::Text),
        sqlite_column!("price", &SqlType::Real),
        sqlite_column!("status", &SqlType::Text, non_null = true),
        sqlite_column!("assigned_to", &SqlType::Text),
        sqlite_column!("applicants", &SqlType::Text, non_null = true),
        sqlite_column!(
            "created_at",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[
        ("idx_jobs_category", "category"),
        ("idx_jobs_posted_by", "posted_by"),
    ],
    unique_constraints: &[],
};

const JOB_CATEGORIES_TABLE_V1: Table = Table {
    name: "job_categories",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true, is_unique = true),
        sqlite_column!("types", &SqlType::Text, non_null = true),
        sqlite_column!("jobs", &SqlType::Text, non_null = true),
        sqlite_column!("image_path", &SqlType::Text, non_null = true),
        sqlite_column!("use_category_default_image", &SqlType::Integer, non_null = true),
        sqlite_column!(
            "created_at",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[],
    unique_constraints: &[],
};

const NOTIFICATIONS_TABLE_V1: Table = Table {
    name: "notifications",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("recipient", &SqlType::Text, non_null = true),
        sqlite_column!("message", &SqlType::Text, non_null = true),
        sqlite_column!("link", &SqlType::Text, non_null = true),
        sqlite_column!("is_read", &SqlType::Integer, non_null = true, default_value = Some("0")),
        sqlite_column!(
            "created_at",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_notifications_recipient", "recipient, created_at DESC")],
    unique_constraints: &[],
};

const EVENT_LOGS_TABLE_V1: Table = Table {
    name: "event_logs",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("event_type", &SqlType::Text, non_null = true),
        sqlite_column!("actor", &SqlType::Text, non_null = true),
        sqlite_column!("details", &SqlType::Text, non_null = true),
        sqlite_column!("target", &SqlType::Text),
        sqlite_column!("context", &SqlType::Text),
        sqlite_column!(
            "created_at",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_event_logs_created_at", "created_at DESC")],
    unique_constraints: &[],
};

const RATINGS_TABLE_V1: Table = Table {
    name: "ratings",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("job_id", &SqlType::Text, non_null = true),
        sqlite_column!("rated", &SqlType::Text, non_null = true),
        sqlite_column!("rater", &SqlType::Text, non_null = true),
        sqlite_column!("rating", &SqlType::Integer, non_null = true),
        sqlite_column!("comment", &SqlType::Text),
        sqlite_column!(
            "created_at",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_ratings_rated", "rated")],
    unique_constraints: &[&["job_id", "rater"]],
};

const FOLLOWS_TABLE_V1: Table = Table {
    name: "follows",
    columns: &[
        sqlite_column!("username", &SqlType::Text, non_null = true),
        sqlite_column!("follower", &SqlType::Text, non_null = true),
        sqlite_column!(
            "created_at",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_follows_follower", "follower")],
    unique_constraints: &[&["username", "follower"]],
};

const AGENCY_REQUESTS_TABLE_V1: Table = Table {
    name: "agency_requests",
    columns: &[
        sqlite_column!("request_id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("agency_id", &SqlType::Text, non_null = true),
        sqlite_column!("username", &SqlType::Text, non_null = true),
        sqlite_column!("status", &SqlType::Text, non_null = true),
        sqlite_column!(
            "requested_at",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[],
    unique_constraints: &[&["agency_id", "username"]],
};

const CHAT_MESSAGES_TABLE_V1: Table = Table {
    name: "chat_messages",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("sender", &SqlType::Text, non_null = true),
        sqlite_column!("recipient", &SqlType::Text, non_null = true),
        sqlite_column!("content", &SqlType::Text, non_null = true),
        sqlite_column!(
            "timestamp",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_chat_messages_pair", "sender, recipient")],
    unique_constraints: &[],
};

pub const MARKETPLACE_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 1,
    tables: &[
        JOBS_TABLE_V1,
        JOB_CATEGORIES_TABLE_V1,
        NOTIFICATIONS_TABLE_V1,
        EVENT_LOGS_TABLE_V1,
        RATINGS_TABLE_V1,
        FOLLOWS_TABLE_V1,
        AGENCY_REQUESTS_TABLE_V1,
        CHAT_MESSAGES_TABLE_V1,
    ],
    migration: None,
}];
