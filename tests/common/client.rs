//! HTTP client for end-to-end tests
//!
//! Wraps reqwest and provides one method per route. Identity travels in the
//! `X-User` and `X-Role` headers.
//!
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::{RequestBuilder, Response};
use serde_json::{json, Value};
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    pub base_url: String,
    user: Option<String>,
    admin: bool,
}

impl TestClient {
    fn build(base_url: String, user: Option<&str>, admin: bool) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self {
            client,
            base_url,
            user: user.map(str::to_string),
            admin,
        }
    }

    /// A client sending no identity headers.
    pub fn anonymous(base_url: String) -> Self {
        Self::build(base_url, None, false)
    }

    pub fn as_user(base_url: String, username: &str) -> Self {
        Self::build(base_url, Some(username), false)
    }

    pub fn as_admin(base_url: String) -> Self {
        Self::build(base_url, Some(ADMIN_USER), true)
    }

    fn with_identity(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = match &self.user {
            Some(user) => builder.header("X-User", user),
            None => builder,
        };
        if self.admin {
            builder.header("X-Role", "admin")
        } else {
            builder
        }
    }

    async fn get(&self, path: &str) -> Response {
        self.with_identity(self.client.get(format!("{}/v1{}", self.base_url, path)))
            .send()
            .await
            .expect("GET request failed")
    }

    async fn post(&self, path: &str, body: Value) -> Response {
        self.with_identity(self.client.post(format!("{}/v1{}", self.base_url, path)))
            .json(&body)
            .send()
            .await
            .expect("POST request failed")
    }

    async fn put(&self, path: &str, body: Value) -> Response {
        self.with_identity(self.client.put(format!("{}/v1{}", self.base_url, path)))
            .json(&body)
            .send()
            .await
            .expect("PUT request failed")
    }

    async fn delete(&self, path: &str) -> Response {
        self.with_identity(self.client.delete(format!("{}/v1{}", self.base_url, path)))
            .send()
            .await
            .expect("DELETE request failed")
    }

    // ========================================================================
    // Jobs
    // ========================================================================

    /// POST /v1/jobs
    pub async fn create_job(&self, body: Value) -> Response {
        self.post("/jobs", body).await
    }

    /// Creates a job and returns its id, asserting 201.
    pub async fn create_job_ok(&self, title: &str, description: &str) -> String {
        let response = self
            .create_job(json!({ "title": title, "description": description }))
            .await;
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        let job: Value = response.json().await.expect("Invalid job JSON");
        job["jobId"].as_str().expect("Missing jobId").to_string()
    }

    /// GET /v1/jobs
    pub async fn list_jobs(&self) -> Response {
        self.get("/jobs").await
    }

    /// GET /v1/jobs/{id}
    pub async fn get_job(&self, id: &str) -> Response {
        self.get(&format!("/jobs/{}", id)).await
    }

    /// DELETE /v1/jobs/{id}
    pub async fn delete_job(&self, id: &str) -> Response {
        self.delete(&format!("/jobs/{}", id)).await
    }

    /// POST /v1/jobs/{id}/apply
    pub async fn apply(&self, id: &str) -> Response {
        self.post(&format!("/jobs/{}/apply", id), json!({})).await
    }

    /// POST /v1/jobs/{id}/applicants/{username}/handle
    pub async fn handle_applicant(&self, id: &str, applicant: &str, action: &str) -> Response {
        self.post(
            &format!("/jobs/{}/applicants/{}/handle", id, applicant),
            json!({ "action": action }),
        )
        .await
    }

    /// POST /v1/jobs/{id}/status
    pub async fn change_status(&self, id: &str, transition: Value) -> Response {
        self.post(&format!("/jobs/{}/status", id), transition).await
    }

    /// GET /v1/categories
    pub async fn list_categories(&self) -> Response {
        self.get("/categories").await
    }

    // ========================================================================
    // Social
    // ========================================================================

    /// POST /v1/users/{username}/follow
    pub async fn follow(&self, username: &str) -> Response {
        self.post(&format!("/users/{}/follow", username), json!({}))
            .await
    }

    /// POST /v1/users/{username}/unfollow
    pub async fn unfollow(&self, username: &str) -> Response {
        self.post(&format!("/users/{}/unfollow", username), json!({}))
            .await
    }

    /// GET /v1/users/{username}/followers
    pub async fn followers(&self, username: &str) -> Response {
        self.get(&format!("/users/{}/followers", username)).await
    }

    /// POST /v1/ratings
    pub async fn rate(&self, job_id: &str, rated: &str, rating: u8) -> Response {
        self.post(
            "/ratings",
            json!({ "jobId": job_id, "rated": rated, "rating": rating }),
        )
        .await
    }

    /// GET /v1/users/{username}/ratings
    pub async fn rating_summary(&self, username: &str) -> Response {
        self.get(&format!("/users/{}/ratings", username)).await
    }

    /// POST /v1/agencies/{agency_id}/requests
    pub async fn request_agency_join(&self, agency_id: &str) -> Response {
        self.post(&format!("/agencies/{}/requests", agency_id), json!({}))
            .await
    }

    /// GET /v1/notifications
    pub async fn notifications(&self) -> Response {
        self.get("/notifications").await
    }

    /// Notification messages for this client, newest first.
    pub async fn notification_messages(&self) -> Vec<String> {
        let body: Value = self
            .notifications()
            .await
            .json()
            .await
            .expect("Invalid notifications JSON");
        body.as_array()
            .expect("Notifications should be an array")
            .iter()
            .filter_map(|n| n["message"].as_str().map(str::to_string))
            .collect()
    }

    /// GET /v1/notifications/unread-count
    pub async fn unread_count(&self) -> Response {
        self.get("/notifications/unread-count").await
    }

    /// POST /v1/notifications/mark-read
    pub async fn mark_read(&self, ids: &[i64]) -> Response {
        self.post("/notifications/mark-read", json!({ "ids": ids }))
            .await
    }

    /// GET /v1/chat/history/{username}
    pub async fn chat_history(&self, username: &str) -> Response {
        self.get(&format!("/chat/history/{}", username)).await
    }

    // ========================================================================
    // Admin
    // ========================================================================

    /// POST /v1/admin/jobs/{id}/recategorize
    pub async fn recategorize(&self, id: &str) -> Response {
        self.post(&format!("/admin/jobs/{}/recategorize", id), json!({}))
            .await
    }

    /// POST /v1/admin/categories
    pub async fn create_category(&self, name: &str) -> Response {
        self.post("/admin/categories", json!({ "name": name })).await
    }

    /// POST /v1/admin/categories/{name}/jobs
    pub async fn add_job_type(&self, category: &str, name: &str) -> Response {
        self.post(
            &format!("/admin/categories/{}/jobs", category),
            json!({ "name": name }),
        )
        .await
    }

    /// PUT /v1/admin/categories/{name}/config
    pub async fn update_category_config(&self, category: &str, body: Value) -> Response {
        self.put(&format!("/admin/categories/{}/config", category), body)
            .await
    }

    /// GET /v1/admin/event-logs
    pub async fn event_logs(&self) -> Response {
        self.get("/admin/event-logs").await
    }

    /// DELETE /v1/admin/event-logs
    pub async fn cleanup_event_logs(&self) -> Response {
        self.delete("/admin/event-logs").await
    }

    /// GET /v1/admin/settings
    pub async fn settings(&self) -> Response {
        self.get("/admin/settings").await
    }

    /// PUT /v1/admin/settings
    pub async fn update_settings(&self, patch: Value) -> Response {
        self.put("/admin/settings", patch).await
    }

    /// GET /v1/admin/about-content
    pub async fn about_content(&self) -> Response {
        self.get("/admin/about-content").await
    }

    /// PUT /v1/admin/about-content
    pub async fn replace_about_content(&self, content: Value) -> Response {
        self.put("/admin/about-content", content).await
    }
}
