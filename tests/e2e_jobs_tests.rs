//! End-to-end tests for the job lifecycle and background categorization

mod common;

use common::{
    TestClient, TestServer, NEW_DATA_SCIENCE, OTHER_WORKER, POSTER, UNCATEGORIZED, WORKER,
};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;

async fn wait_for_prompts(server: &TestServer, count: usize) {
    let start = std::time::Instant::now();
    while server.classifier.prompts().len() < count {
        if start.elapsed() > Duration::from_secs(3) {
            panic!("Classifier was not called {} times", count);
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

#[tokio::test]
async fn test_requests_without_identity_are_rejected() {
    let server = TestServer::spawn().await;
    let client = TestClient::anonymous(server.base_url.clone());

    let response = client.list_jobs().await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = client
        .create_job(json!({ "title": "Gardener", "description": "Mow the lawn" }))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_job_starts_uncategorized_then_gets_new_category() {
    let server = TestServer::spawn().await;
    server.classifier.push_answer(NEW_DATA_SCIENCE);
    let poster = TestClient::as_user(server.base_url.clone(), POSTER);

    let response = poster
        .create_job(json!({
            "title": "Data Analyst",
            "description": "Build dashboards for our shop",
            "price": 250.0
        }))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let job: Value = response.json().await.unwrap();
    assert_eq!(job["category"], UNCATEGORIZED);
    assert_eq!(job["status"], "open");
    assert_eq!(job["postedBy"], POSTER);
    let job_id = job["jobId"].as_str().unwrap().to_string();

    let job = server.wait_for_category(&job_id).await;
    assert_eq!(job.category, "Data Science");

    let categories: Value = poster.list_categories().await.json().await.unwrap();
    let created = categories
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == "Data Science")
        .expect("Data Science category should exist");
    assert_eq!(created["jobs"][0]["name"], "Data Analyst");
    assert_eq!(created["types"], json!(["Informal", "Formal", "Temporary"]));

    // The classifier saw the job text
    let prompts = server.classifier.prompts();
    assert!(prompts[0].contains("Data Analyst"));
}

#[tokio::test]
async fn test_existing_category_gains_job_type() {
    let server = TestServer::spawn().await;
    let poster = TestClient::as_user(server.base_url.clone(), POSTER);

    server.classifier.push_answer(NEW_DATA_SCIENCE);
    let first = poster.create_job_ok("Data Analyst", "KPIs").await;
    server.wait_for_category(&first).await;

    server
        .classifier
        .push_answer(r#"{"name": "Data Science", "isNew": false}"#);
    let second = poster.create_job_ok("ML Engineer", "Train models").await;
    let job = server.wait_for_category(&second).await;
    assert_eq!(job.category, "Data Science");

    // The second prompt lists the category created by the first run
    let prompts = server.classifier.prompts();
    assert!(prompts[1].contains("Data Science"));

    let categories: Value = poster.list_categories().await.json().await.unwrap();
    let categories = categories.as_array().unwrap();
    assert_eq!(categories.len(), 1);
    let job_types: Vec<&str> = categories[0]["jobs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["name"].as_str().unwrap())
        .collect();
    assert_eq!(job_types, vec!["Data Analyst", "ML Engineer"]);
}

#[tokio::test]
async fn test_classifier_failure_keeps_placeholder_until_recategorized() {
    let server = TestServer::spawn().await;
    let poster = TestClient::as_user(server.base_url.clone(), POSTER);
    let admin = TestClient::as_admin(server.base_url.clone());

    server.classifier.push_failure();
    let job_id = poster.create_job_ok("Nanny", "Weekend childcare").await;
    wait_for_prompts(&server, 1).await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    let job: Value = poster.get_job(&job_id).await.json().await.unwrap();
    assert_eq!(job["category"], UNCATEGORIZED);

    // A failing manual run reports the upstream error
    server.classifier.push_failure();
    let response = admin.recategorize(&job_id).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    server
        .classifier
        .push_answer(r#"{"name": "Domestic work", "isNew": true}"#);
    let response = admin.recategorize(&job_id).await;
    assert_eq!(response.status(), StatusCode::OK);
    let outcome: Value = response.json().await.unwrap();
    assert_eq!(outcome["job"]["category"], "Domestic work");
    assert_eq!(outcome["categoryCreated"], true);
}

#[tokio::test]
async fn test_recategorize_requires_admin() {
    let server = TestServer::spawn().await;
    let poster = TestClient::as_user(server.base_url.clone(), POSTER);

    let job_id = poster.create_job_ok("Painter", "Two rooms").await;
    let response = poster.recategorize(&job_id).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_job_validation() {
    let server = TestServer::spawn().await;
    let poster = TestClient::as_user(server.base_url.clone(), POSTER);

    let response = poster.create_job(json!({ "title": "   " })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = poster
        .create_job(json!({ "title": "Cook", "price": -5.0 }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_apply_and_hire_flow_notifies_everyone() {
    let server = TestServer::spawn().await;
    let poster = TestClient::as_user(server.base_url.clone(), POSTER);
    let worker = TestClient::as_user(server.base_url.clone(), WORKER);
    let other = TestClient::as_user(server.base_url.clone(), OTHER_WORKER);

    let job_id = poster.create_job_ok("Cook", "Dinner for ten").await;

    // Posters cannot apply to their own job
    let response = poster.apply(&job_id).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(worker.apply(&job_id).await.status(), StatusCode::OK);
    assert_eq!(other.apply(&job_id).await.status(), StatusCode::OK);

    let messages = poster.notification_messages().await;
    assert!(messages.contains(&format!("{} has applied for your job: \"Cook\"!", WORKER)));
    assert!(messages.contains(&format!(
        "{} has applied for your job: \"Cook\"!",
        OTHER_WORKER
    )));

    // Only the poster manages applicants
    let response = worker.handle_applicant(&job_id, WORKER, "accept").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = poster.handle_applicant(&job_id, WORKER, "promote").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = poster.handle_applicant(&job_id, WORKER, "accept").await;
    assert_eq!(response.status(), StatusCode::OK);
    let job: Value = response.json().await.unwrap();
    assert_eq!(job["status"], "assigned");
    assert_eq!(job["assignedTo"], WORKER);
    assert_eq!(job["applicants"], json!([]));

    assert!(worker.notification_messages().await[0].starts_with("Congratulations!"));
    assert!(other.notification_messages().await[0].contains("position has been filled"));

    // Applications close once the job is assigned
    let response = other.apply(&job_id).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reject_applicant() {
    let server = TestServer::spawn().await;
    let poster = TestClient::as_user(server.base_url.clone(), POSTER);
    let worker = TestClient::as_user(server.base_url.clone(), WORKER);

    let job_id = poster.create_job_ok("Cleaner", "Office").await;
    worker.apply(&job_id).await;

    let response = poster.handle_applicant(&job_id, WORKER, "reject").await;
    assert_eq!(response.status(), StatusCode::OK);
    let job: Value = response.json().await.unwrap();
    assert_eq!(job["status"], "open");
    assert_eq!(job["applicants"], json!([]));
    assert!(worker.notification_messages().await[0].starts_with("Unfortunately,"));

    // No longer an applicant
    let response = poster.handle_applicant(&job_id, WORKER, "reject").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_status_transitions() {
    let server = TestServer::spawn().await;
    let poster = TestClient::as_user(server.base_url.clone(), POSTER);
    let worker = TestClient::as_user(server.base_url.clone(), WORKER);
    let stranger = TestClient::as_user(server.base_url.clone(), OTHER_WORKER);

    let job_id = poster.create_job_ok("Driver", "Airport run").await;

    // Cannot start an open job
    let response = poster
        .change_status(&job_id, json!({ "transition": "start" }))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = stranger
        .change_status(&job_id, json!({ "transition": "assign", "worker": WORKER }))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = poster
        .change_status(&job_id, json!({ "transition": "assign", "worker": WORKER }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = worker
        .change_status(&job_id, json!({ "transition": "start" }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let job: Value = response.json().await.unwrap();
    assert_eq!(job["status"], "in-progress");
    assert!(poster
        .notification_messages()
        .await
        .contains(&format!("{} has ACCEPTED the job: \"Driver\"!", WORKER)));

    let response = poster
        .change_status(&job_id, json!({ "transition": "close" }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let job: Value = response.json().await.unwrap();
    assert_eq!(job["status"], "closed");

    // Closed is terminal
    let response = poster
        .change_status(&job_id, json!({ "transition": "close" }))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_delete_job() {
    let server = TestServer::spawn().await;
    let poster = TestClient::as_user(server.base_url.clone(), POSTER);
    let worker = TestClient::as_user(server.base_url.clone(), WORKER);

    let job_id = poster.create_job_ok("Plumber", "Leaky sink").await;

    assert_eq!(
        worker.delete_job(&job_id).await.status(),
        StatusCode::FORBIDDEN
    );
    assert_eq!(poster.delete_job(&job_id).await.status(), StatusCode::OK);
    assert_eq!(poster.get_job(&job_id).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        poster.delete_job(&job_id).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_direct_hire_notifies_worker_after_categorization() {
    let server = TestServer::spawn().await;
    let poster = TestClient::as_user(server.base_url.clone(), POSTER);
    let worker = TestClient::as_user(server.base_url.clone(), WORKER);

    // Self-hire is refused
    let response = poster
        .create_job(json!({ "title": "Babysitter", "assignedTo": POSTER }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    server.classifier.push_answer(r#"{"name": "Domestic work", "isNew": true}"#);
    let response = poster
        .create_job(json!({
            "title": "Babysitter",
            "description": "Saturday night",
            "assignedTo": WORKER
        }))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let job: Value = response.json().await.unwrap();
    assert_eq!(job["status"], "assigned");
    let job_id = job["jobId"].as_str().unwrap().to_string();

    server.wait_for_category(&job_id).await;

    let start = std::time::Instant::now();
    loop {
        let messages = worker.notification_messages().await;
        if messages
            .iter()
            .any(|m| m.starts_with("You have been hired for the job: \"Babysitter\""))
        {
            break;
        }
        if start.elapsed() > Duration::from_secs(3) {
            panic!("Hire notification never arrived: {:?}", messages);
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
