//! End-to-end tests for the realtime WebSocket hub

mod common;

use common::ws::{
    connect_as, connect_ws, send_message, wait_for_content, wait_for_message, WS_WAIT,
};
use common::{TestClient, TestServer, NEW_DATA_SCIENCE, POSTER, WORKER};
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn test_connected_greeting_and_ping() {
    let server = TestServer::spawn().await;
    let mut ws = connect_ws(&server.base_url).await;

    send_message(&mut ws, "ping", Value::Null).await;
    let pong = wait_for_message(&mut ws, "pong", WS_WAIT).await;
    assert!(pong.is_some(), "Should receive pong");
}

#[tokio::test]
async fn test_presence_roster_and_announcements() {
    let server = TestServer::spawn().await;

    let mut poster_ws = connect_as(&server.base_url, POSTER).await;

    let mut worker_ws = connect_ws(&server.base_url).await;
    send_message(&mut worker_ws, "init", json!(WORKER)).await;
    let roster = wait_for_message(&mut worker_ws, "online_users", WS_WAIT)
        .await
        .expect("Should receive roster");
    let roster: Vec<String> = serde_json::from_value(roster["payload"].clone()).unwrap();
    assert!(roster.contains(&POSTER.to_string()));
    assert!(roster.contains(&WORKER.to_string()));

    let online = wait_for_message(&mut poster_ws, "user_online", WS_WAIT)
        .await
        .expect("Poster should see the worker come online");
    assert_eq!(online["payload"], WORKER);

    drop(worker_ws);
    let offline = wait_for_message(&mut poster_ws, "user_offline", WS_WAIT)
        .await
        .expect("Poster should see the worker go offline");
    assert_eq!(offline["payload"], WORKER);
}

#[tokio::test]
async fn test_invalid_init_and_unknown_type_report_errors() {
    let server = TestServer::spawn().await;
    let mut ws = connect_ws(&server.base_url).await;

    send_message(&mut ws, "init", json!({ "username": 42 })).await;
    let error = wait_for_message(&mut ws, "error", WS_WAIT)
        .await
        .expect("Should receive error");
    assert_eq!(error["payload"]["code"], "invalid_init");

    send_message(&mut ws, "dance", Value::Null).await;
    let error = wait_for_message(&mut ws, "error", WS_WAIT)
        .await
        .expect("Should receive error");
    assert_eq!(error["payload"]["code"], "unknown_type");
}

#[tokio::test]
async fn test_notification_pushed_to_connected_recipient() {
    let server = TestServer::spawn().await;
    let poster = TestClient::as_user(server.base_url.clone(), POSTER);
    let worker = TestClient::as_user(server.base_url.clone(), WORKER);

    let job_id = poster.create_job_ok("Tutor", "Maths, twice a week").await;
    let mut poster_ws = connect_as(&server.base_url, POSTER).await;

    assert_eq!(worker.apply(&job_id).await.status(), StatusCode::OK);

    let pushed = wait_for_message(&mut poster_ws, "notification", WS_WAIT)
        .await
        .expect("Poster should get a live notification");
    assert_eq!(
        pushed["payload"]["message"],
        format!("{} has applied for your job: \"Tutor\"!", WORKER)
    );
    assert_eq!(pushed["payload"]["isRead"], false);

    // Also stored for later
    let unread: Value = poster.unread_count().await.json().await.unwrap();
    assert_eq!(unread["unreadCount"], 1);
}

#[tokio::test]
async fn test_job_creation_and_categorization_are_broadcast() {
    let server = TestServer::spawn().await;
    let poster = TestClient::as_user(server.base_url.clone(), POSTER);
    let mut observer = connect_ws(&server.base_url).await;

    server.classifier.push_answer(NEW_DATA_SCIENCE);
    let job_id = poster.create_job_ok("Data Analyst", "Dashboards").await;

    let created = wait_for_content(&mut observer, "content_created", "jobs", WS_WAIT)
        .await
        .expect("Should see the new job");
    assert_eq!(created["payload"]["data"]["jobId"], job_id.as_str());

    let category = wait_for_content(&mut observer, "content_created", "jobCategories", WS_WAIT)
        .await
        .expect("Should see the new category");
    assert_eq!(category["payload"]["data"]["name"], "Data Science");

    let updated = wait_for_content(&mut observer, "content_updated", "jobs", WS_WAIT)
        .await
        .expect("Should see the categorized job");
    assert_eq!(updated["payload"]["data"]["category"], "Data Science");
}

#[tokio::test]
async fn test_chat_is_delivered_echoed_and_stored() {
    let server = TestServer::spawn().await;
    let mut poster_ws = connect_as(&server.base_url, POSTER).await;
    let mut worker_ws = connect_as(&server.base_url, WORKER).await;

    send_message(
        &mut poster_ws,
        "chat",
        json!({ "recipient": WORKER, "content": "Can you start Monday?" }),
    )
    .await;

    let received = wait_for_message(&mut worker_ws, "chat", WS_WAIT)
        .await
        .expect("Recipient should receive the chat");
    assert_eq!(received["payload"]["sender"], POSTER);
    assert_eq!(received["payload"]["content"], "Can you start Monday?");

    let echo = wait_for_message(&mut poster_ws, "chat", WS_WAIT)
        .await
        .expect("Sender should receive the echo");
    assert_eq!(echo["payload"]["timestamp"], received["payload"]["timestamp"]);

    let worker = TestClient::as_user(server.base_url.clone(), WORKER);
    let history: Value = worker.chat_history(POSTER).await.json().await.unwrap();
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["content"], "Can you start Monday?");
}

#[tokio::test]
async fn test_chat_requires_init() {
    let server = TestServer::spawn().await;
    let mut ws = connect_ws(&server.base_url).await;

    send_message(
        &mut ws,
        "chat",
        json!({ "recipient": WORKER, "content": "hello" }),
    )
    .await;
    let error = wait_for_message(&mut ws, "error", WS_WAIT)
        .await
        .expect("Should receive error");
    assert_eq!(error["payload"]["code"], "not_announced");

    let history = server.store.conversation("", WORKER).unwrap();
    assert!(history.is_empty());
}

#[tokio::test]
async fn test_chat_to_offline_user_is_still_stored() {
    let server = TestServer::spawn().await;
    let mut poster_ws = connect_as(&server.base_url, POSTER).await;

    send_message(
        &mut poster_ws,
        "chat",
        json!({ "recipient": WORKER, "content": "Call me back" }),
    )
    .await;
    wait_for_message(&mut poster_ws, "chat", WS_WAIT)
        .await
        .expect("Sender should receive the echo");

    let history = server.store.conversation(WORKER, POSTER).unwrap();
    assert_eq!(history.len(), 1);
}
