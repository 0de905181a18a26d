//! Caller identity for HTTP handlers.
//!
//! Authentication happens upstream; requests arrive with the username in
//! `X-User` and, for administrators, `X-Role: admin`.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::debug;

use crate::actor::Actor;
use crate::store::RequestContext;

pub const HEADER_USER: &str = "x-user";
pub const HEADER_ROLE: &str = "x-role";
pub const ROLE_ADMIN: &str = "admin";

/// An [`Actor`] that carries the admin role.
#[derive(Debug, Clone)]
pub struct AdminActor(pub Actor);

pub enum SessionExtractionError {
    Unauthenticated,
    NotAdmin,
}

impl IntoResponse for SessionExtractionError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            SessionExtractionError::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, "Authentication required.")
            }
            SessionExtractionError::NotAdmin => {
                (StatusCode::FORBIDDEN, "Administrator access required.")
            }
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn request_context(parts: &Parts) -> RequestContext {
    let forwarded = header_str(&parts.headers, "x-forwarded-for")
        .and_then(|v| v.split(',').next())
        .map(|ip| ip.trim().to_string());
    let ip_address = forwarded.or_else(|| {
        parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
    });
    RequestContext {
        ip_address,
        user_agent: header_str(&parts.headers, "user-agent").map(str::to_string),
    }
}

fn extract_actor(parts: &Parts) -> Option<Actor> {
    let username = match header_str(&parts.headers, HEADER_USER) {
        Some(username) => username.to_string(),
        None => {
            debug!("No {} header on request.", HEADER_USER);
            return None;
        }
    };
    let is_admin = header_str(&parts.headers, HEADER_ROLE)
        .is_some_and(|role| role.eq_ignore_ascii_case(ROLE_ADMIN));

    Some(Actor {
        username,
        is_admin,
        context: request_context(parts),
    })
}

impl<S: Send + Sync> FromRequestParts<S> for Actor {
    type Rejection = SessionExtractionError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        extract_actor(parts).ok_or(SessionExtractionError::Unauthenticated)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for AdminActor {
    type Rejection = SessionExtractionError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let actor = extract_actor(parts).ok_or(SessionExtractionError::Unauthenticated)?;
        if !actor.is_admin {
            debug!("{} is not an admin", actor.username);
            return Err(SessionExtractionError::NotAdmin);
        }
        Ok(AdminActor(actor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/v1/jobs");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn missing_user_is_unauthenticated() {
        let mut parts = parts(&[]);
        let result = Actor::from_request_parts(&mut parts, &()).await;
        assert!(matches!(
            result,
            Err(SessionExtractionError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn actor_carries_request_context() {
        let mut parts = parts(&[
            ("X-User", "ann"),
            ("User-Agent", "tests/1.0"),
            ("X-Forwarded-For", "10.0.0.7, 172.16.0.1"),
        ]);
        let actor = Actor::from_request_parts(&mut parts, &()).await.ok().unwrap();

        assert_eq!(actor.username, "ann");
        assert!(!actor.is_admin);
        assert_eq!(actor.context.ip_address.as_deref(), Some("10.0.0.7"));
        assert_eq!(actor.context.user_agent.as_deref(), Some("tests/1.0"));
    }

    #[tokio::test]
    async fn admin_requires_role() {
        let mut plain = parts(&[("X-User", "ann")]);
        assert!(matches!(
            AdminActor::from_request_parts(&mut plain, &()).await,
            Err(SessionExtractionError::NotAdmin)
        ));

        let mut admin = parts(&[("X-User", "root"), ("X-Role", "Admin")]);
        let AdminActor(actor) = AdminActor::from_request_parts(&mut admin, &())
            .await
            .ok()
            .unwrap();
        assert!(actor.is_admin);
    }
}
