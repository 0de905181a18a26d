mod admin_routes;
pub mod config;
mod error;
mod http_layers;
mod jobs_routes;
pub mod metrics;
pub mod server;
pub mod session;
mod social_routes;
pub mod state;
pub mod websocket;

pub use config::ServerConfig;
pub use error::ApiError;
pub use http_layers::*;
pub use server::{make_app, run_server};
pub use state::ServerState;
