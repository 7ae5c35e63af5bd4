//! deploy-smoke: a deployment smoke-test HTTP server.
//!
//! Answers `GET /` on port 3000 with a fixed confirmation message so an
//! operator can verify that a container reached ECS Fargate and is serving.

pub mod config;
pub mod error;
pub mod http;
pub mod routes;

pub use config::ListenConfig;
pub use error::AppError;
pub use http::{start_server, Listener, ServerError};
pub use routes::create_router;
