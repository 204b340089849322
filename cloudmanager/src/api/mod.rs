//! Cloud Manager REST API client

pub mod auth;
pub mod client;
pub mod error;
pub mod host;
pub mod pool;
pub mod request;
pub mod response;
pub mod task;

#[cfg(test)]
mod test_helpers;

pub use auth::AccessToken;
pub use client::{CallContext, Client};
pub use error::ApiError;
pub use host::{HostType, Route};
pub use request::{Request, RequestBody, RequestContext};
pub use response::{check_response, Response, ResponseError};
pub use task::{PollConfig, TaskState, TaskStatus};
