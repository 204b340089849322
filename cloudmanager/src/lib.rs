//! Client for the NetApp Cloud Manager control-plane API
//!
//! A [`Client`] routes each call to one of the configured backends
//! ([`HostType`]), attaches the authentication and tenancy headers Cloud
//! Manager expects, and hands back the raw status, body and correlation id.

pub mod api;
pub mod config;

pub use api::{ApiError, CallContext, Client, HostType, Request, RequestBody, Response, ResponseError};
pub use config::{ClientConfig, Credentials, Environment, Hosts};
