//! Outbound request construction: body encoding and header policy

use std::borrow::Cow;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, REFERER};
use reqwest::Method;
use serde::Serialize;
use url::Url;

use super::error::ApiError;

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const TOOL_MARKER: &str = "Terraform";
pub const USER_TOKEN_HEADER: &str = "X-User-Token";
pub const TENANCY_ACCOUNT_HEADER: &str = "X-Tenancy-Account-Id";
pub const AGENT_ID_HEADER: &str = "X-Agent-Id";
pub const SIMULATOR_HEADER: &str = "x-simulator";
pub const AGENT_ID_SUFFIX: &str = "clients";

/// What to send as the request body
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody<P = serde_json::Value> {
    Empty,
    Json(P),
    /// Pre-rendered body sent verbatim, used for GCP deployment templates
    Raw(String),
}

/// A single API call: method plus body
#[derive(Debug, Clone, PartialEq)]
pub struct Request<P = serde_json::Value> {
    method: Method,
    body: RequestBody<P>,
}

/// Everything the builder needs to know about where a request goes
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestContext<'a> {
    pub host: &'a str,
    pub base_path: &'a str,
    pub token: Option<&'a str>,
    /// Part of the auth contract, not sent as a header
    pub audience: &'a str,
    pub account_id: Option<&'a str>,
    pub client_id: Option<&'a str>,
    pub gcp: bool,
    pub simulator: bool,
}

impl Request {
    pub fn get() -> Self {
        Self::new(Method::GET, RequestBody::Empty)
    }

    pub fn delete() -> Self {
        Self::new(Method::DELETE, RequestBody::Empty)
    }

    pub fn raw(method: Method, body: impl Into<String>) -> Self {
        Self::new(method, RequestBody::Raw(body.into()))
    }
}

impl<P> Request<P> {
    pub fn new(method: Method, body: RequestBody<P>) -> Self {
        Self { method, body }
    }

    pub fn post(params: P) -> Self {
        Self::new(Method::POST, RequestBody::Json(params))
    }

    pub fn put(params: P) -> Self {
        Self::new(Method::PUT, RequestBody::Json(params))
    }

    pub fn patch(params: P) -> Self {
        Self::new(Method::PATCH, RequestBody::Json(params))
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn body(&self) -> &RequestBody<P> {
        &self.body
    }

    fn is_write(&self) -> bool {
        matches!(self.method, Method::POST | Method::PUT | Method::PATCH)
    }
}

impl<P: Serialize> Request<P> {
    /// Build a ready-to-send request without performing any I/O
    pub fn build(
        &self,
        http: &reqwest::Client,
        ctx: &RequestContext<'_>,
    ) -> Result<reqwest::Request, ApiError> {
        let token = present(ctx.token);
        if ctx.gcp && token.is_none() {
            return Err(ApiError::MissingGcpToken);
        }

        let body = self.encode_body(ctx.gcp)?;

        let raw_url = format!("{}{}", ctx.host, ctx.base_path);
        let url = Url::parse(&raw_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{:?}: {}", raw_url, e)))?;

        let mut builder = http.request(self.method.clone(), url);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        builder = builder
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .header(REFERER, TOOL_MARKER);

        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        if let Some(account_id) = present(ctx.account_id) {
            if let Some(token) = token {
                builder = builder.header(USER_TOKEN_HEADER, format!("Bearer {}", token));
            }
            builder = builder.header(TENANCY_ACCOUNT_HEADER, account_id);
        }

        if let Some(client_id) = present(ctx.client_id) {
            builder = builder.header(AGENT_ID_HEADER, agent_id(client_id).as_ref());
        }

        if ctx.simulator {
            builder = builder.header(SIMULATOR_HEADER, "true");
        }

        builder.build().map_err(ApiError::Request)
    }

    fn encode_body(&self, gcp: bool) -> Result<Option<Vec<u8>>, ApiError> {
        // GCP reads carry no body at all
        if gcp && !self.is_write() {
            return Ok(None);
        }

        match &self.body {
            RequestBody::Empty => Ok(None),
            RequestBody::Raw(template) => Ok(Some(template.clone().into_bytes())),
            RequestBody::Json(params) => serde_json::to_vec(params)
                .map(Some)
                .map_err(ApiError::Encode),
        }
    }
}

/// Normalize a client id into the agent identity Cloud Manager expects
pub fn agent_id(client_id: &str) -> Cow<'_, str> {
    if client_id.ends_with(AGENT_ID_SUFFIX) {
        Cow::Borrowed(client_id)
    } else {
        Cow::Owned(format!("{}{}", client_id, AGENT_ID_SUFFIX))
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
