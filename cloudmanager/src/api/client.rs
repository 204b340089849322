use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{Instrument, Span};

use super::error::ApiError;
use super::host::HostType;
use super::request::{Request, RequestContext};
use super::response::{check_response, Response, REQUEST_ID_HEADER};
use crate::config::ClientConfig;

/// Cloud Manager API client
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    config: ClientConfig,
    span: Span,
}

/// Per-call identity: who is calling and on behalf of which account
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallContext<'a> {
    pub token: Option<&'a str>,
    pub account_id: Option<&'a str>,
    pub client_id: Option<&'a str>,
    pub simulator: bool,
}

impl<'a> CallContext<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(mut self, token: &'a str) -> Self {
        self.token = Some(token);
        self
    }

    pub fn account_id(mut self, account_id: &'a str) -> Self {
        self.account_id = Some(account_id);
        self
    }

    pub fn client_id(mut self, client_id: &'a str) -> Self {
        self.client_id = Some(client_id);
        self
    }

    pub fn simulator(mut self, simulator: bool) -> Self {
        self.simulator = simulator;
        self
    }
}

impl Client {
    /// Create a new API client logging under a `cloudmanager` span
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        Self::with_span(config, tracing::info_span!("cloudmanager"))
    }

    /// Create a new API client whose calls are all recorded under `span`
    pub fn with_span(config: ClientConfig, span: Span) -> Result<Self, ApiError> {
        let http_client = config.pool.build_client().map_err(ApiError::Request)?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http_client,
                config,
                span,
            }),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// A call context seeded with the configured simulator flag
    pub fn context(&self) -> CallContext<'static> {
        CallContext::new().simulator(self.inner.config.simulator)
    }

    /// Resolve the host route and build the request without sending it
    pub fn prepare<P: Serialize>(
        &self,
        host: HostType,
        base_path: &str,
        request: &Request<P>,
        ctx: &CallContext<'_>,
    ) -> Result<reqwest::Request, ApiError> {
        let route = host.route();
        let config = &self.inner.config;

        let account_id = if route.clears_account_id {
            None
        } else {
            ctx.account_id
        };

        let request_ctx = RequestContext {
            host: (route.base_url)(&config.hosts),
            base_path,
            token: ctx.token,
            audience: &config.audience,
            account_id,
            client_id: ctx.client_id,
            gcp: route.gcp,
            simulator: ctx.simulator,
        };

        request.build(&self.inner.http_client, &request_ctx)
    }

    /// Execute one request and return status, body and correlation id
    ///
    /// The status code is not interpreted; see [`Client::call_api`] for that.
    pub async fn execute<P: Serialize>(
        &self,
        host: HostType,
        base_path: &str,
        request: &Request<P>,
        ctx: &CallContext<'_>,
    ) -> Result<Response, ApiError> {
        let span = self.inner.span.clone();
        self.round_trip(host, base_path, request, ctx)
            .instrument(span)
            .await
    }

    /// Execute a request and fail on any non-2xx status
    pub async fn call_api<P: Serialize>(
        &self,
        host: HostType,
        base_path: &str,
        request: &Request<P>,
        ctx: &CallContext<'_>,
    ) -> Result<Response, ApiError> {
        check_response(self.execute(host, base_path, request, ctx).await?)
    }

    /// Execute a request, fail on any non-2xx status and decode the body
    pub async fn call_api_json<T: DeserializeOwned, P: Serialize>(
        &self,
        host: HostType,
        base_path: &str,
        request: &Request<P>,
        ctx: &CallContext<'_>,
    ) -> Result<T, ApiError> {
        self.call_api(host, base_path, request, ctx).await?.json()
    }

    async fn round_trip<P: Serialize>(
        &self,
        host: HostType,
        base_path: &str,
        request: &Request<P>,
        ctx: &CallContext<'_>,
    ) -> Result<Response, ApiError> {
        let http_request = self.prepare(host, base_path, request, ctx)?;

        tracing::debug!(
            "{} request to {} ({})",
            http_request.method(),
            http_request.url(),
            host
        );

        let response = match self.inner.http_client.execute(http_request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Request to {}{} failed: {}", host, base_path, e);
                return Err(ApiError::Transport(e));
            }
        };

        let status = response.status().as_u16();
        let request_id = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        tracing::debug!("Response status: {}, request id: {:?}", status, request_id);

        let body = match response.bytes().await {
            Ok(body) if !body.is_empty() => body.to_vec(),
            Ok(_) => return Err(ApiError::NoResult { status }),
            Err(e) => {
                tracing::warn!("Failed to read response body from {}: {}", host, e);
                return Err(ApiError::NoResult { status });
            }
        };

        Ok(Response {
            status,
            body,
            request_id,
        })
    }
}
