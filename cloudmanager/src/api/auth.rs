//! Access token acquisition for Cloud Manager

use serde::{Deserialize, Serialize};

use super::host::HostType;
use super::request::Request;
use super::{ApiError, Client};
use crate::config::Credentials;

pub const TOKEN_PATH: &str = "/oauth/token";

#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

#[derive(Serialize)]
struct RefreshTokenGrant<'a> {
    grant_type: &'static str,
    refresh_token: &'a str,
    client_id: &'a str,
}

#[derive(Serialize)]
struct ClientCredentialsGrant<'a> {
    grant_type: &'static str,
    client_id: &'a str,
    client_secret: &'a str,
    audience: &'a str,
}

impl Client {
    /// Exchange a refresh token for an access token
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<AccessToken, ApiError> {
        let grant = RefreshTokenGrant {
            grant_type: "refresh_token",
            refresh_token,
            client_id: &self.config().auth_client_id,
        };

        self.call_api_json(
            HostType::AuthHost,
            TOKEN_PATH,
            &Request::post(grant),
            &self.context(),
        )
        .await
    }

    /// Obtain an access token for a service account
    pub async fn service_account_token(
        &self,
        client_id: &str,
        client_secret: &str,
    ) -> Result<AccessToken, ApiError> {
        let grant = ClientCredentialsGrant {
            grant_type: "client_credentials",
            client_id,
            client_secret,
            audience: &self.config().audience,
        };

        // the service account host is already the full token endpoint
        self.call_api_json(
            HostType::SaAuthHost,
            "",
            &Request::post(grant),
            &self.context(),
        )
        .await
    }

    /// Obtain an access token using the configured credentials
    pub async fn access_token(&self) -> Result<AccessToken, ApiError> {
        match &self.config().credentials {
            Credentials::ServiceAccount {
                client_id,
                client_secret,
            } => self.service_account_token(client_id, client_secret).await,
            Credentials::RefreshToken(token) => self.refresh_access_token(token).await,
            Credentials::None => Err(ApiError::MissingCredentials),
        }
    }
}
