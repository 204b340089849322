//! Client configuration: endpoints, credentials and environment overrides

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::api::pool::ConnectionPoolConfig;

pub const ENV_ENVIRONMENT: &str = "CLOUDMANAGER_ENVIRONMENT";
pub const ENV_REFRESH_TOKEN: &str = "CLOUDMANAGER_REFRESH_TOKEN";
pub const ENV_SA_CLIENT_ID: &str = "CLOUDMANAGER_SA_CLIENT_ID";
pub const ENV_SA_SECRET_KEY: &str = "CLOUDMANAGER_SA_SECRET_KEY";
pub const ENV_SIMULATOR: &str = "CLOUDMANAGER_SIMULATOR";
pub const ENV_CVO_HOSTNAME: &str = "CLOUDMANAGER_CVO_HOSTNAME";

/// OAuth client id used when exchanging a refresh token
pub const DEFAULT_AUTH_CLIENT_ID: &str = "Mu0V1ywgYteI6w1MbD15fKfVIUrNXGWC";

pub const DEFAULT_AUDIENCE: &str = "https://api.cloud.netapp.com";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown environment {0:?}, expected \"prod\" or \"stage\"")]
    UnknownEnvironment(String),

    #[error("invalid value {value:?} for {name}")]
    InvalidValue { name: &'static str, value: String },

    #[error("{0} is set but {1} is missing")]
    Incomplete(&'static str, &'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Prod,
    Stage,
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "prod" | "" => Ok(Environment::Prod),
            "stage" => Ok(Environment::Stage),
            _ => Err(ConfigError::UnknownEnvironment(s.to_string())),
        }
    }
}

/// Base URLs of every backend the client talks to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hosts {
    pub cloud_manager: String,
    pub auth: String,
    /// Full token endpoint URL, requests use an empty base path
    pub sa_auth: String,
    pub cvo: Option<String>,
    pub gcp_deployment_manager: String,
    pub cvs: String,
    pub gcp_compute: String,
}

impl Hosts {
    pub fn for_environment(environment: Environment) -> Self {
        let (cloud_manager, auth, sa_auth, cvs) = match environment {
            Environment::Prod => (
                "https://cloudmanager.cloud.netapp.com",
                "https://netapp-cloud-account.auth0.com",
                "https://cloudmanager.cloud.netapp.com/auth/oauth/token",
                "https://api.services.cloud.netapp.com",
            ),
            Environment::Stage => (
                "https://staging.cloudmanager.cloud.netapp.com",
                "https://staging-netapp-cloud-account.auth0.com",
                "https://staging.cloudmanager.cloud.netapp.com/auth/oauth/token",
                "https://staging.api.services.cloud.netapp.com",
            ),
        };

        Self {
            cloud_manager: cloud_manager.to_string(),
            auth: auth.to_string(),
            sa_auth: sa_auth.to_string(),
            cvo: None,
            gcp_deployment_manager: "https://www.googleapis.com".to_string(),
            cvs: cvs.to_string(),
            gcp_compute: "https://compute.googleapis.com".to_string(),
        }
    }
}

#[derive(Clone, Default, PartialEq, Eq)]
pub enum Credentials {
    #[default]
    None,
    RefreshToken(String),
    ServiceAccount {
        client_id: String,
        client_secret: String,
    },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::None => f.write_str("None"),
            Credentials::RefreshToken(_) => f.write_str("RefreshToken(<redacted>)"),
            Credentials::ServiceAccount { client_id, .. } => f
                .debug_struct("ServiceAccount")
                .field("client_id", client_id)
                .field("client_secret", &"<redacted>")
                .finish(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub hosts: Hosts,
    pub audience: String,
    pub auth_client_id: String,
    pub credentials: Credentials,
    pub simulator: bool,
    pub pool: ConnectionPoolConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(Environment::Prod)
    }
}

impl ClientConfig {
    pub fn new(environment: Environment) -> Self {
        Self {
            hosts: Hosts::for_environment(environment),
            audience: DEFAULT_AUDIENCE.to_string(),
            auth_client_id: DEFAULT_AUTH_CLIENT_ID.to_string(),
            credentials: Credentials::None,
            simulator: false,
            pool: ConnectionPoolConfig::default(),
        }
    }

    pub fn with_hosts(mut self, hosts: Hosts) -> Self {
        self.hosts = hosts;
        self
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_simulator(mut self, simulator: bool) -> Self {
        self.simulator = simulator;
        self
    }

    /// Build a configuration from `CLOUDMANAGER_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env_var(ENV_ENVIRONMENT) {
            Some(value) => value.parse()?,
            None => Environment::Prod,
        };

        let mut config = Self::new(environment);
        config.hosts.cvo = env_var(ENV_CVO_HOSTNAME);

        let refresh_token = env_var(ENV_REFRESH_TOKEN);
        let sa_client_id = env_var(ENV_SA_CLIENT_ID);
        let sa_secret = env_var(ENV_SA_SECRET_KEY);

        config.credentials = match (sa_client_id, sa_secret, refresh_token) {
            (Some(client_id), Some(client_secret), _) => Credentials::ServiceAccount {
                client_id,
                client_secret,
            },
            (Some(_), None, _) => {
                return Err(ConfigError::Incomplete(ENV_SA_CLIENT_ID, ENV_SA_SECRET_KEY))
            }
            (None, Some(_), _) => {
                return Err(ConfigError::Incomplete(ENV_SA_SECRET_KEY, ENV_SA_CLIENT_ID))
            }
            (None, None, Some(token)) => Credentials::RefreshToken(token),
            (None, None, None) => Credentials::None,
        };

        if let Some(value) = env_var(ENV_SIMULATOR) {
            config.simulator = value
                .parse::<bool>()
                .map_err(|_| ConfigError::InvalidValue {
                    name: ENV_SIMULATOR,
                    value,
                })?;
        }

        tracing::debug!(
            "Loaded configuration for {:?}, credentials: {:?}",
            environment,
            config.credentials
        );

        Ok(config)
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}
