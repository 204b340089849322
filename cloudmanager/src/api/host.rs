//! Host types and the route table that maps them to configured endpoints

use std::fmt;
use std::str::FromStr;

use super::error::ApiError;
use crate::config::Hosts;

/// Backend endpoint a call is sent to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostType {
    CloudManagerHost,
    AuthHost,
    SaAuthHost,
    GcpDeploymentManager,
    CvsHostName,
    GcpCompute,
}

/// Routing rules for a host type
#[derive(Clone, Copy)]
pub struct Route {
    pub base_url: fn(&Hosts) -> &str,
    /// Authentication endpoints never carry tenancy context
    pub clears_account_id: bool,
    pub gcp: bool,
}

impl Route {
    fn row(base_url: fn(&Hosts) -> &str, clears_account_id: bool, gcp: bool) -> Self {
        Self {
            base_url,
            clears_account_id,
            gcp,
        }
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("clears_account_id", &self.clears_account_id)
            .field("gcp", &self.gcp)
            .finish()
    }
}

fn cloud_manager(hosts: &Hosts) -> &str {
    &hosts.cloud_manager
}

fn auth(hosts: &Hosts) -> &str {
    &hosts.auth
}

fn sa_auth(hosts: &Hosts) -> &str {
    &hosts.sa_auth
}

fn gcp_deployment_manager(hosts: &Hosts) -> &str {
    &hosts.gcp_deployment_manager
}

fn cvs(hosts: &Hosts) -> &str {
    &hosts.cvs
}

fn gcp_compute(hosts: &Hosts) -> &str {
    &hosts.gcp_compute
}

impl HostType {
    pub const ALL: [HostType; 6] = [
        HostType::CloudManagerHost,
        HostType::AuthHost,
        HostType::SaAuthHost,
        HostType::GcpDeploymentManager,
        HostType::CvsHostName,
        HostType::GcpCompute,
    ];

    #[rustfmt::skip]
    pub fn route(self) -> Route {
        match self {
            HostType::CloudManagerHost     => Route::row(cloud_manager,          false, false),
            HostType::AuthHost             => Route::row(auth,                   true,  false),
            HostType::SaAuthHost           => Route::row(sa_auth,                true,  false),
            HostType::GcpDeploymentManager => Route::row(gcp_deployment_manager, false, true),
            HostType::CvsHostName          => Route::row(cvs,                    false, false),
            HostType::GcpCompute           => Route::row(gcp_compute,            false, true),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HostType::CloudManagerHost => "CloudManagerHost",
            HostType::AuthHost => "AuthHost",
            HostType::SaAuthHost => "SaAuthHost",
            HostType::GcpDeploymentManager => "GCPDeploymentManager",
            HostType::CvsHostName => "CVSHostName",
            HostType::GcpCompute => "GCPCompute",
        }
    }
}

impl fmt::Display for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HostType {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HostType::ALL
            .into_iter()
            .find(|host| host.as_str() == s)
            .ok_or_else(|| ApiError::UnknownHostType(s.to_string()))
    }
}
