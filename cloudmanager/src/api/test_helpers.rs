//! Test helpers for the Cloud Manager API

use crate::config::{ClientConfig, Hosts};

/// Point every host at `url`, the service account host at its token path
pub fn test_hosts(url: &str) -> Hosts {
    Hosts {
        cloud_manager: url.to_string(),
        auth: url.to_string(),
        sa_auth: format!("{}/auth/oauth/token", url),
        cvo: None,
        gcp_deployment_manager: url.to_string(),
        cvs: url.to_string(),
        gcp_compute: url.to_string(),
    }
}

pub fn create_test_client(url: &str) -> super::Client {
    super::Client::new(ClientConfig::default().with_hosts(test_hosts(url))).unwrap()
}

mod tests {
    use super::super::request::{AGENT_ID_HEADER, TENANCY_ACCOUNT_HEADER, USER_TOKEN_HEADER};
    use super::super::*;
    use super::*;
    use serde_json::json;

    fn header<'a>(request: &'a reqwest::Request, name: &str) -> Option<&'a str> {
        request.headers().get(name).and_then(|v| v.to_str().ok())
    }

    #[test]
    fn test_connection_pool_config() {
        use pool::ConnectionPoolConfig;

        let config = ConnectionPoolConfig::default();
        assert_eq!(config.max_idle_connections, 10);
        assert_eq!(config.idle_timeout.as_secs(), 90);
        assert_eq!(config.connection_timeout.as_secs(), 10);
        assert_eq!(config.request_timeout.as_secs(), 120);
        assert_eq!(config.tcp_keepalive.unwrap().as_secs(), 30);
        assert!(!config.insecure);
    }

    #[test]
    fn test_poll_config() {
        let config = PollConfig::default();
        assert_eq!(config.retries, 60);
        assert_eq!(config.interval.as_secs(), 10);
    }

    #[test]
    fn prepare_builds_cloud_manager_request() {
        let client = create_test_client("https://cm.example.com");
        let ctx = CallContext::new()
            .token("abc")
            .account_id("acct1")
            .client_id("agent1");

        let request = client
            .prepare(
                HostType::CloudManagerHost,
                "/vol",
                &Request::post(json!({"name": "vol1"})),
                &ctx,
            )
            .unwrap();

        assert_eq!(request.url().as_str(), "https://cm.example.com/vol");
        assert_eq!(
            request.body().and_then(|b| b.as_bytes()),
            Some(br#"{"name":"vol1"}"#.as_slice())
        );
        assert_eq!(header(&request, "authorization"), Some("Bearer abc"));
        assert_eq!(header(&request, USER_TOKEN_HEADER), Some("Bearer abc"));
        assert_eq!(header(&request, TENANCY_ACCOUNT_HEADER), Some("acct1"));
        assert_eq!(header(&request, AGENT_ID_HEADER), Some("agent1clients"));
    }

    #[test]
    fn prepare_clears_account_for_auth_hosts() {
        let client = create_test_client("https://cm.example.com");
        let ctx = CallContext::new().token("abc").account_id("acct1");

        for host in [HostType::AuthHost, HostType::SaAuthHost] {
            let request = client
                .prepare(host, "", &Request::post(json!({})), &ctx)
                .unwrap();

            assert!(header(&request, TENANCY_ACCOUNT_HEADER).is_none(), "{}", host);
            assert!(header(&request, USER_TOKEN_HEADER).is_none(), "{}", host);
            assert_eq!(header(&request, "authorization"), Some("Bearer abc"));
        }
    }

    #[test]
    fn prepare_keeps_account_for_other_hosts() {
        let client = create_test_client("https://cm.example.com");
        let ctx = CallContext::new().token("abc").account_id("acct1");

        for host in HostType::ALL
            .into_iter()
            .filter(|host| !host.route().clears_account_id)
        {
            let request = client
                .prepare(host, "/x", &Request::get(), &ctx)
                .unwrap();
            assert_eq!(header(&request, TENANCY_ACCOUNT_HEADER), Some("acct1"), "{}", host);
        }
    }

    #[test]
    fn prepare_rejects_gcp_hosts_without_token() {
        let client = create_test_client("https://cm.example.com");
        let ctx = CallContext::new().account_id("acct1");

        for host in [HostType::GcpCompute, HostType::GcpDeploymentManager] {
            let result = client.prepare(host, "/compute/v1/projects", &Request::get(), &ctx);
            assert!(matches!(result, Err(ApiError::MissingGcpToken)), "{}", host);
        }
    }

    #[test]
    fn prepare_reports_empty_host() {
        let mut hosts = test_hosts("https://cm.example.com");
        hosts.cvs = String::new();
        let client = Client::new(ClientConfig::default().with_hosts(hosts)).unwrap();

        let result = client.prepare(
            HostType::CvsHostName,
            "/v2/volumes",
            &Request::get(),
            &CallContext::new(),
        );
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn context_carries_configured_simulator_flag() {
        let config = ClientConfig::default()
            .with_hosts(test_hosts("https://cm.example.com"))
            .with_simulator(true);
        let client = Client::new(config).unwrap();

        let ctx = client.context();
        assert!(ctx.simulator);

        let request = client
            .prepare(HostType::CloudManagerHost, "/x", &Request::get(), &ctx)
            .unwrap();
        assert_eq!(header(&request, "x-simulator"), Some("true"));
    }

    #[test]
    fn test_api_error_formatting() {
        let error = ApiError::Api {
            status: 400,
            request_id: "req-9".to_string(),
            error: ResponseError {
                code: 400,
                message: "Bad Request".to_string(),
                name: "InvalidInput".to_string(),
            },
        };

        let error_str = error.to_string();
        assert!(error_str.contains("HTTP 400"));
        assert!(error_str.contains("req-9"));
        assert!(error_str.contains("Bad Request"));

        let error = ApiError::NoResult { status: 204 };
        assert_eq!(error.to_string(), "No result returned (HTTP 204)");
    }
}
