//! Response types and status checking for Cloud Manager API calls

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::ApiError;

pub const REQUEST_ID_HEADER: &str = "OnCloud-Request-Id";

/// Raw outcome of one round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
    /// Correlation id from `OnCloud-Request-Id`, empty when absent
    pub request_id: String,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_slice(&self.body).map_err(|e| {
            tracing::error!(
                "Failed to deserialize response: {}, body: {}",
                e,
                String::from_utf8_lossy(&self.body)
            );
            ApiError::Decode(e)
        })
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Error payload returned by Cloud Manager
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("code: {code}, message: {message}, name: {name}")]
#[serde(default)]
pub struct ResponseError {
    pub code: i64,
    pub message: String,
    pub name: String,
}

/// Turn a non-2xx response into an error, passing successes through
pub fn check_response(response: Response) -> Result<Response, ApiError> {
    if response.is_success() {
        return Ok(response);
    }

    let Response {
        status,
        body,
        request_id,
    } = response;

    match serde_json::from_slice::<ResponseError>(&body) {
        Ok(error) if !error.message.is_empty() || !error.name.is_empty() => {
            tracing::debug!("API error {} (request id {:?}): {}", status, request_id, error);
            Err(ApiError::Api {
                status,
                request_id,
                error,
            })
        }
        _ => Err(ApiError::Status {
            status,
            request_id,
            body: String::from_utf8_lossy(&body).into_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> Response {
        Response {
            status,
            body: body.as_bytes().to_vec(),
            request_id: "req-1".to_string(),
        }
    }

    #[test]
    fn response_error_formats_all_fields() {
        let error = ResponseError {
            code: 400,
            message: "Volume name already exists".to_string(),
            name: "BadRequest".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "code: 400, message: Volume name already exists, name: BadRequest"
        );
    }

    #[test]
    fn response_error_tolerates_missing_fields() {
        let error: ResponseError = serde_json::from_str(r#"{"message":"boom"}"#).unwrap();
        assert_eq!(error.code, 0);
        assert_eq!(error.message, "boom");
        assert!(error.name.is_empty());
    }

    #[test]
    fn success_passes_through() {
        let ok = check_response(response(202, "{}")).unwrap();
        assert_eq!(ok.status, 202);
        assert_eq!(ok.request_id, "req-1");
    }

    #[test]
    fn structured_error_body_is_decoded() {
        let result = check_response(response(
            409,
            r#"{"code":409,"message":"conflict","name":"Conflict"}"#,
        ));

        match result {
            Err(ApiError::Api {
                status,
                request_id,
                error,
            }) => {
                assert_eq!(status, 409);
                assert_eq!(request_id, "req-1");
                assert_eq!(error.name, "Conflict");
            }
            other => panic!("expected ApiError::Api, got {:?}", other),
        }
    }

    #[test]
    fn unstructured_error_body_is_kept_as_text() {
        let result = check_response(response(502, "<html>bad gateway</html>"));
        assert!(matches!(
            result,
            Err(ApiError::Status { status: 502, ref body, .. }) if body.contains("bad gateway")
        ));
    }

    #[test]
    fn json_decodes_body() {
        #[derive(Deserialize)]
        struct Env {
            name: String,
        }

        let env: Env = response(200, r#"{"name":"cvo1"}"#).json().unwrap();
        assert_eq!(env.name, "cvo1");

        let result = response(200, "not json").json::<Env>();
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }
}
