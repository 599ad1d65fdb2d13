//! Fleet platform HTTP client

use super::ApiError;
use crate::models::ApiEnvelope;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client for the fleet platform API.
///
/// Every endpoint is a POST answering with a `{code, data, msg}` envelope.
pub struct FleetClient {
    http_client: Client,
    base_url: String,
    token: Option<String>,
}

impl FleetClient {
    /// Create a new client for the API rooted at `base_url`
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let http_client = Client::builder()
            .user_agent(concat!("fleetconsole/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            http_client,
            base_url,
            token: token.filter(|t| !t.is_empty()),
        })
    }

    /// Get the API base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    fn request(&self, endpoint: &str) -> RequestBuilder {
        let builder = self
            .http_client
            .post(self.url(endpoint))
            .header("Accept", "application/json");

        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// POST a JSON body and decode the envelope
    pub async fn post_json<B, T>(&self, endpoint: &str, body: &B) -> Result<ApiEnvelope<T>, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!(endpoint, "POST with body");
        self.send(endpoint, self.request(endpoint).json(body)).await
    }

    /// POST without a body and decode the envelope
    pub async fn post_empty<T>(&self, endpoint: &str) -> Result<ApiEnvelope<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        tracing::debug!(endpoint, "POST");
        self.send(endpoint, self.request(endpoint)).await
    }

    async fn send<T>(&self, endpoint: &str, request: RequestBuilder) -> Result<ApiEnvelope<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        let response = request.send().await.inspect_err(|e| {
            tracing::warn!(endpoint, error = %e, "request failed");
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(endpoint, %status, "API returned an error status");
            return Err(ApiError::Status { status, body });
        }

        let body = response.text().await?;
        let envelope: ApiEnvelope<T> = serde_json::from_str(&body)?;
        if envelope.code != 0 {
            tracing::info!(endpoint, code = envelope.code, msg = ?envelope.msg, "request rejected");
        }
        Ok(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn test_client(server: &MockServer, token: Option<&str>) -> FleetClient {
        FleetClient::new(
            format!("{}/", server.base_url()),
            token.map(str::to_string),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_post_sends_bearer_token() {
        let server = MockServer::start_async().await;
        let m = server.mock(|when, then| {
            when.method(Method::POST)
                .path("/ping")
                .header("authorization", "Bearer t0k3n");
            then.status(200).json_body(json!({"code": 0, "data": true, "msg": "ok"}));
        });

        let client = test_client(&server, Some("t0k3n"));
        let envelope: ApiEnvelope<bool> = client.post_empty("/ping").await.unwrap();

        m.assert();
        assert!(envelope.into_data().unwrap());
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let server = MockServer::start_async().await;
        let _m = server.mock(|when, then| {
            when.method(Method::POST).path("/broken");
            then.status(502).body("bad gateway");
        });

        let client = test_client(&server, None);
        let err = client
            .post_empty::<serde_json::Value>("broken")
            .await
            .unwrap_err();

        match err {
            ApiError::Status { status, body } => {
                assert_eq!(status.as_u16(), 502);
                assert_eq!(body, "bad gateway");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_envelope_body_is_a_decode_error() {
        let server = MockServer::start_async().await;
        let _m = server.mock(|when, then| {
            when.method(Method::POST).path("/html");
            then.status(200).body("<html>login</html>");
        });

        let client = test_client(&server, None);
        let err = client
            .post_empty::<serde_json::Value>("html")
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_a_transport_error() {
        let client =
            FleetClient::new("http://127.0.0.1:1", None, Duration::from_secs(2)).unwrap();
        let err = client
            .post_empty::<serde_json::Value>("user/page")
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Transport(_)));
        assert_eq!(err.user_message("Failed to load user list"), "Failed to load user list");
    }
}
