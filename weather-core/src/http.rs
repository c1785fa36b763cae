//! Timeout-enforcing JSON HTTP client.
//!
//! Owns transport details only: one outbound GET, full body buffering, JSON
//! decoding, and mapping of every failure mode into the error taxonomy.
//! Retries are the caller's decision; none happen here.

use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{Error, Result};

/// Timeout applied to outbound requests unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5_000);

/// Thin wrapper around [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    timeout: Duration,
}

impl HttpClient {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Client with an explicit per-request timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            timeout,
        }
    }

    /// Issue a single GET to `url` and decode the body as JSON.
    ///
    /// Success is any status in [200, 300). Each failure mode maps to a
    /// distinct [`Error::Api`]:
    /// - non-2xx status: `"HTTP status code {code}"` from "External API"
    /// - undecodable 2xx body: `"Error parsing response: ..."` from "JSON Parser"
    /// - transport failure: `"Request error: ..."` from "HTTP Client"
    /// - no response in time: the request is aborted and
    ///   `"Request timeout after {ms}ms"` (408) is produced
    pub async fn fetch_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self
            .http
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|err| self.map_transport_error(&err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::api(
                format!("HTTP status code {}", status.as_u16()),
                status.as_u16(),
                "External API",
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|err| self.map_transport_error(&err))?;

        serde_json::from_str(&body)
            .map_err(|err| Error::api(format!("Error parsing response: {err}"), 500, "JSON Parser"))
    }

    fn map_transport_error(&self, err: &reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::api(
                format!("Request timeout after {}ms", self.timeout.as_millis()),
                408,
                "HTTP Client",
            )
        } else {
            Error::api(format!("Request error: {err}"), 500, "HTTP Client")
        }
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn stub(server: &MockServer, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/data"))
            .respond_with(template)
            .mount(server)
            .await;
    }

    fn data_url(server: &MockServer) -> Url {
        Url::parse(&format!("{}/data", server.uri())).expect("stub URL should parse")
    }

    #[tokio::test]
    async fn decodes_a_successful_json_body() {
        let server = MockServer::start().await;
        stub(&server, ResponseTemplate::new(200).set_body_json(json!({"ok": true}))).await;

        let value: Value = HttpClient::new()
            .fetch_json(data_url(&server))
            .await
            .expect("fetch should succeed");

        assert_eq!(value, json!({"ok": true}));
    }

    #[tokio::test]
    async fn non_2xx_status_maps_to_external_api_error() {
        let server = MockServer::start().await;
        stub(&server, ResponseTemplate::new(404)).await;

        let err = HttpClient::new()
            .fetch_json::<Value>(data_url(&server))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            Error::api("HTTP status code 404", 404, "External API")
        );
    }

    #[tokio::test]
    async fn server_error_status_keeps_its_code() {
        let server = MockServer::start().await;
        stub(&server, ResponseTemplate::new(503)).await;

        let err = HttpClient::new()
            .fetch_json::<Value>(data_url(&server))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 503);
        assert!(err.message().contains("HTTP status code 503"));
    }

    #[tokio::test]
    async fn undecodable_2xx_body_maps_to_json_parser_error() {
        let server = MockServer::start().await;
        stub(&server, ResponseTemplate::new(200).set_body_string("not json")).await;

        let err = HttpClient::new()
            .fetch_json::<Value>(data_url(&server))
            .await
            .unwrap_err();

        let Error::Api {
            message,
            status_code,
            service,
        } = err
        else {
            panic!("expected api error");
        };
        assert!(message.starts_with("Error parsing response:"));
        assert_eq!(status_code, 500);
        assert_eq!(service, "JSON Parser");
    }

    #[tokio::test]
    async fn slow_response_is_aborted_with_a_408() {
        let server = MockServer::start().await;
        stub(
            &server,
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_millis(500)),
        )
        .await;

        let err = HttpClient::with_timeout(Duration::from_millis(50))
            .fetch_json::<Value>(data_url(&server))
            .await
            .unwrap_err();

        assert_eq!(err, Error::api("Request timeout after 50ms", 408, "HTTP Client"));
    }

    #[tokio::test]
    async fn connection_failure_maps_to_http_client_error() {
        // Nothing listens on the reserved port 1.
        let url = Url::parse("http://127.0.0.1:1/data").expect("URL should parse");

        let err = HttpClient::new().fetch_json::<Value>(url).await.unwrap_err();

        let Error::Api {
            message,
            status_code,
            service,
        } = err
        else {
            panic!("expected api error");
        };
        assert!(message.starts_with("Request error:"));
        assert_eq!(status_code, 500);
        assert_eq!(service, "HTTP Client");
    }
}
