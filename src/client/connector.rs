use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use tracing::{debug, warn};
use url::Url;

use super::error::{NacError, classify};

pub(crate) type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

type TransportResult = Result<HttpResponse, Box<dyn StdError + Send + Sync>>;

/// A raw HTTP exchange, before any error classification.
#[derive(Debug, Clone)]
pub(crate) struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// An outgoing request as the connector hands it to the transport.
#[derive(Debug, Clone)]
pub(crate) struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Option<serde_json::Value>,
}

/// The seam between the resource clients and the wire.
///
/// Production uses [`ReqwestTransport`]; tests substitute a fake that
/// records requests and replays queued responses.
pub(crate) trait HttpTransport: Send + Sync {
    fn send<'a>(&'a self, request: HttpRequest) -> BoxFuture<'a, TransportResult>;
}

pub(crate) struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub(crate) fn new(
        timeout: Option<Duration>,
        user_agent: Option<&str>,
    ) -> Result<Self, NacError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = user_agent {
            builder = builder.user_agent(user_agent);
        }
        let client = builder
            .build()
            .map_err(|err| NacError::Connection(Box::new(err)))?;
        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn send<'a>(&'a self, request: HttpRequest) -> BoxFuture<'a, TransportResult> {
        Box::pin(async move {
            let mut builder = self.client.request(request.method, &request.url);
            for (name, value) in &request.headers {
                builder = builder.header(*name, value);
            }
            if let Some(body) = &request.body {
                builder = builder.json(body);
            }
            let response = builder.send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

/// Shared request plumbing for every resource client: URL assembly,
/// gateway headers, and the single pass through [`classify`].
#[derive(Clone)]
pub(crate) struct ApiConnector {
    transport: Arc<dyn HttpTransport>,
    base_url: Url,
    token: String,
    dev_mode: bool,
}

impl fmt::Debug for ApiConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConnector")
            .field("base_url", &self.base_url.as_str())
            .field("dev_mode", &self.dev_mode)
            .finish_non_exhaustive()
    }
}

impl ApiConnector {
    pub(crate) fn new(
        transport: Arc<dyn HttpTransport>,
        base_url: Url,
        token: impl Into<String>,
        dev_mode: bool,
    ) -> Self {
        Self {
            transport,
            base_url,
            token: token.into(),
            dev_mode,
        }
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.as_str().trim_end_matches('/'))
    }

    fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = vec![("X-RapidAPI-Key", self.token.clone())];
        if self.dev_mode {
            headers.push(("X-Testmode", "true".to_owned()));
        }
        headers
    }

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<HttpResponse, NacError> {
        let url = self.url_for(path);
        debug!(%method, %url, "dispatching gateway request");
        let request = HttpRequest {
            method,
            url,
            headers: self.headers(),
            body,
        };
        let response = self
            .transport
            .send(request)
            .await
            .map_err(NacError::Connection)?;
        if let Some(err) = classify(response.status, &response.body) {
            warn!(status = response.status, %path, "gateway request failed");
            return Err(err);
        }
        Ok(response)
    }

    pub(crate) async fn get(&self, path: &str) -> Result<String, NacError> {
        let response = self.dispatch(Method::GET, path, None).await?;
        Ok(response.body)
    }

    pub(crate) async fn post(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<String, NacError> {
        let response = self.dispatch(Method::POST, path, Some(body)).await?;
        Ok(response.body)
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), NacError> {
        self.dispatch(Method::DELETE, path, None).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{FakeTransport, connector, connector_with};
    use super::*;

    #[tokio::test]
    async fn requests_carry_the_gateway_token() {
        let transport = FakeTransport::new();
        transport.push_response(200, "{}");
        let api = connector(transport.clone());

        api.get("qod/v0/sessions").await.unwrap();

        let request = transport.last_request();
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.url, "https://gateway.test/qod/v0/sessions");
        assert!(
            request
                .headers
                .contains(&("X-RapidAPI-Key", "test-token".to_owned()))
        );
        assert!(!request.headers.iter().any(|(name, _)| *name == "X-Testmode"));
    }

    #[tokio::test]
    async fn dev_mode_adds_the_testmode_header() {
        let transport = FakeTransport::new();
        transport.push_response(200, "{}");
        let api = connector_with(transport.clone(), true);

        api.get("slice/v1/slices").await.unwrap();

        assert!(
            transport
                .last_request()
                .headers
                .contains(&("X-Testmode", "true".to_owned()))
        );
    }

    #[tokio::test]
    async fn post_attaches_the_json_body() {
        let transport = FakeTransport::new();
        transport.push_response(201, "{}");
        let api = connector(transport.clone());

        api.post("qod/v0/sessions", serde_json::json!({"qosProfile": "QOS_L"}))
            .await
            .unwrap();

        assert_eq!(
            transport.last_request().body,
            Some(serde_json::json!({"qosProfile": "QOS_L"}))
        );
    }

    #[tokio::test]
    async fn non_success_responses_are_classified() {
        let transport = FakeTransport::new();
        transport.push_response(404, "");
        let api = connector(transport);

        let err = api.get("qod/v0/sessions/missing").await.unwrap_err();
        assert!(matches!(err, NacError::NotFound { .. }));
    }

    #[tokio::test]
    async fn transport_failures_become_connection_errors() {
        let transport = FakeTransport::new();
        transport.push_failure("connection refused");
        let api = connector(transport);

        let err = api.get("qod/v0/sessions").await.unwrap_err();
        assert!(matches!(err, NacError::Connection(_)));
    }

    #[tokio::test]
    async fn delete_discards_the_body() {
        let transport = FakeTransport::new();
        transport.push_response(200, r#"{"ignored": true}"#);
        let api = connector(transport.clone());

        api.delete("qod/v0/sessions/session-1").await.unwrap();
        assert_eq!(transport.last_request().method, Method::DELETE);
    }
}
