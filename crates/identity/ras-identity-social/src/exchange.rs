//! HTTP exchanges with provider endpoints.

use crate::config::ClientOptions;
use crate::error::{SocialError, SocialResult};
use crate::json::check_response;
use crate::types::Token;
use reqwest::header::{CONNECTION, CONTENT_TYPE, HOST, HeaderMap, HeaderValue};
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Thin wrapper over the shared reqwest client. Performs no retries; every
/// transport failure surfaces as [`SocialError::HttpError`].
#[derive(Clone)]
pub struct HttpExchange {
    http_client: Client,
}

impl HttpExchange {
    pub fn new(options: &ClientOptions) -> SocialResult<Self> {
        let mut builder =
            Client::builder().timeout(Duration::from_secs(options.http_timeout_seconds));
        if let Some(user_agent) = &options.user_agent {
            builder = builder.user_agent(user_agent);
        }

        Ok(Self {
            http_client: builder.build()?,
        })
    }

    pub fn from_client(http_client: Client) -> Self {
        Self { http_client }
    }

    /// POSTs to a fully built token URL (authorization-code or refresh grant)
    /// and parses the body into a [`Token`].
    pub async fn exchange_token(&self, token_url: &str) -> SocialResult<Token> {
        let payload = self.post_form(token_url).await?;
        let token = Token::from_response(&payload).inspect_err(|e| {
            error!("Token exchange failed: {}", e);
        })?;

        debug!(
            "Token exchange succeeded, expires_in={}, refreshable={}",
            token.expires_in(),
            token.refresh_token().is_some()
        );
        Ok(token)
    }

    /// Form-encoded POST with an empty body; parameters travel in the URL.
    pub async fn post_form(&self, url: &str) -> SocialResult<Value> {
        let mut headers = base_headers(url)?;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_URLENCODED));

        let response = self.http_client.post(url).headers(headers).send().await?;
        read_json(response).await
    }

    /// Bearer-authenticated GET returning the JSON body.
    pub async fn get_json(&self, url: &str, access_token: &str) -> SocialResult<Value> {
        let response = self
            .http_client
            .get(url)
            .headers(base_headers(url)?)
            .bearer_auth(access_token)
            .send()
            .await?;
        read_json(response).await
    }
}

/// `Host` and keep-alive hints derived from the target URL.
fn base_headers(url: &str) -> SocialResult<HeaderMap> {
    let parsed = Url::parse(url)?;
    let host = match (parsed.host_str(), parsed.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => {
            return Err(SocialError::ConfigError(format!(
                "endpoint has no host: {}",
                url
            )));
        }
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        HOST,
        HeaderValue::from_str(&host)
            .map_err(|_| SocialError::ConfigError(format!("invalid host: {}", host)))?,
    );
    headers.insert(CONNECTION, HeaderValue::from_static("Keep-Alive"));
    Ok(headers)
}

/// Providers report errors as JSON on 4xx responses too, so the body is
/// parsed regardless of status. A non-2xx body without an error shape is
/// still a failure.
async fn read_json(response: Response) -> SocialResult<Value> {
    let status = response.status();
    let body = response.text().await?;
    let parsed = serde_json::from_str::<Value>(&body);

    if status.is_success() {
        return parsed.map_err(|e| {
            SocialError::MalformedResponse(format!("response body is not JSON: {}", e))
        });
    }

    if let Ok(payload) = &parsed {
        check_response(payload)?;
    }
    error!("Provider request failed with status {}: {}", status, body);
    Err(SocialError::UnexpectedStatus {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn exchange() -> HttpExchange {
        HttpExchange::new(&ClientOptions::default()).unwrap()
    }

    #[test]
    fn test_base_headers() {
        let headers = base_headers("https://www.linkedin.com/oauth/v2/accessToken").unwrap();
        assert_eq!(headers[HOST], "www.linkedin.com");
        assert_eq!(headers[CONNECTION], "Keep-Alive");

        let headers = base_headers("http://127.0.0.1:8080/token").unwrap();
        assert_eq!(headers[HOST], "127.0.0.1:8080");
    }

    #[tokio::test]
    async fn test_exchange_token_posts_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(query_param("grant_type", "authorization_code"))
            .and(header("Content-Type", FORM_URLENCODED))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "abc",
                "expires_in": 3600
            })))
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/token?grant_type=authorization_code", server.uri());
        let token = exchange().exchange_token(&url).await.unwrap();
        assert_eq!(token.access_token(), "abc");
        assert_eq!(token.expires_in(), 3600);
        assert!(token.refresh_token().is_none());
    }

    #[tokio::test]
    async fn test_error_body_on_bad_request_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "invalid_grant",
                "error_description": "expired"
            })))
            .mount(&server)
            .await;

        let err = exchange()
            .exchange_token(&format!("{}/token", server.uri()))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "expired");
    }

    #[tokio::test]
    async fn test_non_json_bodies() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/html"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let err = exchange()
            .get_json(&format!("{}/broken", server.uri()), "t")
            .await
            .unwrap_err();
        assert!(matches!(err, SocialError::UnexpectedStatus { status: 502, .. }));

        let err = exchange()
            .get_json(&format!("{}/html", server.uri()), "t")
            .await
            .unwrap_err();
        assert!(matches!(err, SocialError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_json_body_on_failed_status_is_not_a_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "serviceErrorCode": 65600,
                "message": "Invalid access token",
                "status": 401
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "access_token": "abc",
                "expires_in": 3600
            })))
            .mount(&server)
            .await;

        let err = exchange()
            .get_json(&format!("{}/me", server.uri()), "t")
            .await
            .unwrap_err();
        match err {
            SocialError::UnexpectedStatus { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("Invalid access token"));
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let err = exchange()
            .exchange_token(&format!("{}/token", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, SocialError::UnexpectedStatus { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_get_json_sends_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me"))
            .and(header("Authorization", "Bearer secret-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "1"})))
            .expect(1)
            .mount(&server)
            .await;

        let payload = exchange()
            .get_json(&format!("{}/me", server.uri()), "secret-token")
            .await
            .unwrap();
        assert_eq!(payload["id"], "1");
    }

    #[tokio::test]
    async fn test_transport_failure_is_http_error() {
        // Nothing listens on port 9 of the loopback interface.
        let err = exchange()
            .get_json("http://127.0.0.1:9/me", "t")
            .await
            .unwrap_err();
        assert!(matches!(err, SocialError::HttpError(_)));
    }
}
