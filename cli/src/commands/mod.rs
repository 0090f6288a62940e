//! CLI Commands

pub mod areas;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod reports;

use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("{message} ({code})")]
    Api { code: String, message: String },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("config file: {0}")]
    TomlRead(#[from] toml::de::Error),

    #[error("config file: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error("{0}")]
    Config(String),

    #[error("not signed in, run `reporta login <username>` first")]
    NotSignedIn,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: bool,
    data: Option<serde_json::Value>,
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: String,
    message: String,
}

/// Page of results as the API returns it
#[derive(Debug, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

/// API client
pub struct ApiClient {
    pub base_url: String,
    pub token: Option<String>,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self, CliError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("reporta-cli/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(String::from),
            client,
        })
    }

    pub fn is_signed_in(&self) -> bool {
        self.token.is_some()
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, CliError> {
        self.send(self.request(Method::GET, path)).await
    }

    pub async fn get_query<T: DeserializeOwned, Q: Serialize + ?Sized>(&self, path: &str, query: &Q) -> Result<T, CliError> {
        self.send(self.request(Method::GET, path).query(query)).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<T, CliError> {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<T, CliError> {
        self.send(self.request(Method::PUT, path).json(body)).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let req = self.client.request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Unwrap the `data` of the response envelope, or turn its `error`
    /// into [`CliError::Api`].
    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, CliError> {
        let resp = req.send().await?;
        let status = resp.status();
        let envelope: Envelope = resp.json().await?;
        match (envelope.success, envelope.data, envelope.error) {
            (true, Some(data), _) => Ok(serde_json::from_value(data)?),
            (_, _, Some(error)) => Err(CliError::Api { code: error.code, message: error.message }),
            _ => Err(CliError::Api {
                code: status.as_u16().to_string(),
                message: "no data in response".into(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_unwraps_data_and_sends_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/reports"))
            .and(query_param("status", "pending"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": { "items": [], "total": 0, "page": 1, "per_page": 20, "total_pages": 0 },
                "error": null
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(&format!("{}/api/v1/", server.uri()), Some("tok")).unwrap();
        let page: Page<Value> = client.get_query("/reports", &[("status", "pending")]).await.unwrap();
        assert_eq!(page.total, 0);
        assert_eq!(page.page, 1);
    }

    #[tokio::test]
    async fn test_error_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/reports/7/status"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "success": false,
                "data": null,
                "error": { "code": "terminal_status", "message": "approved is final" }
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri(), None).unwrap();
        let err = client
            .put::<Value, _>("/reports/7/status", &json!({ "status": "pending" }))
            .await
            .unwrap_err();
        match err {
            CliError::Api { code, .. } => assert_eq!(code, "terminal_status"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(!client.is_signed_in());
    }
}
