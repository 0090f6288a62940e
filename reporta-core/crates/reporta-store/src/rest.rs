//! Hosted backend adapters
//!
//! [`RestStore`] speaks PostgREST (`/rest/v1/{table}`) and
//! [`RestObjectStorage`] speaks the Storage API
//! (`/storage/v1/object/{bucket}/{path}`). Both authenticate with the
//! project key sent as `apikey` and as a bearer token.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::ports::{ObjectStorage, RelationalStore};
use crate::query::{Condition, Filter, Op, Query};
use crate::{Result, Row, StoreError};

/// Request timeout for both adapters
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

fn build_client(api_key: &str) -> Result<reqwest::Client> {
    let mut headers = header::HeaderMap::new();
    let key = header::HeaderValue::from_str(api_key)
        .map_err(|_| StoreError::Config("API key is not a valid header value".into()))?;
    let bearer = header::HeaderValue::from_str(&format!("Bearer {api_key}"))
        .map_err(|_| StoreError::Config("API key is not a valid header value".into()))?;
    headers.insert("apikey", key);
    headers.insert(header::AUTHORIZATION, bearer);
    headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

    Ok(reqwest::Client::builder()
        .default_headers(headers)
        .timeout(DEFAULT_TIMEOUT)
        .build()?)
}

async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    #[derive(Deserialize)]
    struct ErrorBody {
        message: String,
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|e| e.message)
        .unwrap_or(body);
    tracing::warn!(status = status.as_u16(), %message, "backend request failed");
    Err(StoreError::Backend { status: status.as_u16(), message })
}

// =============================================================================
// PostgREST
// =============================================================================

pub struct RestStore {
    base_url: String,
    http: reqwest::Client,
}

impl RestStore {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        Url::parse(base_url)?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: build_client(api_key)?,
        })
    }

    fn table_url(&self, table: &str, filter: &Filter) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/rest/v1/{}", self.base_url, table))?;
        {
            let mut pairs = url.query_pairs_mut();
            for condition in &filter.all {
                pairs.append_pair(&condition.column, &render_condition(condition));
            }
            if !filter.any.is_empty() {
                let group: Vec<String> = filter
                    .any
                    .iter()
                    .map(|c| format!("{}.{}", c.column, quote(&render_condition(c))))
                    .collect();
                pairs.append_pair("or", &format!("({})", group.join(",")));
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        tracing::debug!(%method, %url, "postgrest request");
        self.http.request(method, url)
    }
}

/// `op.value` as PostgREST expects it in a query parameter.
fn render_condition(condition: &Condition) -> String {
    match (&condition.value, condition.op) {
        (Value::Null, Op::Eq) => "is.null".to_string(),
        (Value::Null, Op::Neq) => "not.is.null".to_string(),
        (Value::String(pattern), Op::ILike) => format!("ilike.{}", pattern.replace('%', "*")),
        (Value::String(text), op) => format!("{}.{}", op.as_str(), text),
        (other, op) => format!("{}.{}", op.as_str(), other),
    }
}

/// Quote the value part of `op.value` for use inside an `or=(...)` group.
fn quote(rendered: &str) -> String {
    match rendered.split_once('.') {
        Some((op, value)) if op != "is" && op != "not" => {
            format!("{}.\"{}\"", op, value.replace('\\', "\\\\").replace('"', "\\\""))
        }
        _ => rendered.to_string(),
    }
}

/// Total from a `Content-Range` header such as `0-24/3573` or `*/0`.
fn parse_content_range(value: &str) -> Option<u64> {
    value.rsplit_once('/')?.1.trim().parse().ok()
}

#[async_trait]
impl RelationalStore for RestStore {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Row>> {
        let mut url = self.table_url(table, &query.filter)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("select", "*");
            if !query.order.is_empty() {
                let order: Vec<String> = query
                    .order
                    .iter()
                    .map(|o| format!("{}.{}", o.column, if o.ascending { "asc" } else { "desc" }))
                    .collect();
                pairs.append_pair("order", &order.join(","));
            }
            if query.offset > 0 {
                pairs.append_pair("offset", &query.offset.to_string());
            }
            if let Some(limit) = query.limit {
                pairs.append_pair("limit", &limit.to_string());
            }
        }
        let response = check(self.request(Method::GET, url).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn count(&self, table: &str, filter: &Filter) -> Result<u64> {
        let mut url = self.table_url(table, filter)?;
        url.query_pairs_mut().append_pair("select", "*");
        let response = check(
            self.request(Method::HEAD, url)
                .header("Prefer", "count=exact")
                .send()
                .await?,
        )
        .await?;
        response
            .headers()
            .get(header::CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range)
            .ok_or_else(|| StoreError::Backend {
                status: response.status().as_u16(),
                message: "missing Content-Range total".into(),
            })
    }

    async fn insert(&self, table: &str, record: Row) -> Result<Row> {
        let url = self.table_url(table, &Filter::new())?;
        let response = check(
            self.request(Method::POST, url)
                .header("Prefer", "return=representation")
                .json(&record)
                .send()
                .await?,
        )
        .await?;
        let mut rows: Vec<Row> = response.json().await?;
        if rows.is_empty() {
            return Err(StoreError::Backend {
                status: StatusCode::OK.as_u16(),
                message: format!("insert into {table} returned no row"),
            });
        }
        Ok(rows.swap_remove(0))
    }

    async fn update(&self, table: &str, patch: Row, filter: &Filter) -> Result<Vec<Row>> {
        if filter.is_empty() {
            return Err(StoreError::UnfilteredWrite { action: "update", table: table.to_string() });
        }
        let url = self.table_url(table, filter)?;
        let response = check(
            self.request(Method::PATCH, url)
                .header("Prefer", "return=representation")
                .json(&patch)
                .send()
                .await?,
        )
        .await?;
        Ok(response.json().await?)
    }

    async fn delete(&self, table: &str, filter: &Filter) -> Result<u64> {
        if filter.is_empty() {
            return Err(StoreError::UnfilteredWrite { action: "delete", table: table.to_string() });
        }
        let url = self.table_url(table, filter)?;
        let response = check(
            self.request(Method::DELETE, url)
                .header("Prefer", "return=representation")
                .send()
                .await?,
        )
        .await?;
        let rows: Vec<Row> = response.json().await?;
        Ok(rows.len() as u64)
    }
}

// =============================================================================
// Storage API
// =============================================================================

pub struct RestObjectStorage {
    base_url: String,
    bucket: String,
    public_base: String,
    http: reqwest::Client,
}

impl RestObjectStorage {
    /// `public_base` overrides the default
    /// `{base_url}/storage/v1/object/public/{bucket}` prefix.
    pub fn new(base_url: &str, api_key: &str, bucket: &str, public_base: Option<&str>) -> Result<Self> {
        Url::parse(base_url)?;
        let base_url = base_url.trim_end_matches('/').to_string();
        let public_base = match public_base {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => format!("{base_url}/storage/v1/object/public/{bucket}"),
        };
        Ok(Self {
            base_url,
            bucket: bucket.to_string(),
            public_base,
            http: build_client(api_key)?,
        })
    }

    fn object_url(&self, path: &str) -> Result<Url> {
        Ok(Url::parse(&format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url,
            self.bucket,
            path.trim_start_matches('/')
        ))?)
    }
}

#[async_trait]
impl ObjectStorage for RestObjectStorage {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<String> {
        let url = self.object_url(path)?;
        tracing::debug!(%url, size = bytes.len(), content_type, "storage upload");
        check(
            self.http
                .post(url)
                .header(header::CONTENT_TYPE, content_type)
                .header("x-upsert", "true")
                .body(bytes)
                .send()
                .await?,
        )
        .await?;
        Ok(self.public_url(path))
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.public_base, path.trim_start_matches('/'))
    }

    async fn delete(&self, path: &str) -> Result<bool> {
        let url = self.object_url(path)?;
        let response = self.http.delete(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        check(response).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header as header_is, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_render_conditions() {
        assert_eq!(render_condition(&Condition::new("area_id", Op::Eq, 3)), "eq.3");
        assert_eq!(render_condition(&Condition::new("status", Op::Neq, "resolved")), "neq.resolved");
        assert_eq!(render_condition(&Condition::new("estimated_time", Op::Eq, Value::Null)), "is.null");
        assert_eq!(render_condition(&Condition::new("alumno_nombre", Op::ILike, "%ana%")), "ilike.*ana*");
        assert_eq!(quote("ilike.*a,b*"), "ilike.\"*a,b*\"");
    }

    #[test]
    fn test_parse_content_range() {
        assert_eq!(parse_content_range("0-24/3573"), Some(3573));
        assert_eq!(parse_content_range("*/0"), Some(0));
        assert_eq!(parse_content_range("0-24/*"), None);
    }

    #[tokio::test]
    async fn test_select_sends_filters_and_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/area_submissions"))
            .and(query_param("area_id", "eq.3"))
            .and(query_param("order", "submitted_at.desc"))
            .and(query_param("limit", "20"))
            .and(header_is("apikey", "anon-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "area_id": 3}])))
            .mount(&server)
            .await;

        let store = RestStore::new(&server.uri(), "anon-key").unwrap();
        let query = Query::new()
            .filter(Filter::new().eq("area_id", 3))
            .order(crate::Order::desc("submitted_at"))
            .page(0, 20);
        let rows = store.select("area_submissions", &query).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], json!(1));
    }

    #[tokio::test]
    async fn test_count_reads_content_range() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/rest/v1/area_submissions"))
            .and(header_is("Prefer", "count=exact"))
            .respond_with(ResponseTemplate::new(200).insert_header("Content-Range", "*/42"))
            .mount(&server)
            .await;

        let store = RestStore::new(&server.uri(), "anon-key").unwrap();
        assert_eq!(store.count("area_submissions", &Filter::new()).await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_insert_returns_representation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/areas"))
            .and(header_is("Prefer", "return=representation"))
            .and(body_json(json!({"nombre": "TI"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([{"id": 7, "nombre": "TI"}])))
            .mount(&server)
            .await;

        let store = RestStore::new(&server.uri(), "anon-key").unwrap();
        let mut record = Row::new();
        record.insert("nombre".into(), json!("TI"));
        let row = store.insert("areas", record).await.unwrap();
        assert_eq!(row["id"], json!(7));
    }

    #[tokio::test]
    async fn test_backend_error_message() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/rest/v1/area_submissions"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"message": "column \"x\" does not exist"})),
            )
            .mount(&server)
            .await;

        let store = RestStore::new(&server.uri(), "anon-key").unwrap();
        let err = store
            .update("area_submissions", Row::new(), &Filter::new().eq("id", 1))
            .await
            .unwrap_err();
        match err {
            StoreError::Backend { status, message } => {
                assert_eq!(status, 400);
                assert!(message.contains("does not exist"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_storage_upload_and_delete() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/storage/v1/object/reportes/areas/1/foto.png"))
            .and(header_is("content-type", "image/png"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Key": "reportes/areas/1/foto.png"})))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/storage/v1/object/reportes/areas/1/missing.png"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let storage = RestObjectStorage::new(&server.uri(), "anon-key", "reportes", None).unwrap();
        let url = storage.upload("areas/1/foto.png", vec![1, 2, 3], "image/png").await.unwrap();
        assert_eq!(url, format!("{}/storage/v1/object/public/reportes/areas/1/foto.png", server.uri()));
        assert!(!storage.delete("areas/1/missing.png").await.unwrap());
    }
}
