//! # In-Memory REST Backend
//!
//! [`InMemoryApi`] is an [`HttpClient`] that answers requests from tables kept in memory,
//! so the sample runs without a network. It understands:
//!
//! - `GET /{resource}` and nested `GET /{parent}/{id}/{resource}` (filtered on
//!   `{parent}_id`), answered as `{ data: [...], meta: { total } }`
//! - `GET /{resource}/{id}`, answered as `{ data: {...} }`
//! - `POST` on a collection, `PUT` / `PATCH` / `DELETE` on an item
//! - `?include=user,comments` to embed the owning user and the item's comments

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use api_query::{Body, FormValue, HttpClient, HttpRequest, HttpResponse, QueryError};
use async_trait::async_trait;
use http::{Method, StatusCode};
use serde_json::{json, Map, Value};
use tokio::sync::RwLock;
use tracing::debug;

type Row = Map<String, Value>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Unsupported request: {method} {url}")]
    Unsupported { method: Method, url: String },
}

#[derive(Default)]
struct Tables {
    rows: HashMap<String, BTreeMap<u64, Row>>,
    next_id: u64,
}

/// One parsed request target.
struct Target {
    resource: String,
    id: Option<u64>,
    parent: Option<(String, u64)>,
    includes: Vec<String>,
}

/// Shared in-memory backend. Clones see the same tables.
#[derive(Clone)]
pub struct InMemoryApi {
    base_url: String,
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            tables: Arc::new(RwLock::new(Tables::default())),
        }
    }

    /// Number of rows stored for `resource`.
    pub async fn count(&self, resource: &str) -> usize {
        self.tables
            .read()
            .await
            .rows
            .get(resource)
            .map_or(0, BTreeMap::len)
    }

    fn parse(&self, request: &HttpRequest) -> Result<Target, ApiError> {
        let unsupported = || ApiError::Unsupported {
            method: request.method.clone(),
            url: request.url.clone(),
        };

        let rest = request
            .url
            .strip_prefix(&self.base_url)
            .ok_or_else(unsupported)?;
        let (path, query) = rest.split_once('?').unwrap_or((rest, ""));
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let includes = query
            .split('&')
            .filter_map(|pair| pair.strip_prefix("include="))
            .flat_map(|list| list.split(','))
            .map(str::to_string)
            .collect();

        let number = |segment: &str| {
            segment
                .parse::<u64>()
                .map_err(|_| ApiError::NotFound(request.url.clone()))
        };

        let (resource, id, parent_end) = match segments.len() {
            0 => return Err(unsupported()),
            n if n % 2 == 1 => (segments[n - 1], None, n - 1),
            n => (segments[n - 2], Some(number(segments[n - 1])?), n - 2),
        };
        let parent = match parent_end {
            0 => None,
            end => Some((segments[end - 2].to_string(), number(segments[end - 1])?)),
        };

        Ok(Target {
            resource: resource.to_string(),
            id,
            parent,
            includes,
        })
    }

    async fn handle(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let target = self.parse(request)?;
        debug!(method = %request.method, resource = %target.resource, id = ?target.id, "Handling request");

        let method = &request.method;
        match target.id {
            None if method == Method::GET => {
                let tables = self.tables.read().await;
                let rows: Vec<Value> = tables
                    .rows
                    .get(&target.resource)
                    .into_iter()
                    .flat_map(BTreeMap::values)
                    .filter(|row| belongs_to(row, target.parent.as_ref()))
                    .map(|row| embed(&tables, row, &target.includes))
                    .collect();
                let total = rows.len();
                Ok(HttpResponse::ok(json!({ "data": rows, "meta": { "total": total } })))
            }
            Some(id) if method == Method::GET => {
                let tables = self.tables.read().await;
                let row = tables
                    .rows
                    .get(&target.resource)
                    .and_then(|table| table.get(&id))
                    .ok_or_else(|| ApiError::NotFound(request.url.clone()))?;
                Ok(HttpResponse::ok(json!({ "data": embed(&tables, row, &target.includes) })))
            }
            None if method == Method::POST => {
                let mut tables = self.tables.write().await;
                tables.next_id += 1;
                let id = tables.next_id;

                let mut row = body_row(request);
                row.insert("id".to_string(), json!(id));
                if let Some((parent, parent_id)) = &target.parent {
                    row.insert(foreign_key(parent), json!(parent_id));
                }
                tables
                    .rows
                    .entry(target.resource)
                    .or_default()
                    .insert(id, row.clone());
                Ok(HttpResponse::new(StatusCode::CREATED, json!({ "data": row })))
            }
            Some(id) if method == Method::PUT || method == Method::PATCH => {
                let mut tables = self.tables.write().await;
                let row = tables
                    .rows
                    .get_mut(&target.resource)
                    .and_then(|table| table.get_mut(&id))
                    .ok_or_else(|| ApiError::NotFound(request.url.clone()))?;

                let body = body_row(request);
                if method == Method::PUT {
                    row.retain(|key, _| key == "id" || key.ends_with("_id"));
                }
                for (key, value) in body {
                    if key != "id" {
                        row.insert(key, value);
                    }
                }
                Ok(HttpResponse::ok(json!({ "data": row.clone() })))
            }
            Some(id) if method == Method::DELETE => {
                let mut tables = self.tables.write().await;
                tables
                    .rows
                    .get_mut(&target.resource)
                    .and_then(|table| table.remove(&id))
                    .ok_or_else(|| ApiError::NotFound(request.url.clone()))?;
                Ok(HttpResponse::new(StatusCode::NO_CONTENT, Value::Null))
            }
            _ => Err(ApiError::Unsupported {
                method: method.clone(),
                url: request.url.clone(),
            }),
        }
    }
}

#[async_trait]
impl HttpClient for InMemoryApi {
    async fn request(&self, request: HttpRequest) -> api_query::Result<HttpResponse> {
        self.handle(&request).await.map_err(QueryError::transport)
    }
}

fn foreign_key(parent: &str) -> String {
    format!("{}_id", parent.trim_end_matches('s'))
}

fn belongs_to(row: &Row, parent: Option<&(String, u64)>) -> bool {
    match parent {
        Some((resource, id)) => row.get(&foreign_key(resource)) == Some(&json!(id)),
        None => true,
    }
}

/// Copies `row`, embedding the owning user and the row's comments when requested.
fn embed(tables: &Tables, row: &Row, includes: &[String]) -> Value {
    let mut row = row.clone();

    if includes.iter().any(|i| i == "user") {
        let user = row
            .get("user_id")
            .and_then(Value::as_u64)
            .and_then(|id| tables.rows.get("users")?.get(&id).cloned());
        if let Some(user) = user {
            row.insert("user".to_string(), Value::Object(user));
        }
    }
    if includes.iter().any(|i| i == "comments") {
        let id = row.get("id").cloned();
        let comments: Vec<Value> = tables
            .rows
            .get("comments")
            .into_iter()
            .flat_map(BTreeMap::values)
            .filter(|comment| comment.get("post_id") == id.as_ref())
            .cloned()
            .map(Value::Object)
            .collect();
        row.insert("comments".to_string(), Value::Array(comments));
    }

    Value::Object(row)
}

/// The request body as a row. Multipart text parts are kept as strings and file parts
/// are stored by file name.
fn body_row(request: &HttpRequest) -> Row {
    match &request.body {
        Some(Body::Json(Value::Object(map))) => map.clone(),
        Some(Body::Form(form)) => form
            .iter()
            .map(|(name, value)| {
                let value = match value {
                    FormValue::Text(text) => Value::String(text.clone()),
                    FormValue::File(file) => Value::String(file.name.clone()),
                };
                (name.to_string(), value)
            })
            .collect(),
        _ => Row::new(),
    }
}
