//! Hosted table API backend (PostgREST dialect, as served under `/rest/v1`).

use super::{Projection, Row, Select, TableStore};
use crate::config::RestStoreConfig;
use crate::error::StoreError;
use crate::schema::TableDef;
use async_trait::async_trait;
use reqwest::{header, Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde_json::Value;

pub struct RestStore {
    client: Client,
    base: Url,
    key: String,
}

impl RestStore {
    pub fn new(config: &RestStoreConfig) -> Result<Self, StoreError> {
        let mut base = Url::parse(&config.url).map_err(|e| StoreError::Unknown(format!("invalid store url: {}", e)))?;
        // Url::join drops the last segment unless the path ends with '/'.
        let path = format!("{}/rest/v1/", base.path().trim_end_matches('/'));
        base.set_path(&path);
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(RestStore {
            client,
            base,
            key: config.key.clone(),
        })
    }

    fn table_url(&self, table: &TableDef) -> Result<Url, StoreError> {
        self.base
            .join(table.name)
            .map_err(|e| StoreError::Unknown(format!("invalid table url: {}", e)))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        tracing::debug!(%method, %url, "store request");
        self.client
            .request(method, url)
            .header("apikey", &self.key)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.key))
            .header(header::ACCEPT, "application/json")
    }

    fn write(&self, method: Method, url: Url) -> RequestBuilder {
        self.request(method, url).header("Prefer", "return=representation")
    }

    async fn rows(response: Response) -> Result<Vec<Row>, StoreError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_response(status, &body));
        }
        let body: Value = response.json().await?;
        match body {
            Value::Array(items) => items
                .into_iter()
                .map(|v| match v {
                    Value::Object(m) => Ok(m),
                    other => Err(StoreError::Unknown(format!("unexpected row in store response: {}", other))),
                })
                .collect(),
            Value::Object(m) => Ok(vec![m]),
            Value::Null => Ok(Vec::new()),
            other => Err(StoreError::Unknown(format!("unexpected store response: {}", other))),
        }
    }
}

/// `select=` parameter: `*` plus one `name(cols)` per embed.
pub(crate) fn select_param(query: &Select) -> String {
    let mut parts = vec!["*".to_string()];
    for embed in &query.embeds {
        let cols = match embed.projection {
            Projection::All => "*".to_string(),
            Projection::Columns(cols) => cols.join(","),
        };
        parts.push(format!("{}({})", embed.relation.name, cols));
    }
    parts.join(",")
}

/// Filter value in `eq.` operator form.
pub(crate) fn eq_param(value: &Value) -> String {
    match value {
        Value::String(s) => format!("eq.{}", s),
        Value::Null => "is.null".to_string(),
        other => format!("eq.{}", other),
    }
}

/// Map a non-2xx table API response to a store error, preferring the API's own message.
/// A 404 here means a missing relation or route, never a missing row: rows by id come back as empty arrays.
pub(crate) fn error_from_response(status: StatusCode, body: &str) -> StoreError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let field = |k: &str| {
        parsed
            .as_ref()
            .and_then(|v| v.get(k))
            .and_then(Value::as_str)
            .map(str::to_string)
    };
    let message = field("message")
        .or_else(|| field("error"))
        .or_else(|| Some(body.trim().to_string()).filter(|s| !s.is_empty()))
        .unwrap_or_else(|| format!("store responded with {}", status));
    match (status, field("code").as_deref()) {
        (_, Some("23505")) | (_, Some("23503")) | (StatusCode::CONFLICT, _) => StoreError::Conflict(message),
        (StatusCode::BAD_GATEWAY, _) | (StatusCode::SERVICE_UNAVAILABLE, _) | (StatusCode::GATEWAY_TIMEOUT, _) => {
            StoreError::Connectivity(message)
        }
        _ => StoreError::Unknown(message),
    }
}

#[async_trait]
impl TableStore for RestStore {
    async fn select(&self, query: &Select) -> Result<Vec<Row>, StoreError> {
        let mut url = self.table_url(query.table)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("select", &select_param(query));
            for (col, val) in &query.filters {
                pairs.append_pair(col, &eq_param(val));
            }
        }
        let response = self.request(Method::GET, url).send().await?;
        Self::rows(response).await
    }

    async fn insert(&self, table: &'static TableDef, row: &Row) -> Result<Vec<Row>, StoreError> {
        let url = self.table_url(table)?;
        let response = self.write(Method::POST, url).json(row).send().await?;
        Self::rows(response).await
    }

    async fn update(&self, table: &'static TableDef, id: i64, patch: &Row) -> Result<Vec<Row>, StoreError> {
        let mut url = self.table_url(table)?;
        url.query_pairs_mut().append_pair(table.pk, &format!("eq.{}", id));
        let response = self.write(Method::PATCH, url).json(patch).send().await?;
        Self::rows(response).await
    }

    async fn delete(&self, table: &'static TableDef, id: i64) -> Result<Vec<Row>, StoreError> {
        let mut url = self.table_url(table)?;
        url.query_pairs_mut().append_pair(table.pk, &format!("eq.{}", id));
        let response = self.write(Method::DELETE, url).send().await?;
        Self::rows(response).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut url = self.table_url(&crate::schema::CLIENTES)?;
        url.query_pairs_mut().append_pair("select", "id").append_pair("limit", "1");
        let response = self.request(Method::GET, url).send().await?;
        Self::rows(response).await.map(|_| ())
    }

    fn backend(&self) -> &'static str {
        "rest"
    }
}
