//! Remote persistence collaborator.
//!
//! The core depends on exactly five row operations; `RemoteStore` is the
//! seam, and `RestClient` is the production implementation speaking the
//! hosted backend's PostgREST-flavored JSON protocol. Rows travel as
//! `serde_json::Value` objects whose keys are the table columns.

use serde_json::Value;
use thiserror::Error;

/// Remote persistence errors.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// No remote endpoint configured for this context.
    #[error("remote store not configured")]
    NotConfigured,

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("remote returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid base url: {0}")]
    BadUrl(#[from] url::ParseError),

    #[error("row missing from remote response")]
    MissingRow,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Sort key for `select`.
#[derive(Debug, Clone)]
pub struct OrderSpec {
    pub column: String,
    pub ascending: bool,
}

impl OrderSpec {
    pub fn asc(column: &str) -> Self {
        Self {
            column: column.to_string(),
            ascending: true,
        }
    }

    pub fn desc(column: &str) -> Self {
        Self {
            column: column.to_string(),
            ascending: false,
        }
    }
}

/// The row operations the core needs from the hosted backend.
///
/// All filters are equality filters; that is all the core ever asks for.
pub trait RemoteStore {
    fn select(
        &self,
        table: &str,
        filters: &[(&str, &str)],
        order: &[OrderSpec],
    ) -> Result<Vec<Value>, RemoteError>;

    /// Insert one record; returns the stored row (server-assigned columns
    /// included).
    fn insert(&self, table: &str, record: &Value) -> Result<Value, RemoteError>;

    fn update(&self, table: &str, id: &str, fields: &Value) -> Result<(), RemoteError>;

    fn delete(&self, table: &str, id: &str) -> Result<(), RemoteError>;

    /// Batch upsert keyed on `conflict_key`.
    fn upsert(&self, table: &str, records: &[Value], conflict_key: &str)
        -> Result<(), RemoteError>;
}

/// HTTP client for the hosted row store.
///
/// Synchronous surface over reqwest: the client owns its runtime so callers
/// stay single-threaded and blocking, the way the rest of the core works.
pub struct RestClient {
    base_url: String,
    api_key: String,
    bearer: Option<String>,
    http: reqwest::Client,
    runtime: tokio::runtime::Runtime,
}

impl RestClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, RemoteError> {
        let parsed = url::Url::parse(base_url)?;
        Ok(Self {
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            bearer: None,
            http: reqwest::Client::new(),
            runtime: tokio::runtime::Runtime::new()?,
        })
    }

    /// Attach the signed-in user's access token. Without it requests are
    /// made with the anonymous api key only.
    pub fn with_bearer(mut self, token: &str) -> Self {
        self.bearer = Some(token.to_string());
        self
    }

    fn token(&self) -> &str {
        self.bearer.as_deref().unwrap_or(&self.api_key)
    }

    fn table_url(
        &self,
        table: &str,
        filters: &[(&str, &str)],
        order: &[OrderSpec],
        select_all: bool,
    ) -> String {
        let mut params: Vec<String> = Vec::new();
        if select_all {
            params.push("select=*".to_string());
        }
        for (column, value) in filters {
            params.push(format!("{column}=eq.{}", urlencoding::encode(value)));
        }
        if !order.is_empty() {
            let spec = order
                .iter()
                .map(|o| {
                    format!(
                        "{}.{}",
                        o.column,
                        if o.ascending { "asc" } else { "desc" }
                    )
                })
                .collect::<Vec<_>>()
                .join(",");
            params.push(format!("order={spec}"));
        }
        let mut url = format!("{}/rest/v1/{table}", self.base_url);
        if !params.is_empty() {
            url.push('?');
            url.push_str(&params.join("&"));
        }
        url
    }

    /// Send, check the status, and hand back the body.
    fn execute(&self, request: reqwest::RequestBuilder) -> Result<String, RemoteError> {
        self.runtime.block_on(async {
            let response = request
                .header("apikey", self.api_key.as_str())
                .bearer_auth(self.token())
                .send()
                .await?;
            let status = response.status();
            let body = response.text().await?;
            if !status.is_success() {
                tracing::warn!(status = %status, "remote call failed");
                return Err(RemoteError::Status {
                    status: status.as_u16(),
                    body,
                });
            }
            Ok(body)
        })
    }
}

impl RemoteStore for RestClient {
    fn select(
        &self,
        table: &str,
        filters: &[(&str, &str)],
        order: &[OrderSpec],
    ) -> Result<Vec<Value>, RemoteError> {
        let url = self.table_url(table, filters, order, true);
        let body = self.execute(self.http.get(url))?;
        Ok(serde_json::from_str(&body)?)
    }

    fn insert(&self, table: &str, record: &Value) -> Result<Value, RemoteError> {
        let url = self.table_url(table, &[], &[], false);
        let body = self.execute(
            self.http
                .post(url)
                .header("Prefer", "return=representation")
                .json(&[record]),
        )?;
        let mut rows: Vec<Value> = serde_json::from_str(&body)?;
        if rows.is_empty() {
            return Err(RemoteError::MissingRow);
        }
        Ok(rows.remove(0))
    }

    fn update(&self, table: &str, id: &str, fields: &Value) -> Result<(), RemoteError> {
        let url = self.table_url(table, &[("id", id)], &[], false);
        self.execute(self.http.patch(url).json(fields))?;
        Ok(())
    }

    fn delete(&self, table: &str, id: &str) -> Result<(), RemoteError> {
        let url = self.table_url(table, &[("id", id)], &[], false);
        self.execute(self.http.delete(url))?;
        Ok(())
    }

    fn upsert(
        &self,
        table: &str,
        records: &[Value],
        conflict_key: &str,
    ) -> Result<(), RemoteError> {
        let url = format!(
            "{}/rest/v1/{table}?on_conflict={conflict_key}",
            self.base_url
        );
        self.execute(
            self.http
                .post(url)
                .header("Prefer", "resolution=merge-duplicates")
                .json(&records),
        )?;
        Ok(())
    }
}
