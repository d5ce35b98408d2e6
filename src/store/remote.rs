//! Remote store - a hosted PostgREST (Supabase) backend

use reqwest::{Client, RequestBuilder};
use std::time::Duration;

use super::RemoteSource;
use crate::config::RemoteConfig;
use crate::content::date::{self, DATE_FIELD};
use crate::content::{Collection, ContentError, Record, Result};

/// Client for the backend tables.
///
/// Built once at startup and shared; the underlying HTTP client pools its
/// connections internally. Missing credentials do not stop construction,
/// every request then fails with [`ContentError::NotConfigured`].
#[derive(Debug, Clone)]
pub struct RemoteStore {
    client: Client,
    config: RemoteConfig,
}

impl RemoteStore {
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        if config.url.is_none() || config.key.is_none() {
            tracing::warn!(
                "Missing remote credentials (url: {}, key: {}); content will come from local files",
                config.url.is_some(),
                config.key.is_some()
            );
        }

        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        // A backend on this machine (e.g. `supabase start`) is never proxied
        if config.url.as_deref().is_some_and(is_loopback_url) {
            builder = builder.no_proxy();
        }

        Ok(Self {
            client: builder.build()?,
            config: config.clone(),
        })
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    /// Fetch at most one row to prove the backend answers.
    /// Returns the number of rows seen.
    pub async fn ping(&self, collection: Collection) -> Result<usize> {
        let rows = self
            .fetch(collection, &[("select", "*".to_string()), ("limit", "1".to_string())])
            .await?;
        Ok(rows.len())
    }

    fn request(&self, collection: Collection) -> Result<RequestBuilder> {
        let url = self
            .config
            .url
            .as_deref()
            .ok_or(ContentError::NotConfigured("url"))?;
        let key = self
            .config
            .key
            .as_deref()
            .ok_or(ContentError::NotConfigured("key"))?;

        let endpoint = format!(
            "{}/rest/v1/{}",
            url.trim_end_matches('/'),
            self.config.table(collection)
        );

        Ok(self
            .client
            .get(endpoint)
            .header("apikey", key)
            .bearer_auth(key)
            .header("Accept", "application/json"))
    }

    async fn fetch(&self, collection: Collection, params: &[(&str, String)]) -> Result<Vec<Record>> {
        tracing::debug!("Querying remote {} with {:?}", collection, params);

        let response = self.request(collection)?.query(params).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ContentError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let mut rows: Vec<Record> = response.json().await?;
        date::sort_by_date_desc(&mut rows);
        Ok(rows)
    }
}

impl RemoteSource for RemoteStore {
    async fn list_all(&self, collection: Collection, limit: Option<usize>) -> Result<Vec<Record>> {
        let mut params = vec![("select", "*".to_string()), ("order", newest_first())];
        if let Some(limit) = limit {
            params.push(("limit", limit.to_string()));
        }
        self.fetch(collection, &params).await
    }

    async fn get_by_identifier(&self, collection: Collection, id: &str) -> Result<Option<Record>> {
        let params = [
            ("select", "*".to_string()),
            (collection.id_field(), format!("eq.{}", id)),
            ("limit", "1".to_string()),
        ];
        let rows = self.fetch(collection, &params).await?;
        Ok(rows.into_iter().next())
    }

    async fn search(&self, collection: Collection, query: &str) -> Result<Vec<Record>> {
        if query.trim().is_empty() {
            return self.list_all(collection, None).await;
        }

        let params = [
            ("select", "*".to_string()),
            ("or", ilike_filter(collection.search_fields(), query.trim())),
            ("order", newest_first()),
        ];
        self.fetch(collection, &params).await
    }
}

fn is_loopback_url(url: &str) -> bool {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| matches!(h, "localhost" | "127.0.0.1" | "[::1]")))
        .unwrap_or(false)
}

fn newest_first() -> String {
    format!("{}.desc", DATE_FIELD)
}

/// PostgREST `or=(...)` filter matching `query` anywhere in any of `fields`.
///
/// `%` and `_` are escaped so they match literally, the same as the local
/// scan. `*` cannot be escaped through PostgREST and still matches anything.
/// The pattern is double-quoted so commas and parentheses in the query do
/// not break the filter grammar.
fn ilike_filter(fields: &[&str], query: &str) -> String {
    let pattern = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    let escaped = pattern.replace('\\', "\\\\").replace('"', "\\\"");
    let clauses: Vec<String> = fields
        .iter()
        .map(|field| format!("{}.ilike.\"*{}*\"", field, escaped))
        .collect();
    format!("({})", clauses.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, Query, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::Arc;

    const KEY: &str = "test-anon-key";

    /// In-process stand-in for the PostgREST endpoint
    #[derive(Clone)]
    struct Backend {
        tables: Arc<HashMap<String, Vec<Value>>>,
        fail: bool,
    }

    fn text_of(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    async fn table_handler(
        State(backend): State<Backend>,
        Path(table): Path<String>,
        headers: HeaderMap,
        Query(params): Query<HashMap<String, String>>,
    ) -> std::result::Result<Json<Vec<Value>>, (StatusCode, String)> {
        if headers.get("apikey").and_then(|v| v.to_str().ok()) != Some(KEY) {
            return Err((StatusCode::UNAUTHORIZED, "missing apikey".into()));
        }
        if backend.fail {
            return Err((StatusCode::INTERNAL_SERVER_ERROR, "database unavailable".into()));
        }
        let Some(rows) = backend.tables.get(&table) else {
            return Err((StatusCode::NOT_FOUND, format!("relation {} does not exist", table)));
        };

        let mut rows = rows.clone();
        for (column, filter) in &params {
            if let Some(expected) = filter.strip_prefix("eq.") {
                rows.retain(|r| r.get(column).map(|v| text_of(v) == expected).unwrap_or(false));
            }
        }
        if let Some(or) = params.get("or") {
            let needle = or.split('*').nth(1).unwrap_or_default().to_lowercase();
            rows.retain(|r| {
                ["title", "content", "summary", "why", "type"].iter().any(|f| {
                    r.get(*f)
                        .and_then(Value::as_str)
                        .map(|s| s.to_lowercase().contains(&needle))
                        .unwrap_or(false)
                })
            });
        }
        if params.get("order").map(String::as_str) == Some("date.desc") {
            rows.sort_by(|a, b| b["date"].as_str().cmp(&a["date"].as_str()));
        }
        if let Some(limit) = params.get("limit").and_then(|l| l.parse::<usize>().ok()) {
            rows.truncate(limit);
        }
        Ok(Json(rows))
    }

    async fn spawn_backend(fail: bool) -> String {
        let mut tables = HashMap::new();
        tables.insert(
            "essays".to_string(),
            vec![
                json!({"slug": "older", "title": "On Patience", "date": "2023-01-10", "summary": "Waiting is a skill", "content": "Body one"}),
                json!({"slug": "value-ai", "title": "Value Investing in the Age of AI", "date": "2024-03-01", "summary": null, "content": "Body two"}),
                json!({"slug": "middle", "title": "Reading Annual Reports", "date": "2023-06-15", "summary": "Footnotes first", "content": "Look for VALUE traps"}),
            ],
        );
        tables.insert(
            "interesting_items".to_string(),
            vec![json!({"id": 1, "title": "Canadian Investment Accounts", "url": "https://moneyscope.ca", "date": "2023-12-15", "type": "Podcast", "why": "Practical"})],
        );

        let backend = Backend {
            tables: Arc::new(tables),
            fail,
        };
        let app = Router::new()
            .route("/rest/v1/:table", get(table_handler))
            .with_state(backend);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    fn store(url: Option<String>, key: Option<&str>) -> RemoteStore {
        RemoteStore::new(&RemoteConfig {
            url,
            key: key.map(str::to_string),
            timeout_secs: Some(5),
            ..RemoteConfig::default()
        })
        .unwrap()
    }

    fn slugs(records: &[Record]) -> Vec<String> {
        records
            .iter()
            .filter_map(|r| Collection::Essays.identifier_of(r))
            .collect()
    }

    #[tokio::test]
    async fn test_list_all_newest_first() {
        let url = spawn_backend(false).await;
        let remote = store(Some(url), Some(KEY));

        let essays = remote.list_all(Collection::Essays, None).await.unwrap();
        assert_eq!(slugs(&essays), vec!["value-ai", "middle", "older"]);

        let limited = remote.list_all(Collection::Essays, Some(1)).await.unwrap();
        assert_eq!(slugs(&limited), vec!["value-ai"]);
    }

    #[tokio::test]
    async fn test_get_by_identifier() {
        let url = spawn_backend(false).await;
        let remote = store(Some(url), Some(KEY));

        let essay = remote
            .get_by_identifier(Collection::Essays, "middle")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(essay["title"], json!("Reading Annual Reports"));

        let item = remote
            .get_by_identifier(Collection::Interesting, "1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(Collection::Interesting.identifier_of(&item), Some("1".to_string()));

        assert!(remote
            .get_by_identifier(Collection::Essays, "missing")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_search() {
        let url = spawn_backend(false).await;
        let remote = store(Some(url), Some(KEY));

        let hits = remote.search(Collection::Essays, "VALUE investing").await.unwrap();
        assert_eq!(slugs(&hits), vec!["value-ai"]);

        // Matches title in one row and body in another
        let hits = remote.search(Collection::Essays, "value").await.unwrap();
        assert_eq!(slugs(&hits), vec!["value-ai", "middle"]);

        let all = remote.search(Collection::Essays, "").await.unwrap();
        assert_eq!(all, remote.list_all(Collection::Essays, None).await.unwrap());
    }

    #[tokio::test]
    async fn test_backend_error_status() {
        let url = spawn_backend(true).await;
        let remote = store(Some(url), Some(KEY));

        let err = remote.list_all(Collection::Essays, None).await.unwrap_err();
        assert!(matches!(err, ContentError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_wrong_key_is_an_error() {
        let url = spawn_backend(false).await;
        let remote = store(Some(url), Some("wrong-key"));
        assert!(matches!(
            remote.get_by_identifier(Collection::Essays, "middle").await,
            Err(ContentError::Status { status: 401, .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_credentials() {
        let remote = store(None, Some(KEY));
        assert!(matches!(
            remote.list_all(Collection::Essays, None).await,
            Err(ContentError::NotConfigured("url"))
        ));

        let remote = store(Some("http://127.0.0.1:1".into()), None);
        assert!(matches!(
            remote.search(Collection::Essays, "x").await,
            Err(ContentError::NotConfigured("key"))
        ));
    }

    #[tokio::test]
    async fn test_ping() {
        let url = spawn_backend(false).await;
        let remote = store(Some(url), Some(KEY));
        assert_eq!(remote.ping(Collection::Interesting).await.unwrap(), 1);
    }

    #[test]
    fn test_is_loopback_url() {
        assert!(is_loopback_url("http://127.0.0.1:54321"));
        assert!(is_loopback_url("http://localhost:54321/"));
        assert!(!is_loopback_url("https://xyz.supabase.co"));
        assert!(!is_loopback_url("not a url"));
    }

    #[test]
    fn test_ilike_filter_quoting() {
        assert_eq!(
            ilike_filter(&["title", "content"], "a, (b)"),
            r#"(title.ilike."*a, (b)*",content.ilike."*a, (b)*")"#
        );
        assert_eq!(
            ilike_filter(&["title"], r#"say "hi""#),
            r#"(title.ilike."*say \"hi\"*")"#
        );
        // LIKE wildcards are matched literally
        assert_eq!(
            ilike_filter(&["title"], "a_b 50%"),
            r#"(title.ilike."*a\\_b 50\\%*")"#
        );
    }
}
