use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use backoffice_common::CursorPage;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("invalid url: {0}")]
    Url(String),
    #[error("network error: {0}")]
    Transport(String),
    #[error("http {status} {code}: {message}")]
    Http {
        status: u16,
        code: String,
        message: String,
    },
    #[error("json error: {0}")]
    Decode(String),
}

impl QueryError {
    /// Server error code such as `NOT_FOUND`, when the server sent one.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Http { code, .. } => Some(code),
            _ => None,
        }
    }
}

/// Loads one page of a list. `cursor` is the previous page's `next_cursor`.
#[async_trait]
pub trait PageFetcher<T>: Send + Sync {
    async fn fetch_page(
        &self,
        params: &BTreeMap<String, String>,
        cursor: Option<&str>,
    ) -> Result<CursorPage<T>, QueryError>;
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// Connection to a backoffice API rooted at e.g. `https://admin.example.com/api/v1/`.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
    token: Option<String>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base", &self.base.as_str())
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ApiClient {
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(base_url: &str) -> Result<Self, QueryError> {
        let http = Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .user_agent(concat!("backoffice-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| QueryError::Transport(e.to_string()))?;

        // A trailing slash makes relative resource paths join below the base.
        let mut base = Url::parse(base_url).map_err(|e| QueryError::Url(e.to_string()))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            http,
            base,
            token: None,
        })
    }

    /// Send `token` as a bearer credential on every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Endpoint for a resource path such as `shop/orders`.
    pub fn resource(&self, path: &str) -> HttpResource {
        HttpResource {
            client: self.clone(),
            path: path.trim_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> Result<Url, QueryError> {
        self.base
            .join(path)
            .map_err(|e| QueryError::Url(e.to_string()))
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

/// List and detail reads of one resource endpoint.
#[derive(Debug, Clone)]
pub struct HttpResource {
    client: ApiClient,
    path: String,
}

impl HttpResource {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub async fn detail<T: DeserializeOwned>(&self, id: impl fmt::Display) -> Result<T, QueryError> {
        let url = self.client.url(&format!("{}/{id}", self.path))?;
        debug!(%url, "fetching detail");
        let builder = self.client.authorized(self.client.http.get(url));
        read_json(send(builder).await?).await
    }
}

#[async_trait]
impl<T> PageFetcher<T> for HttpResource
where
    T: DeserializeOwned + Send + 'static,
{
    async fn fetch_page(
        &self,
        params: &BTreeMap<String, String>,
        cursor: Option<&str>,
    ) -> Result<CursorPage<T>, QueryError> {
        let mut url = self.client.url(&self.path)?;
        {
            let mut query = url.query_pairs_mut();
            for (name, value) in params {
                query.append_pair(name, value);
            }
            if let Some(cursor) = cursor {
                query.append_pair("cursor", cursor);
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }

        debug!(%url, "fetching page");
        let builder = self.client.authorized(self.client.http.get(url));
        read_json(send(builder).await?).await
    }
}

async fn send(builder: RequestBuilder) -> Result<Response, QueryError> {
    let res = builder
        .send()
        .await
        .map_err(|e| QueryError::Transport(e.to_string()))?;

    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let text = res.text().await.unwrap_or_default();
    let body = serde_json::from_str::<ErrorBody>(&text).unwrap_or(ErrorBody {
        code: String::new(),
        message: text,
    });
    Err(QueryError::Http {
        status: status.as_u16(),
        code: body.code,
        message: body.message,
    })
}

async fn read_json<T: DeserializeOwned>(res: Response) -> Result<T, QueryError> {
    let bytes = res
        .bytes()
        .await
        .map_err(|e| QueryError::Transport(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| QueryError::Decode(e.to_string()))
}
