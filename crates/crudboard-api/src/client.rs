// Async HTTP client for the users/posts resource service.
//
// Endpoints:
//   GET    {base}/{resource}        -> entity array
//   POST   {base}/{resource}        -> created entity
//   PUT    {base}/{resource}/{id}   -> updated entity
//   DELETE {base}/{resource}/{id}   -> empty body
//
// No caching, no retry. Each call either returns the decoded body or a
// single `Error` for the caller to surface.

use reqwest::header::{CONTENT_TYPE, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::resource::Resource;
use crate::transport::TransportConfig;

/// Content type sent with every JSON body.
pub const JSON_UTF8: &str = "application/json; charset=UTF-8";

/// Longest body excerpt kept on an error.
const BODY_PREVIEW_LEN: usize = 200;

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the resource service.
///
/// Cheap to clone; the underlying `reqwest::Client` shares its pool.
#[derive(Debug, Clone)]
pub struct ResourceClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ResourceClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client from a base URL and transport settings.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, base_url)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Ensure the base path ends with `/` so relative joins append
    /// instead of replacing the last segment.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    /// The normalized base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    fn collection_url(&self, resource: Resource) -> Result<Url, Error> {
        Ok(self.base_url.join(resource.as_str())?)
    }

    fn member_url(&self, resource: Resource, id: u64) -> Result<Url, Error> {
        Ok(self.base_url.join(&format!("{}/{id}", resource.as_str()))?)
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Fetch the full collection.
    pub async fn list<T: DeserializeOwned>(&self, resource: Resource) -> Result<Vec<T>, Error> {
        let url = self.collection_url(resource)?;
        debug!("GET {url}");

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| Error::Network { resource, source })?;
        Self::handle_response(resource, resp).await
    }

    /// Create an entity. The response body is returned as the confirmed entity.
    pub async fn create<B, T>(&self, resource: Resource, body: &B) -> Result<T, Error>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.collection_url(resource)?;
        debug!("POST {url}");

        let resp = self
            .http
            .post(url)
            .header(CONTENT_TYPE, HeaderValue::from_static(JSON_UTF8))
            .body(serde_json::to_vec(body)?)
            .send()
            .await
            .map_err(|source| Error::Network { resource, source })?;
        Self::handle_response(resource, resp).await
    }

    /// Replace an entity by id.
    pub async fn update<B, T>(&self, resource: Resource, id: u64, body: &B) -> Result<T, Error>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.member_url(resource, id)?;
        debug!("PUT {url}");

        let resp = self
            .http
            .put(url)
            .header(CONTENT_TYPE, HeaderValue::from_static(JSON_UTF8))
            .body(serde_json::to_vec(body)?)
            .send()
            .await
            .map_err(|source| Error::Network { resource, source })?;
        Self::handle_response(resource, resp).await
    }

    /// Delete an entity by id.
    ///
    /// Success means the request was accepted; it says nothing about
    /// whether the backend durably removed anything.
    pub async fn remove(&self, resource: Resource, id: u64) -> Result<(), Error> {
        let url = self.member_url(resource, id)?;
        debug!("DELETE {url}");

        let resp = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(|source| Error::Network { resource, source })?;
        Self::handle_empty(resource, resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        resource: Resource,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::status_error(resource, resp).await);
        }

        let body = resp
            .text()
            .await
            .map_err(|source| Error::Network { resource, source })?;
        trace!(%resource, bytes = body.len(), "response body received");

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            resource,
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body,
        })
    }

    async fn handle_empty(resource: Resource, resp: reqwest::Response) -> Result<(), Error> {
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(Self::status_error(resource, resp).await)
        }
    }

    async fn status_error(resource: Resource, resp: reqwest::Response) -> Error {
        let status = resp.status().as_u16();
        let raw = resp.text().await.unwrap_or_default();
        Error::HttpStatus {
            resource,
            status,
            body: preview(&raw).to_owned(),
        }
    }
}

/// First `BODY_PREVIEW_LEN` bytes of `body`, cut on a char boundary.
fn preview(body: &str) -> &str {
    if body.len() <= BODY_PREVIEW_LEN {
        return body;
    }
    let mut end = BODY_PREVIEW_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
