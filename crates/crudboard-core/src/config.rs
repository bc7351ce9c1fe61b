// ── Runtime connection configuration ──
//
// Describes *where* the resource service lives and how lists are paged.
// Never touches disk: the CLI builds a `ClientConfig` from its profile
// layer and hands it in.

use std::num::NonZeroUsize;
use std::time::Duration;

use crudboard_api::{Resource, ResourceClient, TransportConfig};

use crate::error::CoreError;

/// Public demo backend used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

const DEFAULT_USERS_PAGE_SIZE: NonZeroUsize = page_size(6);
const DEFAULT_POSTS_PAGE_SIZE: NonZeroUsize = page_size(12);

const fn page_size(n: usize) -> NonZeroUsize {
    match NonZeroUsize::new(n) {
        Some(size) => size,
        None => NonZeroUsize::MIN,
    }
}

/// Configuration for talking to one resource service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Service root, e.g. `https://jsonplaceholder.typicode.com`.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Rows per page in the users list.
    pub users_page_size: NonZeroUsize,
    /// Rows per page in the posts list.
    pub posts_page_size: NonZeroUsize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout: Duration::from_secs(30),
            users_page_size: DEFAULT_USERS_PAGE_SIZE,
            posts_page_size: DEFAULT_POSTS_PAGE_SIZE,
        }
    }
}

impl ClientConfig {
    /// Build the HTTP client this configuration describes.
    pub fn connect(&self) -> Result<ResourceClient, CoreError> {
        let transport = TransportConfig::default().with_timeout(self.timeout);
        Ok(ResourceClient::new(&self.base_url, &transport)?)
    }

    pub fn page_size_for(&self, resource: Resource) -> NonZeroUsize {
        match resource {
            Resource::Users => self.users_page_size,
            Resource::Posts => self.posts_page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_demo_backend() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.page_size_for(Resource::Users).get(), 6);
        assert_eq!(config.page_size_for(Resource::Posts).get(), 12);
    }

    #[test]
    fn bad_base_url_fails_to_connect() {
        let config = ClientConfig {
            base_url: "not a url".into(),
            ..ClientConfig::default()
        };
        assert!(matches!(config.connect(), Err(CoreError::Config { .. })));
    }
}
