//! Check bundle operations over an injected transport.
//!
//! Each call is one build, one round trip and one parse. Nothing is cached
//! or retried, and the accessor holds no per-call state, so a single
//! instance can serve concurrent callers if its transport can.

use crate::cid::cid_for_id;
use crate::client::{CheckBundleClient, SearchFilter};
use crate::error::ApiError;
use crate::http::{HttpRequest, Transport};
use crate::types::CheckBundle;

/// Typed accessor for the `/check_bundle` resource.
#[derive(Debug, Clone)]
pub struct CheckBundleApi<T> {
    client: CheckBundleClient,
    transport: T,
}

impl<T: Transport> CheckBundleApi<T> {
    pub fn new(transport: T) -> Self {
        Self {
            client: CheckBundleClient::new(),
            transport,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn fetch_by_id(&self, id: u64) -> Result<CheckBundle, ApiError> {
        self.fetch_by_cid(&cid_for_id(id))
    }

    pub fn fetch_by_cid(&self, cid: &str) -> Result<CheckBundle, ApiError> {
        let request = self.client.build_fetch_by_cid(cid)?;
        let body = self.send(&request)?;
        self.client.parse_bundle(&body)
    }

    pub fn search(&self, query: &str) -> Result<Vec<CheckBundle>, ApiError> {
        let request = self.client.build_search(query);
        let body = self.send(&request)?;
        self.client.parse_bundle_list(&body)
    }

    /// Search with additional filter parameters. The filters are only
    /// applied when `query` is non-empty.
    pub fn filter_search(
        &self,
        query: &str,
        filter: &SearchFilter,
    ) -> Result<Vec<CheckBundle>, ApiError> {
        let request = self.client.build_filter_search(query, filter);
        let body = self.send(&request)?;
        self.client.parse_bundle_list(&body)
    }

    /// Create a bundle; the returned record carries the assigned CID.
    pub fn create(&self, bundle: &CheckBundle) -> Result<CheckBundle, ApiError> {
        let request = self.client.build_create(bundle)?;
        let body = self.send(&request)?;
        self.client.parse_bundle(&body)
    }

    pub fn update(&self, bundle: &CheckBundle) -> Result<CheckBundle, ApiError> {
        let request = self.client.build_update(bundle)?;
        let body = self.send(&request)?;
        self.client.parse_bundle(&body)
    }

    pub fn delete(&self, bundle: &CheckBundle) -> Result<bool, ApiError> {
        self.delete_by_cid(&bundle.cid)
    }

    /// `Ok(true)` once the transport reports success. The response body is
    /// ignored.
    pub fn delete_by_cid(&self, cid: &str) -> Result<bool, ApiError> {
        let request = self.client.build_delete_by_cid(cid)?;
        self.send(&request)?;
        Ok(true)
    }

    fn send(&self, request: &HttpRequest) -> Result<Vec<u8>, ApiError> {
        tracing::debug!(method = %request.method, path = %request.path, "check bundle request");
        self.transport
            .execute(request)
            .map_err(|source| ApiError::Transport {
                method: request.method,
                path: request.path.clone(),
                source,
            })
    }
}
