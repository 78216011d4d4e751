//! Stateless request builder and response parser for check bundles.
//!
//! # Design
//! `CheckBundleClient` carries no state. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that decodes the response body. Identifier validation happens in the
//! builders, so a malformed CID never becomes a request. The
//! [`CheckBundleApi`](crate::api::CheckBundleApi) executor wires these
//! together over a `Transport`; hosts that run HTTP themselves can call them
//! directly.

use std::collections::BTreeMap;

use url::form_urlencoded;

use crate::cid::{cid_for_id, validate_cid, BASE_PATH};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};
use crate::types::CheckBundle;

/// Extra `field=value` query parameters for filtered searches.
pub type SearchFilter = BTreeMap<String, String>;

/// Builds check bundle requests and parses their responses without touching
/// the network.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckBundleClient;

impl CheckBundleClient {
    pub fn new() -> Self {
        Self
    }

    pub fn build_fetch_by_id(&self, id: u64) -> HttpRequest {
        get(cid_for_id(id))
    }

    pub fn build_fetch_by_cid(&self, cid: &str) -> Result<HttpRequest, ApiError> {
        let cid = validate_cid(cid)?;
        Ok(get(cid.to_string()))
    }

    /// List request; the `search` parameter is sent only for a non-empty
    /// query.
    pub fn build_search(&self, query: &str) -> HttpRequest {
        get(search_path(query, None))
    }

    /// List request with filter parameters. Filters ride along with the
    /// search parameter and are not sent at all when `query` is empty.
    pub fn build_filter_search(&self, query: &str, filter: &SearchFilter) -> HttpRequest {
        get(search_path(query, Some(filter)))
    }

    pub fn build_create(&self, bundle: &CheckBundle) -> Result<HttpRequest, ApiError> {
        with_json_body(HttpMethod::Post, BASE_PATH.to_string(), bundle)
    }

    /// Full-record PUT on the bundle's own CID.
    pub fn build_update(&self, bundle: &CheckBundle) -> Result<HttpRequest, ApiError> {
        let cid = validate_cid(&bundle.cid)?;
        with_json_body(HttpMethod::Put, cid.to_string(), bundle)
    }

    pub fn build_delete_by_cid(&self, cid: &str) -> Result<HttpRequest, ApiError> {
        let cid = validate_cid(cid)?;
        Ok(HttpRequest {
            method: HttpMethod::Delete,
            path: cid.to_string(),
            headers: Vec::new(),
            body: None,
        })
    }

    /// Decode a single bundle (fetch, create and update responses).
    pub fn parse_bundle(&self, body: &[u8]) -> Result<CheckBundle, ApiError> {
        let bundle: CheckBundle = serde_json::from_slice(body).map_err(ApiError::Decode)?;
        tracing::debug!(cid = %bundle.cid, "decoded check bundle");
        Ok(bundle)
    }

    /// Decode a search response.
    pub fn parse_bundle_list(&self, body: &[u8]) -> Result<Vec<CheckBundle>, ApiError> {
        let bundles: Vec<CheckBundle> = serde_json::from_slice(body).map_err(ApiError::Decode)?;
        tracing::debug!(count = bundles.len(), "decoded check bundle list");
        Ok(bundles)
    }
}

fn get(path: String) -> HttpRequest {
    HttpRequest {
        method: HttpMethod::Get,
        path,
        headers: Vec::new(),
        body: None,
    }
}

fn with_json_body(
    method: HttpMethod,
    path: String,
    bundle: &CheckBundle,
) -> Result<HttpRequest, ApiError> {
    let body = serde_json::to_string(bundle).map_err(ApiError::Encode)?;
    Ok(HttpRequest {
        method,
        path,
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: Some(body),
    })
}

/// Base path plus a sorted, form-encoded query. A filter named `search`
/// replaces the query value.
fn search_path(query: &str, filter: Option<&SearchFilter>) -> String {
    if query.is_empty() {
        return BASE_PATH.to_string();
    }

    let mut params: BTreeMap<&str, &str> = BTreeMap::new();
    params.insert("search", query);
    for (field, value) in filter.into_iter().flatten() {
        params.insert(field, value);
    }

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (field, value) in params {
        serializer.append_pair(field, value);
    }
    format!("{BASE_PATH}?{}", serializer.finish())
}
