//! Synchronous client binding for the monitoring API's `/check_bundle`
//! resource.
//!
//! # Overview
//! Fetch, search, create, update and delete check bundles. Requests are
//! built as plain data and handed to an injected [`Transport`], which owns
//! the base URL, authentication and connections.
//!
//! # Design
//! - `CheckBundleClient` is stateless: `build_*` produces an `HttpRequest`,
//!   `parse_*` decodes a response body. Hosts that execute HTTP themselves
//!   can stop here.
//! - `CheckBundleApi<T>` runs build, transport and parse for each operation
//!   and holds nothing but the transport.
//! - Every identifier-addressed operation validates its CID against
//!   `/check_bundle/<digits>` before anything is sent.
//!
//! ```
//! use checkbundle_core::{CheckBundleClient, HttpMethod};
//!
//! let request = CheckBundleClient::new().build_fetch_by_id(1234);
//! assert_eq!(request.method, HttpMethod::Get);
//! assert_eq!(request.path, "/check_bundle/1234");
//! ```

pub mod api;
pub mod cid;
pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use api::CheckBundleApi;
pub use cid::{cid_for_id, is_valid_cid, validate_cid, BASE_PATH};
pub use client::{CheckBundleClient, SearchFilter};
pub use error::{ApiError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use types::{CheckBundle, CheckBundleConfig, CheckBundleMetric};
