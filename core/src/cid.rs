//! Check bundle identifiers.
//!
//! A CID is the resource's canonical path, `/check_bundle/<digits>`. Every
//! operation that addresses one bundle runs its identifier through
//! [`validate_cid`] before a request is built.

use crate::error::ApiError;

/// Collection path for check bundles.
pub const BASE_PATH: &str = "/check_bundle";

/// Build the CID for a numeric bundle id.
pub fn cid_for_id(id: u64) -> String {
    format!("{BASE_PATH}/{id}")
}

/// True when `cid` is exactly `/check_bundle/` followed by one or more ASCII
/// digits.
pub fn is_valid_cid(cid: &str) -> bool {
    match cid
        .strip_prefix(BASE_PATH)
        .and_then(|rest| rest.strip_prefix('/'))
    {
        Some(digits) => !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

/// Return `cid` unchanged if it is well formed, `ApiError::InvalidCid`
/// otherwise.
pub fn validate_cid(cid: &str) -> Result<&str, ApiError> {
    if is_valid_cid(cid) {
        Ok(cid)
    } else {
        tracing::warn!(cid, "rejected malformed check bundle CID");
        Err(ApiError::InvalidCid(cid.to_string()))
    }
}
