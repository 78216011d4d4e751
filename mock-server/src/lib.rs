//! In-memory stand-in for the `/check_bundle` API.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Reported as `_last_modifed_by` on every write.
pub const MOCK_USER: &str = "/user/1";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metric {
    pub name: String,
    #[serde(rename = "type")]
    pub metric_type: String,
    pub units: String,
    pub status: String,
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckBundle {
    #[serde(rename = "_check_uuids")]
    pub check_uuids: Vec<String>,
    #[serde(rename = "_checks")]
    pub checks: Vec<String>,
    #[serde(rename = "_cid")]
    pub cid: String,
    #[serde(rename = "_created")]
    pub created: i64,
    #[serde(rename = "_last_modified")]
    pub last_modified: i64,
    #[serde(rename = "_last_modifed_by")]
    pub last_modified_by: String,
    #[serde(rename = "_reverse_connection_urls")]
    pub reverse_connection_urls: Vec<String>,
    pub brokers: Vec<String>,
    pub config: BTreeMap<String, String>,
    pub display_name: String,
    pub metrics: Vec<Metric>,
    pub metric_limit: i64,
    pub notes: String,
    pub period: i64,
    pub status: String,
    pub tags: Vec<String>,
    pub target: String,
    pub timeout: i64,
    #[serde(rename = "type")]
    pub bundle_type: String,
}

#[derive(Default)]
pub struct Store {
    last_id: u64,
    bundles: BTreeMap<u64, CheckBundle>,
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/check_bundle", get(list_bundles).post(create_bundle))
        .route(
            "/check_bundle/{id}",
            get(get_bundle).put(update_bundle).delete(delete_bundle),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_bundles(
    State(db): State<Db>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Vec<CheckBundle>> {
    let store = db.read().await;
    let search = params.get("search").map(String::as_str).unwrap_or_default();
    let filters: Vec<(&str, &str)> = params
        .iter()
        .filter(|(field, _)| field.as_str() != "search")
        .map(|(field, value)| (field.as_str(), value.as_str()))
        .collect();

    let found = store
        .bundles
        .values()
        .filter(|bundle| matches_search(bundle, search))
        .filter(|bundle| matches_filters(bundle, &filters))
        .cloned()
        .collect();
    Json(found)
}

async fn create_bundle(State(db): State<Db>, Json(input): Json<CheckBundle>) -> Json<CheckBundle> {
    let mut store = db.write().await;
    store.last_id += 1;
    let id = store.last_id;
    let now = unix_now();

    let mut bundle = CheckBundle {
        cid: format!("/check_bundle/{id}"),
        created: now,
        checks: vec![format!("/check/{id}")],
        check_uuids: vec![Uuid::new_v4().to_string()],
        reverse_connection_urls: Vec::new(),
        ..CheckBundle::default()
    };
    apply_update(&mut bundle, input, now);
    store.bundles.insert(id, bundle.clone());

    tracing::info!(cid = %bundle.cid, "created check bundle");
    Json(bundle)
}

async fn get_bundle(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Json<CheckBundle>, StatusCode> {
    let store = db.read().await;
    store.bundles.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_bundle(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<CheckBundle>,
) -> Result<Json<CheckBundle>, StatusCode> {
    let mut store = db.write().await;
    let bundle = store.bundles.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    apply_update(bundle, input, unix_now());
    tracing::info!(cid = %bundle.cid, "updated check bundle");
    Ok(Json(bundle.clone()))
}

async fn delete_bundle(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<StatusCode, StatusCode> {
    let mut store = db.write().await;
    store.bundles.remove(&id).ok_or(StatusCode::NOT_FOUND)?;
    tracing::info!(id, "deleted check bundle");
    Ok(StatusCode::NO_CONTENT)
}

/// Replace every client-writable field; server-assigned fields only move
/// forward.
fn apply_update(bundle: &mut CheckBundle, input: CheckBundle, now: i64) {
    bundle.brokers = input.brokers;
    bundle.config = input.config;
    bundle.display_name = input.display_name;
    bundle.metrics = input.metrics;
    bundle.metric_limit = input.metric_limit;
    bundle.notes = input.notes;
    bundle.period = input.period;
    bundle.status = input.status;
    bundle.tags = input.tags;
    bundle.target = input.target;
    bundle.timeout = input.timeout;
    bundle.bundle_type = input.bundle_type;
    bundle.last_modified = now;
    bundle.last_modified_by = MOCK_USER.to_string();
}

/// Case-insensitive substring match on display name, target, type and tags.
fn matches_search(bundle: &CheckBundle, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    [&bundle.display_name, &bundle.target, &bundle.bundle_type]
        .into_iter()
        .chain(bundle.tags.iter())
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Each `field=value` (or `f_field=value`) pair must equal the top-level
/// field of that name. Pairs naming no known field are ignored.
fn matches_filters(bundle: &CheckBundle, filters: &[(&str, &str)]) -> bool {
    if filters.is_empty() {
        return true;
    }
    let Ok(record) = serde_json::to_value(bundle) else {
        return false;
    };
    filters.iter().all(|&(field, expected)| {
        let field = field.strip_prefix("f_").unwrap_or(field);
        match record.get(field) {
            None => true,
            Some(Value::String(actual)) => actual == expected,
            Some(Value::Array(items)) => items.iter().any(|item| item.as_str() == Some(expected)),
            Some(other) => other.to_string() == expected,
        }
    })
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or_default()
}
