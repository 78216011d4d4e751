//! Full check bundle lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives every
//! `CheckBundleApi` operation through a ureq-backed `Transport`. Validates
//! that request building, identifier handling and response decoding agree
//! with a real HTTP server.

use checkbundle_core::{
    ApiError, CheckBundle, CheckBundleApi, CheckBundleMetric, HttpResponse, SearchFilter,
    Transport, TransportError,
};

/// Blocking transport resolving relative paths against `base_url`.
///
/// Status codes are returned as data and mapped by `HttpResponse::into_body`,
/// so 4xx/5xx replies become `TransportError::Status`.
struct UreqTransport {
    agent: ureq::Agent,
    base_url: String,
}

impl UreqTransport {
    fn new(base_url: String) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

fn finish(
    result: Result<ureq::http::Response<ureq::Body>, ureq::Error>,
) -> Result<Vec<u8>, TransportError> {
    let mut response = result.map_err(|e| TransportError::Connection(e.to_string()))?;
    let status = response.status().as_u16();
    let body = response
        .body_mut()
        .read_to_vec()
        .map_err(|e| TransportError::Connection(e.to_string()))?;
    HttpResponse { status, body }.into_body()
}

impl Transport for UreqTransport {
    fn get(&self, path: &str) -> Result<Vec<u8>, TransportError> {
        finish(self.agent.get(&self.url(path)).call())
    }

    fn post(&self, path: &str, body: &[u8]) -> Result<Vec<u8>, TransportError> {
        finish(
            self.agent
                .post(&self.url(path))
                .content_type("application/json")
                .send(body),
        )
    }

    fn put(&self, path: &str, body: &[u8]) -> Result<Vec<u8>, TransportError> {
        finish(
            self.agent
                .put(&self.url(path))
                .content_type("application/json")
                .send(body),
        )
    }

    fn delete(&self, path: &str) -> Result<Vec<u8>, TransportError> {
        finish(self.agent.delete(&self.url(path)).call())
    }
}

fn start_mock_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn http_bundle() -> CheckBundle {
    CheckBundle {
        brokers: vec!["/broker/1".to_string()],
        config: [("url".to_string(), "https://web.example.com/".to_string())]
            .into_iter()
            .collect(),
        display_name: "web.example.com http".to_string(),
        metrics: vec![
            CheckBundleMetric::new("duration", "numeric"),
            CheckBundleMetric::new("code", "text"),
        ],
        metric_limit: -1,
        period: 60,
        status: "active".to_string(),
        tags: vec!["env:prod".to_string()],
        target: "web.example.com".to_string(),
        timeout: 10,
        bundle_type: "http".to_string(),
        ..CheckBundle::default()
    }
}

#[test]
fn crud_lifecycle() {
    // Step 1: start mock server on a random port.
    let api = CheckBundleApi::new(UreqTransport::new(start_mock_server()));

    // Step 2: search without a query, should be empty.
    let bundles = api.search("").unwrap();
    assert!(bundles.is_empty(), "expected empty list");

    // Step 3: create, the server assigns identity.
    let input = http_bundle();
    assert_eq!(input.cid(), None);
    let created = api.create(&input).unwrap();
    let cid = created.cid().expect("server assigns a cid").to_string();
    assert_eq!(cid, "/check_bundle/1");
    assert_eq!(created.display_name, input.display_name);
    assert_eq!(created.metrics, input.metrics);
    assert_eq!(created.config, input.config);
    assert_eq!(created.checks, ["/check/1"]);

    // Step 4: fetch by cid and by numeric id.
    assert_eq!(api.fetch_by_cid(&cid).unwrap(), created);
    assert_eq!(api.fetch_by_id(1).unwrap(), created);

    // Step 5: update.
    let mut changed = created.clone();
    changed.period = 30;
    changed.notes = "tighter interval".to_string();
    changed.tags.push("team:web".to_string());
    let updated = api.update(&changed).unwrap();
    assert_eq!(updated.cid, cid);
    assert_eq!(updated.period, 30);
    assert_eq!(updated.notes, "tighter interval");
    assert_eq!(updated.tags, ["env:prod", "team:web"]);
    assert_eq!(updated.created, created.created);

    // Step 6: search and filter.
    assert_eq!(api.search("team:web").unwrap().len(), 1);
    assert!(api.search("database").unwrap().is_empty());
    let ping_only = SearchFilter::from([("f_type".to_string(), "ping_icmp".to_string())]);
    assert!(api.filter_search("web", &ping_only).unwrap().is_empty());
    assert_eq!(api.filter_search("", &ping_only).unwrap().len(), 1);
    let http_only = SearchFilter::from([("f_type".to_string(), "http".to_string())]);
    assert_eq!(api.filter_search("web", &http_only).unwrap()[0].cid, cid);

    // Step 7: delete.
    assert!(api.delete(&updated).unwrap());

    // Step 8: fetch after delete, should be a 404.
    let err = api.fetch_by_cid(&cid).unwrap_err();
    assert_eq!(err.status(), Some(404));

    // Step 9: delete again, should be a 404.
    let err = api.delete_by_cid(&cid).unwrap_err();
    assert_eq!(err.status(), Some(404));

    // Step 10: malformed identifiers are rejected locally.
    let err = api.fetch_by_cid("/check_bundle/").unwrap_err();
    assert!(matches!(err, ApiError::InvalidCid(_)));

    // Step 11: search, should be empty again.
    assert!(api.search("").unwrap().is_empty(), "expected empty list after delete");
}

#[test]
fn unreachable_server_is_a_connection_error() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let api = CheckBundleApi::new(UreqTransport::new(format!("http://{addr}")));

    let err = api.fetch_by_id(1).unwrap_err();
    match err {
        ApiError::Transport { source: TransportError::Connection(_), path, .. } => {
            assert_eq!(path, "/check_bundle/1");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
