use httpmock::prelude::*;
use httpmock::{
    Mock,
    Then,
    When,
};
use k8s_openapi::api::core::v1 as corev1;
use serde_json::json;

pub struct MockServerBuilder {
    server: MockServer,
    handlers: Vec<Box<dyn Fn(When, Then)>>,
    mock_ids: Vec<usize>,
}

fn print_req(req: &HttpMockRequest) -> bool {
    // Use println instead of info! so that this works outside of the lib crate
    println!("    Received: {} {}", req.method(), req.uri().path());
    true
}

impl MockServerBuilder {
    pub fn new() -> MockServerBuilder {
        MockServerBuilder {
            server: MockServer::start(),
            handlers: vec![],
            mock_ids: vec![],
        }
    }

    pub fn assert(&self) {
        for id in &self.mock_ids {
            println!("checking assertions for mock {id}");
            Mock::new(*id, &self.server).assert()
        }
    }

    pub fn handle<F: Fn(When, Then) + 'static>(&mut self, f: F) -> &mut Self {
        self.handlers.push(Box::new(move |w, t| {
            let w = w.matches(print_req);
            f(w, t);
        }));
        self
    }

    // The initial list call for a namespaced pod watch; the limit query param distinguishes it
    // from the follow-up watch call
    pub fn handle_pod_list(&mut self, namespace: &str, pods: Vec<corev1::Pod>) -> &mut Self {
        let path = format!("/api/v1/namespaces/{namespace}/pods");
        let body = pod_list(pods);
        self.handle(move |when, then| {
            when.path(&path).method(GET).query_param("limit", "500");
            then.json_body(body.clone());
        })
    }

    // Fail the long-running watch call so the stream ends after the initial list
    pub fn handle_pod_watch_failure(&mut self, namespace: &str) -> &mut Self {
        let path = format!("/api/v1/namespaces/{namespace}/pods");
        self.handle(move |when, then| {
            when.path(&path).method(GET).query_param("watch", "true");
            then.status(500).json_body(status_internal_error());
        })
    }

    pub fn handle_forbidden(&mut self, path: String) -> &mut Self {
        self.handle(move |when, then| {
            when.path(&path);
            then.status(403).json_body(status_forbidden());
        })
    }

    pub fn build(&mut self) {
        for f in self.handlers.iter() {
            self.mock_ids.push(self.server.mock(f).id);
        }

        // Print all unmatched/unhandled requests for easier debugging;
        // this has to go last so that the other mock rules have a chance
        // to match first
        self.server.mock(|when, then| {
            when.matches(print_req);
            then.status(404).json_body(status_not_found());
        });
    }

    pub fn url(&self) -> http::Uri {
        http::Uri::try_from(self.server.url("/")).unwrap()
    }
}

impl Default for MockServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn make_fake_apiserver() -> (MockServerBuilder, kube::Client) {
    let builder = MockServerBuilder::new();
    let config = kube::Config::new(builder.url());
    let client = kube::Client::try_from(config).unwrap();
    (builder, client)
}

pub fn pod_list(pods: Vec<corev1::Pod>) -> serde_json::Value {
    json!({
        "kind": "PodList",
        "apiVersion": "v1",
        "metadata": {"resourceVersion": "1"},
        "items": pods,
    })
}

pub fn status_not_found() -> serde_json::Value {
    json!({
      "kind": "Status",
      "apiVersion": "v1",
      "metadata": {},
      "status": "Failure",
      "reason": "NotFound",
      "code": 404
    })
}

pub fn status_forbidden() -> serde_json::Value {
    json!({
      "kind": "Status",
      "apiVersion": "v1",
      "metadata": {},
      "status": "Failure",
      "message": "pods is forbidden",
      "reason": "Forbidden",
      "code": 403
    })
}

pub fn status_internal_error() -> serde_json::Value {
    json!({
      "kind": "Status",
      "apiVersion": "v1",
      "metadata": {},
      "status": "Failure",
      "reason": "InternalError",
      "code": 500
    })
}
