//! In-process HTTP server standing in for upstream services in client tests

use std::sync::{Arc, Mutex};

use actix_web::http::header::HeaderMap;
use actix_web::http::StatusCode;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use serde_json::Value;

/// One request as received by the stub
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Raw path, still percent-encoded
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

/// Answers every request with the same canned reply and records what it received
pub struct StubServer {
    pub url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubServer {
    /// Start on an ephemeral port. A `Value::String` reply is sent as plain text,
    /// anything else as JSON. Must be called inside an actix system.
    pub fn start(status: u16, reply: Value) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);
        let status = StatusCode::from_u16(status).unwrap();

        let server = HttpServer::new(move || {
            let recorded = Arc::clone(&recorded);
            let reply = reply.clone();
            App::new().default_service(web::to(move |req: HttpRequest, body: web::Bytes| {
                let recorded = Arc::clone(&recorded);
                let reply = reply.clone();
                async move {
                    recorded.lock().unwrap().push(RecordedRequest {
                        method: req.method().to_string(),
                        path: req.uri().path().to_string(),
                        query: req.uri().query().map(str::to_string),
                        headers: req.headers().clone(),
                        body: body.to_vec(),
                    });
                    match reply {
                        Value::String(text) => HttpResponse::build(status).body(text),
                        other => HttpResponse::build(status).json(other),
                    }
                }
            }))
        })
        .workers(1)
        .disable_signals()
        .bind(("127.0.0.1", 0))
        .unwrap();

        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());

        Self {
            url: format!("http://{}", addr),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// The only request received; fails the test otherwise
    pub fn single_request(&self) -> RecordedRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests.into_iter().next().unwrap()
    }
}
