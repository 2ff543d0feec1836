//! Mock vendor APIs for E2E tests.
//!
//! Starts an in-process HTTP server that stands in for the video, image and
//! face-swap vendors and for a path-style S3 endpoint. Responses are
//! scripted per test and every request is recorded for assertions.

use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use serde_json::Value;
use std::collections::VecDeque;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};

/// A canned response.
#[derive(Debug, Clone)]
pub struct Scripted {
    pub status: u16,
    pub body: Value,
}

impl Scripted {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    pub fn status(status: u16, body: Value) -> Self {
        Self { status, body }
    }
}

/// A request as seen by the mock.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("request body is not JSON")
    }
}

/// Shared state for the mock vendors.
#[derive(Default)]
pub struct MockVendorState {
    pub requests: Vec<RecordedRequest>,
    pub video_submit: Option<Scripted>,
    /// Served in order; the last entry repeats
    pub video_status: VecDeque<Scripted>,
    pub image: Option<Scripted>,
    pub faceswap: Option<Scripted>,
    /// HTTP status for object uploads
    pub s3_status: u16,
}

type SharedState = web::Data<Arc<Mutex<MockVendorState>>>;

fn record(state: &SharedState, req: &HttpRequest, body: &web::Bytes) {
    let headers = req
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                value.to_str().unwrap_or_default().to_string(),
            )
        })
        .collect();

    state.lock().unwrap().requests.push(RecordedRequest {
        method: req.method().to_string(),
        path: req.path().to_string(),
        headers,
        body: body.to_vec(),
    });
}

fn respond(scripted: Option<Scripted>) -> HttpResponse {
    match scripted {
        Some(s) => HttpResponse::build(
            actix_web::http::StatusCode::from_u16(s.status).expect("invalid scripted status"),
        )
        .json(s.body),
        None => HttpResponse::NotFound().finish(),
    }
}

async fn video_submit(state: SharedState, req: HttpRequest, body: web::Bytes) -> HttpResponse {
    record(&state, &req, &body);
    let scripted = state.lock().unwrap().video_submit.clone();
    respond(scripted)
}

async fn video_status(state: SharedState, req: HttpRequest, body: web::Bytes) -> HttpResponse {
    record(&state, &req, &body);
    let scripted = {
        let mut guard = state.lock().unwrap();
        if guard.video_status.len() > 1 {
            guard.video_status.pop_front()
        } else {
            guard.video_status.front().cloned()
        }
    };
    respond(scripted)
}

async fn image_generation(state: SharedState, req: HttpRequest, body: web::Bytes) -> HttpResponse {
    record(&state, &req, &body);
    let scripted = state.lock().unwrap().image.clone();
    respond(scripted)
}

async fn faceswap(state: SharedState, req: HttpRequest, body: web::Bytes) -> HttpResponse {
    record(&state, &req, &body);
    let scripted = state.lock().unwrap().faceswap.clone();
    respond(scripted)
}

async fn s3_put_object(state: SharedState, req: HttpRequest, body: web::Bytes) -> HttpResponse {
    record(&state, &req, &body);
    let status = state.lock().unwrap().s3_status;
    if status == 200 {
        HttpResponse::Ok()
            .insert_header(("ETag", "\"d41d8cd98f00b204e9800998ecf8427e\""))
            .finish()
    } else {
        HttpResponse::build(
            actix_web::http::StatusCode::from_u16(status).expect("invalid scripted status"),
        )
        .content_type("application/xml")
        .body(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
             <Error><Code>AccessDenied</Code><Message>Access Denied</Message>\
             <RequestId>mock</RequestId></Error>",
        )
    }
}

/// Mock vendor server.
pub struct MockVendor {
    pub base_url: String,
    pub state: Arc<Mutex<MockVendorState>>,
}

impl MockVendor {
    /// Start the mock vendors on an ephemeral port.
    pub async fn start() -> Self {
        let state = Arc::new(Mutex::new(MockVendorState {
            s3_status: 200,
            ..MockVendorState::default()
        }));

        let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind");
        let port = listener.local_addr().unwrap().port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let state_data = state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(state_data.clone()))
                .route("/api/v1/task", web::post().to(video_submit))
                .route("/api/v1/task/{task_id}", web::get().to(video_status))
                .route("/v1/image_generation", web::post().to(image_generation))
                .route("/faceswapbase64", web::post().to(faceswap))
                // Path-style object storage, registered last
                .route("/{bucket}/{key:.*}", web::put().to(s3_put_object))
        })
        .workers(1)
        .listen(listener)
        .expect("failed to listen")
        .disable_signals()
        .run();

        // Fire and forget, the server lives for the test's runtime
        tokio::spawn(server);

        MockVendor { base_url, state }
    }

    pub fn script_video_submit(&self, response: Scripted) {
        self.state.lock().unwrap().video_submit = Some(response);
    }

    pub fn script_video_status(&self, responses: Vec<Scripted>) {
        self.state.lock().unwrap().video_status = responses.into();
    }

    pub fn script_image(&self, response: Scripted) {
        self.state.lock().unwrap().image = Some(response);
    }

    pub fn script_faceswap(&self, response: Scripted) {
        self.state.lock().unwrap().faceswap = Some(response);
    }

    pub fn script_s3_status(&self, status: u16) {
        self.state.lock().unwrap().s3_status = status;
    }

    /// Recorded requests whose path starts with `prefix`.
    pub fn requests_to(&self, prefix: &str) -> Vec<RecordedRequest> {
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|r| r.path.starts_with(prefix))
            .cloned()
            .collect()
    }
}
