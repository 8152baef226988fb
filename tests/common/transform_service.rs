//! Throwaway transform service bound to an ephemeral local port. Records
//! every multipart upload and answers with a canned status and body.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{Multipart, State},
    http::{StatusCode, Uri},
    response::IntoResponse,
    routing::post,
    Router,
};

#[derive(Clone, Debug)]
pub struct Upload {
    pub path: String,
    pub field: String,
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
struct ServiceState {
    status: StatusCode,
    body: Vec<u8>,
    uploads: Arc<Mutex<Vec<Upload>>>,
}

pub struct TransformService {
    pub base_url: String,
    uploads: Arc<Mutex<Vec<Upload>>>,
}

impl TransformService {
    pub fn uploads(&self) -> Vec<Upload> {
        self.uploads.lock().unwrap().clone()
    }
}

async fn transform(
    State(state): State<ServiceState>,
    uri: Uri,
    mut multipart: Multipart,
) -> impl IntoResponse {
    while let Some(field) = multipart.next_field().await.unwrap() {
        let upload = Upload {
            path: uri.path().to_string(),
            field: field.name().unwrap_or_default().to_string(),
            file_name: field.file_name().map(str::to_string),
            bytes: field.bytes().await.unwrap().to_vec(),
        };
        state.uploads.lock().unwrap().push(upload);
    }
    (state.status, state.body.clone())
}

/// Start a service answering `status` with `body` on both endpoints.
pub async fn spawn(status: StatusCode, body: Vec<u8>) -> TransformService {
    let uploads = Arc::new(Mutex::new(Vec::new()));
    let state = ServiceState {
        status,
        body,
        uploads: Arc::clone(&uploads),
    };
    let app = Router::new()
        .route("/transform/forward", post(transform))
        .route("/transform/reverse", post(transform))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TransformService {
        base_url: format!("http://{}", addr),
        uploads,
    }
}

/// Base URL of a port nothing is listening on.
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
