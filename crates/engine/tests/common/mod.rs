#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use deepscan_engine as ds;
use image::{ImageBuffer, Rgb};

/// Create a tiny RGB JPEG image and return its bytes.
pub fn make_test_jpeg_bytes() -> Vec<u8> {
    // 8x8 solid color image
    let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_fn(8, 8, |_x, _y| Rgb([128, 200, 50]));
    let dynimg = image::DynamicImage::ImageRgb8(img);
    let mut out: Vec<u8> = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut out);
    dynimg.write_to(&mut cursor, image::ImageOutputFormat::Jpeg(80)).expect("jpeg encode");
    out
}

pub fn jpeg_candidate() -> ds::ImageCandidate {
    ds::ImageCandidate::new(make_test_jpeg_bytes(), "image/jpeg").with_file_name("portrait.jpg")
}

/// In-memory preview store that tracks which previews are alive.
#[derive(Default)]
pub struct CountingPreviews {
    next_id: AtomicU64,
    created: AtomicUsize,
    released: AtomicUsize,
    live: Mutex<HashSet<u64>>,
    fail_next: AtomicBool,
}

impl CountingPreviews {
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub fn live(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.live.lock().unwrap().iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn fail_next_create(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

impl ds::PreviewStore for CountingPreviews {
    fn create(&self, _data: &[u8], _media_type: &str) -> ds::EngineResult<ds::PreviewRef> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into());
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.created.fetch_add(1, Ordering::SeqCst);
        self.live.lock().unwrap().insert(id);
        Ok(ds::PreviewRef::new(id, format!("/mem/preview-{id}")))
    }

    fn release(&self, preview: ds::PreviewRef) {
        assert!(self.live.lock().unwrap().remove(&preview.id()), "preview {} released twice", preview.id());
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct Harness<C> {
    pub workflow: ds::DetectionWorkflow<C>,
    pub sink: Arc<ds::RecordingSink>,
    pub previews: Arc<CountingPreviews>,
}

pub fn harness<C: ds::Classifier>(classifier: C, config: ds::DetectionConfig) -> Harness<C> {
    let sink = Arc::new(ds::RecordingSink::new());
    let previews = Arc::new(CountingPreviews::default());
    let workflow = ds::DetectionWorkflow::new(classifier, config, sink.clone(), previews.clone());
    Harness { workflow, sink, previews }
}

pub fn scripted_harness(classifier: ds::ScriptedClassifier) -> Harness<ds::ScriptedClassifier> {
    harness(classifier, ds::DetectionConfig::default())
}

/// One multipart field as seen by the mock server.
#[derive(Debug, Clone)]
pub struct ReceivedField {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub len: usize,
}

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    body: String,
    hits: Arc<AtomicUsize>,
    fields: Arc<Mutex<Vec<ReceivedField>>>,
}

/// A `/predict` + `/health` server on an ephemeral local port.
pub struct MockPredictServer {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
    fields: Arc<Mutex<Vec<ReceivedField>>>,
}

impl MockPredictServer {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn fields(&self) -> Vec<ReceivedField> {
        self.fields.lock().unwrap().clone()
    }

    pub fn config(&self) -> ds::DetectionConfig {
        ds::DetectionConfig::new(self.base_url.clone(), ds::LimitsConfig::defaults()).expect("mock config")
    }
}

async fn predict(State(st): State<MockState>, mut multipart: Multipart) -> (StatusCode, String) {
    st.hits.fetch_add(1, Ordering::SeqCst);
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let len = field.bytes().await.map(|b| b.len()).unwrap_or(0);
        st.fields.lock().unwrap().push(ReceivedField { name, file_name, content_type, len });
    }
    (st.status, st.body.clone())
}

/// Serve `status` + `body` for every `POST /predict`.
pub async fn spawn_predict_server(status: u16, body: &str) -> MockPredictServer {
    let hits = Arc::new(AtomicUsize::new(0));
    let fields = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        status: StatusCode::from_u16(status).expect("status"),
        body: body.to_string(),
        hits: hits.clone(),
        fields: fields.clone(),
    };
    let app = Router::new()
        .route("/predict", post(predict))
        .route(
            "/health",
            get(|| async { Json(serde_json::json!({ "status": "ok", "device": "cpu" })) }),
        )
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind mock server");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock server");
    });
    MockPredictServer { base_url: format!("http://{addr}"), hits, fields }
}

/// Base URL of a local port with nothing listening on it.
pub fn dead_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}
