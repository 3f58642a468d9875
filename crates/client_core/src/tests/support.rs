use std::{
    collections::{HashMap, VecDeque},
    sync::Arc,
};

use async_trait::async_trait;
use axum::{
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use shared::protocol::LoginRequest;
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};
use url::Url;

use crate::{
    error::{ClientError, Result},
    transport::{Endpoints, HttpTransport, Method},
    Services,
};

pub(crate) const FAKE_BASE_URL: &str = "http://catalog.test";
pub(crate) const KNOWN_USERNAME: &str = "mor_2314";
pub(crate) const KNOWN_PASSWORD: &str = "83r5^_";
pub(crate) const ISSUED_TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.test";
pub(crate) const REJECTED_CREDENTIALS: &str = "username or password is incorrect";

pub(crate) enum Reply {
    Ready(Result<Value>),
    Gated(oneshot::Receiver<Result<Value>>),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

/// In-memory transport answering from scripted replies, keyed by method and
/// percent-encoded path. Gated replies resolve only when the test sends on
/// the returned channel.
#[derive(Default)]
pub(crate) struct FakeTransport {
    replies: Mutex<HashMap<(Method, String), VecDeque<Reply>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn reply(&self, method: Method, path: &str, outcome: Result<Value>) {
        self.replies
            .lock()
            .await
            .entry((method, path.to_string()))
            .or_default()
            .push_back(Reply::Ready(outcome));
    }

    pub async fn gate(&self, method: Method, path: &str) -> oneshot::Sender<Result<Value>> {
        let (tx, rx) = oneshot::channel();
        self.replies
            .lock()
            .await
            .entry((method, path.to_string()))
            .or_default()
            .push_back(Reply::Gated(rx));
        tx
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn count(&self, path: &str) -> usize {
        self.requests
            .lock()
            .await
            .iter()
            .filter(|request| request.path == path)
            .count()
    }

    /// Yields until `count` requests to `path` have been recorded.
    pub async fn wait_for(&self, path: &str, count: usize) {
        while self.count(path).await < count {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn request(&self, method: Method, url: Url, body: Option<Value>) -> Result<Value> {
        let path = url.path().to_string();
        self.requests.lock().await.push(RecordedRequest {
            method: method.clone(),
            path: path.clone(),
            body,
        });

        let reply = self
            .replies
            .lock()
            .await
            .get_mut(&(method, path.clone()))
            .and_then(VecDeque::pop_front);

        match reply {
            Some(Reply::Ready(outcome)) => outcome,
            Some(Reply::Gated(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(ClientError::network("gate dropped"))),
            None => Err(ClientError::Http {
                status: 404,
                body: format!("no scripted reply for {path}"),
            }),
        }
    }
}

pub(crate) fn fake_services(transport: Arc<FakeTransport>) -> Services {
    let endpoints = Endpoints::new(Url::parse(FAKE_BASE_URL).expect("base url")).expect("endpoints");
    Services::new(transport, endpoints)
}

pub(crate) fn product_json(id: i64, title: &str, category: &str, price: f64) -> Value {
    json!({
        "id": id,
        "title": title,
        "price": price,
        "description": format!("{title} description"),
        "category": category,
        "image": format!("https://img.test/{id}.jpg"),
        "rating": { "rate": 4.1, "count": 10 }
    })
}

pub(crate) fn catalog_fixture() -> Vec<Value> {
    vec![
        product_json(1, "Fjallraven Backpack", "men's clothing", 109.95),
        product_json(5, "Dragon Station Chain Bracelet", "jewelery", 695.0),
        product_json(9, "WD 2TB Elements Portable Hard Drive", "electronics", 64.0),
        product_json(10, "SanDisk SSD PLUS 1TB", "electronics", 109.0),
    ]
}

pub(crate) fn directory_fixture() -> Value {
    json!([
        { "id": 1, "username": "johnd", "email": "john@gmail.com", "password": "m38rmF$" },
        { "id": 2, "username": KNOWN_USERNAME, "email": "morrison@gmail.com", "password": KNOWN_PASSWORD }
    ])
}

async fn categories() -> Json<Value> {
    Json(json!(["electronics", "jewelery", "men's clothing", "women's clothing"]))
}

async fn products() -> Json<Vec<Value>> {
    Json(catalog_fixture())
}

async fn products_in_category(Path(category): Path<String>) -> Json<Vec<Value>> {
    Json(
        catalog_fixture()
            .into_iter()
            .filter(|product| product["category"] == category.as_str())
            .collect(),
    )
}

async fn product_by_id(Path(id): Path<i64>) -> Response {
    match catalog_fixture().into_iter().find(|product| product["id"] == id) {
        Some(product) => Json(product).into_response(),
        // The public catalog answers unknown ids with an empty 200.
        None => StatusCode::OK.into_response(),
    }
}

async fn users() -> Json<Value> {
    Json(directory_fixture())
}

async fn login(Json(payload): Json<LoginRequest>) -> Response {
    if payload.username == KNOWN_USERNAME && payload.password == KNOWN_PASSWORD {
        Json(json!({ "token": ISSUED_TOKEN })).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, REJECTED_CREDENTIALS).into_response()
    }
}

pub(crate) fn catalog_router() -> Router {
    Router::new()
        .route("/products", get(products))
        .route("/products/categories", get(categories))
        .route("/products/category/:category", get(products_in_category))
        .route("/products/:id", get(product_by_id))
        .route("/users", get(users))
        .route("/auth/login", post(login))
}

pub(crate) async fn spawn_server(app: Router) -> std::io::Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

pub(crate) async fn spawn_catalog_server() -> std::io::Result<String> {
    spawn_server(catalog_router()).await
}

/// A loopback address with nothing listening on it.
pub(crate) async fn unreachable_url() -> std::io::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}"))
}

pub(crate) fn live_services(base_url: &str) -> Services {
    let endpoints =
        Endpoints::new(Url::parse(base_url).expect("base url")).expect("endpoints");
    Services::new(Arc::new(crate::ReqwestTransport::new()), endpoints)
}
