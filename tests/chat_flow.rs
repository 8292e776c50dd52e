//! End-to-end turns against a local stand-in for the inference endpoint.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use serde_json::{Value, json};

use heya::error::RequestError;
use heya::inference::{HttpInferenceClient, InferenceClient, InferenceSettings};
use heya::persistence::{FileStore, HistoryStore};
use heya::session::{
    ChatSession, EMPTY_RESPONSE_PLACEHOLDER, REQUEST_FAILED_MESSAGE, SendOutcome, Sender,
};

type Asked = Arc<Mutex<Vec<Value>>>;

async fn answer(State(asked): State<Asked>, Json(body): Json<Value>) -> Json<Value> {
    let reply = match body["question"].as_str() {
        Some("Hello") => "Hi there".to_string(),
        Some(q) => format!("You asked: {q}"),
        None => String::new(),
    };
    asked.lock().unwrap().push(body);
    Json(json!({ "response": reply }))
}

async fn fail() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn empty() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn garbage() -> &'static str {
    "definitely not json"
}

/// Start the stand-in endpoint on an ephemeral port.
async fn spawn_endpoint() -> (SocketAddr, Asked) {
    let asked = Asked::default();
    let app = Router::new()
        .route("/ask", post(answer))
        .route("/fail", post(fail))
        .route("/empty", post(empty))
        .route("/garbage", post(garbage))
        .with_state(Arc::clone(&asked));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, asked)
}

fn client(addr: SocketAddr, path: &str) -> Arc<HttpInferenceClient> {
    Arc::new(HttpInferenceClient::new(InferenceSettings {
        endpoint: format!("http://{addr}{path}"),
    }))
}

#[tokio::test]
async fn test_client_posts_question_body() {
    let (addr, asked) = spawn_endpoint().await;

    let answer = client(addr, "/ask").ask("Hello").await.unwrap();

    assert_eq!(answer, "Hi there");
    assert_eq!(*asked.lock().unwrap(), vec![json!({ "question": "Hello" })]);
}

#[tokio::test]
async fn test_client_reports_error_status() {
    let (addr, _) = spawn_endpoint().await;

    let err = client(addr, "/fail").ask("Hello").await.unwrap_err();
    assert!(matches!(err, RequestError::Status { status: 500 }));
}

#[tokio::test]
async fn test_client_treats_missing_field_as_empty() {
    let (addr, _) = spawn_endpoint().await;

    let answer = client(addr, "/empty").ask("Hello").await.unwrap();
    assert_eq!(answer, "");
}

#[tokio::test]
async fn test_client_rejects_non_json_body() {
    let (addr, _) = spawn_endpoint().await;

    let err = client(addr, "/garbage").ask("Hello").await.unwrap_err();
    assert!(matches!(err, RequestError::Decode(_)));
}

#[tokio::test]
async fn test_client_reports_unreachable_endpoint() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(addr, "/ask").ask("Hello").await.unwrap_err();
    assert!(matches!(err, RequestError::Transport(_)));
}

#[tokio::test]
async fn test_turn_is_persisted_and_restored() {
    let (addr, _) = spawn_endpoint().await;
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn HistoryStore> = Arc::new(FileStore::new(dir.path(), "chatHistory"));

    let session = ChatSession::new(Arc::clone(&store), client(addr, "/ask"));
    let outcome = session.send_message(Some("Hello".to_string())).await;
    assert!(matches!(outcome, SendOutcome::Answered(ref m) if m.content == "Hi there"));

    // A fresh session over the same file sees the same transcript.
    let reopened = ChatSession::open(Arc::clone(&store), client(addr, "/ask"), None).await;
    let history = reopened.history().await;
    assert_eq!(history.len(), 2);
    assert_eq!(history.messages()[0].sender, Sender::User);
    assert_eq!(history.messages()[0].content, "Hello");
    assert_eq!(history.messages()[1].sender, Sender::Bot);
    assert_eq!(history.messages()[1].content, "Hi there");
    assert!(dir.path().join("chatHistory.json").exists());
}

#[tokio::test]
async fn test_server_error_keeps_only_user_entry() {
    let (addr, _) = spawn_endpoint().await;
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn HistoryStore> = Arc::new(FileStore::new(dir.path(), "chatHistory"));

    let session = ChatSession::new(Arc::clone(&store), client(addr, "/fail"));
    let outcome = session.send_message(Some("Hello".to_string())).await;

    assert_eq!(outcome, SendOutcome::Failed(REQUEST_FAILED_MESSAGE.to_string()));
    let snap = session.snapshot().await;
    assert_eq!(snap.messages.len(), 1);
    assert_eq!(snap.error.as_deref(), Some(REQUEST_FAILED_MESSAGE));
    assert!(!snap.loading);
    assert_eq!(store.load().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_empty_answer_becomes_placeholder() {
    let (addr, _) = spawn_endpoint().await;
    let store: Arc<dyn HistoryStore> = Arc::new(heya::persistence::MemoryStore::new());

    let session = ChatSession::new(store, client(addr, "/empty"));
    session.send_message(Some("Hello".to_string())).await;

    let history = session.history().await;
    assert_eq!(history.messages()[1].content, EMPTY_RESPONSE_PLACEHOLDER);
}

#[tokio::test]
async fn test_initial_question_sent_once_on_open() {
    let (addr, asked) = spawn_endpoint().await;
    let store: Arc<dyn HistoryStore> = Arc::new(heya::persistence::MemoryStore::new());

    let session = ChatSession::open(
        store,
        client(addr, "/ask"),
        Some("weather today".to_string()),
    )
    .await;

    assert_eq!(asked.lock().unwrap().len(), 1);
    let history = session.history().await;
    assert_eq!(history.messages()[0].content, "weather today");
    assert_eq!(history.messages()[1].content, "You asked: weather today");
}
