use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::util::ServiceExt;

use parley_api::config::ApiConfig;
use parley_api::router::build_router;
use parley_api::session::init_session;
use parley_core::{Chat, ChatStore};

static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);
static TEST_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

fn unique_test_root() -> PathBuf {
    let epoch_nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let seq = TEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("parley_api_sync_{}_{}", epoch_nanos, seq))
}

async fn fresh_app() -> (axum::Router, ChatStore) {
    let store = ChatStore::new(unique_test_root());
    init_session(store.clone()).await;
    (build_router(&ApiConfig::default()), store)
}

async fn post_json(
    app: &axum::Router,
    path: &str,
    payload: serde_json::Value,
) -> Result<(StatusCode, serde_json::Value), Box<dyn std::error::Error>> {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))?;
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let body_bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let body_json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice::<serde_json::Value>(&body_bytes)?
    };
    Ok((status, body_json))
}

async fn get_json(
    app: &axum::Router,
    path: &str,
) -> Result<(StatusCode, serde_json::Value), Box<dyn std::error::Error>> {
    let request = Request::builder()
        .method("GET")
        .uri(path)
        .body(Body::empty())?;
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let body_bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let body_json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice::<serde_json::Value>(&body_bytes)?
    };
    Ok((status, body_json))
}

async fn post_multipart(
    app: &axum::Router,
    path: &str,
    file_name: &str,
    file_bytes: &[u8],
    description: &str,
) -> Result<(StatusCode, serde_json::Value), Box<dyn std::error::Error>> {
    let boundary = "parley-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
            boundary, file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(file_bytes);
    body.extend_from_slice(
        format!(
            "\r\n--{}\r\nContent-Disposition: form-data; name=\"description\"\r\n\r\n{}\r\n--{}--\r\n",
            boundary, description, boundary
        )
        .as_bytes(),
    );

    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))?;
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let body_bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let body_json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice::<serde_json::Value>(&body_bytes)?
    };
    Ok((status, body_json))
}

#[tokio::test]
async fn test_open_send_and_repaint_flow() -> Result<(), Box<dyn std::error::Error>> {
    let _test_guard = TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let (app, _store) = fresh_app().await;

    let (status, opened) = post_json(
        &app,
        "/chat/open",
        json!({ "chatId": "standup", "userId": "alice" }),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(opened["id"], "standup");
    assert_eq!(opened["author"], "alice");
    assert_eq!(opened["messageCount"], 0);

    let (status, sent) = post_json(
        &app,
        "/chat/messages",
        json!({ "text": "hello from the api" }),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sent["message"]["text"], "hello from the api");
    assert_eq!(sent["message"]["author"], "alice");

    // Sending flagged a repaint: history is handed out exactly once.
    let (status, history) = get_json(&app, "/chat/history").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history["messages"].as_array().unwrap().len(), 1);
    assert_eq!(history["messages"][0]["text"], "hello from the api");

    let (status, _) = get_json(&app, "/chat/history").await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Nothing new on disk, so polling neither reports nor re-flags.
    let (status, polled) = get_json(&app, "/chat/status").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(polled["newMessages"], 0);
    assert_eq!(polled["status"], "New messages: 0");

    let (status, _) = get_json(&app, "/chat/history").await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    Ok(())
}

#[tokio::test]
async fn test_poll_detects_messages_from_another_writer() -> Result<(), Box<dyn std::error::Error>>
{
    let _test_guard = TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let (app, store) = fresh_app().await;

    let (status, _) = post_json(
        &app,
        "/chat/open",
        json!({ "chatId": "shared", "userId": "alice" }),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) =
        post_json(&app, "/chat/messages", json!({ "text": "session message" })).await?;
    assert_eq!(status, StatusCode::OK);

    // Drain the repaint flag before the external write happens.
    let (status, _) = get_json(&app, "/chat/history").await?;
    assert_eq!(status, StatusCode::OK);

    // Another writer of the same file appends a message out of band.
    let mut writer = Chat::with_id("shared", "writer");
    store.load(&mut writer)?;
    writer.compose("external append", Vec::new(), "bob");
    let msg = writer.take_draft();
    writer.queue(msg);
    store.save(&mut writer)?;

    let (status, polled) = get_json(&app, "/chat/status").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(polled["newMessages"], 1);
    assert_eq!(polled["status"], "New messages: 1");

    let (status, history) = get_json(&app, "/chat/history").await?;
    assert_eq!(status, StatusCode::OK);
    let messages = history["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1]["text"], "external append");
    assert_eq!(messages[1]["author"], "bob");

    // The merge is idempotent.
    let (status, polled) = get_json(&app, "/chat/status").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(polled["newMessages"], 0);

    Ok(())
}

#[tokio::test]
async fn test_media_upload_stages_on_draft_and_embeds_on_send(
) -> Result<(), Box<dyn std::error::Error>> {
    let _test_guard = TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let (app, _store) = fresh_app().await;

    let (status, _) = post_json(
        &app,
        "/chat/open",
        json!({ "chatId": "media_room", "userId": "alice" }),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, uploaded) =
        post_multipart(&app, "/media/upload", "pixel.png", b"\x89PNG\r\n", "one pixel").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(uploaded["ok"], true);
    assert_eq!(uploaded["fileName"], "pixel.png");

    // The upload flagged a media repaint with the staged preview.
    let (status, draft) = get_json(&app, "/media/draft").await?;
    assert_eq!(status, StatusCode::OK);
    let items = draft["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["kind"], "image");
    assert_eq!(items[0]["description"], "one pixel");
    assert!(items[0]["src"]
        .as_str()
        .unwrap()
        .starts_with("data:image/png;base64, "));

    let (status, _) = get_json(&app, "/media/draft").await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, sent) =
        post_json(&app, "/chat/messages", json!({ "text": "with attachment" })).await?;
    assert_eq!(status, StatusCode::OK);
    let media = sent["message"]["media"].as_object().unwrap();
    assert_eq!(media.len(), 1);

    // The attachment also lands in the persisted document.
    let (status, document) = get_json(&app, "/chat/document").await?;
    assert_eq!(status, StatusCode::OK);
    let messages = document["messages"].as_object().unwrap();
    assert_eq!(messages.len(), 1);
    let body = messages.values().next().unwrap();
    assert_eq!(body["text"], "with attachment");
    assert_eq!(body["media"].as_object().unwrap().len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_disallowed_extension_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let _test_guard = TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let (app, _store) = fresh_app().await;

    let (status, _) = post_json(
        &app,
        "/chat/open",
        json!({ "chatId": "strict_room", "userId": "alice" }),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, rejected) =
        post_multipart(&app, "/media/upload", "payload.exe", b"MZ", "nope").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(rejected["error"]
        .as_str()
        .unwrap()
        .contains("payload.exe not allowed"));

    Ok(())
}

#[tokio::test]
async fn test_erase_resets_the_chat_file() -> Result<(), Box<dyn std::error::Error>> {
    let _test_guard = TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let (app, store) = fresh_app().await;

    let (status, _) = post_json(
        &app,
        "/chat/open",
        json!({ "chatId": "doomed", "userId": "alice" }),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = post_json(&app, "/chat/messages", json!({ "text": "soon gone" })).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, erased) = post_json(
        &app,
        "/chat/erase",
        json!({ "chatId": "doomed", "userId": "alice" }),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(erased["messageCount"], 0);

    let mut reader = Chat::with_id("doomed", "reader");
    store.load(&mut reader)?;
    assert!(reader.msgs.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_status_without_an_open_chat_is_a_conflict() -> Result<(), Box<dyn std::error::Error>>
{
    let _test_guard = TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let (app, _store) = fresh_app().await;

    let (status, body) = get_json(&app, "/chat/status").await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("no chat is open"));

    Ok(())
}
