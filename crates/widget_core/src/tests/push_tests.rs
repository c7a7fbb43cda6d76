use std::time::Duration;

use axum::{
    extract::ws::{Message as WsMessage, WebSocket, WebSocketUpgrade},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde_json::json;

use super::*;

#[test]
fn publish_without_subscribers_reaches_nobody() {
    let channel = PushChannel::new(4);
    assert_eq!(channel.publish(PushUpdate::text("/status/a", "x")), 0);

    let mut rx = channel.subscribe();
    let second = channel.subscribe();
    assert_eq!(channel.subscriber_count(), 2);
    assert_eq!(channel.publish(PushUpdate::value("/status/a", json!(3))), 2);
    drop(second);

    let update = rx.try_recv().expect("delivered");
    assert_eq!(update.command_id, "/status/a");
    assert_eq!(update.display_text().as_deref(), Some("3"));
}

#[test]
fn query_frame_lists_addresses() {
    let frame = query_frame(&["/status/a".to_string(), "/status/b".to_string()]);
    let parsed: serde_json::Value = serde_json::from_str(&frame).expect("json");
    assert_eq!(parsed, json!({ "query": ["/status/a", "/status/b"] }));
}

async fn answer_query(mut socket: WebSocket) {
    let Some(Ok(WsMessage::Text(query))) = socket.recv().await else {
        return;
    };
    let query: StatusQuery = serde_json::from_str(&query).expect("status query");
    let _ = socket
        .send(WsMessage::Text("not a push update".to_string()))
        .await;
    for addr in query.query {
        let update = serde_json::to_string(&PushUpdate::value(addr, json!(42))).expect("json");
        let _ = socket.send(WsMessage::Text(update)).await;
    }
    let _ = socket.send(WsMessage::Close(None)).await;
}

async fn ws_handler(ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(answer_query)
}

async fn spawn_push_server() -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let app = Router::new().route("/ws", get(ws_handler));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("ws://{addr}/ws")
}

#[tokio::test]
async fn feed_republishes_decoded_updates() {
    let ws_url = spawn_push_server().await;
    let channel = PushChannel::new(8);
    let mut rx = channel.subscribe();

    let feed = spawn_push_feed(&ws_url, channel.clone(), &["/status/temp".to_string()])
        .await
        .expect("connected");

    let update = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("update in time")
        .expect("channel open");
    assert_eq!(update, PushUpdate::value("/status/temp", json!(42)));

    tokio::time::timeout(Duration::from_secs(5), feed)
        .await
        .expect("feed stops on close")
        .expect("feed task");
}

#[tokio::test]
async fn unreachable_feed_is_reported() {
    let err = spawn_push_feed("ws://127.0.0.1:1/ws", PushChannel::default(), &[])
        .await
        .expect_err("nothing listens there");
    assert!(matches!(err, WidgetError::PushFeed(_)));
}
