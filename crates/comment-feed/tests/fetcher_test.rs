//! Integration tests for [`comment_feed::CommentFetcher`] against a mockito upstream.
//!
//! Covers: text filtering, dedupe across calls (even when upstream repeats ids), query
//! parameters sent, and decode errors carrying the HTTP status.

use comment_feed::{CommentFetcher, CommentSource, FeedError};
use mockito::Matcher;

fn envelope(records: &[(&str, &str)]) -> String {
    let comments: Vec<serde_json::Value> = records
        .iter()
        .map(|(id, text)| {
            serde_json::json!({
                "user_name": format!("user-{id}"),
                "profile_image_url": format!("https://img.example/{id}.png"),
                "comment": text,
                "id": id,
                "created_at": "2024-05-01T10:00:00Z",
            })
        })
        .collect();
    serde_json::json!({ "status": "ok", "comments": comments }).to_string()
}

/// **Test: Filtered and already-returned comments never come back.**
///
/// **Setup:** First upstream batch `a:"hello"`, `b:"#tag"`; second batch `a:"hello"`, `c:"hi"`.
/// **Expected:** first call returns only `a`; second call returns only `c`.
#[tokio::test]
async fn fetch_filters_tags_and_dedupes_across_calls() {
    let mut server = mockito::Server::new_async().await;
    let fetcher = CommentFetcher::new(&server.url()).unwrap();

    let first_mock = server
        .mock("GET", "/")
        .match_query(Matcher::UrlEncoded("live_id".into(), "live-1".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(envelope(&[("a", "hello"), ("b", "#tag")]))
        .expect(1)
        .create_async()
        .await;

    let first = fetcher.fetch("live-1", "").await.unwrap();
    first_mock.assert_async().await;
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].comment_id, "a");
    assert_eq!(first[0].user_comment, "hello");
    assert_eq!(first[0].user_name, "user-a");
    assert_eq!(first[0].user_icon_url, "https://img.example/a.png");
    first_mock.remove_async().await;

    let _second_mock = server
        .mock("GET", "/")
        .match_query(Matcher::UrlEncoded("live_id".into(), "live-1".into()))
        .with_status(200)
        .with_body(envelope(&[("a", "hello"), ("c", "hi")]))
        .create_async()
        .await;

    let second = fetcher.fetch_new_comments("live-1", "").await.unwrap();
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].comment_id, "c");
    assert_eq!(fetcher.seen_count(), 2);
}

/// **Test: A repeated batch yields an empty list, not an error.**
#[tokio::test]
async fn fetch_returns_empty_when_everything_was_seen() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(envelope(&[("x", "first")]))
        .expect(2)
        .create_async()
        .await;

    let fetcher = CommentFetcher::new(&server.url()).unwrap();
    assert_eq!(fetcher.fetch("live-1", "").await.unwrap().len(), 1);
    assert!(fetcher.fetch("live-1", "").await.unwrap().is_empty());
}

/// **Test: `pageToken` is forwarded only when non-empty.**
#[tokio::test]
async fn fetch_sends_page_token_when_present() {
    let mut server = mockito::Server::new_async().await;
    let with_token = server
        .mock("GET", "/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("live_id".into(), "live-9".into()),
            Matcher::UrlEncoded("pageToken".into(), "next-1".into()),
        ]))
        .match_header("accept", "application/json")
        .with_status(200)
        .with_body(envelope(&[]))
        .expect(1)
        .create_async()
        .await;

    let fetcher = CommentFetcher::new(&server.url()).unwrap();
    let comments = fetcher.fetch("live-9", "next-1").await.unwrap();
    assert!(comments.is_empty());
    with_token.assert_async().await;
    with_token.remove_async().await;

    let without_token = server
        .mock("GET", "/")
        .match_query(Matcher::Regex("^live_id=live-9$".into()))
        .with_status(200)
        .with_body(envelope(&[]))
        .expect(1)
        .create_async()
        .await;
    fetcher.fetch("live-9", "").await.unwrap();
    without_token.assert_async().await;
}

/// **Test: Non-JSON body surfaces as `FeedError::Decode` with the upstream status.**
#[tokio::test]
async fn fetch_reports_decode_error_with_status() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(502)
        .with_body("<html>bad gateway</html>")
        .create_async()
        .await;

    let fetcher = CommentFetcher::new(&server.url()).unwrap();
    let err = fetcher.fetch("live-1", "").await.unwrap_err();
    match err {
        FeedError::Decode { status, .. } => assert_eq!(status, 502),
        other => panic!("expected decode error, got {other:?}"),
    }
    assert_eq!(fetcher.seen_count(), 0);
}

/// **Test: Unreachable upstream surfaces as `FeedError::Request`.**
#[tokio::test]
async fn fetch_reports_request_error_when_unreachable() {
    let fetcher = CommentFetcher::new("http://127.0.0.1:1/").unwrap();
    let err = fetcher.fetch("live-1", "").await.unwrap_err();
    assert!(matches!(err, FeedError::Request(_)));
}
