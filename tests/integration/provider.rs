//! InnerTube provider integration tests
//!
//! Exercise session bootstrap from the watch page and continuation
//! polling against a mock InnerTube backend.

use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chatrelay::error::{EndReason, RelayError};
use chatrelay::provider::{ChatFeed, ChatSource, InnertubeSource, PollOutcome};

use crate::common::{self, constants};

fn source_for(server: &MockServer) -> InnertubeSource {
    let config = common::test_config(&server.uri());
    InnertubeSource::new(reqwest::Client::new(), &config)
}

#[tokio::test]
async fn test_open_and_poll_live_chat() {
    let server = MockServer::start().await;
    common::mock_watch_page(&server, &common::watch_page_html(Some(constants::INITIAL_CONTINUATION))).await;
    common::mock_live_chat_poll(
        &server,
        constants::INITIAL_CONTINUATION,
        common::live_chat_page(
            vec![
                common::text_message_action("m1", "alice", "first"),
                common::text_message_action("m2", "bob", "second"),
            ],
            Some("continuation-1"),
        ),
    )
    .await;
    common::mock_live_chat_poll(&server, "continuation-1", common::closed_chat_response()).await;

    let source = source_for(&server);
    let mut feed = source.open(constants::TEST_VIDEO_ID).await.unwrap();
    assert!(feed.is_alive());

    let batch = match feed.poll().await.unwrap() {
        PollOutcome::Continuing(batch) => batch,
        other => panic!("expected a live batch, got {other:?}"),
    };
    assert_eq!(
        batch,
        vec![
            common::expected_message("m1", "alice", "first"),
            common::expected_message("m2", "bob", "second"),
        ]
    );
    assert!(feed.is_alive());

    // The chat closes on the next poll, and stays closed.
    let outcome = feed.poll().await.unwrap();
    assert!(matches!(
        outcome,
        PollOutcome::Finished(EndReason::Finished)
    ));
    assert!(!feed.is_alive());

    let outcome = feed.poll().await.unwrap();
    assert!(matches!(
        outcome,
        PollOutcome::Finished(EndReason::Finished)
    ));
}

#[tokio::test]
async fn test_final_page_batch_precedes_finish() {
    let server = MockServer::start().await;
    common::mock_watch_page(&server, &common::watch_page_html(Some(constants::INITIAL_CONTINUATION))).await;
    // Final page: messages but no next continuation.
    common::mock_live_chat_poll(
        &server,
        constants::INITIAL_CONTINUATION,
        common::live_chat_page(
            vec![common::text_message_action("m1", "alice", "goodbye")],
            None,
        ),
    )
    .await;

    let source = source_for(&server);
    let mut feed = source.open(constants::TEST_VIDEO_ID).await.unwrap();

    // The closing page still delivers its batch...
    let batch = match feed.poll().await.unwrap() {
        PollOutcome::Continuing(batch) => batch,
        other => panic!("expected the final batch, got {other:?}"),
    };
    assert_eq!(batch.len(), 1);

    // ...and only then does the feed report the end.
    assert!(!feed.is_alive());
    let outcome = feed.poll().await.unwrap();
    assert!(matches!(
        outcome,
        PollOutcome::Finished(EndReason::Finished)
    ));
}

#[tokio::test]
async fn test_open_without_live_chat_ends_as_no_content() {
    let server = MockServer::start().await;
    common::mock_watch_page(&server, &common::watch_page_html(None)).await;

    let source = source_for(&server);
    let mut feed = source.open(constants::TEST_VIDEO_ID).await.unwrap();

    assert!(!feed.is_alive());
    let outcome = feed.poll().await.unwrap();
    assert!(matches!(
        outcome,
        PollOutcome::Finished(EndReason::NoContent)
    ));
}

#[tokio::test]
async fn test_open_fails_on_missing_watch_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/watch"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let source = source_for(&server);
    let err = source.open(constants::TEST_VIDEO_ID).await.unwrap_err();
    assert!(matches!(err, RelayError::Upstream { status: 404, .. }));
}

#[tokio::test]
async fn test_open_fails_on_unrecognizable_page() {
    let server = MockServer::start().await;
    common::mock_watch_page(&server, "<html>consent wall</html>").await;

    let source = source_for(&server);
    let err = source.open(constants::TEST_VIDEO_ID).await.unwrap_err();
    assert!(matches!(err, RelayError::Provider(_)));
}

#[tokio::test]
async fn test_poll_fails_on_upstream_error() {
    let server = MockServer::start().await;
    common::mock_watch_page(&server, &common::watch_page_html(Some(constants::INITIAL_CONTINUATION))).await;
    Mock::given(method("POST"))
        .and(path("/youtubei/v1/live_chat/get_live_chat"))
        .respond_with(ResponseTemplate::new(503).set_body_string("over capacity"))
        .mount(&server)
        .await;

    let source = source_for(&server);
    let mut feed = source.open(constants::TEST_VIDEO_ID).await.unwrap();

    let err = feed.poll().await.unwrap_err();
    assert!(matches!(err, RelayError::Upstream { status: 503, .. }));
    assert!(err.to_string().contains("over capacity"));
}

#[tokio::test]
async fn test_poll_fails_on_invalid_json() {
    let server = MockServer::start().await;
    common::mock_watch_page(&server, &common::watch_page_html(Some(constants::INITIAL_CONTINUATION))).await;
    Mock::given(method("POST"))
        .and(path("/youtubei/v1/live_chat/get_live_chat"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let source = source_for(&server);
    let mut feed = source.open(constants::TEST_VIDEO_ID).await.unwrap();

    let err = feed.poll().await.unwrap_err();
    assert!(matches!(err, RelayError::Json(_)));
}
