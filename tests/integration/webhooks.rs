//! Webhook delivery through the notifier retry loop

use crate::test_utils::fast_retry;
use indicator_monitor::notifications::{Notifier, WebhookChannel};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(5);

fn ok_reply() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "errcode": 0, "errmsg": "ok" }))
}

#[tokio::test]
async fn dingtalk_posts_markdown_with_title() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/robot/send"))
        .and(body_partial_json(json!({
            "msgtype": "markdown",
            "markdown": {
                "title": "[HIGH] Threshold breach: NUPL",
                "text": "### [HIGH] Threshold breach: NUPL\n\n> value 0.8"
            }
        })))
        .respond_with(ok_reply())
        .expect(1)
        .mount(&server)
        .await;

    let channel = WebhookChannel::dingtalk(Some(format!("{}/robot/send", server.uri())), TIMEOUT).unwrap();
    let notifier = Notifier::new(fast_retry(3)).with_channel(Arc::new(channel));

    let results = notifier
        .notify_all("[HIGH] Threshold breach: NUPL", "value 0.8")
        .await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].channel, "dingtalk");
    assert!(results[0].success);
    assert_eq!(results[0].attempts, 1);
}

#[tokio::test]
async fn wecom_posts_markdown_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cgi-bin/webhook/send"))
        .and(body_partial_json(json!({
            "msgtype": "markdown",
            "markdown": { "content": "### Trend change\n\n> rising" }
        })))
        .respond_with(ok_reply())
        .expect(1)
        .mount(&server)
        .await;

    let channel = WebhookChannel::wecom(
        Some(format!("{}/cgi-bin/webhook/send", server.uri())),
        TIMEOUT,
    )
    .unwrap();
    let notifier = Notifier::new(fast_retry(3)).with_channel(Arc::new(channel));

    let results = notifier.notify_all("Trend change", "rising").await;
    assert!(results[0].success);
}

#[tokio::test]
async fn rejected_message_exhausts_retries() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "errcode": 310000, "errmsg": "keywords not in content" })),
        )
        .expect(3)
        .mount(&server)
        .await;

    let channel = WebhookChannel::dingtalk(Some(server.uri()), TIMEOUT).unwrap();
    let notifier = Notifier::new(fast_retry(3)).with_channel(Arc::new(channel));

    let results = notifier.notify_all("title", "message").await;

    assert!(!results[0].success);
    assert_eq!(results[0].attempts, 3);
    let error = results[0].error.as_deref().unwrap();
    assert!(error.contains("310000"));
    assert!(error.contains("keywords not in content"));
}

#[tokio::test]
async fn transient_server_errors_recover_within_budget() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ok_reply())
        .expect(1)
        .mount(&server)
        .await;

    let channel = WebhookChannel::wecom(Some(server.uri()), TIMEOUT).unwrap();
    let notifier = Notifier::new(fast_retry(3)).with_channel(Arc::new(channel));

    let results = notifier.notify_all("title", "message").await;

    assert!(results[0].success);
    assert_eq!(results[0].attempts, 3);
    assert_eq!(results[0].error, None);
}

#[tokio::test]
async fn missing_webhook_url_is_skipped() {
    let dingtalk = WebhookChannel::dingtalk(None, TIMEOUT).unwrap();
    let notifier = Notifier::new(fast_retry(3)).with_channel(Arc::new(dingtalk));

    assert!(notifier.configured_channels().is_empty());
    assert!(notifier.notify_all("title", "message").await.is_empty());
}
