//! Behavior tests for the retry controller.
//!
//! These tests pin the bounded contract: exactly N attempts, the same fixed
//! delay before every retry, and the last error surfaced once exhausted.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use fxsnap_core::{
    FetchError, FetchErrorKind, HttpClient, HttpError, HttpRequest, HttpResponse, RetryConfig,
    Sleeper, SourceClient, SourceConfig,
};

#[derive(Default)]
struct RecordingSleeper {
    slept: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    fn slept(&self) -> Vec<Duration> {
        self.slept.lock().expect("sleeper lock").clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep<'a>(&'a self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        self.slept.lock().expect("sleeper lock").push(duration);
        Box::pin(async {})
    }
}

/// Replies from a fixed queue; the last reply repeats once the queue runs dry.
struct QueuedHttp {
    replies: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
    calls: AtomicU32,
}

impl QueuedHttp {
    fn new(replies: Vec<Result<HttpResponse, HttpError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: AtomicU32::new(0),
        }
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl HttpClient for QueuedHttp {
    fn execute<'a>(
        &'a self,
        _request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut replies = self.replies.lock().expect("reply lock");
        let reply = if replies.len() > 1 {
            replies.pop_front().expect("non-empty queue")
        } else {
            replies.front().cloned().expect("at least one reply")
        };
        Box::pin(async move { reply })
    }
}

fn source() -> SourceConfig {
    SourceConfig::new("https://example.test/data", 1_000)
}

// =============================================================================
// Retry: recovery
// =============================================================================

#[tokio::test]
async fn when_source_fails_twice_then_succeeds_retry_makes_three_attempts_and_two_sleeps() {
    // Given: a transport that times out, then answers 503, then returns the payload
    let http = Arc::new(QueuedHttp::new(vec![
        Err(HttpError::new("request timeout")),
        Ok(HttpResponse::with_status(503, "maintenance")),
        Ok(HttpResponse::ok("payload \u{a0}bytes")),
    ]));
    let client = SourceClient::new(http.clone());
    let sleeper = RecordingSleeper::default();
    let retry = RetryConfig::fixed(Duration::from_secs(4), 3);
    let source = source();
    let (client, source) = (&client, &source);

    // When: the fetch runs under the retry controller
    let body = retry
        .run("test", &sleeper, move |_| async move {
            client.get(&source.url, source).await
        })
        .await
        .expect("third attempt succeeds");

    // Then: exactly three calls, two fixed sleeps, payload unmodified
    assert_eq!(http.calls(), 3);
    assert_eq!(sleeper.slept(), vec![Duration::from_secs(4), Duration::from_secs(4)]);
    assert_eq!(body, "payload \u{a0}bytes");
}

#[tokio::test]
async fn when_first_attempt_succeeds_retry_never_sleeps() {
    // Given: an operation that succeeds immediately
    let sleeper = RecordingSleeper::default();
    let retry = RetryConfig::default();

    // When: it runs
    let value = retry
        .run("test", &sleeper, |attempt| async move { Ok::<_, FetchError>(attempt) })
        .await
        .expect("succeeds");

    // Then: one attempt, no delay
    assert_eq!(value, 1);
    assert!(sleeper.slept().is_empty());
}

// =============================================================================
// Retry: exhaustion
// =============================================================================

#[tokio::test]
async fn when_every_attempt_fails_retry_reports_the_last_error() {
    // Given: an upstream that keeps answering 502
    let http = Arc::new(QueuedHttp::new(vec![Ok(HttpResponse::with_status(
        502,
        "<html>Bad Gateway</html>",
    ))]));
    let client = SourceClient::new(http.clone());
    let sleeper = RecordingSleeper::default();
    let retry = RetryConfig::fixed(Duration::from_millis(250), 3);
    let source = source();
    let (client, source) = (&client, &source);

    // When: the budget is spent
    let exhausted = retry
        .run("test", &sleeper, move |_| async move {
            client.get(&source.url, source).await
        })
        .await
        .expect_err("never succeeds");

    // Then: three attempts, sleeps only between them, protocol details preserved
    assert_eq!(exhausted.attempts, 3);
    assert_eq!(http.calls(), 3);
    assert_eq!(sleeper.slept().len(), 2);
    assert_eq!(exhausted.last.kind(), FetchErrorKind::Protocol);
    assert_eq!(exhausted.last.status(), Some(502));
    assert!(exhausted.last.message().contains("Bad Gateway"));
}

#[tokio::test]
async fn when_validation_fails_retry_treats_it_like_a_transport_failure() {
    // Given: an operation whose payload is implausible twice
    let sleeper = RecordingSleeper::default();
    let calls = AtomicU32::new(0);
    let calls_ref = &calls;

    // When: it runs with the default budget
    let result = RetryConfig::fixed(Duration::from_secs(4), 3)
        .run("test", &sleeper, move |attempt| async move {
            calls_ref.fetch_add(1, Ordering::SeqCst);
            if attempt < 3 {
                Err(FetchError::validation("response suspiciously short"))
            } else {
                Ok("table")
            }
        })
        .await;

    // Then: validation failures consumed retries exactly like transport ones
    assert_eq!(result.expect("third attempt passes"), "table");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(sleeper.slept().len(), 2);
}

#[tokio::test]
async fn when_error_is_terminal_retry_stops_after_one_attempt() {
    // Given: a transport that rejects the URL itself
    let http = Arc::new(QueuedHttp::new(vec![Err(HttpError::non_retryable(
        "invalid url 'not a url'",
    ))]));
    let client = SourceClient::new(http.clone());
    let sleeper = RecordingSleeper::default();
    let source = source();
    let (client, source) = (&client, &source);

    // When: it runs with a generous budget
    let exhausted = RetryConfig::fixed(Duration::from_secs(4), 5)
        .run("test", &sleeper, move |_| async move {
            client.get(&source.url, source).await
        })
        .await
        .expect_err("terminal");

    // Then: no second attempt and no sleep
    assert_eq!(exhausted.attempts, 1);
    assert_eq!(http.calls(), 1);
    assert!(sleeper.slept().is_empty());
}
