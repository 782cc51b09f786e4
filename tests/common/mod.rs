#![allow(dead_code)]

use async_trait::async_trait;
use loadgen::domain::Outcome;
use loadgen::domain::errors::RequestError;
use loadgen::domain::ports::RequestIssuer;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Request issuer that never touches the network.
///
/// The first `failures` calls fail with a connection error; later calls
/// succeed with `status`.
pub struct FakeIssuer {
    status: u16,
    failures: AtomicUsize,
    urls: Mutex<Vec<String>>,
}

impl FakeIssuer {
    pub fn succeeding(status: u16) -> Self {
        Self {
            status,
            failures: AtomicUsize::new(0),
            urls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_first(failures: usize, then_status: u16) -> Self {
        Self {
            status: then_status,
            failures: AtomicUsize::new(failures),
            urls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.urls.lock().unwrap().len()
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RequestIssuer for FakeIssuer {
    async fn issue(&self, url: &str) -> Outcome {
        self.urls.lock().unwrap().push(url.to_string());
        let fail = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if fail {
            Outcome::failure(
                Duration::from_millis(2),
                RequestError::Connection {
                    message: "connection refused".to_string(),
                },
            )
        } else {
            Outcome::success(Duration::from_millis(2), self.status)
        }
    }
}

/// Polls `check` until it holds or `within` elapses.
pub async fn eventually(within: Duration, mut check: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + within;
    while tokio::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}
