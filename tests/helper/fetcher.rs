//! Canned fetcher for registry tests

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use modcheck::version::error::FetchError;
use modcheck::version::fetcher::Fetcher;

#[derive(Clone)]
enum Response {
    Body(String),
    Status(u16),
    Timeout,
}

/// Serves canned bodies or failures per URL and counts requests
#[derive(Default)]
pub struct StubFetcher {
    responses: Mutex<HashMap<String, Response>>,
    calls: Mutex<HashMap<String, usize>>,
    delay: Option<Duration>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_body(&self, url: &str, body: &str) {
        self.respond(url, Response::Body(body.to_string()));
    }

    pub fn fail_with_status(&self, url: &str, status: u16) {
        self.respond(url, Response::Status(status));
    }

    pub fn fail_with_timeout(&self, url: &str) {
        self.respond(url, Response::Timeout);
    }

    pub fn calls(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    fn respond(&self, url: &str, response: Response) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), response);
    }
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        *self.calls.lock().unwrap().entry(url.to_string()).or_default() += 1;

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let response = self.responses.lock().unwrap().get(url).cloned();
        match response {
            Some(Response::Body(body)) => Ok(body),
            Some(Response::Status(status)) => Err(FetchError::Status {
                url: url.to_string(),
                status,
            }),
            Some(Response::Timeout) => Err(FetchError::Timeout {
                url: url.to_string(),
            }),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}
