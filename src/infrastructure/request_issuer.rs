use crate::domain::Outcome;
use crate::domain::errors::RequestError;
use crate::domain::ports::RequestIssuer;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Instant;

/// Issues GET requests through a shared pooled client.
pub struct HttpRequestIssuer {
    client: Client,
}

impl HttpRequestIssuer {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RequestIssuer for HttpRequestIssuer {
    async fn issue(&self, url: &str) -> Outcome {
        let start = Instant::now();

        let mut response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return Outcome::failure(start.elapsed(), classify(&e)),
        };
        let status = response.status().as_u16();

        // Drain the body so the connection goes back to the pool
        loop {
            match response.chunk().await {
                Ok(Some(_)) => continue,
                Ok(None) => break,
                Err(e) => {
                    let error = if e.is_timeout() {
                        RequestError::Timeout
                    } else {
                        RequestError::Body {
                            message: e.to_string(),
                        }
                    };
                    return Outcome::failure(start.elapsed(), error);
                }
            }
        }

        Outcome::success(start.elapsed(), status)
    }
}

fn classify(e: &reqwest::Error) -> RequestError {
    if e.is_timeout() {
        RequestError::Timeout
    } else if e.is_connect() {
        RequestError::Connection {
            message: e.to_string(),
        }
    } else {
        RequestError::Other {
            message: e.to_string(),
        }
    }
}
