use reqwest::Client;
use std::time::Duration;

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Creates the shared, connection-pooled client used by every worker.
    ///
    /// No retry middleware: every attempt is measured and recorded as is.
    pub fn create_client(
        timeout: Duration,
        max_idle_per_host: usize,
    ) -> Result<Client, reqwest::Error> {
        Client::builder()
            .pool_max_idle_per_host(max_idle_per_host)
            .timeout(timeout)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client() {
        let client = HttpClientFactory::create_client(Duration::from_secs(10), 10);
        assert!(client.is_ok());
    }
}
