//! HttpSink - POSTs resolved lines, retrying non-2xx responses

use std::time::Duration;

use bytes::Bytes;
use contracts::{ContractError, LineSpec, LogSink, SinkRoute};
use tracing::{debug, instrument, warn};

/// Additional attempts after a non-2xx response
const MAX_RETRIES: u32 = 5;

/// Fixed delay between retry attempts
const RETRY_DELAY: Duration = Duration::from_secs(10);

/// Sink that POSTs lines to an HTTP endpoint
///
/// Non-2xx responses are retried up to [`MAX_RETRIES`] times with a fixed
/// [`RETRY_DELAY`] between attempts. Transport-level errors are not retried.
pub struct HttpSink {
    name: String,
    client: reqwest::Client,
    retry_delay: Duration,
}

impl Default for HttpSink {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpSink {
    /// Create a new HttpSink with a shared client
    pub fn new() -> Self {
        Self {
            name: "http".to_string(),
            client: reqwest::Client::new(),
            retry_delay: RETRY_DELAY,
        }
    }

    /// Override the retry delay (tests)
    #[cfg(test)]
    fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    async fn post_once(
        &self,
        url: &str,
        headers: &[contracts::HttpHeader],
        payload: &Bytes,
    ) -> Result<reqwest::Response, reqwest::Error> {
        let mut request = self.client.post(url).body(payload.clone());
        for header in headers {
            request = request.header(&header.header, &header.value);
        }
        request.send().await
    }
}

impl LogSink for HttpSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(name = "http_sink_send", skip(self, payload, spec), fields(sink = %self.name))]
    async fn send(&self, payload: &Bytes, spec: &LineSpec) -> Result<(), ContractError> {
        let SinkRoute::Http { url, headers } = &spec.route else {
            return Err(ContractError::sink_send(
                &self.name,
                "line routed to http sink without an http destination",
            ));
        };

        let response = match self.post_once(url, headers, payload).await {
            Ok(response) => response,
            // Transport errors are terminal for this send
            Err(e) => return Err(ContractError::sink_send(&self.name, e.to_string())),
        };

        if response.status().is_success() {
            debug!(status = %response.status(), url, "line posted");
            return Ok(());
        }

        let mut last_status = response.status();
        warn!(status = %last_status, url, "non-2xx response, retrying");

        for attempt in 1..=MAX_RETRIES {
            tokio::time::sleep(self.retry_delay).await;
            debug!(attempt, url, "retrying");

            match self.post_once(url, headers, payload).await {
                Ok(response) if response.status().is_success() => {
                    debug!(attempt, status = %response.status(), "retry succeeded");
                    return Ok(());
                }
                Ok(response) => last_status = response.status(),
                Err(e) => {
                    warn!(attempt, error = %e, "transport error during retry");
                }
            }
        }

        Err(ContractError::sink_send(
            &self.name,
            format!("gave up after {MAX_RETRIES} retries, last status {last_status}"),
        ))
    }
}
