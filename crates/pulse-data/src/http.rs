//! Shared JSON-over-HTTP plumbing for the provider clients.

use std::time::Duration;

use pulse_core::error::ProviderError;
use reqwest::Client;
use serde::de::DeserializeOwned;

/// Longest error body kept in a `ProviderError::Status`.
const MAX_ERROR_BODY: usize = 512;

/// Build the HTTP client shared by a provider's requests.
pub(crate) fn build_client(user_agent: &str, timeout: Duration) -> Result<Client, ProviderError> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::Transport(format!("Failed to create HTTP client: {}", e)))
}

/// Map a reqwest failure onto the provider error kinds.
pub(crate) fn map_reqwest(operation: &str, timeout: Duration, err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout {
            operation: operation.to_string(),
            after_ms: timeout.as_millis() as u64,
        }
    } else if err.is_decode() {
        ProviderError::Decode(err.to_string())
    } else {
        ProviderError::Transport(err.to_string())
    }
}

/// GET `url` with `query` and decode a JSON body.
///
/// Non-success statuses become `ProviderError::Status` carrying a
/// truncated copy of the response body.
pub(crate) async fn get_json<R: DeserializeOwned>(
    client: &Client,
    operation: &str,
    url: &str,
    query: &[(&str, String)],
    timeout: Duration,
) -> Result<R, ProviderError> {
    let response = client
        .get(url)
        .query(query)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| map_reqwest(operation, timeout, e))?;

    let status = response.status();
    if !status.is_success() {
        let mut body = response.text().await.unwrap_or_default();
        if body.len() > MAX_ERROR_BODY {
            let mut cut = MAX_ERROR_BODY;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
        }
        return Err(ProviderError::Status {
            status: status.as_u16(),
            body,
        });
    }

    response
        .json::<R>()
        .await
        .map_err(|e| map_reqwest(operation, timeout, e))
}
