use std::time::Duration;

use reqwest::header::HeaderValue;

/// Originator reported in the user agent of every outbound request.
pub const ORIGINATOR: &str = "alttext_relay";

pub fn get_user_agent(originator: &str) -> String {
    format!(
        "{originator}/{} ({} {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// Build the shared HTTP client used for model requests.
///
/// If the full builder fails the client is rebuilt without the user agent.
/// The request timeout is kept in every case except the final bare client.
pub fn create_client(originator: &str, timeout: Duration) -> reqwest::Client {
    let user_agent = get_user_agent(originator);
    let mut builder = reqwest::Client::builder().timeout(timeout);
    match HeaderValue::from_str(&user_agent) {
        Ok(value) => builder = builder.user_agent(value),
        Err(e) => tracing::warn!("invalid user agent {user_agent:?}: {e}"),
    }

    builder.build().unwrap_or_else(|e| {
        tracing::warn!("failed to build HTTP client, retrying without user agent: {e}");
        reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::error!("failed to build HTTP client, using defaults: {e}");
                reqwest::Client::new()
            })
    })
}
