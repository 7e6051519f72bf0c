//! Shared HTTP plumbing for the dataset clients.

use crate::error::{Error, Result};

const USER_AGENT: &str = "globe-client/0.1";

/// Build the HTTP client used by every dataset client.
pub(crate) fn build_client(base_url: &str) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| Error::Http {
            url: base_url.to_string(),
            message: e.to_string(),
        })
}

/// GET `url` and return the body, mapping transport and status failures.
pub(crate) async fn fetch_bytes(http: &reqwest::Client, url: &str) -> Result<Vec<u8>> {
    tracing::debug!(url, "fetching");

    let response = http.get(url).send().await.map_err(|e| Error::Http {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let data = response.bytes().await.map_err(|e| Error::Http {
        url: url.to_string(),
        message: e.to_string(),
    })?;
    Ok(data.to_vec())
}

/// Join a base URL and a path without doubling the slash.
pub(crate) fn join(base_url: &str, path: &str) -> String {
    format!("{}/{path}", base_url.trim_end_matches('/'))
}
