//! Publisher: relay the insights mapping to the remote analysis API as a
//! JSON POST with a static bearer token.

use crate::errors::RelayError;
use reqwest::{Client, StatusCode};
use serde_json::Value;

/// Fixed endpoint of the analysis API. Tests point `send_insights` at a
/// local stub instead.
pub const ANALYZE_URL: &str = "https://gemini.googleapis.com/v1/analyze";

/// POST the (possibly empty) insights mapping to `url` with
/// `Authorization: Bearer <api_key>`. HTTP 200 yields the parsed JSON
/// response body; any other status is an error carrying the status code and
/// response text. One outbound call, no retry.
pub async fn send_insights(
    client: &Client,
    url: &str,
    api_key: &str,
    insights: &Value,
) -> Result<Value, RelayError> {
    let response = client
        .post(url)
        .bearer_auth(api_key)
        .json(insights)
        .send()
        .await?;

    let status = response.status();
    if status == StatusCode::OK {
        Ok(response.json().await?)
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(RelayError::Api {
            status: status.as_u16(),
            body,
        })
    }
}
