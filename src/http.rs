use std::time::Duration;

use wreq::{
    header::{HeaderMap, HeaderValue, COOKIE},
    Client, StatusCode,
};
use wreq_util::Emulation;

use crate::cookies::CookieJar;
use crate::error::{AcresbotError, Result};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Thin wrapper around [`wreq::Client`] that carries a captured
/// request profile (headers + cookies) on every call.
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Bare client for endpoints that need no credentials (the answer
    /// key document, the Telegram API).
    pub fn new() -> Result<Self> {
        Self::with_profile(HeaderMap::new(), None)
    }

    pub fn with_profile(mut headers: HeaderMap, cookies: Option<&CookieJar>) -> Result<Self> {
        if let Some(jar) = cookies {
            let cookie_str = jar.to_header_string();
            if !cookie_str.is_empty() {
                headers.insert(
                    COOKIE,
                    HeaderValue::from_str(&cookie_str)
                        // Avoid echoing cookie content in errors/logs.
                        .map_err(|_| AcresbotError::Parse("invalid cookie values".to_string()))?,
                );
            }
        }

        let client = Client::builder()
            .emulation(Emulation::Chrome143)
            .default_headers(headers)
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| AcresbotError::Network(e.to_string()))?;

        Ok(Self { client })
    }

    pub async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify_error(e))?;

        self.handle_response(response).await
    }

    pub async fn post_json<T: serde::de::DeserializeOwned, B: serde::Serialize>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.classify_error(e))?;

        self.handle_response(response).await
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: wreq::Response,
    ) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| AcresbotError::Network(e.to_string()))?;

            // A 200 with an HTML body is the forum's login interstitial,
            // not data.
            if body.trim_start().starts_with("<!DOCTYPE") || body.trim_start().starts_with("<html")
            {
                return Err(AcresbotError::InvalidJson(
                    "Received HTML instead of JSON".to_string(),
                ));
            }

            serde_json::from_str(&body).map_err(|e| AcresbotError::InvalidJson(e.to_string()))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(self.status_to_error(status, &body))
        }
    }

    fn classify_error(&self, error: wreq::Error) -> AcresbotError {
        if error.is_timeout() {
            AcresbotError::Timeout(error.to_string())
        } else if error.is_connect() {
            AcresbotError::Network(format!("Connection failed: {}", error))
        } else {
            AcresbotError::Network(error.to_string())
        }
    }

    fn status_to_error(&self, status: StatusCode, body: &str) -> AcresbotError {
        let body = if body.trim().is_empty() {
            "empty response body (expired credentials?)"
        } else {
            body
        };

        match status.as_u16() {
            401 | 403 => AcresbotError::Unauthorized(body.to_string()),
            _ => AcresbotError::Network(format!("HTTP {}: {}", status, body)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_to_error_unauthorized_blank_body_is_actionable() {
        let client = HttpClient::new().unwrap();
        match client.status_to_error(StatusCode::from_u16(401).unwrap(), "") {
            AcresbotError::Unauthorized(msg) => assert!(msg.contains("expired credentials")),
            other => panic!("expected Unauthorized, got: {:?}", other),
        }
    }

    #[test]
    fn test_status_to_error_unauthorized_non_blank_body_preserved() {
        let client = HttpClient::new().unwrap();
        let body = "please login first";
        match client.status_to_error(StatusCode::from_u16(403).unwrap(), body) {
            AcresbotError::Unauthorized(msg) => assert_eq!(msg, body),
            other => panic!("expected Unauthorized, got: {:?}", other),
        }
    }

    #[test]
    fn test_status_to_error_server_error_keeps_status() {
        let client = HttpClient::new().unwrap();
        match client.status_to_error(StatusCode::from_u16(502).unwrap(), "bad gateway") {
            AcresbotError::Network(msg) => {
                assert!(msg.contains("502"));
                assert!(msg.contains("bad gateway"));
            }
            other => panic!("expected Network, got: {:?}", other),
        }
    }
}
