//! Checkout endpoint client.
//!
//! Posts the cart's [`CheckoutRequest`] to a hosted checkout endpoint and
//! returns the URL the shopper should be sent to. The call is a single
//! request with a success/failure outcome: no retry, and nothing here
//! touches the cart. Callers clear the cart only after success.

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, instrument};
use url::Url;

use pineapple_cart_core::CheckoutRequest;

/// Errors that can occur when calling the checkout endpoint.
#[derive(Debug, Error)]
pub enum CheckoutClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Hosted checkout session returned by the endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckoutSession {
    /// Where to send the shopper to pay.
    pub url: String,
}

/// Client for the checkout endpoint.
#[derive(Debug, Clone)]
pub struct CheckoutClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl CheckoutClient {
    /// Create a client for `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(endpoint: Url) -> Result<Self, CheckoutClientError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("pineapple-cart/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, endpoint })
    }

    /// Endpoint this client posts to.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Create a checkout session for the given lines.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, the endpoint answers with a
    /// non-success status, or the response has no usable `url`.
    #[instrument(skip(self, request), fields(lines = request.line_items.len()))]
    pub async fn create_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, CheckoutClientError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CheckoutClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let session: CheckoutSession = response
            .json()
            .await
            .map_err(|e| CheckoutClientError::Parse(e.to_string()))?;

        if session.url.trim().is_empty() {
            return Err(CheckoutClientError::Parse(
                "checkout session has an empty url".to_string(),
            ));
        }

        info!(url = %session.url, "Checkout session created");
        Ok(session)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};

    use pineapple_cart_core::CheckoutLine;

    use super::*;

    async fn serve(app: Router) -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Url::parse(&format!("http://{addr}/create-checkout")).unwrap()
    }

    fn request() -> CheckoutRequest {
        CheckoutRequest {
            line_items: vec![CheckoutLine {
                price: "price_tee".to_string(),
                quantity: 2,
            }],
        }
    }

    #[tokio::test]
    async fn test_create_session_posts_line_items() {
        async fn create(Json(body): Json<serde_json::Value>) -> Json<serde_json::Value> {
            assert_eq!(
                body,
                serde_json::json!({"lineItems": [{"price": "price_tee", "quantity": 2}]})
            );
            Json(serde_json::json!({"url": "https://pay.example.test/session/abc"}))
        }

        let endpoint = serve(Router::new().route("/create-checkout", post(create))).await;
        let client = CheckoutClient::new(endpoint).unwrap();

        let session = client.create_session(&request()).await.unwrap();
        assert_eq!(session.url, "https://pay.example.test/session/abc");
    }

    #[tokio::test]
    async fn test_create_session_surfaces_api_errors() {
        async fn fail() -> (StatusCode, &'static str) {
            (StatusCode::BAD_GATEWAY, "payment provider unavailable")
        }

        let endpoint = serve(Router::new().route("/create-checkout", post(fail))).await;
        let client = CheckoutClient::new(endpoint).unwrap();

        let err = client.create_session(&request()).await.unwrap_err();
        assert!(matches!(
            err,
            CheckoutClientError::Api { status: 502, ref message } if message == "payment provider unavailable"
        ));
    }

    #[tokio::test]
    async fn test_create_session_rejects_missing_url() {
        async fn create() -> Json<serde_json::Value> {
            Json(serde_json::json!({"id": "cs_123"}))
        }

        let endpoint = serve(Router::new().route("/create-checkout", post(create))).await;
        let client = CheckoutClient::new(endpoint).unwrap();

        let err = client.create_session(&request()).await.unwrap_err();
        assert!(matches!(err, CheckoutClientError::Parse(_)));
    }
}
