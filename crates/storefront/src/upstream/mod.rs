//! Client for the upstream API that owns users, purchases, and leads.
//!
//! # Endpoints
//!
//! ```text
//! GET  /api/purchases/confirm?userId=<id>  -> { purchases: [{ product_id, ... }] }
//! POST /api/consultation                   -> { error?: string }
//! POST /api/auth/login                     -> { user: { id, email } }
//! ```
//!
//! Every call is a single request: no retries, no pagination.

pub mod types;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use thiserror::Error;
use tracing::instrument;
use url::Url;
use ventaro_core::{Email, Purchase, UserId};

use crate::config::UpstreamConfig;
use crate::models::CurrentUser;
use types::{
    ConsultationRequest, ErrorBody, LoginRequest, LoginResponse, PurchasesResponse,
};

/// Header carrying the per-form submission ID.
pub const IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";

/// Errors that can occur when talking to the upstream API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request could not be sent or the response could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API answered with a non-success status.
    #[error("API error: {status}{}", .message.as_deref().map(|m| format!(" - {m}")).unwrap_or_default())]
    Api {
        status: u16,
        /// The `error` field of the response body, if present and non-empty.
        message: Option<String>,
    },

    /// Response body did not match the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Client configuration was rejected.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Upstream API client.
///
/// Cheap to clone; the underlying `reqwest::Client` pools connections.
#[derive(Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    base_url: Url,
}

impl UpstreamClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns error if the token is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &UpstreamConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();

        if let Some(token) = &config.api_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| ApiError::Config(format!("Invalid API token format: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    /// Fetch every purchase recorded for a user.
    ///
    /// # Errors
    ///
    /// Returns error on network failure, non-2xx status, or an unparseable body.
    #[instrument(skip(self, user_id), fields(user_id = %user_id))]
    pub async fn confirm_purchases(&self, user_id: &UserId) -> Result<Vec<Purchase>, ApiError> {
        let url = self.endpoint("api/purchases/confirm")?;

        let response = self
            .client
            .get(url)
            .query(&[("userId", user_id.as_str())])
            .send()
            .await?;

        let response = error_for_status(response).await?;
        let body: PurchasesResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        tracing::debug!(count = body.purchases.len(), "Fetched purchases");
        Ok(body.purchases)
    }

    /// Submit a consultation lead.
    ///
    /// The success body is not inspected; the status code is the outcome.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with the upstream's `error` message on non-2xx,
    /// `ApiError::Http` on network failure.
    #[instrument(skip(self, lead), fields(email = %lead.email, project_type = %lead.project_type))]
    pub async fn submit_consultation(
        &self,
        lead: &ConsultationRequest,
        idempotency_key: &str,
    ) -> Result<(), ApiError> {
        let url = self.endpoint("api/consultation")?;

        let response = self
            .client
            .post(url)
            .header(IDEMPOTENCY_KEY_HEADER, idempotency_key)
            .json(lead)
            .send()
            .await?;

        error_for_status(response).await?;
        Ok(())
    }

    /// Exchange credentials for a user identity.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` when the upstream rejects the credentials and
    /// `ApiError::Parse` when the returned identity is malformed.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<CurrentUser, ApiError> {
        let url = self.endpoint("api/auth/login")?;

        let response = self
            .client
            .post(url)
            .json(&LoginRequest { email, password })
            .send()
            .await?;

        let response = error_for_status(response).await?;
        let body: LoginResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        let email = Email::parse(&body.user.email)
            .map_err(|e| ApiError::Parse(format!("invalid email in login response: {e}")))?;

        Ok(CurrentUser {
            id: UserId::new(body.user.id),
            email,
        })
    }
}

/// Pass 2xx responses through; turn anything else into `ApiError::Api`.
async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|body| body.error)
        .filter(|m| !m.trim().is_empty());

    Err(ApiError::Api {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Api {
            status: 422,
            message: Some("Email is invalid".to_string()),
        };
        assert_eq!(err.to_string(), "API error: 422 - Email is invalid");

        let err = ApiError::Api {
            status: 500,
            message: None,
        };
        assert_eq!(err.to_string(), "API error: 500");
    }
}
