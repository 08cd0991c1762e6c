//! Ad-hoc access checks against the live upstream API.
//!
//! Runs the same gate the download page uses, for support requests like
//! "I bought the guide but it says locked".
//!
//! # Environment Variables
//!
//! - `UPSTREAM_API_URL`, `UPSTREAM_API_TOKEN`, `UPSTREAM_TIMEOUT_SECS`
//! - `ADMIN_EMAIL`

use thiserror::Error;
use ventaro_core::{Email, EmailError, ProductKey, UserId};
use ventaro_storefront::config::{ConfigError, UpstreamConfig, admin_email_from_env};
use ventaro_storefront::models::CurrentUser;
use ventaro_storefront::services::access::{AccessDecision, AccessPolicy, check_access};
use ventaro_storefront::upstream::{ApiError, UpstreamClient};

/// Errors that can occur before the check runs.
#[derive(Debug, Error)]
pub enum AccessCommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Upstream client error: {0}")]
    Upstream(#[from] ApiError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Unknown product: {0}")]
    UnknownProduct(String),
}

/// Check whether a user may access a product.
///
/// `product` accepts canonical keys and legacy identifiers.
///
/// # Errors
///
/// Returns an error if configuration is missing, the email is malformed, or
/// the product is unknown. Upstream failures are not errors: they produce a
/// denied decision, exactly as on the site.
pub async fn check(
    user_id: &str,
    email: &str,
    product: &str,
) -> Result<AccessDecision, AccessCommandError> {
    let product = ProductKey::resolve(product)
        .ok_or_else(|| AccessCommandError::UnknownProduct(product.to_string()))?;
    let user = CurrentUser {
        id: UserId::new(user_id),
        email: Email::parse(email)?,
    };

    let client = UpstreamClient::new(&UpstreamConfig::from_env()?)?;
    let policy = AccessPolicy::new(admin_email_from_env()?, product);

    let decision = check_access(&client, &policy, Some(&user)).await;
    tracing::info!(%product, user_id, ?decision, "Access checked");
    Ok(decision)
}
