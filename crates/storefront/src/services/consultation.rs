//! Consultation lead form.
//!
//! Holds the form state, validates it the way the page's `required`
//! attributes do, forwards it to the upstream API, and turns the outcome into
//! the message shown above the form.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;
use ventaro_core::Email;

use crate::upstream::types::ConsultationRequest;
use crate::upstream::{ApiError, UpstreamClient};

/// Shown after the upstream accepts a lead.
pub const SUCCESS_MESSAGE: &str = "🎉 Thank you! Your consultation request has been submitted successfully. Check your email for confirmation.";

/// Fallback when the upstream rejects a lead without saying why.
pub const DEFAULT_ERROR: &str = "Failed to submit consultation request. Please try again.";

/// Shown when the upstream could not be reached.
pub const NETWORK_ERROR_MESSAGE: &str =
    "❌ Network error. Please check your connection and try again.";

/// How long an accepted submission ID is remembered.
const SUBMISSION_TTL: Duration = Duration::from_secs(10 * 60);

const MAX_TRACKED_SUBMISSIONS: u64 = 10_000;

/// A `<select>` option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

const fn option(value: &'static str, label: &'static str) -> SelectOption {
    SelectOption { value, label }
}

pub const PROJECT_TYPES: &[SelectOption] = &[
    option("business-website", "🏢 Professional Business Website"),
    option("e-commerce", "🛒 E-commerce Platform"),
    option("web-app", "⚡ Custom Web Application"),
    option("saas", "⚡ SaaS Platform"),
    option("enterprise", "🏆 Enterprise Solution"),
    option("other", "💡 Custom Solution (Let's Discuss)"),
];

pub const BUDGETS: &[SelectOption] = &[
    option("1k-3k", "💰 $1,500 - $3,000 (Professional)"),
    option("3k-7k", "💎 $3,000 - $7,500 (Enterprise)"),
    option("7k-15k", "🏆 $7,500 - $15,000 (Elite)"),
    option("15k-30k", "⚡ $15,000 - $30,000 (Premium)"),
    option("30k-plus", "👑 $30,000+ (Luxury)"),
    option("discuss", "🤝 Let's Discuss My Vision"),
];

pub const TIMELINES: &[SelectOption] = &[
    option("rush", "⚡ Rush Delivery (1-2 weeks) +50% fee"),
    option("standard", "🎯 Standard Timeline (2-4 weeks)"),
    option("extended", "📅 Extended Timeline (1-2 months)"),
    option("flexible", "🤝 Flexible (Quality over speed)"),
];

/// Submitted form fields.
///
/// Every field defaults to an empty string so a partial post still
/// deserializes and can be re-rendered with what the visitor typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConsultationForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub project_type: String,
    pub budget: String,
    pub timeline: String,
    pub current_website: String,
    pub project_vision: String,
    /// Random ID issued with the rendered form.
    pub submission_id: String,
}

/// A form rejected before reaching the upstream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in {0}.")]
    Missing(&'static str),
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("Please choose a valid {0}.")]
    UnknownOption(&'static str),
}

impl ConsultationForm {
    /// An empty form carrying a fresh submission ID.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            submission_id: Uuid::new_v4().to_string(),
            ..Self::default()
        }
    }

    /// The submission ID, if it is a well-formed UUID.
    #[must_use]
    pub fn submission_uuid(&self) -> Option<Uuid> {
        Uuid::parse_str(self.submission_id.trim()).ok()
    }

    /// Check required fields, the email address, and select values.
    ///
    /// # Errors
    ///
    /// Returns the first problem found, in form order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let required = [
            (&self.full_name, "your full name"),
            (&self.email, "your email"),
            (&self.phone, "your phone number"),
            (&self.project_type, "a project type"),
            (&self.budget, "a budget"),
            (&self.timeline, "a timeline"),
            (&self.project_vision, "your vision"),
        ];
        for (value, label) in required {
            if value.trim().is_empty() {
                return Err(ValidationError::Missing(label));
            }
        }

        Email::parse(self.email.trim()).map_err(|_| ValidationError::InvalidEmail)?;

        let selects = [
            (&self.project_type, PROJECT_TYPES, "project type"),
            (&self.budget, BUDGETS, "budget"),
            (&self.timeline, TIMELINES, "timeline"),
        ];
        for (value, options, label) in selects {
            if !options.iter().any(|o| o.value == value.trim()) {
                return Err(ValidationError::UnknownOption(label));
            }
        }

        Ok(())
    }

    /// Upstream request body with surrounding whitespace removed.
    #[must_use]
    pub fn to_request(&self) -> ConsultationRequest {
        ConsultationRequest {
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            company: self.company.trim().to_string(),
            project_type: self.project_type.trim().to_string(),
            budget: self.budget.trim().to_string(),
            timeline: self.timeline.trim().to_string(),
            current_website: self.current_website.trim().to_string(),
            project_vision: self.project_vision.trim().to_string(),
        }
    }
}

/// Result of a submission, as shown to the visitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Lead accepted; the form is reset.
    Accepted,
    /// Same submission ID already accepted; nothing was sent.
    Duplicate,
    /// Rejected locally; the form keeps its values.
    Invalid(ValidationError),
    /// Upstream answered with an error; the form keeps its values.
    Rejected(Option<String>),
    /// Upstream unreachable; the form keeps its values.
    NetworkError,
}

impl SubmitOutcome {
    /// Whether the form should be cleared.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Accepted | Self::Duplicate)
    }

    /// Message shown above the form.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Accepted | Self::Duplicate => SUCCESS_MESSAGE.to_string(),
            Self::Invalid(err) => format!("❌ Error: {err}"),
            Self::Rejected(reason) => {
                format!("❌ Error: {}", reason.as_deref().unwrap_or(DEFAULT_ERROR))
            }
            Self::NetworkError => NETWORK_ERROR_MESSAGE.to_string(),
        }
    }
}

impl From<&ApiError> for SubmitOutcome {
    fn from(err: &ApiError) -> Self {
        match err {
            ApiError::Api { message, .. } => Self::Rejected(message.clone()),
            ApiError::Http(_) => Self::NetworkError,
            ApiError::Parse(_) | ApiError::Url(_) | ApiError::Config(_) => Self::Rejected(None),
        }
    }
}

/// Remembers accepted submission IDs so a double-click creates one lead.
///
/// Concurrent posts with the same ID share a single upstream attempt. Only an
/// accepted attempt is cached; a failed one leaves the ID free for a retry.
#[derive(Clone)]
pub struct SubmissionGuard {
    accepted: Cache<Uuid, ()>,
}

impl SubmissionGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(SUBMISSION_TTL)
    }

    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            accepted: Cache::builder()
                .max_capacity(MAX_TRACKED_SUBMISSIONS)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Run `send` unless `id` was already accepted.
    ///
    /// Returns `Ok(true)` when this call forwarded the lead and `Ok(false)`
    /// when another call did. Callers waiting on an in-flight attempt get
    /// that attempt's error if it fails.
    ///
    /// # Errors
    ///
    /// Returns the upstream error of the attempt this call ran or waited on.
    pub async fn forward_once<F>(&self, id: Uuid, send: F) -> Result<bool, Arc<ApiError>>
    where
        F: Future<Output = Result<(), ApiError>>,
    {
        self.accepted
            .entry(id)
            .or_try_insert_with(send)
            .await
            .map(|entry| entry.is_fresh())
    }
}

impl Default for SubmissionGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate, deduplicate, and forward a lead.
#[instrument(skip_all, fields(email = %form.email, project_type = %form.project_type))]
pub async fn submit(
    client: &UpstreamClient,
    guard: &SubmissionGuard,
    form: &ConsultationForm,
) -> SubmitOutcome {
    if let Err(err) = form.validate() {
        tracing::debug!(error = %err, "Consultation form rejected");
        return SubmitOutcome::Invalid(err);
    }

    let submission_id = form.submission_uuid().unwrap_or_else(Uuid::new_v4);
    let request = form.to_request();
    let idempotency_key = submission_id.to_string();
    let send = client.submit_consultation(&request, &idempotency_key);

    match guard.forward_once(submission_id, send).await {
        Ok(true) => {
            tracing::info!(%submission_id, "Consultation request submitted");
            SubmitOutcome::Accepted
        }
        Ok(false) => {
            tracing::info!(%submission_id, "Duplicate consultation submission ignored");
            SubmitOutcome::Duplicate
        }
        Err(e) => {
            tracing::error!(%submission_id, error = %e, "Consultation form error");
            SubmitOutcome::from(e.as_ref())
        }
    }
}
