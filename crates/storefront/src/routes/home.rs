//! Landing page: pricing tiers, platform benefits, and the consultation form.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use tracing::instrument;
use ventaro_core::{Product, catalog};

use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::CurrentUser;
use crate::services::consultation::{
    BUDGETS, ConsultationForm, PROJECT_TYPES, SelectOption, SubmitOutcome, TIMELINES,
};

/// One card in the "why full-stack platforms" section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feature {
    pub title: &'static str,
    pub body: &'static str,
}

pub const FEATURES: &[Feature] = &[
    Feature {
        title: "💯 Full Ownership & Control",
        body: "You own the UI, backend, logic, data, customer flow, SEO, and brand. You can edit anything any time without restrictions.",
    },
    Feature {
        title: "🚀 Unlimited Customization",
        body: "Build any feature: chatbots, lead scoring, dashboards, login logic, upsells, dynamic pricing. Whatever your imagination can create.",
    },
    Feature {
        title: "💸 Higher Profit Margins",
        body: "No platform fees, no app charges, no transaction percentages. You just pay for hosting, which can be nearly free if optimized.",
    },
    Feature {
        title: "🔐 Better Data Ownership",
        body: "Your customers, emails, payments, and analytics stay yours. You're not trapped in a platform's ecosystem or terms and conditions.",
    },
    Feature {
        title: "🌍 Scalability & Automation",
        body: "You can auto-connect APIs (Stripe, SendGrid, AI, etc.). Build once, deploy anywhere, scale without limits as your business grows.",
    },
    Feature {
        title: "🧠 Real IP Creation",
        body: "Your backend logic and AI integrations are actual proprietary tech. That builds long-term brand value, not just a store.",
    },
];

/// Message shown above the consultation form after a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormNotice {
    pub text: String,
    pub success: bool,
}

impl From<&SubmitOutcome> for FormNotice {
    fn from(outcome: &SubmitOutcome) -> Self {
        Self {
            text: outcome.message(),
            success: outcome.is_success(),
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub current_user: Option<CurrentUser>,
    pub products: &'static [Product],
    pub features: &'static [Feature],
    pub form: ConsultationForm,
    pub notice: Option<FormNotice>,
    pub project_types: &'static [SelectOption],
    pub budgets: &'static [SelectOption],
    pub timelines: &'static [SelectOption],
}

impl HomeTemplate {
    #[must_use]
    pub fn new(
        current_user: Option<CurrentUser>,
        form: ConsultationForm,
        notice: Option<FormNotice>,
    ) -> Self {
        Self {
            current_user,
            products: catalog(),
            features: FEATURES,
            form,
            notice,
            project_types: PROJECT_TYPES,
            budgets: BUDGETS,
            timelines: TIMELINES,
        }
    }
}

/// Display the home page with an empty consultation form.
#[instrument(skip_all)]
pub async fn home(OptionalAuth(current_user): OptionalAuth) -> impl IntoResponse {
    HomeTemplate::new(current_user, ConsultationForm::blank(), None)
}
