//! Consultation form submission.

use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::error::add_breadcrumb;
use crate::middleware::OptionalAuth;
use crate::routes::home::{FormNotice, HomeTemplate};
use crate::services::consultation::{self, ConsultationForm, SubmitOutcome};
use crate::state::AppState;

/// Handle a consultation form post.
///
/// POST /consultation
///
/// Re-renders the home page with the outcome above the form. Accepted
/// submissions get a fresh, empty form; anything else keeps what the visitor
/// typed (and the same submission ID) so they can fix it and retry.
#[instrument(skip_all, fields(project_type = %form.project_type))]
pub async fn submit(
    State(state): State<AppState>,
    OptionalAuth(current_user): OptionalAuth,
    Form(form): Form<ConsultationForm>,
) -> Response {
    add_breadcrumb(
        "consultation",
        "Submitted consultation form",
        &[("project_type", form.project_type.as_str())],
    );

    let outcome = consultation::submit(state.upstream(), state.submissions(), &form).await;
    let notice = FormNotice::from(&outcome);

    let (status, form) = match outcome {
        SubmitOutcome::Accepted | SubmitOutcome::Duplicate => {
            (StatusCode::OK, ConsultationForm::blank())
        }
        SubmitOutcome::Invalid(_) => (StatusCode::UNPROCESSABLE_ENTITY, form),
        SubmitOutcome::Rejected(_) | SubmitOutcome::NetworkError => (StatusCode::OK, form),
    };

    (status, HomeTemplate::new(current_user, form, Some(notice))).into_response()
}
