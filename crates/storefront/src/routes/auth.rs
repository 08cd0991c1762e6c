//! Login and logout.
//!
//! Credentials are checked by the upstream API; on success the returned
//! identity is stored in the session and drives every later access check.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::state::AppState;
use crate::upstream::ApiError;

/// Where to go after login when no `next` was given.
const DEFAULT_NEXT: &str = "/downloads/ebook";

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub next: Option<String>,
}

/// Query parameters for the login page.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub error: Option<String>,
    pub next: Option<String>,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub current_user: Option<CurrentUser>,
    pub error: Option<&'static str>,
    pub next: String,
}

/// Map an error code from the query string to a message.
fn error_message(code: &str) -> &'static str {
    match code {
        "credentials" => "Invalid email or password.",
        "unavailable" => "We couldn't reach the sign-in service. Please try again shortly.",
        "session" => "Your session could not be saved. Please try again.",
        _ => "Sign-in failed. Please try again.",
    }
}

/// Accept only same-site absolute paths as a post-login destination.
fn safe_next(next: Option<&str>) -> String {
    next.map(str::trim)
        .filter(|n| n.starts_with('/') && !n.starts_with("//") && !n.contains('\\'))
        .unwrap_or(DEFAULT_NEXT)
        .to_string()
}

fn login_redirect(error: &str, next: &str) -> Response {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    query.append_pair("error", error).append_pair("next", next);
    Redirect::to(&format!("/auth/login?{}", query.finish())).into_response()
}

/// Display the login page.
pub async fn login_page(
    OptionalAuth(current_user): OptionalAuth,
    Query(query): Query<LoginQuery>,
) -> impl IntoResponse {
    LoginTemplate {
        current_user,
        error: query.error.as_deref().map(error_message),
        next: safe_next(query.next.as_deref()),
    }
}

/// Handle login form submission.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let next = safe_next(form.next.as_deref());

    let user = match state
        .upstream()
        .login(form.email.trim(), &form.password)
        .await
    {
        Ok(user) => user,
        Err(ApiError::Api { status, .. }) if (400..500).contains(&status) => {
            tracing::info!(status, "Login rejected");
            return login_redirect("credentials", &next);
        }
        Err(e) => {
            tracing::warn!(error = %e, "Login failed");
            return login_redirect("unavailable", &next);
        }
    };

    if let Err(e) = set_current_user(&session, &user).await {
        tracing::error!(error = %e, "Failed to set session");
        return login_redirect("session", &next);
    }

    set_sentry_user(&user.id, Some(user.email.as_str()));
    tracing::info!(user_id = %user.id, "User signed in");

    Redirect::to(&next).into_response()
}

/// Handle logout.
///
/// A session that cannot be flushed is a server error; redirecting home
/// would leave the visitor signed in while looking signed out.
pub async fn logout(session: Session) -> Result<Response> {
    clear_current_user(&session).await?;
    clear_sentry_user();

    Ok(Redirect::to("/").into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_next_accepts_local_paths() {
        assert_eq!(safe_next(Some("/downloads/ebook")), "/downloads/ebook");
        assert_eq!(safe_next(Some(" /#consultation ")), "/#consultation");
    }

    #[test]
    fn test_safe_next_rejects_offsite_targets() {
        for next in [
            "https://evil.example",
            "//evil.example",
            "/\\evil.example",
            "downloads",
            "",
        ] {
            assert_eq!(safe_next(Some(next)), DEFAULT_NEXT, "{next:?}");
        }
        assert_eq!(safe_next(None), DEFAULT_NEXT);
    }

    #[test]
    fn test_unknown_error_codes_get_generic_message() {
        assert_eq!(error_message("credentials"), "Invalid email or password.");
        assert_eq!(error_message("<script>"), "Sign-in failed. Please try again.");
    }
}
