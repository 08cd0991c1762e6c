//! Gated digital downloads.
//!
//! The access decision is made before any template is built. Chapter HTML is
//! only handed to the template when access was granted, so a denied or
//! undecided visitor never receives gated content.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    body::Body,
    extract::{Request, State},
    http::{
        HeaderValue, StatusCode,
        header::{CACHE_CONTROL, CONTENT_DISPOSITION},
    },
    response::{IntoResponse, Response},
};
use tower_http::services::ServeFile;
use tracing::instrument;
use ventaro_core::Product;

use crate::content::{Chapter, ChapterMeta};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::models::CurrentUser;
use crate::services::access::{AccessDecision, DenyReason, check_access};
use crate::state::AppState;

/// E-book reader page.
#[derive(Template, WebTemplate)]
#[template(path = "downloads/ebook.html")]
pub struct EbookTemplate<'a> {
    pub current_user: Option<CurrentUser>,
    pub product: &'static Product,
    pub has_access: bool,
    pub is_admin: bool,
    pub is_anonymous: bool,
    /// Access could not be verified (purchase lookup failed).
    pub is_unverified: bool,
    /// Public table of contents.
    pub outline: Vec<&'a ChapterMeta>,
    /// Full chapters; empty unless access was granted.
    pub chapters: &'a [Chapter],
    pub reading_time_minutes: u32,
}

/// Display the e-book page, or the reason it is locked.
#[instrument(skip_all)]
pub async fn ebook(
    State(state): State<AppState>,
    OptionalAuth(current_user): OptionalAuth,
) -> Response {
    let policy = state.ebook_policy();
    let decision = check_access(state.upstream(), policy, current_user.as_ref()).await;
    tracing::info!(?decision, "E-book access decided");

    let store = state.ebook();
    let chapters: &[Chapter] = if decision.has_access() {
        store.chapters()
    } else {
        &[]
    };

    EbookTemplate {
        current_user,
        product: policy.product.product(),
        has_access: decision.has_access(),
        is_admin: decision.is_admin(),
        is_anonymous: decision == AccessDecision::Denied(DenyReason::Anonymous),
        is_unverified: decision.is_unverified(),
        outline: store.chapters().iter().map(|c| &c.meta).collect(),
        chapters,
        reading_time_minutes: store.reading_time_minutes(),
    }
    .into_response()
}

/// Download the e-book file.
///
/// GET /downloads/ebook/file
///
/// Anonymous visitors are sent to login. Signed-in users without access get
/// 403, including when the purchase lookup failed. The file is streamed from
/// disk, with range requests honored.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn ebook_file(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    request: Request,
) -> Result<Response> {
    let decision = check_access(state.upstream(), state.ebook_policy(), Some(&user)).await;
    if !decision.has_access() {
        tracing::info!(?decision, "E-book download refused");
        return Err(AppError::Forbidden(
            "A purchase of this guide is required to download it".to_string(),
        ));
    }

    let path = &state.config().ebook.file_path;
    let mut response = ServeFile::new(path)
        .try_call(request)
        .await
        .map_err(|e| AppError::Internal(format!("failed to read {}: {e}", path.display())))?
        .map(Body::new);
    if response.status() == StatusCode::NOT_FOUND {
        return Err(AppError::NotFound("e-book file".to_string()));
    }

    add_breadcrumb("downloads", "Downloaded e-book", &[("user_id", user.id.as_str())]);

    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("ebook.pdf");
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
        .map_err(|e| AppError::Internal(format!("bad e-book filename {filename:?}: {e}")))?;

    let headers = response.headers_mut();
    headers.insert(CONTENT_DISPOSITION, disposition);
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("private, no-store"));

    Ok(response)
}
