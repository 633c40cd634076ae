use askama::Template;
use axum::{
    extract::{multipart::MultipartRejection, rejection::FormRejection, Multipart, State},
    http::header,
    response::{Html, IntoResponse},
    Form, Json,
};

use crate::applications::deletion::{delete_application, DeleteRequest};
use crate::applications::submission::{submit_application, SubmissionForm};
use crate::errors::AppError;
use crate::response::ApiEnvelope;
use crate::security::form_token::{DELETE_SCOPE, SUBMIT_SCOPE};
use crate::state::AppState;
use crate::views::{AdminApplications, ApplicationForm, ApplyPage};

const FORM_SCRIPT: &str = include_str!("../../assets/job-form.js");

/// POST /applications
pub async fn handle_submit(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ApiEnvelope>, AppError> {
    let multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let form = SubmissionForm::from_multipart(multipart).await?;
    let message = submit_application(&state, form).await?;
    Ok(Json(ApiEnvelope::ok(message)))
}

/// POST /admin/applications/delete
pub async fn handle_delete(
    State(state): State<AppState>,
    request: Result<Form<DeleteRequest>, FormRejection>,
) -> Result<Json<ApiEnvelope>, AppError> {
    let Form(request) = request.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let message = delete_application(&state, request).await?;
    Ok(Json(ApiEnvelope::ok(message)))
}

/// GET /admin/applications
pub async fn handle_admin_list(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let records = state
        .listing()
        .list()
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    let delete_token = state.tokens.issue(DELETE_SCOPE);
    render(&AdminApplications::new(&records, &delete_token))
}

/// GET /embed/application-form
///
/// Bare form markup with a fresh submission token, for placing inside
/// another page.
pub async fn handle_embed_form(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    render(&application_form(&state))
}

/// GET /apply
pub async fn handle_apply_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let form_html = application_form(&state)
        .render()
        .map_err(|e| AppError::Internal(e.into()))?;
    render(&ApplyPage { form_html })
}

/// GET /assets/job-form.js
pub async fn handle_form_script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        FORM_SCRIPT,
    )
}

fn application_form(state: &AppState) -> ApplicationForm {
    ApplicationForm::new(state.tokens.issue(SUBMIT_SCOPE), &state.public_base_url)
}

fn render(template: &impl Template) -> Result<Html<String>, AppError> {
    template
        .render()
        .map(Html)
        .map_err(|e| AppError::Internal(e.into()))
}
