use serde::Deserialize;
use tracing::{debug, error, info};

use crate::applications::sanitize::parse_int_or_zero;
use crate::errors::AppError;
use crate::security::form_token::DELETE_SCOPE;
use crate::state::AppState;

pub const INVALID_ID_MESSAGE: &str = "Invalid application ID.";
pub const DELETED_MESSAGE: &str = "Application deleted successfully.";

/// Form body posted by the admin listing's delete button.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteRequest {
    pub security: Option<String>,
    pub application_id: Option<String>,
}

/// Permanently removes one application. No soft delete.
pub async fn delete_application(
    state: &AppState,
    request: DeleteRequest,
) -> Result<&'static str, AppError> {
    state
        .tokens
        .verify(request.security.as_deref(), DELETE_SCOPE)
        .map_err(|e| {
            debug!("Deletion token rejected: {e}");
            AppError::Unauthorized
        })?;

    let id = request
        .application_id
        .as_deref()
        .map(parse_int_or_zero)
        .unwrap_or(0);
    if id <= 0 {
        return Err(AppError::Validation(INVALID_ID_MESSAGE.to_string()));
    }

    match state.applications.delete(id).await {
        Ok(0) => {
            info!("Delete requested for missing application {id}");
            Err(AppError::NotFound)
        }
        Ok(_) => {
            info!("Deleted job application {id}");
            state.listing().invalidate().await;
            Ok(DELETED_MESSAGE)
        }
        Err(e) => {
            error!("Failed to delete application {id}: {e}");
            Err(AppError::NotFound)
        }
    }
}
