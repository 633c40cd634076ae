//! Submission pipeline: token check, sanitization, document validation,
//! upload, insert, cache invalidation.

use std::collections::HashMap;

use axum::extract::Multipart;
use bytes::Bytes;
use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::applications::file_type::{
    resolve_allowed, DocumentKind, COVER_LETTER_KINDS, CV_KINDS,
};
use crate::applications::sanitize::{
    parse_years, sanitize_email, sanitize_file_name, sanitize_text, sanitize_textarea,
};
use crate::errors::AppError;
use crate::models::application::{ApplicationRecord, NewApplication};
use crate::security::form_token::SUBMIT_SCOPE;
use crate::state::AppState;
use crate::storage::{upload_key, UploadError, UploadStore};

pub const REQUIRED_FIELDS_MESSAGE: &str = "Please fill out all required fields.";
pub const SUBMITTED_MESSAGE: &str = "Your application has been submitted successfully!";
pub const INVALID_CV_TYPE_MESSAGE: &str = "Invalid CV file type. Allowed types: PDF, DOC, DOCX.";
pub const INVALID_COVER_LETTER_TYPE_MESSAGE: &str =
    "Invalid Cover Letter file type. Allowed types: PDF, DOC, DOCX, TXT.";
pub const FILE_TOO_LARGE_MESSAGE: &str = "File is too large. Maximum size is 10MB.";

pub const MAX_FILE_BYTES: usize = 10 * 1024 * 1024;
/// Two documents plus room for the text fields.
pub const MAX_REQUEST_BYTES: usize = 2 * MAX_FILE_BYTES + 1024 * 1024;

pub const NONCE_FIELD: &str = "job_application_nonce";
pub const CV_FILE_FIELD: &str = "cv_file";
pub const COVER_LETTER_FILE_FIELD: &str = "cover_letter_file";

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Bytes,
}

impl UploadedFile {
    /// Browsers send an empty part with an empty name when no file was chosen.
    fn is_empty(&self) -> bool {
        self.file_name.trim().is_empty() || self.bytes.is_empty()
    }
}

/// The raw multipart submission, before any sanitization.
#[derive(Debug, Default)]
pub struct SubmissionForm {
    fields: HashMap<String, String>,
    pub cv_file: Option<UploadedFile>,
    pub cover_letter_file: Option<UploadedFile>,
}

impl SubmissionForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = SubmissionForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                CV_FILE_FIELD | COVER_LETTER_FILE_FIELD => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    let file = UploadedFile { file_name, bytes };
                    if name == CV_FILE_FIELD {
                        form.cv_file = Some(file);
                    } else {
                        form.cover_letter_file = Some(file);
                    }
                }
                _ => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    form.fields.insert(name, value);
                }
            }
        }

        Ok(form)
    }

    #[cfg(test)]
    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.fields.insert(name.to_string(), value.to_string());
        self
    }

    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or_default()
    }

    fn field_opt(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Sanitized applicant-entered fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicantDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub nationality: Option<String>,
    pub current_company: Option<String>,
    pub current_position: Option<String>,
    pub years_of_experience: i32,
    pub education_level: Option<String>,
    pub expected_salary: Option<String>,
    pub availability: Option<String>,
    pub cover_letter_text: Option<String>,
    pub additional_notes: Option<String>,
}

impl ApplicantDetails {
    pub fn from_form(form: &SubmissionForm) -> Self {
        let text = |name: &str| non_empty(sanitize_text(form.field(name)));
        let textarea = |name: &str| non_empty(sanitize_textarea(form.field(name)));

        ApplicantDetails {
            first_name: sanitize_text(form.field("first_name")),
            last_name: sanitize_text(form.field("last_name")),
            email: sanitize_email(form.field("email")),
            phone: text("phone"),
            address: text("address"),
            city: text("city"),
            state: text("state"),
            postcode: text("postcode"),
            date_of_birth: NaiveDate::parse_from_str(
                &sanitize_text(form.field("date_of_birth")),
                "%Y-%m-%d",
            )
            .ok(),
            nationality: text("nationality"),
            current_company: text("current_company"),
            current_position: text("current_position"),
            years_of_experience: parse_years(form.field("years_of_experience")),
            education_level: text("education_level"),
            expected_salary: text("expected_salary"),
            availability: text("availability"),
            cover_letter_text: textarea("cover_letter"),
            additional_notes: textarea("notes"),
        }
    }

    fn missing_required(&self) -> bool {
        self.first_name.is_empty() || self.last_name.is_empty() || self.email.is_empty()
    }

    fn into_new_application(
        self,
        cv_file_url: String,
        cover_letter_file_url: Option<String>,
    ) -> NewApplication {
        NewApplication {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            city: self.city,
            state: self.state,
            postcode: self.postcode,
            date_of_birth: self.date_of_birth,
            nationality: self.nationality,
            current_company: self.current_company,
            current_position: self.current_position,
            years_of_experience: self.years_of_experience,
            education_level: self.education_level,
            expected_salary: self.expected_salary,
            availability: self.availability,
            cv_file_url,
            cover_letter_file_url,
            cover_letter_text: self.cover_letter_text,
            additional_notes: self.additional_notes,
        }
    }
}

/// A file whose content has been checked against an allow-list.
struct Document<'a> {
    file: &'a UploadedFile,
    kind: DocumentKind,
}

/// Runs the whole pipeline and returns the confirmation message.
///
/// Both documents are validated before either is stored. If a later step
/// fails, documents already stored are removed again.
pub async fn submit_application(
    state: &AppState,
    form: SubmissionForm,
) -> Result<&'static str, AppError> {
    state
        .tokens
        .verify(form.field_opt(NONCE_FIELD), SUBMIT_SCOPE)
        .map_err(|e| {
            debug!("Submission token rejected: {e}");
            AppError::Unauthorized
        })?;

    let details = ApplicantDetails::from_form(&form);
    let cv_file = form.cv_file.as_ref().filter(|f| !f.is_empty());
    let Some(cv_file) = cv_file.filter(|_| !details.missing_required()) else {
        return Err(AppError::Validation(REQUIRED_FIELDS_MESSAGE.to_string()));
    };

    let cv = check_document(cv_file, CV_KINDS, INVALID_CV_TYPE_MESSAGE)?;
    let cover_letter = match form.cover_letter_file.as_ref().filter(|f| !f.is_empty()) {
        Some(file) => Some(check_document(
            file,
            COVER_LETTER_KINDS,
            INVALID_COVER_LETTER_TYPE_MESSAGE,
        )?),
        None => None,
    };

    let mut stored_keys = Vec::new();
    match store_and_insert(state, details, &cv, cover_letter.as_ref(), &mut stored_keys).await {
        Ok(record) => {
            info!(
                "Stored job application {} ({} {})",
                record.id, record.first_name, record.last_name
            );
            state.listing().invalidate().await;
            Ok(SUBMITTED_MESSAGE)
        }
        Err(e) => {
            discard_uploads(state.uploads.as_ref(), &stored_keys).await;
            Err(e)
        }
    }
}

fn check_document<'a>(
    file: &'a UploadedFile,
    allowed: &[DocumentKind],
    invalid_type_message: &str,
) -> Result<Document<'a>, AppError> {
    if file.bytes.len() > MAX_FILE_BYTES {
        return Err(AppError::Validation(FILE_TOO_LARGE_MESSAGE.to_string()));
    }
    let kind = resolve_allowed(&file.bytes, allowed)
        .ok_or_else(|| AppError::Validation(invalid_type_message.to_string()))?;
    Ok(Document { file, kind })
}

async fn store_and_insert(
    state: &AppState,
    details: ApplicantDetails,
    cv: &Document<'_>,
    cover_letter: Option<&Document<'_>>,
    stored_keys: &mut Vec<String>,
) -> Result<ApplicationRecord, AppError> {
    let uploads = state.uploads.as_ref();

    let cv_file_url = store_document(uploads, cv, stored_keys)
        .await
        .map_err(|e| AppError::Upload(format!("CV file upload failed: {e}")))?;

    let cover_letter_file_url = match cover_letter {
        Some(doc) => Some(
            store_document(uploads, doc, stored_keys)
                .await
                .map_err(|e| AppError::Upload(format!("Cover Letter file upload failed: {e}")))?,
        ),
        None => None,
    };

    let application = details.into_new_application(cv_file_url, cover_letter_file_url);
    state
        .applications
        .insert(&application)
        .await
        .map_err(|e| AppError::Persistence(format!("Database error: {e}")))
}

async fn store_document(
    uploads: &dyn UploadStore,
    doc: &Document<'_>,
    stored_keys: &mut Vec<String>,
) -> Result<String, UploadError> {
    let safe_name = sanitize_file_name(&doc.file.file_name);
    let key = upload_key(Utc::now(), &safe_name, doc.kind.extension());
    let url = uploads
        .put(&key, doc.file.bytes.clone(), doc.kind.content_type())
        .await?;
    stored_keys.push(key);
    Ok(url)
}

async fn discard_uploads(uploads: &dyn UploadStore, keys: &[String]) {
    for key in keys {
        if let Err(e) = uploads.remove(key).await {
            warn!("Failed to remove orphaned upload {key}: {e}");
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
