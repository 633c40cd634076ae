//! Server-rendered markup: the embeddable form, the standalone apply page
//! and the admin listing.

use askama::Template;

use crate::models::application::ApplicationRecord;

/// Labels and fallback message read by `assets/job-form.js` from the form's
/// data attributes.
pub const SUBMIT_LABEL: &str = "Submit Application";
pub const SUBMITTING_LABEL: &str = "Submitting...";
pub const GENERIC_FAILURE_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

pub const EDUCATION_LEVELS: &[&str] = &[
    "High School",
    "Certificate",
    "Diploma",
    "Bachelor",
    "Master",
    "PhD",
    "Other",
];

pub const AVAILABILITY_OPTIONS: &[&str] = &["Immediate", "2 weeks", "1 month", "3 months", "Other"];

#[derive(Template)]
#[template(path = "application_form.html")]
pub struct ApplicationForm {
    pub token: String,
    pub submit_url: String,
    pub script_url: String,
    pub education_levels: &'static [&'static str],
    pub availability_options: &'static [&'static str],
    pub required_message: &'static str,
    pub generic_failure_message: &'static str,
    pub submit_label: &'static str,
    pub submitting_label: &'static str,
}

impl ApplicationForm {
    /// `base_url` is empty for same-origin pages; embeds placed on another
    /// site need the absolute origin of this service.
    pub fn new(token: String, base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/');
        Self {
            token,
            submit_url: format!("{base_url}/applications"),
            script_url: format!("{base_url}/assets/job-form.js"),
            education_levels: EDUCATION_LEVELS,
            availability_options: AVAILABILITY_OPTIONS,
            required_message: crate::applications::submission::REQUIRED_FIELDS_MESSAGE,
            generic_failure_message: GENERIC_FAILURE_MESSAGE,
            submit_label: SUBMIT_LABEL,
            submitting_label: SUBMITTING_LABEL,
        }
    }
}

#[derive(Template)]
#[template(path = "apply.html")]
pub struct ApplyPage {
    pub form_html: String,
}

/// One display row of the admin table, pre-formatted.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub experience: i32,
    pub education: String,
    pub cv_url: String,
    pub cover_letter_url: String,
    pub cover_letter_text: String,
    pub submitted: String,
}

impl From<&ApplicationRecord> for AdminRow {
    fn from(record: &ApplicationRecord) -> Self {
        let location = match (record.city.as_deref(), record.state.as_deref()) {
            (Some(city), Some(state)) => format!("{city}, {state}"),
            (Some(only), None) | (None, Some(only)) => only.to_string(),
            (None, None) => String::new(),
        };
        AdminRow {
            id: record.id,
            name: record.full_name(),
            email: record.email.clone(),
            phone: record.phone.clone().unwrap_or_default(),
            location,
            experience: record.years_of_experience,
            education: record.education_level.clone().unwrap_or_default(),
            cv_url: record.cv_file_url.clone(),
            cover_letter_url: record.cover_letter_file_url.clone().unwrap_or_default(),
            cover_letter_text: record.cover_letter_text.clone().unwrap_or_default(),
            submitted: record.submitted_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "admin_applications.html")]
pub struct AdminApplications<'a> {
    pub rows: Vec<AdminRow>,
    pub delete_token: &'a str,
    pub delete_url: &'a str,
}

impl<'a> AdminApplications<'a> {
    pub fn new(records: &[ApplicationRecord], delete_token: &'a str) -> Self {
        Self {
            rows: records.iter().map(AdminRow::from).collect(),
            delete_token,
            delete_url: "/admin/applications/delete",
        }
    }
}
