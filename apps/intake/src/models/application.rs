use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A persisted job application. Rows are never updated in place.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct ApplicationRecord {
    pub id: i64,
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
    pub cv_file_url: String,
    pub cover_letter_file_url: Option<String>,
    pub cover_letter_text: Option<String>,
    pub additional_notes: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

impl ApplicationRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A validated, sanitized application ready to be inserted.
/// `id` and `submitted_at` are assigned by the database.
#[derive(Debug, Clone, PartialEq)]
pub struct NewApplication {
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
    pub cv_file_url: String,
    pub cover_letter_file_url: Option<String>,
    pub cover_letter_text: Option<String>,
    pub additional_notes: Option<String>,
}
