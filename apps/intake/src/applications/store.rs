use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::application::{ApplicationRecord, NewApplication};

/// Row-level access to `job_applications`. Every method is one statement.
#[async_trait]
pub trait ApplicationStore: Send + Sync {
    async fn insert(&self, application: &NewApplication) -> Result<ApplicationRecord, sqlx::Error>;

    /// Returns the number of rows removed (0 or 1).
    async fn delete(&self, id: i64) -> Result<u64, sqlx::Error>;

    async fn list_newest_first(&self) -> Result<Vec<ApplicationRecord>, sqlx::Error>;
}

pub struct PgApplicationStore {
    pool: PgPool,
}

impl PgApplicationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApplicationStore for PgApplicationStore {
    async fn insert(&self, application: &NewApplication) -> Result<ApplicationRecord, sqlx::Error> {
        sqlx::query_as::<_, ApplicationRecord>(
            r#"
            INSERT INTO job_applications
                (first_name, last_name, email, phone, address, city, state, postcode,
                 date_of_birth, nationality, current_company, current_position,
                 years_of_experience, education_level, expected_salary, availability,
                 cv_file_url, cover_letter_file_url, cover_letter_text, additional_notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                    $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
            RETURNING *
            "#,
        )
        .bind(&application.first_name)
        .bind(&application.last_name)
        .bind(&application.email)
        .bind(&application.phone)
        .bind(&application.address)
        .bind(&application.city)
        .bind(&application.state)
        .bind(&application.postcode)
        .bind(application.date_of_birth)
        .bind(&application.nationality)
        .bind(&application.current_company)
        .bind(&application.current_position)
        .bind(application.years_of_experience)
        .bind(&application.education_level)
        .bind(&application.expected_salary)
        .bind(&application.availability)
        .bind(&application.cv_file_url)
        .bind(&application.cover_letter_file_url)
        .bind(&application.cover_letter_text)
        .bind(&application.additional_notes)
        .fetch_one(&self.pool)
        .await
    }

    async fn delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM job_applications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn list_newest_first(&self) -> Result<Vec<ApplicationRecord>, sqlx::Error> {
        sqlx::query_as::<_, ApplicationRecord>(
            "SELECT * FROM job_applications ORDER BY submitted_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await
    }
}
