//! In-memory doubles for the storage traits, shared by unit tests.

use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{Duration, Utc};

use crate::applications::store::ApplicationStore;
use crate::cache::MemoryCache;
use crate::models::application::{ApplicationRecord, NewApplication};
use crate::security::admin_gate::BasicAdminGate;
use crate::security::form_token::{FormTokens, DELETE_SCOPE, SUBMIT_SCOPE};
use crate::state::AppState;
use crate::storage::{public_url, UploadError, UploadStore};

pub const PDF_BYTES: &[u8] = b"%PDF-1.4\n1 0 obj << >> endobj\ntrailer << >>\n%%EOF\n";
pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASSWORD: &str = "correct horse";

pub fn zip_bytes(entry: &str, contents: &[u8]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored);
    writer.start_file(entry, options).unwrap();
    writer.write_all(contents).unwrap();
    writer.finish().unwrap().into_inner()
}

pub fn docx_bytes() -> Vec<u8> {
    zip_bytes("word/document.xml", b"<w:document/>")
}

pub fn new_application(first_name: &str) -> NewApplication {
    NewApplication {
        first_name: first_name.to_string(),
        last_name: "Lee".to_string(),
        email: "ana@x.com".to_string(),
        phone: None,
        address: None,
        city: Some("Sydney".to_string()),
        state: Some("NSW".to_string()),
        postcode: None,
        date_of_birth: None,
        nationality: None,
        current_company: None,
        current_position: None,
        years_of_experience: 0,
        education_level: None,
        expected_salary: None,
        availability: None,
        cv_file_url: "http://files.test/uploads/cv.pdf".to_string(),
        cover_letter_file_url: None,
        cover_letter_text: None,
        additional_notes: None,
    }
}

#[derive(Default)]
pub struct FakeApplicationStore {
    rows: Mutex<Vec<ApplicationRecord>>,
    next_id: AtomicUsize,
    list_calls: AtomicUsize,
    fail_inserts: AtomicBool,
    fail_deletes: AtomicBool,
}

impl FakeApplicationStore {
    /// Rows in insertion order.
    pub fn rows(&self) -> Vec<ApplicationRecord> {
        self.rows.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn fail_inserts(&self) {
        self.fail_inserts.store(true, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self) {
        self.fail_deletes.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ApplicationStore for FakeApplicationStore {
    async fn insert(&self, a: &NewApplication) -> Result<ApplicationRecord, sqlx::Error> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(sqlx::Error::Protocol("connection reset".to_string()));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64 + 1;
        let record = ApplicationRecord {
            id,
            first_name: a.first_name.clone(),
            last_name: a.last_name.clone(),
            email: a.email.clone(),
            phone: a.phone.clone(),
            address: a.address.clone(),
            city: a.city.clone(),
            state: a.state.clone(),
            postcode: a.postcode.clone(),
            date_of_birth: a.date_of_birth,
            nationality: a.nationality.clone(),
            current_company: a.current_company.clone(),
            current_position: a.current_position.clone(),
            years_of_experience: a.years_of_experience,
            education_level: a.education_level.clone(),
            expected_salary: a.expected_salary.clone(),
            availability: a.availability.clone(),
            cv_file_url: a.cv_file_url.clone(),
            cover_letter_file_url: a.cover_letter_file_url.clone(),
            cover_letter_text: a.cover_letter_text.clone(),
            additional_notes: a.additional_notes.clone(),
            submitted_at: Utc::now() + Duration::milliseconds(id),
        };
        self.rows.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(sqlx::Error::Protocol("connection reset".to_string()));
        }
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.id != id);
        Ok((before - rows.len()) as u64)
    }

    async fn list_newest_first(&self) -> Result<Vec<ApplicationRecord>, sqlx::Error> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows();
        rows.sort_by(|a, b| (b.submitted_at, b.id).cmp(&(a.submitted_at, a.id)));
        Ok(rows)
    }
}

#[derive(Default)]
pub struct FakeUploadStore {
    objects: Mutex<HashMap<String, (Bytes, String)>>,
    failure: Mutex<Option<String>>,
}

impl FakeUploadStore {
    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }
}

#[async_trait]
impl UploadStore for FakeUploadStore {
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<String, UploadError> {
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(UploadError::Backend(message));
        }
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (body, content_type.to_string()));
        Ok(public_url("http://files.test", key))
    }

    async fn remove(&self, key: &str) -> Result<(), UploadError> {
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }
}

pub struct Harness {
    pub state: AppState,
    pub store: Arc<FakeApplicationStore>,
    pub uploads: Arc<FakeUploadStore>,
    pub cache: Arc<MemoryCache>,
}

impl Harness {
    pub fn submit_token(&self) -> String {
        self.state.tokens.issue(SUBMIT_SCOPE)
    }

    pub fn delete_token(&self) -> String {
        self.state.tokens.issue(DELETE_SCOPE)
    }
}

pub fn harness() -> Harness {
    let store = Arc::new(FakeApplicationStore::default());
    let uploads = Arc::new(FakeUploadStore::default());
    let cache = Arc::new(MemoryCache::new());
    let state = AppState {
        applications: store.clone(),
        uploads: uploads.clone(),
        cache: cache.clone(),
        tokens: FormTokens::new(b"unit-test-secret", Duration::hours(24)).unwrap(),
        admin: Arc::new(BasicAdminGate::new(ADMIN_USER, ADMIN_PASSWORD)),
        public_base_url: String::new(),
    };
    Harness {
        state,
        store,
        uploads,
        cache,
    }
}
