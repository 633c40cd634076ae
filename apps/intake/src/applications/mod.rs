pub mod deletion;
pub mod file_type;
pub mod handlers;
pub mod listing;
pub mod sanitize;
pub mod store;
pub mod submission;
