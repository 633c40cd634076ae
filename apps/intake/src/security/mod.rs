pub mod admin_gate;
pub mod form_token;
