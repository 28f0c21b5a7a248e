pub mod auth;
pub mod password;
pub mod reset_token;

pub use auth::{AuthService, ForgotOutcome};
