pub mod health;
pub mod login;
pub mod password_reset;
pub mod signup;

pub use health::health_check;
pub use login::login;
pub use password_reset::{forgot_password, reset_password};
pub use signup::signup;
