pub mod check_email;
pub mod check_username;
pub mod confirm;
pub mod forgot_password;
pub mod login;
pub mod resend;
pub mod reset_password;
pub mod signup;
pub mod utils;

pub use check_email::check_email_get;
pub use check_username::check_username_get;
pub use confirm::confirm_get;
pub use forgot_password::forgot_password_post;
pub use login::login_post;
pub use resend::resend_post;
pub use reset_password::reset_password_post;
pub use signup::signup_post;
