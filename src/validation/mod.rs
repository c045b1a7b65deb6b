pub mod error;
pub mod rules;
pub mod validator;

pub use error::{ValidationError, ValidationErrorType};
pub use validator::Validator;
