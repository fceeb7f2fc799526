pub mod url_validator;

pub use url_validator::{UrlValidationError, validate_request_uri};
