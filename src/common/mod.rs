/// Shared utilities and error handling
pub mod error;
pub mod result;
pub mod templates;

pub use error::ZtpError;
pub use result::ZtpResult;
pub use templates::{TemplateError, TemplateProcessor};
