pub mod failure_policy;
pub mod outcome_code;
pub mod session_id;
pub mod source_url;

pub use failure_policy::FailurePolicy;
pub use outcome_code::OutcomeCode;
pub use session_id::SessionId;
pub use source_url::{SourceUrl, SourceUrlError};
