//! Right.codes integration.

pub mod api;
pub mod quota;

pub use api::RightcodesApiClient;
pub use quota::summarize_subscription;
