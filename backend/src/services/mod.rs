//! Service layer for business logic
//!
//! Each service loads the datasets it needs from the store and reshapes
//! them into the response envelopes the dashboard renders. HTTP handlers
//! only deal with parameter presence and dispatch.

pub mod concepts;
pub mod sub_field_detail;
pub mod topic_detail;

use crate::dataset::DatasetError;
use crate::error::AppError;

/// Map a dataset load failure to an error response, logging the cause
fn unavailable(context: &'static str) -> impl FnOnce(DatasetError) -> AppError {
    move |err| {
        tracing::warn!(error = %err, "{}", context);
        AppError::DatasetUnavailable(format!("{}: {}", context, err))
    }
}
