pub const OK: i32 = 0;
pub const VALIDATION_ERROR: i32 = 1;
pub const CONFIG_ERROR: i32 = 2;
pub const SERVICE_ERROR: i32 = 3;

use docket_core::TriageError;

pub fn for_error(e: &TriageError) -> i32 {
    match e {
        TriageError::Validation(_) => VALIDATION_ERROR,
        TriageError::Config(_) => CONFIG_ERROR,
        TriageError::Service { .. } | TriageError::Parse { .. } => SERVICE_ERROR,
        TriageError::DuplicateCase(_)
        | TriageError::NotFound(_)
        | TriageError::Storage(_)
        | TriageError::Serialize(_)
        | TriageError::Internal(_) => SERVICE_ERROR,
    }
}
