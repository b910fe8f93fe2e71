pub mod classify;
pub mod config;
pub mod engine;
pub mod errors;
pub mod intake;
pub mod ledger;
pub mod model;
pub mod parse;
pub mod policy;
pub mod providers;
pub mod report;

pub use config::TriageConfig;
pub use engine::TriageEngine;
pub use errors::{ParseErrorKind, ServiceErrorKind, TriageError};
pub use ledger::Ledger;
pub use model::{
    CaseSubmission, CaseType, ClassificationResult, Court, LedgerEntry, LedgerFilter,
    RawSubmission, RoutingDecision, SummaryReport, Urgency,
};
