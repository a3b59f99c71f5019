//! Schema drift detection.
//!
//! Compares the columns of two telemetry snapshots, flags parameters that
//! appeared or disappeared (including columns that flipped between
//! carrying data and being effectively null), and confirms each candidate
//! against the full warehouse dataset before reporting it.

mod analyzer;
mod candidates;
mod confirmation;
mod inference;
mod nullness;
mod report;

pub use analyzer::{
    DriftAnalysisResult, DriftRequest, DriftSummary, ParameterChange, SchemaDriftAnalyzer,
};
pub use candidates::{Candidate, ChangeKind, ColumnDiff, Direction, find_candidates};
pub use confirmation::{Confirmation, ConfirmationGate, check_identifier};
pub use inference::{InferredRule, PatternKind, infer_rule, validation_type_label};
pub use nullness::{ALL_EMPTY_OR_ZERO, ALL_NULL, is_effectively_null, sample_values};
pub use report::render_text_report;
