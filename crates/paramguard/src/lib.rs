//! Paramguard: telemetry parameter validation and schema drift detection.
//!
//! Two independent pieces:
//!
//! - **Validation**: a registry of per-parameter rules for the game's
//!   telemetry events. Every rule is a total predicate over [`Value`]:
//!   malformed input is invalid, never an error. Unknown parameters pass.
//! - **Drift detection**: compares two snapshots (old and new app version),
//!   flags parameters that appeared or disappeared, and confirms each
//!   candidate against the full warehouse dataset so sampling gaps do not
//!   produce false alarms.
//!
//! # Example
//!
//! ```no_run
//! use paramguard::{DriftConfig, DriftRequest, SchemaDriftAnalyzer, SnapshotLoader};
//! use chrono::NaiveDate;
//!
//! let loader = SnapshotLoader::new();
//! let old = loader.load("events_1.4.csv").unwrap();
//! let new = loader.load("events_1.5.csv").unwrap();
//!
//! let request = DriftRequest::new(
//!     "1.4",
//!     "1.5",
//!     NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 5, 7).unwrap(),
//! );
//! let result = SchemaDriftAnalyzer::new(DriftConfig::default())
//!     .analyze_parameter_changes(&old, &new, &request)
//!     .unwrap();
//!
//! println!("New parameters: {}", result.new_parameters.len());
//! ```

pub mod clock;
pub mod config;
pub mod drift;
pub mod error;
pub mod input;
pub mod validation;
pub mod value;
pub mod warehouse;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::DriftConfig;
pub use drift::{
    DriftAnalysisResult, DriftRequest, ParameterChange, SchemaDriftAnalyzer, is_effectively_null,
};
pub use error::{ParamguardError, Result};
pub use input::{Snapshot, SnapshotLoader, SourceMetadata};
pub use validation::{Validator, ValidatorRegistry, validate_parameter};
pub use value::{Value, normalize_boolean_like};
pub use warehouse::{BigQueryClient, BigQueryConfig, MockWarehouse, WarehouseClient};
