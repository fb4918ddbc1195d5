//! The scan request form: raw field state, validation into a typed
//! [`ScanRequest`], and guarded submission to the backend.

pub mod fields;
pub mod schedule;
pub mod validation;
pub mod submit;
pub mod optin;

pub use fields::{Field, IntervalUnit, ScanRequestForm, ScheduleType};
pub use schedule::{CronFields, IntervalPayload, Schedule, ScheduleSpec};
pub use validation::{FieldError, FieldErrorKind, ScanRequest, ValidationErrors};
pub use submit::{Route, ScanSubmitter, SubmitOutcome};
pub use optin::{opt_in, OptIn};
