//! Paddock Core — form state engine, file-slot reconciliation, and the
//! listing query contract of the livery marketplace.

pub mod config;
pub mod files;
pub mod form;
pub mod listing;
pub mod query;
pub mod traits;
pub mod types;

pub use config::{non_empty_string, FieldConfig, FormConfig, Validator, ValidatorOutcome};
pub use files::{
    dedupe_and_cap_uploads, reconcile_file_slots, FileSlotRequirement, SlotAssignment, SlotName,
    UploadError,
};
pub use form::{FieldPhase, FormEngine, FormError, FormState, FormStatus};
pub use listing::{Creator, ListingRecord};
pub use query::{apply_filters, FilterCriteria, SortDirection, PAGE_SIZE};
pub use traits::{ListingEndpoint, SubmitAction, SubmitOutcome};
pub use types::{FieldValue, FormValues, UploadFile};
