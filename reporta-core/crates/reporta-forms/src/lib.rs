//! Reporta Form Engine
//!
//! Builds the report form of an area from its `area_fields` rows and turns
//! what a student fills in into a flat submission payload.
//!
//! ## Features
//! - Field types: text, textarea, file, image, date, select
//! - Select options inline (JSON array) or from a named selection group
//! - Conditional `"<field>_otros_text"` detail when `"otros"` is chosen
//! - Location (pabellón + salón) merged flat into the payload
//! - Upload policy and two-phase upload slots for file/image fields

pub mod field;
pub mod form;
pub mod location;
pub mod options;
pub mod submission;
pub mod upload;
pub mod validation;
pub mod value;

pub use field::{AreaFieldRow, FieldDescriptor, FieldType, OptionSource, SelectionOption};
pub use form::{Editor, FieldState, FormDefinition, OtherText, OTHER_OPTION};
pub use location::{Pabellon, Salon, SelectedLocation, LOCATION_KEYS};
pub use options::{resolve_choices, resolve_options, SelectChoice};
pub use submission::{build_submission, Area, NewSubmission, Student, Submission};
pub use upload::{Preview, UploadError, UploadPolicy, UploadSlot};
pub use validation::{validate, ValidationError};
pub use value::{FieldValue, FormData};

use thiserror::Error;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("\"{0}\" only accepts a value while \"otros\" is selected")]
    OtherTextWithoutOther(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Upload(#[from] UploadError),
}

pub type Result<T> = std::result::Result<T, FormError>;
