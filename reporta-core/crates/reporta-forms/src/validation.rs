//! Submission validation
use thiserror::Error;

use crate::field::{FieldDescriptor, FieldType};
use crate::form::OTHER_OPTION;
use crate::location::SelectedLocation;
use crate::value::FormData;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("select a pabellón and a salón")]
    MissingLocation,

    #[error("salón {salon_id} does not belong to pabellón {pabellon_id}")]
    LocationMismatch { pabellon_id: i64, salon_id: i64 },

    #[error("\"{0}\" is required")]
    MissingRequiredField(String),

    #[error("\"{0}\": describe the \"otros\" option")]
    MissingOtherText(String),
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::MissingLocation => "missing_location",
            ValidationError::LocationMismatch { .. } => "location_mismatch",
            ValidationError::MissingRequiredField(_) => "missing_required_field",
            ValidationError::MissingOtherText(_) => "missing_other_text",
        }
    }
}

/// Check a payload against the area's descriptors.
///
/// The location is checked first and independently of the fields. Fields
/// are then checked in `order_index` order and the first failure wins.
pub fn validate(
    descriptors: &[FieldDescriptor],
    payload: &FormData,
    location: Option<&SelectedLocation>,
) -> Result<(), ValidationError> {
    let location = location.ok_or(ValidationError::MissingLocation)?;
    if !location.is_consistent() {
        return Err(ValidationError::LocationMismatch {
            pabellon_id: location.pabellon.id,
            salon_id: location.salon.id,
        });
    }

    let mut ordered: Vec<&FieldDescriptor> = descriptors.iter().collect();
    ordered.sort_by_key(|d| d.order_index);

    for descriptor in ordered {
        if descriptor.required && payload.is_blank(&descriptor.name) {
            return Err(ValidationError::MissingRequiredField(descriptor.label.clone()));
        }
        if descriptor.field_type == FieldType::Select
            && payload.text(&descriptor.name) == Some(OTHER_OPTION)
            && payload.is_blank(&descriptor.other_text_key())
        {
            return Err(ValidationError::MissingOtherText(descriptor.label.clone()));
        }
    }
    Ok(())
}
