//! Form definition, rendering and collection
use serde::Serialize;

use crate::field::{AreaFieldRow, FieldDescriptor, FieldType, SelectionOption};
use crate::location::SelectedLocation;
use crate::options::{resolve_choices, SelectChoice};
use crate::validation::{validate, ValidationError};
use crate::value::{FieldValue, FormData};
use crate::FormError;

/// Select value that asks the student to describe the issue in free text.
pub const OTHER_OPTION: &str = "otros";

/// Editor a field is rendered with.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Editor {
    Text,
    Textarea,
    File,
    Image,
    Date,
    Select {
        choices: Vec<SelectChoice>,
        other: Option<OtherText>,
    },
}

/// Conditional free-text sub-field of a select, present while `"otros"`
/// is the collected value.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OtherText {
    pub key: String,
    pub required: bool,
    pub value: Option<FieldValue>,
}

/// UI state of one field.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldState {
    pub name: String,
    pub label: String,
    pub field_type: FieldType,
    pub required: bool,
    pub placeholder: Option<String>,
    pub editor: Editor,
    pub value: Option<FieldValue>,
}

#[derive(Clone, Debug)]
struct ResolvedField {
    descriptor: FieldDescriptor,
    choices: Vec<SelectChoice>,
}

/// The form of one area: descriptors in `order_index` order with their
/// select options resolved once.
#[derive(Clone, Debug, Default)]
pub struct FormDefinition {
    fields: Vec<ResolvedField>,
}

impl FormDefinition {
    pub fn new(mut descriptors: Vec<FieldDescriptor>, area_options: &[SelectionOption]) -> Self {
        descriptors.sort_by_key(|d| d.order_index);
        let fields = descriptors
            .into_iter()
            .map(|descriptor| {
                let choices = match descriptor.field_type {
                    FieldType::Select => resolve_choices(&descriptor, area_options),
                    _ => Vec::new(),
                };
                ResolvedField { descriptor, choices }
            })
            .collect();
        Self { fields }
    }

    pub fn from_rows(rows: Vec<AreaFieldRow>, area_options: &[SelectionOption]) -> Self {
        Self::new(rows.into_iter().map(FieldDescriptor::from).collect(), area_options)
    }

    pub fn descriptors(&self) -> Vec<FieldDescriptor> {
        self.fields.iter().map(|f| f.descriptor.clone()).collect()
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().map(|f| &f.descriptor).find(|d| d.name == name)
    }

    pub fn len(&self) -> usize { self.fields.len() }

    pub fn is_empty(&self) -> bool { self.fields.is_empty() }

    /// Field states for the current payload, in display order.
    pub fn render(&self, payload: &FormData) -> Vec<FieldState> {
        self.fields.iter().map(|f| render_field(&f.descriptor, &f.choices, payload)).collect()
    }

    /// Store `value` for `name`.
    ///
    /// Moving a select away from `"otros"` drops its stale detail text. The
    /// detail key itself is only accepted while `"otros"` is selected.
    pub fn collect(&self, payload: &mut FormData, name: &str, value: FieldValue) -> Result<(), FormError> {
        if let Some(descriptor) = self.field(name) {
            if descriptor.field_type == FieldType::Select && value.as_text() != Some(OTHER_OPTION) {
                payload.remove(&descriptor.other_text_key());
            }
            payload.insert(name, value);
            return Ok(());
        }

        let parent = self
            .fields
            .iter()
            .map(|f| &f.descriptor)
            .find(|d| d.field_type == FieldType::Select && d.other_text_key() == name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?;
        if payload.text(&parent.name) != Some(OTHER_OPTION) {
            return Err(FormError::OtherTextWithoutOther(name.to_string()));
        }
        payload.insert(name, value);
        Ok(())
    }

    pub fn validate(&self, payload: &FormData, location: Option<&SelectedLocation>) -> Result<(), ValidationError> {
        validate(&self.descriptors(), payload, location)
    }
}

/// Render one field against the payload it is being filled into.
pub fn render_field(descriptor: &FieldDescriptor, choices: &[SelectChoice], payload: &FormData) -> FieldState {
    let value = payload.get(&descriptor.name).cloned();
    let editor = match descriptor.field_type {
        FieldType::Text => Editor::Text,
        FieldType::Textarea => Editor::Textarea,
        FieldType::File => Editor::File,
        FieldType::Image => Editor::Image,
        FieldType::Date => Editor::Date,
        FieldType::Select => {
            let other = (value.as_ref().and_then(FieldValue::as_text) == Some(OTHER_OPTION)).then(|| {
                let key = descriptor.other_text_key();
                OtherText { value: payload.get(&key).cloned(), key, required: true }
            });
            Editor::Select { choices: choices.to_vec(), other }
        }
    };
    FieldState {
        name: descriptor.name.clone(),
        label: descriptor.label.clone(),
        field_type: descriptor.field_type,
        required: descriptor.required,
        placeholder: descriptor.placeholder.clone(),
        editor,
        value,
    }
}
