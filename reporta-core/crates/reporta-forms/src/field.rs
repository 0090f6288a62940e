//! Field descriptors
//!
//! `area_fields` rows arrive with a free-form `field_type` string and an
//! overloaded `options` column. Both are decided once here, when the row is
//! turned into a [`FieldDescriptor`], and never re-sniffed afterwards.
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Textarea,
    File,
    Image,
    Date,
    Select,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::File => "file",
            FieldType::Image => "image",
            FieldType::Date => "date",
            FieldType::Select => "select",
        }
    }

    pub fn parse(raw: &str) -> Option<FieldType> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "text" => Some(FieldType::Text),
            "textarea" => Some(FieldType::Textarea),
            "file" => Some(FieldType::File),
            "image" => Some(FieldType::Image),
            "date" => Some(FieldType::Date),
            "select" => Some(FieldType::Select),
            _ => None,
        }
    }

    pub fn is_upload(&self) -> bool {
        matches!(self, FieldType::File | FieldType::Image)
    }
}

/// Where a select field's options come from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum OptionSource {
    /// Literal options from a JSON array, blanks already dropped.
    Inline(Vec<String>),
    /// Name of a `selection_options` group of the same area.
    Group(String),
}

impl OptionSource {
    /// Anything that is not a JSON array, including text that is not JSON
    /// at all, names a group.
    pub fn parse(raw: &str) -> Option<OptionSource> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(serde_json::Value::Array(items)) => Some(OptionSource::Inline(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        serde_json::Value::String(s) => Some(s),
                        serde_json::Value::Number(n) => Some(n.to_string()),
                        serde_json::Value::Bool(b) => Some(b.to_string()),
                        _ => None,
                    })
                    .filter(|s| !s.trim().is_empty())
                    .collect(),
            )),
            _ => Some(OptionSource::Group(raw.to_string())),
        }
    }
}

/// Raw `area_fields` row as stored.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AreaFieldRow {
    pub id: i64,
    pub area_id: i64,
    pub field_name: String,
    pub field_type: String,
    pub field_label: String,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub options: Option<String>,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub order_index: i32,
}

/// Typed field descriptor.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldDescriptor {
    pub id: i64,
    pub area_id: i64,
    pub name: String,
    pub field_type: FieldType,
    pub label: String,
    pub required: bool,
    pub options: Option<OptionSource>,
    pub placeholder: Option<String>,
    pub order_index: i32,
}

impl FieldDescriptor {
    /// Key of the free-text detail that accompanies an `"otros"` choice.
    pub fn other_text_key(&self) -> String {
        format!("{}_otros_text", self.name)
    }
}

impl From<AreaFieldRow> for FieldDescriptor {
    fn from(row: AreaFieldRow) -> Self {
        let field_type = FieldType::parse(&row.field_type).unwrap_or_else(|| {
            warn!(field = %row.field_name, field_type = %row.field_type, "unknown field type, rendering as text");
            FieldType::Text
        });
        let options = match field_type {
            FieldType::Select => row.options.as_deref().and_then(OptionSource::parse),
            _ => None,
        };
        Self {
            id: row.id,
            area_id: row.area_id,
            name: row.field_name,
            field_type,
            label: row.field_label,
            required: row.is_required,
            options,
            placeholder: row.placeholder.filter(|p| !p.trim().is_empty()),
            order_index: row.order_index,
        }
    }
}

/// `selection_options` row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionOption {
    pub id: i64,
    pub area_id: i64,
    pub group_name: String,
    pub option_value: String,
    #[serde(default)]
    pub option_label: String,
    #[serde(default)]
    pub order_index: i32,
}
