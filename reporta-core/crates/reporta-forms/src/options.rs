//! Select option resolution
use serde::{Deserialize, Serialize};

use crate::field::{FieldDescriptor, OptionSource, SelectionOption};

/// One selectable entry: the stored value and what operators read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectChoice {
    pub value: String,
    pub label: String,
}

/// Ordered option values of `descriptor`.
///
/// `area_options` are the selection options of the descriptor's area.
pub fn resolve_options(descriptor: &FieldDescriptor, area_options: &[SelectionOption]) -> Vec<String> {
    resolve_choices(descriptor, area_options)
        .into_iter()
        .map(|choice| choice.value)
        .collect()
}

/// Like [`resolve_options`] but keeps each group option's label.
pub fn resolve_choices(descriptor: &FieldDescriptor, area_options: &[SelectionOption]) -> Vec<SelectChoice> {
    match &descriptor.options {
        Some(OptionSource::Inline(values)) => values
            .iter()
            .map(|v| SelectChoice { value: v.clone(), label: v.clone() })
            .collect(),
        Some(OptionSource::Group(group)) => {
            let mut group_options: Vec<&SelectionOption> =
                area_options.iter().filter(|o| &o.group_name == group).collect();
            group_options.sort_by_key(|o| o.order_index);
            group_options
                .into_iter()
                .map(|o| SelectChoice {
                    value: o.option_value.clone(),
                    label: if o.option_label.trim().is_empty() {
                        o.option_value.clone()
                    } else {
                        o.option_label.clone()
                    },
                })
                .collect()
        }
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{AreaFieldRow, FieldDescriptor};

    fn select(options: &str) -> FieldDescriptor {
        AreaFieldRow {
            id: 3,
            area_id: 1,
            field_name: "color".into(),
            field_type: "select".into(),
            field_label: "Color".into(),
            is_required: true,
            options: Some(options.into()),
            placeholder: None,
            order_index: 0,
        }
        .into()
    }

    fn option(id: i64, group: &str, value: &str, order_index: i32) -> SelectionOption {
        SelectionOption {
            id,
            area_id: 1,
            group_name: group.into(),
            option_value: value.into(),
            option_label: String::new(),
            order_index,
        }
    }

    #[test]
    fn test_inline_json_array() {
        assert_eq!(resolve_options(&select(r#"["A","B",""]"#), &[]), vec!["A", "B"]);
    }

    #[test]
    fn test_group_fallback_in_order() {
        let options = vec![
            option(2, "colores", "Azul", 1),
            option(9, "tamaños", "Grande", 0),
            option(1, "colores", "Rojo", 0),
        ];
        assert_eq!(resolve_options(&select("colores"), &options), vec!["Rojo", "Azul"]);
    }

    #[test]
    fn test_group_labels_fall_back_to_value() {
        let mut labelled = option(1, "turnos", "m", 0);
        labelled.option_label = "Mañana".into();
        let choices = resolve_choices(&select("turnos"), &[labelled, option(2, "turnos", "Tarde", 1)]);
        assert_eq!(choices[0].label, "Mañana");
        assert_eq!(choices[1].label, "Tarde");
    }

    #[test]
    fn test_missing_group_is_empty() {
        assert!(resolve_options(&select("inexistente"), &[option(1, "colores", "Rojo", 0)]).is_empty());
    }
}
