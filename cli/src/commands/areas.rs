//! Areas commands

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tabled::Tabled;

use super::{ApiClient, CliError};
use crate::output::{or_dash, OutputFormat};
use crate::AreaCommands;

#[derive(Debug, Serialize, Deserialize)]
pub struct Area {
    pub id: i64,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AreaForm {
    pub area: Area,
    pub fields: Vec<Field>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub label: String,
    pub field_type: String,
    pub required: bool,
    pub placeholder: Option<String>,
    pub editor: Value,
}

impl Field {
    /// Choice values of a select field, with a marker when one of them
    /// opens a free-text detail.
    fn choices(&self) -> String {
        let values: Vec<&str> = self.editor["choices"]
            .as_array()
            .map(|choices| choices.iter().filter_map(|c| c["value"].as_str()).collect())
            .unwrap_or_default();
        let mut rendered = values.join(", ");
        if self.editor["other"].is_object() {
            rendered.push_str(" (+ detalle)");
        }
        rendered
    }
}

#[derive(Tabled)]
struct AreaRow {
    id: i64,
    nombre: String,
    descripcion: String,
}

#[derive(Tabled)]
struct FieldRow {
    campo: String,
    etiqueta: String,
    tipo: String,
    requerido: &'static str,
    opciones: String,
}

pub async fn handle(action: AreaCommands, client: &ApiClient, format: OutputFormat) -> Result<(), CliError> {
    match action {
        AreaCommands::List => {
            let areas: Vec<Area> = client.get("/areas").await?;
            format.print(&areas, |areas| {
                areas
                    .iter()
                    .map(|a| AreaRow { id: a.id, nombre: a.nombre.clone(), descripcion: or_dash(a.descripcion.as_deref()) })
                    .collect()
            });
        }
        AreaCommands::Form { id } => {
            let form: AreaForm = client.get(&format!("/areas/{id}/form")).await?;
            if matches!(format, OutputFormat::Table) {
                println!("{} (#{})", form.area.nombre, form.area.id);
            }
            format.print(&form, |form| form.fields.iter().map(field_row).collect());
        }
    }
    Ok(())
}

fn field_row(field: &Field) -> FieldRow {
    FieldRow {
        campo: field.name.clone(),
        etiqueta: field.label.clone(),
        tipo: field.field_type.clone(),
        requerido: if field.required { "sí" } else { "no" },
        opciones: field.choices(),
    }
}
