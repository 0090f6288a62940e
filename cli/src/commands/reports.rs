//! Reports commands

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tabled::Tabled;

use super::{ApiClient, CliError, Page};
use crate::output::{or_dash, status, OutputFormat};
use crate::ReportCommands;

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusDisplay {
    pub label: String,
    pub progress: u8,
    pub icon: String,
    pub color: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Report {
    pub id: i64,
    pub area_id: i64,
    pub alumno_nombre: String,
    pub alumno_codigo: String,
    pub form_data: Value,
    pub submitted_at: String,
    pub status: String,
    pub estimated_time: Option<String>,
    pub display: StatusDisplay,
    pub actions: Vec<String>,
}

#[derive(Tabled)]
struct ReportRow {
    id: i64,
    area: i64,
    alumno: String,
    lugar: String,
    estado: String,
    progreso: String,
    eta: String,
    acciones: String,
}

impl From<&Report> for ReportRow {
    fn from(r: &Report) -> Self {
        let lugar = match (r.form_data["pabellon_nombre"].as_str(), r.form_data["salon_nombre"].as_str()) {
            (Some(pabellon), Some(salon)) => format!("{pabellon} / {salon}"),
            _ => "-".to_string(),
        };
        Self {
            id: r.id,
            area: r.area_id,
            alumno: format!("{} ({})", r.alumno_nombre, r.alumno_codigo),
            lugar,
            estado: format!("{} {}", r.display.icon, status(&r.status)),
            progreso: format!("{}%", r.display.progress),
            eta: or_dash(r.estimated_time.as_deref()),
            acciones: r.actions.join(", "),
        }
    }
}

#[derive(Debug, Default, Serialize)]
struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    area_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    search: Option<String>,
    page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    per_page: Option<u32>,
}

pub async fn handle(action: ReportCommands, client: &ApiClient, format: OutputFormat) -> Result<(), CliError> {
    if !client.is_signed_in() {
        return Err(CliError::NotSignedIn);
    }
    match action {
        ReportCommands::List { area, status, search, page, per_page } => {
            let query = ListQuery { area_id: area, status, search, page, per_page };
            list(client, &query, format).await?;
        }
        ReportCommands::Status { id, status, eta } => {
            let body = json!({ "status": status, "estimated_time": eta });
            let report: Report = client.put(&format!("/reports/{id}/status"), &body).await?;
            println!("Report {} is now {}", report.id, report.display.label);
            list(client, &ListQuery { page: 1, ..Default::default() }, format).await?;
        }
    }
    Ok(())
}

async fn list(client: &ApiClient, query: &ListQuery, format: OutputFormat) -> Result<(), CliError> {
    let page: Page<Report> = client.get_query("/reports", query).await?;
    format.print(&page, |page| page.items.iter().map(ReportRow::from).collect());
    if matches!(format, OutputFormat::Table) {
        println!("page {}/{} of {} reports", page.page, page.total_pages.max(1), page.total);
    }
    Ok(())
}
