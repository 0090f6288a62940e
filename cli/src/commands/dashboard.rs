//! Dashboard command

use serde::{Deserialize, Serialize};
use tabled::Tabled;

use super::reports::Report;
use super::{ApiClient, CliError};
use crate::output::{status, table, OutputFormat};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StatusCounts {
    pub total: u64,
    pub pending: u64,
    pub in_progress: u64,
    pub resolved: u64,
    pub approved: u64,
    pub rejected: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AreaRef {
    pub id: i64,
    pub nombre: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AreaSummary {
    pub area: AreaRef,
    pub counts: StatusCounts,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Dashboard {
    Admin { totals: StatusCounts, areas: Vec<AreaSummary> },
    Area { area: AreaRef, counts: StatusCounts, recent: Vec<Report> },
}

#[derive(Tabled)]
struct CountsRow {
    area: String,
    total: u64,
    pending: u64,
    in_progress: u64,
    resolved: u64,
    approved: u64,
    rejected: u64,
}

impl CountsRow {
    fn new(area: impl Into<String>, c: &StatusCounts) -> Self {
        Self {
            area: area.into(),
            total: c.total,
            pending: c.pending,
            in_progress: c.in_progress,
            resolved: c.resolved,
            approved: c.approved,
            rejected: c.rejected,
        }
    }
}

#[derive(Tabled)]
struct RecentRow {
    id: i64,
    alumno: String,
    estado: String,
    enviado: String,
}

fn rows(dashboard: &Dashboard) -> Vec<CountsRow> {
    match dashboard {
        Dashboard::Admin { totals, areas } => {
            let mut rows: Vec<CountsRow> = areas.iter().map(|a| CountsRow::new(a.area.nombre.clone(), &a.counts)).collect();
            rows.push(CountsRow::new("Total", totals));
            rows
        }
        Dashboard::Area { area, counts, .. } => vec![CountsRow::new(area.nombre.clone(), counts)],
    }
}

pub async fn handle(client: &ApiClient, format: OutputFormat) -> Result<(), CliError> {
    if !client.is_signed_in() {
        return Err(CliError::NotSignedIn);
    }
    let dashboard: Dashboard = client.get("/dashboard").await?;
    format.print(&dashboard, rows);

    if let (OutputFormat::Table, Dashboard::Area { recent, .. }) = (format, &dashboard) {
        if !recent.is_empty() {
            println!("Recent reports");
            let recent: Vec<RecentRow> = recent
                .iter()
                .map(|r| RecentRow {
                    id: r.id,
                    alumno: r.alumno_nombre.clone(),
                    estado: status(&r.status).to_string(),
                    enviado: r.submitted_at.clone(),
                })
                .collect();
            println!("{}", table(recent));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_admin_rows_end_with_total() {
        let dashboard: Dashboard = serde_json::from_value(json!({
            "role": "admin",
            "totals": { "total": 3, "pending": 2, "in_progress": 1, "resolved": 0, "approved": 0, "rejected": 0 },
            "areas": [
                { "area": { "id": 1, "nombre": "Mantenimiento", "descripcion": null, "image_url": null },
                  "counts": { "total": 3, "pending": 2, "in_progress": 1, "resolved": 0, "approved": 0, "rejected": 0 } }
            ]
        }))
        .unwrap();
        let rows = rows(&dashboard);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].area, "Total");
        assert_eq!(rows[1].pending, 2);
    }
}
