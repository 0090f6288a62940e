//! Output formatting

use clap::ValueEnum;
use colored::{ColoredString, Colorize};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

impl OutputFormat {
    /// Print `data` as JSON or YAML, or as a table of `rows` built from it.
    pub fn print<T, R, F>(&self, data: &T, rows: F)
    where
        T: Serialize,
        R: Tabled,
        F: FnOnce(&T) -> Vec<R>,
    {
        match self {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(data).unwrap_or_default());
            }
            OutputFormat::Yaml => {
                println!("{}", serde_yaml::to_string(data).unwrap_or_default());
            }
            OutputFormat::Table => {
                let rows = rows(data);
                if rows.is_empty() {
                    println!("{}", "(no results)".dimmed());
                } else {
                    println!("{}", table(rows));
                }
            }
        }
    }
}

pub fn table<R: Tabled>(rows: Vec<R>) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Status name colored the way the dashboard shows it.
pub fn status(status: &str) -> ColoredString {
    match status {
        "pending" => status.yellow(),
        "in_progress" => status.blue(),
        "resolved" => status.green(),
        "approved" => status.green().bold(),
        "rejected" => status.red(),
        other => other.normal(),
    }
}

pub fn or_dash(value: Option<&str>) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or("-").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Tabled)]
    struct Row {
        id: i64,
        nombre: String,
    }

    #[test]
    fn test_table_has_headers() {
        let rendered = table(vec![Row { id: 1, nombre: "Limpieza".into() }]);
        assert!(rendered.contains("nombre"));
        assert!(rendered.contains("Limpieza"));
    }

    #[test]
    fn test_or_dash() {
        assert_eq!(or_dash(None), "-");
        assert_eq!(or_dash(Some("")), "-");
        assert_eq!(or_dash(Some("2 horas")), "2 horas");
    }
}
