use std::fs;

use anyhow::Result;

use crate::domain::{ports::ReportWriter, report::RunReport};

use self::{json::JsonWriter, text::TextWriter};

pub mod json;
pub mod text;

/// Register available writers - OCP: add new ones without touching main.rs
pub fn all_writers() -> Vec<Box<dyn ReportWriter>> {
    vec![Box::new(JsonWriter), Box::new(TextWriter)]
}

pub fn writer_for(format: &str) -> Option<Box<dyn ReportWriter>> {
    match format {
        "json" => Some(Box::new(JsonWriter)),
        "text" | "txt" => Some(Box::new(TextWriter)),
        _ => None,
    }
}

/// Writes the report to disk via the chosen writer
pub fn write_to_file(writer: &dyn ReportWriter, report: &RunReport, dir: &str) -> Result<()> {
    // Ensure the output directory exists
    fs::create_dir_all(dir)?;

    let content = writer.format(report)?;
    let path = format!("{}/{}.{}", dir, report.run_id, writer.extension());
    fs::write(&path, &content)?;
    Ok(())
}
