use converter_core::{ConversionRecord, ConverterError, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

pub mod document;
pub mod spreadsheet;

pub use document::{document_line, document_lines, export_document};
pub use spreadsheet::{export_spreadsheet, sheet_rows, CellValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Spreadsheet,
    Document,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 2] = [ExportFormat::Spreadsheet, ExportFormat::Document];

    pub fn file_name(self) -> &'static str {
        match self {
            ExportFormat::Spreadsheet => "conversion_history.xlsx",
            ExportFormat::Document => "conversion_history.pdf",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Spreadsheet => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Document => "application/pdf",
        }
    }

    /// Regenerate the whole export from `records`.
    pub fn render(self, records: &[ConversionRecord]) -> Result<Vec<u8>> {
        if records.is_empty() {
            return Err(ConverterError::ExportError("nothing to export".into()));
        }
        match self {
            ExportFormat::Spreadsheet => export_spreadsheet(records),
            ExportFormat::Document => export_document(records),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Spreadsheet => f.write_str("spreadsheet"),
            ExportFormat::Document => f.write_str("document"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ConverterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spreadsheet" | "xlsx" | "excel" => Ok(ExportFormat::Spreadsheet),
            "document" | "pdf" => Ok(ExportFormat::Document),
            other => Err(ConverterError::ExportError(format!(
                "Unknown export format '{}' (expected spreadsheet or document)",
                other
            ))),
        }
    }
}

/// Write a fresh export to `dir/<file name>` and return the path.
pub fn write_export(
    dir: impl AsRef<Path>,
    format: ExportFormat,
    records: &[ConversionRecord],
) -> Result<PathBuf> {
    let bytes = format.render(records)?;
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let path = dir.join(format.file_name());
    std::fs::write(&path, bytes)?;

    info!("Exported {} records as {} to {:?}", records.len(), format, path);
    Ok(path)
}
