/// Export of result rows: CSV, JSON and a plain-text table.
///
/// Every format carries the same three columns: Size, Unit, Path.
use crate::error::{Result, ScanError};
use crate::model::DisplayEntry;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Text,
}

impl ExportFormat {
    /// Pick a format from the file extension; anything unknown is text.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .as_deref()
        {
            Some("csv") => Self::Csv,
            Some("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Write rows as CSV with a `Size,Unit,Path` header.
pub fn write_csv<W: Write>(writer: W, entries: &[DisplayEntry]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["Size", "Unit", "Path"])?;
    for entry in entries {
        csv.write_record([
            entry.size.to_string().as_str(),
            entry.unit.symbol(),
            entry.path.as_str(),
        ])?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write rows as a pretty-printed JSON array of `{Size, Unit, Path}` objects.
pub fn write_json<W: Write>(mut writer: W, entries: &[DisplayEntry]) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, entries)?;
    writer.write_all(b"\n").map_err(serde_json::Error::io)?;
    Ok(())
}

/// Render rows as an aligned text table.
pub fn render_table(entries: &[DisplayEntry]) -> String {
    let sizes: Vec<String> = entries.iter().map(|e| e.size.to_string()).collect();
    let size_width = sizes.iter().map(String::len).max().unwrap_or(0).max(4);
    let unit_width = entries
        .iter()
        .map(|e| e.unit.symbol().len())
        .max()
        .unwrap_or(0)
        .max(4);

    let mut out = String::new();
    out.push_str(&format!("{:>size_width$}  {:<unit_width$}  Path\n", "Size", "Unit"));
    out.push_str(&format!(
        "{}  {}  {}\n",
        "-".repeat(size_width),
        "-".repeat(unit_width),
        "-".repeat(4)
    ));
    for (entry, size) in entries.iter().zip(&sizes) {
        out.push_str(&format!(
            "{:>size_width$}  {:<unit_width$}  {}\n",
            size,
            entry.unit.symbol(),
            entry.path
        ));
    }
    out
}

/// Write rows to `path` in `format`.
pub fn export_to_file(path: &Path, format: ExportFormat, entries: &[DisplayEntry]) -> Result<()> {
    let file = File::create(path).map_err(|e| ScanError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    match format {
        ExportFormat::Csv => write_csv(&mut writer, entries)?,
        ExportFormat::Json => write_json(&mut writer, entries)?,
        ExportFormat::Text => writer
            .write_all(render_table(entries).as_bytes())
            .map_err(|e| ScanError::io(path, e))?,
    }
    writer.flush().map_err(|e| ScanError::io(path, e))?;
    info!("Exported {} rows to {}", entries.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SizeUnit, SizeValue, Tier};

    fn rows() -> Vec<DisplayEntry> {
        vec![
            DisplayEntry {
                size: SizeValue::Rounded(600.0),
                unit: SizeUnit::Decimal(Tier::Mega),
                path: "/data/A".into(),
                size_bytes: 600_000_000,
            },
            DisplayEntry {
                size: SizeValue::Exact(12),
                unit: SizeUnit::Byte,
                path: "/data/with,comma".into(),
                size_bytes: 12,
            },
        ]
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(ExportFormat::from_path(Path::new("out.CSV")), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_path(Path::new("out.json")), ExportFormat::Json);
        assert_eq!(ExportFormat::from_path(Path::new("out.txt")), ExportFormat::Text);
        assert_eq!(ExportFormat::from_path(Path::new("out")), ExportFormat::Text);
    }

    #[test]
    fn csv_has_header_and_quotes_commas() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &rows()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Size,Unit,Path");
        assert_eq!(lines[1], "600,MB,/data/A");
        assert_eq!(lines[2], "12,B,\"/data/with,comma\"");
    }

    #[test]
    fn json_is_array_of_three_fields() {
        let mut buf = Vec::new();
        write_json(&mut buf, &rows()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        let array = value.as_array().unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(array[0]["Size"], 600.0);
        assert_eq!(array[0]["Unit"], "MB");
        assert_eq!(array[0]["Path"], "/data/A");
        assert_eq!(array[1]["Size"], 12);
        assert!(array[0].get("size_bytes").is_none());
    }

    #[test]
    fn table_aligns_columns() {
        let table = render_table(&rows());
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Size"));
        assert!(lines[2].starts_with(" 600  MB"), "got {:?}", lines[2]);
        assert!(lines[3].ends_with("/data/with,comma"));
    }

    #[test]
    fn empty_table_has_only_header() {
        assert_eq!(render_table(&[]).lines().count(), 2);
    }

    #[test]
    fn export_writes_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("out.csv");
        export_to_file(&path, ExportFormat::from_path(&path), &rows()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Size,Unit,Path"));
    }
}
