//! Export functionality for reports.
//!
//! JSON is the primary format. CSV flattens the three buckets into one
//! table for spreadsheets.

use super::{create_file, Report};
use crate::error::ReportError;
use std::io::Write;
use std::path::Path;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

/// Write `report` to `path` in the given format
pub fn write_report(report: &Report, path: &Path, format: ExportFormat) -> Result<(), ReportError> {
    let mut writer = create_file(path)?;
    let io_error = |source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };

    match format {
        ExportFormat::Json => report.write_json(&mut writer)?,
        ExportFormat::Csv => export_csv(report, &mut writer).map_err(io_error)?,
    }

    writer.flush().map_err(io_error)?;
    tracing::info!(path = %path.display(), ?format, "report written");
    Ok(())
}

/// Export a report to CSV
///
/// CSV columns: bucket, anchor, path, width, height, distance, hash.
/// Anchors have an empty `anchor` column; `distance` is set for similar
/// members only and `hash` for `other` rows only.
pub fn export_csv<W: Write>(report: &Report, mut writer: W) -> std::io::Result<()> {
    writeln!(writer, "bucket,anchor,path,width,height,distance,hash")?;

    for entry in &report.duplicate {
        let anchor = &entry.compare;
        writeln!(
            writer,
            "duplicate,,{},{},{},,",
            csv_field(&anchor.path),
            anchor.width,
            anchor.height
        )?;
        for path in &entry.withs {
            writeln!(
                writer,
                "duplicate,{},{},,,,",
                csv_field(&anchor.path),
                csv_field(path)
            )?;
        }
    }

    for entry in &report.similar {
        let anchor = &entry.compare;
        writeln!(
            writer,
            "similar,,{},{},{},,",
            csv_field(&anchor.path),
            anchor.width,
            anchor.height
        )?;
        for member in &entry.with {
            writeln!(
                writer,
                "similar,{},{},{},{},{},",
                csv_field(&anchor.path),
                csv_field(&member.path),
                member.width,
                member.height,
                member.distance
            )?;
        }
    }

    for entry in &report.other {
        writeln!(writer, "other,,{},,,,{}", csv_field(&entry.path), entry.hash)?;
    }

    Ok(())
}

/// Quote a field if it contains a separator, quote, or line break
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reporter::{CompareInfo, DuplicateEntry, OtherEntry, SimilarEntry, SimilarWith};

    fn report() -> Report {
        Report {
            duplicate: vec![DuplicateEntry {
                compare: CompareInfo {
                    path: "/p/a.jpg".to_string(),
                    width: 10,
                    height: 20,
                },
                withs: vec!["/p/copy, 2.jpg".to_string()],
            }],
            similar: vec![SimilarEntry {
                compare: CompareInfo {
                    path: "/v/a.mp4".to_string(),
                    width: 1920,
                    height: 1080,
                },
                with: vec![SimilarWith {
                    path: "/v/b.mp4".to_string(),
                    width: 1280,
                    height: 720,
                    distance: 4,
                }],
            }],
            other: vec![OtherEntry {
                path: "/p/z.png".to_string(),
                hash: "abc123".to_string(),
            }],
        }
    }

    #[test]
    fn csv_export_has_one_row_per_file() {
        let mut buffer = Vec::new();
        export_csv(&report(), &mut buffer).unwrap();
        let csv = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "bucket,anchor,path,width,height,distance,hash");
        assert_eq!(lines[1], "duplicate,,/p/a.jpg,10,20,,");
        assert_eq!(lines[2], "duplicate,/p/a.jpg,\"/p/copy, 2.jpg\",,,,");
        assert_eq!(lines[4], "similar,/v/a.mp4,/v/b.mp4,1280,720,4,");
        assert_eq!(lines[5], "other,,/p/z.png,,,,abc123");
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn quotes_are_doubled() {
        assert_eq!(csv_field(r#"say "cheese".jpg"#), r#""say ""cheese"".jpg""#);
        assert_eq!(csv_field("plain.jpg"), "plain.jpg");
    }

    #[test]
    fn write_report_honours_format() {
        let dir = tempfile::TempDir::new().unwrap();
        let json_path = dir.path().join("report.json");
        let csv_path = dir.path().join("report.csv");

        write_report(&report(), &json_path, ExportFormat::Json).unwrap();
        write_report(&report(), &csv_path, ExportFormat::Csv).unwrap();

        let json = std::fs::read_to_string(json_path).unwrap();
        let csv = std::fs::read_to_string(csv_path).unwrap();
        assert!(json.trim_start().starts_with('{'));
        assert!(csv.starts_with("bucket,"));
    }
}
