use crate::error::{CvError, Result};
use crate::models::record::{CsvTable, Record};
use std::path::Path;
use tokio::fs;

/// Loads a CSV file whose first row names the columns
pub async fn load_csv(path: &Path) -> Result<CsvTable> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| CvError::io(path, e))?;

    let table = parse_csv(&content, path)?;
    tracing::debug!(
        "{}: {} columns, {} rows",
        path.display(),
        table.headers.len(),
        table.len()
    );
    Ok(table)
}

/// Parses CSV text; `path` is only used in error messages
///
/// A leading byte order mark is dropped and short rows read as empty cells.
pub fn parse_csv(content: &str, path: &Path) -> Result<CsvTable> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| CvError::csv(path, e))?
        .iter()
        .map(String::from)
        .collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| CvError::csv(path, e))?;
        let record = Record::from_pairs(
            headers
                .iter()
                .enumerate()
                .map(|(idx, name)| (name.as_str(), row.get(idx).unwrap_or(""))),
        );
        records.push(record);
    }

    Ok(CsvTable { headers, records })
}

/// Serializes a table with its original column order
pub fn to_csv_string(table: &CsvTable, path: &Path) -> Result<String> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());

    writer
        .write_record(&table.headers)
        .map_err(|e| CvError::csv(path, e))?;
    for record in &table.records {
        writer
            .write_record(table.headers.iter().map(|name| record.get(name)))
            .map_err(|e| CvError::csv(path, e))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CvError::io(path, e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_bom_and_pads_short_rows() {
        let text = "\u{feff}Year,Code,Title\n2020,ECE568\n2019,ECE353,Systems\n";
        let table = parse_csv(text, Path::new("teaching.csv")).unwrap();
        assert_eq!(table.headers, vec!["Year", "Code", "Title"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[0].get("Title"), "");
        assert!(!table.records[0].present("Title"));
        assert_eq!(table.records[1].get("Title"), "Systems");
    }

    #[test]
    fn quoted_fields_keep_commas() {
        let text = "name,Affiliation\n\"Smith, John\",\"Toronto, ON\"\n";
        let table = parse_csv(text, Path::new("people.csv")).unwrap();
        assert_eq!(table.records[0].get("name"), "Smith, John");
        assert_eq!(table.records[0].get("Affiliation"), "Toronto, ON");
    }

    #[test]
    fn writes_in_header_order() {
        let text = "conf,URL,year\nSOSP,,2021\n";
        let mut table = parse_csv(text, Path::new("tpcs.csv")).unwrap();
        table.records[0].set("URL", "none");
        let out = to_csv_string(&table, Path::new("tpcs.csv")).unwrap();
        assert_eq!(out, "conf,URL,year\nSOSP,none,2021\n");
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cases.csv");
        std::fs::write(&path, "title,year\nPatent dispute,2019\n").unwrap();
        let table = tokio_test::block_on(load_csv(&path)).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.records[0].get("year"), "2019");
    }

    #[tokio::test]
    async fn missing_file_reports_path() {
        let err = load_csv(Path::new("/nonexistent/students.csv"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("students.csv"));
    }
}
