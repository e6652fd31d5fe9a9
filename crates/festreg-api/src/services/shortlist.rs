// Shortlist spreadsheet parsing
//
// Uploads are delimited text with a header row. Each data row becomes a
// column-name → value object, stored verbatim as the batch's entries.

use festreg_core::{FestError, Result};

pub fn parse_spreadsheet(bytes: &[u8]) -> Result<Vec<serde_json::Value>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        // Tolerate ragged rows; missing cells just drop out of the map.
        .flexible(true)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|err| FestError::validation(format!("could not read header row: {err}")))?
        .clone();

    if headers.is_empty() || headers.iter().all(|column| column.is_empty()) {
        return Err(FestError::validation("spreadsheet has no header row"));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|err| FestError::validation(format!("malformed row: {err}")))?;

        let mut object = serde_json::Map::new();
        for (column, value) in headers.iter().zip(record.iter()) {
            if column.is_empty() {
                continue;
            }
            object.insert(
                column.to_string(),
                serde_json::Value::String(value.to_string()),
            );
        }
        rows.push(serde_json::Value::Object(object));
    }

    if rows.is_empty() {
        return Err(FestError::validation("spreadsheet contained no rows"));
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_map_columns_to_values() {
        let sheet = b"name,roll_number,status\nAsha Verma,CSE-21-042,selected\nBela Rao,CSE-21-043,waitlisted\n";
        let rows = parse_spreadsheet(sheet).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["name"], "Asha Verma");
        assert_eq!(rows[0]["roll_number"], "CSE-21-042");
        assert_eq!(rows[1]["status"], "waitlisted");
    }

    #[test]
    fn test_values_are_trimmed() {
        let sheet = b"name,status\n  Asha Verma , selected \n";
        let rows = parse_spreadsheet(sheet).unwrap();
        assert_eq!(rows[0]["name"], "Asha Verma");
        assert_eq!(rows[0]["status"], "selected");
    }

    #[test]
    fn test_short_rows_keep_present_columns() {
        let sheet = b"name,roll_number,status\nAsha Verma,CSE-21-042\n";
        let rows = parse_spreadsheet(sheet).unwrap();
        assert_eq!(rows[0]["name"], "Asha Verma");
        assert!(rows[0].get("status").is_none());
    }

    #[test]
    fn test_empty_sheet_rejected() {
        assert!(matches!(
            parse_spreadsheet(b""),
            Err(FestError::Validation(_))
        ));
        assert!(matches!(
            parse_spreadsheet(b"name,status\n"),
            Err(FestError::Validation(_))
        ));
    }
}
