use std::path::Path;

use crate::error::{TableError, TableResult};

/// Raw rows of cells, exactly as they appear in the resource.
pub type Rows = Vec<Vec<String>>;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read a comma-separated resource fully into memory.
///
/// Header rows are returned like any other row; cells are not trimmed and
/// rows may differ in length. A blank line is an empty row, so row positions
/// always match line positions outside quoted fields.
pub fn read_rows(path: &Path) -> TableResult<Rows> {
    let bytes = std::fs::read(path).map_err(|source| TableError::ResourceNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|e| {
        TableError::malformed(0, format!("{} is not valid UTF-8: {e}", path.display()))
    })?;

    let rows = parse_rows(&text)?;
    log::debug!("read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Parse already-loaded comma-separated text into rows of cells.
pub fn parse_rows(text: &str) -> TableResult<Rows> {
    split_records(text)?
        .into_iter()
        .enumerate()
        .map(|(row_no, raw)| parse_record(row_no, raw))
        .collect()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Cells of a single record; a blank record has none.
fn parse_record(row_no: usize, raw: &str) -> TableResult<Vec<String>> {
    let raw = raw.strip_suffix('\r').unwrap_or(raw);
    if raw.is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(raw.as_bytes());

    match reader.records().next() {
        Some(result) => {
            let record = result.map_err(|e| TableError::malformed(row_no, e.to_string()))?;
            Ok(record.iter().map(str::to_string).collect())
        }
        None => Ok(Vec::new()),
    }
}

/// Split text into raw records at line breaks outside quoted fields.
///
/// The csv parser skips blank lines and accepts an unterminated quote by
/// reading to end of input, so records are delimited here instead.
fn split_records(text: &str) -> TableResult<Vec<&str>> {
    let mut records = Vec::new();
    let mut chars = text.char_indices().peekable();
    let mut start = 0;
    let mut in_quotes = false;
    let mut at_field_start = true;

    while let Some((i, c)) = chars.next() {
        if in_quotes {
            if c == '"' {
                if matches!(chars.peek(), Some((_, '"'))) {
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            continue;
        }

        match c {
            '"' if at_field_start => {
                in_quotes = true;
                at_field_start = false;
            }
            ',' | '\r' => at_field_start = true,
            '\n' => {
                records.push(&text[start..i]);
                start = i + 1;
                at_field_start = true;
            }
            _ => at_field_start = false,
        }
    }

    if in_quotes {
        return Err(TableError::malformed(
            records.len(),
            "unterminated quoted field",
        ));
    }
    // a final line break ends the last record rather than opening a new one
    if start < text.len() {
        records.push(&text[start..]);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_rows_keep_order_and_headers() {
        let rows = parse_rows("r (cm),g(r)\n0.5,1.0\n1.0,0.99\n").unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec!["r (cm)", "g(r)"]);
        assert_eq!(rows[2], vec!["1.0", "0.99"]);
    }

    #[test]
    fn test_ragged_rows_are_accepted() {
        let rows = parse_rows("title\n,0.25,0.5,1\n0,0.7\n").unwrap();
        assert_eq!(rows[0].len(), 1);
        assert_eq!(rows[1].len(), 4);
        assert_eq!(rows[2].len(), 2);
    }

    #[test]
    fn test_quoted_fields() {
        let rows = parse_rows("\"a, b\",\"say \"\"hi\"\"\"\n").unwrap();
        assert_eq!(rows[0], vec!["a, b", "say \"hi\""]);
    }

    #[test]
    fn test_cells_are_not_trimmed() {
        let rows = parse_rows(" 0.5 ,1.0\n").unwrap();
        assert_eq!(rows[0][0], " 0.5 ");
    }

    #[test]
    fn test_unterminated_quote_is_malformed() {
        let err = parse_rows("r,g\n0.5,\"1.0\n1.0,0.9\n").unwrap_err();
        assert!(matches!(err, TableError::MalformedInput { row: 1, .. }));
    }

    #[test]
    fn test_blank_lines_are_empty_rows() {
        let rows = parse_rows("title\n\nr,g\n").unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows[1].is_empty());
        assert_eq!(rows[2], vec!["r", "g"]);

        let rows = parse_rows("\n,0.25\r\n\r\n0,0.7\n\n").unwrap();
        assert_eq!(rows.len(), 5);
        assert!(rows[0].is_empty());
        assert_eq!(rows[1], vec!["", "0.25"]);
        assert!(rows[2].is_empty());
        assert!(rows[4].is_empty());
    }

    #[test]
    fn test_quoted_line_break_stays_in_one_row() {
        let rows = parse_rows("a,\"two\nlines\"\nb\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["a", "two\nlines"]);
        assert_eq!(rows[1], vec!["b"]);
    }

    #[test]
    fn test_empty_text_has_no_rows() {
        assert!(parse_rows("").unwrap().is_empty());
    }

    #[test]
    fn test_missing_file_is_resource_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_rows(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, TableError::ResourceNotFound { .. }));
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0x30, 0x2c, 0xff, 0xfe, 0x0a]).unwrap();
        let err = read_rows(file.path()).unwrap_err();
        assert!(matches!(err, TableError::MalformedInput { .. }));
    }

    #[test]
    fn test_read_rows_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "a,b\n1,2\n").unwrap();
        let rows = read_rows(file.path()).unwrap();
        assert_eq!(rows, vec![vec!["a", "b"], vec!["1", "2"]]);
    }
}
