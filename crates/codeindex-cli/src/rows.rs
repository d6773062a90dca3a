//! Rows emitter: flatten `symbols[].occurrences[]` into ingestion-friendly
//! CSV or JSONL rows with a stable column order.

use serde::Serialize;
use std::io::Write;

use codeindex_core::{CodeIndexError, SymbolIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowsFormat {
    Csv,
    Jsonl,
}

impl RowsFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Jsonl => "jsonl",
        }
    }
}

impl std::str::FromStr for RowsFormat {
    type Err = CodeIndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(Self::Csv),
            "jsonl" => Ok(Self::Jsonl),
            _ => Err(CodeIndexError::Config(format!(
                "unknown rows format: {s} (expected csv or jsonl)"
            ))),
        }
    }
}

/// One flattened occurrence. Field order is the row schema.
#[derive(Serialize)]
struct Row<'a> {
    identifier: &'a str,
    file_id: &'a str,
    line: u32,
    col_start: u32,
    col_end: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    byte_start: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    byte_end: Option<usize>,
}

fn rows_of(index: &SymbolIndex) -> Vec<Row<'_>> {
    index
        .symbols
        .iter()
        .flat_map(|sym| {
            sym.occurrences.iter().map(move |occ| Row {
                identifier: &sym.identifier,
                file_id: &occ.file_id,
                line: occ.line,
                col_start: occ.col_start,
                col_end: occ.col_end,
                byte_start: occ.byte_start,
                byte_end: occ.byte_end,
            })
        })
        .collect()
}

/// Write every occurrence of `index` as rows in the requested format.
pub fn write_rows(
    index: &SymbolIndex,
    format: RowsFormat,
    out: &mut dyn Write,
) -> Result<(), CodeIndexError> {
    let rows = rows_of(index);
    match format {
        RowsFormat::Jsonl => {
            for row in &rows {
                serde_json::to_writer(&mut *out, row)?;
                out.write_all(b"\n")?;
            }
        }
        RowsFormat::Csv => {
            let has_bytes = rows
                .iter()
                .any(|r| r.byte_start.is_some() || r.byte_end.is_some());
            let mut header = vec!["identifier", "file_id", "line", "col_start", "col_end"];
            if has_bytes {
                header.extend(["byte_start", "byte_end"]);
            }
            writeln!(out, "{}", header.join(","))?;
            for row in &rows {
                let mut fields = vec![
                    csv_escape(row.identifier),
                    csv_escape(row.file_id),
                    row.line.to_string(),
                    row.col_start.to_string(),
                    row.col_end.to_string(),
                ];
                if has_bytes {
                    fields.push(row.byte_start.map(|v| v.to_string()).unwrap_or_default());
                    fields.push(row.byte_end.map(|v| v.to_string()).unwrap_or_default());
                }
                writeln!(out, "{}", fields.join(","))?;
            }
        }
    }
    Ok(())
}

fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codeindex_core::{Occurrence, SymbolEntry, SymbolStats};

    fn sample_index(with_bytes: bool) -> SymbolIndex {
        let occ = |file_id: &str, line: u32| Occurrence {
            file_id: file_id.into(),
            line,
            col_start: 1,
            col_end: 4,
            byte_start: with_bytes.then_some(0),
            byte_end: with_bytes.then_some(3),
        };
        SymbolIndex {
            schema_version: "2.1".into(),
            profile_id: "java".into(),
            ordering: "lex".into(),
            generated_at: "2024-06-01T00:00:00Z".into(),
            files: vec![],
            symbols: vec![SymbolEntry {
                identifier: "foo".into(),
                occurrences: vec![occ("A.java", 1), occ("B.java", 3)],
                stats: SymbolStats {
                    occurrence_count: 2,
                    unique_line_count: 2,
                },
            }],
            diagnostics: vec![],
        }
    }

    fn render(index: &SymbolIndex, format: RowsFormat) -> String {
        let mut buf = Vec::new();
        write_rows(index, format, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn csv_header_is_stable() {
        let text = render(&sample_index(false), RowsFormat::Csv);
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("identifier,file_id,line,col_start,col_end")
        );
        assert_eq!(lines.next(), Some("foo,A.java,1,1,4"));
        assert_eq!(lines.next(), Some("foo,B.java,3,1,4"));
    }

    #[test]
    fn csv_grows_byte_columns_when_present() {
        let text = render(&sample_index(true), RowsFormat::Csv);
        assert!(text.starts_with(
            "identifier,file_id,line,col_start,col_end,byte_start,byte_end\n"
        ));
        assert!(text.contains("foo,A.java,1,1,4,0,3"));
    }

    #[test]
    fn jsonl_preserves_field_order_and_omits_absent_bytes() {
        let text = render(&sample_index(false), RowsFormat::Jsonl);
        let first = text.lines().next().unwrap();
        assert_eq!(
            first,
            r#"{"identifier":"foo","file_id":"A.java","line":1,"col_start":1,"col_end":4}"#
        );
    }

    #[test]
    fn jsonl_includes_bytes_when_present() {
        let text = render(&sample_index(true), RowsFormat::Jsonl);
        assert!(text.lines().next().unwrap().ends_with("\"byte_start\":0,\"byte_end\":3}"));
    }

    #[test]
    fn csv_fields_are_quoted_when_needed() {
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn format_parses_and_rejects() {
        assert_eq!("csv".parse::<RowsFormat>().unwrap(), RowsFormat::Csv);
        assert_eq!("jsonl".parse::<RowsFormat>().unwrap(), RowsFormat::Jsonl);
        assert!("yaml".parse::<RowsFormat>().is_err());
    }
}
