//! Tabular input parsers
//!
//! Two schemas share the same machinery: the comma-delimited 14-column full
//! product schema and the tab-delimited 4-column pasted stock schema. Columns
//! are bound by header name (case- and whitespace-insensitive), so column
//! order in the file is irrelevant. Each emitted row carries its 1-based data
//! line number (header excluded) and the number of fields actually found on
//! the line; a wrong column count is not filtered here but reported by the
//! validator so the user still sees the row number.

use csv::ReaderBuilder;

use crate::error::{AppError, AppResult};
use crate::models::import::{FullRow, ParsedRow, StockRow};

/// Expected field count of the full product schema
pub const FULL_COLUMN_COUNT: usize = 14;
/// Expected field count of the pasted stock schema
pub const STOCK_COLUMN_COUNT: usize = 4;

/// Normalized header names of the full schema, in canonical order
const FULL_HEADERS: [&str; FULL_COLUMN_COUNT] = [
    "name",
    "reference",
    "description",
    "price",
    "brand",
    "category",
    "collection",
    "color",
    "size",
    "stock",
    "sku",
    "materials",
    "careinstructions",
    "madein",
];

/// Normalized header names of the stock schema (Marque/Genre/Reference/Stock)
const STOCK_HEADERS: [&str; STOCK_COLUMN_COUNT] = ["marque", "genre", "reference", "stock"];

fn normalize_header(h: &str) -> String {
    h.trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '\t' | '_' | '-'))
        .collect::<String>()
        .to_lowercase()
}

/// Resolve the position of each expected column in the header row.
fn header_indices(headers: &csv::StringRecord, expected: &[&str]) -> AppResult<Vec<usize>> {
    let normalized: Vec<String> = headers.iter().map(normalize_header).collect();
    let mut indices = Vec::with_capacity(expected.len());
    let mut missing = Vec::new();
    for name in expected {
        match normalized.iter().position(|h| h == name) {
            Some(i) => indices.push(i),
            None => missing.push(*name),
        }
    }
    if !missing.is_empty() {
        return Err(AppError::BadRequest(format!(
            "missing column(s) in header: {}",
            missing.join(", ")
        )));
    }
    Ok(indices)
}

/// Trimmed field value at the expected column `slot`, empty if absent.
fn req(record: &csv::StringRecord, indices: &[usize], slot: usize) -> String {
    record
        .get(indices[slot])
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

/// Like [`req`] but empty values become `None`.
fn opt(record: &csv::StringRecord, indices: &[usize], slot: usize) -> Option<String> {
    Some(req(record, indices, slot)).filter(|v| !v.is_empty())
}

/// 1-based data line number for a record, header excluded.
fn data_line(position: Option<&csv::Position>, fallback_index: usize) -> usize {
    position
        .map(|p| (p.line() as usize).saturating_sub(1))
        .unwrap_or(fallback_index + 1)
}

/// Parser for the comma-delimited 14-column full product schema
pub struct FullRowParser;

impl FullRowParser {
    pub fn parse(input: &str) -> AppResult<Vec<ParsedRow>> {
        // Completely empty input means zero rows, not a missing header.
        if input.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(input.as_bytes());

        let indices = header_indices(reader.headers()?, &FULL_HEADERS)?;

        let mut rows = Vec::new();
        for (i, result) in reader.records().enumerate() {
            match result {
                Ok(record) => {
                    if record.iter().all(|f| f.trim().is_empty()) {
                        continue;
                    }
                    let line = data_line(record.position(), i);
                    rows.push(ParsedRow::Full(FullRow {
                        line,
                        column_count: record.len(),
                        name: req(&record, &indices, 0),
                        reference: opt(&record, &indices, 1),
                        description: opt(&record, &indices, 2),
                        price: req(&record, &indices, 3),
                        brand: opt(&record, &indices, 4),
                        category: req(&record, &indices, 5),
                        collection: opt(&record, &indices, 6),
                        color: req(&record, &indices, 7),
                        size: req(&record, &indices, 8),
                        stock: req(&record, &indices, 9),
                        sku: req(&record, &indices, 10),
                        materials: opt(&record, &indices, 11),
                        care_instructions: opt(&record, &indices, 12),
                        made_in: opt(&record, &indices, 13),
                    }));
                }
                Err(e) => {
                    // Unreadable line: emit an empty row so the validator can
                    // report it against the right row number.
                    let line = data_line(e.position(), i);
                    rows.push(ParsedRow::Full(FullRow {
                        line,
                        column_count: 0,
                        ..Default::default()
                    }));
                }
            }
        }
        Ok(rows)
    }
}

/// Parser for the tab-delimited pasted stock schema
pub struct StockRowParser;

impl StockRowParser {
    pub fn parse(input: &str) -> AppResult<Vec<ParsedRow>> {
        if input.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(b'\t')
            .from_reader(input.as_bytes());

        let indices = header_indices(reader.headers()?, &STOCK_HEADERS)?;

        let mut rows = Vec::new();
        for (i, result) in reader.records().enumerate() {
            match result {
                Ok(record) => {
                    if record.iter().all(|f| f.trim().is_empty()) {
                        continue;
                    }
                    let line = data_line(record.position(), i);
                    rows.push(ParsedRow::Stock(StockRow {
                        line,
                        column_count: record.len(),
                        brand: req(&record, &indices, 0),
                        category: req(&record, &indices, 1),
                        reference: req(&record, &indices, 2),
                        stock: req(&record, &indices, 3),
                    }));
                }
                Err(e) => {
                    let line = data_line(e.position(), i);
                    rows.push(ParsedRow::Stock(StockRow {
                        line,
                        column_count: 0,
                        ..Default::default()
                    }));
                }
            }
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_HEADER: &str =
        "name,reference,description,price,brand,category,collection,color,size,stock,sku,materials,careInstructions,madeIn";

    #[test]
    fn test_empty_input_is_zero_rows() {
        assert!(FullRowParser::parse("").unwrap().is_empty());
        assert!(FullRowParser::parse("  \n\n").unwrap().is_empty());
        assert!(StockRowParser::parse("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_full_rows() {
        let input = format!(
            "{}\nTee,T1,Basic tee,29.90,Acme,tops,Summer,Black,M,5,T1-BLK-M,cotton,wash cold,Portugal\n",
            FULL_HEADER
        );
        let rows = FullRowParser::parse(&input).unwrap();
        assert_eq!(rows.len(), 1);
        match &rows[0] {
            ParsedRow::Full(r) => {
                assert_eq!(r.line, 1);
                assert_eq!(r.column_count, 14);
                assert_eq!(r.name, "Tee");
                assert_eq!(r.reference.as_deref(), Some("T1"));
                assert_eq!(r.price, "29.90");
                assert_eq!(r.sku, "T1-BLK-M");
                assert_eq!(r.made_in.as_deref(), Some("Portugal"));
            }
            other => panic!("expected full row, got {:?}", other),
        }
    }

    #[test]
    fn test_header_binding_ignores_case_and_order() {
        let input = "SKU, Name , price,category,color,size,stock,reference,description,brand,collection,materials,Care_Instructions,Made In\n\
                     T1-BLK-M,Tee,29.90,tops,Black,M,5,T1,,,,,,\n";
        let rows = FullRowParser::parse(input).unwrap();
        match &rows[0] {
            ParsedRow::Full(r) => {
                assert_eq!(r.name, "Tee");
                assert_eq!(r.sku, "T1-BLK-M");
                assert_eq!(r.category, "tops");
            }
            other => panic!("expected full row, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_header_column_is_rejected() {
        let input = "name,reference,price\nTee,T1,29.90\n";
        assert!(FullRowParser::parse(input).is_err());
    }

    #[test]
    fn test_wrong_column_count_passes_through() {
        let input = format!("{}\nTee,T1,only-three\n", FULL_HEADER);
        let rows = FullRowParser::parse(&input).unwrap();
        assert_eq!(rows.len(), 1);
        match &rows[0] {
            ParsedRow::Full(r) => {
                assert_eq!(r.line, 1);
                assert_eq!(r.column_count, 3);
            }
            other => panic!("expected full row, got {:?}", other),
        }
    }

    #[test]
    fn test_trailing_blank_lines_are_skipped() {
        let input = format!(
            "{}\nTee,T1,,29.90,,tops,,Black,M,5,T1-BLK-M,,,\n\n,,,,,,,,,,,,,\n\n",
            FULL_HEADER
        );
        let rows = FullRowParser::parse(&input).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_row_numbers_survive_skipped_lines() {
        let input = format!(
            "{}\nTee,T1,,29.90,,tops,,Black,M,5,T1-BLK-M,,,\n,,,,,,,,,,,,,\nTee,T1,,29.90,,tops,,Black,L,3,T1-BLK-L,,,\n",
            FULL_HEADER
        );
        let rows = FullRowParser::parse(&input).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line(), 1);
        assert_eq!(rows[1].line(), 3);
    }

    #[test]
    fn test_parse_stock_rows() {
        let input = "Marque\tGenre\tReference\tStock\nNike\tChaussures\tNIKE-AIR-42\t5\n";
        let rows = StockRowParser::parse(input).unwrap();
        assert_eq!(rows.len(), 1);
        match &rows[0] {
            ParsedRow::Stock(r) => {
                assert_eq!(r.line, 1);
                assert_eq!(r.brand, "Nike");
                assert_eq!(r.category, "Chaussures");
                assert_eq!(r.reference, "NIKE-AIR-42");
                assert_eq!(r.stock, "5");
            }
            other => panic!("expected stock row, got {:?}", other),
        }
    }
}
