//! Delimited-text dataset loader.
//!
//! The first line is the header. Fields are comma separated; a field may be
//! wrapped in double quotes, with `""` standing for a literal quote. Column
//! types are inferred from the non-missing cells: Int if every cell parses as
//! `i64`, else Float, else ISO date, else String.

use crate::{AttrDef, AttrType, Dataset, DatasetError, DatasetResult, Schema, Value};
use chrono::NaiveDate;

/// Literal tokens recognized as missing values.
pub const MISSING_TOKENS: &[&str] = &[
    "", "-1.#IND", "1.#QNAN", "1.#IND", "-1.#QNAN", "#N/A N/A", "#N/A", "N/A", "n/a", "#NA",
    "NULL", "null", "NaN", "-NaN", "nan", "-nan",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Returns true if a raw field denotes a missing value.
pub fn is_missing(field: &str) -> bool {
    MISSING_TOKENS.contains(&field.trim())
}

/// Parse a dataset from comma-separated text.
pub fn parse_dataset(source: &str) -> DatasetResult<Dataset> {
    let mut lines = source
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let (header_line, header) = lines
        .next()
        .ok_or_else(|| DatasetError::load(1, "missing header row"))?;
    let names = split_fields(header).map_err(|m| DatasetError::load(header_line + 1, m))?;

    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for (line_no, line) in lines {
        let fields = split_fields(line).map_err(|m| DatasetError::load(line_no + 1, m))?;
        if fields.len() != names.len() {
            return Err(DatasetError::load(
                line_no + 1,
                format!("expected {} fields, found {}", names.len(), fields.len()),
            ));
        }
        raw_rows.push(fields);
    }

    let types: Vec<AttrType> = (0..names.len())
        .map(|col| infer_type(raw_rows.iter().map(|row| row[col].as_str())))
        .collect();

    let attrs = names
        .iter()
        .zip(&types)
        .map(|(name, ty)| AttrDef::new(name, *ty))
        .collect();
    let schema = Schema::new(attrs)?;

    let mut dataset = Dataset::new(schema);
    for row in raw_rows {
        let values = row
            .iter()
            .zip(&types)
            .map(|(field, ty)| parse_typed(field, *ty))
            .collect();
        dataset.push(values)?;
    }
    Ok(dataset)
}

/// Parse one field as the given type. Missing tokens and fields that do not
/// parse become Null.
pub fn parse_typed(field: &str, ty: AttrType) -> Value {
    if is_missing(field) {
        return Value::Null;
    }
    let field = field.trim();
    match ty {
        AttrType::Int => field.parse().map(Value::Int).unwrap_or(Value::Null),
        AttrType::Float => field.parse().map(Value::Float).unwrap_or(Value::Null),
        AttrType::Date => NaiveDate::parse_from_str(field, DATE_FORMAT)
            .map(Value::Date)
            .unwrap_or(Value::Null),
        AttrType::String => Value::String(field.to_string()),
    }
}

fn infer_type<'a>(fields: impl Iterator<Item = &'a str> + Clone) -> AttrType {
    let present = fields.filter(|f| !is_missing(f)).map(str::trim);
    if present.clone().all(|f| f.parse::<i64>().is_ok()) {
        AttrType::Int
    } else if present.clone().all(|f| f.parse::<f64>().is_ok()) {
        AttrType::Float
    } else if present
        .clone()
        .all(|f| NaiveDate::parse_from_str(f, DATE_FORMAT).is_ok())
    {
        AttrType::Date
    } else {
        AttrType::String
    }
}

fn split_fields(line: &str) -> Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.trim_end_matches('\r').chars().peekable();
    let mut quoted = false;

    while let Some(c) = chars.next() {
        match c {
            '"' if quoted => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    quoted = false;
                }
            }
            '"' if current.trim().is_empty() => {
                current.clear();
                quoted = true;
            }
            ',' if !quoted => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    if quoted {
        return Err("unterminated quoted field".to_string());
    }
    fields.push(current);
    Ok(fields)
}
