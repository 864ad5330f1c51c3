use std::path::Path;

use phasebill_consolidate::config::{CatalogColumns, SnapshotColumns};
use phasebill_consolidate::model::{CatalogEntry, Category, SnapshotRow};
use phasebill_consolidate::normalize::normalize;
use phasebill_consolidate::ConsolidateError;

/// A loaded flat table: one header row plus string cells. CSV and Excel
/// sources both reduce to this before column mapping, so the mapping logic
/// is format-agnostic.
#[derive(Debug, Clone)]
pub struct Table {
    /// Label used in error messages (file name or caller-supplied tag).
    pub source: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Index of a required column. Headers are compared after trimming.
    pub fn column(&self, name: &str) -> Result<usize, ConsolidateError> {
        self.headers
            .iter()
            .position(|h| h == name.trim())
            .ok_or_else(|| ConsolidateError::MissingColumn {
                source: self.source.clone(),
                column: name.to_string(),
            })
    }

    /// Index of a column that may legitimately be absent from the extract
    /// (system metadata). `None` config or `None` header both yield `None`.
    fn optional_column(&self, name: Option<&String>) -> Option<usize> {
        name.and_then(|n| self.headers.iter().position(|h| h == n.trim()))
    }

    fn cell<'a>(&self, row: &'a [String], index: usize) -> &'a str {
        row.get(index).map(String::as_str).unwrap_or("")
    }
}

/// Load a table from disk, dispatching on extension: `.csv` through the CSV
/// reader, anything else through calamine (xlsx, xls, xlsb, ods).
pub fn load_table(path: &Path) -> Result<Table, ConsolidateError> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    if is_csv {
        let bytes = std::fs::read(path)
            .map_err(|e| ConsolidateError::Io(format!("cannot read {}: {e}", path.display())))?;
        let data = crate::csv::decode_bytes(bytes);
        crate::csv::read_csv(&path.display().to_string(), &data)
    } else {
        crate::xlsx::read_workbook(path, None)
    }
}

/// Parse a numeric cell. Empty or unparsable cells become `None` — a
/// missing value for the validator, never an ingestion error.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}

/// Map a snapshot table to raw rows using the configured column names.
///
/// Identifying columns and phase markers are required (a missing one aborts
/// the run — a partial base table would corrupt every aggregate). A missing
/// quantity column on a discrete category means one unit per row.
pub fn snapshot_rows(
    table: &Table,
    columns: &SnapshotColumns,
    category: Category,
) -> Result<Vec<SnapshotRow>, ConsolidateError> {
    let family = table.column(&columns.family)?;
    let type_name = table.column(&columns.type_name)?;
    let phase_created = table.column(&columns.phase_created)?;
    let phase_demolished = table.column(&columns.phase_demolished)?;

    let size = match (&columns.size, category.has_size()) {
        (Some(name), true) => Some(table.column(name)?),
        _ => None,
    };
    let quantity = match &columns.quantity {
        Some(name) => Some(table.column(name)?),
        None => None,
    };
    let system_name = table.optional_column(columns.system_name.as_ref());
    let system_category = table.optional_column(columns.system_category.as_ref());

    let non_empty = |raw: &str| {
        let value = raw.trim();
        (!value.is_empty()).then(|| value.to_string())
    };

    let mut rows = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        rows.push(SnapshotRow {
            family: table.cell(row, family).to_string(),
            type_name: table.cell(row, type_name).to_string(),
            size: size.map(|i| table.cell(row, i).to_string()),
            quantity: match quantity {
                Some(i) => parse_number(table.cell(row, i)),
                // Discrete categories: one unit per row.
                None => Some(1.0),
            },
            phase_created: non_empty(table.cell(row, phase_created)),
            phase_demolished: non_empty(table.cell(row, phase_demolished)),
            system_name: system_name.and_then(|i| non_empty(table.cell(row, i))),
            system_category: system_category.and_then(|i| non_empty(table.cell(row, i))),
        });
    }

    Ok(rows)
}

/// Map the rate-catalog table to entries. All six columns are required.
pub fn catalog_entries(
    table: &Table,
    columns: &CatalogColumns,
) -> Result<Vec<CatalogEntry>, ConsolidateError> {
    let category = table.column(&columns.category)?;
    let family = table.column(&columns.family)?;
    let type_name = table.column(&columns.type_name)?;
    let size = table.column(&columns.size)?;
    let unit = table.column(&columns.unit)?;
    let unit_price = table.column(&columns.unit_price)?;

    Ok(table
        .rows
        .iter()
        .map(|row| CatalogEntry {
            category: normalize(table.cell(row, category)),
            family: table.cell(row, family).to_string(),
            type_name: table.cell(row, type_name).to_string(),
            size: table.cell(row, size).to_string(),
            unit: normalize(table.cell(row, unit)),
            unit_price: parse_number(table.cell(row, unit_price)),
        })
        .collect())
}

/// Mean of the parsed quantities, for the length-unit sanity probe.
pub fn mean_quantity(rows: &[SnapshotRow]) -> Option<f64> {
    let values: Vec<f64> = rows.iter().filter_map(|r| r.quantity).collect();
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
