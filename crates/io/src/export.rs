//! Consolidated-table export: CSV for downstream tooling, XLSX for review.

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook};

use phasebill_consolidate::model::Item;
use phasebill_consolidate::ConsolidateError;

/// Export column order. Identity first, then state, then money.
pub const TABLE_COLUMNS: [&str; 16] = [
    "id",
    "category",
    "family",
    "type",
    "size",
    "system_name",
    "system_category",
    "state",
    "quantity",
    "unit",
    "unit_price",
    "price_found",
    "new_cost",
    "removal_cost",
    "total_cost",
    "corrected",
];

fn item_cells(item: &Item) -> [String; 16] {
    let opt_num = |v: Option<f64>| v.map(|n| n.to_string()).unwrap_or_default();
    [
        item.id.to_string(),
        item.category.to_string(),
        item.family.clone(),
        item.type_name.clone(),
        item.size.clone(),
        item.system_name.clone().unwrap_or_default(),
        item.system_category.clone().unwrap_or_default(),
        item.state.to_string(),
        opt_num(item.quantity),
        item.unit.to_string(),
        opt_num(item.unit_price),
        item.price_found.to_string(),
        item.new_cost.to_string(),
        item.removal_cost.to_string(),
        item.total_cost.to_string(),
        item.corrected.to_string(),
    ]
}

/// Dispatch on extension: `.xlsx` gets a styled workbook, everything else
/// gets CSV.
pub fn write_table(path: &Path, items: &[Item]) -> Result<(), ConsolidateError> {
    let is_xlsx = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("xlsx"));
    if is_xlsx {
        write_table_xlsx(path, items)
    } else {
        write_table_csv(path, items)
    }
}

pub fn write_table_csv(path: &Path, items: &[Item]) -> Result<(), ConsolidateError> {
    let io_err = |e: csv::Error| ConsolidateError::Io(format!("cannot write {}: {e}", path.display()));
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| ConsolidateError::Io(format!("cannot create {}: {e}", path.display())))?;
    writer.write_record(TABLE_COLUMNS).map_err(io_err)?;
    for item in items {
        writer.write_record(item_cells(item)).map_err(io_err)?;
    }
    writer
        .flush()
        .map_err(|e| ConsolidateError::Io(format!("cannot write {}: {e}", path.display())))?;
    Ok(())
}

pub fn write_table_xlsx(path: &Path, items: &[Item]) -> Result<(), ConsolidateError> {
    let io_err =
        |e: rust_xlsxwriter::XlsxError| ConsolidateError::Io(format!("cannot write {}: {e}", path.display()));

    let mut workbook = XlsxWorkbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Consolidated").map_err(io_err)?;

    let header = Format::new().set_bold();
    for (col, name) in TABLE_COLUMNS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *name, &header)
            .map_err(io_err)?;
    }

    for (index, item) in items.iter().enumerate() {
        let row = (index + 1) as u32;
        let cells = item_cells(item);
        for (col, cell) in cells.iter().enumerate() {
            let col = col as u16;
            // Numeric columns go out as numbers so Excel can sum them.
            match TABLE_COLUMNS[col as usize] {
                "id" | "quantity" | "unit_price" | "new_cost" | "removal_cost" | "total_cost" => {
                    if let Ok(n) = cell.parse::<f64>() {
                        worksheet.write_number(row, col, n).map_err(io_err)?;
                    } else if !cell.is_empty() {
                        worksheet.write_string(row, col, cell).map_err(io_err)?;
                    }
                }
                _ => {
                    if !cell.is_empty() {
                        worksheet.write_string(row, col, cell).map_err(io_err)?;
                    }
                }
            }
        }
    }

    workbook.save(path).map_err(io_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use phasebill_consolidate::model::{Category, LifecycleState, Unit};

    fn item() -> Item {
        Item {
            id: 1,
            category: Category::Conduits,
            family: "Conduit".into(),
            type_name: "EMT".into(),
            size: "3/4\"".into(),
            system_name: Some("CCTV".into()),
            system_category: None,
            state: LifecycleState::Removed,
            quantity: Some(50.0),
            unit: Unit::Meters,
            unit_price: Some(100_000.0),
            price_found: true,
            new_cost: 0.0,
            removal_cost: 1_250_000.0,
            total_cost: 1_250_000.0,
            corrected: false,
        }
    }

    #[test]
    fn csv_roundtrip_through_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_table_csv(&path, &[item()]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next().unwrap(), TABLE_COLUMNS.join(","));
        let row = lines.next().unwrap();
        assert!(row.starts_with("1,conduits,Conduit,EMT"));
        assert!(row.contains("removed"));
        assert!(row.contains("1250000"));
    }

    #[test]
    fn missing_optionals_export_as_empty_cells() {
        let mut it = item();
        it.quantity = None;
        it.unit_price = None;
        it.system_name = None;
        let cells = item_cells(&it);
        assert_eq!(cells[5], "");
        assert_eq!(cells[8], "");
        assert_eq!(cells[10], "");
    }

    #[test]
    fn xlsx_file_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        write_table_xlsx(&path, &[item()]).unwrap();
        assert!(path.metadata().unwrap().len() > 0);
    }

    #[test]
    fn dispatch_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("t.csv");
        let xlsx_path = dir.path().join("t.xlsx");
        write_table(&csv_path, &[item()]).unwrap();
        write_table(&xlsx_path, &[item()]).unwrap();
        assert!(std::fs::read_to_string(&csv_path).unwrap().starts_with("id,"));
        // XLSX is a zip container; first bytes are "PK".
        assert_eq!(&std::fs::read(&xlsx_path).unwrap()[..2], b"PK");
    }
}
