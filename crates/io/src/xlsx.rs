//! Excel snapshot ingestion (xlsx, xls, xlsb, ods) via calamine.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};

use phasebill_consolidate::normalize::normalize_number;
use phasebill_consolidate::ConsolidateError;

/// Read one worksheet into a [`Table`](crate::table::Table). With `sheet`
/// unset, the first worksheet is used; schedule exports carry one sheet.
pub fn read_workbook(
    path: &Path,
    sheet: Option<&str>,
) -> Result<crate::table::Table, ConsolidateError> {
    let source = path.display().to_string();
    let mut workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| ConsolidateError::Io(format!("cannot open {source}: {e}")))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let name = match sheet {
        Some(name) => {
            if !sheet_names.iter().any(|s| s == name) {
                return Err(ConsolidateError::Io(format!(
                    "{source}: no sheet named '{name}' (has: {})",
                    sheet_names.join(", ")
                )));
            }
            name.to_string()
        }
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ConsolidateError::Io(format!("{source}: workbook has no sheets")))?,
    };

    let range = workbook
        .worksheet_range(&name)
        .map_err(|e| ConsolidateError::Io(format!("{source}: cannot read sheet '{name}': {e}")))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| ConsolidateError::Io(format!("{source}: sheet '{name}' is empty")))?
        .iter()
        .map(|cell| cell_to_string(cell).trim().to_string())
        .collect();

    let rows: Vec<Vec<String>> = rows
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();

    Ok(crate::table::Table {
        source,
        headers,
        rows,
    })
}

/// Flatten a typed cell to the string form the column mappers expect.
/// Integral floats drop the trailing ".0" so a count cell reads "3", not
/// "3.0"; date cells keep their Excel serial, which the numeric parser
/// accepts and the identity columns never contain.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => normalize_number(*n),
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Data::Error(e) => format!("#{e:?}"),
        Data::DateTime(dt) => normalize_number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floats_flattened_without_trailing_zero() {
        assert_eq!(cell_to_string(&Data::Float(3.0)), "3");
        assert_eq!(cell_to_string(&Data::Float(12.5)), "12.5");
    }

    #[test]
    fn empty_and_text_cells() {
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(cell_to_string(&Data::String("EMT".into())), "EMT");
        assert_eq!(cell_to_string(&Data::Int(7)), "7");
        assert_eq!(cell_to_string(&Data::Bool(true)), "TRUE");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_workbook(Path::new("/nonexistent/snap.xlsx"), None).unwrap_err();
        assert!(matches!(err, ConsolidateError::Io(_)));
    }
}
