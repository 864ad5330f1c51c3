//! `phasebill-io` — snapshot and catalog ingestion (CSV, Excel) plus
//! consolidated-table export (CSV, XLSX).

pub mod csv;
pub mod export;
pub mod table;
pub mod xlsx;

pub use export::{write_table, write_table_csv, write_table_xlsx, TABLE_COLUMNS};
pub use table::{catalog_entries, load_table, mean_quantity, snapshot_rows, Table};
