//! CLI exit code registry.
//!
//! Exit codes are part of the shell contract; batch scripts that drive
//! multiple segment runs branch on them.
//!
//! | Code | Meaning                                      |
//! |------|----------------------------------------------|
//! | 0    | Success                                      |
//! | 1    | General error (unspecified)                  |
//! | 2    | Usage error (bad args)                       |
//! | 3    | Config rejected (parse or validation)        |
//! | 4    | Runtime failure (file I/O, missing column)   |
//! | 5    | Catalog conflict (same key, different price) |

use phasebill_consolidate::ConsolidateError;

/// Success.
pub const EXIT_SUCCESS: u8 = 0;

/// General error. Prefer a specific code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error: bad arguments or an out-of-range factor override.
pub const EXIT_USAGE: u8 = 2;

/// Config file failed to parse or validate.
pub const EXIT_INVALID_CONFIG: u8 = 3;

/// Input files unreadable or missing a required column.
pub const EXIT_RUNTIME: u8 = 4;

/// The rate catalog carries the same key at two different prices.
pub const EXIT_CATALOG_CONFLICT: u8 = 5;

/// Map an engine error to its exit code.
pub fn engine_exit_code(err: &ConsolidateError) -> u8 {
    match err {
        ConsolidateError::ConfigParse(_) | ConsolidateError::ConfigValidation(_) => {
            EXIT_INVALID_CONFIG
        }
        ConsolidateError::MissingColumn { .. } | ConsolidateError::Io(_) => EXIT_RUNTIME,
        ConsolidateError::CatalogConflict { .. } => EXIT_CATALOG_CONFLICT,
    }
}
