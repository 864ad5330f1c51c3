//! Field normalization applied to every identifying field, on both the
//! snapshot side and the catalog side, so equality joins are not defeated by
//! incidental whitespace or numeric/string type mismatches in the exports.

/// Strip surrounding whitespace. Idempotent.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_string()
}

/// Render a numeric cell the way the exports render hand-typed text.
/// Excel exports size codes like `25` as floats; `25.0` would never join
/// against a catalog keyed on `"25"`.
pub fn normalize_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_whitespace() {
        assert_eq!(normalize("  EMT 3/4\"  "), "EMT 3/4\"");
        assert_eq!(normalize("\tConduit \n"), "Conduit");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn idempotent() {
        for raw in ["  x ", "x", " 25.4 ", "", "  "] {
            assert_eq!(normalize(&normalize(raw)), normalize(raw));
        }
    }

    #[test]
    fn integral_floats_lose_the_point() {
        assert_eq!(normalize_number(25.0), "25");
        assert_eq!(normalize_number(-3.0), "-3");
        assert_eq!(normalize_number(0.0), "0");
    }

    #[test]
    fn fractional_floats_keep_digits() {
        assert_eq!(normalize_number(25.4), "25.4");
        assert_eq!(normalize_number(0.75), "0.75");
    }
}
