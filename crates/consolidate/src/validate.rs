use crate::config::ValidationLimits;
use crate::model::Item;

/// What the validation pass overrode, for the audit trail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub corrected_quantities: usize,
    pub corrected_prices: usize,
}

impl ValidationReport {
    pub fn total(&self) -> usize {
        self.corrected_quantities + self.corrected_prices
    }
}

/// Neutralize implausible values before costing. Runs on every costing
/// invocation, never only at ingestion: recosting always starts from the
/// unvalidated base table. Rows are flagged, never dropped.
///
/// Rules:
/// - non-finite quantity or price becomes missing;
/// - a linear-category quantity strictly above `max_linear_quantity`
///   (default 2 000) becomes missing — a single run that long is a
///   unit-conversion error, not a pipe;
/// - any unit price strictly above `max_unit_price` (default 5e9) becomes
///   missing.
pub fn validate(items: &mut [Item], limits: &ValidationLimits) -> ValidationReport {
    let mut report = ValidationReport::default();

    for item in items {
        if let Some(q) = item.quantity {
            let implausible =
                !q.is_finite() || (item.category.is_linear() && q > limits.max_linear_quantity);
            if implausible {
                item.quantity = None;
                item.corrected = true;
                report.corrected_quantities += 1;
            }
        }

        if let Some(p) = item.unit_price {
            if !p.is_finite() || p > limits.max_unit_price {
                item.unit_price = None;
                item.corrected = true;
                report.corrected_prices += 1;
            }
        }
    }

    report
}
