use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{Category, Item, LifecycleState};

/// Audit-oriented rollup of a costed table: per-category state counts, the
/// conduit length balance, the cost split, data-quality counters, and the
/// grouped catalog misses. Everything here is derivable from the items; the
/// table stays the single source of truth.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub total_items: usize,
    /// category → lifecycle state → item count
    pub state_counts: BTreeMap<String, BTreeMap<String, usize>>,
    pub lengths: LengthSummary,
    pub costs: CostSummary,
    pub quality: QualitySummary,
    pub unmatched: Vec<UnmatchedCombo>,
}

/// Conduit length balance in length-units. Only Removed and Retained rows
/// exist for the initial state, so `initial = removed + retained` and
/// `final = added + retained` hold by construction.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LengthSummary {
    pub initial: f64,
    pub removed: f64,
    pub added: f64,
    pub retained: f64,
    #[serde(rename = "final")]
    pub final_length: f64,
    /// (removed + added) / (initial + added), as a percentage.
    pub intervention_pct: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CostSummary {
    pub removal: f64,
    pub new_construction: f64,
    pub total: f64,
    pub removal_pct: f64,
    pub new_pct: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct QualitySummary {
    /// Items with no catalog match (zero-cost contributors).
    pub missing_price: usize,
    /// Final-snapshot rows whose phase marker matched neither literal.
    pub unknown_phase: usize,
    /// Rows where validation overrode an implausible value.
    pub corrected: usize,
    pub missing_system_name: usize,
    pub missing_system_category: usize,
    /// Conduits with no usable positive length after validation.
    pub linear_without_length: usize,
}

/// One group of items that found no catalog price, for the audit listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmatchedCombo {
    pub category: Category,
    pub family: String,
    pub type_name: String,
    pub size: String,
    pub rows: usize,
}

pub fn compute_summary(items: &[Item]) -> Summary {
    let mut state_counts: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
    let mut lengths = LengthSummary::default();
    let mut costs = CostSummary::default();
    let mut quality = QualitySummary::default();
    let mut unmatched: BTreeMap<(Category, String, String, String), usize> = BTreeMap::new();

    for item in items {
        *state_counts
            .entry(item.category.to_string())
            .or_default()
            .entry(item.state.to_string())
            .or_insert(0) += 1;

        if item.category.is_linear() {
            let q = item.quantity.unwrap_or(0.0);
            match item.state {
                LifecycleState::Removed => lengths.removed += q,
                LifecycleState::Added => lengths.added += q,
                LifecycleState::Retained => lengths.retained += q,
                LifecycleState::Unknown => {}
            }
            if !item.quantity.is_some_and(|q| q > 0.0) {
                quality.linear_without_length += 1;
            }
        }

        costs.removal += item.removal_cost;
        costs.new_construction += item.new_cost;

        if !item.price_found {
            quality.missing_price += 1;
            *unmatched
                .entry((
                    item.category,
                    item.family.clone(),
                    item.type_name.clone(),
                    item.size.clone(),
                ))
                .or_insert(0) += 1;
        }
        if item.state == LifecycleState::Unknown {
            quality.unknown_phase += 1;
        }
        if item.corrected {
            quality.corrected += 1;
        }
        if item.system_name.is_none() {
            quality.missing_system_name += 1;
        }
        if item.system_category.is_none() {
            quality.missing_system_category += 1;
        }
    }

    lengths.initial = lengths.removed + lengths.retained;
    lengths.final_length = lengths.added + lengths.retained;
    let base = lengths.initial + lengths.added;
    if base > 0.0 {
        lengths.intervention_pct = (lengths.removed + lengths.added) / base * 100.0;
    }

    costs.total = costs.removal + costs.new_construction;
    if costs.total > 0.0 {
        costs.removal_pct = costs.removal / costs.total * 100.0;
        costs.new_pct = costs.new_construction / costs.total * 100.0;
    }

    Summary {
        total_items: items.len(),
        state_counts,
        lengths,
        costs,
        quality,
        unmatched: unmatched
            .into_iter()
            .map(|((category, family, type_name, size), rows)| UnmatchedCombo {
                category,
                family,
                type_name,
                size,
                rows,
            })
            .collect(),
    }
}
