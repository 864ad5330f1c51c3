use crate::catalog::{assign_prices, CatalogIndex};
use crate::config::{validate_factor, ConsolidationConfig, ValidationLimits};
use crate::cost::apply_costs;
use crate::error::ConsolidateError;
use crate::model::{
    BaseTable, Category, ConsolidationInput, ConsolidationMeta, ConsolidationResult, Item,
};
use crate::reconcile::reconcile;
use crate::summary::compute_summary;
use crate::validate::validate;

/// Reconcile every category, merge in fixed order, assign sequential ids,
/// and resolve catalog prices. The returned table is the immutable base for
/// any number of costing passes.
pub fn build_base(
    config: &ConsolidationConfig,
    input: &ConsolidationInput,
) -> Result<BaseTable, ConsolidateError> {
    let mut items: Vec<Item> = Vec::new();
    for category in Category::ALL {
        let pair = input.pair(category);
        items.extend(reconcile(
            category,
            &pair.initial,
            &pair.final_rows,
            &config.phases,
        ));
    }

    // Ids only exist on the merged table: 1-based, in concatenation order.
    for (index, item) in items.iter_mut().enumerate() {
        item.id = index as u64 + 1;
    }

    let (catalog_index, catalog_stats) = CatalogIndex::build(&input.catalog)?;
    assign_prices(&mut items, &catalog_index);

    Ok(BaseTable {
        items,
        catalog: catalog_stats,
    })
}

/// Produce a costed table for one factor value. Always validates first and
/// always starts from a clone of the base, so calling this twice with the
/// same factor yields identical rows and repeated factor changes never
/// compound corrections.
pub fn cost_table(base: &BaseTable, limits: &ValidationLimits, factor: f64) -> Vec<Item> {
    let mut items = base.items.clone();
    validate(&mut items, limits);
    apply_costs(&mut items, factor);
    items
}

/// Full pipeline with the config's demolition factor.
pub fn run(
    config: &ConsolidationConfig,
    input: &ConsolidationInput,
) -> Result<ConsolidationResult, ConsolidateError> {
    run_with_factor(config, input, config.demolition_factor)
}

/// Full pipeline with an explicit factor (report layers recost with a new
/// factor by calling this again; the factor is never ambient state).
pub fn run_with_factor(
    config: &ConsolidationConfig,
    input: &ConsolidationInput,
    factor: f64,
) -> Result<ConsolidationResult, ConsolidateError> {
    validate_factor(factor)?;

    let base = build_base(config, input)?;
    let items = cost_table(&base, &config.limits, factor);
    let summary = compute_summary(&items);

    Ok(ConsolidationResult {
        meta: ConsolidationMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            demolition_factor: factor,
        },
        summary,
        catalog: base.catalog,
        items,
    })
}
