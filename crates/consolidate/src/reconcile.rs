use crate::config::PhaseLiterals;
use crate::model::{Category, Item, LifecycleState, SnapshotRow, SIZE_NOT_APPLICABLE};
use crate::normalize::normalize;

/// Merge one category's initial and final snapshots into tagged items.
///
/// Removed items come from the initial snapshot alone: a row demolished is
/// demolished, whether or not something similar reappears later. Everything
/// else (Added / Retained / Unknown) comes from the final snapshot, one item
/// per row. The initial picture is therefore reconstructable only as
/// Removed + Retained.
pub fn reconcile(
    category: Category,
    initial: &[SnapshotRow],
    final_rows: &[SnapshotRow],
    phases: &PhaseLiterals,
) -> Vec<Item> {
    let mut items = Vec::new();

    for row in initial {
        let demolished = row
            .phase_demolished
            .as_deref()
            .map(str::trim)
            .is_some_and(|p| p == phases.demolished);
        if demolished {
            items.push(item_from_row(category, row, LifecycleState::Removed));
        }
    }

    for row in final_rows {
        let state = match row.phase_created.as_deref().map(str::trim) {
            Some(p) if p == phases.created_new => LifecycleState::Added,
            Some(p) if p == phases.created_existing => LifecycleState::Retained,
            // Anything else, including a missing marker, is kept for audit.
            _ => LifecycleState::Unknown,
        };
        items.push(item_from_row(category, row, state));
    }

    items
}

fn item_from_row(category: Category, row: &SnapshotRow, state: LifecycleState) -> Item {
    let size = if category.has_size() {
        normalize(row.size.as_deref().unwrap_or_default())
    } else {
        SIZE_NOT_APPLICABLE.to_string()
    };

    Item {
        id: 0, // assigned after all categories are merged
        category,
        family: normalize(&row.family),
        type_name: normalize(&row.type_name),
        size,
        system_name: row.system_name.clone(),
        system_category: row.system_category.clone(),
        state,
        quantity: row.quantity,
        unit: category.unit(),
        unit_price: None,
        price_found: false,
        new_cost: 0.0,
        removal_cost: 0.0,
        total_cost: 0.0,
        corrected: false,
    }
}
