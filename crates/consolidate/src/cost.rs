use crate::model::{Item, LifecycleState};

/// Assign state-dependent costs, rounded to whole currency units.
///
/// | state    | new cost          | removal cost               |
/// |----------|-------------------|----------------------------|
/// | added    | quantity × price  | 0                          |
/// | removed  | 0                 | quantity × price × factor  |
/// | retained | 0                 | 0                          |
/// | unknown  | 0                 | 0                          |
///
/// A missing quantity or price collapses to zero cost, never to a missing
/// cost: the table must stay summable.
pub fn apply_costs(items: &mut [Item], demolition_factor: f64) {
    for item in items {
        let gross = match (item.quantity, item.unit_price) {
            (Some(quantity), Some(price)) => quantity * price,
            _ => 0.0,
        };

        let (new_cost, removal_cost) = match item.state {
            LifecycleState::Added => (gross, 0.0),
            LifecycleState::Removed => (0.0, gross * demolition_factor),
            LifecycleState::Retained | LifecycleState::Unknown => (0.0, 0.0),
        };

        item.new_cost = new_cost.round();
        item.removal_cost = removal_cost.round();
        // One side is always zero, so summing after rounding is exact.
        item.total_cost = item.new_cost + item.removal_cost;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Unit};

    fn item(state: LifecycleState, quantity: Option<f64>, price: Option<f64>) -> Item {
        Item {
            id: 1,
            category: Category::Conduits,
            family: "F".into(),
            type_name: "T".into(),
            size: "S".into(),
            system_name: None,
            system_category: None,
            state,
            quantity,
            unit: Unit::Meters,
            unit_price: price,
            price_found: price.is_some(),
            new_cost: 0.0,
            removal_cost: 0.0,
            total_cost: 0.0,
            corrected: false,
        }
    }

    #[test]
    fn added_gets_new_cost_only() {
        let mut items = vec![item(LifecycleState::Added, Some(10.0), Some(100_000.0))];
        apply_costs(&mut items, 0.25);
        assert_eq!(items[0].new_cost, 1_000_000.0);
        assert_eq!(items[0].removal_cost, 0.0);
        assert_eq!(items[0].total_cost, 1_000_000.0);
    }

    #[test]
    fn removed_gets_factored_removal_cost_only() {
        let mut items = vec![item(LifecycleState::Removed, Some(50.0), Some(100_000.0))];
        apply_costs(&mut items, 0.25);
        assert_eq!(items[0].new_cost, 0.0);
        assert_eq!(items[0].removal_cost, 1_250_000.0);
        assert_eq!(items[0].total_cost, 1_250_000.0);
    }

    #[test]
    fn retained_and_unknown_cost_nothing() {
        let mut items = vec![
            item(LifecycleState::Retained, Some(10.0), Some(100_000.0)),
            item(LifecycleState::Unknown, Some(10.0), Some(100_000.0)),
        ];
        apply_costs(&mut items, 0.25);
        for it in &items {
            assert_eq!(it.total_cost, 0.0);
        }
    }

    #[test]
    fn missing_operand_collapses_to_zero() {
        let mut items = vec![
            item(LifecycleState::Added, None, Some(100_000.0)),
            item(LifecycleState::Added, Some(10.0), None),
            item(LifecycleState::Removed, None, None),
        ];
        apply_costs(&mut items, 0.25);
        for it in &items {
            assert_eq!(it.total_cost, 0.0);
        }
    }

    #[test]
    fn costs_rounded_to_whole_currency() {
        let mut items = vec![item(LifecycleState::Removed, Some(3.0), Some(33.33))];
        apply_costs(&mut items, 0.25);
        // 3 × 33.33 × 0.25 = 24.9975
        assert_eq!(items[0].removal_cost, 25.0);
    }
}
