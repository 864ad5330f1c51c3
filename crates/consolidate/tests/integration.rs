//! End-to-end pipeline scenarios: raw snapshot rows in, costed table out.

use phasebill_consolidate::model::SnapshotPair;
use phasebill_consolidate::{
    build_base, cost_table, run, run_with_factor, CatalogEntry, ConsolidationConfig,
    ConsolidationInput, LifecycleState, SnapshotRow,
};

const CONFIG: &str = r#"
name = "Segment 1"
demolition_factor = 0.25

[snapshots.conduits]
initial_file = "conduits_initial.csv"
final_file = "conduits_final.csv"
[snapshots.conduits.columns]
size = "Diameter(Trade Size)"
quantity = "Length"

[snapshots.fittings]
initial_file = "fittings_initial.csv"
final_file = "fittings_final.csv"
[snapshots.fittings.columns]
size = "Size"

[snapshots.fixtures]
initial_file = "fixtures_initial.csv"
final_file = "fixtures_final.csv"

[catalog]
file = "rates.csv"
"#;

fn config() -> ConsolidationConfig {
    ConsolidationConfig::from_toml(CONFIG).unwrap()
}

fn entry(family: &str, type_name: &str, size: &str, price: f64) -> CatalogEntry {
    CatalogEntry {
        category: String::new(),
        family: family.into(),
        type_name: type_name.into(),
        size: size.into(),
        unit: "m".into(),
        unit_price: Some(price),
    }
}

#[test]
fn demolished_conduit_costed_at_factor() {
    // One conduit demolished in the initial snapshot; the final snapshot has
    // no surviving counterpart. The removal must still be billed.
    let input = ConsolidationInput {
        conduits: SnapshotPair {
            initial: vec![SnapshotRow {
                family: "Conduit".into(),
                type_name: "EMT".into(),
                size: Some("3/4\"".into()),
                quantity: Some(50.0),
                phase_demolished: Some("Demolition".into()),
                ..Default::default()
            }],
            final_rows: vec![],
        },
        catalog: vec![entry("Conduit", "EMT", "3/4\"", 100_000.0)],
        ..Default::default()
    };

    let result = run(&config(), &input).unwrap();
    assert_eq!(result.items.len(), 1);

    let item = &result.items[0];
    assert_eq!(item.state, LifecycleState::Removed);
    assert_eq!(item.quantity, Some(50.0));
    assert_eq!(item.unit_price, Some(100_000.0));
    assert_eq!(item.new_cost, 0.0);
    assert_eq!(item.removal_cost, 1_250_000.0);
    assert_eq!(item.total_cost, 1_250_000.0);
    assert_eq!(result.summary.costs.removal, 1_250_000.0);
}

#[test]
fn new_fixture_priced_by_family_alone() {
    let input = ConsolidationInput {
        fixtures: SnapshotPair {
            initial: vec![],
            final_rows: vec![SnapshotRow {
                family: "Camera".into(),
                type_name: "Dome".into(),
                quantity: Some(1.0),
                phase_created: Some("New Construction".into()),
                ..Default::default()
            }],
        },
        catalog: vec![entry("Camera", "Dome", "N/A", 2_000_000.0)],
        ..Default::default()
    };

    let result = run(&config(), &input).unwrap();
    let item = &result.items[0];
    assert_eq!(item.state, LifecycleState::Added);
    assert_eq!(item.size, "N/A");
    assert_eq!(item.new_cost, 2_000_000.0);
    assert_eq!(item.removal_cost, 0.0);
}

#[test]
fn fixture_priced_despite_sized_catalog_row() {
    // Some rate sheets fill the size cell on point assets too. The category
    // column still routes the entry to the family key, so the join holds.
    let input = ConsolidationInput {
        fixtures: SnapshotPair {
            initial: vec![],
            final_rows: vec![SnapshotRow {
                family: "Camera".into(),
                type_name: "Dome".into(),
                quantity: Some(1.0),
                phase_created: Some("New Construction".into()),
                ..Default::default()
            }],
        },
        catalog: vec![CatalogEntry {
            category: "Fixtures".into(),
            family: "Camera".into(),
            type_name: "Dome".into(),
            size: "small".into(),
            unit: "each".into(),
            unit_price: Some(2_000_000.0),
        }],
        ..Default::default()
    };

    let result = run(&config(), &input).unwrap();
    let item = &result.items[0];
    assert!(item.price_found);
    assert_eq!(item.unit_price, Some(2_000_000.0));
    assert_eq!(item.new_cost, 2_000_000.0);
}

#[test]
fn implausible_price_nulled_but_match_remembered() {
    let input = ConsolidationInput {
        fixtures: SnapshotPair {
            initial: vec![],
            final_rows: vec![SnapshotRow {
                family: "Substation".into(),
                type_name: "XL".into(),
                quantity: Some(1.0),
                phase_created: Some("New Construction".into()),
                ..Default::default()
            }],
        },
        catalog: vec![entry("Substation", "XL", "N/A", 6_000_000_000.0)],
        ..Default::default()
    };

    let result = run(&config(), &input).unwrap();
    let item = &result.items[0];
    assert!(item.price_found, "the catalog join itself succeeded");
    assert_eq!(item.unit_price, None);
    assert!(item.corrected);
    assert_eq!(item.total_cost, 0.0);
    assert_eq!(result.summary.quality.corrected, 1);
}

#[test]
fn length_identities_hold_end_to_end() {
    let added = |qty: f64| SnapshotRow {
        family: "Conduit".into(),
        type_name: "EMT".into(),
        size: Some("3/4\"".into()),
        quantity: Some(qty),
        phase_created: Some("New Construction".into()),
        ..Default::default()
    };
    let retained = |qty: f64| SnapshotRow {
        phase_created: Some("Existing".into()),
        ..added(qty)
    };
    let removed = |qty: f64| SnapshotRow {
        phase_created: None,
        phase_demolished: Some("Demolition".into()),
        ..added(qty)
    };

    let input = ConsolidationInput {
        conduits: SnapshotPair {
            initial: vec![removed(30.0), removed(12.5)],
            final_rows: vec![added(48.0), retained(60.0), retained(15.0)],
        },
        ..Default::default()
    };

    let result = run(&config(), &input).unwrap();
    let lengths = &result.summary.lengths;
    assert_eq!(lengths.initial, lengths.removed + lengths.retained);
    assert_eq!(lengths.final_length, lengths.added + lengths.retained);
    assert_eq!(lengths.removed, 42.5);
    assert_eq!(lengths.added, 48.0);
    assert_eq!(lengths.retained, 75.0);
}

#[test]
fn recosting_from_base_never_drifts() {
    let cfg = config();
    let input = ConsolidationInput {
        conduits: SnapshotPair {
            initial: vec![SnapshotRow {
                family: "Conduit".into(),
                type_name: "EMT".into(),
                size: Some("3/4\"".into()),
                // Implausible: gets corrected on every costing pass.
                quantity: Some(2_500.0),
                phase_demolished: Some("Demolition".into()),
                ..Default::default()
            }],
            final_rows: vec![],
        },
        catalog: vec![entry("Conduit", "EMT", "3/4\"", 100_000.0)],
        ..Default::default()
    };

    let base = build_base(&cfg, &input).unwrap();
    // Base stays unvalidated.
    assert_eq!(base.items[0].quantity, Some(2_500.0));
    assert!(!base.items[0].corrected);

    // Simulate a report slider: many passes, alternating factors.
    let mut last = None;
    for factor in [0.10, 0.40, 0.25, 0.25, 0.25] {
        let items = cost_table(&base, &cfg.limits, factor);
        assert_eq!(items[0].quantity, None);
        assert!(items[0].corrected);
        assert_eq!(items[0].total_cost, 0.0);
        if factor == 0.25 {
            if let Some(prev) = last.replace(items.clone()) {
                assert_eq!(prev, items);
            }
        }
    }
}

#[test]
fn unknown_phase_rows_survive_into_the_table() {
    let input = ConsolidationInput {
        fittings: SnapshotPair {
            initial: vec![],
            final_rows: vec![SnapshotRow {
                family: "Elbow".into(),
                type_name: "Std".into(),
                size: Some("3/4\"".into()),
                quantity: Some(1.0),
                phase_created: Some("Phase 7".into()),
                ..Default::default()
            }],
        },
        ..Default::default()
    };

    let result = run(&config(), &input).unwrap();
    assert_eq!(result.items.len(), 1);
    assert_eq!(result.items[0].state, LifecycleState::Unknown);
    assert_eq!(result.items[0].total_cost, 0.0);
    assert_eq!(result.summary.quality.unknown_phase, 1);
}

#[test]
fn factor_override_rejected_outside_unit_interval() {
    let input = ConsolidationInput::default();
    assert!(run_with_factor(&config(), &input, 1.5).is_err());
    assert!(run_with_factor(&config(), &input, -0.25).is_err());
    assert!(run_with_factor(&config(), &input, 1.0).is_ok());
}
