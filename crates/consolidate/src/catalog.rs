use std::collections::BTreeMap;

use crate::error::ConsolidateError;
use crate::model::{CatalogEntry, CatalogKey, CatalogStats, Category, Item};
use crate::normalize::normalize;

/// Price lookup built once from the rate catalog. Two maps, one per derived
/// join key: `type|size` for conduits/fittings, bare family for fixtures.
#[derive(Debug, Default)]
pub struct CatalogIndex {
    by_type_size: BTreeMap<String, f64>,
    by_family: BTreeMap<String, f64>,
}

impl CatalogIndex {
    /// Normalize entries and derive each priced row's join key from the
    /// entry's category: fixtures index under family, conduits and fittings
    /// under `type|size`. A fixtures row must resolve by family even when
    /// its size cell happens to be filled in. Rows with an unrecognized or
    /// blank category fall back to size-emptiness.
    ///
    /// Duplicate keys are never resolved by iteration order: a duplicate
    /// carrying the same price is tolerated and counted, a duplicate carrying
    /// a different price aborts the load.
    pub fn build(entries: &[CatalogEntry]) -> Result<(Self, CatalogStats), ConsolidateError> {
        let mut index = CatalogIndex::default();
        let mut stats = CatalogStats::default();

        for entry in entries {
            let Some(price) = entry.unit_price.filter(|p| p.is_finite()) else {
                stats.skipped_unpriced += 1;
                continue;
            };

            let type_name = normalize(&entry.type_name);
            let size = normalize(&entry.size);
            let family = normalize(&entry.family);

            let keyed_by_family = match Category::parse(&entry.category) {
                Some(category) => !category.has_size(),
                None => size.is_empty() || size == crate::model::SIZE_NOT_APPLICABLE,
            };

            if keyed_by_family {
                insert_checked(&mut index.by_family, family, price, &mut stats)?;
            } else {
                let type_size = format!("{type_name}|{size}");
                insert_checked(&mut index.by_type_size, type_size, price, &mut stats)?;
            }

            stats.entries += 1;
        }

        Ok((index, stats))
    }

    pub fn resolve(&self, key: &CatalogKey) -> Option<f64> {
        match key {
            CatalogKey::TypeSize(k) => self.by_type_size.get(k).copied(),
            CatalogKey::Family(k) => self.by_family.get(k).copied(),
        }
    }
}

fn insert_checked(
    map: &mut BTreeMap<String, f64>,
    key: String,
    price: f64,
    stats: &mut CatalogStats,
) -> Result<(), ConsolidateError> {
    match map.get(&key) {
        Some(&existing) if existing == price => {
            stats.duplicate_keys += 1;
            Ok(())
        }
        Some(&existing) => Err(ConsolidateError::CatalogConflict {
            key,
            first: existing,
            second: price,
        }),
        None => {
            map.insert(key, price);
            Ok(())
        }
    }
}

/// Resolve a unit price per item via its category's join key. A miss leaves
/// the price absent and the flag false; this is a data-quality signal, not a
/// failure.
pub fn assign_prices(items: &mut [Item], index: &CatalogIndex) {
    for item in items {
        let key = item
            .category
            .catalog_key(&item.family, &item.type_name, &item.size);
        item.unit_price = index.resolve(&key);
        item.price_found = item.unit_price.is_some();
    }
}
