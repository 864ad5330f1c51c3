use serde::Serialize;

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Size sentinel for categories that carry no size discriminator.
pub const SIZE_NOT_APPLICABLE: &str = "N/A";

/// The three inventory categories. Closed set: each variant knows its
/// quantity unit, whether it carries a size discriminator, and how it joins
/// against the price catalog. Downstream stages never re-branch on strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Pipe/duct runs, measured by length, joined by type + size.
    Conduits,
    /// Discrete fittings (elbows, couplings), counted, joined by type + size.
    Fittings,
    /// Point assets (boxes, cameras, poles), counted, joined by family only.
    Fixtures,
}

impl Category {
    /// Fixed pipeline order: Conduits, Fittings, Fixtures.
    pub const ALL: [Category; 3] = [Self::Conduits, Self::Fittings, Self::Fixtures];

    /// Parse a catalog category cell. Trimmed, case-insensitive; anything
    /// else is `None`.
    pub fn parse(raw: &str) -> Option<Category> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "conduits" => Some(Self::Conduits),
            "fittings" => Some(Self::Fittings),
            "fixtures" => Some(Self::Fixtures),
            _ => None,
        }
    }

    pub fn unit(&self) -> Unit {
        match self {
            Self::Conduits => Unit::Meters,
            Self::Fittings | Self::Fixtures => Unit::Each,
        }
    }

    /// Length-measured categories get the implausible-length validation rule.
    pub fn is_linear(&self) -> bool {
        matches!(self, Self::Conduits)
    }

    pub fn has_size(&self) -> bool {
        !matches!(self, Self::Fixtures)
    }

    /// Derive the catalog join key for an item of this category.
    pub fn catalog_key(&self, family: &str, type_name: &str, size: &str) -> CatalogKey {
        match self {
            Self::Conduits | Self::Fittings => {
                CatalogKey::TypeSize(format!("{type_name}|{size}"))
            }
            Self::Fixtures => CatalogKey::Family(family.to_string()),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Conduits => write!(f, "conduits"),
            Self::Fittings => write!(f, "fittings"),
            Self::Fixtures => write!(f, "fixtures"),
        }
    }
}

/// Catalog join key. Conduits/Fittings join on `type|size`; Fixtures on family.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CatalogKey {
    TypeSize(String),
    Family(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Meters,
    Each,
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Meters => write!(f, "m"),
            Self::Each => write!(f, "each"),
        }
    }
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// Classification of an item's status across the two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    /// Demolished during the phase. Sourced from the initial snapshot only.
    Removed,
    /// Built during the phase. Sourced from the final snapshot.
    Added,
    /// Pre-existing and untouched. Sourced from the final snapshot.
    Retained,
    /// Phase marker matched neither literal. Kept for audit, never costed.
    Unknown,
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Removed => write!(f, "removed"),
            Self::Added => write!(f, "added"),
            Self::Retained => write!(f, "retained"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One raw row from an initial or final snapshot extract. Never mutated.
#[derive(Debug, Clone, Default)]
pub struct SnapshotRow {
    pub family: String,
    pub type_name: String,
    pub size: Option<String>,
    /// Length for linear categories, count for discrete ones.
    /// `None` when the source cell failed to parse as a number.
    pub quantity: Option<f64>,
    pub phase_created: Option<String>,
    pub phase_demolished: Option<String>,
    pub system_name: Option<String>,
    pub system_category: Option<String>,
}

/// One row of the rate catalog. Immutable reference data.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub category: String,
    pub family: String,
    pub type_name: String,
    pub size: String,
    pub unit: String,
    pub unit_price: Option<f64>,
}

/// Initial + final snapshot rows for one category.
#[derive(Debug, Clone, Default)]
pub struct SnapshotPair {
    pub initial: Vec<SnapshotRow>,
    pub final_rows: Vec<SnapshotRow>,
}

/// Pre-loaded input tables for one consolidation run.
#[derive(Debug, Clone, Default)]
pub struct ConsolidationInput {
    pub conduits: SnapshotPair,
    pub fittings: SnapshotPair,
    pub fixtures: SnapshotPair,
    pub catalog: Vec<CatalogEntry>,
}

impl ConsolidationInput {
    pub fn pair(&self, category: Category) -> &SnapshotPair {
        match category {
            Category::Conduits => &self.conduits,
            Category::Fittings => &self.fittings,
            Category::Fixtures => &self.fixtures,
        }
    }
}

// ---------------------------------------------------------------------------
// Consolidated items
// ---------------------------------------------------------------------------

/// One row of the consolidated inventory. Created by the reconciler,
/// enriched by the catalog matcher, sanitized by the validator, finalized
/// by the cost pass. Problem rows are flagged, never removed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    /// Sequential 1-based id, assigned after all categories are merged.
    pub id: u64,
    pub category: Category,
    pub family: String,
    pub type_name: String,
    /// Size discriminator, or [`SIZE_NOT_APPLICABLE`] for fixtures.
    pub size: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_category: Option<String>,
    pub state: LifecycleState,
    pub quantity: Option<f64>,
    pub unit: Unit,
    /// `None` when no catalog match or when nulled by validation.
    pub unit_price: Option<f64>,
    pub price_found: bool,
    pub new_cost: f64,
    pub removal_cost: f64,
    pub total_cost: f64,
    /// True when validation overrode an implausible value on this row.
    pub corrected: bool,
}

/// Immutable post-match, pre-validation table. The sole source of truth for
/// costing: every recosting pass starts from a clone of this, so repeated
/// factor changes never accumulate corrections or rounding drift.
#[derive(Debug, Clone)]
pub struct BaseTable {
    pub items: Vec<Item>,
    pub catalog: CatalogStats,
}

/// Catalog load statistics, surfaced for audit.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CatalogStats {
    /// Priced entries indexed.
    pub entries: usize,
    /// Duplicate keys with identical prices (tolerated).
    pub duplicate_keys: usize,
    /// Entries skipped because the price cell did not parse.
    pub skipped_unpriced: usize,
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ConsolidationMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
    pub demolition_factor: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConsolidationResult {
    pub meta: ConsolidationMeta,
    pub summary: crate::summary::Summary,
    pub catalog: CatalogStats,
    pub items: Vec<Item>,
}
