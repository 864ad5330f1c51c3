use serde::Deserialize;

use crate::error::ConsolidateError;
use crate::model::Category;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ConsolidationConfig {
    pub name: String,
    /// Fraction of an item's unit price charged for removing it.
    /// Recommended band 0.10–0.40.
    #[serde(default = "default_demolition_factor")]
    pub demolition_factor: f64,
    pub snapshots: SnapshotsConfig,
    pub catalog: CatalogSource,
    #[serde(default)]
    pub phases: PhaseLiterals,
    #[serde(default)]
    pub limits: ValidationLimits,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_demolition_factor() -> f64 {
    0.25
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SnapshotsConfig {
    pub conduits: SnapshotSource,
    pub fittings: SnapshotSource,
    pub fixtures: SnapshotSource,
}

impl SnapshotsConfig {
    pub fn source(&self, category: Category) -> &SnapshotSource {
        match category {
            Category::Conduits => &self.conduits,
            Category::Fittings => &self.fittings,
            Category::Fixtures => &self.fixtures,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotSource {
    /// Inventory extract at the start of the phase.
    pub initial_file: String,
    /// Inventory extract at the end of the phase.
    pub final_file: String,
    #[serde(default)]
    pub columns: SnapshotColumns,
}

/// Column names in a snapshot extract. Defaults match stock Revit schedule
/// exports; override per category for renamed or localized columns.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SnapshotColumns {
    pub family: String,
    #[serde(rename = "type")]
    pub type_name: String,
    /// Size discriminator column. Required for conduits and fittings.
    pub size: Option<String>,
    /// Quantity column: length for conduits, count for the discrete
    /// categories. When absent on a discrete category, every row counts as 1.
    pub quantity: Option<String>,
    pub phase_created: String,
    pub phase_demolished: String,
    pub system_name: Option<String>,
    pub system_category: Option<String>,
}

impl Default for SnapshotColumns {
    fn default() -> Self {
        Self {
            family: "Family".into(),
            type_name: "Type".into(),
            size: None,
            quantity: None,
            phase_created: "Phase Created".into(),
            phase_demolished: "Phase Demolished".into(),
            system_name: None,
            system_category: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSource {
    pub file: String,
    #[serde(default)]
    pub columns: CatalogColumns,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogColumns {
    pub category: String,
    pub family: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub size: String,
    pub unit: String,
    pub unit_price: String,
}

impl Default for CatalogColumns {
    fn default() -> Self {
        Self {
            category: "Category".into(),
            family: "Family".into(),
            type_name: "Type".into(),
            size: "Size".into(),
            unit: "Unit".into(),
            unit_price: "UnitPrice".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Phase literals
// ---------------------------------------------------------------------------

/// Phase marker values in the source model. The demolished literal selects
/// Removed rows from the initial snapshot; the created literals classify the
/// final snapshot as Added / Retained. Anything else is Unknown.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PhaseLiterals {
    pub demolished: String,
    pub created_new: String,
    pub created_existing: String,
}

impl Default for PhaseLiterals {
    fn default() -> Self {
        Self {
            demolished: "Demolition".into(),
            created_new: "New Construction".into(),
            created_existing: "Existing".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation limits
// ---------------------------------------------------------------------------

/// Domain plausibility bounds. A single run longer than the length ceiling
/// is almost certainly a unit-conversion error upstream (millimetres
/// exported as metres); a price past the ceiling would corrupt every sum.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ValidationLimits {
    pub max_linear_quantity: f64,
    pub max_unit_price: f64,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_linear_quantity: 2_000.0,
            max_unit_price: 5_000_000_000.0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// JSON result document path.
    #[serde(default)]
    pub json: Option<String>,
    /// Consolidated table export path (.csv or .xlsx).
    #[serde(default)]
    pub table: Option<String>,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

/// A demolition factor must be a fraction of the unit price.
pub fn validate_factor(factor: f64) -> Result<(), ConsolidateError> {
    if !factor.is_finite() || factor <= 0.0 || factor > 1.0 {
        return Err(ConsolidateError::ConfigValidation(format!(
            "demolition factor must be in (0, 1], got {factor}"
        )));
    }
    Ok(())
}

impl ConsolidationConfig {
    pub fn from_toml(input: &str) -> Result<Self, ConsolidateError> {
        let config: ConsolidationConfig =
            toml::from_str(input).map_err(|e| ConsolidateError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConsolidateError> {
        validate_factor(self.demolition_factor)?;

        if self.limits.max_linear_quantity <= 0.0 || self.limits.max_unit_price <= 0.0 {
            return Err(ConsolidateError::ConfigValidation(
                "validation limits must be positive".into(),
            ));
        }

        // Categories that join by type + size must know where size lives.
        for category in [Category::Conduits, Category::Fittings] {
            if self.snapshots.source(category).columns.size.is_none() {
                return Err(ConsolidateError::ConfigValidation(format!(
                    "snapshots.{category}: a size column is required"
                )));
            }
        }

        // Length is not defaultable; counts are.
        if self.snapshots.conduits.columns.quantity.is_none() {
            return Err(ConsolidateError::ConfigValidation(
                "snapshots.conduits: a quantity (length) column is required".into(),
            ));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
