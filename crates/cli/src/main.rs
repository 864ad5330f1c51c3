//! phasebill - consolidate initial/final construction snapshots and cost
//! the delta against a rate catalog.

mod exit_codes;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use phasebill_consolidate::config::ConsolidationConfig;
use phasebill_consolidate::model::{Category, ConsolidationInput, ConsolidationResult, SnapshotPair};
use phasebill_consolidate::{run_with_factor, ConsolidateError};
use phasebill_io::{catalog_entries, load_table, mean_quantity, snapshot_rows, write_table};

use exit_codes::{engine_exit_code, EXIT_RUNTIME, EXIT_SUCCESS, EXIT_USAGE};

/// A final-snapshot mean conduit run this long is almost always millimetres
/// exported where metres were expected.
const LENGTH_PROBE_MEAN: f64 = 500.0;

#[derive(Parser)]
#[command(name = "phasebill")]
#[command(about = "Consolidate construction snapshots and cost the delta")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: ingest, reconcile, price, validate, cost
    #[command(after_help = "\
Examples:
  phasebill run segment1.toml
  phasebill run segment1.toml --factor 0.30 --json > result.json
  phasebill run segment1.toml --output result.json --export table.xlsx")]
    Run {
        /// Consolidation config (TOML)
        config: PathBuf,

        /// Demolition factor override, in (0, 1]
        #[arg(long)]
        factor: Option<f64>,

        /// Print the full result document as JSON on stdout
        #[arg(long)]
        json: bool,

        /// Write the full result document to a file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Export the consolidated table (.csv or .xlsx)
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Parse and validate a config without running the pipeline
    Validate {
        /// Consolidation config (TOML)
        config: PathBuf,
    },
}

/// Error carrying its exit code plus an optional remediation hint.
#[derive(Debug)]
struct CliError {
    code: u8,
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(code: u8, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            hint: None,
        }
    }

    fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<ConsolidateError> for CliError {
    fn from(err: ConsolidateError) -> Self {
        let code = engine_exit_code(&err);
        let cli = CliError::new(code, err.to_string());
        match err {
            ConsolidateError::MissingColumn { .. } => cli.hint(
                "column names are configurable under [snapshots.<category>.columns]",
            ),
            ConsolidateError::CatalogConflict { .. } => {
                cli.hint("fix the catalog: one key must carry one price")
            }
            _ => cli,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run {
            config,
            factor,
            json,
            output,
            export,
        } => cmd_run(&config, factor, json, output, export),
        Commands::Validate { config } => cmd_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = &err.hint {
                eprintln!("hint: {hint}");
            }
            ExitCode::from(err.code)
        }
    }
}

/// Parse the config and return it with the directory every relative file
/// path in it resolves against.
fn load_config(path: &Path) -> Result<(ConsolidationConfig, PathBuf), CliError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        CliError::new(EXIT_RUNTIME, format!("cannot read {}: {e}", path.display()))
    })?;
    let config = ConsolidationConfig::from_toml(&content)?;
    let base = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok((config, base))
}

fn resolve(base: &Path, file: &str) -> PathBuf {
    let path = Path::new(file);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Load every snapshot pair and the catalog from disk.
fn load_input(
    config: &ConsolidationConfig,
    base: &Path,
) -> Result<ConsolidationInput, CliError> {
    let mut pairs: Vec<SnapshotPair> = Vec::new();
    for category in Category::ALL {
        let source = config.snapshots.source(category);
        let initial_table = load_table(&resolve(base, &source.initial_file))?;
        let final_table = load_table(&resolve(base, &source.final_file))?;
        pairs.push(SnapshotPair {
            initial: snapshot_rows(&initial_table, &source.columns, category)?,
            final_rows: snapshot_rows(&final_table, &source.columns, category)?,
        });
    }
    let mut pairs = pairs.into_iter();
    let conduits = pairs.next().unwrap_or_default();
    let fittings = pairs.next().unwrap_or_default();
    let fixtures = pairs.next().unwrap_or_default();

    let catalog_table = load_table(&resolve(base, &config.catalog.file))?;
    let catalog = catalog_entries(&catalog_table, &config.catalog.columns)?;

    Ok(ConsolidationInput {
        conduits,
        fittings,
        fixtures,
        catalog,
    })
}

fn cmd_run(
    config_path: &Path,
    factor: Option<f64>,
    json: bool,
    output: Option<PathBuf>,
    export: Option<PathBuf>,
) -> Result<(), CliError> {
    let (config, base) = load_config(config_path)?;
    if let Some(factor) = factor {
        phasebill_consolidate::config::validate_factor(factor).map_err(|e| {
            CliError::new(EXIT_USAGE, e.to_string()).hint("pass --factor in (0, 1], e.g. 0.25")
        })?;
    }
    let input = load_input(&config, &base)?;

    // Length-unit probe: run before costing so a mm-scaled export is called
    // out even when validation nulls most of its rows.
    if let Some(mean) = mean_quantity(&input.conduits.final_rows) {
        if mean > LENGTH_PROBE_MEAN {
            eprintln!(
                "warning: mean conduit length in the final snapshot is {mean:.0}; \
                 check that lengths are exported in metres, not millimetres"
            );
        }
    }

    let factor = factor.unwrap_or(config.demolition_factor);
    let result = run_with_factor(&config, &input, factor)?;

    print_summary(&result);

    let json_target = output.or_else(|| config.output.json.as_ref().map(|f| resolve(&base, f)));
    if let Some(path) = json_target {
        let document = serde_json::to_string_pretty(&result).map_err(|e| {
            CliError::new(EXIT_RUNTIME, format!("cannot serialize result: {e}"))
        })?;
        std::fs::write(&path, document).map_err(|e| {
            CliError::new(EXIT_RUNTIME, format!("cannot write {}: {e}", path.display()))
        })?;
        eprintln!("wrote {}", path.display());
    }

    let export_target = export.or_else(|| config.output.table.as_ref().map(|f| resolve(&base, f)));
    if let Some(path) = export_target {
        write_table(&path, &result.items)?;
        eprintln!("wrote {}", path.display());
    }

    if json {
        let document = serde_json::to_string_pretty(&result).map_err(|e| {
            CliError::new(EXIT_RUNTIME, format!("cannot serialize result: {e}"))
        })?;
        println!("{document}");
    }

    Ok(())
}

fn cmd_validate(config_path: &Path) -> Result<(), CliError> {
    let (config, base) = load_config(config_path)?;

    let mut missing = Vec::new();
    for category in Category::ALL {
        let source = config.snapshots.source(category);
        for file in [&source.initial_file, &source.final_file] {
            let path = resolve(&base, file);
            if !path.exists() {
                missing.push(path.display().to_string());
            }
        }
    }
    let catalog = resolve(&base, &config.catalog.file);
    if !catalog.exists() {
        missing.push(catalog.display().to_string());
    }

    if !missing.is_empty() {
        return Err(CliError::new(
            EXIT_RUNTIME,
            format!("missing input files: {}", missing.join(", ")),
        ));
    }

    eprintln!(
        "{}: config OK (factor {}, 7 input files found)",
        config.name, config.demolition_factor
    );
    Ok(())
}

/// Human-readable rollup on stderr; stdout stays clean for --json.
fn print_summary(result: &ConsolidationResult) {
    let s = &result.summary;
    eprintln!("{} (factor {})", result.meta.config_name, result.meta.demolition_factor);
    eprintln!("  items: {}", s.total_items);
    for (category, states) in &s.state_counts {
        let parts: Vec<String> = states
            .iter()
            .map(|(state, count)| format!("{state} {count}"))
            .collect();
        eprintln!("  {category}: {}", parts.join(", "));
    }
    eprintln!(
        "  length: initial {:.1} -> final {:.1} (removed {:.1}, added {:.1}, intervention {:.1}%)",
        s.lengths.initial,
        s.lengths.final_length,
        s.lengths.removed,
        s.lengths.added,
        s.lengths.intervention_pct
    );
    eprintln!(
        "  cost: total {:.0} (new {:.0} / {:.1}%, removal {:.0} / {:.1}%)",
        s.costs.total,
        s.costs.new_construction,
        s.costs.new_pct,
        s.costs.removal,
        s.costs.removal_pct
    );
    eprintln!(
        "  quality: {} unpriced, {} unknown phase, {} corrected",
        s.quality.missing_price, s.quality.unknown_phase, s.quality.corrected
    );
    if !s.unmatched.is_empty() {
        eprintln!("  unmatched catalog keys:");
        for combo in &s.unmatched {
            eprintln!(
                "    {} {} | {} | {} ({} rows)",
                combo.category, combo.family, combo.type_name, combo.size, combo.rows
            );
        }
    }
    if result.catalog.duplicate_keys > 0 {
        eprintln!(
            "  note: {} duplicate catalog keys (identical prices, tolerated)",
            result.catalog.duplicate_keys
        );
    }
}
