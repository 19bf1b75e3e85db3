use clap::{Parser, Subcommand};
use safedose_core::*;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "safedose")]
#[command(about = "Medication dosage calculator with safety checks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate a dosage quantity and check it against safety limits
    Calc {
        /// Medication name (e.g. dipirona, paracetamol, morfina)
        #[arg(long)]
        medication: String,

        /// Prescribed dose value
        #[arg(long)]
        dose: f64,

        /// Prescribed dose unit (g, mg, mcg, ml, ui)
        #[arg(long, default_value = "mg")]
        unit: String,

        /// Available concentration value
        #[arg(long)]
        concentration: f64,

        /// Available concentration unit (mg/ml, mcg/ml, g/ml)
        #[arg(long, default_value = "mg/ml")]
        concentration_unit: String,

        /// Pharmaceutical form (tablet, capsule, liquid, injection, solution)
        #[arg(long)]
        form: String,

        /// Show the result without recording it in the history
        #[arg(long)]
        dry_run: bool,
    },

    /// List past calculations, newest first
    History,

    /// Remove a history entry by id
    Remove {
        /// Id of the entry to remove (as shown by `history`)
        id: i64,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    safedose_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let history_path = data_dir.join(history::HISTORY_FILE);

    match cli.command {
        Commands::Calc {
            medication,
            dose,
            unit,
            concentration,
            concentration_unit,
            form,
            dry_run,
        } => cmd_calc(
            history_path,
            &medication,
            dose,
            &unit,
            concentration,
            &concentration_unit,
            &form,
            dry_run,
        ),
        Commands::History => cmd_history(history_path),
        Commands::Remove { id, yes } => cmd_remove(history_path, id, yes),
    }
}

/// Map a concentration unit to the base unit its numerator is expressed in
///
/// Unknown units pass through unchanged; the engine's own unit fallback
/// (unrecognized = milligram-equivalent) then applies downstream.
fn concentration_base_unit(concentration_unit: &str) -> &str {
    match concentration_unit.to_lowercase().as_str() {
        "mg/ml" => "mg",
        "mcg/ml" => "mcg",
        "g/ml" => "g",
        other => {
            tracing::warn!("Unknown concentration unit '{}', passing through", other);
            concentration_unit
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_calc(
    history_path: PathBuf,
    medication: &str,
    dose: f64,
    unit: &str,
    concentration: f64,
    concentration_unit: &str,
    form: &str,
    dry_run: bool,
) -> Result<()> {
    // Presence/positivity checks are this layer's job; the engine assumes
    // numeric inputs are already validated.
    if medication.trim().is_empty() {
        println!("✗ Select a medication.");
        return Ok(());
    }
    if !dose.is_finite() || dose <= 0.0 {
        println!("✗ Prescribed dose must be a number greater than 0.");
        return Ok(());
    }
    if !concentration.is_finite() || concentration <= 0.0 {
        println!("✗ Available concentration must be a number greater than 0.");
        return Ok(());
    }

    let _base_unit = concentration_base_unit(concentration_unit);

    match calculate_dosage(dose, unit, concentration, form, medication) {
        Ok(calc) => {
            let verdict = check_safety(calc.prescribed_mg, medication);

            println!();
            println!("  ✓ {}", calc.message);
            match verdict.severity {
                Severity::Success => println!("  ✓ {}", verdict.message),
                Severity::Warning => println!("  ⚠ {}", verdict.message),
            }

            if dry_run {
                println!("\n[Dry run - not recording calculation]");
                return Ok(());
            }

            let mut store = HistoryStore::open(&history_path);
            let id = store.append(NewEntry {
                medication: medication.to_string(),
                prescribed_value: dose,
                prescribed_unit: unit.to_string(),
                available_value: concentration,
                available_unit: concentration_unit.to_string(),
                form: form.to_string(),
                result: calc.message.clone(),
                alert: verdict.message.clone(),
            })?;

            println!("\n✓ Calculation recorded (id {})", id);
        }
        Err(e) => {
            // Engine failures are rendered, never a process fault
            println!("\n  ✗ {}", e);
        }
    }

    Ok(())
}

fn cmd_history(history_path: PathBuf) -> Result<()> {
    let store = HistoryStore::open(&history_path);

    if store.entries().is_empty() {
        println!("No calculations in history.");
        return Ok(());
    }

    for entry in store.entries() {
        display_entry(entry);
    }

    Ok(())
}

fn cmd_remove(history_path: PathBuf, id: i64, yes: bool) -> Result<()> {
    let mut store = HistoryStore::open(&history_path);

    let confirmed = yes || prompt_confirm(id)?;
    if !confirmed {
        println!("Cancelled - nothing removed.");
        return Ok(());
    }

    if store.remove(id)? {
        println!("✓ Entry {} removed.", id);
    } else {
        println!("No matching entry for id {}.", id);
    }

    Ok(())
}

fn display_entry(entry: &HistoryEntry) {
    println!("─────────────────────────────────────────");
    println!("  [{}] {}", entry.id, entry.medication);
    println!(
        "  Prescribed: {} {}",
        entry.prescribed_value, entry.prescribed_unit
    );
    println!(
        "  Available: {} {} ({})",
        entry.available_value, entry.available_unit, entry.form
    );
    println!("  {}", entry.result);
    println!("  {}", entry.alert);
}

fn prompt_confirm(id: i64) -> Result<bool> {
    print!("Remove history entry {}? [y/N] ", id);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().eq_ignore_ascii_case("y"))
}
