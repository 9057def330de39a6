//! Command line driver: analyze one dowel from a JSON configuration

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use dowel_solver::prelude::*;

fn main() -> Result<()> {
    env_logger::init();

    let matches = Command::new("dowel-analyze")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Stress analysis of a diamond dowel bar from a JSON configuration")
        .arg(
            Arg::new("config")
                .help("Path to the analysis configuration (JSON)")
                .required(true),
        )
        .arg(
            Arg::new("mode")
                .short('m')
                .long("mode")
                .help("Override the analysis mode: classical, aashto, fea or auto"),
        )
        .arg(
            Arg::new("pretty")
                .short('p')
                .long("pretty")
                .help("Print a readable summary instead of JSON")
                .action(ArgAction::SetTrue),
        )
        .after_help("Set RUST_LOG=info to see solver progress on stderr.")
        .get_matches();

    let path = matches
        .get_one::<String>("config")
        .context("missing configuration path")?;

    let mut config = AnalysisConfig::from_file(path)
        .with_context(|| format!("failed to read configuration from {path}"))?;

    if let Some(mode) = matches.get_one::<String>("mode") {
        let mode: AnalysisMode = mode.parse().context("invalid --mode")?;
        config = config.with_mode(mode);
    }

    let model = DowelModel::from_config(&config).context("invalid analysis input")?;
    let report = model.analyze().context("analysis failed")?;

    if matches.get_flag("pretty") {
        print_summary(&report);
    } else {
        println!("{}", report.to_json()?);
    }
    Ok(())
}

fn print_summary(report: &AnalysisReport) {
    let stress = &report.stress;
    let verdict = &report.verdict;

    println!("=== Diamond Dowel Analysis ({} mode) ===\n", report.mode);
    match &stress.provenance {
        Provenance::Degraded { requested, reason } => {
            println!("WARNING: {requested} analysis degraded to classical: {reason}\n")
        }
        provenance => println!("Stress field: {provenance:?}\n"),
    }

    println!("Modifier factors:");
    println!("  Thermal:       {:.4}", report.factors.thermal);
    println!("  Environmental: {:.4}", report.factors.environmental);
    println!("  Dynamic:       {:.4}", report.factors.dynamic);
    println!("  Fatigue:       {:.4}", report.factors.fatigue);
    println!("  Total:         {:.4}", report.factors.total);

    println!("\nStresses (MPa):");
    println!("  Base nominal:      {:.2}", stress.base_stress);
    println!(
        "  Max von Mises:     {:.2} at ({:.2}, {:.2})",
        stress.maxima.von_mises.value,
        stress.maxima.von_mises.point.x,
        stress.maxima.von_mises.point.y
    );
    println!("  Max principal:     {:.2}", stress.maxima.principal_max.value);
    println!("  Max shear:         {:.2}", stress.maxima.max_shear.value);
    if let Some(ratio) = stress.base_to_tip_ratio() {
        println!("  Base / tip ratio:  {ratio:.2}");
    }

    println!("\nCompliance:");
    println!("  Safety factor:     {:.3}", verdict.safety_factor);
    println!("  Design state:      {:?}", verdict.design_state);
    println!("  Conditions:        {:?}", verdict.condition_severity);
    println!(
        "  Seismic zone {}:    {} (requires SF {:.2})",
        report.seismic.zone,
        if report.seismic.passes { "pass" } else { "fail" },
        report.seismic.required_safety_factor
    );

    println!("\nLoad transfer efficiency:");
    println!("  At joint:          {:.2}", report.load_transfer.at_joint);
    println!("  Mean:              {:.2}", report.load_transfer.mean);

    if !report.warnings.is_empty() {
        println!("\nWarnings:");
        for warning in &report.warnings {
            println!("  - {warning}");
        }
    }
}
