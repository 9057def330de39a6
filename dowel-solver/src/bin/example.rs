//! Dowel Solver Example - Reference Diamond Dowel

use dowel_solver::prelude::*;

fn main() {
    println!("=== Dowel Solver Example: Medium Metric Diamond Dowel ===\n");

    //        (0, d)
    //          /\
    //   joint |  \
    //   face  |   > (d, 0) tip
    //         |  /
    //          \/
    //        (0, -d)
    //
    // 125 mm plate, 12.7 mm thick, 4.8 mm joint opening, 22.2 kN shear.
    let geometry = DiamondGeometry::standard(StandardSize::Medium, UnitSystem::Metric)
        .expect("Failed to build geometry");
    let load = LoadCase::concentrated_kn(22.2).expect("Failed to build load");

    println!("Geometry:");
    println!("  Side length:     {:.1} mm", geometry.side_length());
    println!("  Thickness:       {:.2} mm", geometry.thickness());
    println!("  Half diagonal:   {:.2} mm", geometry.diagonal_half());
    println!("  Bearing width:   {:.2} mm", geometry.bearing_width());
    println!("  Section modulus: {:.1} mm³\n", geometry.section_modulus());

    for mode in [AnalysisMode::Classical, AnalysisMode::Aashto, AnalysisMode::Fea] {
        let model = DowelModel::new(
            geometry.clone(),
            MaterialProperties::a36(),
            load,
            ServiceParameters::benign(),
        )
        .expect("Reference inputs should validate")
        .with_mode(mode);

        match model.analyze() {
            Ok(report) => {
                println!("--- {mode} ---");
                println!("  Provenance:      {:?}", report.stress.provenance);
                println!("  Total factor:    {:.4}", report.factors.total);
                println!("  Max von Mises:   {:.2} MPa", report.verdict.max_von_mises);
                println!("  Safety factor:   {:.3}", report.verdict.safety_factor);
                println!("  Design state:    {:?}", report.verdict.design_state);
                if let Some(ratio) = report.stress.base_to_tip_ratio() {
                    println!("  Base/tip ratio:  {ratio:.2}");
                }
                println!();
            }
            Err(e) => println!("{mode} analysis failed: {e}\n"),
        }
    }

    // Same dowel in a harsh service environment
    let harsh = DowelModel::new(
        geometry,
        MaterialProperties::a36(),
        load,
        ServiceParameters::default(),
    )
    .expect("Default service parameters should validate")
    .with_mode(AnalysisMode::Classical);

    let factors = harsh.modifier_factors();
    println!("--- default service conditions ---");
    println!("  Thermal:         {:.4}", factors.thermal);
    println!("  Environmental:   {:.4}", factors.environmental);
    println!("  Dynamic:         {:.4}", factors.dynamic);
    println!("  Fatigue:         {:.4}", factors.fatigue);
    println!("  Total:           {:.4}", factors.total);
    println!("  Seismic amp.:    {:.2}", factors.seismic_amplification);

    if let Ok(report) = harsh.analyze() {
        println!("  Conditions:      {:?}", report.verdict.condition_severity);
        println!("  Safety factor:   {:.3}", report.verdict.safety_factor);
        println!("  LTE at joint:    {:.2}", report.load_transfer.at_joint);
    }
}
