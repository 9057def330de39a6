use dowel_solver::analysis::FiniteElementModel;
use dowel_solver::analysis::classical::BASE_ZONE_END;
use dowel_solver::prelude::*;

fn env_usize(name: &str, default_val: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&v| v > 0)
        .unwrap_or(default_val)
}

fn build_reference_model(mode: AnalysisMode, options: AnalysisOptions) -> DowelModel {
    // 125 mm x 12.7 mm A36 diamond, 4.8 mm joint, 22.2 kN
    DowelModel::new(
        DiamondGeometry::from_mm(125.0, 12.7, 4.8).unwrap(),
        MaterialProperties::a36(),
        LoadCase::concentrated_kn(22.2).unwrap(),
        ServiceParameters::benign(),
    )
    .unwrap()
    .with_mode(mode)
    .with_options(options)
}

#[test]
fn fea_failure_falls_back_to_classical() {
    // A single PCG iteration cannot converge; the analysis must still succeed
    let options = AnalysisOptions::default().with_divisions(8).with_max_iter(1);

    for mode in [AnalysisMode::Fea, AnalysisMode::Auto] {
        let report = build_reference_model(mode, options.clone()).analyze().unwrap();
        assert!(report.is_degraded(), "{mode}: {:?}", report.stress.provenance);

        let classical = build_reference_model(AnalysisMode::Classical, options.clone())
            .analyze()
            .unwrap();
        assert_eq!(report.stress.samples, classical.stress.samples);
        assert_eq!(report.verdict.safety_factor, classical.verdict.safety_factor);
    }
}

#[test]
fn invalid_options_are_not_masked_by_fallback() {
    let options = AnalysisOptions::default().with_support_modulus(-1.0);
    let err = build_reference_model(AnalysisMode::Fea, options)
        .analyze()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InputValidation);
}

#[cfg(feature = "fea")]
#[test]
fn fea_reference_dowel() {
    let divisions = env_usize("DOWEL_FEA_DIVISIONS", 12);
    let options = AnalysisOptions::default().with_divisions(divisions);
    let report = build_reference_model(AnalysisMode::Fea, options).analyze().unwrap();

    let (nodes, elements, iterations) = match report.stress.provenance {
        Provenance::FiniteElement {
            nodes,
            elements,
            iterations,
        } => (nodes, elements, iterations),
        ref other => panic!("expected a finite-element field, got {other:?}"),
    };
    println!(
        "divisions={divisions} nodes={nodes} elements={elements} iterations={iterations} \
         max_vm={:.2} MPa SF={:.3}",
        report.verdict.max_von_mises, report.verdict.safety_factor
    );

    assert_eq!(report.stress.samples.len(), nodes);
    assert!(iterations > 0);
    assert!(report.verdict.max_von_mises.is_finite());
    assert!(report.verdict.max_von_mises > 0.0);
    assert!(report.stress.samples.iter().all(|s| s.state.is_finite()));
    assert!(report.stress.maxima.von_mises.xi < BASE_ZONE_END);
    assert_eq!(
        report.verdict.safety_factor,
        250.0 / report.verdict.max_von_mises
    );
}

#[cfg(feature = "fea")]
#[test]
fn fea_peak_sits_at_the_base_and_stays_bounded() {
    let classical = build_reference_model(AnalysisMode::Classical, AnalysisOptions::default())
        .analyze()
        .unwrap();

    let mut peaks = Vec::new();
    for divisions in [8, 12, 24] {
        let options = AnalysisOptions::default().with_divisions(divisions);
        let report = build_reference_model(AnalysisMode::Fea, options).analyze().unwrap();
        let peak = report.stress.maxima.von_mises;
        println!("divisions={divisions} peak={:.2} MPa at xi={:.3}", peak.value, peak.xi);

        assert!(
            report.stress.provenance.is_finite_element(),
            "{divisions}: {:?}",
            report.stress.provenance
        );
        assert!(peak.xi < BASE_ZONE_END, "{divisions}: peak at xi = {}", peak.xi);
        assert!(peak.value < classical.verdict.max_von_mises);
        peaks.push(peak.value);
    }

    // Refinement converges rather than chasing a point singularity
    assert!(peaks[2] < 1.5 * peaks[0], "{peaks:?}");
}

#[cfg(feature = "fea")]
#[test]
fn pinned_tip_degrades_to_classical() {
    let options = AnalysisOptions::default()
        .with_divisions(12)
        .with_tip(TipCondition::Fixed);
    let report = build_reference_model(AnalysisMode::Fea, options).analyze().unwrap();

    match &report.stress.provenance {
        Provenance::Degraded { requested, reason } => {
            assert_eq!(requested, "fea");
            assert!(reason.contains("base zone"), "{reason}");
        }
        other => panic!("expected a degraded field, got {other:?}"),
    }
    assert!(report.stress.maxima.von_mises.xi < BASE_ZONE_END);
}

#[test]
fn auto_mode_tags_its_source() {
    let report = build_reference_model(AnalysisMode::Auto, AnalysisOptions::default().with_divisions(8))
        .analyze()
        .unwrap();
    if FiniteElementModel::is_available() {
        assert!(report.stress.provenance.is_finite_element());
    } else {
        // Built without the sparse backend: classical stands in, tagged as such
        assert!(report.is_degraded());
    }
}

#[cfg(feature = "fea")]
#[test]
fn fea_is_deterministic() {
    let options = AnalysisOptions::default().with_divisions(8);
    let model = build_reference_model(AnalysisMode::Fea, options);
    let first = model.analyze().unwrap();
    let second = model.analyze().unwrap();
    assert!(first.stress.provenance.is_finite_element());
    assert_eq!(first.stress, second.stress);
}

#[cfg(feature = "fea")]
#[test]
fn distributed_load_changes_the_fe_field_only() {
    let options = AnalysisOptions::default().with_divisions(8);
    let run = |load_type: LoadType, mode: AnalysisMode| {
        DowelModel::new(
            DiamondGeometry::from_mm(125.0, 12.7, 4.8).unwrap(),
            MaterialProperties::a36(),
            LoadCase::new(Force::kilonewtons(22.2), load_type).unwrap(),
            ServiceParameters::benign(),
        )
        .unwrap()
        .with_mode(mode)
        .with_options(options.clone())
        .analyze()
        .unwrap()
    };

    let fe_point = run(LoadType::Concentrated, AnalysisMode::Fea);
    let fe_spread = run(LoadType::Distributed, AnalysisMode::Fea);
    assert_ne!(fe_point.stress.samples, fe_spread.stress.samples);

    let classical_point = run(LoadType::Concentrated, AnalysisMode::Classical);
    let classical_spread = run(LoadType::Distributed, AnalysisMode::Classical);
    assert_eq!(classical_point.stress, classical_spread.stress);
}
