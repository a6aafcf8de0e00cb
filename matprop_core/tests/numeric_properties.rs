//! Reference values the dashboard relies on, checked through the public API.

use matprop_core::formulas::crystal::{cell_volume, CrystalSystem, LatticeParameters};
use matprop_core::formulas::fatigue::{equivalent_stress, MeanStressModel};
use matprop_core::formulas::hardness::{convert, HardnessReading, HardnessScale};
use matprop_core::formulas::registry::{Formula, FormulaInputs, ALL_FORMULAS};
use matprop_core::numeric::{
    fit_and_diagnose, fit_polynomial, r_squared, solve, summarize, summarize_text, Point2D, SquareMatrix,
};
use matprop_core::{CalcError, CalcSettings};

fn reference_points() -> Vec<Point2D> {
    vec![
        Point2D::new(10.0, 100.0),
        Point2D::new(20.0, 150.0),
        Point2D::new(30.0, 180.0),
        Point2D::new(40.0, 190.0),
    ]
}

#[test]
fn solver_residual_is_small() {
    let a = SquareMatrix::from_rows(vec![vec![2.0, 1.0], vec![1.0, 3.0]]).unwrap();
    let b = [3.0, 5.0];
    let solution = solve(&a, &b).unwrap();
    assert!(!solution.singular);

    let ax = a.mul_vec(&solution.x);
    for (lhs, rhs) in ax.iter().zip(b.iter()) {
        assert!((lhs - rhs).abs() < 1e-6);
    }
}

#[test]
fn singular_system_yields_finite_output() {
    let a = SquareMatrix::from_rows(vec![vec![1.0, 2.0], vec![2.0, 4.0]]).unwrap();
    let solution = solve(&a, &[1.0, 2.0]).unwrap();
    assert!(solution.singular);
    assert!(solution.x.iter().all(|v| v.is_finite()));
}

#[test]
fn cubic_fit_reproduces_four_points() {
    let points = reference_points();
    let fit = fit_polynomial(&points, 3).unwrap();
    assert_eq!(fit.degree, 3);
    for p in &points {
        let y = fit.polynomial.evaluate(p.x);
        assert!((y - p.y).abs() < 1e-6, "p({}) = {}, expected {}", p.x, y, p.y);
    }
}

#[test]
fn r_squared_bounds() {
    let points = reference_points();
    let report = fit_and_diagnose(&points, 3, &CalcSettings::default()).unwrap();
    assert!((report.diagnostics.r_squared - 1.0).abs() < 1e-9);

    for degree in 1..=2 {
        let fit = fit_polynomial(&points, degree).unwrap();
        let r2 = r_squared(&fit.polynomial, &points);
        assert!(r2 <= 1.0 + 1e-12, "degree {}: R² = {}", degree, r2);
    }
}

#[test]
fn summary_of_one_to_five() {
    let s = summarize(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
    assert_eq!(s.mean, 3.0);
    assert_eq!(s.median, 3.0);
    assert!((s.variance - 2.5).abs() < 1e-12);
    assert!((s.std_dev - 1.5811).abs() < 1e-4);
}

#[test]
fn histogram_counts_sum_to_n() {
    let samples = [
        "1 2 3 4 5",
        "7.5, 7.5, 7.5",
        "310 325 298 341 305 330 318 322 315 300 336 309",
    ];
    for text in samples {
        let s = summarize_text(text).unwrap();
        let total: usize = s.histogram.iter().map(|b| b.count).sum();
        assert_eq!(total, s.n, "sample {:?}", text);
    }
}

#[test]
fn mean_stress_reference_values() {
    let goodman = equivalent_stress(MeanStressModel::Goodman, 200.0, 50.0, 600.0, None).unwrap();
    assert!((goodman - 218.1818).abs() < 1e-3);

    let soderberg = equivalent_stress(MeanStressModel::Soderberg, 200.0, 50.0, 600.0, Some(450.0)).unwrap();
    assert!((soderberg - 225.0).abs() < 1e-9);
}

#[test]
fn cubic_cell_volume() {
    let v = cell_volume(CrystalSystem::Fcc, &LatticeParameters::cubic(4.05)).unwrap();
    assert!((v.0 - 66.43).abs() < 0.01);
}

#[test]
fn hv_to_hrc_is_bounded_or_flagged() {
    let mut hv = 50.0;
    while hv <= 2500.0 {
        match convert(hv, HardnessScale::Hv, HardnessScale::Hrc).unwrap() {
            HardnessReading::Value(hrc) => assert!((20.0..=70.0).contains(&hrc)),
            other => {
                let text = other.to_string();
                assert!(text == "< 20" || text == "> 70", "HV {} gave {}", hv, text);
            }
        }
        hv += 25.0;
    }
}

#[test]
fn registry_rejects_missing_and_non_finite_inputs() {
    for formula in ALL_FORMULAS {
        assert!(matches!(
            formula.evaluate(&FormulaInputs::new()),
            Err(CalcError::MissingField { .. })
        ));

        let poisoned: FormulaInputs = formula
            .metadata()
            .inputs
            .iter()
            .map(|i| (i.key.to_string(), f64::INFINITY))
            .collect();
        assert!(matches!(formula.evaluate(&poisoned), Err(CalcError::InvalidInput { .. })));
    }
    assert!(Formula::from_id("not-a-formula").is_err());
}
