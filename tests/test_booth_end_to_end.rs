//! End-to-end runs over the function catalog.

use interval_bnb::{functions, MinimizeBuilder};

#[test]
fn test_booth_threshold_1e3() {
    let problem = functions::lookup("booth").unwrap();
    let result = MinimizeBuilder::from_problem(&problem)
        .threshold(0.001)
        .minimize()
        .unwrap();

    assert!(result.min_ub >= 0.0);
    assert!(result.min_ub < 1e-4, "min_ub = {}", result.min_ub);
    assert!(
        result.minimizers.iter().any(|m| m.contains_point(1.0, 3.0)),
        "no surviving box contains (1, 3)"
    );
    for m in &result.minimizers {
        assert!(m.x().width() <= 0.001);
        assert!(m.lower_bound() <= result.min_ub);
        // Every survivor sits close to the unique minimizer.
        assert!((m.x().mid() - 1.0).abs() < 0.05, "{}", m);
        assert!((m.y().mid() - 3.0).abs() < 0.05, "{}", m);
    }
    assert_eq!(result.stats.unresolved, 0);
}

#[test]
fn test_catalog_minima_are_bracketed() {
    for problem in functions::all() {
        let result = MinimizeBuilder::from_problem(&problem)
            .threshold(0.01)
            .minimize()
            .unwrap();
        let lb = result.min_lb().unwrap();
        assert!(
            lb <= problem.minimum && problem.minimum <= result.min_ub,
            "{}: [{}, {}] does not bracket {}",
            problem.name,
            lb,
            result.min_ub,
            problem.minimum
        );
        let (ax, ay) = problem.argmin;
        assert!(
            result.minimizers.iter().any(|m| m.contains_point(ax, ay)),
            "{}: minimizer ({}, {}) lost",
            problem.name,
            ax,
            ay
        );
    }
}

#[test]
fn test_report_format() {
    let problem = functions::lookup("booth").unwrap();
    let result = MinimizeBuilder::from_problem(&problem)
        .threshold(0.1)
        .parallel(false)
        .minimize()
        .unwrap();
    let report = result.to_string();
    let mut lines = report.lines();
    assert_eq!(
        lines.next(),
        Some(format!("Number of minimizers: {}", result.minimizers.len()).as_str())
    );
    assert!(lines.next().unwrap().starts_with("Upper bound for minimum: "));
}
