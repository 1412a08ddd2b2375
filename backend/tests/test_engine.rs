//! Tests for the quadrature engine
//!
//! Rules are driven directly with Rust closures; no host runtime involved.

use std::convert::Infallible;
use std::f64::consts::PI;

use kumquat::engine::gauss_kronrod::GaussKronrod;
use kumquat::engine::kronrod::KronrodTable;
use kumquat::engine::{exp_sinh, sinh_sinh, tanh_sinh, trapezoidal};
use num_complex::Complex64;

type Eval = Result<Complex64, Infallible>;

fn real(x: f64) -> Eval {
    Ok(Complex64::new(x, 0.0))
}

#[test]
fn test_kronrod_21_matches_reference_table() {
    // QUADPACK qk21: outermost node and weight
    let table = KronrodTable::compute(10);
    let last = table.abscissa().len() - 1;

    assert_eq!(table.points(), 21);
    assert!((table.abscissa()[last] - 0.995_657_163_025_808_1).abs() < 1e-12);
    assert!((table.kronrod_weights()[last] - 0.011_694_638_867_371_874).abs() < 1e-12);
    assert!((table.kronrod_weights()[0] - 0.149_445_554_002_916_9).abs() < 1e-12);
}

#[test]
fn test_kronrod_61_matches_reference_table() {
    // QUADPACK qk61: outermost node and weight
    let table = GaussKronrod::<61>::table();
    let last = table.abscissa().len() - 1;

    assert!((table.abscissa()[last] - 0.999_484_410_050_490_6).abs() < 1e-10);
    assert!((table.kronrod_weights()[last] - 0.001_389_013_698_677_007_6).abs() < 1e-10);
}

#[test]
fn test_kronrod_weights_integrate_constant() {
    for table in [
        GaussKronrod::<15>::table(),
        GaussKronrod::<31>::table(),
        GaussKronrod::<41>::table(),
        GaussKronrod::<51>::table(),
        GaussKronrod::<61>::table(),
    ] {
        // Symmetric half: centre counted once, other nodes twice
        let total: f64 = table
            .kronrod_weights()
            .iter()
            .enumerate()
            .map(|(i, w)| if i == 0 { *w } else { 2.0 * w })
            .sum();
        assert!((total - 2.0).abs() < 1e-12, "{} points: {total}", table.points());
    }
}

#[test]
fn test_gauss_kronrod_high_degree_polynomial() {
    // 61-point Kronrod rule is exact through degree 91
    let mut f = |x: f64| real(x.powi(40));
    let estimate = GaussKronrod::<61>::integrate(&mut f, -1.0, 1.0, 0, 1e-12).unwrap();
    assert!((estimate.value.re - 2.0 / 41.0).abs() < 1e-13);
}

#[test]
fn test_gauss_kronrod_complex_oscillation() {
    // ∫_0^1 e^{i 10 x} dx = (e^{10i} - 1) / (10i)
    let mut f = |x: f64| -> Eval { Ok(Complex64::new(0.0, 10.0 * x).exp()) };
    let estimate = GaussKronrod::<15>::integrate(&mut f, 0.0, 1.0, 15, 1e-12).unwrap();
    let exact = (Complex64::new(0.0, 10.0).exp() - 1.0) / Complex64::new(0.0, 10.0);

    assert!((estimate.value - exact).norm() < 1e-11);
    assert!(estimate.converged(1e-10));
}

#[test]
fn test_tanh_sinh_log_singularity() {
    // ∫_0^1 ln x dx = -1
    let mut f = |x: f64| real(x.ln());
    let estimate = tanh_sinh::integrate(&mut f, 0.0, 1.0, 15, 1e-10).unwrap();

    assert!((estimate.value.re + 1.0).abs() < 1e-9);
    assert!(estimate.l1_norm > 0.99);
}

#[test]
fn test_sinh_sinh_gaussian_cosine() {
    // ∫ e^{-x²} cos x dx = √π e^{-1/4}
    let mut f = |x: f64| real((-x * x).exp() * x.cos());
    let estimate = sinh_sinh::integrate(&mut f, 15, 1e-10).unwrap();
    let exact = PI.sqrt() * (-0.25f64).exp();

    assert!((estimate.value.re - exact).abs() < 1e-9);
    assert!(estimate.levels.is_some());
}

#[test]
fn test_exp_sinh_complex_exponential() {
    // ∫_0^∞ e^{-(1 - i) x} dx = 1 / (1 - i)
    let mut f = |x: f64| -> Eval { Ok((Complex64::new(-1.0, 1.0) * x).exp()) };
    let estimate = exp_sinh::integrate(&mut f, 15, 1e-10).unwrap();
    let exact = Complex64::new(0.5, 0.5);

    assert!((estimate.value - exact).norm() < 1e-8);
}

#[test]
fn test_trapezoidal_non_periodic_hits_level_cap() {
    let mut f = |x: f64| real(x.sqrt());
    let estimate = trapezoidal::integrate(&mut f, 0.0, 1.0, 5, 1e-14).unwrap();

    assert_eq!(estimate.levels, Some(5));
    assert!((estimate.value.re - 2.0 / 3.0).abs() < 1e-2);
    assert!(!estimate.converged(1e-14));
}

#[test]
fn test_double_exponential_respects_level_cap() {
    let mut calls = 0usize;
    let mut f = |x: f64| -> Eval {
        calls += 1;
        real((30.0 * x).sin())
    };
    let estimate = tanh_sinh::integrate(&mut f, 0.0, 10.0, 2, 1e-15).unwrap();

    assert_eq!(estimate.levels, Some(2));
    assert!(calls > 0);
}

#[test]
fn test_first_error_is_returned_unchanged() {
    let mut calls = 0usize;
    let mut f = |x: f64| -> Result<Complex64, String> {
        calls += 1;
        if calls == 20 {
            Err(format!("failed at {x}"))
        } else {
            Ok(Complex64::new(1.0, 0.0))
        }
    };
    let err = sinh_sinh::integrate(&mut f, 15, 1e-10).unwrap_err();

    assert!(err.starts_with("failed at"));
    assert_eq!(calls, 20);
}
