//! Composite trapezoidal rule with successive interval halving
//!
//! Level `l` uses `2^l` panels of width `(b - a) / 2^l`; each refinement
//! evaluates only the new midpoints. Very effective for periodic integrands
//! over a full period, slow otherwise.

use num_complex::Complex64;
use tracing::{trace, warn};

use super::{Estimate, Integrand, MIN_LEVELS};

/// Integrate `f` over the finite interval `[a, b]`
///
/// The error estimate is the difference between consecutive levels. With
/// `max_levels == 0` the single-panel trapezoid is returned and the error is
/// its gap to the midpoint rule.
pub fn integrate<F>(
    f: &mut F,
    a: f64,
    b: f64,
    max_levels: usize,
    tolerance: f64,
) -> Result<Estimate, F::Error>
where
    F: Integrand + ?Sized,
{
    let width = b - a;

    let y_a = f.evaluate(a)?;
    let y_b = f.evaluate(b)?;
    let mut value = (y_a + y_b) * (0.5 * width);
    let mut l1 = (y_a.norm() + y_b.norm()) * (0.5 * width);
    let mut error = f64::INFINITY;
    let mut level = 0;

    if max_levels == 0 {
        let midpoint = f.evaluate(a + 0.5 * width)? * width;
        error = (midpoint - value).norm();
    }

    while level < max_levels && (level + 1 < MIN_LEVELS || error > tolerance * l1) {
        level += 1;
        let panels = 1usize << level;
        let h = width / panels as f64;

        let mut sum = Complex64::new(0.0, 0.0);
        let mut abs_sum = 0.0;
        for j in (1..panels).step_by(2) {
            let y = f.evaluate(a + j as f64 * h)?;
            sum += y;
            abs_sum += y.norm();
        }

        let previous = value;
        value = previous * 0.5 + sum * h;
        l1 = l1 * 0.5 + abs_sum * h;
        error = (value - previous).norm();

        trace!(rule = "trapezoidal", level, ?value, error, "level complete");
    }

    if error > tolerance * l1 {
        warn!(
            rule = "trapezoidal",
            levels = level,
            error,
            l1_norm = l1,
            "refinement stopped before meeting tolerance"
        );
    }

    Ok(Estimate {
        value,
        error,
        l1_norm: l1,
        levels: Some(level),
    })
}
