//! Adaptive Gauss-Kronrod quadrature
//!
//! Each supported point count is its own type, `GaussKronrod<N>`, with its
//! own cached table. Only N in {15, 31, 41, 51, 61} has an implementation.
//!
//! The rule is applied to `[a, b]`; while the difference between the
//! Kronrod and embedded Gauss estimates exceeds the tolerance the interval
//! is bisected, at most `max_levels` times along any branch.

use std::sync::OnceLock;

use num_complex::Complex64;
use tracing::{trace, warn};

use super::kronrod::KronrodTable;
use super::{Estimate, Integrand};

/// Gauss-Kronrod rule with `N` Kronrod points
#[derive(Debug, Clone, Copy, Default)]
pub struct GaussKronrod<const N: usize>;

macro_rules! kronrod_rule {
    ($($points:literal),* $(,)?) => {
        $(
            impl GaussKronrod<$points> {
                /// Cached node/weight table for this order
                pub fn table() -> &'static KronrodTable {
                    static TABLE: OnceLock<KronrodTable> = OnceLock::new();
                    TABLE.get_or_init(|| KronrodTable::compute(($points - 1) / 2))
                }

                /// Integrate `f` over the finite interval `[a, b]`
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
                    adaptive(f, Self::table(), a, b, max_levels, tolerance)
                }
            }
        )*
    };
}

kronrod_rule!(15, 31, 41, 51, 61);

/// Rule applied once to a sub-interval
struct Segment {
    kronrod: Complex64,
    gauss: Complex64,
    l1: f64,
}

impl Segment {
    fn error(&self) -> f64 {
        (self.kronrod - self.gauss)
            .norm()
            .max(2.0 * f64::EPSILON * self.kronrod.norm())
    }
}

#[derive(Default)]
struct Accumulator {
    error: f64,
    l1: f64,
    unresolved: usize,
}

fn adaptive<F>(
    f: &mut F,
    table: &KronrodTable,
    a: f64,
    b: f64,
    max_levels: usize,
    tolerance: f64,
) -> Result<Estimate, F::Error>
where
    F: Integrand + ?Sized,
{
    let mut acc = Accumulator::default();
    let value = subdivide(f, table, a, b, max_levels, tolerance, 0.0, &mut acc)?;

    if acc.unresolved > 0 {
        warn!(
            points = table.points(),
            unresolved = acc.unresolved,
            error = acc.error,
            "gauss_kronrod reached max_levels before meeting tolerance"
        );
    }

    Ok(Estimate {
        value,
        error: acc.error,
        l1_norm: acc.l1,
        levels: None,
    })
}

#[allow(clippy::too_many_arguments)]
fn subdivide<F>(
    f: &mut F,
    table: &KronrodTable,
    a: f64,
    b: f64,
    levels_left: usize,
    tolerance: f64,
    abs_tolerance: f64,
    acc: &mut Accumulator,
) -> Result<Complex64, F::Error>
where
    F: Integrand + ?Sized,
{
    let segment = apply(f, table, a, b)?;
    let error = segment.error();
    let rel_tolerance = tolerance * segment.kronrod.norm();
    // The first application fixes the absolute target shared by all pieces
    let abs_tolerance = if abs_tolerance == 0.0 {
        rel_tolerance
    } else {
        abs_tolerance
    };

    if error > rel_tolerance && error > abs_tolerance {
        if levels_left > 0 {
            let mid = 0.5 * (a + b);
            trace!(a, b, error, levels_left, "gauss_kronrod bisecting");
            let left = subdivide(
                f,
                table,
                a,
                mid,
                levels_left - 1,
                tolerance,
                abs_tolerance / 2.0,
                acc,
            )?;
            let right = subdivide(
                f,
                table,
                mid,
                b,
                levels_left - 1,
                tolerance,
                abs_tolerance / 2.0,
                acc,
            )?;
            return Ok(left + right);
        }
        acc.unresolved += 1;
    }

    acc.error += error;
    acc.l1 += segment.l1;
    Ok(segment.kronrod)
}

fn apply<F>(f: &mut F, table: &KronrodTable, a: f64, b: f64) -> Result<Segment, F::Error>
where
    F: Integrand + ?Sized,
{
    let center = 0.5 * (a + b);
    let half = 0.5 * (b - a);

    let mut kronrod = Complex64::new(0.0, 0.0);
    let mut gauss = Complex64::new(0.0, 0.0);
    let mut l1 = 0.0;

    let nodes = table
        .abscissa()
        .iter()
        .zip(table.kronrod_weights())
        .zip(table.gauss_weights());

    for (i, ((&x, &wk), &wg)) in nodes.enumerate() {
        if i == 0 {
            let y = f.evaluate(center)?;
            kronrod += y * wk;
            gauss += y * wg;
            l1 += y.norm() * wk;
        } else {
            let y_left = f.evaluate(center - half * x)?;
            let y_right = f.evaluate(center + half * x)?;
            let sum = y_left + y_right;
            kronrod += sum * wk;
            gauss += sum * wg;
            l1 += (y_left.norm() + y_right.norm()) * wk;
        }
    }

    Ok(Segment {
        kronrod: kronrod * half,
        gauss: gauss * half,
        l1: l1 * half.abs(),
    })
}
