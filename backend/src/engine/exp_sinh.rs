//! Exp-sinh quadrature over the half line `(0, +inf)`
//!
//! `x = exp(π/2 sinh t)`; other half lines are reached by shifting or
//! mirroring the integrand before it gets here.

use std::f64::consts::FRAC_PI_2;

use super::double_exponential::{self, Ladder, Node};
use super::{Estimate, Integrand};

struct ExpSinh;

impl Ladder for ExpSinh {
    const NAME: &'static str = "exp_sinh";

    fn node(&self, t: f64) -> Option<Node> {
        let x = (FRAC_PI_2 * t.sinh()).exp();
        let weight = FRAC_PI_2 * t.cosh() * x;

        (x > 0.0 && x.is_finite() && weight.is_finite()).then_some(Node { x, weight })
    }
}

/// Integrate `f` over `(0, +inf)`
pub fn integrate<F>(f: &mut F, max_levels: usize, tolerance: f64) -> Result<Estimate, F::Error>
where
    F: Integrand + ?Sized,
{
    double_exponential::integrate(f, &ExpSinh, max_levels, tolerance)
}
