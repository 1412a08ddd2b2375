//! Sinh-sinh quadrature over the whole real line
//!
//! `x = sinh(π/2 sinh t)`; suited to integrands decaying at both infinities.

use std::f64::consts::FRAC_PI_2;

use super::double_exponential::{self, Ladder, Node};
use super::{Estimate, Integrand};

struct SinhSinh;

impl Ladder for SinhSinh {
    const NAME: &'static str = "sinh_sinh";

    fn node(&self, t: f64) -> Option<Node> {
        let u = FRAC_PI_2 * t.sinh();
        let x = u.sinh();
        let weight = FRAC_PI_2 * t.cosh() * u.cosh();

        (x.is_finite() && weight.is_finite()).then_some(Node { x, weight })
    }
}

/// Integrate `f` over `(-inf, +inf)`
pub fn integrate<F>(f: &mut F, max_levels: usize, tolerance: f64) -> Result<Estimate, F::Error>
where
    F: Integrand + ?Sized,
{
    double_exponential::integrate(f, &SinhSinh, max_levels, tolerance)
}
