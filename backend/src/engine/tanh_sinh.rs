//! Tanh-sinh quadrature on a finite interval
//!
//! `x = tanh(π/2 sinh t)` clusters nodes double-exponentially toward both
//! endpoints, which makes the rule robust against endpoint singularities.
//! Nodes are placed from the nearer endpoint using the complement
//! `1 - tanh|u|` so that they resolve close to `a` and `b`.

use std::f64::consts::FRAC_PI_2;

use super::double_exponential::{self, Ladder, Node};
use super::{Estimate, Integrand};

struct TanhSinh {
    a: f64,
    b: f64,
    half_width: f64,
}

impl Ladder for TanhSinh {
    const NAME: &'static str = "tanh_sinh";

    fn node(&self, t: f64) -> Option<Node> {
        let u = FRAC_PI_2 * t.sinh();
        let e = (-2.0 * u.abs()).exp();
        let complement = 2.0 * e / (1.0 + e);
        let weight = FRAC_PI_2 * t.cosh() * 4.0 * e / ((1.0 + e) * (1.0 + e)) * self.half_width;

        let x = if t >= 0.0 {
            self.b - self.half_width * complement
        } else {
            self.a + self.half_width * complement
        };

        (x > self.a && x < self.b && weight > 0.0).then_some(Node { x, weight })
    }
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
    let ladder = TanhSinh {
        a,
        b,
        half_width: 0.5 * (b - a),
    };
    double_exponential::integrate(f, &ladder, max_levels, tolerance)
}
