//! Quadrature engine
//!
//! Complex-valued quadrature rules over finite, semi-infinite and infinite
//! ranges. The engine knows nothing about foreign values: it repeatedly
//! evaluates an [`Integrand`] and stops at the first evaluation error,
//! returning that error unchanged.
//!
//! # Rule families
//!
//! - [`gauss_kronrod::GaussKronrod`]: fixed-order rules with adaptive bisection
//! - [`tanh_sinh`]: double-exponential rule on `[a, b]`
//! - [`sinh_sinh`]: double-exponential rule on `(-inf, +inf)`
//! - [`exp_sinh`]: double-exponential rule on `(0, +inf)`
//! - [`trapezoidal`]: successively halved composite trapezoid on `[a, b]`

mod double_exponential;
pub mod exp_sinh;
pub mod gauss_kronrod;
pub mod kronrod;
pub mod sinh_sinh;
pub mod tanh_sinh;
pub mod trapezoidal;

use num_complex::Complex64;

/// A unary complex-valued function of one real variable
pub trait Integrand {
    type Error;

    fn evaluate(&mut self, x: f64) -> Result<Complex64, Self::Error>;
}

impl<F, E> Integrand for F
where
    F: FnMut(f64) -> Result<Complex64, E>,
{
    type Error = E;

    fn evaluate(&mut self, x: f64) -> Result<Complex64, E> {
        self(x)
    }
}

/// Engine output for one integration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub value: Complex64,
    /// Absolute error estimate
    pub error: f64,
    /// Estimate of the integral of `|f|`
    pub l1_norm: f64,
    /// Refinement levels used (adaptive double-exponential and trapezoidal rules)
    pub levels: Option<usize>,
}

impl Estimate {
    /// True when the error estimate meets `tolerance` relative to the L1 norm
    pub fn converged(&self, tolerance: f64) -> bool {
        self.error <= tolerance * self.l1_norm
    }
}

/// Minimum number of refinement levels before convergence is trusted
pub(crate) const MIN_LEVELS: usize = 4;
