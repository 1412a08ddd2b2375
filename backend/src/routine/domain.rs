//! Domain mapping
//!
//! Translates a requested range into the range an engine rule natively
//! integrates over. Semi-infinite ranges are mapped onto `(0, +inf)` through
//! [`Shifted`], a non-owning view `g(t) = f(sign * t + shift)`.

use num_complex::Complex64;

use super::params::{FamilyParameters, Orientation};
use crate::engine::Integrand;

/// Range in the form an engine rule expects
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NativeRange {
    /// `[a, b]`, both finite
    Finite { a: f64, b: f64 },
    /// `(-inf, +inf)`
    RealLine,
    /// `(0, +inf)` seen through a shift and mirror
    HalfLine(HalfLine),
}

/// Map of `(0, +inf)` onto a semi-infinite range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfLine {
    pub sign: f64,
    pub shift: f64,
}

impl HalfLine {
    pub fn new(orientation: Orientation, shift: f64) -> Self {
        Self {
            sign: orientation.sign(),
            shift,
        }
    }

    /// Point of the requested range corresponding to `t` in `(0, +inf)`
    pub fn map(&self, t: f64) -> f64 {
        self.sign * t + self.shift
    }

    pub fn view<'a, F: Integrand + ?Sized>(&self, inner: &'a mut F) -> Shifted<'a, F> {
        Shifted { inner, line: *self }
    }
}

impl NativeRange {
    /// Native range for already validated family parameters
    pub fn of(family: &FamilyParameters) -> Self {
        match *family {
            FamilyParameters::GaussKronrod { a, b, .. } | FamilyParameters::Trapezoidal { a, b } => {
                NativeRange::Finite { a, b }
            }
            FamilyParameters::SinhSinh => NativeRange::RealLine,
            FamilyParameters::ExpSinh { b, orientation } => {
                NativeRange::HalfLine(HalfLine::new(orientation, b))
            }
            FamilyParameters::TanhSinh { a, b } => match (a.is_finite(), b.is_finite()) {
                (true, true) => NativeRange::Finite { a, b },
                (true, false) => NativeRange::HalfLine(HalfLine::new(Orientation::Positive, a)),
                (false, true) => NativeRange::HalfLine(HalfLine::new(Orientation::Negative, b)),
                (false, false) => NativeRange::RealLine,
            },
        }
    }
}

/// Integrand seen through a [`HalfLine`]
pub struct Shifted<'a, F: ?Sized> {
    inner: &'a mut F,
    line: HalfLine,
}

impl<F: Integrand + ?Sized> Integrand for Shifted<'_, F> {
    type Error = F::Error;

    fn evaluate(&mut self, t: f64) -> Result<Complex64, F::Error> {
        self.inner.evaluate(self.line.map(t))
    }
}
