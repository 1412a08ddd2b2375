use serde::{Deserialize, Serialize};

use super::Routine;
use crate::error::IntegrationError;

/// Options shared by every routine
///
/// ```
/// use kumquat::{QuadratureOptions, Routine};
///
/// let options: QuadratureOptions = serde_json::from_str(r#"{"tolerance": 1e-10}"#).unwrap();
/// assert_eq!(options.tolerance, 1e-10);
/// assert_eq!(options.max_levels, 15);
/// assert_eq!(QuadratureOptions::for_routine(Routine::Trapezoidal).max_levels, 12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadratureOptions {
    /// Return the diagnostics bundle alongside the result
    pub full_output: bool,
    /// Adaptive depth limit (0 means a single, non-adaptive application)
    pub max_levels: usize,
    /// Relative error target
    pub tolerance: f64,
}

impl QuadratureOptions {
    pub fn default_tolerance() -> f64 {
        f64::EPSILON.sqrt()
    }

    pub fn for_routine(routine: Routine) -> Self {
        Self {
            full_output: false,
            max_levels: routine.default_max_levels(),
            tolerance: Self::default_tolerance(),
        }
    }

    pub fn with_full_output(mut self, full_output: bool) -> Self {
        self.full_output = full_output;
        self
    }

    pub fn with_max_levels(mut self, max_levels: usize) -> Self {
        self.max_levels = max_levels;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Reject tolerances that are not finite and strictly positive
    pub fn validate<E>(&self) -> Result<(), IntegrationError<E>>
    where
        E: std::error::Error + 'static,
    {
        if self.tolerance.is_finite() && self.tolerance > 0.0 {
            Ok(())
        } else {
            Err(IntegrationError::InvalidTolerance {
                tolerance: self.tolerance,
            })
        }
    }
}

impl Default for QuadratureOptions {
    fn default() -> Self {
        Self::for_routine(Routine::TanhSinh)
    }
}
