//! Kumquat Core - Rust Engine
//!
//! Complex-valued numerical integration of black-box callables.
//!
//! # Architecture
//!
//! - **bridge**: Foreign-value capability set and the in-process host runtime
//! - **integrand**: Wraps a foreign callable into a native integrand
//! - **routine**: Parameter parsing, domain mapping, rule selection, dispatch
//! - **engine**: Gauss-Kronrod, double-exponential and trapezoidal rules
//! - **error**: Unified error taxonomy
//!
//! # Critical Invariants
//!
//! 1. Parameters are fully validated before the first integrand evaluation
//! 2. The integrand adapter's argument slot is restored on every exit path
//! 3. An integrand failure aborts the call and surfaces unchanged
//! 4. FFI boundary is minimal and safe

// Module declarations
pub mod bridge;
pub mod engine;
pub mod error;
pub mod integrand;
pub mod routine;

// Re-exports for convenience
pub use bridge::{CallArgs, ForeignBridge};
pub use engine::{Estimate, Integrand};
pub use error::IntegrationError;
pub use integrand::IntegrandAdapter;
pub use routine::{
    dispatch::{integrate, run},
    Diagnostics, FamilyParameters, Integral, Orientation, QuadratureOptions, Routine,
    RoutineParameters, RuleOrder,
};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

/// Complex-valued quadrature of Python callables
///
/// Routines: gauss_kronrod, tanh_sinh, sinh_sinh, exp_sinh, trapezoidal.
/// Each returns `(value, error)`, or `(value, error, diagnostics)` when
/// called with `full_output=True`.
#[cfg(feature = "pyo3")]
#[pymodule]
fn kumquat(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(ffi::routines::gauss_kronrod, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::routines::tanh_sinh, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::routines::sinh_sinh, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::routines::exp_sinh, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::routines::trapezoidal, m)?)?;
    Ok(())
}
