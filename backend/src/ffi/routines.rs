//! PyO3 wrappers for the integration routines
//!
//! Every routine accepts `(*args, **kwargs)` and binds them itself, so the
//! argument rules and error messages are the same as when the routines are
//! driven from Rust.

use pyo3::prelude::*;
use pyo3::types::{PyDict, PyTuple};

use super::types::{call_args_from_py, integral_to_py, PyBridge};
use crate::routine::{dispatch, Routine};

fn run<'py>(
    py: Python<'py>,
    routine: Routine,
    args: &Bound<'py, PyTuple>,
    kwargs: Option<&Bound<'py, PyDict>>,
) -> PyResult<Bound<'py, PyTuple>> {
    let input = call_args_from_py(args, kwargs)?;
    let integral = dispatch::integrate(&PyBridge::new(py), routine, input)?;
    integral_to_py(py, &integral)
}

/// Integrate a complex-valued function over [a, b] with an adaptive
/// Gauss-Kronrod rule
///
/// # Arguments
///
/// * `f` - callable `f(x, *args, **kwargs)` returning a complex number
/// * `a`, `b` - finite bounds with `b > a`
/// * `args` - extra positional arguments for `f` (tuple or list)
/// * `kwargs` - extra keyword arguments for `f` (dict)
/// * `full_output` - also return a diagnostics dict (keyword only)
/// * `max_levels` - maximum bisection depth, default 15 (keyword only)
/// * `tolerance` - relative error target, default sqrt(machine epsilon) (keyword only)
/// * `points` - rule size, one of 15, 31, 41, 51, 61, default 31 (keyword only)
///
/// # Returns
///
/// `(value, error)` or `(value, error, {"L1 norm", "abscissa", "weights"})`
///
/// # Example (from Python)
///
/// ```python
/// from kumquat import gauss_kronrod
///
/// value, error = gauss_kronrod(lambda x: x * x, 0.0, 1.0, points=15)
/// ```
#[pyfunction]
#[pyo3(
    signature = (*args, **kwargs),
    text_signature = "(f, a, b, args=(), kwargs={}, *, full_output=False, max_levels=15, tolerance=None, points=31)"
)]
pub fn gauss_kronrod<'py>(
    py: Python<'py>,
    args: &Bound<'py, PyTuple>,
    kwargs: Option<&Bound<'py, PyDict>>,
) -> PyResult<Bound<'py, PyTuple>> {
    run(py, Routine::GaussKronrod, args, kwargs)
}

/// Integrate a complex-valued function over [a, b] with the tanh-sinh rule
///
/// Endpoint singularities are handled well. Either bound may be infinite,
/// in which case the range is integrated with sinh-sinh or exp-sinh.
///
/// # Returns
///
/// `(value, error)` or `(value, error, {"L1 norm", "levels"})`
#[pyfunction]
#[pyo3(
    signature = (*args, **kwargs),
    text_signature = "(f, a, b, args=(), kwargs={}, *, full_output=False, max_levels=15, tolerance=None)"
)]
pub fn tanh_sinh<'py>(
    py: Python<'py>,
    args: &Bound<'py, PyTuple>,
    kwargs: Option<&Bound<'py, PyDict>>,
) -> PyResult<Bound<'py, PyTuple>> {
    run(py, Routine::TanhSinh, args, kwargs)
}

/// Integrate a complex-valued function over the whole real line with the
/// sinh-sinh rule
///
/// Takes no bounds; `args` and `kwargs` are keyword only.
#[pyfunction]
#[pyo3(
    signature = (*args, **kwargs),
    text_signature = "(f, *, args=(), kwargs={}, full_output=False, max_levels=15, tolerance=None)"
)]
pub fn sinh_sinh<'py>(
    py: Python<'py>,
    args: &Bound<'py, PyTuple>,
    kwargs: Option<&Bound<'py, PyDict>>,
) -> PyResult<Bound<'py, PyTuple>> {
    run(py, Routine::SinhSinh, args, kwargs)
}

/// Integrate a complex-valued function over a half-line with the exp-sinh rule
///
/// The range is `(b, +inf)` when `interval_infinity` is positive and
/// `(-inf, b)` when it is negative. Zero is rejected.
#[pyfunction]
#[pyo3(
    signature = (*args, **kwargs),
    text_signature = "(f, b, args=(), kwargs={}, interval_infinity=1.0, *, full_output=False, max_levels=15, tolerance=None)"
)]
pub fn exp_sinh<'py>(
    py: Python<'py>,
    args: &Bound<'py, PyTuple>,
    kwargs: Option<&Bound<'py, PyDict>>,
) -> PyResult<Bound<'py, PyTuple>> {
    run(py, Routine::ExpSinh, args, kwargs)
}

/// Integrate a complex-valued function over [a, b] with the trapezoidal rule
///
/// Converges fastest for smooth periodic integrands over a full period.
#[pyfunction]
#[pyo3(
    signature = (*args, **kwargs),
    text_signature = "(f, a, b, args=(), kwargs={}, *, full_output=False, max_levels=12, tolerance=None)"
)]
pub fn trapezoidal<'py>(
    py: Python<'py>,
    args: &Bound<'py, PyTuple>,
    kwargs: Option<&Bound<'py, PyDict>>,
) -> PyResult<Bound<'py, PyTuple>> {
    run(py, Routine::Trapezoidal, args, kwargs)
}
