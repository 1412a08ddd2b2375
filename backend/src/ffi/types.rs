//! Type conversion utilities for the FFI boundary
//!
//! Implements [`ForeignBridge`] for Python objects and converts routine input
//! and output between PyO3 types (PyTuple, PyDict, PyComplex) and the core's
//! host-neutral types.

use num_complex::Complex64;
use pyo3::exceptions::{PyTypeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyComplex, PyDict, PyFloat, PyList, PyTuple};

use crate::bridge::{CallArgs, ForeignBridge};
use crate::error::IntegrationError;
use crate::routine::{DiagnosticValue, Integral};

// ========================================================================
// Python bridge
// ========================================================================

/// [`ForeignBridge`] over Python objects held by the current GIL token
#[derive(Clone, Copy)]
pub struct PyBridge<'py> {
    py: Python<'py>,
}

impl<'py> PyBridge<'py> {
    pub fn new(py: Python<'py>) -> Self {
        Self { py }
    }
}

impl<'py> ForeignBridge for PyBridge<'py> {
    type Object = Bound<'py, PyAny>;
    type Error = PyErr;

    fn placeholder(&self) -> Self::Object {
        self.py.None().into_bound(self.py)
    }

    fn is_none(&self, object: &Self::Object) -> bool {
        object.is_none()
    }

    fn is_callable(&self, object: &Self::Object) -> bool {
        object.is_callable()
    }

    /// Items of a tuple or list
    fn sequence_items(&self, object: &Self::Object) -> Option<Vec<Self::Object>> {
        if let Ok(tuple) = object.downcast::<PyTuple>() {
            return Some(tuple.iter().collect());
        }
        object
            .downcast::<PyList>()
            .ok()
            .map(|list| list.iter().collect())
    }

    fn is_mapping(&self, object: &Self::Object) -> bool {
        object.is_instance_of::<PyDict>()
    }

    fn to_real(&self, object: &Self::Object) -> Option<f64> {
        object.extract::<f64>().ok()
    }

    /// Python truthiness, as the `p` argument format
    fn to_bool(&self, object: &Self::Object) -> Option<bool> {
        object.is_truthy().ok()
    }

    fn to_unsigned(&self, object: &Self::Object) -> Option<u64> {
        object.extract::<u64>().ok()
    }

    /// Follows `complex()`: `__complex__`, then `__float__`, then `__index__`
    fn to_complex(&self, object: &Self::Object) -> Option<Complex64> {
        object.extract::<Complex64>().ok()
    }

    fn from_real(&self, x: f64) -> Result<Self::Object, PyErr> {
        Ok(PyFloat::new(self.py, x).into_any())
    }

    fn call(
        &self,
        callable: &Self::Object,
        args: &[Self::Object],
        kwargs: Option<&Self::Object>,
    ) -> Result<Self::Object, PyErr> {
        let args = PyTuple::new(self.py, args)?;
        let kwargs = kwargs.map(|k| k.downcast::<PyDict>()).transpose()?;
        callable.call(args, kwargs)
    }

    fn type_name(&self, object: &Self::Object) -> String {
        object
            .get_type()
            .name()
            .map(|name| name.to_string())
            .unwrap_or_else(|_| "object".to_string())
    }
}

// ========================================================================
// Input
// ========================================================================

/// Collect `*args` / `**kwargs` into the core's raw input form
///
/// # Errors
///
/// Returns TypeError if a keyword name is not a string
pub fn call_args_from_py<'py>(
    args: &Bound<'py, PyTuple>,
    kwargs: Option<&Bound<'py, PyDict>>,
) -> PyResult<CallArgs<Bound<'py, PyAny>>> {
    let mut input = CallArgs::new(args.iter().collect());
    if let Some(kwargs) = kwargs {
        for (key, value) in kwargs.iter() {
            let name: String = key.extract()?;
            input = input.keyword(name, value);
        }
    }
    Ok(input)
}

// ========================================================================
// Output
// ========================================================================

/// Convert a routine result to `(complex, float)` or `(complex, float, dict)`
pub fn integral_to_py<'py>(py: Python<'py>, integral: &Integral) -> PyResult<Bound<'py, PyTuple>> {
    let value = PyComplex::from_doubles(py, integral.value.re, integral.value.im).into_any();
    let error = PyFloat::new(py, integral.error).into_any();

    match &integral.diagnostics {
        None => PyTuple::new(py, [value, error]),
        Some(diagnostics) => {
            let dict = PyDict::new(py);
            for (key, entry) in diagnostics.entries() {
                match entry {
                    DiagnosticValue::Real(x) => dict.set_item(key, x)?,
                    DiagnosticValue::Count(n) => dict.set_item(key, n)?,
                    DiagnosticValue::Reals(xs) => dict.set_item(key, PyList::new(py, xs)?)?,
                }
            }
            PyTuple::new(py, [value, error, dict.into_any()])
        }
    }
}

/// Map an integration failure onto a Python exception
///
/// - `IntegrandRaised`: the integrand's own exception, unchanged
/// - `ArgumentParse`: TypeError
/// - everything else: ValueError
impl From<IntegrationError<PyErr>> for PyErr {
    fn from(err: IntegrationError<PyErr>) -> PyErr {
        match err {
            IntegrationError::IntegrandRaised(original) => original,
            IntegrationError::ArgumentParse { .. } => PyTypeError::new_err(err.to_string()),
            other => PyValueError::new_err(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bridge_conversions() {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|py| {
            let bridge = PyBridge::new(py);

            let seven = 7i64.into_pyobject(py).unwrap().into_any();
            assert_eq!(bridge.to_complex(&seven), Some(Complex64::new(7.0, 0.0)));
            assert_eq!(bridge.to_unsigned(&seven), Some(7));
            assert_eq!(bridge.type_name(&seven), "int");

            let text = "x".into_pyobject(py).unwrap().into_any();
            assert_eq!(bridge.to_complex(&text), None);
            assert!(!bridge.is_callable(&text));

            assert_eq!(bridge.to_bool(&seven), Some(true));
            let zero = 0i64.into_pyobject(py).unwrap().into_any();
            assert_eq!(bridge.to_bool(&zero), Some(false));

            let list = PyList::new(py, [1.0, 2.0]).unwrap().into_any();
            assert_eq!(bridge.sequence_items(&list).map(|v| v.len()), Some(2));
            assert!(bridge.is_none(&bridge.placeholder()));
        });
    }

    #[test]
    fn test_error_mapping() {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|py| {
            let parse: PyErr = IntegrationError::<PyErr>::ArgumentParse {
                routine: "sinh_sinh",
                message: "takes 1 positional argument but 3 were given".into(),
            }
            .into();
            assert!(parse.is_instance_of::<PyTypeError>(py));

            let bounds: PyErr = IntegrationError::<PyErr>::InvalidBounds { a: 1.0, b: 0.0 }.into();
            assert!(bounds.is_instance_of::<PyValueError>(py));

            let original = pyo3::exceptions::PyZeroDivisionError::new_err("division by zero");
            let raised: PyErr = IntegrationError::IntegrandRaised(original).into();
            assert!(raised.is_instance_of::<pyo3::exceptions::PyZeroDivisionError>(py));
        });
    }
}
