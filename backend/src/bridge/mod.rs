//! Foreign-value bridge
//!
//! The integration core never touches a host runtime's values directly. It
//! talks to them through [`ForeignBridge`], which knows how to test, convert
//! and call opaque foreign objects.
//!
//! # Implementations
//!
//! - [`native::NativeBridge`]: in-process host runtime built on `Rc` values
//! - `ffi::types::PyBridge`: Python objects through PyO3 (feature `pyo3`)
//!
//! # Ownership
//!
//! `Object` is an owned handle. Cloning it takes a new foreign reference and
//! dropping it releases that reference, so every temporary taken during a
//! call is released on both success and error paths.

pub mod native;

use num_complex::Complex64;

/// Capability set the integration core needs from a host runtime
pub trait ForeignBridge {
    /// Owned, reference-counted handle to a foreign value
    type Object: Clone;
    /// Failure raised by the foreign runtime
    type Error: std::error::Error + 'static;

    /// Neutral value parked in the integration-variable slot between calls
    fn placeholder(&self) -> Self::Object;

    /// True for the runtime's "no value" object
    fn is_none(&self, object: &Self::Object) -> bool;

    fn is_callable(&self, object: &Self::Object) -> bool;

    /// Items of a finite ordered sequence, or `None` if `object` is not one
    fn sequence_items(&self, object: &Self::Object) -> Option<Vec<Self::Object>>;

    fn is_mapping(&self, object: &Self::Object) -> bool;

    fn to_real(&self, object: &Self::Object) -> Option<f64>;

    fn to_bool(&self, object: &Self::Object) -> Option<bool>;

    fn to_unsigned(&self, object: &Self::Object) -> Option<u64>;

    fn to_complex(&self, object: &Self::Object) -> Option<Complex64>;

    fn from_real(&self, x: f64) -> Result<Self::Object, Self::Error>;

    /// Invoke `callable` with positional `args` and optional keyword mapping
    fn call(
        &self,
        callable: &Self::Object,
        args: &[Self::Object],
        kwargs: Option<&Self::Object>,
    ) -> Result<Self::Object, Self::Error>;

    /// Short type description used in argument error messages
    fn type_name(&self, object: &Self::Object) -> String;
}

/// Raw routine input exactly as the host delivered it
#[derive(Debug, Clone)]
pub struct CallArgs<O> {
    pub positional: Vec<O>,
    pub keywords: Vec<(String, O)>,
}

impl<O> CallArgs<O> {
    pub fn new(positional: Vec<O>) -> Self {
        Self {
            positional,
            keywords: Vec::new(),
        }
    }

    /// Append a keyword argument (builder style)
    pub fn keyword(mut self, name: impl Into<String>, value: O) -> Self {
        self.keywords.push((name.into(), value));
        self
    }
}

impl<O> Default for CallArgs<O> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
