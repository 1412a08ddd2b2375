//! Integrand adapter
//!
//! Wraps a foreign callable and its fixed extra arguments into a native
//! `f(x: f64) -> Complex64` that the quadrature engine can call repeatedly.
//!
//! # Argument container
//!
//! The adapter owns a boxed slice of `1 + extra_arg_count` foreign objects.
//! Its length never changes. Slot 0 holds the integration variable only for
//! the duration of one call and is restored to the neutral placeholder by a
//! drop guard, so it is reset on every exit path: normal return, foreign
//! error, or unwinding panic.
//!
//! # Ownership
//!
//! The adapter holds its own reference to the callable and to each extra
//! argument. Cloning an adapter shares the callable (one more reference) but
//! copies the argument container, so no two adapters share mutable state.

use num_complex::Complex64;

use crate::bridge::ForeignBridge;
use crate::engine::Integrand;
use crate::error::IntegrationError;

/// A foreign callable bound to its fixed extra arguments
pub struct IntegrandAdapter<'b, B: ForeignBridge> {
    bridge: &'b B,
    callable: B::Object,
    arguments: Box<[B::Object]>,
    kwargs: Option<B::Object>,
}

impl<'b, B: ForeignBridge> IntegrandAdapter<'b, B> {
    /// Wrap `callable` with optional extra positional and keyword arguments
    ///
    /// A foreign "None" for `args` or `kwargs` is treated as absent.
    ///
    /// # Errors
    ///
    /// - `NotCallable` if `callable` cannot be invoked
    /// - `ArgsNotSequence` if `args` is not a finite ordered sequence
    /// - `KwargsNotMapping` if `kwargs` is not a key/value mapping
    pub fn new(
        bridge: &'b B,
        callable: &B::Object,
        args: Option<&B::Object>,
        kwargs: Option<&B::Object>,
    ) -> Result<Self, IntegrationError<B::Error>> {
        if !bridge.is_callable(callable) {
            return Err(IntegrationError::NotCallable);
        }

        let extra = match args.filter(|a| !bridge.is_none(a)) {
            Some(sequence) => bridge
                .sequence_items(sequence)
                .ok_or(IntegrationError::<B::Error>::ArgsNotSequence)?,
            None => Vec::new(),
        };

        let kwargs = match kwargs.filter(|k| !bridge.is_none(k)) {
            Some(mapping) if bridge.is_mapping(mapping) => Some(mapping.clone()),
            Some(_) => return Err(IntegrationError::KwargsNotMapping),
            None => None,
        };

        let arguments: Box<[B::Object]> = std::iter::once(bridge.placeholder())
            .chain(extra)
            .collect();

        Ok(Self {
            bridge,
            callable: callable.clone(),
            arguments,
            kwargs,
        })
    }

    /// Evaluate the wrapped callable at `x`
    ///
    /// # Errors
    ///
    /// - `ValueConversionFailed` if `x` cannot be turned into a foreign number
    /// - `IntegrandRaised` carrying the callable's own error unchanged
    /// - `ResultNotComplex` if the returned value is not complex-convertible
    pub fn call(&mut self, x: f64) -> Result<Complex64, IntegrationError<B::Error>> {
        let point = self
            .bridge
            .from_real(x)
            .map_err(|e| IntegrationError::<B::Error>::ValueConversionFailed {
                value: x,
                message: e.to_string(),
            })?;

        let returned = {
            let slot = ArgumentSlot::bind(&mut self.arguments, point, self.bridge.placeholder());
            self.bridge
                .call(&self.callable, slot.arguments(), self.kwargs.as_ref())
        };

        let returned = returned.map_err(IntegrationError::IntegrandRaised)?;
        self.bridge
            .to_complex(&returned)
            .ok_or(IntegrationError::ResultNotComplex)
    }

    /// Number of fixed extra positional arguments
    pub fn extra_arg_count(&self) -> usize {
        self.arguments.len() - 1
    }

    /// Full argument container, slot 0 included
    pub fn arguments(&self) -> &[B::Object] {
        &self.arguments
    }

    /// True when slot 0 holds the neutral placeholder
    pub fn is_idle(&self) -> bool {
        self.bridge.is_none(&self.arguments[0])
    }

    pub fn callable(&self) -> &B::Object {
        &self.callable
    }

    pub fn kwargs(&self) -> Option<&B::Object> {
        self.kwargs.as_ref()
    }
}

impl<B: ForeignBridge> Clone for IntegrandAdapter<'_, B> {
    fn clone(&self) -> Self {
        Self {
            bridge: self.bridge,
            callable: self.callable.clone(),
            arguments: self.arguments.clone(),
            kwargs: self.kwargs.clone(),
        }
    }
}

impl<B: ForeignBridge> Integrand for IntegrandAdapter<'_, B> {
    type Error = IntegrationError<B::Error>;

    fn evaluate(&mut self, x: f64) -> Result<Complex64, Self::Error> {
        self.call(x)
    }
}

/// Slot 0 bound to the integration variable for one call
struct ArgumentSlot<'a, O> {
    arguments: &'a mut [O],
    placeholder: Option<O>,
}

impl<'a, O> ArgumentSlot<'a, O> {
    fn bind(arguments: &'a mut [O], value: O, placeholder: O) -> Self {
        arguments[0] = value;
        Self {
            arguments,
            placeholder: Some(placeholder),
        }
    }

    fn arguments(&self) -> &[O] {
        self.arguments
    }
}

impl<O> Drop for ArgumentSlot<'_, O> {
    fn drop(&mut self) {
        if let Some(placeholder) = self.placeholder.take() {
            self.arguments[0] = placeholder;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::native::{NativeBridge, Value};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_slot_restored_after_panic() {
        let bridge = NativeBridge;
        let f = Value::function("panics", |_args, _kwargs| panic!("integrand panicked"));
        let mut adapter = IntegrandAdapter::new(&bridge, &f, None, None).unwrap();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| adapter.call(1.0)));
        assert!(result.is_err());
        assert!(adapter.is_idle());
    }

    #[test]
    fn test_callable_sees_point_in_slot_zero() {
        let bridge = NativeBridge;
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let f = Value::function("record", move |args, _kwargs| {
            log.borrow_mut().push(args.to_vec());
            Ok(Value::Int(0))
        });
        let extra = Value::tuple([Value::Int(7)]);
        let mut adapter = IntegrandAdapter::new(&bridge, &f, Some(&extra), None).unwrap();

        adapter.call(0.25).unwrap();

        assert_eq!(seen.borrow()[0], vec![Value::Float(0.25), Value::Int(7)]);
        assert!(adapter.is_idle());
        assert_eq!(adapter.extra_arg_count(), 1);
    }

    #[test]
    fn test_none_args_and_kwargs_are_absent() {
        let bridge = NativeBridge;
        let f = Value::function("zero", |_args, _kwargs| Ok(Value::Int(0)));
        let adapter =
            IntegrandAdapter::new(&bridge, &f, Some(&Value::None), Some(&Value::None)).unwrap();

        assert_eq!(adapter.arguments().len(), 1);
        assert!(adapter.kwargs().is_none());
    }

    #[test]
    fn test_conversion_of_result() {
        let bridge = NativeBridge;
        let f = Value::function("text", |_args, _kwargs| Ok(Value::str("nope")));
        let mut adapter = IntegrandAdapter::new(&bridge, &f, None, None).unwrap();

        assert!(matches!(
            adapter.call(0.0),
            Err(IntegrationError::ResultNotComplex)
        ));
    }
}
