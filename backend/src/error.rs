//! Unified error taxonomy for every integration routine
//!
//! Each failed routine call surfaces exactly one [`IntegrationError`], carrying
//! the most specific kind available. The type is generic over the foreign
//! runtime's own error so that a failure raised by the integrand can travel
//! back to the caller untouched.

use thiserror::Error;

/// Errors raised while parsing, validating, or running an integration routine
///
/// `E` is the foreign runtime's error type (for Python, `PyErr`).
#[derive(Debug, Error)]
pub enum IntegrationError<E: std::error::Error + 'static> {
    /// Malformed, missing, duplicated, or unknown argument
    #[error("{routine}() {message}")]
    ArgumentParse {
        routine: &'static str,
        message: String,
    },

    #[error("Invalid interval [{a}, {b}]: upper bound must be strictly greater than lower bound")]
    InvalidBounds { a: f64, b: f64 },

    #[error("Invalid interval_infinity {sign}: must be non-zero and not NaN")]
    InvalidOrientation { sign: f64 },

    #[error("Invalid number of points {points}: must be one of 15, 31, 41, 51 or 61")]
    InvalidRuleOrder { points: u64 },

    #[error("Invalid tolerance {tolerance}: must be finite and strictly positive")]
    InvalidTolerance { tolerance: f64 },

    #[error("Unable to wrap uncallable object as an integrand")]
    NotCallable,

    #[error("The extra arguments passed to the integrand must be a tuple or list")]
    ArgsNotSequence,

    #[error("The extra keyword arguments passed to the integrand must be a dict")]
    KwargsNotMapping,

    #[error("Unable to convert {value} to a foreign number: {message}")]
    ValueConversionFailed { value: f64, message: String },

    /// The integrand itself failed; the foreign error is kept as-is
    #[error(transparent)]
    IntegrandRaised(E),

    #[error("The integrand returned a value that could not be converted to complex")]
    ResultNotComplex,
}

impl<E: std::error::Error + 'static> IntegrationError<E> {
    pub(crate) fn parse(routine: &'static str, message: impl Into<String>) -> Self {
        Self::ArgumentParse {
            routine,
            message: message.into(),
        }
    }

    /// Returns true when the error originated inside the integrand
    pub fn is_integrand_failure(&self) -> bool {
        matches!(self, Self::IntegrandRaised(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Boom;

    impl fmt::Display for Boom {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "boom")
        }
    }

    impl std::error::Error for Boom {}

    #[test]
    fn test_error_display() {
        let err: IntegrationError<Boom> = IntegrationError::InvalidBounds { a: 2.0, b: 1.0 };
        assert!(err.to_string().contains("Invalid interval [2, 1]"));

        let err: IntegrationError<Boom> = IntegrationError::InvalidRuleOrder { points: 21 };
        assert!(err.to_string().contains("21"));

        let err: IntegrationError<Boom> = IntegrationError::parse("sinh_sinh", "takes 1 positional argument but 3 were given");
        assert_eq!(
            err.to_string(),
            "sinh_sinh() takes 1 positional argument but 3 were given"
        );
    }

    #[test]
    fn test_integrand_failure_is_transparent() {
        let err: IntegrationError<Boom> = IntegrationError::IntegrandRaised(Boom);
        assert_eq!(err.to_string(), "boom");
        assert!(err.is_integrand_failure());
        assert!(!IntegrationError::<Boom>::NotCallable.is_integrand_failure());
    }
}
