//! Typed routine parameters
//!
//! One parameter type covers all five routines: the shared fields live on
//! [`RoutineParameters`] and the per-family fields on [`FamilyParameters`].
//! Parameters are fully validated when parsed and immutable afterwards, so
//! no engine call is ever issued with an invalid configuration.
//!
//! The Gauss-Kronrod point count is only checked for being a non-negative
//! integer here. Membership in the supported set is resolved at dispatch by
//! [`RuleOrder`](super::selector::RuleOrder).

use serde::{Deserialize, Serialize};

use super::schema::BoundArguments;
use super::{QuadratureOptions, Routine};
use crate::bridge::{CallArgs, ForeignBridge};
use crate::error::IntegrationError;

/// Default Gauss-Kronrod point count
pub const DEFAULT_POINTS: u64 = 31;

/// Direction of a semi-infinite range, taken from the sign of `interval_infinity`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// `(b, +inf)`
    Positive,
    /// `(-inf, b)`
    Negative,
}

impl Orientation {
    /// `None` for zero or NaN
    pub fn from_sign(sign: f64) -> Option<Self> {
        if sign > 0.0 {
            Some(Orientation::Positive)
        } else if sign < 0.0 {
            Some(Orientation::Negative)
        } else {
            None
        }
    }

    pub fn sign(self) -> f64 {
        match self {
            Orientation::Positive => 1.0,
            Orientation::Negative => -1.0,
        }
    }
}

/// Per-family fields
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum FamilyParameters {
    GaussKronrod { a: f64, b: f64, points: u64 },
    TanhSinh { a: f64, b: f64 },
    SinhSinh,
    ExpSinh { b: f64, orientation: Orientation },
    Trapezoidal { a: f64, b: f64 },
}

impl FamilyParameters {
    pub fn routine(&self) -> Routine {
        match self {
            FamilyParameters::GaussKronrod { .. } => Routine::GaussKronrod,
            FamilyParameters::TanhSinh { .. } => Routine::TanhSinh,
            FamilyParameters::SinhSinh => Routine::SinhSinh,
            FamilyParameters::ExpSinh { .. } => Routine::ExpSinh,
            FamilyParameters::Trapezoidal { .. } => Routine::Trapezoidal,
        }
    }

    /// Requested integration range
    pub fn range(&self) -> (f64, f64) {
        match *self {
            FamilyParameters::GaussKronrod { a, b, .. }
            | FamilyParameters::TanhSinh { a, b }
            | FamilyParameters::Trapezoidal { a, b } => (a, b),
            FamilyParameters::SinhSinh => (f64::NEG_INFINITY, f64::INFINITY),
            FamilyParameters::ExpSinh { b, orientation } => match orientation {
                Orientation::Positive => (b, f64::INFINITY),
                Orientation::Negative => (f64::NEG_INFINITY, b),
            },
        }
    }

    /// Semantic checks on the range
    pub fn validate<E>(&self) -> Result<(), IntegrationError<E>>
    where
        E: std::error::Error + 'static,
    {
        let (a, b) = self.range();
        let finite_required = matches!(
            self,
            FamilyParameters::GaussKronrod { .. } | FamilyParameters::Trapezoidal { .. }
        );
        let anchored = match self {
            FamilyParameters::ExpSinh { b, .. } => b.is_finite(),
            _ => true,
        };

        // NaN bounds fail the ordering check
        let ordered = b > a;
        if !ordered || !anchored || (finite_required && !(a.is_finite() && b.is_finite())) {
            return Err(IntegrationError::InvalidBounds { a, b });
        }
        Ok(())
    }
}

/// Fully parsed and validated input to one routine call
#[derive(Debug, Clone)]
pub struct RoutineParameters<O> {
    pub integrand: O,
    pub args: Option<O>,
    pub kwargs: Option<O>,
    pub options: QuadratureOptions,
    pub family: FamilyParameters,
}

impl<O: Clone> RoutineParameters<O> {
    /// Build parameters from values already in native form
    ///
    /// # Errors
    ///
    /// `InvalidBounds` or `InvalidTolerance` when validation fails.
    pub fn new<E>(
        integrand: O,
        family: FamilyParameters,
        options: QuadratureOptions,
    ) -> Result<Self, IntegrationError<E>>
    where
        E: std::error::Error + 'static,
    {
        family.validate::<E>()?;
        options.validate::<E>()?;
        Ok(Self {
            integrand,
            args: None,
            kwargs: None,
            options,
            family,
        })
    }

    pub fn with_args(mut self, args: O) -> Self {
        self.args = Some(args);
        self
    }

    pub fn with_kwargs(mut self, kwargs: O) -> Self {
        self.kwargs = Some(kwargs);
        self
    }

    pub fn routine(&self) -> Routine {
        self.family.routine()
    }

    /// Parse raw host input for `routine`
    ///
    /// # Errors
    ///
    /// - `ArgumentParse` for binding failures and values of the wrong type
    /// - `InvalidOrientation` for a zero or NaN `interval_infinity`
    /// - `InvalidBounds` / `InvalidTolerance` from validation
    pub fn parse<B>(
        bridge: &B,
        routine: Routine,
        input: CallArgs<O>,
    ) -> Result<Self, IntegrationError<B::Error>>
    where
        B: ForeignBridge<Object = O>,
    {
        let bound = routine.schema().bind::<O, B::Error>(input)?;
        let reader = Reader {
            bridge,
            bound: &bound,
        };

        // Every type check runs before any semantic check
        let mut options = QuadratureOptions::for_routine(routine);
        if let Some(full_output) = reader.flag("full_output")? {
            options.full_output = full_output;
        }
        if let Some(max_levels) = reader.unsigned("max_levels")? {
            options.max_levels = usize::try_from(max_levels)
                .map_err(|_| reader.type_error("max_levels", "a non-negative integer"))?;
        }
        if let Some(tolerance) = reader.optional_real("tolerance")? {
            options.tolerance = tolerance;
        }

        let family = match routine {
            Routine::GaussKronrod => FamilyParameters::GaussKronrod {
                a: reader.real("a")?,
                b: reader.real("b")?,
                points: reader.unsigned("points")?.unwrap_or(DEFAULT_POINTS),
            },
            Routine::TanhSinh => FamilyParameters::TanhSinh {
                a: reader.real("a")?,
                b: reader.real("b")?,
            },
            Routine::SinhSinh => FamilyParameters::SinhSinh,
            Routine::ExpSinh => {
                let b = reader.real("b")?;
                let sign = reader.optional_real("interval_infinity")?.unwrap_or(1.0);
                let orientation = Orientation::from_sign(sign)
                    .ok_or(IntegrationError::<B::Error>::InvalidOrientation { sign })?;
                FamilyParameters::ExpSinh { b, orientation }
            }
            Routine::Trapezoidal => FamilyParameters::Trapezoidal {
                a: reader.real("a")?,
                b: reader.real("b")?,
            },
        };

        family.validate::<B::Error>()?;
        options.validate::<B::Error>()?;

        Ok(Self {
            integrand: bound.required::<B::Error>("f")?.clone(),
            args: reader.present("args"),
            kwargs: reader.present("kwargs"),
            options,
            family,
        })
    }
}

/// Typed access to bound arguments
struct Reader<'a, B: ForeignBridge> {
    bridge: &'a B,
    bound: &'a BoundArguments<B::Object>,
}

impl<B: ForeignBridge> Reader<'_, B> {
    /// Bound value, with an explicit foreign "None" treated as absent
    fn present(&self, name: &str) -> Option<B::Object> {
        self.bound
            .get(name)
            .filter(|value| !self.bridge.is_none(value))
            .cloned()
    }

    fn type_error(&self, name: &str, expected: &str) -> IntegrationError<B::Error> {
        let found = self
            .bound
            .get(name)
            .map(|value| self.bridge.type_name(value))
            .unwrap_or_else(|| "nothing".to_string());
        IntegrationError::parse(
            self.bound.schema().routine,
            format!("argument '{name}' must be {expected}, not {found}"),
        )
    }

    fn real(&self, name: &str) -> Result<f64, IntegrationError<B::Error>> {
        let value = self.bound.required::<B::Error>(name)?;
        self.bridge
            .to_real(value)
            .ok_or_else(|| self.type_error(name, "a real number"))
    }

    fn optional_real(&self, name: &str) -> Result<Option<f64>, IntegrationError<B::Error>> {
        self.present(name)
            .map(|value| {
                self.bridge
                    .to_real(&value)
                    .ok_or_else(|| self.type_error(name, "a real number"))
            })
            .transpose()
    }

    fn unsigned(&self, name: &str) -> Result<Option<u64>, IntegrationError<B::Error>> {
        self.present(name)
            .map(|value| {
                self.bridge
                    .to_unsigned(&value)
                    .ok_or_else(|| self.type_error(name, "a non-negative integer"))
            })
            .transpose()
    }

    fn flag(&self, name: &str) -> Result<Option<bool>, IntegrationError<B::Error>> {
        self.present(name)
            .map(|value| {
                self.bridge
                    .to_bool(&value)
                    .ok_or_else(|| self.type_error(name, "a boolean"))
            })
            .transpose()
    }
}
