//! Routine dispatcher
//!
//! One driver for all five routines:
//!
//! ```text
//! parse -> wrap integrand -> map domain -> select rule -> engine -> diagnostics
//! ```
//!
//! Every stage fails fast. The adapter, and with it every foreign reference
//! taken for the call, is dropped before the result or error is returned.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::diagnostics::Diagnostics;
use super::domain::NativeRange;
use super::params::{FamilyParameters, RoutineParameters};
use super::selector::RuleOrder;
use super::{QuadratureOptions, Routine};
use crate::bridge::{CallArgs, ForeignBridge};
use crate::engine::{exp_sinh, sinh_sinh, tanh_sinh, trapezoidal, Estimate, Integrand};
use crate::error::IntegrationError;
use crate::integrand::IntegrandAdapter;

/// Result of one routine call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Integral {
    pub value: Complex64,
    /// Absolute error estimate
    pub error: f64,
    /// Present only when full output was requested
    pub diagnostics: Option<Diagnostics>,
}

/// Parse raw host input for `routine` and run it
pub fn integrate<B: ForeignBridge>(
    bridge: &B,
    routine: Routine,
    input: CallArgs<B::Object>,
) -> Result<Integral, IntegrationError<B::Error>> {
    let params = RoutineParameters::parse(bridge, routine, input)?;
    run(bridge, &params)
}

/// Run a routine from already validated parameters
pub fn run<B: ForeignBridge>(
    bridge: &B,
    params: &RoutineParameters<B::Object>,
) -> Result<Integral, IntegrationError<B::Error>> {
    let routine = params.routine();
    let options = params.options;
    let (a, b) = params.family.range();

    debug!(
        routine = routine.name(),
        a,
        b,
        full_output = options.full_output,
        max_levels = options.max_levels,
        tolerance = options.tolerance,
        "integrating"
    );

    let mut adapter = IntegrandAdapter::new(
        bridge,
        &params.integrand,
        params.args.as_ref(),
        params.kwargs.as_ref(),
    )?;
    let range = NativeRange::of(&params.family);
    let rule = match params.family {
        FamilyParameters::GaussKronrod { points, .. } => {
            let order = RuleOrder::resolve::<B::Error>(points)?;
            debug_assert_eq!(order.points(), points);
            Some(order)
        }
        _ => None,
    };

    let estimate = evaluate(&mut adapter, &params.family, range, rule, &options)?;

    debug!(
        routine = routine.name(),
        value = ?estimate.value,
        error = estimate.error,
        l1_norm = estimate.l1_norm,
        levels = ?estimate.levels,
        "integration finished"
    );

    Ok(Integral {
        value: estimate.value,
        error: estimate.error,
        diagnostics: options
            .full_output
            .then(|| Diagnostics::assemble(&estimate, rule)),
    })
}

fn evaluate<F>(
    f: &mut F,
    family: &FamilyParameters,
    range: NativeRange,
    rule: Option<RuleOrder>,
    options: &QuadratureOptions,
) -> Result<Estimate, F::Error>
where
    F: Integrand + ?Sized,
{
    let QuadratureOptions {
        max_levels,
        tolerance,
        ..
    } = *options;

    match (range, rule) {
        (NativeRange::Finite { a, b }, Some(order)) => {
            order.integrate(f, a, b, max_levels, tolerance)
        }
        (NativeRange::Finite { a, b }, None) => match family {
            FamilyParameters::Trapezoidal { .. } => {
                trapezoidal::integrate(f, a, b, max_levels, tolerance)
            }
            _ => tanh_sinh::integrate(f, a, b, max_levels, tolerance),
        },
        (NativeRange::RealLine, _) => sinh_sinh::integrate(f, max_levels, tolerance),
        (NativeRange::HalfLine(line), _) => {
            exp_sinh::integrate(&mut line.view(f), max_levels, tolerance)
        }
    }
}
