//! Tests for routine parameter parsing
//!
//! Drives RoutineParameters::parse through the in-process host runtime and
//! checks schema binding, defaults, type checks and semantic validation.

use kumquat::bridge::native::{HostError, NativeBridge, Value};
use kumquat::{
    CallArgs, FamilyParameters, IntegrationError, Orientation, QuadratureOptions, Routine,
    RoutineParameters,
};

type Parsed = Result<RoutineParameters<Value>, IntegrationError<HostError>>;

fn parse(routine: Routine, input: CallArgs<Value>) -> Parsed {
    RoutineParameters::parse(&NativeBridge, routine, input)
}

fn f() -> Value {
    Value::function("f", |_args, _kwargs| Ok(Value::Float(0.0)))
}

fn assert_parse_error(result: Parsed, expected: &str) {
    match result {
        Err(IntegrationError::ArgumentParse { message, .. }) => {
            assert!(
                message.contains(expected),
                "message {message:?} does not contain {expected:?}"
            )
        }
        other => panic!("expected ArgumentParse, got {other:?}"),
    }
}

#[test]
fn test_all_keywords() {
    let input = CallArgs::default()
        .keyword("f", f())
        .keyword("a", Value::Float(-1.0))
        .keyword("b", Value::Float(2.0))
        .keyword("args", Value::tuple([Value::Int(1)]))
        .keyword("kwargs", Value::dict([("k", Value::Int(2))]))
        .keyword("full_output", Value::Bool(true))
        .keyword("max_levels", Value::Int(7))
        .keyword("tolerance", Value::Float(1e-6))
        .keyword("points", Value::Int(61));

    let params = parse(Routine::GaussKronrod, input).unwrap();

    assert_eq!(
        params.family,
        FamilyParameters::GaussKronrod {
            a: -1.0,
            b: 2.0,
            points: 61
        }
    );
    assert_eq!(
        params.options,
        QuadratureOptions {
            full_output: true,
            max_levels: 7,
            tolerance: 1e-6
        }
    );
    assert!(params.args.is_some());
    assert!(params.kwargs.is_some());
}

#[test]
fn test_defaults_per_routine() {
    let finite = || vec![f(), Value::Float(0.0), Value::Float(1.0)];
    let cases = [
        (Routine::GaussKronrod, finite()),
        (Routine::TanhSinh, finite()),
        (Routine::SinhSinh, vec![f()]),
        (Routine::ExpSinh, vec![f(), Value::Float(0.0)]),
        (Routine::Trapezoidal, finite()),
    ];

    for (routine, positional) in cases {
        let params = parse(routine, CallArgs::new(positional)).unwrap();
        assert_eq!(params.routine(), routine);
        assert!(!params.options.full_output);
        assert_eq!(params.options.tolerance, f64::EPSILON.sqrt());
        assert_eq!(params.options.max_levels, routine.default_max_levels());
    }
}

#[test]
fn test_exp_sinh_defaults_to_positive_orientation() {
    let params = parse(Routine::ExpSinh, CallArgs::new(vec![f(), Value::Float(1.0)])).unwrap();
    assert_eq!(
        params.family,
        FamilyParameters::ExpSinh {
            b: 1.0,
            orientation: Orientation::Positive
        }
    );
}

#[test]
fn test_exp_sinh_rejects_zero_orientation() {
    let result = parse(
        Routine::ExpSinh,
        CallArgs::new(vec![f(), Value::Float(1.0)]).keyword("interval_infinity", Value::Float(0.0)),
    );
    assert!(matches!(result, Err(IntegrationError::InvalidOrientation { .. })));

    let result = parse(
        Routine::ExpSinh,
        CallArgs::new(vec![f(), Value::Float(1.0)])
            .keyword("interval_infinity", Value::Float(f64::NAN)),
    );
    assert!(matches!(result, Err(IntegrationError::InvalidOrientation { .. })));
}

#[test]
fn test_type_errors_win_over_orientation() {
    let zero = || Value::Float(0.0);

    let result = parse(
        Routine::ExpSinh,
        CallArgs::new(vec![f(), Value::str("x")]).keyword("interval_infinity", zero()),
    );
    assert_parse_error(result, "argument 'b' must be a real number, not str");

    let result = parse(
        Routine::ExpSinh,
        CallArgs::new(vec![f(), Value::Float(1.0)])
            .keyword("interval_infinity", zero())
            .keyword("full_output", Value::str("yes")),
    );
    assert_parse_error(result, "argument 'full_output' must be a boolean, not str");
}

#[test]
fn test_exp_sinh_requires_finite_anchor() {
    let result = parse(
        Routine::ExpSinh,
        CallArgs::new(vec![f(), Value::Float(f64::INFINITY)]),
    );
    assert!(matches!(result, Err(IntegrationError::InvalidBounds { .. })));
}

#[test]
fn test_sinh_sinh_rejects_bounds() {
    let result = parse(
        Routine::SinhSinh,
        CallArgs::new(vec![f(), Value::Float(0.0), Value::Float(1.0)]),
    );
    assert_parse_error(result, "takes 1 positional argument but 3 were given");

    let result = parse(
        Routine::SinhSinh,
        CallArgs::new(vec![f()]).keyword("a", Value::Float(0.0)),
    );
    assert_parse_error(result, "unexpected keyword argument 'a'");
}

#[test]
fn test_sinh_sinh_extra_arguments_by_keyword() {
    let params = parse(
        Routine::SinhSinh,
        CallArgs::new(vec![f()]).keyword("args", Value::tuple([Value::Float(2.0)])),
    )
    .unwrap();
    assert!(params.args.is_some());
}

#[test]
fn test_missing_and_duplicate_arguments() {
    assert_parse_error(
        parse(Routine::TanhSinh, CallArgs::new(vec![f(), Value::Float(0.0)])),
        "missing required argument 'b'",
    );
    assert_parse_error(
        parse(Routine::TanhSinh, CallArgs::default()),
        "missing required argument 'f'",
    );
    assert_parse_error(
        parse(
            Routine::Trapezoidal,
            CallArgs::new(vec![f(), Value::Float(0.0), Value::Float(1.0)])
                .keyword("f", f()),
        ),
        "multiple values for argument 'f'",
    );
}

#[test]
fn test_type_mismatches() {
    assert_parse_error(
        parse(
            Routine::GaussKronrod,
            CallArgs::new(vec![f(), Value::Float(0.0), Value::Float(1.0)])
                .keyword("points", Value::Float(15.0)),
        ),
        "argument 'points' must be a non-negative integer, not float",
    );
    assert_parse_error(
        parse(
            Routine::TanhSinh,
            CallArgs::new(vec![f(), Value::Float(0.0), Value::Float(1.0)])
                .keyword("full_output", Value::str("yes")),
        ),
        "argument 'full_output' must be a boolean, not str",
    );
    assert_parse_error(
        parse(
            Routine::ExpSinh,
            CallArgs::new(vec![f(), Value::tuple([])]),
        ),
        "argument 'b' must be a real number, not tuple",
    );
}

#[test]
fn test_integer_bounds_are_accepted() {
    let params = parse(
        Routine::Trapezoidal,
        CallArgs::new(vec![f(), Value::Int(-2), Value::Int(3)]),
    )
    .unwrap();
    assert_eq!(params.family.range(), (-2.0, 3.0));
}

#[test]
fn test_bounds_and_tolerance_validation() {
    let result = parse(
        Routine::GaussKronrod,
        CallArgs::new(vec![f(), Value::Float(1.0), Value::Float(0.0)]),
    );
    assert!(matches!(result, Err(IntegrationError::InvalidBounds { a, b }) if a == 1.0 && b == 0.0));

    let result = parse(
        Routine::TanhSinh,
        CallArgs::new(vec![f(), Value::Float(0.0), Value::Float(1.0)])
            .keyword("tolerance", Value::Float(-1.0)),
    );
    assert!(matches!(result, Err(IntegrationError::InvalidTolerance { .. })));
}

#[test]
fn test_callable_not_checked_at_parse_time() {
    // Callability is the adapter's concern
    let params = parse(
        Routine::TanhSinh,
        CallArgs::new(vec![Value::Int(3), Value::Float(0.0), Value::Float(1.0)]),
    );
    assert!(params.is_ok());
}

#[test]
fn test_options_from_json() {
    let options: QuadratureOptions =
        serde_json::from_value(serde_json::json!({"full_output": true, "max_levels": 3}))
            .unwrap();
    let params = RoutineParameters::<Value>::new::<HostError>(
        f(),
        FamilyParameters::SinhSinh,
        options,
    )
    .unwrap()
    .with_args(Value::tuple([Value::Int(1)]));

    assert!(params.args.is_some());
    assert!(params.kwargs.is_none());
    assert!(params.options.full_output);
    assert_eq!(params.options.max_levels, 3);
    assert_eq!(params.options.tolerance, QuadratureOptions::default_tolerance());
}
