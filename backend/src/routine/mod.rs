//! Routine layer
//!
//! Everything between a raw host call and the quadrature engine:
//!
//! - **schema**: binds positional/keyword input to named parameters
//! - **options**: shared keyword-only options and their defaults
//! - **params**: typed, validated per-family parameters
//! - **domain**: maps the requested range onto the engine's native range
//! - **selector**: resolves a Gauss-Kronrod point count to a compiled rule
//! - **diagnostics**: the optional full-output bundle
//! - **dispatch**: the generic driver tying the above together

pub mod diagnostics;
pub mod dispatch;
pub mod domain;
pub mod options;
pub mod params;
pub mod schema;
pub mod selector;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use diagnostics::{DiagnosticValue, Diagnostics};
pub use dispatch::Integral;
pub use options::QuadratureOptions;
pub use params::{FamilyParameters, Orientation, RoutineParameters};
pub use schema::RoutineSchema;
pub use selector::RuleOrder;

/// The five integration routines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Routine {
    GaussKronrod,
    TanhSinh,
    SinhSinh,
    ExpSinh,
    Trapezoidal,
}

impl Routine {
    pub const ALL: [Routine; 5] = [
        Routine::GaussKronrod,
        Routine::TanhSinh,
        Routine::SinhSinh,
        Routine::ExpSinh,
        Routine::Trapezoidal,
    ];

    /// Name as exposed to the host runtime
    pub fn name(self) -> &'static str {
        match self {
            Routine::GaussKronrod => "gauss_kronrod",
            Routine::TanhSinh => "tanh_sinh",
            Routine::SinhSinh => "sinh_sinh",
            Routine::ExpSinh => "exp_sinh",
            Routine::Trapezoidal => "trapezoidal",
        }
    }

    pub fn schema(self) -> &'static RoutineSchema {
        RoutineSchema::of(self)
    }

    pub fn default_max_levels(self) -> usize {
        match self {
            Routine::Trapezoidal => 12,
            _ => 15,
        }
    }
}

impl fmt::Display for Routine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routine_serde_names_match_host_names() {
        for routine in Routine::ALL {
            let json = serde_json::to_string(&routine).unwrap();
            assert_eq!(json, format!("\"{}\"", routine.name()));
        }
    }

    #[test]
    fn test_default_max_levels() {
        assert_eq!(Routine::Trapezoidal.default_max_levels(), 12);
        assert_eq!(Routine::ExpSinh.default_max_levels(), 15);
    }
}
