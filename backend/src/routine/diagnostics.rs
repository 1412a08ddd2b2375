//! Full-output diagnostics
//!
//! Every bundle carries the L1-norm estimate. Adaptive families add the
//! number of refinement levels used; the Gauss-Kronrod family instead adds
//! the abscissas and weights of the rule order that was actually applied.

use serde::{Deserialize, Serialize};

use super::selector::RuleOrder;
use crate::engine::Estimate;

pub const L1_NORM_KEY: &str = "L1 norm";
pub const LEVELS_KEY: &str = "levels";
pub const ABSCISSA_KEY: &str = "abscissa";
pub const WEIGHTS_KEY: &str = "weights";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub l1_norm: f64,
    #[serde(flatten)]
    pub detail: DiagnosticDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticDetail {
    Levels(usize),
    Rule {
        abscissa: Vec<f64>,
        weights: Vec<f64>,
    },
}

/// One diagnostics entry in host-neutral form
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticValue {
    Real(f64),
    Count(usize),
    Reals(Vec<f64>),
}

impl Diagnostics {
    /// Build the bundle for an engine result
    ///
    /// `rule` is the resolved Gauss-Kronrod order, `None` for the adaptive
    /// families.
    pub fn assemble(estimate: &Estimate, rule: Option<RuleOrder>) -> Self {
        let detail = match rule {
            Some(order) => DiagnosticDetail::Rule {
                abscissa: order.abscissa().to_vec(),
                weights: order.weights().to_vec(),
            },
            None => DiagnosticDetail::Levels(estimate.levels.unwrap_or(0)),
        };

        Self {
            l1_norm: estimate.l1_norm,
            detail,
        }
    }

    pub fn levels(&self) -> Option<usize> {
        match self.detail {
            DiagnosticDetail::Levels(levels) => Some(levels),
            DiagnosticDetail::Rule { .. } => None,
        }
    }

    /// Keyed entries in host order
    pub fn entries(&self) -> Vec<(&'static str, DiagnosticValue)> {
        let mut entries = vec![(L1_NORM_KEY, DiagnosticValue::Real(self.l1_norm))];
        match &self.detail {
            DiagnosticDetail::Levels(levels) => {
                entries.push((LEVELS_KEY, DiagnosticValue::Count(*levels)));
            }
            DiagnosticDetail::Rule { abscissa, weights } => {
                entries.push((ABSCISSA_KEY, DiagnosticValue::Reals(abscissa.clone())));
                entries.push((WEIGHTS_KEY, DiagnosticValue::Reals(weights.clone())));
            }
        }
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    fn estimate(levels: Option<usize>) -> Estimate {
        Estimate {
            value: Complex64::new(1.0, 0.0),
            error: 1e-12,
            l1_norm: 2.5,
            levels,
        }
    }

    #[test]
    fn test_adaptive_entries() {
        let diagnostics = Diagnostics::assemble(&estimate(Some(6)), None);
        let keys: Vec<_> = diagnostics.entries().into_iter().map(|(k, _)| k).collect();

        assert_eq!(keys, vec!["L1 norm", "levels"]);
        assert_eq!(diagnostics.levels(), Some(6));
    }

    #[test]
    fn test_rule_entries_follow_resolved_order() {
        let diagnostics = Diagnostics::assemble(&estimate(None), Some(RuleOrder::K51));
        let entries = diagnostics.entries();

        assert_eq!(entries[0], ("L1 norm", DiagnosticValue::Real(2.5)));
        assert_eq!(entries[1].0, "abscissa");
        assert_eq!(entries[2].0, "weights");
        match &entries[1].1 {
            DiagnosticValue::Reals(xs) => assert_eq!(xs.len(), 26),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(diagnostics.levels(), None);
    }

    #[test]
    fn test_serializes_flat() {
        let diagnostics = Diagnostics::assemble(&estimate(Some(4)), None);
        let json = serde_json::to_value(&diagnostics).unwrap();
        assert_eq!(json, serde_json::json!({"l1_norm": 2.5, "levels": 4}));
    }
}
