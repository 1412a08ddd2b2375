//! Gauss-Kronrod rule selection
//!
//! Maps a runtime point count onto one of the compiled rules. Each order is a
//! separate `GaussKronrod<N>` specialization; an unsupported count is an
//! error and never falls back to a default order.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::gauss_kronrod::GaussKronrod;
use crate::engine::kronrod::KronrodTable;
use crate::engine::{Estimate, Integrand};
use crate::error::IntegrationError;

/// A supported Gauss-Kronrod point count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub enum RuleOrder {
    K15,
    K31,
    K41,
    K51,
    K61,
}

impl RuleOrder {
    pub const ALL: [RuleOrder; 5] = [
        RuleOrder::K15,
        RuleOrder::K31,
        RuleOrder::K41,
        RuleOrder::K51,
        RuleOrder::K61,
    ];

    pub fn points(self) -> u64 {
        match self {
            RuleOrder::K15 => 15,
            RuleOrder::K31 => 31,
            RuleOrder::K41 => 41,
            RuleOrder::K51 => 51,
            RuleOrder::K61 => 61,
        }
    }

    /// Resolve a point count
    pub fn resolve<E>(points: u64) -> Result<Self, IntegrationError<E>>
    where
        E: std::error::Error + 'static,
    {
        Self::try_from(points).map_err(|_| IntegrationError::InvalidRuleOrder { points })
    }

    /// Node/weight table of this order
    pub fn table(self) -> &'static KronrodTable {
        match self {
            RuleOrder::K15 => GaussKronrod::<15>::table(),
            RuleOrder::K31 => GaussKronrod::<31>::table(),
            RuleOrder::K41 => GaussKronrod::<41>::table(),
            RuleOrder::K51 => GaussKronrod::<51>::table(),
            RuleOrder::K61 => GaussKronrod::<61>::table(),
        }
    }

    /// Non-negative abscissas, ascending from 0
    pub fn abscissa(self) -> &'static [f64] {
        self.table().abscissa()
    }

    /// Kronrod weights matching [`abscissa`](Self::abscissa)
    pub fn weights(self) -> &'static [f64] {
        self.table().kronrod_weights()
    }

    pub fn integrate<F>(
        self,
        f: &mut F,
        a: f64,
        b: f64,
        max_levels: usize,
        tolerance: f64,
    ) -> Result<Estimate, F::Error>
    where
        F: Integrand + ?Sized,
    {
        match self {
            RuleOrder::K15 => GaussKronrod::<15>::integrate(f, a, b, max_levels, tolerance),
            RuleOrder::K31 => GaussKronrod::<31>::integrate(f, a, b, max_levels, tolerance),
            RuleOrder::K41 => GaussKronrod::<41>::integrate(f, a, b, max_levels, tolerance),
            RuleOrder::K51 => GaussKronrod::<51>::integrate(f, a, b, max_levels, tolerance),
            RuleOrder::K61 => GaussKronrod::<61>::integrate(f, a, b, max_levels, tolerance),
        }
    }
}

/// Point count outside {15, 31, 41, 51, 61}
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsupportedOrder(pub u64);

impl fmt::Display for UnsupportedOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported Gauss-Kronrod point count {}", self.0)
    }
}

impl TryFrom<u64> for RuleOrder {
    type Error = UnsupportedOrder;

    fn try_from(points: u64) -> Result<Self, Self::Error> {
        match points {
            15 => Ok(RuleOrder::K15),
            31 => Ok(RuleOrder::K31),
            41 => Ok(RuleOrder::K41),
            51 => Ok(RuleOrder::K51),
            61 => Ok(RuleOrder::K61),
            other => Err(UnsupportedOrder(other)),
        }
    }
}

impl From<RuleOrder> for u64 {
    fn from(order: RuleOrder) -> u64 {
        order.points()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::native::HostError;

    #[test]
    fn test_resolution_is_exact() {
        for order in RuleOrder::ALL {
            assert_eq!(RuleOrder::try_from(order.points()), Ok(order));
            assert_eq!(order.table().points() as u64, order.points());
        }
        for points in [0, 7, 21, 30, 32, 63, u64::MAX] {
            assert!(matches!(
                RuleOrder::resolve::<HostError>(points),
                Err(IntegrationError::InvalidRuleOrder { points: p }) if p == points
            ));
        }
    }

    #[test]
    fn test_half_tables() {
        let order = RuleOrder::K15;
        assert_eq!(order.abscissa().len(), 8);
        assert_eq!(order.weights().len(), 8);
        assert_eq!(order.abscissa()[0], 0.0);
        assert!(order.abscissa().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_serde_as_point_count() {
        assert_eq!(serde_json::to_string(&RuleOrder::K41).unwrap(), "41");
        assert_eq!(serde_json::from_str::<RuleOrder>("61").unwrap(), RuleOrder::K61);
        assert!(serde_json::from_str::<RuleOrder>("21").is_err());
    }
}
